use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Consumed input contract ---

/// One completed LLM query response, as handed over by the query
/// orchestrator. `target_position` is the 1-based slot of the target
/// business within the response's recommendation list, if it was ranked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryResponse {
    pub query_index: u32,
    pub text: String,
    pub was_target_mentioned: bool,
    pub target_position: Option<u32>,
}

/// The full input for one fingerprint run: every LLM response gathered
/// for the target business, plus how many queries were issued in total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FingerprintInput {
    pub target_business_name: String,
    pub total_queries: u32,
    pub query_responses: Vec<QueryResponse>,
}

// --- Intermediate pipeline values ---

/// One observed occurrence of a name-like string in one query response.
/// `position_in_list` is the 1-based rank within that response's
/// recommendation list, or None if the mention was unranked prose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawMention {
    pub source_query_index: u32,
    pub text: String,
    pub position_in_list: Option<u32>,
}

/// A business-name candidate after validation, before deduplication.
/// `positions` keeps every ranked slot the name was seen at, across all
/// queries, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateCompetitor {
    pub name: String,
    pub mention_count: u32,
    pub positions: Vec<u32>,
}

// --- Produced output contract ---

/// A deduplicated, ranked competitor in the final leaderboard.
/// `rank` values are contiguous from 1; `market_share` is a percentage
/// of all pooled mentions (target included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Competitor {
    pub name: String,
    pub mention_count: u32,
    pub market_share: f64,
    pub rank: u32,
    pub avg_position: Option<f64>,
}

/// How the target business itself fared across the query batch.
/// `rank` is None when the target was never mentioned in a ranked
/// context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TargetBusinessSummary {
    pub name: String,
    pub mention_count: u32,
    pub mention_rate: f64,
    pub rank: Option<u32>,
}

/// Qualitative bucket for the target's standing, derived from its
/// mention rate. `Unknown` only when no queries were run at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Leading,
    Competitive,
    Emerging,
    Unknown,
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketPosition::Leading => write!(f, "leading"),
            MarketPosition::Competitive => write!(f, "competitive"),
            MarketPosition::Emerging => write!(f, "emerging"),
            MarketPosition::Unknown => write!(f, "unknown"),
        }
    }
}

/// Derived takeaways for presentation. `competitive_gap` is signed:
/// negative means the target out-mentions its top competitor.
/// `recommendation` is always a non-empty string of at least 10 chars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Insights {
    pub market_position: MarketPosition,
    pub top_competitor: Option<String>,
    pub competitive_gap: Option<i64>,
    pub recommendation: String,
}

/// The output DTO for one fingerprint run. Competitors are ordered by
/// rank ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitiveLeaderboard {
    pub target_business: TargetBusinessSummary,
    pub competitors: Vec<Competitor>,
    pub insights: Insights,
    pub total_queries: u32,
}
