//! Leaderboard Aggregator — turns the deduplicated competitor set and
//! the target's raw mention data into the final leaderboard DTO.
//!
//! All ratios guard the zero cases explicitly: zero queries and zero
//! competitors are valid, fully-specified output states, never errors.

use brandlens_common::{
    CandidateCompetitor, Competitor, CompetitiveLeaderboard, Insights, LeaderboardConfig,
    MarketPosition, TargetBusinessSummary,
};

/// Raw mention data for the target business, gathered upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMentions {
    pub name: String,
    /// Number of queries whose response mentioned the target (once per
    /// query, regardless of repeats within a response).
    pub mention_count: u32,
    /// Every ranked slot the target was seen at, across all queries.
    pub positions: Vec<u32>,
}

/// Build the leaderboard: market shares, contiguous ranks, mention
/// rate, market-position classification, and insights.
pub fn aggregate(
    target: TargetMentions,
    candidates: Vec<CandidateCompetitor>,
    total_queries: u32,
    config: &LeaderboardConfig,
) -> CompetitiveLeaderboard {
    let competitor_mentions: u32 = candidates.iter().map(|c| c.mention_count).sum();
    let total_mentions = target.mention_count + competitor_mentions;

    // Stable sort keeps first-seen order among equal counts, so ranks
    // are deterministic on identical input.
    let mut sorted = candidates;
    sorted.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));

    // Shares for [target, competitors...] sum to exactly 100.0 by
    // apportionment, no matter how many participants there are.
    let counts: Vec<u32> = std::iter::once(target.mention_count)
        .chain(sorted.iter().map(|c| c.mention_count))
        .collect();
    let shares = apportion_shares(&counts);
    let target_share = shares[0];

    let competitors: Vec<Competitor> = sorted
        .into_iter()
        .enumerate()
        .map(|(i, c)| Competitor {
            market_share: shares[i + 1],
            rank: (i + 1) as u32,
            avg_position: mean(&c.positions),
            name: c.name,
            mention_count: c.mention_count,
        })
        .collect();

    debug_assert!(
        total_mentions == 0
            || (competitors.iter().map(|c| c.market_share).sum::<f64>() + target_share - 100.0)
                .abs()
                <= config.share_tolerance,
        "market shares must conserve to 100 within tolerance"
    );

    let mention_rate = if total_queries > 0 {
        round1(target.mention_count as f64 / total_queries as f64 * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let market_position = classify(mention_rate, total_queries, config);

    // The target's slot in the combined ordering; None when it was
    // never mentioned in a ranked context.
    let target_rank = if target.positions.is_empty() {
        None
    } else {
        let above = competitors
            .iter()
            .filter(|c| c.mention_count > target.mention_count)
            .count();
        Some((above + 1) as u32)
    };

    let top_competitor = competitors.first().map(|c| c.name.clone());
    let competitive_gap = competitors
        .first()
        .map(|c| c.mention_count as i64 - target.mention_count as i64);

    let recommendation = build_recommendation(
        &target.name,
        market_position,
        mention_rate,
        top_competitor.as_deref(),
        competitive_gap,
    );
    debug_assert!(recommendation.len() >= 10, "recommendation must be substantive");

    CompetitiveLeaderboard {
        target_business: TargetBusinessSummary {
            name: target.name,
            mention_count: target.mention_count,
            mention_rate,
            rank: target_rank,
        },
        competitors,
        insights: Insights {
            market_position,
            top_competitor,
            competitive_gap,
            recommendation,
        },
        total_queries,
    }
}

fn classify(mention_rate: f64, total_queries: u32, config: &LeaderboardConfig) -> MarketPosition {
    if total_queries == 0 {
        MarketPosition::Unknown
    } else if mention_rate >= config.leading_threshold {
        MarketPosition::Leading
    } else if mention_rate >= config.competitive_threshold {
        MarketPosition::Competitive
    } else {
        MarketPosition::Emerging
    }
}

fn build_recommendation(
    target: &str,
    position: MarketPosition,
    mention_rate: f64,
    top_competitor: Option<&str>,
    gap: Option<i64>,
) -> String {
    match (position, top_competitor) {
        (MarketPosition::Unknown, _) => format!(
            "Run visibility queries to establish an AI-mention baseline for {target}."
        ),
        (MarketPosition::Leading, Some(top)) => format!(
            "{target} leads AI recommendations with a {mention_rate:.0}% mention rate. \
             Keep publishing authoritative content to stay ahead of {top}."
        ),
        (MarketPosition::Leading, None) => format!(
            "{target} leads AI recommendations with a {mention_rate:.0}% mention rate \
             and no rival names surfaced in this run. Defend the position with fresh content."
        ),
        (MarketPosition::Competitive, Some(top)) => match gap {
            Some(g) if g > 0 => format!(
                "{target} is competitive at a {mention_rate:.0}% mention rate but trails \
                 {top} by {g} mentions. Target the queries where {top} appears."
            ),
            _ => format!(
                "{target} is competitive at a {mention_rate:.0}% mention rate and already \
                 out-mentions {top}. Push for the leading tier with more citable content."
            ),
        },
        (MarketPosition::Competitive, None) => format!(
            "{target} is competitive at a {mention_rate:.0}% mention rate. Broaden coverage \
             of the queries your customers ask to reach the leading tier."
        ),
        (MarketPosition::Emerging, Some(top)) => format!(
            "{target} appears in only {mention_rate:.0}% of AI answers while {top} is \
             mentioned most. Build citable, structured content to close the gap."
        ),
        (MarketPosition::Emerging, None) => format!(
            "{target} appears in only {mention_rate:.0}% of AI answers. Improve structured \
             data and authority content so models start citing it."
        ),
    }
}

/// Divide 100% into one-decimal shares proportional to `counts`,
/// using largest-remainder apportionment over tenths of a percent.
/// The returned shares always sum to exactly 100.0 (or all zeros when
/// nothing was counted), so conservation does not degrade as the
/// field widens.
fn apportion_shares(counts: &[u32]) -> Vec<f64> {
    let whole: u32 = counts.iter().sum();
    if whole == 0 {
        return vec![0.0; counts.len()];
    }

    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / whole as f64 * 1000.0)
        .collect();
    let mut tenths: Vec<u64> = exact.iter().map(|&e| e.floor() as u64).collect();
    let assigned: u64 = tenths.iter().sum();

    // Hand the leftover tenths to the largest remainders; ties break
    // toward earlier (higher-ranked) participants via the stable sort.
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - exact[a].floor();
        let rb = exact[b] - exact[b].floor();
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    for &i in order.iter().take(1000u64.saturating_sub(assigned) as usize) {
        tenths[i] += 1;
    }

    tenths.iter().map(|&t| t as f64 / 10.0).collect()
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
    }
}
