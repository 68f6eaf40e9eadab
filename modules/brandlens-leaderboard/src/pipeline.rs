//! Pipeline orchestration: sanitize input, then run extractor ->
//! validator -> deduplicator -> aggregator.
//!
//! Malformed upstream records are repaired or dropped here, before any
//! stage sees them; degenerate inputs (zero queries, zero competitors,
//! target never mentioned) flow through and produce valid leaderboards.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::fmt;

use brandlens_common::{
    BrandLensError, CandidateCompetitor, CompetitiveLeaderboard, FingerprintInput,
    LeaderboardConfig, QueryResponse,
};
use tracing::{debug, info, warn};

use crate::aggregator::{self, TargetMentions};
use crate::dedup::{merge_candidates, normalize_name};
use crate::extractor::MentionExtractor;
use crate::validator::NameValidator;

/// One-line summary of a leaderboard build, logged on completion.
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub responses_scanned: usize,
    pub raw_mentions: usize,
    pub target_queries: usize,
    pub candidates_rejected: usize,
    pub unique_candidates: usize,
    pub competitors: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Leaderboard build: {} responses scanned, {} raw mentions, target in {} queries, \
             {} candidates rejected, {} unique candidates, {} competitors after dedup",
            self.responses_scanned,
            self.raw_mentions,
            self.target_queries,
            self.candidates_rejected,
            self.unique_candidates,
            self.competitors,
        )
    }
}

/// Build a competitive leaderboard from one fingerprint run's worth of
/// LLM query responses.
///
/// The only hard input error is a blank target name; everything else is
/// repaired, dropped, or flows through as a degenerate-but-valid state.
pub fn build_leaderboard(
    input: &FingerprintInput,
    config: &LeaderboardConfig,
) -> Result<CompetitiveLeaderboard, BrandLensError> {
    let target_name = input.target_business_name.trim();
    if target_name.is_empty() {
        return Err(BrandLensError::Input(
            "target business name must not be blank".to_string(),
        ));
    }

    let responses = sanitize_responses(&input.query_responses);

    // A response count larger than the declared query total is malformed
    // upstream bookkeeping; the larger value wins so the mention rate
    // stays within [0, 100] without discarding observed data.
    let total_queries = input.total_queries.max(responses.len() as u32);
    if total_queries > input.total_queries {
        warn!(
            declared = input.total_queries,
            observed = responses.len(),
            "more responses than declared queries; using response count"
        );
    }

    let mut stats = PipelineStats {
        responses_scanned: responses.len(),
        ..PipelineStats::default()
    };

    let extractor = MentionExtractor::new();
    let validator = NameValidator::new(config);
    let by_query = extractor.extract(&responses);
    let target_key = normalize_name(target_name);

    let mut target_mention_count: u32 = 0;
    let mut target_positions: Vec<u32> = Vec::new();
    // Unique raw surface form -> candidate, in first-seen order.
    let mut candidate_order: Vec<String> = Vec::new();
    let mut candidates: HashMap<String, CandidateCompetitor> = HashMap::new();

    for response in &responses {
        let mentions = by_query.get(&response.query_index).map_or(&[][..], Vec::as_slice);
        stats.raw_mentions += mentions.len();

        // The target counts once per query for rate purposes, but every
        // ranked slot it was seen at is retained for averaging.
        let mut saw_target = response.was_target_mentioned;
        let mut query_positions: Vec<u32> = Vec::new();
        if let Some(p) = response.target_position {
            query_positions.push(p);
        }

        for mention in mentions {
            if normalize_name(&mention.text) == target_key {
                saw_target = true;
                if let Some(p) = mention.position_in_list {
                    if !query_positions.contains(&p) {
                        query_positions.push(p);
                    }
                }
                continue;
            }

            match validator.validate(&mention.text) {
                Ok(()) => {
                    let positions: Vec<u32> = mention.position_in_list.into_iter().collect();
                    match candidates.entry(mention.text.clone()) {
                        Entry::Occupied(mut e) => {
                            let c = e.get_mut();
                            c.mention_count += 1;
                            c.positions.extend(positions);
                        }
                        Entry::Vacant(e) => {
                            candidate_order.push(mention.text.clone());
                            e.insert(CandidateCompetitor {
                                name: mention.text.clone(),
                                mention_count: 1,
                                positions,
                            });
                        }
                    }
                }
                Err(reason) => {
                    stats.candidates_rejected += 1;
                    debug!(candidate = %mention.text, %reason, "rejected candidate name");
                }
            }
        }

        let mentioned = saw_target || !query_positions.is_empty();
        if mentioned {
            target_mention_count += 1;
            stats.target_queries += 1;
            target_positions.extend(query_positions);
        }
    }

    let ordered: Vec<CandidateCompetitor> = candidate_order
        .into_iter()
        .filter_map(|name| candidates.remove(&name))
        .collect();
    stats.unique_candidates = ordered.len();

    let merged = merge_candidates(ordered);
    stats.competitors = merged.len();

    let board = aggregator::aggregate(
        TargetMentions {
            name: target_name.to_string(),
            mention_count: target_mention_count,
            positions: target_positions,
        },
        merged,
        total_queries,
        config,
    );

    info!(business = %board.target_business.name, "{stats}");
    Ok(board)
}

/// Repair malformed upstream records before any stage sees them.
/// Positions are 1-based, so a zero target position is coerced to None.
/// Query indices must be unique; later reuses of an index are dropped
/// so one query's mentions cannot overwrite or double-count another's.
fn sanitize_responses(responses: &[QueryResponse]) -> Vec<QueryResponse> {
    let mut seen = HashSet::new();
    responses
        .iter()
        .filter(|r| {
            if seen.insert(r.query_index) {
                true
            } else {
                warn!(query_index = r.query_index, "duplicate query index; dropping response");
                false
            }
        })
        .map(|r| {
            let mut r = r.clone();
            if r.target_position == Some(0) {
                warn!(query_index = r.query_index, "zero target position coerced to unranked");
                r.target_position = None;
            }
            r
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandlens_common::MarketPosition;

    fn response(query_index: u32, text: &str) -> QueryResponse {
        QueryResponse {
            query_index,
            text: text.to_string(),
            was_target_mentioned: false,
            target_position: None,
        }
    }

    fn target_response(query_index: u32, text: &str, position: Option<u32>) -> QueryResponse {
        QueryResponse {
            query_index,
            text: text.to_string(),
            was_target_mentioned: true,
            target_position: position,
        }
    }

    fn input(target: &str, total: u32, responses: Vec<QueryResponse>) -> FingerprintInput {
        FingerprintInput {
            target_business_name: target.to_string(),
            total_queries: total,
            query_responses: responses,
        }
    }

    #[test]
    fn blank_target_name_is_an_input_error() {
        let err = build_leaderboard(&input("  ", 5, Vec::new()), &LeaderboardConfig::default())
            .unwrap_err();
        assert!(matches!(err, BrandLensError::Input(_)));
    }

    #[test]
    fn empty_responses_build_a_degenerate_board() {
        let board =
            build_leaderboard(&input("Alpha Dental", 0, Vec::new()), &LeaderboardConfig::default())
                .unwrap();
        assert_eq!(board.insights.market_position, MarketPosition::Unknown);
        assert_eq!(board.total_queries, 0);
        assert!(board.competitors.is_empty());
    }

    #[test]
    fn target_flag_counts_even_without_text_detection() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                2,
                vec![
                    target_response(0, "They are well reviewed locally.", Some(1)),
                    response(1, "No names here."),
                ],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.target_business.mention_count, 1);
        assert_eq!(board.target_business.mention_rate, 50.0);
        assert_eq!(board.target_business.rank, Some(1));
    }

    #[test]
    fn self_mentions_in_text_do_not_become_competitors() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                1,
                vec![response(0, "1. Alpha Dental\n2. Beta Dental")],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.competitors.len(), 1);
        assert_eq!(board.competitors[0].name, "Beta Dental");
        // Text detection alone marks the query as mentioning the target.
        assert_eq!(board.target_business.mention_count, 1);
    }

    #[test]
    fn unranked_prose_self_mention_counts_toward_rate() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                2,
                vec![response(0, "Alpha Dental is a great choice."), response(1, "Nothing here.")],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.target_business.mention_count, 1);
        assert_eq!(board.target_business.mention_rate, 50.0);
        assert_eq!(board.target_business.rank, None, "prose mention is unranked");
    }

    #[test]
    fn target_surface_variants_match_via_normalization() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental Center",
                1,
                vec![response(0, "1. The Alpha Dental Center LLC\n2. Beta Dental")],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.target_business.mention_count, 1);
        assert_eq!(board.competitors.len(), 1, "self-mention variant must not become a competitor");
    }

    #[test]
    fn prose_fragments_never_reach_the_competitor_list() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                2,
                vec![response(0, "1. Here are some options\n2. I'd recommend this\n3. Beta Dental")],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        let names: Vec<&str> = board.competitors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beta Dental"]);
    }

    #[test]
    fn zero_target_position_is_coerced_to_unranked() {
        let board = build_leaderboard(
            &input("Alpha Dental", 1, vec![target_response(0, "", Some(0))]),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.target_business.mention_count, 1);
        assert_eq!(board.target_business.rank, None, "coerced position leaves target unranked");
    }

    #[test]
    fn response_count_overrides_smaller_declared_total() {
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                1,
                vec![
                    target_response(0, "", Some(1)),
                    target_response(1, "", Some(1)),
                    target_response(2, "", Some(2)),
                ],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.total_queries, 3);
        assert_eq!(board.target_business.mention_rate, 100.0);
    }

    #[test]
    fn duplicate_position_from_flag_and_text_counts_once() {
        let board = build_leaderboard(
            &input("Alpha Dental", 1, vec![target_response(0, "1. Alpha Dental", Some(1))]),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        assert_eq!(board.target_business.mention_count, 1);
        // One query, one slot: the flag's position and the extracted
        // position refer to the same mention.
        assert_eq!(board.target_business.rank, Some(1));
    }

    #[test]
    fn duplicate_query_indices_keep_the_first_response() {
        // Two records claiming index 0: the later one is dropped, so the
        // first response's mention survives and nothing counts twice.
        let board = build_leaderboard(
            &input(
                "Alpha Dental",
                2,
                vec![response(0, "1. Alpha Clinic"), response(0, "1. Beta Clinic")],
            ),
            &LeaderboardConfig::default(),
        )
        .unwrap();
        let names: Vec<&str> = board.competitors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Clinic"]);
        assert_eq!(board.competitors[0].mention_count, 1);
    }

    #[test]
    fn stats_display_reads_as_one_line() {
        let stats = PipelineStats {
            responses_scanned: 3,
            raw_mentions: 7,
            target_queries: 2,
            candidates_rejected: 1,
            unique_candidates: 4,
            competitors: 3,
        };
        let line = stats.to_string();
        assert!(line.contains("3 responses scanned"));
        assert!(line.contains("3 competitors after dedup"));
    }
}
