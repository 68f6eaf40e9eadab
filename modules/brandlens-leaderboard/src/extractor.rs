//! Mention Extractor — pulls name-like phrases out of raw LLM answer
//! texts.
//!
//! Two mention contexts are recognized: recommendation-list items
//! (numbered or bulleted lines, which carry a 1-based list position)
//! and prose recommendation patterns ("X is a great choice", "I'd
//! recommend X"), which are unranked. Extraction is deliberately
//! naive about what counts as a name; downstream validation rejects
//! the prose fragments this lets through.

use std::collections::BTreeMap;

use brandlens_common::{QueryResponse, RawMention};
use regex::Regex;

pub struct MentionExtractor {
    numbered_item: Regex,
    bulleted_item: Regex,
    praise: Regex,
    recommend: Regex,
}

impl MentionExtractor {
    pub fn new() -> Self {
        // Capitalized word run, with common name connectives allowed
        // mid-run ("Smith and Co", "Bank of America").
        let name = r"[A-Z][\w&'.-]*(?:\s+(?:[A-Z0-9&][\w&'.-]*|and|of|the))*";
        Self {
            numbered_item: Regex::new(r"^\s*(\d+)[.)]\s+(.+)$").expect("valid regex"),
            bulleted_item: Regex::new(r"^\s*[-*\u{2022}]\s+(.+)$").expect("valid regex"),
            praise: Regex::new(&format!(
                r"\b({name})\s+is\s+(?:an?\s+)?(?:great|excellent|good|solid|top|popular)\s+(?:choice|option|pick)\b"
            ))
            .expect("valid regex"),
            recommend: Regex::new(&format!(r"\b(?:recommend|consider|try)\s+({name})"))
                .expect("valid regex"),
        }
    }

    /// Extract every mention from every response, keyed by query index.
    /// Empty or malformed text produces an empty mention list for that
    /// query, never an error.
    pub fn extract(&self, responses: &[QueryResponse]) -> BTreeMap<u32, Vec<RawMention>> {
        let mut by_query: BTreeMap<u32, Vec<RawMention>> = BTreeMap::new();
        for response in responses {
            by_query.insert(response.query_index, self.extract_one(response));
        }
        by_query
    }

    fn extract_one(&self, response: &QueryResponse) -> Vec<RawMention> {
        let mut mentions = Vec::new();
        let mut list_position: u32 = 0;

        for line in response.text.lines() {
            // Numbered items carry their printed rank; bullets take the
            // next slot after whatever came before them.
            let (item, position) = if let Some(caps) = self.numbered_item.captures(line) {
                let printed = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
                (caps.get(2), printed.unwrap_or(list_position + 1))
            } else if let Some(caps) = self.bulleted_item.captures(line) {
                (caps.get(1), list_position + 1)
            } else {
                continue;
            };
            let Some(item) = item else { continue };

            list_position = position;
            if let Some(candidate) = clean_item_candidate(item.as_str()) {
                mentions.push(RawMention {
                    source_query_index: response.query_index,
                    text: candidate,
                    position_in_list: Some(position),
                });
            }
        }

        for re in [&self.praise, &self.recommend] {
            for caps in re.captures_iter(&response.text) {
                if let Some(m) = caps.get(1) {
                    let text = trim_name_edges(m.as_str());
                    if !text.is_empty() {
                        mentions.push(RawMention {
                            source_query_index: response.query_index,
                            text,
                            position_in_list: None,
                        });
                    }
                }
            }
        }

        mentions
    }
}

impl Default for MentionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn a raw list-item body into a name candidate: strip markdown
/// bold, cut at the first delimiter, trim stray punctuation. Returns
/// None when nothing name-like remains.
fn clean_item_candidate(item: &str) -> Option<String> {
    let stripped = item.replace("**", "");
    let mut head = stripped.as_str();
    for delim in [":", " - ", " \u{2013} ", " \u{2014} ", ",", "("] {
        if let Some(idx) = head.find(delim) {
            head = &head[..idx];
        }
    }
    let candidate = trim_name_edges(head);
    (!candidate.is_empty()).then_some(candidate)
}

/// Trim whitespace and sentence punctuation from a candidate's edges,
/// plus any trailing connective left behind by the capitalized-run
/// pattern ("Alpha Dental and" -> "Alpha Dental").
fn trim_name_edges(raw: &str) -> String {
    let mut s = raw.trim().trim_end_matches(&['.', '!', ';', ','][..]).trim_end();
    for connective in [" and", " of", " the"] {
        if let Some(rest) = s.strip_suffix(connective) {
            s = rest.trim_end();
        }
    }
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(query_index: u32, text: &str) -> QueryResponse {
        QueryResponse {
            query_index,
            text: text.to_string(),
            was_target_mentioned: false,
            target_position: None,
        }
    }

    fn texts(mentions: &[RawMention]) -> Vec<&str> {
        mentions.iter().map(|m| m.text.as_str()).collect()
    }

    #[test]
    fn extracts_numbered_list_items_with_positions() {
        let ex = MentionExtractor::new();
        let r = response(0, "Here are some options:\n1. Alpha Dental Center - downtown\n2. Beta Dental: open late\n3. Gamma Smiles (new)");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Alpha Dental Center", "Beta Dental", "Gamma Smiles"]);
        assert_eq!(
            mentions.iter().map(|m| m.position_in_list).collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(3)]
        );
    }

    #[test]
    fn extracts_bulleted_items() {
        let ex = MentionExtractor::new();
        let r = response(2, "- Alpha Dental Center\n* Beta Dental\n\u{2022} Gamma Smiles");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Alpha Dental Center", "Beta Dental", "Gamma Smiles"]);
        assert_eq!(mentions[2].position_in_list, Some(3));
        assert_eq!(mentions[0].source_query_index, 2);
    }

    #[test]
    fn strips_markdown_bold_from_items() {
        let ex = MentionExtractor::new();
        let r = response(0, "1. **Alpha Dental Center** - great reviews");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Alpha Dental Center"]);
    }

    #[test]
    fn extracts_praise_pattern_unranked() {
        let ex = MentionExtractor::new();
        let r = response(0, "Alpha Dental Center is a great choice for families.");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Alpha Dental Center"]);
        assert_eq!(mentions[0].position_in_list, None);
    }

    #[test]
    fn extracts_recommend_pattern() {
        let ex = MentionExtractor::new();
        let r = response(0, "I would recommend Beta Dental for checkups.");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Beta Dental"]);
    }

    #[test]
    fn recommend_followed_by_lowercase_yields_nothing() {
        let ex = MentionExtractor::new();
        let r = response(0, "I would recommend visiting their website first.");
        assert!(ex.extract_one(&r).is_empty());
    }

    #[test]
    fn connective_names_survive_the_capitalized_run() {
        let ex = MentionExtractor::new();
        let r = response(0, "Smith and Co is a great choice around here.");
        let mentions = ex.extract_one(&r);
        assert_eq!(texts(&mentions), vec!["Smith and Co"]);
    }

    #[test]
    fn empty_text_yields_empty_mentions() {
        let ex = MentionExtractor::new();
        assert!(ex.extract_one(&response(0, "")).is_empty());
    }

    #[test]
    fn prose_without_patterns_yields_nothing() {
        let ex = MentionExtractor::new();
        let r = response(0, "Dental care matters. Brush twice a day and floss.");
        assert!(ex.extract_one(&r).is_empty());
    }

    #[test]
    fn numbered_items_use_their_printed_rank() {
        let ex = MentionExtractor::new();
        // A response quoting only part of a list still reports the
        // position the model actually assigned.
        let r = response(0, "3. Alpha Dental Center");
        let mentions = ex.extract_one(&r);
        assert_eq!(mentions[0].position_in_list, Some(3));
    }

    #[test]
    fn list_positions_count_across_numbering_styles() {
        let ex = MentionExtractor::new();
        let r = response(0, "1) Alpha Dental\n- Beta Dental");
        let mentions = ex.extract_one(&r);
        assert_eq!(mentions[0].position_in_list, Some(1));
        assert_eq!(mentions[1].position_in_list, Some(2));
    }

    #[test]
    fn extract_maps_every_response_even_empty_ones() {
        let ex = MentionExtractor::new();
        let responses = vec![response(0, "1. Alpha Dental"), response(1, "")];
        let by_query = ex.extract(&responses);
        assert_eq!(by_query.len(), 2);
        assert_eq!(by_query[&0].len(), 1);
        assert!(by_query[&1].is_empty());
    }

    #[test]
    fn multiple_mentions_of_same_name_are_all_kept() {
        let ex = MentionExtractor::new();
        let r = response(0, "1. Alpha Dental\nAlpha Dental is a great choice overall.");
        let mentions = ex.extract_one(&r);
        assert_eq!(mentions.len(), 2, "list and prose mentions are both retained");
    }
}
