//! Deduplicator — merges candidate competitors that denote the same
//! real-world business under different surface forms.
//!
//! Grouping runs on a deterministic, locale-independent normalized key;
//! the first-seen raw surface form of each group is kept as the display
//! name. `&` vs "and", diacritics, and abbreviation variants ("St." vs
//! "Saint") are deliberately not equated.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use brandlens_common::CandidateCompetitor;

/// Articles stripped from the front of a name during normalization.
const LEADING_ARTICLES: &[&str] = &["the", "a", "an"];

/// Legal-entity suffixes stripped from the end of a name.
const LEGAL_SUFFIXES: &[&str] = &[
    "llc",
    "inc",
    "corp",
    "ltd",
    "co",
    "limited",
    "company",
    "corporation",
];

/// Normalize a business name for dedup comparison: lowercase, strip one
/// leading article, strip one trailing legal suffix (with any attached
/// comma/period), collapse whitespace, trim.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();

    // Never strip a token down to an empty name.
    if tokens.len() > 1 && LEADING_ARTICLES.contains(&tokens[0]) {
        tokens.remove(0);
    }

    if tokens.len() > 1 {
        let last = tokens[tokens.len() - 1].trim_end_matches('.');
        if LEGAL_SUFFIXES.contains(&last) {
            tokens.pop();
        }
    }

    tokens
        .join(" ")
        .trim_end_matches(&[',', '.'][..])
        .trim()
        .to_string()
}

/// Merge candidates whose names normalize identically. Mention counts
/// are summed, position lists concatenated, and the first-seen surface
/// form becomes the canonical name. Output order is first-seen order.
pub fn merge_candidates(candidates: Vec<CandidateCompetitor>) -> Vec<CandidateCompetitor> {
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, CandidateCompetitor> = HashMap::new();

    for cand in candidates {
        let key = normalize_name(&cand.name);
        match groups.entry(key) {
            Entry::Occupied(mut e) => {
                let merged = e.get_mut();
                merged.mention_count += cand.mention_count;
                merged.positions.extend(cand.positions);
            }
            Entry::Vacant(e) => {
                order.push(e.key().clone());
                e.insert(cand);
            }
        }
    }

    order.into_iter().filter_map(|k| groups.remove(&k)).collect()
}
