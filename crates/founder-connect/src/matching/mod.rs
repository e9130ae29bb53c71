//! Free-text matching over skill names and other short candidate strings.

mod vocabulary;

pub use vocabulary::{default_vocabulary, SkillVocabulary, VocabularyError};

use std::cmp::Ordering;

/// How a candidate satisfied the query, ordered from strongest to weakest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Prefix,
    Contains,
    Acronym,
}

/// Initials of each whitespace-delimited word, lowercased: `"Machine Learning"` -> `"ml"`.
pub fn acronym(candidate: &str) -> String {
    candidate
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Classifies `candidate` against an already lowercased, non-empty query.
pub fn classify(needle: &str, candidate: &str) -> Option<MatchKind> {
    let haystack = candidate.to_lowercase();
    if haystack == needle {
        Some(MatchKind::Exact)
    } else if haystack.starts_with(needle) {
        Some(MatchKind::Prefix)
    } else if haystack.contains(needle) {
        Some(MatchKind::Contains)
    } else if acronym(candidate).contains(needle) {
        Some(MatchKind::Acronym)
    } else {
        None
    }
}

/// Filters and ranks `candidates` for `query`.
///
/// Exact matches sort first, then prefix matches, then everything else alphabetically. A blank
/// query returns every candidate in its original order.
pub fn rank_matches<I, S>(query: &str, candidates: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return candidates
            .into_iter()
            .map(|candidate| candidate.as_ref().to_string())
            .collect();
    }

    let mut matched: Vec<(Tier, String)> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            classify(&needle, candidate).map(|kind| (Tier::from(kind), candidate.to_string()))
        })
        .collect();

    matched.sort_by(|(left_tier, left), (right_tier, right)| {
        left_tier
            .cmp(right_tier)
            .then_with(|| alphabetical(left, right))
    });

    matched.into_iter().map(|(_, candidate)| candidate).collect()
}

/// Substring and acronym hits share a tier and fall back to alphabetical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Exact,
    Prefix,
    Other,
}

impl From<MatchKind> for Tier {
    fn from(kind: MatchKind) -> Self {
        match kind {
            MatchKind::Exact => Tier::Exact,
            MatchKind::Prefix => Tier::Prefix,
            MatchKind::Contains | MatchKind::Acronym => Tier::Other,
        }
    }
}

fn alphabetical(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_then_prefix_then_substring() {
        let ranked = rank_matches("react", ["Preact", "Reactive Forms", "React"]);
        assert_eq!(ranked, vec!["React", "Reactive Forms", "Preact"]);
    }

    #[test]
    fn blank_query_returns_candidates_untouched() {
        let candidates = ["Rust", "Go", "Python"];
        assert_eq!(rank_matches("", candidates), vec!["Rust", "Go", "Python"]);
        assert_eq!(rank_matches("   ", candidates), vec!["Rust", "Go", "Python"]);
    }

    #[test]
    fn acronym_matches_multi_word_skills() {
        let ranked = rank_matches(
            "ml",
            ["Machine Learning", "Marketing", "HTML", "Product Management"],
        );
        assert_eq!(ranked, vec!["HTML", "Machine Learning"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("sql", "PostgreSQL"), Some(MatchKind::Contains));
        assert_eq!(classify("ux", "UX Research"), Some(MatchKind::Prefix));
        assert_eq!(classify("figma", "Figma"), Some(MatchKind::Exact));
        assert_eq!(classify("go", "Rust"), None);
    }

    #[test]
    fn ties_fall_back_to_alphabetical_order() {
        let ranked = rank_matches("script", ["TypeScript", "JavaScript", "AppleScript"]);
        assert_eq!(ranked, vec!["AppleScript", "JavaScript", "TypeScript"]);
    }

    #[test]
    fn single_candidate_exact_match_is_returned() {
        assert_eq!(rank_matches("Rust", ["Rust"]), vec!["Rust"]);
    }
}
