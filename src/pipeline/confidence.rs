//! Hedge-phrase confidence estimation over model responses.
//!
//! Vision endpoints return prose, not calibrated confidence. Scanning the
//! prose for hedging ("might be", "unclear") gives a cheap, explainable
//! proxy: every occurrence costs five percentage points off a perfect
//! score. The phrase list is configuration, swappable without touching
//! the scoring.

use regex::{Regex, RegexBuilder};
use tracing::debug;

use super::types::{ConfidenceAssessment, ConfidenceScorer, PhraseMatch};

/// Score each hedge occurrence subtracts.
pub const HEDGE_PENALTY: f32 = 0.05;

/// Confidence cut points used by the pipeline and the review UI.
pub mod thresholds {
    /// Below this the UI lists the matched phrases and prompts the user
    /// to reconsider image clarity.
    pub const REVIEW: f32 = 0.70;
}

/// Hedging expressions scanned for, in reporting order.
pub const DEFAULT_HEDGE_PHRASES: &[&str] = &[
    "unclear",
    "cannot determine",
    "difficult to see",
    "not visible",
    "illegible",
    "hard to read",
    "cannot make out",
    "not clear",
    "i'm unsure",
    "might be",
    "possibly",
    "appears to be",
    "could be",
    "uncertain",
    "ambiguous",
];

/// An ordered table of hedge phrases with their compiled matchers.
pub struct HedgeLexicon {
    patterns: Vec<HedgePattern>,
}

struct HedgePattern {
    phrase: String,
    regex: Regex,
}

impl HedgeLexicon {
    /// Build a lexicon from literal phrases. Matching is case-insensitive
    /// substring matching; phrases are escaped, never interpreted as
    /// pattern syntax.
    pub fn from_phrases<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Self {
        let patterns = phrases
            .into_iter()
            .map(|phrase| HedgePattern {
                phrase: phrase.to_string(),
                regex: RegexBuilder::new(&regex::escape(phrase))
                    .case_insensitive(true)
                    .build()
                    .expect("escaped literal is a valid pattern"),
            })
            .collect();
        Self { patterns }
    }

    /// Phrases in reporting order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.phrase.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for HedgeLexicon {
    fn default() -> Self {
        Self::from_phrases(DEFAULT_HEDGE_PHRASES.iter().copied())
    }
}

/// Production scorer over a [`HedgeLexicon`].
pub struct HedgeConfidenceScorer {
    lexicon: HedgeLexicon,
}

impl HedgeConfidenceScorer {
    pub fn new() -> Self {
        Self {
            lexicon: HedgeLexicon::default(),
        }
    }

    pub fn with_lexicon(lexicon: HedgeLexicon) -> Self {
        Self { lexicon }
    }
}

impl Default for HedgeConfidenceScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfidenceScorer for HedgeConfidenceScorer {
    /// Count non-overlapping case-insensitive occurrences of every phrase
    /// and derive the bounded score.
    ///
    /// An empty or whitespace-only response contains no hedges and scores
    /// 1.0. That is documented behavior, not a gap: callers reject empty
    /// responses as an upstream error before scoring sees them.
    fn score(&self, response_text: &str) -> ConfidenceAssessment {
        let mut matched_phrases = Vec::new();
        let mut uncertainty_count = 0usize;

        for pattern in &self.lexicon.patterns {
            let count = pattern.regex.find_iter(response_text).count();
            if count > 0 {
                uncertainty_count += count;
                matched_phrases.push(PhraseMatch {
                    phrase: pattern.phrase.clone(),
                    count,
                });
            }
        }

        let score = (1.0 - uncertainty_count as f32 * HEDGE_PENALTY).clamp(0.0, 1.0);

        debug!(
            hedges = uncertainty_count,
            distinct = matched_phrases.len(),
            score,
            "Scored model response"
        );

        ConfidenceAssessment {
            score,
            matched_phrases,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_text(text: &str) -> ConfidenceAssessment {
        HedgeConfidenceScorer::new().score(text)
    }

    #[test]
    fn hedged_report_reading_scores_085() {
        let assessment =
            score_text("The result is unclear and might be a fracture, possibly in the wrist");

        assert!((assessment.score - 0.85).abs() < 1e-6);
        assert_eq!(assessment.matched_phrases.len(), 3);
        for matched in &assessment.matched_phrases {
            assert_eq!(matched.count, 1);
        }
    }

    #[test]
    fn matches_are_reported_in_lexicon_order() {
        // Input order is reversed relative to the lexicon.
        let assessment = score_text("possibly... might be... unclear");
        let phrases: Vec<&str> = assessment
            .matched_phrases
            .iter()
            .map(|m| m.phrase.as_str())
            .collect();
        assert_eq!(phrases, vec!["unclear", "might be", "possibly"]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let assessment = score_text("UNCLEAR. Might Be. pOsSiBlY.");
        assert!((assessment.score - 0.85).abs() < 1e-6);
    }

    #[test]
    fn repeated_phrase_counts_every_occurrence() {
        let assessment = score_text("unclear unclear unclear");
        assert_eq!(assessment.matched_phrases.len(), 1);
        assert_eq!(assessment.matched_phrases[0].count, 3);
        assert!((assessment.score - 0.85).abs() < 1e-6);
    }

    #[test]
    fn each_insertion_costs_exactly_the_penalty_until_the_floor() {
        for n in 0..=25usize {
            let text = "might be ".repeat(n);
            let assessment = score_text(&text);
            let expected = (1.0 - n as f32 * HEDGE_PENALTY).clamp(0.0, 1.0);
            assert!(
                (assessment.score - expected).abs() < 1e-6,
                "n={n}: got {}, expected {expected}",
                assessment.score
            );
        }
    }

    #[test]
    fn twenty_or_more_hedges_floor_at_zero() {
        let text = "uncertain ".repeat(24);
        let assessment = score_text(&text);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.score >= 0.0);
    }

    #[test]
    fn confident_text_scores_one() {
        let assessment =
            score_text("The report shows hemoglobin at 13.2 g/dL, within the reference range.");
        assert_eq!(assessment.score, 1.0);
        assert!(assessment.matched_phrases.is_empty());
        assert!(!assessment.needs_review());
    }

    #[test]
    fn empty_text_scores_one_with_no_matches() {
        let assessment = score_text("");
        assert_eq!(assessment.score, 1.0);
        assert!(assessment.matched_phrases.is_empty());
    }

    #[test]
    fn heavy_hedging_needs_review() {
        let assessment = score_text(
            "It might be pneumonia, could be an artifact, possibly fluid; \
             the left lower field is unclear and parts are illegible, \
             hard to read, and the impression line is not visible.",
        );
        assert!(assessment.score < thresholds::REVIEW);
        assert!(assessment.needs_review());
    }

    #[test]
    fn custom_lexicon_replaces_the_default() {
        let scorer =
            HedgeConfidenceScorer::with_lexicon(HedgeLexicon::from_phrases(["maybe", "perhaps"]));
        let assessment = scorer.score("Maybe a cyst, perhaps benign, but unclear.");

        // "unclear" is not in the custom lexicon.
        assert!((assessment.score - 0.90).abs() < 1e-6);
        let phrases: Vec<&str> = assessment
            .matched_phrases
            .iter()
            .map(|m| m.phrase.as_str())
            .collect();
        assert_eq!(phrases, vec!["maybe", "perhaps"]);
    }

    #[test]
    fn default_lexicon_keeps_declared_order() {
        let lexicon = HedgeLexicon::default();
        assert_eq!(lexicon.len(), DEFAULT_HEDGE_PHRASES.len());
        let phrases: Vec<&str> = lexicon.phrases().collect();
        assert_eq!(phrases, DEFAULT_HEDGE_PHRASES);
    }

    #[test]
    fn regex_metacharacters_in_phrases_are_literal() {
        let scorer = HedgeConfidenceScorer::with_lexicon(HedgeLexicon::from_phrases(["(?)"]));
        let assessment = scorer.score("A literal (?) marker.");
        assert_eq!(assessment.matched_phrases.len(), 1);
    }
}
