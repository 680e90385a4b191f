//! Submission-time duplicate detection
//!
//! Text longer than [`MAX_NORMALIZED_TEXT_CHARS`] is refused up front. The
//! remaining checks run in a fixed order and stop at the first failure:
//! 1. exact match on normalized text (hard reject)
//! 2. source already at capacity (hard reject)
//! 3. fuzzy match above the threshold (soft reject, skipped when confirmed)

use crate::db::MAX_NORMALIZED_TEXT_CHARS;
use crate::normalize::normalize_text;
use crate::{Error, Result, ValidationError};

/// Similarity score (0-100) above which a submission is a near-duplicate
pub const DEFAULT_FUZZY_THRESHOLD: u8 = 90;

/// Maximum number of quotes attached to one source
pub const DEFAULT_SOURCE_CAPACITY: i64 = 3;

/// A stored quote as seen by the deduplicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingText {
    pub id: i64,
    pub normalized_text: String,
}

impl ExistingText {
    pub fn new(id: i64, normalized_text: impl Into<String>) -> Self {
        Self {
            id,
            normalized_text: normalized_text.into(),
        }
    }
}

/// Duplicate and capacity checker for quote submissions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deduplicator {
    fuzzy_threshold: u8,
    source_capacity: i64,
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_FUZZY_THRESHOLD, DEFAULT_SOURCE_CAPACITY)
    }
}

impl Deduplicator {
    pub fn new(fuzzy_threshold: u8, source_capacity: i64) -> Self {
        Self {
            fuzzy_threshold,
            source_capacity,
        }
    }

    pub fn fuzzy_threshold(&self) -> u8 {
        self.fuzzy_threshold
    }

    pub fn source_capacity(&self) -> i64 {
        self.source_capacity
    }

    /// Decide whether `new_text` may be stored
    ///
    /// `existing` is the snapshot of stored quotes to compare against and
    /// `source_item_count` the number of quotes the target source already
    /// owns. `confirmed` skips only the fuzzy check.
    ///
    /// Returns the normalized text to persist.
    pub fn check(
        &self,
        new_text: &str,
        existing: &[ExistingText],
        source_item_count: i64,
        confirmed: bool,
    ) -> Result<String> {
        let normalized = normalize_text(new_text);
        if normalized.is_empty() {
            return Err(Error::InvalidInput(
                "quote text is empty after normalization".to_string(),
            ));
        }
        let length = normalized.chars().count();
        if length > MAX_NORMALIZED_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "quote text is {} characters after normalization (limit {})",
                length, MAX_NORMALIZED_TEXT_CHARS
            )));
        }

        if let Some(hit) = existing.iter().find(|e| e.normalized_text == normalized) {
            return Err(ValidationError::ExactDuplicate {
                existing_id: hit.id,
            }
            .into());
        }

        if source_item_count >= self.source_capacity {
            return Err(ValidationError::SourceCapacityExceeded {
                count: source_item_count,
                capacity: self.source_capacity,
            }
            .into());
        }

        if !confirmed {
            if let Some((hit, score)) = self.closest_match(&normalized, existing) {
                return Err(ValidationError::NearDuplicate {
                    existing_id: hit.id,
                    score,
                    matched_text: hit.normalized_text.clone(),
                }
                .into());
            }
        }

        Ok(normalized)
    }

    /// Highest-scoring stored text above the threshold, first one on ties
    fn closest_match<'a>(
        &self,
        normalized: &str,
        existing: &'a [ExistingText],
    ) -> Option<(&'a ExistingText, u8)> {
        let mut best: Option<(&ExistingText, u8)> = None;
        for entry in existing {
            let score = similarity_score(normalized, &entry.normalized_text);
            if score <= self.fuzzy_threshold {
                continue;
            }
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((entry, score)),
            }
        }
        best
    }
}

/// Normalized Levenshtein similarity scaled to 0-100 and rounded
pub fn similarity_score(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Vec<ExistingText> {
        vec![
            ExistingText::new(1, "hello world"),
            ExistingText::new(2, "abcdefghijk"),
            ExistingText::new(3, "may the force be with you"),
        ]
    }

    #[test]
    fn test_similarity_score_bounds() {
        assert_eq!(similarity_score("same", "same"), 100);
        assert_eq!(similarity_score("abc", "xyz"), 0);
        // one substitution in ten characters
        assert_eq!(similarity_score("abcdefghij", "abcdefghix"), 90);
        // one substitution in eleven characters
        assert_eq!(similarity_score("abcdefghijk", "abcdefghijx"), 91);
    }

    #[test]
    fn test_accepts_new_text_and_returns_normalized() {
        let dedup = Deduplicator::default();
        let result = dedup.check("Completely  NEW quote!", &stored(), 0, false);
        assert_eq!(result.unwrap(), "completely new quote");
    }

    #[test]
    fn test_length_limit_applies_to_normalized_text() {
        let dedup = Deduplicator::default();

        let at_limit = "a".repeat(MAX_NORMALIZED_TEXT_CHARS);
        assert!(dedup.check(&at_limit, &stored(), 0, false).is_ok());

        // Punctuation does not count toward the limit
        let padded = format!("«{}»!!!", at_limit);
        assert!(dedup.check(&padded, &stored(), 0, false).is_ok());

        let over = "a".repeat(MAX_NORMALIZED_TEXT_CHARS + 1);
        assert!(matches!(
            dedup.check(&over, &stored(), 0, true),
            Err(Error::InvalidInput(_))
        ));

        // Counted in characters, not bytes
        let cyrillic = "я".repeat(MAX_NORMALIZED_TEXT_CHARS);
        assert!(dedup.check(&cyrillic, &stored(), 0, false).is_ok());
    }

    #[test]
    fn test_exact_duplicate_after_normalization() {
        let dedup = Deduplicator::default();
        let err = dedup.check("Hello,  World!", &stored(), 0, false).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ExactDuplicate { existing_id: 1 })
        ));
    }

    #[test]
    fn test_exact_duplicate_not_bypassed_by_confirmation() {
        let dedup = Deduplicator::default();
        let err = dedup.check("hello world", &stored(), 0, true).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ExactDuplicate { existing_id: 1 })
        ));
    }

    #[test]
    fn test_exact_duplicate_reported_before_capacity() {
        let dedup = Deduplicator::default();
        let err = dedup.check("hello world", &stored(), 3, true).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::ExactDuplicate { .. })
        ));
    }

    #[test]
    fn test_capacity_exceeded_regardless_of_confirmation() {
        let dedup = Deduplicator::default();
        for confirmed in [false, true] {
            let err = dedup.check("a brand new line", &stored(), 3, confirmed).unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::SourceCapacityExceeded {
                    count: 3,
                    capacity: 3
                })
            ));
        }
    }

    #[test]
    fn test_third_quote_for_source_still_allowed() {
        let dedup = Deduplicator::default();
        assert!(dedup.check("a brand new line", &stored(), 2, false).is_ok());
    }

    #[test]
    fn test_near_duplicate_requires_confirmation() {
        let dedup = Deduplicator::default();
        let err = dedup.check("abcdefghijx", &stored(), 0, false).unwrap_err();
        match err {
            Error::Validation(ValidationError::NearDuplicate {
                existing_id,
                score,
                matched_text,
            }) => {
                assert_eq!(existing_id, 2);
                assert_eq!(score, 91);
                assert_eq!(matched_text, "abcdefghijk");
            }
            other => panic!("expected near duplicate, got {:?}", other),
        }

        assert_eq!(
            dedup.check("abcdefghijx", &stored(), 0, true).unwrap(),
            "abcdefghijx"
        );
    }

    #[test]
    fn test_score_at_threshold_is_not_near_duplicate() {
        let dedup = Deduplicator::default();
        let existing = vec![ExistingText::new(9, "abcdefghij")];
        assert!(dedup.check("abcdefghix", &existing, 0, false).is_ok());
    }

    #[test]
    fn test_near_duplicate_reports_best_match() {
        let dedup = Deduplicator::new(80, 3);
        let existing = vec![
            ExistingText::new(1, "abcdefghxx"),
            ExistingText::new(2, "abcdefghix"),
        ];
        let err = dedup.check("abcdefghij", &existing, 0, false).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NearDuplicate {
                existing_id: 2,
                score: 90,
                ..
            })
        ));
    }

    #[test]
    fn test_empty_text_is_invalid_input() {
        let dedup = Deduplicator::default();
        assert!(matches!(
            dedup.check(" «» ", &stored(), 0, true),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_only_near_duplicate_is_recoverable() {
        assert!(ValidationError::NearDuplicate {
            existing_id: 1,
            score: 95,
            matched_text: String::new()
        }
        .is_recoverable());
        assert!(!ValidationError::ExactDuplicate { existing_id: 1 }.is_recoverable());
        assert!(!ValidationError::SourceCapacityExceeded { count: 3, capacity: 3 }.is_recoverable());
        assert!(!ValidationError::WeightOutOfRange { weight: 11, min: 1, max: 10 }.is_recoverable());
    }
}
