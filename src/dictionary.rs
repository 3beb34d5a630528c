//! Component B's data model: the assembled 256-slot codebook.
//!
//! A `Dictionary` binds tokens to byte indices in the stable, reproducible
//! layout from spec §4.B: single-character tokens occupy the slot equal to
//! their ASCII code, and multichar tokens fill the remaining slots in
//! insertion order.

use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SmizipError;

/// Hard cap on codebook size: byte-indexed, so 256 is the only valid size
/// for a *runnable* codec, though a partially-filled dictionary (fewer than
/// 256 tokens) is a valid intermediate value while the learner is growing one.
pub const MAX_DICTIONARY_SIZE: usize = 256;

/// Out-of-band metadata describing how a dictionary was produced.
///
/// Consumers may read only `ngrams` from the JSON file (spec §6); this
/// struct exists so producers (the learner, the CLI) can record and
/// round-trip the parameters that produced a given codebook.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DictionaryMetadata {
    /// Sorted single-char tokens, as a string.
    pub initial_chars: String,
    /// User-provided seed multigrams, CSV format, if any.
    pub initial_multigrams: Option<String>,
    /// Sample size at the first learner iteration.
    pub num_smiles_to_test: usize,
    /// Per-multichar growth in sample size.
    pub delta_to_test: f64,
    /// Minimum number of candidates examined per iteration.
    pub test_at_least_n: usize,
    /// Minimum number of *measured* candidates examined per iteration.
    pub test_at_least_n_measured: usize,
    /// Deep-pass candidate floor, applied every `sometimes_interval` iterations.
    pub test_at_least_n_sometimes: usize,
    /// How often (in iterations) the deep pass fires.
    pub sometimes_interval: usize,
    /// Name of the training corpus file, for provenance only.
    pub filename: String,
}

/// The complete 256-entry compression dictionary.
///
/// Position in the codebook *is* the emitted byte value (spec §3). Built
/// either by [`Dictionary::assemble`] (from a learner's `singlechars` +
/// `multichars`) or by [`Dictionary::from_ngrams`] (loading the external
/// JSON format's flat `ngrams` array directly).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dictionary {
    /// The 256-entry codebook; `ngrams[i]` is the token for byte value `i`,
    /// or the empty string for a slot left unused by a partial dictionary.
    ngrams: Vec<String>,

    /// Informational provenance, not required for round-tripping.
    pub metadata: Option<DictionaryMetadata>,

    #[serde(skip)]
    index_of: AHashMap<String, u8>,
}

impl Dictionary {
    /// Assemble a dictionary from a set of single-character tokens and an
    /// ordered list of multichar tokens (spec §4.B Assembly).
    ///
    /// `singlechars.len() + multichars.len()` must be `<= 256`.
    pub fn assemble(
        singlechars: &BTreeSet<char>,
        multichars: &[String],
        metadata: Option<DictionaryMetadata>,
    ) -> Result<Self, SmizipError> {
        let total = singlechars.len() + multichars.len();
        if total > MAX_DICTIONARY_SIZE {
            return Err(SmizipError::DictionaryTooLarge(total));
        }

        let mut slots: Vec<Option<String>> = vec![None; MAX_DICTIONARY_SIZE];
        for &c in singlechars {
            let idx = c as usize;
            if idx >= MAX_DICTIONARY_SIZE {
                return Err(SmizipError::MalformedDictionary(format!(
                    "single-char token {c:?} is outside the ASCII byte range"
                )));
            }
            if slots[idx].is_some() {
                return Err(SmizipError::MalformedDictionary(format!(
                    "duplicate single-char token {c:?}"
                )));
            }
            slots[idx] = Some(c.to_string());
        }

        let mut cursor = 0usize;
        for multichar in multichars {
            while slots[cursor].is_some() {
                cursor += 1;
            }
            slots[cursor] = Some(multichar.clone());
        }

        Self::from_slots(slots, metadata)
    }

    /// Build a dictionary directly from the external JSON format's flat
    /// `ngrams` array, where position already *is* the byte index.
    ///
    /// Rejects anything that is not exactly 256 entries, that contains
    /// duplicate non-empty tokens, or that contains an empty entry (spec §7
    /// `MalformedDictionary`): unlike [`Dictionary::assemble`], a frozen
    /// 256-slot load has no legitimate "not yet filled" state.
    pub fn from_ngrams(ngrams: Vec<String>) -> Result<Self, SmizipError> {
        if ngrams.len() != MAX_DICTIONARY_SIZE {
            return Err(SmizipError::MalformedDictionary(format!(
                "expected exactly {MAX_DICTIONARY_SIZE} ngrams, got {}",
                ngrams.len()
            )));
        }
        if let Some(idx) = ngrams.iter().position(|t| t.is_empty()) {
            return Err(SmizipError::MalformedDictionary(format!(
                "ngram at index {idx} is empty"
            )));
        }
        let slots = ngrams.into_iter().map(Some).collect();
        Self::from_slots(slots, None)
    }

    fn from_slots(
        slots: Vec<Option<String>>,
        metadata: Option<DictionaryMetadata>,
    ) -> Result<Self, SmizipError> {
        let mut index_of = AHashMap::default();
        let mut ngrams = Vec::with_capacity(MAX_DICTIONARY_SIZE);
        for (idx, slot) in slots.into_iter().enumerate() {
            let token = slot.unwrap_or_default();
            if !token.is_empty() && index_of.insert(token.clone(), idx as u8).is_some() {
                return Err(SmizipError::MalformedDictionary(format!(
                    "duplicate token {token:?}"
                )));
            }
            ngrams.push(token);
        }
        Ok(Self {
            ngrams,
            metadata,
            index_of,
        })
    }

    /// The token bound to byte value `b`.
    pub fn token_at(&self, b: u8) -> &str {
        &self.ngrams[b as usize]
    }

    /// The byte value bound to `token`, if present.
    pub fn index_of(&self, token: &str) -> Option<u8> {
        self.index_of.get(token).copied()
    }

    /// `true` if `c` is a singlechar token in this dictionary.
    pub fn has_char(&self, c: char) -> bool {
        self.index_of.contains_key(c.to_string().as_str())
    }

    /// All multichar tokens (length >= 2), in codebook order.
    pub fn multichars(&self) -> Vec<String> {
        self.ngrams
            .iter()
            .filter(|t| t.chars().count() >= 2)
            .cloned()
            .collect()
    }

    /// Number of non-empty slots currently filled.
    pub fn len(&self) -> usize {
        self.ngrams.iter().filter(|t| !t.is_empty()).count()
    }

    /// `true` if no slots are filled.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The full 256-entry codebook, in byte-index order.
    pub fn ngrams(&self) -> &[String] {
        &self.ngrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn singles(chars: &str) -> BTreeSet<char> {
        chars.chars().collect()
    }

    #[test]
    fn singles_land_at_ascii_positions() {
        let dict = Dictionary::assemble(&singles("AB"), &[], None).unwrap();
        assert_eq!(dict.token_at(b'A'), "A");
        assert_eq!(dict.token_at(b'B'), "B");
        assert_eq!(dict.index_of("A"), Some(b'A'));
    }

    #[test]
    fn multichars_fill_remaining_slots_in_order() {
        let dict = Dictionary::assemble(
            &singles("AB"),
            &["AB".to_string(), "BA".to_string()],
            None,
        )
        .unwrap();
        // Slots 0 and 1 are taken by control-char placeholders? No -- 'A' is
        // ord 65, 'B' is ord 66, so slots 0.. are free for multichars.
        assert_eq!(dict.token_at(0), "AB");
        assert_eq!(dict.token_at(1), "BA");
    }

    #[test]
    fn bijection_holds_for_a_full_codebook() {
        let mut ngrams: Vec<String> = (0u32..256).map(|i| format!("t{i}")).collect();
        ngrams[65] = "A".to_string();
        // Ensure uniqueness after the overwrite above.
        ngrams[0] = "t256".to_string();
        let dict = Dictionary::from_ngrams(ngrams.clone()).unwrap();
        for (i, token) in ngrams.iter().enumerate() {
            assert_eq!(dict.index_of(token), Some(i as u8));
            assert_eq!(dict.token_at(i as u8), token);
        }
    }

    #[test]
    fn rejects_too_many_tokens() {
        let singlechars: BTreeSet<char> = ('a'..='z').collect(); // 26 singles
        let many_multi: Vec<String> = (0..260).map(|i| format!("m{i}")).collect();
        let err = Dictionary::assemble(&singlechars, &many_multi, None).unwrap_err();
        assert_eq!(err, SmizipError::DictionaryTooLarge(286));
    }

    #[test]
    fn rejects_non_256_ngrams() {
        let err = Dictionary::from_ngrams(vec!["a".to_string()]).unwrap_err();
        assert!(matches!(err, SmizipError::MalformedDictionary(_)));
    }

    #[test]
    fn rejects_duplicate_tokens() {
        let mut ngrams: Vec<String> = (0u32..256).map(|i| format!("t{i}")).collect();
        ngrams[0] = "dup".to_string();
        ngrams[1] = "dup".to_string();
        let err = Dictionary::from_ngrams(ngrams).unwrap_err();
        assert!(matches!(err, SmizipError::MalformedDictionary(_)));
    }

    #[test]
    fn rejects_empty_token_entries() {
        let mut ngrams: Vec<String> = (0u32..256).map(|i| format!("t{i}")).collect();
        ngrams[3] = String::new();
        let err = Dictionary::from_ngrams(ngrams).unwrap_err();
        assert!(matches!(err, SmizipError::MalformedDictionary(_)));
    }

    #[test]
    fn json_round_trip_preserves_ngrams() {
        let mut ngrams: Vec<String> = (0u32..256).map(|i| format!("t{i}")).collect();
        ngrams[65] = "A".to_string();
        ngrams[0] = "cc".to_string();
        let dict = Dictionary::from_ngrams(ngrams.clone()).unwrap();
        let json = serde_json::to_string(&dict).unwrap();
        let back: Dictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ngrams(), ngrams.as_slice());
    }
}
