//! Candidate n-gram enumeration and the value/count cache the learner ranks
//! candidates with (spec §3 "N-gram Value Table" / "N-gram Count Table",
//! §4.C steps 3-4).

use ahash::{AHashMap, AHashSet};

/// Longest substring considered as a candidate multigram.
pub const MAX_NGRAM_LEN: usize = 60;

/// Enumerate every substring of length `2..=max_ngram_len` across `sample`,
/// returning counts filtered to ngrams that appear in at least 2 distinct
/// sample strings (spec §4.C step 3).
///
/// `max_ngram_len` is normally [`MAX_NGRAM_LEN`] (via
/// [`crate::config::LearnerConfig::default`]); exposed as a parameter so a
/// caller can narrow the search space without recompiling.
pub fn calculate_ngrams(sample: &[String], max_ngram_len: usize) -> AHashMap<String, usize> {
    let mut counts: AHashMap<String, usize> = AHashMap::default();
    let mut molecule_counts: AHashMap<String, usize> = AHashMap::default();

    for s in sample {
        let chars: Vec<char> = s.chars().collect();
        let len = chars.len();
        if len < 2 {
            continue;
        }

        let mut seen_in_this_string: AHashSet<String> = AHashSet::default();
        for start in 0..len {
            let max_len = max_ngram_len.min(len - start);
            for ngram_len in 2..=max_len {
                let ngram: String = chars[start..start + ngram_len].iter().collect();
                *counts.entry(ngram.clone()).or_insert(0) += 1;
                seen_in_this_string.insert(ngram);
            }
        }
        for ngram in seen_in_this_string {
            *molecule_counts.entry(ngram).or_insert(0) += 1;
        }
    }

    counts.retain(|ngram, _| *molecule_counts.get(ngram).unwrap_or(&0) >= 2);
    counts
}

/// An n-gram's cached value: the estimated or measured reduction in token
/// count per occurrence of that candidate when added to the current dictionary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NgramValue {
    /// The value itself (can be negative — see spec §4.C failure semantics).
    pub value: f64,
    /// `true` if `value` came from a full remeasurement, `false` if it is
    /// only an optimistic self-parse estimate.
    pub measured: bool,
}

/// The learner's owned value cache, keyed by candidate ngram text.
///
/// Re-architected per Design Notes §9 from the original's heterogeneous
/// `ngram -> (value, measured)` mapping into an owned table with explicit
/// `get_or_insert_estimate`/`record_measurement` operations. The
/// substring-based invalidation rule is the only code path that causes a
/// measured entry to be recomputed.
#[derive(Debug, Default)]
pub struct NgramTable {
    values: AHashMap<String, NgramValue>,
}

impl NgramTable {
    /// A fresh, empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `ngram`'s value, invalidating and re-estimating it when
    /// needed (spec §4.C step 4):
    ///
    /// - If already measured and `last_chosen` is *not* a substring of
    ///   `ngram`, the stored value is kept unchanged.
    /// - Otherwise (never seen, or measured-but-invalidated), a fresh
    ///   estimate is computed via `estimate` and stored as unmeasured.
    pub fn get_or_insert_estimate(
        &mut self,
        ngram: &str,
        last_chosen: Option<&str>,
        estimate: impl FnOnce() -> f64,
    ) -> NgramValue {
        if let Some(existing) = self.values.get(ngram) {
            if existing.measured {
                let invalidated = last_chosen.is_some_and(|last| ngram.contains(last));
                if !invalidated {
                    return *existing;
                }
            }
        }
        let fresh = NgramValue {
            value: estimate(),
            measured: false,
        };
        self.values.insert(ngram.to_string(), fresh);
        fresh
    }

    /// Record a full remeasurement of `ngram`. Always marks it measured,
    /// regardless of the value's sign or whether it improved on the
    /// baseline (spec Open Question (ii): a zero-improvement measurement
    /// still counts as measured, so it is never re-estimated).
    pub fn record_measurement(&mut self, ngram: &str, value: f64) {
        self.values.insert(
            ngram.to_string(),
            NgramValue {
                value,
                measured: true,
            },
        );
    }

    /// The current value/measured state for `ngram`, if cached.
    pub fn get(&self, ngram: &str) -> Option<NgramValue> {
        self.values.get(ngram).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_ngrams_seen_in_only_one_string() {
        let sample = vec!["aabb".to_string()];
        let counts = calculate_ngrams(&sample, MAX_NGRAM_LEN);
        // "aa" only appears once, and only in one molecule.
        assert!(!counts.contains_key("aa"));
    }

    #[test]
    fn keeps_ngrams_seen_in_at_least_two_molecules() {
        let sample = vec!["aabb".to_string(), "aabb".to_string()];
        let counts = calculate_ngrams(&sample, MAX_NGRAM_LEN);
        assert_eq!(counts.get("aa"), Some(&2));
        assert_eq!(counts.get("bb"), Some(&2));
    }

    #[test]
    fn respects_max_ngram_length() {
        let long = "a".repeat(70);
        let sample = vec![long.clone(), long];
        let counts = calculate_ngrams(&sample, MAX_NGRAM_LEN);
        let longest = counts.keys().map(|s| s.len()).max().unwrap();
        assert_eq!(longest, MAX_NGRAM_LEN);
    }

    #[test]
    fn honors_a_narrower_max_ngram_len_than_the_default() {
        let long = "a".repeat(20);
        let sample = vec![long.clone(), long];
        let counts = calculate_ngrams(&sample, 5);
        let longest = counts.keys().map(|s| s.len()).max().unwrap();
        assert_eq!(longest, 5);
    }

    #[test]
    fn new_ngram_is_estimated_not_measured() {
        let mut table = NgramTable::new();
        let v = table.get_or_insert_estimate("cc", None, || 3.0);
        assert_eq!(v, NgramValue { value: 3.0, measured: false });
    }

    #[test]
    fn measured_value_is_kept_when_not_invalidated() {
        let mut table = NgramTable::new();
        table.record_measurement("ccc", 5.0);
        let v = table.get_or_insert_estimate("ccc", Some("xy"), || 999.0);
        assert_eq!(v, NgramValue { value: 5.0, measured: true });
    }

    #[test]
    fn measured_value_is_invalidated_when_last_chosen_is_substring() {
        let mut table = NgramTable::new();
        table.record_measurement("ccc", 5.0);
        let v = table.get_or_insert_estimate("ccc", Some("cc"), || 1.0);
        assert_eq!(v, NgramValue { value: 1.0, measured: false });
    }

    #[test]
    fn zero_value_measurement_still_counts_as_measured() {
        let mut table = NgramTable::new();
        table.record_measurement("ccc", 0.0);
        let v = table.get("ccc").unwrap();
        assert!(v.measured);
        assert_eq!(v.value, 0.0);
    }
}
