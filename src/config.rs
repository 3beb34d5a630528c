//! Learner tuning: the named speed presets from spec §4.C, the non-speed
//! knobs bundled as [`LearnerConfig`], plus the default SMILES alphabet the
//! original CLI ships (`--chars`'s documented default).

use crate::dictionary::MAX_DICTIONARY_SIZE;
use crate::ngram::MAX_NGRAM_LEN;

/// Default single-character alphabet used when a caller does not supply one,
/// mirroring `original_source/smizip/scripts/find_best_ngrams.py`'s
/// `DEFAULT_LIST`.
pub const DEFAULT_SINGLECHARS: &str =
    "*%:#()+-./0123456789=@ABCFHIKLMNOPRSTXZ[\\]abcegilnoprst";

/// The learner's non-speed-related knobs: how large the codebook is allowed
/// to grow, and the longest substring considered as a candidate multigram.
///
/// Separate from [`SpeedPreset`] because these bound the search space itself
/// rather than how hard the search looks within it; a caller tuning one
/// rarely needs to touch the other. `Default` reproduces the spec's hard
/// limits (a 256-slot codebook, 60-character ngrams) so most callers never
/// construct this explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearnerConfig {
    /// Target number of filled dictionary slots (singlechars + multichars)
    /// at which the learner stops growing `multichars`.
    pub max_dictionary_size: usize,
    /// Longest substring [`crate::ngram::calculate_ngrams`] considers as a
    /// candidate multigram.
    pub max_ngram_len: usize,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            max_dictionary_size: MAX_DICTIONARY_SIZE,
            max_ngram_len: MAX_NGRAM_LEN,
        }
    }
}

/// The six parameters controlling a learner iteration's sample size and
/// search depth (spec §4.C "Speed presets").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedPreset {
    /// Base sample size at the first iteration.
    pub num_smiles_to_test: usize,
    /// Additional sample strings per existing multichar token.
    pub delta_to_test: f64,
    /// Minimum number of *measured* candidates to examine before stopping.
    pub test_at_least_n_measured: usize,
    /// Minimum number of candidates (measured or not) to examine in a normal iteration.
    pub test_at_least_n: usize,
    /// Minimum number of candidates to examine during a deep pass.
    pub test_at_least_n_sometimes: usize,
    /// How often (in iterations) a deep pass is forced.
    pub sometimes_interval: usize,
}

impl SpeedPreset {
    /// The `slow` preset: thorough, expensive.
    pub const SLOW: SpeedPreset = SpeedPreset {
        num_smiles_to_test: 1000,
        delta_to_test: 45.0,
        test_at_least_n_measured: 80,
        test_at_least_n: 100,
        test_at_least_n_sometimes: 1000,
        sometimes_interval: 20,
    };

    /// The `medium` preset: a balance of speed and compression quality.
    pub const MEDIUM: SpeedPreset = SpeedPreset {
        num_smiles_to_test: 250,
        delta_to_test: 12.0,
        test_at_least_n_measured: 40,
        test_at_least_n: 50,
        test_at_least_n_sometimes: 200,
        sometimes_interval: 50,
    };

    /// The `fast` preset: quick but noticeably worse compression.
    pub const FAST: SpeedPreset = SpeedPreset {
        num_smiles_to_test: 100,
        delta_to_test: 4.5,
        test_at_least_n_measured: 25,
        test_at_least_n: 25,
        test_at_least_n_sometimes: 30,
        sometimes_interval: 250,
    };

    /// The sample size to draw for an iteration with `multichars_so_far`
    /// multichar tokens already chosen (spec §4.C step 1).
    pub fn num_samples(&self, multichars_so_far: usize) -> usize {
        (self.num_smiles_to_test as f64 + multichars_so_far as f64 * self.delta_to_test) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_size_grows_linearly_with_dictionary_size() {
        let preset = SpeedPreset::SLOW;
        assert_eq!(preset.num_samples(0), 1000);
        assert_eq!(preset.num_samples(10), 1000 + 450);
    }

    #[test]
    fn presets_match_the_documented_values() {
        assert_eq!(SpeedPreset::FAST.sometimes_interval, 250);
        assert_eq!(SpeedPreset::MEDIUM.test_at_least_n_measured, 40);
        assert_eq!(SpeedPreset::SLOW.test_at_least_n_sometimes, 1000);
    }

    #[test]
    fn default_learner_config_matches_the_spec_hard_limits() {
        let config = LearnerConfig::default();
        assert_eq!(config.max_dictionary_size, MAX_DICTIONARY_SIZE);
        assert_eq!(config.max_ngram_len, MAX_NGRAM_LEN);
    }
}
