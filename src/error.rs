//! Error kinds shared across the parser, codec, and learner.

use thiserror::Error;

/// The five fatal error kinds from spec §7, plus `Io` for learner
/// progress-sink failures.
///
/// None of these are retried by the core; each is fatal to the operation
/// that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmizipError {
    /// Attempted to build a dictionary with more than 256 tokens.
    #[error("dictionary has {0} tokens but the codebook is hard-capped at 256")]
    DictionaryTooLarge(usize),

    /// The compressor's input contains a character absent from `singlechars`.
    #[error("character {0:?} is not covered by the dictionary's singlechars")]
    DictionaryCharsetIncomplete(char),

    /// The dictionary lacks `'\t'` or `'\n'`, required for line-framed I/O.
    #[error("dictionary is missing required control character {0:?}")]
    RequiredControlCharMissing(char),

    /// The training corpus was exhausted before the dictionary reached 256 entries.
    #[error("training corpus exhausted with only {filled}/256 dictionary slots filled")]
    InsufficientCorpus {
        /// Number of slots filled (singlechars + multichars) at the point of exhaustion.
        filled: usize,
    },

    /// The dictionary JSON was structurally invalid.
    #[error("malformed dictionary: {0}")]
    MalformedDictionary(String),

    /// Writing a progress line to the learner's sink failed.
    ///
    /// Not one of the spec's five core error kinds (the algorithms
    /// themselves have no I/O), but `ProgressLog`'s contract is that no
    /// writer failure is swallowed, so `learner::learn` needs a variant to
    /// carry it back to the caller.
    #[error("writing learner progress failed: {0}")]
    Io(String),
}
