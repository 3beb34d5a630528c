//! Component C: the dictionary learner.
//!
//! Grows `multichars` until the dictionary reaches 256 entries, greedily
//! choosing at each iteration the multigram that most reduces the token
//! count of a freshly-drawn sample (spec §4.C).

use std::collections::BTreeSet;
use std::io::{self, Write};

use crate::config::{LearnerConfig, SpeedPreset};
use crate::corpus::{TrainingCorpus, HOLDOUT_SIZE};
use crate::dictionary::{Dictionary, DictionaryMetadata};
use crate::error::SmizipError;
use crate::ngram::{calculate_ngrams, NgramTable};
use crate::parser::Parser;

/// Everything the learner needs besides the corpus itself: the initial
/// charset, any seed multichars, the speed preset, the non-speed search
/// bounds, and provenance fields that end up in the produced dictionary's
/// metadata.
///
/// The seed fields (`initial_multichars`, `initial_multigrams_csv`) mirror
/// the original CLI's `--multigrams` option
/// (`examples/original_source/smizip/scripts/find_best_ngrams.py`): a caller
/// resuming or extending a previous run should not have to re-discover
/// single-character tokens.
#[derive(Debug, Clone)]
pub struct LearnerInput {
    /// The initial single-character alphabet.
    pub singlechars: BTreeSet<char>,
    /// Seed multichar tokens to start from, in insertion order.
    pub initial_multichars: Vec<String>,
    /// The user-provided seed list, verbatim, for metadata provenance only.
    pub initial_multigrams_csv: Option<String>,
    /// Sampling/search-depth tuning.
    pub preset: SpeedPreset,
    /// Target codebook size and candidate-ngram length ceiling.
    pub config: LearnerConfig,
    /// Name of the training corpus, for metadata provenance only.
    pub corpus_filename: String,
}

/// A progress sink that tees every line to one or more underlying writers.
///
/// Mirrors the original's `Log` class, which writes every progress line to
/// stdout and, optionally, to a log file at the same time. Writes are never
/// swallowed: the first writer to fail aborts the whole write.
pub struct ProgressLog {
    sinks: Vec<Box<dyn Write>>,
}

impl ProgressLog {
    /// A sink that writes to nothing; useful for tests or `--quiet`.
    pub fn discard() -> Self {
        Self { sinks: Vec::new() }
    }

    /// Add another writer to tee output to.
    pub fn add_sink(&mut self, sink: Box<dyn Write>) {
        self.sinks.push(sink);
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::discard()
    }
}

impl Write for ProgressLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for sink in &mut self.sinks {
            sink.write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.flush()?;
        }
        Ok(())
    }
}

/// Run the greedy learner to completion, returning the frozen 256-entry dictionary.
///
/// `corpus` is drained: the first [`HOLDOUT_SIZE`] strings become the holdout
/// set, then successive batches are drawn per iteration until the dictionary
/// fills. Progress is written to `sink` as it goes (sample size, deep-pass
/// threshold, each tested candidate's rank, and the holdout compression
/// ratio) — mirroring the original's `Log` class, which tees the same
/// lines to stdout and an optional file.
pub fn learn<I: Iterator<Item = String>>(
    corpus: &mut TrainingCorpus<I>,
    input: LearnerInput,
    sink: &mut dyn Write,
) -> Result<Dictionary, SmizipError> {
    let LearnerInput {
        singlechars,
        initial_multichars: mut multichars,
        initial_multigrams_csv,
        preset,
        config,
        corpus_filename,
    } = input;

    let orig_num_singles = singlechars.len();

    writeln!(
        sink,
        "The initial list of single-char ngrams is:\n  {:?}",
        singlechars.iter().collect::<String>()
    )
    .map_err(|e| SmizipError::Io(e.to_string()))?;
    writeln!(
        sink,
        "The initial list of multi-char ngrams is:\n  {multichars:?}"
    )
    .map_err(|e| SmizipError::Io(e.to_string()))?;

    let holdout = corpus.take_holdout(HOLDOUT_SIZE)?;
    let mut holdout_len = Parser::new(&multichars).total_length(&holdout);
    writeln!(
        sink,
        "Holdout set: {} SMILES with {} chars",
        holdout.len(),
        holdout_len
    )
    .map_err(|e| SmizipError::Io(e.to_string()))?;

    let mut table = NgramTable::new();
    // The most recently committed token; `None` before the first commit.
    // Persists across iterations exactly like the original's `chosen` tuple,
    // including the quirk that if an iteration finds no improving
    // candidate, the previous winner would be re-committed — `Dictionary`'s
    // duplicate-token check in `assemble` guards against that silently
    // corrupting the codebook.
    let mut chosen: Option<(String, usize)> = None;
    let mut first_pass = true;
    let mut counter = 0usize;

    while multichars.len() + orig_num_singles < config.max_dictionary_size {
        let num_samples = preset.num_samples(multichars.len());

        counter += 1;
        let test_at_least_n_ngrams = if counter == preset.sometimes_interval {
            counter = 0;
            preset.test_at_least_n_sometimes
        } else {
            preset.test_at_least_n
        };

        writeln!(sink, "Testing {num_samples} SMILES").map_err(|e| SmizipError::Io(e.to_string()))?;
        writeln!(sink, "Going to test at least {test_at_least_n_ngrams} ngrams")
            .map_err(|e| SmizipError::Io(e.to_string()))?;

        let sample = corpus.next_batch(num_samples)?;
        let base_parser = Parser::new(&multichars);
        let origlen = base_parser.total_length(&sample);
        let mut minlen = origlen;

        let counts = calculate_ngrams(&sample, config.max_ngram_len);
        let last_chosen = chosen.as_ref().map(|(ngram, _)| ngram.as_str());

        let mut scored: Vec<(String, usize, f64, bool)> = Vec::with_capacity(counts.len());
        for (ngram, count) in counts.iter() {
            // Skip ngrams already chosen: they still occur as raw substrings
            // of later samples, but a repeat sighting has no value to
            // measure and would otherwise consume a test slot (mirrors
            // `NgramManager.get_ngrams`'s `if ngram in chosen_ngrams: continue`).
            if multichars.contains(ngram) {
                continue;
            }
            let estimate = table.get_or_insert_estimate(ngram, last_chosen, || {
                base_parser.length(ngram) as f64 - 1.0
            });
            scored.push((ngram.clone(), *count, estimate.value, estimate.measured));
        }

        // Rank by value * count descending; break ties by ngram text for determinism.
        scored.sort_by(|a, b| {
            let score_a = a.2 * a.1 as f64;
            let score_b = b.2 * b.1 as f64;
            score_b
                .partial_cmp(&score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });

        let mut num_tested = 0usize;
        for (idx0, (ngram, count, value, measured)) in scored.iter().enumerate() {
            let idx = idx0 + 1;
            if idx > preset.test_at_least_n_sometimes {
                counter = 0;
            }
            if num_tested >= preset.test_at_least_n_measured && idx > test_at_least_n_ngrams {
                break;
            }

            let candidate_parser = Parser::with_candidate(&multichars, ngram);
            let newlen = candidate_parser.total_length(&sample);
            let new_value = (origlen as f64 - newlen as f64) / *count as f64;

            writeln!(
                sink,
                "  Rank {idx}: {ngram} {:.1}{}->{:.1} {:.1}->{} count={count}",
                value,
                if *measured { "M" } else { "E" },
                new_value,
                value * *count as f64,
                origlen as i64 - newlen as i64
            )
            .map_err(|e| SmizipError::Io(e.to_string()))?;

            table.record_measurement(ngram, new_value);

            if newlen < minlen {
                chosen = Some((ngram.clone(), idx));
                minlen = newlen;
            }
            if *measured || first_pass {
                num_tested += 1;
            }
        }
        first_pass = false;

        let (winning_ngram, winning_idx) = chosen.clone().ok_or_else(|| {
            SmizipError::MalformedDictionary(
                "no ngram candidate improved on the baseline; cannot grow the dictionary"
                    .to_string(),
            )
        })?;

        multichars.push(winning_ngram.clone());
        writeln!(
            sink,
            "Ngram {}: {} Rank {} {}->{}",
            multichars.len() + orig_num_singles,
            winning_ngram,
            winning_idx,
            origlen,
            minlen
        )
        .map_err(|e| SmizipError::Io(e.to_string()))?;

        let new_holdout_len = Parser::new(&multichars).total_length(&holdout);
        writeln!(
            sink,
            "Holdout set: {} SMILES with {}->{} chars ({:.1}%)",
            holdout.len(),
            holdout_len,
            new_holdout_len,
            100.0 * new_holdout_len as f64 / holdout_len as f64
        )
        .map_err(|e| SmizipError::Io(e.to_string()))?;
        holdout_len = new_holdout_len;
    }

    let metadata = DictionaryMetadata {
        initial_chars: singlechars.iter().collect(),
        initial_multigrams: initial_multigrams_csv,
        num_smiles_to_test: preset.num_smiles_to_test,
        delta_to_test: preset.delta_to_test,
        test_at_least_n: preset.test_at_least_n,
        test_at_least_n_measured: preset.test_at_least_n_measured,
        test_at_least_n_sometimes: preset.test_at_least_n_sometimes,
        sometimes_interval: preset.sometimes_interval,
        filename: corpus_filename,
    };

    Dictionary::assemble(&singlechars, &multichars, Some(metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedPreset;

    /// A tiny corpus where the learner should deterministically pick `"aa"`
    /// first: it is the only length-2+ ngram appearing in >= 2 strings, and
    /// adding it strictly shortens the "aa" strings (spec §8 scenario 6).
    #[test]
    fn first_choice_is_the_obviously_best_repeated_ngram() {
        let lines = vec!["aa".to_string(), "aa".to_string(), "bb".to_string()]
            .into_iter()
            .cycle()
            .take(HOLDOUT_SIZE + 300);
        let mut corpus = TrainingCorpus::new(lines);

        let singlechars: BTreeSet<char> = "ab".chars().collect();
        let input = LearnerInput {
            singlechars,
            initial_multichars: Vec::new(),
            initial_multigrams_csv: None,
            preset: SpeedPreset::FAST,
            // Only grow by a single slot for a fast unit test rather than
            // filling the whole 256-entry codebook.
            config: LearnerConfig {
                max_dictionary_size: 3,
                ..LearnerConfig::default()
            },
            corpus_filename: "test.smi".to_string(),
        };

        let mut sink = Vec::new();
        let dict = learn(&mut corpus, input, &mut sink).unwrap();
        assert!(dict.index_of("aa").is_some());
    }

    #[test]
    fn insufficient_corpus_is_reported() {
        let lines = std::iter::repeat_with(|| "aabbcc".to_string()).take(HOLDOUT_SIZE + 5);
        let mut corpus = TrainingCorpus::new(lines);

        let input = LearnerInput {
            singlechars: "abc".chars().collect(),
            initial_multichars: Vec::new(),
            initial_multigrams_csv: None,
            preset: SpeedPreset::FAST,
            config: LearnerConfig::default(),
            corpus_filename: "test.smi".to_string(),
        };

        let mut sink = Vec::new();
        let err = learn(&mut corpus, input, &mut sink).unwrap_err();
        assert!(matches!(err, SmizipError::InsufficientCorpus { .. }));
    }
}
