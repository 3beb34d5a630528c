//! Training corpus handling: holdout reservation and batch draws (spec §3).

use crate::error::SmizipError;

/// Number of training strings reserved as a holdout set: used only for
/// progress reporting, never for candidate selection.
pub const HOLDOUT_SIZE: usize = 10_000;

/// A training corpus wrapping a caller-supplied iterator of strings.
///
/// The first [`HOLDOUT_SIZE`] strings drawn via [`TrainingCorpus::take_holdout`]
/// are reserved; callers must draw the holdout before drawing any learning
/// batches, matching the original's "holdout first" order.
pub struct TrainingCorpus<I> {
    inner: I,
    drawn: usize,
}

impl<I: Iterator<Item = String>> TrainingCorpus<I> {
    /// Wrap `inner` as a training corpus.
    pub fn new(inner: I) -> Self {
        Self { inner, drawn: 0 }
    }

    /// Draw the holdout set: the first `n` strings (typically [`HOLDOUT_SIZE`]).
    pub fn take_holdout(&mut self, n: usize) -> Result<Vec<String>, SmizipError> {
        self.next_batch(n)
    }

    /// Draw the next `n` training strings, advancing the underlying iterator.
    ///
    /// Fails with `InsufficientCorpus` if the iterator runs out before `n`
    /// strings are available.
    pub fn next_batch(&mut self, n: usize) -> Result<Vec<String>, SmizipError> {
        let mut batch = Vec::with_capacity(n);
        for _ in 0..n {
            match self.inner.next() {
                Some(s) => {
                    batch.push(s);
                    self.drawn += 1;
                }
                None => {
                    return Err(SmizipError::InsufficientCorpus {
                        filled: self.drawn,
                    });
                }
            }
        }
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_holdout_then_batches_in_order() {
        let lines = (0..20).map(|i| format!("line{i}"));
        let mut corpus = TrainingCorpus::new(lines);
        let holdout = corpus.take_holdout(5).unwrap();
        assert_eq!(holdout, vec!["line0", "line1", "line2", "line3", "line4"]);
        let batch = corpus.next_batch(3).unwrap();
        assert_eq!(batch, vec!["line5", "line6", "line7"]);
    }

    #[test]
    fn exhausted_corpus_is_insufficient() {
        let lines = (0..3).map(|i| format!("line{i}"));
        let mut corpus = TrainingCorpus::new(lines);
        let err = corpus.next_batch(10).unwrap_err();
        assert_eq!(err, SmizipError::InsufficientCorpus { filled: 3 });
    }
}
