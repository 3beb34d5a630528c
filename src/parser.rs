//! Component A: the optimal parser.
//!
//! Segments a string into the minimum number of dictionary tokens using
//! Aho–Corasick multi-pattern matching plus a shortest-path dynamic program.
//! A single character is always representable even when it is absent from
//! the dictionary's `multichars` — the parser never fails, it just falls
//! back to a length-1 token at any position it cannot otherwise cover.

use aho_corasick::AhoCorasick;

/// Multi-pattern matcher plus shortest-path tokenizer over a fixed set of
/// multichar tokens.
///
/// Built eagerly from its patterns (Design Notes §9 prefers eager
/// construction over the original's lazy-on-first-use automaton): the cost
/// is linear in total pattern length and small relative to the searches it
/// serves.
pub struct Parser {
    automaton: Option<AhoCorasick>,
}

impl Parser {
    /// Build a parser whose multi-pattern matcher recognizes exactly `multichars`.
    ///
    /// An empty `multichars` is valid: `parse`/`length` then degrade to the
    /// single-character fallback for every position (spec edge case: a
    /// dictionary with zero multichars reduces to trivial length `len(text)`).
    pub fn new(multichars: &[String]) -> Self {
        let automaton = if multichars.is_empty() {
            None
        } else {
            Some(
                AhoCorasick::builder()
                    .build(multichars)
                    .expect("multichar patterns must build a valid Aho-Corasick automaton"),
            )
        };
        Self { automaton }
    }

    /// Convenience constructor: `multichars` plus one extra candidate token,
    /// mirroring the learner's repeated "current dictionary plus one
    /// candidate" measurements (spec §4.C step 5).
    pub fn with_candidate(multichars: &[String], candidate: &str) -> Self {
        let mut patterns: Vec<String> = Vec::with_capacity(multichars.len() + 1);
        patterns.extend_from_slice(multichars);
        patterns.push(candidate.to_string());
        Self::new(&patterns)
    }

    /// Run the shortest-path DP and return `(solution, chosen_len)` where
    /// `solution[i]` is the minimum token count for `text[..i]` and
    /// `chosen_len[i]` is the length of the token ending at byte offset `i`
    /// (exclusive) in the optimal solution.
    fn solve(&self, text: &str) -> (Vec<usize>, Vec<usize>) {
        let bytes = text.as_bytes();
        let n = bytes.len();

        // matches_by_end[i] holds the lengths of all multichar tokens whose
        // match ends (inclusive) at byte index i, in automaton iteration order.
        let mut matches_by_end: Vec<Vec<usize>> = vec![Vec::new(); n];
        if let Some(automaton) = &self.automaton {
            for m in automaton.find_overlapping_iter(text) {
                let end_inclusive = m.end() - 1;
                matches_by_end[end_inclusive].push(m.end() - m.start());
            }
        }

        let mut solution = vec![0usize; n + 1];
        let mut chosen_len = vec![1usize; n];

        for i in 0..n {
            // Baseline candidate: the single-char fallback, tuple (solution[i], 1).
            let mut best_pred = solution[i];
            let mut best_len = 1usize;

            for &len in &matches_by_end[i] {
                let pred = solution[i + 1 - len];
                if (pred, len) < (best_pred, best_len) {
                    best_pred = pred;
                    best_len = len;
                }
            }

            solution[i + 1] = best_pred + 1;
            chosen_len[i] = best_len;
        }

        (solution, chosen_len)
    }

    /// Return the minimum-cardinality tokenization of `text`.
    pub fn parse(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        let (_, chosen_len) = self.solve(text);

        let mut tokens_rev = Vec::new();
        let mut i = text.len();
        while i > 0 {
            let len = chosen_len[i - 1];
            let start = i - len;
            tokens_rev.push(text[start..i].to_string());
            i = start;
        }
        tokens_rev.reverse();
        tokens_rev
    }

    /// Return only the cardinality of the minimum tokenization, without
    /// materializing the token sequence.
    pub fn length(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        let (solution, _) = self.solve(text);
        solution[text.len()]
    }

    /// Sum of `length` over every string in `texts`, computed in parallel
    /// (spec §5(b): per-string `Parser::length` calls during baselining are
    /// embarrassingly parallel since each reads only this immutable parser).
    pub fn total_length<S: AsRef<str> + Sync>(&self, texts: &[S]) -> usize {
        use rayon::prelude::*;
        texts.par_iter().map(|s| self.length(s.as_ref())).sum()
    }
}
