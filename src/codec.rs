//! Component B's runtime half: `Codec`, the `zip`/`unzip` pair over a
//! [`Dictionary`].

use crate::dictionary::Dictionary;
use crate::error::SmizipError;
use crate::parser::Parser;

/// Selects the shape of `Codec::zip`'s output (spec §4.B "Format parameter").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZipFormat {
    /// Packed bytes (the default).
    #[default]
    Packed,
    /// A list of the token strings chosen by the parser.
    Tokens,
    /// A list of the integer byte indices chosen by the parser.
    Indices,
}

/// `Codec::zip`'s output, shaped according to the requested [`ZipFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZipOutput {
    /// `ZipFormat::Packed`.
    Packed(Vec<u8>),
    /// `ZipFormat::Tokens`.
    Tokens(Vec<String>),
    /// `ZipFormat::Indices`.
    Indices(Vec<u8>),
}

impl ZipOutput {
    /// Unwrap the packed-bytes variant, panicking if this is a different shape.
    ///
    /// Convenience for callers that requested `ZipFormat::Packed` and know
    /// the shape statically.
    pub fn into_packed(self) -> Vec<u8> {
        match self {
            ZipOutput::Packed(bytes) => bytes,
            other => panic!("expected ZipOutput::Packed, got {other:?}"),
        }
    }
}

/// A [`Dictionary`] paired with the [`Parser`] built over its multichar
/// tokens, ready to compress (`zip`) and decompress (`unzip`) text.
///
/// The parser is built eagerly at construction (Design Notes §9) and held
/// for the codec's lifetime.
pub struct Codec {
    dictionary: Dictionary,
    parser: Parser,
}

impl Codec {
    /// Build a codec over `dictionary`, eagerly constructing its Aho-Corasick
    /// automaton.
    pub fn new(dictionary: Dictionary) -> Self {
        let multichars = dictionary.multichars();
        let parser = Parser::new(&multichars);
        Self { dictionary, parser }
    }

    /// The underlying dictionary.
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Confirm the dictionary carries both `'\t'` and `'\n'` as singlechar
    /// tokens, as line-framed I/O requires (spec §6): the compressor must
    /// never emit those bytes as encoded output.
    pub fn require_control_chars(&self) -> Result<(), SmizipError> {
        for c in ['\t', '\n'] {
            if !self.dictionary.has_char(c) {
                return Err(SmizipError::RequiredControlCharMissing(c));
            }
        }
        Ok(())
    }

    /// Compress `text`, returning the chosen token sequence shaped per `format`.
    ///
    /// Fails with `DictionaryCharsetIncomplete` if the optimal parse needed a
    /// single-character fallback for a character that is not itself a
    /// singlechar token in the dictionary.
    pub fn zip(&self, text: &str, format: ZipFormat) -> Result<ZipOutput, SmizipError> {
        let tokens = self.parser.parse(text);

        let mut indices = Vec::with_capacity(tokens.len());
        for token in &tokens {
            match self.dictionary.index_of(token) {
                Some(idx) => indices.push(idx),
                None => {
                    // Only the single-char fallback can be missing: every
                    // multichar token came straight from the dictionary's
                    // own automaton patterns.
                    let c = token.chars().next().expect("tokens are never empty");
                    return Err(SmizipError::DictionaryCharsetIncomplete(c));
                }
            }
        }

        Ok(match format {
            ZipFormat::Packed => ZipOutput::Packed(indices),
            ZipFormat::Indices => ZipOutput::Indices(indices),
            ZipFormat::Tokens => ZipOutput::Tokens(tokens),
        })
    }

    /// Decompress `bytes` back into the original text via a trivial table lookup.
    pub fn unzip(&self, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(bytes.len());
        for &b in bytes {
            out.push_str(self.dictionary.token_at(b));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn codec_with(singles: &str, multichars: &[&str]) -> Codec {
        let singlechars: BTreeSet<char> = singles.chars().collect();
        let multichars: Vec<String> = multichars.iter().map(|s| s.to_string()).collect();
        let dict = Dictionary::assemble(&singlechars, &multichars, None).unwrap();
        Codec::new(dict)
    }

    #[test]
    fn round_trips_arbitrary_text() {
        let codec = codec_with("ABCDEFGH", &[]);
        let text = "ABCDEFGH";
        let zipped = codec.zip(text, ZipFormat::Packed).unwrap().into_packed();
        assert_eq!(codec.unzip(&zipped), text);
    }

    #[test]
    fn empty_text_round_trips_to_empty() {
        let codec = codec_with("A", &[]);
        let zipped = codec.zip("", ZipFormat::Packed).unwrap().into_packed();
        assert!(zipped.is_empty());
        assert_eq!(codec.unzip(&zipped), "");
    }

    #[test]
    fn single_char_only_dictionary_emits_ascii_codes() {
        let codec = codec_with("A", &[]);
        let zipped = codec.zip("AAA", ZipFormat::Packed).unwrap().into_packed();
        assert_eq!(zipped, vec![b'A', b'A', b'A']);
    }

    #[test]
    fn multichar_token_is_preferred_and_indexed() {
        let singlechars: BTreeSet<char> = "AB".chars().collect();
        let dict = Dictionary::assemble(&singlechars, &["AB".to_string()], None).unwrap();
        let codec = Codec::new(dict);
        let idx = codec.dictionary().index_of("AB").unwrap();
        assert_eq!(idx, 0); // 'A'=65, 'B'=66, so slot 0 is free for the multichar.

        let zipped = codec.zip("ABAB", ZipFormat::Packed).unwrap().into_packed();
        assert_eq!(zipped, vec![idx, idx]);
    }

    #[test]
    fn missing_charset_coverage_is_an_error() {
        let codec = codec_with("AB", &[]);
        let err = codec.zip("ABC", ZipFormat::Packed).unwrap_err();
        assert_eq!(err, SmizipError::DictionaryCharsetIncomplete('C'));
    }

    #[test]
    fn control_char_check_flags_missing_tab_and_newline() {
        let codec = codec_with("AB", &[]);
        let err = codec.require_control_chars().unwrap_err();
        assert!(matches!(err, SmizipError::RequiredControlCharMissing(_)));

        let codec_ok = codec_with("AB\t\n", &[]);
        assert!(codec_ok.require_control_chars().is_ok());
    }

    #[test]
    fn tokens_and_indices_formats_agree_with_packed() {
        let singlechars: BTreeSet<char> = "AB".chars().collect();
        let dict = Dictionary::assemble(&singlechars, &["AB".to_string()], None).unwrap();
        let codec = Codec::new(dict);

        let packed = codec.zip("ABAB", ZipFormat::Packed).unwrap();
        let indices = codec.zip("ABAB", ZipFormat::Indices).unwrap();
        let tokens = codec.zip("ABAB", ZipFormat::Tokens).unwrap();

        match (packed, indices, tokens) {
            (ZipOutput::Packed(p), ZipOutput::Indices(i), ZipOutput::Tokens(t)) => {
                assert_eq!(p, i);
                assert_eq!(t, vec!["AB".to_string(), "AB".to_string()]);
            }
            _ => panic!("unexpected ZipOutput variants"),
        }
    }
}
