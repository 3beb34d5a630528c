//! # smizip
//!
//! A domain-specialized byte-level compressor for SMILES strings (chemical
//! line notation). Unlike general-purpose compressors, smizip's dictionary
//! is assembled entirely from multi-character substrings of SMILES text, so
//! a learned 256-entry codebook can pack most real molecules into roughly
//! half their original byte length.
//!
//! ## Architecture
//!
//! - [`parser`] — Component A, the optimal parser: Aho-Corasick multi-pattern
//!   matching plus a shortest-path dynamic program finds the minimum-token
//!   tokenization of a string under a fixed dictionary.
//! - [`dictionary`] — Component B's data model: the 256-slot byte-indexed
//!   codebook, with single characters at their ASCII code position and
//!   multichar tokens filling the rest.
//! - [`codec`] — Component B's runtime half: `zip`/`unzip` over a
//!   [`dictionary::Dictionary`], in packed-bytes, token-list, or
//!   index-list form.
//! - [`ngram`] — candidate n-gram enumeration and the value/count cache the
//!   learner ranks candidates with.
//! - [`config`] — the named speed presets (`slow`/`medium`/`fast`) controlling
//!   the learner's sampling and search depth.
//! - [`corpus`] — training-corpus holdout reservation and batch draws.
//! - [`learner`] — Component C: the greedy dictionary learner that grows a
//!   codebook from a training corpus.
//!
//! ## Example
//!
//! ```rust,ignore
//! use smizip::{codec::{Codec, ZipFormat}, dictionary::Dictionary};
//!
//! let dict = Dictionary::from_ngrams(ngrams)?;
//! let codec = Codec::new(dict);
//! let packed = codec.zip("CC(=O)Oc1ccccc1C(=O)O", ZipFormat::Packed)?.into_packed();
//! assert_eq!(codec.unzip(&packed), "CC(=O)Oc1ccccc1C(=O)O");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod error;
pub mod learner;
pub mod ngram;
pub mod parser;

pub use codec::{Codec, ZipFormat, ZipOutput};
pub use dictionary::{Dictionary, DictionaryMetadata};
pub use error::SmizipError;
pub use learner::{learn, LearnerInput};
pub use parser::Parser;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
