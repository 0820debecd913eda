//! libhanseg
//!
//! Chinese word segmentation over a pre-built lexicon. A contiguous run of
//! segmentable characters becomes a DAG of dictionary words, a
//! right-to-left dynamic program picks the maximum-log-probability path,
//! and spans the dictionary cannot explain are re-segmented by a BMES
//! hidden Markov model decoded with Viterbi. The models live in the
//! `libhanseg-core` crate and are immutable once loaded.
//!
//! Public API exported here:
//! - `Segmenter`, `SegMode` and `SegToken` from `segmenter`
//! - `TfIdfAnalyzer` and `Keyword` from `keyword`
//! - the `chars`, `dag` and `viterbi` building blocks for callers that
//!   need the pieces individually
//!
//! Example
//!
//! ```
//! use libhanseg::{SegMode, Segmenter};
//! use std::io::Cursor;
//!
//! let dict = "北京 30000\n大学 20000\n北京大学 12000\n";
//! let segmenter =
//!     Segmenter::from_readers(Cursor::new(dict), None::<Cursor<&str>>).unwrap();
//! let tokens = segmenter.process("北京大学", SegMode::Search);
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].word, "北京大学");
//! ```

pub mod chars;
pub mod dag;
pub mod keyword;
pub mod segmenter;
pub mod viterbi;

pub use keyword::{Keyword, TfIdfAnalyzer};
pub use segmenter::{SegMode, SegToken, Segmenter};

// Re-export the model types callers need to construct a segmenter.
pub use libhanseg_core::{Config, DictError, HmmModel, Result, State, WordDict};
