//! Segmentation driver.
//!
//! [`Segmenter`] owns the word dictionary behind a read/write lock (user
//! dictionary merging is write-exclusive, segmentation calls share reads),
//! the immutable HMM model and the configuration. The two public entry
//! points are [`Segmenter::process`], which walks a paragraph and emits
//! offset-carrying tokens in `Search` or `Index` mode, and
//! [`Segmenter::sentence_process`], the plain word list used by keyword
//! extraction.

use std::fmt;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use libhanseg_core::{Config, DictError, HmmModel, Result, WordDict};

use crate::chars;
use crate::dag::{build_dag, calc_route};
use crate::viterbi;

/// Output granularity of [`Segmenter::process`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegMode {
    /// Each token exactly once, finest segmentation.
    Search,
    /// Additionally emit every in-dictionary bigram and trigram contained
    /// in longer tokens, for inverted-index population.
    Index,
}

/// One segmented token with character offsets into the original input,
/// `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegToken {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

impl SegToken {
    fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    /// Token length in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for SegToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.word, self.start, self.end)
    }
}

/// The segmentation engine handle.
///
/// Cheap to share behind an `Arc`; all models are read-only during
/// segmentation and only the user-dictionary operations take the write
/// lock.
#[derive(Debug)]
pub struct Segmenter {
    dict: RwLock<WordDict>,
    hmm: HmmModel,
    config: Config,
}

impl Segmenter {
    /// Build a segmenter from already-loaded models.
    pub fn with_dict(dict: WordDict, hmm: HmmModel, config: Config) -> Self {
        Self {
            dict: RwLock::new(dict),
            hmm,
            config,
        }
    }

    /// Build from in-memory readers. The main dictionary is required; pass
    /// `None` for the emission data to run without the HMM fallback.
    pub fn from_readers<R1: BufRead, R2: BufRead>(
        main_dict: R1,
        emit: Option<R2>,
    ) -> Result<Self> {
        let dict = WordDict::from_main_reader(main_dict, "main dict")?;
        let hmm = match emit {
            Some(reader) => HmmModel::from_emit_reader(reader, "prob_emit")?,
            None => HmmModel::empty(),
        };
        Ok(Self::with_dict(dict, hmm, Config::default()))
    }

    /// Build from file paths. A missing main dictionary is an error; a
    /// missing or unreadable emission file only disables the HMM fallback.
    pub fn from_paths<P: AsRef<Path>>(main_dict: P, emit: Option<P>) -> Result<Self> {
        let dict = WordDict::from_main_path(main_dict)?;
        let hmm = Self::load_hmm_or_warn(emit.as_ref().map(|p| p.as_ref()));
        Ok(Self::with_dict(dict, hmm, Config::default()))
    }

    /// Build from a [`Config`], loading the resources it names and applying
    /// its knobs (emission floor, user-dict defaults).
    pub fn from_config(config: Config) -> Result<Self> {
        let main = config
            .main_dict
            .as_ref()
            .ok_or_else(|| DictError::InvalidFormat {
                source_name: "config".into(),
                reason: "main_dict is required".into(),
            })?;
        let dict = WordDict::from_main_path(main)?;
        let mut hmm = Self::load_hmm_or_warn(config.emit_file.as_deref());
        hmm.set_floor(config.emission_floor);

        let segmenter = Self::with_dict(dict, hmm, config);
        let user_dicts: Vec<PathBuf> = segmenter.config.user_dicts.clone();
        segmenter.init_user_dict_paths(&user_dicts);
        Ok(segmenter)
    }

    fn load_hmm_or_warn(emit: Option<&Path>) -> HmmModel {
        match emit {
            Some(path) => match HmmModel::from_emit_path(path) {
                Ok(model) => model,
                Err(e) => {
                    eprintln!(
                        "warning: {}: emission load failed, HMM fallback disabled: {}",
                        path.display(),
                        e
                    );
                    HmmModel::empty()
                }
            },
            None => HmmModel::empty(),
        }
    }

    /// Merge a user dictionary: a directory is scanned for files with the
    /// configured suffix (`*.dict` by default), anything else is loaded as
    /// a single dictionary file. Each path is loaded at most once. Returns
    /// the number of entries added.
    pub fn init_user_dict<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let mut dict = self.dict.write().expect("dictionary lock poisoned");
        if path.is_dir() {
            dict.init_user_dict_dir(
                path,
                &self.config.user_dict_suffix,
                self.config.default_user_freq,
            )
        } else {
            dict.load_user_path(path, self.config.default_user_freq)
        }
    }

    /// Merge an explicit list of user dictionary files, skipping failures
    /// with a warning. Returns the number of entries added.
    pub fn init_user_dict_paths<P: AsRef<Path>>(&self, paths: &[P]) -> usize {
        let mut dict = self.dict.write().expect("dictionary lock poisoned");
        dict.init_user_dict_paths(paths, self.config.default_user_freq)
    }

    /// Replace the lexicon with an empty one and clear the frequency
    /// table; the HMM model is untouched.
    pub fn reset_dict(&self) {
        let mut dict = self.dict.write().expect("dictionary lock poisoned");
        dict.reset();
    }

    /// True when unknown multi-character spans will be re-segmented by the
    /// HMM (enabled in the configuration and emission data present).
    pub fn hmm_active(&self) -> bool {
        self.config.hmm_enabled && self.hmm.has_emissions()
    }

    /// Segment a paragraph into offset-carrying tokens.
    pub fn process(&self, paragraph: &str, mode: SegMode) -> Vec<SegToken> {
        let dict = self.dict.read().expect("dictionary lock poisoned");
        let input: Vec<char> = paragraph.chars().collect();

        let mut tokens = Vec::new();
        let mut acc: Vec<char> = Vec::new();
        let mut offset = 0usize;

        for &ch in &input {
            let norm = chars::regularize(ch);
            if chars::is_cc(norm) {
                acc.push(norm);
            } else {
                if !acc.is_empty() {
                    self.flush_run(&dict, &acc, mode, &mut offset, &mut tokens);
                    acc.clear();
                }
                // the separator itself, un-normalized, is always a token
                tokens.push(SegToken::new(ch.to_string(), offset, offset + 1));
                offset += 1;
            }
        }
        if !acc.is_empty() {
            self.flush_run(&dict, &acc, mode, &mut offset, &mut tokens);
        }
        tokens
    }

    /// Segment a single buffer of segmentable characters into plain words.
    /// This is the entry point keyword extraction and other word-level
    /// consumers use; no normalization is applied here.
    pub fn sentence_process(&self, sentence: &str) -> Vec<String> {
        let dict = self.dict.read().expect("dictionary lock poisoned");
        let run: Vec<char> = sentence.chars().collect();
        let mut words = Vec::new();
        self.sentence_cut(&dict, &run, &mut words);
        words
    }

    /// Run one accumulated run through the route and emit mode-shaped
    /// tokens, advancing the offset cursor.
    fn flush_run(
        &self,
        dict: &WordDict,
        run: &[char],
        mode: SegMode,
        offset: &mut usize,
        tokens: &mut Vec<SegToken>,
    ) {
        let mut words = Vec::new();
        self.sentence_cut(dict, run, &mut words);

        for word in words {
            let word_chars: Vec<char> = word.chars().collect();
            let len = word_chars.len();
            if mode == SegMode::Index {
                if len > 2 {
                    for j in 0..len - 1 {
                        let gram: String = word_chars[j..j + 2].iter().collect();
                        if dict.contains(&gram) {
                            tokens.push(SegToken::new(gram, *offset + j, *offset + j + 2));
                        }
                    }
                }
                if len > 3 {
                    for j in 0..len - 2 {
                        let gram: String = word_chars[j..j + 3].iter().collect();
                        if dict.contains(&gram) {
                            tokens.push(SegToken::new(gram, *offset + j, *offset + j + 3));
                        }
                    }
                }
            }
            tokens.push(SegToken::new(word, *offset, *offset + len));
            *offset += len;
        }
    }

    /// DAG route walk with the HMM fallback on buffered unknown runs.
    fn sentence_cut(&self, dict: &WordDict, sentence: &[char], out: &mut Vec<String>) {
        let n = sentence.len();
        if n == 0 {
            return;
        }
        let dag = build_dag(dict, sentence);
        let route = calc_route(dict, sentence, &dag);

        // singletons buffer up so adjacent unknowns can be re-joined
        let mut buffered: Vec<char> = Vec::new();
        let mut x = 0;
        while x < n {
            let y = route[x].0 + 1;
            if y - x == 1 {
                buffered.push(sentence[x]);
            } else {
                if !buffered.is_empty() {
                    self.flush_buffered(dict, &buffered, out);
                    buffered.clear();
                }
                out.push(sentence[x..y].iter().collect());
            }
            x = y;
        }
        if !buffered.is_empty() {
            self.flush_buffered(dict, &buffered, out);
        }
    }

    fn flush_buffered(&self, dict: &WordDict, buffered: &[char], out: &mut Vec<String>) {
        if buffered.len() == 1 {
            out.push(buffered[0].to_string());
            return;
        }
        let joined: String = buffered.iter().collect();
        if dict.contains(&joined) {
            out.push(joined);
        } else {
            viterbi::cut(&self.hmm, self.hmm_active(), &joined, out);
        }
    }
}
