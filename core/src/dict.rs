//! Word dictionary: the lexicon trie plus the word frequency table.
//!
//! The main dictionary is a UTF-8 text file with one `word freq [tag]`
//! entry per line (tab or space separated, trailing POS tag ignored). Raw
//! frequencies are summed into `total` during the pass and every stored
//! value then becomes `ln(freq / total)`; `min_log`, the smallest stored
//! value, is the score handed out for unknown spans.
//!
//! User dictionaries reuse the line format with an optional frequency
//! (the caller supplies the default, 3.0 unless configured otherwise) and
//! are normalized against the already-finalized `total`, so loading them
//! never shifts the main distribution. Every file is loaded at most once,
//! keyed by absolute path.
//!
//! Public API:
//! - [`WordDict::from_main_reader`] / [`WordDict::from_main_path`]
//! - [`WordDict::load_user_reader`] / [`WordDict::load_user_path`]
//! - [`WordDict::init_user_dict_dir`] / [`WordDict::init_user_dict_paths`]
//! - [`WordDict::contains`] / [`WordDict::freq`] / [`WordDict::trie`]
//! - [`WordDict::reset`]
//! - [`WordDict::save_cache`] / [`WordDict::load_cache`]

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{DictError, Result};
use crate::trie::TrieNode;

/// Default file suffix scanned for in a user dictionary directory; the
/// configuration can override it per engine.
pub const USER_DICT_SUFFIX: &str = "dict";

/// Default frequency for user dictionary entries that do not carry one;
/// the configuration can override it per engine.
pub const DEFAULT_USER_FREQ: f64 = 3.0;

/// Serialized form of a finalized dictionary, used by the compiled cache.
#[derive(Debug, Serialize, Deserialize)]
struct DictSnapshot {
    words: Vec<(String, f64)>,
    total: f64,
    min_log: f64,
}

/// Lexicon trie and word frequency table, immutable during segmentation.
#[derive(Debug)]
pub struct WordDict {
    trie: TrieNode,
    freqs: HashMap<String, f64>,
    total: f64,
    min_log: f64,
    loaded_paths: HashSet<PathBuf>,
}

impl WordDict {
    /// Create an empty dictionary. Every lookup scores `min_log` (0.0 here),
    /// so this is only a starting point for the loaders.
    pub fn new() -> Self {
        Self {
            trie: TrieNode::new(),
            freqs: HashMap::new(),
            total: 0.0,
            min_log: 0.0,
            loaded_paths: HashSet::new(),
        }
    }

    /// Load the main dictionary from a reader.
    ///
    /// Lines with fewer than two fields are skipped; lines whose frequency
    /// does not parse are skipped with a warning. Words are trimmed and
    /// lower-cased before insertion.
    pub fn from_main_reader<R: BufRead>(reader: R, source_name: &str) -> Result<Self> {
        let mut dict = Self::new();
        let mut raw: Vec<(String, f64)> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let mut fields = split_fields(&line);
            let (word, freq) = match (fields.next(), fields.next()) {
                (Some(w), Some(f)) => (w, f),
                _ => continue,
            };
            let freq: f64 = match freq.parse() {
                Ok(f) => f,
                Err(_) => {
                    eprintln!("warning: {}: skipping unparsable line {:?}", source_name, line);
                    continue;
                }
            };
            let word = match normalize_word(word)? {
                Some(w) => w,
                None => continue,
            };
            dict.total += freq;
            raw.push((word, freq));
        }

        for (word, freq) in raw {
            let log_p = (freq / dict.total).ln();
            dict.insert_entry(word, log_p);
        }
        dict.min_log = dict
            .freqs
            .values()
            .copied()
            .fold(f64::MAX, f64::min);
        if dict.freqs.is_empty() {
            return Err(DictError::format(source_name, "no usable entries"));
        }
        Ok(dict)
    }

    /// Load the main dictionary from a file path.
    pub fn from_main_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Self::from_main_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Merge a user dictionary from a reader. Returns the number of entries
    /// added. Entries without a frequency field get `default_freq`; values
    /// are normalized against the frozen main `total`.
    pub fn load_user_reader<R: BufRead>(
        &mut self,
        reader: R,
        source_name: &str,
        default_freq: f64,
    ) -> Result<usize> {
        let mut count = 0usize;
        for line in reader.lines() {
            let line = line?;
            let mut fields = split_fields(&line);
            let word = match fields.next() {
                Some(w) => w,
                None => continue,
            };
            let freq = match fields.next() {
                Some(f) => match f.parse::<f64>() {
                    Ok(v) => v,
                    Err(_) => {
                        eprintln!(
                            "warning: {}: skipping unparsable line {:?}",
                            source_name, line
                        );
                        continue;
                    }
                },
                None => default_freq,
            };
            let word = match normalize_word(word)? {
                Some(w) => w,
                None => continue,
            };
            self.insert_entry(word, (freq / self.total).ln());
            count += 1;
        }
        Ok(count)
    }

    /// Merge a user dictionary file, at most once per absolute path.
    pub fn load_user_path<P: AsRef<Path>>(&mut self, path: P, default_freq: f64) -> Result<usize> {
        let path = path.as_ref();
        let key = absolute(path);
        if self.loaded_paths.contains(&key) {
            return Ok(0);
        }
        let file = File::open(path)?;
        let count = self.load_user_reader(
            BufReader::new(file),
            &path.display().to_string(),
            default_freq,
        )?;
        self.loaded_paths.insert(key);
        Ok(count)
    }

    /// Load every `*.<suffix>` file in a directory, once per absolute path.
    /// Individual files that fail to load are skipped with a warning.
    pub fn init_user_dict_dir<P: AsRef<Path>>(
        &mut self,
        dir: P,
        suffix: &str,
        default_freq: f64,
    ) -> Result<usize> {
        let dir = dir.as_ref();
        let key = absolute(dir);
        if self.loaded_paths.contains(&key) {
            return Ok(0);
        }
        let entries =
            std::fs::read_dir(dir).map_err(|_| DictError::BadDictDir(dir.to_path_buf()))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(suffix))
            .collect();
        paths.sort();

        let mut count = 0usize;
        for path in paths {
            match self.load_user_path(&path, default_freq) {
                Ok(n) => count += n,
                Err(e) => eprintln!("warning: {}: user dict load failed: {}", path.display(), e),
            }
        }
        self.loaded_paths.insert(key);
        Ok(count)
    }

    /// Load an explicit list of user dictionary files, each at most once.
    /// Failures are skipped with a warning.
    pub fn init_user_dict_paths<P: AsRef<Path>>(&mut self, paths: &[P], default_freq: f64) -> usize {
        let mut count = 0usize;
        for path in paths {
            match self.load_user_path(path, default_freq) {
                Ok(n) => count += n,
                Err(e) => eprintln!(
                    "warning: {}: user dict load failed: {}",
                    path.as_ref().display(),
                    e
                ),
            }
        }
        count
    }

    /// Replace the lexicon with an empty root and clear the frequency
    /// table. `total` and `min_log` are kept, so user dictionaries layered
    /// afterwards still normalize against the finalized main total.
    pub fn reset(&mut self) {
        self.trie = TrieNode::new();
        self.freqs.clear();
    }

    /// True if the exact word is in the frequency table.
    pub fn contains(&self, word: &str) -> bool {
        self.freqs.contains_key(word)
    }

    /// Log-probability for a word; unknown words get the `min_log` floor.
    pub fn freq(&self, word: &str) -> f64 {
        self.freqs.get(word).copied().unwrap_or(self.min_log)
    }

    /// The floor handed out for unknown spans.
    pub fn min_log(&self) -> f64 {
        self.min_log
    }

    /// Sum of raw frequencies of the main dictionary.
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.freqs.len()
    }

    /// True when no words are loaded.
    pub fn is_empty(&self) -> bool {
        self.freqs.is_empty()
    }

    /// The lexicon trie, probed by the DAG builder.
    pub fn trie(&self) -> &TrieNode {
        &self.trie
    }

    /// Save the finalized dictionary as a bincode cache.
    pub fn save_cache<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let snapshot = DictSnapshot {
            words: self.freqs.iter().map(|(w, p)| (w.clone(), *p)).collect(),
            total: self.total,
            min_log: self.min_log,
        };
        let file = File::create(path)?;
        bincode::serialize_into(BufWriter::new(file), &snapshot)
            .map_err(|e| DictError::format("dict cache", e.to_string()))?;
        Ok(())
    }

    /// Load a dictionary cache written by [`WordDict::save_cache`],
    /// rebuilding the trie from the stored words.
    pub fn load_cache<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let snapshot: DictSnapshot = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| DictError::format("dict cache", e.to_string()))?;
        let mut dict = Self::new();
        dict.total = snapshot.total;
        dict.min_log = snapshot.min_log;
        for (word, log_p) in snapshot.words {
            dict.insert_entry(word, log_p);
        }
        Ok(dict)
    }

    fn insert_entry(&mut self, word: String, log_p: f64) {
        self.trie.insert(&word);
        self.freqs.insert(word, log_p);
    }
}

impl Default for WordDict {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a dictionary line on runs of tabs and spaces.
fn split_fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c| c == '\t' || c == ' ').filter(|s| !s.is_empty())
}

/// Trim and lower-case a word field. Returns `Ok(None)` for fields that end
/// up empty, and an error for words containing U+0000 (the trie root
/// reserves it).
fn normalize_word(word: &str) -> Result<Option<String>> {
    let word = word.trim();
    if word.is_empty() {
        return Ok(None);
    }
    if word.contains('\0') {
        return Err(DictError::word(word, "contains U+0000"));
    }
    Ok(Some(word.to_lowercase()))
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
