//! TF-IDF keyword extraction on top of the segmenter.
//!
//! The analyzer holds a stop-word set and an IDF table loaded once at
//! startup. A document is segmented with
//! [`Segmenter::sentence_process`](crate::Segmenter::sentence_process),
//! stop words and single-character tokens are dropped, term frequency is
//! computed over what remains, and each term is weighted by its IDF value
//! with the table median standing in for unseen terms.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use libhanseg_core::{DictError, Result};

use crate::segmenter::Segmenter;

/// One extracted keyword with its TF-IDF weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub weight: f64,
}

/// TF-IDF analyzer. Immutable after construction.
#[derive(Debug)]
pub struct TfIdfAnalyzer {
    idf: HashMap<String, f64>,
    idf_median: f64,
    stop_words: HashSet<String>,
}

impl TfIdfAnalyzer {
    /// Load the IDF table (`word<WS>idf` lines) and the stop-word list
    /// (one word per line) from readers.
    pub fn from_readers<R1: BufRead, R2: BufRead>(idf: R1, stop_words: R2) -> Result<Self> {
        let mut table = HashMap::new();
        for line in idf.lines() {
            let line = line?;
            let mut fields = line.split_whitespace();
            let (word, value) = match (fields.next(), fields.next()) {
                (Some(w), Some(v)) => (w, v),
                _ => continue,
            };
            match value.parse::<f64>() {
                Ok(v) => {
                    table.insert(word.to_string(), v);
                }
                Err(_) => {
                    eprintln!("warning: idf table: skipping unparsable line {:?}", line);
                }
            }
        }
        if table.is_empty() {
            return Err(DictError::InvalidFormat {
                source_name: "idf table".into(),
                reason: "no usable entries".into(),
            });
        }

        let mut values: Vec<f64> = table.values().copied().collect();
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idf_median = values[values.len() / 2];

        let mut stops = HashSet::new();
        for line in stop_words.lines() {
            let line = line?;
            let word = line.trim();
            if !word.is_empty() {
                stops.insert(word.to_string());
            }
        }

        Ok(Self {
            idf: table,
            idf_median,
            stop_words: stops,
        })
    }

    /// Load the IDF table and stop-word list from file paths.
    pub fn from_paths<P: AsRef<Path>>(idf: P, stop_words: P) -> Result<Self> {
        let idf = BufReader::new(File::open(idf)?);
        let stop_words = BufReader::new(File::open(stop_words)?);
        Self::from_readers(idf, stop_words)
    }

    /// Extract the `top_n` highest-weighted keywords from `content`.
    pub fn analyze(&self, segmenter: &Segmenter, content: &str, top_n: usize) -> Vec<Keyword> {
        let mut keywords: Vec<Keyword> = self
            .term_frequencies(segmenter, content)
            .into_iter()
            .map(|(word, tf)| {
                let idf = self.idf.get(&word).copied().unwrap_or(self.idf_median);
                Keyword {
                    name: word,
                    weight: idf * tf,
                }
            })
            .collect();

        keywords.sort_by(|a, b| {
            b.weight
                .partial_cmp(&a.weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.cmp(&b.name))
        });
        keywords.truncate(top_n);
        keywords
    }

    /// Term frequency over the segmented document: stop words and
    /// single-character tokens do not count.
    fn term_frequencies(&self, segmenter: &Segmenter, content: &str) -> HashMap<String, f64> {
        let mut tf = HashMap::new();
        if content.is_empty() {
            return tf;
        }

        let mut counts: HashMap<String, u64> = HashMap::new();
        let mut word_sum = 0u64;
        for word in segmenter.sentence_process(content) {
            if self.stop_words.contains(&word) || word.chars().count() <= 1 {
                continue;
            }
            word_sum += 1;
            *counts.entry(word).or_insert(0) += 1;
        }
        if word_sum == 0 {
            return tf;
        }

        for (word, count) in counts {
            tf.insert(word, count as f64 * 0.1 / word_sum as f64);
        }
        tf
    }
}
