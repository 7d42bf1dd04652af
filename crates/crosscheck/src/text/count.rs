//! Word frequency table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Occurrence count per word, ordered by word so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordCount {
    counts: BTreeMap<String, usize>,
}

impl WordCount {
    /// Count whitespace-separated tokens in `text`.
    pub fn from_text(text: &str) -> Self {
        let mut counts = BTreeMap::new();
        for word in text.split_whitespace() {
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }
        Self { counts }
    }

    /// Number of distinct words.
    pub fn unique(&self) -> usize {
        self.counts.len()
    }

    /// Sum of all counts, i.e. the number of tokens seen.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.counts.get(word).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(w, c)| (w.as_str(), *c))
    }
}

/// One `word:count` line per entry.
impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (word, count) in self.iter() {
            writeln!(f, "{word}:{count}")?;
        }
        Ok(())
    }
}
