//! Occurrence counting and descending-count ranking.
//!
//! Values that share a count keep the order in which they first appeared
//! in the input, so the ranking is reproducible for a given sequence.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Count per distinct value, remembering first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<Ranked>,
    index: HashMap<String, usize>,
}

impl FrequencyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut table = Self::new();
        for value in values {
            table.add(value.as_ref());
        }
        table
    }

    pub fn add(&mut self, value: &str) {
        if let Some(&slot) = self.index.get(value) {
            self.entries[slot].count += 1;
        } else {
            self.index.insert(value.to_string(), self.entries.len());
            self.entries.push(Ranked {
                value: value.to_string(),
                count: 1,
            });
        }
    }

    #[must_use]
    pub fn count(&self, value: &str) -> usize {
        self.index
            .get(value)
            .map_or(0, |&slot| self.entries[slot].count)
    }

    /// Number of distinct values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of values added.
    #[must_use]
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &Ranked> {
        self.entries.iter()
    }

    #[must_use]
    pub fn ranked(&self) -> RankedList {
        let mut entries = self.entries.clone();
        // Stable sort keeps first-occurrence order among equal counts.
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        RankedList(entries)
    }
}

/// A value with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked {
    pub value: String,
    pub count: usize,
}

/// Values ordered by count, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList(Vec<Ranked>);

impl RankedList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().map(|r| r.count).sum()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Ranked] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ranked> {
        self.0.iter()
    }

    /// Keep only the first `n` entries.
    #[must_use]
    pub fn top(mut self, n: usize) -> Self {
        self.0.truncate(n);
        self
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Ranked> {
        self.0
    }
}

impl IntoIterator for RankedList {
    type Item = Ranked;
    type IntoIter = std::vec::IntoIter<Ranked>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RankedList {
    type Item = &'a Ranked;
    type IntoIter = std::slice::Iter<'a, Ranked>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Tally `values` and order them by descending count.
#[must_use]
pub fn rank<I>(values: I) -> RankedList
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    FrequencyTable::from_values(values).ranked()
}
