// src/record.rs
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One row of the report, keyed by column name.
///
/// Columns keep the order of the page's header row. Equality ignores that
/// order: two records are equal when they carry the same columns with the
/// same values.
#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

/// Every row seen as of one successful fetch, in page order.
pub type Snapshot = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set `col` to `val`. A repeated column overwrites the earlier value in place.
    pub fn insert(&mut self, col: impl Into<String>, val: impl Into<String>) {
        let col = col.into();
        let val = val.into();
        match self.fields.iter_mut().find(|(c, _)| *c == col) {
            Some((_, v)) => *v = val,
            None => self.fields.push((col, val)),
        }
    }

    pub fn remove(&mut self, col: &str) -> Option<String> {
        let ix = self.fields.iter().position(|(c, _)| c == col)?;
        Some(self.fields.remove(ix).1)
    }

    pub fn get(&self, col: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == col)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, col: &str) -> bool {
        self.get(col).is_some()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().all(|(c, v)| other.get(c) == Some(v.as_str()))
    }
}

impl Eq for Record {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = Record::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (c, v) in self.iter() {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}
