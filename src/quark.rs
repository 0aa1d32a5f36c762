use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub trait StringTable {
    fn to_str(&self, id: usize) -> Option<&str>;
    fn to_id(&self, s: &str) -> Option<usize>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait TextVectorizer {
    fn find_or_insert(&mut self, key: &str) -> usize;
}

/// Interned string table with dense ids assigned in first-seen order.
///
/// The id order doubles as the deterministic iteration order used for
/// argmax tie-breaking: the lowest id wins.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Quark {
    v: Vec<String>,
    m: HashMap<String, usize>,
}

impl From<Vec<String>> for Quark {
    fn from(value: Vec<String>) -> Self {
        let m = value.iter().enumerate().map(|(i, s)| (s.to_string(), i)).collect();
        Self { v: value, m }
    }
}

impl From<Quark> for Vec<String> {
    fn from(value: Quark) -> Self {
        value.v
    }
}

impl StringTable for Quark {
    fn to_str(&self, id: usize) -> Option<&str> {
        self.v.get(id).map(|x| x.as_str())
    }

    fn to_id(&self, s: &str) -> Option<usize> {
        self.m.get(s).copied()
    }

    fn len(&self) -> usize {
        self.v.len()
    }
}

impl TextVectorizer for Quark {
    fn find_or_insert(&mut self, key: &str) -> usize {
        if let Some(&id) = self.m.get(key) {
            return id;
        }
        let idx = self.v.len();
        self.m.insert(key.to_string(), idx);
        self.v.push(key.to_string());
        idx
    }
}

impl Quark {
    pub fn strings(&self) -> &[String] {
        &self.v
    }
}
