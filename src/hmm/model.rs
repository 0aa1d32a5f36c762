use std::{collections::HashMap, fs::File, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::quark::{Quark, StringTable};

/// Result of an emission-table lookup: either the word was observed with the
/// tag during training, or it resolves to the tag's reserved unknown bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Emission {
    Found(f64),
    Unknown(f64),
}

impl Emission {
    pub fn log_prob(self) -> f64 {
        match self {
            Emission::Found(lp) | Emission::Unknown(lp) => lp,
        }
    }

    pub fn is_unknown(self) -> bool {
        matches!(self, Emission::Unknown(_))
    }
}

/// Trained HMM parameters, all natural-log probabilities.
///
/// The tables are read-only for the lifetime of decoding; `START` is not part
/// of the tag vocabulary (it only anchors the initial distribution).
#[derive(Debug, Serialize, Deserialize)]
pub struct HmmModel {
    pub(crate) tags: Quark,
    /// log P(tag opens a sentence), a [L] vector indexed by tag id.
    pub(crate) initial: Vec<f64>,
    /// log P(curr | prev), a [L][L] matrix stored row-major `[prev * L + curr]`.
    pub(crate) trans: Vec<f64>,
    /// log P(word | tag) for the words observed with each tag.
    pub(crate) emit: Vec<HashMap<String, f64>>,
    /// Per-tag unknown-word bucket: the smoothed zero-count emission mass.
    pub(crate) emit_unk: Vec<f64>,
}

impl HmmModel {
    pub fn num_tags(&self) -> usize {
        self.tags.len()
    }

    pub fn tags(&self) -> &Quark {
        &self.tags
    }

    pub fn initial(&self, tid: usize) -> f64 {
        self.initial[tid]
    }

    pub fn transition(&self, prev: usize, curr: usize) -> f64 {
        self.trans[self.tags.len() * prev + curr]
    }

    pub fn unknown(&self, tid: usize) -> f64 {
        self.emit_unk[tid]
    }

    /// Looks up the emission log-probability of `word` under tag `tid`.
    /// Words never seen with the tag resolve to its unknown bucket.
    pub fn emission(&self, tid: usize, word: &str) -> Emission {
        match self.emit[tid].get(word) {
            Some(&lp) => Emission::Found(lp),
            None => Emission::Unknown(self.emit_unk[tid]),
        }
    }

    pub fn dump(&self, path: &Path) -> Result<()> {
        let f = File::create(path)?;
        serde_json::to_writer(f, self)?;
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let f = File::open(path)?;
        Ok(serde_json::from_reader(f)?)
    }
}
