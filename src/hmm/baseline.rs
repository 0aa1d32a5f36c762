use std::collections::HashMap;

use crate::corpus::{Dataset, END, START};
use crate::error::{Error, Result};
use crate::hmm::tagger::Tagger;
use crate::quark::{Quark, StringTable};

/// Frequency-lookup tagger: every word gets the tag it was most often seen
/// with in training; unseen words get the globally most frequent tag.
///
/// No smoothing, no probabilities — count tables only. Sentinel pairs are
/// counted per word (so `START` maps back to `START`), but the global
/// fallback considers non-sentinel tags only.
#[derive(Debug)]
pub struct BaselineTagger {
    tags: Quark,
    /// Per-word counts, dense over tag ids.
    seen: HashMap<String, Vec<u64>>,
    /// Globally most frequent non-sentinel tag.
    fallback: usize,
}

impl BaselineTagger {
    /// Accumulates the count tables. The training set must be non-empty and
    /// contain at least one non-sentinel tag.
    pub fn train(ds: &Dataset) -> Result<Self> {
        if ds.is_empty() {
            return Err(Error::EmptyTrainingSet);
        }
        let l = ds.tags.len();
        let mut seen: HashMap<String, Vec<u64>> = HashMap::new();
        let mut totals = vec![0u64; l];
        for sent in &ds.sents {
            for (word, &tid) in sent.words.iter().zip(sent.tags.iter()) {
                seen.entry(word.clone()).or_insert_with(|| vec![0; l])[tid] += 1;
                totals[tid] += 1;
            }
        }

        let mut fallback = None;
        let mut best = 0;
        for (tid, &count) in totals.iter().enumerate() {
            let tag = ds.tags.to_str(tid).expect("tag id out of vocabulary");
            if tag == START || tag == END {
                continue;
            }
            if fallback.is_none() || best < count {
                fallback = Some(tid);
                best = count;
            }
        }
        let fallback = fallback.ok_or(Error::EmptyTrainingSet)?;

        Ok(Self {
            tags: ds.tags.clone(),
            seen,
            fallback,
        })
    }
}

impl Tagger for BaselineTagger {
    fn tag(&mut self, words: &[String]) -> Result<Vec<(String, String)>> {
        let mut tagged = Vec::with_capacity(words.len());
        for word in words {
            let tid = match self.seen.get(word) {
                Some(counts) => argmax(counts),
                None => self.fallback,
            };
            let tag = self.tags.to_str(tid).expect("tag id out of vocabulary");
            tagged.push((word.clone(), tag.to_string()));
        }
        Ok(tagged)
    }
}

/// Index of the largest count; ties break toward the lowest tag id.
fn argmax(counts: &[u64]) -> usize {
    let mut best = 0;
    let mut best_count = 0;
    for (id, &count) in counts.iter().enumerate() {
        if best_count < count {
            best_count = count;
            best = id;
        }
    }
    best
}
