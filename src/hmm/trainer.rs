use std::collections::HashMap;

use crate::corpus::{Dataset, START};
use crate::error::{Error, Result};
use crate::hmm::model::HmmModel;
use crate::quark::{Quark, StringTable, TextVectorizer};

/// Additive smoothing constant applied to every count before the log.
pub const DEFAULT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy)]
pub struct TrainOpt {
    /// Laplace smoothing constant; must be positive so no table entry is log(0).
    pub epsilon: f64,
}

impl Default for TrainOpt {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Raw occurrence counts accumulated over one pass of the training corpus.
#[derive(Debug, Default)]
struct Counts {
    /// Tag vocabulary, `START` excluded, first-seen order.
    tags: Quark,
    /// Count of the tag opening each sentence (the pair after `START`).
    initial: Vec<u64>,
    /// Transition counts keyed by (prev, curr) tag id.
    trans: HashMap<(usize, usize), u64>,
    /// Per-tag word counts.
    emit: Vec<HashMap<String, u64>>,
    /// Total tokens per tag.
    totals: Vec<u64>,
}

fn accumulate(ds: &Dataset) -> Counts {
    let mut counts = Counts::default();
    // Fix the model's tag vocabulary up front: every corpus tag except the
    // start sentinel, in corpus interning order.
    let remap: Vec<Option<usize>> = ds
        .tags
        .strings()
        .iter()
        .map(|s| {
            if s.as_str() == START {
                None
            } else {
                Some(counts.tags.find_or_insert(s))
            }
        })
        .collect();
    let l = counts.tags.len();
    counts.initial.resize(l, 0);
    counts.totals.resize(l, 0);
    counts.emit.resize_with(l, HashMap::new);

    for sent in &ds.sents {
        let mut prev: Option<usize> = None;
        for (word, &dtid) in sent.words.iter().zip(sent.tags.iter()) {
            let tid = match remap[dtid] {
                Some(t) => t,
                None => {
                    prev = None;
                    continue;
                }
            };
            counts.totals[tid] += 1;
            *counts.emit[tid].entry(word.clone()).or_insert(0) += 1;
            match prev {
                // The pair following the start sentinel belongs to the
                // initial distribution, not the transition table.
                None => counts.initial[tid] += 1,
                Some(p) => *counts.trans.entry((p, tid)).or_insert(0) += 1,
            }
            prev = Some(tid);
        }
    }
    counts
}

pub fn train(ds: &Dataset) -> Result<HmmModel> {
    train_with(ds, TrainOpt::default())
}

/// Builds the smoothed log-probability tables from a tagged corpus.
///
/// Every cell is `log((count + eps) / (total + eps * (L + 1)))`; the
/// per-tag unknown bucket gets the zero-count mass of the same row, so no
/// decoder lookup can ever produce `log(0)`.
pub fn train_with(ds: &Dataset, opt: TrainOpt) -> Result<HmmModel> {
    debug_assert!(opt.epsilon > 0.0, "epsilon must be positive");
    if ds.is_empty() {
        return Err(Error::EmptyTrainingSet);
    }
    let counts = accumulate(ds);
    let l = counts.tags.len();
    if l == 0 {
        return Err(Error::EmptyTrainingSet);
    }
    let eps = opt.epsilon;
    let smooth = |count: u64, total: u64| -> f64 {
        ((count as f64 + eps) / (total as f64 + eps * (l as f64 + 1.0))).ln()
    };

    let initial_total: u64 = counts.initial.iter().sum();
    let initial: Vec<f64> = counts
        .initial
        .iter()
        .map(|&c| smooth(c, initial_total))
        .collect();

    let mut trans = vec![0.0; l * l];
    for p in 0..l {
        let row_total: u64 = (0..l)
            .map(|c| counts.trans.get(&(p, c)).copied().unwrap_or(0))
            .sum();
        for c in 0..l {
            let count = counts.trans.get(&(p, c)).copied().unwrap_or(0);
            trans[l * p + c] = smooth(count, row_total);
        }
    }

    let mut emit = Vec::with_capacity(l);
    let mut emit_unk = Vec::with_capacity(l);
    for t in 0..l {
        let total = counts.totals[t];
        emit.push(
            counts.emit[t]
                .iter()
                .map(|(w, &c)| (w.clone(), smooth(c, total)))
                .collect::<HashMap<String, f64>>(),
        );
        emit_unk.push(smooth(0, total));
    }

    log::info!(
        "trained hmm model (L: {}, N: {}, tokens: {})",
        l,
        ds.len(),
        ds.total_words()
    );
    Ok(HmmModel {
        tags: counts.tags,
        initial,
        trans,
        emit,
        emit_unk,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hmm::model::Emission;

    fn corpus() -> Dataset {
        let s = "START=START the=DET dog=NOUN runs=VERB END=END\n\
                 START=START the=DET cat=NOUN runs=VERB END=END";
        Dataset::from(s.lines())
    }

    #[test]
    fn start_excluded_from_vocabulary() {
        let model = train(&corpus()).unwrap();
        assert_eq!(model.tags().to_id(START), None);
        assert_eq!(model.tags().to_id("DET"), Some(0));
        assert_eq!(model.num_tags(), 4);
    }

    #[test]
    fn tables_are_valid_log_probs() {
        let model = train(&corpus()).unwrap();
        let l = model.num_tags();
        for i in 0..l {
            assert!(model.initial(i).is_finite() && model.initial(i) < 0.0);
            assert!(model.unknown(i).is_finite() && model.unknown(i) < 0.0);
            for j in 0..l {
                let lp = model.transition(i, j);
                assert!(lp.is_finite() && lp < 0.0);
            }
            for lp in model.emit[i].values() {
                assert!(lp.is_finite() && *lp < 0.0);
            }
        }
    }

    #[test]
    fn initial_favors_observed_opening_tag() {
        let model = train(&corpus()).unwrap();
        let det = model.tags().to_id("DET").unwrap();
        let verb = model.tags().to_id("VERB").unwrap();
        assert!(model.initial(det) > model.initial(verb));
    }

    #[test]
    fn observed_transition_outscores_unobserved() {
        let model = train(&corpus()).unwrap();
        let det = model.tags().to_id("DET").unwrap();
        let noun = model.tags().to_id("NOUN").unwrap();
        let verb = model.tags().to_id("VERB").unwrap();
        assert!(model.transition(det, noun) > model.transition(det, verb));
        assert!(model.transition(noun, verb) > model.transition(noun, det));
    }

    #[test]
    fn unknown_bucket_below_observed_emission() {
        let model = train(&corpus()).unwrap();
        let noun = model.tags().to_id("NOUN").unwrap();
        match model.emission(noun, "dog") {
            Emission::Found(lp) => assert!(lp > model.unknown(noun)),
            Emission::Unknown(_) => panic!("dog was observed with NOUN"),
        }
        assert!(model.emission(noun, "zebra").is_unknown());
        assert_eq!(model.emission(noun, "zebra").log_prob(), model.unknown(noun));
    }

    #[test]
    fn empty_training_set_rejected() {
        let ds = Dataset::default();
        assert!(matches!(train(&ds), Err(Error::EmptyTrainingSet)));
    }

    #[test]
    fn custom_epsilon() {
        let model = train_with(&corpus(), TrainOpt { epsilon: 1e-3 }).unwrap();
        let noun = model.tags().to_id("NOUN").unwrap();
        // A larger epsilon moves more mass onto the unknown bucket.
        let default = train(&corpus()).unwrap();
        assert!(model.unknown(noun) > default.unknown(noun));
    }
}
