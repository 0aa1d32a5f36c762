use crate::corpus::START;
use crate::error::{Error, Result};
use crate::hmm::model::HmmModel;
use crate::hmm::trellis::{ResetOpt, Trellis};
use crate::quark::StringTable;

/// Common surface for the taggers: one untagged sentence in (leading `START`
/// token), the same sentence out as `(word, tag)` pairs.
pub trait Tagger {
    fn tag(&mut self, words: &[String]) -> Result<Vec<(String, String)>>;
}

/// Viterbi decoder over a trained [`HmmModel`].
///
/// The model is read-only; the trellis is owned per tagger, so independent
/// taggers over the same model may decode sentences concurrently.
pub struct HmmTagger<'a> {
    model: &'a HmmModel,
    trellis: Trellis,
}

impl<'a> HmmTagger<'a> {
    pub fn new(model: &'a HmmModel) -> Self {
        let l = model.num_tags();
        let mut trellis = Trellis::new(l);
        trellis.reset(ResetOpt::RF_TRANS);
        /* Transition and initial scores are fixed per model. */
        for i in 0..l {
            trellis.initial[i] = model.initial(i);
            for j in 0..l {
                trellis.trans[l * i + j] = model.transition(i, j);
            }
        }
        Self { model, trellis }
    }

    /// Fills the per-position state scores for the real tokens of `words`.
    fn set_sentence(&mut self, words: &[String]) {
        let l = self.model.num_tags();
        self.trellis.resize(words.len() - 1);
        self.trellis.reset(ResetOpt::RF_STATE);
        for (t, word) in words[1..].iter().enumerate() {
            for j in 0..l {
                self.trellis.state[l * t + j] += self.model.emission(j, word).log_prob();
            }
        }
    }
}

impl<'a> Tagger for HmmTagger<'a> {
    fn tag(&mut self, words: &[String]) -> Result<Vec<(String, String)>> {
        if words.first().map(|w| w.as_str()) != Some(START) {
            return Err(Error::MissingSentinel);
        }
        if words.len() < 2 {
            return Err(Error::EmptySentence);
        }
        self.set_sentence(words);
        let mut labels = vec![0; words.len() - 1];
        self.trellis.viterbi(&mut labels);

        let mut tagged = Vec::with_capacity(words.len());
        tagged.push((START.to_string(), START.to_string()));
        for (word, &tid) in words[1..].iter().zip(labels.iter()) {
            let tag = self
                .model
                .tags()
                .to_str(tid)
                .expect("tag id out of vocabulary");
            tagged.push((word.clone(), tag.to_string()));
        }
        Ok(tagged)
    }
}
