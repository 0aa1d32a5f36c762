//! Statistical part-of-speech tagging.
//!
//! Two taggers share the [`Tagger`] seam: a frequency-lookup
//! [`BaselineTagger`] and an HMM decoder ([`HmmTagger`]) running the Viterbi
//! algorithm over smoothed log-probability tables produced by [`train`].

pub mod corpus;
pub mod error;
pub mod evaluation;
pub mod hmm;
pub mod quark;

pub use corpus::{wrap_utterance, Dataset, Sentence, END, START};
pub use error::{Error, Result};
pub use evaluation::{Estimation, Evaluation};
pub use hmm::baseline::BaselineTagger;
pub use hmm::model::{Emission, HmmModel};
pub use hmm::tagger::{HmmTagger, Tagger};
pub use hmm::trainer::{train, train_with, TrainOpt};
pub use quark::{Quark, StringTable};
