use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the tagging core and its corpus/model I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// Training requires at least one sentence with a non-sentinel tag.
    #[error("empty training set")]
    EmptyTrainingSet,
    /// The sentence carries no token beyond the leading sentinel.
    #[error("sentence has no tokens beyond the start sentinel")]
    EmptySentence,
    /// The sentence does not begin with the `START` sentinel token.
    #[error("sentence does not begin with the start sentinel")]
    MissingSentinel,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("model serialization: {0}")]
    Model(#[from] serde_json::Error),
}
