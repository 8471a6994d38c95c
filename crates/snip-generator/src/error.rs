use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    #[error("code length must be between 1 and {max}, got {got}")]
    InvalidLength { got: usize, max: usize },
    #[error("sequence generator needs at least one code")]
    EmptySequence,
    #[error("sequence contains an invalid code: {0}")]
    InvalidCode(String),
}
