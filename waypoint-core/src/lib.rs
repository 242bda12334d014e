pub mod random;

pub use random::{RandomOutcomeSource, ScriptedOutcomeSource, StdOutcomeSource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: i64, max: i64 },
    #[error("Cannot draw {length} characters from an empty alphabet")]
    EmptyAlphabet { length: usize },
}

pub type CoreResult<T> = Result<T, CoreError>;
