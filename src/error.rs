/// Errors that can occur while configuring or running a selection.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    /// Rejected before any episode starts.
    InvalidConfiguration(String),
    /// No un-included feature remains to sample from a state at this depth.
    ExplorationExhausted { depth: usize },
    /// The classifier failed or produced a non-finite score.
    EvaluationFailure(String),
    /// The dataset is malformed or cannot be read.
    InvalidDataset(String),
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfiguration(s) => write!(f, "invalid configuration: {}", s),
            Self::ExplorationExhausted { depth } => {
                write!(f, "no feature left to explore at depth {}", depth)
            }
            Self::EvaluationFailure(s) => write!(f, "evaluation failure: {}", s),
            Self::InvalidDataset(s) => write!(f, "invalid dataset: {}", s),
        }
    }
}

impl std::error::Error for SelectionError {}
