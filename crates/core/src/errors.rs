use thiserror::Error;

/// A result type for benchmark errors
pub type Result<T> = std::result::Result<T, BenchError>;

/// An error raised by datasets, objectives, solvers or the benchmark driver
#[derive(Error, Debug)]
pub enum BenchError {
    /// When a dataset is asked for a test function it does not know
    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),
    /// When a point does not match the problem dimension
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    /// When a solver requiring bounds is given an unbounded problem
    #[error("Solver {0} requires bounds but the problem has none")]
    MissingBounds(String),
    /// When a solver method name is unknown
    #[error("Unsupported solver variant: {0}")]
    UnsupportedSolverVariant(String),
    /// When a result is requested before any run
    #[error("No result yet: run the solver first")]
    NoResultYet,
    /// When an objective or a solver is used before being bound to a problem
    #[error("Not configured: {0}")]
    NotConfigured(String),
    /// When a solver receives a budget kind it cannot handle
    #[error("Solver {solver} does not handle budget {budget}")]
    BudgetMismatch { solver: String, budget: String },
    /// When an invalid value is encountered
    #[error("Value error: {0}")]
    InvalidValue(String),
    /// When an argmin optimization fails
    #[error(transparent)]
    ArgminError(#[from] argmin::core::Error),
    /// When IO fails
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    /// When json (de)serialization fails
    #[error("Json error")]
    JsonError(#[from] serde_json::Error),
}
