use thiserror::Error;

/// Failures surfaced by the optimization pipeline.
///
/// A degenerate preference table (no usable voters) is not an error; the
/// consensus ranker falls back to a neutral popularity instead. Partial
/// schedules are never returned alongside any of these.
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// An input table does not have the expected shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// The assignment program was not certified optimal within budget.
    #[error("no certified optimal schedule: {0}")]
    Unsolved(String),
    /// The optimization backend itself failed.
    #[error("solver backend failure: {0}")]
    SolverFault(String),
}
