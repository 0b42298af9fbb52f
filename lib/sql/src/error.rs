use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// The database was locked for longer than the configured busy timeout.
    /// Callers map this to their own timeout error; no partial work remains.
    #[error("busy: {0}")]
    Busy(String),
}
