use thiserror::Error;

/// The only two failure kinds `QueryService` surfaces. Extraction misses
/// are not errors; they degrade to sentinel field values instead.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Malformed caller input, rejected before the agent is invoked.
    #[error("{0}")]
    Validation(String),
    /// The reasoning-loop invocation itself failed; wraps the cause.
    #[error("Erro na execução da consulta: {0}")]
    Execution(#[source] anyhow::Error),
}
