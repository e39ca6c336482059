use thiserror::Error;

#[derive(Debug, Error)]
pub enum CutSiteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed nuclease catalogue entry
    #[error("catalogue error: {0}")]
    Catalog(String),

    /// A registered match handler failed; the scan stopped at `offset`
    #[error("match handler failed at offset {offset}: {cause:#}")]
    Handler { offset: usize, cause: anyhow::Error },
}

pub type Result<T, E = CutSiteError> = std::result::Result<T, E>;
