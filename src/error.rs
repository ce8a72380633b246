use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// The view state points at an id the catalog does not hold.
    #[error("inconsistent view state: selected metric {0} is not in the catalog")]
    InconsistentState(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("invalid asset path: {0}")]
    InvalidAssetPath(String),

    #[error("asset not found: {0}")]
    AssetNotFound(String),

    #[error("session store full: {0} live sessions")]
    SessionsFull(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("data error: {0}")]
    Data(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
