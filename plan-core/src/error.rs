use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Project {0} not found")]
    ProjectNotFound(String),
    #[error("Todo {0} not found")]
    TodoNotFound(String),
    #[error(transparent)]
    Store(#[from] anyhow::Error),
    #[error("malformed record at key `{key}`: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound(_) | Self::TodoNotFound(_))
    }
}
