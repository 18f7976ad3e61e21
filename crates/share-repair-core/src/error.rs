use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("type is not recognised, allowed: all|invalid-owner|invalid-initiator")]
    UnrecognisedScope(String),

    #[error("Malformed storage identifier: {0}")]
    MalformedIdentifier(String),

    #[error("Unable to resolve user folder for '{0}'")]
    UnresolvableUser(String),

    #[error("File cache parent chain of file {0} loops back on itself")]
    FileCacheCycle(i64),

    #[error("Share {0} not found")]
    ShareNotFound(i64),

    #[error("Failed to {action} share {share_id}: {source}")]
    StoreMutation {
        share_id: i64,
        action: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn mutation(share_id: i64, action: &'static str, source: Error) -> Self {
        Error::StoreMutation {
            share_id,
            action,
            source: Box::new(source),
        }
    }
}
