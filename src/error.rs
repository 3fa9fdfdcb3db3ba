use std::path::PathBuf;

use thiserror::Error;

use crate::session::SessionId;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("failed to read asset {}", path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

pub type Result<T, E = ChatError> = std::result::Result<T, E>;
