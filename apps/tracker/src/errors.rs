use thiserror::Error;

use crate::gateway::GatewayError;
use crate::session::SessionError;

/// Errors surfaced by CLI commands.
///
/// View-level outcomes (conflicts, validation, unreachable server) are already
/// reported through the presenter; these are the failures that end a command
/// with a non-zero exit.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    ActionFailed(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Could not read resume file: {0}")]
    Io(#[from] std::io::Error),
}
