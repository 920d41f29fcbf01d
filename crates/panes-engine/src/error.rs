// ABOUTME: Error type for engine operations that can fail as a whole.
// ABOUTME: The bool-returning API logs these and reports false.

use panes_core::SessionError;
use panes_layout::{CodecError, LayoutError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Session document error: {0}")]
    Codec(#[from] CodecError),

    #[error("Session file error: {0}")]
    Session(#[from] SessionError),

    #[error("Session contains no panes")]
    EmptySession,
}
