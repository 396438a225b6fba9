// error.rs - Error types
//
// The engine and generator never fail; they clamp. Errors only exist at the
// edges: reading configuration and setting up a backend.

use thiserror::Error;

use crate::render::BackendKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid wallpaper config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown backend '{0}'")]
    UnknownBackend(String),
}

/// Setup failure for one backend. Terminal for that backend only; the
/// caller may pick another kind.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no factory registered for backend {0}")]
    Unregistered(BackendKind),

    #[error("backdrop texture unavailable ({width}x{height})")]
    BackdropUnavailable { width: usize, height: usize },

    #[error("viewport {width}x{height} exceeds the pixel buffer limit")]
    ViewportTooLarge { width: u32, height: u32 },
}
