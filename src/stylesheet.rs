//! The stylesheet shared by every page, read once at startup and served from memory.

use std::{path::Path, sync::Arc};

use axum::{
    extract::{FromRef, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{AppState, Error};

/// The contents of a CSS file.
#[derive(Debug, Clone, PartialEq)]
pub struct Stylesheet(Arc<str>);

impl Stylesheet {
    /// Read the stylesheet at `path`.
    ///
    /// # Errors
    /// Returns an [Error::StylesheetUnavailable] if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let css = std::fs::read_to_string(path).map_err(|error| {
            Error::StylesheetUnavailable(format!("{}: {error}", path.display()))
        })?;

        tracing::debug!("Loaded {} bytes of CSS from {}", css.len(), path.display());

        Ok(Self(css.into()))
    }
}

impl From<&str> for Stylesheet {
    fn from(css: &str) -> Self {
        Self(css.into())
    }
}

impl FromRef<AppState> for Stylesheet {
    fn from_ref(state: &AppState) -> Self {
        state.stylesheet.clone()
    }
}

/// Serve the stylesheet.
pub async fn get_stylesheet(State(stylesheet): State<Stylesheet>) -> Response {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "max-age=3600"),
        ],
        stylesheet.0.to_string(),
    )
        .into_response()
}
