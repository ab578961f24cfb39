#![forbid(unsafe_code)]

//! Browser host for Folio.
//!
//! Binds the `folio-core` page controller to the live document: event
//! listeners, intersection observers, timers, `localStorage`, and a
//! `tracing` subscriber that writes to the devtools console.

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod storage;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use dom::WebDom;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStore;
#[cfg(target_arch = "wasm32")]
pub use wasm::{FolioWeb, mount};

/// Placeholder host for non-browser targets. There is no document to bind to,
/// so the workspace builds and tests natively against `folio-core` alone.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
