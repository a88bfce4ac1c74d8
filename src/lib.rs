//! # Guestbook
//!
//! Guestbook wall: fetches a JSON manifest of contributor-submitted
//! messages and serves them as a rendered page with empty and error states.
//!
//! The pipeline is a single data-flow path, refreshed at startup and on a
//! fixed interval:
//!
//! ```text
//! refresh task -> manifest loader -> normalize/sort -> render -> page view
//!                                                                  ^
//!                                                   HTTP handlers -+ (read only)
//! ```
//!
//! ## Modules
//!
//! - [`manifest`]: manifest fetching, lenient decoding, normalization and
//!   ordering
//! - [`render`]: pure markup functions for the list, empty, and error states
//! - [`view`]: the shared page container with stale-commit protection
//! - [`refresh`]: the load-cycle scheduler
//! - [`api`]: Axum router serving the page and operational endpoints
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use guestbook::api::{serve, AppState};
//! use guestbook::config::Config;
//! use guestbook::manifest::ManifestLoader;
//! use guestbook::view::PageView;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let loader = Arc::new(ManifestLoader::new(&config.manifest));
//!     let view = Arc::new(PageView::new());
//!
//!     guestbook::refresh::spawn(
//!         loader,
//!         Arc::clone(&view),
//!         Duration::from_secs(config.manifest.refresh_interval_secs),
//!     );
//!
//!     serve(AppState::new(view), &config.server).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod manifest;
pub mod refresh;
pub mod render;
pub mod view;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState, StatusResponse};
pub use config::{Config, ConfigError, LoggingConfig, ManifestConfig, ServerConfig};
pub use manifest::{Manifest, ManifestError, ManifestLoader, Message, RawMessage};
pub use view::{CycleOutcome, CyclePhase, PageView, RefreshStatus};
