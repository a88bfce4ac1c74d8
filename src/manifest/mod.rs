//! Manifest Loading and Normalization
//!
//! The manifest is a JSON document listing contributor messages. This module
//! fetches it, decodes it leniently, and turns the raw records into
//! normalized, sorted messages ready for rendering.

pub mod loader;
pub mod model;
pub mod normalize;

pub use loader::{ManifestError, ManifestLoader};
pub use model::{Manifest, Message, RawMessage};
pub use normalize::{compare, normalize, parse_timestamp, sort};
