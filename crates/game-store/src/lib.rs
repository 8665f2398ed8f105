//! Shared, observable session state for the game front-end.
//!
//! The crate holds the four values every screen of the game reads and
//! writes: the current mode, the selected difficulty, the score and the
//! round countdown. Consumers obtain a [`GameStore`] from a
//! [`StoreRegistry`] built once by the composition root and passed around
//! explicitly; there is no global lookup.
//!
//! Modules are organized by responsibility:
//! - [`session`] defines the plain value bag and its field vocabulary
//! - [`store`] wraps the session in a shared handle that publishes changes
//! - [`registry`] hands out one store per name
//! - [`config`] and [`error`] carry settings and caller-facing failures
pub mod config;
pub mod error;
pub mod registry;
pub mod session;
pub mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use registry::{DEFAULT_STORE_NAME, StoreRegistry};
pub use session::{Field, FieldKind, FieldValue, GameMode, GameSession};
pub use store::{FieldChange, GameStore};
