//! Browse module - photo selection and labelling workflows
//!
//! This module holds the state and business logic behind browsing a photo
//! library. It is presentation-agnostic: the CLI drives it today, and any
//! other front end can subscribe to the projection and call the same
//! session methods.
//!
//! # Architecture
//!
//! - `selection`: multi-select set keyed by asset identifier
//! - `projection`: ordered list of displayed assets with a revision channel
//! - `persistence`: the `LabelStore` boundary and its implementations
//! - `actions`: pure action business logic
//! - `models`: outcome types returned to the presentation layer
//! - `session`: `BrowseSession`, tying the above to the injected stores

pub mod actions;
pub mod models;
pub mod persistence;
pub mod projection;
pub mod selection;
pub mod session;

pub use actions::{execute_assign_label, execute_delete, execute_set_favorite, normalize_label};
pub use models::{ActionOutcome, AssignOutcome, SkipReason};
pub use persistence::{LabelStore, LabelStoreError, MemoryLabelStore};
pub use projection::ResultProjection;
pub use selection::SelectionSet;
pub use session::{BrowseError, BrowseSession};
