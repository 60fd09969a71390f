//! Core systems for Horizon Models.
//!
//! This crate provides the plumbing shared by every observable model in
//! `horizon-models`:
//!
//! - **Thread checks**: models are single-owner, main-thread objects. The
//!   [`thread_check`] module records the main thread and the assertion macros
//!   verify that notifications are emitted from it.
//! - **Change tracking**: [`ChangeTracker`] holds the row-count and row-data
//!   dirty flags that a model marks whenever it emits a change notification,
//!   so that an external recomputation engine knows to re-read it.
//! - **Logging**: tracing targets and span helpers in [`logging`].
//! - **Errors**: [`ModelError`] for the checked model operations.
//!
//! # Example
//!
//! ```
//! use horizon_models_core::ChangeTracker;
//!
//! let tracker = ChangeTracker::new();
//!
//! // A binding reads row 3 of the model
//! tracker.track_row_data(3);
//!
//! // The model reports that row 3 changed
//! tracker.mark_row_changed(3);
//! assert!(tracker.take_row_data_dirty());
//!
//! // Rows that nobody read do not dirty the data flag
//! tracker.mark_row_changed(7);
//! assert!(!tracker.take_row_data_dirty());
//! ```

mod error;
pub mod logging;
pub mod thread_check;
pub mod tracking;

pub use error::{ModelError, ModelResult};
pub use logging::PerfSpan;
pub use thread_check::{
    are_thread_checks_enabled, is_main_thread, set_main_thread, set_thread_checks_enabled,
};
pub use tracking::{ChangeTracker, DirtyFlag};
