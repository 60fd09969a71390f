//! Logging facilities for Horizon Models.
//!
//! Horizon Models uses the `tracing` crate for instrumentation. The libraries
//! never install a subscriber; to see logs, install one in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_models::filter=debug,horizon_models::perf=info")
//!         .init();
//! }
//! ```
//!
//! Every event carries one of the [`targets`] below, so each model kind can be
//! filtered on its own.

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by model kind.
pub mod targets {
    /// Peer registration and notification delivery.
    pub const NOTIFY: &str = "horizon_models::notify";
    /// Generic model diagnostics (read-only writes, handle misuse).
    pub const MODEL: &str = "horizon_models::model";
    /// `VecModel` mutations.
    pub const VEC: &str = "horizon_models::vec";
    /// `FilterModel` mapping maintenance.
    pub const FILTER: &str = "horizon_models::filter";
    /// `SortModel` mapping maintenance.
    pub const SORT: &str = "horizon_models::sort";
    /// `MapModel` forwarding.
    pub const MAP: &str = "horizon_models::map";
    /// `ReverseModel` index translation.
    pub const REVERSE: &str = "horizon_models::reverse";
    /// Timing spans around full mapping rebuilds.
    pub const PERF: &str = "horizon_models::perf";
}

/// Span names used for mapping rebuilds.
pub mod span_names {
    /// Full rebuild of a filter mapping.
    pub const FILTER_REBUILD: &str = "filter_rebuild";
    /// Full rebuild of a sort permutation.
    pub const SORT_REBUILD: &str = "sort_rebuild";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is used to time operations proportional to the full row count.
#[derive(Debug)]
pub struct PerfSpan {
    _span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(operation: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_models::perf", "perf", operation);
        Self {
            _span: span.entered(),
        }
    }
}
