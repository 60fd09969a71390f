//! Change tracking for model-backed bindings.
//!
//! A model does not know who reads it. Whatever evaluates bindings against a
//! model (a property engine, a layout pass, a repeater) registers what it read
//! through the model's [`ChangeTracker`], and the model marks the tracker
//! dirty whenever it emits a change notification. The reader then polls the
//! flags to decide whether to re-run.
//!
//! Two flags are kept:
//!
//! - **row count**: dirtied by structural changes (rows added, rows removed,
//!   reset) once a reader registered [`ChangeTracker::track_row_count`].
//! - **row data**: dirtied by structural changes, and by `row_changed(i)`
//!   only when row `i` was read through [`ChangeTracker::track_row_data`].
//!
//! # Example
//!
//! ```
//! use horizon_models_core::ChangeTracker;
//!
//! let tracker = ChangeTracker::new();
//! tracker.track_row_count();
//!
//! tracker.mark_rows_shifted();
//! assert!(tracker.take_row_count_dirty());
//! // Taking the flag cleans it
//! assert!(!tracker.take_row_count_dirty());
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::marker::PhantomData;

/// A boolean dirty marker with take-and-clear semantics.
///
/// `DirtyFlag` starts clean. [`mark`](Self::mark) returns whether the flag
/// actually transitioned, so callers can avoid redundant downstream work.
#[derive(Default)]
pub struct DirtyFlag {
    dirty: Cell<bool>,
}

impl DirtyFlag {
    /// Create a clean flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the flag dirty, returning `true` if it was clean before.
    pub fn mark(&self) -> bool {
        !self.dirty.replace(true)
    }

    /// Returns `true` if the flag is dirty.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Returns the current state and cleans the flag.
    pub fn take(&self) -> bool {
        self.dirty.replace(false)
    }
}

impl fmt::Debug for DirtyFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirtyFlag")
            .field("dirty", &self.dirty.get())
            .finish()
    }
}

/// Row-count and row-data dirty tracking for one model.
///
/// `ChangeTracker` is not `Send` or `Sync`; it belongs to the model's owner
/// thread like the model itself.
#[derive(Default)]
pub struct ChangeTracker {
    row_count_dirty: DirtyFlag,
    row_data_dirty: DirtyFlag,
    tracks_row_count: Cell<bool>,
    /// Rows read through `track_row_data`, kept sorted and deduplicated.
    tracked_rows: RefCell<Vec<usize>>,
    _not_send: PhantomData<*const ()>,
}

impl ChangeTracker {
    /// Create a tracker with nothing registered and both flags clean.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dependency on the row count.
    pub fn track_row_count(&self) {
        self.tracks_row_count.set(true);
    }

    /// Register a dependency on the data of `row`.
    pub fn track_row_data(&self, row: usize) {
        let mut rows = self.tracked_rows.borrow_mut();
        if let Err(pos) = rows.binary_search(&row) {
            rows.insert(pos, row);
        }
    }

    /// Returns `true` if `row` has been registered and not cleared since.
    pub fn is_row_tracked(&self, row: usize) -> bool {
        self.tracked_rows.borrow().binary_search(&row).is_ok()
    }

    /// Returns `true` if a row-count dependency has been registered.
    pub fn is_row_count_tracked(&self) -> bool {
        self.tracks_row_count.get()
    }

    /// Record that the data of `row` changed.
    ///
    /// Only dirties the row-data flag if that row was tracked.
    pub fn mark_row_changed(&self, row: usize) {
        if self.is_row_tracked(row) {
            self.row_data_dirty.mark();
        }
    }

    /// Record a structural change (rows added, removed or reset).
    ///
    /// Row indices are no longer meaningful afterwards, so the tracked rows are
    /// forgotten and the row-data flag is dirtied. The row-count flag is only
    /// dirtied if the row count is tracked.
    pub fn mark_rows_shifted(&self) {
        if self.tracks_row_count.get() {
            self.row_count_dirty.mark();
        }
        self.tracked_rows.borrow_mut().clear();
        self.row_data_dirty.mark();
    }

    /// Returns whether the row count changed since the last call, and cleans the flag.
    pub fn take_row_count_dirty(&self) -> bool {
        self.row_count_dirty.take()
    }

    /// Returns whether tracked row data changed since the last call, and cleans the flag.
    pub fn take_row_data_dirty(&self) -> bool {
        self.row_data_dirty.take()
    }
}

impl fmt::Debug for ChangeTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeTracker")
            .field("row_count_dirty", &self.row_count_dirty.is_dirty())
            .field("row_data_dirty", &self.row_data_dirty.is_dirty())
            .field("tracked_rows", &self.tracked_rows.borrow().len())
            .finish()
    }
}

static_assertions::assert_not_impl_any!(ChangeTracker: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_flag() {
        let flag = DirtyFlag::new();
        assert!(!flag.is_dirty());

        // First mark transitions
        assert!(flag.mark());
        // Second mark does not
        assert!(!flag.mark());
        assert!(flag.is_dirty());

        assert!(flag.take());
        assert!(!flag.is_dirty());
        assert!(!flag.take());
    }

    #[test]
    fn test_tracked_rows_sorted_and_unique() {
        let tracker = ChangeTracker::new();
        tracker.track_row_data(5);
        tracker.track_row_data(1);
        tracker.track_row_data(5);
        tracker.track_row_data(3);

        assert_eq!(*tracker.tracked_rows.borrow(), vec![1, 3, 5]);
        assert!(tracker.is_row_tracked(3));
        assert!(!tracker.is_row_tracked(2));
    }

    #[test]
    fn test_row_changed_only_dirties_tracked_rows() {
        let tracker = ChangeTracker::new();
        tracker.track_row_data(2);

        tracker.mark_row_changed(4);
        assert!(!tracker.take_row_data_dirty());

        tracker.mark_row_changed(2);
        assert!(tracker.take_row_data_dirty());
        // Count is untouched by data changes
        assert!(!tracker.take_row_count_dirty());
    }

    #[test]
    fn test_structural_change_clears_tracked_rows() {
        let tracker = ChangeTracker::new();
        tracker.track_row_count();
        tracker.track_row_data(0);

        tracker.mark_rows_shifted();
        assert!(tracker.is_row_count_tracked());
        assert!(!tracker.is_row_tracked(0));
        assert!(tracker.take_row_count_dirty());
        assert!(tracker.take_row_data_dirty());

        // Row 0 is no longer tracked, so changing it is silent
        tracker.mark_row_changed(0);
        assert!(!tracker.take_row_data_dirty());
    }

    #[test]
    fn test_untracked_row_count_stays_clean() {
        let tracker = ChangeTracker::new();
        tracker.mark_rows_shifted();
        assert!(!tracker.take_row_count_dirty());
        assert!(tracker.take_row_data_dirty());

        tracker.track_row_count();
        tracker.mark_rows_shifted();
        assert!(tracker.take_row_count_dirty());
    }
}
