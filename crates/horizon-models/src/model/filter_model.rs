//! Filtering adapter.
//!
//! `FilterModel<T>` exposes the rows of a source model that pass a predicate,
//! in source order. It keeps a sorted list of accepted source rows and updates
//! it incrementally from the source's change notifications.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use horizon_models_core::PerfSpan;
use horizon_models_core::logging::{span_names, targets};

use super::mapping::MappingState;
use super::model_rc::ModelRc;
use super::notify::ModelNotify;
use super::traits::{Model, ModelChangeListener, ModelTracker, model_peer};

/// Type alias for a filter function.
///
/// Returns `true` if the row should be included, `false` to filter it out.
pub type FilterFn<T> = Box<dyn Fn(&T) -> bool>;

struct FilterModelInner<T> {
    source: ModelRc<T>,
    filter_function: FilterFn<T>,
    /// Source rows passing the filter, strictly increasing.
    accepted_rows: RefCell<Vec<usize>>,
    state: Cell<MappingState>,
    notify: ModelNotify,
}

impl<T> FilterModelInner<T> {
    fn accepts(&self, source_row: usize) -> bool {
        self.source
            .row_data(source_row)
            .is_some_and(|data| (self.filter_function)(&data))
    }

    fn ensure_mapping(&self) {
        if !self.state.get().is_dirty() {
            return;
        }

        let _perf = PerfSpan::new(span_names::FILTER_REBUILD);
        let source_rows = self.source.row_count();
        let accepted: Vec<usize> = (0..source_rows).filter(|&row| self.accepts(row)).collect();
        tracing::debug!(
            target: targets::FILTER,
            source_rows,
            accepted = accepted.len(),
            "rebuilt filter mapping"
        );

        *self.accepted_rows.borrow_mut() = accepted;
        self.state.set(MappingState::Clean);
    }

    fn invalidate(&self) {
        self.state.set(MappingState::Dirty);
        self.accepted_rows.borrow_mut().clear();
        self.notify.reset();
    }

    fn mapped_row(&self, filtered_row: usize) -> Option<usize> {
        self.ensure_mapping();
        self.accepted_rows.borrow().get(filtered_row).copied()
    }
}

impl<T> ModelChangeListener for FilterModelInner<T> {
    fn row_changed(&self, row: usize) {
        if self.state.get().is_dirty() {
            self.invalidate();
            return;
        }

        let accepted = self.accepts(row);
        let position = self.accepted_rows.borrow().binary_search(&row);
        match (position, accepted) {
            (Ok(pos), true) => self.notify.row_changed(pos),
            (Ok(pos), false) => {
                self.accepted_rows.borrow_mut().remove(pos);
                tracing::trace!(target: targets::FILTER, row, pos, "row no longer accepted");
                self.notify.row_removed(pos, 1);
            }
            (Err(pos), true) => {
                self.accepted_rows.borrow_mut().insert(pos, row);
                tracing::trace!(target: targets::FILTER, row, pos, "row now accepted");
                self.notify.row_added(pos, 1);
            }
            (Err(_), false) => {}
        }
    }

    fn row_added(&self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        if self.state.get().is_dirty() {
            self.invalidate();
            return;
        }

        let added: Vec<usize> = (index..index + count)
            .filter(|&row| self.accepts(row))
            .collect();

        let insert_pos = {
            let mut accepted_rows = self.accepted_rows.borrow_mut();
            let insert_pos = accepted_rows.partition_point(|&row| row < index);
            for row in &mut accepted_rows[insert_pos..] {
                *row += count;
            }
            accepted_rows.splice(insert_pos..insert_pos, added.iter().copied());
            insert_pos
        };

        if !added.is_empty() {
            tracing::trace!(
                target: targets::FILTER,
                index,
                count,
                accepted = added.len(),
                "source rows added"
            );
            self.notify.row_added(insert_pos, added.len());
        }
    }

    fn row_removed(&self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        if self.state.get().is_dirty() {
            self.invalidate();
            return;
        }

        let (start, removed) = {
            let mut accepted_rows = self.accepted_rows.borrow_mut();
            let start = accepted_rows.partition_point(|&row| row < index);
            let end = accepted_rows.partition_point(|&row| row < index + count);
            accepted_rows.drain(start..end);
            for row in &mut accepted_rows[start..] {
                *row -= count;
            }
            (start, end - start)
        };

        if removed > 0 {
            tracing::trace!(target: targets::FILTER, index, count, removed, "source rows removed");
            self.notify.row_removed(start, removed);
        }
    }

    fn reset(&self) {
        self.invalidate();
    }
}

/// A model exposing only the source rows accepted by a filter function.
///
/// The filter function is not called until the model is first read, and the
/// mapping is rebuilt lazily after every reset.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use horizon_models::model::{FilterModel, Model, VecModel};
///
/// let source = Rc::new(VecModel::from(vec![1, 2, 3, 4, 5, 6]));
/// let even = FilterModel::new(source.clone(), |value: &i32| value % 2 == 0);
///
/// assert_eq!(even.iter().collect::<Vec<_>>(), vec![2, 4, 6]);
///
/// source.insert(2, 10);
/// assert_eq!(even.iter().collect::<Vec<_>>(), vec![2, 10, 4, 6]);
/// assert_eq!(even.unfiltered_row(1), Some(2));
/// ```
///
/// # External state
///
/// If the filter function captures state that changes outside of the source
/// model, call [`reset`](Self::reset) afterwards. The model cannot detect
/// such changes on its own.
pub struct FilterModel<T>(Rc<FilterModelInner<T>>);

impl<T: 'static> FilterModel<T> {
    /// Creates a filter over `source`.
    pub fn new<F>(source: impl Into<ModelRc<T>>, filter_function: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        let inner = Rc::new(FilterModelInner {
            source: source.into(),
            filter_function: Box::new(filter_function),
            accepted_rows: RefCell::new(Vec::new()),
            state: Cell::new(MappingState::Dirty),
            notify: ModelNotify::new(),
        });
        inner.source.attach_peer(model_peer(&inner));
        Self(inner)
    }

    /// Re-applies the filter to every row and notifies peers with a reset.
    pub fn reset(&self) {
        self.0.invalidate();
    }

    /// Returns the source row shown at `filtered_row`.
    pub fn unfiltered_row(&self, filtered_row: usize) -> Option<usize> {
        self.0.mapped_row(filtered_row)
    }

    /// Returns the source model.
    pub fn source_model(&self) -> &ModelRc<T> {
        &self.0.source
    }
}

impl<T: 'static> Model for FilterModel<T> {
    type Data = T;

    fn row_count(&self) -> usize {
        self.0.ensure_mapping();
        self.0.accepted_rows.borrow().len()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        let source_row = self.0.mapped_row(row)?;
        self.0.source.row_data(source_row)
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        match self.0.mapped_row(row) {
            Some(source_row) => self.0.source.set_row_data(source_row, data),
            None => tracing::debug!(target: targets::FILTER, row, "set_row_data out of range"),
        }
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.0.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for FilterModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterModel")
            .field("state", &self.0.state.get())
            .field("accepted_rows", &self.0.accepted_rows.borrow().len())
            .finish()
    }
}

static_assertions::assert_not_impl_any!(FilterModel<i32>: Send, Sync);
