//! Vector-backed model implementation.
//!
//! `VecModel<T>` owns its rows in a `Vec<T>` and emits exactly one change
//! notification per mutation, after the storage has been updated.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use horizon_models_core::logging::targets;
use horizon_models_core::{ModelError, ModelResult};

use super::model_rc::ModelRc;
use super::notify::ModelNotify;
use super::traits::{Model, ModelTracker};

/// A mutable model backed by a `Vec<T>`.
///
/// All mutators take `&self`; the storage lives in a `RefCell`, and no borrow
/// is held while peers are notified, so peers may read the model back from
/// inside their callbacks.
///
/// # Example
///
/// ```
/// use horizon_models::model::{Model, VecModel};
///
/// let model = VecModel::from(vec![1, 2, 3]);
/// model.push(4);
/// model.insert(0, 0);
/// assert_eq!(model.remove(2), 2);
///
/// assert_eq!(model.iter().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
/// ```
pub struct VecModel<T> {
    array: RefCell<Vec<T>>,
    notify: ModelNotify,
}

impl<T> Default for VecModel<T> {
    fn default() -> Self {
        Self {
            array: RefCell::new(Vec::new()),
            notify: ModelNotify::new(),
        }
    }
}

impl<T> From<Vec<T>> for VecModel<T> {
    fn from(array: Vec<T>) -> Self {
        Self {
            array: RefCell::new(array),
            notify: ModelNotify::new(),
        }
    }
}

impl<T> VecModel<T> {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.array.borrow().len()
    }

    /// Returns `true` if the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.array.borrow().is_empty()
    }

    /// Returns the notifier, e.g. to inspect its change tracker.
    pub fn notify(&self) -> &ModelNotify {
        &self.notify
    }

    /// Appends a row.
    pub fn push(&self, value: T) {
        let row = {
            let mut array = self.array.borrow_mut();
            array.push(value);
            array.len() - 1
        };
        tracing::trace!(target: targets::VEC, row, "push");
        self.notify.row_added(row, 1);
    }

    /// Inserts a row at `index`, shifting later rows up.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&self, index: usize, value: T) {
        self.array.borrow_mut().insert(index, value);
        tracing::trace!(target: targets::VEC, index, "insert");
        self.notify.row_added(index, 1);
    }

    /// Inserts a row at `index`, or reports why it could not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InsertOutOfRange`] if `index > len()`.
    pub fn try_insert(&self, index: usize, value: T) -> ModelResult<()> {
        let row_count = self.len();
        if index > row_count {
            return Err(ModelError::InsertOutOfRange { index, row_count });
        }
        self.insert(index, value);
        Ok(())
    }

    /// Removes and returns the row at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&self, index: usize) -> T {
        let removed = self.array.borrow_mut().remove(index);
        tracing::trace!(target: targets::VEC, index, "remove");
        self.notify.row_removed(index, 1);
        removed
    }

    /// Removes and returns the row at `index`, or reports why it could not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RowOutOfRange`] if `index >= len()`.
    pub fn try_remove(&self, index: usize) -> ModelResult<T> {
        let row_count = self.len();
        if index >= row_count {
            return Err(ModelError::RowOutOfRange {
                row: index,
                row_count,
            });
        }
        Ok(self.remove(index))
    }

    /// Removes all rows.
    ///
    /// Emits a reset, unless the model was already empty.
    pub fn clear(&self) {
        let was_empty = {
            let mut array = self.array.borrow_mut();
            let was_empty = array.is_empty();
            array.clear();
            was_empty
        };
        if !was_empty {
            tracing::trace!(target: targets::VEC, "clear");
            self.notify.reset();
        }
    }

    /// Replaces all rows.
    ///
    /// Emits a reset, unless both the old and the new contents are empty.
    pub fn set_vec(&self, new_array: impl Into<Vec<T>>) {
        let new_array = new_array.into();
        let silent = {
            let mut array = self.array.borrow_mut();
            let silent = array.is_empty() && new_array.is_empty();
            *array = new_array;
            silent
        };
        if !silent {
            tracing::trace!(target: targets::VEC, rows = self.len(), "set_vec");
            self.notify.reset();
        }
    }

    /// Appends all rows of `iter` with a single notification.
    pub fn extend<I: IntoIterator<Item = T>>(&self, iter: I) {
        let (index, count) = {
            let mut array = self.array.borrow_mut();
            let index = array.len();
            array.extend(iter);
            (index, array.len() - index)
        };
        if count > 0 {
            tracing::trace!(target: targets::VEC, index, count, "extend");
            self.notify.row_added(index, count);
        }
    }

    /// Swaps two rows.
    ///
    /// Emits `row_changed` for both rows. Does nothing if either index is out
    /// of range or both are the same.
    pub fn swap(&self, a: usize, b: usize) {
        {
            let mut array = self.array.borrow_mut();
            if a == b || a >= array.len() || b >= array.len() {
                return;
            }
            array.swap(a, b);
        }

        self.notify.row_changed(a);
        self.notify.row_changed(b);
    }

    /// Mutates a row in place through a closure.
    ///
    /// Emits `row_changed` afterwards. Returns `None` if `index` is out of range.
    pub fn modify<F, R>(&self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let result = {
            let mut array = self.array.borrow_mut();
            let value = array.get_mut(index)?;
            f(value)
        };
        self.notify.row_changed(index);
        Some(result)
    }

    /// Replaces the data of `row`, or reports why it could not.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::RowOutOfRange`] if `row >= len()`.
    pub fn try_set_row_data(&self, row: usize, data: T) -> ModelResult<()> {
        {
            let mut array = self.array.borrow_mut();
            let row_count = array.len();
            let slot = array
                .get_mut(row)
                .ok_or(ModelError::RowOutOfRange { row, row_count })?;
            *slot = data;
        }
        self.notify.row_changed(row);
        Ok(())
    }
}

impl<T: Clone + 'static> VecModel<T> {
    /// Creates a shared model holding a copy of `slice`.
    pub fn from_slice(slice: &[T]) -> ModelRc<T> {
        ModelRc::new(Self::from(slice.to_vec()))
    }

    /// Appends clones of all rows of `src` with a single notification.
    pub fn extend_from_slice(&self, src: &[T]) {
        self.extend(src.iter().cloned());
    }
}

impl<T: Clone + 'static> Model for VecModel<T> {
    type Data = T;

    fn row_count(&self) -> usize {
        self.array.borrow().len()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        self.array.borrow().get(row).cloned()
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        if let Err(err) = self.try_set_row_data(row, data) {
            tracing::debug!(target: targets::VEC, %err, "set_row_data ignored");
        }
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for VecModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecModel")
            .field("array", &*self.array.borrow())
            .field("notify", &self.notify)
            .finish()
    }
}

impl<T: Clone + 'static> From<VecModel<T>> for ModelRc<T> {
    fn from(model: VecModel<T>) -> Self {
        ModelRc::from(Rc::new(model))
    }
}

static_assertions::assert_not_impl_any!(VecModel<i32>: Send, Sync);
