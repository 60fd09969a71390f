//! Reversing adapter.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use horizon_models_core::logging::targets;

use super::model_rc::ModelRc;
use super::notify::ModelNotify;
use super::traits::{Model, ModelChangeListener, ModelTracker, model_peer};

struct ReverseModelInner<T> {
    source: ModelRc<T>,
    notify: ModelNotify,
}

impl<T> ReverseModelInner<T> {
    /// Maps a row to the other end of the source. Both directions are the same.
    fn mirrored_row(&self, row: usize) -> Option<usize> {
        let count = self.source.row_count();
        (row < count).then(|| count - 1 - row)
    }
}

impl<T> ModelChangeListener for ReverseModelInner<T> {
    fn row_changed(&self, row: usize) {
        match self.mirrored_row(row) {
            Some(reversed) => self.notify.row_changed(reversed),
            None => {
                tracing::debug!(target: targets::REVERSE, row, "row_changed out of range");
            }
        }
    }

    fn row_added(&self, index: usize, count: usize) {
        // The source already contains the new rows.
        let old_count = self.source.row_count().saturating_sub(count);
        let reversed = old_count.saturating_sub(index);
        tracing::trace!(target: targets::REVERSE, index, count, reversed, "row_added");
        self.notify.row_added(reversed, count);
    }

    fn row_removed(&self, index: usize, count: usize) {
        // The source no longer contains the removed rows.
        let reversed = self.source.row_count().saturating_sub(index);
        tracing::trace!(target: targets::REVERSE, index, count, reversed, "row_removed");
        self.notify.row_removed(reversed, count);
    }

    fn reset(&self) {
        self.notify.reset();
    }
}

/// A model showing the rows of its source in reverse order.
///
/// No mapping is stored: row `i` is source row `row_count() - 1 - i`,
/// computed against the source's current row count.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use horizon_models::model::{Model, ReverseModel, VecModel};
///
/// let source = Rc::new(VecModel::from(vec![3, 4, 1, 2]));
/// let reversed = ReverseModel::new(source.clone());
/// assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![2, 1, 4, 3]);
///
/// source.remove(1);
/// assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![2, 1, 3]);
/// ```
pub struct ReverseModel<T>(Rc<ReverseModelInner<T>>);

impl<T: 'static> ReverseModel<T> {
    /// Creates a reversed view of `source`.
    pub fn new(source: impl Into<ModelRc<T>>) -> Self {
        let inner = Rc::new(ReverseModelInner {
            source: source.into(),
            notify: ModelNotify::new(),
        });
        inner.source.attach_peer(model_peer(&inner));
        Self(inner)
    }

    /// Returns the source model.
    pub fn source_model(&self) -> &ModelRc<T> {
        &self.0.source
    }
}

impl<T: 'static> Model for ReverseModel<T> {
    type Data = T;

    fn row_count(&self) -> usize {
        self.0.source.row_count()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        let source_row = self.0.mirrored_row(row)?;
        self.0.source.row_data(source_row)
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        match self.0.mirrored_row(row) {
            Some(source_row) => self.0.source.set_row_data(source_row, data),
            None => tracing::debug!(target: targets::REVERSE, row, "set_row_data out of range"),
        }
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.0.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for ReverseModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReverseModel")
            .field("source", &self.0.source)
            .finish()
    }
}

static_assertions::assert_not_impl_any!(ReverseModel<i32>: Send, Sync);
