//! Shared, type-erased model handle.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use horizon_models_core::logging::targets;
use horizon_models_core::{ModelError, ModelResult};

use super::traits::{Model, ModelTracker};

/// A reference-counted handle to any model with row data `T`.
///
/// `ModelRc` is what adapters hold their source through and what views bind
/// to. Cloning the handle shares the model. The [`Default`] handle is empty and
/// behaves like a model with no rows.
///
/// Two handles compare equal when they point to the same model, or are both
/// empty.
pub struct ModelRc<T>(Option<Rc<dyn Model<Data = T>>>);

impl<T> ModelRc<T> {
    /// Wrap `model` in a new shared handle.
    pub fn new(model: impl Model<Data = T> + 'static) -> Self {
        Self(Some(Rc::new(model)))
    }

    /// Returns `true` if the handle points to a model.
    pub fn has_model(&self) -> bool {
        self.0.is_some()
    }

    /// Returns the shared model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyHandle`] for an empty handle.
    pub fn try_into_rc(self) -> ModelResult<Rc<dyn Model<Data = T>>> {
        self.0.ok_or(ModelError::EmptyHandle)
    }
}

impl<T> Clone for ModelRc<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Default for ModelRc<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> PartialEq for ModelRc<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b)),
            _ => false,
        }
    }
}

impl<T> fmt::Debug for ModelRc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(model) => f
                .debug_struct("ModelRc")
                .field("row_count", &model.row_count())
                .finish(),
            None => f.write_str("ModelRc(<empty>)"),
        }
    }
}

impl<T, M: Model<Data = T> + 'static> From<Rc<M>> for ModelRc<T> {
    fn from(model: Rc<M>) -> Self {
        Self(Some(model))
    }
}

impl<T> From<Rc<dyn Model<Data = T>>> for ModelRc<T> {
    fn from(model: Rc<dyn Model<Data = T>>) -> Self {
        Self(Some(model))
    }
}

impl<T> Model for ModelRc<T> {
    type Data = T;

    fn row_count(&self) -> usize {
        self.0.as_ref().map_or(0, |model| model.row_count())
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        self.0.as_ref().and_then(|model| model.row_data(row))
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        match &self.0 {
            Some(model) => model.set_row_data(row, data),
            None => tracing::warn!(
                target: targets::MODEL,
                row,
                "set_row_data called on an empty model handle"
            ),
        }
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        match &self.0 {
            Some(model) => model.model_tracker(),
            None => &(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        match &self.0 {
            Some(model) => model.as_any(),
            None => &(),
        }
    }
}

static_assertions::assert_not_impl_any!(ModelRc<i32>: Send, Sync);
