//! Core traits for observable row models.
//!
//! This module defines the contract every model implements ([`Model`]), the
//! callback surface change listeners implement ([`ModelChangeListener`]), and
//! the registration side of change tracking ([`ModelTracker`]).

use std::any::Any;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use horizon_models_core::logging::targets;

use super::filter_model::FilterModel;
use super::map_model::MapModel;
use super::model_rc::ModelRc;
use super::reverse_model::ReverseModel;
use super::sort_model::SortModel;

/// Receives change notifications from a model.
///
/// Listeners are attached to a model as weak [`ModelPeer`] handles. The model
/// calls these methods synchronously, right after its rows changed, on every
/// peer that is still alive.
pub trait ModelChangeListener {
    /// The data of `row` changed.
    fn row_changed(&self, row: usize);

    /// `count` rows were inserted, the first one now at `index`.
    fn row_added(&self, index: usize, count: usize);

    /// `count` rows that started at `index` were removed.
    fn row_removed(&self, index: usize, count: usize);

    /// Everything may have changed; re-read the model from scratch.
    fn reset(&self);
}

/// A weak handle to a change listener.
///
/// A model never keeps its peers alive. When the last strong reference to a
/// listener is dropped, the model silently forgets it on the next notification.
pub type ModelPeer = Weak<dyn ModelChangeListener>;

/// Creates the weak peer handle for a listener owned by an `Rc`.
pub fn model_peer<L: ModelChangeListener + 'static>(listener: &Rc<L>) -> ModelPeer {
    Rc::downgrade(listener) as ModelPeer
}

/// The registration interface of a model's change notifications.
///
/// Models return it from [`Model::model_tracker`], usually as a reference to
/// their [`ModelNotify`](super::ModelNotify) field. Constant models can
/// return `&()`.
pub trait ModelTracker {
    /// Attach one peer. The peer will be notified when the model changes.
    fn attach_peer(&self, peer: ModelPeer);

    /// Register a dependency on the model's row count.
    fn track_row_count_changes(&self);

    /// Register a dependency on the data of `row`.
    fn track_row_data_changes(&self, row: usize);
}

impl ModelTracker for () {
    fn attach_peer(&self, _peer: ModelPeer) {}

    fn track_row_count_changes(&self) {}

    fn track_row_data_changes(&self, _row: usize) {}
}

/// An ordered, index-addressable, observable collection of rows.
///
/// Rows have no identity beyond their index. A model that can change holds a
/// [`ModelNotify`](super::ModelNotify) and calls it after every mutation of
/// its storage; that is the only way views and adapters learn about changes.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use horizon_models::model::{Model, ModelNotify, ModelTracker};
///
/// struct Names {
///     names: RefCell<Vec<String>>,
///     notify: ModelNotify,
/// }
///
/// impl Model for Names {
///     type Data = String;
///
///     fn row_count(&self) -> usize {
///         self.names.borrow().len()
///     }
///
///     fn row_data(&self, row: usize) -> Option<String> {
///         self.names.borrow().get(row).cloned()
///     }
///
///     fn model_tracker(&self) -> &dyn ModelTracker {
///         &self.notify
///     }
/// }
///
/// impl Names {
///     fn push(&self, name: String) {
///         self.names.borrow_mut().push(name);
///         let row = self.names.borrow().len() - 1;
///         self.notify.row_added(row, 1);
///     }
/// }
/// ```
pub trait Model {
    /// The data stored in each row.
    type Data;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Returns the data of `row`, or `None` if `row >= row_count()`.
    fn row_data(&self, row: usize) -> Option<Self::Data>;

    /// Replaces the data of `row`.
    ///
    /// Models that store the value must call `row_changed(row)` on their
    /// notifier afterwards. The default implementation treats the model as
    /// read-only: it does nothing and logs a warning.
    fn set_row_data(&self, row: usize, _data: Self::Data) {
        tracing::warn!(
            target: targets::MODEL,
            model = std::any::type_name::<Self>(),
            row,
            "set_row_data called on a read-only model"
        );
    }

    /// Returns the change tracking interface of this model.
    fn model_tracker(&self) -> &dyn ModelTracker;

    /// Attaches a peer that will be notified of changes.
    ///
    /// Convenience for `self.model_tracker().attach_peer(peer)`.
    fn attach_peer(&self, peer: ModelPeer) {
        self.model_tracker().attach_peer(peer);
    }

    /// Returns an iterator visiting all rows of the model.
    fn iter(&self) -> ModelIterator<'_, Self::Data>
    where
        Self: Sized,
    {
        ModelIterator::new(self)
    }

    /// Returns something that can be downcast, typically `self`.
    ///
    /// The default returns `&()`.
    fn as_any(&self) -> &dyn Any {
        &()
    }
}

/// Extension methods available on every [`Model`].
pub trait ModelExt: Model {
    /// Returns [`row_data`](Model::row_data) after registering a dependency on the row.
    fn row_data_tracked(&self, row: usize) -> Option<Self::Data> {
        self.model_tracker().track_row_data_changes(row);
        self.row_data(row)
    }

    /// Returns [`row_count`](Model::row_count) after registering a dependency on it.
    fn row_count_tracked(&self) -> usize {
        self.model_tracker().track_row_count_changes();
        self.row_count()
    }

    /// Wraps this model in a [`MapModel`] applying `map_function` to every row.
    fn map<F, U>(self, map_function: F) -> MapModel<Self::Data, U>
    where
        Self: Sized + 'static,
        Self::Data: 'static,
        U: 'static,
        F: Fn(Self::Data) -> U + 'static,
    {
        MapModel::new(ModelRc::new(self), map_function)
    }

    /// Wraps this model in a [`FilterModel`] keeping rows accepted by `filter_function`.
    fn filter<F>(self, filter_function: F) -> FilterModel<Self::Data>
    where
        Self: Sized + 'static,
        Self::Data: 'static,
        F: Fn(&Self::Data) -> bool + 'static,
    {
        FilterModel::new(ModelRc::new(self), filter_function)
    }

    /// Wraps this model in a [`SortModel`] with ascending order.
    fn sort(self) -> SortModel<Self::Data>
    where
        Self: Sized + 'static,
        Self::Data: Ord + 'static,
    {
        SortModel::new_ascending(ModelRc::new(self))
    }

    /// Wraps this model in a [`SortModel`] ordered by `compare`.
    fn sort_by<F>(self, compare: F) -> SortModel<Self::Data>
    where
        Self: Sized + 'static,
        Self::Data: 'static,
        F: Fn(&Self::Data, &Self::Data) -> Ordering + 'static,
    {
        SortModel::new(ModelRc::new(self), compare)
    }

    /// Wraps this model in a [`ReverseModel`].
    fn reverse(self) -> ReverseModel<Self::Data>
    where
        Self: Sized + 'static,
        Self::Data: 'static,
    {
        ReverseModel::new(ModelRc::new(self))
    }
}

impl<M: Model + ?Sized> ModelExt for M {}

/// An iterator over the rows of a model.
///
/// Created by [`Model::iter`].
pub struct ModelIterator<'a, T> {
    model: &'a dyn Model<Data = T>,
    row: usize,
}

impl<'a, T> ModelIterator<'a, T> {
    /// Creates an iterator starting at the first row of `model`.
    pub fn new(model: &'a dyn Model<Data = T>) -> Self {
        Self { model, row: 0 }
    }
}

impl<T> Iterator for ModelIterator<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.row;
        if row < self.model.row_count() {
            self.row += 1;
        }
        self.model.row_data(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.model.row_count().saturating_sub(self.row);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.row = self.row.checked_add(n)?;
        self.next()
    }
}

impl<T> ExactSizeIterator for ModelIterator<'_, T> {}

impl<M: Model> Model for Rc<M> {
    type Data = M::Data;

    fn row_count(&self) -> usize {
        (**self).row_count()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        (**self).row_data(row)
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        (**self).set_row_data(row, data);
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        (**self).model_tracker()
    }

    fn as_any(&self) -> &dyn Any {
        (**self).as_any()
    }
}

/// A constant model with `n` rows whose data is the row index.
impl Model for usize {
    type Data = usize;

    fn row_count(&self) -> usize {
        *self
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        (row < *self).then_some(row)
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
