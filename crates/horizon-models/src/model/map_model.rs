//! Mapping adapter.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use horizon_models_core::logging::targets;

use super::model_rc::ModelRc;
use super::notify::ModelNotify;
use super::traits::{Model, ModelChangeListener, ModelTracker, model_peer};

/// Forwards every source notification unchanged.
struct MapModelInner {
    notify: ModelNotify,
}

impl ModelChangeListener for MapModelInner {
    fn row_changed(&self, row: usize) {
        self.notify.row_changed(row);
    }

    fn row_added(&self, index: usize, count: usize) {
        self.notify.row_added(index, count);
    }

    fn row_removed(&self, index: usize, count: usize) {
        self.notify.row_removed(index, count);
    }

    fn reset(&self) {
        self.notify.reset();
    }
}

/// A model applying a function to every row of its source.
///
/// The mapping preserves row count and order, so indices and notifications
/// pass through unchanged and nothing is cached. The map function runs on
/// every read.
///
/// `MapModel` is read-only: [`set_row_data`](Model::set_row_data) logs a
/// warning and does nothing.
///
/// # Example
///
/// ```
/// use horizon_models::model::{MapModel, Model, VecModel};
///
/// let names = VecModel::from_slice(&["ada", "grace"]);
/// let greetings = MapModel::new(names, |name: &str| format!("hello {name}"));
///
/// assert_eq!(greetings.row_data(1).as_deref(), Some("hello grace"));
/// ```
pub struct MapModel<S, M> {
    inner: Rc<MapModelInner>,
    source: ModelRc<S>,
    map_function: Box<dyn Fn(S) -> M>,
}

impl<S: 'static, M: 'static> MapModel<S, M> {
    /// Creates a model showing `map_function` applied to every row of `source`.
    pub fn new<F>(source: impl Into<ModelRc<S>>, map_function: F) -> Self
    where
        F: Fn(S) -> M + 'static,
    {
        let inner = Rc::new(MapModelInner {
            notify: ModelNotify::new(),
        });
        let source = source.into();
        source.attach_peer(model_peer(&inner));
        Self {
            inner,
            source,
            map_function: Box::new(map_function),
        }
    }

    /// Notifies peers with a reset, e.g. after state captured by the map
    /// function changed.
    pub fn reset(&self) {
        tracing::trace!(target: targets::MAP, "reset");
        self.inner.notify.reset();
    }

    /// Returns the source model.
    pub fn source_model(&self) -> &ModelRc<S> {
        &self.source
    }
}

impl<S: 'static, M: 'static> Model for MapModel<S, M> {
    type Data = M;

    fn row_count(&self) -> usize {
        self.source.row_count()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        self.source.row_data(row).map(|data| (self.map_function)(data))
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.inner.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<S, M> fmt::Debug for MapModel<S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapModel")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

static_assertions::assert_not_impl_any!(MapModel<i32, String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_util::{Event, TestView};
    use crate::model::{ModelExt, VecModel};

    #[test]
    fn test_map_row_data() {
        let source = Rc::new(VecModel::from(vec![1, 2, 3]));
        let doubled = MapModel::new(source.clone(), |value: i32| value * 2);

        assert_eq!(doubled.row_count(), 3);
        assert_eq!(doubled.iter().collect::<Vec<_>>(), vec![2, 4, 6]);
        assert_eq!(doubled.row_data(3), None);

        // Reads are never cached
        source.set_row_data(0, 10);
        assert_eq!(doubled.row_data(0), Some(20));
    }

    #[test]
    fn test_map_forwards_notifications() {
        let source = Rc::new(VecModel::from(vec![1, 2, 3]));
        let labels = MapModel::new(source.clone(), |value: i32| value.to_string());
        let view = Rc::new(TestView::default());
        labels.attach_peer(model_peer(&view));

        source.push(4);
        source.remove(0);
        source.set_row_data(1, 30);
        source.clear();
        labels.reset();
        assert_eq!(
            view.take(),
            vec![
                Event::Added(3, 1),
                Event::Removed(0, 1),
                Event::Changed(1),
                Event::Reset,
                Event::Reset,
            ]
        );
    }

    #[test]
    fn test_map_is_read_only() {
        let source = Rc::new(VecModel::from(vec![1, 2]));
        let negated = source.clone().map(|value| -value);

        negated.set_row_data(0, 5);
        assert_eq!(source.row_data(0), Some(1));
        assert_eq!(negated.row_data(0), Some(-1));
    }

    #[test]
    fn test_map_chain() {
        let source = Rc::new(VecModel::from(vec![1, 2, 3, 4]));
        let squares_of_evens = source
            .clone()
            .filter(|value| value % 2 == 0)
            .map(|value| value * value);
        assert_eq!(squares_of_evens.iter().collect::<Vec<_>>(), vec![4, 16]);

        source.push(6);
        assert_eq!(squares_of_evens.row_data(2), Some(36));
    }
}
