//! Sorting adapter.
//!
//! `SortModel<T>` exposes every row of a source model in the order defined by
//! a comparison function. It keeps a permutation of source rows and updates it
//! incrementally from the source's change notifications.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use horizon_models_core::PerfSpan;
use horizon_models_core::logging::{span_names, targets};

use super::mapping::MappingState;
use super::model_rc::ModelRc;
use super::notify::ModelNotify;
use super::traits::{Model, ModelChangeListener, ModelTracker, model_peer};

/// Type alias for a compare function for sorting.
///
/// Must be a total order over the row data; the model's invariants are
/// undefined otherwise.
pub type CompareFn<T> = Box<dyn Fn(&T, &T) -> Ordering>;

struct SortModelInner<T> {
    source: ModelRc<T>,
    compare: CompareFn<T>,
    /// Sorted position -> source row.
    sorted_rows: RefCell<Vec<usize>>,
    state: Cell<MappingState>,
    notify: ModelNotify,
}

impl<T> SortModelInner<T> {
    fn ensure_sorted(&self) {
        if !self.state.get().is_dirty() {
            return;
        }

        let _perf = PerfSpan::new(span_names::SORT_REBUILD);
        let source_rows = self.source.row_count();
        // Fetch every row once instead of once per comparison.
        let data: Vec<Option<T>> = (0..source_rows)
            .map(|row| self.source.row_data(row))
            .collect();
        let mut sorted: Vec<usize> = (0..source_rows).collect();
        sorted.sort_by(|&a, &b| self.compare_data(data[a].as_ref(), data[b].as_ref()));
        tracing::debug!(target: targets::SORT, source_rows, "rebuilt sort permutation");

        *self.sorted_rows.borrow_mut() = sorted;
        self.state.set(MappingState::Clean);
    }

    /// Orders rows without data after every row with data.
    fn compare_data(&self, a: Option<&T>, b: Option<&T>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => (self.compare)(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Lower bound of `data` among the currently sorted rows.
    fn insertion_point(&self, data: &T) -> usize {
        let sorted_rows = self.sorted_rows.borrow();
        sorted_rows.partition_point(|&row| {
            self.compare_data(self.source.row_data(row).as_ref(), Some(data)) == Ordering::Less
        })
    }

    fn invalidate(&self) {
        self.state.set(MappingState::Dirty);
        self.sorted_rows.borrow_mut().clear();
        self.notify.reset();
    }

    fn mapped_row(&self, sorted_row: usize) -> Option<usize> {
        self.ensure_sorted();
        self.sorted_rows.borrow().get(sorted_row).copied()
    }
}

impl<T> ModelChangeListener for SortModelInner<T> {
    fn row_changed(&self, row: usize) {
        if self.state.get().is_dirty() {
            self.invalidate();
            return;
        }

        let Some(data) = self.source.row_data(row) else {
            self.invalidate();
            return;
        };

        let old_pos = self.sorted_rows.borrow().iter().position(|&r| r == row);
        let Some(old_pos) = old_pos else {
            tracing::warn!(target: targets::SORT, row, "changed row missing from permutation");
            self.invalidate();
            return;
        };

        self.sorted_rows.borrow_mut().remove(old_pos);
        let new_pos = self.insertion_point(&data);

        if old_pos == new_pos {
            self.sorted_rows.borrow_mut().insert(new_pos, row);
            self.notify.row_changed(new_pos);
            return;
        }

        // The row stays out of the permutation while its removal is delivered.
        tracing::trace!(target: targets::SORT, row, old_pos, new_pos, "row moved");
        self.notify.row_removed(old_pos, 1);
        if self.state.get().is_dirty() {
            return;
        }
        self.sorted_rows.borrow_mut().insert(new_pos, row);
        self.notify.row_added(new_pos, 1);
    }

    fn row_added(&self, index: usize, count: usize) {
        if count == 0 {
            return;
        }
        if self.state.get().is_dirty() {
            self.invalidate();
            return;
        }

        for row in self.sorted_rows.borrow_mut().iter_mut() {
            if *row >= index {
                *row += count;
            }
        }

        for row in index..index + count {
            if self.state.get().is_dirty() {
                return;
            }
            let Some(data) = self.source.row_data(row) else {
                self.invalidate();
                return;
            };
            let pos = self.insertion_point(&data);
            self.sorted_rows.borrow_mut().insert(pos, row);
            self.notify.row_added(pos, 1);
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

        let removed_positions: Vec<usize> = {
            let mut sorted_rows = self.sorted_rows.borrow_mut();
            let mut removed = Vec::new();
            for (pos, row) in sorted_rows.iter_mut().enumerate() {
                if *row >= index + count {
                    *row -= count;
                } else if *row >= index {
                    removed.push(pos);
                }
            }
            removed
        };

        // Runs leave the permutation one at a time, so that its length always
        // matches what peers have been told.
        let mut already_removed = 0;
        for (start, len) in contiguous_runs(&removed_positions) {
            if self.state.get().is_dirty() {
                return;
            }
            let start = start - already_removed;
            self.sorted_rows.borrow_mut().drain(start..start + len);
            self.notify.row_removed(start, len);
            already_removed += len;
        }
    }

    fn reset(&self) {
        self.invalidate();
    }
}

/// Groups ascending positions into `(start, len)` runs of consecutive values.
fn contiguous_runs(positions: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &pos in positions {
        match runs.last_mut() {
            Some((start, len)) if *start + *len == pos => *len += 1,
            _ => runs.push((pos, 1)),
        }
    }
    runs
}

/// A model exposing every source row, ordered by a compare function.
///
/// The compare function is not called until the model is first read, and the
/// permutation is rebuilt lazily after every reset. Rows that compare equal
/// keep their source order after a rebuild.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use horizon_models::model::{Model, SortModel, VecModel};
///
/// let source = Rc::new(VecModel::from(vec![3, 4, 1, 2]));
/// let sorted = SortModel::new_ascending(source.clone());
/// assert_eq!(sorted.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
///
/// source.insert(0, 10);
/// assert_eq!(sorted.row_data(4), Some(10));
/// assert_eq!(sorted.unsorted_row(4), Some(0));
/// ```
pub struct SortModel<T>(Rc<SortModelInner<T>>);

impl<T: 'static> SortModel<T> {
    /// Creates a sorted view of `source` ordered by `compare`.
    pub fn new<F>(source: impl Into<ModelRc<T>>, compare: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + 'static,
    {
        let inner = Rc::new(SortModelInner {
            source: source.into(),
            compare: Box::new(compare),
            sorted_rows: RefCell::new(Vec::new()),
            state: Cell::new(MappingState::Dirty),
            notify: ModelNotify::new(),
        });
        inner.source.attach_peer(model_peer(&inner));
        Self(inner)
    }

    /// Creates a sorted view of `source` in ascending order.
    pub fn new_ascending(source: impl Into<ModelRc<T>>) -> Self
    where
        T: Ord,
    {
        Self::new(source, T::cmp)
    }

    /// Re-sorts every row and notifies peers with a reset.
    pub fn reset(&self) {
        self.0.invalidate();
    }

    /// Returns the source row shown at `sorted_row`.
    pub fn unsorted_row(&self, sorted_row: usize) -> Option<usize> {
        self.0.mapped_row(sorted_row)
    }

    /// Returns the source model.
    pub fn source_model(&self) -> &ModelRc<T> {
        &self.0.source
    }
}

impl<T: 'static> Model for SortModel<T> {
    type Data = T;

    fn row_count(&self) -> usize {
        self.0.ensure_sorted();
        self.0.sorted_rows.borrow().len()
    }

    fn row_data(&self, row: usize) -> Option<Self::Data> {
        let source_row = self.0.mapped_row(row)?;
        self.0.source.row_data(source_row)
    }

    fn set_row_data(&self, row: usize, data: Self::Data) {
        match self.0.mapped_row(row) {
            Some(source_row) => self.0.source.set_row_data(source_row, data),
            None => tracing::debug!(target: targets::SORT, row, "set_row_data out of range"),
        }
    }

    fn model_tracker(&self) -> &dyn ModelTracker {
        &self.0.notify
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> fmt::Debug for SortModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortModel")
            .field("state", &self.0.state.get())
            .field("sorted_rows", &self.0.sorted_rows.borrow().len())
            .finish()
    }
}

static_assertions::assert_not_impl_any!(SortModel<i32>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_util::{Event, TestView};
    use crate::model::{ModelExt, ReverseModel, VecModel};

    fn create_test_model(rows: Vec<i32>) -> (Rc<VecModel<i32>>, SortModel<i32>, Rc<TestView>) {
        let source = Rc::new(VecModel::from(rows));
        let sorted = SortModel::new_ascending(source.clone());
        let view = Rc::new(TestView::default());
        sorted.attach_peer(model_peer(&view));
        (source, sorted, view)
    }

    fn rows(model: &SortModel<i32>) -> Vec<i32> {
        model.iter().collect()
    }

    #[test]
    fn test_contiguous_runs() {
        assert_eq!(contiguous_runs(&[]), vec![]);
        assert_eq!(contiguous_runs(&[1, 2, 5, 7, 8]), vec![(1, 2), (5, 1), (7, 2)]);
    }

    #[test]
    fn test_sort_basic() {
        let (_source, sorted, _view) = create_test_model(vec![3, 4, 1, 2]);
        assert_eq!(sorted.row_count(), 4);
        assert_eq!(rows(&sorted), vec![1, 2, 3, 4]);
        assert_eq!(sorted.unsorted_row(0), Some(2));
        assert_eq!(sorted.unsorted_row(4), None);
    }

    #[test]
    fn test_sort_deferred_evaluation() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let source = Rc::new(VecModel::from(vec![2, 1]));
        let sorted = SortModel::new(source.clone(), move |a: &i32, b: &i32| {
            counter.set(counter.get() + 1);
            a.cmp(b)
        });

        source.push(0);
        assert_eq!(calls.get(), 0);

        assert_eq!(sorted.row_data(0), Some(0));
        assert!(calls.get() > 0);
    }

    #[test]
    fn test_sort_row_added() {
        let (source, sorted, view) = create_test_model(vec![3, 4, 1, 2]);
        assert_eq!(sorted.row_count(), 4);

        source.insert(0, 10);
        assert_eq!(view.take(), vec![Event::Added(4, 1)]);
        assert_eq!(rows(&sorted), vec![1, 2, 3, 4, 10]);

        // One notification per inserted row
        source.extend([0, 5]);
        assert_eq!(view.take(), vec![Event::Added(0, 1), Event::Added(5, 1)]);
        assert_eq!(rows(&sorted), vec![0, 1, 2, 3, 4, 5, 10]);
    }

    #[test]
    fn test_sort_row_changed() {
        let (source, sorted, view) = create_test_model(vec![3, 4, 1, 2]);
        assert_eq!(sorted.row_count(), 4);

        // Stays in place
        source.set_row_data(1, 10);
        assert_eq!(view.take(), vec![Event::Changed(3)]);
        assert_eq!(rows(&sorted), vec![1, 2, 3, 10]);

        // Moves to the front
        source.set_row_data(1, 0);
        assert_eq!(view.take(), vec![Event::Removed(3, 1), Event::Added(0, 1)]);
        assert_eq!(rows(&sorted), vec![0, 1, 2, 3]);
        assert_eq!(sorted.unsorted_row(0), Some(1));
    }

    #[test]
    fn test_sort_row_removed_runs() {
        let source = Rc::new(VecModel::from(vec![5, 0, 1, 6, 2]));
        let sorted = SortModel::new_ascending(source.clone());
        let view = Rc::new(TestView::default());
        sorted.attach_peer(model_peer(&view));
        assert_eq!(rows(&sorted), vec![0, 1, 2, 5, 6]);

        // Remove source rows 0..4 (values 5, 0, 1, 6): sorted positions 0, 1, 3, 4
        for _ in 0..4 {
            source.remove(0);
        }
        assert_eq!(
            view.take(),
            vec![
                Event::Removed(3, 1),
                Event::Removed(0, 1),
                Event::Removed(0, 1),
                Event::Removed(1, 1),
            ]
        );
        assert_eq!(rows(&sorted), vec![2]);
    }

    #[test]
    fn test_sort_batch_removal() {
        struct Batch {
            rows: RefCell<Vec<i32>>,
            notify: ModelNotify,
        }
        impl Model for Batch {
            type Data = i32;
            fn row_count(&self) -> usize {
                self.rows.borrow().len()
            }
            fn row_data(&self, row: usize) -> Option<i32> {
                self.rows.borrow().get(row).copied()
            }
            fn model_tracker(&self) -> &dyn ModelTracker {
                &self.notify
            }
        }

        let source = Rc::new(Batch {
            rows: RefCell::new(vec![5, 0, 1, 6, 2]),
            notify: ModelNotify::new(),
        });
        let sorted = Rc::new(SortModel::new_ascending(source.clone()));
        let view = Rc::new(TestView::default());
        sorted.attach_peer(model_peer(&view));
        let reversed = ReverseModel::new(sorted.clone());
        let reversed_view = Rc::new(TestView::default());
        reversed.attach_peer(model_peer(&reversed_view));
        assert_eq!(rows(&sorted), vec![0, 1, 2, 5, 6]);

        // Remove values 0, 1, 6 (source rows 1..4): sorted positions 0, 1 and 4
        *source.rows.borrow_mut() = vec![5, 2];
        source.notify.row_removed(1, 3);

        assert_eq!(view.take(), vec![Event::Removed(0, 2), Event::Removed(2, 1)]);
        assert_eq!(rows(&sorted), vec![2, 5]);

        // Downstream index math sees a consistent row count after each run
        assert_eq!(
            reversed_view.take(),
            vec![Event::Removed(3, 2), Event::Removed(0, 1)]
        );
        assert_eq!(sorted.unsorted_row(0), Some(1));
        assert_eq!(sorted.unsorted_row(1), Some(0));
    }

    #[test]
    fn test_sort_move_under_reverse() {
        let (source, sorted, view) = create_test_model(vec![1, 2, 3, 4]);
        let sorted = Rc::new(sorted);
        let reversed = ReverseModel::new(sorted.clone());
        let reversed_view = Rc::new(TestView::default());
        reversed.attach_peer(model_peer(&reversed_view));
        assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![4, 3, 2, 1]);

        // 1 -> 10 moves from the front of the sorted view to the back
        source.set_row_data(0, 10);
        assert_eq!(view.take(), vec![Event::Removed(0, 1), Event::Added(3, 1)]);
        assert_eq!(
            reversed_view.take(),
            vec![Event::Removed(3, 1), Event::Added(0, 1)]
        );
        assert_eq!(reversed.iter().collect::<Vec<_>>(), vec![10, 4, 3, 2]);
    }

    #[test]
    fn test_sort_by_descending() {
        let sorted = VecModel::from(vec![3, 4, 1, 2]).sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted.iter().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_stable_for_equal_keys() {
        let source = VecModel::from(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')]);
        let sorted = source.sort_by(|a, b| a.0.cmp(&b.0));
        let letters: String = sorted.iter().map(|(_, letter)| letter).collect();
        assert_eq!(letters, "bdac");
    }

    #[test]
    fn test_sort_set_row_data_forwards() {
        let (source, sorted, view) = create_test_model(vec![3, 4, 1, 2]);

        // Sorted row 0 is source row 2
        sorted.set_row_data(0, 7);
        assert_eq!(source.row_data(2), Some(7));
        assert_eq!(view.take(), vec![Event::Removed(0, 1), Event::Added(3, 1)]);
        assert_eq!(rows(&sorted), vec![2, 3, 4, 7]);
    }

    #[test]
    fn test_sort_source_reset() {
        let (source, sorted, view) = create_test_model(vec![3, 4, 1, 2]);
        assert_eq!(sorted.row_count(), 4);

        source.clear();
        assert_eq!(view.take(), vec![Event::Reset]);
        assert_eq!(sorted.row_count(), 0);
    }
}
