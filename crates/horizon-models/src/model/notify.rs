//! Change notification delivery.

use std::cell::RefCell;
use std::fmt;

use horizon_models_core::logging::targets;
use horizon_models_core::{ChangeTracker, debug_assert_main_thread};

use super::traits::{ModelChangeListener, ModelPeer, ModelTracker};

/// The notification hub owned by every mutable model.
///
/// A model calls the `row_*` and [`reset`](Self::reset) methods right after
/// mutating its storage. Each call:
///
/// 1. marks the [`ChangeTracker`] so external bindings re-read the model, and
/// 2. delivers the notification synchronously to every attached peer that is
///    still alive, in attachment order.
///
/// Peers are held weakly. A peer whose listener has been dropped is skipped and
/// pruned from the list. Peers may attach further peers, or drop themselves,
/// from inside a callback; the peer list is snapshotted before delivery so
/// neither disturbs the notification in progress.
#[derive(Default)]
pub struct ModelNotify {
    peers: RefCell<Vec<ModelPeer>>,
    tracker: ChangeTracker,
}

impl ModelNotify {
    /// Create a notifier with no peers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notify peers that the data of `row` changed.
    pub fn row_changed(&self, row: usize) {
        debug_assert_main_thread!();
        tracing::trace!(target: targets::NOTIFY, row, "row_changed");
        self.tracker.mark_row_changed(row);
        self.for_each_peer(|peer| peer.row_changed(row));
    }

    /// Notify peers that `count` rows were inserted starting at `index`.
    pub fn row_added(&self, index: usize, count: usize) {
        debug_assert_main_thread!();
        tracing::trace!(target: targets::NOTIFY, index, count, "row_added");
        self.tracker.mark_rows_shifted();
        self.for_each_peer(|peer| peer.row_added(index, count));
    }

    /// Notify peers that `count` rows starting at `index` were removed.
    pub fn row_removed(&self, index: usize, count: usize) {
        debug_assert_main_thread!();
        tracing::trace!(target: targets::NOTIFY, index, count, "row_removed");
        self.tracker.mark_rows_shifted();
        self.for_each_peer(|peer| peer.row_removed(index, count));
    }

    /// Notify peers that the whole model may have changed.
    pub fn reset(&self) {
        debug_assert_main_thread!();
        tracing::trace!(target: targets::NOTIFY, "reset");
        self.tracker.mark_rows_shifted();
        self.for_each_peer(|peer| peer.reset());
    }

    /// Returns the change tracker marked by every notification.
    pub fn tracker(&self) -> &ChangeTracker {
        &self.tracker
    }

    /// Returns the number of attached peers that are still alive.
    pub fn peer_count(&self) -> usize {
        self.peers
            .borrow()
            .iter()
            .filter(|peer| peer.strong_count() > 0)
            .count()
    }

    fn for_each_peer(&self, f: impl Fn(&dyn ModelChangeListener)) {
        // No borrow may be held while peers run: they can attach new peers.
        let snapshot: Vec<ModelPeer> = self.peers.borrow().clone();

        let mut expired = 0usize;
        for peer in &snapshot {
            // Upgrade right before the call: an earlier peer may have dropped this one.
            match peer.upgrade() {
                Some(listener) => f(&*listener),
                None => expired += 1,
            }
        }

        if expired > 0 {
            self.peers
                .borrow_mut()
                .retain(|peer| peer.strong_count() > 0);
            tracing::trace!(target: targets::NOTIFY, expired, "pruned expired peers");
        }
    }
}

impl ModelTracker for ModelNotify {
    fn attach_peer(&self, peer: ModelPeer) {
        tracing::trace!(target: targets::NOTIFY, "attach_peer");
        self.peers.borrow_mut().push(peer);
    }

    fn track_row_count_changes(&self) {
        self.tracker.track_row_count();
    }

    fn track_row_data_changes(&self, row: usize) {
        self.tracker.track_row_data(row);
    }
}

impl fmt::Debug for ModelNotify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelNotify")
            .field("peers", &self.peers.borrow().len())
            .field("tracker", &self.tracker)
            .finish()
    }
}

static_assertions::assert_not_impl_any!(ModelNotify: Send, Sync);

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::model::model_peer;
    use crate::model::test_util::{Event, TestView};

    #[test]
    fn test_delivery_in_attachment_order() {
        let notify = ModelNotify::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        struct Tagged {
            tag: u8,
            order: Rc<RefCell<Vec<u8>>>,
        }
        impl ModelChangeListener for Tagged {
            fn row_changed(&self, _row: usize) {
                self.order.borrow_mut().push(self.tag);
            }
            fn row_added(&self, _index: usize, _count: usize) {}
            fn row_removed(&self, _index: usize, _count: usize) {}
            fn reset(&self) {}
        }

        let first = Rc::new(Tagged {
            tag: 1,
            order: order.clone(),
        });
        let second = Rc::new(Tagged {
            tag: 2,
            order: order.clone(),
        });
        notify.attach_peer(model_peer(&first));
        notify.attach_peer(model_peer(&second));

        notify.row_changed(0);
        assert_eq!(*order.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_dropped_peer_is_pruned() {
        let notify = ModelNotify::new();
        let kept = Rc::new(TestView::default());
        let dropped = Rc::new(TestView::default());
        notify.attach_peer(model_peer(&kept));
        notify.attach_peer(model_peer(&dropped));
        assert_eq!(notify.peer_count(), 2);

        drop(dropped);
        assert_eq!(notify.peer_count(), 1);

        notify.row_added(0, 2);
        assert_eq!(kept.take(), vec![Event::Added(0, 2)]);
        assert_eq!(notify.peers.borrow().len(), 1);
    }

    #[test]
    fn test_peer_attaching_during_delivery() {
        struct Attacher {
            notify: Rc<ModelNotify>,
            late: Rc<TestView>,
            attached: Cell<bool>,
        }
        impl ModelChangeListener for Attacher {
            fn row_changed(&self, _row: usize) {}
            fn row_added(&self, _index: usize, _count: usize) {}
            fn row_removed(&self, _index: usize, _count: usize) {}
            fn reset(&self) {
                if !self.attached.replace(true) {
                    self.notify.attach_peer(model_peer(&self.late));
                }
            }
        }

        let notify = Rc::new(ModelNotify::new());
        let late = Rc::new(TestView::default());
        let attacher = Rc::new(Attacher {
            notify: notify.clone(),
            late: late.clone(),
            attached: Cell::new(false),
        });
        notify.attach_peer(model_peer(&attacher));

        // The late peer is not part of the in-flight delivery
        notify.reset();
        assert!(late.take().is_empty());

        notify.reset();
        assert_eq!(late.take(), vec![Event::Reset]);
    }

    #[test]
    fn test_notifications_mark_tracker() {
        let notify = ModelNotify::new();
        notify.track_row_count_changes();
        notify.track_row_data_changes(4);

        notify.row_changed(4);
        assert!(notify.tracker().take_row_data_dirty());
        assert!(!notify.tracker().take_row_count_dirty());

        notify.row_removed(0, 1);
        assert!(notify.tracker().take_row_count_dirty());
        assert!(notify.tracker().take_row_data_dirty());
        assert!(!notify.tracker().is_row_tracked(4));
    }
}
