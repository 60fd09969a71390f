use std::cell::RefCell;

use super::ModelChangeListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    Changed(usize),
    Added(usize, usize),
    Removed(usize, usize),
    Reset,
}

/// Records every notification it receives.
#[derive(Default)]
pub(crate) struct TestView {
    events: RefCell<Vec<Event>>,
}

impl TestView {
    /// Returns the recorded events and clears the log.
    pub(crate) fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl ModelChangeListener for TestView {
    fn row_changed(&self, row: usize) {
        self.events.borrow_mut().push(Event::Changed(row));
    }

    fn row_added(&self, index: usize, count: usize) {
        self.events.borrow_mut().push(Event::Added(index, count));
    }

    fn row_removed(&self, index: usize, count: usize) {
        self.events.borrow_mut().push(Event::Removed(index, count));
    }

    fn reset(&self) {
        self.events.borrow_mut().push(Event::Reset);
    }
}
