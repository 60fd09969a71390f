//! Shared helpers for the model integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use horizon_models::model::{Model, ModelChangeListener, model_peer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Changed(usize),
    Added(usize, usize),
    Removed(usize, usize),
    Reset,
}

/// A listener that records every notification it receives.
#[derive(Default)]
pub struct RecordingView {
    events: RefCell<Vec<Event>>,
}

impl RecordingView {
    /// Creates a recorder attached to `model`.
    pub fn attach<M: Model>(model: &M) -> Rc<Self> {
        let view = Rc::new(Self::default());
        model.attach_peer(model_peer(&view));
        view
    }

    /// Returns the recorded events and clears the log.
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

impl ModelChangeListener for RecordingView {
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

/// Installs a subscriber printing model logs through the test harness.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("horizon_models=trace")
        .with_test_writer()
        .try_init();
}

/// Reads every row of `model`.
pub fn rows<M: Model>(model: &M) -> Vec<M::Data> {
    (0..model.row_count())
        .filter_map(|row| model.row_data(row))
        .collect()
}
