//! Observable row models and their adapters.
//!
//! A model is an ordered, index-addressable collection that tells its
//! observers how it changed. Adapters are models computed from another model,
//! kept in sync incrementally from that model's change notifications. They
//! can be chained, forming a one-way notification graph rooted at the mutable
//! models.
//!
//! # Core Types
//!
//! - `Model`: The trait that models implement
//! - `ModelChangeListener`: The callbacks a model invokes on its peers
//! - `ModelTracker`: Peer registration and dependency tracking
//! - `ModelNotify`: Delivers notifications to weakly held peers
//! - `ModelRc`: Shared, type-erased handle to a model
//!
//! # Model Implementations
//!
//! - `VecModel`: Rows owned in a `Vec`
//! - `FilterModel`: Source rows that pass a predicate
//! - `SortModel`: Source rows ordered by a compare function
//! - `MapModel`: Source rows transformed by a function
//! - `ReverseModel`: Source rows in reverse order
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use horizon_models::model::{Model, ModelExt, VecModel};
//!
//! let scores = Rc::new(VecModel::from(vec![12, 7, 30, 18]));
//!
//! // Passing scores, best first
//! let board = scores
//!     .clone()
//!     .filter(|score| *score >= 10)
//!     .sort()
//!     .reverse();
//! assert_eq!(board.iter().collect::<Vec<_>>(), vec![30, 18, 12]);
//!
//! scores.push(25);
//! assert_eq!(board.iter().collect::<Vec<_>>(), vec![30, 25, 18, 12]);
//! ```
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────┐ row_added   ┌─────────────┐ row_added   ┌─────────────┐
//! │  VecModel   │────────────>│ FilterModel │────────────>│    View     │
//! │ ModelNotify │ (weak peer) │ ModelNotify │ (weak peer) │  (listener) │
//! └─────────────┘             └─────────────┘             └─────────────┘
//!        ^                           │
//!        └───────── ModelRc ─────────┘
//!                  (strong)
//! ```
//!
//! Adapters own their source through a `ModelRc`. Sources only hold weak
//! peers, so dropping an adapter detaches it without any explicit call.

mod filter_model;
mod map_model;
mod mapping;
mod model_rc;
mod notify;
mod reverse_model;
mod sort_model;
#[cfg(test)]
mod test_util;
mod traits;
mod vec_model;

pub use filter_model::{FilterFn, FilterModel};
pub use map_model::MapModel;
pub use model_rc::ModelRc;
pub use notify::ModelNotify;
pub use reverse_model::ReverseModel;
pub use sort_model::{CompareFn, SortModel};
pub use traits::{
    Model, ModelChangeListener, ModelExt, ModelIterator, ModelPeer, ModelTracker, model_peer,
};
pub use vec_model::VecModel;
