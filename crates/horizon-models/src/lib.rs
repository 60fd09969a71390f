//! Horizon Models - observable row models for data-bound UIs.
//!
//! This is the main crate: it provides the [`model`] module and re-exports
//! the core plumbing from `horizon-models-core`.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use horizon_models::model::{FilterModel, Model, VecModel};
//!
//! let source = Rc::new(VecModel::from(vec![1, 2, 3, 4, 5, 6]));
//! let even = FilterModel::new(source.clone(), |value: &i32| value % 2 == 0);
//! assert_eq!(even.row_count(), 3);
//!
//! source.push(8);
//! assert_eq!(even.row_data(3), Some(8));
//! ```

pub use horizon_models_core::*;

pub mod model;
