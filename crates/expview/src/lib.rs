#![doc = include_str!("../../../README.md")]
//!

//! This crate re-exports the configuration store, the persistence layer and
//! the chart data binder of `expview-core`.

pub use expview_core::*;
