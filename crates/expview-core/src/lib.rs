//! expview-core: configuration store and chart data binding for expview.
//!
//! The store is a tree of pure reducers: every [`Action`] produces a complete
//! new [`AppState`] snapshot, and only the `config` subtree is persisted,
//! behind a schema-version gate. The binder merges sparse log records of many
//! results onto one x/y key space for plotting.

pub mod action;
pub mod binder;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod persist;
pub mod reducers;
pub mod state;
pub mod storage;
pub mod store;

pub use action::Action;
pub use binder::{bind, ChartData, PlotPoint, SeriesBinding};
pub use chart::{log_keys, value_ranges, ChartView, LogKeys, ValueRange};
pub use config::{AxisConfig, AxisName, ConfigState, GlobalConfig, ProjectConfig, ResultConfig};
pub use error::ExpviewError;
pub use models::{Experiment, LogRecord, ProjectId, ResultId, RunResult};
pub use persist::{ConfigStorage, PersistedConfig, CURRENT_SCHEMA_VERSION};
pub use reducers::reduce;
pub use state::{AppState, FetchStatus};
pub use store::Store;
