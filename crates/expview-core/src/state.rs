//! The full store snapshot.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ConfigState;
use crate::models::{Project, ProjectId, ResultId, RunResult};

/// Status of one category of asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    #[default]
    Idle,
    Request,
    Success,
    Failure,
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Request => write!(f, "request"),
            FetchStatus::Success => write!(f, "success"),
            FetchStatus::Failure => write!(f, "failure"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState {
    pub results: FetchStatus,
    pub command_create: FetchStatus,
}

/// Id-keyed caches of server entities.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Entities {
    pub projects: BTreeMap<ProjectId, Arc<Project>>,
    pub results: BTreeMap<ResultId, Arc<RunResult>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub entities: Entities,
    pub fetch_state: FetchState,
    pub config: ConfigState,
}

impl AppState {
    pub fn with_config(config: ConfigState) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }
}
