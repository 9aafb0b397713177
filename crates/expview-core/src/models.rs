//! Data models for expview.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Unexpected, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Keys that are offered as x-axis candidates rather than plotted as series.
pub const X_AXIS_KEYS: [&str; 3] = ["iteration", "epoch", "elapsed_time"];

/// Numeric project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

/// Numeric result identifier, unique across all projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResultId(pub u64);

/// Accepts ids as integers, whole floats or integer strings (`1`, `1.0`, `"1"`).
/// Map keys arrive as strings in JSON, so both forms resolve to the same id.
struct IdVisitor;

impl<'de> Visitor<'de> for IdVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer id")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
        u64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u64, E> {
        if v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64 {
            Ok(v as u64)
        } else {
            Err(E::invalid_value(Unexpected::Float(v), &self))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
        v.trim()
            .parse()
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor).map(ProjectId)
    }
}

impl<'de> Deserialize<'de> for ResultId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor).map(ResultId)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProjectId {
    fn from(v: u64) -> Self {
        ProjectId(v)
    }
}

impl From<u64> for ResultId {
    fn from(v: u64) -> Self {
        ResultId(v)
    }
}

/// One sparse metric snapshot of a result's log stream.
///
/// Non-numeric values (strings, nulls, nested objects) are dropped on load,
/// only plottable numbers are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LogRecord(BTreeMap<String, f64>);

impl LogRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for LogRecord {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        LogRecord(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'de> Deserialize<'de> for LogRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(k, v)| v.as_f64().map(|f| (k, f)))
            .collect())
    }
}

/// A project as returned by the project endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path_name: Option<String>,
}

/// A command issued against a running result (e.g. "take_snapshot").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default)]
    pub request: Option<serde_json::Value>,
    #[serde(default)]
    pub response: Option<serde_json::Value>,
}

/// One tracked training run and its log stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    pub id: ResultId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub path_name: Option<String>,
    #[serde(default)]
    pub logs: Vec<LogRecord>,
    #[serde(default)]
    pub commands: Vec<Command>,
    #[serde(default)]
    pub is_unregistered: bool,
}

impl RunResult {
    pub fn new(id: impl Into<ResultId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            path_name: None,
            logs: vec![],
            commands: vec![],
            is_unregistered: false,
        }
    }

    pub fn with_logs(mut self, logs: Vec<LogRecord>) -> Self {
        self.logs = logs;
        self
    }

    /// Name shown in legends: the explicit name, else the path it was logged to.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.path_name.as_deref())
            .unwrap_or("")
    }
}

/// A named group of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Experiment {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub results: Vec<RunResult>,
}

impl Experiment {
    pub fn new(id: u64, name: impl Into<String>, results: Vec<RunResult>) -> Self {
        Self {
            id,
            name: name.into(),
            results,
        }
    }
}

/// On-disk shape of an experiment dump: either `{"experiments": [...]}` or a bare list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExperimentsDump {
    Wrapped { experiments: Vec<Experiment> },
    Bare(Vec<Experiment>),
}

impl ExperimentsDump {
    pub fn into_experiments(self) -> Vec<Experiment> {
        match self {
            ExperimentsDump::Wrapped { experiments } => experiments,
            ExperimentsDump::Bare(experiments) => experiments,
        }
    }
}
