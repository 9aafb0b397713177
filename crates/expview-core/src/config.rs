//! The persisted `config` subtree: global settings and per-project chart configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chart::ValueRange;
use crate::models::{ProjectId, ResultId};

/// Default x-axis key of a freshly seeded project.
pub const DEFAULT_X_AXIS_KEY: &str = "epoch";

/// Polling interval options offered by the dashboard, in milliseconds. `0` stops polling.
pub const POLLING_OPTIONS_MS: [u64; 5] = [0, 5_000, 10_000, 30_000, 60_000];

// ─── Axes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisName {
    XAxis,
    YAxis,
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisName::XAxis => write!(f, "xAxis"),
            AxisName::YAxis => write!(f, "yAxis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Linear => write!(f, "linear"),
            Scale::Log => write!(f, "log"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeType {
    #[default]
    Auto,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogKeyConfig {
    #[serde(default)]
    pub selected: bool,
}

/// Range settings remembered for one scale. Index 0 is the minimum, index 1 the maximum.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleRange {
    #[serde(default)]
    pub range_types: [RangeType; 2],
    #[serde(default)]
    pub range: [Option<f64>; 2],
}

/// Maps the `is_min` flag of a range action to its endpoint index.
pub fn endpoint(is_min: bool) -> usize {
    if is_min {
        0
    } else {
        1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    pub axis_name: AxisName,
    #[serde(default)]
    pub x_axis_key: Option<String>,
    #[serde(default)]
    pub scale: Scale,
    #[serde(default)]
    pub log_keys_config: BTreeMap<String, LogKeyConfig>,
    #[serde(default)]
    pub scale_range: BTreeMap<Scale, ScaleRange>,
}

impl AxisConfig {
    pub fn new(axis_name: AxisName) -> Self {
        Self {
            axis_name,
            x_axis_key: None,
            scale: Scale::default(),
            log_keys_config: BTreeMap::new(),
            scale_range: BTreeMap::new(),
        }
    }

    /// Log keys toggled on for this axis, in key order.
    pub fn selected_log_keys(&self) -> Vec<&str> {
        self.log_keys_config
            .iter()
            .filter(|(_, c)| c.selected)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Resolve the `[min, max]` domain for the current scale.
    ///
    /// Each endpoint follows the data range unless it is fixed to a stored number.
    pub fn domain(&self, data: ValueRange) -> [f64; 2] {
        let auto = [data.min, data.max];
        match self.scale_range.get(&self.scale) {
            Some(range) => [0, 1].map(|i| match (range.range_types[i], range.range[i]) {
                (RangeType::Fixed, Some(v)) => v,
                _ => auto[i],
            }),
            None => auto,
        }
    }
}

pub type Axes = BTreeMap<AxisName, AxisConfig>;

pub fn default_axes() -> Axes {
    let mut x_axis = AxisConfig::new(AxisName::XAxis);
    x_axis.x_axis_key = Some(DEFAULT_X_AXIS_KEY.to_string());
    BTreeMap::from([
        (AxisName::XAxis, x_axis),
        (AxisName::YAxis, AxisConfig::new(AxisName::YAxis)),
    ])
}

// ─── Results & lines ─────────────────────────────────────────────────────────

/// Column visibility of a result's assets table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsTableState {
    #[serde(default)]
    pub known_train_info_keys_config: BTreeMap<String, bool>,
    #[serde(default)]
    pub known_content_keys_config: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultConfig {
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default)]
    pub assets_table_state: AssetsTableState,
}

pub type ResultsConfig = BTreeMap<ResultId, ResultConfig>;

/// Opaque key of one plotted line: a result id paired with a log key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(pub String);

impl LineKey {
    pub fn new(result_id: ResultId, log_key: &str) -> Self {
        LineKey(format!("{}_{}", result_id, log_key))
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Style overrides of one line. Used both as stored value and as partial update.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
}

impl LineConfig {
    /// Shallow merge: fields set in `patch` win.
    pub fn merge(&self, patch: &LineConfig) -> LineConfig {
        LineConfig {
            color: patch.color.clone().or_else(|| self.color.clone()),
            is_visible: patch.is_visible.or(self.is_visible),
        }
    }
}

pub type Lines = BTreeMap<LineKey, LineConfig>;

// ─── Projects ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default = "default_axes")]
    pub axes: Axes,
    #[serde(default)]
    pub results_config: ResultsConfig,
    #[serde(default)]
    pub lines: Lines,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            axes: default_axes(),
            results_config: BTreeMap::new(),
            lines: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    pub fn axis(&self, name: AxisName) -> AxisConfig {
        self.axes
            .get(&name)
            .cloned()
            .unwrap_or_else(|| AxisConfig::new(name))
    }

    pub fn result_config(&self, id: ResultId) -> ResultConfig {
        self.results_config.get(&id).cloned().unwrap_or_default()
    }

    pub fn is_hidden(&self, id: ResultId) -> bool {
        self.results_config.get(&id).is_some_and(|c| c.hidden)
    }
}

/// Per-project configuration. Entries are shared between snapshots; a reducer
/// only allocates the entry it changes.
pub type ProjectsConfig = BTreeMap<ProjectId, Arc<ProjectConfig>>;

// ─── Global ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartSize {
    #[default]
    Small,
    Normal,
    Large,
}

impl ChartSize {
    /// Chart width and height in pixels.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            ChartSize::Small => (640, 360),
            ChartSize::Normal => (960, 540),
            ChartSize::Large => (1280, 720),
        }
    }
}

impl fmt::Display for ChartSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartSize::Small => write!(f, "small"),
            ChartSize::Normal => write!(f, "normal"),
            ChartSize::Large => write!(f, "large"),
        }
    }
}

impl FromStr for ChartSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(ChartSize::Small),
            "normal" => Ok(ChartSize::Normal),
            "large" => Ok(ChartSize::Large),
            other => Err(format!("unknown chart size '{other}' (expected small, normal or large)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultNameAlignment {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalConfig {
    /// Result polling interval in milliseconds; `0` disables polling.
    pub polling_rate: u64,
    pub chart_size: ChartSize,
    /// Maximum number of log records requested per result.
    #[serde(default = "default_logs_limit")]
    pub logs_limit: usize,
    #[serde(default)]
    pub result_name_alignment: ResultNameAlignment,
    #[serde(default = "default_true")]
    pub highlight_table_and_chart: bool,
}

fn default_logs_limit() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            polling_rate: POLLING_OPTIONS_MS[1],
            chart_size: ChartSize::default(),
            logs_limit: default_logs_limit(),
            result_name_alignment: ResultNameAlignment::default(),
            highlight_table_and_chart: true,
        }
    }
}

/// The whole `config` subtree, the part of the state that is persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    #[serde(default)]
    pub projects_config: ProjectsConfig,
    #[serde(default)]
    pub global: GlobalConfig,
}

impl ConfigState {
    /// Configuration of one project; unseen projects resolve to the default seed.
    pub fn project(&self, id: ProjectId) -> Arc<ProjectConfig> {
        self.projects_config
            .get(&id)
            .cloned()
            .unwrap_or_default()
    }
}
