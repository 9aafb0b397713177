//! Chart derivation: log-key discovery, value ranges, and the view tying a
//! project's axis configuration to the binder.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::binder::{bind, ChartData};
use crate::config::{AxisName, ProjectConfig, DEFAULT_X_AXIS_KEY};
use crate::models::{Experiment, ResultId, X_AXIS_KEYS};

/// Observed `[min, max]` of one log key. Defaults to `[0, 100]` when nothing was logged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl Default for ValueRange {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 100.0,
        }
    }
}

impl ValueRange {
    pub fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    pub fn include(self, v: f64) -> Self {
        Self {
            min: self.min.min(v),
            max: self.max.max(v),
        }
    }

    pub fn union(self, other: ValueRange) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Every finite value range, per log key, across all results.
pub fn value_ranges(experiments: &[Experiment]) -> BTreeMap<String, ValueRange> {
    let mut ranges: BTreeMap<String, ValueRange> = BTreeMap::new();
    let records = experiments
        .iter()
        .flat_map(|e| &e.results)
        .flat_map(|r| &r.logs);
    for record in records {
        for (key, v) in record.iter().filter(|(_, v)| v.is_finite()) {
            ranges
                .entry(key.to_string())
                .and_modify(|range| *range = range.include(v))
                .or_insert_with(|| ValueRange::point(v));
        }
    }
    ranges
}

/// Log keys seen in any record, split into x-axis candidates and plottable series.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct LogKeys {
    pub x_keys: Vec<String>,
    pub y_keys: Vec<String>,
}

pub fn log_keys(experiments: &[Experiment]) -> LogKeys {
    let seen: BTreeSet<&str> = experiments
        .iter()
        .flat_map(|e| &e.results)
        .flat_map(|r| &r.logs)
        .flat_map(|record| record.keys())
        .collect();

    let (x_keys, y_keys): (Vec<&str>, Vec<&str>) =
        seen.into_iter().partition(|k| X_AXIS_KEYS.contains(k));
    LogKeys {
        x_keys: x_keys.into_iter().map(String::from).collect(),
        y_keys: y_keys.into_iter().map(String::from).collect(),
    }
}

/// Everything a project's chart panel renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub x_axis_key: String,
    pub x_domain: [f64; 2],
    pub y_domain: [f64; 2],
    /// One chart per selected y-axis log key, in key order.
    pub charts: Vec<ChartData>,
}

impl ChartView {
    /// Derive the chart panel of one project from its configuration.
    ///
    /// Hidden results are left out. Domains resolve against the value ranges
    /// of the whole experiment list, so hiding a result does not rescale the axes.
    pub fn derive(
        config: &ProjectConfig,
        experiments: &[Experiment],
        result_ids: &[ResultId],
    ) -> Self {
        let x_axis = config.axis(AxisName::XAxis);
        let y_axis = config.axis(AxisName::YAxis);
        let x_axis_key = x_axis
            .x_axis_key
            .clone()
            .unwrap_or_else(|| DEFAULT_X_AXIS_KEY.to_string());

        let visible: Vec<ResultId> = result_ids
            .iter()
            .copied()
            .filter(|id| !config.is_hidden(*id))
            .collect();

        let ranges = value_ranges(experiments);
        let y_keys = y_axis.selected_log_keys();
        let x_range = ranges.get(&x_axis_key).copied().unwrap_or_default();
        let y_range = y_keys
            .iter()
            .filter_map(|k| ranges.get(*k).copied())
            .reduce(ValueRange::union)
            .unwrap_or_default();

        let charts = y_keys
            .iter()
            .map(|y_key| bind(experiments, &visible, &x_axis_key, y_key))
            .collect();

        Self {
            x_domain: x_axis.domain(x_range),
            y_domain: y_axis.domain(y_range),
            x_axis_key,
            charts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::config::{RangeType, ResultConfig};
    use crate::models::{LogRecord, ProjectId, RunResult};
    use crate::reducers::axes;

    fn experiments() -> Vec<Experiment> {
        let logs = |scale: f64| {
            (0..4)
                .map(|i| {
                    LogRecord::new()
                        .with("epoch", i as f64)
                        .with("iteration", (i * 100) as f64)
                        .with("main/loss", scale / (i + 1) as f64)
                        .with("main/accuracy", 0.2 * i as f64)
                })
                .collect::<Vec<_>>()
        };
        vec![Experiment::new(
            1,
            "exp",
            vec![
                RunResult::new(1, "r1").with_logs(logs(1.0)),
                RunResult::new(2, "r2").with_logs(logs(2.0)),
            ],
        )]
    }

    #[test]
    fn test_log_keys_split() {
        let keys = log_keys(&experiments());
        assert_eq!(keys.x_keys, vec!["epoch", "iteration"]);
        assert_eq!(keys.y_keys, vec!["main/accuracy", "main/loss"]);
    }

    #[test]
    fn test_value_ranges() {
        let ranges = value_ranges(&experiments());
        assert_eq!(ranges["main/loss"], ValueRange { min: 0.25, max: 2.0 });
        assert_eq!(ranges["epoch"], ValueRange { min: 0.0, max: 3.0 });
        assert!(!ranges.contains_key("missing"));
    }

    #[test]
    fn test_chart_view_uses_selected_keys_and_hides_results() {
        let mut config = ProjectConfig::default();
        config.axes = axes::reduce(
            &config.axes,
            &Action::AxisConfigLogKeySelectToggle {
                project_id: ProjectId(1),
                axis_name: AxisName::YAxis,
                log_key: "main/loss".to_string(),
            },
        );
        config.axes = axes::reduce(
            &config.axes,
            &Action::AxisConfigScaleRangeTypeUpdate {
                project_id: ProjectId(1),
                axis_name: AxisName::YAxis,
                scale: None,
                is_min: true,
                range_type: RangeType::Fixed,
            },
        );
        config.axes = axes::reduce(
            &config.axes,
            &Action::AxisConfigScaleRangeNumberUpdate {
                project_id: ProjectId(1),
                axis_name: AxisName::YAxis,
                scale: None,
                is_min: true,
                range_number: Some(0.0),
            },
        );
        config.results_config.insert(
            ResultId(2),
            ResultConfig {
                hidden: true,
                ..Default::default()
            },
        );

        let view = ChartView::derive(&config, &experiments(), &[ResultId(1), ResultId(2)]);
        assert_eq!(view.x_axis_key, "epoch");
        assert_eq!(view.x_domain, [0.0, 3.0]);
        assert_eq!(view.y_domain, [0.0, 2.0]);
        assert_eq!(view.charts.len(), 1);
        let chart = &view.charts[0];
        assert_eq!(chart.y_key, "main/loss");
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].result_id, ResultId(1));
    }

    #[test]
    fn test_chart_view_without_selection_is_empty() {
        let view = ChartView::derive(&ProjectConfig::default(), &experiments(), &[ResultId(1)]);
        assert!(view.charts.is_empty());
        assert_eq!(view.y_domain, [0.0, 100.0]);
    }
}
