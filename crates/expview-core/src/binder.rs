//! Chart data binding: maps sparse per-result log records onto one x/y key space.
//!
//! Records of different results that share an x value merge into a single
//! [`PlotPoint`]. A point only holds the results that logged the y key at that
//! x; renderers connect across the gaps instead of drawing to zero.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::models::{Experiment, ResultId, RunResult};

/// Line colors, assigned by row position in the experiments table.
pub const PALETTE: [&str; 10] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
    "#6366f1", "#84cc16",
];

const NAME_SEPARATOR: &str = ".";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: f64,
    pub values: BTreeMap<ResultId, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesBinding {
    pub result_id: ResultId,
    /// `<experiment>.<result>`
    pub name: String,
    pub color: String,
    /// Key of this series' value in each [`PlotPoint`].
    pub field: ResultId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub x_key: String,
    pub y_key: String,
    pub points: Vec<PlotPoint>,
    pub series: Vec<SeriesBinding>,
}

impl ChartData {
    /// Points as flat JSON objects keyed by the x key and the result ids,
    /// e.g. `{"iteration": 0.0, "1": 1.0}`.
    pub fn to_json_rows(&self) -> Vec<serde_json::Value> {
        self.points
            .iter()
            .map(|point| {
                let mut row = serde_json::Map::new();
                row.insert(self.x_key.clone(), serde_json::json!(point.x));
                for (id, y) in &point.values {
                    row.insert(id.to_string(), serde_json::json!(y));
                }
                serde_json::Value::Object(row)
            })
            .collect()
    }
}

/// A result with its experiment name denormalized onto it.
struct ResultRow<'a> {
    experiment_name: &'a str,
    result: &'a RunResult,
    color: &'static str,
}

/// Color of the row at `row` in the experiments table.
pub fn palette_color(row: usize) -> &'static str {
    PALETTE[row % PALETTE.len()]
}

fn index_results(experiments: &[Experiment]) -> HashMap<ResultId, ResultRow<'_>> {
    let mut rows = HashMap::new();
    let mut row = 0;
    for experiment in experiments {
        // An experiment without results still occupies one table row.
        if experiment.results.is_empty() {
            row += 1;
            continue;
        }
        for result in &experiment.results {
            rows.insert(
                result.id,
                ResultRow {
                    experiment_name: &experiment.name,
                    result,
                    color: palette_color(row),
                },
            );
            row += 1;
        }
    }
    rows
}

/// Merge key of an x value; `-0.0` and `0.0` share a point.
fn x_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

/// Bind the requested results onto `x_key`/`y_key`.
///
/// Unknown ids are skipped, as are repeated ids. Records without a finite
/// value at `x_key` contribute nothing. Points are emitted in the order their
/// x value was first seen.
pub fn bind(
    experiments: &[Experiment],
    result_ids: &[ResultId],
    x_key: &str,
    y_key: &str,
) -> ChartData {
    let rows = index_results(experiments);

    let mut points: Vec<PlotPoint> = Vec::new();
    let mut point_index: HashMap<u64, usize> = HashMap::new();
    let mut series = Vec::new();
    let mut bound = HashSet::new();

    for result_id in result_ids {
        let Some(row) = rows.get(result_id) else {
            continue;
        };
        if !bound.insert(*result_id) {
            continue;
        }

        for record in &row.result.logs {
            let Some(x) = record.get(x_key).filter(|x| x.is_finite()) else {
                continue;
            };
            let idx = *point_index.entry(x_bits(x)).or_insert_with(|| {
                points.push(PlotPoint {
                    x,
                    values: BTreeMap::new(),
                });
                points.len() - 1
            });
            if let Some(y) = record.get(y_key).filter(|y| y.is_finite()) {
                points[idx].values.insert(*result_id, y);
            }
        }

        series.push(SeriesBinding {
            result_id: *result_id,
            name: format!(
                "{}{}{}",
                row.experiment_name,
                NAME_SEPARATOR,
                row.result.display_name()
            ),
            color: row.color.to_string(),
            field: *result_id,
        });
    }

    ChartData {
        x_key: x_key.to_string(),
        y_key: y_key.to_string(),
        points,
        series,
    }
}
