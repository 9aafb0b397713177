//! Actions consumed by the configuration store.
//!
//! Each variant carries only the fields its reducers read. On the wire an
//! action is a JSON object tagged by `type`, e.g.
//! `{"type": "RESULTS_CONFIG_SELECT_TOGGLE", "projectId": 1, "resultId": 2}`.
//! Unrecognized tags decode to [`Action::Unknown`], which every reducer ignores.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::{AxisName, ChartSize, LineConfig, LineKey, RangeType, ResultNameAlignment, Scale};
use crate::models::{Command, Project, ProjectId, ResultId, RunResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub project: Project,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultListResponse {
    pub results: Vec<RunResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: RunResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandCreateResponse {
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandCreateBody {
    pub result_id: ResultId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // Entities
    ProjectListSuccess {
        response: ProjectListResponse,
    },
    ProjectSuccess {
        response: ProjectResponse,
    },
    ProjectUpdateSuccess {
        response: ProjectResponse,
    },
    ProjectDeleteSuccess {
        response: ProjectResponse,
    },
    ResultListRequest,
    ResultListSuccess {
        response: ResultListResponse,
    },
    ResultListFailure,
    ResultSuccess {
        response: ResultResponse,
    },
    ResultUpdateSuccess {
        response: ResultResponse,
    },
    ResultDeleteSuccess {
        response: ResultResponse,
    },
    CommandCreateRequest,
    CommandCreateSuccess {
        response: CommandCreateResponse,
        body: CommandCreateBody,
    },
    CommandCreateFailure,

    // Global config
    GlobalConfigPollingRateUpdate {
        polling_rate: u64,
    },
    GlobalConfigChartSizeUpdate {
        chart_size: ChartSize,
    },
    GlobalConfigLogsLimitUpdate {
        logs_limit: usize,
    },
    GlobalConfigResultNameAlignmentUpdate {
        result_name_alignment: ResultNameAlignment,
    },
    GlobalConfigHighlightTableAndChartUpdate {
        highlight_table_and_chart: bool,
    },

    // Axis config
    /// A missing `scale` resets the axis to linear.
    AxisConfigScaleUpdate {
        project_id: ProjectId,
        axis_name: AxisName,
        #[serde(default)]
        scale: Scale,
    },
    AxisConfigXKeyUpdate {
        project_id: ProjectId,
        axis_name: AxisName,
        x_axis_key: String,
    },
    /// `scale` defaults to the axis's current scale.
    AxisConfigScaleRangeTypeUpdate {
        project_id: ProjectId,
        axis_name: AxisName,
        #[serde(default)]
        scale: Option<Scale>,
        #[serde(default)]
        is_min: bool,
        #[serde(default)]
        range_type: RangeType,
    },
    /// `scale` defaults to the axis's current scale; a missing number clears the endpoint.
    AxisConfigScaleRangeNumberUpdate {
        project_id: ProjectId,
        axis_name: AxisName,
        #[serde(default)]
        scale: Option<Scale>,
        #[serde(default)]
        is_min: bool,
        #[serde(default)]
        range_number: Option<f64>,
    },
    AxisConfigLogKeySelectToggle {
        project_id: ProjectId,
        axis_name: AxisName,
        log_key: String,
    },

    // Results config
    ResultsConfigSelectToggle {
        project_id: ProjectId,
        #[serde(default)]
        result_id: Option<ResultId>,
    },
    ResultsConfigHighlightUpdate {
        project_id: ProjectId,
        result_id: ResultId,
        highlight: bool,
    },
    ResultsConfigAssetsTableColumnsVisibilityUpdate {
        project_id: ProjectId,
        result_id: ResultId,
        #[serde(default)]
        known_train_info_keys_config: BTreeMap<String, bool>,
        #[serde(default)]
        known_content_keys_config: BTreeMap<String, bool>,
    },

    // Lines config
    LinesConfigLineUpdate {
        project_id: ProjectId,
        line_key: LineKey,
        #[serde(default)]
        line: LineConfig,
    },

    ProjectConfigReset {
        project_id: ProjectId,
    },

    #[serde(other)]
    Unknown,
}

impl Action {
    /// Project the action is scoped to, if any.
    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Action::AxisConfigScaleUpdate { project_id, .. }
            | Action::AxisConfigXKeyUpdate { project_id, .. }
            | Action::AxisConfigScaleRangeTypeUpdate { project_id, .. }
            | Action::AxisConfigScaleRangeNumberUpdate { project_id, .. }
            | Action::AxisConfigLogKeySelectToggle { project_id, .. }
            | Action::ResultsConfigSelectToggle { project_id, .. }
            | Action::ResultsConfigHighlightUpdate { project_id, .. }
            | Action::ResultsConfigAssetsTableColumnsVisibilityUpdate { project_id, .. }
            | Action::LinesConfigLineUpdate { project_id, .. }
            | Action::ProjectConfigReset { project_id } => Some(*project_id),
            _ => None,
        }
    }

    /// Result that this action removes from the system: a delete, or an
    /// update reporting the result as unregistered.
    pub fn removed_result(&self) -> Option<ResultId> {
        match self {
            Action::ResultDeleteSuccess { response } => Some(response.result.id),
            Action::ResultUpdateSuccess { response } if response.result.is_unregistered => {
                Some(response.result.id)
            }
            _ => None,
        }
    }

    /// Wire name of the action type.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::ProjectListSuccess { .. } => "PROJECT_LIST_SUCCESS",
            Action::ProjectSuccess { .. } => "PROJECT_SUCCESS",
            Action::ProjectUpdateSuccess { .. } => "PROJECT_UPDATE_SUCCESS",
            Action::ProjectDeleteSuccess { .. } => "PROJECT_DELETE_SUCCESS",
            Action::ResultListRequest => "RESULT_LIST_REQUEST",
            Action::ResultListSuccess { .. } => "RESULT_LIST_SUCCESS",
            Action::ResultListFailure => "RESULT_LIST_FAILURE",
            Action::ResultSuccess { .. } => "RESULT_SUCCESS",
            Action::ResultUpdateSuccess { .. } => "RESULT_UPDATE_SUCCESS",
            Action::ResultDeleteSuccess { .. } => "RESULT_DELETE_SUCCESS",
            Action::CommandCreateRequest => "COMMAND_CREATE_REQUEST",
            Action::CommandCreateSuccess { .. } => "COMMAND_CREATE_SUCCESS",
            Action::CommandCreateFailure => "COMMAND_CREATE_FAILURE",
            Action::GlobalConfigPollingRateUpdate { .. } => "GLOBAL_CONFIG_POLLING_RATE_UPDATE",
            Action::GlobalConfigChartSizeUpdate { .. } => "GLOBAL_CONFIG_CHART_SIZE_UPDATE",
            Action::GlobalConfigLogsLimitUpdate { .. } => "GLOBAL_CONFIG_LOGS_LIMIT_UPDATE",
            Action::GlobalConfigResultNameAlignmentUpdate { .. } => {
                "GLOBAL_CONFIG_RESULT_NAME_ALIGNMENT_UPDATE"
            }
            Action::GlobalConfigHighlightTableAndChartUpdate { .. } => {
                "GLOBAL_CONFIG_HIGHLIGHT_TABLE_AND_CHART_UPDATE"
            }
            Action::AxisConfigScaleUpdate { .. } => "AXIS_CONFIG_SCALE_UPDATE",
            Action::AxisConfigXKeyUpdate { .. } => "AXIS_CONFIG_X_KEY_UPDATE",
            Action::AxisConfigScaleRangeTypeUpdate { .. } => "AXIS_CONFIG_SCALE_RANGE_TYPE_UPDATE",
            Action::AxisConfigScaleRangeNumberUpdate { .. } => {
                "AXIS_CONFIG_SCALE_RANGE_NUMBER_UPDATE"
            }
            Action::AxisConfigLogKeySelectToggle { .. } => "AXIS_CONFIG_LOG_KEY_SELECT_TOGGLE",
            Action::ResultsConfigSelectToggle { .. } => "RESULTS_CONFIG_SELECT_TOGGLE",
            Action::ResultsConfigHighlightUpdate { .. } => "RESULTS_CONFIG_HIGHLIGHT_UPDATE",
            Action::ResultsConfigAssetsTableColumnsVisibilityUpdate { .. } => {
                "RESULTS_CONFIG_ASSETS_TABLE_COLUMNS_VISIBILITY_UPDATE"
            }
            Action::LinesConfigLineUpdate { .. } => "LINES_CONFIG_LINE_UPDATE",
            Action::ProjectConfigReset { .. } => "PROJECT_CONFIG_RESET",
            Action::Unknown => "UNKNOWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_tagged_action() {
        let action: Action = serde_json::from_value(json!({
            "type": "AXIS_CONFIG_SCALE_RANGE_NUMBER_UPDATE",
            "projectId": 3,
            "axisName": "yAxis",
            "isMin": true,
            "rangeNumber": 0.25
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::AxisConfigScaleRangeNumberUpdate {
                project_id: ProjectId(3),
                axis_name: AxisName::YAxis,
                scale: None,
                is_min: true,
                range_number: Some(0.25),
            }
        );
        assert_eq!(action.project_id(), Some(ProjectId(3)));
        assert_eq!(action.kind(), "AXIS_CONFIG_SCALE_RANGE_NUMBER_UPDATE");
    }

    #[test]
    fn test_unknown_type_decodes_to_unknown() {
        let action: Action =
            serde_json::from_value(json!({"type": "@@router/LOCATION_CHANGE"})).unwrap();
        assert_eq!(action, Action::Unknown);
        assert_eq!(action.project_id(), None);
    }

    #[test]
    fn test_delete_response_with_bare_id() {
        let action: Action = serde_json::from_value(json!({
            "type": "RESULT_DELETE_SUCCESS",
            "response": {"result": {"id": 1}}
        }))
        .unwrap();
        assert_eq!(action.removed_result(), Some(ResultId(1)));
    }

    #[test]
    fn test_update_removes_only_when_unregistered() {
        let registered: Action = serde_json::from_value(json!({
            "type": "RESULT_UPDATE_SUCCESS",
            "response": {"result": {"id": 4, "name": "r"}}
        }))
        .unwrap();
        assert_eq!(registered.removed_result(), None);

        let unregistered: Action = serde_json::from_value(json!({
            "type": "RESULT_UPDATE_SUCCESS",
            "response": {"result": {"id": 4, "isUnregistered": true}}
        }))
        .unwrap();
        assert_eq!(unregistered.removed_result(), Some(ResultId(4)));
    }

    #[test]
    fn test_string_ids_decode_as_numbers() {
        let action: Action = serde_json::from_value(json!({
            "type": "RESULTS_CONFIG_SELECT_TOGGLE",
            "projectId": "1",
            "resultId": "2"
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::ResultsConfigSelectToggle {
                project_id: ProjectId(1),
                result_id: Some(ResultId(2)),
            }
        );
    }

    #[test]
    fn test_scale_update_defaults_to_linear() {
        let action: Action = serde_json::from_value(json!({
            "type": "AXIS_CONFIG_SCALE_UPDATE",
            "projectId": 1,
            "axisName": "yAxis"
        }))
        .unwrap();
        assert_eq!(
            action,
            Action::AxisConfigScaleUpdate {
                project_id: ProjectId(1),
                axis_name: AxisName::YAxis,
                scale: Scale::Linear,
            }
        );
    }
}
