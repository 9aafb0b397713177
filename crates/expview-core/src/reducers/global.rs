use crate::action::Action;
use crate::config::GlobalConfig;

pub fn reduce(state: &GlobalConfig, action: &Action) -> GlobalConfig {
    match action {
        Action::GlobalConfigPollingRateUpdate { polling_rate } => GlobalConfig {
            polling_rate: *polling_rate,
            ..state.clone()
        },
        Action::GlobalConfigChartSizeUpdate { chart_size } => GlobalConfig {
            chart_size: *chart_size,
            ..state.clone()
        },
        Action::GlobalConfigLogsLimitUpdate { logs_limit } => GlobalConfig {
            logs_limit: *logs_limit,
            ..state.clone()
        },
        Action::GlobalConfigResultNameAlignmentUpdate {
            result_name_alignment,
        } => GlobalConfig {
            result_name_alignment: *result_name_alignment,
            ..state.clone()
        },
        Action::GlobalConfigHighlightTableAndChartUpdate {
            highlight_table_and_chart,
        } => GlobalConfig {
            highlight_table_and_chart: *highlight_table_and_chart,
            ..state.clone()
        },
        _ => state.clone(),
    }
}
