use std::sync::Arc;

use crate::action::Action;
use crate::config::{ProjectConfig, ProjectsConfig};
use crate::models::ResultId;
use crate::reducers::{axes, lines, results_config};

pub fn reduce(state: &ProjectsConfig, action: &Action) -> ProjectsConfig {
    if let Some(result_id) = action.removed_result() {
        return sweep_result(state, result_id, action);
    }

    let Some(project_id) = action.project_id() else {
        return state.clone();
    };

    let fresh = ProjectConfig::default();
    let seed = match action {
        Action::ProjectConfigReset { .. } => &fresh,
        _ => state.get(&project_id).map(Arc::as_ref).unwrap_or(&fresh),
    };

    let next_config = ProjectConfig {
        axes: axes::reduce(&seed.axes, action),
        results_config: results_config::reduce(&seed.results_config, action),
        lines: lines::reduce(&seed.lines, action),
    };

    let mut next = state.clone();
    next.insert(project_id, Arc::new(next_config));
    next
}

/// A removed result carries no project id: drop its config from every project
/// holding one, leaving the other entries shared with the previous snapshot.
fn sweep_result(state: &ProjectsConfig, result_id: ResultId, action: &Action) -> ProjectsConfig {
    state
        .iter()
        .map(|(id, config)| {
            if !config.results_config.contains_key(&result_id) {
                return (*id, Arc::clone(config));
            }
            let pruned = ProjectConfig {
                axes: config.axes.clone(),
                results_config: results_config::reduce(&config.results_config, action),
                lines: config.lines.clone(),
            };
            (*id, Arc::new(pruned))
        })
        .collect()
}
