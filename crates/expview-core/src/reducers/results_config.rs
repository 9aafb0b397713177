use crate::action::Action;
use crate::config::{AssetsTableState, ResultConfig, ResultsConfig};
use crate::models::ResultId;

pub fn reduce(state: &ResultsConfig, action: &Action) -> ResultsConfig {
    match action {
        Action::ResultsConfigSelectToggle {
            result_id: Some(result_id),
            ..
        } => update_result(state, *result_id, |config| config.hidden = !config.hidden),
        Action::ResultsConfigHighlightUpdate {
            result_id,
            highlight,
            ..
        } => update_result(state, *result_id, |config| config.highlight = *highlight),
        Action::ResultsConfigAssetsTableColumnsVisibilityUpdate {
            result_id,
            known_train_info_keys_config,
            known_content_keys_config,
            ..
        } => update_result(state, *result_id, |config| {
            config.assets_table_state = AssetsTableState {
                known_train_info_keys_config: known_train_info_keys_config.clone(),
                known_content_keys_config: known_content_keys_config.clone(),
            }
        }),
        _ => match action.removed_result() {
            Some(result_id) => without_result(state, result_id),
            None => state.clone(),
        },
    }
}

/// Copy of `state` with every trace of `result_id` removed.
pub fn without_result(state: &ResultsConfig, result_id: ResultId) -> ResultsConfig {
    state
        .iter()
        .filter(|(id, _)| **id != result_id)
        .map(|(id, config)| (*id, config.clone()))
        .collect()
}

fn update_result(
    state: &ResultsConfig,
    result_id: ResultId,
    update: impl FnOnce(&mut ResultConfig),
) -> ResultsConfig {
    let mut config = state.get(&result_id).cloned().unwrap_or_default();
    update(&mut config);

    let mut next = state.clone();
    next.insert(result_id, config);
    next
}
