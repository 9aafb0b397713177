//! Reducer tree of the configuration store.
//!
//! Every reducer is a total function `(&State, &Action) -> State`: actions it
//! does not recognize return a copy of its input. Reducers never mutate their
//! input, so a snapshot handed out earlier stays valid.

pub mod axes;
pub mod entities;
pub mod fetch_state;
pub mod global;
pub mod lines;
pub mod projects_config;
pub mod results_config;

use crate::action::Action;
use crate::config::ConfigState;
use crate::state::AppState;

/// Root reducer.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    AppState {
        entities: entities::reduce(&state.entities, action),
        fetch_state: fetch_state::reduce(&state.fetch_state, action),
        config: reduce_config(&state.config, action),
    }
}

/// Reducer of the persisted `config` subtree.
pub fn reduce_config(state: &ConfigState, action: &Action) -> ConfigState {
    ConfigState {
        projects_config: projects_config::reduce(&state.projects_config, action),
        global: global::reduce(&state.global, action),
    }
}
