//! The store: owns the current snapshot and runs actions through the reducer tree.

use std::sync::Arc;

use tracing::{debug, error};

use crate::action::Action;
use crate::error::Result;
use crate::persist::ConfigStorage;
use crate::reducers::reduce;
use crate::state::AppState;

/// Holds the current [`AppState`] snapshot.
///
/// A dispatch builds a complete new snapshot and swaps it in. Snapshots taken
/// with [`Store::snapshot`] are never modified afterwards.
pub struct Store {
    state: Arc<AppState>,
    storage: Option<ConfigStorage>,
}

impl Store {
    pub fn new(initial_state: AppState) -> Self {
        Self {
            state: Arc::new(initial_state),
            storage: None,
        }
    }

    /// Restore the `config` subtree from `storage` and persist it after every
    /// dispatch that changes it.
    pub fn with_storage(storage: ConfigStorage) -> Result<Self> {
        let config = storage.load()?;
        Ok(Self {
            state: Arc::new(AppState::with_config(config)),
            storage: Some(storage),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    /// Reduce `action` into a new snapshot and return it.
    pub fn dispatch(&mut self, action: Action) -> Arc<AppState> {
        let next = reduce(&self.state, &action);
        let config_changed = next.config != self.state.config;
        debug!(
            action = action.kind(),
            project = ?action.project_id(),
            config_changed,
            "Action reduced"
        );
        self.state = Arc::new(next);

        if config_changed {
            if let Some(storage) = &self.storage {
                // The new snapshot stands even if it cannot be written.
                if let Err(e) = storage.save(&self.state.config) {
                    error!(path = %storage.path().display(), "Failed to persist config: {}", e);
                }
            }
        }

        self.snapshot()
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> Arc<AppState> {
        for action in actions {
            self.dispatch(action);
        }
        self.snapshot()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}
