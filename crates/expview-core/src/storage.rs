//! File I/O: YAML documents, experiment dumps and action logs.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::action::Action;
use crate::error::{ExpviewError, Result};
use crate::models::{Experiment, ExperimentsDump};

// ─── YAML I/O ────────────────────────────────────────────────────────────────

pub fn save_yaml<T: serde::Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let content = serde_yaml::to_string(data)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn load_yaml_value(path: &Path) -> Result<Option<serde_yaml::Value>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_yaml::from_str(&content)?))
}

// ─── Experiment dumps ────────────────────────────────────────────────────────

/// Read an experiment dump (`{"experiments": [...]}` or a bare list).
pub fn load_experiments(path: &Path) -> Result<Vec<Experiment>> {
    if !path.exists() {
        return Err(ExpviewError::InputNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    let dump: ExperimentsDump = serde_json::from_str(&content)?;
    Ok(dump.into_experiments())
}

// ─── Action logs ─────────────────────────────────────────────────────────────

/// Parse a JSON Lines action log.
///
/// Blank lines and `#` comments are skipped. A line that does not decode to
/// an action is logged and dropped: a malformed action is a no-op, same as
/// an unknown one.
pub fn parse_action_log(content: &str) -> Vec<Action> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .filter_map(|(idx, line)| match serde_json::from_str::<Action>(line) {
            Ok(action) => Some(action),
            Err(e) => {
                warn!(line = idx + 1, error = %e, "Skipping malformed action");
                None
            }
        })
        .collect()
}

pub fn read_action_log(path: &Path) -> Result<Vec<Action>> {
    if !path.exists() {
        return Err(ExpviewError::InputNotFound(path.display().to_string()));
    }
    let content = fs::read_to_string(path)?;
    Ok(parse_action_log(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResultId;
    use tempfile::TempDir;

    #[test]
    fn test_parse_action_log_skips_noise() {
        let log = r#"
# toggles
{"type": "RESULTS_CONFIG_SELECT_TOGGLE", "projectId": 1, "resultId": 2}
not json
{"type": "RESULTS_CONFIG_SELECT_TOGGLE", "projectId": "one"}

{"type": "SOMETHING_ELSE"}
"#;
        let actions = parse_action_log(log);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], Action::Unknown);
    }

    #[test]
    fn test_load_experiments_accepts_both_shapes() {
        let tmp = TempDir::new().unwrap();
        let wrapped = tmp.path().join("wrapped.json");
        std::fs::write(
            &wrapped,
            r#"{"experiments": [{"id": 1, "name": "e", "results": [{"id": 3, "name": "r", "logs": [{"epoch": 1, "loss": 0.5, "note": "text"}]}]}]}"#,
        )
        .unwrap();
        let bare = tmp.path().join("bare.json");
        std::fs::write(&bare, r#"[{"name": "e", "results": []}]"#).unwrap();

        let exps = load_experiments(&wrapped).unwrap();
        assert_eq!(exps[0].results[0].id, ResultId(3));
        let record = &exps[0].results[0].logs[0];
        assert_eq!(record.get("epoch"), Some(1.0));
        assert_eq!(record.get("note"), None);

        assert_eq!(load_experiments(&bare).unwrap().len(), 1);
        assert!(matches!(
            load_experiments(&tmp.path().join("missing.json")),
            Err(ExpviewError::InputNotFound(_))
        ));
    }
}
