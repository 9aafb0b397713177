use crate::action::Action;
use crate::config::Lines;

pub fn reduce(state: &Lines, action: &Action) -> Lines {
    match action {
        Action::LinesConfigLineUpdate { line_key, line, .. } => {
            let merged = state
                .get(line_key)
                .map(|existing| existing.merge(line))
                .unwrap_or_else(|| line.clone());
            let mut next = state.clone();
            next.insert(line_key.clone(), merged);
            next
        }
        _ => state.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineConfig, LineKey};
    use crate::models::{ProjectId, ResultId};

    #[test]
    fn test_line_update_merges_into_existing() {
        let key = LineKey::new(ResultId(1), "main/loss");
        let color = Action::LinesConfigLineUpdate {
            project_id: ProjectId(1),
            line_key: key.clone(),
            line: LineConfig {
                color: Some("#10b981".to_string()),
                is_visible: None,
            },
        };
        let visibility = Action::LinesConfigLineUpdate {
            project_id: ProjectId(1),
            line_key: key.clone(),
            line: LineConfig {
                color: None,
                is_visible: Some(false),
            },
        };
        let state = reduce(&reduce(&Lines::new(), &color), &visibility);
        assert_eq!(
            state[&key],
            LineConfig {
                color: Some("#10b981".to_string()),
                is_visible: Some(false),
            }
        );
        assert_eq!(key.to_string(), "1_main/loss");
    }
}
