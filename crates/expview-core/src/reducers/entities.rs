use std::sync::Arc;

use crate::action::Action;
use crate::state::Entities;

pub fn reduce(state: &Entities, action: &Action) -> Entities {
    let mut next = state.clone();
    match action {
        Action::ProjectListSuccess { response } => {
            next.projects = response
                .projects
                .iter()
                .map(|p| (p.id, Arc::new(p.clone())))
                .collect();
        }
        Action::ProjectSuccess { response } | Action::ProjectUpdateSuccess { response } => {
            let project = &response.project;
            next.projects.insert(project.id, Arc::new(project.clone()));
        }
        Action::ProjectDeleteSuccess { response } => {
            next.projects.remove(&response.project.id);
        }
        Action::ResultListSuccess { response } => {
            next.results = response
                .results
                .iter()
                .map(|r| (r.id, Arc::new(r.clone())))
                .collect();
        }
        Action::ResultSuccess { response } => {
            let result = &response.result;
            next.results.insert(result.id, Arc::new(result.clone()));
        }
        Action::ResultUpdateSuccess { response } => {
            let result = &response.result;
            if result.is_unregistered {
                next.results.remove(&result.id);
            } else {
                next.results.insert(result.id, Arc::new(result.clone()));
            }
        }
        Action::ResultDeleteSuccess { response } => {
            next.results.remove(&response.result.id);
        }
        Action::CommandCreateSuccess { response, body } => {
            // A result that is no longer cached has nothing to attach the commands to.
            if let Some(cached) = next.results.get(&body.result_id) {
                let mut result = (**cached).clone();
                result.commands = response.commands.clone();
                next.results.insert(body.result_id, Arc::new(result));
            }
        }
        _ => {}
    }
    next
}
