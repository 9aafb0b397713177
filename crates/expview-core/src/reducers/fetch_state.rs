use crate::action::Action;
use crate::state::{FetchState, FetchStatus};

pub fn reduce(state: &FetchState, action: &Action) -> FetchState {
    let results = match action {
        Action::ResultListRequest => Some(FetchStatus::Request),
        Action::ResultListSuccess { .. } => Some(FetchStatus::Success),
        Action::ResultListFailure => Some(FetchStatus::Failure),
        // Turning polling off clears the indicator whatever request was in flight.
        Action::GlobalConfigPollingRateUpdate { polling_rate: 0 } => Some(FetchStatus::Idle),
        _ => None,
    };
    let command_create = match action {
        Action::CommandCreateRequest => Some(FetchStatus::Request),
        Action::CommandCreateSuccess { .. } => Some(FetchStatus::Success),
        Action::CommandCreateFailure => Some(FetchStatus::Failure),
        _ => None,
    };

    FetchState {
        results: results.unwrap_or(state.results),
        command_create: command_create.unwrap_or(state.command_create),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_are_independent() {
        let state = reduce(&FetchState::default(), &Action::ResultListRequest);
        let state = reduce(&state, &Action::CommandCreateFailure);
        assert_eq!(state.results, FetchStatus::Request);
        assert_eq!(state.command_create, FetchStatus::Failure);
    }

    #[test]
    fn test_zero_polling_rate_resets_results() {
        for prior in [
            FetchStatus::Idle,
            FetchStatus::Request,
            FetchStatus::Success,
            FetchStatus::Failure,
        ] {
            let state = FetchState {
                results: prior,
                command_create: FetchStatus::Request,
            };
            let next = reduce(&state, &Action::GlobalConfigPollingRateUpdate { polling_rate: 0 });
            assert_eq!(next.results, FetchStatus::Idle);
            assert_eq!(next.command_create, FetchStatus::Request);
        }
    }

    #[test]
    fn test_nonzero_polling_rate_keeps_results() {
        let state = FetchState {
            results: FetchStatus::Request,
            command_create: FetchStatus::Idle,
        };
        let next = reduce(
            &state,
            &Action::GlobalConfigPollingRateUpdate {
                polling_rate: 10_000,
            },
        );
        assert_eq!(next.results, FetchStatus::Request);
    }
}
