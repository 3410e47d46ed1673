use std::sync::Once;

use jobboard_core::{
    update, AppState, Effect, Item, ListStatus, Msg, GENERIC_FETCH_ERROR, INVALID_URL_ERROR,
    REFRESHING_NOTICE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(board_logging::initialize_for_tests);
}

fn jobs(prefix: &str, count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| Item::new(format!("{prefix}-{i}"), format!("{prefix} job {i}"), "Acme", "NY"))
        .collect()
}

fn succeed(state: AppState, generation: u64, items: Vec<Item>) -> AppState {
    update(
        state,
        Msg::FetchSucceeded {
            generation,
            items,
            fetched_at: "12:00:00".to_string(),
        },
    )
    .0
}

#[test]
fn mount_starts_fetch_and_shows_loading() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::SourceChanged("https://jobs.example.com/api".to_string()),
    );

    assert_eq!(
        effects,
        vec![Effect::StartFetch {
            generation: 1,
            url: "https://jobs.example.com/api".to_string(),
        }]
    );
    assert_eq!(state.view().status, ListStatus::Loading { bytes: None });
    assert!(state.consume_dirty());
}

#[test]
fn progress_updates_loading_bytes() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (mut state, _) = update(state, Msg::FetchProgress { generation: 1, bytes: 512 });

    assert_eq!(state.view().status, ListStatus::Loading { bytes: Some(512) });
    assert!(state.consume_dirty());
}

#[test]
fn progress_during_refresh_does_not_rerender_stale_rows() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let state = succeed(state, 1, jobs("a", 4));
    let (mut state, _) = update(state, Msg::RefreshRequested);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::FetchProgress { generation: 2, bytes: 256 });
    assert!(!state.consume_dirty());
    assert_eq!(state.view().status, ListStatus::Ready);
    assert_eq!(state.view().notice.as_deref(), Some(REFRESHING_NOTICE));
}

#[test]
fn url_switch_cancels_previous_and_ignores_its_late_response() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (state, effects) = update(state, Msg::SourceChanged("https://b.example.com".into()));

    assert_eq!(
        effects,
        vec![
            Effect::CancelFetch { generation: 1 },
            Effect::StartFetch {
                generation: 2,
                url: "https://b.example.com/".to_string(),
            },
        ]
    );

    // B resolves first, then A's response arrives late.
    let state = succeed(state, 2, jobs("b", 3));
    let state = succeed(state, 1, jobs("a", 7));
    let (mut state, _) = update(state, Msg::FetchCancelled { generation: 1 });

    let view = state.view();
    assert_eq!(view.total_count, 3);
    assert!(view.rows.iter().all(|row| row.title.starts_with("b job")));
    assert!(state.consume_dirty());
}

#[test]
fn late_failure_from_superseded_request_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (state, _) = update(state, Msg::SourceChanged("https://b.example.com".into()));
    let (state, _) = update(
        state,
        Msg::FetchFailed {
            generation: 1,
            detail: "network error".into(),
        },
    );

    let view = state.view();
    assert_eq!(view.status, ListStatus::Loading { bytes: None });
    assert_eq!(view.notice, None);
}

#[test]
fn fresh_failure_replaces_the_list() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (state, _) = update(
        state,
        Msg::FetchFailed {
            generation: 1,
            detail: "http status 500".into(),
        },
    );

    let view = state.view();
    assert_eq!(view.status, ListStatus::Failed(GENERIC_FETCH_ERROR.to_string()));
    assert!(view.rows.is_empty());
}

#[test]
fn refresh_failure_keeps_stale_rows() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let state = succeed(state, 1, jobs("a", 4));

    let (state, effects) = update(state, Msg::RefreshRequested);
    assert_eq!(
        effects,
        vec![Effect::StartFetch {
            generation: 2,
            url: "https://a.example.com/".to_string(),
        }]
    );
    assert_eq!(state.view().notice.as_deref(), Some(REFRESHING_NOTICE));

    let (state, _) = update(
        state,
        Msg::FetchFailed {
            generation: 2,
            detail: "timeout".into(),
        },
    );
    let view = state.view();
    assert_eq!(view.status, ListStatus::Ready);
    assert_eq!(view.notice.as_deref(), Some(GENERIC_FETCH_ERROR));
    assert_eq!(view.rows.len(), 4);
    assert_eq!(view.last_updated.as_deref(), Some("12:00:00"));
}

#[test]
fn detach_cancels_in_flight_request() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (state, effects) = update(state, Msg::Detached);
    assert_eq!(effects, vec![Effect::CancelFetch { generation: 1 }]);

    let state = succeed(state, 1, jobs("a", 2));
    let view = state.view();
    assert_eq!(view.total_count, 0);
    assert_eq!(view.status, ListStatus::Ready);
}

#[test]
fn unchanged_url_does_not_refetch() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (_, effects) = update(state, Msg::SourceChanged("https://a.example.com".into()));

    assert!(effects.is_empty());
}

#[test]
fn invalid_url_reports_error_without_fetching() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::SourceChanged("not a url".into()));

    assert!(effects.is_empty());
    assert_eq!(
        state.view().status,
        ListStatus::Failed(INVALID_URL_ERROR.to_string())
    );
}

#[test]
fn switching_to_invalid_url_cancels_in_flight() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::SourceChanged("https://a.example.com".into()));
    let (_, effects) = update(state, Msg::SourceChanged("mailto:jobs@example.com".into()));

    assert_eq!(effects, vec![Effect::CancelFetch { generation: 1 }]);
}
