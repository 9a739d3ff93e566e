use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, Effect, ExportOutcome, JobOutcome, Msg, OverlayRegion, ResultId, Severity,
    ThumbnailOutcome, ThumbnailStatus,
};
use url::Url;

fn generate(state: AppState, prompt: &str) -> (AppState, ResultId) {
    let (state, _) = update(state, Msg::PromptChanged(prompt.to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    let job_id = match effects.as_slice() {
        [Effect::StartGeneration { job_id, .. }] => *job_id,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, effects) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: JobOutcome::Completed {
                thumbnail: Url::parse("https://picsum.photos/seed/1/800/450").unwrap(),
                created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            },
        },
    );
    let result_id = match effects.as_slice() {
        [Effect::FetchThumbnail { result_id, .. }] => *result_id,
        other => panic!("unexpected effects {other:?}"),
    };
    (state, result_id)
}

#[test]
fn select_then_close_clears_preview() {
    let (state, id) = generate(AppState::new(), "lighthouse");
    let (state, _) = update(state, Msg::ResultSelected { result_id: id });
    assert_eq!(state.view().preview.map(|p| p.id), Some(id));

    let (state, _) = update(state, Msg::PreviewClosed);
    assert!(state.view().preview.is_none());
}

#[test]
fn selecting_another_result_replaces_preview() {
    let (state, first) = generate(AppState::new(), "first");
    let (state, second) = generate(state, "second");

    let (state, _) = update(state, Msg::ResultSelected { result_id: first });
    let (state, _) = update(state, Msg::ResultSelected { result_id: second });

    let preview = state.view().preview.expect("preview open");
    assert_eq!(preview.id, second);
    assert_eq!(preview.prompt, "second");
}

#[test]
fn selecting_unknown_result_is_ignored() {
    let (state, _) = generate(AppState::new(), "only");
    let (state, _) = update(state, Msg::ResultSelected { result_id: 99 });
    assert!(state.view().preview.is_none());
}

#[test]
fn backdrop_click_closes_but_content_click_does_not() {
    let (state, id) = generate(AppState::new(), "harbor");
    let (state, _) = update(state, Msg::ResultSelected { result_id: id });

    let (state, _) = update(
        state,
        Msg::OverlayClicked {
            region: OverlayRegion::Content,
        },
    );
    assert!(state.view().preview.is_some());

    let (state, _) = update(
        state,
        Msg::OverlayClicked {
            region: OverlayRegion::Backdrop,
        },
    );
    assert!(state.view().preview.is_none());
}

#[test]
fn download_exports_without_selecting() {
    let (state, id) = generate(AppState::new(), "waterfall");
    let expected = state.result(id).cloned().expect("result exists");

    let (state, effects) = update(state, Msg::DownloadClicked { result_id: id });

    assert!(state.view().preview.is_none());
    assert_eq!(effects, vec![Effect::Export { result: expected }]);
}

#[test]
fn download_from_preview_keeps_it_open() {
    let (state, id) = generate(AppState::new(), "aurora");
    let (state, _) = update(state, Msg::ResultSelected { result_id: id });
    let (state, effects) = update(state, Msg::DownloadClicked { result_id: id });

    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().preview.map(|p| p.id), Some(id));
}

#[test]
fn export_outcomes_become_notices() {
    let (state, id) = generate(AppState::new(), "canyon");
    let (state, _) = update(
        state,
        Msg::ExportFinished {
            result_id: id,
            outcome: ExportOutcome::Saved {
                location: "exports/canyon.jpg".to_string(),
            },
        },
    );
    let notice = state.view().notice.unwrap();
    assert_eq!(notice.severity, Severity::Info);
    assert!(notice.text.contains("exports/canyon.jpg"));

    let (state, _) = update(
        state,
        Msg::ExportFinished {
            result_id: id,
            outcome: ExportOutcome::Failed {
                reason: "disk full".to_string(),
            },
        },
    );
    assert_eq!(state.view().notice.unwrap().text, "export failed: disk full");

    let (state, _) = update(state, Msg::NoticeDismissed);
    assert!(state.view().notice.is_none());
}

#[test]
fn thumbnail_failure_degrades_to_fallback() {
    let (state, id) = generate(AppState::new(), "meadow");
    assert_eq!(
        state.view().cards[0].thumbnail_status,
        ThumbnailStatus::Pending
    );

    let (state, _) = update(
        state,
        Msg::ThumbnailLoaded {
            result_id: id,
            outcome: ThumbnailOutcome::Failed {
                reason: "network error".to_string(),
            },
        },
    );

    let view = state.view();
    assert_eq!(view.cards[0].thumbnail_status, ThumbnailStatus::Fallback);
    assert_eq!(view.notice.unwrap().severity, Severity::Error);
}

#[test]
fn thumbnail_success_records_size() {
    let (state, id) = generate(AppState::new(), "meadow");
    let (state, _) = update(
        state,
        Msg::ThumbnailLoaded {
            result_id: id,
            outcome: ThumbnailOutcome::Loaded { bytes: 2048 },
        },
    );

    assert_eq!(
        state.view().cards[0].thumbnail_status,
        ThumbnailStatus::Ready { bytes: 2048 }
    );
    assert!(state.view().notice.is_none());
}

#[test]
fn empty_state_only_when_idle_and_empty() {
    let state = AppState::new();
    assert!(state.view().show_empty_state);

    let (state, _) = update(state, Msg::PromptChanged("rain".to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    assert!(!state.view().show_empty_state);
}
