use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, ClipDuration, Effect, JobId, JobOutcome, JobPhase, Msg, Severity,
};
use url::Url;

fn submit_prompt(state: AppState, prompt: &str) -> (AppState, JobId) {
    let (state, _) = update(state, Msg::PromptChanged(prompt.to_string()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    let job_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::StartGeneration { job_id, .. } => Some(*job_id),
            _ => None,
        })
        .expect("start effect");
    (state, job_id)
}

fn completed_at(second: u32) -> JobOutcome {
    JobOutcome::Completed {
        thumbnail: Url::parse(&format!("https://picsum.photos/seed/{second}/800/450")).unwrap(),
        created_at: timestamp(second),
    }
}

fn timestamp(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, second).unwrap()
}

#[test]
fn progress_is_monotonic_and_clamped() {
    let (state, job_id) = submit_prompt(AppState::new(), "a red kite");

    let mut state = state;
    let mut seen = Vec::new();
    for percent in [2, 10, 6, 48, 130, 90] {
        let (next, effects) = update(state, Msg::JobProgress { job_id, percent });
        assert!(effects.is_empty());
        seen.push(next.view().job.progress);
        state = next;
    }

    assert_eq!(seen, vec![2, 10, 10, 48, 100, 100]);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert!(state.view().cards.is_empty());
}

#[test]
fn completion_prepends_one_result_and_resets_form() {
    let (state, _) = update(AppState::new(), Msg::DurationSelected(ClipDuration::Ten));
    let (state, job_id) = submit_prompt(state, "sunset over mountains");
    let (state, _) = update(state, Msg::JobProgress { job_id, percent: 64 });

    let (state, effects) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: completed_at(5),
        },
    );

    let view = state.view();
    assert_eq!(view.cards.len(), 1);
    assert_eq!(view.cards[0].prompt, "sunset over mountains");
    assert_eq!(view.cards[0].duration, ClipDuration::Ten);
    assert_eq!(view.cards[0].created_at, timestamp(5));
    assert_eq!(view.job.phase, JobPhase::Idle);
    assert_eq!(view.job.progress, 0);
    assert_eq!(view.form.prompt, "");
    assert_eq!(view.form.duration, ClipDuration::Ten);
    assert!(view.form.enabled);
    assert_eq!(
        effects,
        vec![Effect::FetchThumbnail {
            result_id: view.cards[0].id,
            url: view.cards[0].thumbnail.clone(),
        }]
    );
}

#[test]
fn newer_results_come_first_with_unique_ids() {
    let (state, first) = submit_prompt(AppState::new(), "first");
    let (state, _) = update(
        state,
        Msg::JobDone {
            job_id: first,
            outcome: completed_at(1),
        },
    );
    let (state, second) = submit_prompt(state, "second");
    let (state, _) = update(
        state,
        Msg::JobDone {
            job_id: second,
            outcome: completed_at(2),
        },
    );

    let cards = state.view().cards;
    let prompts: Vec<_> = cards.iter().map(|c| c.prompt.as_str()).collect();
    assert_eq!(prompts, vec!["second", "first"]);
    assert_ne!(cards[0].id, cards[1].id);
    assert!(cards[0].created_at > cards[1].created_at);
}

#[test]
fn double_submit_yields_single_result() {
    let (state, job_id) = submit_prompt(AppState::new(), "storm clouds");
    let (state, extra) = update(state, Msg::SubmitClicked);
    assert!(extra.is_empty());

    let (state, _) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: completed_at(3),
        },
    );

    assert_eq!(state.view().cards.len(), 1);
}

#[test]
fn stale_outcomes_are_ignored() {
    let (state, job_id) = submit_prompt(AppState::new(), "glacier");
    let (state, effects) = update(state, Msg::CancelClicked);
    assert_eq!(effects, vec![Effect::CancelGeneration { job_id }]);
    assert_eq!(state.view().job.phase, JobPhase::Idle);

    let before = state.view();
    let (state, _) = update(state, Msg::JobProgress { job_id, percent: 40 });
    let (state, effects) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: completed_at(9),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.view().cards, before.cards);
    assert_eq!(state.view().job, before.job);
}

#[test]
fn cancel_keeps_prompt_for_retry() {
    let (state, _) = submit_prompt(AppState::new(), "neon alley");
    let (state, _) = update(state, Msg::CancelClicked);

    let view = state.view();
    assert_eq!(view.form.prompt, "neon alley");
    assert!(view.form.can_submit);
    assert_eq!(view.notice.unwrap().severity, Severity::Info);
}

#[test]
fn cancel_when_idle_does_nothing() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::CancelClicked);
    assert_eq!(next, state);
    assert!(effects.is_empty());
}

#[test]
fn timeout_returns_to_idle_and_preserves_prompt() {
    let (state, job_id) = submit_prompt(AppState::new(), "desert caravan");
    let (state, effects) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: JobOutcome::TimedOut,
        },
    );

    let view = state.view();
    assert!(effects.is_empty());
    assert_eq!(view.job.phase, JobPhase::Idle);
    assert_eq!(view.form.prompt, "desert caravan");
    assert!(view.cards.is_empty());
    assert!(view.show_empty_state);
    let notice = view.notice.expect("timeout notice");
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.text.contains("timed out"));
}

#[test]
fn backend_failure_is_surfaced() {
    let (state, job_id) = submit_prompt(AppState::new(), "forest trail");
    let (state, _) = update(
        state,
        Msg::JobDone {
            job_id,
            outcome: JobOutcome::Failed {
                reason: "quota exceeded".to_string(),
            },
        },
    );

    let notice = state.view().notice.expect("failure notice");
    assert_eq!(notice.text, "generation failed: quota exceeded");
    assert_eq!(state.view().form.prompt, "forest trail");
}
