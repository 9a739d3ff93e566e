use pretty_assertions::assert_eq;
use studio_core::{
    update, AppState, AspectRatio, ClipDuration, Effect, JobPhase, JobRequest, Msg, Severity,
};

fn submit_prompt(state: AppState, prompt: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::PromptChanged(prompt.to_string()));
    update(state, Msg::SubmitClicked)
}

#[test]
fn submit_starts_job_and_disables_form() {
    let (state, _) = update(AppState::new(), Msg::DurationSelected(ClipDuration::Ten));
    let (state, _) = update(state, Msg::AspectRatioSelected(AspectRatio::Square));
    let (next, effects) = submit_prompt(state, "sunset over mountains");

    let view = next.view();
    assert_eq!(view.job.phase, JobPhase::Running);
    assert_eq!(view.job.progress, 0);
    assert!(!view.form.enabled);
    assert!(!view.form.can_submit);
    assert!(!view.show_empty_state);
    assert_eq!(
        effects,
        vec![Effect::StartGeneration {
            job_id: 1,
            request: JobRequest {
                prompt: "sunset over mountains".to_string(),
                duration: ClipDuration::Ten,
                aspect_ratio: AspectRatio::Square,
            },
        }]
    );
}

#[test]
fn whitespace_prompt_is_rejected_with_notice() {
    let (mut state, effects) = submit_prompt(AppState::new(), "   ");

    let view = state.view();
    assert_eq!(view.job.phase, JobPhase::Idle);
    assert!(view.form.enabled);
    assert!(!view.form.can_submit);
    assert!(view.cards.is_empty());
    assert!(view.show_empty_state);
    assert!(effects.is_empty());
    let notice = view.notice.expect("validation notice");
    assert_eq!(notice.severity, Severity::Error);
    assert!(state.consume_dirty());
}

#[test]
fn typing_a_prompt_clears_validation_notice() {
    let (state, _) = submit_prompt(AppState::new(), "");
    assert!(state.view().notice.is_some());

    let (state, _) = update(state, Msg::PromptChanged("a fox".to_string()));
    assert!(state.view().notice.is_none());
    assert!(state.view().form.can_submit);
}

#[test]
fn inputs_are_read_only_while_running() {
    let (state, _) = submit_prompt(AppState::new(), "ocean waves");

    let (state, _) = update(state, Msg::PromptChanged("something else".to_string()));
    let (state, _) = update(state, Msg::DurationSelected(ClipDuration::Thirty));
    let (state, _) = update(state, Msg::AspectRatioSelected(AspectRatio::Vertical));

    let form = state.view().form;
    assert_eq!(form.prompt, "ocean waves");
    assert_eq!(form.duration, ClipDuration::Five);
    assert_eq!(form.aspect_ratio, AspectRatio::Widescreen);
}

#[test]
fn second_submit_while_running_is_ignored() {
    let (state, first) = submit_prompt(AppState::new(), "city at night");
    assert_eq!(first.len(), 1);

    let before = state.clone();
    let (state, second) = update(state, Msg::SubmitClicked);
    assert!(second.is_empty());
    assert_eq!(state, before);
}

#[test]
fn unchanged_selection_is_not_dirty() {
    let (mut state, _) = update(AppState::new(), Msg::DurationSelected(ClipDuration::Five));
    assert!(!state.consume_dirty());

    let (mut state, _) = update(state, Msg::DurationSelected(ClipDuration::Fifteen));
    assert!(state.consume_dirty());
}
