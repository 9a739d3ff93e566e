use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use studio_core::{AppViewModel, Msg, OverlayRegion};

use super::layout::{Hit, ScreenLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Prompt,
    Duration,
    Aspect,
    Gallery,
}

/// Presentation-only state the reducer never sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiState {
    pub focus: Focus,
    pub highlighted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Dispatch(Msg),
    /// Only local UI state changed.
    Redraw,
    Quit,
    None,
}

impl UiState {
    fn focus_next(&mut self, has_cards: bool) {
        self.focus = match self.focus {
            Focus::Prompt => Focus::Duration,
            Focus::Duration => Focus::Aspect,
            Focus::Aspect if has_cards => Focus::Gallery,
            Focus::Aspect | Focus::Gallery => Focus::Prompt,
        };
    }

    fn focus_prev(&mut self, has_cards: bool) {
        self.focus = match self.focus {
            Focus::Prompt if has_cards => Focus::Gallery,
            Focus::Prompt => Focus::Aspect,
            Focus::Duration => Focus::Prompt,
            Focus::Aspect => Focus::Duration,
            Focus::Gallery => Focus::Aspect,
        };
    }

    fn move_highlight(&mut self, delta: isize, card_count: usize) {
        if card_count == 0 {
            return;
        }
        let last = card_count - 1;
        self.highlighted = self.highlighted.min(last).saturating_add_signed(delta).min(last);
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

pub fn handle_key(key: KeyEvent, view: &AppViewModel, ui: &mut UiState, columns: u16) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    if is_quit(&key) {
        return Action::Quit;
    }

    if let Some(preview) = &view.preview {
        return match key.code {
            KeyCode::Esc => Action::Dispatch(Msg::PreviewClosed),
            KeyCode::Char('d') => Action::Dispatch(Msg::DownloadClicked {
                result_id: preview.id,
            }),
            _ => Action::None,
        };
    }

    let has_cards = !view.cards.is_empty();
    match key.code {
        KeyCode::Tab => {
            ui.focus_next(has_cards);
            return Action::Redraw;
        }
        KeyCode::BackTab => {
            ui.focus_prev(has_cards);
            return Action::Redraw;
        }
        KeyCode::Esc => {
            return if view.form.enabled {
                match view.notice {
                    Some(_) => Action::Dispatch(Msg::NoticeDismissed),
                    None => Action::None,
                }
            } else {
                Action::Dispatch(Msg::CancelClicked)
            };
        }
        _ => {}
    }

    match ui.focus {
        Focus::Prompt => prompt_key(key, view),
        Focus::Duration => match key.code {
            KeyCode::Left => Action::Dispatch(Msg::DurationSelected(view.form.duration.prev())),
            KeyCode::Right => Action::Dispatch(Msg::DurationSelected(view.form.duration.next())),
            KeyCode::Enter => Action::Dispatch(Msg::SubmitClicked),
            _ => Action::None,
        },
        Focus::Aspect => match key.code {
            KeyCode::Left => {
                Action::Dispatch(Msg::AspectRatioSelected(view.form.aspect_ratio.prev()))
            }
            KeyCode::Right => {
                Action::Dispatch(Msg::AspectRatioSelected(view.form.aspect_ratio.next()))
            }
            KeyCode::Enter => Action::Dispatch(Msg::SubmitClicked),
            _ => Action::None,
        },
        Focus::Gallery => gallery_key(key, view, ui, columns),
    }
}

fn prompt_key(key: KeyEvent, view: &AppViewModel) -> Action {
    match key.code {
        KeyCode::Enter => Action::Dispatch(Msg::SubmitClicked),
        KeyCode::Backspace => {
            let mut prompt = view.form.prompt.clone();
            if prompt.pop().is_none() {
                return Action::None;
            }
            Action::Dispatch(Msg::PromptChanged(prompt))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut prompt = view.form.prompt.clone();
            prompt.push(c);
            Action::Dispatch(Msg::PromptChanged(prompt))
        }
        _ => Action::None,
    }
}

fn gallery_key(key: KeyEvent, view: &AppViewModel, ui: &mut UiState, columns: u16) -> Action {
    let count = view.cards.len();
    let stride = columns.max(1) as isize;
    let delta = match key.code {
        KeyCode::Left => -1,
        KeyCode::Right => 1,
        KeyCode::Up => -stride,
        KeyCode::Down => stride,
        KeyCode::Enter => {
            return match view.cards.get(ui.highlighted) {
                Some(card) => Action::Dispatch(Msg::ResultSelected { result_id: card.id }),
                None => Action::None,
            };
        }
        KeyCode::Char('d') => {
            return match view.cards.get(ui.highlighted) {
                Some(card) => Action::Dispatch(Msg::DownloadClicked { result_id: card.id }),
                None => Action::None,
            };
        }
        _ => return Action::None,
    };
    ui.move_highlight(delta, count);
    Action::Redraw
}

pub fn handle_mouse(
    event: MouseEvent,
    view: &AppViewModel,
    ui: &mut UiState,
    layout: &ScreenLayout,
) -> Action {
    if event.kind != MouseEventKind::Down(MouseButton::Left) {
        return Action::None;
    }

    match layout.hit(event.column, event.row) {
        Hit::OverlayClose => Action::Dispatch(Msg::PreviewClosed),
        Hit::OverlayContent => Action::Dispatch(Msg::OverlayClicked {
            region: OverlayRegion::Content,
        }),
        Hit::Backdrop => Action::Dispatch(Msg::OverlayClicked {
            region: OverlayRegion::Backdrop,
        }),
        Hit::OverlayDownload => match &view.preview {
            Some(preview) => Action::Dispatch(Msg::DownloadClicked {
                result_id: preview.id,
            }),
            None => Action::None,
        },
        Hit::CardDownload { id } => Action::Dispatch(Msg::DownloadClicked { result_id: id }),
        Hit::Card { id, index } => {
            ui.focus = Focus::Gallery;
            ui.highlighted = index;
            Action::Dispatch(Msg::ResultSelected { result_id: id })
        }
        Hit::Prompt => {
            ui.focus = Focus::Prompt;
            Action::Redraw
        }
        Hit::Duration => {
            ui.focus = Focus::Duration;
            Action::Dispatch(Msg::DurationSelected(view.form.duration.next()))
        }
        Hit::Aspect => {
            ui.focus = Focus::Aspect;
            Action::Dispatch(Msg::AspectRatioSelected(view.form.aspect_ratio.next()))
        }
        Hit::Generate => Action::Dispatch(Msg::SubmitClicked),
        Hit::Nothing => Action::None,
    }
}
