use std::sync::mpsc;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event};
use studio_core::{update, AppState, Msg};
use studio_logging::{parse_level, studio_error, studio_info, studio_warn};

use super::config::{config_path, load_config};
use super::effects::EffectRunner;
use super::logging;
use super::terminal::{TerminalSession, Tui};
use super::ui::input::{self, Action, UiState};
use super::ui::layout::{self, ScreenLayout};
use super::ui::render;

const INPUT_POLL: Duration = Duration::from_millis(30);

pub fn run_app() -> anyhow::Result<()> {
    let path = config_path();
    let (config, problem) = load_config(&path);
    logging::initialize(&config.log_file, parse_level(&config.log_level));
    match problem {
        Some(problem) => studio_warn!("{}; using defaults", problem),
        None => studio_info!("Config from {:?}", path),
    }
    studio_info!(
        "Starting studio (locale {:?}, exports to {:?})",
        config.locale,
        config.export_dir
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let effects = EffectRunner::new(config.engine_config(), msg_tx).context("starting engine")?;

    let mut session = TerminalSession::enter().context("preparing terminal")?;
    let mut app = App::new(effects, config.locale.chrono_locale());
    let result = app.run(session.terminal(), &msg_rx);

    app.effects.shutdown();
    drop(session);
    match &result {
        Ok(()) => studio_info!("Studio closed"),
        Err(err) => studio_error!("Studio stopped: {:#}", err),
    }
    result
}

struct App {
    state: AppState,
    ui: UiState,
    layout: ScreenLayout,
    effects: EffectRunner,
    locale: chrono::Locale,
    needs_redraw: bool,
}

impl App {
    fn new(effects: EffectRunner, locale: chrono::Locale) -> Self {
        Self {
            state: AppState::new(),
            ui: UiState::default(),
            layout: ScreenLayout::default(),
            effects,
            locale,
            needs_redraw: true,
        }
    }

    fn run(&mut self, terminal: &mut Tui, msg_rx: &mpsc::Receiver<Msg>) -> anyhow::Result<()> {
        loop {
            while let Ok(msg) = msg_rx.try_recv() {
                self.dispatch(msg);
            }

            if self.needs_redraw {
                self.draw(terminal)?;
            }

            if !event::poll(INPUT_POLL)? {
                continue;
            }
            let view = self.state.view();
            let action = match event::read()? {
                Event::Key(key) => input::handle_key(key, &view, &mut self.ui, self.layout.columns),
                Event::Mouse(mouse) => {
                    input::handle_mouse(mouse, &view, &mut self.ui, &self.layout)
                }
                Event::Resize(_, _) => Action::Redraw,
                _ => Action::None,
            };

            match action {
                Action::Dispatch(msg) => self.dispatch(msg),
                Action::Redraw => self.needs_redraw = true,
                Action::Quit => return Ok(()),
                Action::None => {}
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.needs_redraw = true;
        }
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn draw(&mut self, terminal: &mut Tui) -> anyhow::Result<()> {
        let view = self.state.view();
        let ui = self.ui;
        let locale = self.locale;
        let mut screen = ScreenLayout::default();
        terminal.draw(|frame| {
            screen = layout::compute(frame.area(), &view, ui.highlighted);
            render::render(frame, &view, &ui, &screen, locale);
        })?;
        self.layout = screen;
        self.needs_redraw = false;
        Ok(())
    }
}
