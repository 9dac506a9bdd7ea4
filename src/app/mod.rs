use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::ListState;
use ratatui::Terminal;

use crate::clock::{Clock, SystemClock};
use crate::config::themes::Palette;
use crate::config::AppConfig;
use crate::store::EntryStore;
use crate::ui;

mod actions;
pub mod state;
mod text;

pub use actions::IntentOutcome;
pub use state::{AppState, CursorMove, EditorField, FocusPane, OverlayState};
pub use text::TextField;

enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    OpenEntry,
    DeleteEntry,
    AddEntry,
    ToggleFocus,
    FilterTags,
    ClearFilter,
}

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    list_state: ListState,
    palette: Palette,
    clock: Box<dyn Clock>,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self::with_clock(config, Box::new(SystemClock))
    }

    pub fn with_clock(config: Arc<AppConfig>, clock: Box<dyn Clock>) -> Self {
        let store = if config.seed_samples {
            EntryStore::with_samples()
        } else {
            EntryStore::new()
        };
        let today = clock.today();
        tracing::info!(%today, entries = store.len(), "starting diary session");
        let state = AppState::new(store, today, config.preview_lines as usize);
        let mut list_state = ListState::default();
        if !state.store().is_empty() {
            list_state.select(Some(state.list().cursor()));
        }
        Self {
            palette: Palette::for_theme(config.theme),
            tick_rate: config.tick_rate(),
            config,
            state,
            list_state,
            clock,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();
        loop {
            terminal
                .draw(|frame| {
                    self.sync_list_state();
                    ui::draw_app(frame, &self.state, &mut self.list_state, &self.palette);
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw adapts to the new size
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.state.refresh_today(self.clock.as_ref());
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    fn sync_list_state(&mut self) {
        if self.state.rows().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(self.state.list().cursor()));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.handle_overlay_key(key) {
            return;
        }

        if self.state.focus == FocusPane::Editor {
            self.handle_editor_key(key);
            return;
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
        let action = match key.code {
            KeyCode::Char('q') if plain => Some(Action::Quit),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Enter => Some(Action::OpenEntry),
            KeyCode::Char('d') | KeyCode::Delete if plain => Some(Action::DeleteEntry),
            KeyCode::Char('a') | KeyCode::Char('+') if plain => Some(Action::AddEntry),
            KeyCode::Char('f') if plain => Some(Action::FilterTags),
            KeyCode::Char('F') => Some(Action::ClearFilter),
            KeyCode::Tab => Some(Action::ToggleFocus),
            _ => None,
        };

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.state.list_move(1),
            Action::SelectPrevious => self.state.list_move(-1),
            Action::OpenEntry => self.state.activate_highlighted(),
            Action::DeleteEntry => self.state.delete_highlighted(),
            Action::AddEntry => self.state.add_entry(),
            Action::ToggleFocus => self.state.toggle_focus(),
            Action::FilterTags => {
                self.state.open_filter_picker();
                self.state.set_status_message(Some(
                    "Filter: Space toggle • / type a tag • Esc close",
                ));
            }
            Action::ClearFilter => self.state.clear_filter(),
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.state.focus = FocusPane::List,
            KeyCode::Tab => self.state.cycle_field(),
            KeyCode::Char('[') if self.state.field == EditorField::Tags => {
                self.state.previous_day()
            }
            KeyCode::Char(']') if self.state.field == EditorField::Tags => {
                self.state.next_day()
            }
            KeyCode::PageUp => self.state.previous_day(),
            KeyCode::PageDown => self.state.next_day(),
            KeyCode::Char('d') if ctrl => self.state.toggle_date_picker(),
            KeyCode::Enter => self.state.insert_newline(),
            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Delete => self.state.delete_forward(),
            KeyCode::Left => self.state.move_cursor(CursorMove::Left),
            KeyCode::Right => self.state.move_cursor(CursorMove::Right),
            KeyCode::Up => self.state.move_cursor(CursorMove::Up),
            KeyCode::Down => self.state.move_cursor(CursorMove::Down),
            KeyCode::Home => self.state.move_cursor(CursorMove::Home),
            KeyCode::End => self.state.move_cursor(CursorMove::End),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) =>
            {
                self.state.insert_char(ch)
            }
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> bool {
        match self.state.overlay() {
            Some(OverlayState::DatePicker(_)) => {
                match key.code {
                    KeyCode::Esc => self.state.date_picker_cancel(),
                    KeyCode::Enter => self.state.date_picker_confirm(),
                    KeyCode::Left | KeyCode::Char('h') => self.state.date_picker_move_days(-1),
                    KeyCode::Right | KeyCode::Char('l') => self.state.date_picker_move_days(1),
                    KeyCode::Up | KeyCode::Char('k') => self.state.date_picker_move_days(-7),
                    KeyCode::Down | KeyCode::Char('j') => self.state.date_picker_move_days(7),
                    KeyCode::PageUp => self.state.date_picker_move_months(-1),
                    KeyCode::PageDown => self.state.date_picker_move_months(1),
                    KeyCode::Char('t') | KeyCode::Home => self.state.date_picker_jump_to_today(),
                    _ => {}
                }
                true
            }
            Some(OverlayState::TagPicker(_)) if self.state.tag_picker_is_typing() => {
                match key.code {
                    KeyCode::Esc => self.state.tag_picker_cancel_input(),
                    KeyCode::Enter => self.state.tag_picker_submit(),
                    KeyCode::Backspace => self.state.tag_picker_pop_char(),
                    KeyCode::Char(ch)
                        if !key.modifiers.intersects(
                            KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER,
                        ) =>
                    {
                        self.state.tag_picker_push_char(ch)
                    }
                    _ => {}
                }
                true
            }
            Some(OverlayState::TagPicker(_)) => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.state.close_tag_picker(),
                    KeyCode::Char(' ') => self.state.tag_picker_toggle(),
                    KeyCode::Char('/') | KeyCode::Char('n') => self.state.tag_picker_begin_input(),
                    KeyCode::Char('j') | KeyCode::Down => self.state.tag_picker_move(1),
                    KeyCode::Char('k') | KeyCode::Up => self.state.tag_picker_move(-1),
                    KeyCode::PageDown => self.state.tag_picker_move(5),
                    KeyCode::PageUp => self.state.tag_picker_move(-5),
                    _ => {}
                }
                true
            }
            None => false,
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;
    terminal.hide_cursor().ok();
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("disabling raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("leaving alternate screen")?;
    terminal.show_cursor().context("showing cursor")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::model::EntryDate;

    fn app() -> App {
        let today: EntryDate = "2024-06-25".parse().expect("valid date");
        App::with_clock(Arc::new(AppConfig::default()), Box::new(FixedClock(today)))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    #[test]
    fn keyboard_flow_edits_a_past_day() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().focus, FocusPane::Editor);
        for _ in 0..6 {
            press(&mut app, KeyCode::PageUp);
        }
        for ch in "Lazy Sunday".chars() {
            press(&mut app, KeyCode::Char(ch));
        }
        let date: EntryDate = "2024-06-19".parse().unwrap();
        let entry = app.state().store().find_by_date(date).expect("created on first key");
        assert_eq!(entry.title, "Lazy Sunday");
        assert_eq!(app.state().store().len(), 7);
    }

    #[test]
    fn delete_key_in_list_removes_highlighted_entry() {
        let mut app = app();
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state().store().len(), 5);
        assert!(!app.state().editor().is_visible());
    }

    #[test]
    fn ctrl_d_opens_date_picker_and_enter_picks() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        ctrl(&mut app, 'd');
        assert!(app.state().has_overlay());
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Enter);
        assert!(!app.state().has_overlay());
        assert_eq!(app.state().editor().selected_date().to_string(), "2024-06-18");
    }

    #[test]
    fn date_picker_t_returns_to_today() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        ctrl(&mut app, 'd');
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state().editor().selected_date().to_string(), "2024-06-25");
    }

    #[test]
    fn quit_from_list() {
        let mut app = app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
