//! Terminal front end for the restore selector
//!
//! The event loop runs on a blocking thread and is the only writer of the
//! [`SelectorState`]. Key presses and worker reports both become
//! [`Action`]s applied in arrival order.

mod render;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ledger_core::{spawn_restore_worker, Action, Cloner, SelectorState};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

type Term = Terminal<CrosstermBackend<Stdout>>;

const TICK: Duration = Duration::from_millis(50);

/// Whether keys edit the list or the filter text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Filter,
}

/// Selector UI state that is not part of the shared model
pub(crate) struct App {
    state: SelectorState,
    table: TableState,
    mode: Mode,
    confirm_quit: bool,
    quit: bool,
    cloner: Arc<dyn Cloner>,
    runtime: Handle,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
}

impl App {
    fn new(state: SelectorState, cloner: Arc<dyn Cloner>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        let mut table = TableState::default();
        table.select(Some(0));

        Self {
            state,
            table,
            mode: Mode::Browse,
            confirm_quit: false,
            quit: false,
            cloner,
            runtime,
            tx,
            rx,
        }
    }

    pub(crate) fn state(&self) -> &SelectorState {
        &self.state
    }

    pub(crate) fn is_filtering(&self) -> bool {
        self.mode == Mode::Filter
    }

    pub(crate) fn confirm_quit(&self) -> bool {
        self.confirm_quit
    }

    fn event_loop(&mut self, terminal: &mut Term) -> anyhow::Result<()> {
        while !self.quit {
            while let Ok(action) = self.rx.try_recv() {
                self.dispatch(action);
            }

            self.clamp_cursor();
            terminal.draw(|frame| render::draw(frame, self))?;

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn dispatch(&mut self, action: Action) {
        if let Some(jobs) = self.state.apply(action) {
            let _guard = self.runtime.enter();
            spawn_restore_worker(jobs, Arc::clone(&self.cloner), self.tx.clone());
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match self.mode {
            Mode::Filter => self.on_filter_key(key),
            Mode::Browse => self.on_browse_key(key),
        }
    }

    fn on_browse_key(&mut self, key: KeyEvent) {
        if !matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            self.confirm_quit = false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.state.is_running() && !self.confirm_quit {
                    self.confirm_quit = true;
                } else {
                    self.quit = true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::PageUp => self.move_cursor(-10),
            KeyCode::PageDown => self.move_cursor(10),
            KeyCode::Char(' ') => {
                if let Some(row) = self.selected_row() {
                    self.dispatch(Action::Toggle(row));
                }
            }
            KeyCode::Char('a') => self.dispatch(Action::EnableAll),
            KeyCode::Char('c') => self.dispatch(Action::ClearAll),
            KeyCode::Char('r') => self.dispatch(Action::StartRestore),
            KeyCode::Char('/') => self.mode = Mode::Filter,
            _ => {}
        }
    }

    fn on_filter_key(&mut self, key: KeyEvent) {
        let mut filter = self.state.filter().to_string();
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                return;
            }
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                filter.clear();
            }
            KeyCode::Backspace => {
                filter.pop();
            }
            KeyCode::Char(c) => filter.push(c),
            _ => return,
        }
        self.dispatch(Action::SetFilter(filter));
        self.table.select(Some(0));
    }

    /// Index into the full row list of the highlighted visible row
    fn selected_row(&self) -> Option<usize> {
        let visible = self.state.visible_rows();
        self.table.selected().and_then(|i| visible.get(i).copied())
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.state.visible_rows().len();
        if len == 0 {
            return;
        }
        let current = self.table.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table.select(Some(next as usize));
    }

    fn clamp_cursor(&mut self) {
        let len = self.state.visible_rows().len();
        match self.table.selected() {
            _ if len == 0 => self.table.select(None),
            Some(i) if i >= len => self.table.select(Some(len - 1)),
            None => self.table.select(Some(0)),
            _ => {}
        }
    }
}

fn setup_terminal() -> anyhow::Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the selector until the user quits
pub async fn run(state: SelectorState, cloner: Arc<dyn Cloner>) -> anyhow::Result<()> {
    let runtime = Handle::current();

    tokio::task::spawn_blocking(move || {
        let mut terminal = setup_terminal()?;
        let mut app = App::new(state, cloner, runtime);
        let result = app.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    })
    .await?
}
