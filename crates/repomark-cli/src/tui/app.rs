//! Session state and the main event loop.

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use ratatui::widgets::TableState;
use repomark_core::{Repo, SearchController};
use tokio::sync::mpsc;

use crate::tui::ui;

/// Interactive session over a [`SearchController`].
///
/// Owns the result selection and the quit flag; everything else lives in
/// the controller.
pub struct App {
    pub(crate) controller: SearchController,
    pub(crate) table_state: TableState,
    pub(crate) page_rows: usize,
    should_quit: bool,
}

impl App {
    /// Create a session around an already configured controller.
    #[must_use]
    pub fn new(controller: SearchController) -> Self {
        Self {
            controller,
            table_state: TableState::default(),
            page_rows: 10,
            should_quit: false,
        }
    }

    /// Run the session until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if drawing to the terminal fails.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut events = spawn_input_reader();

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, &mut self))?;

            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event);
                    // Coalesce queued input so fast typing costs one redraw.
                    while let Ok(event) = events.try_recv() {
                        self.handle_event(event);
                    }
                }
                () = self.controller.pump() => {}
            }

            while self.controller.poll() {}
            self.clamp_selection();
        }

        tracing::debug!("session loop exited");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c' | 'q') => self.should_quit = true,
                KeyCode::Char('b') => {
                    let on = !self.controller.bookmarked_only();
                    self.controller.set_bookmarked_only(on);
                }
                KeyCode::Char('o') => self.open_selected(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => {
                // First press clears the query, second quits.
                if self.controller.query().is_empty() {
                    self.should_quit = true;
                } else {
                    self.controller.set_query(String::new());
                }
            }
            KeyCode::Enter => self.toggle_selected(),
            KeyCode::Up => self.select_towards(false, 1),
            KeyCode::Down => self.select_towards(true, 1),
            KeyCode::PageUp => self.select_towards(false, self.page_rows.max(1)),
            KeyCode::PageDown => self.select_towards(true, self.page_rows.max(1)),
            KeyCode::Home => self.select_towards(false, usize::MAX),
            KeyCode::End => self.select_towards(true, usize::MAX),
            KeyCode::Backspace => self.pop_query_char(),
            KeyCode::Char(c) => self.push_query_char(c),
            _ => {}
        }
    }

    fn push_query_char(&mut self, c: char) {
        let mut query = self.controller.query().to_string();
        query.push(c);
        self.controller.set_query(query);
    }

    fn pop_query_char(&mut self) {
        let mut query = self.controller.query().to_string();
        if query.pop().is_some() {
            self.controller.set_query(query);
        }
    }

    fn toggle_selected(&mut self) {
        if let Some(repo) = self.selected_repo() {
            self.controller.toggle_bookmark(&repo);
        }
    }

    fn open_selected(&self) {
        if let Some(repo) = self.selected_repo() {
            if let Err(error) = open::that(&repo.html_url) {
                tracing::warn!(%error, url = %repo.html_url, "failed to open browser");
            }
        }
    }

    fn selected_repo(&self) -> Option<Repo> {
        let index = self.table_state.selected()?;
        self.controller.visible().get(index).map(|repo| (*repo).clone())
    }

    fn select_towards(&mut self, down: bool, step: usize) {
        let len = self.controller.visible().len();
        if len == 0 {
            self.table_state.select(None);
            return;
        }
        let current = self.table_state.selected().unwrap_or(0).min(len - 1);
        let next = if down {
            current.saturating_add(step).min(len - 1)
        } else {
            current.saturating_sub(step)
        };
        self.table_state.select(Some(next));
    }

    fn clamp_selection(&mut self) {
        let len = self.controller.visible().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            let index = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(index));
        }
    }
}

/// Feed terminal events into a channel from a blocking reader thread.
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "input reader stopped");
                    break;
                }
            }
        }
    });
    rx
}
