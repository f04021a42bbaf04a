//! Kanban board interface.
//!
//! Three columns of task cards with an add form, auto-generation prompts,
//! a language picker and theme switching. Generation runs in the
//! background; its outcomes are only picked up while no popup is open.

use std::io;
use std::mem;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::board::{Board, Card, RemovalKind, Removed};
use crate::config::Config;
use crate::db::{AppData, StateStore};
use crate::dialogue::{engine_from_config, DialogueEngine, DialogueOutcome, GenerationSession, UserAnswer};
use crate::error::{Error, Result};
use crate::fields::{Column, Theme, COLUMN_COUNT};
use crate::lang::{discover, LanguagePack};
use crate::task::TaskRecord;
use crate::tui::colors::Palette;
use crate::tui::enums::{BoardExit, Mode, Notice};
use crate::tui::prompt::{DialoguePrompt, PromptInput};
use crate::tui::task_form::TaskForm;

const CARD_HEIGHT: usize = 6;

/// Main board application state
pub struct BoardApp {
    config: Config,
    store: StateStore,
    data: AppData,
    board: Board,
    lang: LanguagePack,
    theme: Theme,
    runtime: Handle,
    session: Option<GenerationSession>,
    mode: Mode,
    notice: Option<Notice>,
    selected_column: usize,
    selected_card: usize,
    column_scroll_offsets: [usize; COLUMN_COUNT],
    status_message: String,
    last_save: Instant,
    exit: Option<BoardExit>,
}

impl BoardApp {
    pub fn new(config: Config, store: StateStore, data: AppData, lang: LanguagePack, runtime: Handle) -> Self {
        let board = data.board();
        let theme = Theme::from_light_flag(data.is_light_theme);
        info!(cards = board.len(), lang = %lang.locale(), ?theme, "BoardApp::new");
        BoardApp {
            config,
            store,
            data,
            board,
            lang,
            theme,
            runtime,
            session: None,
            mode: Mode::Board,
            notice: None,
            selected_column: 0,
            selected_card: 0,
            column_scroll_offsets: [0; COLUMN_COUNT],
            status_message: String::new(),
            last_save: Instant::now(),
            exit: None,
        }
    }

    fn palette(&self) -> &'static Palette {
        Palette::for_theme(self.theme)
    }

    fn selected_column(&self) -> Column {
        Column::from_index(self.selected_column).unwrap_or(Column::Pending)
    }

    fn column_cards(&self, column: Column) -> Vec<&Card> {
        self.board.column(column)
    }

    /// Id of the highlighted card, if the column has any.
    fn selected_id(&self) -> Option<u64> {
        self.column_cards(self.selected_column())
            .get(self.selected_card)
            .map(|card| card.id)
    }

    /// Ensure selected card index is valid
    fn clamp_selection(&mut self) {
        let column_len = self.column_cards(self.selected_column()).len();
        if column_len == 0 {
            self.selected_card = 0;
            self.column_scroll_offsets[self.selected_column] = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    /// Whether a popup or message box is open; outcomes wait while it is.
    fn is_busy(&self) -> bool {
        self.mode.is_modal() || self.notice.is_some()
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn show_notice(&mut self, title: String, body: String, is_error: bool) {
        self.notice = Some(Notice { title, body, is_error });
    }

    /// Store the board in the state document and write it out.
    ///
    /// `label_key` names the status line shown on success.
    fn save(&mut self, label_key: &str) {
        self.data.store_board(&self.board);
        self.data.is_light_theme = self.theme.is_light();
        match self.store.save(&self.data) {
            Ok(()) => {
                let stamp = Local::now().format(" [%H:%M] [%d/%m]");
                self.set_status_message(format!("{}{}", self.lang.get(label_key), stamp));
                debug!(path = %self.store.path().display(), "save: written");
            }
            Err(e) => {
                warn!(error = %e, "save: failed");
                self.set_status_message(format!("Error saving: {e}"));
            }
        }
        self.last_save = Instant::now();
    }

    /// Periodic work: autosave and picking up generation outcomes.
    pub fn tick(&mut self) {
        let every = self.config.ui.autosave_secs;
        if every > 0 && self.last_save.elapsed() >= Duration::from_secs(every) {
            self.save("sys.autosave");
        }
        self.poll_session();
    }

    fn poll_session(&mut self) {
        if self.is_busy() {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Some(outcome) = session.try_next() {
            self.apply_outcome(outcome);
        } else if session.is_finished() {
            debug!("poll_session: worker ended without an outcome");
            self.session = None;
        }
    }

    fn apply_outcome(&mut self, outcome: DialogueOutcome) {
        info!(?outcome, "apply_outcome");
        if outcome.is_terminal() {
            self.session = None;
        }
        match outcome {
            DialogueOutcome::Completed { title, description, reward } => {
                self.set_status_message(self.lang.format("tui.generate.done", &[&title]));
                self.mode = Mode::AddTask(TaskForm::prefilled(&title, &description, &reward));
            }
            DialogueOutcome::Aborted { message } => {
                let title = self.lang.get("tui.generate.stopped");
                self.show_notice(title, message, false);
            }
            DialogueOutcome::Failed { error } => {
                let title = self.lang.get("tui.generate.failed");
                self.show_notice(title, error, true);
            }
            question => {
                if let Some(prompt) = DialoguePrompt::from_outcome(&question) {
                    self.mode = Mode::Prompt(prompt);
                }
            }
        }
    }

    /// Start a generation session, replacing any running one.
    pub fn start_session(&mut self, engine: DialogueEngine, topic: &str) {
        if self.session.is_some() {
            info!("start_session: superseding running session");
        }
        self.session = Some(GenerationSession::spawn(&self.runtime, engine, topic));
        self.set_status_message(self.lang.format("tui.generate.working", &[topic]));
    }

    fn add_record(&mut self, record: TaskRecord) {
        self.board.add_card(record);
        self.selected_column = Column::Pending.index();
        self.selected_card = 0;
        self.save("sys.save");
    }

    fn move_selected(&mut self, delta: i64) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.board.move_card(id, delta) {
            Ok(target) => {
                self.selected_column = target.index();
                self.selected_card = 0;
                self.save("sys.save");
                let name = self.lang.get(target.lang_key());
                self.set_status_message(self.lang.format("tui.board.moved", &[&name]));
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    /// Delete or claim the highlighted card. Unfinished cards ask first.
    fn request_removal(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.board.removal_kind(id) {
            Ok(RemovalKind::Claim) => self.remove_card(id),
            Ok(RemovalKind::Delete) => self.mode = Mode::ConfirmDelete(id),
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn remove_card(&mut self, id: u64) {
        let removed = match self.board.delete_card(id) {
            Ok(removed) => removed,
            Err(e) => {
                self.set_status_message(e.to_string());
                return;
            }
        };
        debug!(title = %removed.record().title, "remove_card: removed");
        self.clamp_selection();
        self.save("sys.save");
        if let Removed::Claimed(record) = removed {
            match record.reward {
                Some(ref reward) => {
                    let body = format!("{} {}", self.lang.get("gui.tasks.labels.reward.desc"), reward);
                    self.show_notice(self.lang.get("gui.tasks.labels.reward.name"), body, false);
                    self.set_status_message(
                        self.lang.format("gui.tasks.labels.completed_with_reward", &[&record.title, reward]),
                    );
                }
                None => {
                    self.set_status_message(self.lang.format("gui.tasks.labels.completed", &[&record.title]));
                }
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.data.is_light_theme = self.theme.is_light();
        let key = match self.theme {
            Theme::Dark => "tooltips.swap_to_light_theme",
            Theme::Light => "tooltips.swap_to_dark_theme",
        };
        self.set_status_message(self.lang.get(key));
    }

    fn open_language_picker(&mut self) {
        let langs_dir = self.config.storage.langs_dir.clone();
        match discover(&langs_dir, &self.config.storage.reference_language) {
            Ok(packs) => {
                let packs: Vec<_> = packs.into_iter().filter(|p| p.locale != self.lang.locale()).collect();
                if packs.is_empty() {
                    self.set_status_message(self.lang.get("tui.lang.none"));
                } else {
                    self.mode = Mode::LanguagePicker { packs, selected: 0 };
                }
            }
            Err(e) => {
                let title = self.lang.get("gui.titles.language_selection");
                self.show_notice(title, e.to_string(), true);
            }
        }
    }

    fn build_engine(&self) -> Result<DialogueEngine> {
        engine_from_config(&self.config, &self.data.api_key)
    }

    /// Handle one key press. Sets `exit` when the board should close.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.notice.take().is_some() {
            return;
        }
        let mode = mem::replace(&mut self.mode, Mode::Board);
        self.mode = match mode {
            Mode::Board => {
                self.handle_board_key(key);
                return;
            }
            Mode::Detail | Mode::Help => match key.code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('h') => Mode::Board,
                _ => mode,
            },
            Mode::AddTask(form) => self.handle_form_key(form, key),
            Mode::Topic(prompt) => self.handle_topic_key(prompt, key),
            Mode::Prompt(prompt) => self.handle_prompt_key(prompt, key),
            Mode::ConfirmDelete(id) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.remove_card(id);
                    Mode::Board
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Mode::Board,
                _ => Mode::ConfirmDelete(id),
            },
            Mode::LanguagePicker { packs, selected } => self.handle_picker_key(packs, selected, key),
        };
    }

    fn handle_board_key(&mut self, key: KeyEvent) {
        self.status_message.clear();
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => self.quit(),
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),

            // Card movement between columns (check first, before regular navigation)
            KeyCode::Left if ctrl => self.move_selected(-1),
            KeyCode::Right if ctrl => self.move_selected(1),
            KeyCode::Char('<') => self.move_selected(-1),
            KeyCode::Char('>') => self.move_selected(1),

            KeyCode::Left => {
                if self.selected_column > 0 {
                    self.selected_column -= 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Right => {
                if self.selected_column < COLUMN_COUNT - 1 {
                    self.selected_column += 1;
                    self.clamp_selection();
                }
            }
            KeyCode::Up => {
                self.selected_card = self.selected_card.saturating_sub(1);
            }
            KeyCode::Down => {
                let column_len = self.column_cards(self.selected_column()).len();
                if self.selected_card + 1 < column_len {
                    self.selected_card += 1;
                }
            }

            KeyCode::Enter => {
                if self.selected_id().is_some() {
                    self.mode = Mode::Detail;
                }
            }
            KeyCode::Char('a') => self.mode = Mode::AddTask(TaskForm::new()),
            KeyCode::Char('g') => self.mode = Mode::Topic(DialoguePrompt::topic(&self.lang.get("tui.generate.topic"))),
            KeyCode::Char('d') | KeyCode::Delete => self.request_removal(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('L') => self.open_language_picker(),
            KeyCode::Char('s') => self.save("sys.save"),
            KeyCode::Char('h') => self.mode = Mode::Help,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, mut form: TaskForm, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Board,
            KeyCode::Enter => match form.to_record() {
                Ok(record) => {
                    self.add_record(record);
                    return Mode::Board;
                }
                Err(Error::Validation(_)) => {
                    self.show_notice(
                        self.lang.get("warnings.no_title_for_task.name"),
                        self.lang.get("warnings.no_title_for_task.desc"),
                        true,
                    );
                }
                Err(e) => self.set_status_message(e.to_string()),
            },
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Left => form.handle_left_right(false),
            KeyCode::Right => form.handle_left_right(true),
            KeyCode::Backspace => form.handle_backspace(),
            KeyCode::Delete => form.handle_delete(),
            KeyCode::Char(c) => form.handle_char(c),
            _ => {}
        }
        Mode::AddTask(form)
    }

    fn handle_topic_key(&mut self, mut prompt: DialoguePrompt, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Board,
            KeyCode::Enter => {
                let Some(UserAnswer::Text(topic)) = prompt.answer() else {
                    return Mode::Topic(prompt);
                };
                match self.build_engine() {
                    Ok(engine) => self.start_session(engine, &topic),
                    Err(e) => {
                        warn!(error = %e, "handle_topic_key: cannot start generation");
                        self.show_notice(self.lang.get("tui.generate.failed"), e.to_string(), true);
                    }
                }
                return Mode::Board;
            }
            KeyCode::Left => prompt.handle_arrow(false),
            KeyCode::Right => prompt.handle_arrow(true),
            KeyCode::Backspace => prompt.handle_backspace(),
            KeyCode::Char(c) => prompt.handle_char(c),
            _ => {}
        }
        Mode::Topic(prompt)
    }

    fn handle_prompt_key(&mut self, mut prompt: DialoguePrompt, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => {
                info!("handle_prompt_key: user declined, ending session");
                self.session = None;
                self.set_status_message(self.lang.get("tui.generate.stopped"));
                return Mode::Board;
            }
            KeyCode::Enter => {
                let Some(answer) = prompt.answer() else {
                    return Mode::Prompt(prompt);
                };
                let delivered = self.session.as_ref().is_some_and(|s| s.reply(answer));
                if !delivered {
                    self.session = None;
                    self.set_status_message(self.lang.get("tui.generate.stopped"));
                }
                return Mode::Board;
            }
            KeyCode::Left | KeyCode::Up => prompt.handle_arrow(false),
            KeyCode::Right | KeyCode::Down => prompt.handle_arrow(true),
            KeyCode::Backspace => prompt.handle_backspace(),
            KeyCode::Char(c) => prompt.handle_char(c),
            _ => {}
        }
        Mode::Prompt(prompt)
    }

    fn handle_picker_key(&mut self, packs: Vec<crate::lang::PackInfo>, mut selected: usize, key: KeyEvent) -> Mode {
        match key.code {
            KeyCode::Esc => return Mode::Board,
            KeyCode::Up => selected = selected.saturating_sub(1),
            KeyCode::Down => {
                if selected + 1 < packs.len() {
                    selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(pack) = packs.get(selected) {
                    info!(from = %self.lang.locale(), to = %pack.locale, "language changed");
                    self.data.lang = pack.locale.clone();
                    self.save("sys.save");
                    self.exit = Some(BoardExit::Reload);
                }
                return Mode::Board;
            }
            _ => {}
        }
        Mode::LanguagePicker { packs, selected }
    }

    fn quit(&mut self) {
        self.save("sys.save");
        self.exit = Some(BoardExit::Quit);
    }

    /// Handle keyboard input
    fn handle_input(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<BoardExit> {
        loop {
            terminal.draw(|f| self.render(f))?;
            self.handle_input()?;
            if let Some(exit) = self.exit {
                return Ok(exit);
            }
            self.tick();
        }
    }

    /// Render the board and whatever is open on top of it
    fn render(&mut self, f: &mut Frame) {
        let palette = self.palette();
        f.render_widget(Block::default().style(Style::default().bg(palette.background)), f.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        match &self.mode {
            Mode::Board => {}
            Mode::Detail => self.render_detail_popup(f),
            Mode::Help => self.render_help_popup(f),
            Mode::AddTask(form) => self.render_form_popup(f, form),
            Mode::Topic(prompt) | Mode::Prompt(prompt) => self.render_prompt_popup(f, prompt),
            Mode::ConfirmDelete(id) => self.render_confirm_popup(f, *id),
            Mode::LanguagePicker { packs, selected } => self.render_picker_popup(f, packs, *selected),
        }
        if let Some(notice) = &self.notice {
            self.render_notice(f, notice);
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette();
        let header_text = vec![Line::from(vec![
            Span::styled(
                self.lang.get("gui.titles.main_window"),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("({}) {}", self.lang.locale(), self.lang.display_name()),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ])];

        let header_block = Paragraph::new(header_text)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(palette.label_upper)))
            .style(Style::default().fg(palette.buttons).bg(palette.foreground))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, COLUMN_COUNT as u32); COLUMN_COUNT])
            .split(area);

        for (i, &column_area) in columns_layout.iter().enumerate() {
            self.render_column(f, column_area, i);
        }
    }

    fn render_column(&mut self, f: &mut Frame, area: Rect, column_index: usize) {
        let palette = self.palette();
        let column = Column::from_index(column_index).unwrap_or(Column::Pending);
        let is_selected = column_index == self.selected_column;

        let border_style = if is_selected {
            Style::default().fg(palette.label_center).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.buttons)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.lang.get(column.lang_key()))
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let card_count = self.column_cards(column).len();
        if card_count == 0 {
            return;
        }

        let available_height = inner.height as usize;
        let visible_cards = (available_height / CARD_HEIGHT).max(1);

        let scroll_offset = if is_selected {
            let start_visible = self.column_scroll_offsets[column_index];
            if self.selected_card < start_visible {
                self.selected_card
            } else if self.selected_card >= start_visible + visible_cards {
                self.selected_card + 1 - visible_cards
            } else {
                start_visible
            }
        } else {
            self.column_scroll_offsets[column_index].min(card_count - 1)
        };
        self.column_scroll_offsets[column_index] = scroll_offset;

        let cards = self.column_cards(column);
        let mut current_y = 0;
        for (card_index, card) in cards.iter().enumerate().skip(scroll_offset) {
            if current_y + CARD_HEIGHT > available_height {
                break;
            }
            let card_area = Rect {
                x: inner.x,
                y: inner.y + current_y as u16,
                width: inner.width,
                height: CARD_HEIGHT as u16,
            };
            self.render_card(f, card_area, card, is_selected && card_index == self.selected_card);
            current_y += CARD_HEIGHT;
        }

        if scroll_offset > 0 {
            let indicator = Paragraph::new(format!("▲ +{scroll_offset}")).style(Style::default().fg(palette.label_center));
            f.render_widget(indicator, Rect { x: inner.x, y: inner.y, width: inner.width, height: 1 });
        }
        let rendered = current_y / CARD_HEIGHT;
        let remaining = card_count.saturating_sub(scroll_offset + rendered);
        if remaining > 0 && inner.height > 0 {
            let indicator = Paragraph::new(format!("▼ +{remaining}")).style(Style::default().fg(palette.label_center));
            f.render_widget(
                indicator,
                Rect { x: inner.x, y: inner.y + inner.height - 1, width: inner.width, height: 1 },
            );
        }
    }

    fn render_card(&self, f: &mut Frame, area: Rect, card: &Card, is_selected: bool) {
        let palette = self.palette();
        let record = &card.record;

        let border_colour = if record.column == Column::Done { palette.green } else { palette.label_upper };
        let (bg, border) = if is_selected {
            (palette.label_upper, Style::default().fg(palette.buttons).add_modifier(Modifier::BOLD))
        } else {
            (palette.label_center, Style::default().fg(border_colour))
        };

        let description = if record.description.is_empty() {
            self.lang.get("gui.tasks.labels.no_desc")
        } else {
            record.description.clone()
        };
        let mut lines = vec![Line::from(description)];
        if let Some(reward) = &record.reward {
            lines.push(Line::from(format!("{}: {}", self.lang.get("form.reward"), reward)));
        }
        if let Some(deadline) = &record.deadline {
            lines.push(Line::from(format!("{}: {}", self.lang.get("form.deadline"), deadline)));
        }
        lines.push(Line::from(Span::styled(
            record.timestamp(),
            Style::default().bg(palette.label_lower).add_modifier(Modifier::DIM),
        )));

        let card_block = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(record.title.clone(), Style::default().add_modifier(Modifier::BOLD)))
                    .border_style(border),
            )
            .style(Style::default().bg(bg).fg(palette.buttons))
            .wrap(Wrap { trim: true });
        f.render_widget(card_block, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let palette = self.palette();
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.session.is_some() {
            format!("⟳ {}", self.lang.get("tui.generate.pending"))
        } else {
            format!("{} | h: {}", self.board.len(), self.lang.get("tui.help.title"))
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(palette.label_lower).fg(palette.buttons))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn popup_block(&self, title: String, accent: ratatui::style::Color) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(accent).add_modifier(Modifier::BOLD))
            .style(Style::default().bg(self.palette().foreground).fg(self.palette().buttons))
    }

    fn render_detail_popup(&self, f: &mut Frame) {
        let Some(card) = self.selected_id().and_then(|id| self.board.get(id)) else {
            return;
        };
        let record = &card.record;
        let popup_area = centered_rect(f.area(), 70, 60);
        f.render_widget(Clear, popup_area);

        let dash = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
        let detail_lines = vec![
            Line::from(Span::styled(record.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(""),
            Line::from(format!("{}: {}", self.lang.get("form.reward"), dash(&record.reward))),
            Line::from(format!("{}: {}", self.lang.get("form.deadline"), dash(&record.deadline))),
            Line::from(record.timestamp()),
            Line::from(""),
            Line::from(format!("{}:", self.lang.get("form.description"))),
            Line::from(if record.description.is_empty() {
                self.lang.get("gui.tasks.labels.no_desc")
            } else {
                record.description.clone()
            }),
        ];
        let popup = Paragraph::new(detail_lines)
            .block(self.popup_block(self.lang.get(record.column.lang_key()), self.palette().label_center))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, popup_area);
    }

    fn render_help_popup(&self, f: &mut Frame) {
        let popup_area = centered_rect(f.area(), 60, 60);
        f.render_widget(Clear, popup_area);
        let theme_key = match self.theme {
            Theme::Dark => "tooltips.swap_to_light_theme",
            Theme::Light => "tooltips.swap_to_dark_theme",
        };
        let rows = [
            ("←/→ ↑/↓", self.lang.get("tui.help.navigate")),
            ("Ctrl+←/→ < >", self.lang.get("tui.help.move")),
            ("a", self.lang.get("tooltips.add_task")),
            ("g", self.lang.get("tooltips.auto_generate")),
            ("d / Del", self.lang.get("tui.help.delete")),
            ("Enter", self.lang.get("tui.help.details")),
            ("t", self.lang.get(theme_key)),
            ("L", self.lang.get("tooltips.change_language")),
            ("s", self.lang.get("tui.help.save")),
            ("Esc / q", self.lang.get("tui.help.quit")),
        ];
        let lines: Vec<Line> = rows
            .into_iter()
            .map(|(keys, text)| {
                Line::from(vec![
                    Span::styled(format!("{keys:<14}"), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(text),
                ])
            })
            .collect();
        let popup = Paragraph::new(lines)
            .block(self.popup_block(self.lang.get("tui.help.title"), self.palette().label_center))
            .wrap(Wrap { trim: false });
        f.render_widget(popup, popup_area);
    }

    fn render_form_popup(&self, f: &mut Frame, form: &TaskForm) {
        let popup_area = centered_rect(f.area(), 60, 50);
        f.render_widget(Clear, popup_area);
        let labels = ["form.title", "form.description", "form.reward", "form.deadline"];
        let mut lines = Vec::new();
        for (label, field) in labels.iter().zip(form.fields()) {
            let style = if field.active {
                Style::default().add_modifier(Modifier::BOLD).fg(self.palette().label_center)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("{}:", self.lang.get(label)), style)));
            lines.push(Line::from(format!("  {}", field.display())));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Enter: {}   Esc: {}",
            self.lang.get("form.create"),
            self.lang.get("form.cancel")
        )));
        let popup = Paragraph::new(lines)
            .block(self.popup_block(self.lang.get("gui.titles.data_prompt"), self.palette().label_center))
            .wrap(Wrap { trim: false });
        f.render_widget(popup, popup_area);
    }

    fn render_prompt_popup(&self, f: &mut Frame, prompt: &DialoguePrompt) {
        let palette = self.palette();
        let popup_area = centered_rect(f.area(), 60, 40);
        f.render_widget(Clear, popup_area);
        let mut lines = vec![Line::from(prompt.question.clone()), Line::from("")];
        match &prompt.input {
            PromptInput::Text(field) => lines.push(Line::from(format!("> {}", field.display()))),
            PromptInput::Confirm(yes) => {
                let highlight = Style::default().bg(palette.label_center).add_modifier(Modifier::BOLD);
                let (yes_style, no_style) = if *yes { (highlight, Style::default()) } else { (Style::default(), highlight) };
                lines.push(Line::from(vec![
                    Span::styled(format!(" {} ", self.lang.get("tui.prompt.yes")), yes_style),
                    Span::raw("   "),
                    Span::styled(format!(" {} ", self.lang.get("tui.prompt.no")), no_style),
                ]));
            }
            PromptInput::Choice { options, selected } => {
                for (i, option) in options.iter().enumerate() {
                    let style = if i == *selected {
                        Style::default().bg(palette.label_center).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    lines.push(Line::from(Span::styled(format!("{}. {}", i + 1, option), style)));
                }
            }
        }
        let popup = Paragraph::new(lines)
            .block(self.popup_block(self.lang.get("gui.titles.data_prompt"), palette.label_center))
            .wrap(Wrap { trim: false });
        f.render_widget(popup, popup_area);
    }

    fn render_confirm_popup(&self, f: &mut Frame, id: u64) {
        let Some(card) = self.board.get(id) else {
            return;
        };
        let popup_area = centered_rect(f.area(), 50, 25);
        f.render_widget(Clear, popup_area);
        let lines = vec![
            Line::from(self.lang.format("gui.tasks.management.delete.desc", &[&card.record.title])),
            Line::from(""),
            Line::from(format!("y: {}   n: {}", self.lang.get("tui.prompt.yes"), self.lang.get("tui.prompt.no"))),
        ];
        let popup = Paragraph::new(lines)
            .block(self.popup_block(self.lang.get("gui.tasks.management.delete.name"), self.palette().red))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, popup_area);
    }

    fn render_picker_popup(&self, f: &mut Frame, packs: &[crate::lang::PackInfo], selected: usize) {
        let palette = self.palette();
        let popup_area = centered_rect(f.area(), 50, 50);
        f.render_widget(Clear, popup_area);
        let lines: Vec<Line> = packs
            .iter()
            .enumerate()
            .map(|(i, pack)| {
                let style = if i == selected {
                    Style::default().bg(palette.label_center).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(
                    format!("({}) {} {}%", pack.locale, pack.name, pack.completeness),
                    style,
                ))
            })
            .collect();
        let popup = Paragraph::new(lines)
            .block(self.popup_block(self.lang.get("gui.titles.language_selection"), palette.label_center));
        f.render_widget(popup, popup_area);
    }

    fn render_notice(&self, f: &mut Frame, notice: &Notice) {
        let palette = self.palette();
        let popup_area = centered_rect(f.area(), 50, 30);
        f.render_widget(Clear, popup_area);
        let accent = if notice.is_error { palette.red } else { palette.green };
        let popup = Paragraph::new(notice.body.clone())
            .block(self.popup_block(notice.title.clone(), accent))
            .wrap(Wrap { trim: true });
        f.render_widget(popup, popup_area);
    }
}

/// Rectangle of the given percentage size centred in `area`.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
