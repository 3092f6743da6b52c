use crate::project::{LoadError, ProjectRecord};
use crate::showcase::{CloseReason, Command, Effect, LinkKind, Showcase, TagFilter};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

/// Input mode for the tag filter bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Side effects the event loop performs outside the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalAction {
    OpenLink(String),
    CopyLink(String),
}

/// Rows taken by header, controls, summary, borders and status bar.
pub const LIST_OVERHEAD: u16 = 10;

/// Main application state.
pub struct App {
    pub showcase: Showcase,
    pub should_quit: bool,
    pub show_help: bool,
    pub loading: bool,

    // Card cursor (index into the ordered visible cards)
    pub selected: usize,
    pub viewport: Rect,

    pub tag_input: String,
    pub input_mode: InputMode,

    pub detail_scroll: u16,

    pub status_msg: String,
}

impl App {
    pub fn new(showcase: Showcase) -> Self {
        Self {
            showcase,
            should_quit: false,
            show_help: false,
            loading: true,

            selected: 0,
            viewport: Rect::new(0, 0, 80, 24),

            tag_input: String::new(),
            input_mode: InputMode::Normal,

            detail_scroll: 0,

            status_msg: "Loading projects...".to_string(),
        }
    }

    /// Hand over the result of the one-shot project fetch.
    pub fn finish_loading(&mut self, result: Result<Vec<ProjectRecord>, LoadError>) {
        self.showcase.install(result);
        self.loading = false;
        self.selected = 0;
        self.status_msg = match self.showcase.load_error() {
            Some(err) => err.to_string(),
            None => format!("{} projects loaded", self.showcase.projects().len()),
        };
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    pub fn page_size(&self) -> usize {
        (self.viewport.height.saturating_sub(LIST_OVERHEAD) as usize).max(1)
    }

    fn visible_len(&self) -> usize {
        self.showcase.visible().len()
    }

    /// Id of the card under the cursor.
    pub fn selected_id(&self) -> Option<&str> {
        let index = *self.showcase.visible().get(self.selected)?;
        self.showcase.projects().get(index).map(|p| p.id.as_str())
    }

    pub fn next(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        if self.selected + 1 < self.visible_len() {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn first(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        self.selected = 0;
    }

    pub fn last(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        self.selected = self.visible_len().saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        self.selected = (self.selected + self.page_size()).min(self.visible_len().saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        if self.showcase.scroll_locked() {
            return;
        }
        self.selected = self.selected.saturating_sub(self.page_size());
    }

    /// Run a controller command and reconcile the cursor and status line.
    pub fn apply(&mut self, command: Command) {
        match self.showcase.dispatch(command) {
            Effect::Recomputed => {
                self.selected = 0;
                self.status_msg = format!("{} shown", self.showcase.view().count_label);
            }
            Effect::ModalOpened => {
                self.detail_scroll = 0;
            }
            Effect::ModalClosed { focus } => {
                self.selected = focus
                    .and_then(|id| {
                        self.showcase
                            .visible()
                            .iter()
                            .position(|&i| self.showcase.projects()[i].id == id)
                    })
                    .unwrap_or(0);
            }
            Effect::Unchanged => {}
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_id().map(str::to_string) {
            self.apply(Command::OpenDetail(id));
        }
    }

    /// Reset filter state and the controls bound to it.
    pub fn clear_filters(&mut self) {
        self.tag_input.clear();
        self.input_mode = InputMode::Normal;
        self.apply(Command::ClearFilters);
        self.status_msg = "Filters cleared".to_string();
    }

    pub fn cycle_tag(&mut self) {
        let next = self.showcase.next_tag();
        self.tag_input = match &next {
            TagFilter::All => String::new(),
            TagFilter::Tag(tag) => tag.clone(),
        };
        self.apply(Command::SetTagFilter(next));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ExternalAction> {
        if key.code == KeyCode::Char('?') && self.input_mode == InputMode::Normal {
            self.show_help = !self.show_help;
            return None;
        }

        // Any key closes help
        if self.show_help {
            self.show_help = false;
            return None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_tag_input(key);
            return None;
        }

        if self.showcase.is_modal_open() {
            return self.handle_detail_key(key);
        }

        self.handle_list_key(key);
        None
    }

    fn handle_tag_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                let tag = TagFilter::from_input(&self.tag_input);
                self.apply(Command::SetTagFilter(tag));
            }
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.tag_input = match &self.showcase.filter().active_tag {
                    TagFilter::All => String::new(),
                    TagFilter::Tag(tag) => tag.clone(),
                };
            }
            KeyCode::Backspace => {
                self.tag_input.pop();
            }
            KeyCode::Char(c) => {
                self.tag_input.push(c);
            }
            _ => {}
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') | KeyCode::Char('t') => {
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Char('g') => self.first(),
            KeyCode::Char('G') => self.last(),
            KeyCode::Enter => self.open_selected(),
            KeyCode::Tab => self.cycle_tag(),
            KeyCode::Char('f') => self.apply(Command::ToggleFeaturedOnly),
            KeyCode::Char('o') => self.apply(Command::CycleSort),
            KeyCode::Char('c') => self.clear_filters(),
            KeyCode::Esc => {
                if !self.showcase.filter().is_default() {
                    self.clear_filters();
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<ExternalAction> {
        match key.code {
            KeyCode::Esc => self.apply(Command::CloseDetail(CloseReason::Cancel)),
            KeyCode::Char('q') | KeyCode::Char('x') => {
                self.apply(Command::CloseDetail(CloseReason::Explicit))
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::PageDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(10);
            }
            KeyCode::PageUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(10);
            }
            KeyCode::Char('d') => return self.link_action(LinkKind::Demo),
            KeyCode::Char('s') => return self.link_action(LinkKind::Source),
            KeyCode::Char('p') => return self.link_action(LinkKind::CaseStudyPdf),
            KeyCode::Char('y') => {
                let link = self.showcase.detail()?.links.first()?.url.clone();
                return Some(ExternalAction::CopyLink(link));
            }
            _ => {}
        }
        None
    }

    fn link_action(&mut self, kind: LinkKind) -> Option<ExternalAction> {
        match self.showcase.detail()?.link(kind) {
            Some(url) => Some(ExternalAction::OpenLink(url.to_string())),
            None => {
                self.status_msg = format!("No {} for this project", kind.label().to_lowercase());
                None
            }
        }
    }

    /// A left click outside the overlay dismisses it.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, overlay: Rect) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) || !self.showcase.is_modal_open() {
            return;
        }
        if !overlay.contains(Position::new(mouse.column, mouse.row)) {
            self.apply(Command::CloseDetail(CloseReason::OutsideClick));
        }
    }
}
