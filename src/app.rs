use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::categories;
use crate::error::ToudiError;
use crate::event::Event;
use crate::github;
use crate::session::Session;
use crate::source::{FetchMode, IssueSource, Page};
use crate::types::{CategoryMap, Issue, SortKey};
use crate::view::{self, Filters};

/// Rows between the selection and the end of the projected list at which
/// navigation starts fetching the next page.
const AUTO_LOAD_MARGIN: usize = 10;

/// Rows covered by ctrl+d / ctrl+u.
const PAGE_JUMP: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
}

/// Modal select popups over the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    Sort { selected: usize },
    Category { selected: usize },
}

pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub popup: Option<Popup>,

    // Accumulated data
    pub session: Session,
    pub categories: CategoryMap,
    pub category_order: Vec<(String, usize)>,

    // Projection
    pub filters: Filters,
    pub visible: Vec<usize>,

    // Cursor state
    pub selected: usize,
    pub detail_scroll: usize,
    detail_index: Option<usize>,

    // Status
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub rate_remaining: Option<u64>,

    pub repo: String,
    pub should_quit: bool,

    source: Arc<dyn IssueSource>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        source: Arc<dyn IssueSource>,
        repo: String,
        sort: Option<SortKey>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let counts = categories::recompute(&[]);
        let category_order = categories::ordered(&counts);

        Self {
            screen: Screen::List,
            input_mode: InputMode::default(),
            popup: None,

            session: Session::new(),
            categories: counts,
            category_order,

            filters: Filters {
                category: categories::ALL.to_string(),
                query: String::new(),
                sort,
            },
            visible: Vec::new(),

            selected: 0,
            detail_scroll: 0,
            detail_index: None,

            loading: false,
            loading_more: false,
            error: None,
            notice: None,
            rate_remaining: None,

            repo,
            should_quit: false,

            source,
            action_tx,
        }
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::Reload,
            Event::Key(key) => self.handle_key(key),
            Event::Scroll(MouseEventKind::ScrollDown) => Action::ScrollDown,
            Event::Scroll(MouseEventKind::ScrollUp) => Action::ScrollUp,
            _ => Action::None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        if self.popup.is_some() {
            return popup_key(key);
        }
        if self.screen == Screen::List && self.input_mode == InputMode::Search {
            return search_key(key);
        }
        match self.screen {
            Screen::List => list_key(key),
            Screen::Detail => detail_key(key),
        }
    }

    pub fn update(&mut self, action: Action) {
        // A lingering notice survives ticks and background completions but
        // not the next interaction.
        if !matches!(action, Action::None | Action::PageLoaded { .. }) {
            self.notice = None;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Back => match self.screen {
                Screen::Detail => {
                    self.screen = Screen::List;
                    self.detail_index = None;
                    self.detail_scroll = 0;
                }
                Screen::List => {
                    self.should_quit = true;
                }
            },
            Action::ScrollUp => self.move_up(1),
            Action::ScrollDown => self.move_down(1),
            Action::PageUp => self.move_up(PAGE_JUMP),
            Action::PageDown => self.move_down(PAGE_JUMP),
            Action::GoToTop => match self.screen {
                Screen::List => self.selected = 0,
                Screen::Detail => self.detail_scroll = 0,
            },
            Action::GoToBottom => match self.screen {
                Screen::List => {
                    if !self.visible.is_empty() {
                        self.selected = self.visible.len() - 1;
                        self.maybe_request_more();
                    }
                }
                Screen::Detail => {
                    self.detail_scroll = self
                        .detail_issue()
                        .map(|issue| issue.body.lines().count())
                        .unwrap_or(0);
                }
            },
            Action::Select => {
                if self.screen == Screen::List {
                    if let Some(&index) = self.visible.get(self.selected) {
                        self.detail_index = Some(index);
                        self.detail_scroll = 0;
                        self.screen = Screen::Detail;
                    }
                }
            }

            Action::Reload => self.begin_reload(),
            Action::LoadMore => self.request_next_page(),
            Action::PageLoaded {
                mode,
                generation,
                result,
            } => self.apply_fetch(mode, generation, result),

            Action::NextCategory => self.cycle_category(1),
            Action::PrevCategory => self.cycle_category(-1),

            Action::EnterSearchMode => {
                self.input_mode = InputMode::Search;
            }
            Action::SearchInput(c) => {
                self.filters.query.push(c);
                self.selected = 0;
                self.refresh_view();
            }
            Action::SearchBackspace => {
                if self.filters.query.pop().is_some() {
                    self.selected = 0;
                    self.refresh_view();
                }
            }
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
            }
            Action::SearchCancel => {
                self.input_mode = InputMode::Normal;
                if !self.filters.query.is_empty() {
                    self.filters.query.clear();
                    self.selected = 0;
                    self.refresh_view();
                }
            }

            Action::OpenSortPopup => {
                let selected = self
                    .filters
                    .sort
                    .and_then(|key| SortKey::ALL.iter().position(|k| *k == key))
                    .unwrap_or(0);
                self.popup = Some(Popup::Sort { selected });
            }
            Action::OpenCategoryPopup => {
                let selected = self.active_category_position().unwrap_or(0);
                self.popup = Some(Popup::Category { selected });
            }
            Action::PopupUp => {
                if let Some(Popup::Sort { selected } | Popup::Category { selected }) =
                    &mut self.popup
                {
                    *selected = selected.saturating_sub(1);
                }
            }
            Action::PopupDown => {
                let last = match self.popup {
                    Some(Popup::Sort { .. }) => SortKey::ALL.len().saturating_sub(1),
                    Some(Popup::Category { .. }) => self.category_order.len().saturating_sub(1),
                    None => 0,
                };
                if let Some(Popup::Sort { selected } | Popup::Category { selected }) =
                    &mut self.popup
                {
                    *selected = (*selected + 1).min(last);
                }
            }
            Action::PopupSelect => match self.popup.take() {
                Some(Popup::Sort { selected }) => {
                    if let Some(key) = SortKey::ALL.get(selected) {
                        self.filters.sort = Some(*key);
                        self.refresh_view();
                    }
                }
                Some(Popup::Category { selected }) => {
                    if let Some((name, _)) = self.category_order.get(selected) {
                        self.set_category(name.clone());
                    }
                }
                None => {}
            },
            Action::PopupClose => {
                self.popup = None;
            }

            Action::OpenInBrowser => {
                if let Some(url) = self.focused_issue().map(|issue| issue.html_url.clone()) {
                    self.open_url(&url);
                }
            }
            Action::OpenCategoryInBrowser => {
                let url = github::category_web_url(&self.repo, &self.filters.category);
                self.open_url(&url);
            }
            Action::YankUrl => {
                if let Some(url) = self.focused_issue().map(|issue| issue.html_url.clone()) {
                    self.yank_url(url);
                }
            }

            Action::None => {}
        }
    }

    /// Issue under the list cursor, after filtering and sorting.
    pub fn selected_issue(&self) -> Option<&Issue> {
        self.visible
            .get(self.selected)
            .and_then(|&index| self.session.issues.get(index))
    }

    /// Issue pinned by the detail screen. Pinned by collection index, so
    /// appends landing in the background cannot swap it out.
    pub fn detail_issue(&self) -> Option<&Issue> {
        self.detail_index
            .and_then(|index| self.session.issues.get(index))
    }

    fn focused_issue(&self) -> Option<&Issue> {
        match self.screen {
            Screen::List => self.selected_issue(),
            Screen::Detail => self.detail_issue(),
        }
    }

    fn active_category_position(&self) -> Option<usize> {
        self.category_order
            .iter()
            .position(|(name, _)| *name == self.filters.category)
    }

    fn move_up(&mut self, step: usize) {
        match self.screen {
            Screen::List => self.selected = self.selected.saturating_sub(step),
            Screen::Detail => self.detail_scroll = self.detail_scroll.saturating_sub(step),
        }
    }

    fn move_down(&mut self, step: usize) {
        match self.screen {
            Screen::List => {
                if !self.visible.is_empty() {
                    self.selected = (self.selected + step).min(self.visible.len() - 1);
                }
                self.maybe_request_more();
            }
            Screen::Detail => {
                self.detail_scroll += step;
            }
        }
    }

    fn set_category(&mut self, name: String) {
        if name != self.filters.category {
            self.filters.category = name;
            self.selected = 0;
            self.refresh_view();
        }
    }

    fn cycle_category(&mut self, step: isize) {
        if self.category_order.is_empty() {
            return;
        }
        let len = self.category_order.len() as isize;
        let position = self.active_category_position().unwrap_or(0) as isize;
        let next = (position + step).rem_euclid(len) as usize;
        let name = self.category_order[next].0.clone();
        self.set_category(name);
    }

    /// Throw the whole session away and fetch page one again. Anything
    /// still in flight for the old generation will be dropped on arrival.
    fn begin_reload(&mut self) {
        if self.loading {
            return;
        }
        let generation = self.session.reset();
        self.loading = true;
        self.loading_more = false;
        self.error = None;
        self.rate_remaining = None;
        self.selected = 0;
        self.categories = categories::recompute(&self.session.issues);
        self.category_order = categories::ordered(&self.categories);
        self.refresh_view();
        self.spawn_fetch(1, FetchMode::Replace, generation);
    }

    /// Fetch the next page unless the listing is exhausted or a fetch is
    /// already running.
    fn request_next_page(&mut self) {
        if !self.session.has_more || self.loading || self.loading_more {
            return;
        }
        self.loading_more = true;
        self.error = None;
        self.spawn_fetch(
            self.session.next_page(),
            FetchMode::Append,
            self.session.generation,
        );
    }

    /// Fetch ahead when the cursor closes in on the end of the list, but
    /// only while no search narrows the view. A search hides most of the
    /// collection, and chasing matches through page after page would hammer
    /// the API from a single keystroke.
    fn maybe_request_more(&mut self) {
        if self.screen != Screen::List || !self.filters.query.is_empty() {
            return;
        }
        if self.visible.is_empty() {
            return;
        }
        if self.selected + AUTO_LOAD_MARGIN >= self.visible.len() {
            self.request_next_page();
        }
    }

    fn apply_fetch(
        &mut self,
        mode: FetchMode,
        generation: u64,
        result: Result<Page, ToudiError>,
    ) {
        if generation != self.session.generation {
            tracing::debug!(
                generation,
                current = self.session.generation,
                "dropping completion from a previous session"
            );
            return;
        }

        self.loading = false;
        self.loading_more = false;

        match result {
            Ok(page) => {
                if let Some(remaining) = page.rate_remaining {
                    self.rate_remaining = Some(remaining);
                }
                self.session.merge(page, mode);
                self.categories = categories::recompute(&self.session.issues);
                self.category_order = categories::ordered(&self.categories);
                self.refresh_view();
            }
            Err(err) => {
                self.session.has_more = false;
                self.error = Some(err.to_string());
            }
        }
    }

    fn refresh_view(&mut self) {
        self.visible = view::project(&self.session.issues, &self.filters);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
    }

    fn spawn_fetch(&self, page: u32, mode: FetchMode, generation: u64) {
        let tx = self.action_tx.clone();
        let source = Arc::clone(&self.source);
        tokio::spawn(async move {
            let result = source.fetch_page(page).await;
            tx.send(Action::PageLoaded {
                mode,
                generation,
                result,
            })
            .ok();
        });
    }

    fn open_url(&mut self, url: &str) {
        if let Err(err) = open::that_detached(url) {
            self.notice = Some(format!("could not open browser: {err}"));
        }
    }

    fn yank_url(&mut self, url: String) {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url)) {
            Ok(()) => self.notice = Some("issue url copied".to_string()),
            Err(err) => self.notice = Some(format!("clipboard unavailable: {err}")),
        }
    }
}

fn list_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Action::PageDown,
            KeyCode::Char('u') => Action::PageUp,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Char('g') => Action::GoToTop,
        KeyCode::Char('G') => Action::GoToBottom,
        KeyCode::Enter => Action::Select,
        KeyCode::Char('/') => Action::EnterSearchMode,
        KeyCode::Char('s') => Action::OpenSortPopup,
        KeyCode::Char('c') => Action::OpenCategoryPopup,
        KeyCode::Char('h') | KeyCode::Left => Action::PrevCategory,
        KeyCode::Char('l') | KeyCode::Right => Action::NextCategory,
        KeyCode::Char('n') => Action::LoadMore,
        KeyCode::Char('r') => Action::Reload,
        KeyCode::Char('o') => Action::OpenInBrowser,
        KeyCode::Char('O') => Action::OpenCategoryInBrowser,
        KeyCode::Char('y') => Action::YankUrl,
        _ => Action::None,
    }
}

fn detail_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => Action::PageDown,
            KeyCode::Char('u') => Action::PageUp,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Back,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::Char('g') => Action::GoToTop,
        KeyCode::Char('G') => Action::GoToBottom,
        KeyCode::Char('o') => Action::OpenInBrowser,
        KeyCode::Char('y') => Action::YankUrl,
        _ => Action::None,
    }
}

fn search_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Enter => Action::SearchConfirm,
        KeyCode::Backspace => Action::SearchBackspace,
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            Action::SearchInput(c)
        }
        _ => Action::None,
    }
}

fn popup_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Action::PopupDown,
        KeyCode::Char('k') | KeyCode::Up => Action::PopupUp,
        KeyCode::Enter => Action::PopupSelect,
        KeyCode::Esc | KeyCode::Char('q') => Action::PopupClose,
        _ => Action::None,
    }
}
