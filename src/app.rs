/*!
 * Application controller and event loop
 *
 * Owns every piece of mutable state: the fetched top-level listing, the
 * shared search index, the view state, favorites and theme, and the toast
 * line. Workers deliver fetch results over a channel and the loop applies
 * them here, so index and state mutation stays serialized.
 */

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::Terminal;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::clipboard;
use crate::client::FetchClient;
use crate::config::Config;
use crate::crawler::{CrawlEvent, Crawler};
use crate::error::{Result, ShelfError};
use crate::index::SearchIndex;
use crate::state::{self, DirListing, ToggleOutcome, ViewMode, ViewState, VisibleRow};
use crate::storage::{Favorites, PrefStore, Theme};
use crate::types::{Entry, EntryKind};
use crate::ui;

/// How long a toast stays on screen
const TOAST_LIFETIME: Duration = Duration::from_secs(3);

/// How long the loop waits for a key before polling worker channels again
const TICK: Duration = Duration::from_millis(50);

/// Outcome of the eager root fetch
#[derive(Debug)]
pub enum RootState {
    /// Root fetch dispatched, nothing to render yet
    Loading,
    /// Root listing loaded
    Ready,
    /// Root fetch failed: fatal to the listing, rendered full-pane, no retry
    Failed(String),
}

/// Results delivered back from worker fetches
#[derive(Debug)]
pub enum AppEvent {
    /// The root listing fetch finished
    RootFetched {
        /// Entries, or the display message for the full-pane error
        result: std::result::Result<Vec<Entry>, String>,
    },
    /// A children fetch for an expanded directory finished
    SubtreeFetched {
        /// Path the fetch was issued for
        path: String,
        /// Entries, or the display message for the inline error row
        result: std::result::Result<Vec<Entry>, String>,
    },
    /// A worker wants to show a toast (clipboard outcomes)
    Toast(String),
}

/// Main application controller
pub struct App {
    /// Runtime configuration
    pub config: Config,
    /// Shared fetch client
    client: Arc<FetchClient>,
    /// Shared flat search index
    pub index: Arc<SearchIndex>,
    /// Worker pool for all fetches
    pool: Arc<ThreadPool>,
    /// Background crawler handle
    crawler: Crawler,
    /// Controller-owned view state
    pub state: ViewState,
    /// Favorited top-level names
    pub favorites: Favorites,
    /// Active color theme
    pub theme: Theme,
    store: PrefStore,
    /// Root listing, fetched once per session
    pub top_level: Vec<Entry>,
    /// Recomputed visible subset of the top-level listing
    pub visible: Vec<Entry>,
    /// Flattened rows the renderer shows and the keyboard navigates
    pub rows: Vec<VisibleRow>,
    /// Root fetch outcome
    pub root: RootState,
    /// Transient notification line
    pub toast: Option<(String, Instant)>,
    /// Whether the help overlay is open
    pub show_help: bool,
    /// Whether keystrokes edit the search term
    pub search_focused: bool,
    /// Directories the background crawl indexed so far
    pub crawled_dirs: usize,
    should_quit: bool,
    events_tx: Sender<AppEvent>,
    events_rx: Receiver<AppEvent>,
    crawl_rx: Receiver<CrawlEvent>,
}

impl App {
    /// Create the controller and dispatch the eager root fetch
    pub fn new(config: Config, store: PrefStore) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .build()
            .map_err(|e| ShelfError::Config(format!("failed to build worker pool: {}", e)))?;
        let pool = Arc::new(pool);

        let index = Arc::new(SearchIndex::new());
        let client = Arc::new(FetchClient::new(config.clone(), Arc::clone(&index)));

        let (events_tx, events_rx) = unbounded();
        let (crawl_tx, crawl_rx) = unbounded();
        let crawler = Crawler::new(Arc::clone(&client), Arc::clone(&pool), crawl_tx);

        let favorites = store.load_favorites();
        let theme = config.theme_override.unwrap_or_else(|| store.load_theme());

        let mut app = Self {
            config,
            client,
            index,
            pool,
            crawler,
            state: ViewState::default(),
            favorites,
            theme,
            store,
            top_level: Vec::new(),
            visible: Vec::new(),
            rows: Vec::new(),
            root: RootState::Loading,
            toast: None,
            show_help: false,
            search_focused: false,
            crawled_dirs: 0,
            should_quit: false,
            events_tx,
            events_rx,
            crawl_rx,
        };
        app.dispatch_root_fetch();
        Ok(app)
    }

    /// Run the event loop until quit
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;

            self.drain_events();
            self.expire_toast();

            if event::poll(TICK)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Recompute the visible set from the current state.
    ///
    /// Invoked after every mutation of the mode, the search term, or the
    /// favorites set; there is no memoization.
    pub fn recompute_visible(&mut self) {
        self.visible = state::recompute(
            &self.state,
            &self.top_level,
            &self.index.snapshot(),
            &self.favorites,
        );
        self.rebuild_rows();
    }

    /// Entry currently holding keyboard focus, with its nesting depth
    pub fn focused_entry(&self) -> Option<(&Entry, usize)> {
        match self.rows.get(self.state.focused?) {
            Some(VisibleRow::Entry { entry, depth }) => Some((entry, *depth)),
            _ => None,
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = state::flatten_rows(&self.visible, &self.state);
        self.clamp_focus();
    }

    fn clamp_focus(&mut self) {
        let Some(focused) = self.state.focused else {
            return;
        };
        if self.rows.is_empty() {
            self.state.focused = None;
            return;
        }

        let mut idx = focused.min(self.rows.len() - 1);
        loop {
            if self.rows[idx].is_focusable() {
                self.state.focused = Some(idx);
                return;
            }
            if idx == 0 {
                self.state.focused = None;
                return;
            }
            idx -= 1;
        }
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.rows.len() as isize;
        let mut idx = match self.state.focused {
            Some(current) => current as isize + delta,
            // First press lands on the first row regardless of direction
            None => 0,
        };
        let step = if delta < 0 { -1 } else { 1 };

        while idx >= 0 && idx < len {
            if self.rows[idx as usize].is_focusable() {
                self.state.focused = Some(idx as usize);
                return;
            }
            idx += step;
        }
        // Ran off the edge: focus stays where it was
    }

    fn dispatch_root_fetch(&self) {
        let client = Arc::clone(&self.client);
        let root = self.config.root.clone();
        let tx = self.events_tx.clone();
        self.pool.spawn(move || {
            let result = client.fetch_children(&root).map_err(|e| {
                warn!(path = %root, error = %e, "root listing fetch failed");
                e.to_string()
            });
            let _ = tx.send(AppEvent::RootFetched { result });
        });
    }

    fn dispatch_children_fetch(&self, path: String) {
        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        self.pool.spawn(move || {
            let result = client.fetch_children(&path).map_err(|e| {
                debug!(path = %path, error = %e, "children fetch failed");
                e.to_string()
            });
            let _ = tx.send(AppEvent::SubtreeFetched { path, result });
        });
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
        while let Ok(event) = self.crawl_rx.try_recv() {
            if let CrawlEvent::Indexed { .. } = event {
                self.crawled_dirs += 1;
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RootFetched { result } => match result {
                Ok(entries) => {
                    self.root = RootState::Ready;
                    self.top_level = entries;
                    self.recompute_visible();
                    // Walk the whole shelf in the background so search can
                    // see files whose directories were never expanded.
                    self.crawler.crawl_listing(&self.top_level);
                }
                Err(message) => {
                    self.root = RootState::Failed(message);
                }
            },
            AppEvent::SubtreeFetched { path, result } => {
                match result {
                    Ok(entries) => {
                        self.crawler.crawl_listing(&entries);
                        self.state.apply_listing(&path, DirListing::Loaded(entries));
                    }
                    Err(message) => {
                        // The failure stays local to this node: siblings and
                        // the crawl of other branches are untouched.
                        self.state.apply_listing(&path, DirListing::Failed(message));
                    }
                }
                self.rebuild_rows();
            }
            AppEvent::Toast(message) => self.show_toast(message),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.search_focused {
            self.handle_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.search_focused = true,
            KeyCode::Esc => {
                if self.show_help {
                    self.show_help = false;
                } else if !self.state.search_term.is_empty() {
                    self.state.set_search_term("");
                    self.recompute_visible();
                }
            }
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_theme(),
            KeyCode::Char('f') | KeyCode::Char('F') => self.set_mode(ViewMode::Favorites),
            KeyCode::Char('v') | KeyCode::Char('V') => self.set_mode(ViewMode::All),
            KeyCode::Char('?') => self.show_help = !self.show_help,
            KeyCode::Up => self.move_focus(-1),
            KeyCode::Down => self.move_focus(1),
            KeyCode::Char('s') | KeyCode::Char('S') => self.toggle_focused_favorite(),
            KeyCode::Enter => self.open_focused(),
            KeyCode::Char('c') => self.copy_focused_contents(),
            KeyCode::Char('y') => self.copy_focused_link(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.search_focused = false;
                self.state.set_search_term("");
                self.recompute_visible();
            }
            KeyCode::Enter => self.search_focused = false,
            KeyCode::Backspace => {
                let mut term = self.state.search_term.clone();
                term.pop();
                self.state.set_search_term(term);
                self.recompute_visible();
            }
            KeyCode::Char(c) => {
                let mut term = self.state.search_term.clone();
                term.push(c);
                self.state.set_search_term(term);
                self.recompute_visible();
            }
            _ => {}
        }
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.state.set_mode(mode) {
            self.recompute_visible();
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.save_theme(self.theme) {
            warn!(error = %e, "failed to persist theme");
        }
    }

    fn toggle_focused_favorite(&mut self) {
        // Favorites are a set of top-level names; nested rows are ignored
        let Some((entry, 0)) = self.focused_entry() else {
            return;
        };
        let name = entry.name.clone();

        let added = self.favorites.toggle(&name);
        if let Err(e) = self.store.save_favorites(&self.favorites) {
            warn!(error = %e, "failed to persist favorites");
        }

        if added {
            self.show_toast(format!("Added {} to favorites", name));
        } else {
            self.show_toast(format!("Removed {} from favorites", name));
        }

        // Unfavoriting while in the favorites view removes the entry from
        // the visible set immediately.
        if self.state.mode == ViewMode::Favorites {
            self.recompute_visible();
        }
    }

    fn open_focused(&mut self) {
        let Some((entry, _)) = self.focused_entry() else {
            return;
        };
        let entry = entry.clone();

        match entry.kind {
            EntryKind::Dir => self.toggle_dir(&entry.path),
            EntryKind::Link => self.open_url(&entry.path),
            EntryKind::File => {
                let url = self.client.file_url(&entry.path);
                self.open_url(&url);
            }
        }
    }

    /// Toggle a rendered directory node, dispatching its first fetch
    pub fn toggle_dir(&mut self, path: &str) {
        if let ToggleOutcome::FetchNeeded = self.state.toggle_expansion(path) {
            self.dispatch_children_fetch(path.to_string());
        }
        self.rebuild_rows();
    }

    fn open_url(&mut self, url: &str) {
        match clipboard::open_in_browser(url) {
            Ok(()) => self.show_toast(format!("Opened {}", url)),
            Err(e) => self.show_toast(format!("Failed to open link: {}", e)),
        }
    }

    fn copy_focused_link(&mut self) {
        let Some((entry, _)) = self.focused_entry() else {
            return;
        };

        let url = match entry.kind {
            EntryKind::Link => entry.path.clone(),
            _ => self.client.file_url(&entry.path),
        };

        match clipboard::copy_to_clipboard(&url) {
            Ok(()) => self.show_toast("Link copied to clipboard".to_string()),
            Err(e) => self.show_toast(format!("Failed to copy link: {}", e)),
        }
    }

    fn copy_focused_contents(&mut self) {
        let Some((entry, _)) = self.focused_entry() else {
            return;
        };
        let entry = entry.clone();
        if entry.kind != EntryKind::File {
            self.show_toast("Contents can only be copied for files".to_string());
            return;
        }

        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        self.pool.spawn(move || {
            let message = match client.fetch_file(&entry.path) {
                Ok(content) => match clipboard::copy_to_clipboard(&content) {
                    Ok(()) => "File contents copied to clipboard".to_string(),
                    Err(e) => format!("Failed to copy contents: {}", e),
                },
                Err(e) => format!("Failed to fetch {}: {}", entry.name, e),
            };
            let _ = tx.send(AppEvent::Toast(message));
        });
    }

    fn show_toast(&mut self, message: String) {
        self.toast = Some((message, Instant::now()));
    }

    fn expire_toast(&mut self) {
        if let Some((_, shown_at)) = &self.toast {
            if shown_at.elapsed() >= TOAST_LIFETIME {
                self.toast = None;
            }
        }
    }
}
