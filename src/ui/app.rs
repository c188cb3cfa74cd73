use super::events::{AppEvent, EventHandler};
use super::mount::{MountChange, PlayerMount};
use super::navigation::{Navigator, Step, View};
use super::render::{self, PlayerPane, Screen};
use super::TerminalManager;
use crate::audio::{AudioConfig, AudioOutput, MediaSource, PlaybackSession, RodioTransport};
use crate::catalog::{Catalog, LessonConfig, LessonSummary};
use crate::config::Config;
use crate::error::CatalogError;
use anyhow::Result;
use ratatui::widgets::ListState;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Results of background fetches, delivered back onto the UI loop.
enum LoadResult {
    Index(Vec<LessonSummary>),
    Lesson {
        request: u64,
        summary: LessonSummary,
        config: Option<LessonConfig>,
    },
    Media {
        request: u64,
        title: String,
        auto_play: bool,
        result: Result<MediaSource, CatalogError>,
    },
}

enum PlayerSlot {
    Idle,
    Loading { title: String },
    Unavailable { title: String, reason: String },
    Active(PlaybackSession<RodioTransport>),
}

pub struct App {
    config: Config,
    terminal: TerminalManager,
    event_handler: EventHandler,
    catalog: Arc<Catalog>,
    // None when no output device could be opened; browsing still works
    output: Option<AudioOutput>,
    audio_config: AudioConfig,

    navigator: Navigator,
    list_state: ListState,
    player: PlayerSlot,
    mount: PlayerMount,
    start_lesson: Option<String>,

    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,

    status_message: Option<(String, Instant)>,
    show_help: bool,
    should_quit: bool,
}

impl App {
    pub async fn new(config: Config, start_lesson: Option<String>) -> Result<Self> {
        let audio_config = AudioConfig::from(&config);
        let output = match AudioOutput::open(audio_config.clone()) {
            Ok(output) => Some(output),
            Err(e) => {
                warn!("Audio output unavailable, continuing without sound: {}", e);
                None
            }
        };

        let catalog = Arc::new(Catalog::from_config(&config.content));
        info!("Lesson tree at {}", config.content.base);

        let terminal = TerminalManager::new()?;
        let (load_tx, load_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            terminal,
            event_handler: EventHandler::new(),
            catalog,
            output,
            audio_config,
            navigator: Navigator::default(),
            list_state: ListState::default(),
            player: PlayerSlot::Idle,
            mount: PlayerMount::default(),
            start_lesson,
            load_tx,
            load_rx,
            status_message: None,
            show_help: false,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.request_index();
        self.set_status("Loading lessons...");

        // input, fetch results and transport notifications are all drained on this one loop
        while !self.should_quit {
            if let Some(event) = self.event_handler.poll(Duration::from_millis(50)) {
                self.handle_event(event);
            }

            while let Ok(result) = self.load_rx.try_recv() {
                self.handle_load(result);
            }

            if let PlayerSlot::Active(session) = &mut self.player {
                session.pump_events();
            }

            self.render()?;

            sleep(self.audio_config.poll_interval).await;
        }

        info!("Shutting down");
        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        if self.show_help {
            if matches!(event, AppEvent::ToggleHelp | AppEvent::Quit) {
                self.show_help = false;
            }
            return;
        }

        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::ToggleHelp => self.show_help = true,
            AppEvent::Up => self.move_selection(-1),
            AppEvent::Down => self.move_selection(1),
            AppEvent::Enter => self.activate_selection(),
            AppEvent::Back => {
                if let Some(anchor) = self.navigator.back() {
                    self.select_row(anchor);
                    self.sync_player();
                }
            }
            AppEvent::Home => {
                self.navigator.home();
                self.select_row(0);
                self.sync_player();
            }
            AppEvent::PreviousSubUnit => self.step(Step::Previous),
            AppEvent::NextSubUnit => self.step(Step::Next),
            AppEvent::TogglePlay => {
                self.with_session(|session| session.toggle());
            }
            AppEvent::Restart => {
                self.with_session(|session| session.restart());
            }
            AppEvent::CycleLoop => {
                if let Some(label) = self.with_session(|session| {
                    session.cycle_loop_mode();
                    session.snapshot().loop_label()
                }) {
                    self.set_status(&label);
                }
            }
            AppEvent::CycleSpeed => {
                if let Some(rate) = self.with_session(|session| {
                    session.cycle_rate();
                    session.snapshot().rate
                }) {
                    self.set_status(&format!("Speed: {}", rate));
                }
            }
            AppEvent::SeekTo(fraction) => {
                self.with_session(|session| session.seek(fraction));
            }
            AppEvent::SeekBy(delta) => {
                self.with_session(|session| {
                    let target = session.snapshot().progress() + delta;
                    session.seek(target.clamp(0.0, 1.0));
                });
            }
        }
    }

    /// Runs `f` against the mounted session; `None` when nothing is playable.
    fn with_session<R>(
        &mut self,
        f: impl FnOnce(&mut PlaybackSession<RodioTransport>) -> R,
    ) -> Option<R> {
        match &mut self.player {
            PlayerSlot::Active(session) => Some(f(session)),
            _ => None,
        }
    }

    fn activate_selection(&mut self) {
        let Some(selected) = self.list_state.selected() else {
            return;
        };

        match self.navigator.view() {
            View::Home => {
                let summary = self.navigator.lessons().get(selected).cloned();
                if let Some(summary) = summary {
                    self.request_lesson(summary);
                }
            }
            View::Lesson => {
                if self.navigator.select_sub_unit(selected, false) {
                    self.select_row(0);
                    self.sync_player();
                }
            }
            View::SubUnit => {
                if self.navigator.select_sub_section(selected) {
                    self.select_row(0);
                    self.sync_player();
                }
            }
            View::DirectLesson | View::SubSection => {}
        }
    }

    fn step(&mut self, step: Step) {
        if self.navigator.step_sub_unit(step) {
            self.select_row(0);
            self.sync_player();
        }
    }

    fn move_selection(&mut self, delta: i32) {
        let len = self.navigator.list_entries().len();
        if len == 0 {
            return;
        }

        let current = self.list_state.selected().unwrap_or(0);
        let new_index = if delta < 0 {
            current.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (current + delta as usize).min(len - 1)
        };

        self.list_state.select(Some(new_index));
    }

    /// Highlights `row` in the current list, or nothing when the list is empty.
    fn select_row(&mut self, row: usize) {
        let len = self.navigator.list_entries().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(row.min(len - 1)));
        }
    }

    fn request_index(&self) {
        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let lessons = catalog.load_index().await;
            let _ = tx.send(LoadResult::Index(lessons));
        });
    }

    fn request_lesson(&mut self, summary: LessonSummary) {
        let request = self.mount.begin_lesson_load();
        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();

        debug!("Loading lesson {}", summary.id);
        tokio::spawn(async move {
            let config = catalog.load_lesson_config(&summary.id).await;
            let _ = tx.send(LoadResult::Lesson {
                request,
                summary,
                config,
            });
        });
    }

    /// Mounts whatever the navigator says should be playing. A different source
    /// drops the old session before the new one is fetched.
    fn sync_player(&mut self) {
        let (request, player) = match self.mount.sync(self.navigator.player_request()) {
            MountChange::Keep => return,
            MountChange::Clear => {
                self.player = PlayerSlot::Idle;
                return;
            }
            MountChange::Fetch { request, player } => (request, player),
        };

        // replacing the slot drops the old session, releasing its transport
        // before anything new starts
        self.player = PlayerSlot::Loading {
            title: player.title.clone(),
        };

        let catalog = Arc::clone(&self.catalog);
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            let result = catalog.fetch_audio(&player.locator).await;
            let _ = tx.send(LoadResult::Media {
                request,
                title: player.title,
                auto_play: player.auto_play,
                result,
            });
        });
    }

    fn handle_load(&mut self, result: LoadResult) {
        match result {
            LoadResult::Index(lessons) => {
                let count = lessons.len();
                self.navigator.set_lessons(lessons);
                if self.navigator.view() == View::Home {
                    self.select_row(0);
                }

                if count == 0 {
                    self.set_status(&format!("No lessons found at {}", self.config.content.base));
                } else {
                    self.set_status(&format!("{} lessons", count));
                }

                if let Some(id) = self.start_lesson.take() {
                    let summary = self.navigator.lessons().iter().find(|l| l.id == id).cloned();
                    match summary {
                        Some(summary) => self.request_lesson(summary),
                        None => self.set_status(&format!("Lesson '{}' not in index", id)),
                    }
                }
            }
            LoadResult::Lesson {
                request,
                summary,
                config,
            } => {
                if !self.mount.is_current_lesson(request) {
                    debug!("Discarding stale lesson load for {}", summary.id);
                    return;
                }
                match config {
                    Some(config) => {
                        self.navigator.open_lesson(summary, config);
                        self.select_row(0);
                        self.sync_player();
                    }
                    None => self.set_status(&format!("Could not load lesson {}", summary.title)),
                }
            }
            LoadResult::Media {
                request,
                title,
                auto_play,
                result,
            } => {
                if !self.mount.is_current_media(request) {
                    debug!("Discarding stale media for {}", title);
                    return;
                }
                self.player = match (result, &self.output) {
                    (Ok(media), Some(output)) => PlayerSlot::Active(PlaybackSession::open(
                        output.transport(),
                        &media,
                        title,
                        auto_play,
                        self.audio_config.default_rate,
                    )),
                    (Ok(_), None) => PlayerSlot::Unavailable {
                        title,
                        reason: "no audio output device".to_string(),
                    },
                    (Err(e), _) => {
                        warn!("Audio unavailable: {}", e);
                        PlayerSlot::Unavailable {
                            title,
                            reason: e.to_string(),
                        }
                    }
                };
            }
        }
    }

    fn set_status(&mut self, message: &str) {
        self.status_message = Some((message.to_string(), Instant::now()));
    }

    fn current_status(&self) -> String {
        let timeout = Duration::from_millis(self.config.ui.status_duration_ms);
        match &self.status_message {
            Some((message, at)) if at.elapsed() < timeout => message.clone(),
            _ => "Ready - press ? for help".to_string(),
        }
    }

    fn render(&mut self) -> Result<()> {
        let breadcrumbs = self.navigator.breadcrumbs();
        let entries = self.navigator.list_entries();
        let status = self.current_status();
        let image = self
            .mount
            .mounted()
            .map(|request| self.catalog.image_uri(&request.locator));
        let description = match self.navigator.view() {
            View::Home => None,
            _ => self
                .navigator
                .lesson_config()
                .map(|config| config.description.as_str()),
        };
        let list_title = match self.navigator.view() {
            View::Home => "Lessons",
            View::Lesson => "Anuvakams",
            _ => "Panasas",
        };

        let player = match &self.player {
            PlayerSlot::Idle => PlayerPane::Empty,
            PlayerSlot::Loading { title } => PlayerPane::Loading { title },
            PlayerSlot::Unavailable { title, reason } => PlayerPane::Unavailable { title, reason },
            PlayerSlot::Active(session) => PlayerPane::Session(session.snapshot()),
        };

        let screen = Screen {
            breadcrumbs: &breadcrumbs,
            list_title,
            entries: &entries,
            image: image.as_deref(),
            description,
            player,
            status: &status,
            show_help: self.show_help,
            show_key_hints: self.config.ui.show_key_hints,
        };

        let list_state = &mut self.list_state;
        let mut gauge_area = None;
        self.terminal.draw(|f| {
            gauge_area = render::draw(f, &screen, list_state);
        })?;
        self.event_handler.set_gauge_area(gauge_area);

        Ok(())
    }
}
