//! Terminal host integration.
//!
//! [`run_host`] wires a [`Host`] to a real terminal through
//! [`ratatui`]/[`crossterm`]. Every key-press is routed the way an
//! accessibility overlay sees keys inside a larger application:
//!
//! 1. If the key is Escape or Enter, ask the engine whether the host's native
//!    cancel/accept must be suppressed. This is decided before dispatch, while
//!    the state that cares about the key is still in the shape it was in when
//!    the key arrived.
//! 2. Dispatch the key to the registered navigation states.
//! 3. A key no state consumed goes to [`Host::on_key`].
//! 4. The native cancel/accept path ([`Host::on_default`]) runs unless it was
//!    suppressed, whether or not the key was consumed. That is the second bus.

use crate::transcript::TranscriptSink;
use crossterm::event::{Event, EventStream};
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use earshot_core::{ConfigError, Dispatch, HostDefault, KeyInput, NavConfig, NavigationEngine};
use futures::StreamExt;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, stdout, Stdout};
use std::path::PathBuf;

/// Errors that can occur while setting up or running a terminal host.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// An I/O error from terminal setup, rendering, or teardown.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Options for [`run_host`].
///
/// Use struct update syntax to override only what you need:
///
/// ```rust,ignore
/// let options = HostOptions {
///     title: Some("Stockpile".into()),
///     log_file: Some("stockpile.log".into()),
///     ..HostOptions::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Start in the alternate screen (default: true).
    pub alt_screen: bool,
    /// Terminal title.
    pub title: Option<String>,
    /// Announcements kept in the transcript pane (default: 8).
    pub transcript_len: usize,
    /// Restore the terminal before a panic message is printed (default: true).
    pub catch_panics: bool,
    /// Install a file logger at startup.
    pub log_file: Option<PathBuf>,
    /// Read [`NavConfig`] from this TOML file instead of the given config.
    pub config_file: Option<PathBuf>,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            alt_screen: true,
            title: None,
            transcript_len: 8,
            catch_panics: true,
            log_file: None,
            config_file: None,
        }
    }
}

/// The application an engine sits in front of.
pub trait Host {
    /// Register navigation states. Called once before the first key.
    fn register(&mut self, engine: &mut NavigationEngine);

    /// A key no navigation state consumed.
    fn on_key(&mut self, key: KeyInput, engine: &mut NavigationEngine);

    /// The host's native cancel/accept behavior, e.g. closing the focused
    /// window on Escape.
    fn on_default(&mut self, kind: HostDefault, engine: &mut NavigationEngine);

    /// Draw the application into `area`.
    fn view(&self, frame: &mut Frame, area: Rect);

    fn should_quit(&self) -> bool;
}

/// What happened to one key on its way through [`route_key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRoute {
    pub dispatch: Dispatch,
    /// The native default that ran, if any.
    pub default_ran: Option<HostDefault>,
    /// The native default that was suppressed, if any.
    pub default_suppressed: Option<HostDefault>,
}

/// Route one key-press through the engine and the host.
pub fn route_key<H: Host + ?Sized>(host: &mut H, engine: &mut NavigationEngine, key: KeyInput) -> KeyRoute {
    let default = HostDefault::from_key(&key).map(|kind| (kind, engine.should_suppress_host_default(kind)));

    let dispatch = engine.dispatch(key);
    if dispatch == Dispatch::PassThrough {
        host.on_key(key, engine);
    }

    let mut route = KeyRoute {
        dispatch,
        default_ran: None,
        default_suppressed: None,
    };
    match default {
        Some((kind, true)) => route.default_suppressed = Some(kind),
        Some((kind, false)) => {
            host.on_default(kind, engine);
            route.default_ran = Some(kind);
        }
        None => {}
    }
    route
}

/// Run `host` in the terminal until it asks to quit or Ctrl+C arrives.
pub async fn run_host<H: Host>(host: &mut H, config: NavConfig, options: HostOptions) -> Result<(), HostError> {
    if let Some(path) = &options.log_file {
        crate::logging::init_logging(path)?;
    }
    let config = match &options.config_file {
        Some(path) => NavConfig::load(path)?,
        None => config,
    };

    let transcript = TranscriptSink::new(options.transcript_len);
    let mut engine = NavigationEngine::new(config, transcript.clone());
    host.register(&mut engine);
    tracing::info!(states = engine.dispatcher().len(), "host starting");

    let mut terminal = init_terminal(&options)?;
    let result = event_loop(host, &mut engine, &transcript, &mut terminal, &options).await;
    restore_terminal(options.alt_screen)?;
    tracing::info!("host stopped");
    result
}

async fn event_loop<H: Host>(
    host: &mut H,
    engine: &mut NavigationEngine,
    transcript: &TranscriptSink,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    options: &HostOptions,
) -> Result<(), HostError> {
    let mut events = EventStream::new();
    let transcript_height = options.transcript_len.min(u16::MAX as usize - 2) as u16 + 2;
    draw(terminal, host, transcript, transcript_height)?;

    loop {
        tokio::select! {
            biased;

            _ = tokio::signal::ctrl_c() => {
                tracing::debug!("received ctrl+c signal");
                return Ok(());
            }

            event = events.next() => match event {
                Some(Ok(Event::Key(event))) => {
                    if let Some(key) = KeyInput::from_event(&event) {
                        let route = route_key(host, engine, key);
                        tracing::debug!(?key, ?route, "key routed");
                    }
                }
                Some(Ok(Event::Resize(..))) => {}
                Some(Ok(_)) => continue,
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
        }

        if host.should_quit() {
            return Ok(());
        }
        draw(terminal, host, transcript, transcript_height)?;
    }
}

fn draw<H: Host>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    host: &H,
    transcript: &TranscriptSink,
    transcript_height: u16,
) -> Result<(), HostError> {
    terminal.draw(|frame| {
        let [main, speech] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(transcript_height)]).areas(frame.area());
        host.view(frame, main);
        transcript.render(frame, speech);
    })?;
    Ok(())
}

fn init_terminal(options: &HostOptions) -> Result<Terminal<CrosstermBackend<Stdout>>, HostError> {
    // Install the restoring panic hook only once to avoid stacking.
    if options.catch_panics {
        use std::sync::Once;
        static HOOK_INSTALLED: Once = Once::new();
        let alt_screen = options.alt_screen;
        HOOK_INSTALLED.call_once(|| {
            let original_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                if earshot_core::in_guarded_call() {
                    // The dispatcher contains it and the host keeps running.
                    tracing::error!(panic = %info, "navigation state panicked");
                    return;
                }
                let _ = restore_terminal(alt_screen);
                original_hook(info);
            }));
        });
    }

    enable_raw_mode()?;
    let mut writer = stdout();
    if options.alt_screen {
        execute!(writer, EnterAlternateScreen)?;
    }
    if let Some(title) = &options.title {
        execute!(writer, SetTitle(title))?;
    }
    execute!(writer, cursor::Hide)?;
    Ok(Terminal::new(CrosstermBackend::new(writer))?)
}

fn restore_terminal(alt_screen: bool) -> Result<(), io::Error> {
    // Best effort: keep restoring even if a step fails.
    let raw = disable_raw_mode();
    let mut writer = stdout();
    execute!(writer, cursor::Show).ok();
    if alt_screen {
        execute!(writer, LeaveAlternateScreen).ok();
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use earshot_core::{NavContext, NavError, NavigationState, RecordingSink, StatePriority};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        keys: Vec<KeyInput>,
        defaults: Vec<HostDefault>,
    }

    impl Host for Recorder {
        fn register(&mut self, _engine: &mut NavigationEngine) {}

        fn on_key(&mut self, key: KeyInput, _engine: &mut NavigationEngine) {
            self.keys.push(key);
        }

        fn on_default(&mut self, kind: HostDefault, _engine: &mut NavigationEngine) {
            self.defaults.push(kind);
        }

        fn view(&self, _frame: &mut Frame, _area: Rect) {}

        fn should_quit(&self) -> bool {
            false
        }
    }

    /// Consumes Escape; claims cancel only while `busy`.
    struct Search {
        busy: bool,
    }

    impl NavigationState for Search {
        fn name(&self) -> &str {
            "Search"
        }

        fn is_active(&self) -> bool {
            true
        }

        fn handle_input(&mut self, key: &KeyInput, _cx: &mut NavContext<'_>) -> Result<bool, NavError> {
            if key.code == KeyCode::Esc {
                self.busy = false;
                return Ok(true);
            }
            Ok(false)
        }

        fn close(&mut self, _cx: &mut NavContext<'_>) {}

        fn claims_host_default(&self, kind: HostDefault) -> bool {
            self.busy && kind == HostDefault::Cancel
        }
    }

    /// Panics on every key, noting whether it ran inside the guard.
    struct Broken(Rc<Cell<bool>>);

    impl NavigationState for Broken {
        fn name(&self) -> &str {
            "Broken"
        }

        fn is_active(&self) -> bool {
            true
        }

        fn handle_input(&mut self, _key: &KeyInput, _cx: &mut NavContext<'_>) -> Result<bool, NavError> {
            self.0.set(earshot_core::in_guarded_call());
            panic!("overlay bug");
        }

        fn close(&mut self, _cx: &mut NavContext<'_>) {}
    }

    fn engine_with_search(busy: bool) -> NavigationEngine {
        let mut engine = NavigationEngine::new(NavConfig::default(), RecordingSink::new());
        engine.register(StatePriority::overlay(0), Search { busy });
        engine
    }

    #[test]
    fn suppression_is_decided_before_dispatch() {
        let mut host = Recorder::default();
        let mut engine = engine_with_search(true);
        let route = route_key(&mut host, &mut engine, KeyInput::new(KeyCode::Esc));
        assert!(route.dispatch.is_consumed());
        assert_eq!(route.default_suppressed, Some(HostDefault::Cancel));
        assert!(host.defaults.is_empty());
        assert!(host.keys.is_empty());
    }

    #[test]
    fn consumed_key_still_reaches_unsuppressed_default() {
        let mut host = Recorder::default();
        let mut engine = engine_with_search(false);
        let route = route_key(&mut host, &mut engine, KeyInput::new(KeyCode::Esc));
        assert!(route.dispatch.is_consumed());
        assert_eq!(route.default_ran, Some(HostDefault::Cancel));
        assert!(host.keys.is_empty());
    }

    #[test]
    fn panicking_state_is_contained_inside_the_guard() {
        let mut host = Recorder::default();
        let mut engine = NavigationEngine::new(NavConfig::default(), RecordingSink::new());
        let guarded = Rc::new(Cell::new(false));
        engine.register(StatePriority::overlay(0), Broken(guarded.clone()));
        let route = route_key(&mut host, &mut engine, KeyInput::new(KeyCode::Down));
        assert_eq!(route.dispatch, Dispatch::Consumed { by: "Broken".into() });
        assert!(guarded.get());
        assert!(!earshot_core::in_guarded_call());
        assert!(host.keys.is_empty());
    }

    #[test]
    fn unconsumed_keys_reach_the_host() {
        let mut host = Recorder::default();
        let mut engine = engine_with_search(false);
        let route = route_key(&mut host, &mut engine, KeyInput::char('q'));
        assert_eq!(route.dispatch, Dispatch::PassThrough);
        assert_eq!(host.keys, vec![KeyInput::char('q')]);
        assert_eq!(route.default_ran, None);

        route_key(&mut host, &mut engine, KeyInput::new(KeyCode::Enter));
        assert_eq!(host.defaults, vec![HostDefault::Accept]);
    }
}
