//! **earshot** -- keyboard-first navigation overlays for screen-reader users.
//!
//! This is the umbrella crate that re-exports everything from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! earshot = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`earshot_core`] are available at the crate root
//!   ([`NavigationEngine`], [`NavigationState`], [`StatePriority`],
//!   [`TwoLevelNavigator`], [`TypeaheadSearch`], etc.).
//! * The [`menus`] module re-exports everything from [`earshot_menus`]
//!   (list, tree and quantity menus and their data sources).
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use earshot::menus::{ListMenu, VecSource};
//! use earshot::{Host, HostDefault, HostOptions, KeyInput, NavConfig, NavigationEngine, StateHandle, StatePriority};
//!
//! struct App {
//!     fruit: Option<StateHandle<ListMenu<VecSource>>>,
//!     quit: bool,
//! }
//!
//! impl Host for App {
//!     fn register(&mut self, engine: &mut NavigationEngine) {
//!         let menu = ListMenu::new("Fruit", VecSource::new(["Apple", "Banana"]));
//!         self.fruit = Some(engine.register(StatePriority::overlay(0), menu));
//!     }
//!     fn on_key(&mut self, key: KeyInput, engine: &mut NavigationEngine) {
//!         if key == KeyInput::char('f') {
//!             if let Some(fruit) = self.fruit {
//!                 engine.with_state(fruit, |menu, cx| menu.open(cx));
//!             }
//!         }
//!     }
//!     fn on_default(&mut self, kind: HostDefault, _: &mut NavigationEngine) {
//!         self.quit = kind == HostDefault::Cancel;
//!     }
//!     fn view(&self, _: &mut ratatui::Frame, _: ratatui::layout::Rect) {}
//!     fn should_quit(&self) -> bool {
//!         self.quit
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), earshot::HostError> {
//!     let mut app = App { fruit: None, quit: false };
//!     earshot::run_host(&mut app, NavConfig::default(), HostOptions::default()).await
//! }
//! ```

pub mod logging;
pub mod runtime;
pub mod transcript;

pub use earshot_core::*;
pub mod menus {
    pub use earshot_menus::*;
}

pub use logging::init_logging;
pub use runtime::{route_key, run_host, Host, HostError, HostOptions, KeyRoute};
pub use transcript::TranscriptSink;

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
