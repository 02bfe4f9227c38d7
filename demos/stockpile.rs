//! A small colony stockpile driven entirely from the keyboard.
//!
//! Run with `cargo run --example stockpile`, then press `s` for the
//! stockpile window, `f` for storage filters and `l` for the haul limit.
//! Announcements appear in the speech pane at the bottom; with
//! `RUST_LOG=debug` they are also written to `stockpile.log`.

use earshot::menus::{ListMenu, MenuSource, NodeTree, QuantityMenu, TreeMenu, TreeNode};
use earshot::ratatui::layout::Rect;
use earshot::ratatui::text::Line;
use earshot::ratatui::widgets::{Block, Borders, Paragraph};
use earshot::ratatui::Frame;
use earshot::{
    ActionOutcome, ButtonDescriptor, Host, HostDefault, HostError, HostOptions, HostWindow, KeyInput,
    NavConfig, NavError, NavigationEngine, Priority, StateHandle, StatePriority,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone)]
struct Stack {
    name: &'static str,
    count: u32,
    forbidden: bool,
}

type Stock = Rc<RefCell<Vec<Stack>>>;

struct StockSource {
    stock: Stock,
}

impl StockSource {
    fn stack(&self, index: usize) -> Result<Stack, NavError> {
        self.stock
            .borrow()
            .get(index)
            .cloned()
            .ok_or_else(|| NavError::source("Stockpile", format!("no stack {index}")))
    }
}

impl MenuSource for StockSource {
    fn item_count(&self) -> Result<usize, NavError> {
        Ok(self.stock.borrow().len())
    }

    fn label(&self, index: usize) -> Result<String, NavError> {
        let stack = self.stack(index)?;
        Ok(format!("{} x{}", stack.name, stack.count))
    }

    fn content_lines(&self, index: usize) -> Result<Vec<String>, NavError> {
        let stack = self.stack(index)?;
        Ok(vec![
            format!("Count {}", stack.count),
            format!("Forbidden: {}", if stack.forbidden { "yes" } else { "no" }),
        ])
    }

    fn populate_buttons(&mut self, index: usize) -> Result<Vec<ButtonDescriptor>, NavError> {
        let stack = self.stack(index)?;
        let toggle = self.stock.clone();
        let haul = self.stock.clone();
        Ok(vec![
            ButtonDescriptor::new(if stack.forbidden { "Allow" } else { "Forbid" }, move || {
                let mut stock = toggle.borrow_mut();
                let stack = stock
                    .get_mut(index)
                    .ok_or_else(|| NavError::action("Forbid", "stack is gone"))?;
                stack.forbidden = !stack.forbidden;
                Ok(ActionOutcome::Refresh)
            }),
            ButtonDescriptor::new("Haul one", move || {
                let mut stock = haul.borrow_mut();
                let stack = stock
                    .get_mut(index)
                    .ok_or_else(|| NavError::action("Haul", "stack is gone"))?;
                if stack.count == 0 {
                    return Err(NavError::action("Haul", "stack is empty"));
                }
                stack.count -= 1;
                Ok(ActionOutcome::Refresh)
            })
            .enabled_if(!stack.forbidden, "forbidden"),
        ])
    }

    fn accepts_quantity(&self, _index: usize) -> bool {
        true
    }

    fn set_quantity(&mut self, index: usize, quantity: u32) -> Result<(), NavError> {
        let mut stock = self.stock.borrow_mut();
        let stack = stock
            .get_mut(index)
            .ok_or_else(|| NavError::action("Set count", "stack is gone"))?;
        stack.count = quantity;
        Ok(())
    }
}

/// The host's own notion of an open window.
#[derive(Clone)]
struct Window(Rc<Cell<bool>>);

impl HostWindow for Window {
    fn is_open(&self) -> bool {
        self.0.get()
    }

    fn request_close(&mut self) -> Result<(), NavError> {
        self.0.set(false);
        Ok(())
    }
}

struct Colony {
    stock: Stock,
    haul_limit: Rc<Cell<u32>>,
    window: Window,
    stockpile: Option<StateHandle<ListMenu<StockSource>>>,
    filters: Option<StateHandle<TreeMenu<NodeTree>>>,
    limit: Option<StateHandle<QuantityMenu>>,
    quit: bool,
}

impl Colony {
    fn new() -> Self {
        let stock = vec![
            Stack { name: "Wood", count: 75, forbidden: false },
            Stack { name: "Steel", count: 120, forbidden: false },
            Stack { name: "Simple meal", count: 14, forbidden: false },
            Stack { name: "Medicine", count: 6, forbidden: true },
        ];
        Self {
            stock: Rc::new(RefCell::new(stock)),
            haul_limit: Rc::new(Cell::new(10)),
            window: Window(Rc::new(Cell::new(false))),
            stockpile: None,
            filters: None,
            limit: None,
            quit: false,
        }
    }
}

fn filters() -> NodeTree {
    NodeTree::new(vec![
        TreeNode::new(0, "Foods"),
        TreeNode::new(1, "Meals"),
        TreeNode::new(1, "Raw food"),
        TreeNode::new(0, "Manufactured"),
        TreeNode::new(1, "Medicine"),
        TreeNode::new(0, "Resources"),
        TreeNode::new(1, "Wood"),
        TreeNode::new(1, "Steel"),
    ])
}

impl Host for Colony {
    fn register(&mut self, engine: &mut NavigationEngine) {
        let limit = self.haul_limit.clone();
        self.limit = Some(engine.register(
            StatePriority::blocking(0),
            QuantityMenu::new("Haul limit", move |n| {
                limit.set(n);
                Ok(())
            }),
        ));
        self.stockpile = Some(engine.register(
            StatePriority::overlay(0),
            ListMenu::new("Stockpile", StockSource { stock: self.stock.clone() }).with_window(self.window.clone()),
        ));
        self.filters = Some(engine.register(StatePriority::overlay(10), TreeMenu::new("Filters", filters())));
    }

    fn on_key(&mut self, key: KeyInput, engine: &mut NavigationEngine) {
        match key.typed_char() {
            Some('s') => {
                if let Some(menu) = self.stockpile {
                    self.window.0.set(true);
                    engine.with_state(menu, |m, cx| m.open(cx));
                }
            }
            Some('f') => {
                if let Some(menu) = self.filters {
                    engine.with_state(menu, |m, cx| m.open(cx));
                }
            }
            Some('l') => {
                if let Some(menu) = self.limit {
                    let current = self.haul_limit.get();
                    engine.with_state(menu, |m, cx| m.open(current, 1, 500, cx));
                }
            }
            _ => {}
        }
    }

    fn on_default(&mut self, kind: HostDefault, engine: &mut NavigationEngine) {
        match kind {
            HostDefault::Cancel if self.window.is_open() => self.window.0.set(false),
            HostDefault::Cancel => self.quit = true,
            HostDefault::Accept => engine.speak("Nothing to confirm", Priority::Normal),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let mut lines: Vec<Line> = self
            .stock
            .borrow()
            .iter()
            .map(|s| {
                let flag = if s.forbidden { " (forbidden)" } else { "" };
                Line::raw(format!("{:<12} {:>4}{}", s.name, s.count, flag))
            })
            .collect();
        lines.push(Line::raw(""));
        lines.push(Line::raw(format!("Haul limit: {}", self.haul_limit.get())));
        lines.push(Line::raw("s: stockpile  f: filters  l: haul limit  Esc: quit"));
        let title = if self.window.is_open() { " Stockpile (open) " } else { " Stockpile " };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn should_quit(&self) -> bool {
        self.quit
    }
}

#[tokio::main]
async fn main() -> Result<(), HostError> {
    let options = HostOptions {
        title: Some("Stockpile".into()),
        log_file: Some("stockpile.log".into()),
        ..HostOptions::default()
    };
    let mut colony = Colony::new();
    earshot::run_host(&mut colony, NavConfig::default(), options).await
}
