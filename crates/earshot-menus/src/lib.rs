//! Ready-made navigation states for **earshot**.
//!
//! Every menu here implements [`earshot_core::NavigationState`], so it can be
//! registered with a [`NavigationEngine`](earshot_core::NavigationEngine) at
//! any priority and opened through the returned handle.
//!
//! # Menus
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`list_menu`] | Flat list with typeahead, quantity digits and a header/lines/buttons detail view |
//! | [`tree_menu`] | Expandable indented tree with sibling-aware Home/End |
//! | [`quantity`] | Modal number picker |
//!
//! # Utilities
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`source`] | [`MenuSource`] / [`TreeSource`] data contracts and in-memory sources |
//! | [`key`] | Rebindable key maps and spoken help |

mod common;
pub mod key;
pub mod list_menu;
pub mod quantity;
pub mod source;
pub mod tree_menu;

pub use key::{Binding, KeyCombination, KeyMap, MenuKeyBindings};
pub use list_menu::ListMenu;
pub use quantity::{QuantityKeyBindings, QuantityMenu};
pub use source::{MenuItem, MenuSource, NodeTree, TreeNode, TreeSource, VecSource};
pub use tree_menu::TreeMenu;
