//! Decision services
//!
//! The engine façade and the two collaborators it composes per decision:
//! the watcher gate that scopes calls in or out, and the selector that
//! rolls the dice and picks an assault.

pub mod assault_selector;
pub mod chaos_engine;
pub mod watcher_gate;

pub use assault_selector::AssaultSelector;
pub use chaos_engine::ChaosEngine;
pub use watcher_gate::{WatchVerdict, WatcherGate};
