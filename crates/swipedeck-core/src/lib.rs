//! Swipeable card-stack engine.
//!
//! The deck presents an ordered item list one card at a time, turns pan
//! gestures into commit/cancel decisions, animates the active card and the
//! cards behind it, and keeps the current index, undo history and animation
//! completions consistent under overlapping gesture and button input.

pub mod config;
pub mod content;
pub mod deck;
pub mod feed;
pub mod gesture;
pub mod input;
pub mod motion;
pub mod prefs;
pub mod render;
pub mod signal;
pub mod stack;

pub use config::DeckConfig;
pub use deck::{DeckListener, DeckState, RequestKind, SwipeDeck, TickResult};
pub use gesture::{GestureOutcome, SwipeDirection};
pub use motion::CardCommands;
