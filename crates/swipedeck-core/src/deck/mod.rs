//! Deck controller: current index, undo history and card transitions.
//!
//! Every `tick` runs two halves in a fixed order. The UI half applies
//! completions posted on earlier ticks and consumes at most one external
//! request. The animation half polls pointer input and steps the active
//! card's motion; anything it resolves is posted to the mailbox and only
//! becomes an index transition on a later tick. Posts carry the generation
//! of the card that produced them, so completions from a card that was
//! replaced in the meantime are dropped instead of applied.

use heapless::Deque;
use log::{debug, trace, warn};

use crate::{
    config::{DeckConfig, MAX_HISTORY},
    content::{DeckItem, same_identity},
    gesture::{GestureOutcome, GestureTracker, SwipeDirection},
    input::{DeckInput, InputProvider},
    motion::{CardCommands, CardMotion, MotionCompletion, MotionPhase},
    render::{AnimationKind, CardTransform, DeckScreen},
    signal::{DragReader, drag_signal},
    stack::{StackCompositor, visible_window},
};

mod latch;
mod mailbox;

pub use latch::{RequestError, RequestKind, RequestLatch};
use mailbox::{CardTicket, Deferred, Mailbox};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DeckState {
    Active(usize),
    /// `current_index == items.len()`.
    Exhausted,
}

/// One committed card, newest last.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    pub index: usize,
    pub direction: SwipeDirection,
}

/// Callbacks from the deck to the hosting screen. Called on the UI half of
/// `tick`, never from inside gesture or motion handling.
pub trait DeckListener {
    fn on_swiped_left(&mut self, _index: usize) {}
    fn on_swiped_right(&mut self, _index: usize) {}
    /// Swipe-up or tap on the active card.
    fn on_swipe_up(&mut self, _index: usize) {}
    fn on_index_change(&mut self, _index: usize) {}
    /// A one-shot request was consumed; a new one of the same kind may be issued.
    fn on_request_consumed(&mut self, _kind: RequestKind) {}
    fn on_exhausted(&mut self) {}
}

impl DeckListener for () {}

pub struct SwipeDeck<T, IN, L>
where
    T: DeckItem,
    IN: InputProvider,
    L: DeckListener,
{
    items: Vec<T>,
    input: IN,
    listener: L,
    config: DeckConfig,
    current_index: usize,
    history: Deque<HistoryEntry, MAX_HISTORY>,
    generation: u32,
    frame: u64,
    gesture: GestureTracker,
    motion: CardMotion,
    compositor: StackCompositor,
    mailbox: Mailbox,
    requests: RequestLatch,
    pending_redraw: bool,
    exhausted_reported: bool,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
