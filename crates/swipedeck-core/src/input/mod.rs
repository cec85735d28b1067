//! Input abstraction layer.

mod mock;
mod queue;

pub use mock::MockInput;
pub use queue::QueuedInput;

use crate::gesture::PanSample;

/// Pointer events for the active card surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeckInput {
    PanBegin,
    PanMove(PanSample),
    PanEnd(PanSample),
    /// The system took the pointer stream away mid-gesture.
    PanCancel,
    Tap,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<DeckInput>, Self::Error>;
}
