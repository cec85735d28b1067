use super::{DeckInput, InputProvider};

/// Input source that never produces events. Decks driven only by buttons use it.
#[derive(Default, Debug, Clone, Copy)]
pub struct MockInput;

impl MockInput {
    pub const fn new() -> Self {
        Self
    }
}

impl InputProvider for MockInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<DeckInput>, Self::Error> {
        Ok(None)
    }
}
