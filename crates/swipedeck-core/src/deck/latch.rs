use thiserror::Error;

/// One-shot commands raised from outside the deck, typically by buttons.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RequestKind {
    SwipeLeft,
    SwipeRight,
    Undo,
}

impl RequestKind {
    /// Consumption order when several are pending.
    pub const ALL: [Self; 3] = [Self::SwipeLeft, Self::SwipeRight, Self::Undo];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SwipeLeft => "swipe-left",
            Self::SwipeRight => "swipe-right",
            Self::Undo => "undo",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::SwipeLeft => 0,
            Self::SwipeRight => 1,
            Self::Undo => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum RequestError {
    #[error("{} request has not been consumed yet", .0.as_str())]
    Pending(RequestKind),
}

/// Edge-triggered flags, at most one pending per kind. A raised flag stays
/// set until the deck consumes it, so a request is never applied twice.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestLatch {
    pending: [bool; 3],
}

impl RequestLatch {
    pub const fn new() -> Self {
        Self {
            pending: [false; 3],
        }
    }

    pub fn request(&mut self, kind: RequestKind) -> Result<(), RequestError> {
        let slot = &mut self.pending[kind.slot()];
        if *slot {
            return Err(RequestError::Pending(kind));
        }
        *slot = true;
        Ok(())
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending[kind.slot()]
    }

    pub fn any_pending(&self) -> bool {
        self.pending.iter().any(|pending| *pending)
    }

    pub fn next(&self) -> Option<RequestKind> {
        RequestKind::ALL
            .into_iter()
            .find(|kind| self.is_pending(*kind))
    }

    /// Clears `kind`; returns whether it was pending.
    pub fn take(&mut self, kind: RequestKind) -> bool {
        core::mem::take(&mut self.pending[kind.slot()])
    }

    pub fn clear(&mut self) {
        self.pending = [false; 3];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_request_of_same_kind_is_rejected_until_taken() {
        let mut latch = RequestLatch::new();
        assert_eq!(latch.request(RequestKind::Undo), Ok(()));
        assert_eq!(
            latch.request(RequestKind::Undo),
            Err(RequestError::Pending(RequestKind::Undo))
        );

        assert!(latch.take(RequestKind::Undo));
        assert!(!latch.take(RequestKind::Undo));
        assert_eq!(latch.request(RequestKind::Undo), Ok(()));
    }

    #[test]
    fn next_follows_priority_order() {
        let mut latch = RequestLatch::new();
        assert_eq!(latch.next(), None);

        latch.request(RequestKind::Undo).unwrap();
        latch.request(RequestKind::SwipeRight).unwrap();
        assert_eq!(latch.next(), Some(RequestKind::SwipeRight));

        latch.take(RequestKind::SwipeRight);
        assert_eq!(latch.next(), Some(RequestKind::Undo));

        latch.clear();
        assert!(!latch.any_pending());
    }

    #[test]
    fn pending_error_names_the_request() {
        let err = RequestError::Pending(RequestKind::SwipeLeft);
        assert_eq!(
            err.to_string(),
            "swipe-left request has not been consumed yet"
        );
    }
}
