use log::{debug, info, warn};
use swipedeck_core::{
    DeckListener, RequestKind,
    content::Event,
    feed::{Favorites, KeyValueStore, SeenLedger},
};

/// The discover screen's side of the deck: remembers what was shown, saves
/// right-swipes and records which detail pages were opened.
pub struct DiscoverHost<S: KeyValueStore> {
    ids: Vec<String>,
    seen: SeenLedger<S>,
    favorites: Favorites<S>,
    opened: Vec<String>,
    store_failures: usize,
}

impl<S: KeyValueStore> DiscoverHost<S> {
    pub fn new(seen: SeenLedger<S>, favorites: Favorites<S>) -> Self {
        Self {
            ids: Vec::new(),
            seen,
            favorites,
            opened: Vec::new(),
            store_failures: 0,
        }
    }

    /// Mirrors the ids of the list handed to the deck, so callback indices
    /// can be resolved.
    pub fn set_feed(&mut self, feed: &[Event]) {
        self.ids = feed.iter().map(|event| event.id.clone()).collect();
    }

    pub fn seen(&self) -> &SeenLedger<S> {
        &self.seen
    }

    pub fn favorites(&self) -> &Favorites<S> {
        &self.favorites
    }

    pub fn opened(&self) -> &[String] {
        &self.opened
    }

    pub fn store_failures(&self) -> usize {
        self.store_failures
    }

    fn id_at(&self, index: usize) -> Option<String> {
        self.ids.get(index).cloned()
    }

    fn mark_seen(&mut self, id: &str) {
        if let Err(err) = self.seen.mark_seen(id) {
            self.store_failures += 1;
            warn!("discover: could not remember {id} as seen: {err}");
        }
    }
}

impl<S: KeyValueStore> DeckListener for DiscoverHost<S> {
    fn on_swiped_left(&mut self, index: usize) {
        let Some(id) = self.id_at(index) else {
            return;
        };
        info!("discover: passed on {id}");
        self.mark_seen(&id);
    }

    fn on_swiped_right(&mut self, index: usize) {
        let Some(id) = self.id_at(index) else {
            return;
        };
        info!("discover: saved {id}");
        self.mark_seen(&id);
        if let Err(err) = self.favorites.add(&id) {
            self.store_failures += 1;
            warn!("discover: could not save favorite {id}: {err}");
        }
    }

    fn on_swipe_up(&mut self, index: usize) {
        let Some(id) = self.id_at(index) else {
            return;
        };
        info!("discover: open detail for {id}");
        self.opened.push(id);
    }

    fn on_index_change(&mut self, index: usize) {
        debug!("discover: showing card {index}");
    }

    fn on_request_consumed(&mut self, kind: RequestKind) {
        debug!("discover: {} button handled", kind.as_str());
    }

    fn on_exhausted(&mut self) {
        info!("discover: no more events");
    }
}
