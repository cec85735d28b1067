//! Per-user state the discover screen keeps around the deck: which items
//! were already shown, which were saved, and the list handed to the deck.

mod favorites;
mod seen;
mod store;

use std::collections::HashSet;

pub use favorites::{ANON_SLOT, FAVORITES_KEY, Favorites};
pub use seen::{MAX_SEEN, SEEN_KEY_PREFIX, SeenLedger};
pub use store::{KeyValueStore, MemoryStore, StoreError};
pub(crate) use store::{load_json, save_json};

use crate::content::{DeckItem, dedupe_by_id};

/// Identity persisted state is keyed by.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum UserScope {
    #[default]
    Guest,
    User(String),
}

impl UserScope {
    /// A blank or missing id is a guest.
    pub fn from_id(id: Option<&str>) -> Self {
        match id.map(str::trim) {
            Some(id) if !id.is_empty() && id != "guest" => Self::User(id.to_owned()),
            _ => Self::Guest,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Guest => None,
            Self::User(id) => Some(id),
        }
    }

    pub fn seen_key(&self) -> String {
        format!("{SEEN_KEY_PREFIX}_{}", self.user_id().unwrap_or("guest"))
    }

    pub fn favorites_slot(&self) -> &str {
        self.user_id().unwrap_or(ANON_SLOT)
    }
}

/// Trims ids, drops blanks and repeats, keeps first-seen order.
pub fn uniq_keep_order<I, S>(ids: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        let id = id.as_ref().trim();
        if id.is_empty() || !seen.insert(id.to_owned()) {
            continue;
        }
        out.push(id.to_owned());
    }
    out
}

/// The list the deck gets: items with an id, once each, minus those already
/// seen unless `show_seen` is set.
pub fn prepare_feed<T, F>(items: Vec<T>, show_seen: bool, is_seen: F) -> Vec<T>
where
    T: DeckItem,
    F: Fn(&T::Id) -> bool,
{
    let items = dedupe_by_id(items);
    if show_seen {
        return items;
    }
    items
        .into_iter()
        .filter(|item| !is_seen(&item.id()))
        .collect()
}
