use std::collections::HashSet;

use log::debug;

use super::{
    KeyValueStore, StoreError, UserScope,
    store::{load_json, remove_key, save_json},
    uniq_keep_order,
};

pub const SEEN_KEY_PREFIX: &str = "seen_events_v1";
pub const MAX_SEEN: usize = 2_000;

/// Ids already shown to one user, oldest first, bounded to the newest
/// `limit` entries. Every change is written through to the store.
#[derive(Debug)]
pub struct SeenLedger<S: KeyValueStore> {
    store: S,
    key: String,
    limit: usize,
    ids: Vec<String>,
    lookup: HashSet<String>,
}

impl<S: KeyValueStore> SeenLedger<S> {
    pub fn load(store: S, scope: &UserScope) -> Result<Self, StoreError> {
        Self::load_with_limit(store, scope, MAX_SEEN)
    }

    pub fn load_with_limit(
        store: S,
        scope: &UserScope,
        limit: usize,
    ) -> Result<Self, StoreError> {
        let mut ledger = Self {
            store,
            key: scope.seen_key(),
            limit: limit.max(1),
            ids: Vec::new(),
            lookup: HashSet::new(),
        };
        ledger.reload()?;
        Ok(ledger)
    }

    /// Points the ledger at another user's bucket and loads it.
    pub fn switch_user(&mut self, scope: &UserScope) -> Result<(), StoreError> {
        let key = scope.seen_key();
        if key == self.key {
            return Ok(());
        }
        self.key = key;
        self.reload()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_seen(&self, id: &str) -> bool {
        self.lookup.contains(id.trim())
    }

    /// Returns `false` for blank or already-seen ids, which are not written.
    pub fn mark_seen(&mut self, id: &str) -> Result<bool, StoreError> {
        let id = id.trim();
        if id.is_empty() || self.lookup.contains(id) {
            return Ok(false);
        }

        self.ids.push(id.to_owned());
        if self.ids.len() > self.limit {
            let overflow = self.ids.len() - self.limit;
            self.ids.drain(..overflow);
            self.rebuild_lookup();
        } else {
            self.lookup.insert(id.to_owned());
        }

        save_json(&mut self.store, &self.key, &self.ids)?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.ids.clear();
        self.lookup.clear();
        remove_key(&mut self.store, &self.key)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn reload(&mut self) -> Result<(), StoreError> {
        let raw: Vec<serde_json::Value> = load_json(&mut self.store, &self.key)?;
        let mut ids = uniq_keep_order(raw.iter().filter_map(id_text));
        if ids.len() > self.limit {
            ids.drain(..ids.len() - self.limit);
        }
        self.ids = ids;
        self.rebuild_lookup();
        debug!("seen: loaded {} ids from {}", self.ids.len(), self.key);
        Ok(())
    }

    fn rebuild_lookup(&mut self) {
        self.lookup = self.ids.iter().cloned().collect();
    }
}

/// Stored ids are strings, but numbers written by older builds still count.
fn id_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::MemoryStore;

    fn guest() -> UserScope {
        UserScope::Guest
    }

    #[test]
    fn mark_seen_persists_and_ignores_repeats() {
        let mut ledger = SeenLedger::load(MemoryStore::new(), &guest()).unwrap();
        assert!(ledger.mark_seen("1").unwrap());
        assert!(!ledger.mark_seen(" 1 ").unwrap());
        assert!(!ledger.mark_seen("").unwrap());
        assert!(ledger.mark_seen("2").unwrap());

        let store = ledger.into_store();
        let reloaded = SeenLedger::load(store, &guest()).unwrap();
        assert_eq!(reloaded.ids(), &["1", "2"]);
        assert!(reloaded.is_seen("2"));
    }

    #[test]
    fn ledger_keeps_newest_entries() {
        let mut ledger = SeenLedger::load_with_limit(MemoryStore::new(), &guest(), 3).unwrap();
        for id in ["a", "b", "c", "d"] {
            ledger.mark_seen(id).unwrap();
        }
        assert_eq!(ledger.ids(), &["b", "c", "d"]);
        assert!(!ledger.is_seen("a"));
        assert!(ledger.mark_seen("a").unwrap());
    }

    #[test]
    fn tolerant_load_of_odd_payloads() {
        let mut store = MemoryStore::new();
        store
            .set("seen_events_v1_guest", r#"["x", " x", 7, null, "", "y"]"#)
            .unwrap();
        store.set("seen_events_v1_u1", r#"{"not":"a list"}"#).unwrap();

        let mut ledger = SeenLedger::load(store, &guest()).unwrap();
        assert_eq!(ledger.ids(), &["x", "7", "y"]);

        ledger.switch_user(&UserScope::User("u1".into())).unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.key(), "seen_events_v1_u1");
    }

    #[test]
    fn users_do_not_share_buckets() {
        let mut ledger = SeenLedger::load(MemoryStore::new(), &guest()).unwrap();
        ledger.mark_seen("1").unwrap();

        ledger.switch_user(&UserScope::User("u1".into())).unwrap();
        assert!(!ledger.is_seen("1"));

        ledger.switch_user(&guest()).unwrap();
        assert!(ledger.is_seen("1"));

        ledger.clear().unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.store().is_empty());
    }
}
