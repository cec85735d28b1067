use std::collections::BTreeMap;

use log::debug;

use super::{
    KeyValueStore, StoreError, UserScope,
    store::{load_json, save_json},
    uniq_keep_order,
};

pub const FAVORITES_KEY: &str = "favorites:byUser";
pub const ANON_SLOT: &str = "__anon__";

type FavoriteMap = BTreeMap<String, Vec<String>>;

/// Saved items for every user, persisted as one JSON object keyed by user
/// id (or [`ANON_SLOT`]). Reads and writes go to the current user's slot.
#[derive(Debug)]
pub struct Favorites<S: KeyValueStore> {
    store: S,
    slot: String,
    all: FavoriteMap,
}

impl<S: KeyValueStore> Favorites<S> {
    pub fn load(mut store: S, scope: &UserScope) -> Result<Self, StoreError> {
        let mut all: FavoriteMap = load_json(&mut store, FAVORITES_KEY)?;
        for ids in all.values_mut() {
            *ids = uniq_keep_order(ids.iter());
        }
        Ok(Self {
            store,
            slot: scope.favorites_slot().to_owned(),
            all,
        })
    }

    pub fn switch_user(&mut self, scope: &UserScope) {
        self.slot = scope.favorites_slot().to_owned();
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Newest first.
    pub fn ids(&self) -> &[String] {
        self.all.get(&self.slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        let id = id.trim();
        self.ids().iter().any(|saved| saved == id)
    }

    pub fn add(&mut self, id: &str) -> Result<bool, StoreError> {
        let id = id.trim();
        if id.is_empty() || self.is_favorite(id) {
            return Ok(false);
        }
        self.all
            .entry(self.slot.clone())
            .or_default()
            .insert(0, id.to_owned());
        debug!("favorites: {} saved {}", self.slot, id);
        self.persist()?;
        Ok(true)
    }

    pub fn remove(&mut self, id: &str) -> Result<bool, StoreError> {
        let id = id.trim();
        let Some(ids) = self.all.get_mut(&self.slot) else {
            return Ok(false);
        };
        let before = ids.len();
        ids.retain(|saved| saved != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Empties the current user's list only.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.all.insert(self.slot.clone(), Vec::new());
        self.persist()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        save_json(&mut self.store, FAVORITES_KEY, &self.all)
    }
}
