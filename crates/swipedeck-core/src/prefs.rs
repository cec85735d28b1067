//! Notification preferences shared between screens.
//!
//! One owned store, handed to whoever needs it; screens subscribe to be
//! told when a value changes instead of reading a global.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::feed::{KeyValueStore, StoreError};

pub const PREFS_KEY: &str = "notification_prefs_v1";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPrefs {
    pub reminders_enabled: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            reminders_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&NotificationPrefs) + Send>;

#[derive(Default)]
pub struct PrefsStore {
    prefs: NotificationPrefs,
    next_id: u64,
    listeners: Vec<(Subscription, Listener)>,
}

impl PrefsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefs(prefs: NotificationPrefs) -> Self {
        Self {
            prefs,
            ..Self::default()
        }
    }

    /// Reads persisted prefs; missing or undecodable data gives the defaults.
    pub fn load<S: KeyValueStore>(store: &mut S) -> Result<Self, StoreError> {
        let prefs = crate::feed::load_json(store, PREFS_KEY)?;
        Ok(Self::with_prefs(prefs))
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) -> Result<(), StoreError> {
        crate::feed::save_json(store, PREFS_KEY, &self.prefs)
    }

    pub fn prefs(&self) -> NotificationPrefs {
        self.prefs
    }

    pub fn reminders_enabled(&self) -> bool {
        self.prefs.reminders_enabled
    }

    /// Notifies every subscriber when the value actually changes.
    pub fn set_reminders_enabled(&mut self, enabled: bool) -> bool {
        if self.prefs.reminders_enabled == enabled {
            return false;
        }
        self.prefs.reminders_enabled = enabled;
        debug!(
            "prefs: reminders {}, notifying {} subscribers",
            if enabled { "on" } else { "off" },
            self.listeners.len()
        );
        let prefs = self.prefs;
        for (_, listener) in &mut self.listeners {
            listener(&prefs);
        }
        true
    }

    pub fn subscribe<F>(&mut self, listener: F) -> Subscription
    where
        F: FnMut(&NotificationPrefs) + Send + 'static,
    {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for PrefsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefsStore")
            .field("prefs", &self.prefs)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}
