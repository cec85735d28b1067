use serde::{Deserialize, Serialize};

use super::DeckItem;

/// Discoverable event shown on a card.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub full_description: String,
    pub location_label: String,
    pub date_label: String,
    pub price_label: String,
    pub chips: Vec<String>,
    pub image: Option<String>,
    pub ticket_url: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

impl DeckItem for Event {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.trim().to_owned()
    }

    fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }
}
