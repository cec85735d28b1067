use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use swipedeck_core::content::{Event, ItemSource};

/// Events read from a JSON array on disk.
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ItemSource for JsonCatalog {
    type Item = Event;
    type Error = anyhow::Error;

    fn list(&mut self) -> Result<Vec<Event>> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading events from {}", self.path.display()))?;
        parse_events(&raw).with_context(|| format!("parsing {}", self.path.display()))
    }
}

fn parse_events(raw: &str) -> Result<Vec<Event>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_events_with_missing_fields() {
        let events = parse_events(
            r#"[
                {"id": "9", "title": "Salsa night", "locationLabel": "Plaza", "ticketUrl": "https://t.example/9"},
                {"id": "10"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].location_label, "Plaza");
        assert_eq!(events[0].ticket_url.as_deref(), Some("https://t.example/9"));
        assert!(events[1].title.is_empty());
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = JsonCatalog::new("/nonexistent/events.json").list().unwrap_err();
        assert!(err.to_string().contains("/nonexistent/events.json"));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(parse_events(r#"{"id": "1"}"#).is_err());
    }
}
