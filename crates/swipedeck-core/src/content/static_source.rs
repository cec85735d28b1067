//! Built-in catalog used when no backend is configured.

use core::convert::Infallible;

use super::{Event, ItemSource};

#[derive(Clone, Debug)]
pub struct StaticCatalog {
    events: Vec<Event>,
}

impl StaticCatalog {
    pub fn new(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Three sample events.
    pub fn sample() -> Self {
        Self::new(vec![
            sample_event(
                "1",
                "Food route",
                "A short walk through local flavours: arepas, sweets and craft coffee.",
                "Getsemani, Cartagena",
                "Today 5:00 PM",
                "$25.000 COP",
                &["Food", "Today", "Cartagena"],
            ),
            sample_event(
                "2",
                "Jam in Getsemani",
                "Open improvisation session with local musicians.",
                "Plaza de la Trinidad, Cartagena",
                "Tomorrow 8:00 PM",
                "Free",
                &["Music", "Tomorrow", "Cartagena"],
            ),
            sample_event(
                "3",
                "Streets with history",
                "Walk the oldest streets and hear their legends and architectural secrets.",
                "Historic Centre, Cartagena",
                "Saturday 4:00 PM",
                "$18.000 COP",
                &["Tour", "Saturday", "Cartagena"],
            ),
        ])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }
}

impl ItemSource for StaticCatalog {
    type Item = Event;
    type Error = Infallible;

    fn list(&mut self) -> Result<Vec<Self::Item>, Self::Error> {
        Ok(self.events.clone())
    }
}

fn sample_event(
    id: &str,
    title: &str,
    description: &str,
    location: &str,
    date: &str,
    price: &str,
    chips: &[&str],
) -> Event {
    Event {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        full_description: description.to_owned(),
        location_label: location.to_owned(),
        date_label: date.to_owned(),
        price_label: price.to_owned(),
        chips: chips.iter().map(|chip| (*chip).to_owned()).collect(),
        image: None,
        ticket_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_catalog_lists_three_events() {
        let mut catalog = StaticCatalog::sample();
        let events = catalog.list().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(catalog.get("2").map(|event| event.title.as_str()), Some("Jam in Getsemani"));
        assert!(catalog.get("9").is_none());
    }
}
