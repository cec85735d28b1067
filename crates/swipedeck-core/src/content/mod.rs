//! Items presented by the deck and the sources they come from.

mod event;
mod static_source;

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

pub use event::Event;
pub use static_source::StaticCatalog;

/// Anything the deck can present. Only the identifier is interpreted.
pub trait DeckItem {
    type Id: Clone + Eq + Hash + Debug;

    /// Stable, unique identifier. Used to key rendered cards.
    fn id(&self) -> Self::Id;

    /// `false` for items whose identifier is missing or blank.
    fn has_identity(&self) -> bool {
        true
    }
}

/// Key a renderer uses for an item's card.
pub type ItemKey<T> = <T as DeckItem>::Id;

/// Ordered list of items from a backend, a cache or a fixture.
pub trait ItemSource {
    type Item: DeckItem;
    type Error;

    fn list(&mut self) -> Result<Vec<Self::Item>, Self::Error>;
}

/// Drops items without identity and later duplicates, keeping first-seen order.
pub fn dedupe_by_id<T: DeckItem>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| item.has_identity() && seen.insert(item.id()))
        .collect()
}

/// `true` when both lists carry the same identifiers in the same order.
pub fn same_identity<T: DeckItem>(left: &[T], right: &[T]) -> bool {
    left.len() == right.len() && left.iter().zip(right).all(|(a, b)| a.id() == b.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupe_keeps_first_occurrence_and_drops_blank_ids() {
        let items = vec![
            Event::new("1", "Food walk"),
            Event::new("  ", "Nameless"),
            Event::new("2", "Jam"),
            Event::new("1", "Food walk again"),
        ];

        let kept = dedupe_by_id(items);
        let titles: Vec<_> = kept.iter().map(|event| event.title.as_str()).collect();
        assert_eq!(titles, vec!["Food walk", "Jam"]);
    }

    #[test]
    fn identity_compares_ids_not_content() {
        let a = vec![Event::new("1", "A"), Event::new("2", "B")];
        let renamed = vec![Event::new("1", "A*"), Event::new("2", "B*")];
        let reordered = vec![Event::new("2", "B"), Event::new("1", "A")];

        assert!(same_identity(&a, &renamed));
        assert!(!same_identity(&a, &reordered));
        assert!(!same_identity(&a, &a[..1]));
    }
}
