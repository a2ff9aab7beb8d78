//! Recency list derivation.
//!
//! # Invariants
//! - At most `RECENTS_CAP` entries, unique by exact string equality.
//! - Most recent first; the newest occurrence of a text wins.

use crate::model::item::Item;

pub const RECENTS_CAP: usize = 10;

/// Merges freshly locked glass texts in front of the previous list.
pub fn merge_recents<'a>(
    locked_texts: impl IntoIterator<Item = &'a str>,
    previous: &'a [String],
) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(RECENTS_CAP);
    let candidates = locked_texts
        .into_iter()
        .chain(previous.iter().map(String::as_str));
    for text in candidates {
        if merged.len() == RECENTS_CAP {
            break;
        }
        if !merged.iter().any(|seen| seen == text) {
            merged.push(text.to_string());
        }
    }
    merged
}

/// Recents not yet captured among `items`.
pub fn visible_recents(recents: &[String], items: &[Item]) -> Vec<String> {
    recents
        .iter()
        .filter(|text| !items.iter().any(|item| &item.text == *text))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{merge_recents, visible_recents, RECENTS_CAP};
    use crate::model::item::{Item, ItemId};

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn merge_dedups_most_recent_first() {
        let previous = strings(&["Finish report", "Old task"]);
        let merged = merge_recents(["Call mom", "Call mom", "Finish report"], &previous);
        assert_eq!(merged, strings(&["Call mom", "Finish report", "Old task"]));
    }

    #[test]
    fn merge_caps_length() {
        let previous: Vec<String> = (0..12).map(|i| format!("old {i}")).collect();
        let merged = merge_recents(["new"], &previous);
        assert_eq!(merged.len(), RECENTS_CAP);
        assert_eq!(merged[0], "new");
        assert_eq!(merged[9], "old 8");
    }

    #[test]
    fn merge_borrows_item_texts_and_owned_history() {
        let items = vec![
            Item::new(ItemId::new("a"), "Call mom"),
            Item::new(ItemId::new("b"), "Gym"),
        ];
        let previous = strings(&["Gym", "Taxes"]);
        let merged = merge_recents(items.iter().map(|item| item.text.as_str()), &previous);
        drop(previous);
        assert_eq!(merged, strings(&["Call mom", "Gym", "Taxes"]));
    }

    #[test]
    fn visible_recents_hide_captured_texts() {
        let recents = strings(&["Call mom", "Gym"]);
        let items = vec![Item::new(ItemId::new("a"), "Call mom")];
        assert_eq!(visible_recents(&recents, &items), strings(&["Gym"]));
    }
}
