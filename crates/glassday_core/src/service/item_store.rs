//! Ordered in-memory item collection.
//!
//! # Responsibility
//! - Own the canonical item sequence of the current session.
//! - Apply add/classify/reorder/action/handled mutations.
//!
//! # Invariants
//! - Every mutation publishes a fresh snapshot; earlier snapshots never
//!   change underneath their holders.
//! - Unknown ids are no-ops, never errors.
//! - Rubber relative order is preserved by every operation.

use crate::model::item::{IdGenerator, Item, ItemId, ItemType};
use crate::service::layout::Layout;
use std::collections::HashSet;
use std::sync::Arc;

pub struct ItemStore {
    items: Arc<[Item]>,
    ids: Box<dyn IdGenerator>,
    layout: Box<dyn Layout>,
}

impl ItemStore {
    pub fn new(ids: Box<dyn IdGenerator>, layout: Box<dyn Layout>) -> Self {
        Self {
            items: Arc::from(Vec::new()),
            ids,
            layout,
        }
    }

    /// Current item sequence, shared without copying.
    pub fn snapshot(&self) -> Arc<[Item]> {
        Arc::clone(&self.items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Glass items in priority order.
    pub fn glass(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_glass())
    }

    /// Rubber items in storage order.
    pub fn rubber(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| !item.is_glass())
    }

    pub fn glass_count(&self) -> usize {
        self.glass().count()
    }

    /// Captures a new rubber item at the end of the sequence.
    ///
    /// Returns `None` without touching the sequence when `text` is blank.
    pub fn add_item(&mut self, text: &str) -> Option<ItemId> {
        if text.trim().is_empty() {
            return None;
        }

        let mut item = Item::new(self.ids.next_id(), text);
        item.pos = Some(self.layout.place(&self.items));
        let id = item.id.clone();

        let mut next = self.items.to_vec();
        next.push(item);
        self.publish(next);
        Some(id)
    }

    /// Sets the classification of one item.
    pub fn set_type(&mut self, id: &ItemId, kind: ItemType) -> bool {
        self.update(id, |item| item.kind = kind)
    }

    /// Flips glass/rubber for one item.
    pub fn toggle_type(&mut self, id: &ItemId) -> bool {
        self.update(id, |item| item.kind = item.kind.toggled())
    }

    /// Sets the free-text action. Empty strings are stored as given.
    pub fn set_action(&mut self, id: &ItemId, text: &str) -> bool {
        self.update(id, |item| item.action = Some(text.to_string()))
    }

    pub fn toggle_handled(&mut self, id: &ItemId) -> bool {
        self.update(id, |item| item.handled = !item.handled)
    }

    /// Replaces glass priority with `new_glass_order`.
    ///
    /// Storage becomes `[glass..., rubber...]`. Input that is not a
    /// permutation of the current glass ids is ignored.
    pub fn reorder(&mut self, new_glass_order: &[ItemId]) -> bool {
        let current: HashSet<&ItemId> = self.glass().map(|item| &item.id).collect();
        let requested: HashSet<&ItemId> = new_glass_order.iter().collect();
        if requested.len() != new_glass_order.len() || requested != current {
            return false;
        }

        let mut next: Vec<Item> = new_glass_order
            .iter()
            .filter_map(|id| self.get(id).cloned())
            .collect();
        next.extend(self.rubber().cloned());
        self.publish(next);
        true
    }

    /// Replaces the whole sequence, e.g. when resuming a locked day.
    pub fn restore(&mut self, items: Vec<Item>) {
        self.publish(items);
    }

    pub fn clear(&mut self) {
        self.publish(Vec::new());
    }

    fn update(&mut self, id: &ItemId, apply: impl FnOnce(&mut Item)) -> bool {
        let Some(index) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        let mut next = self.items.to_vec();
        apply(&mut next[index]);
        self.publish(next);
        true
    }

    fn publish(&mut self, items: Vec<Item>) {
        self.items = Arc::from(items);
    }
}

#[cfg(test)]
mod tests {
    use super::ItemStore;
    use crate::model::item::{ItemId, ItemType, SequentialIdGenerator};
    use crate::service::layout::RandomLayout;

    fn store() -> ItemStore {
        ItemStore::new(
            Box::new(SequentialIdGenerator::new()),
            Box::new(RandomLayout::seeded(1)),
        )
    }

    #[test]
    fn blank_text_is_ignored() {
        let mut store = store();
        assert!(store.add_item("").is_none());
        assert!(store.add_item("   ").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn add_appends_rubber_item_with_placement() {
        let mut store = store();
        let id = store.add_item("Buy milk").expect("item should be added");
        assert_eq!(store.len(), 1);
        let item = store.get(&id).expect("added item should exist");
        assert_eq!(item.kind, ItemType::Rubber);
        assert!(item.pos.is_some());
    }

    #[test]
    fn snapshots_are_not_mutated_by_later_operations() {
        let mut store = store();
        let id = store.add_item("A").unwrap();
        let before = store.snapshot();
        store.toggle_type(&id);
        assert_eq!(before[0].kind, ItemType::Rubber);
        assert_eq!(store.items()[0].kind, ItemType::Glass);
    }

    #[test]
    fn unknown_id_is_a_noop() {
        let mut store = store();
        store.add_item("A").unwrap();
        let before = store.snapshot();
        assert!(!store.toggle_handled(&ItemId::new("missing")));
        assert!(!store.set_action(&ItemId::new("missing"), "x"));
        assert_eq!(&*before, store.items());
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut store = store();
        let a = store.add_item("A").unwrap();
        let b = store.add_item("B").unwrap();
        store.set_type(&a, ItemType::Glass);
        store.set_type(&b, ItemType::Glass);

        assert!(!store.reorder(&[a.clone()]));
        assert!(!store.reorder(&[a.clone(), a.clone()]));
        assert!(!store.reorder(&[a.clone(), ItemId::new("ghost")]));
        assert!(store.reorder(&[b.clone(), a.clone()]));
        let order: Vec<_> = store.glass().map(|item| item.id.clone()).collect();
        assert_eq!(order, vec![b, a]);
    }
}
