//! Cart and bag line items.
//!
//! Both the cart and the bag keep the same ordered list of lines, so the list
//! itself lives here as a small reducer and the two containers only differ in
//! what they do around it.

use baiyit_core::{Price, ProductId};
use serde::{Deserialize, Serialize};

use super::Product;

/// One line in a cart or bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    /// Expected to be at least 1; not enforced.
    pub quantity: u32,
}

impl LineItem {
    /// Build a line for `quantity` units of a product at its selling price.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            price: product.selling_price(),
            image: product.image.clone(),
            quantity,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

impl From<&Product> for LineItem {
    fn from(product: &Product) -> Self {
        Self::from_product(product, 1)
    }
}

/// Ordered line items keyed by product id.
///
/// Lines keep the position of their first insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineItems(Vec<LineItem>);

impl LineItems {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a line, merging into an existing line with the same id.
    pub fn add(&mut self, item: LineItem) {
        match self.0.iter_mut().find(|line| line.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.0.push(item),
        }
    }

    /// Remove the line with this id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ProductId) -> bool {
        let before = self.0.len();
        self.0.retain(|line| &line.id != id);
        self.0.len() != before
    }

    /// Replace a line's quantity in place. Unknown ids are ignored.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> bool {
        self.0
            .iter_mut()
            .find(|line| &line.id == id)
            .map(|line| line.quantity = quantity)
            .is_some()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.0.iter().map(LineItem::subtotal).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.0
            .iter()
            .fold(0_u32, |count, line| count.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.0.iter().find(|line| &line.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[LineItem] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LineItem>> for LineItems {
    fn from(items: Vec<LineItem>) -> Self {
        let mut lines = Self::new();
        for item in items {
            lines.add(item);
        }
        lines
    }
}

impl<'a> IntoIterator for &'a LineItems {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::test_support::line;

    fn ids(items: &LineItems) -> Vec<&str> {
        items.iter().map(|line| line.id.as_str()).collect()
    }

    #[test]
    fn test_adding_same_id_merges_quantities() {
        let mut items = LineItems::new();
        items.add(line("p1", 1_000, 1));
        items.add(line("p1", 1_000, 2));

        assert_eq!(items.len(), 1);
        assert_eq!(items.get(&ProductId::new("p1")).unwrap().quantity, 3);
        assert_eq!(items.total(), Price::from_cents(3_000));
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let mut items = LineItems::new();
        items.add(line("a", 100, 1));
        items.add(line("b", 200, 1));
        items.add(line("a", 100, 4));

        assert_eq!(ids(&items), ["a", "b"]);
        assert_eq!(items.item_count(), 6);
    }

    #[test]
    fn test_remove_leaves_other_lines_untouched() {
        let mut items = LineItems::new();
        items.add(line("a", 100, 1));
        items.add(line("b", 200, 2));
        items.add(line("c", 300, 3));

        assert!(items.remove(&ProductId::new("b")));
        assert_eq!(ids(&items), ["a", "c"]);
        assert_eq!(items.get(&ProductId::new("a")).unwrap().quantity, 1);
        assert_eq!(items.get(&ProductId::new("c")).unwrap().quantity, 3);

        assert!(!items.remove(&ProductId::new("missing")));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_update_quantity_replaces_in_place() {
        let mut items = LineItems::new();
        items.add(line("a", 100, 1));
        items.add(line("b", 200, 1));

        assert!(items.update_quantity(&ProductId::new("a"), 5));
        assert_eq!(ids(&items), ["a", "b"]);
        assert_eq!(items.get(&ProductId::new("a")).unwrap().quantity, 5);

        assert!(!items.update_quantity(&ProductId::new("zzz"), 9));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_total_tracks_any_sequence_of_mutations() {
        let mut items = LineItems::new();
        let steps: [(&str, i64, u32); 5] = [
            ("a", 1_999, 1),
            ("b", 50, 3),
            ("a", 1_999, 2),
            ("c", 12_345, 1),
            ("b", 50, 1),
        ];
        for (id, cents, qty) in steps {
            items.add(line(id, cents, qty));
        }
        items.update_quantity(&ProductId::new("c"), 2);
        items.remove(&ProductId::new("b"));

        let expected: Price = items
            .iter()
            .map(|line| line.price.times(line.quantity))
            .sum();
        assert_eq!(items.total(), expected);
        assert_eq!(items.total(), Price::from_cents(1_999 * 3 + 12_345 * 2));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut items = LineItems::new();
        items.add(line("p1", 1_000, 1));
        let json = serde_json::to_value(&items).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "p1");
        assert_eq!(json[0]["price"], 10.0);

        let back: LineItems = serde_json::from_value(json).unwrap();
        assert_eq!(back, items);
    }
}
