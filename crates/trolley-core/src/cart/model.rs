//! Cart domain models.

use serde::{Deserialize, Serialize};

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Opaque product identifier, unique within the cart.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Reference to the product image.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
    /// Number of units. At least one while the entry is in the cart;
    /// entries never linger at zero.
    pub quantity: u32,
}

/// Descriptor for a product being added to the cart.
///
/// Quantity is owned by the cart, so the descriptor carries none: a product
/// added for the first time always starts at one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCartItem {
    /// Opaque product identifier.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Reference to the product image.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl NewCartItem {
    fn into_item(self, quantity: u32) -> CartItem {
        CartItem {
            id: self.id,
            title: self.title,
            image_url: self.image_url,
            price: self.price,
            quantity,
        }
    }
}

/// An ordered list of cart entries.
///
/// Mutations are functional: each operation returns a new list and leaves
/// the receiver untouched, so published snapshots are always consistent.
/// Serializes transparently as a bare JSON array of entries (no wrapper
/// object, no version field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cart from an existing list of entries.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Returns the entries in order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Gets an entry by product id.
    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns the number of distinct product lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the cart holds no entries.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds a product to the cart.
    ///
    /// If an entry with the same id already exists, its quantity is bumped
    /// by one and no duplicate entry is created. Otherwise the product is
    /// appended at the end with quantity one.
    pub fn add(&self, product: NewCartItem) -> Cart {
        let mut items = self.items.clone();

        match items.iter().position(|item| item.id == product.id) {
            Some(index) => items[index].quantity += 1,
            None => items.push(product.into_item(1)),
        }

        Cart { items }
    }

    /// Increments the quantity of the entry matching `id` by one.
    ///
    /// An absent id leaves the list unchanged.
    pub fn increment(&self, id: &str) -> Cart {
        let items = self
            .items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.id == id {
                    item.quantity += 1;
                }
                item
            })
            .collect();

        Cart { items }
    }

    /// Decrements the quantity of the entry matching `id` by one.
    ///
    /// An entry at quantity one is removed from the list entirely, so
    /// quantities never reach zero. An absent id leaves the list unchanged.
    pub fn decrement(&self, id: &str) -> Cart {
        let items = self
            .items
            .iter()
            .filter_map(|item| {
                if item.id != id {
                    return Some(item.clone());
                }
                if item.quantity > 1 {
                    let mut updated = item.clone();
                    updated.quantity -= 1;
                    Some(updated)
                } else {
                    None
                }
            })
            .collect();

        Cart { items }
    }

    /// Returns the sum of unit price times quantity over all entries.
    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    /// Returns the total number of units across all entries.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}
