//! Rental Item Model

use serde::{Deserialize, Serialize};

/// Physical good rentable alongside a court booking (rackets, ball machine, ...)
///
/// Availability is derived per time window, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalItem {
    pub id: i64,
    pub venue_id: i64,
    pub name: String,
    /// Flat price per booking, not per hour
    pub price_per_booking: f64,
    pub total_stock: u32,
}

/// Quantity of one item rented by a reservation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RentedItem {
    pub item_id: i64,
    pub quantity: u32,
}

/// Rented items attached to a reservation
///
/// `NoItems` is an explicit "nothing rented" marker and must not be confused
/// with `NotComputed` (selection not evaluated yet).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", content = "items", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalSelection {
    #[default]
    NotComputed,
    NoItems,
    Items(Vec<RentedItem>),
}

impl RentalSelection {
    /// Build from a list, dropping zero quantities
    pub fn from_items(items: impl IntoIterator<Item = RentedItem>) -> Self {
        let items: Vec<RentedItem> = items.into_iter().filter(|i| i.quantity > 0).collect();
        if items.is_empty() {
            Self::NoItems
        } else {
            Self::Items(items)
        }
    }

    /// Rented items, empty unless `Items`
    pub fn items(&self) -> &[RentedItem] {
        match self {
            Self::Items(items) => items,
            _ => &[],
        }
    }

    /// Quantity reserved for an item
    pub fn quantity_of(&self, item_id: i64) -> u32 {
        self.items()
            .iter()
            .filter(|i| i.item_id == item_id)
            .map(|i| i.quantity)
            .sum()
    }

    pub fn is_computed(&self) -> bool {
        !matches!(self, Self::NotComputed)
    }
}
