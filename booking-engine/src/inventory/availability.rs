//! Rental item availability and selection checks

use crate::money::to_decimal;
use crate::utils::time::TimeSpan;
use crate::utils::{EngineError, EngineResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{Occurrence, RentalItem, RentalSelection, RentedItem, ReservationStatus};
use shared::types::ClockTime;
use std::collections::BTreeMap;

/// Remaining count per item id
pub type StockMap = BTreeMap<i64, u32>;

/// Interval whose stock is being checked
#[derive(Debug, Clone, Copy)]
pub struct StockQuery {
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Series being edited; its own holdings do not count against it
    pub exclude_series_id: Option<i64>,
}

/// Whether an occurrence holds stock during `target`
fn holds_stock(occurrence: &Occurrence, target: &TimeSpan, exclude: Option<i64>) -> bool {
    if occurrence.status != ReservationStatus::Confirmed {
        return false;
    }
    if exclude == Some(occurrence.master_id) {
        return false;
    }
    if occurrence.rented_items.items().is_empty() {
        return false;
    }
    TimeSpan::on_date(occurrence.date, occurrence.start_time, occurrence.end_time)
        .is_ok_and(|span| span.overlaps(target))
}

/// Remaining stock of every item for the queried interval
///
/// `occurrences` should cover the target date and the day before, so a
/// booking running past midnight into the target date is counted.
/// Remaining counts saturate at zero.
pub fn available_stock(
    items: &[RentalItem],
    occurrences: &[Occurrence],
    query: &StockQuery,
) -> EngineResult<StockMap> {
    let target = TimeSpan::on_date(query.date, query.start, query.end)?;

    let mut remaining: StockMap = items.iter().map(|i| (i.id, i.total_stock)).collect();

    for occurrence in occurrences
        .iter()
        .filter(|o| holds_stock(o, &target, query.exclude_series_id))
    {
        for rented in occurrence.rented_items.items() {
            if let Some(left) = remaining.get_mut(&rented.item_id) {
                *left = left.saturating_sub(rented.quantity);
            }
        }
    }

    Ok(remaining)
}

/// Validate a requested item selection against availability
///
/// Rejects the whole selection on the first item that exceeds its remaining
/// stock or is not in the catalog. Zero quantities are dropped and repeated
/// items are summed.
pub fn validate_selection(
    availability: &StockMap,
    requested: &[RentedItem],
) -> EngineResult<RentalSelection> {
    let mut totals: BTreeMap<i64, u32> = BTreeMap::new();
    for item in requested.iter().filter(|i| i.quantity > 0) {
        *totals.entry(item.item_id).or_default() += item.quantity;
    }

    for (&item_id, &quantity) in &totals {
        let available = *availability
            .get(&item_id)
            .ok_or(EngineError::UnknownItem(item_id))?;
        if quantity > available {
            tracing::warn!(
                item_id,
                requested = quantity,
                available,
                "Rental selection rejected, not enough stock"
            );
            return Err(EngineError::StockExceeded {
                item_id,
                requested: quantity,
                available,
            });
        }
    }

    Ok(RentalSelection::from_items(
        totals
            .into_iter()
            .map(|(item_id, quantity)| RentedItem { item_id, quantity }),
    ))
}

/// Flat cost of the rented items (price per booking times quantity)
pub fn rental_cost(items: &[RentalItem], selection: &[RentedItem]) -> EngineResult<Decimal> {
    selection.iter().try_fold(Decimal::ZERO, |acc, rented| {
        let item = items
            .iter()
            .find(|i| i.id == rented.item_id)
            .ok_or(EngineError::UnknownItem(rented.item_id))?;
        Ok(acc + to_decimal(item.price_per_booking) * Decimal::from(rented.quantity))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::ReservationKind;

    fn make_item(id: i64, stock: u32) -> RentalItem {
        RentalItem {
            id,
            venue_id: 1,
            name: format!("item-{}", id),
            price_per_booking: 10.0,
            total_stock: stock,
        }
    }

    fn make_occurrence(master_id: i64, date: &str, start: &str, end: &str, quantity: u32) -> Occurrence {
        Occurrence {
            master_id,
            is_virtual: false,
            venue_id: 1,
            court_id: master_id,
            date: date.parse().unwrap(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            status: ReservationStatus::Confirmed,
            kind: ReservationKind::Ordinary,
            customer_id: None,
            customer_name: None,
            sport: "Padel".into(),
            total_price: 0.0,
            payment_status: None,
            credit_used: 0.0,
            rented_items: RentalSelection::from_items(vec![RentedItem { item_id: 1, quantity }]),
        }
    }

    fn make_query(start: &str, end: &str) -> StockQuery {
        StockQuery {
            date: "2024-03-05".parse().unwrap(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            exclude_series_id: None,
        }
    }

    #[test]
    fn test_overlapping_bookings_exhaust_stock() {
        let items = vec![make_item(1, 3)];
        let occurrences = vec![
            make_occurrence(1, "2024-03-05", "18:00", "19:00", 1),
            make_occurrence(2, "2024-03-05", "18:30", "19:30", 1),
            make_occurrence(3, "2024-03-05", "17:00", "18:30", 1),
        ];
        let stock = available_stock(&items, &occurrences, &make_query("18:00", "19:00")).unwrap();
        assert_eq!(stock[&1], 0);

        let request = vec![RentedItem { item_id: 1, quantity: 1 }];
        assert!(matches!(
            validate_selection(&stock, &request),
            Err(EngineError::StockExceeded { available: 0, .. })
        ));
    }

    #[test]
    fn test_adjacent_and_cancelled_bookings_do_not_count() {
        let items = vec![make_item(1, 2)];
        let mut cancelled = make_occurrence(2, "2024-03-05", "18:00", "19:00", 2);
        cancelled.status = ReservationStatus::Cancelled;
        let mut pending = make_occurrence(3, "2024-03-05", "18:00", "19:00", 2);
        pending.status = ReservationStatus::Pending;
        let occurrences = vec![
            make_occurrence(1, "2024-03-05", "17:00", "18:00", 2),
            cancelled,
            pending,
        ];
        let stock = available_stock(&items, &occurrences, &make_query("18:00", "19:00")).unwrap();
        assert_eq!(stock[&1], 2);
    }

    #[test]
    fn test_edited_series_excluded() {
        let items = vec![make_item(1, 2)];
        let occurrences = vec![make_occurrence(5, "2024-03-05", "18:00", "19:00", 2)];
        let mut query = make_query("18:00", "19:00");
        query.exclude_series_id = Some(5);
        let stock = available_stock(&items, &occurrences, &query).unwrap();
        assert_eq!(stock[&1], 2);
    }

    #[test]
    fn test_previous_night_booking_counts_after_midnight() {
        let items = vec![make_item(1, 2)];
        let occurrences = vec![make_occurrence(1, "2024-03-04", "23:00", "01:00", 1)];
        let stock = available_stock(&items, &occurrences, &make_query("00:00", "02:00")).unwrap();
        assert_eq!(stock[&1], 1);

        // Ends exactly at midnight: no overlap with the next day
        let occurrences = vec![make_occurrence(1, "2024-03-04", "22:00", "00:00", 1)];
        let stock = available_stock(&items, &occurrences, &make_query("00:00", "02:00")).unwrap();
        assert_eq!(stock[&1], 2);
    }

    #[test]
    fn test_stock_never_negative() {
        let items = vec![make_item(1, 1)];
        let occurrences = vec![make_occurrence(1, "2024-03-05", "18:00", "19:00", 3)];
        let stock = available_stock(&items, &occurrences, &make_query("18:00", "19:00")).unwrap();
        assert_eq!(stock[&1], 0);
    }

    #[test]
    fn test_validate_selection_sums_and_drops_zero() {
        let stock: StockMap = [(1, 3), (2, 1)].into_iter().collect();
        let request = vec![
            RentedItem { item_id: 1, quantity: 1 },
            RentedItem { item_id: 1, quantity: 2 },
            RentedItem { item_id: 2, quantity: 0 },
        ];
        let selection = validate_selection(&stock, &request).unwrap();
        assert_eq!(selection.items(), &[RentedItem { item_id: 1, quantity: 3 }]);

        let none = validate_selection(&stock, &[]).unwrap();
        assert_eq!(none, RentalSelection::NoItems);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let stock: StockMap = [(1, 3)].into_iter().collect();
        let request = vec![RentedItem { item_id: 8, quantity: 1 }];
        assert!(matches!(
            validate_selection(&stock, &request),
            Err(EngineError::UnknownItem(8))
        ));
    }

    #[test]
    fn test_rental_cost() {
        let items = vec![make_item(1, 3), make_item(2, 3)];
        let selection = vec![
            RentedItem { item_id: 1, quantity: 2 },
            RentedItem { item_id: 2, quantity: 1 },
        ];
        assert_eq!(rental_cost(&items, &selection).unwrap(), Decimal::from(30));
    }
}
