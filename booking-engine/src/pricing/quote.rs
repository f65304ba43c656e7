//! Reservation quote
//!
//! [`compute_pricing`] runs the whole pricing pipeline for the current state
//! of a booking form: segmented court price, duration discount, rented
//! items, then credit. Callers rerun it on every input change.

use super::calculator::{
    BreakdownLine, PriceStatus, PricingWarning, SegmentRequest, SegmentedPrice, price_segments,
};
use super::credit::{CreditRequest, apply_credit};
use super::discount::apply_discount;
use super::PricingCatalog;
use crate::inventory::rental_cost;
use crate::money::{to_decimal, to_f64};
use crate::utils::EngineResult;
use crate::utils::time::TimeSpan;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{Customer, RentalItem, RentedItem};
use shared::types::ClockTime;

/// Everything the pricing pipeline reads
#[derive(Debug, Clone, Copy)]
pub struct PricingInput<'a> {
    pub court_id: i64,
    pub sport: &'a str,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    /// Registered customer, `None` for walk-ins
    pub customer: Option<&'a Customer>,
    /// `None` when rules and discounts could not be fetched
    pub catalog: Option<&'a PricingCatalog>,
    pub rental_items: &'a [RentalItem],
    pub selection: &'a [RentedItem],
    pub use_credit: bool,
    /// Credit consumed by earlier saves of the reservation being edited
    pub already_applied: f64,
    pub segment_minutes: u32,
}

/// Computed price of a reservation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingResult {
    pub duration_hours: f64,
    /// Court price before discount
    pub subtotal: f64,
    pub discount_id: Option<i64>,
    pub discount_percentage: f64,
    pub discount_amount: f64,
    pub price_after_discount: f64,
    pub rental_cost: f64,
    pub credit_newly_applied: f64,
    pub credit_total_applied: f64,
    pub credit_to_release: f64,
    pub final_payable: f64,
    pub breakdown: Vec<BreakdownLine>,
    pub status: PriceStatus,
    pub warnings: Vec<PricingWarning>,
}

impl PricingResult {
    /// Zero total caused by missing rules, not by a free rule
    pub fn is_unpriced(&self) -> bool {
        self.status == PriceStatus::Unpriced
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the pricing pipeline
///
/// Fails only on an invalid interval or a selection naming an unknown item.
pub fn compute_pricing(input: &PricingInput<'_>) -> EngineResult<PricingResult> {
    let is_subscriber = input.customer.is_some_and(Customer::is_subscriber);
    let request = SegmentRequest {
        court_id: input.court_id,
        sport: input.sport,
        date: input.date,
        start: input.start,
        end: input.end,
        is_subscriber,
    };

    let segmented = match input.catalog {
        Some(catalog) => price_segments(&request, &catalog.rules, input.segment_minutes)?,
        None => {
            tracing::warn!(
                court_id = input.court_id,
                date = %input.date,
                "Pricing rules unavailable, reservation left unpriced"
            );
            SegmentedPrice::unpriced(&TimeSpan::on_date(input.date, input.start, input.end)?)
        }
    };

    let duration_hours = segmented.duration_hours();
    let discount = match input.catalog {
        Some(catalog) => apply_discount(segmented.total, duration_hours, &catalog.discounts),
        None => Default::default(),
    };
    let price_after_discount = segmented.total - discount.amount;
    let rentals = rental_cost(input.rental_items, input.selection)?;

    let credit = apply_credit(&CreditRequest {
        price_after_discount,
        rental_cost: rentals,
        customer_balance: to_decimal(input.customer.map_or(0.0, |c| c.credit_balance)),
        already_applied: to_decimal(input.already_applied),
        use_credit: input.use_credit && input.customer.is_some(),
    });

    let status = segmented.status();
    if status != PriceStatus::Priced {
        tracing::info!(
            court_id = input.court_id,
            date = %input.date,
            start = %input.start,
            end = %input.end,
            status = ?status,
            "Reservation not fully priced"
        );
    }

    Ok(PricingResult {
        duration_hours: to_f64(duration_hours),
        subtotal: to_f64(segmented.total),
        discount_id: discount.discount_id,
        discount_percentage: to_f64(discount.percentage),
        discount_amount: to_f64(discount.amount),
        price_after_discount: to_f64(price_after_discount),
        rental_cost: to_f64(rentals),
        credit_newly_applied: to_f64(credit.newly_applied),
        credit_total_applied: to_f64(credit.total_applied),
        credit_to_release: to_f64(credit.to_release),
        final_payable: to_f64(credit.final_payable),
        breakdown: segmented.breakdown,
        status,
        warnings: segmented.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EngineError;
    use shared::models::{DurationDiscount, PricingRule, SportScope};

    fn make_rule(id: i64, start: &str, end: &str, single: f64) -> PricingRule {
        PricingRule {
            id,
            venue_id: 1,
            court_id: None,
            sport: SportScope::Any,
            days_of_week: vec![0, 1, 2, 3, 4, 5, 6],
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            price_single: single,
            price_monthly: single / 2.0,
            is_active: true,
            is_default: false,
            description: None,
            created_at: id,
        }
    }

    fn make_catalog() -> PricingCatalog {
        PricingCatalog {
            rules: vec![make_rule(1, "08:00", "00:00", 100.0)],
            discounts: vec![DurationDiscount {
                id: 1,
                venue_id: 1,
                duration_hours: 2.0,
                percentage: 10.0,
                is_active: true,
            }],
        }
    }

    fn make_customer(monthly_fee: f64, balance: f64) -> Customer {
        Customer {
            id: 1,
            venue_id: 1,
            name: "Bia".into(),
            phone: None,
            monthly_fee,
            credit_balance: balance,
        }
    }

    fn make_input<'a>(catalog: Option<&'a PricingCatalog>, customer: Option<&'a Customer>) -> PricingInput<'a> {
        PricingInput {
            court_id: 1,
            sport: "Padel",
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start: "18:00".parse().unwrap(),
            end: "20:00".parse().unwrap(),
            customer,
            catalog,
            rental_items: &[],
            selection: &[],
            use_credit: true,
            already_applied: 0.0,
            segment_minutes: 30,
        }
    }

    #[test]
    fn test_full_pipeline() {
        let catalog = make_catalog();
        let items = vec![RentalItem {
            id: 7,
            venue_id: 1,
            name: "Racket".into(),
            price_per_booking: 15.0,
            total_stock: 4,
        }];
        let selection = vec![RentedItem { item_id: 7, quantity: 2 }];
        let customer = make_customer(0.0, 50.0);

        let mut input = make_input(Some(&catalog), Some(&customer));
        input.rental_items = &items;
        input.selection = &selection;

        let result = compute_pricing(&input).unwrap();
        assert_eq!(result.subtotal, 200.0);
        assert_eq!(result.discount_amount, 20.0);
        assert_eq!(result.rental_cost, 30.0);
        assert_eq!(result.credit_newly_applied, 50.0);
        assert_eq!(result.final_payable, 160.0);
        assert_eq!(result.status, PriceStatus::Priced);
    }

    #[test]
    fn test_subscriber_pays_monthly_price() {
        let catalog = make_catalog();
        let customer = make_customer(150.0, 0.0);
        let result = compute_pricing(&make_input(Some(&catalog), Some(&customer))).unwrap();
        assert_eq!(result.subtotal, 100.0);
    }

    #[test]
    fn test_walk_in_never_uses_credit() {
        let catalog = make_catalog();
        let result = compute_pricing(&make_input(Some(&catalog), None)).unwrap();
        assert_eq!(result.credit_newly_applied, 0.0);
        assert_eq!(result.final_payable, 180.0);
    }

    #[test]
    fn test_missing_catalog_is_unpriced_not_free() {
        let result = compute_pricing(&make_input(None, None)).unwrap();
        assert!(result.is_unpriced());
        assert_eq!(result.warnings, vec![PricingWarning::RuleSetUnavailable]);
        assert_eq!(result.duration_hours, 2.0);
    }

    #[test]
    fn test_unknown_rented_item() {
        let catalog = make_catalog();
        let selection = vec![RentedItem { item_id: 99, quantity: 1 }];
        let mut input = make_input(Some(&catalog), None);
        input.selection = &selection;
        assert!(matches!(compute_pricing(&input), Err(EngineError::UnknownItem(99))));
    }
}
