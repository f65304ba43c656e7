#![allow(dead_code)]

use booking_engine::{BookingService, EngineConfig, MemoryStore};
use chrono::NaiveDate;
use shared::models::{
    Court, CourtStatus, Customer, DurationDiscount, OperatingHours, PaymentStatus, PricingRule,
    RentalItem, RentalSelection, RentedItem, Reservation, ReservationDraft, ReservationKind,
    ReservationStatus, SportScope,
};
use std::sync::Arc;

pub const VENUE: i64 = 1;
pub const COURT: i64 = 1;
pub const BALL_MACHINE: i64 = 10;
pub const WALK_IN: i64 = 1;
pub const SUBSCRIBER: i64 = 2;

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub fn make_rule(id: i64, sport: SportScope, start: &str, end: &str, single: f64, monthly: f64) -> PricingRule {
    PricingRule {
        id,
        venue_id: VENUE,
        court_id: None,
        sport,
        days_of_week: vec![0, 1, 2, 3, 4, 5, 6],
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        price_single: single,
        price_monthly: monthly,
        is_active: true,
        is_default: false,
        description: None,
        created_at: id,
    }
}

pub fn make_customer(id: i64, monthly_fee: f64, balance: f64) -> Customer {
    Customer {
        id,
        venue_id: VENUE,
        name: format!("Customer {}", id),
        phone: None,
        monthly_fee,
        credit_balance: balance,
    }
}

/// Venue with off-peak 80/h until 18:00, peak 120/h until midnight,
/// 2h/10% and 4h/20% discounts and three ball machines
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    store.add_court(Court {
        id: COURT,
        venue_id: VENUE,
        name: "Quadra Central".into(),
        sport: "Padel".into(),
        status: CourtStatus::Active,
        hours: OperatingHours::every_day("06:00-02:00"),
        booking_interval_minutes: Some(60),
        created_at: 0,
    });
    store.add_rule(make_rule(1, SportScope::Any, "06:00", "18:00", 80.0, 60.0));
    store.add_rule(make_rule(2, SportScope::Any, "18:00", "00:00", 120.0, 90.0));
    let mut fallback = make_rule(3, SportScope::Any, "00:00", "00:00", 50.0, 40.0);
    fallback.is_default = true;
    store.add_rule(fallback);
    store.add_discount(DurationDiscount {
        id: 1,
        venue_id: VENUE,
        duration_hours: 2.0,
        percentage: 10.0,
        is_active: true,
    });
    store.add_discount(DurationDiscount {
        id: 2,
        venue_id: VENUE,
        duration_hours: 4.0,
        percentage: 20.0,
        is_active: true,
    });
    store.add_item(RentalItem {
        id: BALL_MACHINE,
        venue_id: VENUE,
        name: "Ball machine".into(),
        price_per_booking: 25.0,
        total_stock: 3,
    });
    store.add_customer(make_customer(WALK_IN, 0.0, 0.0));
    store.add_customer(make_customer(SUBSCRIBER, 150.0, 0.0));
    Arc::new(store)
}

pub fn service(store: &Arc<MemoryStore>) -> BookingService<MemoryStore> {
    BookingService::new(store.clone(), EngineConfig::default())
}

pub fn draft(day: &str, start: &str, end: &str) -> ReservationDraft {
    ReservationDraft {
        id: None,
        venue_id: VENUE,
        court_id: COURT,
        customer_id: Some(WALK_IN),
        customer_name: None,
        customer_phone: None,
        sport: "Padel".into(),
        date: date(day),
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        status: ReservationStatus::Confirmed,
        kind: ReservationKind::Ordinary,
        recurrence: None,
        use_credit: true,
        rented_items: Vec::new(),
        notes: None,
    }
}

pub fn with_ball_machines(mut draft: ReservationDraft, quantity: u32) -> ReservationDraft {
    draft.rented_items = vec![RentedItem {
        item_id: BALL_MACHINE,
        quantity,
    }];
    draft
}

/// Stored one-off reservation, bypassing the service
pub fn make_reservation(id: i64, customer_id: i64, credit_used: f64) -> Reservation {
    Reservation {
        id,
        venue_id: VENUE,
        court_id: COURT,
        customer_id: Some(customer_id),
        customer_name: None,
        customer_phone: None,
        sport: "Padel".into(),
        date: date("2024-03-05"),
        start_time: "10:00".parse().unwrap(),
        end_time: "11:00".parse().unwrap(),
        status: ReservationStatus::Confirmed,
        kind: ReservationKind::Ordinary,
        recurrence: None,
        total_price: 80.0 - credit_used,
        payment_status: Some(PaymentStatus::Pending),
        credit_used,
        rented_items: RentalSelection::NoItems,
        notes: None,
        created_at: 0,
    }
}
