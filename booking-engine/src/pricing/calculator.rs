//! Segmented Price Calculator
//!
//! Walks a reservation's `[start, end)` interval in fixed segments, resolves
//! the rule of each segment and groups consecutive segments priced by the
//! same rule into one breakdown line.
//! Uses rust_decimal for the running totals; nothing is rounded until the
//! amounts are handed out as `f64`.

use super::matcher::{RuleQuery, resolve};
use crate::money::{hourly_amount, minutes_to_hours, to_decimal, to_f64};
use crate::utils::EngineResult;
use crate::utils::time::{TimeSpan, weekday_index};
use chrono::{Duration, NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::PricingRule;
use shared::types::ClockTime;

/// What a booking is priced for
#[derive(Debug, Clone, Copy)]
pub struct SegmentRequest<'a> {
    pub court_id: i64,
    pub sport: &'a str,
    pub date: NaiveDate,
    pub start: ClockTime,
    pub end: ClockTime,
    pub is_subscriber: bool,
}

/// Non-fatal pricing condition surfaced to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingWarning {
    /// No rule matched `[from, to)`; that time was priced at zero
    NoApplicableRule { from: ClockTime, to: ClockTime },
    /// Rules could not be loaded; nothing was priced
    RuleSetUnavailable,
}

impl PricingWarning {
    pub fn code(&self) -> ErrorCode {
        match self {
            PricingWarning::NoApplicableRule { .. } => ErrorCode::NoApplicableRule,
            PricingWarning::RuleSetUnavailable => ErrorCode::StaleRuleSet,
        }
    }
}

/// How trustworthy a computed price is
///
/// `Free` means every segment matched a rule and the rules cost nothing;
/// `Unpriced` means no rule priced anything (or rules were unavailable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceStatus {
    Priced,
    PartiallyPriced,
    Free,
    Unpriced,
}

/// One grouped line of the cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    /// Resolved rule, `None` for time no rule covers
    pub rule_id: Option<i64>,
    pub label: String,
    pub from: ClockTime,
    pub to: ClockTime,
    pub hours: f64,
    pub price_per_hour: f64,
    pub subtotal: f64,
}

#[derive(Debug, Clone)]
struct LineAcc {
    rule_id: Option<i64>,
    label: String,
    from: ClockTime,
    to: ClockTime,
    minutes: i64,
    price_per_hour: Decimal,
    subtotal: Decimal,
}

impl LineAcc {
    fn finish(self) -> BreakdownLine {
        BreakdownLine {
            rule_id: self.rule_id,
            label: self.label,
            from: self.from,
            to: self.to,
            hours: to_f64(minutes_to_hours(self.minutes)),
            price_per_hour: to_f64(self.price_per_hour),
            subtotal: to_f64(self.subtotal),
        }
    }
}

/// Result of segmented pricing
#[derive(Debug, Clone)]
pub struct SegmentedPrice {
    /// Unrounded court price
    pub total: Decimal,
    pub duration_minutes: i64,
    pub priced_minutes: i64,
    pub breakdown: Vec<BreakdownLine>,
    pub warnings: Vec<PricingWarning>,
}

impl SegmentedPrice {
    /// Whole interval left unpriced because rules are unavailable
    pub fn unpriced(span: &TimeSpan) -> Self {
        Self {
            total: Decimal::ZERO,
            duration_minutes: span.duration_minutes(),
            priced_minutes: 0,
            breakdown: Vec::new(),
            warnings: vec![PricingWarning::RuleSetUnavailable],
        }
    }

    pub fn duration_hours(&self) -> Decimal {
        minutes_to_hours(self.duration_minutes)
    }

    pub fn status(&self) -> PriceStatus {
        if self.priced_minutes == 0 {
            PriceStatus::Unpriced
        } else if self.priced_minutes < self.duration_minutes {
            PriceStatus::PartiallyPriced
        } else if self.total.is_zero() {
            PriceStatus::Free
        } else {
            PriceStatus::Priced
        }
    }
}

fn clock_of(at: chrono::NaiveDateTime) -> ClockTime {
    ClockTime::from_hm(at.hour() as u16, at.minute() as u16).unwrap_or(ClockTime::MIDNIGHT)
}

/// Price `[start, end)` segment by segment
///
/// Segments after midnight are resolved against the next day's weekday.
/// A trailing segment shorter than `segment_minutes` is priced pro rata.
pub fn price_segments(
    request: &SegmentRequest<'_>,
    rules: &[PricingRule],
    segment_minutes: u32,
) -> EngineResult<SegmentedPrice> {
    let span = TimeSpan::on_date(request.date, request.start, request.end)?;
    let step = Duration::minutes(segment_minutes.max(1) as i64);

    let mut lines: Vec<LineAcc> = Vec::new();
    let mut warnings: Vec<PricingWarning> = Vec::new();
    let mut total = Decimal::ZERO;
    let mut priced_minutes = 0;

    let mut cursor = span.start;
    while cursor < span.end {
        let seg_end = (cursor + step).min(span.end);
        let minutes = (seg_end - cursor).num_minutes();
        let (from, to) = (clock_of(cursor), clock_of(seg_end));

        let query = RuleQuery {
            court_id: request.court_id,
            sport: request.sport,
            weekday: weekday_index(cursor.date()),
            clock: from,
        };
        let rule = resolve(rules, &query);

        let (rule_id, price_per_hour) = match rule {
            Some(r) => (
                Some(r.id),
                to_decimal(r.price_per_hour(request.is_subscriber)),
            ),
            None => (None, Decimal::ZERO),
        };
        let amount = hourly_amount(price_per_hour, minutes);
        total += amount;

        if rule.is_some() {
            priced_minutes += minutes;
        } else {
            tracing::debug!(
                court_id = request.court_id,
                sport = request.sport,
                date = %cursor.date(),
                from = %from,
                "No pricing rule matches segment"
            );
            match warnings.last_mut() {
                Some(PricingWarning::NoApplicableRule { to: last_to, .. }) if *last_to == from => {
                    *last_to = to;
                }
                _ => warnings.push(PricingWarning::NoApplicableRule { from, to }),
            }
        }

        match lines.last_mut() {
            Some(line) if line.rule_id == rule_id && line.price_per_hour == price_per_hour => {
                line.to = to;
                line.minutes += minutes;
                line.subtotal += amount;
            }
            _ => lines.push(LineAcc {
                rule_id,
                label: rule
                    .map(|r| r.label())
                    .unwrap_or_else(|| "No pricing rule".to_string()),
                from,
                to,
                minutes,
                price_per_hour,
                subtotal: amount,
            }),
        }

        cursor = seg_end;
    }

    Ok(SegmentedPrice {
        total,
        duration_minutes: span.duration_minutes(),
        priced_minutes,
        breakdown: lines.into_iter().map(LineAcc::finish).collect(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::EngineError;
    use shared::models::SportScope;

    fn make_rule(id: i64, start: &str, end: &str, single: f64, monthly: f64) -> PricingRule {
        PricingRule {
            id,
            venue_id: 1,
            court_id: None,
            sport: SportScope::Any,
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

    fn make_request(start: &str, end: &str) -> SegmentRequest<'static> {
        SegmentRequest {
            court_id: 1,
            sport: "Padel",
            date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            start: start.parse().unwrap(),
            end: end.parse().unwrap(),
            is_subscriber: false,
        }
    }

    #[test]
    fn test_rule_boundary_splits_breakdown() {
        let rules = vec![
            make_rule(1, "08:00", "18:00", 80.0, 60.0),
            make_rule(2, "18:00", "00:00", 120.0, 90.0),
        ];
        let price = price_segments(&make_request("17:00", "19:00"), &rules, 30).unwrap();
        assert_eq!(price.total, Decimal::from(200));
        assert_eq!(price.breakdown.len(), 2);
        assert_eq!(price.breakdown[0].hours, 1.0);
        assert_eq!(price.breakdown[0].subtotal, 80.0);
        assert_eq!(price.breakdown[1].from.to_string(), "18:00");
        assert_eq!(price.breakdown[1].subtotal, 120.0);
        assert_eq!(price.status(), PriceStatus::Priced);
    }

    #[test]
    fn test_subscriber_variant() {
        let rules = vec![make_rule(1, "08:00", "22:00", 100.0, 70.0)];
        let mut request = make_request("10:00", "11:30");
        request.is_subscriber = true;
        let price = price_segments(&request, &rules, 30).unwrap();
        assert_eq!(price.total, Decimal::from(105));
    }

    #[test]
    fn test_uncovered_time_is_flagged_not_free() {
        let rules = vec![make_rule(1, "08:00", "18:00", 80.0, 60.0)];
        let price = price_segments(&make_request("17:00", "19:00"), &rules, 30).unwrap();
        assert_eq!(price.total, Decimal::from(80));
        assert_eq!(price.status(), PriceStatus::PartiallyPriced);
        assert_eq!(
            price.warnings,
            vec![PricingWarning::NoApplicableRule {
                from: "18:00".parse().unwrap(),
                to: "19:00".parse().unwrap(),
            }]
        );

        let none = price_segments(&make_request("17:00", "19:00"), &[], 30).unwrap();
        assert_eq!(none.status(), PriceStatus::Unpriced);
    }

    #[test]
    fn test_zero_price_rule_is_free() {
        let rules = vec![make_rule(1, "00:00", "00:00", 0.0, 0.0)];
        let price = price_segments(&make_request("09:00", "10:00"), &rules, 30).unwrap();
        assert!(price.total.is_zero());
        assert_eq!(price.status(), PriceStatus::Free);
        assert!(price.warnings.is_empty());
    }

    #[test]
    fn test_booking_until_midnight() {
        let rules = vec![make_rule(1, "18:00", "00:00", 100.0, 80.0)];
        let price = price_segments(&make_request("22:00", "00:00"), &rules, 30).unwrap();
        assert_eq!(price.duration_minutes, 120);
        assert_eq!(price.total, Decimal::from(200));
        assert_eq!(price.breakdown.len(), 1);
    }

    #[test]
    fn test_after_midnight_uses_next_weekday() {
        // 2024-03-05 is a Tuesday; the late rule only exists on Wednesday
        let tuesday_evening = make_rule(1, "18:00", "00:00", 100.0, 100.0);
        let mut wednesday_night = make_rule(2, "00:00", "06:00", 50.0, 50.0);
        wednesday_night.days_of_week = vec![3];
        let rules = vec![tuesday_evening, wednesday_night];

        let price = price_segments(&make_request("23:00", "01:00"), &rules, 30).unwrap();
        assert_eq!(price.total, Decimal::from(150));
        assert_eq!(price.breakdown.len(), 2);
        assert_eq!(price.breakdown[1].rule_id, Some(2));
    }

    #[test]
    fn test_partial_trailing_segment_is_pro_rata() {
        let rules = vec![make_rule(1, "08:00", "22:00", 60.0, 60.0)];
        let price = price_segments(&make_request("10:00", "10:45"), &rules, 30).unwrap();
        assert_eq!(price.total, Decimal::from(45));
    }

    #[test]
    fn test_no_rounding_until_the_end() {
        // 3 x 10 minutes at 33.33/h = 16.665 exactly
        let rules = vec![make_rule(1, "08:00", "22:00", 33.33, 33.33)];
        let price = price_segments(&make_request("10:00", "10:30"), &rules, 10).unwrap();
        assert_eq!(price.total, Decimal::new(16665, 3));
        assert_eq!(price.breakdown[0].subtotal, 16.67);
    }

    #[test]
    fn test_invalid_interval() {
        let err = price_segments(&make_request("10:00", "10:00"), &[], 30);
        assert!(matches!(err, Err(EngineError::InvalidInterval { .. })));
    }
}
