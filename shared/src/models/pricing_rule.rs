//! Pricing Rule Model

use crate::types::ClockTime;
use serde::{Deserialize, Serialize};

/// Sport a pricing rule applies to
///
/// `Any` is the "any sport" sentinel: the rule matches every sport but loses
/// precedence to a rule naming the sport explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "name", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SportScope {
    Any,
    Only(String),
}

impl SportScope {
    pub fn is_any(&self) -> bool {
        matches!(self, SportScope::Any)
    }

    /// True only for an explicit scope naming this sport
    pub fn names(&self, sport: &str) -> bool {
        match self {
            SportScope::Any => false,
            SportScope::Only(name) => name == sport,
        }
    }

    /// True when a rule with this scope may price the given sport
    pub fn covers(&self, sport: &str) -> bool {
        self.is_any() || self.names(sport)
    }
}

/// Pricing rule entity
///
/// Time window is half-open `[start_time, end_time)`; an `end_time` of
/// `00:00` means end of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: i64,
    pub venue_id: i64,
    /// Court this rule is scoped to, venue-wide when absent
    pub court_id: Option<i64>,
    pub sport: SportScope,
    /// Active days of week (0=Sunday..6=Saturday)
    pub days_of_week: Vec<u8>,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    /// Price per hour for walk-in customers
    pub price_single: f64,
    /// Price per hour for monthly subscribers
    pub price_monthly: f64,
    pub is_active: bool,
    /// Fallback rule, used only when no non-default rule matches
    pub is_default: bool,
    pub description: Option<String>,
    pub created_at: i64,
}

impl PricingRule {
    /// Hourly price for the customer kind
    pub fn price_per_hour(&self, is_subscriber: bool) -> f64 {
        if is_subscriber {
            self.price_monthly
        } else {
            self.price_single
        }
    }

    /// Human-readable label for cost breakdowns
    pub fn label(&self) -> String {
        if let Some(desc) = self.description.as_deref()
            && !desc.trim().is_empty()
        {
            return desc.to_string();
        }
        let sport = match &self.sport {
            SportScope::Any => "Any sport",
            SportScope::Only(name) => name.as_str(),
        };
        let suffix = if self.is_default { " (default)" } else { "" };
        format!("{} {}-{}{}", sport, self.start_time, self.end_time, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rule(sport: SportScope, description: Option<&str>) -> PricingRule {
        PricingRule {
            id: 1,
            venue_id: 1,
            court_id: None,
            sport,
            days_of_week: vec![1, 2, 3],
            start_time: "18:00".parse().unwrap(),
            end_time: "00:00".parse().unwrap(),
            price_single: 120.0,
            price_monthly: 90.0,
            is_active: true,
            is_default: false,
            description: description.map(String::from),
            created_at: 0,
        }
    }

    #[test]
    fn test_sport_scope_matching() {
        let any = SportScope::Any;
        let padel = SportScope::Only("Padel".into());
        assert!(any.covers("Padel"));
        assert!(!any.names("Padel"));
        assert!(padel.names("Padel"));
        assert!(!padel.covers("Beach Tennis"));
    }

    #[test]
    fn test_price_variant() {
        let rule = make_rule(SportScope::Any, None);
        assert_eq!(rule.price_per_hour(false), 120.0);
        assert_eq!(rule.price_per_hour(true), 90.0);
    }

    #[test]
    fn test_label_falls_back_to_window() {
        let rule = make_rule(SportScope::Only("Padel".into()), None);
        assert_eq!(rule.label(), "Padel 18:00-00:00");
        let rule = make_rule(SportScope::Any, Some("Peak hours"));
        assert_eq!(rule.label(), "Peak hours");
    }

    #[test]
    fn test_sport_scope_serde() {
        let json = serde_json::to_value(SportScope::Only("Padel".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "ONLY", "name": "Padel"}));
        let any: SportScope = serde_json::from_value(serde_json::json!({"kind": "ANY"})).unwrap();
        assert_eq!(any, SportScope::Any);
    }
}
