//! Pricing Rule Matcher
//!
//! Filters rules by court, weekday and clock window, then picks one winner
//! through a fixed precedence list.

use shared::models::PricingRule;
use shared::types::{ClockTime, MINUTES_PER_DAY};

/// Lookup key for one pricing segment
#[derive(Debug, Clone, Copy)]
pub struct RuleQuery<'a> {
    pub court_id: i64,
    pub sport: &'a str,
    /// Day of week of the segment (0=Sunday..6=Saturday)
    pub weekday: u8,
    /// Segment start
    pub clock: ClockTime,
}

/// Check if a rule may price this court (venue-wide rules match every court)
pub fn matches_court(rule: &PricingRule, court_id: i64) -> bool {
    rule.court_id.is_none_or(|id| id == court_id)
}

/// Check if a rule is active on the weekday
pub fn matches_weekday(rule: &PricingRule, weekday: u8) -> bool {
    rule.days_of_week.contains(&weekday)
}

/// Check if the rule's `[start, end)` window contains the clock time
///
/// An end of `00:00` is end of day (24:00). An end before the start wraps
/// past midnight (e.g. 22:00-02:00).
pub fn covers_clock(rule: &PricingRule, clock: ClockTime) -> bool {
    let start = rule.start_time.minutes();
    let end = if rule.end_time.is_midnight() {
        MINUTES_PER_DAY
    } else {
        rule.end_time.minutes()
    };
    let at = clock.minutes();

    if start < end {
        at >= start && at < end
    } else {
        // Overnight
        at >= start || at < end
    }
}

/// Every non-precedence filter a rule must pass
pub fn is_candidate(rule: &PricingRule, query: &RuleQuery<'_>) -> bool {
    rule.is_active
        && matches_court(rule, query.court_id)
        && rule.sport.covers(query.sport)
        && matches_weekday(rule, query.weekday)
        && covers_clock(rule, query.clock)
}

/// One precedence tier: a predicate over the candidate rules
#[derive(Debug, Clone, Copy)]
pub struct RuleTier {
    pub name: &'static str,
    pub sport_specific: bool,
    pub is_default: bool,
}

impl RuleTier {
    pub fn admits(&self, rule: &PricingRule, sport: &str) -> bool {
        let sport_ok = if self.sport_specific {
            rule.sport.names(sport)
        } else {
            rule.sport.is_any()
        };
        sport_ok && rule.is_default == self.is_default
    }
}

/// Rule precedence, first non-empty tier wins
pub const PRECEDENCE: [RuleTier; 4] = [
    RuleTier {
        name: "sport",
        sport_specific: true,
        is_default: false,
    },
    RuleTier {
        name: "any-sport",
        sport_specific: false,
        is_default: false,
    },
    RuleTier {
        name: "sport-default",
        sport_specific: true,
        is_default: true,
    },
    RuleTier {
        name: "any-sport-default",
        sport_specific: false,
        is_default: true,
    },
];

/// Resolve the single rule pricing a segment
///
/// Inside a tier a court-scoped rule beats a venue-wide one, then the most
/// recently created rule wins.
pub fn resolve<'a>(rules: &'a [PricingRule], query: &RuleQuery<'_>) -> Option<&'a PricingRule> {
    let candidates: Vec<&PricingRule> = rules.iter().filter(|r| is_candidate(r, query)).collect();
    if candidates.is_empty() {
        return None;
    }

    PRECEDENCE.iter().find_map(|tier| {
        candidates
            .iter()
            .copied()
            .filter(|r| tier.admits(r, query.sport))
            .max_by_key(|r| (r.court_id.is_some(), r.created_at, r.id))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::SportScope;

    fn make_rule(id: i64, sport: SportScope, is_default: bool, start: &str, end: &str) -> PricingRule {
        PricingRule {
            id,
            venue_id: 1,
            court_id: None,
            sport,
            days_of_week: vec![0, 1, 2, 3, 4, 5, 6],
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            price_single: 100.0,
            price_monthly: 80.0,
            is_active: true,
            is_default,
            description: None,
            created_at: id,
        }
    }

    fn padel() -> SportScope {
        SportScope::Only("Padel".into())
    }

    fn query(clock: &str) -> RuleQuery<'static> {
        RuleQuery {
            court_id: 1,
            sport: "Padel",
            weekday: 2,
            clock: clock.parse().unwrap(),
        }
    }

    #[test]
    fn test_end_of_day_window() {
        let rule = make_rule(1, SportScope::Any, false, "18:00", "00:00");
        assert!(covers_clock(&rule, "23:30".parse().unwrap()));
        assert!(covers_clock(&rule, "18:00".parse().unwrap()));
        assert!(!covers_clock(&rule, "17:59".parse().unwrap()));
        assert!(!covers_clock(&rule, "00:00".parse().unwrap()));
    }

    #[test]
    fn test_overnight_window() {
        let rule = make_rule(1, SportScope::Any, false, "22:00", "02:00");
        assert!(covers_clock(&rule, "23:00".parse().unwrap()));
        assert!(covers_clock(&rule, "01:30".parse().unwrap()));
        assert!(!covers_clock(&rule, "02:00".parse().unwrap()));
        assert!(!covers_clock(&rule, "12:00".parse().unwrap()));
    }

    #[test]
    fn test_specific_sport_beats_any_sport() {
        let rules = vec![
            make_rule(1, SportScope::Any, false, "08:00", "22:00"),
            make_rule(2, padel(), false, "08:00", "22:00"),
        ];
        assert_eq!(resolve(&rules, &query("10:00")).unwrap().id, 2);
    }

    #[test]
    fn test_non_default_any_sport_beats_default_specific_sport() {
        let rules = vec![
            make_rule(1, padel(), true, "00:00", "00:00"),
            make_rule(2, SportScope::Any, false, "08:00", "22:00"),
        ];
        assert_eq!(resolve(&rules, &query("10:00")).unwrap().id, 2);
        // Outside the non-default window the default takes over
        assert_eq!(resolve(&rules, &query("23:00")).unwrap().id, 1);
    }

    #[test]
    fn test_full_precedence_order() {
        let mut rules = vec![
            make_rule(4, SportScope::Any, true, "08:00", "22:00"),
            make_rule(3, padel(), true, "08:00", "22:00"),
            make_rule(2, SportScope::Any, false, "08:00", "22:00"),
            make_rule(1, padel(), false, "08:00", "22:00"),
        ];
        for expected in [1, 2, 3, 4] {
            assert_eq!(resolve(&rules, &query("09:00")).unwrap().id, expected);
            rules.retain(|r| r.id != expected);
        }
        assert!(resolve(&rules, &query("09:00")).is_none());
    }

    #[test]
    fn test_filters_inactive_other_court_other_sport_and_day() {
        let mut inactive = make_rule(1, padel(), false, "08:00", "22:00");
        inactive.is_active = false;
        let mut other_court = make_rule(2, padel(), false, "08:00", "22:00");
        other_court.court_id = Some(9);
        let other_sport = make_rule(3, SportScope::Only("Tennis".into()), false, "08:00", "22:00");
        let mut weekend = make_rule(4, padel(), false, "08:00", "22:00");
        weekend.days_of_week = vec![0, 6];

        let rules = vec![inactive, other_court, other_sport, weekend];
        assert!(resolve(&rules, &query("10:00")).is_none());
    }

    #[test]
    fn test_court_scoped_rule_wins_tie_then_newest() {
        let mut court_rule = make_rule(1, padel(), false, "08:00", "22:00");
        court_rule.court_id = Some(1);
        let newer_venue_rule = make_rule(5, padel(), false, "08:00", "22:00");
        let rules = vec![newer_venue_rule.clone(), court_rule];
        assert_eq!(resolve(&rules, &query("10:00")).unwrap().id, 1);

        let older = make_rule(2, padel(), false, "08:00", "22:00");
        let rules = vec![older, newer_venue_rule];
        assert_eq!(resolve(&rules, &query("10:00")).unwrap().id, 5);
    }
}
