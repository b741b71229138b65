//! Loan-to-value, health factor, and trust tier arithmetic.
//!
//! Everything here is a pure function over plain numbers. The figures are
//! illustrative: there is no price feed and no real liquidation engine behind
//! them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base loan-to-value ratio, in percent, before any tier bonus.
pub const BASE_LTV: f64 = 75.0;

/// Safety margin applied to debt when computing the health factor.
pub const LIQUIDATION_MARGIN: f64 = 1.25;

/// Width of one trust-score band.
pub const TIER_BAND: u32 = 250;

/// Reputation tier derived from the trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    /// Map a trust score onto its tier.
    ///
    /// Bands are 250 points wide. Everything below 500 is Bronze, then
    /// Silver, Gold from 750, Platinum from 1000.
    pub fn from_score(score: u32) -> Self {
        match score / TIER_BAND {
            0 | 1 => Tier::Bronze,
            2 => Tier::Silver,
            3 => Tier::Gold,
            _ => Tier::Platinum,
        }
    }

    /// Extra LTV granted by the tier, in percentage points.
    pub fn ltv_bonus(self) -> f64 {
        match self {
            Tier::Bronze => 0.0,
            Tier::Silver => 5.0,
            Tier::Gold => 7.5,
            Tier::Platinum => 10.0,
        }
    }

    pub fn next(self) -> Option<Tier> {
        match self {
            Tier::Bronze => Some(Tier::Silver),
            Tier::Silver => Some(Tier::Gold),
            Tier::Gold => Some(Tier::Platinum),
            Tier::Platinum => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Bronze => "BRONZE",
            Tier::Silver => "SILVER",
            Tier::Gold => "GOLD",
            Tier::Platinum => "PLATINUM",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Health factor of a position. Zero debt has no meaningful ratio, so it is
/// carried as [`HealthFactor::Unbounded`] instead of a float infinity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HealthFactor {
    Finite(f64),
    Unbounded,
}

impl HealthFactor {
    pub fn is_unbounded(self) -> bool {
        matches!(self, HealthFactor::Unbounded)
    }

    pub fn value(self) -> Option<f64> {
        match self {
            HealthFactor::Finite(v) => Some(v),
            HealthFactor::Unbounded => None,
        }
    }

    /// Below 1.0 the position is at risk of liquidation.
    pub fn is_at_risk(self) -> bool {
        matches!(self, HealthFactor::Finite(v) if v < 1.0)
    }
}

impl fmt::Display for HealthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthFactor::Finite(v) => write!(f, "{:.2}", v),
            HealthFactor::Unbounded => f.write_str("∞"),
        }
    }
}

/// Coarse risk classification of a loan-to-value percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Safe,
    Caution,
    Danger,
}

impl RiskBand {
    pub fn from_ltv(ltv: f64) -> Self {
        if ltv < 60.0 {
            RiskBand::Safe
        } else if ltv < BASE_LTV {
            RiskBand::Caution
        } else {
            RiskBand::Danger
        }
    }
}

/// LTV available to a borrower of the given tier, in percent.
pub fn effective_ltv(base_ltv: f64, tier: Tier) -> f64 {
    base_ltv + tier.ltv_bonus()
}

/// Borrowed value as a percentage of collateral value.
pub fn current_ltv(borrow_amount: f64, collateral_value: f64) -> f64 {
    if collateral_value <= 0.0 {
        return 0.0;
    }
    borrow_amount / collateral_value * 100.0
}

/// Largest borrow allowed against `collateral_value` at `ltv` percent.
pub fn max_borrow(collateral_value: f64, ltv: f64) -> f64 {
    collateral_value * (ltv / 100.0)
}

/// Rough per-unit collateral price at which the borrow would be liquidated.
///
/// Proportional estimate only: it scales the borrow by the liquidation
/// margin and spreads it over the collateral units.
pub fn liquidation_price(borrow_amount: f64, collateral_units: f64) -> f64 {
    if borrow_amount <= 0.0 || collateral_units <= 0.0 {
        return 0.0;
    }
    borrow_amount * LIQUIDATION_MARGIN / collateral_units
}

pub fn health_factor(total_collateral: f64, total_debt: f64) -> HealthFactor {
    if total_debt <= 0.0 {
        return HealthFactor::Unbounded;
    }
    HealthFactor::Finite(total_collateral / (total_debt * LIQUIDATION_MARGIN))
}

/// Percent progress through the current tier band.
pub fn tier_progress(score: u32) -> f64 {
    f64::from(score % TIER_BAND) / f64::from(TIER_BAND) * 100.0
}

/// Fill level for the tier gauge: band progress, full once `tier` has no
/// successor.
pub fn tier_gauge_percent(score: u32, tier: Tier) -> f64 {
    match tier.next() {
        Some(_) => tier_progress(score),
        None => 100.0,
    }
}

/// Points needed to reach the next band boundary.
pub fn points_to_next_tier(score: u32) -> u32 {
    TIER_BAND - score % TIER_BAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_bands() {
        assert_eq!(Tier::from_score(0), Tier::Bronze);
        assert_eq!(Tier::from_score(499), Tier::Bronze);
        assert_eq!(Tier::from_score(500), Tier::Silver);
        assert_eq!(Tier::from_score(749), Tier::Silver);
        assert_eq!(Tier::from_score(750), Tier::Gold);
        assert_eq!(Tier::from_score(999), Tier::Gold);
        assert_eq!(Tier::from_score(1000), Tier::Platinum);
        assert_eq!(Tier::from_score(u32::MAX), Tier::Platinum);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let mut prev = Tier::from_score(0);
        for score in (0..2000).step_by(10) {
            let tier = Tier::from_score(score);
            assert!(tier >= prev, "tier dropped at score {}", score);
            prev = tier;
        }
    }

    #[test]
    fn test_effective_ltv() {
        assert_eq!(effective_ltv(BASE_LTV, Tier::Bronze), 75.0);
        assert_eq!(effective_ltv(BASE_LTV, Tier::Silver), 80.0);
        assert_eq!(effective_ltv(BASE_LTV, Tier::Gold), 82.5);
        assert_eq!(effective_ltv(BASE_LTV, Tier::Platinum), 85.0);
    }

    #[test]
    fn test_current_ltv() {
        assert_eq!(current_ltv(15_000.0, 30_000.0), 50.0);
        assert_eq!(current_ltv(0.0, 30_000.0), 0.0);
        assert_eq!(current_ltv(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_max_borrow_with_gold_bonus() {
        let base = max_borrow(30_000.0, BASE_LTV);
        let boosted = max_borrow(30_000.0, effective_ltv(BASE_LTV, Tier::Gold));
        assert_eq!(base, 22_500.0);
        assert!((boosted - 24_750.0).abs() < 1e-6);
        assert!((boosted - base - 2_250.0).abs() < 1e-6);
    }

    #[test]
    fn test_liquidation_price() {
        assert_eq!(liquidation_price(10_000.0, 10.0), 1_250.0);
        assert_eq!(liquidation_price(0.0, 10.0), 0.0);
        assert_eq!(liquidation_price(10_000.0, 0.0), 0.0);
    }

    #[test]
    fn test_health_factor() {
        assert_eq!(health_factor(30_000.0, 0.0), HealthFactor::Unbounded);
        assert_eq!(health_factor(0.0, 0.0), HealthFactor::Unbounded);
        assert_eq!(health_factor(30_000.0, 5_000.0), HealthFactor::Finite(4.8));
        assert_eq!(health_factor(0.0, 5_000.0), HealthFactor::Finite(0.0));
        assert!(health_factor(1_000.0, 1_000.0).is_at_risk());
        assert!(!HealthFactor::Unbounded.is_at_risk());
    }

    #[test]
    fn test_health_factor_display() {
        assert_eq!(HealthFactor::Unbounded.to_string(), "∞");
        assert_eq!(HealthFactor::Finite(4.8).to_string(), "4.80");
    }

    #[test]
    fn test_risk_band() {
        assert_eq!(RiskBand::from_ltv(10.0), RiskBand::Safe);
        assert_eq!(RiskBand::from_ltv(60.0), RiskBand::Caution);
        assert_eq!(RiskBand::from_ltv(75.0), RiskBand::Danger);
    }

    #[test]
    fn test_tier_progress() {
        assert_eq!(tier_progress(750), 0.0);
        assert_eq!(points_to_next_tier(750), 250);
        assert_eq!(tier_progress(875), 50.0);
        assert_eq!(points_to_next_tier(875), 125);
    }

    #[test]
    fn test_top_tier_gauge_is_full() {
        assert_eq!(tier_gauge_percent(875, Tier::Gold), 50.0);
        assert_eq!(tier_gauge_percent(1000, Tier::Platinum), 100.0);
        assert_eq!(tier_gauge_percent(1130, Tier::from_score(1130)), 100.0);
    }
}
