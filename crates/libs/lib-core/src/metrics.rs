//! # Derived Vault Metrics
//!
//! Pure functions turning raw (already unit-converted) vault reads into the
//! figures shown on the dashboard. Nothing here fails: missing or degenerate
//! inputs collapse to a sentinel (`0.0`, `None`, [`WindowStatus::Unknown`]).

use chrono::TimeDelta;
use lib_utils::format_distance_strict;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds in one day, used for epoch-duration display.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Lower bound applied to available liquidity before dividing by it.
const MIN_AVAILABLE: f64 = 1e-9;

/// Underlying assets backing one vault share.
///
/// Zero when nothing has been minted yet.
pub fn nav_per_share(total_assets: f64, total_supply: f64) -> f64 {
    if total_supply > 0.0 {
        total_assets / total_supply.max(1.0)
    } else {
        0.0
    }
}

/// Whole epochs needed before the queued shares can be paid out.
///
/// `None` when the vault reports no available liquidity.
pub fn estimated_epochs_to_clear(shares_queued: f64, nav: f64, available: f64) -> Option<u64> {
    if available.is_nan() || available <= 0.0 {
        return None;
    }
    let needed = shares_queued * nav;
    if !needed.is_finite() || needed <= 0.0 {
        return Some(0);
    }
    Some((needed / available.max(MIN_AVAILABLE)).ceil() as u64)
}

/// Underlying needed to satisfy the queued shares at the current NAV.
pub fn estimated_underlying_needed(shares_queued: f64, nav: f64) -> f64 {
    shares_queued * nav
}

/// Premium (positive) or discount (negative) of NAV in USD versus spot, in percent.
pub fn discount(nav_usd: f64, spot: f64) -> f64 {
    if spot != 0.0 {
        (nav_usd - spot) / spot * 100.0
    } else {
        0.0
    }
}

/// Shares received for depositing `amount` underlying at `nav`.
pub fn preview_deposit_shares(amount: f64, nav: f64) -> f64 {
    let nav = if nav == 0.0 { 1.0 } else { nav };
    amount / nav
}

/// Underlying received for redeeming `shares` at `nav`.
pub fn preview_redemption_assets(shares: f64, nav: f64) -> f64 {
    shares * nav
}

/// Epoch a redemption request lands in, when the vault has started.
pub fn next_epoch(current: u64) -> Option<u64> {
    (current > 0).then(|| current + 1)
}

pub fn seconds_to_days(seconds: u64) -> f64 {
    seconds as f64 / SECONDS_PER_DAY
}

/// State of the pre-lock redemption window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStatus {
    /// Epoch start and period are both zero (not loaded, or vault not started).
    Unknown,
    /// Window still open; seconds left until it closes.
    Open { remaining_secs: u64 },
    Closed,
}

impl fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowStatus::Unknown => write!(f, "--"),
            WindowStatus::Open { remaining_secs } => {
                let delta = i64::try_from(*remaining_secs)
                    .ok()
                    .and_then(TimeDelta::try_seconds)
                    .unwrap_or(TimeDelta::MAX);
                write!(f, "{}", format_distance_strict(delta))
            }
            WindowStatus::Closed => write!(f, "Window closed"),
        }
    }
}

/// Time left in the redemption window that opens at `epoch_start`.
///
/// The window is reported closed only once `now` is strictly past its end.
pub fn window_time_remaining(epoch_start: u64, redemption_period: u64, now: u64) -> WindowStatus {
    let end = epoch_start.saturating_add(redemption_period);
    if end == 0 {
        return WindowStatus::Unknown;
    }
    if now > end {
        WindowStatus::Closed
    } else {
        WindowStatus::Open {
            remaining_secs: end - now,
        }
    }
}

/// Whether a claim submitted at `now` still falls inside the window.
pub fn is_within_window(epoch_start: u64, redemption_period: u64, now: u64) -> bool {
    now < epoch_start.saturating_add(redemption_period)
}

/// Spot price, NAV in USD and the resulting premium/discount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSignals {
    pub spot: f64,
    pub nav_usd: f64,
    pub discount: f64,
}

impl MarketSignals {
    pub fn compute(nav: f64, spot: f64) -> Self {
        let nav_usd = nav * spot;
        Self {
            spot,
            nav_usd,
            discount: discount(nav_usd, spot),
        }
    }

    /// NAV trades below the spot price.
    pub fn is_discount(&self) -> bool {
        self.discount < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_per_share() {
        assert_eq!(nav_per_share(200.0, 100.0), 2.0);
        assert_eq!(nav_per_share(200.0, 0.0), 0.0);
        // Sub-unit supply floors at one share
        assert_eq!(nav_per_share(1.0, 0.5), 1.0);
    }

    #[test]
    fn test_estimated_epochs_to_clear() {
        assert_eq!(estimated_epochs_to_clear(100.0, 1.0, 0.0), None);
        assert_eq!(estimated_epochs_to_clear(100.0, 1.0, -5.0), None);
        assert_eq!(estimated_epochs_to_clear(0.0, 2.0, 10.0), Some(0));
        assert_eq!(estimated_epochs_to_clear(100.0, 1.5, 40.0), Some(4));
        assert_eq!(estimated_epochs_to_clear(10.0, 1.0, 10.0), Some(1));
    }

    #[test]
    fn test_market_signals() {
        let nav = nav_per_share(200.0, 100.0);
        let signals = MarketSignals::compute(nav, 1.8);
        assert!((signals.nav_usd - 3.6).abs() < 1e-9);
        assert!((signals.discount - 100.0).abs() < 1e-9);
        assert!(!signals.is_discount());

        let zero = MarketSignals::compute(nav, 0.0);
        assert_eq!(zero.discount, 0.0);

        assert!(MarketSignals::compute(0.9, 1.0).is_discount());
    }

    #[test]
    fn test_window_time_remaining() {
        let open = window_time_remaining(1000, 100, 1050);
        assert_eq!(open, WindowStatus::Open { remaining_secs: 50 });
        assert_eq!(open.to_string(), "50 seconds");

        let closed = window_time_remaining(1000, 100, 1200);
        assert_eq!(closed, WindowStatus::Closed);
        assert_eq!(closed.to_string(), "Window closed");

        assert_eq!(window_time_remaining(0, 0, 1200).to_string(), "--");
        // Exactly at the end the window still reads as open
        assert_eq!(
            window_time_remaining(1000, 100, 1100),
            WindowStatus::Open { remaining_secs: 0 }
        );
    }

    #[test]
    fn test_is_within_window() {
        assert!(is_within_window(1000, 100, 1050));
        assert!(!is_within_window(1000, 100, 1100));
        assert!(!is_within_window(1000, 100, 1200));
    }

    #[test]
    fn test_previews() {
        assert_eq!(preview_deposit_shares(10.0, 2.0), 5.0);
        assert_eq!(preview_deposit_shares(10.0, 0.0), 10.0);
        assert_eq!(preview_redemption_assets(5.0, 2.0), 10.0);
        assert_eq!(preview_redemption_assets(5.0, 0.0), 0.0);
        assert_eq!(estimated_underlying_needed(3.0, 2.0), 6.0);
    }

    #[test]
    fn test_next_epoch_and_days() {
        assert_eq!(next_epoch(0), None);
        assert_eq!(next_epoch(4), Some(5));
        assert_eq!(seconds_to_days(604_800), 7.0);
    }
}
