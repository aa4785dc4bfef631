//! # Metric Cards
//!
//! Pure rendering of [`DashboardState`] into titled card groups and plain text.
//! Nothing here touches the network; missing values render as `--`.

use crate::app::state::{DashboardState, Query};
use lib_utils::format::{format_optional, format_usd, PLACEHOLDER};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardVariant {
    #[default]
    Default,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub value: String,
    pub description: Option<&'static str>,
    pub disclaimer: Option<&'static str>,
    /// First load still in flight
    pub loading: bool,
    /// Last refresh failed; `value` is the previous result
    pub stale: bool,
    pub variant: CardVariant,
}

impl MetricCard {
    fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            description: None,
            disclaimer: None,
            loading: false,
            stale: false,
            variant: CardVariant::Default,
        }
    }

    fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    fn disclaimer(mut self, disclaimer: &'static str) -> Self {
        self.disclaimer = Some(disclaimer);
        self
    }

    fn status<T>(mut self, query: &Query<T>) -> Self {
        self.loading = query.is_initial_load();
        self.stale = query.error.is_some() && query.data.is_some();
        self
    }

    fn warning_if(mut self, warning: bool) -> Self {
        if warning {
            self.variant = CardVariant::Warning;
        }
        self
    }

    /// Value as shown: `...` while loading, `--` when empty.
    pub fn display_value(&self) -> &str {
        if self.loading {
            "..."
        } else if self.value.is_empty() {
            PLACEHOLDER
        } else {
            &self.value
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardGroup {
    pub title: &'static str,
    pub cards: Vec<MetricCard>,
}

pub fn wallet_overview(state: &DashboardState) -> CardGroup {
    let query = &state.user_balances;
    let balances = query.data.as_ref();
    let symbol = state.asset_symbol();

    CardGroup {
        title: "Wallet Overview",
        cards: vec![
            MetricCard::new(
                "stPENDLE Balance",
                format_optional(balances.map(|b| b.share_balance), 4),
            )
            .describe("Vault shares held in the selected wallet.")
            .status(query),
            MetricCard::new(
                format!("{} Balance", symbol),
                format_optional(balances.map(|b| b.token_balance), 4),
            )
            .describe("Underlying token balance.")
            .status(query),
            MetricCard::new(
                "Queued Redemptions",
                format_optional(balances.map(|b| b.requested_redemption_shares), 4),
            )
            .describe("Shares ready to claim during the active redemption window.")
            .status(query),
        ],
    }
}

pub fn vault_metrics(state: &DashboardState) -> CardGroup {
    let query = &state.vault_metrics;
    let metrics = query.data.as_ref();
    let symbol = state.asset_symbol();

    CardGroup {
        title: "Vault Metrics",
        cards: vec![
            MetricCard::new("Total Assets", format_optional(metrics.map(|m| m.total_assets), 2))
                .describe("Total underlying managed by the vault.")
                .status(query),
            MetricCard::new(
                format!("Locked {}", symbol),
                format_optional(metrics.map(|m| m.total_locked_pendle), 2),
            )
            .describe("Underlying locked in vePENDLE positions.")
            .status(query),
            MetricCard::new(
                "Epoch Duration",
                metrics
                    .map(|m| format!("{:.1}", m.epoch_duration_days()))
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            )
            .describe("Length of each epoch in days.")
            .status(query),
            MetricCard::new(
                "NAV per Share",
                metrics
                    .map(|m| format!("{:.4}", m.nav_per_share()))
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            )
            .describe("stPENDLE intrinsic value in underlying units.")
            .status(query),
        ],
    }
}

pub fn market_signals(state: &DashboardState) -> CardGroup {
    let query = &state.spot_price;
    let signals = state.market_signals();
    let discount = signals
        .filter(|s| s.discount.is_finite())
        .map(|s| format!("{:.2}%", s.discount))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    CardGroup {
        title: "Market Signals",
        cards: vec![
            MetricCard::new(
                format!("{} USD Price", state.asset_symbol()),
                format_usd(query.data),
            )
            .describe("Spot price sourced from CoinGecko.")
            .status(query),
            MetricCard::new("stPENDLE NAV (USD)", format_usd(signals.map(|s| s.nav_usd)))
                .describe("Intrinsic value translated to USD.")
                .status(query),
            MetricCard::new("Discount / Premium", discount)
                .describe("Difference between NAV and spot price.")
                .status(query)
                .warning_if(signals.map(|s| s.is_discount()).unwrap_or(false)),
        ],
    }
}

/// Queue figures plus the window countdown at `now` (unix seconds).
pub fn redemption_queue(state: &DashboardState, now: u64) -> CardGroup {
    let query = &state.redemption_queue;
    let queue = query.data.as_ref();
    let window = state
        .vault_metrics
        .data
        .as_ref()
        .map(|m| m.window_status(now).to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string());
    let clear_time = queue
        .and_then(|q| q.estimated_epochs_to_clear())
        .filter(|&epochs| epochs > 0)
        .map(|epochs| format!("{} epochs", epochs))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    CardGroup {
        title: "Redemption Queue",
        cards: vec![
            MetricCard::new(
                "Current Epoch",
                queue
                    .map(|q| q.epoch.to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            )
            .status(query),
            MetricCard::new("Shares Queued", format_optional(queue.map(|q| q.shares_queued), 2))
                .describe("Total stPENDLE awaiting redemption this epoch.")
                .status(query),
            MetricCard::new(
                format!("Available {}", state.asset_symbol()),
                format_optional(queue.map(|q| q.available), 2),
            )
            .describe("Unlocked underlying ready for redemptions.")
            .status(query),
            MetricCard::new("Window Remaining", window)
                .describe("Time left before the window closes.")
                .status(&state.vault_metrics),
            MetricCard::new("Estimated Clear Time", clear_time)
                .describe("Approximate epochs required to fulfill current queue.")
                .disclaimer("Estimates assume no new deposits or withdrawals.")
                .status(query),
        ],
    }
}

/// All card groups; the wallet group only when an account is watched.
pub fn build_cards(state: &DashboardState, now: u64) -> Vec<CardGroup> {
    let mut groups = Vec::with_capacity(4);
    if state.account.is_some() {
        groups.push(wallet_overview(state));
    }
    groups.push(vault_metrics(state));
    groups.push(market_signals(state));
    groups.push(redemption_queue(state, now));
    groups
}

pub fn render_text(groups: &[CardGroup]) -> String {
    let mut out = String::new();
    for group in groups {
        let _ = writeln!(out, "== {} ==", group.title);
        for card in &group.cards {
            let marker = match (card.variant, card.stale) {
                (CardVariant::Warning, _) => " !",
                (_, true) => " *",
                _ => "",
            };
            let _ = writeln!(out, "  {:<24} {}{}", card.title, card.display_value(), marker);
            if let Some(description) = card.description {
                let _ = writeln!(out, "  {:<24} {}", "", description);
            }
            if let Some(disclaimer) = card.disclaimer {
                let _ = writeln!(out, "  {:<24} ({})", "", disclaimer);
            }
        }
        out.push('\n');
    }
    out
}
