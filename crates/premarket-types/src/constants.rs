//! System-wide constants for the Premarket settlement engine.

/// System-wide collateral floor: no order may be created below 25%.
pub const MIN_COLLATERAL_PERCENT: u32 = 25;

/// Full collateralization. Orders must reach this before settlement.
pub const FULL_COLLATERAL_PERCENT: u32 = 100;

/// Maximum discount a promotion may carry.
pub const MAX_DISCOUNT_PERCENT: u32 = 100;

/// Timeout for the external promotion eligibility check (milliseconds).
/// Past this, the check counts as failed and the buyer gets no discount.
pub const ELIGIBILITY_CHECK_TIMEOUT_MS: u64 = 5_000;

/// Default settle window after the underlying token's generation event.
pub const DEFAULT_SETTLE_DURATION_HOURS: u32 = 24;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Premarket";
