//! Fee arithmetic
//!
//! Rates are fixed-point fractions of [`FEE_DENOMINATOR`]. The fee is `floor(amount * rate / D)`,
//! computed without forming the full product so it never overflows for any `u128` amount.

use qbridge_core::{Amount, BridgeError, Result, FEE_DENOMINATOR};

/// Fee and the amount left after it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSplit {
    /// Portion kept by the bridge
    pub fee: Amount,
    /// Portion that moves on
    pub net: Amount,
}

/// Reject rates above 100%.
pub fn validate_fee_rate(rate: Amount) -> Result<()> {
    if rate > FEE_DENOMINATOR {
        return Err(BridgeError::precondition(format!(
            "fee rate {rate} exceeds denominator {FEE_DENOMINATOR}"
        )));
    }
    Ok(())
}

/// Split `amount` at `rate`. `rate` must already be validated.
pub fn compute_fee(amount: Amount, rate: Amount) -> FeeSplit {
    let whole = amount / FEE_DENOMINATOR;
    let rest = amount % FEE_DENOMINATOR;
    let fee = whole * rate + (rest * rate) / FEE_DENOMINATOR;
    FeeSplit {
        fee,
        net: amount - fee,
    }
}
