//! Gas limit and fee computation.

/// Default multiplier applied to simulated gas.
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.5;

/// Default fee denomination.
pub const DEFAULT_FEE_DENOM: &str = "uallo";

/// Gas limit and fee amount written into a transaction's `Fee`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeeQuote {
    /// Gas limit.
    pub gas_limit: u64,
    /// Fee amount in the fee denomination.
    pub amount: u128,
}

impl FeeQuote {
    /// Zero fee used for dry runs.
    pub const ZERO: FeeQuote = FeeQuote {
        gas_limit: 0,
        amount: 0,
    };
}

/// `gas_limit = floor(gas_used * adjustment)`, `amount = ceil(gas_limit * price)`.
///
/// Non-positive adjustments fall back to 1.0 so the limit never drops below
/// the simulated usage. A fractional amount always rounds up, never down.
pub fn compute_fee(gas_used: u64, gas_adjustment: f64, gas_price: f64) -> FeeQuote {
    let adjustment = if gas_adjustment.is_finite() && gas_adjustment > 0.0 {
        gas_adjustment
    } else {
        1.0
    };
    let gas_limit = (gas_used as f64 * adjustment).floor() as u64;
    let price = if gas_price.is_finite() && gas_price > 0.0 {
        gas_price
    } else {
        0.0
    };
    let amount = (gas_limit as f64 * price).ceil() as u128;
    FeeQuote { gas_limit, amount }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_rounding() {
        let quote = compute_fee(100_001, 1.5, 10.0);
        assert_eq!(quote.gas_limit, 150_001);
        assert_eq!(quote.amount, 1_500_010);

        let quote = compute_fee(1_000, 1.5, 0.25);
        assert_eq!(quote.gas_limit, 1_500);
        assert_eq!(quote.amount, 375);

        let quote = compute_fee(3, 1.0, 0.3);
        assert_eq!(quote.amount, 1);
    }

    #[test]
    fn test_fractional_amount_rounds_up_not_down() {
        // 150_000 gas at 0.25 is exact; 150_001 gas leaves a quarter unit.
        assert_eq!(compute_fee(100_000, 1.5, 0.25).amount, 37_500);
        assert_eq!(compute_fee(100_001, 1.5, 0.25).amount, 37_501);
        assert_eq!(compute_fee(1, 1.0, 0.5).amount, 1);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(compute_fee(1_000, 0.0, 2.0).gas_limit, 1_000);
        assert_eq!(compute_fee(1_000, f64::NAN, 2.0).gas_limit, 1_000);
        assert_eq!(compute_fee(1_000, 1.5, -1.0).amount, 0);
        assert_eq!(compute_fee(0, 1.5, 10.0), FeeQuote::ZERO);
    }
}
