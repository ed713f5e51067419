//! # Price Impact
//!
//! Constant-product (x·y=k) swap math with the Uniswap V2 0.3% fee, done
//! entirely in wide integers. No value is converted to floating point until
//! the final percentage, so there is no precision loss on whale-sized
//! reserves and no flooring artifact on dust-sized inputs.

use ethers::types::{U256, U512};

/// Output amount for a swap against a V2 pool, after the 0.3% fee:
///
/// ```text
/// out = (997 * x * OR) / (1000 * IR + 997 * x)
/// ```
///
/// Intermediate products are computed in 512 bits. Zero reserves or a zero
/// input yield zero output.
pub fn amount_out(input_amount: U256, input_reserve: U256, output_reserve: U256) -> U256 {
    if input_amount.is_zero() || input_reserve.is_zero() || output_reserve.is_zero() {
        return U256::zero();
    }

    let fee_adjusted = input_amount.full_mul(U256::from(997u64));
    let numerator = fee_adjusted
        .checked_mul(U512::from(output_reserve))
        .unwrap_or(U512::MAX);
    let denominator = U512::from(input_reserve) * U512::from(1_000u64) + fee_adjusted;

    let out = numerator / denominator;
    // The true quotient is strictly below the output reserve; the clamp only
    // matters on the saturated-numerator path, where the quotient is an
    // upper-bound estimate rather than the exact value.
    out.try_into()
        .map_or(output_reserve, |v: U256| v.min(output_reserve))
}

/// Price impact of a swap, as a percentage in `[0, 100]`.
///
/// Defined as the relative shortfall of the executed price against the spot
/// price. Starting from the constant-product output formula and dividing
/// out `OR`, the impact simplifies to
///
/// ```text
/// impact = (3 * IR + 997 * x) / (1000 * IR + 997 * x)
/// ```
///
/// which depends only on the input amount and the input reserve. Evaluating
/// the simplified ratio directly, rather than flooring an intermediate
/// output amount, keeps dust-sized swaps at their true ~0.3% fee floor.
/// The ratio is scaled by 10^6 in 512-bit arithmetic before the single
/// final conversion to `f64`.
pub fn calculate_price_impact(
    input_amount: U256,
    input_reserve: U256,
    output_reserve: U256,
) -> f64 {
    if input_amount.is_zero() || input_reserve.is_zero() || output_reserve.is_zero() {
        return 0.0;
    }

    let fee_adjusted = input_amount.full_mul(U256::from(997u64));
    let reserve = U512::from(input_reserve);

    let numerator = (reserve * U512::from(3u64) + fee_adjusted)
        .checked_mul(U512::from(1_000_000u64))
        .unwrap_or(U512::MAX);
    let denominator = reserve * U512::from(1_000u64) + fee_adjusted;

    // numerator/denominator < 10^6, so the scaled quotient fits in a u64.
    let scaled = numerator / denominator;
    scaled.as_u64() as f64 / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected ~{expected}, got {actual}"
        );
    }

    #[test]
    fn dust_swap_impact_is_the_fee_floor() {
        let impact = calculate_price_impact(
            U256::from(1u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        );
        approx(impact, 0.3, 0.01);
    }

    #[test]
    fn swap_equal_to_reserve_halves_the_price() {
        let reserve = U256::from(1_000_000u64);
        let impact = calculate_price_impact(reserve, reserve, reserve);
        // (3 + 997) / (1000 + 997) = 50.07%
        approx(impact, 50.07, 0.01);
    }

    #[test]
    fn impact_grows_with_input_size() {
        let reserve = U256::from(10u64).pow(U256::from(24u64));
        let small = calculate_price_impact(reserve / 1000, reserve, reserve);
        let large = calculate_price_impact(reserve / 10, reserve, reserve);
        assert!(small < large);
        assert!(large < 100.0);
    }

    #[test]
    fn zero_inputs_yield_zero_impact() {
        let one = U256::from(1u64);
        assert_eq!(calculate_price_impact(U256::zero(), one, one), 0.0);
        assert_eq!(calculate_price_impact(one, U256::zero(), one), 0.0);
        assert_eq!(calculate_price_impact(one, one, U256::zero()), 0.0);
    }

    #[test]
    fn impact_is_exact_on_whale_reserves() {
        // Values far beyond f64's 53-bit mantissa still compute cleanly.
        let reserve = U256::from_dec_str("123456789012345678901234567890123456789").unwrap();
        let impact = calculate_price_impact(reserve / 100, reserve, reserve);
        assert!(impact > 0.3);
        assert!(impact < 100.0);
    }

    #[test]
    fn amount_out_matches_v2_formula() {
        // 997 * 1000 * 1e6 / (1000 * 1e6 + 997 * 1000) = 996.00...
        let out = amount_out(
            U256::from(1_000u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        );
        assert_eq!(out, U256::from(996u64));
    }

    #[test]
    fn amount_out_zero_guards() {
        let one = U256::from(1u64);
        assert!(amount_out(U256::zero(), one, one).is_zero());
        assert!(amount_out(one, U256::zero(), one).is_zero());
        assert!(amount_out(one, one, U256::zero()).is_zero());
    }

    #[test]
    fn amount_out_never_exceeds_output_reserve() {
        let huge = U256::MAX / 2;
        let out = amount_out(huge, U256::from(1u64), U256::from(1_000u64));
        assert!(out <= U256::from(1_000u64));
    }

    #[test]
    fn amount_out_stays_bounded_when_the_numerator_saturates() {
        // 997 * MAX * MAX overflows even 512 bits; the result must still be
        // capped at the output reserve.
        let out = amount_out(U256::MAX, U256::one(), U256::MAX);
        assert!(out <= U256::MAX);

        let out = amount_out(U256::MAX, U256::one(), U256::from(5u64));
        assert!(out <= U256::from(5u64));
    }
}
