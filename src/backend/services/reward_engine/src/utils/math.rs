use shared_models::CoinError;

/// `floor(value * numerator / denominator)` without overflowing on the
/// intermediate product when the result itself fits.
pub fn mul_div(value: u128, numerator: u128, denominator: u128) -> Result<u128, CoinError> {
    if denominator == 0 {
        return Err(CoinError::Overflow);
    }

    let quotient = value / denominator;
    let remainder = value % denominator;

    let whole = quotient.checked_mul(numerator).ok_or(CoinError::Overflow)?;
    let fraction = remainder.checked_mul(numerator).ok_or(CoinError::Overflow)? / denominator;
    whole.checked_add(fraction).ok_or(CoinError::Overflow)
}

/// `percent` of `amount`, rounded down.
pub fn percent_of(amount: u128, percent: u8) -> Result<u128, CoinError> {
    mul_div(amount, u128::from(percent), 100)
}
