use log::{debug, warn};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::utils::errors::UtilsError;

/// Parse an integer, a fraction (`-5/2`) or a finite decimal (`1.25`) into an
/// exact rational.
///
/// # Errors
///
/// Returns an error if the text is not one of the accepted forms or if a
/// fraction has a zero denominator.
pub fn parse_rational(text: &str) -> Result<BigRational, UtilsError> {
    debug!("Parsing rational from '{}'", text);

    let trimmed = text.trim();
    let invalid = || UtilsError::InvalidNumber(text.to_string());

    let result = if let Some((numer, denom)) = trimmed.split_once('/') {
        let numer = parse_integer(numer.trim()).ok_or_else(invalid)?;
        let denom = parse_integer(denom.trim()).ok_or_else(invalid)?;
        if denom.is_zero() {
            warn!("Zero denominator in '{}'", text);
            return Err(invalid());
        }
        BigRational::new(numer, denom)
    } else if let Some((whole, frac)) = trimmed.split_once('.') {
        parse_decimal(whole, frac).ok_or_else(invalid)?
    } else {
        BigRational::from_integer(parse_integer(trimmed).ok_or_else(invalid)?)
    };

    debug!("Parsed '{}' as {}", text, result);
    Ok(result)
}

fn parse_integer(text: &str) -> Option<BigInt> {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse::<BigInt>().ok()
}

fn parse_decimal(whole: &str, frac: &str) -> Option<BigRational> {
    let (negative, whole) = match whole.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, whole.strip_prefix('+').unwrap_or(whole)),
    };

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !all_digits(whole) || !all_digits(frac) {
        return None;
    }

    let mut digits = String::with_capacity(whole.len() + frac.len());
    digits.push_str(whole);
    digits.push_str(frac);
    let numer: BigInt = digits.parse().ok()?;

    let mut denom = BigInt::one();
    for _ in 0..frac.len() {
        denom *= 10;
    }

    let value = BigRational::new(numer, denom);
    Some(if negative { -value } else { value })
}
