
use std::cmp::{Ordering};
use float_ord::{FloatOrd};

/// Largest number of significant decimal digits an `f64` carries reliably.
pub const MAX_PRECISION: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sign {
    Negative,
    Zero,
    Positive,
}

impl Sign {

    pub fn of(value: f64) -> Self {
        if value.is_nan() || value == 0.0 {
            Sign::Zero
        } else if value < 0.0 {
            Sign::Negative
        } else {
            Sign::Positive
        }
    }

    /// Magnitudes below machine epsilon count as zero when comparing.
    fn compared(value: f64) -> Self {
        if value.abs() < f64::EPSILON { Sign::Zero } else { Sign::of(value) }
    }

    pub fn of_integer(value: i64) -> Self {
        match value.cmp(&0) {
            Ordering::Less => Sign::Negative,
            Ordering::Equal => Sign::Zero,
            Ordering::Greater => Sign::Positive,
        }
    }

    pub fn is_negative(self) -> bool {
        self == Sign::Negative
    }

    /// Orients a magnitude comparison by this sign.
    fn direct(self, magnitude: Ordering) -> Ordering {
        match self {
            Sign::Positive => magnitude,
            Sign::Negative => magnitude.reverse(),
            Sign::Zero => Ordering::Equal,
        }
    }
}

/// Unrounded decimal expansion of a value, `d0.d1d2... * 10^exponent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decimal {
    sign: Sign,
    exponent: i32,
    digits: Vec<u8>,
}

impl Decimal {

    pub fn zero() -> Self {
        Self {
            sign: Sign::Zero,
            exponent: 0,
            digits: Vec::new(),
        }
    }

    /// Expands to 17 significant digits, enough to hold `MAX_PRECISION` digits
    /// plus a guard digit. Non-finite magnitudes saturate at `f64::MAX`.
    pub fn from_f64(value: f64) -> Self {
        let sign = Sign::of(value);
        if sign == Sign::Zero {
            return Self::zero();
        }
        let magnitude = if value.is_finite() { value.abs() } else { f64::MAX };
        let text = format!("{:.16e}", magnitude);
        let (mantissa, exponent) = match text.find('e') {
            Some(split) => (&text[..split], &text[split + 1..]),
            None => return Self::zero(),
        };
        Self {
            sign,
            exponent: exponent.parse().unwrap_or(0),
            digits: ascii_digits(mantissa),
        }
    }

    pub fn from_i64(value: i64) -> Self {
        let sign = Sign::of_integer(value);
        if sign == Sign::Zero {
            return Self::zero();
        }
        let digits = ascii_digits(&value.unsigned_abs().to_string());
        Self {
            sign,
            exponent: digits.len() as i32 - 1,
            digits,
        }
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    pub fn is_zero(&self) -> bool {
        self.sign == Sign::Zero
    }

    /// Rounds to `precision` significant digits.
    ///
    /// The digit after the last kept one is the guard digit. It rounds the
    /// magnitude up at 5 for non-negative values but only at 6 for negative
    /// ones. A carry out of the leading digit moves the exponent up by one.
    /// With a precision of zero the result is the single digit `1` (rounded
    /// up to the next power of ten) or `0`.
    pub fn round(&self, precision: usize) -> Rounded {
        if self.sign == Sign::Zero {
            return Rounded::zero(precision);
        }
        let digit_at = |index: usize| self.digits.get(index).copied().unwrap_or(0);
        let guard = digit_at(precision);
        let mut digits: Vec<u8> = (0..precision).map(digit_at).collect();
        let mut exponent = self.exponent;
        let threshold = if self.sign.is_negative() { 6 } else { 5 };
        if guard >= threshold && carry(&mut digits) {
            digits.insert(0, 1);
            exponent += 1;
            digits.truncate(precision.max(1));
        }
        if digits.is_empty() {
            digits.push(0);
        }
        Rounded { sign: self.sign, exponent, digits }
    }
}

/// Adds one unit in the last place, returning whether the carry escaped.
fn carry(digits: &mut [u8]) -> bool {
    for digit in digits.iter_mut().rev() {
        if *digit == 9 {
            *digit = 0;
        } else {
            *digit += 1;
            return false;
        }
    }
    true
}

fn ascii_digits(text: &str) -> Vec<u8> {
    text.bytes()
        .filter(u8::is_ascii_digit)
        .map(|byte| byte - b'0')
        .collect()
}

/// A value rounded to a fixed number of significant digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rounded {
    pub sign: Sign,
    pub exponent: i32,
    pub digits: Vec<u8>,
}

impl Rounded {

    fn zero(precision: usize) -> Self {
        Self {
            sign: Sign::Zero,
            exponent: 0,
            digits: vec![0; precision.max(1)],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|&digit| digit == 0)
    }

    pub fn to_f64(&self) -> f64 {
        if self.sign == Sign::Zero || self.is_zero() {
            return 0.0;
        }
        let mut text = String::with_capacity(self.digits.len() + 8);
        if self.sign.is_negative() {
            text.push('-');
        }
        text.push_str("0.");
        text.extend(self.digits.iter().map(|&digit| char::from(b'0' + digit)));
        text.push('e');
        text.push_str(&(self.exponent + 1).to_string());
        text.parse().unwrap_or(0.0)
    }
}

pub fn round(value: f64, precision: u32) -> Rounded {
    Decimal::from_f64(value).round(precision.min(MAX_PRECISION) as usize)
}

/// Three-way comparison of two values, each rounded to its own precision.
///
/// Signs decide first, with magnitudes below `f64::EPSILON` taken as zero,
/// then decimal exponents, then the rounded digit sequences with the
/// shorter one padded by zeros.
pub fn compare(x: f64, x_precision: u32, y: f64, y_precision: u32) -> Ordering {
    let (x_sign, y_sign) = (Sign::compared(x), Sign::compared(y));
    if x_sign != y_sign {
        return x_sign.cmp(&y_sign);
    }
    if x_sign == Sign::Zero {
        return Ordering::Equal;
    }
    if x_precision == y_precision && FloatOrd(x) == FloatOrd(y) {
        return Ordering::Equal;
    }
    let (x_decimal, y_decimal) = (Decimal::from_f64(x), Decimal::from_f64(y));
    if x_decimal.exponent != y_decimal.exponent {
        return x_sign.direct(x_decimal.exponent.cmp(&y_decimal.exponent));
    }
    let x_rounded = x_decimal.round(x_precision.min(MAX_PRECISION) as usize);
    let y_rounded = y_decimal.round(y_precision.min(MAX_PRECISION) as usize);
    if x_rounded.exponent != y_rounded.exponent {
        return x_sign.direct(x_rounded.exponent.cmp(&y_rounded.exponent));
    }
    let len = x_rounded.digits.len().max(y_rounded.digits.len());
    for index in 0..len {
        let x_digit = x_rounded.digits.get(index).copied().unwrap_or(0);
        let y_digit = y_rounded.digits.get(index).copied().unwrap_or(0);
        if x_digit != y_digit {
            return x_sign.direct(x_digit.cmp(&y_digit));
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion() {
        let decimal = Decimal::from_f64(123.456789);
        assert_eq!(decimal.exponent(), 2);
        assert_eq!(&decimal.digits()[..9], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(decimal.digits().len(), 17);

        let decimal = Decimal::from_f64(-0.00125);
        assert_eq!(decimal.sign(), Sign::Negative);
        assert_eq!(decimal.exponent(), -3);

        let decimal = Decimal::from_i64(-4096);
        assert_eq!(decimal.digits(), &[4, 0, 9, 6]);
        assert_eq!(decimal.exponent(), 3);

        assert!(Decimal::from_f64(0.0).is_zero());
        let decimal = Decimal::from_f64(1.5e-20);
        assert_eq!(decimal.sign(), Sign::Positive);
        assert_eq!(decimal.exponent(), -20);
    }

    #[test]
    fn carry_escapes_front() {
        let mut digits = vec![9, 9];
        assert!(carry(&mut digits));
        assert_eq!(digits, vec![0, 0]);

        let mut digits = vec![1, 9];
        assert!(!carry(&mut digits));
        assert_eq!(digits, vec![2, 0]);
    }

    #[test]
    fn integer_rounding() {
        let rounded = Decimal::from_i64(123_456).round(2);
        assert_eq!(rounded.digits, vec![1, 2]);
        assert_eq!(rounded.exponent, 5);

        let rounded = Decimal::from_i64(995).round(2);
        assert_eq!(rounded.digits, vec![1, 0]);
        assert_eq!(rounded.exponent, 3);

        let rounded = Decimal::from_i64(7).round(4);
        assert_eq!(rounded.digits, vec![7, 0, 0, 0]);
    }

    #[test]
    fn rebuild() {
        assert_eq!(round(123.456789, 5).to_f64(), 123.46);
        assert_eq!(round(-2.5, 1).to_f64(), -2.0);
        assert_eq!(round(0.0, 3).to_f64(), 0.0);
    }
}
