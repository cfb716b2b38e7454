
use std::sync::{Arc};
use std::convert::{TryFrom};
use crate::{Value, ValueError, Symbol};
use crate::numeric::{Numeric, Family, Payload, Rounded, Sign};
use crate::parser;

mod assemble;

use assemble::{Layout, place};

pub const DEFAULT_INTEGER_FORMAT: &str = "7I";
pub const DEFAULT_REAL_FORMAT: &str = "10.1E";

const MIN_INTEGER_WIDTH: usize = 2;
const MIN_FIXED_WIDTH: usize = 4;
const MIN_EXPONENT_WIDTH: usize = 7;
const DEFAULT_FIXED_DECIMALS: usize = 2;
// Digits of `i64::MAX` plus a guard digit.
const MAX_INTEGER_DIGITS: usize = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid format string `{pattern}`: {message}")]
    Syntax {
        pattern: Arc<str>,
        message: Arc<str>,
    },
    #[error("width {width} of format `{pattern}` is below the minimum of {minimum}")]
    WidthTooSmall {
        pattern: Arc<str>,
        width: usize,
        minimum: usize,
    },
    #[error("integer format `{pattern}` does not take decimals")]
    DecimalsNotAllowed {
        pattern: Arc<str>,
    },
    #[error("exponent format `{pattern}` needs at least one decimal")]
    MissingDecimals {
        pattern: Arc<str>,
    },
    #[error("{count} decimal places in format `{pattern}` are too many")]
    TooManyDecimals {
        pattern: Arc<str>,
        count: usize,
    },
}

/// Whether a symbolic format shows `+` on non-negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignFlag {
    Negative,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Integer,
    Fixed,
    Exponent,
}

/// Sign marker of a picture template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    None,
    Plus,
    Minus,
    Parentheses,
}

/// `[+|-][0]width[.decimals](I|F|E)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbolic {
    pub sign: SignFlag,
    pub zero_pad: bool,
    pub width: usize,
    pub decimals: Option<usize>,
    pub style: Style,
}

/// A template such as `(###.##)` or `+#,##`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Picture {
    pub marker: Marker,
    pub integer_slots: usize,
    pub separator: Option<char>,
    pub fraction_slots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatSpec {
    Symbolic(Symbolic),
    Picture(Picture),
}

/// Parses and validates a format string.
pub fn parse(pattern: &str) -> Result<FormatSpec, FormatError> {
    let spec = parser::parse_format(pattern).map_err(|message| FormatError::Syntax {
        pattern: pattern.into(),
        message: message.into(),
    })?;
    match spec {
        FormatSpec::Symbolic(symbolic) => validate(&symbolic, pattern)?,
        FormatSpec::Picture(picture) => {
            lowest_position(picture.fraction_slots, pattern)?;
        },
    }
    Ok(spec)
}

/// Decimal position of the last of `decimals` fraction digits.
fn lowest_position(decimals: usize, pattern: &str) -> Result<i32, FormatError> {
    i32::try_from(decimals)
        .map(|decimals| -decimals)
        .map_err(|_| FormatError::TooManyDecimals {
            pattern: pattern.into(),
            count: decimals,
        })
}

fn validate(spec: &Symbolic, pattern: &str) -> Result<(), FormatError> {
    let minimum = match spec.style {
        Style::Integer => MIN_INTEGER_WIDTH,
        Style::Fixed => MIN_FIXED_WIDTH,
        Style::Exponent => MIN_EXPONENT_WIDTH,
    };
    if spec.width < minimum {
        return Err(FormatError::WidthTooSmall {
            pattern: pattern.into(),
            width: spec.width,
            minimum,
        });
    }
    if let Some(decimals) = spec.decimals {
        lowest_position(decimals, pattern)?;
    }
    match (spec.style, spec.decimals) {
        (Style::Integer, Some(_)) => Err(FormatError::DecimalsNotAllowed {
            pattern: pattern.into(),
        }),
        (Style::Exponent, None) | (Style::Exponent, Some(0)) => Err(FormatError::MissingDecimals {
            pattern: pattern.into(),
        }),
        _ => Ok(()),
    }
}

/// Renders a numeric value.
///
/// An empty pattern selects `7I` for INTEGER values and `10.1E` otherwise.
/// Symbolic widths are minimums; a picture that cannot hold the value is
/// filled with `#`.
pub fn format(value: &Value, pattern: &str) -> Result<String, ValueError> {
    let numeric = Numeric::of(value).ok_or_else(|| ValueError::TypeIncompatibility {
        operation: "FORMAT".into(),
        left: value.type_name(),
        right: Symbol::from("STRING"),
    })?;
    let payload = numeric.payload.ok_or_else(|| ValueError::IndeterminateRead(value.type_name()))?;
    let pattern = match pattern {
        "" if numeric.family == Family::Integer => DEFAULT_INTEGER_FORMAT,
        "" => DEFAULT_REAL_FORMAT,
        pattern => pattern,
    };
    let spec = parse(pattern)?;

    #[cfg(feature = "tracing")]
    tracing::trace!(pattern, spec = ?spec, "format");

    let source = Source { payload, precision: numeric.precision };
    Ok(match spec {
        FormatSpec::Symbolic(symbolic) => match symbolic.style {
            Style::Integer => render_integer(&source, &symbolic),
            Style::Fixed => {
                let decimals = symbolic.decimals.unwrap_or(DEFAULT_FIXED_DECIMALS);
                render_fixed(&source, &symbolic, lowest_position(decimals, pattern)?)
            },
            Style::Exponent => render_exponent(&source, &symbolic),
        },
        FormatSpec::Picture(picture) => {
            render_picture(&source, &picture, lowest_position(picture.fraction_slots, pattern)?)
        },
    })
}

struct Source {
    payload: Payload,
    precision: u32,
}

impl Source {

    /// Significant digits available; INTEGER payloads are exact.
    fn cap(&self, wanted: usize) -> usize {
        match self.payload {
            Payload::Integer(_) => wanted.min(MAX_INTEGER_DIGITS),
            Payload::Float(_) => wanted.min(self.precision as usize),
        }
    }

    /// Rounds to the decimal position `10^low`.
    fn round_at(&self, low: i32) -> Rounded {
        let decimal = self.payload.decimal();
        let wanted = i64::from(decimal.exponent()) - i64::from(low) + 1;
        if decimal.is_zero() || wanted < 0 {
            return zero();
        }
        decimal.round(self.cap(usize::try_from(wanted).unwrap_or(usize::MAX)))
    }

    /// Rounds to `count` significant digits.
    fn round_digits(&self, count: usize) -> Rounded {
        let decimal = self.payload.decimal();
        if decimal.is_zero() {
            return zero();
        }
        decimal.round(self.cap(count))
    }
}

fn zero() -> Rounded {
    Rounded {
        sign: Sign::Zero,
        exponent: 0,
        digits: Vec::new(),
    }
}

/// Sign, digits and exponent of a rounded value, with zero normalized.
fn significant(rounded: Rounded) -> (bool, Vec<u8>, i32) {
    if rounded.is_zero() {
        (false, Vec::new(), 0)
    } else {
        (rounded.sign.is_negative(), rounded.digits, rounded.exponent)
    }
}

fn sign_char(negative: bool, flag: SignFlag) -> Option<char> {
    match (negative, flag) {
        (true, _) => Some('-'),
        (false, SignFlag::Always) => Some('+'),
        (false, SignFlag::Negative) => None,
    }
}

fn render_integer(source: &Source, spec: &Symbolic) -> String {
    let (negative, digits, exponent) = significant(source.round_at(0));
    let (leading_zeros, digits, trailing_zeros) = place(&digits, exponent, exponent.max(0), 0);
    Layout {
        sign: sign_char(negative, spec.sign),
        width: spec.width,
        zero_pad: spec.zero_pad,
        leading_zeros,
        digits,
        trailing_zeros,
        ..Layout::default()
    }.assemble()
}

fn render_fixed(source: &Source, spec: &Symbolic, low: i32) -> String {
    let (negative, digits, exponent) = significant(source.round_at(low));
    let high = exponent.max(0);
    let (leading_zeros, digits, trailing_zeros) = place(&digits, exponent, high, low);
    Layout {
        sign: sign_char(negative, spec.sign),
        width: spec.width,
        zero_pad: spec.zero_pad,
        leading_zeros,
        digits,
        trailing_zeros,
        point: if low < 0 { Some(high as usize + 1) } else { None },
        ..Layout::default()
    }.assemble()
}

fn render_exponent(source: &Source, spec: &Symbolic) -> String {
    let decimals = spec.decimals.unwrap_or(1);
    let count = if spec.zero_pad { decimals } else { decimals + 1 };
    let (negative, mut digits, exponent) = significant(source.round_digits(count));
    let shown = if digits.is_empty() {
        0
    } else if spec.zero_pad {
        exponent + 1
    } else {
        exponent
    };
    digits.resize(count, 0);
    let suffix = format!("E{}{:02}", if shown < 0 { '-' } else { '+' }, shown.abs());
    Layout {
        sign: sign_char(negative, spec.sign),
        width: spec.width,
        leading_zeros: if spec.zero_pad { 1 } else { 0 },
        digits,
        point: Some(1),
        suffix,
        ..Layout::default()
    }.assemble()
}

fn render_picture(source: &Source, picture: &Picture, low: i32) -> String {
    let (negative, digits, exponent) = significant(source.round_at(low));
    let high = exponent.max(0);
    let (leading_zeros, digits, trailing_zeros) = place(&digits, exponent, high, low);
    let integer_len = high as usize + 1;
    let inline_minus = negative && picture.marker == Marker::None;
    let (prefix, suffix) = match picture.marker {
        Marker::None => ("", ""),
        Marker::Plus => (if negative { "-" } else { "+" }, ""),
        Marker::Minus => (if negative { "-" } else { " " }, ""),
        Marker::Parentheses => if negative { ("(", ")") } else { (" ", " ") },
    };
    let fraction_width = picture.separator.map(|_| picture.fraction_slots + 1).unwrap_or(0);
    if integer_len + usize::from(inline_minus) > picture.integer_slots {
        let mut filler = String::from(prefix);
        filler.extend(std::iter::repeat('#').take(picture.integer_slots));
        if let Some(separator) = picture.separator {
            filler.push(separator);
            filler.extend(std::iter::repeat('#').take(picture.fraction_slots));
        }
        filler.push_str(suffix);
        return filler;
    }
    Layout {
        prefix: prefix.into(),
        sign: if inline_minus { Some('-') } else { None },
        width: prefix.len() + picture.integer_slots + fraction_width + suffix.len(),
        leading_zeros,
        digits,
        trailing_zeros,
        point: picture.separator.map(|_| integer_len),
        separator: picture.separator.unwrap_or('.'),
        suffix: suffix.into(),
        ..Layout::default()
    }.assemble()
}
