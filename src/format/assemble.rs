
use std::convert::{TryFrom};

/// Positional description of a rendered number.
///
/// The body is `leading_zeros` zeros, then `digits`, then `trailing_zeros`
/// zeros, with `separator` inserted after `point` body characters. The body
/// is padded on the left up to `width`, either with spaces placed before the
/// sign or with zeros placed after it. `prefix` stays at the very left and
/// `suffix` at the very right; both count towards the width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    pub prefix: String,
    pub sign: Option<char>,
    pub width: usize,
    pub zero_pad: bool,
    pub leading_zeros: usize,
    pub digits: Vec<u8>,
    pub trailing_zeros: usize,
    pub point: Option<usize>,
    pub separator: char,
    pub suffix: String,
}

impl Default for Layout {

    fn default() -> Self {
        Self {
            prefix: String::new(),
            sign: None,
            width: 0,
            zero_pad: false,
            leading_zeros: 0,
            digits: Vec::new(),
            trailing_zeros: 0,
            point: None,
            separator: '.',
            suffix: String::new(),
        }
    }
}

impl Layout {

    fn body(&self) -> String {
        let mut body = String::with_capacity(
            self.leading_zeros + self.digits.len() + self.trailing_zeros + 1,
        );
        let digits = std::iter::repeat('0').take(self.leading_zeros)
            .chain(self.digits.iter().map(|&digit| char::from(b'0' + digit)))
            .chain(std::iter::repeat('0').take(self.trailing_zeros));
        for (index, digit) in digits.enumerate() {
            if self.point == Some(index) {
                body.push(self.separator);
            }
            body.push(digit);
        }
        if self.point == Some(body.len()) {
            body.push(self.separator);
        }
        body
    }

    pub fn assemble(&self) -> String {
        let body = self.body();
        let used = self.prefix.chars().count()
            + self.sign.map(|_| 1).unwrap_or(0)
            + body.chars().count()
            + self.suffix.chars().count();
        let padding = self.width.saturating_sub(used);
        let fill = if self.zero_pad { '0' } else { ' ' };
        let mut output = String::with_capacity(used + padding);
        output.push_str(&self.prefix);
        if !self.zero_pad {
            output.extend(std::iter::repeat(fill).take(padding));
        }
        if let Some(sign) = self.sign {
            output.push(sign);
        }
        if self.zero_pad {
            output.extend(std::iter::repeat(fill).take(padding));
        }
        output.push_str(&body);
        output.push_str(&self.suffix);
        output
    }
}

/// Splits rounded digits over the decimal positions `high` down to `low`.
///
/// `digits` start at position `exponent`. Positions above the first digit
/// become leading zeros and positions past the last become trailing zeros.
pub(crate) fn place(digits: &[u8], exponent: i32, high: i32, low: i32) -> (usize, Vec<u8>, usize) {
    let (exponent, high, low) = (i64::from(exponent), i64::from(high), i64::from(low));
    let size = |count: i64| usize::try_from(count).unwrap_or(0);
    let span = size(high - low + 1);
    let leading = size(high - exponent);
    let fitting = size(exponent - low + 1);
    let used: Vec<u8> = digits.iter().copied().take(fitting.min(span.saturating_sub(leading))).collect();
    let leading = leading.min(span);
    let trailing = span - leading - used.len();
    (leading, used, trailing)
}
