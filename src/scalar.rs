
use std::sync::{Arc};
use std::cmp::{Ordering};
use crate::{ValueError, Bounds};

fn width_bounds(width: usize, fixed: bool) -> Bounds {
    let upper = width as i64;
    Bounds::new(if fixed { upper } else { 0 }, Some(upper))
}

fn check_width(width: Option<usize>, fixed: bool, length: usize) -> Result<(), ValueError> {
    match width {
        Some(width) if length > width || (fixed && length != width) => {
            Err(ValueError::SizeOutOfRange {
                size: length,
                bounds: width_bounds(width, fixed),
            })
        },
        _ => Ok(()),
    }
}

/// An EXPRESS STRING, optionally declared with a maximum or FIXED width.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text {
    value: Option<Arc<str>>,
    width: Option<usize>,
    fixed: bool,
}

impl Text {

    pub fn new(value: &str) -> Self {
        Self {
            value: Some(value.into()),
            width: None,
            fixed: false,
        }
    }

    pub fn with_width(width: usize, fixed: bool) -> Self {
        Self {
            value: None,
            width: Some(width),
            fixed,
        }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_determinate(&self) -> bool {
        self.value.is_some()
    }

    /// Length in characters.
    pub fn len(&self) -> Option<usize> {
        self.value.as_ref().map(|value| value.chars().count())
    }

    pub fn indeterminate(&self) -> Self {
        Self {
            value: None,
            width: self.width,
            fixed: self.fixed,
        }
    }

    pub fn assign(&mut self, source: &Text) -> Result<(), ValueError> {
        if let Some(length) = source.len() {
            check_width(self.width, self.fixed, length)?;
        }
        self.value = source.value.clone();
        Ok(())
    }

    pub fn compare(&self, other: &Text) -> Option<Ordering> {
        let (left, right) = (self.value.as_ref()?, other.value.as_ref()?);
        Some(left.chars().cmp(right.chars()))
    }

    pub fn concat(&self, other: &Text) -> Text {
        match (&self.value, &other.value) {
            (Some(left), Some(right)) => Text::new(&format!("{}{}", left, right)),
            _ => Text::default(),
        }
    }
}

impl std::fmt::Display for Text {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(fmt, "'{}'", value.replace('\'', "''")),
            None => fmt.write_str("?"),
        }
    }
}

/// An EXPRESS BINARY, a sequence of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Binary {
    bits: Option<Arc<[bool]>>,
    width: Option<usize>,
    fixed: bool,
}

impl Binary {

    pub fn new(bits: &[bool]) -> Self {
        Self {
            bits: Some(bits.into()),
            width: None,
            fixed: false,
        }
    }

    /// Reads a string of `0` and `1` characters, with or without the leading `%`.
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.strip_prefix('%').unwrap_or(text);
        let bits = digits
            .chars()
            .map(|digit| match digit {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<bool>>>()?;
        Some(Self::new(&bits))
    }

    pub fn with_width(width: usize, fixed: bool) -> Self {
        Self {
            bits: None,
            width: Some(width),
            fixed,
        }
    }

    pub fn bits(&self) -> Option<&[bool]> {
        self.bits.as_deref()
    }

    pub fn width(&self) -> Option<usize> {
        self.width
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed
    }

    pub fn is_determinate(&self) -> bool {
        self.bits.is_some()
    }

    pub fn len(&self) -> Option<usize> {
        self.bits.as_ref().map(|bits| bits.len())
    }

    pub fn indeterminate(&self) -> Self {
        Self {
            bits: None,
            width: self.width,
            fixed: self.fixed,
        }
    }

    pub fn assign(&mut self, source: &Binary) -> Result<(), ValueError> {
        if let Some(length) = source.len() {
            check_width(self.width, self.fixed, length)?;
        }
        self.bits = source.bits.clone();
        Ok(())
    }

    pub fn compare(&self, other: &Binary) -> Option<Ordering> {
        let (left, right) = (self.bits.as_ref()?, other.bits.as_ref()?);
        Some(left.iter().cmp(right.iter()))
    }

    pub fn concat(&self, other: &Binary) -> Binary {
        match (&self.bits, &other.bits) {
            (Some(left), Some(right)) => {
                let joined: Vec<bool> = left.iter().chain(right.iter()).copied().collect();
                Binary::new(&joined)
            },
            _ => Binary::default(),
        }
    }
}

impl std::fmt::Display for Binary {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.bits {
            Some(bits) => {
                fmt.write_str("%")?;
                for &bit in bits.iter() {
                    fmt.write_str(if bit { "1" } else { "0" })?;
                }
                Ok(())
            },
            None => fmt.write_str("?"),
        }
    }
}
