
use std::cmp::{Ordering};
use num_traits::{ToPrimitive};
use crate::{Value, ValueError};
use crate::value::{ArithBinOp};

mod rounding;

pub use rounding::{round, compare, Decimal, Rounded, Sign, MAX_PRECISION};

/// A REAL value together with the precision it is compared and rendered at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Real {
    value: Option<f64>,
    precision: u32,
}

impl Real {

    pub const fn constant(value: f64) -> Self {
        Self { value: Some(value), precision: MAX_PRECISION }
    }

    pub fn new(value: f64) -> Self {
        Self::with_precision(value, MAX_PRECISION)
    }

    /// Non-finite values have no EXPRESS representation and become indeterminate.
    pub fn with_precision(value: f64, precision: u32) -> Self {
        Self {
            value: finite(value),
            precision: precision.min(MAX_PRECISION),
        }
    }

    pub fn indeterminate() -> Self {
        Self::indeterminate_with_precision(MAX_PRECISION)
    }

    pub fn indeterminate_with_precision(precision: u32) -> Self {
        Self { value: None, precision: precision.min(MAX_PRECISION) }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_determinate(&self) -> bool {
        self.value.is_some()
    }

    pub fn round(&self) -> Option<Rounded> {
        self.value.map(|value| round(value, self.precision))
    }

    pub(crate) fn set(&mut self, value: Option<f64>) {
        self.value = value.and_then(finite);
    }
}

impl Default for Real {

    fn default() -> Self {
        Self::indeterminate()
    }
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    if value.is_finite() { Some(value) } else { None }
}

/// Position in the NUMBER > REAL > INTEGER lattice; wider families order higher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) enum Family {
    Integer,
    Real,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Payload {
    Integer(i64),
    Float(f64),
}

impl Payload {

    pub(crate) fn to_f64(self) -> f64 {
        match self {
            Payload::Integer(value) => value as f64,
            Payload::Float(value) => value,
        }
    }

    pub(crate) fn decimal(self) -> Decimal {
        match self {
            Payload::Integer(value) => Decimal::from_i64(value),
            Payload::Float(value) => Decimal::from_f64(value),
        }
    }
}

/// Numeric view of a value: its family, declared precision and payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Numeric {
    pub(crate) family: Family,
    pub(crate) precision: u32,
    pub(crate) payload: Option<Payload>,
}

impl Numeric {

    pub(crate) fn of(value: &Value) -> Option<Self> {
        match *value {
            Value::Number(number) => Some(Self {
                family: Family::Number,
                precision: MAX_PRECISION,
                payload: number.map(Payload::Float),
            }),
            Value::Real(real) => Some(Self {
                family: Family::Real,
                precision: real.precision(),
                payload: real.value().map(Payload::Float),
            }),
            Value::Integer(integer) => Some(Self {
                family: Family::Integer,
                precision: MAX_PRECISION,
                payload: integer.map(Payload::Integer),
            }),
            _ => None,
        }
    }

    pub(crate) fn compare(&self, other: &Numeric) -> Option<Ordering> {
        match (self.payload?, other.payload?) {
            (Payload::Integer(left), Payload::Integer(right)) => Some(left.cmp(&right)),
            (left, right) => Some(compare(
                left.to_f64(),
                self.precision,
                right.to_f64(),
                other.precision,
            )),
        }
    }
}

fn make(family: Family, precision: u32, payload: Option<Payload>) -> Value {
    match family {
        Family::Integer => Value::Integer(payload.and_then(|payload| match payload {
            Payload::Integer(value) => Some(value),
            Payload::Float(value) => integral(value),
        })),
        Family::Real => Value::Real(match payload {
            Some(payload) => Real::with_precision(payload.to_f64(), precision),
            None => Real::indeterminate_with_precision(precision),
        }),
        Family::Number => Value::Number(payload.and_then(|payload| finite(payload.to_f64()))),
    }
}

fn overflow(op: ArithBinOp) -> ValueError {
    ValueError::Domain {
        function: op.symbol().into(),
        reason: "integer overflow".into(),
    }
}

fn division_by_zero(op: ArithBinOp) -> ValueError {
    ValueError::Domain {
        function: op.symbol().into(),
        reason: "division by zero".into(),
    }
}

/// Remainder carrying the sign of the divisor.
fn floor_mod(left: i64, right: i64) -> Option<i64> {
    let remainder = left.checked_rem(right)?;
    if remainder != 0 && ((remainder < 0) != (right < 0)) {
        remainder.checked_add(right)
    } else {
        Some(remainder)
    }
}

fn integer_arith(op: ArithBinOp, left: i64, right: i64) -> Result<i64, ValueError> {
    if right == 0 && matches!(op, ArithBinOp::IntDiv | ArithBinOp::Mod) {
        return Err(division_by_zero(op));
    }
    let result = match op {
        ArithBinOp::Add => left.checked_add(right),
        ArithBinOp::Sub => left.checked_sub(right),
        ArithBinOp::Mul => left.checked_mul(right),
        ArithBinOp::Mod => floor_mod(left, right),
        ArithBinOp::IntDiv => floor_mod(left, right)
            .and_then(|remainder| left.checked_sub(remainder))
            .and_then(|exact| exact.checked_div(right)),
        ArithBinOp::Power => right.to_u32().and_then(|exponent| left.checked_pow(exponent)),
        ArithBinOp::Div => None,
    };
    result.ok_or_else(|| overflow(op))
}

fn float_arith(op: ArithBinOp, left: f64, right: f64) -> Result<f64, ValueError> {
    let result = match op {
        ArithBinOp::Add => left + right,
        ArithBinOp::Sub => left - right,
        ArithBinOp::Mul => left * right,
        ArithBinOp::Div => {
            if right == 0.0 {
                return Err(division_by_zero(op));
            }
            left / right
        },
        ArithBinOp::Power => {
            if left == 0.0 && right < 0.0 {
                return Err(division_by_zero(op));
            }
            left.powf(right)
        },
        ArithBinOp::IntDiv | ArithBinOp::Mod => {
            if right == 0.0 {
                return Err(division_by_zero(op));
            }
            let quotient = (left / right).floor();
            if op == ArithBinOp::IntDiv { quotient } else { left - right * quotient }
        },
    };
    finite(result).ok_or_else(|| ValueError::Domain {
        function: op.symbol().into(),
        reason: "result is not a finite number".into(),
    })
}

pub(crate) fn arith(
    op: ArithBinOp,
    left: &Value,
    right: &Value,
) -> Result<Value, ValueError> {
    let incompatible = || ValueError::TypeIncompatibility {
        operation: op.symbol().into(),
        left: left.type_name(),
        right: right.type_name(),
    };
    let (lhs, rhs) = match (Numeric::of(left), Numeric::of(right)) {
        (Some(lhs), Some(rhs)) => (lhs, rhs),
        _ => return Err(incompatible()),
    };
    let integer_only = matches!(op, ArithBinOp::IntDiv | ArithBinOp::Mod);
    if integer_only && (lhs.family != Family::Integer || rhs.family != Family::Integer) {
        return Err(incompatible());
    }
    let mut family = lhs.family.max(rhs.family);
    if op == ArithBinOp::Div {
        family = family.max(Family::Real);
    }
    let negative_power = op == ArithBinOp::Power
        && matches!(rhs.payload, Some(Payload::Integer(exponent)) if exponent < 0);
    if negative_power {
        family = family.max(Family::Real);
    }
    let precision = lhs.precision.min(rhs.precision);
    let (left_payload, right_payload) = match (lhs.payload, rhs.payload) {
        (Some(left_payload), Some(right_payload)) => (left_payload, right_payload),
        _ => return Ok(make(family, precision, None)),
    };
    let payload = match (family, left_payload, right_payload) {
        (Family::Integer, Payload::Integer(left_value), Payload::Integer(right_value)) =>
            Payload::Integer(integer_arith(op, left_value, right_value)?),
        (_, left_payload, right_payload) =>
            Payload::Float(float_arith(op, left_payload.to_f64(), right_payload.to_f64())?),
    };
    Ok(make(family, precision, Some(payload)))
}

pub(crate) fn negate(value: &Value) -> Result<Value, ValueError> {
    let numeric = Numeric::of(value).ok_or_else(|| ValueError::TypeIncompatibility {
        operation: "-".into(),
        left: value.type_name(),
        right: value.type_name(),
    })?;
    let payload = match numeric.payload {
        Some(Payload::Integer(integer)) => Some(Payload::Integer(
            integer.checked_neg().ok_or_else(|| overflow(ArithBinOp::Sub))?,
        )),
        Some(Payload::Float(float)) => Some(Payload::Float(-float)),
        None => None,
    };
    Ok(make(numeric.family, numeric.precision, payload))
}

/// Converts a float to an INTEGER payload when it is integral and in range.
pub(crate) fn integral(value: f64) -> Option<i64> {
    if value.fract() == 0.0 { value.to_i64() } else { None }
}
