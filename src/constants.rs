
use crate::{Value, Real, Logical};
use crate::value::{canonical_name};

pub const PI: Real = Real::constant(std::f64::consts::PI);
pub const CONST_E: Real = Real::constant(std::f64::consts::E);

pub const TRUE: Logical = Logical::True;
pub const FALSE: Logical = Logical::False;
pub const UNKNOWN: Logical = Logical::Unknown;

/// Looks up a builtin constant by name, ignoring case.
pub fn constant(name: &str) -> Option<Value> {
    match &*canonical_name(name) {
        "PI" => Some(Value::Real(PI)),
        "CONST_E" => Some(Value::Real(CONST_E)),
        "TRUE" => Some(Value::logical(TRUE)),
        "FALSE" => Some(Value::logical(FALSE)),
        "UNKNOWN" => Some(Value::logical(UNKNOWN)),
        _ => None,
    }
}
