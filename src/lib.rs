
mod value;
mod logic;
mod numeric;
mod scalar;
mod aggregate;
mod parser;
mod constants;

pub mod format;
pub mod builtins;

pub use value::{
    Value, Symbol, ValueError, TypeIdentity, Compatibility, Equality,
    ArithBinOp, CompareOp, canonical_name,
};
pub use logic::{Logical};
pub use numeric::{Real, Decimal, Rounded, Sign, round, compare, MAX_PRECISION};
pub use scalar::{Text, Binary};
pub use aggregate::{Aggregate, AggregateKind, Bounds, Occurrences};
pub use parser::{NumericLiteral, parse_numeric_literal};
pub use constants::{PI, CONST_E, TRUE, FALSE, UNKNOWN, constant};
pub use format::{FormatError, FormatSpec};
pub use builtins::{Builtins, Builtin};
