
use std::sync::{Arc};
use std::cmp::{Ordering};
use crate::{Logical, Real, Text, Binary, Aggregate, Bounds, FormatError};
use crate::numeric::{self, Numeric, Payload};

pub type Symbol = string_cache::DefaultAtom;

macro_rules! impl_from {
    ($to:ty, $from:ty, $via:expr) => {

        impl From<$from> for $to {
            fn from(value: $from) -> $to { ($via)(value) }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArithBinOp {
    Add,
    Sub,
    Mul,
    Div,
    IntDiv,
    Mod,
    Power,
}

impl ArithBinOp {

    pub fn symbol(self) -> &'static str {
        match self {
            ArithBinOp::Add => "+",
            ArithBinOp::Sub => "-",
            ArithBinOp::Mul => "*",
            ArithBinOp::Div => "/",
            ArithBinOp::IntDiv => "DIV",
            ArithBinOp::Mod => "MOD",
            ArithBinOp::Power => "**",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CompareOp {
    Equal,
    NotEqual,
    InstanceEqual,
    InstanceNotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl CompareOp {

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::InstanceEqual => ":=:",
            CompareOp::InstanceNotEqual => ":<>:",
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterOrEqual => ">=",
        }
    }

    fn test(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Equal | CompareOp::InstanceEqual => ordering == Ordering::Equal,
            CompareOp::NotEqual | CompareOp::InstanceNotEqual => ordering != Ordering::Equal,
            CompareOp::Less => ordering == Ordering::Less,
            CompareOp::LessOrEqual => ordering != Ordering::Greater,
            CompareOp::Greater => ordering == Ordering::Greater,
            CompareOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

/// Which EXPRESS equality an operation uses: instance (`:=:`) or value (`=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Equality {
    Instance,
    Value,
}

/// How a source representation relates to a target representation.
///
/// `Forward` means the source is a narrowing of the target (INTEGER into
/// REAL), `Backward` that it is a widening (REAL into INTEGER).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compatibility {
    Same,
    Forward,
    Backward,
    Incompatible,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    #[error("indeterminate `{0}` value cannot be read")]
    IndeterminateRead(Symbol),
    #[error("index {index} is outside of the bounds {bounds}")]
    IndexOutOfRange {
        index: i64,
        bounds: Bounds,
    },
    #[error("size {size} is outside of the bounds {bounds}")]
    SizeOutOfRange {
        size: usize,
        bounds: Bounds,
    },
    #[error("element {element} already occurs in a unique aggregate")]
    UniquenessViolation {
        element: Arc<str>,
    },
    #[error("indeterminate element at index {index} of a non-optional aggregate")]
    OptionalityViolation {
        index: i64,
    },
    #[error("`{operation}` is not defined between {left} and {right}")]
    TypeIncompatibility {
        operation: Arc<str>,
        left: Symbol,
        right: Symbol,
    },
    #[error("{function}: {reason}")]
    Domain {
        function: Arc<str>,
        reason: Arc<str>,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("BOOLEAN must not have value UNKNOWN")]
    UnknownBoolean,
    #[error("unknown builtin function `{0}`")]
    UnknownFunction(Symbol),
    #[error("`{function}` expected {expected} arguments but received {received}")]
    ArgumentCount {
        function: Symbol,
        expected: usize,
        received: usize,
    },
}

pub(crate) fn incompatible(operation: &str, left: &Value, right: &Value) -> ValueError {
    ValueError::TypeIncompatibility {
        operation: operation.into(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

/// Strips module paths and generic decorations from a type name and upper-cases it.
pub fn canonical_name(raw: &str) -> Symbol {
    let undecorated = raw.split('<').next().unwrap_or(raw);
    let last = undecorated.rsplit("::").next().unwrap_or(undecorated);
    Symbol::from(last.trim().to_ascii_uppercase())
}

/// Ordered ancestry of a type, most general first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    ancestors: Vec<Symbol>,
}

impl TypeIdentity {

    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `name` as the most specific type; a name already present is not repeated.
    pub fn derive(mut self, name: &str) -> Self {
        let name = canonical_name(name);
        if !self.ancestors.contains(&name) {
            self.ancestors.push(name);
        }
        self
    }

    pub fn type_name(&self) -> Symbol {
        self.ancestors.last().cloned().unwrap_or_else(|| Symbol::from("GENERIC"))
    }

    pub fn is_parent_type(&self, name: &str) -> bool {
        self.ancestors.contains(&canonical_name(name))
    }

    pub fn ancestors(&self) -> &[Symbol] {
        &self.ancestors
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lattice {
    Numeric,
    Logic,
    String,
    Binary,
}

/// A value of one of the EXPRESS simple or aggregate types.
///
/// Every variant is either indeterminate (no payload) or determinate. The
/// derived `PartialEq` is structural; EXPRESS equality goes through
/// [`Value::is_equal`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(Option<f64>),
    Real(Real),
    Integer(Option<i64>),
    String(Text),
    Binary(Binary),
    Logical(Option<Logical>),
    Boolean(Option<bool>),
    Aggregate(Box<Aggregate>),
}

impl Value {

    pub fn number(value: f64) -> Self {
        Value::Number(numeric::finite(value))
    }

    pub fn real(value: f64) -> Self {
        Value::Real(Real::new(value))
    }

    pub fn real_with_precision(value: f64, precision: u32) -> Self {
        Value::Real(Real::with_precision(value, precision))
    }

    pub fn integer(value: i64) -> Self {
        Value::Integer(Some(value))
    }

    pub fn string(value: &str) -> Self {
        Value::String(Text::new(value))
    }

    pub fn logical(value: Logical) -> Self {
        Value::Logical(Some(value))
    }

    pub fn boolean(value: bool) -> Self {
        Value::Boolean(Some(value))
    }

    pub fn is_determinate(&self) -> bool {
        match self {
            Value::Number(value) => value.is_some(),
            Value::Real(real) => real.is_determinate(),
            Value::Integer(value) => value.is_some(),
            Value::String(text) => text.is_determinate(),
            Value::Binary(binary) => binary.is_determinate(),
            Value::Logical(value) => value.is_some(),
            Value::Boolean(value) => value.is_some(),
            Value::Aggregate(aggregate) => aggregate.is_determinate(),
        }
    }

    /// The same declared type (precision, width, bounds) without a payload.
    pub fn indeterminate(&self) -> Value {
        match self {
            Value::Number(_) => Value::Number(None),
            Value::Real(real) => Value::Real(Real::indeterminate_with_precision(real.precision())),
            Value::Integer(_) => Value::Integer(None),
            Value::String(text) => Value::String(text.indeterminate()),
            Value::Binary(binary) => Value::Binary(binary.indeterminate()),
            Value::Logical(_) => Value::Logical(None),
            Value::Boolean(_) => Value::Boolean(None),
            Value::Aggregate(aggregate) => Value::Aggregate(Box::new(aggregate.indeterminate())),
        }
    }

    pub fn type_identity(&self) -> TypeIdentity {
        let identity = TypeIdentity::new();
        match self {
            Value::Number(_) => identity.derive("NUMBER"),
            Value::Real(_) => identity.derive("NUMBER").derive("REAL"),
            Value::Integer(_) => identity.derive("NUMBER").derive("REAL").derive("INTEGER"),
            Value::String(_) => identity.derive("STRING"),
            Value::Binary(_) => identity.derive("BINARY"),
            Value::Logical(_) => identity.derive("LOGICAL"),
            Value::Boolean(_) => identity.derive("LOGICAL").derive("BOOLEAN"),
            Value::Aggregate(aggregate) => identity
                .derive("AGGREGATE")
                .derive(aggregate.kind().keyword()),
        }
    }

    pub fn type_name(&self) -> Symbol {
        self.type_identity().type_name()
    }

    pub fn is_parent_type(&self, name: &str) -> bool {
        self.type_identity().is_parent_type(name)
    }

    fn lattice(&self) -> Option<(Lattice, u8)> {
        match self {
            Value::Number(_) => Some((Lattice::Numeric, 0)),
            Value::Real(_) => Some((Lattice::Numeric, 1)),
            Value::Integer(_) => Some((Lattice::Numeric, 2)),
            Value::Logical(_) => Some((Lattice::Logic, 0)),
            Value::Boolean(_) => Some((Lattice::Logic, 1)),
            Value::String(_) => Some((Lattice::String, 0)),
            Value::Binary(_) => Some((Lattice::Binary, 0)),
            Value::Aggregate(_) => None,
        }
    }

    pub fn check_compatibility(&self, other: &Value) -> Compatibility {
        if let (Value::Aggregate(target), Value::Aggregate(source)) = (self, other) {
            return target.check_compatibility(source);
        }
        match (self.lattice(), other.lattice()) {
            (Some((target, target_rank)), Some((source, source_rank))) if target == source => {
                match target_rank.cmp(&source_rank) {
                    Ordering::Equal => Compatibility::Same,
                    Ordering::Less => Compatibility::Forward,
                    Ordering::Greater => Compatibility::Backward,
                }
            },
            _ => Compatibility::Incompatible,
        }
    }

    fn logical_payload(&self) -> Option<Logical> {
        match *self {
            Value::Logical(value) => value,
            Value::Boolean(value) => value.map(Logical::from),
            _ => None,
        }
    }

    /// Assigns `source` into this value, keeping this value's declared type.
    ///
    /// Narrowing REAL or NUMBER into INTEGER succeeds only for integral
    /// payloads. A failed assignment leaves the target unchanged.
    pub fn assign(&mut self, source: &Value) -> Result<(), ValueError> {
        if self.check_compatibility(source) == Compatibility::Incompatible {
            return Err(incompatible(":=", self, source));
        }
        let payload = Numeric::of(source).and_then(|numeric| numeric.payload);
        match self {
            Value::Number(target) => {
                *target = payload.and_then(|payload| numeric::finite(payload.to_f64()));
            },
            Value::Real(target) => {
                target.set(payload.map(Payload::to_f64));
            },
            Value::Integer(target) => {
                *target = match payload {
                    None => None,
                    Some(Payload::Integer(value)) => Some(value),
                    Some(Payload::Float(value)) => match numeric::integral(value) {
                        Some(value) => Some(value),
                        None => return Err(ValueError::TypeIncompatibility {
                            operation: ":=".into(),
                            left: Symbol::from("INTEGER"),
                            right: source.type_name(),
                        }),
                    },
                };
            },
            Value::Logical(target) => {
                *target = source.logical_payload();
            },
            Value::Boolean(target) => {
                *target = match source.logical_payload() {
                    Some(Logical::Unknown) => return Err(ValueError::UnknownBoolean),
                    other => other.and_then(Logical::to_bool),
                };
            },
            Value::String(target) => {
                if let Value::String(text) = source {
                    target.assign(text)?;
                }
            },
            Value::Binary(target) => {
                if let Value::Binary(binary) = source {
                    target.assign(binary)?;
                }
            },
            Value::Aggregate(target) => {
                if let Value::Aggregate(aggregate) = source {
                    target.assign(aggregate)?;
                }
            },
        }
        Ok(())
    }

    /// Three-way comparison; `None` when either side is indeterminate.
    pub fn compare(&self, other: &Value) -> Result<Option<Ordering>, ValueError> {
        if let (Some(left), Some(right)) = (Numeric::of(self), Numeric::of(other)) {
            return Ok(left.compare(&right));
        }
        match (self, other) {
            (Value::Logical(_), Value::Logical(_))
            | (Value::Logical(_), Value::Boolean(_))
            | (Value::Boolean(_), Value::Logical(_))
            | (Value::Boolean(_), Value::Boolean(_)) => Ok(
                self.logical_payload()
                    .zip(other.logical_payload())
                    .map(|(left, right)| left.cmp(&right)),
            ),
            (Value::String(left), Value::String(right)) => Ok(left.compare(right)),
            (Value::Binary(left), Value::Binary(right)) => Ok(left.compare(right)),
            _ => Err(incompatible("comparison", self, other)),
        }
    }

    pub fn is_equal(&self, other: &Value, equality: Equality) -> Result<Logical, ValueError> {
        match (self, other) {
            (Value::Aggregate(left), Value::Aggregate(right)) => left.equals(right, equality),
            (Value::Aggregate(_), _) | (_, Value::Aggregate(_)) => {
                Err(incompatible("equality", self, other))
            },
            _ => Ok(match self.compare(other)? {
                Some(ordering) => Logical::from(ordering == Ordering::Equal),
                None => Logical::Unknown,
            }),
        }
    }

    pub fn compare_with(&self, op: CompareOp, other: &Value) -> Result<Logical, ValueError> {
        match op {
            CompareOp::Equal => self.is_equal(other, Equality::Value),
            CompareOp::NotEqual => Ok(!self.is_equal(other, Equality::Value)?),
            CompareOp::InstanceEqual => self.is_equal(other, Equality::Instance),
            CompareOp::InstanceNotEqual => Ok(!self.is_equal(other, Equality::Instance)?),
            _ => {
                if let (Value::Aggregate(_), _) | (_, Value::Aggregate(_)) = (self, other) {
                    return Err(incompatible(op.symbol(), self, other));
                }
                Ok(match self.compare(other)? {
                    Some(ordering) => Logical::from(op.test(ordering)),
                    None => Logical::Unknown,
                })
            },
        }
    }

    pub fn arith(&self, op: ArithBinOp, other: &Value) -> Result<Value, ValueError> {
        match (op, self, other) {
            (ArithBinOp::Add, Value::String(left), Value::String(right)) =>
                Ok(Value::String(left.concat(right))),
            (ArithBinOp::Add, Value::Binary(left), Value::Binary(right)) =>
                Ok(Value::Binary(left.concat(right))),
            _ => numeric::arith(op, self, other),
        }
    }

    pub fn negate(&self) -> Result<Value, ValueError> {
        numeric::negate(self)
    }

    fn expect_type(&self, expected: &str) -> ValueError {
        ValueError::TypeIncompatibility {
            operation: "read".into(),
            left: self.type_name(),
            right: canonical_name(expected),
        }
    }

    fn indeterminate_read(&self) -> ValueError {
        ValueError::IndeterminateRead(self.type_name())
    }

    pub fn as_f64(&self) -> Result<f64, ValueError> {
        let numeric = Numeric::of(self).ok_or_else(|| self.expect_type("NUMBER"))?;
        numeric.payload
            .map(Payload::to_f64)
            .ok_or_else(|| self.indeterminate_read())
    }

    pub fn as_i64(&self) -> Result<i64, ValueError> {
        match *self {
            Value::Integer(value) => value.ok_or_else(|| self.indeterminate_read()),
            _ => Err(self.expect_type("INTEGER")),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Value::String(text) => text.value().ok_or_else(|| self.indeterminate_read()),
            _ => Err(self.expect_type("STRING")),
        }
    }

    pub fn as_logical(&self) -> Result<Logical, ValueError> {
        match self {
            Value::Logical(_) | Value::Boolean(_) => {
                self.logical_payload().ok_or_else(|| self.indeterminate_read())
            },
            _ => Err(self.expect_type("LOGICAL")),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        self.as_logical()?.to_bool().ok_or(ValueError::UnknownBoolean)
    }

    pub fn as_binary(&self) -> Result<&[bool], ValueError> {
        match self {
            Value::Binary(binary) => binary.bits().ok_or_else(|| self.indeterminate_read()),
            _ => Err(self.expect_type("BINARY")),
        }
    }

    pub fn as_aggregate(&self) -> Result<&Aggregate, ValueError> {
        match self {
            Value::Aggregate(aggregate) => Ok(&**aggregate),
            _ => Err(self.expect_type("AGGREGATE")),
        }
    }

    pub fn as_aggregate_mut(&mut self) -> Result<&mut Aggregate, ValueError> {
        match self {
            Value::Aggregate(aggregate) => Ok(&mut **aggregate),
            _ => Err(self.expect_type("AGGREGATE")),
        }
    }

    /// Reads a LOGICAL-valued condition, treating indeterminate as `UNKNOWN`.
    pub fn to_logical(&self) -> Result<Logical, ValueError> {
        match self {
            Value::Logical(_) | Value::Boolean(_) => {
                Ok(self.logical_payload().unwrap_or(Logical::Unknown))
            },
            _ => Err(self.expect_type("LOGICAL")),
        }
    }
}

impl_from!(Value, i64, |value: i64| Value::Integer(Some(value)));
impl_from!(Value, i32, |value: i32| Value::Integer(Some(value.into())));
impl_from!(Value, f64, Value::real);
impl_from!(Value, f32, |value: f32| Value::real(value.into()));
impl_from!(Value, bool, |value: bool| Value::Boolean(Some(value)));
impl_from!(Value, &str, Value::string);
impl_from!(Value, Logical, |value: Logical| Value::Logical(Some(value)));
impl_from!(Value, Real, Value::Real);
impl_from!(Value, Text, Value::String);
impl_from!(Value, Binary, Value::Binary);
impl_from!(Value, Aggregate, |value: Aggregate| Value::Aggregate(Box::new(value)));

fn write_float(fmt: &mut std::fmt::Formatter, value: f64) -> std::fmt::Result {
    let text = value.to_string();
    if text.contains('.') {
        fmt.write_str(&text)
    } else {
        write!(fmt, "{}.0", text)
    }
}

impl std::fmt::Display for Value {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        if !self.is_determinate() {
            return fmt.write_str("?");
        }
        match self {
            Value::Number(Some(value)) => write_float(fmt, *value),
            Value::Real(real) => write_float(fmt, real.value().unwrap_or_default()),
            Value::Integer(Some(value)) => std::fmt::Display::fmt(value, fmt),
            Value::String(text) => std::fmt::Display::fmt(text, fmt),
            Value::Binary(binary) => std::fmt::Display::fmt(binary, fmt),
            Value::Logical(Some(value)) => std::fmt::Display::fmt(value, fmt),
            Value::Boolean(Some(value)) => fmt.write_str(Logical::from(*value).keyword()),
            Value::Aggregate(aggregate) => std::fmt::Display::fmt(aggregate, fmt),
            Value::Number(None) | Value::Integer(None) | Value::Logical(None) | Value::Boolean(None) => {
                fmt.write_str("?")
            },
        }
    }
}
