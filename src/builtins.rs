
use fnv::{FnvHashMap};
use crate::{Value, ValueError, Symbol, Real, Text, Logical, Aggregate, Equality};
use crate::value::{canonical_name};
use crate::numeric::{Numeric};
use crate::parser::{self, NumericLiteral};

fn domain_error(function: &'static str, reason: &'static str) -> ValueError {

    #[cfg(feature = "tracing")]
    tracing::debug!(function, reason, "domain error");

    ValueError::Domain {
        function: function.into(),
        reason: reason.into(),
    }
}

fn expected(function: &'static str, value: &Value, expected: &str) -> ValueError {
    ValueError::TypeIncompatibility {
        operation: function.into(),
        left: value.type_name(),
        right: Symbol::from(expected),
    }
}

fn numeric_argument(function: &'static str, value: &Value) -> Result<Numeric, ValueError> {
    Numeric::of(value).ok_or_else(|| expected(function, value, "NUMBER"))
}

fn aggregate_argument<'a>(function: &'static str, value: &'a Value) -> Result<&'a Aggregate, ValueError> {
    match value {
        Value::Aggregate(aggregate) => Ok(&**aggregate),
        _ => Err(expected(function, value, "AGGREGATE")),
    }
}

/// Applies a real function, returning an indeterminate REAL for an
/// indeterminate argument. The result keeps the argument's precision.
fn real_function(
    function: &'static str,
    value: &Value,
    domain: fn(f64) -> bool,
    reason: &'static str,
    apply: fn(f64) -> f64,
) -> Result<Value, ValueError> {
    let numeric = numeric_argument(function, value)?;
    let argument = match numeric.payload {
        Some(payload) => payload.to_f64(),
        None => return Ok(Value::Real(Real::indeterminate_with_precision(numeric.precision))),
    };
    if !domain(argument) {
        return Err(domain_error(function, reason));
    }
    let result = apply(argument);
    if !result.is_finite() {
        return Err(domain_error(function, "result is not a finite number"));
    }
    Ok(Value::real_with_precision(result, numeric.precision))
}

fn anywhere(_: f64) -> bool {
    true
}

fn unit_interval(value: f64) -> bool {
    (-1.0..=1.0).contains(&value)
}

fn positive(value: f64) -> bool {
    value > 0.0
}

pub fn abs(value: &Value) -> Result<Value, ValueError> {
    match *value {
        Value::Integer(Some(integer)) => integer
            .checked_abs()
            .map(Value::integer)
            .ok_or_else(|| domain_error("ABS", "integer overflow")),
        Value::Integer(None) => Ok(Value::Integer(None)),
        Value::Real(real) => Ok(match real.value() {
            Some(float) => Value::real_with_precision(float.abs(), real.precision()),
            None => Value::Real(real),
        }),
        Value::Number(number) => Ok(Value::Number(number.map(f64::abs))),
        _ => Err(expected("ABS", value, "NUMBER")),
    }
}

pub fn acos(value: &Value) -> Result<Value, ValueError> {
    real_function("ACOS", value, unit_interval, "argument outside of [-1, 1]", f64::acos)
}

pub fn asin(value: &Value) -> Result<Value, ValueError> {
    real_function("ASIN", value, unit_interval, "argument outside of [-1, 1]", f64::asin)
}

/// Angle whose tangent is `v1 / v2`, in `[-PI/2, PI/2]`.
pub fn atan(v1: &Value, v2: &Value) -> Result<Value, ValueError> {
    let (y, x) = (numeric_argument("ATAN", v1)?, numeric_argument("ATAN", v2)?);
    let precision = y.precision.min(x.precision);
    let (y, x) = match (y.payload, x.payload) {
        (Some(y), Some(x)) => (y.to_f64(), x.to_f64()),
        _ => return Ok(Value::Real(Real::indeterminate_with_precision(precision))),
    };
    let angle = if x == 0.0 {
        if y == 0.0 {
            return Err(domain_error("ATAN", "both arguments are zero"));
        }
        std::f64::consts::FRAC_PI_2.copysign(y)
    } else {
        (y / x).atan()
    };
    Ok(Value::real_with_precision(angle, precision))
}

pub fn cos(value: &Value) -> Result<Value, ValueError> {
    real_function("COS", value, anywhere, "", f64::cos)
}

pub fn exists(value: &Value) -> Result<Value, ValueError> {
    Ok(Value::boolean(value.is_determinate()))
}

pub fn exp(value: &Value) -> Result<Value, ValueError> {
    real_function("EXP", value, anywhere, "", f64::exp)
}

pub fn hibound(value: &Value) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument("HIBOUND", value)?;
    if !aggregate.is_determinate() {
        return Ok(Value::Integer(None));
    }
    Ok(aggregate.get_hibound())
}

pub fn hiindex(value: &Value) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument("HIINDEX", value)?;
    Ok(Value::Integer(aggregate
        .index_bounds()
        .filter(|_| aggregate.is_determinate())
        .and_then(|bounds| bounds.upper())))
}

pub fn length(value: &Value) -> Result<Value, ValueError> {
    match value {
        Value::String(text) => Ok(Value::Integer(text.len().map(|len| len as i64))),
        _ => Err(expected("LENGTH", value, "STRING")),
    }
}

pub fn blength(value: &Value) -> Result<Value, ValueError> {
    match value {
        Value::Binary(binary) => Ok(Value::Integer(binary.len().map(|len| len as i64))),
        _ => Err(expected("BLENGTH", value, "BINARY")),
    }
}

pub fn lobound(value: &Value) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument("LOBOUND", value)?;
    if !aggregate.is_determinate() {
        return Ok(Value::Integer(None));
    }
    Ok(aggregate.get_lobound())
}

pub fn loindex(value: &Value) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument("LOINDEX", value)?;
    if !aggregate.is_determinate() {
        return Ok(Value::Integer(None));
    }
    Ok(Value::integer(aggregate.index_base()))
}

pub fn log(value: &Value) -> Result<Value, ValueError> {
    real_function("LOG", value, positive, "argument is not positive", f64::ln)
}

pub fn log2(value: &Value) -> Result<Value, ValueError> {
    real_function("LOG2", value, positive, "argument is not positive", f64::log2)
}

pub fn log10(value: &Value) -> Result<Value, ValueError> {
    real_function("LOG10", value, positive, "argument is not positive", f64::log10)
}

pub fn odd(value: &Value) -> Result<Value, ValueError> {
    match *value {
        Value::Integer(integer) => Ok(Value::logical(match integer {
            Some(integer) => Logical::from(integer % 2 != 0),
            None => Logical::Unknown,
        })),
        _ => Err(expected("ODD", value, "INTEGER")),
    }
}

pub fn sin(value: &Value) -> Result<Value, ValueError> {
    real_function("SIN", value, anywhere, "", f64::sin)
}

pub fn sizeof(value: &Value) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument("SIZEOF", value)?;
    Ok(Value::Integer(aggregate.len().map(|len| len as i64)))
}

pub fn sqrt(value: &Value) -> Result<Value, ValueError> {
    real_function("SQRT", value, |value| value >= 0.0, "argument is negative", f64::sqrt)
}

pub fn tan(value: &Value) -> Result<Value, ValueError> {
    real_function("TAN", value, anywhere, "", f64::tan)
}

/// Reads a numeric literal; anything else gives an indeterminate NUMBER.
pub fn value(value: &Value) -> Result<Value, ValueError> {
    let text = match value {
        Value::String(text) => text,
        _ => return Err(expected("VALUE", value, "STRING")),
    };
    Ok(match text.value().and_then(parser::parse_numeric_literal) {
        Some(NumericLiteral::Integer(integer)) => Value::integer(integer),
        Some(NumericLiteral::Real(real)) => Value::real(real),
        None => Value::Number(None),
    })
}

fn membership(
    function: &'static str,
    aggregate: &Value,
    target: &Value,
    equality: Equality,
) -> Result<Value, ValueError> {
    let aggregate = aggregate_argument(function, aggregate)?;
    if !target.is_determinate() {
        return Ok(Value::logical(Logical::Unknown));
    }
    Ok(Value::logical(aggregate.contains(target, equality)?))
}

/// Whether an element of `aggregate` is value-equal to `target`.
pub fn value_in(aggregate: &Value, target: &Value) -> Result<Value, ValueError> {
    membership("VALUE_IN", aggregate, target, Equality::Value)
}

/// Whether an element of `aggregate` is instance-equal to `target`.
pub fn is_in(target: &Value, aggregate: &Value) -> Result<Value, ValueError> {
    membership("IN", aggregate, target, Equality::Instance)
}

pub fn format(number: &Value, pattern: &Value) -> Result<Value, ValueError> {
    let pattern = match pattern {
        Value::String(text) => text.value(),
        _ => return Err(expected("FORMAT", pattern, "STRING")),
    };
    match pattern {
        Some(pattern) if number.is_determinate() => {
            Ok(Value::string(&crate::format::format(number, pattern)?))
        },
        _ => {
            numeric_argument("FORMAT", number)?;
            Ok(Value::String(Text::default()))
        },
    }
}

pub fn nvl(value: &Value, substitute: &Value) -> Result<Value, ValueError> {
    if value.is_determinate() {
        Ok(value.clone())
    } else {
        Ok(substitute.clone())
    }
}

/// The SET OF STRING naming the value's type and its ancestors.
pub fn type_of(value: &Value) -> Result<Value, ValueError> {
    let names: Vec<Value> = if value.is_determinate() {
        value.type_identity()
            .ancestors()
            .iter()
            .map(|name| Value::string(name))
            .collect()
    } else {
        Vec::new()
    };
    let set = Aggregate::set(&Value::String(Text::default()), 0, None)?.with_elements(&names)?;
    Ok(Value::from(set))
}

type Unary = fn(&Value) -> Result<Value, ValueError>;
type Binary = fn(&Value, &Value) -> Result<Value, ValueError>;

#[derive(Clone, Copy)]
enum Signature {
    Unary(Unary),
    Binary(Binary),
}

/// A named builtin function with a fixed arity.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    signature: Signature,
}

impl Builtin {

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        match self.signature {
            Signature::Unary(_) => 1,
            Signature::Binary(_) => 2,
        }
    }

    pub fn call(&self, arguments: &[Value]) -> Result<Value, ValueError> {
        match (self.signature, arguments) {
            (Signature::Unary(function), [argument]) => function(argument),
            (Signature::Binary(function), [left, right]) => function(left, right),
            _ => Err(ValueError::ArgumentCount {
                function: Symbol::from(self.name),
                expected: self.arity(),
                received: arguments.len(),
            }),
        }
    }
}

impl std::fmt::Debug for Builtin {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{}/{}", self.name, self.arity())
    }
}

const STANDARD: &[(&str, Signature)] = &[
    ("ABS", Signature::Unary(abs)),
    ("ACOS", Signature::Unary(acos)),
    ("ASIN", Signature::Unary(asin)),
    ("ATAN", Signature::Binary(atan)),
    ("BLENGTH", Signature::Unary(blength)),
    ("COS", Signature::Unary(cos)),
    ("EXISTS", Signature::Unary(exists)),
    ("EXP", Signature::Unary(exp)),
    ("FORMAT", Signature::Binary(format)),
    ("HIBOUND", Signature::Unary(hibound)),
    ("HIINDEX", Signature::Unary(hiindex)),
    ("IN", Signature::Binary(is_in)),
    ("LENGTH", Signature::Unary(length)),
    ("LOBOUND", Signature::Unary(lobound)),
    ("LOG", Signature::Unary(log)),
    ("LOG2", Signature::Unary(log2)),
    ("LOG10", Signature::Unary(log10)),
    ("LOINDEX", Signature::Unary(loindex)),
    ("NVL", Signature::Binary(nvl)),
    ("ODD", Signature::Unary(odd)),
    ("SIN", Signature::Unary(sin)),
    ("SIZEOF", Signature::Unary(sizeof)),
    ("SQRT", Signature::Unary(sqrt)),
    ("TAN", Signature::Unary(tan)),
    ("TYPEOF", Signature::Unary(type_of)),
    ("VALUE", Signature::Unary(value)),
    ("VALUE_IN", Signature::Binary(value_in)),
];

/// Name-based dispatch over the builtin functions. Lookup ignores case.
#[derive(Debug, Clone)]
pub struct Builtins {
    table: FnvHashMap<Symbol, Builtin>,
}

impl Builtins {

    pub fn new() -> Self {
        let table = STANDARD
            .iter()
            .map(|&(name, signature)| (Symbol::from(name), Builtin { name, signature }))
            .collect();
        Self { table }
    }

    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.table.get(&canonical_name(name))
    }

    pub fn call(&self, name: &str, arguments: &[Value]) -> Result<Value, ValueError> {
        let builtin = self
            .get(name)
            .ok_or_else(|| ValueError::UnknownFunction(canonical_name(name)))?;

        #[cfg(feature = "tracing")]
        tracing::trace!(function = builtin.name(), arguments = arguments.len(), "call");

        builtin.call(arguments)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.values().map(Builtin::name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

impl Default for Builtins {

    fn default() -> Self {
        Self::new()
    }
}

