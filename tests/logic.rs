
use express_types::*;
use assert_matches::{assert_matches};

use express_types::Logical::{True as T, Unknown as U, False as F};

#[test]
fn not() {
    assert_eq!(!T, F);
    assert_eq!(!U, U);
    assert_eq!(!F, T);
}

#[test]
fn and() {
    let table = [
        (T, T, T), (T, U, U), (T, F, F),
        (U, T, U), (U, U, U), (U, F, F),
        (F, T, F), (F, U, F), (F, F, F),
    ];
    for &(left, right, expected) in &table {
        assert_eq!(left & right, expected, "{} AND {}", left, right);
    }
}

#[test]
fn or() {
    let table = [
        (T, T, T), (T, U, T), (T, F, T),
        (U, T, T), (U, U, U), (U, F, U),
        (F, T, T), (F, U, U), (F, F, F),
    ];
    for &(left, right, expected) in &table {
        assert_eq!(left | right, expected, "{} OR {}", left, right);
    }
}

#[test]
fn xor() {
    let table = [
        (T, T, F), (T, U, U), (T, F, T),
        (U, T, U), (U, U, U), (U, F, U),
        (F, T, T), (F, U, U), (F, F, F),
    ];
    for &(left, right, expected) in &table {
        assert_eq!(left ^ right, expected, "{} XOR {}", left, right);
    }
}

#[test]
fn keywords() {
    assert_eq!(T.to_string(), "TRUE");
    assert_eq!(U.to_string(), "UNKNOWN");
    assert_eq!(F.to_string(), "FALSE");
    assert_eq!(Logical::from(true), T);
    assert_eq!(U.to_bool(), None);
}

#[test]
fn relational_ordering() {
    let less = Value::logical(F).compare_with(CompareOp::Less, &Value::logical(U));
    assert_matches!(less, Ok(Logical::True));

    let equal = Value::logical(U).compare_with(CompareOp::Equal, &Value::logical(U));
    assert_matches!(equal, Ok(Logical::True));

    let mixed = Value::boolean(true).compare_with(CompareOp::Equal, &Value::logical(T));
    assert_matches!(mixed, Ok(Logical::True));

    let greater = Value::logical(T).compare_with(CompareOp::Greater, &Value::boolean(false));
    assert_matches!(greater, Ok(Logical::True));
}

#[test]
fn indeterminate_operands_compare_unknown() {
    let ops = [
        CompareOp::Equal,
        CompareOp::NotEqual,
        CompareOp::InstanceEqual,
        CompareOp::InstanceNotEqual,
        CompareOp::Less,
        CompareOp::LessOrEqual,
        CompareOp::Greater,
        CompareOp::GreaterOrEqual,
    ];
    for &op in &ops {
        let result = Value::logical(T).compare_with(op, &Value::Logical(None));
        assert_matches!(result, Ok(Logical::Unknown), "{}", op.symbol());

        let result = Value::Boolean(None).compare_with(op, &Value::boolean(false));
        assert_matches!(result, Ok(Logical::Unknown), "{}", op.symbol());
    }
}

mod boolean {
    use super::*;

    #[test]
    fn rejects_unknown() {
        let mut target = Value::boolean(true);
        assert_matches!(target.assign(&Value::logical(U)), Err(ValueError::UnknownBoolean));
        assert_eq!(target, Value::boolean(true));

        assert_matches!(Value::logical(U).as_bool(), Err(ValueError::UnknownBoolean));
    }

    #[test]
    fn accepts_determinate_logicals() {
        let mut target = Value::Boolean(None);
        target.assign(&Value::logical(F)).unwrap();
        assert_eq!(target, Value::boolean(false));

        target.assign(&Value::Logical(None)).unwrap();
        assert!(!target.is_determinate());
    }

    #[test]
    fn widens_into_logical() {
        let mut target = Value::Logical(None);
        target.assign(&Value::boolean(true)).unwrap();
        assert_eq!(target, Value::logical(T));
        assert_matches!(target.as_bool(), Ok(true));
    }

    #[test]
    fn indeterminate_condition_reads_unknown() {
        assert_matches!(Value::Boolean(None).to_logical(), Ok(Logical::Unknown));
        assert_matches!(Value::Boolean(None).as_logical(), Err(ValueError::IndeterminateRead(_)));
        assert_matches!(Value::integer(1).to_logical(), Err(ValueError::TypeIncompatibility { .. }));
    }
}
