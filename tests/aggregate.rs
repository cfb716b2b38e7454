
use express_types::*;
use assert_matches::{assert_matches};

fn integers(values: &[i64]) -> Vec<Value> {
    values.iter().map(|&value| Value::integer(value)).collect()
}

fn integer_array(lower: i64, upper: i64) -> Aggregate {
    Aggregate::array(&Value::Integer(None), lower, upper).unwrap()
}

fn integer_list(values: &[i64]) -> Aggregate {
    Aggregate::list(&Value::Integer(None), 0, None)
        .unwrap()
        .with_elements(&integers(values))
        .unwrap()
}

fn integer_bag(values: &[i64]) -> Aggregate {
    Aggregate::bag(&Value::Integer(None), 0, None)
        .unwrap()
        .with_elements(&integers(values))
        .unwrap()
}

fn integer_set(values: &[i64]) -> Aggregate {
    Aggregate::set(&Value::Integer(None), 0, None)
        .unwrap()
        .with_elements(&integers(values))
        .unwrap()
}

mod array {
    use super::*;

    #[test]
    fn declaration() {
        let array = integer_array(1, 3);
        assert!(!array.is_determinate());
        assert_eq!(array.kind(), AggregateKind::Array);
        assert_eq!(array.get_lobound(), Value::integer(1));
        assert_eq!(array.get_hibound(), Value::integer(3));
        assert_eq!(array.bounds().to_string(), "[1:3]");
        assert!(array.is_ordered());

        assert_matches!(
            Aggregate::array(&Value::Integer(None), 3, 1),
            Err(ValueError::IndexOutOfRange { index: 1, .. })
        );
    }

    #[test]
    fn extreme_bounds() {
        assert_matches!(
            Aggregate::array(&Value::Integer(None), i64::MIN, i64::MAX),
            Err(ValueError::SizeOutOfRange { .. })
        );
        assert_matches!(
            Aggregate::array(&Value::Integer(None), i64::MIN, 0),
            Err(ValueError::SizeOutOfRange { .. })
        );

        let huge = integer_array(1, i64::MAX).optional(true);
        assert_matches!(huge.with_elements(&[]), Err(ValueError::SizeOutOfRange { .. }));

        let edge = integer_array(i64::MAX - 1, i64::MAX).with_elements(&integers(&[1, 2])).unwrap();
        assert_eq!(edge.get(i64::MAX), &Value::integer(2));
        assert_eq!(edge.get(i64::MIN), &Value::Integer(None));
    }

    #[test]
    fn indexing() {
        let array = integer_array(-1, 1).with_elements(&integers(&[10, 20, 30])).unwrap();
        assert_eq!(array.get(-1), &Value::integer(10));
        assert_eq!(array.get(1), &Value::integer(30));
        assert_eq!(array.get(2), &Value::Integer(None));
        assert_eq!(array.get(-2), &Value::Integer(None));
        assert_eq!(array.len(), Some(3));
    }

    #[test]
    fn short_assignment_is_rejected() {
        let mut array = integer_array(1, 3);
        assert_matches!(
            array.assign_values(&integers(&[1, 2])),
            Err(ValueError::OptionalityViolation { index: 3 })
        );
        assert!(!array.is_determinate());
    }

    #[test]
    fn long_assignment_is_rejected() {
        let mut array = integer_array(1, 3).with_elements(&integers(&[1, 2, 3])).unwrap();
        assert_matches!(
            array.assign_values(&integers(&[1, 2, 3, 4])),
            Err(ValueError::SizeOutOfRange { size: 4, .. })
        );
        assert_eq!(array.get(3), &Value::integer(3));
    }

    #[test]
    fn optional_slots() {
        let array = integer_array(0, 2)
            .optional(true)
            .with_elements(&integers(&[5]))
            .unwrap();
        assert_eq!(array.len(), Some(3));
        assert_eq!(array.get(0), &Value::integer(5));
        assert!(!array.get(2).is_determinate());
        assert_eq!(array.to_string(), "[5, ?, ?]");
    }

    #[test]
    fn indeterminate_element_in_mandatory_array() {
        let mut array = integer_array(1, 2);
        let values = vec![Value::integer(1), Value::Integer(None)];
        assert_matches!(
            array.assign_values(&values),
            Err(ValueError::OptionalityViolation { index: 2 })
        );
    }

    #[test]
    fn unique_elements() {
        let mut array = integer_array(1, 3).unique(true);
        assert_matches!(
            array.assign_values(&integers(&[1, 2, 1])),
            Err(ValueError::UniquenessViolation { .. })
        );
        assert!(!array.is_determinate());

        let mut reals = Aggregate::array(&Value::Real(Real::indeterminate()), 1, 2).unwrap().unique(true);
        let values = vec![Value::real(1.0), Value::integer(1)];
        assert_matches!(reals.assign_values(&values), Err(ValueError::UniquenessViolation { .. }));
    }

    #[test]
    fn unique_ignores_indeterminate_slots() {
        let array = integer_array(1, 3)
            .optional(true)
            .unique(true)
            .with_elements(&integers(&[1]))
            .unwrap();
        assert_eq!(array.len(), Some(3));
    }

    #[test]
    fn elements_are_coerced() {
        let array = Aggregate::array(&Value::Real(Real::indeterminate_with_precision(4)), 1, 2)
            .unwrap()
            .with_elements(&integers(&[1, 2]))
            .unwrap();
        assert_matches!(array.get(1), Value::Real(real) if real.precision() == 4);

        let mut array = integer_array(1, 1);
        assert_matches!(
            array.assign_values(&[Value::string("one")]),
            Err(ValueError::TypeIncompatibility { .. })
        );
    }

    #[test]
    fn set_element() {
        let mut array = integer_array(1, 3)
            .unique(true)
            .with_elements(&integers(&[1, 2, 3]))
            .unwrap();

        array.set_element(2, &Value::integer(9)).unwrap();
        assert_eq!(array.get(2), &Value::integer(9));

        array.set_element(1, &Value::integer(1)).unwrap();

        assert_matches!(
            array.set_element(4, &Value::integer(4)),
            Err(ValueError::IndexOutOfRange { index: 4, .. })
        );
        assert_matches!(
            array.set_element(1, &Value::Integer(None)),
            Err(ValueError::OptionalityViolation { index: 1 })
        );
        assert_matches!(
            array.set_element(1, &Value::integer(3)),
            Err(ValueError::UniquenessViolation { .. })
        );
        assert_eq!(array.to_string(), "[1, 9, 3]");
    }

    #[test]
    fn set_element_on_indeterminate() {
        let mut array = integer_array(1, 2);
        assert_matches!(
            array.set_element(1, &Value::integer(1)),
            Err(ValueError::IndeterminateRead(_))
        );
    }

    #[test]
    fn growth_is_not_allowed() {
        let mut array = integer_array(1, 1).with_elements(&integers(&[1])).unwrap();
        assert_matches!(array.push(&Value::integer(2)), Err(ValueError::TypeIncompatibility { .. }));
        assert_matches!(array.remove(1), Err(ValueError::TypeIncompatibility { .. }));
    }

    #[test]
    fn nested() {
        let row = Aggregate::array(&Value::Integer(None), 1, 2).unwrap();
        let rows = vec![
            Value::from(row.clone().with_elements(&integers(&[1, 2])).unwrap()),
            Value::from(row.clone().with_elements(&integers(&[3, 4])).unwrap()),
        ];
        let matrix = Aggregate::array(&Value::from(row), 1, 2)
            .unwrap()
            .with_elements(&rows)
            .unwrap();
        assert_eq!(matrix.to_string(), "[[1, 2], [3, 4]]");

        let short_row = Aggregate::array(&Value::Integer(None), 1, 1)
            .unwrap()
            .with_elements(&integers(&[5]))
            .unwrap();
        let mut matrix = matrix;
        assert_matches!(
            matrix.set_element(1, &Value::from(short_row)),
            Err(ValueError::OptionalityViolation { .. })
        );
    }
}

mod occurrences {
    use super::*;

    #[test]
    fn counts_matches() {
        let array = integer_array(1, 3).with_elements(&integers(&[1, 2, 1])).unwrap();
        assert_matches!(
            array.occurrences(&Value::integer(1), Equality::Value),
            Ok(Occurrences::Count(2))
        );
        assert_matches!(
            array.occurrences(&Value::real(2.0), Equality::Value),
            Ok(Occurrences::Count(1))
        );
        assert_matches!(
            array.occurrences(&Value::integer(5), Equality::Value),
            Ok(Occurrences::Count(0))
        );
    }

    #[test]
    fn unknown_comparisons_are_inconclusive() {
        let array = integer_array(1, 3)
            .optional(true)
            .with_elements(&integers(&[1]))
            .unwrap();
        assert_matches!(
            array.occurrences(&Value::integer(5), Equality::Instance),
            Ok(Occurrences::Inconclusive)
        );
        assert_matches!(
            array.occurrences(&Value::integer(1), Equality::Instance),
            Ok(Occurrences::Count(1))
        );
        assert_eq!(Occurrences::Inconclusive.to_logical(), Logical::Unknown);
    }

    #[test]
    fn indeterminate_aggregate() {
        let array = integer_array(1, 3);
        assert_matches!(array.contains(&Value::integer(1), Equality::Value), Ok(Logical::Unknown));
    }

    #[test]
    fn incompatible_element_type() {
        let array = integer_array(1, 1).with_elements(&integers(&[1])).unwrap();
        assert_matches!(
            array.occurrences(&Value::string("1"), Equality::Value),
            Err(ValueError::TypeIncompatibility { .. })
        );
    }
}

mod list {
    use super::*;

    #[test]
    fn size_bounds() {
        let mut list = Aggregate::list(&Value::Integer(None), 1, Some(2))
            .unwrap()
            .with_elements(&integers(&[1]))
            .unwrap();
        list.push(&Value::integer(2)).unwrap();
        assert_matches!(
            list.push(&Value::integer(3)),
            Err(ValueError::SizeOutOfRange { size: 3, .. })
        );
        list.remove(1).unwrap();
        assert_matches!(list.remove(1), Err(ValueError::SizeOutOfRange { size: 0, .. }));
        assert_eq!(list.to_string(), "[2]");

        let empty = Aggregate::list(&Value::Integer(None), 1, None).unwrap();
        assert_matches!(empty.with_elements(&[]), Err(ValueError::SizeOutOfRange { size: 0, .. }));
    }

    #[test]
    fn insert_and_remove() {
        let mut list = integer_list(&[1, 3]);
        list.insert(2, &Value::integer(2)).unwrap();
        list.insert(4, &Value::integer(4)).unwrap();
        assert_eq!(list.to_string(), "[1, 2, 3, 4]");
        assert_eq!(list.index_bounds(), Some(Bounds::new(1, Some(4))));

        assert_matches!(
            list.insert(6, &Value::integer(6)),
            Err(ValueError::IndexOutOfRange { index: 6, .. })
        );
        assert_eq!(list.remove(1).unwrap(), Value::integer(1));
        assert_eq!(list.get(1), &Value::integer(2));
        assert_matches!(list.remove(9), Err(ValueError::IndexOutOfRange { index: 9, .. }));
    }

    #[test]
    fn unique_list() {
        let mut list = Aggregate::list(&Value::Integer(None), 0, None)
            .unwrap()
            .unique(true)
            .with_elements(&integers(&[1, 2]))
            .unwrap();
        assert_matches!(list.push(&Value::integer(1)), Err(ValueError::UniquenessViolation { .. }));
        assert_matches!(list.insert(1, &Value::integer(2)), Err(ValueError::UniquenessViolation { .. }));
        assert_eq!(list.len(), Some(2));
    }

    #[test]
    fn no_indeterminate_elements() {
        let mut list = integer_list(&[]).optional(true);
        assert!(!list.is_optional());
        assert_matches!(
            list.push(&Value::Integer(None)),
            Err(ValueError::OptionalityViolation { index: 1 })
        );
    }

    #[test]
    fn insert_only_on_lists() {
        let mut bag = integer_bag(&[1]);
        assert_matches!(bag.insert(1, &Value::integer(2)), Err(ValueError::TypeIncompatibility { .. }));
    }

    #[test]
    fn pairwise_equality() {
        let list = integer_list(&[1, 2]);
        assert_matches!(list.equals(&integer_list(&[1, 2]), Equality::Value), Ok(Logical::True));
        assert_matches!(list.equals(&integer_list(&[2, 1]), Equality::Value), Ok(Logical::False));
        assert_matches!(list.equals(&integer_list(&[1, 2, 3]), Equality::Value), Ok(Logical::False));
        assert_matches!(
            list.equals(&integer_array(1, 2).with_elements(&integers(&[1, 2])).unwrap(), Equality::Value),
            Err(ValueError::TypeIncompatibility { .. })
        );
    }
}

mod bag_and_set {
    use super::*;

    #[test]
    fn bag_counts() {
        let bag = integer_bag(&[1, 1, 2]);
        assert_matches!(bag.equals(&integer_bag(&[1, 2, 1]), Equality::Value), Ok(Logical::True));
        assert_matches!(bag.equals(&integer_bag(&[1, 2, 2]), Equality::Value), Ok(Logical::False));
        assert_matches!(bag.equals(&integer_bag(&[1, 2]), Equality::Value), Ok(Logical::False));
        assert!(!bag.is_unique());
    }

    fn pair(second: Option<i64>) -> Value {
        let mut values = integers(&[1]);
        values.extend(second.map(Value::integer));
        Value::from(integer_array(1, 2).optional(true).with_elements(&values).unwrap())
    }

    fn bag_of_pairs(pairs: &[Value]) -> Aggregate {
        let prototype = Value::from(integer_array(1, 2).optional(true));
        Aggregate::bag(&prototype, 0, None).unwrap().with_elements(pairs).unwrap()
    }

    #[test]
    fn bag_counts_with_unknown_comparisons() {
        let known = pair(Some(2));
        let partial = pair(None);
        let bag = bag_of_pairs(&[known.clone(), partial.clone()]);

        let twice = bag_of_pairs(&[known.clone(), known.clone()]);
        assert_matches!(bag.equals(&twice, Equality::Value), Ok(Logical::Unknown));

        let other = pair(Some(3));
        let others = bag_of_pairs(&[other.clone(), other]);
        assert_matches!(bag.equals(&others, Equality::Value), Ok(Logical::False));

        let same = bag_of_pairs(&[partial, known]);
        assert_matches!(bag.equals(&same, Equality::Value), Ok(Logical::Unknown));
    }

    #[test]
    fn set_uniqueness() {
        let set = Aggregate::set(&Value::Integer(None), 0, None).unwrap().unique(false);
        assert!(set.is_unique());
        assert_matches!(
            set.with_elements(&integers(&[1, 1])),
            Err(ValueError::UniquenessViolation { .. })
        );

        let mut set = integer_set(&[1, 2]);
        assert_matches!(set.push(&Value::integer(2)), Err(ValueError::UniquenessViolation { .. }));
        set.push(&Value::integer(3)).unwrap();
        assert_eq!(set.len(), Some(3));
    }

    #[test]
    fn set_membership() {
        let set = integer_set(&[1, 2, 3]);
        assert_matches!(set.equals(&integer_set(&[3, 1, 2]), Equality::Value), Ok(Logical::True));
        assert_matches!(set.equals(&integer_set(&[1, 2]), Equality::Value), Ok(Logical::False));
    }

    #[test]
    fn bag_against_set() {
        let set = integer_set(&[1, 2]);
        assert_matches!(set.equals(&integer_bag(&[2, 1, 2]), Equality::Value), Ok(Logical::True));
        assert_matches!(integer_bag(&[1, 1]).equals(&set, Equality::Value), Ok(Logical::False));
    }

    #[test]
    fn indeterminate_side_is_unknown() {
        let bag = Aggregate::bag(&Value::Integer(None), 0, None).unwrap();
        assert_matches!(bag.equals(&integer_bag(&[1]), Equality::Value), Ok(Logical::Unknown));
    }

    #[test]
    fn assignment_from_other_kinds() {
        let mut bag = Value::from(Aggregate::bag(&Value::Real(Real::indeterminate()), 0, None).unwrap());
        bag.assign(&Value::from(integer_set(&[1, 2]))).unwrap();
        assert_eq!(bag.to_string(), "[1.0, 2.0]");

        let mut set = Value::from(Aggregate::set(&Value::Integer(None), 0, None).unwrap());
        assert_matches!(
            set.assign(&Value::from(integer_bag(&[1, 1]))),
            Err(ValueError::UniquenessViolation { .. })
        );
        assert!(!set.is_determinate());

        assert_matches!(
            set.assign(&Value::from(integer_list(&[1]))),
            Err(ValueError::TypeIncompatibility { .. })
        );
    }
}

#[test]
fn array_assignment_from_array() {
    let source = Value::from(integer_array(1, 3).with_elements(&integers(&[1, 2, 3])).unwrap());

    let mut reals = Value::from(Aggregate::array(&Value::Real(Real::indeterminate()), 1, 3).unwrap());
    reals.assign(&source).unwrap();
    assert_eq!(reals.to_string(), "[1.0, 2.0, 3.0]");

    let mut short = Value::from(integer_array(1, 2));
    assert_matches!(short.assign(&source), Err(ValueError::SizeOutOfRange { size: 3, .. }));

    let mut strings = Value::from(Aggregate::array(&Value::String(Text::default()), 1, 3).unwrap());
    assert_matches!(strings.assign(&source), Err(ValueError::TypeIncompatibility { .. }));
}

#[test]
fn aggregate_value_equality() {
    let left = Value::from(integer_array(1, 2).with_elements(&integers(&[1, 2])).unwrap());
    let right = Value::from(integer_array(1, 2).with_elements(&integers(&[1, 2])).unwrap());
    assert_matches!(left.compare_with(CompareOp::Equal, &right), Ok(Logical::True));
    assert_matches!(left.compare_with(CompareOp::InstanceNotEqual, &right), Ok(Logical::False));
    assert_matches!(left.compare_with(CompareOp::Less, &right), Err(ValueError::TypeIncompatibility { .. }));
    assert_matches!(left.is_equal(&Value::integer(1), Equality::Value), Err(ValueError::TypeIncompatibility { .. }));
}

#[test]
fn type_identity() {
    let value = Value::from(integer_set(&[]));
    assert_eq!(value.type_name(), Symbol::from("SET"));
    assert!(value.is_parent_type("AGGREGATE"));
    assert!(!value.indeterminate().is_determinate());
}
