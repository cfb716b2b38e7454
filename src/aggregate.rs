
use std::convert::{TryFrom};
use crate::{Value, ValueError, Logical, Equality, Compatibility, Symbol};
use crate::value::{incompatible};
use crate::logic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateKind {
    Array,
    List,
    Bag,
    Set,
}

impl AggregateKind {

    pub fn keyword(self) -> &'static str {
        match self {
            AggregateKind::Array => "ARRAY",
            AggregateKind::List => "LIST",
            AggregateKind::Bag => "BAG",
            AggregateKind::Set => "SET",
        }
    }

    pub fn is_ordered(self) -> bool {
        matches!(self, AggregateKind::Array | AggregateKind::List)
    }
}

/// A closed `[lower:upper]` range; an absent upper bound is the EXPRESS `?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    lower: i64,
    upper: Option<i64>,
}

impl Bounds {

    pub fn new(lower: i64, upper: Option<i64>) -> Self {
        Self { lower, upper }
    }

    pub fn lower(&self) -> i64 {
        self.lower
    }

    pub fn upper(&self) -> Option<i64> {
        self.upper
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.lower && self.upper.map(|upper| value <= upper).unwrap_or(true)
    }
}

impl std::fmt::Display for Bounds {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.upper {
            Some(upper) => write!(fmt, "[{}:{}]", self.lower, upper),
            None => write!(fmt, "[{}:?]", self.lower),
        }
    }
}

/// Result of scanning an aggregate for elements equal to a target.
///
/// `Inconclusive` means no element matched but at least one comparison
/// was `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occurrences {
    Inconclusive,
    Count(usize),
}

impl Occurrences {

    pub fn to_logical(self) -> Logical {
        match self {
            Occurrences::Inconclusive => Logical::Unknown,
            Occurrences::Count(count) => Logical::from(count > 0),
        }
    }
}

/// An EXPRESS aggregate value.
///
/// The element type is kept as an indeterminate prototype value, which also
/// serves as the result of reading outside the index range.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    kind: AggregateKind,
    element: Box<Value>,
    bounds: Bounds,
    optional: bool,
    unique: bool,
    elements: Option<Vec<Value>>,
}

impl Aggregate {

    fn declare(kind: AggregateKind, element: &Value, bounds: Bounds) -> Result<Self, ValueError> {
        if let Some(upper) = bounds.upper {
            if upper < bounds.lower {
                return Err(ValueError::IndexOutOfRange {
                    index: upper,
                    bounds: Bounds::new(bounds.lower, None),
                });
            }
        }
        if kind == AggregateKind::Array && span(bounds).is_none() {
            return Err(ValueError::SizeOutOfRange {
                size: usize::MAX,
                bounds,
            });
        }
        Ok(Self {
            kind,
            element: Box::new(element.indeterminate()),
            bounds,
            optional: false,
            unique: kind == AggregateKind::Set,
            elements: None,
        })
    }

    /// `ARRAY [lower:upper] OF element`, initially indeterminate.
    pub fn array(element: &Value, lower: i64, upper: i64) -> Result<Self, ValueError> {
        Self::declare(AggregateKind::Array, element, Bounds::new(lower, Some(upper)))
    }

    pub fn list(element: &Value, lower: usize, upper: Option<usize>) -> Result<Self, ValueError> {
        Self::declare(AggregateKind::List, element, size_bounds(lower, upper))
    }

    pub fn bag(element: &Value, lower: usize, upper: Option<usize>) -> Result<Self, ValueError> {
        Self::declare(AggregateKind::Bag, element, size_bounds(lower, upper))
    }

    pub fn set(element: &Value, lower: usize, upper: Option<usize>) -> Result<Self, ValueError> {
        Self::declare(AggregateKind::Set, element, size_bounds(lower, upper))
    }

    /// Only an ARRAY may hold indeterminate elements.
    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional && self.kind == AggregateKind::Array;
        self
    }

    /// A SET is always unique and a BAG never is.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = match self.kind {
            AggregateKind::Array | AggregateKind::List => unique,
            AggregateKind::Bag => false,
            AggregateKind::Set => true,
        };
        self
    }

    pub fn with_elements(mut self, values: &[Value]) -> Result<Self, ValueError> {
        self.assign_values(values)?;
        Ok(self)
    }

    pub fn kind(&self) -> AggregateKind {
        self.kind
    }

    pub fn element_type(&self) -> &Value {
        &self.element
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_ordered(&self) -> bool {
        self.kind.is_ordered()
    }

    pub fn is_determinate(&self) -> bool {
        self.elements.is_some()
    }

    pub fn get_lobound(&self) -> Value {
        Value::integer(self.bounds.lower)
    }

    pub fn get_hibound(&self) -> Value {
        Value::Integer(self.bounds.upper)
    }

    pub fn elements(&self) -> Option<&[Value]> {
        self.elements.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> + '_ {
        self.elements.iter().flat_map(|elements| elements.iter())
    }

    /// Number of elements; for an ARRAY this counts indeterminate slots too.
    pub fn len(&self) -> Option<usize> {
        self.elements.as_ref().map(Vec::len)
    }

    /// First valid index: the lower bound for an ARRAY, 1 otherwise.
    pub fn index_base(&self) -> i64 {
        match self.kind {
            AggregateKind::Array => self.bounds.lower,
            _ => 1,
        }
    }

    /// Index range of the current contents.
    pub fn index_bounds(&self) -> Option<Bounds> {
        match self.kind {
            AggregateKind::Array => Some(self.bounds),
            _ => self.len().map(|len| Bounds::new(1, Some(len as i64))),
        }
    }

    fn array_size(&self) -> usize {
        span(self.bounds).unwrap_or(0)
    }

    fn slot(&self, index: i64) -> Option<usize> {
        let len = self.len()? as i64;
        let offset = index.checked_sub(self.index_base())?;
        if offset >= 0 && offset < len { Some(offset as usize) } else { None }
    }

    /// The element at `index`, or the indeterminate sentinel when out of range.
    pub fn get(&self, index: i64) -> &Value {
        match (self.slot(index), &self.elements) {
            (Some(slot), Some(elements)) => &elements[slot],
            _ => &self.element,
        }
    }

    pub fn indeterminate(&self) -> Self {
        Self {
            kind: self.kind,
            element: self.element.clone(),
            bounds: self.bounds,
            optional: self.optional,
            unique: self.unique,
            elements: None,
        }
    }

    pub fn check_compatibility(&self, other: &Aggregate) -> Compatibility {
        let kinds = match (self.kind, other.kind) {
            (target, source) if target == source => Compatibility::Same,
            (AggregateKind::Bag, AggregateKind::Set) => Compatibility::Forward,
            (AggregateKind::Set, AggregateKind::Bag) => Compatibility::Backward,
            _ => return Compatibility::Incompatible,
        };
        match (kinds, self.element.check_compatibility(&other.element)) {
            (_, Compatibility::Incompatible) => Compatibility::Incompatible,
            (Compatibility::Same, elements) => elements,
            (kinds, Compatibility::Same) => kinds,
            (kinds, elements) if kinds == elements => kinds,
            _ => Compatibility::Incompatible,
        }
    }

    fn type_name(&self) -> Symbol {
        Symbol::from(self.kind.keyword())
    }

    fn coerce(&self, value: &Value) -> Result<Value, ValueError> {
        let mut slot = self.element.as_ref().clone();
        slot.assign(value)?;
        Ok(slot)
    }

    fn duplicate_of(&self, candidate: &Value, others: &[&Value]) -> Result<bool, ValueError> {
        if !self.unique || !candidate.is_determinate() {
            return Ok(false);
        }
        for other in others {
            if other.is_equal(candidate, Equality::Instance)?.is_true() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn check_element(&self, index: i64, candidate: &Value, others: &[&Value]) -> Result<(), ValueError> {
        if !self.optional && !candidate.is_determinate() {
            return Err(ValueError::OptionalityViolation { index });
        }
        if self.duplicate_of(candidate, others)? {
            return Err(ValueError::UniquenessViolation {
                element: candidate.to_string().into(),
            });
        }
        Ok(())
    }

    fn stage(&self, values: &[Value]) -> Result<Vec<Value>, ValueError> {
        let mut staged = values
            .iter()
            .map(|value| self.coerce(value))
            .collect::<Result<Vec<_>, _>>()?;
        match self.kind {
            AggregateKind::Array => {
                let size = self.array_size();
                if staged.len() > size {
                    return Err(ValueError::SizeOutOfRange {
                        size: staged.len(),
                        bounds: Bounds::new(size as i64, Some(size as i64)),
                    });
                }
                if staged.len() < size {
                    if !self.optional {
                        return Err(ValueError::OptionalityViolation {
                            index: self.index_base() + staged.len() as i64,
                        });
                    }
                    staged.try_reserve(size - staged.len()).map_err(|_| ValueError::SizeOutOfRange {
                        size,
                        bounds: self.bounds,
                    })?;
                    staged.resize(size, self.element.as_ref().clone());
                }
            },
            _ => {
                if !self.bounds.contains(staged.len() as i64) {
                    return Err(ValueError::SizeOutOfRange {
                        size: staged.len(),
                        bounds: self.bounds,
                    });
                }
            },
        }
        let base = self.index_base();
        for (position, candidate) in staged.iter().enumerate() {
            let earlier: Vec<&Value> = staged[..position].iter().collect();
            self.check_element(base + position as i64, candidate, &earlier)?;
        }
        Ok(staged)
    }

    /// Replaces the contents with `values`, validating all of them first.
    ///
    /// A short element list pads an optional ARRAY with indeterminate slots.
    /// Nothing is changed when validation fails.
    pub fn assign_values(&mut self, values: &[Value]) -> Result<(), ValueError> {
        match self.stage(values) {
            Ok(staged) => {
                self.elements = Some(staged);
                Ok(())
            },
            Err(error) => {

                #[cfg(feature = "tracing")]
                tracing::debug!(aggregate = self.kind.keyword(), %error, "rejected assignment");

                Err(error)
            },
        }
    }

    pub fn assign(&mut self, source: &Aggregate) -> Result<(), ValueError> {
        if self.check_compatibility(source) == Compatibility::Incompatible {
            return Err(ValueError::TypeIncompatibility {
                operation: ":=".into(),
                left: self.type_name(),
                right: source.type_name(),
            });
        }
        match &source.elements {
            Some(elements) => self.assign_values(elements),
            None => {
                self.elements = None;
                Ok(())
            },
        }
    }

    fn contents_mut(&mut self) -> Result<&mut Vec<Value>, ValueError> {
        let name = self.type_name();
        self.elements.as_mut().ok_or(ValueError::IndeterminateRead(name))
    }

    pub fn set_element(&mut self, index: i64, value: &Value) -> Result<(), ValueError> {
        if !self.is_determinate() {
            return Err(ValueError::IndeterminateRead(self.type_name()));
        }
        let slot = match self.slot(index) {
            Some(slot) => slot,
            None => return Err(ValueError::IndexOutOfRange {
                index,
                bounds: self.index_bounds().unwrap_or(self.bounds),
            }),
        };
        let candidate = self.coerce(value)?;
        let others: Vec<&Value> = self
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != slot)
            .map(|(_, element)| element)
            .collect();
        self.check_element(index, &candidate, &others)?;
        self.contents_mut()?[slot] = candidate;
        Ok(())
    }

    fn check_growth(&self, operation: &str, value: &Value) -> Result<usize, ValueError> {
        if self.kind == AggregateKind::Array {
            return Err(ValueError::TypeIncompatibility {
                operation: operation.into(),
                left: self.type_name(),
                right: value.type_name(),
            });
        }
        let len = self.len().ok_or_else(|| ValueError::IndeterminateRead(self.type_name()))?;
        if !self.bounds.contains(len as i64 + 1) {
            return Err(ValueError::SizeOutOfRange {
                size: len + 1,
                bounds: self.bounds,
            });
        }
        Ok(len)
    }

    /// Appends to a LIST, BAG or SET.
    pub fn push(&mut self, value: &Value) -> Result<(), ValueError> {
        let len = self.check_growth("push", value)?;
        let candidate = self.coerce(value)?;
        let others: Vec<&Value> = self.iter().collect();
        self.check_element(len as i64 + 1, &candidate, &others)?;
        self.contents_mut()?.push(candidate);
        Ok(())
    }

    /// Inserts into a LIST so that the new element ends up at `position`.
    pub fn insert(&mut self, position: i64, value: &Value) -> Result<(), ValueError> {
        if self.kind != AggregateKind::List {
            return Err(incompatible("insert", &Value::from(self.indeterminate()), value));
        }
        let len = self.check_growth("insert", value)?;
        if position < 1 || position > len as i64 + 1 {
            return Err(ValueError::IndexOutOfRange {
                index: position,
                bounds: Bounds::new(1, Some(len as i64 + 1)),
            });
        }
        let candidate = self.coerce(value)?;
        let others: Vec<&Value> = self.iter().collect();
        self.check_element(position, &candidate, &others)?;
        self.contents_mut()?.insert((position - 1) as usize, candidate);
        Ok(())
    }

    /// Removes the element at `index` from a LIST, BAG or SET.
    pub fn remove(&mut self, index: i64) -> Result<Value, ValueError> {
        if self.kind == AggregateKind::Array {
            return Err(ValueError::TypeIncompatibility {
                operation: "remove".into(),
                left: self.type_name(),
                right: Symbol::from("INTEGER"),
            });
        }
        let len = self.len().ok_or_else(|| ValueError::IndeterminateRead(self.type_name()))?;
        let slot = self.slot(index).ok_or(ValueError::IndexOutOfRange {
            index,
            bounds: Bounds::new(1, Some(len as i64)),
        })?;
        if !self.bounds.contains(len as i64 - 1) {
            return Err(ValueError::SizeOutOfRange {
                size: len - 1,
                bounds: self.bounds,
            });
        }
        Ok(self.contents_mut()?.remove(slot))
    }

    /// Definite matches and `UNKNOWN` comparisons of `target` against the elements.
    fn scan(&self, target: &Value, equality: Equality) -> Result<Option<(usize, usize)>, ValueError> {
        let elements = match &self.elements {
            Some(elements) => elements,
            None => return Ok(None),
        };
        let (mut matches, mut unknown) = (0, 0);
        for element in elements {
            match element.is_equal(target, equality)? {
                Logical::True => matches += 1,
                Logical::Unknown => unknown += 1,
                Logical::False => (),
            }
        }
        Ok(Some((matches, unknown)))
    }

    /// Counts the elements equal to `target` under the given equality.
    pub fn occurrences(&self, target: &Value, equality: Equality) -> Result<Occurrences, ValueError> {
        Ok(match self.scan(target, equality)? {
            Some((0, unknown)) if unknown > 0 => Occurrences::Inconclusive,
            Some((matches, _)) => Occurrences::Count(matches),
            None => Occurrences::Inconclusive,
        })
    }

    pub fn contains(&self, target: &Value, equality: Equality) -> Result<Logical, ValueError> {
        Ok(self.occurrences(target, equality)?.to_logical())
    }

    pub fn equals(&self, other: &Aggregate, equality: Equality) -> Result<Logical, ValueError> {
        use AggregateKind::*;

        let ordered = match (self.kind, other.kind) {
            (Array, Array) | (List, List) => true,
            (Bag, Bag) | (Set, Set) | (Bag, Set) | (Set, Bag) => false,
            _ => return Err(ValueError::TypeIncompatibility {
                operation: "equality".into(),
                left: self.type_name(),
                right: other.type_name(),
            }),
        };
        let (left, right) = match (&self.elements, &other.elements) {
            (Some(left), Some(right)) => (left, right),
            _ => return Ok(Logical::Unknown),
        };
        if ordered {
            if left.len() != right.len() {
                return Ok(Logical::False);
            }
            let pairs = left
                .iter()
                .zip(right.iter())
                .map(|(left_element, right_element)| left_element.is_equal(right_element, equality))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(logic::all(pairs))
        } else if self.kind == Bag && other.kind == Bag {
            self.equal_counts(other, left, right, equality)
        } else {
            self.mutual_membership(other, left, right, equality)
        }
    }

    /// Bags are equal when every element occurs equally often in both. An
    /// `UNKNOWN` comparison widens a count into a range of possible counts.
    fn equal_counts(
        &self,
        other: &Aggregate,
        left: &[Value],
        right: &[Value],
        equality: Equality,
    ) -> Result<Logical, ValueError> {
        if left.len() != right.len() {
            return Ok(Logical::False);
        }
        let mut result = Logical::True;
        for element in left.iter().chain(right) {
            match (self.scan(element, equality)?, other.scan(element, equality)?) {
                (Some((here, here_unknown)), Some((there, there_unknown))) => {
                    if here + here_unknown < there || there + there_unknown < here {
                        return Ok(Logical::False);
                    }
                    if here_unknown + there_unknown > 0 {
                        result = Logical::Unknown;
                    }
                },
                _ => result = Logical::Unknown,
            }
        }
        Ok(result)
    }

    fn mutual_membership(
        &self,
        other: &Aggregate,
        left: &[Value],
        right: &[Value],
        equality: Equality,
    ) -> Result<Logical, ValueError> {
        let mut result = Logical::True;
        let directions: [(&[Value], &Aggregate); 2] = [(left, other), (right, self)];
        for &(elements, container) in &directions {
            for element in elements {
                match container.occurrences(element, equality)? {
                    Occurrences::Count(0) => return Ok(Logical::False),
                    Occurrences::Inconclusive => result = Logical::Unknown,
                    Occurrences::Count(_) => (),
                }
            }
        }
        Ok(result)
    }
}

/// Element count of `[lower:upper]`; `None` when it does not fit a `usize`.
fn span(bounds: Bounds) -> Option<usize> {
    let upper = bounds.upper?;
    let count = upper.checked_sub(bounds.lower)?.checked_add(1)?;
    usize::try_from(count).ok()
}

fn size_bounds(lower: usize, upper: Option<usize>) -> Bounds {
    Bounds::new(lower as i64, upper.map(|upper| upper as i64))
}

impl std::fmt::Display for Aggregate {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        let elements = match &self.elements {
            Some(elements) => elements,
            None => return fmt.write_str("?"),
        };
        write!(fmt, "[")?;
        let mut first = true;
        for value in elements {
            if first {
                first = false;
                write!(fmt, "{}", value)?;
            } else {
                write!(fmt, ", {}", value)?;
            }
        }
        write!(fmt, "]")?;
        Ok(())
    }
}
