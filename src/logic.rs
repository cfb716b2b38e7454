
use std::ops::{Not, BitAnd, BitOr, BitXor};

/// The EXPRESS LOGICAL value space.
///
/// Variants are declared in the standard's ordering, `FALSE < UNKNOWN < TRUE`,
/// so the derived `Ord` is the relational ordering of LOGICAL values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Logical {
    False,
    Unknown,
    True,
}

impl Logical {

    pub fn is_true(self) -> bool {
        self == Logical::True
    }

    pub fn is_false(self) -> bool {
        self == Logical::False
    }

    pub fn is_unknown(self) -> bool {
        self == Logical::Unknown
    }

    pub fn to_bool(self) -> Option<bool> {
        match self {
            Logical::True => Some(true),
            Logical::False => Some(false),
            Logical::Unknown => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Logical::True => "TRUE",
            Logical::False => "FALSE",
            Logical::Unknown => "UNKNOWN",
        }
    }
}

impl From<bool> for Logical {

    fn from(value: bool) -> Self {
        if value { Logical::True } else { Logical::False }
    }
}

impl Not for Logical {
    type Output = Logical;

    fn not(self) -> Logical {
        match self {
            Logical::True => Logical::False,
            Logical::Unknown => Logical::Unknown,
            Logical::False => Logical::True,
        }
    }
}

impl BitAnd for Logical {
    type Output = Logical;

    fn bitand(self, other: Logical) -> Logical {
        match (self, other) {
            (Logical::False, _) | (_, Logical::False) => Logical::False,
            (Logical::Unknown, _) | (_, Logical::Unknown) => Logical::Unknown,
            (Logical::True, Logical::True) => Logical::True,
        }
    }
}

impl BitOr for Logical {
    type Output = Logical;

    fn bitor(self, other: Logical) -> Logical {
        match (self, other) {
            (Logical::True, _) | (_, Logical::True) => Logical::True,
            (Logical::Unknown, _) | (_, Logical::Unknown) => Logical::Unknown,
            (Logical::False, Logical::False) => Logical::False,
        }
    }
}

impl BitXor for Logical {
    type Output = Logical;

    fn bitxor(self, other: Logical) -> Logical {
        match (self, other) {
            (Logical::Unknown, _) | (_, Logical::Unknown) => Logical::Unknown,
            (left, right) => Logical::from(left != right),
        }
    }
}

impl std::fmt::Display for Logical {

    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(self.keyword())
    }
}

/// Folds a sequence of LOGICAL results with `AND`, stopping at the first `FALSE`.
pub fn all<I>(results: I) -> Logical
where
    I: IntoIterator<Item = Logical>,
{
    let mut folded = Logical::True;
    for result in results {
        folded = folded & result;
        if folded.is_false() {
            break;
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Logical; 3] = [Logical::True, Logical::Unknown, Logical::False];

    #[test]
    fn operators_are_commutative() {
        for &left in &ALL {
            for &right in &ALL {
                assert_eq!(left & right, right & left);
                assert_eq!(left | right, right | left);
                assert_eq!(left ^ right, right ^ left);
            }
        }
    }

    #[test]
    fn fold_short_circuits_on_false() {
        assert_eq!(all(vec![Logical::Unknown, Logical::False, Logical::True]), Logical::False);
        assert_eq!(all(vec![Logical::Unknown, Logical::True]), Logical::Unknown);
        assert_eq!(all(Vec::new()), Logical::True);
    }
}
