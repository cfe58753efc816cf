/*!

The comparator protocol: a single family of sign queries over a coefficient
vector `[c0, c1, ..., cm]`, read as the affine value `c0 + c1*v1 + ... +
cm*vm`. `c0` is always the constant term.

Every comparator need only answer `greater_equal` (and, as an optimization,
`greater_equal_pair`); every other query (`less`, `equal`, `equal_negative`,
bounded forms, ...) is derived from it by negating or shifting the constant
term via default trait methods. `EmptyComparator` and `LiteralComparator`
override every query directly instead, because for them the derived forms
would be either wrong (`EmptyComparator` is "everything is both true and
false") or wastefully indirect (`LiteralComparator` can just compare
integers).

*/

use crate::poly::MPoly;
use crate::poset::PartialOrderSet;

fn negate(x: &[i64]) -> Vec<i64> {
    x.iter().map(|&v| -v).collect()
}

fn sub(x: &[i64], y: &[i64]) -> Vec<i64> {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).map(|(&a, &b)| a - b).collect()
}

fn add(x: &[i64], y: &[i64]) -> Vec<i64> {
    debug_assert_eq!(x.len(), y.len());
    x.iter().zip(y).map(|(&a, &b)| a + b).collect()
}

/// Unifies literal-integer and symbolic-parameter sign queries behind one
/// interface so that a single Fourier-Motzkin-elimination routine
/// (`crate::polyhedron`) can be written against any comparator.
pub trait Comparator {
    /// Number of entries in a coefficient vector this comparator accepts,
    /// including the leading constant column.
    fn num_constant_terms(&self) -> usize;

    /// Is `c0 + c1*v1 + ... >= 0` known?
    fn greater_equal(&self, x: &[i64]) -> bool;

    /// Is `(x - y) >= 0` known? The default subtracts and delegates to
    /// [`Self::greater_equal`]; override when the comparator can build the
    /// difference more directly (e.g. without allocating).
    fn greater_equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        self.greater_equal(&sub(x, y))
    }

    fn greater(&self, x: &[i64]) -> bool {
        let mut y = x.to_vec();
        y[0] -= 1;
        self.greater_equal(&y)
    }

    fn greater_pair(&self, x: &[i64], y: &[i64]) -> bool {
        let mut delta = sub(x, y);
        delta[0] -= 1;
        self.greater_equal(&delta)
    }

    fn less(&self, x: &[i64]) -> bool {
        self.greater(&negate(x))
    }

    fn less_pair(&self, x: &[i64], y: &[i64]) -> bool {
        self.greater_pair(y, x)
    }

    fn less_equal(&self, x: &[i64]) -> bool {
        self.greater_equal(&negate(x))
    }

    fn less_equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        self.greater_equal_pair(y, x)
    }

    fn equal(&self, x: &[i64]) -> bool {
        x.iter().all(|&v| v == 0) || (self.greater_equal(x) && self.less_equal(x))
    }

    fn equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x == y || (self.greater_equal_pair(x, y) && self.greater_equal_pair(y, x))
    }

    /// Is `x + y == 0` known? Used to detect that two opposite-facing array
    /// subscripts cancel exactly.
    fn equal_negative_pair(&self, x: &[i64], y: &[i64]) -> bool {
        if x.iter().zip(y).all(|(&a, &b)| a + b == 0) {
            return true;
        }
        self.equal(&add(x, y))
    }

    /// Is `c0 + c1*v1 + ... <= k` known?
    fn less_equal_const(&self, x: &[i64], k: i64) -> bool {
        let mut y = x.to_vec();
        y[0] -= k;
        self.less_equal(&y)
    }
}

/// A comparator with no information at all: every query it is asked, it
/// answers both ways at once (sound only because the caller must already
/// treat "don't know" as the conservative default; this type exists for
/// code paths that genuinely have no comparator to hand, not as a shortcut).
#[derive(Copy, Clone, Debug, Default)]
pub struct EmptyComparator;

impl Comparator for EmptyComparator {
    fn num_constant_terms(&self) -> usize {
        0
    }
    fn greater_equal(&self, _x: &[i64]) -> bool {
        true
    }
    fn greater_equal_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn greater(&self, _x: &[i64]) -> bool {
        true
    }
    fn greater_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn less(&self, _x: &[i64]) -> bool {
        true
    }
    fn less_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn less_equal(&self, _x: &[i64]) -> bool {
        true
    }
    fn less_equal_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn equal(&self, _x: &[i64]) -> bool {
        true
    }
    fn equal_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn equal_negative_pair(&self, _x: &[i64], _y: &[i64]) -> bool {
        true
    }
    fn less_equal_const(&self, _x: &[i64], _k: i64) -> bool {
        true
    }
}

/// A comparator over coefficient vectors with a single entry: the constant
/// term. Every query is a direct integer comparison.
#[derive(Copy, Clone, Debug, Default)]
pub struct LiteralComparator;

impl Comparator for LiteralComparator {
    fn num_constant_terms(&self) -> usize {
        1
    }
    fn greater_equal(&self, x: &[i64]) -> bool {
        x[0] >= 0
    }
    fn greater_equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] >= y[0]
    }
    fn greater(&self, x: &[i64]) -> bool {
        x[0] > 0
    }
    fn greater_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] > y[0]
    }
    fn less(&self, x: &[i64]) -> bool {
        x[0] < 0
    }
    fn less_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] < y[0]
    }
    fn less_equal(&self, x: &[i64]) -> bool {
        x[0] <= 0
    }
    fn less_equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] <= y[0]
    }
    fn equal(&self, x: &[i64]) -> bool {
        x[0] == 0
    }
    fn equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] == y[0]
    }
    fn equal_negative_pair(&self, x: &[i64], y: &[i64]) -> bool {
        x[0] + y[0] == 0
    }
    fn less_equal_const(&self, x: &[i64], k: i64) -> bool {
        x[0] <= k
    }
}

/// A comparator over coefficient vectors `[c0, c1, ..., cm]` read against a
/// fixed list of symbolic monomials, `c0 + sum(c_i * monomials[i-1])`,
/// backed by a [`PartialOrderSet`]. Only `greater_equal` and
/// `greater_equal_pair` are overridden; everything else comes from the
/// [`Comparator`] trait's default derivations.
pub struct SymbolicComparator<'a> {
    poset: &'a PartialOrderSet,
    monomials: Vec<crate::poly::Monomial>,
}

impl<'a> SymbolicComparator<'a> {
    pub fn new(poset: &'a PartialOrderSet, monomials: Vec<crate::poly::Monomial>) -> Self {
        SymbolicComparator { poset, monomials }
    }

    pub fn to_poly(&self, x: &[i64]) -> MPoly {
        debug_assert_eq!(x.len(), self.monomials.len() + 1);
        let mut poly = MPoly::constant(x[0]);
        for (coeff, monomial) in x[1..].iter().zip(&self.monomials) {
            poly.add_term(*coeff, monomial.clone());
        }
        poly
    }
}

impl<'a> Comparator for SymbolicComparator<'a> {
    fn num_constant_terms(&self) -> usize {
        self.monomials.len() + 1
    }

    fn greater_equal(&self, x: &[i64]) -> bool {
        self.poset.known_greater_equal_zero(&self.to_poly(x))
    }

    fn greater_equal_pair(&self, x: &[i64], y: &[i64]) -> bool {
        let delta = sub(x, y);
        self.poset.known_greater_equal_zero(&self.to_poly(&delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::{Monomial, ParamId};

    #[test]
    fn empty_comparator_is_always_true() {
        let c = EmptyComparator;
        assert!(c.greater_equal(&[-5]));
        assert!(c.less(&[-5]));
        assert!(c.equal(&[7]));
    }

    #[test]
    fn literal_comparator_reads_the_constant_column() {
        let c = LiteralComparator;
        assert!(c.greater_equal(&[0]));
        assert!(!c.greater_equal(&[-1]));
        assert!(c.greater(&[1]));
        assert!(!c.greater(&[0]));
        assert!(c.equal(&[0]));
        assert!(c.equal_negative_pair(&[3], &[-3]));
    }

    #[test]
    fn literal_comparator_derivations_agree_with_direct_forms() {
        // less/less_equal/equal use the trait's default derivation chain
        // for any hypothetical comparator that didn't override them; verify
        // the derivation is consistent by checking it against the override.
        struct Derived;
        impl Comparator for Derived {
            fn num_constant_terms(&self) -> usize {
                1
            }
            fn greater_equal(&self, x: &[i64]) -> bool {
                x[0] >= 0
            }
        }
        let d = Derived;
        let lit = LiteralComparator;
        for v in -3..=3 {
            assert_eq!(d.less(&[v]), lit.less(&[v]));
            assert_eq!(d.less_equal(&[v]), lit.less_equal(&[v]));
            assert_eq!(d.greater(&[v]), lit.greater(&[v]));
            assert_eq!(d.equal(&[v]), lit.equal(&[v]));
        }
    }

    #[test]
    fn symbolic_comparator_defers_to_poset() {
        let mut poset = PartialOrderSet::new();
        poset.push(0, 1, crate::interval::Interval::non_negative());
        let monomials = vec![Monomial::single(ParamId(1))];
        let cmp = SymbolicComparator::new(&poset, monomials);
        // c0=0, c1=1: the polynomial I, known non-negative.
        assert!(cmp.greater_equal(&[0, 1]));
        // I - 1 >= 0 is not known.
        assert!(!cmp.greater_equal(&[-1, 1]));
    }
}
