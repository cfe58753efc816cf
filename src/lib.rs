/*!
A symbolic integer polyhedral reasoning engine for loop-nest dependence
analysis.

A loop-nest compiler needs to answer one recurring question: given two
(possibly symbolic) affine bounds on array subscripts and loop indices, can
they ever be equal, and if so, in which direction does the dependence run?
This crate provides the three layers that question is built from:

- [`poset`]: a partially-ordered set over symbolic loop parameters (tile
  sizes, problem dimensions, anything not known until runtime), recording
  what is known about the *difference* between any two of them and keeping
  that knowledge closed under transitivity.
- [`polyhedron`]: an abstract integer polyhedron, `A*x <= b` with an
  optional `E*x == q`, supporting Fourier-Motzkin variable elimination,
  redundant-constraint pruning, and emptiness testing, over either literal
  or symbolic right-hand sides.
- [`comparator`]: the query surface ("is this affine combination known
  non-negative?") that unifies literal and symbolic reasoning behind one
  interface, so the polyhedron's elimination routines don't need to care
  which kind of bound they're looking at.

# Example

A loop runs from `0` to a symbolic upper bound `n`; is `i + 1 <= n` known
whenever `0 <= i < n`?

```
use polyhedra::matrix::DenseIMatrix;
use polyhedra::poly::{MPoly, ParamId};
use polyhedra::poset::PartialOrderSet;
use polyhedra::polyhedron::SymbolicPolyhedron;

let n = ParamId(1);
let poset = PartialOrderSet::with_non_negative_params(&[n]);

// 0 <= i, i <= n - 1  (i.e. i < n)
let a = DenseIMatrix::from_columns_rowmajor(1, &[vec![-1], vec![1]]);
let b = vec![MPoly::constant(0), MPoly::from_param(n) - 1];
let polyhedron = SymbolicPolyhedron::from_inequalities(a, b, poset).unwrap();

assert!(!polyhedron.is_empty());
```

# Scope

This crate answers dependence questions about affine loop bounds and array
subscripts. It does not build the loop-nest intermediate representation, the
array-reference/schedule model, or the scheduler that would sit on top of
it; those are external collaborators that hand this crate a coefficient
matrix and ask whether the resulting polyhedron is empty. It is also
sound-incomplete by design: every query either returns a certain answer or
(conservatively) "unknown," never a wrong answer, and it implements no
Farkas-lemma witness extraction, no convex hull or polyhedral projection
beyond Fourier-Motzkin, and no modular/divisibility reasoning.
*/

pub mod bipartite;
pub mod comparator;
pub mod error;
pub mod interval;
pub mod matrix;
pub mod poly;
pub mod poset;
pub mod polyhedron;

pub use comparator::Comparator;
pub use error::PolyError;
pub use interval::Interval;
pub use poly::{MPoly, Monomial, ParamId, Term, VarKind};
pub use poset::PartialOrderSet;
pub use polyhedron::{AbstractPolyhedron, IntegerPolyhedron, SymbolicPolyhedron};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DenseIMatrix;

    #[test]
    fn loop_bound_implies_strict_upper_bound() {
        let n = ParamId(1);
        let poset = PartialOrderSet::with_non_negative_params(&[n]);
        let a = DenseIMatrix::from_columns_rowmajor(1, &[vec![-1], vec![1]]);
        let b = vec![MPoly::constant(0), MPoly::from_param(n) - 1];
        let polyhedron = SymbolicPolyhedron::from_inequalities(a, b, poset).unwrap();
        assert!(!polyhedron.is_empty());
    }

    #[test]
    fn infeasible_symbolic_region_is_empty() {
        // i <= n - 1 and i >= n: infeasible regardless of n's value.
        let n = ParamId(1);
        let poset = PartialOrderSet::with_non_negative_params(&[n]);
        let a = DenseIMatrix::from_columns_rowmajor(1, &[vec![1], vec![-1]]);
        let b = vec![MPoly::from_param(n) - 1, -MPoly::from_param(n)];
        let polyhedron = SymbolicPolyhedron::from_inequalities(a, b, poset).unwrap();
        assert!(polyhedron.is_empty());
    }
}
