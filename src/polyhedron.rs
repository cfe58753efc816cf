/*!

Integer polyhedra: `A*x <= b` together with an optional equality system
`E*x == q`, over either literal (`i64`) or symbolic (`MPoly`) right-hand
sides.

The two realizations share every algorithm here (Fourier-Motzkin
elimination, redundancy pruning, emptiness testing) and differ only in how a
single right-hand side is compared against zero; that difference is
factored out into [`BoundOracle`], a small trait with one method per
direction of comparison. There is no need for separate integer/symbolic
polyhedron types beyond the type alias: the equality system `(E, q)` is
just an optional pair of fields on the same type, since a polyhedron with
zero equality rows behaves exactly like one with none.

*/

use std::fmt;

use crate::comparator::{Comparator, LiteralComparator, SymbolicComparator};
use crate::error::PolyError;
use crate::matrix::DenseIMatrix;
use crate::poly::MPoly;
use crate::poset::PartialOrderSet;

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a.abs()
}

/// A right-hand-side value a polyhedron's rows can carry: a literal integer
/// or a symbolic polynomial. Supplies the arithmetic the elimination and
/// pruning routines below need, independent of which it is.
pub trait RhsValue: Clone + fmt::Display {
    fn zero() -> Self;
    fn from_i64(v: i64) -> Self;
    fn scale(&self, k: i64) -> Self;
    fn add_scaled(&self, other: &Self, k: i64) -> Self;
    fn fnmadd(&mut self, other: &Self, factor: i64);
    fn is_zero_value(&self) -> bool;
    fn neg_value(&self) -> Self {
        self.scale(-1)
    }
    fn combine(&self, other: &Self, k_self: i64, k_other: i64) -> Self {
        self.scale(k_self).add_scaled(other, k_other)
    }
    /// `self / g` if that can be computed without losing information
    /// (always for a literal; never for a symbolic polynomial, since
    /// dividing an unevaluated polynomial changes its meaning).
    fn try_floor_div(&self, g: i64) -> Option<Self>;
}

impl RhsValue for i64 {
    fn zero() -> Self {
        0
    }
    fn from_i64(v: i64) -> Self {
        v
    }
    fn scale(&self, k: i64) -> Self {
        self * k
    }
    fn add_scaled(&self, other: &Self, k: i64) -> Self {
        self + other * k
    }
    fn fnmadd(&mut self, other: &Self, factor: i64) {
        *self -= other * factor;
    }
    fn is_zero_value(&self) -> bool {
        *self == 0
    }
    fn try_floor_div(&self, g: i64) -> Option<Self> {
        Some(self.div_euclid(g))
    }
}

impl RhsValue for MPoly {
    fn zero() -> Self {
        MPoly::zero()
    }
    fn from_i64(v: i64) -> Self {
        MPoly::constant(v)
    }
    fn scale(&self, k: i64) -> Self {
        MPoly::scale(self, k)
    }
    fn add_scaled(&self, other: &Self, k: i64) -> Self {
        self + &other.scale(k)
    }
    fn fnmadd(&mut self, other: &Self, factor: i64) {
        MPoly::fnmadd(self, other, factor)
    }
    fn is_zero_value(&self) -> bool {
        self.is_zero()
    }
    fn try_floor_div(&self, _g: i64) -> Option<Self> {
        None
    }
}

/// The CRTP hook translated to a trait: the only thing that differs between
/// an integer and a symbolic polyhedron is how a single right-hand side is
/// compared against zero. Every implementation answers by building the
/// [`Comparator`] that already knows how to read that kind of right-hand
/// side and asking it, rather than re-deciding the sign itself — the
/// elimination and pruning routines above go through this trait alone and
/// never need to know which comparator backs a given polyhedron.
pub trait BoundOracle<T: RhsValue>: Clone {
    fn known_less_equal_zero(&self, x: T) -> bool;
    fn known_greater_equal_zero(&self, x: &T) -> bool;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct IntegerOracle;

impl BoundOracle<i64> for IntegerOracle {
    fn known_less_equal_zero(&self, x: i64) -> bool {
        LiteralComparator.less_equal(&[x])
    }
    fn known_greater_equal_zero(&self, x: &i64) -> bool {
        LiteralComparator.greater_equal(&[*x])
    }
}

#[derive(Clone, Debug)]
pub struct SymbolicOracle {
    pub poset: PartialOrderSet,
}

impl SymbolicOracle {
    fn comparator_for<'a>(&'a self, monomials: Vec<crate::poly::Monomial>) -> SymbolicComparator<'a> {
        SymbolicComparator::new(&self.poset, monomials)
    }
}

impl BoundOracle<MPoly> for SymbolicOracle {
    fn known_less_equal_zero(&self, x: MPoly) -> bool {
        let (vector, monomials) = x.to_coeff_vector();
        self.comparator_for(monomials).less_equal(&vector)
    }
    fn known_greater_equal_zero(&self, x: &MPoly) -> bool {
        let (vector, monomials) = x.to_coeff_vector();
        self.comparator_for(monomials).greater_equal(&vector)
    }
}

/// `A*x <= b`, with an optional `E*x == q`. Rows are constraints, columns
/// are the loop nest's induction/symbolic variables, matching
/// `crate::matrix::DenseIMatrix`'s column-oriented layout (a variable's
/// coefficients across every constraint are one contiguous column, which is
/// exactly what Fourier-Motzkin elimination pivots on).
#[derive(Clone)]
pub struct AbstractPolyhedron<T: RhsValue, O: BoundOracle<T>> {
    a: DenseIMatrix,
    b: Vec<T>,
    e: DenseIMatrix,
    q: Vec<T>,
    oracle: O,
}

pub type IntegerPolyhedron = AbstractPolyhedron<i64, IntegerOracle>;
pub type SymbolicPolyhedron = AbstractPolyhedron<MPoly, SymbolicOracle>;

impl<T: RhsValue, O: BoundOracle<T>> AbstractPolyhedron<T, O> {
    pub fn new(a: DenseIMatrix, b: Vec<T>, e: DenseIMatrix, q: Vec<T>, oracle: O) -> Result<Self, PolyError> {
        if a.num_row() != b.len() {
            return Err(PolyError::InequalityShapeMismatch { a_rows: a.num_row(), b_len: b.len() });
        }
        if e.num_row() != q.len() {
            return Err(PolyError::EqualityShapeMismatch { e_rows: e.num_row(), q_len: q.len() });
        }
        if e.num_row() > 0 && a.num_col() != e.num_col() {
            return Err(PolyError::VariableCountMismatch { a_cols: a.num_col(), e_cols: e.num_col() });
        }
        Ok(AbstractPolyhedron { a, b, e, q, oracle })
    }

    pub fn num_var(&self) -> usize {
        self.a.num_col()
    }

    pub fn num_constraints(&self) -> usize {
        self.a.num_row()
    }

    pub fn num_equality_constraints(&self) -> usize {
        self.e.num_row()
    }

    fn row_is_known_negative(&self, b: &T) -> bool {
        // "0 <= b" is known false, i.e. b <= -1 is known, for integers.
        self.oracle.known_less_equal_zero(b.add_scaled(&T::from_i64(1), 1))
    }

    fn row_is_known_non_negative(&self, b: &T) -> bool {
        self.oracle.known_greater_equal_zero(b)
    }

    fn all_rows(&self) -> (Vec<Vec<i64>>, Vec<T>) {
        let mut rows: Vec<Vec<i64>> = (0..self.a.num_row()).map(|r| self.a.row(r).collect()).collect();
        let mut rhs: Vec<T> = self.b.clone();
        for r in 0..self.e.num_row() {
            let row: Vec<i64> = self.e.row(r).collect();
            let negated: Vec<i64> = row.iter().map(|&v| -v).collect();
            rows.push(row);
            rhs.push(self.q[r].clone());
            rows.push(negated);
            rhs.push(self.q[r].neg_value());
        }
        (rows, rhs)
    }

    /// Combines a "lower" row (`la[i] < 0`) with an "upper" row (`ua[i] >
    /// 0`) via classical Fourier-Motzkin cross elimination of variable `i`,
    /// dividing the result by the gcd of the two pivot coefficients to keep
    /// magnitudes from exploding.
    fn eliminate_pair(la: &[i64], lb: &T, ua: &[i64], ub: &T, i: usize) -> (Vec<i64>, T) {
        let cl = la[i];
        let cu = ua[i];
        debug_assert!(cl < 0 && cu > 0, "eliminate_pair: la[i] must be negative, ua[i] positive");
        let g = gcd(-cl, cu);
        let mul_l = cu / g;
        let mul_u = (-cl) / g;
        let new_row: Vec<i64> = la.iter().zip(ua).map(|(&l, &u)| mul_l * l + mul_u * u).collect();
        let new_rhs = lb.combine(ub, mul_l, mul_u);
        (new_row, new_rhs)
    }

    /// Is this polyhedron's feasible region empty? Eliminates every
    /// variable in turn via Fourier-Motzkin cross products (folding the
    /// equality system in as two inequalities each), and declares emptiness
    /// the moment a fully-eliminated (all-zero-coefficient) row's own
    /// right-hand side is known negative — a direct `0 <= b` contradiction.
    pub fn is_empty(&self) -> bool {
        let (mut rows, mut rhs) = self.all_rows();
        log::trace!("polyhedron: is_empty() starting from {} rows over {} variables", rows.len(), self.num_var());
        for v in 0..self.num_var() {
            let mut lowers = Vec::new();
            let mut uppers = Vec::new();
            let mut kept_rows = Vec::new();
            let mut kept_rhs = Vec::new();
            for (row, b) in rows.into_iter().zip(rhs.into_iter()) {
                match row[v].cmp(&0) {
                    std::cmp::Ordering::Less => lowers.push((row, b)),
                    std::cmp::Ordering::Greater => uppers.push((row, b)),
                    std::cmp::Ordering::Equal => {
                        kept_rows.push(row);
                        kept_rhs.push(b);
                    }
                }
            }
            for (la, lb) in &lowers {
                for (ua, ub) in &uppers {
                    let (new_row, new_rhs) = Self::eliminate_pair(la, lb, ua, ub, v);
                    if new_row.iter().all(|&x| x == 0) {
                        if self.row_is_known_negative(&new_rhs) {
                            log::debug!("polyhedron: variable {v} collapsed to a contradiction, system is empty");
                            return true;
                        }
                    } else {
                        kept_rows.push(new_row);
                        kept_rhs.push(new_rhs);
                    }
                }
            }
            rows = kept_rows;
            rhs = kept_rhs;
        }
        rows.iter().zip(rhs.iter()).any(|(_, b)| self.row_is_known_negative(b))
    }

    /// Is the (literal, integer) point `x` known to satisfy every
    /// inequality and equality in this system?
    pub fn known_satisfied(&self, x: &[i64]) -> bool {
        debug_assert_eq!(x.len(), self.num_var());
        for r in 0..self.a.num_row() {
            let dot: i64 = self.a.row(r).zip(x.iter()).map(|(c, &v)| c * v).sum();
            let slack = self.b[r].add_scaled(&T::from_i64(1), -dot);
            if !self.row_is_known_non_negative(&slack) {
                return false;
            }
        }
        for r in 0..self.e.num_row() {
            let dot: i64 = self.e.row(r).zip(x.iter()).map(|(c, &v)| c * v).sum();
            let diff = self.q[r].add_scaled(&T::from_i64(1), -dot);
            if !diff.is_zero_value() && !(self.row_is_known_non_negative(&diff) && self.oracle.known_less_equal_zero(diff.clone())) {
                return false;
            }
        }
        true
    }

    fn remove_row(&mut self, r: usize) {
        self.a.erase_row(r);
        self.b.remove(r);
    }

    /// Drops rows whose coefficients are all zero and whose right-hand side
    /// is known non-negative: `0 <= b` is then trivially true, so the row
    /// constrains nothing and is safe to discard.
    pub fn drop_trivial_rows(&mut self) {
        let mut r = 0;
        while r < self.a.num_row() {
            let is_zero_row = self.a.row(r).all(|c| c == 0);
            if is_zero_row && self.row_is_known_non_negative(&self.b[r]) {
                self.remove_row(r);
            } else {
                r += 1;
            }
        }
    }

    /// Divides each row's coefficients (and, where the right-hand side is a
    /// literal integer, the right-hand side too) by their gcd, tightening
    /// e.g. `2*i <= 5` to `i <= 2`. Symbolic right-hand sides are left
    /// alone: an unevaluated polynomial cannot be soundly floor-divided.
    pub fn gcd_reduce_rows(&mut self) {
        for r in 0..self.a.num_row() {
            let g = self.a.row(r).fold(0i64, |acc, c| gcd(acc, c));
            if g > 1 {
                if let Some(new_rhs) = self.b[r].try_floor_div(g) {
                    for c in 0..self.a.num_col() {
                        let v = self.a.get(r, c) / g;
                        self.a.set(r, c, v);
                    }
                    self.b[r] = new_rhs;
                }
            }
        }
    }

    /// Drops every constraint implied by the rest of the system: row `r` is
    /// redundant if appending its strict violation (`a_r*x >= b_r + 1`) to
    /// everything else makes the system empty.
    pub fn prune_redundant_constraints(&mut self) {
        let mut r = 0;
        while r < self.a.num_row() {
            let ncols = self.a.num_col();
            let mut cols: Vec<Vec<i64>> = Vec::new();
            let mut rhs: Vec<T> = Vec::new();
            for row in 0..self.a.num_row() {
                if row == r {
                    continue;
                }
                cols.push(self.a.row(row).collect());
                rhs.push(self.b[row].clone());
            }
            let violating_row: Vec<i64> = self.a.row(r).map(|c| -c).collect();
            let violating_rhs = self.b[r].neg_value().add_scaled(&T::from_i64(1), -1);
            cols.push(violating_row);
            rhs.push(violating_rhs);

            let a_rest = DenseIMatrix::from_columns_rowmajor(ncols, &cols);
            let candidate = AbstractPolyhedron {
                a: a_rest,
                b: rhs,
                e: self.e.clone(),
                q: self.q.clone(),
                oracle: self.oracle.clone(),
            };
            if candidate.is_empty() {
                self.remove_row(r);
            } else {
                r += 1;
            }
        }
    }

    /// The full pruning pipeline: drop trivial rows, gcd-reduce what
    /// remains, then drop rows implied by the rest of the system.
    pub fn prune_bounds(&mut self) {
        let before = self.num_constraints();
        self.drop_trivial_rows();
        self.gcd_reduce_rows();
        self.prune_redundant_constraints();
        log::debug!("polyhedron: prune_bounds {before} -> {} constraints", self.num_constraints());
    }

    fn drop_column(&mut self, i: usize) {
        self.a.erase_col(i);
        if self.e.num_col() > 0 {
            self.e.erase_col(i);
        }
    }

    /// Eliminates variable `i` entirely, projecting the polyhedron onto the
    /// remaining variables. If any equality constrains `i`, that equality
    /// is used to eliminate it exactly (Gaussian-style); otherwise `i` is
    /// removed via Fourier-Motzkin cross elimination of the inequalities,
    /// which may increase the row count.
    pub fn remove_variable(&mut self, i: usize) {
        if let Some(pivot) = (0..self.e.num_row()).find(|&r| self.e.get(r, i) != 0) {
            log::trace!("polyhedron: eliminating variable {i} via equality row {pivot}");
            self.eliminate_via_equality(pivot, i);
        } else {
            log::trace!("polyhedron: eliminating variable {i} via Fourier-Motzkin");
            self.eliminate_via_fourier_motzkin(i);
        }
        self.drop_column(i);
        self.prune_bounds();
    }

    fn eliminate_via_equality(&mut self, pivot: usize, i: usize) {
        let mut pivot_row: Vec<i64> = self.e.row(pivot).collect();
        let mut pivot_q = self.q[pivot].clone();
        if pivot_row[i] < 0 {
            pivot_row.iter_mut().for_each(|v| *v = -*v);
            pivot_q = pivot_q.neg_value();
        }
        let cp = pivot_row[i];

        for r in 0..self.e.num_row() {
            if r == pivot {
                continue;
            }
            let cr = self.e.get(r, i);
            if cr == 0 {
                continue;
            }
            let row: Vec<i64> = self.e.row(r).collect();
            let new_row: Vec<i64> = row.iter().zip(&pivot_row).map(|(&a, &p)| cp * a - cr * p).collect();
            let new_q = self.q[r].combine(&pivot_q, cp, -cr);
            for (c, v) in new_row.into_iter().enumerate() {
                self.e.set(r, c, v);
            }
            self.q[r] = new_q;
        }

        for r in 0..self.a.num_row() {
            let cr = self.a.get(r, i);
            if cr == 0 {
                continue;
            }
            let row: Vec<i64> = self.a.row(r).collect();
            let new_row: Vec<i64> = row.iter().zip(&pivot_row).map(|(&a, &p)| cp * a - cr * p).collect();
            let new_b = self.b[r].combine(&pivot_q, cp, -cr);
            for (c, v) in new_row.into_iter().enumerate() {
                self.a.set(r, c, v);
            }
            self.b[r] = new_b;
        }

        self.remove_equality_row(pivot);
    }

    fn remove_equality_row(&mut self, r: usize) {
        self.e.erase_row(r);
        self.q.remove(r);
    }

    fn eliminate_via_fourier_motzkin(&mut self, i: usize) {
        let mut lowers = Vec::new();
        let mut uppers = Vec::new();
        let mut kept_rows = Vec::new();
        let mut kept_rhs = Vec::new();
        for r in 0..self.a.num_row() {
            let row: Vec<i64> = self.a.row(r).collect();
            let b = self.b[r].clone();
            match row[i].cmp(&0) {
                std::cmp::Ordering::Less => lowers.push((row, b)),
                std::cmp::Ordering::Greater => uppers.push((row, b)),
                std::cmp::Ordering::Equal => {
                    kept_rows.push(row);
                    kept_rhs.push(b);
                }
            }
        }
        for (la, lb) in &lowers {
            for (ua, ub) in &uppers {
                let (new_row, new_rhs) = Self::eliminate_pair(la, lb, ua, ub, i);
                kept_rows.push(new_row);
                kept_rhs.push(new_rhs);
            }
        }
        self.a = DenseIMatrix::from_columns_rowmajor(self.a.num_col(), &kept_rows);
        self.b = kept_rhs;
    }
}

impl<T: RhsValue, O: BoundOracle<T>> fmt::Display for AbstractPolyhedron<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.a.num_row() {
            let terms: Vec<String> = self.a.row(r).enumerate().filter(|(_, c)| *c != 0).map(|(v, c)| format!("{}*v{}", c, v)).collect();
            writeln!(f, "{} <= {}", terms.join(" + "), self.b[r])?;
        }
        for r in 0..self.e.num_row() {
            let terms: Vec<String> = self.e.row(r).enumerate().filter(|(_, c)| *c != 0).map(|(v, c)| format!("{}*v{}", c, v)).collect();
            writeln!(f, "{} == {}", terms.join(" + "), self.q[r])?;
        }
        Ok(())
    }
}

impl IntegerPolyhedron {
    pub fn from_inequalities(a: DenseIMatrix, b: Vec<i64>) -> Result<Self, PolyError> {
        let num_var = a.num_col();
        Self::new(a, b, DenseIMatrix::new(0, num_var), Vec::new(), IntegerOracle)
    }

    pub fn with_equalities(a: DenseIMatrix, b: Vec<i64>, e: DenseIMatrix, q: Vec<i64>) -> Result<Self, PolyError> {
        Self::new(a, b, e, q, IntegerOracle)
    }
}

impl SymbolicPolyhedron {
    pub fn from_inequalities(a: DenseIMatrix, b: Vec<MPoly>, poset: PartialOrderSet) -> Result<Self, PolyError> {
        let num_var = a.num_col();
        Self::new(a, b, DenseIMatrix::new(0, num_var), Vec::new(), SymbolicOracle { poset })
    }

    pub fn with_equalities(a: DenseIMatrix, b: Vec<MPoly>, e: DenseIMatrix, q: Vec<MPoly>, poset: PartialOrderSet) -> Result<Self, PolyError> {
        Self::new(a, b, e, q, SymbolicOracle { poset })
    }

    pub fn poset(&self) -> &PartialOrderSet {
        &self.oracle.poset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::ParamId;

    fn int_poly(rows: &[&[i64]], b: Vec<i64>) -> IntegerPolyhedron {
        let ncols = rows[0].len();
        let a = DenseIMatrix::from_columns_rowmajor(ncols, &rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>());
        IntegerPolyhedron::from_inequalities(a, b).unwrap()
    }

    #[test]
    fn empty_system_is_detected() {
        // x <= -1, -x <= -1  (x <= -1 and x >= 1): infeasible.
        let p = int_poly(&[&[1], &[-1]], vec![-1, -1]);
        assert!(p.is_empty());
    }

    #[test]
    fn feasible_system_is_not_empty() {
        // 0 <= x <= 10
        let p = int_poly(&[&[1], &[-1]], vec![10, 0]);
        assert!(!p.is_empty());
    }

    #[test]
    fn known_satisfied_checks_every_row() {
        let p = int_poly(&[&[1], &[-1]], vec![10, 0]);
        assert!(p.known_satisfied(&[5]));
        assert!(!p.known_satisfied(&[11]));
        assert!(!p.known_satisfied(&[-1]));
    }

    #[test]
    fn gcd_reduce_tightens_coefficients() {
        let mut p = int_poly(&[&[2]], vec![5]);
        p.gcd_reduce_rows();
        assert_eq!(p.known_satisfied(&[2]), true);
        assert_eq!(p.known_satisfied(&[3]), false);
    }

    #[test]
    fn redundant_constraint_is_pruned() {
        // x <= 10 and x <= 20: the second is redundant.
        let mut p = int_poly(&[&[1], &[1]], vec![10, 20]);
        p.prune_redundant_constraints();
        assert_eq!(p.num_constraints(), 1);
    }

    #[test]
    fn remove_variable_projects_out_a_dimension() {
        // x + y <= 10, x >= 0, y >= 0; remove x, should still be feasible at y=0.
        let ncols = 2;
        let rows = vec![vec![1, 1], vec![-1, 0], vec![0, -1]];
        let a = DenseIMatrix::from_columns_rowmajor(ncols, &rows);
        let mut p = IntegerPolyhedron::from_inequalities(a, vec![10, 0, 0]).unwrap();
        p.remove_variable(0);
        assert_eq!(p.num_var(), 1);
        assert!(!p.is_empty());
    }

    #[test]
    fn symbolic_polyhedron_uses_poset_for_bound_checks() {
        let poset = PartialOrderSet::with_non_negative_params(&[ParamId(1)]);
        // v0 <= I, I known non-negative, so v0 = 0 should be satisfiable.
        let a = DenseIMatrix::from_columns_rowmajor(1, &[vec![1]]);
        let b = vec![MPoly::from_param(ParamId(1))];
        let p = SymbolicPolyhedron::from_inequalities(a, b, poset).unwrap();
        assert!(!p.is_empty());
    }
}
