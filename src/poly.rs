/*!

Symbolic parameters, monomials, and polynomials over them.

A [`Monomial`] is a product of [`ParamId`]s, a [`Term`] pairs one with an
integer coefficient, and an [`MPoly`] is a canonical sum of terms: at most
one term per distinct monomial, zero coefficients dropped, terms kept in a
fixed order so two equal polynomials compare equal as plain `Vec`s.

*/

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Identifies a symbolic loop parameter. `ParamId(0)` is reserved as the
/// "zero reference point" the POSet measures every other parameter against
/// (see [`crate::poset::PartialOrderSet::with_non_negative_params`]); it
/// never appears inside a [`Monomial`] built from user-facing terms.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ParamId(pub u32);

/// What role a variable plays in a coefficient vector. Only `Symbolic`
/// variables are tracked by the POSet; `LoopInduction` variables are the
/// polyhedron's own dimensions, and `LiteralOne` marks the constant column.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VarKind {
    LoopInduction,
    Symbolic,
    LiteralOne,
}

/// A product of symbolic parameters, e.g. `I*J*J`, stored as a
/// non-decreasing sequence of ids so that two monomials with the same
/// factors (in any order) compare equal.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Monomial(Vec<ParamId>);

impl Monomial {
    pub fn one() -> Self {
        Monomial(Vec::new())
    }

    pub fn single(id: ParamId) -> Self {
        Monomial(vec![id])
    }

    pub fn from_ids(mut ids: Vec<ParamId>) -> Self {
        ids.sort();
        Monomial(ids)
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn ids(&self) -> &[ParamId] {
        &self.0
    }

    /// Merge-multiplies two sorted id sequences.
    pub fn multiply(&self, other: &Monomial) -> Monomial {
        let mut out = Vec::with_capacity(self.0.len() + other.0.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            if self.0[i] <= other.0[j] {
                out.push(self.0[i]);
                i += 1;
            } else {
                out.push(other.0[j]);
                j += 1;
            }
        }
        out.extend_from_slice(&self.0[i..]);
        out.extend_from_slice(&other.0[j..]);
        Monomial(out)
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Monomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "1");
        }
        for (i, id) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "*")?;
            }
            write!(f, "v{}", id.0)?;
        }
        Ok(())
    }
}

/// A single `coefficient * monomial` summand of an [`MPoly`]. Canonical
/// `MPoly`s never hold a `Term` with `coefficient == 0`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Term {
    pub coefficient: i64,
    pub exponent: Monomial,
}

impl Term {
    pub fn constant(c: i64) -> Self {
        Term { coefficient: c, exponent: Monomial::one() }
    }
}

/// A sum of terms over distinct monomials, kept sorted by monomial so that
/// structural equality is a direct `Vec` comparison and addition is a
/// linear merge.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MPoly(Vec<Term>);

impl MPoly {
    pub fn zero() -> Self {
        MPoly(Vec::new())
    }

    pub fn constant(c: i64) -> Self {
        if c == 0 {
            MPoly::zero()
        } else {
            MPoly(vec![Term::constant(c)])
        }
    }

    pub fn from_param(id: ParamId) -> Self {
        MPoly(vec![Term { coefficient: 1, exponent: Monomial::single(id) }])
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }

    /// Splits this polynomial into the `[c0, c1, ..., cm]` coefficient-vector
    /// shape a [`crate::comparator::Comparator`] reads: `c0` is the constant
    /// term (zero if absent) and the returned monomial list gives the
    /// meaning of every later column, in the same order as the coefficients.
    pub fn to_coeff_vector(&self) -> (Vec<i64>, Vec<Monomial>) {
        let mut constant = 0i64;
        let mut coefficients = Vec::new();
        let mut monomials = Vec::new();
        for t in &self.0 {
            if t.exponent.is_one() {
                constant = t.coefficient;
            } else {
                coefficients.push(t.coefficient);
                monomials.push(t.exponent.clone());
            }
        }
        let mut vector = Vec::with_capacity(coefficients.len() + 1);
        vector.push(constant);
        vector.extend(coefficients);
        (vector, monomials)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.0.len() == 1 && self.0[0].coefficient == 1 && self.0[0].exponent.is_one()
    }

    /// `Some(c)` if this polynomial is syntactically a bare integer.
    pub fn compile_time_constant(&self) -> Option<i64> {
        match self.0.as_slice() {
            [] => Some(0),
            [t] if t.exponent.is_one() => Some(t.coefficient),
            _ => None,
        }
    }

    /// Inserts `coefficient * monomial` into this polynomial, merging with
    /// an existing term over the same monomial and dropping the slot if the
    /// merged coefficient becomes zero.
    pub fn add_term(&mut self, coefficient: i64, monomial: Monomial) {
        if coefficient == 0 {
            return;
        }
        match self.0.binary_search_by(|t| t.exponent.cmp(&monomial)) {
            Ok(idx) => {
                self.0[idx].coefficient += coefficient;
                if self.0[idx].coefficient == 0 {
                    self.0.remove(idx);
                }
            }
            Err(idx) => self.0.insert(idx, Term { coefficient, exponent: monomial }),
        }
    }

    pub fn scale(&self, k: i64) -> MPoly {
        if k == 0 {
            return MPoly::zero();
        }
        MPoly(self.0.iter().map(|t| Term { coefficient: t.coefficient * k, exponent: t.exponent.clone() }).collect())
    }

    /// `self -= other * factor`, as used by the polyhedron's cross-variable
    /// Fourier-Motzkin elimination step when combining a lower and an upper
    /// bound row.
    pub fn fnmadd(&mut self, other: &MPoly, factor: i64) {
        if factor == 0 {
            return;
        }
        for t in &other.0 {
            self.add_term(-t.coefficient * factor, t.exponent.clone());
        }
    }
}

impl Add for &MPoly {
    type Output = MPoly;
    fn add(self, rhs: &MPoly) -> MPoly {
        let mut out = self.clone();
        for t in &rhs.0 {
            out.add_term(t.coefficient, t.exponent.clone());
        }
        out
    }
}

impl Add for MPoly {
    type Output = MPoly;
    fn add(self, rhs: MPoly) -> MPoly {
        &self + &rhs
    }
}

impl Sub for &MPoly {
    type Output = MPoly;
    fn sub(self, rhs: &MPoly) -> MPoly {
        self + &(-rhs.clone())
    }
}

impl Sub for MPoly {
    type Output = MPoly;
    fn sub(self, rhs: MPoly) -> MPoly {
        &self - &rhs
    }
}

impl Sub<i64> for MPoly {
    type Output = MPoly;
    fn sub(self, rhs: i64) -> MPoly {
        &self - &MPoly::constant(rhs)
    }
}

impl Neg for MPoly {
    type Output = MPoly;
    fn neg(self) -> MPoly {
        MPoly(self.0.into_iter().map(|t| Term { coefficient: -t.coefficient, exponent: t.exponent }).collect())
    }
}

impl Neg for &MPoly {
    type Output = MPoly;
    fn neg(self) -> MPoly {
        -self.clone()
    }
}

impl Mul<i64> for MPoly {
    type Output = MPoly;
    fn mul(self, k: i64) -> MPoly {
        self.scale(k)
    }
}

impl From<i64> for MPoly {
    fn from(c: i64) -> Self {
        MPoly::constant(c)
    }
}

impl fmt::Display for MPoly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        for (i, t) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            if t.exponent.is_one() {
                write!(f, "{}", t.coefficient)?;
            } else {
                write!(f, "{}*{}", t.coefficient, t.exponent)?;
            }
        }
        Ok(())
    }
}
