/*!

A partially-ordered set of symbolic parameters.

`PartialOrderSet` stores, for every pair of known parameters `(i, j)`, a
saturating [`Interval`] bounding `value(j) - value(i)`. Parameter `0` is the
conventional "zero reference point": pushing `(0, k, Interval::non_negative())`
records that parameter `k` is itself known non-negative. Triangle equalities
(`delta(i,j) == delta(i,k) + delta(k,j)` for any `k`) are kept closed under
transitivity every time a bound is pushed, so a query against any pair
reflects everything implied by everything pushed so far.

*/

use itertools::Itertools;

use crate::bipartite::BipartiteGraph;
use crate::interval::Interval;
use crate::poly::{Monomial, MPoly, ParamId, Term};

/// Triangular store of pairwise-difference intervals over symbolic
/// parameters `0..n_var`.
#[derive(Clone, Debug)]
pub struct PartialOrderSet {
    delta: Vec<Interval>,
    n_var: usize,
}

impl Default for PartialOrderSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialOrderSet {
    pub fn new() -> Self {
        PartialOrderSet { delta: Vec::new(), n_var: 1 }
    }

    /// Registers every id in `ids` as non-negative against the zero
    /// reference point; the usual way a dependence driver seeds a POSet
    /// before asking it anything.
    pub fn with_non_negative_params(ids: &[ParamId]) -> Self {
        let mut poset = PartialOrderSet::new();
        for id in ids {
            poset.push(0, id.0 as usize, Interval::non_negative());
        }
        poset
    }

    pub fn num_vars(&self) -> usize {
        self.n_var
    }

    #[inline]
    fn bin2(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    #[inline]
    fn index(i: usize, j: usize) -> usize {
        debug_assert!(i < j);
        i + Self::bin2(j)
    }

    fn ensure_capacity(&mut self, n_var: usize) {
        if n_var <= self.n_var {
            return;
        }
        self.delta.resize(Self::bin2(n_var), Interval::unconstrained());
        self.n_var = n_var;
    }

    /// `value(j) - value(i)` for any ordering of `i, j`; `{0, 0}` if `i == j`.
    pub fn query(&self, i: usize, j: usize) -> Interval {
        use std::cmp::Ordering::*;
        match i.cmp(&j) {
            Equal => Interval::zero(),
            Less => {
                if j >= self.n_var {
                    Interval::unconstrained()
                } else {
                    self.delta[Self::index(i, j)]
                }
            }
            Greater => -self.query(j, i),
        }
    }

    /// Records that `value(j) - value(i)` lies in `bound`, then closes the
    /// set under transitivity.
    pub fn push(&mut self, i: usize, j: usize, bound: Interval) {
        if i == j {
            debug_assert!(bound.lo <= 0 && bound.hi >= 0, "push: i == j must bracket zero");
            return;
        }
        log::trace!("poset: push({i}, {j}, {bound})");
        let (lo, hi, bound) = if i < j { (i, j, bound) } else { (j, i, -bound) };
        self.ensure_capacity(hi + 1);
        self.update(lo, hi, bound);
    }

    /// Intersects `delta(i, j)` (`i < j`) with `bound`, then recursively
    /// propagates the tightened value to every third parameter `k` via
    /// `delta(i,j) == delta(i,k) + delta(k,j)`. Recursion is bounded by the
    /// parameter count: each step either leaves some pair's interval
    /// unchanged (and stops) or strictly tightens it, and an interval can
    /// only be tightened finitely many "significant" times before the two
    /// sides are within the `significantly_different` noise floor.
    fn update(&mut self, i: usize, j: usize, bound: Interval) -> Interval {
        let idx = Self::index(i, j);
        let previous = self.delta[idx];
        let tightened = previous.intersect(bound);
        self.delta[idx] = tightened;
        if !previous.significantly_different(tightened) {
            return tightened;
        }
        log::debug!("poset: closing delta({i}, {j}) = {tightened} across {} other parameters", self.n_var.saturating_sub(2));
        for k in 0..self.n_var {
            if k == i || k == j {
                continue;
            }
            let ik = self.query(i, k);
            let kj = self.query(k, j);
            let mut c = tightened;
            let (ik2, kj2) = c.restrict_add(ik, kj);
            if ik.significantly_different(ik2) {
                if i < k {
                    self.update(i, k, ik2);
                } else {
                    self.update(k, i, -ik2);
                }
            }
            if kj.significantly_different(kj2) {
                if k < j {
                    self.update(k, j, kj2);
                } else {
                    self.update(j, k, -kj2);
                }
            }
        }
        tightened
    }

    /// `value(id)` itself, measured against the zero reference point.
    pub fn interval_of_param(&self, id: ParamId) -> Interval {
        if id.0 == 0 {
            Interval::zero()
        } else {
            self.query(0, id.0 as usize)
        }
    }

    pub fn interval_of_monomial(&self, m: &Monomial) -> Interval {
        m.ids().iter().fold(Interval::constant(1), |acc, id| acc * self.interval_of_param(*id))
    }

    pub fn interval_of_term(&self, t: &Term) -> Interval {
        self.interval_of_monomial(&t.exponent) * t.coefficient
    }

    pub fn sign_unknown_monomial(&self, m: &Monomial) -> bool {
        m.ids().iter().any(|id| self.interval_of_param(*id).sign_unknown())
    }

    pub fn known_non_negative_monomial(&self, m: &Monomial) -> bool {
        self.interval_of_monomial(m).known_greater_equal(Interval::zero())
    }

    pub fn known_positive_monomial(&self, m: &Monomial) -> bool {
        self.interval_of_monomial(m).known_greater(Interval::zero())
    }

    /// Builds the bipartite compatibility graph between `x`'s and `y`'s
    /// factors (edge `(m, n)` iff `x[m] >= y[n]` is known), runs maximum
    /// matching, and decides whether `x >= y` follows: if every factor of
    /// the smaller side is matched, the larger side's leftover factors must
    /// individually be known non-negative (any known-negative leftover
    /// flips the decided sign, any sign-unknown leftover forces "unknown").
    /// Returns both the decision and the matched `(x-index, y-index)` pairs,
    /// so callers needing a *strict* witness (`known_greater_monomial`) can
    /// inspect exactly the edges the matching actually used rather than any
    /// dominating pair in the full cross-product, which would be unsound:
    /// two products can tie even when some unrelated pair strictly
    /// dominates.
    fn match_monomials(&self, x: &Monomial, y: &Monomial) -> (bool, Vec<(usize, usize)>) {
        let (xs, ys) = (x.ids(), y.ids());
        let (m, n) = (xs.len(), ys.len());
        let mut g = BipartiteGraph::new(m, n);
        for (mi, &xi) in xs.iter().enumerate() {
            for (ni, &yi) in ys.iter().enumerate() {
                if self.query(yi, xi).known_greater_equal(Interval::zero()) {
                    g.set(mi, ni, true);
                }
            }
        }
        let (matched, partner_of_right) = g.max_matching();
        let pairs: Vec<(usize, usize)> =
            partner_of_right.iter().enumerate().filter_map(|(ni, opt)| opt.map(|mi| (mi, ni))).collect();

        let leftover_sign_ok = |leftover: &[ParamId], start_cond: bool| -> Option<bool> {
            let mut cond = start_cond;
            for &id in leftover {
                let itv = self.interval_of_param(id);
                if itv.hi < 0 {
                    cond = !cond;
                } else if itv.sign_unknown() {
                    return None;
                }
            }
            Some(cond)
        };

        let greater_equal = if matched < m {
            if matched < n {
                false
            } else {
                let matched_x: Vec<bool> = {
                    let mut v = vec![false; m];
                    for &(mi, _) in &pairs {
                        v[mi] = true;
                    }
                    v
                };
                let leftover: Vec<ParamId> =
                    xs.iter().enumerate().filter(|(mi, _)| !matched_x[*mi]).map(|(_, &id)| id).collect();
                leftover_sign_ok(&leftover, true).unwrap_or(false)
            }
        } else if matched < n {
            let leftover: Vec<ParamId> = ys
                .iter()
                .enumerate()
                .filter(|(ni, _)| !pairs.iter().any(|&(_, pn)| pn == *ni))
                .map(|(_, &id)| id)
                .collect();
            leftover_sign_ok(&leftover, false).unwrap_or(false)
        } else {
            true
        };
        (greater_equal, pairs)
    }

    /// Is `x >= y` (as products of non-negative parameters) provable by
    /// matching every factor of `y` against a distinct, dominating factor
    /// of `x`? A maximum bipartite match where every right (`y`) vertex is
    /// covered certifies it: the matched factors of `x` already cover `y`
    /// term by term, and `x`'s unmatched leftover factors are non-negative
    /// by the POSet's own convention, so they can only help.
    pub fn known_greater_equal_monomial(&self, x: &Monomial, y: &Monomial) -> bool {
        self.match_monomials(x, y).0
    }

    /// As [`Self::known_greater_equal_monomial`], but additionally requires
    /// a witness that the inequality is strict: at least one matched pair
    /// must come from a strictly positive interval. Checking
    /// only the edges the matching actually used (not any dominating pair
    /// in the full cross-product) is what keeps this sound: `x`'s and `y`'s
    /// products can be equal even when some unmatched pair strictly
    /// dominates.
    pub fn known_greater_monomial(&self, x: &Monomial, y: &Monomial) -> bool {
        let (ge, pairs) = self.match_monomials(x, y);
        if !ge {
            return false;
        }
        let (xs, ys) = (x.ids(), y.ids());
        pairs.iter().any(|&(mi, ni)| self.query(ys[ni], xs[mi]).known_greater(Interval::zero()))
    }

    /// The pairwise-term sign oracle: is `poly >= 0` known, given everything
    /// pushed into this POSet? Sound but incomplete: a `false` result means
    /// "unknown," not "false."
    ///
    /// First tries the cheap path of summing every term's own conservative
    /// interval. If that alone doesn't certify non-negativity, it walks
    /// term pairs (one negative, one non-negative) looking for a monomial
    /// domination that lets the pair's sum be proven non-negative; a
    /// polynomial is certified only if every term ends up covered by some
    /// pair (or was already individually non-negative).
    pub fn known_greater_equal_zero(&self, poly: &MPoly) -> bool {
        if poly.is_zero() {
            return true;
        }
        let terms = poly.terms();
        let total = terms.iter().fold(Interval::zero(), |acc, t| acc + self.interval_of_term(t));
        if total.known_greater_equal(Interval::zero()) {
            return true;
        }

        let mut covered = vec![false; terms.len()];
        for (i, t) in terms.iter().enumerate() {
            if self.interval_of_term(t).known_greater_equal(Interval::zero()) {
                covered[i] = true;
            }
        }
        for (i, j) in (0..terms.len()).tuple_combinations() {
            if covered[i] && covered[j] {
                continue;
            }
            if self.term_pair_known_non_negative(&terms[i], &terms[j]) {
                covered[i] = true;
                covered[j] = true;
            }
        }
        covered.into_iter().all(|c| c)
    }

    /// `x <= 0` known, derived from the `>= 0` oracle by negation.
    pub fn known_less_equal_zero(&self, x: MPoly) -> bool {
        self.known_greater_equal_zero(&(-x))
    }

    fn term_pair_known_non_negative(&self, a: &Term, b: &Term) -> bool {
        if a.exponent == b.exponent {
            return a.coefficient + b.coefficient >= 0
                || self.known_non_negative_monomial(&a.exponent) && a.coefficient + b.coefficient >= 0;
        }
        let (pos, neg) = if a.coefficient > 0 && b.coefficient < 0 {
            (a, b)
        } else if b.coefficient > 0 && a.coefficient < 0 {
            (b, a)
        } else {
            return false;
        };
        // The compensating "positive - positive" case only holds if the
        // dominating term's own monomial is known strictly positive: a
        // relative fact like `A >= B` says nothing about whether `A` (and
        // hence `pos`) is itself positive, negative, or zero, and trusting
        // `known_greater_equal_monomial` alone here is unsound (e.g. A == B
        // == -10 satisfies `A >= B` while making every term negative).
        if !self.known_positive_monomial(&pos.exponent) {
            return false;
        }
        if pos.coefficient < -neg.coefficient {
            return false;
        }
        self.known_greater_equal_monomial(&pos.exponent, &neg.exponent)
    }
}
