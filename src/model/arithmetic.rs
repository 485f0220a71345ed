//! # Possibility Arithmetic
//!
//! Encodings of probabilities used inside the DP matrices. A "possibility" is
//! an `f64` whose meaning depends on the arithmetic that produced it:
//!
//! - [`SimplePossibility`]: the value is the probability itself. Cheapest, but
//!   long reads or unlikely paths underflow to zero.
//! - [`LogPossibility`]: the value is the natural log of the probability.
//!   `multiply` becomes addition and `add` becomes log-sum-exp.
//!
//! The engine is generic over [`PossibilityArithmetic`], so the choice is made
//! once at construction and never branched on per cell.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Names the available arithmetics for configuration and runtime dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticKind {
    Simple,
    #[default]
    Log,
}

/// Operations on encoded probabilities.
pub trait PossibilityArithmetic: Copy + Clone + Debug + Default + Send + Sync + 'static {
    const KIND: ArithmeticKind;

    /// Encoding of probability 0.
    fn zero(&self) -> f64;

    /// Encoding of probability 1.
    fn one(&self) -> f64;

    fn multiply(&self, a: f64, b: f64) -> f64;

    /// `a / b`; `b` must not be zero.
    fn divide(&self, a: f64, b: f64) -> f64;

    fn add(&self, a: f64, b: f64) -> f64;

    fn prob_to_poss(&self, p: f64) -> f64;

    fn ln_to_poss(&self, ln: f64) -> f64;

    fn poss_to_prob(&self, x: f64) -> f64;

    fn poss_to_ln(&self, x: f64) -> f64;

    /// Never NaN and never positive infinity.
    fn is_valid_poss(&self, x: f64) -> bool;

    /// Strictly greater, in probability order.
    #[inline]
    fn gt(&self, a: f64, b: f64) -> bool {
        a > b
    }

    #[inline]
    fn is_zero(&self, x: f64) -> bool {
        x == self.zero()
    }

    /// Sum of an iterator of possibilities.
    fn sum<I: IntoIterator<Item = f64>>(&self, values: I) -> f64 {
        values.into_iter().fold(self.zero(), |acc, v| self.add(acc, v))
    }
}

/// Linear-probability representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimplePossibility;

impl PossibilityArithmetic for SimplePossibility {
    const KIND: ArithmeticKind = ArithmeticKind::Simple;

    #[inline]
    fn zero(&self) -> f64 {
        0.0
    }

    #[inline]
    fn one(&self) -> f64 {
        1.0
    }

    #[inline]
    fn multiply(&self, a: f64, b: f64) -> f64 {
        a * b
    }

    #[inline]
    fn divide(&self, a: f64, b: f64) -> f64 {
        debug_assert!(b != 0.0, "division by zero possibility");
        a / b
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn prob_to_poss(&self, p: f64) -> f64 {
        p
    }

    #[inline]
    fn ln_to_poss(&self, ln: f64) -> f64 {
        ln.exp()
    }

    #[inline]
    fn poss_to_prob(&self, x: f64) -> f64 {
        x
    }

    #[inline]
    fn poss_to_ln(&self, x: f64) -> f64 {
        x.ln()
    }

    #[inline]
    fn is_valid_poss(&self, x: f64) -> bool {
        x.is_finite() && x >= 0.0
    }
}

/// Natural-log representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogPossibility;

impl PossibilityArithmetic for LogPossibility {
    const KIND: ArithmeticKind = ArithmeticKind::Log;

    #[inline]
    fn zero(&self) -> f64 {
        f64::NEG_INFINITY
    }

    #[inline]
    fn one(&self) -> f64 {
        0.0
    }

    #[inline]
    fn multiply(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn divide(&self, a: f64, b: f64) -> f64 {
        debug_assert!(b != f64::NEG_INFINITY, "division by zero possibility");
        if a == f64::NEG_INFINITY {
            return a;
        }
        a - b
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        if a == f64::NEG_INFINITY {
            return b;
        }
        if b == f64::NEG_INFINITY {
            return a;
        }
        if a >= b {
            a + (b - a).exp().ln_1p()
        } else {
            b + (a - b).exp().ln_1p()
        }
    }

    #[inline]
    fn prob_to_poss(&self, p: f64) -> f64 {
        p.ln()
    }

    #[inline]
    fn ln_to_poss(&self, ln: f64) -> f64 {
        ln
    }

    #[inline]
    fn poss_to_prob(&self, x: f64) -> f64 {
        x.exp()
    }

    #[inline]
    fn poss_to_ln(&self, x: f64) -> f64 {
        x
    }

    #[inline]
    fn is_valid_poss(&self, x: f64) -> bool {
        !x.is_nan() && x != f64::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_spaced_probs() -> Vec<f64> {
        (0..=120).map(|k| 10f64.powf(-(k as f64) / 10.0)).collect()
    }

    fn check_round_trip<A: PossibilityArithmetic>(arith: A) {
        for p in log_spaced_probs() {
            let back = arith.poss_to_prob(arith.prob_to_poss(p));
            assert!(((back - p) / p).abs() < 1e-12, "{:?}: {} -> {}", A::KIND, p, back);
        }
        for k in 0..=200 {
            let l = -(k as f64) * 3.5;
            let back = arith.poss_to_ln(arith.ln_to_poss(l));
            // Linear encoding underflows below roughly -745.
            if A::KIND == ArithmeticKind::Simple && l < -700.0 {
                continue;
            }
            assert!((back - l).abs() < 1e-9, "{:?}: {} -> {}", A::KIND, l, back);
        }
    }

    #[test]
    fn test_round_trip_simple() {
        check_round_trip(SimplePossibility);
    }

    #[test]
    fn test_round_trip_log() {
        check_round_trip(LogPossibility);
    }

    #[test]
    fn test_log_reaches_below_linear_underflow() {
        let arith = LogPossibility;
        assert_eq!(arith.poss_to_ln(arith.ln_to_poss(-5000.0)), -5000.0);
        assert_eq!(SimplePossibility.ln_to_poss(-5000.0), 0.0);
    }

    #[test]
    fn test_add_multiply_agree_across_arithmetics() {
        let s = SimplePossibility;
        let l = LogPossibility;
        let pairs = [(0.3, 0.2), (1e-9, 0.5), (0.0, 0.7), (1.0, 1.0)];
        for (a, b) in pairs {
            let sum = l.poss_to_prob(l.add(l.prob_to_poss(a), l.prob_to_poss(b)));
            assert!((sum - s.add(a, b)).abs() < 1e-12);
            let prod = l.poss_to_prob(l.multiply(l.prob_to_poss(a), l.prob_to_poss(b)));
            assert!((prod - s.multiply(a, b)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_add_is_commutative_and_associative() {
        let l = LogPossibility;
        let (a, b, c) = (l.prob_to_poss(0.1), l.prob_to_poss(0.02), l.prob_to_poss(0.3));
        assert!((l.add(a, b) - l.add(b, a)).abs() < 1e-15);
        assert!((l.add(l.add(a, b), c) - l.add(a, l.add(b, c))).abs() < 1e-12);
    }

    #[test]
    fn test_zero_and_one() {
        let l = LogPossibility;
        assert!(l.is_zero(l.zero()));
        assert_eq!(l.multiply(l.zero(), l.one()), l.zero());
        assert_eq!(l.add(l.zero(), l.zero()), l.zero());
        assert_eq!(l.divide(l.zero(), l.one()), l.zero());
        assert_eq!(l.add(l.zero(), l.one()), l.one());

        let s = SimplePossibility;
        assert_eq!(s.add(s.zero(), s.one()), 1.0);
        assert_eq!(s.divide(0.5, 0.25), 2.0);
    }

    #[test]
    fn test_validity() {
        let s = SimplePossibility;
        assert!(s.is_valid_poss(0.0));
        assert!(s.is_valid_poss(3.5));
        assert!(!s.is_valid_poss(f64::NAN));
        assert!(!s.is_valid_poss(f64::INFINITY));
        assert!(!s.is_valid_poss(-0.1));

        let l = LogPossibility;
        assert!(l.is_valid_poss(f64::NEG_INFINITY));
        assert!(l.is_valid_poss(1.5));
        assert!(!l.is_valid_poss(f64::NAN));
        assert!(!l.is_valid_poss(f64::INFINITY));
    }

    #[test]
    fn test_compare_and_sum() {
        let l = LogPossibility;
        assert!(l.gt(l.prob_to_poss(0.5), l.prob_to_poss(0.25)));
        let total = l.sum([0.25, 0.25, 0.5].map(|p| l.prob_to_poss(p)));
        assert!((l.poss_to_prob(total) - 1.0).abs() < 1e-12);
        assert_eq!(SimplePossibility.sum(Vec::<f64>::new()), 0.0);
    }
}
