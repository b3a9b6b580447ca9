// SPDX: CC0-1.0

use crate::{
    catalog::{self, Constants, FunctionKind, FunctionTyp, MissingConstantErr},
    Number, Point, DELTA,
};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed interval `[left, right]` a function is sampled over. Written to
/// documents as a two element array.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[Number; 2]", into = "[Number; 2]")]
pub struct Domain {
    pub left: Number,
    pub right: Number,
}

#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum DomainErr {
    #[error("left boundary must be less than right boundary (got {left} and {right})")]
    Empty { left: Number, right: Number },
    #[error("domain boundaries must be finite")]
    NonFinite,
}

impl Domain {
    /// Unchecked: `left < right` is up to the caller.
    #[inline]
    pub const fn new(left: Number, right: Number) -> Self {
        Self { left, right }
    }

    pub fn checked(left: Number, right: Number) -> Result<Self, DomainErr> {
        if !(left.is_finite() && right.is_finite()) {
            Err(DomainErr::NonFinite)
        } else if left >= right {
            Err(DomainErr::Empty { left, right })
        } else {
            Ok(Self::new(left, right))
        }
    }

    pub fn contains(&self, x: Number) -> bool {
        self.left <= x && x <= self.right
    }
}

impl From<[Number; 2]> for Domain {
    fn from([left, right]: [Number; 2]) -> Self {
        Self::new(left, right)
    }
}

impl From<Domain> for [Number; 2] {
    fn from(domain: Domain) -> Self {
        [domain.left, domain.right]
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.left, self.right)
    }
}

/// A function instance together with its samples over the domain, taken
/// every [`DELTA`] at construction. Immutable once built.
///
/// Equality compares everything, samples included. Numbers compare like boxed
/// doubles: by bit pattern, with all NaNs equal to each other.
#[derive(Clone, Debug)]
pub struct Function {
    typ: FunctionTyp,
    constants: Constants,
    domain: Domain,
    samples_x: Vec<Number>,
    samples_y: Vec<Number>,
}

impl Function {
    pub fn new(
        typ: impl Into<FunctionTyp>,
        constants: Constants,
        domain: Domain,
    ) -> Result<Self, MissingConstantErr> {
        let typ = typ.into();
        if let Some(kind) = typ.kind() {
            kind.require(&constants)?;
        }

        let (samples_x, samples_y) = sample(&typ, &constants, domain)?;
        log::debug!(
            "sampled {typ} function over {domain}: {n} point{s}",
            n = samples_x.len(),
            s = if samples_x.len() == 1 { "" } else { "s" }
        );

        Ok(Self {
            typ,
            constants,
            domain,
            samples_x,
            samples_y,
        })
    }

    /// Evaluates the formula at any `x`; the domain is not enforced and the
    /// samples are not consulted.
    pub fn evaluate(&self, x: Number) -> Result<Number, MissingConstantErr> {
        catalog::evaluate(&self.typ, &self.constants, x)
    }

    pub fn typ(&self) -> &FunctionTyp {
        &self.typ
    }

    pub fn kind(&self) -> Option<FunctionKind> {
        self.typ.kind()
    }

    pub fn constants(&self) -> &Constants {
        &self.constants
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn samples_x(&self) -> &[Number] {
        &self.samples_x
    }

    pub fn samples_y(&self) -> &[Number] {
        &self.samples_y
    }

    pub fn points(&self) -> impl Iterator<Item = Point<Number>> + '_ {
        self.samples_x
            .iter()
            .zip(&self.samples_y)
            .map(|(&x, &y)| Point { x, y })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples_x.is_empty()
    }

    /// Like `==`, but numbers only have to agree to within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: Number) -> bool {
        let close = |a: Number, b: Number| same_number(a, b) || (a - b).abs() <= tolerance;
        let all_close = |a: &[Number], b: &[Number]| {
            a.len() == b.len() && a.iter().zip(b).all(|(&a, &b)| close(a, b))
        };

        self.typ == other.typ
            && self.constants.len() == other.constants.len()
            && self
                .constants
                .iter()
                .zip(&other.constants)
                .all(|((ka, &va), (kb, &vb))| ka == kb && close(va, vb))
            && close(self.domain.left, other.domain.left)
            && close(self.domain.right, other.domain.right)
            && all_close(&self.samples_x, &other.samples_x)
            && all_close(&self.samples_y, &other.samples_y)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        let all_same = |a: &[Number], b: &[Number]| {
            a.len() == b.len() && a.iter().zip(b).all(|(&a, &b)| same_number(a, b))
        };

        self.typ == other.typ
            && self.constants.len() == other.constants.len()
            && self
                .constants
                .iter()
                .zip(&other.constants)
                .all(|((ka, &va), (kb, &vb))| ka == kb && same_number(va, vb))
            && same_number(self.domain.left, other.domain.left)
            && same_number(self.domain.right, other.domain.right)
            && all_same(&self.samples_x, &other.samples_x)
            && all_same(&self.samples_y, &other.samples_y)
    }
}

impl Eq for Function {}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.typ)?;
        if let Some(kind) = self.kind() {
            write!(f, " ({})", kind.expression())?;
        }
        let mut sep = " with ";
        for (name, val) in &self.constants {
            write!(f, "{sep}{name} = {val}")?;
            sep = ", ";
        }
        write!(f, " on {}", self.domain)
    }
}

/// Upper bound on the samples kept per function. Wider domains are cut off
/// after this many points.
pub const MAX_SAMPLES: usize = 1 << 20;

fn same_number(a: Number, b: Number) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn sample(
    typ: &FunctionTyp,
    constants: &Constants,
    domain: Domain,
) -> Result<(Vec<Number>, Vec<Number>), MissingConstantErr> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();

    if !(domain.left.is_finite() && domain.right.is_finite()) {
        log::warn!("domain {domain} has a non-finite boundary, leaving function unsampled");
        return Ok((xs, ys));
    }
    if domain.left <= domain.right {
        // the float-to-int cast saturates, so this cannot overflow
        let n = ((domain.right - domain.left) / DELTA).min(MAX_SAMPLES as Number) as usize;
        xs.reserve(n + 1);
        ys.reserve(n + 1);
    }

    // accumulate rather than computing left + i*DELTA, so the last points
    // match previously saved documents exactly
    let mut x = domain.left;
    while x <= domain.right {
        if xs.len() == MAX_SAMPLES {
            log::warn!("domain {domain} is too wide, keeping the first {MAX_SAMPLES} samples");
            break;
        }
        xs.push(x);
        ys.push(catalog::evaluate(typ, constants, x)?);

        let next = x + DELTA;
        if next == x {
            log::warn!("sampling step vanishes at {x}, stopping early in domain {domain}");
            break;
        }
        x = next;
    }

    Ok((xs, ys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ordered_constants, ConstName};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn linear() -> Function {
        Function::new(
            FunctionKind::Linear,
            ordered_constants([2.0, 1.5]),
            Domain::new(-3.0, 3.0),
        )
        .unwrap()
    }

    #[test]
    fn test_linear_samples() {
        let f = linear();
        assert_eq!(f.len(), 25);
        assert_eq!(f.samples_x()[0], -3.0);
        assert_eq!(f.samples_x()[1], -2.75);
        assert_eq!(f.samples_x()[24], 3.0);
        assert_eq!(f.samples_y()[0], -4.5);
        assert_eq!(f.samples_y()[24], 7.5);
    }

    #[rstest]
    #[case(FunctionKind::Linear, &[2.0, 1.5], -3.0, 3.0)]
    #[case(FunctionKind::Polynomial, &[-2.0, -2.0, 3.0, 2.5, -1.0, 0.5], -3.0, 3.0)]
    #[case(FunctionKind::Exponential, &[2.34, -0.388, 0.0], -0.5, 1.25)]
    #[case(FunctionKind::Trigonometric, &[1.0, 2.0, 3.0, 0.5, 0.25, 0.1, -1.0], -2.0, 2.0)]
    #[case(FunctionKind::Logarithmic, &[2.0, 3.0, 1.0], 0.25, 5.1)]
    fn test_samples_match_evaluation(
        #[case] kind: FunctionKind,
        #[case] consts: &[Number],
        #[case] left: Number,
        #[case] right: Number,
    ) {
        let f = Function::new(kind, ordered_constants(consts.iter().copied()), Domain::new(left, right)).unwrap();

        assert_eq!(f.samples_x().len(), f.samples_y().len());
        assert_eq!(f.samples_x()[0], left);
        for w in f.samples_x().windows(2) {
            assert!(w[0] < w[1]);
            assert!((w[1] - w[0] - DELTA).abs() < 1e-9);
        }
        let last = *f.samples_x().last().unwrap();
        assert!(last <= right);
        assert!(last + DELTA > right);

        for p in f.points() {
            assert_eq!(f.evaluate(p.x).unwrap().to_bits(), p.y.to_bits());
        }
    }

    #[test]
    fn test_upper_bound_excludes_overshoot() {
        let f = Function::new(
            FunctionKind::Linear,
            ordered_constants([1.0, 0.0]),
            Domain::new(0.0, 1.1),
        )
        .unwrap();
        assert_eq!(f.samples_x(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_degenerate_domains() {
        let c = ordered_constants([1.0, 0.0]);

        let point = Function::new(FunctionKind::Linear, c.clone(), Domain::new(2.0, 2.0)).unwrap();
        assert_eq!(point.samples_x(), &[2.0]);

        let reversed = Function::new(FunctionKind::Linear, c.clone(), Domain::new(2.0, -2.0)).unwrap();
        assert!(reversed.is_empty());

        let unbounded = Function::new(FunctionKind::Linear, c, Domain::new(Number::NEG_INFINITY, 0.0)).unwrap();
        assert!(unbounded.is_empty());
    }

    #[test]
    fn test_step_below_precision_stops() {
        // 0.25 is lost when added to 1e17
        let f = Function::new(
            FunctionKind::Linear,
            ordered_constants([1.0, 0.0]),
            Domain::new(1e17, 1e17 + 64.0),
        )
        .unwrap();
        assert_eq!(f.samples_x(), &[1e17]);
        assert_eq!(f.samples_y(), &[1e17]);
    }

    #[test]
    fn test_wide_domain_is_capped() {
        let f = Function::new(
            FunctionKind::Linear,
            ordered_constants([1.0, 0.0]),
            Domain::new(0.0, 1e300),
        )
        .unwrap();
        assert_eq!(f.len(), MAX_SAMPLES);
        assert_eq!(f.samples_x()[0], 0.0);
        for w in f.samples_x().windows(2) {
            assert!(w[0] < w[1]);
        }
    }

    #[test]
    fn test_unknown_kind() {
        let f = Function::new(
            FunctionTyp::Unknown("cubic".to_string()),
            ordered_constants([1.0]),
            Domain::new(0.0, 1.0),
        )
        .unwrap();
        assert_eq!(f.kind(), None);
        assert_eq!(f.len(), 5);
        assert!(f.samples_y().iter().all(|y| y.is_nan()));
        assert!(f.evaluate(42.0).unwrap().is_nan());
    }

    #[test]
    fn test_missing_constant_fails_construction() {
        let err = Function::new(
            FunctionKind::Polynomial,
            ordered_constants([1.0, 2.0, 3.0]),
            Domain::new(1.0, -1.0),
        )
        .unwrap_err();
        assert_eq!(err.name, ConstName::D);
    }

    #[test]
    fn test_evaluate_outside_domain() {
        let f = linear();
        assert_eq!(f.evaluate(10.0), Ok(21.5));
        assert!(!f.domain().contains(10.0));
        assert!(!f.samples_x().contains(&10.0));
    }

    #[test]
    fn test_equality_covers_all_state() {
        assert_eq!(linear(), linear());

        let shifted = Function::new(
            FunctionKind::Linear,
            ordered_constants([2.0, 1.5]),
            Domain::new(-3.0, 3.1),
        )
        .unwrap();
        // same samples, different domain
        assert_eq!(shifted.samples_x(), linear().samples_x());
        assert_ne!(shifted, linear());

        let other = Function::new(
            FunctionKind::Linear,
            ordered_constants([2.0, 1.25]),
            Domain::new(-3.0, 3.0),
        )
        .unwrap();
        assert_ne!(other, linear());
        assert!(other.approx_eq(&linear(), 0.5));
        assert!(!other.approx_eq(&linear(), 0.1));
    }

    #[test]
    fn test_equality_with_nan_samples() {
        let f = Function::new(
            FunctionKind::Logarithmic,
            ordered_constants([1.0, 1.0, 0.0]),
            Domain::new(-1.0, 1.0),
        )
        .unwrap();
        assert!(f.samples_y()[0].is_nan());
        assert_eq!(f.samples_y()[4], Number::NEG_INFINITY);
        assert_eq!(f, f.clone());
    }

    #[test]
    fn test_checked_domain() {
        assert_eq!(Domain::checked(-1.0, 1.0), Ok(Domain::new(-1.0, 1.0)));
        assert_eq!(
            Domain::checked(1.0, 1.0),
            Err(DomainErr::Empty {
                left: 1.0,
                right: 1.0
            })
        );
        assert_eq!(Domain::checked(Number::NAN, 1.0), Err(DomainErr::NonFinite));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            linear().to_string(),
            "linear (a*x + b) with a = 2, b = 1.5 on [-3, 3]"
        );
    }
}
