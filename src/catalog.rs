// SPDX: CC0-1.0

//! The fixed catalog of function kinds: their constant names, arity and
//! closed-form formulas.

use crate::Number;
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Named coefficients of a function, keyed by constant name.
pub type Constants = BTreeMap<ConstName, Number>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConstName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl ConstName {
    pub const ALL: [ConstName; 7] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::B => "b",
            Self::C => "c",
            Self::D => "d",
            Self::E => "e",
            Self::F => "f",
            Self::G => "g",
        }
    }
}

impl fmt::Display for ConstName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{text}' is not a constant name (expected one of a, b, c, d, e, f, g)")]
pub struct UnknownConstErr {
    pub text: String,
}

impl FromStr for ConstName {
    type Err = UnknownConstErr;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| UnknownConstErr {
                text: s.to_string(),
            })
    }
}

impl TryFrom<String> for ConstName {
    type Error = UnknownConstErr;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ConstName> for String {
    fn from(c: ConstName) -> Self {
        c.name().to_string()
    }
}

/// Assigns `values` to the constant names in alphabetical order, so the first
/// value becomes `a`, the second `b`, and so on. Values past `g` are dropped.
pub fn ordered_constants(values: impl IntoIterator<Item = Number>) -> Constants {
    ConstName::ALL.into_iter().zip(values).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FunctionKind {
    Linear,
    Polynomial,
    Exponential,
    Trigonometric,
    Logarithmic,
}

impl FunctionKind {
    pub const fn exhaustive() -> &'static [FunctionKind] {
        &[
            Self::Linear,
            Self::Polynomial,
            Self::Exponential,
            Self::Trigonometric,
            Self::Logarithmic,
        ]
    }

    /// Canonical tag, as written to workspace documents.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Polynomial => "polynomial",
            Self::Exponential => "exponential",
            Self::Trigonometric => "trigonometric",
            Self::Logarithmic => "logarithmic",
        }
    }

    pub const fn expression(&self) -> &'static str {
        match self {
            Self::Linear => "a*x + b",
            Self::Polynomial => "a*x^5 + b*x^4 + c*x^3 + d*x^2 + e*x + f",
            Self::Exponential => "a*e^(b*x) + c",
            Self::Trigonometric => "a*sin(b*x) + c*cos(d*x) + e*tan(f*x) + g",
            Self::Logarithmic => "a*ln(b*x) + c",
        }
    }

    pub const fn arity(&self) -> usize {
        match self {
            Self::Linear => 2,
            Self::Polynomial => 6,
            Self::Exponential => 3,
            Self::Trigonometric => 7,
            Self::Logarithmic => 3,
        }
    }

    /// The constants the formula reads: always the first `arity` names.
    pub fn constant_names(&self) -> &'static [ConstName] {
        &ConstName::ALL[..self.arity()]
    }

    /// Fails on the first constant the formula reads that `constants` lacks.
    pub fn require(&self, constants: &Constants) -> Result<(), MissingConstantErr> {
        match self
            .constant_names()
            .iter()
            .find(|name| !constants.contains_key(name))
        {
            Some(name) => Err(MissingConstantErr {
                kind: *self,
                name: *name,
            }),
            None => Ok(()),
        }
    }

    pub fn evaluate(&self, constants: &Constants, x: Number) -> Result<Number, MissingConstantErr> {
        let y = match self {
            Self::Linear => {
                let [a, b] = self.fetch::<2>(constants)?;
                a * x + b
            }
            Self::Polynomial => {
                // powers are multiplied out so samples stay bit-identical to
                // previously saved documents
                let [a, b, c, d, e, f] = self.fetch::<6>(constants)?;
                a * x * x * x * x * x + b * x * x * x * x + c * x * x * x + d * x * x + e * x + f
            }
            Self::Exponential => {
                let [a, b, c] = self.fetch::<3>(constants)?;
                a * (b * x).exp() + c
            }
            Self::Trigonometric => {
                let [a, b, c, d, e, f, g] = self.fetch::<7>(constants)?;
                a * (b * x).sin() + c * (d * x).cos() + e * (f * x).tan() + g
            }
            Self::Logarithmic => {
                let [a, b, c] = self.fetch::<3>(constants)?;
                a * (b * x).ln() + c
            }
        };
        Ok(y)
    }

    fn fetch<const N: usize>(&self, constants: &Constants) -> Result<[Number; N], MissingConstantErr> {
        debug_assert_eq!(self.arity(), N);
        let mut ret = [0.0; N];
        for (dst, name) in ret.iter_mut().zip(self.constant_names()) {
            *dst = *constants.get(name).ok_or(MissingConstantErr {
                kind: *self,
                name: *name,
            })?;
        }
        Ok(ret)
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown function type '{tag}'")]
pub struct UnknownKindErr {
    pub tag: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{kind} function requires constant '{name}', but it is not defined")]
pub struct MissingConstantErr {
    pub kind: FunctionKind,
    pub name: ConstName,
}

impl FromStr for FunctionKind {
    type Err = UnknownKindErr;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        for k in Self::exhaustive() {
            if s == k.name() {
                return Ok(*k);
            }
        }
        Err(UnknownKindErr {
            tag: s.to_string(),
        })
    }
}

/// Kind of a stored function. Tags that name no known kind are kept verbatim
/// so they survive a save/load cycle; such functions evaluate to NaN.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FunctionTyp {
    Known(FunctionKind),
    Unknown(String),
}

impl FunctionTyp {
    pub const fn kind(&self) -> Option<FunctionKind> {
        match self {
            Self::Known(kind) => Some(*kind),
            Self::Unknown(_) => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Known(kind) => kind.name(),
            Self::Unknown(tag) => tag,
        }
    }

    pub fn arity(&self) -> Result<usize, UnknownKindErr> {
        match self {
            Self::Known(kind) => Ok(kind.arity()),
            Self::Unknown(tag) => Err(UnknownKindErr { tag: tag.clone() }),
        }
    }
}

impl fmt::Display for FunctionTyp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<FunctionKind> for FunctionTyp {
    fn from(kind: FunctionKind) -> Self {
        Self::Known(kind)
    }
}

impl From<String> for FunctionTyp {
    fn from(tag: String) -> Self {
        match tag.parse() {
            Ok(kind) => Self::Known(kind),
            Err(_) => Self::Unknown(tag),
        }
    }
}

impl From<FunctionTyp> for String {
    fn from(typ: FunctionTyp) -> Self {
        match typ {
            FunctionTyp::Known(kind) => kind.name().to_string(),
            FunctionTyp::Unknown(tag) => tag,
        }
    }
}

pub fn arity_of(tag: &str) -> Result<usize, UnknownKindErr> {
    tag.parse::<FunctionKind>().map(|kind| kind.arity())
}

/// Evaluates `typ` at `x`. Unknown kinds yield NaN rather than an error; the
/// only failure is a constant the formula needs but `constants` lacks.
pub fn evaluate(typ: &FunctionTyp, constants: &Constants, x: Number) -> Result<Number, MissingConstantErr> {
    match typ {
        FunctionTyp::Known(kind) => kind.evaluate(constants, x),
        FunctionTyp::Unknown(_) => Ok(Number::NAN),
    }
}
