//! # Distribution Families
//!
//! A [`DistrFamily`] is a distribution that still has free parameters. It pairs
//! the sorted set of parameter names it reads with an expression tree that
//! turns a parameter mapping into a concrete [`Distr`].
//!
//! Families are immutable. Combining, truncating or refining a family builds a
//! new family whose tree references the operands, so nothing is evaluated until
//! [`DistrFamily::instantiate`] is called with actual values.
//!
//! ## Example Usage
//!
//! ```rust
//! use distr_family::distr::Distr;
//! use distr_family::family::DistrFamily;
//! use distr_family::parameters::{params, ParamSource};
//!
//! let noise = DistrFamily::new(["sigma", "unused"], |p: &dyn ParamSource| {
//!     Distr::normal(0.0, p.value("sigma")?)
//! });
//! assert_eq!(noise.param_names(), ["sigma"]);
//!
//! let shifted = &noise + DistrFamily::new(["mu"], |p: &dyn ParamSource| {
//!     Distr::normal(p.value("mu")?, 1.0)
//! });
//! assert_eq!(shifted.param_names(), ["mu", "sigma"]);
//!
//! let d = shifted.instantiate(&params(&[("mu", 1.0), ("sigma", 2.0)])).unwrap();
//! assert!(d.pdf(1.0) > 0.0);
//! ```

use crate::distr::{check_interval, check_weights, Distr};
use crate::error::{DistrError, Result};
use crate::parameters::source::{Overlay, ParamSource, Params};
use crate::parameters::usage::detect_used_params;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Div, Mul};
use std::sync::Arc;

pub mod refine;

pub use refine::Refinement;

/// Expression function turning a parameter mapping into a distribution.
pub type ExprFn = Arc<dyn Fn(&dyn ParamSource) -> Result<Distr> + Send + Sync>;

/// User-supplied combination of instantiated operands.
pub type CombineFn = Arc<dyn Fn(&[Distr]) -> Result<Distr> + Send + Sync>;

/// Operation applied to the instantiated operands of a combined family.
#[derive(Clone)]
pub enum Combinator {
    /// Left-folded sum of two or more operands.
    Add,
    /// Left-folded product of two or more operands.
    Mul,
    /// Left-folded quotient of two or more operands.
    Div,
    /// Truncation of a single operand to `[a, b]`.
    Trunc(f64, f64),
    /// Censoring of a single operand to `[a, b]`.
    Censor(f64, f64),
    /// Mixture with one weight per operand.
    Mix(Vec<f64>),
    /// Arbitrary function of the instantiated operands.
    Custom(CombineFn),
}

impl Combinator {
    /// Wrap a closure as a [`Combinator::Custom`].
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[Distr]) -> Result<Distr> + Send + Sync + 'static,
    {
        Combinator::Custom(Arc::new(f))
    }

    fn check_arity(&self, count: usize) -> Result<()> {
        let ok = match self {
            Combinator::Add | Combinator::Mul | Combinator::Div => count >= 2,
            Combinator::Trunc(..) | Combinator::Censor(..) => count == 1,
            Combinator::Mix(weights) => count >= 1 && weights.len() == count,
            Combinator::Custom(_) => count >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(DistrError::InvalidInput(format!(
                "{:?} cannot combine {} operand(s)",
                self, count
            )))
        }
    }

    /// Apply the operation to already instantiated operands.
    pub fn apply(&self, operands: &[Distr]) -> Result<Distr> {
        self.check_arity(operands.len())?;
        match self {
            Combinator::Add => fold(operands, |a, b| a + b),
            Combinator::Mul => fold(operands, |a, b| a * b),
            Combinator::Div => fold(operands, |a, b| a / b),
            Combinator::Trunc(a, b) => operands[0].trunc(*a, *b),
            Combinator::Censor(a, b) => operands[0].censor(*a, *b),
            Combinator::Mix(weights) => Distr::mixture(weights, operands.to_vec()),
            Combinator::Custom(f) => f(operands),
        }
    }
}

fn fold<F>(operands: &[Distr], op: F) -> Result<Distr>
where
    F: Fn(&Distr, &Distr) -> Result<Distr>,
{
    let (first, rest) = operands
        .split_first()
        .ok_or_else(|| DistrError::InvalidInput("nothing to combine".to_string()))?;
    rest.iter().try_fold(first.clone(), |acc, d| op(&acc, d))
}

impl fmt::Debug for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::Add => write!(f, "Add"),
            Combinator::Mul => write!(f, "Mul"),
            Combinator::Div => write!(f, "Div"),
            Combinator::Trunc(a, b) => write!(f, "Trunc({}, {})", a, b),
            Combinator::Censor(a, b) => write!(f, "Censor({}, {})", a, b),
            Combinator::Mix(weights) => write!(f, "Mix({:?})", weights),
            Combinator::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// Expression tree of a family.
pub enum FamilyExpr {
    /// A fixed distribution that ignores its input.
    Leaf(Distr),
    /// A user expression function.
    Func(ExprFn),
    /// A family with some parameters bound by refinement.
    Refined { base: DistrFamily, fixed: Params },
    /// Operands combined after instantiation.
    Combine {
        op: Combinator,
        operands: Vec<DistrFamily>,
    },
}

impl FamilyExpr {
    fn eval(&self, params: &dyn ParamSource) -> Result<Distr> {
        match self {
            FamilyExpr::Leaf(distr) => Ok(distr.clone()),
            FamilyExpr::Func(f) => f(params),
            FamilyExpr::Refined { base, fixed } => base.expr.eval(&Overlay {
                fixed,
                free: params,
            }),
            FamilyExpr::Combine { op, operands } => {
                let values = operands
                    .iter()
                    .map(|family| family.expr.eval(params))
                    .collect::<Result<Vec<_>>>()?;
                op.apply(&values)
            }
        }
    }
}

impl fmt::Debug for FamilyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FamilyExpr::Leaf(distr) => f.debug_tuple("Leaf").field(distr).finish(),
            FamilyExpr::Func(_) => write!(f, "Func"),
            FamilyExpr::Refined { base, fixed } => f
                .debug_struct("Refined")
                .field("base", base)
                .field("fixed", fixed)
                .finish(),
            FamilyExpr::Combine { op, operands } => f
                .debug_struct("Combine")
                .field("op", op)
                .field("operands", operands)
                .finish(),
        }
    }
}

/// A parametric family of distributions.
#[derive(Clone)]
pub struct DistrFamily {
    param_names: Vec<String>,
    declared: Vec<String>,
    expr: Arc<FamilyExpr>,
}

fn sorted_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

impl DistrFamily {
    /// Build a family from declared names and an expression function.
    ///
    /// The expression is run once with placeholder values and the parameter
    /// set becomes exactly the names it read. Declared names it never reads are
    /// dropped; a dry run that fails keeps whatever was read before the failure.
    pub fn new<I, S, F>(names: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&dyn ParamSource) -> Result<Distr> + Send + Sync + 'static,
    {
        let declared = sorted_names(names);
        let param_names = detect_used_params(&declared, |p| f(p));
        Self {
            param_names,
            declared,
            expr: Arc::new(FamilyExpr::Func(Arc::new(f))),
        }
    }

    /// Build a family that keeps the declared names without probing.
    pub fn untrimmed<I, S, F>(names: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&dyn ParamSource) -> Result<Distr> + Send + Sync + 'static,
    {
        let declared = sorted_names(names);
        Self {
            param_names: declared.clone(),
            declared,
            expr: Arc::new(FamilyExpr::Func(Arc::new(f))),
        }
    }

    /// Zero-parameter family that always yields `distr`.
    pub fn constant(distr: Distr) -> Self {
        Self {
            param_names: Vec::new(),
            declared: Vec::new(),
            expr: Arc::new(FamilyExpr::Leaf(distr)),
        }
    }

    pub(crate) fn from_expr(param_names: Vec<String>, expr: FamilyExpr) -> Self {
        Self {
            declared: param_names.clone(),
            param_names,
            expr: Arc::new(expr),
        }
    }

    /// Sorted names the family reads.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Sorted names given at construction, before trimming.
    pub fn declared_names(&self) -> &[String] {
        &self.declared
    }

    /// Expression tree the family evaluates.
    pub fn expr(&self) -> &FamilyExpr {
        &self.expr
    }

    /// Evaluate the family at `params`.
    ///
    /// Coverage is not validated up front; a name missing from `params` fails
    /// with [`DistrError::MissingParameter`] when the expression reads it.
    pub fn instantiate(&self, params: &dyn ParamSource) -> Result<Distr> {
        self.expr.eval(params)
    }

    /// Combine `operands` with `op`, unioning their parameter sets.
    pub fn merge<I, T>(op: Combinator, operands: I) -> Result<DistrFamily>
    where
        I: IntoIterator<Item = T>,
        T: Into<DistrFamily>,
    {
        let operands: Vec<DistrFamily> = operands.into_iter().map(Into::into).collect();
        op.check_arity(operands.len())?;
        Ok(Self::combine(op, operands))
    }

    fn combine(op: Combinator, operands: Vec<DistrFamily>) -> DistrFamily {
        let param_names = sorted_names(operands.iter().flat_map(|f| f.param_names.iter().cloned()));
        let declared = sorted_names(operands.iter().flat_map(|f| f.declared.iter().cloned()));
        Self {
            param_names,
            declared,
            expr: Arc::new(FamilyExpr::Combine { op, operands }),
        }
    }

    fn binary<R: Into<DistrFamily>>(&self, op: Combinator, rhs: R) -> DistrFamily {
        Self::combine(op, vec![self.clone(), rhs.into()])
    }

    /// `self + rhs`
    pub fn add<R: Into<DistrFamily>>(&self, rhs: R) -> DistrFamily {
        self.binary(Combinator::Add, rhs)
    }

    /// `self * rhs`
    pub fn multiply<R: Into<DistrFamily>>(&self, rhs: R) -> DistrFamily {
        self.binary(Combinator::Mul, rhs)
    }

    /// `self / rhs`
    pub fn divide<R: Into<DistrFamily>>(&self, rhs: R) -> DistrFamily {
        self.binary(Combinator::Div, rhs)
    }

    /// Truncate every member of the family to `[a, b]`.
    ///
    /// Invalid intervals are reported when the family is instantiated.
    pub fn trunc(&self, a: f64, b: f64) -> DistrFamily {
        Self::combine(Combinator::Trunc(a, b), vec![self.clone()])
    }

    /// Censor every member of the family to `[a, b]`.
    pub fn censor(&self, a: f64, b: f64) -> DistrFamily {
        Self::combine(Combinator::Censor(a, b), vec![self.clone()])
    }

    /// Mixture of `components` with fixed `weights`.
    pub fn mix<I, T>(weights: &[f64], components: I) -> Result<DistrFamily>
    where
        I: IntoIterator<Item = T>,
        T: Into<DistrFamily>,
    {
        check_weights(weights)?;
        Self::merge(Combinator::Mix(weights.to_vec()), components)
    }

    /// Validate an interval before building a truncated family.
    pub fn try_trunc(&self, a: f64, b: f64) -> Result<DistrFamily> {
        check_interval(a, b)?;
        Ok(self.trunc(a, b))
    }

    /// Validate an interval before building a censored family.
    pub fn try_censor(&self, a: f64, b: f64) -> Result<DistrFamily> {
        check_interval(a, b)?;
        Ok(self.censor(a, b))
    }
}

impl fmt::Debug for DistrFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistrFamily")
            .field("param_names", &self.param_names)
            .field("expr", &self.expr)
            .finish()
    }
}

impl fmt::Display for DistrFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<DistributionFamily({})>", self.param_names.join(", "))
    }
}

impl From<Distr> for DistrFamily {
    fn from(distr: Distr) -> Self {
        DistrFamily::constant(distr)
    }
}

impl From<&Distr> for DistrFamily {
    fn from(distr: &Distr) -> Self {
        DistrFamily::constant(distr.clone())
    }
}

impl From<f64> for DistrFamily {
    fn from(value: f64) -> Self {
        DistrFamily::constant(Distr::constant(value))
    }
}

impl From<&DistrFamily> for DistrFamily {
    fn from(family: &DistrFamily) -> Self {
        family.clone()
    }
}

macro_rules! impl_family_op {
    ($op_trait:ident, $method:ident, $combinator:expr) => {
        impl<R: Into<DistrFamily>> $op_trait<R> for DistrFamily {
            type Output = DistrFamily;

            fn $method(self, rhs: R) -> DistrFamily {
                self.binary($combinator, rhs)
            }
        }

        impl<R: Into<DistrFamily>> $op_trait<R> for &DistrFamily {
            type Output = DistrFamily;

            fn $method(self, rhs: R) -> DistrFamily {
                self.binary($combinator, rhs)
            }
        }

        impl $op_trait<DistrFamily> for f64 {
            type Output = DistrFamily;

            fn $method(self, rhs: DistrFamily) -> DistrFamily {
                DistrFamily::from(self).binary($combinator, rhs)
            }
        }

        impl $op_trait<&DistrFamily> for f64 {
            type Output = DistrFamily;

            fn $method(self, rhs: &DistrFamily) -> DistrFamily {
                DistrFamily::from(self).binary($combinator, rhs)
            }
        }

        impl $op_trait<DistrFamily> for Distr {
            type Output = DistrFamily;

            fn $method(self, rhs: DistrFamily) -> DistrFamily {
                DistrFamily::from(self).binary($combinator, rhs)
            }
        }

        impl $op_trait<&DistrFamily> for &Distr {
            type Output = DistrFamily;

            fn $method(self, rhs: &DistrFamily) -> DistrFamily {
                DistrFamily::from(self).binary($combinator, rhs)
            }
        }
    };
}

impl_family_op!(Add, add, Combinator::Add);
impl_family_op!(Mul, mul, Combinator::Mul);
impl_family_op!(Div, div, Combinator::Div);
