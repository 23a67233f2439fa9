//! Partial binding of family parameters.

use super::{DistrFamily, FamilyExpr};
use crate::distr::Distr;
use crate::error::Result;
use crate::parameters::source::Params;
use tracing::trace;

/// Result of [`DistrFamily::refine`].
#[derive(Debug, Clone)]
pub enum Refinement {
    /// Some parameters are still free.
    Family(DistrFamily),
    /// Every parameter was bound.
    Distr(Distr),
}

impl Refinement {
    /// The remaining family; a concrete distribution becomes a constant family.
    pub fn into_family(self) -> DistrFamily {
        match self {
            Refinement::Family(family) => family,
            Refinement::Distr(distr) => DistrFamily::constant(distr),
        }
    }

    pub fn into_distr(self) -> Option<Distr> {
        match self {
            Refinement::Family(_) => None,
            Refinement::Distr(distr) => Some(distr),
        }
    }

    pub fn is_distr(&self) -> bool {
        matches!(self, Refinement::Distr(_))
    }
}

impl DistrFamily {
    /// Bind the parameters named in `fixed`.
    ///
    /// If every parameter of the family is bound the expression is evaluated
    /// and the concrete distribution returned. Otherwise the result is a family
    /// over the remaining names; the bound values take precedence over any
    /// value of the same name later supplied to it. Keys that are not
    /// parameters of the family are ignored.
    pub fn refine(&self, fixed: &Params) -> Result<Refinement> {
        let remaining: Vec<String> = self
            .param_names
            .iter()
            .filter(|name| !fixed.contains_key(name.as_str()))
            .cloned()
            .collect();

        if remaining.is_empty() {
            trace!(params = ?self.param_names, "refinement binds every parameter");
            return Ok(Refinement::Distr(self.instantiate(fixed)?));
        }

        let bound: Params = fixed
            .iter()
            .filter(|(name, _)| self.param_names.contains(*name))
            .map(|(name, value)| (name.clone(), *value))
            .collect();
        trace!(?remaining, bound = ?bound.keys().collect::<Vec<_>>(), "refined family");

        Ok(Refinement::Family(DistrFamily::from_expr(
            remaining,
            FamilyExpr::Refined {
                base: self.clone(),
                fixed: bound,
            },
        )))
    }
}
