//! Deinitializer resolution.
//!
//! Given an eligible destroy site, looks up the nominal declaration's
//! registered deinitializer and derives the substitution map needed to call
//! it there. The deinitializer is declared once, generically; the destroyed
//! value may be any concrete instantiation.

use lumen_ir::{
    context_substitution, DeinitRegistry, FuncId, ParamConvention, SubstitutionMap, TypePool,
};

use crate::classify::{EligibleDestroy, SkipReason};

/// A deinitializer resolved for a specific destroy site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedDeinit {
    /// The deinitializer function to call.
    pub func: FuncId,
    /// How it expects to receive self.
    pub self_convention: ParamConvention,
    /// Bindings from its generic context to the site's concrete types.
    pub subs: SubstitutionMap,
}

/// Resolve the deinitializer for an eligible destroy site.
///
/// A declaration without a registered deinitializer leaves the site
/// untouched ([`SkipReason::NoDeinitRegistered`]).
pub fn resolve_deinit(
    registry: &DeinitRegistry,
    pool: &TypePool,
    site: &EligibleDestroy,
) -> Result<ResolvedDeinit, SkipReason> {
    let Some(deinit) = registry.lookup(site.decl) else {
        return Err(SkipReason::NoDeinitRegistered);
    };
    let subs = context_substitution(pool, site.ty, site.decl);
    Ok(ResolvedDeinit {
        func: deinit.func,
        self_convention: deinit.self_convention(),
        subs,
    })
}
