//! Deinitializer registry.
//!
//! The compilation unit registers the compiler-synthesized deinitializer of
//! each move-only nominal declaration here; the devirtualization pass
//! queries it read-only, once per eligible destroy site. Passes receive the
//! registry explicitly rather than reaching into ambient module state.

use rustc_hash::FxHashMap;

use crate::{FuncId, NominalId, ParamConvention, Signature};

/// A registered deinitializer: the function plus its calling convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeinitFunc {
    /// The deinitializer function.
    pub func: FuncId,
    /// Its signature, including the implicit self parameter.
    pub sig: Signature,
}

impl DeinitFunc {
    /// Convention of the implicit self parameter.
    pub fn self_convention(&self) -> ParamConvention {
        self.sig.self_convention()
    }
}

/// Lookup table from nominal declaration to its deinitializer.
#[derive(Debug, Default)]
pub struct DeinitRegistry {
    map: FxHashMap<NominalId, DeinitFunc>,
}

impl DeinitRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `deinit` for `decl`, replacing any previous registration.
    pub fn register(&mut self, decl: NominalId, deinit: DeinitFunc) {
        self.map.insert(decl, deinit);
    }

    /// The deinitializer registered for `decl`, if any.
    pub fn lookup(&self, decl: NominalId) -> Option<&DeinitFunc> {
        self.map.get(&decl)
    }

    /// Number of registered deinitializers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no deinitializer is registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
