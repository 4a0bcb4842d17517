//! Generic substitution maps.
//!
//! A deinitializer is declared once, generically; the value being destroyed
//! is a concrete instantiation. A [`SubstitutionMap`] binds the
//! declaration's generic parameters to the concrete types in play at a use
//! site so the call can be emitted against the generic declaration.
//!
//! Bindings are positional: entry `i` replaces the declaration's parameter
//! `i`. Conformance records ride along with the type in this IR, so the map
//! carries types only.

use smallvec::SmallVec;

use crate::{NominalId, TypeId, TypePool};

/// Positional binding of a generic context's parameters to concrete types.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    replacements: SmallVec<[TypeId; 2]>,
}

impl SubstitutionMap {
    /// The empty map, used for non-generic contexts.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a map from replacement types in parameter order.
    pub fn from_types(types: impl IntoIterator<Item = TypeId>) -> Self {
        Self {
            replacements: types.into_iter().collect(),
        }
    }

    /// True for the empty (non-generic) map.
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    /// The replacement types, in parameter order.
    pub fn replacement_types(&self) -> &[TypeId] {
        &self.replacements
    }
}

/// Derive the substitution map for using `decl`'s generic context at the
/// concrete type `ty`.
///
/// The concrete type must be an instantiation of `decl`; its generic
/// arguments become the replacements. Non-generic declarations yield the
/// empty map.
pub fn context_substitution(pool: &TypePool, ty: TypeId, decl: NominalId) -> SubstitutionMap {
    debug_assert_eq!(
        pool.nominal_decl_of(ty),
        Some(decl),
        "type is not an instantiation of the given declaration",
    );
    SubstitutionMap::from_types(pool.generic_args(ty).iter().copied())
}
