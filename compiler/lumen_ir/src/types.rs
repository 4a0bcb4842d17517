//! Type pool — interned types and nominal declarations.
//!
//! Every type is interned exactly once in a [`TypePool`] and addressed by a
//! [`TypeId`]. Two attributes the optimizer queries constantly are computed
//! at interning time and cached on the type, so lookups are O(1) and never
//! traverse type structure:
//!
//! - **noncopyable** — values have a single owner; duplication is
//!   disallowed, only transfer or explicit destruction is valid.
//! - **loadable** — the representation fits in a register, as opposed to
//!   living only in memory (address-only).
//!
//! Nominal declarations (structs/enums with identity) are owned by the pool
//! and addressed by [`NominalId`]; a nominal *type* is a declaration applied
//! to zero or more generic arguments.

use rustc_hash::FxHashMap;

use crate::Name;

// ── ID newtypes ─────────────────────────────────────────────────────

/// Interned type handle within a [`TypePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// The unit type.
    pub const UNIT: Self = Self(0);
    /// The builtin integer type.
    pub const INT: Self = Self(1);
    /// The builtin boolean type.
    pub const BOOL: Self = Self(2);
    /// The opaque function type carried by function-reference values.
    ///
    /// Calling conventions are tracked on [`Signature`](crate::Signature),
    /// not in the type pool.
    pub const FN: Self = Self(3);

    /// Create a type ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Nominal declaration handle within a [`TypePool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NominalId(u32);

impl NominalId {
    /// Create a nominal ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ── Type structure ──────────────────────────────────────────────────

/// Builtin scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BuiltinType {
    Unit,
    Int,
    Bool,
    /// Opaque function type; see [`TypeId::FN`].
    Fn,
}

/// Structure of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A builtin scalar.
    Builtin(BuiltinType),
    /// A nominal declaration applied to its generic arguments.
    /// `args` is empty for non-generic nominals.
    Nominal { decl: NominalId, args: Vec<TypeId> },
    /// A structural tuple.
    Tuple(Vec<TypeId>),
    /// An unsubstituted generic parameter, by position in its context.
    Param(u32),
}

/// A nominal declaration: a struct or enum with identity.
///
/// Declarations carry the attributes their instantiations inherit; the
/// deinitializer (if any) is registered separately in the
/// [`DeinitRegistry`](crate::DeinitRegistry), keyed on the [`NominalId`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NominalDecl {
    /// The declared name.
    pub name: Name,
    /// The module the declaration belongs to.
    pub module: Name,
    /// Number of generic parameters (0 for non-generic declarations).
    pub generic_params: u32,
    /// Values of this type are move-only.
    pub noncopyable: bool,
    /// The representation lives only in memory; instantiations are not
    /// loadable.
    pub address_only: bool,
}

/// Interned type data: structure plus cached attributes.
#[derive(Clone, Debug)]
struct TypeData {
    kind: TypeKind,
    noncopyable: bool,
    loadable: bool,
}

// ── Pool ────────────────────────────────────────────────────────────

/// Interning pool for types and nominal declarations.
///
/// [`TypePool::new`] pre-interns the builtins at the fixed indices named by
/// the `TypeId` constants. Interning the same [`TypeKind`] twice returns the
/// same [`TypeId`].
pub struct TypePool {
    types: Vec<TypeData>,
    dedup: FxHashMap<TypeKind, TypeId>,
    nominals: Vec<NominalDecl>,
}

impl TypePool {
    /// Create a pool with the builtins pre-interned.
    pub fn new() -> Self {
        let mut pool = Self {
            types: Vec::new(),
            dedup: FxHashMap::default(),
            nominals: Vec::new(),
        };
        let unit = pool.intern(TypeKind::Builtin(BuiltinType::Unit));
        let int = pool.intern(TypeKind::Builtin(BuiltinType::Int));
        let bool_ = pool.intern(TypeKind::Builtin(BuiltinType::Bool));
        let fn_ = pool.intern(TypeKind::Builtin(BuiltinType::Fn));
        debug_assert_eq!(unit, TypeId::UNIT);
        debug_assert_eq!(int, TypeId::INT);
        debug_assert_eq!(bool_, TypeId::BOOL);
        debug_assert_eq!(fn_, TypeId::FN);
        pool
    }

    /// Register a nominal declaration.
    pub fn declare_nominal(&mut self, decl: NominalDecl) -> NominalId {
        let id = NominalId::new(
            u32::try_from(self.nominals.len())
                .unwrap_or_else(|_| panic!("nominal count exceeds u32::MAX")),
        );
        self.nominals.push(decl);
        id
    }

    /// Look up a nominal declaration.
    pub fn nominal(&self, id: NominalId) -> &NominalDecl {
        debug_assert!(
            id.index() < self.nominals.len(),
            "NominalId {} out of bounds (have {} declarations)",
            id.raw(),
            self.nominals.len(),
        );
        &self.nominals[id.index()]
    }

    /// Intern a type, computing its attributes.
    pub fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.dedup.get(&kind) {
            return id;
        }
        let (noncopyable, loadable) = self.attributes_of(&kind);
        let id = TypeId::new(
            u32::try_from(self.types.len())
                .unwrap_or_else(|_| panic!("type count exceeds u32::MAX")),
        );
        self.dedup.insert(kind.clone(), id);
        self.types.push(TypeData {
            kind,
            noncopyable,
            loadable,
        });
        id
    }

    /// Intern a nominal type for `decl` applied to `args`.
    ///
    /// # Panics
    ///
    /// Debug-panics if the argument count does not match the declaration's
    /// generic parameter count.
    pub fn nominal_type(&mut self, decl: NominalId, args: Vec<TypeId>) -> TypeId {
        debug_assert_eq!(
            args.len(),
            self.nominal(decl).generic_params as usize,
            "generic argument count mismatch for nominal {}",
            decl.raw(),
        );
        self.intern(TypeKind::Nominal { decl, args })
    }

    /// Intern a tuple type.
    pub fn tuple(&mut self, elems: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Tuple(elems))
    }

    /// The structure of an interned type.
    pub fn kind(&self, ty: TypeId) -> &TypeKind {
        debug_assert!(
            ty.index() < self.types.len(),
            "TypeId {} out of bounds (have {} types)",
            ty.raw(),
            self.types.len(),
        );
        &self.types[ty.index()].kind
    }

    /// Whether values of this type are move-only.
    pub fn is_noncopyable(&self, ty: TypeId) -> bool {
        self.types[ty.index()].noncopyable
    }

    /// Whether the type's representation can live in a register.
    pub fn is_loadable(&self, ty: TypeId) -> bool {
        self.types[ty.index()].loadable
    }

    /// The nominal declaration backing this type, if it has one.
    pub fn nominal_decl_of(&self, ty: TypeId) -> Option<NominalId> {
        match self.kind(ty) {
            TypeKind::Nominal { decl, .. } => Some(*decl),
            _ => None,
        }
    }

    /// The generic arguments of a nominal type, or the elements of a tuple.
    /// Empty for everything else.
    pub fn generic_args(&self, ty: TypeId) -> &[TypeId] {
        match self.kind(ty) {
            TypeKind::Nominal { args, .. } => args,
            TypeKind::Tuple(elems) => elems,
            _ => &[],
        }
    }

    /// Attributes for a type about to be interned.
    ///
    /// Builtins are copyable and loadable. Nominals inherit from their
    /// declaration. Tuples are noncopyable if any element is and loadable
    /// only if every element is. An unsubstituted generic parameter is
    /// conservatively copyable and address-only: nothing is known about its
    /// representation, and the destroy devirtualizer must never touch it.
    fn attributes_of(&self, kind: &TypeKind) -> (bool, bool) {
        match kind {
            TypeKind::Builtin(_) => (false, true),
            TypeKind::Nominal { decl, .. } => {
                let d = self.nominal(*decl);
                (d.noncopyable, !d.address_only)
            }
            TypeKind::Tuple(elems) => {
                let noncopyable = elems.iter().any(|&e| self.is_noncopyable(e));
                let loadable = elems.iter().all(|&e| self.is_loadable(e));
                (noncopyable, loadable)
            }
            TypeKind::Param(_) => (false, false),
        }
    }
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ───────────────────────────────────────────────────────────
