//! Ownership-typed IR for the Lumen compiler.
//!
//! This crate provides the substrate that ownership-level optimization
//! passes read and mutate:
//!
//! - **IR entities** ([`Function`], [`Block`], [`InstData`], [`ValueData`]) —
//!   a basic-block intermediate representation with arena-owned
//!   instructions and values, so handles stay stable while passes insert
//!   and remove instructions in place.
//! - **Types** ([`TypePool`], [`TypeId`], [`NominalDecl`]) — interned types
//!   carrying the two attributes the optimizer queries constantly:
//!   noncopyable (move-only) and loadable (register-representable).
//! - **Generic substitution** ([`SubstitutionMap`], [`context_substitution`])
//!   — binding a declaration's generic parameters to the concrete types at
//!   a use site.
//! - **Calling conventions** ([`Signature`], [`ParamConvention`]) — how each
//!   parameter, including the implicit self of a deinitializer, is passed:
//!   directly (by value) or indirectly (by address).
//! - **Deinit registry** ([`DeinitRegistry`]) — the compilation unit's
//!   lookup from move-only nominal declaration to its synthesized
//!   deinitializer.
//!
//! # Design
//!
//! Ownership is explicit on every value ([`Ownership`]): owned values have
//! exactly one consuming use, guaranteed values are temporary observations,
//! unowned values carry no responsibility. Destruction of an owned
//! move-only value is a dedicated instruction (`destroy_value` /
//! `destroy_addr`) so later passes can reason about — and rewrite — it.

pub mod builder;
mod ir;
mod name;
mod registry;
mod subst;
mod types;

pub use builder::FunctionBuilder;
pub use ir::{
    AbiParam, Block, BlockId, FuncId, Function, InstData, InstId, InstKind, LoadMode, Ownership,
    ParamConvention, Signature, Stage, StoreMode, Terminator, ValueCategory, ValueData, ValueDef,
    ValueId,
};
pub use name::{Name, StringInterner};
pub use registry::{DeinitFunc, DeinitRegistry};
pub use subst::{context_substitution, SubstitutionMap};
pub use types::{BuiltinType, NominalDecl, NominalId, TypeId, TypeKind, TypePool};
