//! Ownership-typed IR — functions, basic blocks, instructions, values.
//!
//! The IR follows the same basic-block structure as LLVM IR and Rust's MIR:
//!
//! - **[`Function`]** — a function body: blocks plus two arenas (instructions
//!   and values) that give every entity a stable handle.
//! - **[`Block`]** — parameters, an ordered list of [`InstId`]s, and a
//!   [`Terminator`].
//! - **[`InstData`]** — one instruction: a closed [`InstKind`] variant plus
//!   its result value, if it produces one.
//! - **[`ValueData`]** — an SSA-style value: type, ownership qualifier,
//!   value category (register value vs. memory address), and a
//!   back-reference to its single definition.
//!
//! Blocks reference instructions by handle rather than storing them inline,
//! so passes can insert and remove instructions in place without
//! invalidating any handle. Erasing an instruction removes it from its
//! block; arena slots are never reused.

use crate::{Name, SubstitutionMap, TypeId};

// ── ID newtypes ─────────────────────────────────────────────────────

/// SSA value handle within a [`Function`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ValueId(u32);

impl ValueId {
    /// Create a value ID from a raw index.
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

/// Instruction handle within a [`Function`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct InstId(u32);

impl InstId {
    /// Create an instruction ID from a raw index.
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

/// Basic block handle within a [`Function`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// Create a block ID from a raw index.
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

/// Handle for a function known to the compilation unit.
///
/// Opaque here: function-reference instructions and the deinit registry
/// hand these around without this crate owning a function table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct FuncId(u32);

impl FuncId {
    /// Create a function ID from a raw index.
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

// ── Qualifiers ──────────────────────────────────────────────────────

/// Ownership qualifier on a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Ownership {
    /// The current reference owns the value; it must be consumed exactly
    /// once (destroyed or forwarded).
    Owned,
    /// The value is observed temporarily; the observer must not consume it.
    Guaranteed,
    /// No ownership responsibility (trivial values, addresses, function
    /// references).
    Unowned,
}

/// Whether a value is a register value or a memory address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueCategory {
    /// An in-register value of its type.
    Object,
    /// The address of a memory location holding a value of its type.
    Address,
}

/// Ownership semantics of a [`InstKind::Load`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadMode {
    /// The load consumes the memory: afterwards the location no longer
    /// holds a valid value.
    Take,
    /// The load copies; the memory stays valid. Never legal for
    /// noncopyable types.
    Copy,
}

/// Ownership semantics of a [`InstKind::Store`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum StoreMode {
    /// The location is uninitialized; the store initializes it and consumes
    /// the stored value.
    Init,
    /// The location holds a value that is destroyed before the new value is
    /// stored.
    Assign,
}

/// Processing stage of a function.
///
/// Ownership-level passes such as deinit devirtualization run only on
/// [`Raw`](Stage::Raw) functions, immediately after move-only verification
/// and before general optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stage {
    /// Pre general-optimization; ownership invariants verified, nothing
    /// lowered yet.
    Raw,
    /// General optimization has begun; destroys may have been decomposed.
    Canonical,
}

// ── Calling conventions ─────────────────────────────────────────────

/// How a parameter is passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamConvention {
    /// By value, in a register.
    Direct,
    /// By address.
    Indirect,
}

impl ParamConvention {
    /// Whether the parameter is passed by address.
    #[inline]
    pub fn is_indirect(self) -> bool {
        matches!(self, ParamConvention::Indirect)
    }
}

/// One parameter slot of a [`Signature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbiParam {
    /// How the parameter is passed.
    pub convention: ParamConvention,
}

/// A function's calling convention: per-parameter conventions plus the
/// positional index of the implicit self parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    params: smallvec::SmallVec<[AbiParam; 2]>,
    self_index: usize,
}

impl Signature {
    /// Build a signature.
    ///
    /// # Panics
    ///
    /// Debug-panics if `self_index` is out of range.
    pub fn new(params: impl IntoIterator<Item = AbiParam>, self_index: usize) -> Self {
        let params: smallvec::SmallVec<[AbiParam; 2]> = params.into_iter().collect();
        debug_assert!(
            self_index < params.len(),
            "self index {} out of range for {} parameters",
            self_index,
            params.len(),
        );
        Self { params, self_index }
    }

    /// The signature of a deinitializer: a single self parameter with the
    /// given convention.
    pub fn deinit(self_convention: ParamConvention) -> Self {
        Self::new(
            [AbiParam {
                convention: self_convention,
            }],
            0,
        )
    }

    /// All parameter slots, in positional order.
    pub fn params(&self) -> &[AbiParam] {
        &self.params
    }

    /// Positional index of the implicit self parameter.
    pub fn self_index(&self) -> usize {
        self.self_index
    }

    /// Convention of the implicit self parameter.
    pub fn self_convention(&self) -> ParamConvention {
        self.params[self.self_index].convention
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// The single definition of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueDef {
    /// Parameter `index` of `block`.
    Param { block: BlockId, index: u32 },
    /// Result of an instruction.
    Inst(InstId),
}

/// An SSA-style value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValueData {
    /// The value's type.
    pub ty: TypeId,
    /// Ownership qualifier.
    pub ownership: Ownership,
    /// Register value or memory address.
    pub category: ValueCategory,
    /// Where the value is defined.
    pub def: ValueDef,
}

// ── Instructions ────────────────────────────────────────────────────

/// A single instruction.
///
/// A closed sum: passes dispatch over instruction kinds with exhaustive,
/// compiler-checked matches rather than chains of dynamic casts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstKind {
    /// Implicitly destroy an owned register value. The unique consuming
    /// use of its operand.
    DestroyValue { operand: ValueId },
    /// Implicitly destroy the value held at an address, leaving the memory
    /// uninitialized.
    DestroyAddr { operand: ValueId },
    /// Marker asserting that the following destruction of the result must
    /// bypass the type's deinitializer (teardown already handled).
    /// Forwards its operand: the result mirrors the operand's category.
    DropDeinit { operand: ValueId },
    /// Ownership-forwarding move; no runtime effect.
    MoveValue { operand: ValueId },
    /// Explicit copy of a copyable value.
    CopyValue { operand: ValueId },
    /// Begin a guaranteed borrow of the operand.
    BeginBorrow { operand: ValueId },
    /// End the borrow introduced by a `BeginBorrow`.
    EndBorrow { operand: ValueId },
    /// Allocate an uninitialized stack slot for a value of `ty`; the
    /// result is the slot's address.
    AllocStack { ty: TypeId },
    /// Deallocate a stack slot. Must match a dominating `AllocStack` of
    /// the same address on the same path.
    DeallocStack { addr: ValueId },
    /// Load the value out of an address.
    Load { addr: ValueId, mode: LoadMode },
    /// Store a value into an address.
    Store {
        value: ValueId,
        addr: ValueId,
        mode: StoreMode,
    },
    /// Reference to a function known to the compilation unit.
    FunctionRef { func: FuncId },
    /// Call `callee` with the given substitutions and arguments.
    Apply {
        callee: ValueId,
        subs: SubstitutionMap,
        args: Vec<ValueId>,
    },
}

impl InstKind {
    /// All values read by this instruction, in operand order.
    ///
    /// Results are definitions, not uses, and are not included.
    pub fn used_values(&self) -> Vec<ValueId> {
        match self {
            InstKind::DestroyValue { operand }
            | InstKind::DestroyAddr { operand }
            | InstKind::DropDeinit { operand }
            | InstKind::MoveValue { operand }
            | InstKind::CopyValue { operand }
            | InstKind::BeginBorrow { operand }
            | InstKind::EndBorrow { operand } => vec![*operand],

            InstKind::AllocStack { .. } | InstKind::FunctionRef { .. } => vec![],

            InstKind::DeallocStack { addr } | InstKind::Load { addr, .. } => vec![*addr],

            InstKind::Store { value, addr, .. } => vec![*value, *addr],

            InstKind::Apply { callee, args, .. } => {
                let mut out = Vec::with_capacity(1 + args.len());
                out.push(*callee);
                out.extend_from_slice(args);
                out
            }
        }
    }
}

/// An instruction plus its result value, if it produces one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstData {
    /// What the instruction does.
    pub kind: InstKind,
    /// The value it defines, if any.
    pub result: Option<ValueId>,
}

// ── Terminators ─────────────────────────────────────────────────────

/// How control leaves a basic block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Terminator {
    /// Return from the function.
    Return { value: Option<ValueId> },
    /// Unconditional jump.
    Br { target: BlockId },
    /// Conditional branch on a boolean.
    CondBr {
        cond: ValueId,
        then_block: BlockId,
        else_block: BlockId,
    },
    /// The block never transfers control (also the placeholder for blocks
    /// under construction).
    Unreachable,
}

// ── Blocks ──────────────────────────────────────────────────────────

/// A basic block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// This block's identifier.
    pub id: BlockId,
    /// Block parameters (the entry block's parameters are the function's).
    pub params: Vec<ValueId>,
    /// Instruction handles, in execution order.
    pub insts: Vec<InstId>,
    /// How control leaves the block.
    pub terminator: Terminator,
}

// ── Functions ───────────────────────────────────────────────────────

/// A function body.
///
/// Owns every block, instruction, and value in the body. Instructions and
/// values live in arenas so handles stay valid across in-place mutation of
/// block instruction lists.
#[derive(Clone, Debug)]
pub struct Function {
    /// The function's mangled name.
    pub name: Name,
    /// Processing stage.
    pub stage: Stage,
    /// Set by deserialization when the body was imported from another
    /// compilation unit and has already been through its pipeline.
    pub externally_resolved: bool,
    /// Basic blocks in layout order; `blocks[0]` is the entry.
    pub blocks: Vec<Block>,
    insts: Vec<InstData>,
    values: Vec<ValueData>,
}

impl Function {
    /// Create an empty function.
    pub fn new(name: Name, stage: Stage) -> Self {
        Self {
            name,
            stage,
            externally_resolved: false,
            blocks: Vec::new(),
            insts: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Append a new, empty block (terminator [`Terminator::Unreachable`]).
    pub fn push_block(&mut self) -> BlockId {
        let id = BlockId::new(
            u32::try_from(self.blocks.len())
                .unwrap_or_else(|_| panic!("block count exceeds u32::MAX")),
        );
        self.blocks.push(Block {
            id,
            params: Vec::new(),
            insts: Vec::new(),
            terminator: Terminator::Unreachable,
        });
        id
    }

    /// Look up a block.
    pub fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id.index()]
    }

    /// Look up a block mutably.
    pub fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id.index()]
    }

    /// Look up an instruction.
    pub fn inst(&self, id: InstId) -> &InstData {
        debug_assert!(
            id.index() < self.insts.len(),
            "InstId {} out of bounds (have {} instructions)",
            id.raw(),
            self.insts.len(),
        );
        &self.insts[id.index()]
    }

    /// Look up a value.
    pub fn value(&self, id: ValueId) -> &ValueData {
        debug_assert!(
            id.index() < self.values.len(),
            "ValueId {} out of bounds (have {} values)",
            id.raw(),
            self.values.len(),
        );
        &self.values[id.index()]
    }

    /// The value an instruction defines, if any.
    pub fn inst_result(&self, id: InstId) -> Option<ValueId> {
        self.inst(id).result
    }

    /// The instruction defining a value, or `None` for block parameters.
    pub fn defining_inst(&self, value: ValueId) -> Option<InstId> {
        match self.value(value).def {
            ValueDef::Inst(id) => Some(id),
            ValueDef::Param { .. } => None,
        }
    }

    /// Add a parameter value to a block.
    pub fn add_block_param(
        &mut self,
        block: BlockId,
        ty: TypeId,
        ownership: Ownership,
        category: ValueCategory,
    ) -> ValueId {
        let index = u32::try_from(self.blocks[block.index()].params.len())
            .unwrap_or_else(|_| panic!("parameter count exceeds u32::MAX"));
        let value = self.new_value(ty, ownership, category, ValueDef::Param { block, index });
        self.blocks[block.index()].params.push(value);
        value
    }

    /// Allocate an instruction in the arena, creating its result value.
    ///
    /// The instruction is not yet in any block; the caller places the
    /// returned handle. Result type, ownership, and category are derived
    /// from the kind and its operands.
    pub fn make_inst(&mut self, kind: InstKind) -> InstId {
        let id = InstId::new(
            u32::try_from(self.insts.len())
                .unwrap_or_else(|_| panic!("instruction count exceeds u32::MAX")),
        );
        let result = self.result_value_for(&kind, id);
        self.insts.push(InstData { kind, result });
        id
    }

    /// Follow pure ownership-forwarding wrappers (move, copy, borrow) back
    /// to the underlying definition.
    pub fn strip_ownership_forwarding(&self, value: ValueId) -> ValueId {
        let mut current = value;
        loop {
            let Some(inst) = self.defining_inst(current) else {
                return current;
            };
            match self.inst(inst).kind {
                InstKind::MoveValue { operand }
                | InstKind::CopyValue { operand }
                | InstKind::BeginBorrow { operand } => current = operand,
                _ => return current,
            }
        }
    }

    fn new_value(
        &mut self,
        ty: TypeId,
        ownership: Ownership,
        category: ValueCategory,
        def: ValueDef,
    ) -> ValueId {
        let id = ValueId::new(
            u32::try_from(self.values.len())
                .unwrap_or_else(|_| panic!("value count exceeds u32::MAX")),
        );
        self.values.push(ValueData {
            ty,
            ownership,
            category,
            def,
        });
        id
    }

    /// Result value rules, per instruction kind.
    fn result_value_for(&mut self, kind: &InstKind, inst: InstId) -> Option<ValueId> {
        let (ty, ownership, category) = match *kind {
            InstKind::AllocStack { ty } => (ty, Ownership::Unowned, ValueCategory::Address),
            InstKind::Load { addr, .. } => {
                (self.value(addr).ty, Ownership::Owned, ValueCategory::Object)
            }
            InstKind::FunctionRef { .. } => {
                (TypeId::FN, Ownership::Unowned, ValueCategory::Object)
            }
            // Calls this IR represents are teardown entry points returning
            // unit; richer function types live outside this substrate.
            InstKind::Apply { .. } => (TypeId::UNIT, Ownership::Unowned, ValueCategory::Object),
            InstKind::DropDeinit { operand } => {
                let v = *self.value(operand);
                let ownership = match v.category {
                    ValueCategory::Object => Ownership::Owned,
                    ValueCategory::Address => Ownership::Unowned,
                };
                (v.ty, ownership, v.category)
            }
            InstKind::MoveValue { operand } | InstKind::CopyValue { operand } => {
                (self.value(operand).ty, Ownership::Owned, ValueCategory::Object)
            }
            InstKind::BeginBorrow { operand } => (
                self.value(operand).ty,
                Ownership::Guaranteed,
                ValueCategory::Object,
            ),
            InstKind::DestroyValue { .. }
            | InstKind::DestroyAddr { .. }
            | InstKind::EndBorrow { .. }
            | InstKind::DeallocStack { .. }
            | InstKind::Store { .. } => return None,
        };
        Some(self.new_value(ty, ownership, category, ValueDef::Inst(inst)))
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::mem;

    use crate::{Stage, SubstitutionMap, TypeId};

    use super::*;

    fn empty_func() -> Function {
        let mut func = Function::new(Name::from_raw(1), Stage::Raw);
        func.push_block();
        func
    }

    #[test]
    fn id_sizes() {
        assert_eq!(mem::size_of::<ValueId>(), 4);
        assert_eq!(mem::size_of::<InstId>(), 4);
        assert_eq!(mem::size_of::<BlockId>(), 4);
        assert_eq!(mem::size_of::<FuncId>(), 4);
    }

    #[test]
    fn block_ids_are_sequential() {
        let mut func = Function::new(Name::from_raw(1), Stage::Raw);
        assert_eq!(func.push_block(), BlockId::new(0));
        assert_eq!(func.push_block(), BlockId::new(1));
        assert_eq!(func.block(BlockId::new(1)).id, BlockId::new(1));
    }

    #[test]
    fn block_param_defines_a_value() {
        let mut func = empty_func();
        let p = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let data = func.value(p);
        assert_eq!(data.ty, TypeId::INT);
        assert_eq!(data.ownership, Ownership::Owned);
        assert_eq!(
            data.def,
            ValueDef::Param {
                block: BlockId::new(0),
                index: 0
            }
        );
        assert_eq!(func.defining_inst(p), None);
        assert_eq!(func.block(BlockId::new(0)).params, vec![p]);
    }

    #[test]
    fn alloc_stack_result_is_unowned_address() {
        let mut func = empty_func();
        let inst = func.make_inst(InstKind::AllocStack { ty: TypeId::INT });
        let slot = func.inst_result(inst).unwrap_or_else(|| panic!("no result"));
        let data = func.value(slot);
        assert_eq!(data.ty, TypeId::INT);
        assert_eq!(data.ownership, Ownership::Unowned);
        assert_eq!(data.category, ValueCategory::Address);
        assert_eq!(data.def, ValueDef::Inst(inst));
    }

    #[test]
    fn load_result_is_owned_object_of_pointee_type() {
        let mut func = empty_func();
        let alloc = func.make_inst(InstKind::AllocStack { ty: TypeId::BOOL });
        let slot = func.inst_result(alloc).unwrap_or_else(|| panic!("no result"));
        let load = func.make_inst(InstKind::Load {
            addr: slot,
            mode: LoadMode::Take,
        });
        let loaded = func.inst_result(load).unwrap_or_else(|| panic!("no result"));
        let data = func.value(loaded);
        assert_eq!(data.ty, TypeId::BOOL);
        assert_eq!(data.ownership, Ownership::Owned);
        assert_eq!(data.category, ValueCategory::Object);
    }

    #[test]
    fn function_ref_and_apply_results() {
        let mut func = empty_func();
        let fr = func.make_inst(InstKind::FunctionRef {
            func: FuncId::new(3),
        });
        let callee = func.inst_result(fr).unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.value(callee).ty, TypeId::FN);

        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let apply = func.make_inst(InstKind::Apply {
            callee,
            subs: SubstitutionMap::empty(),
            args: vec![x],
        });
        let result = func.inst_result(apply).unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.value(result).ty, TypeId::UNIT);
    }

    #[test]
    fn consuming_instructions_have_no_result() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let destroy = func.make_inst(InstKind::DestroyValue { operand: x });
        assert_eq!(func.inst_result(destroy), None);
    }

    #[test]
    fn drop_deinit_mirrors_operand_category() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let obj_guard = func.make_inst(InstKind::DropDeinit { operand: x });
        let g = func
            .inst_result(obj_guard)
            .unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.value(g).category, ValueCategory::Object);
        assert_eq!(func.value(g).ownership, Ownership::Owned);

        let alloc = func.make_inst(InstKind::AllocStack { ty: TypeId::INT });
        let slot = func.inst_result(alloc).unwrap_or_else(|| panic!("no result"));
        let addr_guard = func.make_inst(InstKind::DropDeinit { operand: slot });
        let ag = func
            .inst_result(addr_guard)
            .unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.value(ag).category, ValueCategory::Address);
        assert_eq!(func.value(ag).ownership, Ownership::Unowned);
    }

    #[test]
    fn begin_borrow_result_is_guaranteed() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let borrow = func.make_inst(InstKind::BeginBorrow { operand: x });
        let b = func.inst_result(borrow).unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.value(b).ownership, Ownership::Guaranteed);
    }

    #[test]
    fn strip_ownership_forwarding_walks_chains() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let m = func.make_inst(InstKind::MoveValue { operand: x });
        let moved = func.inst_result(m).unwrap_or_else(|| panic!("no result"));
        let b = func.make_inst(InstKind::BeginBorrow { operand: moved });
        let borrowed = func.inst_result(b).unwrap_or_else(|| panic!("no result"));
        assert_eq!(func.strip_ownership_forwarding(borrowed), x);
    }

    #[test]
    fn strip_ownership_forwarding_stops_at_non_forwarding_defs() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let guard = func.make_inst(InstKind::DropDeinit { operand: x });
        let g = func.inst_result(guard).unwrap_or_else(|| panic!("no result"));
        let m = func.make_inst(InstKind::MoveValue { operand: g });
        let moved = func.inst_result(m).unwrap_or_else(|| panic!("no result"));
        // Unwrapping stops at the drop_deinit, not at the block parameter.
        assert_eq!(func.strip_ownership_forwarding(moved), g);
        assert_eq!(func.strip_ownership_forwarding(x), x);
    }

    #[test]
    fn used_values_per_kind() {
        let mut func = empty_func();
        let x = func.add_block_param(
            BlockId::new(0),
            TypeId::INT,
            Ownership::Owned,
            ValueCategory::Object,
        );
        let alloc = func.make_inst(InstKind::AllocStack { ty: TypeId::INT });
        let slot = func.inst_result(alloc).unwrap_or_else(|| panic!("no result"));

        assert!(func.inst(alloc).kind.used_values().is_empty());
        assert_eq!(
            InstKind::Store {
                value: x,
                addr: slot,
                mode: StoreMode::Init,
            }
            .used_values(),
            vec![x, slot]
        );
        assert_eq!(
            InstKind::DestroyValue { operand: x }.used_values(),
            vec![x]
        );

        let fr = func.make_inst(InstKind::FunctionRef {
            func: FuncId::new(0),
        });
        let callee = func.inst_result(fr).unwrap_or_else(|| panic!("no result"));
        assert_eq!(
            InstKind::Apply {
                callee,
                subs: SubstitutionMap::empty(),
                args: vec![slot],
            }
            .used_values(),
            vec![callee, slot]
        );
    }

    #[test]
    fn deinit_signature_self_convention() {
        let sig = Signature::deinit(ParamConvention::Indirect);
        assert_eq!(sig.params().len(), 1);
        assert_eq!(sig.self_index(), 0);
        assert_eq!(sig.self_convention(), ParamConvention::Indirect);
        assert!(sig.self_convention().is_indirect());

        let direct = Signature::deinit(ParamConvention::Direct);
        assert!(!direct.self_convention().is_indirect());
    }

    #[test]
    fn multi_param_signature_self_index() {
        let sig = Signature::new(
            [
                AbiParam {
                    convention: ParamConvention::Direct,
                },
                AbiParam {
                    convention: ParamConvention::Indirect,
                },
            ],
            1,
        );
        assert_eq!(sig.self_convention(), ParamConvention::Indirect);
    }
}
