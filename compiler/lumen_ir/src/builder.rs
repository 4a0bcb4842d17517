//! Function construction API.
//!
//! Follows the "position at a block, emit instructions, terminate" pattern
//! of LLVM's `IRBuilder`: the builder owns the in-progress [`Function`],
//! appends each emitted instruction to the current block, and is consumed
//! by [`finish`](FunctionBuilder::finish).

use crate::{
    BlockId, FuncId, Function, InstId, InstKind, LoadMode, Name, Ownership, Stage, StoreMode,
    SubstitutionMap, Terminator, TypeId, ValueCategory, ValueId,
};

/// Builder for an in-progress function.
pub struct FunctionBuilder {
    func: Function,
    current: BlockId,
}

impl FunctionBuilder {
    /// Start a raw-stage function with an empty entry block.
    pub fn new(name: Name) -> Self {
        Self::with_stage(name, Stage::Raw)
    }

    /// Start a function at an explicit stage.
    pub fn with_stage(name: Name, stage: Stage) -> Self {
        let mut func = Function::new(name, stage);
        let entry = func.push_block();
        Self {
            func,
            current: entry,
        }
    }

    /// Add a parameter to the current block. Entry-block parameters are the
    /// function's parameters.
    pub fn add_param(
        &mut self,
        ty: TypeId,
        ownership: Ownership,
        category: ValueCategory,
    ) -> ValueId {
        self.func
            .add_block_param(self.current, ty, ownership, category)
    }

    /// Append a new block (not yet positioned at).
    pub fn create_block(&mut self) -> BlockId {
        self.func.push_block()
    }

    /// Position subsequent emissions at `block`.
    pub fn switch_to(&mut self, block: BlockId) {
        self.current = block;
    }

    /// Emit an instruction at the end of the current block.
    pub fn emit(&mut self, kind: InstKind) -> InstId {
        let id = self.func.make_inst(kind);
        self.func.block_mut(self.current).insts.push(id);
        id
    }

    /// Emit an instruction and return its result value.
    ///
    /// # Panics
    ///
    /// Panics if the kind produces no result.
    pub fn emit_for_result(&mut self, kind: InstKind) -> ValueId {
        let id = self.emit(kind);
        self.func
            .inst_result(id)
            .unwrap_or_else(|| panic!("instruction kind produces no result"))
    }

    // ── Typed emission helpers ──────────────────────────────────────

    /// `alloc_stack` — returns the slot address.
    pub fn alloc_stack(&mut self, ty: TypeId) -> ValueId {
        self.emit_for_result(InstKind::AllocStack { ty })
    }

    /// `dealloc_stack`.
    pub fn dealloc_stack(&mut self, addr: ValueId) -> InstId {
        self.emit(InstKind::DeallocStack { addr })
    }

    /// `store` with the given mode.
    pub fn store(&mut self, value: ValueId, addr: ValueId, mode: StoreMode) -> InstId {
        self.emit(InstKind::Store { value, addr, mode })
    }

    /// `load` with the given mode — returns the loaded value.
    pub fn load(&mut self, addr: ValueId, mode: LoadMode) -> ValueId {
        self.emit_for_result(InstKind::Load { addr, mode })
    }

    /// `function_ref` — returns the callee value.
    pub fn function_ref(&mut self, func: FuncId) -> ValueId {
        self.emit_for_result(InstKind::FunctionRef { func })
    }

    /// `apply` — returns the call result.
    pub fn apply(
        &mut self,
        callee: ValueId,
        subs: SubstitutionMap,
        args: Vec<ValueId>,
    ) -> ValueId {
        self.emit_for_result(InstKind::Apply { callee, subs, args })
    }

    /// `destroy_value`.
    pub fn destroy_value(&mut self, operand: ValueId) -> InstId {
        self.emit(InstKind::DestroyValue { operand })
    }

    /// `destroy_addr`.
    pub fn destroy_addr(&mut self, operand: ValueId) -> InstId {
        self.emit(InstKind::DestroyAddr { operand })
    }

    /// `drop_deinit` — returns the guarded forward of the operand.
    pub fn drop_deinit(&mut self, operand: ValueId) -> ValueId {
        self.emit_for_result(InstKind::DropDeinit { operand })
    }

    /// `move_value` — returns the forwarded value.
    pub fn move_value(&mut self, operand: ValueId) -> ValueId {
        self.emit_for_result(InstKind::MoveValue { operand })
    }

    /// `copy_value` — returns the copy.
    pub fn copy_value(&mut self, operand: ValueId) -> ValueId {
        self.emit_for_result(InstKind::CopyValue { operand })
    }

    /// `begin_borrow` — returns the guaranteed borrow.
    pub fn begin_borrow(&mut self, operand: ValueId) -> ValueId {
        self.emit_for_result(InstKind::BeginBorrow { operand })
    }

    /// `end_borrow`.
    pub fn end_borrow(&mut self, operand: ValueId) -> InstId {
        self.emit(InstKind::EndBorrow { operand })
    }

    /// Set the current block's terminator.
    pub fn terminate(&mut self, terminator: Terminator) {
        self.func.block_mut(self.current).terminator = terminator;
    }

    /// Read access to the function under construction.
    pub fn func(&self) -> &Function {
        &self.func
    }

    /// Finish, yielding the constructed function.
    pub fn finish(self) -> Function {
        self.func
    }
}
