//! Shared test utilities for the devirtualization pass.
//!
//! Consolidates the fixture and inspection helpers used across the
//! classifier, rewriter, and end-to-end tests. Only compiled in test
//! builds.

use lumen_ir::{
    DeinitFunc, FuncId, Function, FunctionBuilder, InstKind, Name, NominalDecl, NominalId,
    ParamConvention, Signature, TypeId, TypePool,
};

use crate::{DeinitDevirtualizer, DevirtOptions, Invalidations, PassContext};

/// A type pool and deinit registry under construction for one test.
pub(crate) struct Fixture {
    pub pool: TypePool,
    pub registry: lumen_ir::DeinitRegistry,
    next_func: u32,
    next_name: u32,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            pool: TypePool::new(),
            registry: lumen_ir::DeinitRegistry::new(),
            next_func: 0,
            next_name: 100,
        }
    }

    /// Declare a nominal with the given attributes.
    pub(crate) fn declare(
        &mut self,
        noncopyable: bool,
        address_only: bool,
        generic_params: u32,
    ) -> NominalId {
        let name = Name::from_raw(self.next_name);
        self.next_name += 1;
        self.pool.declare_nominal(NominalDecl {
            name,
            module: Name::from_raw(1),
            generic_params,
            noncopyable,
            address_only,
        })
    }

    /// Register a fresh deinit function for `decl`; returns its id.
    pub(crate) fn register_deinit(
        &mut self,
        decl: NominalId,
        self_convention: ParamConvention,
    ) -> FuncId {
        let func = FuncId::new(self.next_func);
        self.next_func += 1;
        self.registry.register(
            decl,
            DeinitFunc {
                func,
                sig: Signature::deinit(self_convention),
            },
        );
        func
    }

    /// Declare a loadable move-only nominal with a registered deinit and
    /// return its (non-generic) type.
    pub(crate) fn move_only_with_deinit(&mut self, self_convention: ParamConvention) -> TypeId {
        let decl = self.declare(true, false, 0);
        self.register_deinit(decl, self_convention);
        self.pool.nominal_type(decl, vec![])
    }

    /// A builder for a raw-stage function with a default name.
    pub(crate) fn builder(&self) -> FunctionBuilder {
        FunctionBuilder::new(Name::from_raw(1))
    }
}

/// Records every invalidation the pass reports.
#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    pub invalidations: Vec<Invalidations>,
}

impl PassContext for RecordingContext {
    fn invalidate(&mut self, kinds: Invalidations) {
        self.invalidations.push(kinds);
    }
}

/// Run the pass enabled over `func`, returning (changed, recorded context).
pub(crate) fn run_enabled(fixture: &Fixture, func: &mut Function) -> (bool, RecordingContext) {
    let mut ctx = RecordingContext::default();
    let pass = DeinitDevirtualizer::with_options(
        &fixture.registry,
        &fixture.pool,
        DevirtOptions { enabled: true },
    );
    let changed = pass.run(func, &mut ctx);
    (changed, ctx)
}

/// A short mnemonic for an instruction kind, for sequence assertions.
pub(crate) fn kind_name(kind: &InstKind) -> &'static str {
    match kind {
        InstKind::DestroyValue { .. } => "destroy_value",
        InstKind::DestroyAddr { .. } => "destroy_addr",
        InstKind::DropDeinit { .. } => "drop_deinit",
        InstKind::MoveValue { .. } => "move_value",
        InstKind::CopyValue { .. } => "copy_value",
        InstKind::BeginBorrow { .. } => "begin_borrow",
        InstKind::EndBorrow { .. } => "end_borrow",
        InstKind::AllocStack { .. } => "alloc_stack",
        InstKind::DeallocStack { .. } => "dealloc_stack",
        InstKind::Load { .. } => "load",
        InstKind::Store { .. } => "store",
        InstKind::FunctionRef { .. } => "function_ref",
        InstKind::Apply { .. } => "apply",
    }
}

/// Mnemonics for every instruction of one block, in order.
pub(crate) fn block_kind_names(func: &Function, block: usize) -> Vec<&'static str> {
    func.blocks[block]
        .insts
        .iter()
        .map(|&id| kind_name(&func.inst(id).kind))
        .collect()
}

/// Count instructions matching `pred` across the whole function.
pub(crate) fn count_insts(func: &Function, pred: impl Fn(&InstKind) -> bool) -> usize {
    func.blocks
        .iter()
        .flat_map(|block| block.insts.iter())
        .filter(|&&id| pred(&func.inst(id).kind))
        .count()
}
