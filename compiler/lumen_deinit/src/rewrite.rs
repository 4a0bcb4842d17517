//! Destroy-site rewriting.
//!
//! Emits the devirtualized call sequence at the exact position of the
//! original destroy and removes the destroy, in a single splice. Later
//! instructions in the same traversal never observe a partial state, and
//! anything keyed on instruction position (debug-line mapping, liveness)
//! sees the replacement where the destroy used to be.

use lumen_ir::{Function, InstId, InstKind, LoadMode, StoreMode, ValueId};

use crate::bridge::{plan_self_bridge, SelfBridge};
use crate::classify::EligibleDestroy;
use crate::resolve::ResolvedDeinit;

/// Replace the destroy at `blocks[block].insts[index]` with a call to the
/// resolved deinitializer, bridging conventions as planned.
///
/// Returns the number of instructions inserted, so the driver can advance
/// its cursor past the replacement.
pub fn devirtualize_site(
    func: &mut Function,
    block: usize,
    index: usize,
    site: &EligibleDestroy,
    deinit: &ResolvedDeinit,
) -> usize {
    debug_assert!(matches!(
        func.inst(func.blocks[block].insts[index]).kind,
        InstKind::DestroyValue { .. } | InstKind::DestroyAddr { .. }
    ));

    let replacement = match plan_self_bridge(site.form, deinit.self_convention) {
        SelfBridge::PassValue | SelfBridge::PassAddress => {
            let func_ref = func.make_inst(InstKind::FunctionRef { func: deinit.func });
            let callee = result_of(func, func_ref);
            let apply = func.make_inst(InstKind::Apply {
                callee,
                subs: deinit.subs.clone(),
                args: vec![site.operand],
            });
            vec![func_ref, apply]
        }
        SelfBridge::SpillToStack => {
            let alloc = func.make_inst(InstKind::AllocStack { ty: site.ty });
            let slot = result_of(func, alloc);
            let store = func.make_inst(InstKind::Store {
                value: site.operand,
                addr: slot,
                mode: StoreMode::Init,
            });
            let func_ref = func.make_inst(InstKind::FunctionRef { func: deinit.func });
            let callee = result_of(func, func_ref);
            let apply = func.make_inst(InstKind::Apply {
                callee,
                subs: deinit.subs.clone(),
                args: vec![slot],
            });
            let dealloc = func.make_inst(InstKind::DeallocStack { addr: slot });
            vec![alloc, store, func_ref, apply, dealloc]
        }
        SelfBridge::LoadTake => {
            let func_ref = func.make_inst(InstKind::FunctionRef { func: deinit.func });
            let callee = result_of(func, func_ref);
            let load = func.make_inst(InstKind::Load {
                addr: site.operand,
                mode: LoadMode::Take,
            });
            let taken = result_of(func, load);
            let apply = func.make_inst(InstKind::Apply {
                callee,
                subs: deinit.subs.clone(),
                args: vec![taken],
            });
            vec![func_ref, load, apply]
        }
    };

    let inserted = replacement.len();
    let removed: Vec<InstId> = func.blocks[block]
        .insts
        .splice(index..=index, replacement)
        .collect();
    debug_assert_eq!(removed.len(), 1);

    tracing::debug!(
        function = func.name.raw(),
        deinit = deinit.func.raw(),
        block,
        index,
        inserted,
        "devirtualized destroy"
    );
    inserted
}

fn result_of(func: &Function, inst: InstId) -> ValueId {
    func.inst_result(inst)
        .unwrap_or_else(|| panic!("emitted instruction is missing its result"))
}
