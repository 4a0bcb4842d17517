//! Destroy classification.
//!
//! Scans a candidate instruction and decides whether it is a destroy site
//! eligible for devirtualization. Every disqualification is a
//! [`SkipReason`], never an error: the destroy stays as found, which is
//! always semantically valid — just not devirtualized.

use std::fmt;

use lumen_ir::{Function, InstId, InstKind, NominalId, TypeId, TypePool, ValueId};

/// Whether the destroy consumes a register value or a memory address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestroyForm {
    /// `destroy_value` — the operand is an owned register value.
    Value,
    /// `destroy_addr` — the operand is the address of the value.
    Addr,
}

/// A destroy site that passed every classification rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EligibleDestroy {
    /// The destroyed operand.
    pub operand: ValueId,
    /// Register-value or memory-address form.
    pub form: DestroyForm,
    /// The operand's concrete type.
    pub ty: TypeId,
    /// The nominal declaration backing that type.
    pub decl: NominalId,
}

/// Why a site was left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The instruction is not a destroy at all.
    NotADestroy,
    /// The operand is guarded by a `drop_deinit` marker: destruction must
    /// bypass the deinitializer.
    DropDeinitGuard,
    /// Address form over a type that cannot live in a register.
    NonLoadableAddress,
    /// The type is copyable; it has no deinitializer to call.
    CopyableType,
    /// The type is not backed by a nominal declaration.
    NonNominalType,
    /// The declaration has no registered deinitializer.
    NoDeinitRegistered,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NotADestroy => "not-a-destroy",
            SkipReason::DropDeinitGuard => "drop-deinit-guard-present",
            SkipReason::NonLoadableAddress => "non-loadable-address",
            SkipReason::CopyableType => "copyable-type",
            SkipReason::NonNominalType => "non-nominal-type",
            SkipReason::NoDeinitRegistered => "no-deinit-registered",
        };
        f.write_str(text)
    }
}

/// Classify one instruction.
///
/// Rules, in order:
/// 1. Must be `destroy_value` or `destroy_addr`.
/// 2. The operand must not be guarded by `drop_deinit`. The value form
///    looks through ownership-forwarding wrappers first; the address form
///    inspects the operand's definition directly. Checked before
///    loadability: a guarded value is never devirtualized regardless of
///    memory form.
/// 3. Address form only: the type must be loadable.
/// 4. The type must be noncopyable.
/// 5. The type must resolve to a nominal declaration.
pub fn classify_destroy(
    func: &Function,
    pool: &TypePool,
    inst: InstId,
) -> Result<EligibleDestroy, SkipReason> {
    let (operand, form) = match func.inst(inst).kind {
        InstKind::DestroyValue { operand } => (operand, DestroyForm::Value),
        InstKind::DestroyAddr { operand } => (operand, DestroyForm::Addr),
        _ => return Err(SkipReason::NotADestroy),
    };

    let guard_source = match form {
        DestroyForm::Value => func.strip_ownership_forwarding(operand),
        DestroyForm::Addr => operand,
    };
    if is_drop_deinit_result(func, guard_source) {
        return Err(SkipReason::DropDeinitGuard);
    }

    let ty = func.value(operand).ty;
    if form == DestroyForm::Addr && !pool.is_loadable(ty) {
        return Err(SkipReason::NonLoadableAddress);
    }
    if !pool.is_noncopyable(ty) {
        return Err(SkipReason::CopyableType);
    }
    let Some(decl) = pool.nominal_decl_of(ty) else {
        return Err(SkipReason::NonNominalType);
    };

    Ok(EligibleDestroy {
        operand,
        form,
        ty,
        decl,
    })
}

fn is_drop_deinit_result(func: &Function, value: ValueId) -> bool {
    func.defining_inst(value)
        .is_some_and(|inst| matches!(func.inst(inst).kind, InstKind::DropDeinit { .. }))
}
