//! Calling-convention bridging.
//!
//! The destroyed value is held one way (register value vs. memory address);
//! the deinitializer expects self another way (direct vs. indirect). This
//! module plans the bridge: a pure, total decision over the four cases. The
//! rewriter materializes the plan, so each case stays independently
//! testable.

use lumen_ir::ParamConvention;

use crate::classify::DestroyForm;

/// How to get the destroyed operand into the deinitializer's self slot.
///
/// Exactly one bridge per site: the source operand is consumed once, and
/// any stack temporary is paired with its deallocation on the same
/// straight-line path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfBridge {
    /// Register value, direct self: pass the value unchanged.
    PassValue,
    /// Register value, indirect self: allocate a stack temporary, store the
    /// value into it (consuming), pass the temporary's address, deallocate
    /// immediately after the call.
    SpillToStack,
    /// Address, indirect self: pass the address unchanged.
    PassAddress,
    /// Address, direct self: load the value out with take semantics (the
    /// memory is invalidated) and pass it. No deallocation — the memory is
    /// not owned by this transformation.
    LoadTake,
}

/// Choose the bridge for a destroy form and self convention.
pub fn plan_self_bridge(form: DestroyForm, self_convention: ParamConvention) -> SelfBridge {
    match (form, self_convention) {
        (DestroyForm::Value, ParamConvention::Direct) => SelfBridge::PassValue,
        (DestroyForm::Value, ParamConvention::Indirect) => SelfBridge::SpillToStack,
        (DestroyForm::Addr, ParamConvention::Indirect) => SelfBridge::PassAddress,
        (DestroyForm::Addr, ParamConvention::Direct) => SelfBridge::LoadTake,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_conventions_pass_through() {
        assert_eq!(
            plan_self_bridge(DestroyForm::Value, ParamConvention::Direct),
            SelfBridge::PassValue
        );
        assert_eq!(
            plan_self_bridge(DestroyForm::Addr, ParamConvention::Indirect),
            SelfBridge::PassAddress
        );
    }

    #[test]
    fn register_value_into_indirect_self_spills() {
        assert_eq!(
            plan_self_bridge(DestroyForm::Value, ParamConvention::Indirect),
            SelfBridge::SpillToStack
        );
    }

    #[test]
    fn address_into_direct_self_takes_a_load() {
        assert_eq!(
            plan_self_bridge(DestroyForm::Addr, ParamConvention::Direct),
            SelfBridge::LoadTake
        );
    }
}
