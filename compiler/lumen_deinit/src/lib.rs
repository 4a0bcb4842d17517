//! Move-only deinit devirtualization for the Lumen compiler.
//!
//! After move-only verification, every owned move-only value still dies
//! through an implicit `destroy_value` or `destroy_addr`. This pass
//! rewrites each eligible destroy into an explicit call to the value's
//! compiler-synthesized deinitializer, bridging the register/memory
//! mismatch between how the value is held and how the deinitializer
//! expects self (direct vs. indirect) with a stack temporary or a
//! take-load where the forms disagree.
//!
//! # Structure
//!
//! Driver → [`classify`] → (skip | [`resolve`] → [`bridge`] → [`rewrite`]).
//! Each instruction is visited exactly once per invocation; no state is
//! retained across instructions, functions, or invocations. Every
//! disqualifying condition is a recoverable skip that leaves the destroy
//! exactly as found; the only fatal condition is running the pass off the
//! raw stage, which is a scheduling bug in the surrounding pipeline.
//!
//! The deinit registry and type pool are passed in explicitly — the pass
//! declares its dependencies instead of reaching into ambient module
//! state.
//!
//! The pass ships disabled by default; see [`DevirtOptions::enabled`] for
//! the recorded rationale.

pub mod bridge;
pub mod classify;
pub mod resolve;
pub mod rewrite;

#[cfg(test)]
mod test_helpers;

use bitflags::bitflags;

use lumen_ir::{DeinitRegistry, Function, Stage, TypePool};

use crate::classify::{classify_destroy, SkipReason};
use crate::resolve::resolve_deinit;
use crate::rewrite::devirtualize_site;

pub use crate::bridge::{plan_self_bridge, SelfBridge};
pub use crate::classify::{DestroyForm, EligibleDestroy};
pub use crate::resolve::ResolvedDeinit;

bitflags! {
    /// Cached analysis categories a function pass can invalidate.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct Invalidations: u8 {
        /// Call-graph information derived from the function body.
        const CALLS = 1 << 0;
        /// Instruction-level analyses over the function body.
        const INSTRUCTIONS = 1 << 1;
    }
}

/// Hook into the surrounding pass pipeline.
///
/// A pass that mutates a function reports which cached analysis categories
/// for that function are now stale; the pipeline recomputes them before any
/// dependent pass runs.
pub trait PassContext {
    /// Mark analysis categories stale for the function being processed.
    fn invalidate(&mut self, kinds: Invalidations);
}

/// Configuration for the devirtualization pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct DevirtOptions {
    /// Whether the pass runs at all. Off by default.
    ///
    /// Known soundness gap: other optimizations may eliminate a destroy by
    /// destructuring the aggregate field-by-field rather than destroying
    /// the whole value, which silently defeats this devirtualization and
    /// masks missed-deinit bugs. Before flipping the default, re-audit
    /// whether earlier pipeline stages still preserve whole-value destroys,
    /// and keep the conservative bailouts until that audit happens.
    pub enabled: bool,
}

/// The move-only deinit devirtualization pass.
///
/// One instance processes any number of functions; it holds only read-only
/// capabilities (the deinit registry and the type pool) and per-run
/// options.
pub struct DeinitDevirtualizer<'a> {
    registry: &'a DeinitRegistry,
    pool: &'a TypePool,
    options: DevirtOptions,
}

impl<'a> DeinitDevirtualizer<'a> {
    /// Create the pass with default (disabled) options.
    pub fn new(registry: &'a DeinitRegistry, pool: &'a TypePool) -> Self {
        Self::with_options(registry, pool, DevirtOptions::default())
    }

    /// Create the pass with explicit options.
    pub fn with_options(
        registry: &'a DeinitRegistry,
        pool: &'a TypePool,
        options: DevirtOptions,
    ) -> Self {
        Self {
            registry,
            pool,
            options,
        }
    }

    /// Process one function. Returns whether anything changed.
    ///
    /// Returns immediately, inspecting nothing, when the pass is disabled
    /// or the function was imported already-optimized from another
    /// compilation unit. On change, reports calls and instructions stale
    /// through `ctx`.
    ///
    /// # Panics
    ///
    /// Panics if the function is not at [`Stage::Raw`]: the pass was
    /// scheduled out of order, which must surface loudly rather than skip.
    pub fn run(&self, func: &mut Function, ctx: &mut dyn PassContext) -> bool {
        if !self.options.enabled {
            return false;
        }
        // Don't rerun on deserialized functions.
        if func.externally_resolved {
            return false;
        }
        assert_eq!(
            func.stage,
            Stage::Raw,
            "deinit devirtualization must run on raw-stage functions",
        );

        tracing::debug!(function = func.name.raw(), "deinit devirtualization: visiting");
        let changed = self.transform(func);
        if changed {
            ctx.invalidate(Invalidations::CALLS | Invalidations::INSTRUCTIONS);
        }
        changed
    }

    /// Walk every block once, devirtualizing each eligible destroy.
    fn transform(&self, func: &mut Function) -> bool {
        let mut changed = false;
        for block in 0..func.blocks.len() {
            let mut index = 0;
            while index < func.blocks[block].insts.len() {
                let inst = func.blocks[block].insts[index];

                let site = match classify_destroy(func, self.pool, inst) {
                    Ok(site) => site,
                    Err(SkipReason::NotADestroy) => {
                        index += 1;
                        continue;
                    }
                    Err(reason) => {
                        tracing::trace!(
                            function = func.name.raw(),
                            reason = %reason,
                            "leaving destroy in place"
                        );
                        index += 1;
                        continue;
                    }
                };
                let deinit = match resolve_deinit(self.registry, self.pool, &site) {
                    Ok(deinit) => deinit,
                    Err(reason) => {
                        tracing::trace!(
                            function = func.name.raw(),
                            reason = %reason,
                            "leaving destroy in place"
                        );
                        index += 1;
                        continue;
                    }
                };

                // The rewrite removes the current instruction; advance the
                // cursor past its replacement so every original instruction
                // is visited exactly once.
                index += devirtualize_site(func, block, index, &site, &deinit);
                changed = true;
            }
        }
        changed
    }
}
