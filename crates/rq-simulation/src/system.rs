use crate::context::SimContext;
use crate::error::SimResult;

/// A simulation subsystem that runs on a periodic cadence.
///
/// Systems are executed in registration order on every base tick whose
/// number is divisible by the system's cadence. Each system runs to
/// completion before the next starts, so no entity is ever observed
/// half-updated.
pub trait System: std::fmt::Debug + Send {
    /// Human-readable name for this system.
    fn name(&self) -> &str;

    /// Base ticks between runs. 1 means every tick; 0 is treated as 1.
    fn cadence_ticks(&self) -> u64 {
        1
    }

    /// Called on each due tick.
    fn tick(&mut self, ctx: &mut SimContext<'_>) -> SimResult<()>;

    /// Called once before the first tick. Optional setup hook.
    fn init(&mut self, _ctx: &mut SimContext<'_>) -> SimResult<()> {
        Ok(())
    }

    /// Support downcasting to concrete types for cross-system access.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Support downcasting to concrete types for cross-system access.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
