//! Core engine traits

use super::context::TickContext;

/// One decision engine run once per tick
///
/// Engines read the snapshot books and their own slice of persisted state
/// from the context, size every order against the shared ledger, and push
/// the result back into the context. They never fail: missing or degenerate
/// inputs mean no orders.
pub trait Strategy {
    /// Decide this tick's orders
    fn on_tick(&mut self, ctx: &mut TickContext<'_>);

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}
