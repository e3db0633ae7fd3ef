//! Aggregate root trait for document models.

/// Aggregate root marker + minimal interface.
///
/// Each document (delivery note, quotation, statement, warehouse receipt) is
/// one aggregate: header fields plus an ordered collection of line items.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Incremented once per applied event. Export snapshots record it so a
    /// rendered artifact can be traced back to the exact state it was taken from.
    fn version(&self) -> u64;
}

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` coerces raw input and returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Derived values (line amounts, totals, aging) are never stored; they are
/// computed on read from the state that `apply` maintains.
pub trait Aggregate: AggregateRoot {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Evolve in-memory state from a single event.
    ///
    /// Implementations must bump `version()` by one per applied event.
    fn apply(&mut self, event: &Self::Event);

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. An empty event list means "no-op".
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Decide and apply in one step; the caller never observes a half-applied command.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let events = self.handle(command)?;
        for event in &events {
            self.apply(event);
        }
        tracing::trace!(
            events = events.len(),
            version = self.version(),
            "command executed"
        );
        Ok(events)
    }
}
