//! Fact emission
//!
//! Every admitted cell becomes exactly one measurement individual, written
//! synchronously to a [`FactSink`]. Identities come from a pluggable
//! [`IdentityAllocator`] so a run never depends on global counters.

pub mod emitter;
pub mod identity;
pub mod sink;

#[cfg(test)]
pub mod tests;

pub use emitter::FactEmitter;
pub use identity::{ContentHashAllocator, CounterAllocator, IdentityAllocator, IdentityStrategy};
pub use sink::{FactSink, Literal, MemorySink, NTriplesSink, Object, Triple};
