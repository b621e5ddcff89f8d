//! Live event fan-out: event contract, envelope and pub/sub bus.
//!
//! The bus is the transport behind the live session broadcaster. It carries
//! already-committed facts to observers; it is never a source of truth.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
