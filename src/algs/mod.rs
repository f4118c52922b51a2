//! Message passing: communicator backends, wire records and symmetric exchange.

pub mod communicator;
pub mod exchange;
pub mod wire;

pub use communicator::{CommTag, Communicator, HaloCommTags, NoComm, RayonComm, Wait};
pub use exchange::exchange_records;
