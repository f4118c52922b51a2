//! Halo protocol: batch the remote cells a catalog needs, then fetch them in
//! one exchange per reconstruction pass.

pub mod cache;
pub mod gather;
pub mod request;
pub mod transport;

pub use cache::HaloCache;
pub use gather::HaloGatherer;
pub use request::{HaloEntry, HaloRequestSet};
pub use transport::{CommTransport, HALO_BASE_TAG, HaloTransport, SerialTransport};
