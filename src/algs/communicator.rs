//! Thin façade over serial or intra-process (Rayon) message passing.
//!
//! Messages are *contiguous byte slices* (no zero-copy guarantees).
//! All handles are **waitable** but non-blocking: exchange code calls
//! `.wait()` before it trusts that a buffer is ready. Other transports plug in
//! by implementing [`Communicator`].

use bytes::Bytes;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

/// Non-blocking communication interface (minimal by design).
pub trait Communicator: Send + Sync + 'static {
    /// Handle returned by `isend`.
    type SendHandle: Wait;
    /// Handle returned by `irecv`.
    type RecvHandle: Wait;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle;
    fn irecv(&self, peer: usize, tag: u16, buf: &mut [u8]) -> Self::RecvHandle;

    /// Rank of this process in the communicator.
    fn rank(&self) -> usize;
    /// Number of ranks.
    fn size(&self) -> usize;
}

/// Anything that can be waited on.
pub trait Wait {
    /// Wait for completion and return the received data (if any).
    fn wait(self) -> Option<Vec<u8>>;
}

/// Typed message tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CommTag(u16);

impl CommTag {
    pub const fn new(tag: u16) -> Self {
        Self(tag)
    }

    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Tag `by` steps further, wrapping at `u16::MAX`.
    pub const fn offset(self, by: u16) -> Self {
        Self(self.0.wrapping_add(by))
    }
}

/// Tags of the four stages of one halo exchange round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HaloCommTags {
    pub sizes: CommTag,
    pub requests: CommTag,
    pub status: CommTag,
    pub values: CommTag,
}

impl HaloCommTags {
    /// Number of consecutive tags used by one round.
    pub const SPAN: u16 = 4;
    /// Rounds before the epoch tags cycle back to `base`.
    pub const EPOCHS: u16 = 256;
    /// Tags reserved from `base` on: `[base, base + WINDOW)`.
    pub const WINDOW: u16 = Self::SPAN * Self::EPOCHS;

    pub const fn from_base(base: CommTag) -> Self {
        Self {
            sizes: base,
            requests: base.offset(1),
            status: base.offset(2),
            values: base.offset(3),
        }
    }

    /// Tags of round `epoch`, disjoint from the `EPOCHS - 1` rounds around it
    /// and always inside the reserved window.
    pub const fn for_epoch(base: CommTag, epoch: u16) -> Self {
        Self::from_base(base.offset((epoch % Self::EPOCHS) * Self::SPAN))
    }
}

/// Compile-time no-op comm for pure serial runs: one rank, no peers.
#[derive(Clone, Debug, Default)]
pub struct NoComm;

impl Wait for () {
    fn wait(self) -> Option<Vec<u8>> {
        None
    }
}

impl Communicator for NoComm {
    type SendHandle = ();
    type RecvHandle = ();

    fn isend(&self, _peer: usize, _tag: u16, _buf: &[u8]) {}
    fn irecv(&self, _peer: usize, _tag: u16, _buf: &mut [u8]) {}

    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
}

// --- RayonComm: intra-process / multi-thread ---
type Key = (u32, usize, usize, u16); // (world, src, dst, tag)

static MAILBOX: Lazy<DashMap<Key, VecDeque<Bytes>>> = Lazy::new(DashMap::new);
static NEXT_WORLD: AtomicU32 = AtomicU32::new(1);

/// Receive handle polling the shared mailbox on `wait`.
pub struct LocalHandle {
    key: Key,
}

impl LocalHandle {
    fn try_take(&self) -> Option<Bytes> {
        let got = MAILBOX.get_mut(&self.key).and_then(|mut q| q.pop_front());
        let _ = MAILBOX.remove_if(&self.key, |_, q| q.is_empty());
        got
    }
}

impl Wait for LocalHandle {
    fn wait(self) -> Option<Vec<u8>> {
        loop {
            if let Some(bytes) = self.try_take() {
                return Some(bytes.to_vec());
            }
            std::thread::yield_now();
        }
    }
}

/// In-process communicator: each rank is a thread of the same process.
///
/// Ranks created by one [`RayonComm::world`] call share a private mailbox
/// namespace, so independent worlds never see each other's messages.
#[derive(Clone, Debug)]
pub struct RayonComm {
    world: u32,
    rank: usize,
    size: usize,
}

impl RayonComm {
    /// Create `size` connected ranks.
    pub fn world(size: usize) -> Vec<Self> {
        let world = NEXT_WORLD.fetch_add(1, Ordering::Relaxed);
        (0..size).map(|rank| Self { world, rank, size }).collect()
    }
}

impl Communicator for RayonComm {
    type SendHandle = ();
    type RecvHandle = LocalHandle;

    fn isend(&self, peer: usize, tag: u16, buf: &[u8]) -> Self::SendHandle {
        let key = (self.world, self.rank, peer, tag);
        MAILBOX
            .entry(key)
            .or_default()
            .push_back(Bytes::copy_from_slice(buf));
    }

    fn irecv(&self, peer: usize, tag: u16, _buf: &mut [u8]) -> Self::RecvHandle {
        LocalHandle {
            key: (self.world, peer, self.rank, tag),
        }
    }

    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.size
    }
}
