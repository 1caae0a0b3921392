use std::fmt;

/// Opaque handle to a block of system-managed movable memory.
///
/// The handle carries no ownership by itself; who may free the block is
/// decided by the code holding it (see `ck_app::memory::OwnedBlock`).
/// Blocks may move between lock and unlock, so the handle is the only
/// stable way to refer to one.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle(usize);

impl MemoryHandle {
    pub fn from_raw(raw: usize) -> Self {
        Self(raw)
    }

    pub fn as_raw(self) -> usize {
        self.0
    }
}

impl fmt::Debug for MemoryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryHandle({:#x})", self.0)
    }
}
