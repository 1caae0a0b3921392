use crate::clipboard::MemoryHandle;
use crate::ports::errors::MemoryError;

/// Movable shared memory blocks, as used to transfer clipboard content.
///
/// Lock and unlock happen inside each call: no address into a block
/// survives a call, because the allocator may relocate the block while it
/// is unlocked.
pub trait SharedMemoryPort {
    /// Allocates a movable block of exactly `size` bytes.
    fn allocate(&self, size: usize) -> Result<MemoryHandle, MemoryError>;

    /// Locks the block, copies its whole content out, unlocks it.
    fn read(&self, handle: MemoryHandle) -> Result<Vec<u8>, MemoryError>;

    /// Locks the block, copies `bytes` to its start, unlocks it.
    fn write(&self, handle: MemoryHandle, bytes: &[u8]) -> Result<(), MemoryError>;

    /// Frees a block the process still owns.
    fn free(&self, handle: MemoryHandle) -> Result<(), MemoryError>;
}
