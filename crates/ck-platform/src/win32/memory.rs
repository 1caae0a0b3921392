use ck_core::clipboard::MemoryHandle;
use ck_core::ports::{MemoryError, SharedMemoryPort};
use winapi::shared::minwindef::HGLOBAL;
use winapi::um::winbase::{GlobalAlloc, GlobalFree, GlobalLock, GlobalSize, GlobalUnlock, GMEM_MOVEABLE};

use super::last_error;

/// Movable global memory, the only kind the clipboard accepts.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalMemory;

impl GlobalMemory {
    pub fn new() -> Self {
        Self
    }
}

/// A locked block; unlocked on drop.
struct LockedBlock {
    handle: HGLOBAL,
    ptr: *mut u8,
    size: usize,
}

impl LockedBlock {
    fn lock(handle: MemoryHandle) -> Result<Self, MemoryError> {
        let handle = handle.as_raw() as HGLOBAL;
        // SAFETY: `handle` refers to a global memory block; a null return
        // is handled below.
        let ptr = unsafe { GlobalLock(handle) } as *mut u8;
        if ptr.is_null() {
            return Err(MemoryError::LockFailed(last_error()));
        }
        // SAFETY: the block is locked.
        let size = unsafe { GlobalSize(handle) };
        Ok(Self { handle, ptr, size })
    }

    fn as_slice(&self) -> &[u8] {
        // SAFETY: the block stays locked, and therefore mapped, while
        // `self` is alive; `size` is its allocated size.
        unsafe { std::slice::from_raw_parts(self.ptr, self.size) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: as above, and `&mut self` guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.size) }
    }
}

impl Drop for LockedBlock {
    fn drop(&mut self) {
        // SAFETY: balances the successful GlobalLock in `lock`.
        unsafe { GlobalUnlock(self.handle) };
    }
}

impl SharedMemoryPort for GlobalMemory {
    fn allocate(&self, size: usize) -> Result<MemoryHandle, MemoryError> {
        // SAFETY: no preconditions.
        let handle = unsafe { GlobalAlloc(GMEM_MOVEABLE, size) };
        if handle.is_null() {
            return Err(MemoryError::AllocFailed {
                size,
                code: last_error(),
            });
        }
        Ok(MemoryHandle::from_raw(handle as usize))
    }

    fn read(&self, handle: MemoryHandle) -> Result<Vec<u8>, MemoryError> {
        let block = LockedBlock::lock(handle)?;
        Ok(block.as_slice().to_vec())
    }

    fn write(&self, handle: MemoryHandle, bytes: &[u8]) -> Result<(), MemoryError> {
        let mut block = LockedBlock::lock(handle)?;
        let target = block.as_mut_slice();
        if bytes.len() > target.len() {
            return Err(MemoryError::TooSmall {
                capacity: target.len(),
                needed: bytes.len(),
            });
        }
        target[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn free(&self, handle: MemoryHandle) -> Result<(), MemoryError> {
        // SAFETY: callers only free blocks this process still owns.
        let result = unsafe { GlobalFree(handle.as_raw() as HGLOBAL) };
        if !result.is_null() {
            return Err(MemoryError::FreeFailed(last_error()));
        }
        Ok(())
    }
}
