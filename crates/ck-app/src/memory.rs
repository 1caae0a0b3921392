//! Process-owned shared memory blocks.
//!
//! An [`OwnedBlock`] is either freed when dropped or handed to the
//! clipboard with [`OwnedBlock::transfer`]. Transferring consumes the
//! value, so a block published to the clipboard cannot be freed or written
//! again by this process.

use ck_core::clipboard::MemoryHandle;
use ck_core::ports::{MemoryError, SharedMemoryPort};
use tracing::{error, trace};

pub struct OwnedBlock<'m, M>
where
    M: SharedMemoryPort,
{
    memory: &'m M,
    handle: MemoryHandle,
    size: usize,
    owned: bool,
}

impl<'m, M> OwnedBlock<'m, M>
where
    M: SharedMemoryPort,
{
    /// Allocates a movable block of exactly `size` bytes.
    pub fn allocate(memory: &'m M, size: usize) -> Result<Self, MemoryError> {
        let handle = memory.allocate(size)?;
        trace!(?handle, size, "allocated movable block");
        Ok(Self {
            memory,
            handle,
            size,
            owned: true,
        })
    }

    pub fn handle(&self) -> MemoryHandle {
        self.handle
    }

    /// Copies `bytes` into the block under a lock/unlock pair.
    pub fn fill(&mut self, bytes: &[u8]) -> Result<(), MemoryError> {
        if bytes.len() > self.size {
            return Err(MemoryError::TooSmall {
                capacity: self.size,
                needed: bytes.len(),
            });
        }
        self.memory.write(self.handle, bytes)
    }

    /// Gives up ownership after the clipboard accepted the block.
    pub fn transfer(mut self) -> MemoryHandle {
        self.owned = false;
        trace!(handle = ?self.handle, "block transferred to clipboard");
        self.handle
    }
}

impl<M> Drop for OwnedBlock<'_, M>
where
    M: SharedMemoryPort,
{
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        if let Err(e) = self.memory.free(self.handle) {
            error!(handle = ?self.handle, error = %e, "failed to free memory block");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_core::ports::mocks::MockMemory;
    use mockall::predicate::eq;

    fn handle() -> MemoryHandle {
        MemoryHandle::from_raw(0x1000)
    }

    #[test]
    fn dropped_block_is_freed_once() {
        let mut memory = MockMemory::new();
        memory
            .expect_allocate()
            .with(eq(6))
            .times(1)
            .returning(|_| Ok(handle()));
        memory
            .expect_write()
            .withf(|h, bytes| *h == handle() && bytes == &[1u8, 2, 3, 4, 5, 6][..])
            .times(1)
            .returning(|_, _| Ok(()));
        memory
            .expect_free()
            .with(eq(handle()))
            .times(1)
            .returning(|_| Ok(()));

        let mut block = OwnedBlock::allocate(&memory, 6).unwrap();
        block.fill(&[1, 2, 3, 4, 5, 6]).unwrap();
        drop(block);
    }

    #[test]
    fn transferred_block_is_never_freed() {
        let mut memory = MockMemory::new();
        memory.expect_allocate().returning(|_| Ok(handle()));
        memory.expect_free().never();

        let block = OwnedBlock::allocate(&memory, 2).unwrap();
        assert_eq!(block.transfer(), handle());
    }

    #[test]
    fn oversized_fill_is_rejected_without_writing() {
        let mut memory = MockMemory::new();
        memory.expect_allocate().returning(|_| Ok(handle()));
        memory.expect_write().never();
        memory.expect_free().times(1).returning(|_| Ok(()));

        let mut block = OwnedBlock::allocate(&memory, 2).unwrap();
        assert_eq!(
            block.fill(&[0, 0, 0, 0]),
            Err(MemoryError::TooSmall {
                capacity: 2,
                needed: 4
            })
        );
    }

    #[test]
    fn failed_allocation_frees_nothing() {
        let mut memory = MockMemory::new();
        memory
            .expect_allocate()
            .returning(|size| Err(MemoryError::AllocFailed { size, code: 8 }));
        memory.expect_free().never();

        assert!(OwnedBlock::allocate(&memory, 10).is_err());
    }
}
