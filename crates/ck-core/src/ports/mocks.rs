//! Mock implementations of the clipboard ports for testing.
//!
//! This module provides mock implementations using `mockall` so use cases
//! can be tested call by call without a real clipboard. Enable the
//! `testing` feature to use them from other crates.

use mockall::mock;

use crate::clipboard::{ClipboardFormat, MemoryHandle};
use crate::ports::{ClipboardError, MemoryError, SharedMemoryPort, SystemClipboardPort};

mock! {
    /// Mock implementation of [`SystemClipboardPort`].
    pub Clipboard {}

    impl SystemClipboardPort for Clipboard {
        fn open(&self) -> Result<(), ClipboardError>;
        fn close(&self) -> Result<(), ClipboardError>;
        fn data(&self, format: ClipboardFormat) -> Result<Option<MemoryHandle>, ClipboardError>;
        fn empty(&self) -> Result<(), ClipboardError>;
        fn set_data(&self, format: ClipboardFormat, handle: MemoryHandle) -> Result<(), ClipboardError>;
    }
}

mock! {
    /// Mock implementation of [`SharedMemoryPort`].
    pub Memory {}

    impl SharedMemoryPort for Memory {
        fn allocate(&self, size: usize) -> Result<MemoryHandle, MemoryError>;
        fn read(&self, handle: MemoryHandle) -> Result<Vec<u8>, MemoryError>;
        fn write(&self, handle: MemoryHandle, bytes: &[u8]) -> Result<(), MemoryError>;
        fn free(&self, handle: MemoryHandle) -> Result<(), MemoryError>;
    }
}
