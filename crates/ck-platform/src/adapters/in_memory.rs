//! In-memory clipboard subsystem.
//!
//! Mirrors the parts of the Win32 clipboard clipkeeper relies on: exclusive
//! open/close, a single Unicode text slot backed by movable memory blocks,
//! ownership transfer on set, release of the previous content on empty,
//! and one change notification per ownership change. Contention and
//! failures can be injected, and every block free is checked against its
//! current owner.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::convert::Infallible;
use std::rc::Rc;

use ck_core::clipboard::{decode_transfer_text, encode_for_transfer, ClipboardFormat, MemoryHandle};
use ck_core::notification::{ChangeNotification, EMPTY_MARKER, SET_MARKER};
use ck_core::ports::{
    ClipboardError, MemoryError, NotificationSourcePort, SharedMemoryPort, SystemClipboardPort,
};

/// Subtype reported for changes made by other applications.
pub const EXTERNAL_SUBTYPE: usize = 0x1;

const ERROR_NOT_ENOUGH_MEMORY: u32 = 8;
const ERROR_INVALID_HANDLE: u32 = 6;
const ERROR_CLIPBOARD_NOT_OPEN: u32 = 1418;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Process,
    Clipboard,
}

#[derive(Debug)]
struct Block {
    bytes: Vec<u8>,
    owner: Owner,
}

/// Operation counts, for asserting balance and ownership properties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InMemoryCounters {
    pub open_attempts: u64,
    pub opens: u64,
    pub closes: u64,
    pub empties: u64,
    pub sets: u64,
    pub allocations: u64,
    pub process_frees: u64,
    /// Frees of blocks the process did not own: double frees and frees
    /// after transfer.
    pub invalid_frees: u64,
}

#[derive(Debug, Default)]
struct State {
    blocks: HashMap<usize, Block>,
    next_handle: usize,
    text: Option<usize>,
    open: bool,
    busy_for: u32,
    fail_next_set: Option<ClipboardError>,
    fail_next_alloc: bool,
    notifications: VecDeque<ChangeNotification>,
    counters: InMemoryCounters,
}

impl State {
    fn insert_block(&mut self, bytes: Vec<u8>, owner: Owner) -> usize {
        self.next_handle += 0x10;
        let raw = 0x1000 + self.next_handle;
        self.blocks.insert(raw, Block { bytes, owner });
        raw
    }

    /// Replaces the text slot, releasing the block the clipboard held.
    fn replace_text(&mut self, handle: Option<usize>) {
        if let Some(previous) = std::mem::replace(&mut self.text, handle) {
            self.blocks.remove(&previous);
        }
    }

    fn require_open(&self, code_for: fn(u32) -> ClipboardError) -> Result<(), ClipboardError> {
        if self.open {
            Ok(())
        } else {
            Err(code_for(ERROR_CLIPBOARD_NOT_OPEN))
        }
    }
}

/// Shared state behind the clipboard, memory and notification adapters.
#[derive(Clone, Default)]
pub struct InMemoryClipboardSystem {
    state: Rc<RefCell<State>>,
}

impl InMemoryClipboardSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clipboard(&self) -> InMemoryClipboard {
        InMemoryClipboard {
            state: Rc::clone(&self.state),
        }
    }

    pub fn memory(&self) -> InMemorySharedMemory {
        InMemorySharedMemory {
            state: Rc::clone(&self.state),
        }
    }

    pub fn notifications(&self) -> InMemoryNotificationSource {
        InMemoryNotificationSource {
            state: Rc::clone(&self.state),
        }
    }

    /// Another application copies `text`.
    pub fn copy_external(&self, text: &str) {
        let mut bytes = encode_for_transfer(text).unwrap_or_else(|_| vec![0, 0]);
        // Allocators round sizes up; the extra bytes are zeroed.
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        self.copy_external_bytes(bytes);
    }

    /// Another application copies raw `CF_UNICODETEXT` bytes.
    pub fn copy_external_bytes(&self, bytes: Vec<u8>) {
        let mut state = self.state.borrow_mut();
        let handle = state.insert_block(bytes, Owner::Clipboard);
        state.replace_text(Some(handle));
        state
            .notifications
            .push_back(ChangeNotification::clipboard_update(EXTERNAL_SUBTYPE));
    }

    /// Another application copies something that is not text.
    pub fn copy_external_non_text(&self) {
        self.delete_external();
    }

    /// The clipboard content is deleted without replacement.
    pub fn delete_external(&self) {
        let mut state = self.state.borrow_mut();
        state.replace_text(None);
        state
            .notifications
            .push_back(ChangeNotification::clipboard_update(EXTERNAL_SUBTYPE));
    }

    /// Another process keeps the clipboard open for the next `attempts`
    /// open calls.
    pub fn hold_by_other(&self, attempts: u32) {
        self.state.borrow_mut().busy_for = attempts;
    }

    pub fn fail_next_set(&self, error: ClipboardError) {
        self.state.borrow_mut().fail_next_set = Some(error);
    }

    pub fn fail_next_allocation(&self) {
        self.state.borrow_mut().fail_next_alloc = true;
    }

    /// Current clipboard text, as another application would paste it.
    pub fn text(&self) -> Option<String> {
        let state = self.state.borrow();
        let handle = state.text?;
        let block = state.blocks.get(&handle)?;
        decode_transfer_text(&block.bytes).ok()
    }

    /// Raw bytes of the block currently on the clipboard.
    pub fn text_bytes(&self) -> Option<Vec<u8>> {
        let state = self.state.borrow();
        let handle = state.text?;
        state.blocks.get(&handle).map(|block| block.bytes.clone())
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().open
    }

    pub fn pending_notifications(&self) -> usize {
        self.state.borrow().notifications.len()
    }

    /// Blocks still owned by the process, i.e. leaked if the cycle is over.
    pub fn process_owned_blocks(&self) -> usize {
        self.state
            .borrow()
            .blocks
            .values()
            .filter(|block| block.owner == Owner::Process)
            .count()
    }

    pub fn counters(&self) -> InMemoryCounters {
        self.state.borrow().counters
    }
}

pub struct InMemoryClipboard {
    state: Rc<RefCell<State>>,
}

impl SystemClipboardPort for InMemoryClipboard {
    fn open(&self) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        state.counters.open_attempts += 1;
        if state.busy_for > 0 {
            state.busy_for -= 1;
            return Err(ClipboardError::Busy);
        }
        state.open = true;
        state.counters.opens += 1;
        Ok(())
    }

    fn close(&self) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        state.require_open(ClipboardError::CloseFailed)?;
        state.open = false;
        state.counters.closes += 1;
        Ok(())
    }

    fn data(&self, format: ClipboardFormat) -> Result<Option<MemoryHandle>, ClipboardError> {
        let state = self.state.borrow();
        state.require_open(ClipboardError::ReadFailed)?;
        match format {
            ClipboardFormat::UnicodeText => Ok(state.text.map(MemoryHandle::from_raw)),
        }
    }

    fn empty(&self) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        state.require_open(ClipboardError::EmptyFailed)?;
        state.replace_text(None);
        state.counters.empties += 1;
        state
            .notifications
            .push_back(ChangeNotification::clipboard_update(EMPTY_MARKER));
        Ok(())
    }

    fn set_data(&self, format: ClipboardFormat, handle: MemoryHandle) -> Result<(), ClipboardError> {
        let mut state = self.state.borrow_mut();
        state.require_open(ClipboardError::SetFailed)?;
        if let Some(error) = state.fail_next_set.take() {
            return Err(error);
        }

        let raw = handle.as_raw();
        match state.blocks.get_mut(&raw) {
            Some(block) if block.owner == Owner::Process => block.owner = Owner::Clipboard,
            _ => return Err(ClipboardError::SetFailed(ERROR_INVALID_HANDLE)),
        }

        match format {
            ClipboardFormat::UnicodeText => state.replace_text(Some(raw)),
        }
        state.counters.sets += 1;
        state
            .notifications
            .push_back(ChangeNotification::clipboard_update(SET_MARKER));
        Ok(())
    }
}

pub struct InMemorySharedMemory {
    state: Rc<RefCell<State>>,
}

impl SharedMemoryPort for InMemorySharedMemory {
    fn allocate(&self, size: usize) -> Result<MemoryHandle, MemoryError> {
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_next_alloc) {
            return Err(MemoryError::AllocFailed {
                size,
                code: ERROR_NOT_ENOUGH_MEMORY,
            });
        }
        state.counters.allocations += 1;
        let raw = state.insert_block(vec![0; size], Owner::Process);
        Ok(MemoryHandle::from_raw(raw))
    }

    fn read(&self, handle: MemoryHandle) -> Result<Vec<u8>, MemoryError> {
        self.state
            .borrow()
            .blocks
            .get(&handle.as_raw())
            .map(|block| block.bytes.clone())
            .ok_or(MemoryError::LockFailed(ERROR_INVALID_HANDLE))
    }

    fn write(&self, handle: MemoryHandle, bytes: &[u8]) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        let block = state
            .blocks
            .get_mut(&handle.as_raw())
            .ok_or(MemoryError::LockFailed(ERROR_INVALID_HANDLE))?;
        if bytes.len() > block.bytes.len() {
            return Err(MemoryError::TooSmall {
                capacity: block.bytes.len(),
                needed: bytes.len(),
            });
        }
        block.bytes[..bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn free(&self, handle: MemoryHandle) -> Result<(), MemoryError> {
        let mut state = self.state.borrow_mut();
        let raw = handle.as_raw();
        match state.blocks.get(&raw).map(|block| block.owner) {
            Some(Owner::Process) => {
                state.blocks.remove(&raw);
                state.counters.process_frees += 1;
                Ok(())
            }
            _ => {
                state.counters.invalid_frees += 1;
                Err(MemoryError::FreeFailed(ERROR_INVALID_HANDLE))
            }
        }
    }
}

/// Delivers queued notifications in order; closes once the queue is empty.
pub struct InMemoryNotificationSource {
    state: Rc<RefCell<State>>,
}

impl NotificationSourcePort for InMemoryNotificationSource {
    type Error = Infallible;

    fn next_notification(&mut self) -> Result<Option<ChangeNotification>, Self::Error> {
        Ok(self.state.borrow_mut().notifications.pop_front())
    }
}
