mod in_memory;

pub use in_memory::{
    InMemoryClipboard, InMemoryClipboardSystem, InMemoryCounters, InMemoryNotificationSource,
    InMemorySharedMemory, EXTERNAL_SUBTYPE,
};
