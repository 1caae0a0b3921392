#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to obtain module handle (os error {0})")]
    ModuleHandle(u32),

    #[error("failed to load arrow cursor (os error {0})")]
    Cursor(u32),

    #[error("invalid window parameter {0:?}: contains a NUL character")]
    InvalidName(String),

    #[error("failed to register window class {name:?} (os error {code})")]
    RegisterClass { name: String, code: u32 },

    #[error("failed to create message-only window (os error {0})")]
    CreateWindow(u32),

    #[error("failed to subscribe to clipboard updates (os error {0})")]
    Subscribe(u32),

    #[error("the clipboard listener requires Windows")]
    Unsupported,
}

#[derive(Debug, thiserror::Error)]
pub enum PumpError {
    #[error("failed to retrieve window message (os error {0})")]
    GetMessage(u32),
}
