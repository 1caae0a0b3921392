//! # clipkeeper
//!
//! Watches the system clipboard and takes ownership of every piece of text
//! another application copies, by republishing it from memory allocated by
//! this process. The copying application's buffer is released as soon as
//! the text is taken over.
//!
//! The binary wires the use cases of `ck-app` to the Win32 adapters of
//! `ck-platform`; this library holds that wiring together with the CLI,
//! configuration loading and tracing setup.

pub mod bootstrap;
pub mod cli;
