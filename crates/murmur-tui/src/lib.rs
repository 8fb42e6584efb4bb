//! Terminal UI for murmur
//!
//! A thin shell over [`murmur_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`murmur_app::Runtime`].
//!
//! This crate only handles terminal input and rendering.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod scroll;
pub mod terminal;
pub mod ui;

pub use murmur_app::{ChatView, Driver, KeyInput, Runtime, ViewEvent};
pub use scroll::FeedScroll;
pub use terminal::{TerminalDriver, TerminalError};
