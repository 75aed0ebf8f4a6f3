//! Terminal presentation: colored messages, a thinking spinner and the
//! streamed model reply.

pub mod display;
pub mod observer;
pub mod spinner;
pub mod stream;

pub use observer::TerminalObserver;
