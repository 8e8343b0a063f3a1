//! Drives the scanner, tracker and builders over an input.
//!
//! [`Engine`] is the synchronous core. [`stream`] runs one on a producer thread and hands its lines to the caller
//! through a rendezvous channel.

mod engine;
mod error;
mod stream;

pub use engine::*;
pub use error::*;
pub use stream::*;
