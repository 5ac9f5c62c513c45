//! Session continuity state.

mod pointer;

pub use pointer::{SessionPointer, short_id};
