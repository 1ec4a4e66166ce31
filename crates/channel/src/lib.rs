//! Bounded, closable handoff channel for pipeline stages.
//!
//! A `BoundedChannel<T>` is a fixed-size ring buffer behind one mutex and two
//! condition variables ("space available" and "data available"). It offers
//! non-blocking (`try_*`), blocking and deadline-bounded variants of push and
//! pop, plus an irreversible `close()` that wakes every parked thread.
//!
//! Outcomes are plain data: a successful operation is `Ok(..)`, anything else
//! is a `ChannelStatus` (`Empty`, `Full`, `Closed`, `Timeout`). A push that
//! fails hands the value back inside `PushError<T>`.
//!
//! Buffered values are always drained before `Closed` is reported, for every
//! pop variant. A push into a closed channel reports `Closed` even when the
//! channel is also full.

mod bounded;
mod error;
mod iter;

pub use bounded::BoundedChannel;
pub use error::{ChannelError, ChannelStatus, PushError};
pub use iter::Iter;
