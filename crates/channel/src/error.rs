use std::fmt;

/// Construction failure. The only error a channel raises outside status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    InvalidCapacity(usize),
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelError::InvalidCapacity(capacity) => {
                write!(f, "invalid channel capacity: {capacity} (minimum is 2)")
            }
        }
    }
}

impl std::error::Error for ChannelError {}

/// Non-success outcome of a push or pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStatus {
    /// The channel is open and holds no value (`try_pop` only).
    Empty,
    /// The channel is open and has no free slot (`try_push` only).
    Full,
    /// The channel was closed (and, for pops, fully drained).
    Closed,
    /// The deadline passed before the operation could complete.
    Timeout,
}

impl fmt::Display for ChannelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelStatus::Empty => write!(f, "channel empty"),
            ChannelStatus::Full => write!(f, "channel full"),
            ChannelStatus::Closed => write!(f, "channel closed"),
            ChannelStatus::Timeout => write!(f, "channel operation timed out"),
        }
    }
}

impl std::error::Error for ChannelStatus {}

/// A rejected push. Carries the value back to the caller untouched.
pub struct PushError<T> {
    status: ChannelStatus,
    value: T,
}

impl<T> PushError<T> {
    pub(crate) fn new(status: ChannelStatus, value: T) -> Self {
        Self { status, value }
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn is_closed(&self) -> bool {
        self.status == ChannelStatus::Closed
    }

    /// Recover the value that could not be pushed.
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushError")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "push failed: {}", self.status)
    }
}

impl<T> std::error::Error for PushError<T> {}
