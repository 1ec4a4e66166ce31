use {
    crate::*,
    std::{
        fmt,
        sync::{Condvar, Mutex, MutexGuard},
        time::{Duration, Instant},
    },
};

// ring storage; one slot always stays free so that full and empty differ
struct Ring<T> {
    slots: Box<[Option<T>]>,
    pidx: usize,
    cidx: usize,
    closed: bool,
}

impl<T> Ring<T> {
    fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            pidx: 0,
            cidx: 0,
            closed: false,
        }
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }

    fn is_empty(&self) -> bool {
        self.cidx == self.pidx
    }

    fn is_full(&self) -> bool {
        self.cidx == (self.pidx + 1) % self.capacity()
    }

    fn len(&self) -> usize {
        (self.pidx + self.capacity() - self.cidx) % self.capacity()
    }

    fn put(&mut self, value: T) {
        self.slots[self.pidx] = Some(value);
        self.pidx = (self.pidx + 1) % self.capacity();
    }

    fn take(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.slots[self.cidx].take();
        self.cidx = (self.cidx + 1) % self.capacity();
        value
    }
}

/// Fixed-capacity FIFO shared between producer and consumer threads.
///
/// A channel created with capacity `C` holds at most `C - 1` values. Share it
/// between threads with `Arc<BoundedChannel<T>>`.
pub struct BoundedChannel<T> {
    state: Mutex<Ring<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T> BoundedChannel<T> {
    /// Create a channel with `capacity` slots. Fails if `capacity < 2`.
    pub fn new(capacity: usize) -> Result<Self, ChannelError> {
        if capacity < 2 {
            return Err(ChannelError::InvalidCapacity(capacity));
        }
        Ok(Self {
            state: Mutex::new(Ring::new(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Ring<T>> {
        // a panicking holder never leaves the ring half-updated
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    // store a value, checking closed before full
    fn put_locked(&self, state: &mut Ring<T>, value: T) -> Result<(), PushError<T>> {
        if state.closed {
            return Err(PushError::new(ChannelStatus::Closed, value));
        }
        if state.is_full() {
            return Err(PushError::new(ChannelStatus::Full, value));
        }
        state.put(value);
        self.not_empty.notify_one();
        Ok(())
    }

    // remove the oldest value; an empty ring reports Closed once closed
    fn take_locked(&self, state: &mut Ring<T>) -> Result<T, ChannelStatus> {
        match state.take() {
            Some(value) => {
                self.not_full.notify_one();
                Ok(value)
            }
            None if state.closed => Err(ChannelStatus::Closed),
            None => Err(ChannelStatus::Empty),
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.lock().is_full()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Close the channel and wake every blocked pusher and popper.
    ///
    /// Idempotent. Values already buffered stay poppable.
    pub fn close(&self) {
        let mut state = self.lock();
        if !state.closed {
            state.closed = true;
            self.not_full.notify_all();
            self.not_empty.notify_all();
        }
    }

    /// Push without blocking. Fails with `Full` or `Closed`.
    pub fn try_push(&self, value: T) -> Result<(), PushError<T>> {
        let mut state = self.lock();
        self.put_locked(&mut state, value)
    }

    /// Push, parking the caller until a slot frees up or the channel closes.
    pub fn push(&self, value: T) -> Result<(), PushError<T>> {
        let state = self.lock();
        let mut state = self
            .not_full
            .wait_while(state, |state| state.is_full() && !state.closed)
            .unwrap_or_else(|e| e.into_inner());
        self.put_locked(&mut state, value)
    }

    /// Push, waiting at most `timeout` for a free slot.
    pub fn push_wait_for(&self, value: T, timeout: Duration) -> Result<(), PushError<T>> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.push_wait_until(value, deadline),
            None => self.push(value),
        }
    }

    /// Push, waiting until `deadline` for a free slot.
    ///
    /// On `Timeout` the channel is left exactly as it was.
    pub fn push_wait_until(&self, value: T, deadline: Instant) -> Result<(), PushError<T>> {
        let mut state = self.lock();
        while state.is_full() && !state.closed {
            let now = Instant::now();
            if now >= deadline {
                return Err(PushError::new(ChannelStatus::Timeout, value));
            }
            let (guard, _) = self
                .not_full
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            state = guard;
        }
        self.put_locked(&mut state, value)
    }

    /// Pop without blocking. `Empty` while open, `Closed` once closed and drained.
    pub fn try_pop(&self) -> Result<T, ChannelStatus> {
        let mut state = self.lock();
        self.take_locked(&mut state)
    }

    /// Pop, parking the caller until a value arrives or the channel closes.
    pub fn pop(&self) -> Result<T, ChannelStatus> {
        let state = self.lock();
        let mut state = self
            .not_empty
            .wait_while(state, |state| state.is_empty() && !state.closed)
            .unwrap_or_else(|e| e.into_inner());
        self.take_locked(&mut state)
    }

    /// Pop, waiting at most `timeout` for a value.
    pub fn pop_wait_for(&self, timeout: Duration) -> Result<T, ChannelStatus> {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.pop_wait_until(deadline),
            None => self.pop(),
        }
    }

    /// Pop, waiting until `deadline` for a value.
    pub fn pop_wait_until(&self, deadline: Instant) -> Result<T, ChannelStatus> {
        let mut state = self.lock();
        while state.is_empty() && !state.closed {
            let now = Instant::now();
            if now >= deadline {
                return Err(ChannelStatus::Timeout);
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            state = guard;
        }
        self.take_locked(&mut state)
    }

    /// Lazy sequence of popped values, ending at the first `Closed`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }
}

impl<T> fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedChannel")
            .field("capacity", &state.capacity())
            .field("len", &state.len())
            .field("closed", &state.closed)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a BoundedChannel<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_wraps_around() {
        let mut ring = Ring::new(3);
        for round in 0..10 {
            ring.put(round * 2);
            ring.put(round * 2 + 1);
            assert!(ring.is_full());
            assert_eq!(ring.len(), 2);
            assert_eq!(ring.take(), Some(round * 2));
            assert_eq!(ring.take(), Some(round * 2 + 1));
            assert!(ring.is_empty());
            assert_eq!(ring.take(), None);
        }
    }

    #[test]
    fn test_ring_reserves_one_slot() {
        let mut ring = Ring::new(4);
        ring.put('a');
        ring.put('b');
        assert!(!ring.is_full());
        ring.put('c');
        assert!(ring.is_full());
        assert_eq!(ring.len(), 3);
    }
}
