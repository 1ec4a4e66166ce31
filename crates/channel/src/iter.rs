use {crate::*, std::iter::FusedIterator};

/// Blocking iterator over the values of one channel.
///
/// Each `next()` is a blocking `pop()`. The first `Closed` ends the sequence
/// for good; a new `Iter` has to be created to read from the channel again.
pub struct Iter<'a, T> {
    channel: Option<&'a BoundedChannel<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(channel: &'a BoundedChannel<T>) -> Self {
        Self {
            channel: Some(channel),
        }
    }
}

impl<T> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let channel = self.channel?;
        match channel.pop() {
            Ok(value) => Some(value),
            Err(_) => {
                self.channel = None;
                None
            }
        }
    }
}

impl<T> FusedIterator for Iter<'_, T> {}
