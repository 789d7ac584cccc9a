/// A fixed-capacity circular buffer that discards the oldest unread item
/// when a new one arrives while it is full.
///
/// Pushing never blocks and never fails, which makes it safe to call from a
/// window procedure where stalling would stall the whole message pipeline.
#[derive(Debug)]
pub struct RingBuffer<T, const N: usize> {
    slots: [Option<T>; N],
    read: usize,
    len: usize,
    dropped: u64,
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        const { assert!(N > 0, "RingBuffer capacity must be non-zero") };

        Self {
            slots: std::array::from_fn(|_| None),
            read: 0,
            len: 0,
            dropped: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Number of items discarded by overflow since creation.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn write_cursor(&self) -> usize {
        (self.read + self.len) % N
    }

    /// Stores `item`, returning the oldest unread item if it had to be evicted.
    pub fn push(&mut self, item: T) -> Option<T> {
        let write = self.write_cursor();
        let evicted = self.slots[write].replace(item);

        if self.is_full() {
            // write caught up with read, shove read forward
            self.read = (self.read + 1) % N;
            self.dropped += 1;
            evicted
        } else {
            self.len += 1;
            None
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let item = self.slots[self.read].take();
        self.read = (self.read + 1) % N;
        self.len -= 1;
        item
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        self.slots[self.read].as_ref()
    }

    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    #[cfg(test)]
    fn cursors(&self) -> (usize, usize) {
        (self.read, self.write_cursor())
    }
}
