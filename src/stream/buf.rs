/// The fixed-size ring buffer backing a byte stream.
///
/// Bytes live in a single allocation made at construction. The held bytes
/// start at `head` and may wrap around the end of the allocation.
pub(crate) struct RingBuf {
    buf: Vec<u8>,
    head: usize,
    len: usize,
}

impl RingBuf {
    /// Creates a new ring buffer with the given size.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");

        RingBuf {
            buf: vec![0; capacity],
            head: 0,
            len: 0,
        }
    }

    /// Returns the size of the underlying allocation.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the number of bytes currently held.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no bytes are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bytes that can still be pushed.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Returns the held bytes as up to two slices in logical order.
    pub fn as_slices(&self) -> (&[u8], &[u8]) {
        let cap = self.buf.len();
        if self.head + self.len <= cap {
            (&self.buf[self.head..self.head + self.len], &[])
        } else {
            let first = cap - self.head;
            (&self.buf[self.head..], &self.buf[..self.len - first])
        }
    }

    /// Appends as many bytes of `data` as fit.
    ///
    /// Returns the number of bytes appended.
    pub fn push(&mut self, data: &[u8]) -> usize {
        let n = usize::min(data.len(), self.remaining());
        if n == 0 {
            return 0;
        }

        let cap = self.buf.len();
        let tail = (self.head + self.len) % cap;
        let first = usize::min(cap - tail, n);

        self.buf[tail..tail + first].copy_from_slice(&data[..first]);
        if n > first {
            self.buf[..n - first].copy_from_slice(&data[first..n]);
        }

        self.len += n;
        n
    }

    /// Copies the first `n` held bytes into `out` without removing them.
    pub fn copy_front(&self, n: usize, out: &mut Vec<u8>) {
        assert!(n <= self.len);

        let (a, b) = self.as_slices();
        if n <= a.len() {
            out.extend_from_slice(&a[..n]);
        } else {
            out.extend_from_slice(a);
            out.extend_from_slice(&b[..n - a.len()]);
        }
    }

    /// Discards the first `n` held bytes.
    pub fn advance(&mut self, n: usize) {
        assert!(n <= self.len);

        self.head = (self.head + n) % self.buf.len();
        self.len -= n;

        if self.len == 0 {
            // Keeps the next writes contiguous.
            self.head = 0;
        }
    }

    /// Discards every held byte.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
