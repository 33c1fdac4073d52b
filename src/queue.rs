use alloc::vec::Vec;
use core::fmt::Debug;
use core::iter::FusedIterator;

const INITIAL_CAPACITY: usize = 4;

fn empty_buffer<T>(capacity: usize) -> Vec<Option<T>> {
    let mut buffer = Vec::with_capacity(capacity);
    buffer.resize_with(capacity, || None);
    buffer
}

/// A first-in, first-out queue backed by a growable ring buffer.
///
/// The buffer starts with four slots and doubles whenever a push finds it
/// full. Values are popped in the order they were pushed.
///
/// # Examples
///
/// ```rust
/// # use basic_containers::Queue;
/// #
/// let mut queue = Queue::new();
/// queue.push("first");
/// queue.push("second");
///
/// assert_eq!(queue.top(), Some(&"first"));
/// assert_eq!(queue.pop(), Some("first"));
/// assert_eq!(queue.pop(), Some("second"));
/// assert_eq!(queue.pop(), None);
/// ```
#[derive(Clone)]
pub struct Queue<T> {
    buffer: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> Debug for Queue<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    /// Creates an empty queue with room for four values.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates an empty queue with room for at least `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: empty_buffer(capacity.max(INITIAL_CAPACITY)),
            head: 0,
            len: 0,
        }
    }

    /// Number of values in the queue.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the queue holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of values the queue can hold before it grows.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    fn slot(&self, offset: usize) -> usize {
        (self.head + offset) % self.buffer.len()
    }

    /// Appends a value at the rear of the queue.
    pub fn push(&mut self, value: T) {
        if self.len == self.buffer.len() {
            self.grow();
        }
        let tail = self.slot(self.len);
        self.buffer[tail] = Some(value);
        self.len += 1;
    }

    /// Removes and returns the value at the front of the queue.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = self.buffer[self.head].take();
        self.head = self.slot(1);
        self.len -= 1;
        value
    }

    /// Returns the value at the front of the queue without removing it.
    pub fn top(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.buffer[self.head].as_ref()
    }

    /// Returns a mutable reference to the value at the front of the queue.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        self.buffer[self.head].as_mut()
    }

    /// Drops every value. The buffer is kept.
    pub fn clear(&mut self) {
        self.buffer.iter_mut().for_each(|slot| *slot = None);
        self.head = 0;
        self.len = 0;
    }

    /// Returns an iterator from the front of the queue to the rear.
    ///
    /// ```rust
    /// # use basic_containers::Queue;
    /// #
    /// let mut queue = Queue::new();
    /// queue.extend(1..=3);
    /// queue.pop();
    /// queue.push(4);
    /// assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [2, 3, 4]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            queue: self,
            offset: 0,
        }
    }

    fn grow(&mut self) {
        let new_capacity = self
            .buffer
            .len()
            .checked_mul(2)
            .expect("capacity overflow");
        let mut buffer = empty_buffer(new_capacity);
        for (offset, slot) in buffer.iter_mut().take(self.len).enumerate() {
            let index = self.slot(offset);
            *slot = self.buffer[index].take();
        }

        tracing::debug!(
            from = self.buffer.len(),
            to = new_capacity,
            "growing queue"
        );
        self.buffer = buffer;
        self.head = 0;
    }
}

impl<T> Queue<T>
where
    T: PartialEq,
{
    /// Returns `true` if the queue holds a value equal to `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<T> Extend<T> for Queue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<'a, T> IntoIterator for &'a Queue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Queue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

/// An iterator over the values of a [`Queue`], front to rear.
pub struct Iter<'a, T> {
    queue: &'a Queue<T>,
    offset: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.queue.len {
            return None;
        }
        let index = self.queue.slot(self.offset);
        self.offset += 1;
        self.queue.buffer[index].as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.queue.len - self.offset;
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// An owning iterator over the values of a [`Queue`], front to rear.
pub struct IntoIter<T> {
    queue: Queue<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.queue.len, Some(self.queue.len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
