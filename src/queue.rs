use std::fmt;

use crate::{AllocError, ChunkPool, Deque, IntoIter, Iter, PoolRef};

/// A first-in, first-out queue backed by a [`Deque`].
///
/// Elements are pushed at the back and popped at the front. The element type
/// only needs to be movable; `Clone` is available when `T: Clone`.
///
/// # Example
///
/// ```
/// use cached_deque::Queue;
///
/// let mut queue = Queue::new();
/// queue.push("first");
/// queue.push("second");
///
/// assert_eq!(queue.pop(), Some("first"));
/// assert_eq!(queue.front(), Some(&"second"));
/// ```
pub struct Queue<T, P: PoolRef<T> = ChunkPool<T>> {
    deque: Deque<T, P>,
}

impl<T> Queue<T> {
    /// Creates an empty queue with a private pool.
    pub fn new() -> Self {
        Queue {
            deque: Deque::new(),
        }
    }

    /// Creates an empty queue with a private pool and `capacity` slots per
    /// chunk.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_chunk_capacity(capacity: usize) -> Self {
        Queue {
            deque: Deque::with_chunk_capacity(capacity),
        }
    }
}

impl<T, P: PoolRef<T>> Queue<T, P> {
    /// Creates an empty queue drawing its chunks from `pool`.
    pub fn with_pool(pool: P) -> Self {
        Queue {
            deque: Deque::with_pool(pool),
        }
    }

    /// Creates an empty queue drawing chunks of `capacity` slots from `pool`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_pool_and_chunk_capacity(pool: P, capacity: usize) -> Self {
        Queue {
            deque: Deque::with_pool_and_chunk_capacity(pool, capacity),
        }
    }

    /// Appends an element to the back of the queue.
    ///
    /// # Panics
    ///
    /// Same as [`Deque::push_back`].
    pub fn push(&mut self, elem: T) {
        self.deque.push_back(elem);
    }

    /// Appends an element to the back of the queue, or returns an error if a
    /// chunk cannot be allocated.
    pub fn try_push(&mut self, elem: T) -> Result<(), AllocError> {
        self.deque.try_push_back(elem)
    }

    /// Removes the element at the front of the queue and returns it, or
    /// `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<T> {
        self.deque.pop_front()
    }

    /// Provides a reference to the element at the front, the next one to be
    /// popped.
    pub fn front(&self) -> Option<&T> {
        self.deque.front()
    }

    /// Provides a mutable reference to the element at the front.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.deque.front_mut()
    }

    /// Provides a reference to the most recently pushed element.
    pub fn back(&self) -> Option<&T> {
        self.deque.back()
    }

    /// Returns the number of elements in the queue.
    pub fn len(&self) -> usize {
        self.deque.len()
    }

    /// Returns `true` if the queue contains no elements.
    pub fn is_empty(&self) -> bool {
        self.deque.is_empty()
    }

    /// Drops every element and gives every chunk back to the pool.
    pub fn clear(&mut self) {
        self.deque.clear();
    }

    /// Moves every element into a new queue in O(1), leaving `self` empty.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Queue;
    ///
    /// let mut a = Queue::new();
    /// a.push(1);
    /// let b = a.take();
    ///
    /// assert!(a.is_empty());
    /// assert_eq!(b.len(), 1);
    /// ```
    pub fn take(&mut self) -> Self {
        Queue {
            deque: self.deque.take(),
        }
    }

    /// Returns an iterator from the front (oldest) to the back (newest).
    pub fn iter(&self) -> Iter<'_, T> {
        self.deque.iter()
    }

    /// Returns the queue's pool handle.
    pub fn pool(&self) -> &P {
        self.deque.pool()
    }

    /// Unwraps the underlying deque.
    pub fn into_inner(self) -> Deque<T, P> {
        self.deque
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, P: PoolRef<T>> Clone for Queue<T, P> {
    fn clone(&self) -> Self {
        Queue {
            deque: self.deque.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.deque.clone_from(&source.deque);
    }
}

impl<T: fmt::Debug, P: PoolRef<T>> fmt::Debug for Queue<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, P: PoolRef<T>> From<Deque<T, P>> for Queue<T, P> {
    /// Wraps a deque; its front becomes the front of the queue.
    fn from(deque: Deque<T, P>) -> Self {
        Queue { deque }
    }
}

impl<T, P: PoolRef<T>> Extend<T> for Queue<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.deque.extend(iter);
    }
}

impl<T> FromIterator<T> for Queue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Queue {
            deque: Deque::from_iter(iter),
        }
    }
}

impl<T, P: PoolRef<T>> IntoIterator for Queue<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.deque.into_iter()
    }
}

impl<'a, T, P: PoolRef<T>> IntoIterator for &'a Queue<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
