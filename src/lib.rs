#![warn(missing_docs)]
#![doc(test(attr(deny(warnings))))]

//! Double-ended and FIFO queues whose storage is recycled through a chunk
//! pool.
//!
//! # Why a chunk pool
//!
//! A [`Deque`] keeps its elements in fixed-capacity [`Chunk`]s. When an end
//! chunk fills up, a new one is taken from a [`ChunkPool`]; the moment a chunk
//! is drained it goes back to the pool. In a loop that keeps pushing at one
//! end and popping at the other, the same handful of chunks circulates
//! forever and the system allocator is only called while the pool warms up.
//!
//! ```
//! use cached_deque::Deque;
//!
//! let mut deque = Deque::with_chunk_capacity(4);
//! for i in 0..10 {
//!     deque.push_back(i);
//! }
//! for i in 10..10_000 {
//!     deque.push_back(i);
//!     deque.pop_front();
//! }
//!
//! assert_eq!(deque.len(), 10);
//! assert!(deque.pool().stats().allocated <= 4);
//! ```
//!
//! # Sharing a pool
//!
//! Each container owns a private pool by default. Containers that come and go
//! can share one by borrowing a `RefCell<ChunkPool<T>>` that outlives them
//! (see [`PoolRef`]).
//!
//! # Thread safety
//!
//! Nothing here synchronizes. A container with a private pool is [`Send`]
//! when its elements are; a shared pool is confined to one thread.

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

pub use chunk::Chunk;
pub use error::AllocError;
pub use iter::{IntoIter, Iter, IterMut};
pub use pool::{ChunkPool, PoolConfig, PoolRef, PoolStats};
pub use queue::Queue;

mod chunk;
mod error;
mod iter;
mod pool;
mod queue;

#[cfg(test)]
mod drop_tracker;
#[cfg(test)]
mod proptests;

const CHUNK_BYTES: usize = 512;

/// Returns the number of slots a [`Deque`] puts in each chunk unless told
/// otherwise: as many elements as fit in 512 bytes, at least one.
///
/// # Example
///
/// ```
/// use cached_deque::default_chunk_capacity;
///
/// assert_eq!(default_chunk_capacity::<u32>(), 128);
/// assert_eq!(default_chunk_capacity::<[u8; 4096]>(), 1);
/// ```
pub const fn default_chunk_capacity<T>() -> usize {
    let size = mem::size_of::<T>();
    if size == 0 {
        CHUNK_BYTES
    } else if size < CHUNK_BYTES {
        CHUNK_BYTES / size
    } else {
        1
    }
}

/// A double-ended queue built from pooled chunks.
///
/// The deque owns exactly the chunks holding its elements: an empty deque
/// owns none, and a chunk is given back to the pool as soon as its last
/// element is removed.
///
/// A `Deque` with a known list of items can be initialized from an array:
///
/// ```
/// use cached_deque::Deque;
///
/// let deq = Deque::from([-1, 0, 1]);
/// assert_eq!(deq, [-1, 0, 1]);
/// ```
pub struct Deque<T, P: PoolRef<T> = ChunkPool<T>> {
    chunks: VecDeque<Chunk<T>>,
    len: usize,
    chunk_cap: usize,
    pool: P,
}

impl<T> Deque<T> {
    /// Creates an empty deque with a private pool.
    ///
    /// No chunk is acquired until the first push.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let deque: Deque<u32> = Deque::new();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.chunk_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_capacity(default_chunk_capacity::<T>())
    }

    /// Creates an empty deque with a private pool and `capacity` slots per
    /// chunk.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let deque: Deque<u32> = Deque::with_chunk_capacity(16);
    /// assert_eq!(deque.chunk_capacity(), 16);
    /// ```
    pub fn with_chunk_capacity(capacity: usize) -> Self {
        Self::with_pool_and_chunk_capacity(ChunkPool::new(), capacity)
    }
}

impl<T, P: PoolRef<T>> Deque<T, P> {
    /// Creates an empty deque drawing its chunks from `pool`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::cell::RefCell;
    ///
    /// use cached_deque::{ChunkPool, Deque};
    ///
    /// let pool = RefCell::new(ChunkPool::new());
    /// let mut deque = Deque::with_pool(&pool);
    /// deque.push_back('a');
    /// drop(deque);
    ///
    /// assert_eq!(pool.borrow().cached_total(), 1);
    /// ```
    pub fn with_pool(pool: P) -> Self {
        Self::with_pool_and_chunk_capacity(pool, default_chunk_capacity::<T>())
    }

    /// Creates an empty deque drawing chunks of `capacity` slots from `pool`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_pool_and_chunk_capacity(pool: P, capacity: usize) -> Self {
        assert!(capacity > 0, "chunk capacity must be non-zero");

        Deque {
            chunks: VecDeque::new(),
            len: 0,
            chunk_cap: capacity,
            pool,
        }
    }

    /// Returns the number of elements in the deque.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in each chunk the deque acquires.
    pub fn chunk_capacity(&self) -> usize {
        self.chunk_cap
    }

    /// Returns the number of chunks currently owned by the deque.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut deque = Deque::with_chunk_capacity(2);
    /// deque.extend([1, 2, 3, 4]);
    /// assert_eq!(deque.chunk_count(), 3);
    ///
    /// deque.clear();
    /// assert_eq!(deque.chunk_count(), 0);
    /// ```
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the deque's pool handle.
    pub fn pool(&self) -> &P {
        &self.pool
    }

    /// Returns the deque's pool handle mutably, e.g. to shrink a private pool.
    pub fn pool_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    /// Provides a reference to the front element, or `None` if the deque is
    /// empty.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// assert_eq!(d.front(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.front(), Some(&1));
    /// ```
    pub fn front(&self) -> Option<&T> {
        self.chunks.front()?.as_slice().first()
    }

    /// Provides a mutable reference to the front element, or `None` if the
    /// deque is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// assert_eq!(d.front_mut(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// if let Some(x) = d.front_mut() {
    ///     *x = 9;
    /// }
    /// assert_eq!(d.front(), Some(&9));
    /// ```
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.chunks.front_mut()?.as_mut_slice().first_mut()
    }

    /// Provides a reference to the back element, or `None` if the deque is
    /// empty.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// assert_eq!(d.back(), None);
    ///
    /// d.push_back(1);
    /// d.push_back(2);
    /// assert_eq!(d.back(), Some(&2));
    /// ```
    pub fn back(&self) -> Option<&T> {
        self.chunks.back()?.as_slice().last()
    }

    /// Provides a mutable reference to the back element, or `None` if the
    /// deque is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.chunks.back_mut()?.as_mut_slice().last_mut()
    }

    /// Prepends an element to the deque.
    ///
    /// # Panics
    ///
    /// Aborts through [`handle_alloc_error`] if a new chunk is needed and the
    /// allocator fails, and panics if the chunk size overflows. See
    /// [`try_push_front`] for a fallible version.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_front(1);
    /// d.push_front(2);
    /// assert_eq!(d.front(), Some(&2));
    /// ```
    ///
    /// [`handle_alloc_error`]: std::alloc::handle_alloc_error
    /// [`try_push_front`]: Deque::try_push_front
    pub fn push_front(&mut self, elem: T) {
        if let Err(err) = self.try_push_front(elem) {
            err.handle();
        }
    }

    /// Prepends an element to the deque, or returns an error if a chunk is
    /// needed and cannot be allocated. On error the deque is unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::{AllocError, Deque};
    ///
    /// let mut d: Deque<u64> = Deque::with_chunk_capacity(usize::MAX / 4);
    /// assert_eq!(d.try_push_front(1), Err(AllocError::CapacityOverflow));
    /// assert!(d.is_empty());
    /// ```
    pub fn try_push_front(&mut self, elem: T) -> Result<(), AllocError> {
        if let Some(chunk) = self.chunks.front_mut().filter(|chunk| chunk.has_front_room()) {
            unsafe { chunk.push_front_unchecked(elem) };
        } else {
            // The first chunk starts in the middle so either end can grow.
            let at = if self.is_empty() {
                self.chunk_cap - self.chunk_cap / 2
            } else {
                self.chunk_cap
            };
            let mut chunk = self.acquire_chunk(at)?;
            unsafe { chunk.push_front_unchecked(elem) };
            self.chunks.push_front(chunk);
        }

        self.len += 1;
        Ok(())
    }

    /// Appends an element to the back of the deque.
    ///
    /// # Panics
    ///
    /// Same as [`push_front`].
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut buf = Deque::new();
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(3, *buf.back().unwrap());
    /// ```
    ///
    /// [`push_front`]: Deque::push_front
    pub fn push_back(&mut self, elem: T) {
        if let Err(err) = self.try_push_back(elem) {
            err.handle();
        }
    }

    /// Appends an element to the back of the deque, or returns an error if a
    /// chunk is needed and cannot be allocated. On error the deque is
    /// unchanged.
    pub fn try_push_back(&mut self, elem: T) -> Result<(), AllocError> {
        if let Some(chunk) = self.chunks.back_mut().filter(|chunk| chunk.has_back_room()) {
            unsafe { chunk.push_back_unchecked(elem) };
        } else {
            let at = if self.is_empty() { self.chunk_cap / 2 } else { 0 };
            let mut chunk = self.acquire_chunk(at)?;
            unsafe { chunk.push_back_unchecked(elem) };
            self.chunks.push_back(chunk);
        }

        self.len += 1;
        Ok(())
    }

    /// Draws an empty chunk from the pool with its live range at slot `at`.
    ///
    /// `at` is 0 only for back pushes and `chunk_cap` only for front pushes,
    /// so the chunk always has room for the push that follows.
    fn acquire_chunk(&mut self, at: usize) -> Result<Chunk<T>, AllocError> {
        let mut chunk = self.pool.acquire(self.chunk_cap)?;
        assert_eq!(
            chunk.capacity(),
            self.chunk_cap,
            "pool returned a chunk of the wrong capacity"
        );
        chunk.reset(at);
        Ok(chunk)
    }

    /// Removes the first element and returns it, or `None` if the deque is
    /// empty.
    ///
    /// If that empties the front chunk, the chunk goes back to the pool.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut d = Deque::new();
    /// d.push_back(1);
    /// d.push_back(2);
    ///
    /// assert_eq!(d.pop_front(), Some(1));
    /// assert_eq!(d.pop_front(), Some(2));
    /// assert_eq!(d.pop_front(), None);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        let chunk = self.chunks.front_mut()?;
        let elem = chunk.pop_front();
        debug_assert!(elem.is_some(), "deque owns an empty chunk");

        if chunk.is_empty() {
            if let Some(chunk) = self.chunks.pop_front() {
                self.pool.release(chunk);
            }
        }

        self.len -= 1;
        elem
    }

    /// Removes the last element from the deque and returns it, or `None` if
    /// it is empty.
    ///
    /// If that empties the back chunk, the chunk goes back to the pool.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut buf = Deque::new();
    /// assert_eq!(buf.pop_back(), None);
    /// buf.push_back(1);
    /// buf.push_back(3);
    /// assert_eq!(buf.pop_back(), Some(3));
    /// ```
    pub fn pop_back(&mut self) -> Option<T> {
        let chunk = self.chunks.back_mut()?;
        let elem = chunk.pop_back();
        debug_assert!(elem.is_some(), "deque owns an empty chunk");

        if chunk.is_empty() {
            if let Some(chunk) = self.chunks.pop_back() {
                self.pool.release(chunk);
            }
        }

        self.len -= 1;
        elem
    }

    /// Clears the deque, dropping all values and giving every chunk back to
    /// the pool.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut deque = Deque::new();
    /// deque.push_back(1);
    /// deque.clear();
    /// assert!(deque.is_empty());
    /// assert_eq!(deque.pool().cached_total(), 1);
    /// ```
    pub fn clear(&mut self) {
        while let Some(mut chunk) = self.chunks.pop_front() {
            self.len -= chunk.len();
            chunk.clear();
            self.pool.release(chunk);
        }
        debug_assert_eq!(self.len, 0);
    }

    /// Moves every element into a new deque in O(1), leaving `self` empty.
    ///
    /// The new deque takes over the pool handle; `self` gets a
    /// [sibling](PoolRef::sibling) of it.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut a = Deque::from([1, 2]);
    /// let b = a.take();
    ///
    /// assert!(a.is_empty());
    /// assert_eq!(a.chunk_count(), 0);
    /// assert_eq!(b, [1, 2]);
    /// ```
    pub fn take(&mut self) -> Self {
        let pool = self.pool.sibling();

        Deque {
            chunks: mem::take(&mut self.chunks),
            len: mem::replace(&mut self.len, 0),
            chunk_cap: self.chunk_cap,
            pool: mem::replace(&mut self.pool, pool),
        }
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let deque = Deque::from([5, 3, 4]);
    /// let c: Vec<&i32> = deque.iter().collect();
    /// assert_eq!(&c[..], &[&5, &3, &4]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.chunks.iter(), self.len)
    }

    /// Returns a front-to-back iterator that allows modifying each value.
    ///
    /// # Example
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let mut deque = Deque::from([5, 3, 4]);
    /// for num in deque.iter_mut() {
    ///     *num -= 2;
    /// }
    /// assert_eq!(deque, [3, 1, 2]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.chunks.iter_mut(), self.len)
    }
}

impl<T: Clone, P: PoolRef<T>> Deque<T, P> {
    /// Clones the deque, or returns an error if a chunk cannot be allocated.
    ///
    /// The clone draws its chunks from a [sibling](PoolRef::sibling) of this
    /// deque's pool handle.
    pub fn try_clone(&self) -> Result<Self, AllocError> {
        let mut clone = Deque::with_pool_and_chunk_capacity(self.pool.sibling(), self.chunk_cap);
        for elem in self {
            clone.try_push_back(elem.clone())?;
        }
        Ok(clone)
    }
}

impl<T> Default for Deque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: PoolRef<T>> Drop for Deque<T, P> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T: Clone, P: PoolRef<T>> Clone for Deque<T, P> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.handle())
    }

    /// Replaces the content of `self` with a copy of `source`, reusing `self`'s
    /// pool and chunk capacity.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend(source.iter().cloned());
    }
}

impl<T: fmt::Debug, P: PoolRef<T>> fmt::Debug for Deque<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, P: PoolRef<T>> IntoIterator for Deque<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T, P>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, P: PoolRef<T>> IntoIterator for &'a Deque<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, P: PoolRef<T>> IntoIterator for &'a mut Deque<T, P> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, P: PoolRef<T>> Extend<T> for Deque<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.push_back(elem);
        }
    }
}

impl<'a, T: Copy + 'a, P: PoolRef<T>> Extend<&'a T> for Deque<T, P> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, U, P, Q> PartialEq<Deque<U, Q>> for Deque<T, P>
where
    T: PartialEq<U>,
    P: PoolRef<T>,
    Q: PoolRef<U>,
{
    fn eq(&self, other: &Deque<U, Q>) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

macro_rules! impl_partial_eq {
    ([$($n:tt)*] $rhs:ty) => {
        impl<T, U, P, $($n)*> PartialEq<$rhs> for Deque<T, P>
        where
            T: PartialEq<U>,
            P: PoolRef<T>,
        {
            fn eq(&self, other: &$rhs) -> bool {
                self.len == other.len() && self.iter().eq(other.iter())
            }
        }
    };
}

impl_partial_eq!([const N: usize] [U; N]);
impl_partial_eq!([const N: usize] &[U; N]);
impl_partial_eq!([const N: usize] &mut [U; N]);
impl_partial_eq!([] &[U]);
impl_partial_eq!([] &mut [U]);
impl_partial_eq!([] Vec<U>);

impl<T: Eq, P: PoolRef<T>> Eq for Deque<T, P> {}

impl<T: PartialOrd, P: PoolRef<T>> PartialOrd for Deque<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, P: PoolRef<T>> Ord for Deque<T, P> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, P: PoolRef<T>> Hash for Deque<T, P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for elem in self {
            elem.hash(state);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Deque<T> {
    /// Converts a `[T; N]` into a `Deque<T>`.
    ///
    /// ```
    /// use cached_deque::Deque;
    ///
    /// let deq = Deque::from([1, 2, 3, 4]);
    /// assert_eq!(deq, [1, 2, 3, 4]);
    /// ```
    fn from(value: [T; N]) -> Self {
        Self::from_iter(value)
    }
}

impl<T> From<Vec<T>> for Deque<T> {
    /// Turn a [`Vec<T>`] into a [`Deque<T>`].
    fn from(value: Vec<T>) -> Self {
        Self::from_iter(value)
    }
}

impl<T> FromIterator<T> for Deque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}
