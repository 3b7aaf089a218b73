use std::alloc::{self, Layout};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::slice;

use crate::AllocError;

/// Fixed-capacity storage holding a contiguous run of live elements.
///
/// Only the slots in `begin..end` hold initialized values. A chunk is owned
/// either by a [`ChunkPool`], in which case its live range is empty, or by a
/// single [`Deque`].
///
/// [`ChunkPool`]: crate::ChunkPool
/// [`Deque`]: crate::Deque
pub struct Chunk<T> {
    ptr: NonNull<T>,
    cap: usize,
    begin: usize,
    end: usize,
}

unsafe impl<T: Send> Send for Chunk<T> {}
unsafe impl<T: Sync> Sync for Chunk<T> {}

impl<T> Chunk<T> {
    pub(crate) fn allocate(cap: usize) -> Result<Self, AllocError> {
        assert!(cap > 0, "chunk capacity must be non-zero");

        let ptr = if is_zst::<T>() {
            NonNull::dangling()
        } else {
            let layout = Layout::array::<T>(cap).map_err(|_| AllocError::CapacityOverflow)?;
            let ptr = unsafe { alloc::alloc(layout) };
            NonNull::new(ptr as *mut T).ok_or(AllocError::AllocFailed { layout })?
        };

        Ok(Chunk {
            ptr,
            cap,
            begin: 0,
            end: 0,
        })
    }

    /// Returns the number of slots in the chunk.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Returns the number of live elements in the chunk.
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns `true` if the chunk holds no live elements.
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Drops any live elements and moves the empty live range to slot `at`,
    /// so that pushes at the front fill `..at` and pushes at the back fill
    /// `at..`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is past the end of the chunk.
    pub(crate) fn reset(&mut self, at: usize) {
        assert!(at <= self.cap, "reset position {at} out of range for chunk of capacity {}", self.cap);
        self.clear();
        self.begin = at;
        self.end = at;
    }

    pub(crate) fn has_front_room(&self) -> bool {
        self.begin > 0
    }

    pub(crate) fn has_back_room(&self) -> bool {
        self.end < self.cap
    }

    /// # Safety
    ///
    /// The chunk must have front room.
    pub(crate) unsafe fn push_front_unchecked(&mut self, elem: T) {
        debug_assert!(self.has_front_room());
        self.begin -= 1;
        ptr::write(self.ptr.as_ptr().add(self.begin), elem);
    }

    /// # Safety
    ///
    /// The chunk must have back room.
    pub(crate) unsafe fn push_back_unchecked(&mut self, elem: T) {
        debug_assert!(self.has_back_room());
        ptr::write(self.ptr.as_ptr().add(self.end), elem);
        self.end += 1;
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            self.begin += 1;
            unsafe { Some(ptr::read(self.ptr.as_ptr().add(self.begin - 1))) }
        }
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            None
        } else {
            self.end -= 1;
            unsafe { Some(ptr::read(self.ptr.as_ptr().add(self.end))) }
        }
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(self.begin), self.len()) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().add(self.begin), self.len()) }
    }

    /// Drops every live element and empties the live range.
    pub(crate) fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        // Emptied before dropping so a panicking destructor cannot lead to a
        // second drop of the same elements.
        self.begin = 0;
        self.end = 0;
        unsafe { ptr::drop_in_place(live) };
    }
}

impl<T> Drop for Chunk<T> {
    fn drop(&mut self) {
        self.clear();

        if !is_zst::<T>() {
            if let Ok(layout) = Layout::array::<T>(self.cap) {
                unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, layout) };
            }
        }
    }
}

impl<T> fmt::Debug for Chunk<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("capacity", &self.cap)
            .field("begin", &self.begin)
            .field("end", &self.end)
            .finish()
    }
}

impl<'a, T> IntoIterator for &'a Chunk<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Chunk<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

pub(crate) fn is_zst<T>() -> bool {
    mem::size_of::<T>() == 0
}
