use std::collections::vec_deque;
use std::iter::{Flatten, FusedIterator};

use crate::{Chunk, ChunkPool, Deque, PoolRef};

/// An iterator over the elements of a [`Deque`], front to back.
///
/// This `struct` is created by the [`iter`] method on [`Deque`]. See its
/// documentation for more.
///
/// [`iter`]: Deque::iter
pub struct Iter<'a, T> {
    inner: Flatten<vec_deque::Iter<'a, Chunk<T>>>,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(chunks: vec_deque::Iter<'a, Chunk<T>>, len: usize) -> Self {
        Iter {
            inner: chunks.flatten(),
            len,
        }
    }
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            len: self.len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.inner.next()?;
        self.len -= 1;
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let elem = self.inner.next_back()?;
        self.len -= 1;
        Some(elem)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

/// A mutable iterator over the elements of a [`Deque`], front to back.
///
/// This `struct` is created by the [`iter_mut`] method on [`Deque`]. See its
/// documentation for more.
///
/// [`iter_mut`]: Deque::iter_mut
pub struct IterMut<'a, T> {
    inner: Flatten<vec_deque::IterMut<'a, Chunk<T>>>,
    len: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(chunks: vec_deque::IterMut<'a, Chunk<T>>, len: usize) -> Self {
        IterMut {
            inner: chunks.flatten(),
            len,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.inner.next()?;
        self.len -= 1;
        Some(elem)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let elem = self.inner.next_back()?;
        self.len -= 1;
        Some(elem)
    }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}

/// An owning iterator over the elements of a [`Deque`].
///
/// Chunks are handed back to the pool as they are drained. Elements not
/// yielded are dropped with the iterator.
///
/// This `struct` is created by the [`into_iter`] method on [`Deque`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: Deque::into_iter
pub struct IntoIter<T, P: PoolRef<T> = ChunkPool<T>> {
    deque: Deque<T, P>,
}

impl<T, P: PoolRef<T>> IntoIter<T, P> {
    pub(crate) fn new(deque: Deque<T, P>) -> Self {
        IntoIter { deque }
    }
}

impl<T, P: PoolRef<T>> Iterator for IntoIter<T, P> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.deque.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.deque.len(), Some(self.deque.len()))
    }
}

impl<T, P: PoolRef<T>> DoubleEndedIterator for IntoIter<T, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.deque.pop_back()
    }
}

impl<T, P: PoolRef<T>> ExactSizeIterator for IntoIter<T, P> {}

impl<T, P: PoolRef<T>> FusedIterator for IntoIter<T, P> {}
