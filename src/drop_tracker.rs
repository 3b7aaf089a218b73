use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Records the values of tracked elements as they are dropped, in drop order.
pub struct DropTracker<T> {
    dropped: Rc<RefCell<Option<Vec<T>>>>,
}

impl<T: Clone> DropTracker<T> {
    pub fn new() -> Self {
        DropTracker {
            dropped: Rc::new(RefCell::new(None)),
        }
    }

    pub fn wrap(&self, value: T) -> Tracked<T> {
        Tracked {
            value,
            dropped: Rc::clone(&self.dropped),
        }
    }

    pub fn wrap_iter<I: IntoIterator<Item = T>>(&self, values: I) -> Vec<Tracked<T>> {
        values.into_iter().map(|value| self.wrap(value)).collect()
    }

    /// Runs `f` and returns the values dropped while it ran.
    pub fn track<F: FnOnce() -> R, R>(&self, f: F) -> (Vec<T>, R) {
        *self.dropped.borrow_mut() = Some(Vec::new());
        let result = f();
        let dropped = self.dropped.borrow_mut().take().unwrap_or_default();
        (dropped, result)
    }
}

pub struct Tracked<T: Clone> {
    value: T,
    dropped: Rc<RefCell<Option<Vec<T>>>>,
}

impl<T: Clone> Tracked<T> {
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        Tracked {
            value: self.value.clone(),
            dropped: Rc::clone(&self.dropped),
        }
    }
}

impl<T: Clone + PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl<T: Clone> Drop for Tracked<T> {
    fn drop(&mut self) {
        if let Some(ref mut dropped) = *self.dropped.borrow_mut() {
            dropped.push(self.value.clone());
        }
    }
}
