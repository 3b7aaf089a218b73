use std::alloc::Layout;

use thiserror::Error;

/// The error returned when a chunk's storage cannot be obtained.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum AllocError {
    /// The chunk's size in bytes does not fit in `isize`.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The system allocator returned a null pointer.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocFailed {
        /// The layout of the allocation that failed.
        layout: Layout,
    },
}

impl AllocError {
    /// Diverges the way the standard collections do when they run out of
    /// memory.
    pub(crate) fn handle(self) -> ! {
        match self {
            AllocError::CapacityOverflow => panic!("capacity overflow"),
            AllocError::AllocFailed { layout } => std::alloc::handle_alloc_error(layout),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::alloc::Layout;

    use super::AllocError;

    #[test]
    fn display() {
        assert_eq!(AllocError::CapacityOverflow.to_string(), "capacity overflow");

        let layout = Layout::array::<u64>(4).unwrap();
        assert_eq!(
            AllocError::AllocFailed { layout }.to_string(),
            "memory allocation of 32 bytes failed"
        );
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn handle_capacity_overflow() {
        AllocError::CapacityOverflow.handle();
    }
}
