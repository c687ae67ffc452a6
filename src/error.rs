use std::alloc::Layout;
use std::collections::TryReserveError;
use thiserror::Error;

/// Errors reported by fallible queue operations.
///
/// Only allocation can fail: an empty queue is reported through `Option`
/// or `bool` return values instead.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Storage for a node (or the sentinel) could not be obtained.
    #[error("failed to allocate a ring node ({layout:?})")]
    NodeAlloc { layout: Layout },
    /// Storage for the copy of an element's string could not be obtained.
    #[error("failed to allocate {len} bytes for an element value")]
    ValueAlloc {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

impl QueueError {
    /// The layout of the allocation that failed.
    pub fn layout(&self) -> Layout {
        match self {
            QueueError::NodeAlloc { layout } => *layout,
            QueueError::ValueAlloc { len, .. } => {
                Layout::array::<u8>(*len).unwrap_or_else(|_| Layout::new::<u8>())
            }
        }
    }
}

pub type Result<T, E = QueueError> = std::result::Result<T, E>;
