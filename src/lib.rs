//! This crate provides a double-ended queue of strings, implemented as an
//! intrusive cyclic doubly-linked list with a sentinel node.
//!
//! The [`Queue`] allows inserting and removing strings at both ends in
//! constant time, and rearranges its elements in place: deleting the middle
//! element, deleting runs of duplicates, swapping adjacent pairs, reversing,
//! and a stable merge sort. None of the rearrangements allocate or copy
//! strings; they only rewire links.
//!
//! Here is a quick example showing how the queue works.
//!
//! ```
//! use ring_queue::Queue;
//!
//! let mut queue = Queue::new();
//! queue.push_back("dolphin")?;
//! queue.push_back("bear")?;
//! queue.push_front("gerbil")?;
//! assert_eq!(Vec::from_iter(&queue), ["gerbil", "dolphin", "bear"]);
//!
//! queue.sort();
//! assert_eq!(Vec::from_iter(&queue), ["bear", "dolphin", "gerbil"]);
//!
//! // Removing only unlinks the element; the caller owns it afterwards.
//! let element = queue.pop_front().unwrap();
//! assert_eq!(element.value(), "bear");
//! element.release();
//! # Ok::<(), ring_queue::QueueError>(())
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the queue is like the following graph:
//! ```text
//!          ┌─────────────────────────────────────────────────────────────────────┐
//!          ↓                                                     (Ghost) Link    │
//!    ╔═══════════╗           ╔═══════════╗                        ┌───────────┐  │
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ┄┄ ────────→ │   next    │ ─┘
//!    ╟───────────╢           ╟───────────╢     Node 2, 3, ...     ├───────────┤
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ┄┄ ←──────── │   prev    │
//! │  ╟───────────╢           ╟───────────╢                        └───────────┘
//! │  ║  String   ║           ║  String   ║                            ↑   ↑
//! │  ╚═══════════╝           ╚═══════════╝                            │   │
//! │      Node 0                  Node 1                               │   │
//! └───────────────────────────────────────────────────────────────────┘   │
//! ╔═══════════╗                                                           │
//! ║   ghost   ║ ──────────────────────────────────────────────────────────┘
//! ╚═══════════╝
//!     Queue
//! ```
//! The `Queue` contains only a pointer `ghost` to the ghost (sentinel) node,
//! which is a bare link without payload.
//!
//! Each element node is allocated on heap, and contains:
//! - the embedded link, placed first so that a pointer to the link can be
//!   cast back to the node: the `next` pointer to the next element (or the
//!   ghost node if it is the last element), and the `prev` pointer to the
//!   previous element (or the ghost node if it is the first element);
//! - a `String` holding a copy of the inserted string.
//!
//! Initially, the `next` and `prev` pointers of the ghost node point to
//! itself. As elements are inserted, `ghost.next` points to the first element
//! and `ghost.prev` to the last one.
//!
//! # Ownership
//!
//! [`Queue::pop_front`] and [`Queue::pop_back`] unlink an element and hand it
//! over as an [`Element`], which keeps its storage until
//! [`release`](Element::release)d or dropped. Elements deleted in place by
//! [`Queue::delete_mid`] and [`Queue::delete_dup`] are released immediately.
//! Dropping the queue releases every element still linked.
//!
//! # Allocation Failure
//!
//! Insertion copies the string into freshly allocated storage and reports
//! allocation failure as a [`QueueError`] instead of aborting, leaving the
//! queue untouched. The infallible conveniences ([`Queue::new`],
//! [`FromIterator`], [`Extend`], [`Clone`]) defer to
//! [`handle_alloc_error`](std::alloc::handle_alloc_error), as std collections
//! do.
//!
//! # Harness Operations
//!
//! The [`ops`] module exposes the same operations as free functions that
//! accept an absent queue and report every failure through their return
//! value.
//!
//! # Features
//!
//! - `check-ring`: validate the whole ring after every mutating operation,
//!   panicking if an invariant is broken. Run the test suite with it as well:
//! ```text
//! cargo test
//! cargo test --features check-ring
//! ```
//!
//! [`Queue`]: crate::Queue
//! [`Element`]: crate::Element

#[doc(inline)]
pub use error::{QueueError, Result};
#[doc(inline)]
pub use queue::element::Element;
#[doc(inline)]
pub use queue::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use queue::Queue;

pub mod ops;
pub mod queue;

mod error;
