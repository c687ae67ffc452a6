use std::alloc::{self, Layout};
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use log::warn;

use crate::error::{QueueError, Result};
use crate::queue::element::Element;
use crate::queue::iterator::Iter;

pub mod element;
pub mod iterator;

mod algorithms;

/// The `Queue` is a double-ended queue of strings, implemented as a cyclic
/// doubly-linked list with a sentinel node.
///
/// Inserting and removing at either end take constant time. Each inserted
/// string is copied into storage owned by its element, so the queue never
/// aliases caller memory.
///
/// The `Queue` contains only a pointer `ghost` to the sentinel (ghost) node.
/// The ghost node has no payload; an empty queue is a ghost node whose `next`
/// and `prev` point to itself.
///
/// # Naming Conventions
///
/// - `link`: a pointer to the [`Link`] embedded in a node, which may be the
///   ghost node;
/// - `node`: a pointer to an element node, never the ghost node.
pub struct Queue {
    ghost: NonNull<Link>,
    _marker: PhantomData<Box<Node>>,
}

/// The `prev`/`next` pair that gives a node its position in the ring.
#[repr(C)]
pub(crate) struct Link {
    pub(crate) next: NonNull<Link>,
    pub(crate) prev: NonNull<Link>,
}

/// An element node. The link must stay the first field so that a pointer to
/// the link of an element node can be cast back to the node.
#[repr(C)]
pub(crate) struct Node {
    pub(crate) link: Link,
    pub(crate) value: String,
}

// private methods
impl Queue {
    pub(crate) fn ghost_link(&self) -> NonNull<Link> {
        self.ghost
    }
    pub(crate) fn front_link(&self) -> NonNull<Link> {
        // SAFETY: `ghost.next` is always valid (either `ghost` itself, or the first element
        // in the queue).
        unsafe { self.ghost.as_ref().next }
    }
    pub(crate) fn back_link(&self) -> NonNull<Link> {
        // SAFETY: `ghost.prev` is always valid (either `ghost` itself, or the last element
        // in the queue).
        unsafe { self.ghost.as_ref().prev }
    }

    /// Detach a single element node `link` from the queue, and hand it over
    /// as an owned [`Element`].
    ///
    /// It is unsafe because it does not check whether `link` belongs to the queue
    /// or whether it is the ghost node.
    pub(crate) unsafe fn detach_node(&mut self, link: NonNull<Link>) -> Element {
        debug_assert!(link != self.ghost, "Cannot detach the ghost node");
        let current = link.as_ref();
        connect(current.prev, current.next);
        Element::from_node(link.cast())
    }

    /// Attach a detached node `node` to the queue, between `prev` and `next`.
    ///
    /// It is unsafe because it does not check whether `prev` and `next` belong
    /// to the queue, or whether they are adjacent (only in
    /// `#[cfg(debug_assertions)]`).
    pub(crate) unsafe fn attach_node(
        &mut self,
        prev: NonNull<Link>,
        next: NonNull<Link>,
        node: NonNull<Node>,
    ) {
        #[cfg(debug_assertions)]
        assert_adjacent(prev, next);
        let link = node.cast::<Link>();
        connect(prev, link);
        connect(link, next);
        #[cfg(debug_assertions)]
        {
            assert_adjacent(prev, link);
            assert_adjacent(link, next);
        }
    }

    fn push_between(&mut self, prev: NonNull<Link>, next: NonNull<Link>, value: &str) -> Result<()> {
        let node = Node::try_new_detached(value).map_err(|err| {
            warn!("failed to insert a {}-byte element: {}", value.len(), err);
            err
        })?;
        // SAFETY: `prev` and `next` are adjacent nodes of this queue, provided by the
        // callers.
        unsafe { self.attach_node(prev, next, node) };
        self.check_ring();
        Ok(())
    }

    #[inline]
    pub(crate) fn check_ring(&self) {
        #[cfg(feature = "check-ring")]
        assert!(self.is_well_formed(), "ring invariant violated");
    }
}

impl Queue {
    /// Create an empty `Queue`.
    ///
    /// Aborts through [`handle_alloc_error`](std::alloc::handle_alloc_error) if
    /// the ghost node cannot be allocated; use [`Queue::try_new`] to observe
    /// that failure instead.
    ///
    /// # Examples
    /// ```
    /// use ring_queue::Queue;
    /// let queue = Queue::new();
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::try_new().unwrap_or_else(|err| alloc::handle_alloc_error(err.layout()))
    }

    /// Create an empty `Queue`, or return an error if the ghost node cannot be
    /// allocated.
    pub fn try_new() -> Result<Self> {
        let ghost = try_allocate::<Link>().map_err(|err| {
            warn!("failed to create a queue: {}", err);
            err
        })?;
        // SAFETY: `ghost` is freshly allocated with the layout of `Link`.
        unsafe {
            ptr::write(
                ghost.as_ptr(),
                Link {
                    next: ghost,
                    prev: ghost,
                },
            )
        };
        let _marker = PhantomData;
        Ok(Self { ghost, _marker })
    }

    /// Returns `true` if the `Queue` is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.front_link() == self.ghost_link()
    }

    /// Returns the number of elements, counted by walking the ring once.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert_eq!(queue.size(), 0);
    ///
    /// queue.push_back("b")?;
    /// queue.push_front("a")?;
    /// assert_eq!(queue.size(), 2);
    /// # Ok::<(), ring_queue::QueueError>(())
    /// ```
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Releases all elements of the `Queue`.
    pub fn clear(&mut self) {
        while let Some(element) = self.pop_front() {
            element.release();
        }
    }

    /// Provides the front string, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&str> {
        self.iter().next()
    }

    /// Provides the back string, or `None` if the queue is empty.
    #[inline]
    pub fn back(&self) -> Option<&str> {
        self.iter().next_back()
    }

    /// Copies `value` into a new element at the front of the queue.
    ///
    /// On allocation failure the queue is left untouched.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.push_front("b")?;
    /// queue.push_front("a")?;
    /// assert_eq!(queue.front(), Some("a"));
    /// # Ok::<(), ring_queue::QueueError>(())
    /// ```
    pub fn push_front(&mut self, value: &str) -> Result<()> {
        self.push_between(self.ghost_link(), self.front_link(), value)
    }

    /// Copies `value` into a new element at the back of the queue.
    ///
    /// On allocation failure the queue is left untouched.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn push_back(&mut self, value: &str) -> Result<()> {
        self.push_between(self.back_link(), self.ghost_link(), value)
    }

    /// Unlinks the first element and hands it over to the caller, or returns
    /// `None` if the queue is empty.
    ///
    /// The element is not released: the caller owns it from now on.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// assert!(queue.pop_front().is_none());
    ///
    /// queue.push_back("a")?;
    /// let element = queue.pop_front().unwrap();
    /// assert_eq!(element.value(), "a");
    /// assert!(queue.is_empty());
    /// element.release();
    /// # Ok::<(), ring_queue::QueueError>(())
    /// ```
    pub fn pop_front(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the front node is an element node.
        let element = unsafe { self.detach_node(self.front_link()) };
        self.check_ring();
        Some(element)
    }

    /// Unlinks the last element and hands it over to the caller, or returns
    /// `None` if the queue is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn pop_back(&mut self) -> Option<Element> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: the queue is not empty, so the back node is an element node.
        let element = unsafe { self.detach_node(self.back_link()) };
        self.check_ring();
        Some(element)
    }

    /// Provides a forward iterator over the strings.
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Returns `true` if every node reachable from the ghost node satisfies
    /// `node.next.prev == node` and `node.prev.next == node`, and the forward
    /// walk returns to the ghost node.
    ///
    /// A broken back link is detected on the first node that repeats, so the
    /// walk always terminates.
    pub fn is_well_formed(&self) -> bool {
        let ghost = self.ghost_link();
        let mut link = ghost;
        loop {
            // SAFETY: every visited node passed the adjacency checks of its
            // predecessor, so it is a node of this queue.
            let (prev, next) = unsafe {
                let current = link.as_ref();
                (current.prev, current.next)
            };
            let linked = unsafe { next.as_ref().prev == link && prev.as_ref().next == link };
            if !linked {
                return false;
            }
            link = next;
            if link == ghost {
                return true;
            }
        }
    }
}

impl Debug for Queue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl Node {
    /// Create a detached node holding a copy of `value`.
    ///
    /// If the copy cannot be allocated, the node storage is released before
    /// returning the error.
    pub(crate) fn try_new_detached(value: &str) -> Result<NonNull<Node>> {
        let node = try_allocate::<Node>()?;
        let mut copy = String::new();
        if let Err(source) = copy.try_reserve_exact(value.len()) {
            // SAFETY: `node` was just allocated with the layout of `Node`,
            // and nothing has been written to it.
            unsafe { deallocate(node) };
            return Err(QueueError::ValueAlloc {
                len: value.len(),
                source,
            });
        }
        copy.push_str(value);
        // `link.prev` and `link.next` are dangling until the node is attached.
        let dangling = NonNull::dangling();
        // SAFETY: `node` is valid for writes and properly aligned.
        unsafe {
            ptr::write(
                node.as_ptr(),
                Node {
                    link: Link {
                        next: dangling,
                        prev: dangling,
                    },
                    value: copy,
                },
            )
        };
        Ok(node)
    }
}

fn try_allocate<T>() -> Result<NonNull<T>> {
    let layout = Layout::new::<T>();
    // SAFETY: `Link` and `Node`, the only types allocated here, are not zero-sized.
    let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
    NonNull::new(ptr).ok_or(QueueError::NodeAlloc { layout })
}

/// It is unsafe because `ptr` must come from [`try_allocate::<T>`] and must not
/// hold a value that needs dropping.
unsafe fn deallocate<T>(ptr: NonNull<T>) {
    alloc::dealloc(ptr.as_ptr().cast(), Layout::new::<T>());
}

pub(crate) unsafe fn connect(prev: NonNull<Link>, next: NonNull<Link>) {
    (*prev.as_ptr()).next = next;
    (*next.as_ptr()).prev = prev;
}

/// Provides the string of the element node `link`.
///
/// It is unsafe because `link` must be an element node (never the ghost node)
/// that outlives `'a`.
pub(crate) unsafe fn value_of<'a>(link: NonNull<Link>) -> &'a str {
    &(*link.cast::<Node>().as_ptr()).value
}

#[cfg(debug_assertions)]
fn assert_adjacent(prev: NonNull<Link>, next: NonNull<Link>) {
    unsafe {
        assert_eq!(prev.as_ref().next, next);
        assert_eq!(next.as_ref().prev, prev);
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        self.clear();
        // SAFETY: the ghost node was allocated by `try_allocate::<Link>` and has
        // no payload.
        unsafe { deallocate(self.ghost) };
    }
}

unsafe impl Send for Queue {}

unsafe impl Sync for Queue {}
