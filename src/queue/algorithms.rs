use crate::queue::{connect, value_of, Queue};
use log::{debug, trace};
use std::alloc;
use std::hash::{Hash, Hasher};
use std::mem;

mod sort;

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other)
    }
}

impl Eq for Queue {}

impl Clone for Queue {
    fn clone(&self) -> Self {
        let mut queue = Queue::new();
        for value in self {
            if let Err(err) = queue.push_back(value) {
                alloc::handle_alloc_error(err.layout());
            }
        }
        queue
    }
}

impl Hash for Queue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let mut len = 0_usize;
        for value in self {
            value.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl Queue {
    /// Deletes the middle element, i.e. the element at index ⌊*n* / 2⌋ where
    /// *n* is the size of the queue, and releases it.
    ///
    /// Returns `false` if the queue is empty.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory, in a
    /// single pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d", "e", "f"]);
    /// assert!(queue.delete_mid());
    /// assert_eq!(Vec::from_iter(&queue), ["a", "b", "c", "e", "f"]);
    /// ```
    pub fn delete_mid(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }
        let ghost = self.ghost_link();
        // Both start at the ghost node. `fast` runs two nodes per step and
        // stops on the last or the second to last element; `slow` then trails
        // one node behind the middle.
        let (mut slow, mut fast) = (ghost, ghost);
        unsafe {
            while fast.as_ref().next != ghost && fast.as_ref().next.as_ref().next != ghost {
                slow = slow.as_ref().next;
                fast = fast.as_ref().next.as_ref().next;
            }
            let element = self.detach_node(slow.as_ref().next);
            debug!("delete middle {:?}", element.value());
            element.release();
        }
        self.check_ring();
        true
    }

    /// Deletes every element whose string equals its predecessor's or its
    /// successor's, releasing them immediately. Values that appear more than
    /// once in a row are eliminated entirely, not reduced to one copy.
    ///
    /// The queue is expected to be sorted; only adjacent runs are detected.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time, in a single pass.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "a", "b", "c", "c", "c"]);
    /// queue.delete_dup();
    /// assert_eq!(Vec::from_iter(&queue), ["b"]);
    /// ```
    pub fn delete_dup(&mut self) {
        let ghost = self.ghost_link();
        let mut in_run = false;
        let mut link = self.front_link();
        while link != ghost {
            // SAFETY: `link` is an element node of the queue; `next` is read
            // before `link` is detached.
            unsafe {
                let next = link.as_ref().next;
                let same_as_next = next != ghost && value_of(link) == value_of(next);
                if same_as_next || in_run {
                    let element = self.detach_node(link);
                    debug!("delete duplicate {:?}", element.value());
                    element.release();
                }
                in_run = same_as_next;
                link = next;
            }
        }
        self.check_ring();
    }

    /// Swaps every two adjacent elements: the 1st with the 2nd, the 3rd with
    /// the 4th, and so on. A trailing unpaired element stays in place.
    ///
    /// Only links are rewired; no element is allocated or released.
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
    /// let mut queue = Queue::from_iter(["a", "b", "c", "d", "e"]);
    /// queue.swap();
    /// assert_eq!(Vec::from_iter(&queue), ["b", "a", "d", "c", "e"]);
    /// ```
    pub fn swap(&mut self) {
        let ghost = self.ghost_link();
        let mut link = self.front_link();
        unsafe {
            while link != ghost && link.as_ref().next != ghost {
                let (prev, partner) = (link.as_ref().prev, link.as_ref().next);
                let after = partner.as_ref().next;
                // `prev, link, partner, after` becomes `prev, partner, link, after`
                connect(prev, partner);
                connect(partner, link);
                connect(link, after);
                link = after;
            }
        }
        trace!("swapped adjacent pairs");
        self.check_ring();
    }

    /// Reverses the order of the elements by swapping `prev` and `next` on
    /// every node, the ghost node included.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["a", "b", "c"]);
    /// queue.reverse();
    /// assert_eq!(Vec::from_iter(&queue), ["c", "b", "a"]);
    /// ```
    pub fn reverse(&mut self) {
        if self.front_link() == self.back_link() {
            return;
        }
        let ghost = self.ghost_link();
        let mut link = ghost;
        loop {
            // SAFETY: `link` walks the ring from the ghost node back to it.
            unsafe {
                let current = &mut *link.as_ptr();
                mem::swap(&mut current.next, &mut current.prev);
                link = current.prev;
            }
            if link == ghost {
                break;
            }
        }
        trace!("reversed queue");
        self.check_ring();
    }
}
