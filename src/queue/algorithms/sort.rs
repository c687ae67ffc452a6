use crate::queue::{connect, value_of, Link, Queue};
use log::trace;
use std::cmp::Ordering;
use std::ptr::NonNull;

impl Queue {
    /// Sorts the queue in ascending byte-wise lexicographic order.
    ///
    /// This sort is stable (i.e., does not reorder equal strings).
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and
    /// *O*(log(*n*)) memory for the recursion.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a top-down merge sort on the links of the
    /// queue. No element is allocated, copied or released.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["pear", "apple", "fig", "apple"]);
    /// queue.sort();
    /// assert_eq!(Vec::from_iter(&queue), ["apple", "apple", "fig", "pear"]);
    /// ```
    pub fn sort(&mut self) {
        self.sort_by(|a, b| a.cmp(b));
    }

    /// Sorts the queue with a comparator function.
    ///
    /// This sort is stable (i.e., does not reorder equal strings). The
    /// comparator must define a total ordering, otherwise the resulting order
    /// is unspecified.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::from_iter(["ccc", "a", "bb", "d"]);
    /// queue.sort_by(|a, b| a.len().cmp(&b.len()));
    /// assert_eq!(Vec::from_iter(&queue), ["a", "d", "bb", "ccc"]);
    ///
    /// // reverse sorting
    /// queue.sort_by(|a, b| b.cmp(a));
    /// assert_eq!(Vec::from_iter(&queue), ["d", "ccc", "bb", "a"]);
    /// ```
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        merge_sort(self, |a, b| compare(a, b) == Ordering::Less);
    }
}

/// A sorted open chain `head..=tail`, where `tail.next` is the boundary.
#[derive(Clone, Copy)]
struct Run {
    head: NonNull<Link>,
    tail: NonNull<Link>,
}

/// The state of the merge in progress: `boundary.next..=tail` is merged,
/// `left..` and `right..` are the rest of the two runs.
#[derive(Clone, Copy)]
struct Merging {
    left: NonNull<Link>,
    right: NonNull<Link>,
    tail: NonNull<Link>,
}

/// The deepest recursion of the sort halves a chain at every level.
const MAX_DEPTH: usize = usize::BITS as usize;

/// Keeps track of every open chain while the ring is cut.
///
/// If the comparator panics, dropping the guard links every chain back into
/// the ring, in unspecified order, so that no element is lost.
struct CutRing {
    boundary: NonNull<Link>,
    /// Heads of the chains set aside by the frames on the recursion stack.
    pending: [NonNull<Link>; MAX_DEPTH],
    depth: usize,
    merging: Option<Merging>,
    closed: bool,
}

impl CutRing {
    fn new(boundary: NonNull<Link>) -> Self {
        Self {
            boundary,
            pending: [boundary; MAX_DEPTH],
            depth: 0,
            merging: None,
            closed: false,
        }
    }

    fn set_aside(&mut self, head: NonNull<Link>) {
        self.pending[self.depth] = head;
        self.depth += 1;
    }

    fn take_back(&mut self) {
        self.depth -= 1;
    }

    /// Close the ring around the sorted run.
    unsafe fn close(mut self, sorted: Run) {
        connect(self.boundary, sorted.head);
        connect(sorted.tail, self.boundary);
        self.closed = true;
    }

    /// Link every known chain back into the ring.
    ///
    /// The merged part of an interrupted merge still leads into the run its
    /// tail was taken from, so it is followed only up to `left` or `right`.
    unsafe fn reclose(&mut self) {
        let boundary = self.boundary;
        let mut tail = boundary;
        let mut append = |head: NonNull<Link>, stop: &[NonNull<Link>]| {
            let mut link = head;
            while link != boundary && !stop.contains(&link) {
                let next = link.as_ref().next;
                connect(tail, link);
                tail = link;
                link = next;
            }
        };
        if let Some(Merging { left, right, tail: merged_tail }) = self.merging {
            if merged_tail != boundary {
                append(boundary.as_ref().next, &[left, right]);
            }
            append(left, &[]);
            append(right, &[]);
        }
        for &head in &self.pending[..self.depth] {
            append(head, &[]);
        }
        connect(tail, boundary);
    }
}

impl Drop for CutRing {
    fn drop(&mut self) {
        if !self.closed {
            // SAFETY: `pending` and `merging` cover every element node of the
            // cut ring, each chain terminated by the boundary.
            unsafe { self.reclose() };
        }
    }
}

fn merge_sort<F>(queue: &mut Queue, mut less: F)
where
    F: FnMut(&str, &str) -> bool,
{
    let (front, back) = (queue.front_link(), queue.back_link());
    if front == back {
        // empty, or a single element
        return;
    }
    let mut cut = CutRing::new(queue.ghost_link());
    unsafe {
        // `back.next` is already the ghost node, so `front..=back` is an open
        // chain terminated by the boundary.
        let sorted = merge_sort_run(front, &mut cut, &mut less);
        cut.close(sorted);
    }
    trace!("sorted queue");
    queue.check_ring();
}

/// Sorts the non-empty open chain starting at `head` and ending right before
/// the boundary.
///
/// It is unsafe because the chain must consist of element nodes whose `next`
/// links reach the boundary.
unsafe fn merge_sort_run<F>(head: NonNull<Link>, cut: &mut CutRing, less: &mut F) -> Run
where
    F: FnMut(&str, &str) -> bool,
{
    let boundary = cut.boundary;
    if head.as_ref().next == boundary {
        return Run { head, tail: head };
    }

    // Find the front of the second half: `fast` stops at or one before the
    // boundary.
    let (mut slow, mut fast) = (head, head);
    while fast != boundary && fast.as_ref().next != boundary {
        fast = fast.as_ref().next.as_ref().next;
        slow = slow.as_ref().next;
    }
    // Cut the chain into `head..slow` and `slow..boundary`, both terminated
    // by the boundary.
    let front_tail = slow.as_ref().prev;
    (*front_tail.as_ptr()).next = boundary;
    (*slow.as_ptr()).prev = boundary;

    cut.set_aside(slow);
    let front = merge_sort_run(head, cut, less);
    cut.take_back();

    cut.set_aside(front.head);
    let rear = merge_sort_run(slow, cut, less);
    cut.take_back();

    merge(front, rear, cut, less)
}

/// Merges two sorted runs into one. On equal strings the node of `front` goes
/// first.
///
/// The boundary serves as the dummy node in front of the merged run, so its
/// `next` link is overwritten.
unsafe fn merge<F>(front: Run, rear: Run, cut: &mut CutRing, less: &mut F) -> Run
where
    F: FnMut(&str, &str) -> bool,
{
    let boundary = cut.boundary;
    let mut state = Merging {
        left: front.head,
        right: rear.head,
        tail: boundary,
    };
    while state.left != boundary && state.right != boundary {
        cut.merging = Some(state);
        let run = if less(value_of(state.right), value_of(state.left)) {
            &mut state.right
        } else {
            &mut state.left
        };
        let node = *run;
        *run = node.as_ref().next;
        connect(state.tail, node);
        state.tail = node;
    }
    cut.merging = None;
    // Append the remainder of the run that is not exhausted.
    let tail = if state.left != boundary {
        connect(state.tail, state.left);
        front.tail
    } else {
        connect(state.tail, state.right);
        rear.tail
    };
    Run {
        head: boundary.as_ref().next,
        tail,
    }
}
