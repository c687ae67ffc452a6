use crate::queue::element::Element;
use crate::queue::{value_of, Link, Queue};
use std::alloc;
use std::fmt;
use std::iter::{FromIterator, FusedIterator};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// An iterator over the strings of a `Queue`.
///
/// It uses a pair of nodes `start..end` to represent a half-open subrange
/// of the queue, where `start` is inclusive and `end` is not.
///
/// Though the `Iter` does not hold a reference from the queue,
/// it actually *borrows* (immutably) from the queue, so a phantom
/// marker of `&'a Queue` is added to protect the queue from being
/// written.
///
/// # Examples
///
/// ```compile_fail
/// use ring_queue::Queue;
///
/// let mut queue = Queue::from_iter(["a", "b", "c"]);
/// let mut iter = queue.iter();
///
/// // Won't compile, because queue is already borrowed immutably.
/// queue.push_back("d").unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    start: NonNull<Link>,
    end: NonNull<Link>,
    _marker: PhantomData<&'a Queue>,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(queue: &'a Queue) -> Self {
        let start = queue.front_link();
        let end = queue.ghost_link();
        let _marker = PhantomData;
        Self {
            start,
            end,
            _marker,
        }
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    /// Return `*start` and reset the iterating range to `(start.next)..end`,
    /// or return `None` if `start..end` is already empty.
    fn next(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `start` is an element node.
        let current = self.start;
        unsafe {
            self.start = current.as_ref().next;
            Some(value_of(current))
        }
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    /// Reset the iterating range to `start..(end.prev)` and return `*end`,
    /// or return `None` if `start..end` is already empty.
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start..end` is always a valid range of a queue,
        // and it is not empty here, so `end.prev` is an element node.
        unsafe {
            self.end = self.end.as_ref().prev;
            Some(value_of(self.end))
        }
    }
}

impl FusedIterator for Iter<'_> {}

/// An owning iterator over the elements of a `Queue`.
///
/// Each element is unlinked from the queue and handed over as an
/// [`Element`]; elements not yielded are released with the queue.
pub struct IntoIter {
    queue: Queue,
}

impl fmt::Debug for IntoIter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.queue).finish()
    }
}

impl Iterator for IntoIter {
    type Item = Element;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

impl DoubleEndedIterator for IntoIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.queue.pop_back()
    }
}

impl FusedIterator for IntoIter {}

impl IntoIterator for Queue {
    type Item = Element;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { queue: self }
    }
}

impl<'a> IntoIterator for &'a Queue {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<S: AsRef<str>> Extend<S> for Queue {
    /// Copies every string to the back of the queue.
    ///
    /// Allocation failure is handled by
    /// [`handle_alloc_error`](std::alloc::handle_alloc_error); use
    /// [`Queue::push_back`] to observe it instead.
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for value in iter {
            if let Err(err) = self.push_back(value.as_ref()) {
                alloc::handle_alloc_error(err.layout());
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Queue {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut queue = Queue::new();
        queue.extend(iter);
        queue
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::Queue;

    #[test]
    fn test_iter() {
        let queue = Queue::from_iter(["a", "b", "c", "d"]);
        let mut iter = queue.iter();
        assert_eq!(iter.next(), Some("a"));
        assert_eq!(iter.next_back(), Some("d"));
        assert_eq!(iter.next(), Some("b"));
        assert_eq!(iter.next_back(), Some("c"));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
        // Fused and non-cyclic
        assert_eq!(iter.next(), None);

        assert_eq!(queue.iter().last(), Some("d"));
        assert_eq!(queue.iter().rev().collect::<Vec<_>>(), ["d", "c", "b", "a"]);
        assert_eq!(format!("{:?}", queue.iter()), r#"Iter(["a", "b", "c", "d"])"#);
    }

    #[test]
    fn test_into_iter() {
        let queue = Queue::from_iter(["a", "b", "c"]);
        let mut iter = queue.into_iter();
        assert_eq!(iter.next().unwrap().value(), "a");
        assert_eq!(iter.next_back().unwrap().value(), "c");
        assert_eq!(iter.next().unwrap().into_string(), "b");
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());
    }

    #[test]
    fn test_extend() {
        let mut queue = Queue::new();
        queue.extend(vec![String::from("x"), String::from("y")]);
        queue.extend(["z"]);
        assert_eq!(Vec::from_iter(&queue), ["x", "y", "z"]);
    }
}
