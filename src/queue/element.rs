use crate::queue::Node;
use std::fmt;
use std::ptr::NonNull;

/// An element removed from a [`Queue`](crate::Queue).
///
/// Removing an element only unlinks it; the `Element` keeps owning the node
/// and its string until it is [released](Element::release) (or dropped).
pub struct Element {
    node: Box<Node>,
}

impl Element {
    /// Take ownership of a detached element node.
    ///
    /// It is unsafe because `node` must be an initialized element node that was
    /// allocated for `Node` by the global allocator, and no queue may still
    /// link to it.
    pub(crate) unsafe fn from_node(node: NonNull<Node>) -> Self {
        Self {
            node: Box::from_raw(node.as_ptr()),
        }
    }

    /// Provides the string of the element.
    #[inline]
    pub fn value(&self) -> &str {
        &self.node.value
    }

    /// Consumes the element, returning its string.
    pub fn into_string(self) -> String {
        let Node { value, .. } = *self.node;
        value
    }

    /// Copies the string into `buf` like `strncpy`: at most `buf.len() - 1`
    /// bytes are copied, the rest of `buf` is filled with zeros so the copy is
    /// always terminated. Longer strings are truncated silently.
    ///
    /// Returns the number of bytes copied. Nothing is written into an empty
    /// buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use ring_queue::Queue;
    ///
    /// let mut queue = Queue::new();
    /// queue.push_back("hello")?;
    /// let element = queue.pop_front().unwrap();
    ///
    /// let mut buf = [0xff_u8; 4];
    /// assert_eq!(element.copy_to(&mut buf), 3);
    /// assert_eq!(&buf, b"hel\0");
    /// # Ok::<(), ring_queue::QueueError>(())
    /// ```
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let capacity = match buf.len().checked_sub(1) {
            Some(capacity) => capacity,
            None => return 0,
        };
        let bytes = self.value().as_bytes();
        let copied = bytes.len().min(capacity);
        buf[..copied].copy_from_slice(&bytes[..copied]);
        buf[copied..].fill(0);
        copied
    }

    /// Releases the string and the node storage of the element.
    #[inline]
    pub fn release(self) {
        drop(self)
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Element").field(&self.value()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::queue::Queue;

    #[test]
    fn element_copy_to() {
        let mut queue: Queue = ["abcdef", "xy"].iter().collect();
        let long = queue.pop_front().unwrap();
        let short = queue.pop_front().unwrap();

        let mut buf = [0xff_u8; 4];
        assert_eq!(long.copy_to(&mut buf), 3);
        assert_eq!(&buf, b"abc\0");

        let mut buf = [0xff_u8; 6];
        assert_eq!(short.copy_to(&mut buf), 2);
        assert_eq!(&buf, b"xy\0\0\0\0");

        let mut buf = [0xff_u8; 1];
        assert_eq!(long.copy_to(&mut buf), 0);
        assert_eq!(&buf, b"\0");

        assert_eq!(long.copy_to(&mut []), 0);
    }

    #[test]
    fn element_into_string() {
        let mut queue: Queue = ["a"].iter().collect();
        let element = queue.pop_back().unwrap();
        assert_eq!(format!("{:?}", element), "Element(\"a\")");
        assert_eq!(element.as_ref(), "a");
        assert_eq!(element.into_string(), String::from("a"));
    }
}
