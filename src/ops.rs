//! The operation surface consumed by a driving harness.
//!
//! Every function accepts an absent queue (`None`) and treats it as a silent
//! failure, mirroring how the harness may hand over a queue that failed to be
//! created. Failures are reported through the return value only.
//!
//! ```
//! use ring_queue::ops;
//!
//! let mut queue = ops::create();
//! assert!(ops::insert_tail(queue.as_mut(), "hello"));
//!
//! let mut buf = [0_u8; 4];
//! let element = ops::remove_head(queue.as_mut(), Some(&mut buf));
//! assert_eq!(&buf, b"hel\0");
//! ops::release_element(element);
//!
//! assert_eq!(ops::size(queue.as_ref()), 0);
//! ops::destroy(queue);
//! ```

use crate::queue::element::Element;
use crate::queue::Queue;

/// Creates an empty queue, or `None` if its sentinel cannot be allocated.
pub fn create() -> Option<Queue> {
    Queue::try_new().ok()
}

/// Releases every element of the queue, then the queue itself.
pub fn destroy(queue: Option<Queue>) {
    drop(queue)
}

/// Copies `value` into a new element at the head of the queue.
///
/// Returns `false` if the queue is absent or allocation fails; the queue is
/// left untouched in both cases.
pub fn insert_head(queue: Option<&mut Queue>, value: &str) -> bool {
    queue.map_or(false, |queue| queue.push_front(value).is_ok())
}

/// Copies `value` into a new element at the tail of the queue.
pub fn insert_tail(queue: Option<&mut Queue>, value: &str) -> bool {
    queue.map_or(false, |queue| queue.push_back(value).is_ok())
}

/// Unlinks the head element and hands it over to the caller.
///
/// If `buf` is given, the string is copied into it as by
/// [`Element::copy_to`]. Returns `None` if the queue is absent or empty.
pub fn remove_head(queue: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Option<Element> {
    let element = queue?.pop_front()?;
    copy_out(&element, buf);
    Some(element)
}

/// Unlinks the tail element and hands it over to the caller.
pub fn remove_tail(queue: Option<&mut Queue>, buf: Option<&mut [u8]>) -> Option<Element> {
    let element = queue?.pop_back()?;
    copy_out(&element, buf);
    Some(element)
}

fn copy_out(element: &Element, buf: Option<&mut [u8]>) {
    if let Some(buf) = buf {
        element.copy_to(buf);
    }
}

/// Releases an element previously handed over by a removal.
pub fn release_element(element: Option<Element>) {
    if let Some(element) = element {
        element.release();
    }
}

/// Returns the number of elements, or 0 for an absent queue.
pub fn size(queue: Option<&Queue>) -> usize {
    queue.map_or(0, Queue::size)
}

/// Deletes the element at index ⌊*n* / 2⌋. Returns `false` if the queue is
/// absent or empty.
pub fn delete_mid(queue: Option<&mut Queue>) -> bool {
    queue.map_or(false, Queue::delete_mid)
}

/// Deletes every element of a run of equal adjacent strings. Returns `false`
/// only if the queue is absent.
pub fn delete_dup(queue: Option<&mut Queue>) -> bool {
    match queue {
        Some(queue) => {
            queue.delete_dup();
            true
        }
        None => false,
    }
}

/// Swaps every two adjacent elements.
pub fn swap(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.swap();
    }
}

/// Reverses the order of the elements.
pub fn reverse(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.reverse();
    }
}

/// Sorts the elements in ascending order.
pub fn sort(queue: Option<&mut Queue>) {
    if let Some(queue) = queue {
        queue.sort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::VecDeque;

    fn strings(queue: &Queue) -> Vec<String> {
        queue.iter().map(String::from).collect()
    }

    #[test]
    fn absent_queue() {
        assert!(!insert_head(None, "a"));
        assert!(!insert_tail(None, "a"));
        let mut buf = [0xff_u8; 4];
        assert!(remove_head(None, Some(&mut buf)).is_none());
        assert!(remove_tail(None, None).is_none());
        assert_eq!(buf, [0xff; 4]);
        assert_eq!(size(None), 0);
        assert!(!delete_mid(None));
        assert!(!delete_dup(None));
        swap(None);
        reverse(None);
        sort(None);
        release_element(None);
        destroy(None);
    }

    #[test]
    fn empty_queue() {
        let mut queue = create();
        assert!(queue.is_some());
        assert_eq!(size(queue.as_ref()), 0);

        let mut buf = [0xff_u8; 4];
        assert!(remove_head(queue.as_mut(), Some(&mut buf)).is_none());
        assert!(remove_tail(queue.as_mut(), Some(&mut buf)).is_none());
        assert_eq!(buf, [0xff; 4]);
        assert!(!delete_mid(queue.as_mut()));
        assert!(delete_dup(queue.as_mut()));
        swap(queue.as_mut());
        reverse(queue.as_mut());
        sort(queue.as_mut());
        assert_eq!(size(queue.as_ref()), 0);
        assert!(queue.as_ref().map_or(false, Queue::is_well_formed));
        destroy(queue);
    }

    #[test]
    fn insert_then_remove_round_trip() {
        let mut queue = create();
        assert!(insert_tail(queue.as_mut(), "gerbil"));

        let mut buf = [0xff_u8; 4];
        let element = remove_head(queue.as_mut(), Some(&mut buf));
        assert_eq!(&buf, b"ger\0");
        assert_eq!(element.as_ref().map(Element::value), Some("gerbil"));
        release_element(element);

        assert!(insert_head(queue.as_mut(), "ox"));
        let mut buf = [0xff_u8; 8];
        let element = remove_tail(queue.as_mut(), Some(&mut buf));
        assert_eq!(&buf, b"ox\0\0\0\0\0\0");
        release_element(element);

        assert!(insert_head(queue.as_mut(), "ox"));
        assert!(remove_tail(queue.as_mut(), None).is_some());
        assert_eq!(size(queue.as_ref()), 0);
        destroy(queue);
    }

    #[test]
    fn algorithms_through_ops() {
        let mut queue = create();
        for value in ["a", "b", "c", "d", "e", "f"] {
            assert!(insert_tail(queue.as_mut(), value));
        }
        assert!(delete_mid(queue.as_mut()));
        assert_eq!(strings(queue.as_ref().unwrap()), ["a", "b", "c", "e", "f"]);

        swap(queue.as_mut());
        assert_eq!(strings(queue.as_ref().unwrap()), ["b", "a", "e", "c", "f"]);

        reverse(queue.as_mut());
        assert_eq!(strings(queue.as_ref().unwrap()), ["f", "c", "e", "a", "b"]);

        assert!(insert_head(queue.as_mut(), "c"));
        sort(queue.as_mut());
        assert_eq!(strings(queue.as_ref().unwrap()), ["a", "b", "c", "c", "e", "f"]);

        assert!(delete_dup(queue.as_mut()));
        assert_eq!(strings(queue.as_ref().unwrap()), ["a", "b", "e", "f"]);
        destroy(queue);
    }

    fn random_value(rng: &mut StdRng) -> String {
        let len = rng.random_range(0..6);
        (0..len).map(|_| rng.random_range(b'a'..=b'd') as char).collect()
    }

    /// Runs random operations against both a queue and a `VecDeque` model,
    /// checking the ring invariant and the contents after every step.
    fn stress(seed: u64, steps: usize) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut queue = create();
        let mut model = VecDeque::<String>::new();
        let mut buf = [0_u8; 4];

        for _ in 0..steps {
            match rng.random_range(0..10) {
                0 | 1 => {
                    let value = random_value(&mut rng);
                    assert!(insert_head(queue.as_mut(), &value));
                    model.push_front(value);
                }
                2 | 3 => {
                    let value = random_value(&mut rng);
                    assert!(insert_tail(queue.as_mut(), &value));
                    model.push_back(value);
                }
                4 => {
                    let element = remove_head(queue.as_mut(), Some(&mut buf));
                    let expected = model.pop_front();
                    assert_eq!(element.as_ref().map(Element::value), expected.as_deref());
                    if let Some(expected) = expected {
                        let copied = expected.len().min(buf.len() - 1);
                        assert_eq!(&buf[..copied], &expected.as_bytes()[..copied]);
                        assert_eq!(buf[copied], 0);
                    }
                    release_element(element);
                }
                5 => {
                    let element = remove_tail(queue.as_mut(), None);
                    assert_eq!(
                        element.map(Element::into_string),
                        model.pop_back()
                    );
                }
                6 => {
                    let deleted = delete_mid(queue.as_mut());
                    assert_eq!(deleted, !model.is_empty());
                    if deleted {
                        model.remove(model.len() / 2);
                    }
                }
                7 => {
                    sort(queue.as_mut());
                    model.make_contiguous().sort();
                    if rng.random_bool(0.5) {
                        assert!(delete_dup(queue.as_mut()));
                        let sorted: Vec<String> = model.drain(..).collect();
                        for (i, value) in sorted.iter().enumerate() {
                            let duplicated = (i > 0 && sorted[i - 1] == *value)
                                || sorted.get(i + 1) == Some(value);
                            if !duplicated {
                                model.push_back(value.clone());
                            }
                        }
                    }
                }
                8 => {
                    swap(queue.as_mut());
                    let mut i = 0;
                    while i + 1 < model.len() {
                        model.swap(i, i + 1);
                        i += 2;
                    }
                }
                _ => {
                    reverse(queue.as_mut());
                    model.make_contiguous().reverse();
                }
            }

            let current = queue.as_ref().unwrap();
            assert!(current.is_well_formed());
            assert_eq!(size(Some(current)), model.len());
            assert!(current.iter().eq(model.iter().map(String::as_str)));
        }
        destroy(queue);
    }

    #[test]
    fn stress_random_operations() {
        for seed in 0..16 {
            stress(seed, 500);
        }
    }
}
