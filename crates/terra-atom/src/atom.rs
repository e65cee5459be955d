//! Observable single-value container
//!
//! An [`Atom`] holds exactly one value and a list of subscribers. Every
//! `set` notifies the subscribers synchronously, in the order they were
//! registered, before returning.
//!
//! Atoms are single-threaded: handles are `Rc`-based and cheap to clone,
//! and every clone refers to the same cell.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T, &T)>;

/// A registered subscriber
struct Subscriber<T> {
    id: u64,
    callback: Callback<T>,
    /// Cleared on unsubscribe so an in-flight notification skips it
    active: Rc<Cell<bool>>,
}

struct AtomCell<T> {
    value: RefCell<T>,
    subscribers: RefCell<Vec<Subscriber<T>>>,
    next_id: Cell<u64>,
}

impl<T> AtomCell<T> {
    fn remove(&self, id: u64) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        match subscribers.iter().position(|s| s.id == id) {
            Some(idx) => {
                let removed = subscribers.remove(idx);
                removed.active.set(false);
                true
            }
            None => false,
        }
    }
}

/// Observable value container
///
/// # Examples
///
/// ```
/// use terra_atom::Atom;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let count = Atom::new(0);
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = seen.clone();
/// let sub = count.subscribe(move |new, old| log.borrow_mut().push((*old, *new)));
///
/// count.set(1);
/// count.update(|n| n + 10);
/// assert_eq!(count.get(), 11);
/// assert_eq!(*seen.borrow(), vec![(0, 1), (1, 11)]);
///
/// sub.unsubscribe();
/// count.set(0);
/// assert_eq!(seen.borrow().len(), 2);
/// ```
pub struct Atom<T> {
    cell: Rc<AtomCell<T>>,
}

impl<T> Clone for Atom<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Clone + 'static> Atom<T> {
    /// Creates an atom holding `initial`
    pub fn new(initial: T) -> Self {
        Self {
            cell: Rc::new(AtomCell {
                value: RefCell::new(initial),
                subscribers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Returns a copy of the current value
    pub fn get(&self) -> T {
        self.cell.value.borrow().clone()
    }

    /// Runs `f` against the current value without cloning it
    ///
    /// `f` must not call `set` or `update` on the same atom.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.cell.value.borrow())
    }

    /// Replaces the value and notifies every subscriber with `(new, old)`
    ///
    /// Subscribers are called in registration order. A subscriber that
    /// panics is logged and skipped; the rest still run.
    pub fn set(&self, value: T) {
        let new = value.clone();
        let old = self.cell.value.replace(value);
        self.notify(&new, &old);
    }

    /// Sets the value computed from the current one
    ///
    /// The current value is read at call time, so calls made from inside a
    /// subscriber observe any update that happened earlier in the same
    /// notification.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = {
            let current = self.cell.value.borrow();
            f(&current)
        };
        self.set(next);
    }

    /// Registers `callback`, returning a handle that removes it again
    pub fn subscribe(&self, callback: impl Fn(&T, &T) + 'static) -> Subscription {
        let id = self.cell.next_id.get();
        self.cell.next_id.set(id + 1);

        self.cell.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Rc::new(callback),
            active: Rc::new(Cell::new(true)),
        });

        let weak: Weak<AtomCell<T>> = Rc::downgrade(&self.cell);
        Subscription {
            id,
            remove: Rc::new(move |id: u64| weak.upgrade().map(|cell| cell.remove(id)).unwrap_or(false)),
        }
    }

    /// Number of currently registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.cell.subscribers.borrow().len()
    }

    fn notify(&self, new: &T, old: &T) {
        // Snapshot so callbacks can subscribe/unsubscribe while we iterate
        let snapshot: Vec<(u64, Callback<T>, Rc<Cell<bool>>)> = self
            .cell
            .subscribers
            .borrow()
            .iter()
            .map(|s| (s.id, Rc::clone(&s.callback), Rc::clone(&s.active)))
            .collect();

        for (id, callback, active) in snapshot {
            if !active.get() {
                continue;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(new, old)));
            if let Err(payload) = outcome {
                tracing::error!(
                    subscriber = id,
                    reason = panic_message(payload.as_ref()),
                    "atom subscriber panicked"
                );
            }
        }
    }
}

impl<T: Default + Clone + 'static> Default for Atom<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Atom<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Atom")
            .field("value", &self.cell.value.borrow())
            .field("subscribers", &self.cell.subscribers.borrow().len())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic>")
}

/// Handle returned by [`Atom::subscribe`]
///
/// Dropping the handle leaves the subscriber registered; call
/// [`Subscription::unsubscribe`] to remove it. Clones share the same
/// registration.
#[derive(Clone)]
pub struct Subscription {
    id: u64,
    remove: Rc<dyn Fn(u64) -> bool>,
}

impl Subscription {
    /// Removes the subscriber. Returns `false` if it was already removed
    /// or the atom no longer exists.
    ///
    /// Safe to call from inside any subscriber, including the one being
    /// removed.
    pub fn unsubscribe(&self) -> bool {
        (self.remove)(self.id)
    }

    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_initial() {
        let atom = Atom::new("initial".to_string());
        assert_eq!(atom.get(), "initial");
    }

    #[test]
    fn test_with_borrows_value() {
        let atom = Atom::new(vec![1, 2, 3]);
        assert_eq!(atom.with(|v| v.len()), 3);
    }

    #[test]
    fn test_clones_share_state() {
        let a = Atom::new(1);
        let b = a.clone();
        b.set(2);
        assert_eq!(a.get(), 2);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let atom = Atom::new(0);
        let first = atom.subscribe(|_, _| {});
        let second = atom.subscribe(|_, _| {});
        assert_ne!(first.id(), second.id());
        assert_eq!(atom.subscriber_count(), 2);
    }

    #[test]
    fn test_unsubscribe_twice_is_noop() {
        let atom = Atom::new(0);
        let sub = atom.subscribe(|_, _| {});
        assert!(sub.unsubscribe());
        assert!(!sub.unsubscribe());
        assert_eq!(atom.subscriber_count(), 0);
    }

    #[test]
    fn test_unsubscribe_after_atom_dropped() {
        let atom = Atom::new(0);
        let sub = atom.subscribe(|_, _| {});
        drop(atom);
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");

        let payload: Box<dyn std::any::Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "<non-string panic>");
    }
}
