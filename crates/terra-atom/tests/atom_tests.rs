//! Integration tests for terra-atom
//!
//! Covers:
//! - Value semantics of set/update
//! - Subscriber ordering and exactly-once delivery
//! - Unsubscribing during notification
//! - Reentrant updates and panicking subscribers
//! - Storage-backed atoms and reset

use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use terra_atom::*;

fn recorder() -> (Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    (log.clone(), log)
}

// ============================================================================
// set / update
// ============================================================================

#[rstest]
#[case(vec![1], 1)]
#[case(vec![1, 2, 3], 3)]
#[case(vec![5, -1, 0, 9], 9)]
fn test_get_returns_last_set(#[case] values: Vec<i32>, #[case] expected: i32) {
    let atom = Atom::new(0);
    atom.subscribe(|_, _| {});
    for v in values {
        atom.set(v);
    }
    assert_eq!(atom.get(), expected);
}

#[test]
fn test_update_and_set_interleaved() {
    let atom = Atom::new(1);
    atom.update(|n| n * 10);
    atom.set(3);
    atom.update(|n| n + 1);
    assert_eq!(atom.get(), 4);
}

#[test]
fn test_set_same_value_still_notifies() {
    let atom = Atom::new(7);
    let calls = Rc::new(Cell::new(0));
    let c = calls.clone();
    atom.subscribe(move |_, _| c.set(c.get() + 1));

    atom.set(7);
    atom.set(7);
    assert_eq!(calls.get(), 2);
}

// ============================================================================
// Notification order
// ============================================================================

#[test]
fn test_each_subscriber_called_once_in_order() {
    let atom = Atom::new(0);
    let (log, handle) = recorder();

    for name in ["first", "second", "third"] {
        let log = log.clone();
        atom.subscribe(move |new, old| log.borrow_mut().push(format!("{name}:{old}->{new}")));
    }

    atom.set(1);

    assert_eq!(
        *handle.borrow(),
        vec!["first:0->1", "second:0->1", "third:0->1"]
    );
}

#[test]
fn test_notification_completes_before_set_returns() {
    let atom = Atom::new(0);
    let seen = Rc::new(Cell::new(0));
    let s = seen.clone();
    atom.subscribe(move |new, _| s.set(*new));

    atom.set(42);
    assert_eq!(seen.get(), 42);
}

// ============================================================================
// Unsubscribe
// ============================================================================

#[test]
fn test_unsubscribe_inside_own_callback() {
    let atom = Atom::new(0);
    let calls = Rc::new(Cell::new(0));
    let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let c = calls.clone();
    let s = slot.clone();
    let sub = atom.subscribe(move |_, _| {
        c.set(c.get() + 1);
        if let Some(sub) = s.borrow().as_ref() {
            sub.unsubscribe();
        }
    });
    *slot.borrow_mut() = Some(sub);

    atom.set(1);
    atom.set(2);
    atom.set(3);

    assert_eq!(calls.get(), 1);
    assert_eq!(atom.subscriber_count(), 0);
}

#[test]
fn test_unsubscribe_later_subscriber_skips_it_in_flight() {
    let atom = Atom::new(0);
    let (log, handle) = recorder();
    let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

    let l = log.clone();
    let v = victim.clone();
    atom.subscribe(move |_, _| {
        l.borrow_mut().push("remover".to_string());
        if let Some(sub) = v.borrow().as_ref() {
            sub.unsubscribe();
        }
    });

    let l = log.clone();
    let sub = atom.subscribe(move |_, _| l.borrow_mut().push("victim".to_string()));
    *victim.borrow_mut() = Some(sub);

    atom.set(1);
    atom.set(2);

    assert_eq!(*handle.borrow(), vec!["remover", "remover"]);
}

#[test]
fn test_subscribe_during_notification_not_called_for_current_set() {
    let atom = Atom::new(0);
    let late_calls = Rc::new(Cell::new(0));
    let added = Rc::new(Cell::new(false));

    let inner = atom.clone();
    let late = late_calls.clone();
    let flag = added.clone();
    atom.subscribe(move |_, _| {
        if !flag.get() {
            flag.set(true);
            let late = late.clone();
            inner.subscribe(move |_, _| late.set(late.get() + 1));
        }
    });

    atom.set(1);
    assert_eq!(late_calls.get(), 0);

    atom.set(2);
    assert_eq!(late_calls.get(), 1);
}

// ============================================================================
// Reentrancy and isolation
// ============================================================================

#[test]
fn test_reentrant_update_sees_current_value() {
    let atom = Atom::new(0);

    let inner = atom.clone();
    atom.subscribe(move |new, _| {
        if *new == 1 {
            inner.update(|n| n + 100);
        }
    });

    let observed = Rc::new(RefCell::new(Vec::new()));
    let o = observed.clone();
    let reader = atom.clone();
    atom.subscribe(move |new, _| o.borrow_mut().push((*new, reader.get())));

    atom.set(1);

    assert_eq!(atom.get(), 101);
    // Nested notification runs first, then the outer one resumes
    assert_eq!(*observed.borrow(), vec![(101, 101), (1, 101)]);
}

#[test]
fn test_panicking_subscriber_is_isolated() {
    let atom = Atom::new(0);
    let after = Rc::new(Cell::new(0));

    atom.subscribe(|_, _| panic!("subscriber failure"));
    let a = after.clone();
    atom.subscribe(move |new, _| a.set(*new));

    atom.set(5);

    assert_eq!(atom.get(), 5);
    assert_eq!(after.get(), 5);

    atom.set(6);
    assert_eq!(after.get(), 6);
}

// ============================================================================
// Stored atoms
// ============================================================================

#[test]
fn test_stored_atom_uses_default_when_empty() {
    let storage = Rc::new(MemoryStorage::new());
    let atom = StoredAtom::new(storage.clone(), "prefs", vec!["a".to_string()]);

    assert_eq!(atom.get(), vec!["a".to_string()]);
    assert!(storage.is_empty());
}

#[test]
fn test_stored_atom_persists_before_notify() {
    let storage = Rc::new(MemoryStorage::new());
    let atom = StoredAtom::new(storage.clone(), "count", 0u32);

    let seen_in_storage = Rc::new(RefCell::new(None));
    let seen = seen_in_storage.clone();
    let backend = storage.clone();
    atom.subscribe(move |_, _| {
        *seen.borrow_mut() = backend.get_item("count").unwrap();
    });

    atom.set(3);
    assert_eq!(*seen_in_storage.borrow(), Some("3".to_string()));
}

#[test]
fn test_stored_atom_reloads_persisted_value() {
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    StoredAtom::new(storage.clone(), "count", 0u32).update(|n| n + 2);

    let reloaded = StoredAtom::new(storage, "count", 0u32);
    assert_eq!(reloaded.get(), 2);
}

#[test]
fn test_stored_atom_ignores_undecodable_value() {
    let storage = Rc::new(MemoryStorage::new());
    storage.set_item("count", "{not json").unwrap();

    let atom = StoredAtom::new(storage, "count", 9u32);
    assert_eq!(atom.get(), 9);
}

#[test]
fn test_stored_atoms_sharing_a_key_see_each_others_writes() {
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    let first = StoredAtom::new(storage.clone(), "count", 0u32);
    let second = StoredAtom::new(storage.clone(), "count", 0u32);

    first.set(5);
    assert_eq!(second.get(), 5);
    assert_eq!(second.with(|n| *n * 2), 10);

    second.update(|n| n + 1);
    assert_eq!(storage.get_item("count").unwrap(), Some("6".to_string()));
    assert_eq!(first.get(), 6);
    assert_eq!(second.get(), 6);
}

#[test]
fn test_stored_atom_reads_default_after_key_removed() {
    let storage: Rc<dyn Storage> = Rc::new(MemoryStorage::new());
    let atom = StoredAtom::new(storage.clone(), "count", 1u32);

    atom.set(4);
    storage.remove_item("count").unwrap();
    assert_eq!(atom.get(), 1);
}

#[test]
fn test_stored_atom_reset_is_idempotent() {
    let storage = Rc::new(MemoryStorage::new());
    let atom = StoredAtom::new(storage.clone(), "tab", "dashboard".to_string());

    atom.set("data".to_string());
    atom.reset();
    let first = storage.get_item("tab").unwrap();
    atom.reset();
    let second = storage.get_item("tab").unwrap();

    assert_eq!(atom.get(), "dashboard");
    assert_eq!(atom.default_value(), "dashboard");
    assert_eq!(first, Some("\"dashboard\"".to_string()));
    assert_eq!(first, second);
}

#[test]
fn test_stored_atom_on_filesystem() {
    let tmp = tempfile::tempdir().unwrap();
    let storage = Rc::new(FilesystemStorage::new(tmp.path()).unwrap());

    let atom = StoredAtom::new(storage.clone(), "recent", Vec::<String>::new());
    atom.update(|v| {
        let mut v = v.clone();
        v.push("ns/ws".to_string());
        v
    });

    let reopened = Rc::new(FilesystemStorage::new(tmp.path()).unwrap());
    let reloaded = StoredAtom::new(reopened, "recent", Vec::<String>::new());
    assert_eq!(reloaded.get(), vec!["ns/ws".to_string()]);
}
