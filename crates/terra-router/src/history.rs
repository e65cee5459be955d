//! Hash-based navigation history
//!
//! [`History`] models the browser's hash history: a stack of entries with a
//! cursor, where the current [`Location`] lives in an [`Atom`]. Listening for
//! navigation is just subscribing to that atom, so listeners run
//! synchronously, in registration order, on every push/replace/go.

use crate::path::{normalize_path, strip_hash};
use crate::query::{parse_query, to_query_string};
use std::cell::{Cell, RefCell};
use std::fmt;
use terra_atom::{Atom, Subscription};

/// A pathname plus an optional query string
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    /// Canonical pathname, always starting with `/`
    pub pathname: String,
    /// Query string without the leading `?`
    pub search: String,
}

impl Location {
    /// Parses `/path?query`, normalizing the pathname
    ///
    /// # Examples
    ///
    /// ```
    /// use terra_router::Location;
    ///
    /// let loc = Location::parse("/workspaces/ns/ws/?tab=data");
    /// assert_eq!(loc.pathname, "/workspaces/ns/ws");
    /// assert_eq!(loc.search, "tab=data");
    /// ```
    pub fn parse(path: &str) -> Self {
        let (pathname, search) = path.split_once('?').unwrap_or((path, ""));
        Self {
            pathname: normalize_path(pathname).into_owned(),
            search: search.to_string(),
        }
    }

    /// Parses a hash href such as `#workspaces/ns/ws?tab=data`
    pub fn from_hash(href: &str) -> Self {
        Self::parse(&strip_hash(href))
    }

    /// The hash href for this location (`#` + pathname without its leading `/`)
    ///
    /// # Examples
    ///
    /// ```
    /// use terra_router::Location;
    ///
    /// assert_eq!(Location::parse("/billing?project=p").to_href(), "#billing?project=p");
    /// assert_eq!(Location::parse("/").to_href(), "#");
    /// ```
    pub fn to_href(&self) -> String {
        let mut href = format!("#{}", self.pathname.trim_start_matches('/'));
        if !self.search.is_empty() {
            href.push('?');
            href.push_str(&self.search);
        }
        href
    }

    /// Decoded query parameters
    pub fn query(&self) -> Vec<(String, String)> {
        parse_query(&self.search)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search.is_empty() {
            write!(f, "{}", self.pathname)
        } else {
            write!(f, "{}?{}", self.pathname, self.search)
        }
    }
}

/// Navigation history with an observable current location
///
/// # Examples
///
/// ```
/// use terra_router::History;
///
/// let history = History::from_hash("#workspaces");
/// history.push("/workspaces/ns/ws");
/// assert_eq!(history.href(), "#workspaces/ns/ws");
///
/// history.back();
/// assert_eq!(history.location().pathname, "/workspaces");
/// ```
pub struct History {
    entries: RefCell<Vec<Location>>,
    index: Cell<usize>,
    current: Atom<Location>,
}

impl History {
    pub fn new(initial: &str) -> Self {
        let location = Location::parse(initial);
        Self {
            entries: RefCell::new(vec![location.clone()]),
            index: Cell::new(0),
            current: Atom::new(location),
        }
    }

    pub fn from_hash(href: &str) -> Self {
        Self::new(&strip_hash(href))
    }

    pub fn location(&self) -> Location {
        self.current.get()
    }

    pub fn href(&self) -> String {
        self.current.with(Location::to_href)
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn index(&self) -> usize {
        self.index.get()
    }

    /// Pushes a new entry, discarding any forward entries
    pub fn push(&self, path: &str) {
        let location = Location::parse(path);
        {
            let mut entries = self.entries.borrow_mut();
            let next = self.index.get() + 1;
            entries.truncate(next);
            entries.push(location.clone());
            self.index.set(next);
        }
        tracing::debug!(location = %location, "history push");
        self.current.set(location);
    }

    /// Replaces the current entry
    pub fn replace(&self, path: &str) {
        let location = Location::parse(path);
        self.entries.borrow_mut()[self.index.get()] = location.clone();
        tracing::debug!(location = %location, "history replace");
        self.current.set(location);
    }

    /// Moves the cursor by `delta`, clamped to the stack
    ///
    /// Listeners are notified only if the cursor actually moves.
    pub fn go(&self, delta: isize) {
        let len = self.len();
        let target = self
            .index
            .get()
            .saturating_add_signed(delta)
            .min(len.saturating_sub(1));
        if target == self.index.get() {
            return;
        }

        self.index.set(target);
        let location = self.entries.borrow()[target].clone();
        self.current.set(location);
    }

    pub fn back(&self) {
        self.go(-1);
    }

    pub fn forward(&self) {
        self.go(1);
    }

    /// Replaces the query string of the current entry
    ///
    /// Pairs with empty values are dropped.
    pub fn update_search<I, K, V>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pathname = self.current.with(|loc| loc.pathname.clone());
        let search = to_query_string(pairs);
        if search.is_empty() {
            self.replace(&pathname);
        } else {
            self.replace(&format!("{}?{}", pathname, search));
        }
    }

    /// Registers a navigation listener, called with `(new, old)` locations
    pub fn listen(&self, listener: impl Fn(&Location, &Location) + 'static) -> Subscription {
        self.current.subscribe(listener)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("History")
            .field("entries", &self.entries.borrow())
            .field("index", &self.index.get())
            .finish()
    }
}
