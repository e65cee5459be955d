//! # Terra Router
//!
//! A key-based hash router for single-page applications:
//! - Route keys map to `:param` path patterns (`/workspaces/:namespace/:name`)
//! - Optional parameters (`/billing/:project?`) and splats (`/files/*path`)
//! - Reverse building of paths and `#hash` links from a key and params
//! - Observable [`History`] for navigation
//!
//! Keys are any closed set implementing [`RouteKey`], typically an enum, so
//! an unknown key is a compile-time concern wherever possible. The page
//! payload `C` is whatever the application renders for a route.
//!
//! ## Path Normalization
//!
//! Pathnames are normalized before matching:
//! - Trailing slashes: `/path/` → `/path`
//! - Double slashes: `/path//to` → `/path/to`
//! - Backslashes: `\path\to` → `/path/to`
//!
//! ## Example
//!
//! ```
//! use terra_router::{Router, RouteDefinition, RouteParams};
//!
//! let mut router: Router<&'static str, &'static str> = Router::new();
//! router
//!     .define_path("workspace", RouteDefinition::new("/workspaces/:namespace/:name", "dashboard"))
//!     .unwrap();
//!
//! let params = RouteParams::from([("namespace", "ns1"), ("name", "ws1")]);
//! assert_eq!(router.get_path("workspace", &params).unwrap(), "/workspaces/ns1/ws1");
//! assert_eq!(router.get_link("workspace", &params).unwrap(), "#workspaces/ns1/ws1");
//!
//! let handler = router.find_handler("/workspaces/ns1/ws1").unwrap();
//! assert_eq!(handler.props("/workspaces/ns1/ws1"), params);
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

// ============================================================================
// Module Declarations
// ============================================================================

pub mod error;
pub mod history;
pub mod path;
pub mod query;
pub mod route;

pub use error::RouterError;
pub use history::{History, Location};
pub use path::{is_valid_path, normalize_path};
pub use route::{PathPattern, PatternSegment, RouteParams};

use error::Result;

// ============================================================================
// Core Types
// ============================================================================

/// A symbolic route identifier
///
/// Implemented for `&'static str` for quick setups; applications normally
/// implement it on an enum of their routes.
pub trait RouteKey: Copy + Eq + Hash + Debug {
    /// Stable name used in logs and error messages
    fn as_str(&self) -> &'static str;
}

impl RouteKey for &'static str {
    fn as_str(&self) -> &'static str {
        *self
    }
}

/// What to register for a route key
#[derive(Debug, Clone)]
pub struct RouteDefinition<C> {
    pub path: String,
    pub component: C,
    pub title: Option<String>,
    /// Reachable without signing in
    pub public: bool,
    /// Arbitrary extra metadata
    pub metadata: HashMap<String, String>,
}

impl<C> RouteDefinition<C> {
    pub fn new(path: impl Into<String>, component: C) -> Self {
        Self {
            path: path.into(),
            component,
            title: None,
            public: false,
            metadata: HashMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Sets a metadata key-value pair
    ///
    /// # Examples
    ///
    /// ```
    /// use terra_router::RouteDefinition;
    ///
    /// let def = RouteDefinition::new("/billing", ())
    ///     .with_meta("permission", "billing.read");
    /// assert_eq!(def.metadata.get("permission").map(String::as_str), Some("billing.read"));
    /// ```
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A registered route: key, compiled pattern, page and metadata
#[derive(Debug, Clone)]
pub struct RouteHandler<K, C> {
    pub key: K,
    pub pattern: PathPattern,
    pub component: C,
    pub title: Option<String>,
    pub public: bool,
    pub metadata: HashMap<String, String>,
}

impl<K: RouteKey, C> RouteHandler<K, C> {
    pub fn matches(&self, pathname: &str) -> bool {
        self.pattern.is_match(&normalize_path(pathname))
    }

    /// Extracts named parameters from a pathname this handler matches
    ///
    /// Names and capture groups are zipped in declaration order; values are
    /// percent-decoded. Optional parameters that are absent are left out,
    /// and a non-matching pathname yields empty params.
    pub fn props(&self, pathname: &str) -> RouteParams {
        let captures = self
            .pattern
            .captures(&normalize_path(pathname))
            .unwrap_or_default();

        self.pattern
            .param_names()
            .iter()
            .zip(captures)
            .filter_map(|(name, value)| value.map(|v| (name.clone(), decode_param(&v))))
            .collect()
    }

    pub fn get_meta(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

fn decode_param(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|v| v.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// The active route derived from a [`Location`]
#[derive(Debug)]
pub struct ResolvedRoute<'a, K, C> {
    pub handler: &'a RouteHandler<K, C>,
    pub props: RouteParams,
    pub query: Vec<(String, String)>,
}

impl<'a, K: RouteKey, C> ResolvedRoute<'a, K, C> {
    pub fn key(&self) -> K {
        self.handler.key
    }

    pub fn component(&self) -> &'a C {
        &self.handler.component
    }
}

// ============================================================================
// Router Implementation
// ============================================================================

/// Registry of route handlers keyed by [`RouteKey`]
///
/// Handlers are kept in registration order. Construct one per application
/// (or per test) rather than sharing a global.
#[derive(Debug, Clone)]
pub struct Router<K, C> {
    handlers: Vec<RouteHandler<K, C>>,
    index: HashMap<K, usize>,
    case_insensitive: bool,
}

impl<K: RouteKey, C> Router<K, C> {
    /// Creates an empty router with case-insensitive matching
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            index: HashMap::new(),
            case_insensitive: true,
        }
    }

    /// Configures case sensitivity for patterns defined afterwards
    ///
    /// # Examples
    ///
    /// ```
    /// use terra_router::{Router, RouteDefinition};
    ///
    /// let mut router: Router<&'static str, ()> = Router::new().with_case_sensitivity(false);
    /// router.define_path("profile", RouteDefinition::new("/Profile", ())).unwrap();
    /// assert!(router.find_handler("/profile").is_none());
    /// ```
    pub fn with_case_sensitivity(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Registers `definition` under `key`
    ///
    /// Fails if the key is already registered (the first registration is
    /// kept) or the pattern is malformed.
    pub fn define_path(&mut self, key: K, definition: RouteDefinition<C>) -> Result<()> {
        if self.index.contains_key(&key) {
            tracing::error!(key = key.as_str(), "route key defined twice");
            return Err(RouterError::DuplicateKey {
                key: key.as_str().to_string(),
            });
        }

        let pattern = PathPattern::compile(&definition.path, self.case_insensitive)
            .map_err(|e| {
                tracing::error!(key = key.as_str(), error = %e, "invalid route pattern");
                e
            })?;

        tracing::debug!(key = key.as_str(), pattern = pattern.as_str(), "route defined");

        self.index.insert(key, self.handlers.len());
        self.handlers.push(RouteHandler {
            key,
            pattern,
            component: definition.component,
            title: definition.title,
            public: definition.public,
            metadata: definition.metadata,
        });
        Ok(())
    }

    /// Removes every registered handler
    pub fn clear_paths(&mut self) {
        self.handlers.clear();
        self.index.clear();
    }

    /// Finds the handler whose pattern matches `pathname`
    ///
    /// Returns `None` when nothing matches. If several handlers match, the
    /// collision is logged and the first registered one wins.
    pub fn find_handler(&self, pathname: &str) -> Option<&RouteHandler<K, C>> {
        let pathname = normalize_path(pathname);
        let mut matching = self
            .handlers
            .iter()
            .filter(|h| h.pattern.is_match(&pathname));

        let first = matching.next()?;
        let others: Vec<&'static str> = matching.map(|h| h.key.as_str()).collect();
        if !others.is_empty() {
            tracing::error!(
                pathname = %pathname,
                chosen = first.key.as_str(),
                also_matching = ?others,
                "multiple routes match pathname"
            );
        }
        Some(first)
    }

    /// Extracts the named parameters of `handler` from `pathname`
    pub fn handler_props(&self, handler: &RouteHandler<K, C>, pathname: &str) -> RouteParams {
        handler.props(pathname)
    }

    /// Looks up the handler registered for `key`
    pub fn handler(&self, key: K) -> Result<&RouteHandler<K, C>> {
        match self.index.get(&key) {
            Some(&idx) => Ok(&self.handlers[idx]),
            None => {
                let available: Vec<String> =
                    self.keys().map(|k| k.as_str().to_string()).collect();
                tracing::error!(key = key.as_str(), available = ?available, "unknown route key");
                Err(RouterError::UnknownKey {
                    key: key.as_str().to_string(),
                    available,
                })
            }
        }
    }

    /// Builds the pathname for `key` from `params`
    pub fn get_path(&self, key: K, params: &RouteParams) -> Result<String> {
        self.handler(key)?.pattern.build(params)
    }

    /// Builds the `#hash` link for `key`, suitable for an anchor `href`
    pub fn get_link(&self, key: K, params: &RouteParams) -> Result<String> {
        let path = self.get_path(key, params)?;
        Ok(format!("#{}", path.strip_prefix('/').unwrap_or(&path)))
    }

    /// Like [`Router::get_link`], with a query string appended
    ///
    /// # Examples
    ///
    /// ```
    /// use terra_router::{Router, RouteDefinition, RouteParams};
    ///
    /// let mut router: Router<&'static str, ()> = Router::new();
    /// router.define_path("workspaces", RouteDefinition::new("/workspaces", ())).unwrap();
    ///
    /// let link = router
    ///     .get_link_with_query("workspaces", &RouteParams::new(), [("filter", "my ws")])
    ///     .unwrap();
    /// assert_eq!(link, "#workspaces?filter=my%20ws");
    /// ```
    pub fn get_link_with_query<I, Q, V>(&self, key: K, params: &RouteParams, query: I) -> Result<String>
    where
        I: IntoIterator<Item = (Q, V)>,
        Q: AsRef<str>,
        V: AsRef<str>,
    {
        let link = self.get_link(key, params)?;
        let search = query::to_query_string(query);
        Ok(if search.is_empty() {
            link
        } else {
            format!("{}?{}", link, search)
        })
    }

    /// Navigates `history` to the path for `key`
    pub fn go_to_path(&self, history: &History, key: K, params: &RouteParams) -> Result<()> {
        let path = self.get_path(key, params)?;
        history.push(&path);
        Ok(())
    }

    /// Resolves the active route for `location`
    pub fn resolve(&self, location: &Location) -> Option<ResolvedRoute<'_, K, C>> {
        let handler = self.find_handler(&location.pathname)?;
        Some(ResolvedRoute {
            handler,
            props: handler.props(&location.pathname),
            query: location.query(),
        })
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.handlers.iter().map(|h| h.key)
    }

    pub fn handlers(&self) -> &[RouteHandler<K, C>] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<K: RouteKey, C> Default for Router<K, C> {
    fn default() -> Self {
        Self::new()
    }
}
