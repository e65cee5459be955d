// File: src/bootstrap.rs
// Purpose: Construct and wire the application's router, history and state

use crate::config::Config;
use crate::routes::{register_routes, AppRoute, AppRouter, Page};
use crate::state::{AppState, WorkspaceRef};
use anyhow::{Context, Result};
use std::rc::Rc;
use terra_atom::{FilesystemStorage, MemoryStorage, Storage, Subscription};
use terra_router::{History, Location, RouteParams};

/// The wired application
///
/// Owns every process-wide instance. Tests build their own `App` instead of
/// resetting globals.
pub struct App {
    pub config: Config,
    pub router: Rc<AppRouter>,
    pub history: History,
    pub state: Rc<AppState>,
    route_listener: Subscription,
}

impl App {
    pub fn bootstrap(config: Config) -> Result<Self> {
        let local_storage: Rc<dyn Storage> = match &config.storage.dir {
            Some(dir) => Rc::new(
                FilesystemStorage::new(dir)
                    .with_context(|| format!("Failed to open preference storage at {:?}", dir))?,
            ),
            None => Rc::new(MemoryStorage::new()),
        };
        tracing::info!(backend = local_storage.name(), "preference storage ready");

        let mut router = AppRouter::new().with_case_sensitivity(config.routing.case_insensitive);
        register_routes(&mut router).context("Failed to register routes")?;
        let router = Rc::new(router);
        tracing::info!(routes = router.len(), "routes registered");

        let state = Rc::new(AppState::new(local_storage));
        let history = History::from_hash(&config.history.initial);

        sync_selected_workspace(&router, &state, &history.location());
        let route_listener = {
            let router = Rc::clone(&router);
            let state = Rc::clone(&state);
            history.listen(move |location, _| sync_selected_workspace(&router, &state, location))
        };

        Ok(Self {
            config,
            router,
            history,
            state,
            route_listener,
        })
    }

    /// The page for the current location, or [`Page::NotFound`]
    pub fn current_page(&self) -> Page {
        self.router
            .resolve(&self.history.location())
            .map(|route| *route.component())
            .unwrap_or(Page::NotFound)
    }

    /// The current route key and props, if any route matches
    pub fn current_route(&self) -> Option<(AppRoute, RouteParams)> {
        self.router
            .resolve(&self.history.location())
            .map(|route| (route.key(), route.props))
    }

    pub fn navigate(&self, route: AppRoute, params: &RouteParams) -> Result<()> {
        self.router
            .go_to_path(&self.history, route, params)
            .with_context(|| format!("Failed to navigate to '{}'", route))
    }

    pub fn link(&self, route: AppRoute, params: &RouteParams) -> Result<String> {
        self.router
            .get_link(route, params)
            .with_context(|| format!("Failed to build link for '{}'", route))
    }

    /// Stops following navigation
    pub fn shutdown(&self) {
        self.route_listener.unsubscribe();
    }
}

/// Keeps `selected_workspace` in line with the workspace in the URL
fn sync_selected_workspace(router: &AppRouter, state: &AppState, location: &Location) {
    let workspace = router.resolve(location).and_then(|route| {
        if !route.key().is_workspace_route() {
            return None;
        }
        let namespace = route.props.get("namespace")?;
        let name = route.props.get("name")?;
        Some(WorkspaceRef::new(namespace, name))
    });

    if workspace.is_none() {
        tracing::debug!(location = %location, "no workspace in location");
    }
    state.select_workspace(workspace);
}
