// File: src/routes.rs
// Purpose: The application's route table

use std::fmt;
use terra_router::{RouteDefinition, RouteKey, Router, RouterError};

/// Every route the application knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Root,
    Workspaces,
    WorkspaceDashboard,
    WorkspaceData,
    WorkspaceAnalyses,
    WorkspaceJobHistory,
    WorkflowSubmission,
    Billing,
    Environments,
    Profile,
    Support,
    Privacy,
}

impl AppRoute {
    pub const ALL: [AppRoute; 12] = [
        AppRoute::Root,
        AppRoute::Workspaces,
        AppRoute::WorkspaceDashboard,
        AppRoute::WorkspaceData,
        AppRoute::WorkspaceAnalyses,
        AppRoute::WorkspaceJobHistory,
        AppRoute::WorkflowSubmission,
        AppRoute::Billing,
        AppRoute::Environments,
        AppRoute::Profile,
        AppRoute::Support,
        AppRoute::Privacy,
    ];

    /// Looks a route up by its key name (as printed by `as_str`)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.as_str() == name)
    }

    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Root => "/",
            AppRoute::Workspaces => "/workspaces",
            AppRoute::WorkspaceDashboard => "/workspaces/:namespace/:name",
            AppRoute::WorkspaceData => "/workspaces/:namespace/:name/data",
            AppRoute::WorkspaceAnalyses => "/workspaces/:namespace/:name/analyses",
            AppRoute::WorkspaceJobHistory => "/workspaces/:namespace/:name/job_history",
            AppRoute::WorkflowSubmission => {
                "/workspaces/:namespace/:name/workflows/:workflowNamespace/:workflowName"
            }
            AppRoute::Billing => "/billing/:project?",
            AppRoute::Environments => "/clusters",
            AppRoute::Profile => "/profile",
            AppRoute::Support => "/support/*topic",
            AppRoute::Privacy => "/privacy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AppRoute::Root => "Terra",
            AppRoute::Workspaces => "Workspaces",
            AppRoute::WorkspaceDashboard => "Dashboard",
            AppRoute::WorkspaceData => "Data",
            AppRoute::WorkspaceAnalyses => "Analyses",
            AppRoute::WorkspaceJobHistory => "Job History",
            AppRoute::WorkflowSubmission => "Workflow",
            AppRoute::Billing => "Billing",
            AppRoute::Environments => "Cloud Environments",
            AppRoute::Profile => "Profile",
            AppRoute::Support => "Support",
            AppRoute::Privacy => "Privacy Policy",
        }
    }

    /// Routes reachable without signing in
    pub fn is_public(&self) -> bool {
        matches!(self, AppRoute::Root | AppRoute::Privacy | AppRoute::Support)
    }

    /// Whether the route sits under a workspace (has `namespace`/`name` props)
    pub fn is_workspace_route(&self) -> bool {
        self.path().starts_with("/workspaces/:namespace/:name")
    }
}

impl RouteKey for AppRoute {
    fn as_str(&self) -> &'static str {
        match self {
            AppRoute::Root => "root",
            AppRoute::Workspaces => "workspaces",
            AppRoute::WorkspaceDashboard => "workspace-dashboard",
            AppRoute::WorkspaceData => "workspace-data",
            AppRoute::WorkspaceAnalyses => "workspace-analyses",
            AppRoute::WorkspaceJobHistory => "workspace-job-history",
            AppRoute::WorkflowSubmission => "workflow-submission",
            AppRoute::Billing => "billing",
            AppRoute::Environments => "environments",
            AppRoute::Profile => "profile",
            AppRoute::Support => "support",
            AppRoute::Privacy => "privacy",
        }
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The page rendered for a route
///
/// A closed set: every route maps to exactly one page, checked by the
/// exhaustive match in [`Page::for_route`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    LandingPage,
    WorkspaceList,
    WorkspaceDashboard,
    WorkspaceData,
    WorkspaceAnalyses,
    WorkspaceJobHistory,
    WorkflowView,
    BillingList,
    Environments,
    Profile,
    Support,
    PrivacyPolicy,
    NotFound,
}

impl Page {
    pub fn for_route(route: AppRoute) -> Self {
        match route {
            AppRoute::Root => Page::LandingPage,
            AppRoute::Workspaces => Page::WorkspaceList,
            AppRoute::WorkspaceDashboard => Page::WorkspaceDashboard,
            AppRoute::WorkspaceData => Page::WorkspaceData,
            AppRoute::WorkspaceAnalyses => Page::WorkspaceAnalyses,
            AppRoute::WorkspaceJobHistory => Page::WorkspaceJobHistory,
            AppRoute::WorkflowSubmission => Page::WorkflowView,
            AppRoute::Billing => Page::BillingList,
            AppRoute::Environments => Page::Environments,
            AppRoute::Profile => Page::Profile,
            AppRoute::Support => Page::Support,
            AppRoute::Privacy => Page::PrivacyPolicy,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Page::LandingPage => "LandingPage",
            Page::WorkspaceList => "WorkspaceList",
            Page::WorkspaceDashboard => "WorkspaceDashboard",
            Page::WorkspaceData => "WorkspaceData",
            Page::WorkspaceAnalyses => "WorkspaceAnalyses",
            Page::WorkspaceJobHistory => "WorkspaceJobHistory",
            Page::WorkflowView => "WorkflowView",
            Page::BillingList => "BillingList",
            Page::Environments => "Environments",
            Page::Profile => "Profile",
            Page::Support => "Support",
            Page::PrivacyPolicy => "PrivacyPolicy",
            Page::NotFound => "NotFound",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub type AppRouter = Router<AppRoute, Page>;

/// Defines every [`AppRoute`] on `router`
pub fn register_routes(router: &mut AppRouter) -> Result<(), RouterError> {
    for route in AppRoute::ALL {
        let mut definition =
            RouteDefinition::new(route.path(), Page::for_route(route)).with_title(route.title());
        if route.is_public() {
            definition = definition.public();
        }
        if route.is_workspace_route() {
            definition = definition.with_meta("section", "workspace");
        }
        router.define_path(route, definition)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_names_round_trip() {
        for route in AppRoute::ALL {
            assert_eq!(AppRoute::from_name(route.as_str()), Some(route));
        }
        assert_eq!(AppRoute::from_name("nope"), None);
    }

    #[test]
    fn test_register_routes_defines_all() {
        let mut router = AppRouter::new();
        register_routes(&mut router).unwrap();
        assert_eq!(router.len(), AppRoute::ALL.len());
    }

    #[test]
    fn test_register_routes_twice_fails() {
        let mut router = AppRouter::new();
        register_routes(&mut router).unwrap();
        assert!(matches!(
            register_routes(&mut router),
            Err(RouterError::DuplicateKey { .. })
        ));
    }

    #[test]
    fn test_workspace_routes() {
        assert!(AppRoute::WorkspaceDashboard.is_workspace_route());
        assert!(AppRoute::WorkflowSubmission.is_workspace_route());
        assert!(!AppRoute::Workspaces.is_workspace_route());
    }
}
