//! Route table and access decisions
//!
//! Access depends only on the session phase: whether a credential is present,
//! or whether the silent refresh has not finished yet.

use crate::session::AuthPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Home,
    Login,
    Register,
    Dashboard,
    NotFound,
}

impl AppRoute {
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => AppRoute::Home,
            "/login" => AppRoute::Login,
            "/register" => AppRoute::Register,
            "/dashboard" => AppRoute::Dashboard,
            _ => AppRoute::NotFound,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Home => "/",
            AppRoute::Login => "/login",
            AppRoute::Register => "/register",
            AppRoute::Dashboard => "/dashboard",
            AppRoute::NotFound => "/404",
        }
    }
}

/// What to show for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Blocking indicator while the session resolves
    Loading,
    Render(AppRoute),
    Redirect(AppRoute),
}

pub fn resolve(route: AppRoute, phase: AuthPhase) -> RouteDecision {
    match (route, phase) {
        (AppRoute::Login | AppRoute::Dashboard, AuthPhase::Refreshing) => RouteDecision::Loading,
        (AppRoute::Login, AuthPhase::Authenticated) => RouteDecision::Redirect(AppRoute::Dashboard),
        (AppRoute::Dashboard, AuthPhase::Unauthenticated) => {
            RouteDecision::Redirect(AppRoute::Login)
        }
        (route, _) => RouteDecision::Render(route),
    }
}
