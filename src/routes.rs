use strum_macros::{EnumDiscriminants, IntoStaticStr};

use crate::environment::types::{AuthorizationStatus, OfferId};

#[derive(Debug, Clone, Eq, PartialEq, Hash, EnumDiscriminants)]
#[strum_discriminants(name(RouteKind), derive(IntoStaticStr, Hash))]
pub enum AppRoute {
    Main,
    Login,
    Favorites,
    Offer(OfferId),
    NotFound,
}

impl AppRoute {
    pub fn path(&self) -> String {
        match self {
            AppRoute::Main => "/".to_string(),
            AppRoute::Login => "/login".to_string(),
            AppRoute::Favorites => "/favorites".to_string(),
            AppRoute::Offer(id) => format!("/offer/{id}"),
            AppRoute::NotFound => "/404".to_string(),
        }
    }

    /// Unknown paths resolve to `NotFound`
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => AppRoute::Main,
            ["login"] => AppRoute::Login,
            ["favorites"] => AppRoute::Favorites,
            ["offer", id] => AppRoute::Offer(OfferId::from(*id)),
            _ => AppRoute::NotFound,
        }
    }

    pub fn kind(&self) -> RouteKind {
        RouteKind::from(self)
    }

    /// Routes that need an authorized user
    pub fn is_private(&self) -> bool {
        matches!(self, AppRoute::Favorites)
    }
}

impl std::fmt::Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// What to do when a route is about to be shown
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum RouteDecision {
    Render,
    /// The session check has not finished yet
    Wait,
    Redirect(AppRoute),
}

pub fn guard(route: &AppRoute, status: AuthorizationStatus) -> RouteDecision {
    match (route, status) {
        (route, _) if !route.is_private() && *route != AppRoute::Login => RouteDecision::Render,
        (_, AuthorizationStatus::Unknown) => RouteDecision::Wait,
        (AppRoute::Login, AuthorizationStatus::Auth) => RouteDecision::Redirect(AppRoute::Main),
        (AppRoute::Login, AuthorizationStatus::NoAuth) => RouteDecision::Render,
        (_, AuthorizationStatus::Auth) => RouteDecision::Render,
        (_, AuthorizationStatus::NoAuth) => RouteDecision::Redirect(AppRoute::Login),
    }
}

/// The detail page renders while loading and once the offer is there, a
/// finished load without an offer means the id does not exist.
pub fn offer_decision(is_loading: bool, has_offer: bool) -> RouteDecision {
    if is_loading || has_offer {
        RouteDecision::Render
    } else {
        RouteDecision::Redirect(AppRoute::NotFound)
    }
}
