//! Access Guard Module
//!
//! Interface for the UI access guard, an external collaborator of the cache.
//! The guard reads an "is authenticated" flag from a session-state provider
//! and either passes protected content through or issues a redirect to the
//! login destination carrying the original location for post-login return.
//! It holds no state and no timers; the cache core never touches it.

/// Fixed destination for unauthenticated callers.
pub const LOGIN_DESTINATION: &str = "/login";

// == Session State ==
/// Supplied by an external session-state provider.
pub trait SessionState {
    /// Whether the current session is authenticated.
    fn is_logged_in(&self) -> bool;
}

// == Route Decision ==
/// Outcome of guarding a protected route: exactly one of two branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision<C, L> {
    /// Render the protected content as-is
    Render(C),
    /// Redirect to the login destination, keeping the origin for return
    Redirect {
        destination: &'static str,
        origin: L,
    },
}

// == Guard ==
/// Resolves a protected route against the current session.
///
/// `location` is an opaque descriptor of the current navigation position,
/// supplied by an external routing context.
pub fn guard_route<S, C, L>(session: &S, content: C, location: L) -> RouteDecision<C, L>
where
    S: SessionState,
{
    if session.is_logged_in() {
        RouteDecision::Render(content)
    } else {
        RouteDecision::Redirect {
            destination: LOGIN_DESTINATION,
            origin: location,
        }
    }
}
