use wayfinder_history::HistoryError;

use crate::route::RouteKey;

/// A specialized [`Result`] type for router operations.
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

/// An error produced while storing, resolving or navigating routes.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// No stored route matches the key exactly.
    #[error("no route with {0} exists")]
    NotFound(RouteKey),

    /// A path template refers to a directory parameter that was not supplied, or was supplied
    /// fewer times than the template uses it.
    #[error("missing directory parameter '{name}' for '{template}'")]
    MissingParameter {
        /// The name of the parameter.
        name: String,
        /// The template that was being dispatched.
        template: String,
    },

    /// The route already owns a nested resolver.
    #[error("the route with {0} already has a nested resolver")]
    DuplicateBinding(RouteKey),

    /// Redirects and forwards were followed more often than allowed.
    #[error("followed more than {limit} redirections")]
    TooManyRedirections {
        /// The configured limit.
        limit: usize,
    },

    /// A bare path was given as a replacement without a route to attach it to.
    #[error("cannot attach the path '{path}' without a route to replace")]
    InvalidReplacement {
        /// The path that was given.
        path: String,
    },

    /// A route must have a path, a name or both.
    #[error("a route needs a path or a name")]
    Unaddressable,

    /// The history storage failed to move.
    #[error(transparent)]
    History(#[from] HistoryError),
}
