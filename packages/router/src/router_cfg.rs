/// Global configuration options for a [`Navigator`](crate::navigation::Navigator).
///
/// This implements [`Default`] and follows the builder pattern, so you can use it like this:
/// ```rust
/// # use wayfinder_router::prelude::*;
/// let cfg = NavigatorConfig::default().redirection_limit(10);
/// assert_eq!(cfg.limit(), 10);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigatorConfig {
    pub(crate) redirection_limit: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            redirection_limit: 5,
        }
    }
}

impl NavigatorConfig {
    /// How many redirects and forwards a single navigation may follow.
    ///
    /// Following one more fails with
    /// [`RouteError::TooManyRedirections`](crate::RouteError::TooManyRedirections).
    ///
    /// Defaults to `5`.
    pub fn redirection_limit(self, limit: usize) -> Self {
        Self {
            redirection_limit: limit,
        }
    }

    /// The configured redirection limit.
    pub fn limit(&self) -> usize {
        self.redirection_limit
    }
}
