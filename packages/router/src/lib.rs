#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod error;
pub use error::*;

pub mod history;
pub mod navigation;
pub mod params;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod route;
pub mod trace;

mod router_cfg;

/// A collection of useful items most applications might need.
pub mod prelude {
    pub use crate::error::*;
    pub use crate::history::*;
    pub use crate::navigation::*;
    pub use crate::params::*;
    pub use crate::path::RoutePath;
    pub use crate::registry::*;
    pub use crate::resolver::*;
    pub use crate::route::*;
    pub use crate::router_cfg::NavigatorConfig;
    pub use crate::trace::*;

    pub use wayfinder_history::{
        DeferredHistoryStorage, HistoryError, HistoryHost, HistoryState, HistoryStorage,
        MemoryHistoryStorage,
    };
}
