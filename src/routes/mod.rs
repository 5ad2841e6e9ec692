//! Route option data contract.
//!
//! Route options are produced by the external recommendation service and
//! consumed read-only by the navigation state machine and the reminder
//! scheduler. The wire schema is stable; see [`types::Step`].

pub mod summary;
pub mod types;

pub use summary::CachedRouteSummary;
pub use types::{RouteError, RouteKind, RouteOption, Step};
