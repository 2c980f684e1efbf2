//! Route acquisition and metrics for the running tracker.
//!
//! A [`session::Session`] holds what the user sees; [`location`] and
//! [`resolver`] produce the values it displays, and every drawing goes through
//! a [`surface::MapSurface`].

pub mod config;
pub mod error;
pub mod geo;
pub mod gpx_export;
pub mod instructions;
pub mod location;
pub mod metrics;
pub mod osrm;
pub mod resolver;
pub mod session;
pub mod surface;

pub use config::TrackerConfig;
pub use location::{LocationFix, LocationProvider, LocationSource, acquire_location};
pub use osrm::{OsrmClient, RouteProvider};
pub use resolver::{ResolvedRoute, resolve_route};
pub use session::{LocationTicket, Phase, RouteTicket, Session, Status};
pub use shared::{Coordinate, Metrics, RouteBounds, RouteKind};
pub use surface::MapSurface;
