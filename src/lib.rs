#[cfg(feature = "cli")]
pub mod cli;
pub mod dump;
pub mod force;
pub mod geometry;
pub mod route;
pub mod scene;

#[cfg(feature = "cli")]
pub use cli::run;
pub use force::{BoundedForce, BundleEdge, ForceEdgeBundling, ForceNode, interpolate_z};
pub use geometry::{Point, Rect, distance};
pub use route::{
    ConnectorEndpoint, RouteDiagnostics, RouteError, RouteOptions, RouteResult, Side, route,
    route_detailed, simplify_path,
};
pub use scene::{Scene, SceneError};
