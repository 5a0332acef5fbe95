//! HTTP API handlers for agrismart-scan

pub mod health;
pub mod scan;

pub use health::health_routes;
pub use scan::scan_routes;
