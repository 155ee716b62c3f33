pub mod controller;
pub mod model;
pub mod routes;

pub use model::{evaluate, is_healthy, HealthStatus};
pub use routes::health_routes;
