pub mod controller;
pub mod routes;

pub use routes::local_target_routes;
