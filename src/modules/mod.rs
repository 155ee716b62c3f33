pub mod health;
pub mod local_target;
