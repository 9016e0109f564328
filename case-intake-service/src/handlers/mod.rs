pub mod cases;
pub mod health;

pub use cases::save_case;
pub use health::{health_check, metrics_endpoint, readiness_check};
