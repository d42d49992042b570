pub mod infrastructure;
pub mod metrics;
pub mod orders;
