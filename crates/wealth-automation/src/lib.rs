pub mod config;
pub mod error;
pub mod offers;
pub mod publishing;
pub mod telemetry;
