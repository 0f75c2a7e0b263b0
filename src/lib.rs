pub mod configuration;
pub mod domain;
pub mod monitor;
pub mod routes;
pub mod startup;
pub mod telemetry;
