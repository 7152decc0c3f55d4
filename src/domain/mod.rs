// Domain layer: build plan, run records and the ports the orchestrator drives.

pub mod model;
pub mod ports;
