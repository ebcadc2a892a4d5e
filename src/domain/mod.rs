// Domain layer: bulk-sheet model, ports, and the expansion services.

pub mod model;
pub mod ports;

pub mod services;
