// Domain layer: request model, payload types and ports (interfaces).

pub mod model;
pub mod ports;
