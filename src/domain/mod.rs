// Domain layer: breed models, derived tables and ports (interfaces).

pub mod model;
pub mod ports;
