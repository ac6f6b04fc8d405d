// Domain layer: value types and the traits the calculators are wired through.

pub mod model;
pub mod ports;
