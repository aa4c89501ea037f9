// Domain layer: index snapshot, report model and the ports the probes are built on.

pub mod model;
pub mod ports;
