// Domain layer: value types and the ports the stager and probes are written against.

pub mod model;
pub mod ports;
