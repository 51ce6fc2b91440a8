// Domain layer: wire models and ports. Nothing here talks to the network.

pub mod model;
pub mod ports;
