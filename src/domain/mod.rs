// Domain layer: the service map, request options and the ports the router is built around.

pub mod model;
pub mod ports;
