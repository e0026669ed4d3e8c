// Domain layer: request/response records and ports (interfaces) to external providers.

pub mod model;
pub mod ports;
