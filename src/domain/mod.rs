// Domain layer: query/outcome models and the collaborator ports the facade consumes.

pub mod model;
pub mod ports;
