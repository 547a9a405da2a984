// Domain layer: content model, CM URIs, the GraphQL envelope and ports (interfaces).

pub mod cm_uri;
pub mod content;
pub mod graphql;
pub mod model;
pub mod ports;
