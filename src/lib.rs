pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::HttpGraphQLClient;
pub use core::{GraphQLRequests, PublicContentApi, QueryBuilder};
pub use domain::cm_uri::CmUri;
pub use domain::graphql::{GraphQLRequest, GraphQLResponse};
pub use domain::ports::{GraphQLClient, GraphQLClientExt};
pub use utils::error::{PcaError, Result};
