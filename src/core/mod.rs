pub mod api;
pub mod converters;
pub mod query_builder;
pub mod requests;
pub mod templates;

pub use api::PublicContentApi;
pub use converters::{ItemConverter, TaxonomyItemConverter};
pub use query_builder::QueryBuilder;
pub use requests::GraphQLRequests;
pub use templates::{DirectoryTemplates, EmbeddedTemplates, TemplateKind, TemplateSource};
pub use crate::utils::error::Result;
