pub mod queries;
pub mod scalars;
pub mod schema;
pub mod types;

pub use queries::QueryRoot;
pub use schema::{build_schema, PortalSchema};
