//! Notekeeper backend library.
//!
//! Houses the access-control and authentication core shared by the notes,
//! shop and blog front-ends, plus the adapters that expose it over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
