pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
