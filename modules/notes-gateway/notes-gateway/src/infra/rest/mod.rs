//! Transport client, response classifier and filter encoder shared by every
//! resource client.

pub mod query;
pub mod response;
pub mod transport;

pub use query::{decode_query, encode_filters};
pub use response::{ClassifiedResponse, Location, LocationError, classify, extract_identifier};
pub use transport::{
    CLIENT_TIMEOUT, DownstreamRequest, HttpExchange, ReqwestExchange, RestClient,
};
