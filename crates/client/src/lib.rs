//! HTTP implementation of the console's remote operations contract.

mod http;

pub use http::HttpRemoteOps;
