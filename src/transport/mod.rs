//! HTTP transport shared by the backend clients.

mod http;

pub use http::RemoteService;
