//! Core Infrastructure
//!
//! HTTP transport abstraction shared by the token exchanges and the
//! authenticated call dispatcher.

mod transport;

pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport, ReqwestHttpTransport,
};
