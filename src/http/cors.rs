//! Response decoration
//!
//! Every response leaving the server, whatever its status, passes through
//! [`apply_headers`].

use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, SERVER,
};
use hyper::Response;

use crate::config::CorsHeaders;

/// Insert the CORS and `Server` headers, replacing any existing values
pub fn apply_headers<B>(response: &mut Response<B>, cors: &CorsHeaders, server_name: &HeaderValue) {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, cors.allow_origin.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, cors.allow_methods.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, cors.allow_headers.clone());
    headers.insert(SERVER, server_name.clone());
}
