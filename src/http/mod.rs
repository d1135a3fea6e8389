//! HTTP protocol layer module
//!
//! Protocol-level helpers decoupled from the request handler: content types,
//! cache validators, response builders and header decoration.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_404_response, build_500_response, build_501_response,
    build_file_response, build_html_response, build_options_response, build_redirect_response,
    empty, stream_file, FileHeaders, ResponseBody,
};
