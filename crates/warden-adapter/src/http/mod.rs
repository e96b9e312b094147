/*
[INPUT]:  HTTP client configuration and remote host endpoints
[OUTPUT]: Typed transport client and error taxonomy
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding transport verbs or changing client behavior
*/

pub mod client;
pub mod error;

pub use error::{Result, WardenError};

pub(crate) use client::path_segment;
pub use client::{ClientConfig, WardenClient};
