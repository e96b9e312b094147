/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Warden adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod backend;
pub mod container;
pub mod http;
pub mod types;

// Re-export commonly used types from backend
pub use backend::{BackendConfig, ContainerBackend, RemoteBackend};

// Re-export commonly used types from container
pub use container::{Container, ContainerProxy, Process, ProcessEvent, ProcessOutput};

// Re-export commonly used types from http
pub use http::{ClientConfig, Result, WardenClient, WardenError};

// Re-export all types
pub use types::*;
