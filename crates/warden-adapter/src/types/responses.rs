/*
[INPUT]:  Remote host schema definitions and serde requirements
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When the remote host schema changes or new types are added
*/

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::models::serde_helpers;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateContainerResponse {
    #[serde(alias = "Handle")]
    pub handle: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetInResponse {
    pub host_port: u32,
    pub container_port: u32,
}

/// Container grace time, sent by the host as bare nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraceTimeResponse(#[serde(with = "serde_helpers::duration_nanos")] pub Duration);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_response_accepts_both_casings() {
        let lower: CreateContainerResponse =
            serde_json::from_str(r#"{"handle":"abc"}"#).unwrap();
        let upper: CreateContainerResponse =
            serde_json::from_str(r#"{"Handle":"abc"}"#).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_grace_time_response_from_nanoseconds() {
        let grace: GraceTimeResponse = serde_json::from_str("300000000000").unwrap();
        assert_eq!(grace.0, Duration::from_secs(300));
    }
}
