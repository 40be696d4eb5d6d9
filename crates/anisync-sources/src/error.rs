use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {service} response: {source}")]
    Decode {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} rejected the request: {}", join_messages(.errors))]
    Rejected {
        service: &'static str,
        errors: Vec<GraphQlError>,
    },
}

impl SourceError {
    pub fn http(service: &'static str, source: reqwest::Error) -> Self {
        SourceError::Http { service, source }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, SourceError::Rejected { .. })
    }
}

fn join_messages(errors: &[GraphQlError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
