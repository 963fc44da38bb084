//! Classification of failed HTTP responses.
//!
//! Watson services do not agree on a single error body layout, so the body is
//! parsed as generic JSON and tested against a fixed list of known shapes.

use reqwest::StatusCode;
use serde_json::Value as JsonValue;

use crate::{HttpError, Metadata};

/// Known error body layouts, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ShapeMatcher {
    /// `{"status": "...", "statusInfo": "..."}`
    StatusInfo,
    /// `{"error": {"description": "...", "error_id": "..."}}`
    NestedError,
    /// `{"error": "..."}`
    ErrorString,
    /// Any object with exactly one string-valued entry, e.g. `{"Error": "..."}`.
    SoleString,
}

// Order matters: a body carrying both `statusInfo` and a nested `error`
// object must surface `statusInfo`.
const MATCHERS: [ShapeMatcher; 4] = [
    ShapeMatcher::StatusInfo,
    ShapeMatcher::NestedError,
    ShapeMatcher::ErrorString,
    ShapeMatcher::SoleString,
];

#[derive(Debug)]
struct Extracted {
    message: String,
    metadata: Option<Metadata>,
}

impl ShapeMatcher {
    /// Returns `None` when `body` does not have this shape.
    fn extract(self, body: &Metadata) -> Option<Extracted> {
        match self {
            Self::StatusInfo => {
                body.get("status")?.as_str()?;
                let status_info = body.get("statusInfo")?.as_str()?;
                Some(Extracted {
                    message: status_info.to_owned(),
                    metadata: Some(body.clone()),
                })
            }
            Self::NestedError => {
                let error = body.get("error")?.as_object()?;
                let description = error.get("description")?.as_str()?;
                let error_id = error.get("error_id")?.as_str()?;

                let mut metadata = Metadata::new();
                metadata.insert("description".to_owned(), description.into());
                metadata.insert("errorID".to_owned(), error_id.into());
                Some(Extracted {
                    message: description.to_owned(),
                    metadata: Some(metadata),
                })
            }
            Self::ErrorString => {
                let message = body.get("error")?.as_str()?;
                Some(Extracted {
                    message: message.to_owned(),
                    metadata: None,
                })
            }
            Self::SoleString => {
                let mut strings = body.values().filter_map(JsonValue::as_str);
                let message = strings.next()?;
                if strings.next().is_some() {
                    return None;
                }
                Some(Extracted {
                    message: message.to_owned(),
                    metadata: None,
                })
            }
        }
    }

    #[cfg(feature = "tracing")]
    fn name(self) -> &'static str {
        match self {
            Self::StatusInfo => "status_info",
            Self::NestedError => "nested_error",
            Self::ErrorString => "error_string",
            Self::SoleString => "sole_string",
        }
    }
}

/// Builds an [`HttpError`] from a failed response's body and status code.
///
/// This never fails. Bodies that are empty, not JSON, or not a JSON object
/// produce an error with no message and no metadata. Objects with an
/// unrecognized layout get the canonical reason phrase of the status code as
/// their message, when one exists.
pub fn classify(payload: &[u8], status_code: u16) -> HttpError {
    let body = match serde_json::from_slice::<JsonValue>(payload) {
        Ok(JsonValue::Object(body)) => body,
        _ => {
            #[cfg(feature = "tracing")]
            tracing::debug!(status_code, "error body is not a JSON object");
            return HttpError::new(status_code);
        }
    };

    let matched = MATCHERS
        .iter()
        .find_map(|matcher| matcher.extract(&body).map(|extracted| (*matcher, extracted)));

    match matched {
        Some((_matcher, extracted)) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(status_code, shape = _matcher.name(), "classified error body");

            HttpError {
                status_code,
                message: Some(extracted.message),
                metadata: extracted.metadata,
            }
        }
        None => HttpError {
            status_code,
            message: canonical_reason(status_code).map(str::to_owned),
            metadata: None,
        },
    }
}

fn canonical_reason(status_code: u16) -> Option<&'static str> {
    StatusCode::from_u16(status_code)
        .ok()
        .and_then(|status| status.canonical_reason())
}
