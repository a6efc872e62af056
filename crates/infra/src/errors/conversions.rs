//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use fishbowl_domain::FishbowlError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub FishbowlError);

impl From<InfraError> for FishbowlError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<FishbowlError> for InfraError {
    fn from(value: FishbowlError) -> Self {
        InfraError(value)
    }
}

trait IntoFishbowlError {
    fn into_fishbowl(self) -> FishbowlError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → FishbowlError */
/* -------------------------------------------------------------------------- */

impl IntoFishbowlError for HttpError {
    fn into_fishbowl(self) -> FishbowlError {
        if self.is_timeout() {
            return FishbowlError::network("HTTP request timed out");
        }

        if self.is_connect() {
            return FishbowlError::network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return FishbowlError::network(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let message = status.canonical_reason().unwrap_or("unknown status");
            return FishbowlError::upstream(status.as_u16(), message);
        }

        FishbowlError::network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_fishbowl())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → FishbowlError */
/* -------------------------------------------------------------------------- */

impl IntoFishbowlError for IoError {
    fn into_fishbowl(self) -> FishbowlError {
        FishbowlError::Internal(format!("I/O failure: {self}"))
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_fishbowl())
    }
}
