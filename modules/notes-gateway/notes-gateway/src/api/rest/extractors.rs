use std::collections::HashMap;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::domain::error::DomainError;

/// `axum::Json` whose rejection is a 400 in the gateway's error format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(DomainError::Validation {
                detail: format!("invalid JSON body: {}", rejection.body_text()),
                instance,
            }),
        }
    }
}

/// Decoded query string. Repeated keys keep the last value.
#[derive(Debug, Default)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        Self(
            query
                .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
                .unwrap_or_default(),
        )
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of a mandatory, non-blank parameter.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the parameter is absent or blank.
    pub fn required(&self, name: &str, instance: &str) -> Result<&str, DomainError> {
        match self.get(name).map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(DomainError::Validation {
                detail: format!("{name} query parameter is required"),
                instance: instance.to_owned(),
            }),
        }
    }
}

/// Parse a comma-separated list of integer identifiers, e.g. `3,7,9`.
///
/// # Errors
///
/// Returns `Validation` if the list is empty or any element is not an integer.
pub fn parse_id_list(raw: &str, name: &str, instance: &str) -> Result<Vec<i64>, DomainError> {
    let invalid = || DomainError::Validation {
        detail: format!("{name} must be a comma-separated list of integers"),
        instance: instance.to_owned(),
    };
    let ids = raw
        .split(',')
        .map(|s| s.trim().parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err(invalid());
    }
    Ok(ids)
}

/// Parse a numeric path identifier.
///
/// # Errors
///
/// Returns `Validation` if `raw` is not an integer.
pub fn parse_numeric_id(raw: &str, instance: &str) -> Result<i64, DomainError> {
    raw.parse().map_err(|_| DomainError::Validation {
        detail: format!("identifier '{raw}' must be an integer"),
        instance: instance.to_owned(),
    })
}
