use crate::extractors::RejectionType;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::ACCEPT_LANGUAGE, request::Parts, StatusCode},
};
use log::*;

/// Header carrying the id of the user opening a live connection. Set by the
/// authenticating proxy in front of this service.
pub(crate) const USER_ID_HEADER: &str = "x-user-id";

const DEFAULT_LOCALE: &str = "en";

/// The user a live connection belongs to, and the locale its events render in.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Recipient {
    pub user_id: String,
    pub locale: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Recipient
where
    S: Send + Sync,
{
    type Rejection = RejectionType;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                debug!("Rejecting live connection without a {USER_ID_HEADER} header");
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            })?;

        // First language tag of the header, without its quality weight
        let locale = parts
            .headers
            .get(ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .map(str::trim)
            .filter(|tag| !tag.is_empty() && *tag != "*")
            .unwrap_or(DEFAULT_LOCALE);

        Ok(Recipient {
            user_id: user_id.to_string(),
            locale: locale.to_string(),
        })
    }
}
