use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;
use tracing::debug;

use crate::http_err::ApiError;

/// The account holder a request acts on behalf of.
///
/// Engine and aggregator calls always receive this explicitly; nothing reads
/// caller identity from ambient state. The deployment's authentication proxy
/// (an external collaborator) is responsible for vetting the `userId` it
/// forwards here.
#[derive(Clone, Copy, Debug)]
pub struct AccountContext {
    user_id: i64,
}

impl AccountContext {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Deserialize)]
struct ContextParams {
    #[serde(rename = "userId")]
    user_id: i64,
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AccountContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ContextParams>::try_from_uri(&parts.uri).map_err(|error| {
            debug!(?error, "Request is missing an account holder context.");

            ApiError::BadRequest("The 'userId' query parameter is required.".to_owned())
        })?;

        Ok(Self::new(params.user_id))
    }
}
