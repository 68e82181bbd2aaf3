use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;

use crate::auth::gate::authenticate;
use crate::error::AppError;
use crate::models::Account;
use crate::state::AppState;

/// The authenticated caller, extracted from the `Authorization: Bearer`
/// header on protected routes.
///
/// Extraction runs the full auth gate: signature check, account lookup and
/// session-registry membership against current store state. A missing or
/// malformed header fails with the same uniform `Unauthorized` error as a
/// bad token.
///
/// `token` is the exact string the caller presented, kept so logout can
/// revoke that specific session and no other.
#[derive(Debug)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let raw_token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_owned);

        Box::pin(async move {
            let state = state.ok_or_else(|| {
                AppError::InternalServerError("application state not configured".into())
            })?;
            let raw_token = raw_token.ok_or_else(AppError::unauthorized)?;

            let (account, token) =
                authenticate(state.store.as_ref(), &state.issuer, &raw_token).await?;
            Ok(AuthSession { account, token })
        })
    }
}
