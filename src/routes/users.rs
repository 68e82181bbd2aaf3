use crate::{
    accounts,
    auth::{sessions, AuthResponse, AuthSession, LoginRequest},
    error::AppError,
    models::{RegisterInput, UpdateAccountInput},
    notify,
    state::AppState,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Utc;
use uuid::Uuid;

/// Avatars are stored as-is; anything bigger than this is rejected. The
/// `/users` scope raises the payload limit past this cap so the rejection
/// below is the one the caller sees, not the transport-level default.
pub const MAX_AVATAR_BYTES: usize = 1_048_576;

/// Register a new account.
///
/// Creates the account, opens its first session and fires the welcome
/// notification. Returns the public account view and the session token.
#[post("")]
pub async fn register(
    state: web::Data<AppState>,
    input: web::Json<RegisterInput>,
) -> Result<impl Responder, AppError> {
    let (account, token) =
        accounts::register(state.store.as_ref(), &state.issuer, input.into_inner()).await?;

    notify::send_welcome(
        state.notifier.clone(),
        account.email.clone(),
        account.name.clone(),
    );

    Ok(HttpResponse::Created().json(AuthResponse { account, token }))
}

/// Login with email and password; opens a new session for this device.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    credentials: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let (account, token) =
        accounts::login(state.store.as_ref(), &state.issuer, &credentials).await?;

    Ok(HttpResponse::Ok().json(AuthResponse { account, token }))
}

/// Logout of the current device only: revokes exactly the presented token.
/// Sessions on other devices stay valid.
#[post("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let AuthSession { mut account, token } = session;
    sessions::revoke(state.store.as_ref(), &mut account, &token).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Logout everywhere: clears the whole session list.
#[post("/logout-all")]
pub async fn logout_all(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let AuthSession { mut account, .. } = session;
    sessions::revoke_all(state.store.as_ref(), &mut account).await?;

    Ok(HttpResponse::Ok().finish())
}

/// The caller's own profile (public view).
#[get("/me")]
pub async fn me(session: AuthSession) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(session.account))
}

/// Updates the caller's profile. Only `name`, `email`, `age` and `password`
/// are accepted; unknown fields are rejected at deserialization.
#[put("/me")]
pub async fn update_me(
    state: web::Data<AppState>,
    session: AuthSession,
    input: web::Json<UpdateAccountInput>,
) -> Result<impl Responder, AppError> {
    let account =
        accounts::update_account(state.store.as_ref(), session.account, input.into_inner())
            .await?;

    Ok(HttpResponse::Ok().json(account))
}

/// Deletes the caller's account, cascading over every owned task, and fires
/// the account-deleted notification. Returns the deleted account's public
/// view.
#[delete("/me")]
pub async fn delete_me(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let account = session.account;
    accounts::delete_account(state.store.as_ref(), &account).await?;

    notify::send_account_deleted(
        state.notifier.clone(),
        account.email.clone(),
        account.name.clone(),
    );

    Ok(HttpResponse::Ok().json(account))
}

/// Stores the caller's avatar bytes verbatim; no transformation happens here.
#[put("/me/avatar")]
pub async fn set_avatar(
    state: web::Data<AppState>,
    session: AuthSession,
    body: web::Bytes,
) -> Result<impl Responder, AppError> {
    if body.len() > MAX_AVATAR_BYTES {
        return Err(AppError::ValidationError(
            "avatar must be 1 MiB or smaller".into(),
        ));
    }

    let mut account = session.account;
    account.avatar = Some(body.to_vec());
    account.updated_at = Utc::now();
    state.store.save_account(&account).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Removes the caller's avatar.
#[delete("/me/avatar")]
pub async fn delete_avatar(
    state: web::Data<AppState>,
    session: AuthSession,
) -> Result<impl Responder, AppError> {
    let mut account = session.account;
    account.avatar = None;
    account.updated_at = Utc::now();
    state.store.save_account(&account).await?;

    Ok(HttpResponse::Ok().finish())
}

/// Serves an account's avatar publicly by account id.
#[get("/{id}/avatar")]
pub async fn get_avatar(
    state: web::Data<AppState>,
    account_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let account = state
        .store
        .find_account_by_id(account_id.into_inner())
        .await?;

    match account.and_then(|a| a.avatar) {
        Some(bytes) => Ok(HttpResponse::Ok()
            .content_type("application/octet-stream")
            .body(bytes)),
        None => Err(AppError::NotFound("avatar not found".into())),
    }
}
