use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Response,
    Json,
};
use utoipa::OpenApi;

use crate::{
    accounts, respond, store::UserStore, user::UserRecord, AppError, ChatAccounts, FieldErrors,
};

#[derive(OpenApi)]
#[openapi(
    paths(sign_up, login, update_profile),
    components(schemas(
        api::SignUp,
        api::SignedUp,
        api::Login,
        api::LoggedIn,
        api::ProfileUpdate,
        api::Profile,
        FieldErrors
    )),
    tags(
        (name = "wschat-accounts", description = "Chat account API")
    )
)]
pub struct Doc;

#[utoipa::path(
    post,
    path = "/signup",
    request_body = api::SignUp,
    responses(
        (status = 201, description = "Account created", body = api::SignedUp),
        (status = 400, description = "Invalid fields or body", body = FieldErrors)
    )
)]
pub async fn sign_up(
    State(state): State<Arc<ChatAccounts>>,
    body: Result<Json<api::SignUp>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(sign_up) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(respond::rejected(rejection)),
    };
    respond::contract(
        StatusCode::CREATED,
        accounts::sign_up(state.store(), sign_up).await,
    )
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = api::Login,
    responses(
        (status = 200, description = "Credentials accepted", body = api::LoggedIn),
        (status = 400, description = "Missing fields or unknown credentials", body = FieldErrors)
    )
)]
pub async fn login(
    State(state): State<Arc<ChatAccounts>>,
    body: Result<Json<api::Login>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(login) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(respond::rejected(rejection)),
    };
    respond::contract(StatusCode::OK, accounts::login(state.store(), login).await)
}

#[utoipa::path(
    patch,
    path = "/profile",
    request_body = api::ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = api::Profile),
        (status = 400, description = "Invalid fields or body", body = FieldErrors),
        (status = 401, description = "Missing or unknown token")
    )
)]
pub async fn update_profile(
    State(state): State<Arc<ChatAccounts>>,
    headers: HeaderMap,
    body: Result<Json<api::ProfileUpdate>, JsonRejection>,
) -> Result<Response, AppError> {
    let Some(user) = authorized_user(state.store(), &headers).await? else {
        return Ok(respond::unauthorized());
    };
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return Ok(respond::rejected(rejection)),
    };
    respond::contract(
        StatusCode::OK,
        accounts::update_profile(state.store(), user, update).await,
    )
}

/// The active account behind `Authorization: Token <token>`.
async fn authorized_user(
    store: &dyn UserStore,
    headers: &HeaderMap,
) -> anyhow::Result<Option<UserRecord>> {
    let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Token "))
    else {
        return Ok(None);
    };

    let user = store.find_by_token(token.trim()).await?;
    Ok(user.filter(|user| user.is_active))
}
