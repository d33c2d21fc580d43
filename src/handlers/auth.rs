use super::home_for;
use crate::errors::AppError;
use crate::models::{LoginRequest, SessionResponse, SignupRequest};
use crate::state::{AppState, Notice};
use crate::ui::{render_login, render_signup};
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::warn;

pub async fn login_page(State(state): State<AppState>) -> Response {
    if let Some(identity) = state.session.identity() {
        return Redirect::to(home_for(identity.role)).into_response();
    }
    let notice = state.take_notice().await;
    Html(render_login(notice.as_ref())).into_response()
}

pub async fn signup_page(State(state): State<AppState>) -> Response {
    if let Some(identity) = state.session.identity() {
        return Redirect::to(home_for(identity.role)).into_response();
    }
    let notice = state.take_notice().await;
    Html(render_signup(notice.as_ref())).into_response()
}

pub async fn login_form(State(state): State<AppState>, Form(form): Form<LoginRequest>) -> Redirect {
    match state.session.login(&form.email, &form.password).await {
        Ok(identity) => {
            state
                .notify(Notice::info("Welcome back", format!("Signed in as {}", identity.name)))
                .await;
            Redirect::to(home_for(identity.role))
        }
        Err(err) => {
            warn!(error = %err, "login failed");
            state.notify(Notice::error("Login failed", err.to_string())).await;
            Redirect::to("/login")
        }
    }
}

pub async fn signup_form(State(state): State<AppState>, Form(form): Form<SignupRequest>) -> Redirect {
    match state
        .session
        .signup(&form.name, &form.email, &form.password)
        .await
    {
        Ok(()) => {
            state
                .notify(Notice::info("Account created", "Welcome to MicroMood"))
                .await;
            Redirect::to("/")
        }
        Err(err) => {
            warn!(error = %err, "signup failed");
            state.notify(Notice::error("Signup failed", err.to_string())).await;
            Redirect::to("/signup")
        }
    }
}

pub async fn logout_form(State(state): State<AppState>) -> Redirect {
    state.session.logout();
    state
        .notify(Notice::info("Logged out", "See you next time"))
        .await;
    Redirect::to("/login")
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(session_response(&state))
}

pub async fn api_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let identity = state.session.login(&payload.email, &payload.password).await?;
    Ok(Json(SessionResponse {
        identity: Some(identity),
        loading: false,
    }))
}

pub async fn api_signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    state
        .session
        .signup(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session_response(&state))))
}

pub async fn api_logout(State(state): State<AppState>) -> Json<SessionResponse> {
    state.session.logout();
    Json(session_response(&state))
}

fn session_response(state: &AppState) -> SessionResponse {
    let snapshot = state.session.snapshot();
    SessionResponse {
        identity: snapshot.identity,
        loading: snapshot.loading,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credentials::CredentialStore;
    use crate::models::Role;
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> AppState {
        let config = Config {
            latency: Duration::ZERO,
            demo: false,
            ..Config::default()
        };
        let credentials = CredentialStore::seeded().expect("seed credentials");
        AppState::new(config, Arc::new(credentials), Arc::new(MemoryStore::new()))
    }

    fn login(email: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            email: email.into(),
            password: password.into(),
        })
    }

    #[tokio::test]
    async fn api_login_reports_the_identity_it_signed_in() {
        let state = state();
        let Json(response) = api_login(State(state.clone()), login("admin@micromood.com", "admin123"))
            .await
            .unwrap();
        let identity = response.identity.expect("identity");
        assert_eq!(identity.email, "admin@micromood.com");
        assert_eq!(identity.role, Role::Admin);
        assert!(!response.loading);

        state.session.logout();
        assert_eq!(identity.name, "Admin User");
        assert!(state.session.identity().is_none());
    }

    #[tokio::test]
    async fn api_login_rejects_wrong_password() {
        let state = state();
        let err = api_login(State(state.clone()), login("admin@micromood.com", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(state.session.identity().is_none());
    }
}
