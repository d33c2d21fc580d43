use crate::models::{Identity, Role};
use crate::session::SessionSnapshot;
use crate::state::{AppState, Notice};
use crate::ui::render_waiting;
use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::debug;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Session still loading; nothing may be decided yet.
    Pending,
    Unauthenticated,
    Forbidden { required: Role },
    Admitted(Identity),
}

pub fn evaluate(session: &SessionSnapshot, required: Option<Role>) -> Decision {
    if session.loading {
        return Decision::Pending;
    }
    let Some(identity) = &session.identity else {
        return Decision::Unauthenticated;
    };
    match required {
        Some(role) if identity.role != role => Decision::Forbidden { required: role },
        _ => Decision::Admitted(identity.clone()),
    }
}

pub async fn require_identity(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, None, req, next).await
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    guard(state, Some(Role::Admin), req, next).await
}

async fn guard(state: AppState, required: Option<Role>, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    match evaluate(&state.session.snapshot(), required) {
        Decision::Pending => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(header::RETRY_AFTER, "1")],
            Html(render_waiting()),
        )
            .into_response(),
        Decision::Unauthenticated => {
            debug!(%path, "redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        Decision::Forbidden { required } => {
            debug!(%path, %required, "role mismatch");
            state
                .notify(Notice::error(
                    "Access denied",
                    format!("That page requires the {required} role"),
                ))
                .await;
            Redirect::to(HOME_PATH).into_response()
        }
        Decision::Admitted(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Role) -> Identity {
        Identity {
            id: "1".into(),
            email: "someone@micromood.com".into(),
            name: "Someone".into(),
            role,
        }
    }

    #[test]
    fn loading_session_is_pending_even_with_identity() {
        let session = SessionSnapshot {
            identity: Some(identity(Role::Admin)),
            loading: true,
        };
        assert_eq!(evaluate(&session, None), Decision::Pending);
        assert_eq!(evaluate(&session, Some(Role::Admin)), Decision::Pending);
    }

    #[test]
    fn no_identity_is_unauthenticated_for_any_requirement() {
        let session = SessionSnapshot::signed_out();
        assert_eq!(evaluate(&session, None), Decision::Unauthenticated);
        assert_eq!(evaluate(&session, Some(Role::User)), Decision::Unauthenticated);
        assert_eq!(evaluate(&session, Some(Role::Admin)), Decision::Unauthenticated);
    }

    #[test]
    fn user_is_forbidden_from_admin_routes() {
        let session = SessionSnapshot::signed_in(identity(Role::User));
        assert_eq!(
            evaluate(&session, Some(Role::Admin)),
            Decision::Forbidden { required: Role::Admin }
        );
        assert_eq!(
            evaluate(&session, None),
            Decision::Admitted(identity(Role::User))
        );
    }

    #[test]
    fn admin_is_admitted_to_admin_routes() {
        let session = SessionSnapshot::signed_in(identity(Role::Admin));
        assert_eq!(
            evaluate(&session, Some(Role::Admin)),
            Decision::Admitted(identity(Role::Admin))
        );
    }

    #[test]
    fn role_equality_has_no_hierarchy() {
        let session = SessionSnapshot::signed_in(identity(Role::Admin));
        assert_eq!(
            evaluate(&session, Some(Role::User)),
            Decision::Forbidden { required: Role::User }
        );
    }
}
