mod admin;
mod auth;
mod library;
mod mood;

pub use admin::*;
pub use auth::*;
pub use library::*;
pub use mood::*;

use crate::errors::AppError;
use crate::models::{Mood, Role};
use crate::ui::render_not_found;
use axum::{
    http::{StatusCode, Uri},
    response::Html,
};

pub async fn not_found(uri: Uri) -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render_not_found(uri.path())))
}

fn home_for(role: Role) -> &'static str {
    match role {
        Role::Admin => "/admin",
        Role::User => "/",
    }
}

/// `None`, an empty value and `all` mean no filter.
fn mood_filter(raw: Option<&str>) -> Result<Option<Mood>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => Ok(Some(value.parse()?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_filter_accepts_all_and_moods() {
        assert_eq!(mood_filter(None).unwrap(), None);
        assert_eq!(mood_filter(Some("all")).unwrap(), None);
        assert_eq!(mood_filter(Some(" Calm")).unwrap(), Some(Mood::Calm));
        assert_eq!(
            mood_filter(Some("grumpy")).unwrap_err().status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn admins_land_on_the_dashboard() {
        assert_eq!(home_for(Role::Admin), "/admin");
        assert_eq!(home_for(Role::User), "/");
    }
}
