use crate::guard;
use crate::handlers;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/login", get(handlers::login_page).post(handlers::login_form))
        .route("/signup", get(handlers::signup_page).post(handlers::signup_form))
        .route("/logout", post(handlers::logout_form))
        .route("/api/login", post(handlers::api_login))
        .route("/api/signup", post(handlers::api_signup))
        .route("/api/logout", post(handlers::api_logout))
        .route("/api/session", get(handlers::get_session));

    let signed_in = Router::new()
        .route("/", get(handlers::index))
        .route("/mood/select", post(handlers::select_mood_form))
        .route("/mood/log", post(handlers::log_mood_form))
        .route("/api/mood", get(handlers::get_workflow))
        .route("/api/mood/select", post(handlers::select_mood))
        .route("/api/mood/context", post(handlers::enter_context))
        .route("/api/mood/log", post(handlers::log_mood))
        .route("/api/mood/entries", get(handlers::list_mood_entries))
        .route(
            "/api/journal",
            get(handlers::list_journal).post(handlers::create_journal),
        )
        .route(
            "/api/journal/:id",
            get(handlers::get_journal)
                .put(handlers::update_journal)
                .delete(handlers::delete_journal),
        )
        .route("/api/journal/:id/saved", post(handlers::toggle_journal_saved))
        .route("/api/habits", get(handlers::list_habits))
        .route("/api/habits/:id/favorite", post(handlers::toggle_habit_favorite))
        .route("/api/saved", get(handlers::get_saved))
        .route("/api/insights", get(handlers::get_insights))
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::put_preferences),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_identity,
        ));

    let admin = Router::new()
        .route("/admin", get(handlers::admin_index))
        .route("/api/admin/dashboard", get(handlers::get_dashboard))
        .route(
            "/api/admin/employees",
            get(handlers::list_employees).post(handlers::create_employee),
        )
        .route(
            "/api/admin/employees/:id",
            put(handlers::update_employee).delete(handlers::delete_employee),
        )
        .route(
            "/api/admin/habits",
            get(handlers::list_library).post(handlers::create_library_habit),
        )
        .route(
            "/api/admin/habits/:id",
            put(handlers::update_library_habit)
                .delete(handlers::delete_library_habit),
        )
        .route(
            "/api/admin/images",
            get(handlers::list_images).post(handlers::create_image),
        )
        .route(
            "/api/admin/images/:id",
            put(handlers::update_image).delete(handlers::delete_image),
        )
        .route("/api/admin/activity", get(handlers::list_activity))
        .route("/api/admin/activity/:id", get(handlers::get_activity))
        .route(
            "/api/admin/settings",
            get(handlers::get_admin_settings).put(handlers::put_admin_settings),
        )
        .route(
            "/api/admin/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_admin,
        ));

    Router::new()
        .merge(public)
        .merge(signed_in)
        .merge(admin)
        .fallback(handlers::not_found)
        .with_state(state)
}
