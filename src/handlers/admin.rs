use super::mood_filter;
use crate::admin::{dashboard, validate_employee, validate_profile};
use crate::credentials::hash_secret;
use crate::errors::{AppError, AuthError};
use crate::models::{
    ActionType, Activity, ActivityTarget, DashboardResponse, Employee, EmployeeRequest, Identity,
    LibraryHabit, LibraryHabitRequest, MoodFilterQuery, MoodImage, MoodImageRequest,
    ProfileResponse, ProfileUpdateRequest,
};
use crate::preferences::{self, AdminSettings};
use crate::state::AppState;
use crate::ui::{AdminPage, render_admin};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use std::sync::Arc;

const PROFILE_ACTIVITY: usize = 10;

pub async fn admin_index(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Html<String> {
    let notice = state.take_notice().await;
    let theme = preferences::load(state.store.as_ref()).theme;
    let summary = build_dashboard(&state).await;
    let employees = state.employees.lock().await.list();
    let library = state.library.lock().await.list(None);
    let images = state.images.lock().await.list(None);
    let activity = state.activity.lock().await.list();
    let settings = preferences::load_admin_settings(state.store.as_ref());

    let page = AdminPage {
        identity: &identity,
        dashboard: &summary,
        employees: &employees,
        library: &library,
        images: &images,
        activity: &activity,
        settings: &settings,
    };
    Html(render_admin(&page, theme, notice.as_ref()))
}

pub async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    Json(build_dashboard(&state).await)
}

async fn build_dashboard(state: &AppState) -> DashboardResponse {
    let moods = state.workflow.lock().await.entries();
    let employees = state.employees.lock().await;
    let library = state.library.lock().await;
    let images = state.images.lock().await;
    dashboard(&employees, &moods, &library, &images)
}

pub async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    Json(state.employees.lock().await.list())
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<(StatusCode, Json<Employee>), AppError> {
    validate_employee(&payload, true)?;
    let hash = hash_password(payload.password.clone()).await?;
    let employee = state.employees.lock().await.add(&payload, hash)?;
    let item = employee_item(&employee);
    record(&state, &identity, ActionType::Add, ActivityTarget::Employees, item).await;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeRequest>,
) -> Result<Json<Employee>, AppError> {
    validate_employee(&payload, false)?;
    let hash = hash_password(payload.password.clone()).await?;
    let employee = state.employees.lock().await.update(&id, &payload, hash)?;
    let item = employee_item(&employee);
    record(&state, &identity, ActionType::Update, ActivityTarget::Employees, item).await;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.employees.lock().await.remove(&id)?;
    let item = employee_item(&removed);
    record(&state, &identity, ActionType::Remove, ActivityTarget::Employees, item).await;
    Ok(StatusCode::NO_CONTENT)
}

fn employee_item(employee: &Employee) -> String {
    format!("{} ({})", employee.name, employee.email)
}

/// Hashes off the async workers; blank passwords mean "unchanged".
async fn hash_password(password: Option<String>) -> Result<Option<String>, AppError> {
    let Some(password) = password.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    let hash = tokio::task::spawn_blocking(move || hash_secret(&password))
        .await
        .map_err(AppError::internal)??;
    Ok(Some(hash))
}

pub async fn list_library(
    State(state): State<AppState>,
    Query(query): Query<MoodFilterQuery>,
) -> Result<Json<Vec<LibraryHabit>>, AppError> {
    let mood = mood_filter(query.mood.as_deref())?;
    Ok(Json(state.library.lock().await.list(mood)))
}

pub async fn create_library_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<LibraryHabitRequest>,
) -> Result<(StatusCode, Json<LibraryHabit>), AppError> {
    let habit = state.library.lock().await.add(&payload)?;
    let item = habit.title.clone();
    record(&state, &identity, ActionType::Add, ActivityTarget::MicroHabits, item).await;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update_library_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<LibraryHabitRequest>,
) -> Result<Json<LibraryHabit>, AppError> {
    let habit = state.library.lock().await.update(&id, &payload)?;
    let item = habit.title.clone();
    record(&state, &identity, ActionType::Update, ActivityTarget::MicroHabits, item).await;
    Ok(Json(habit))
}

pub async fn delete_library_habit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.library.lock().await.remove(&id)?;
    record(&state, &identity, ActionType::Remove, ActivityTarget::MicroHabits, removed.title).await;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<MoodFilterQuery>,
) -> Result<Json<Vec<MoodImage>>, AppError> {
    let mood = mood_filter(query.mood.as_deref())?;
    Ok(Json(state.images.lock().await.list(mood)))
}

pub async fn create_image(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<MoodImageRequest>,
) -> Result<(StatusCode, Json<MoodImage>), AppError> {
    let image = state.images.lock().await.add(&payload)?;
    let item = image.path.clone();
    record(&state, &identity, ActionType::Add, ActivityTarget::MoodImages, item).await;
    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn update_image(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<MoodImageRequest>,
) -> Result<Json<MoodImage>, AppError> {
    let image = state.images.lock().await.update(&id, &payload)?;
    let item = image.path.clone();
    record(&state, &identity, ActionType::Update, ActivityTarget::MoodImages, item).await;
    Ok(Json(image))
}

pub async fn delete_image(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state.images.lock().await.remove(&id)?;
    record(&state, &identity, ActionType::Remove, ActivityTarget::MoodImages, removed.path).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Appends to the activity log once the collection lock has been released.
async fn record(
    state: &AppState,
    identity: &Identity,
    action_type: ActionType,
    target: ActivityTarget,
    item: String,
) {
    state
        .activity
        .lock()
        .await
        .record(identity, action_type, target, vec![item]);
}

pub async fn list_activity(State(state): State<AppState>) -> Json<Vec<Activity>> {
    Json(state.activity.lock().await.list())
}

pub async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Activity>, AppError> {
    Ok(Json(state.activity.lock().await.get(&id)?))
}

pub async fn get_admin_settings(State(state): State<AppState>) -> Json<AdminSettings> {
    Json(preferences::load_admin_settings(state.store.as_ref()))
}

pub async fn put_admin_settings(
    State(state): State<AppState>,
    Json(payload): Json<AdminSettings>,
) -> Result<Json<AdminSettings>, AppError> {
    preferences::save_admin_settings(state.store.as_ref(), &payload)?;
    Ok(Json(payload))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<ProfileResponse> {
    let recent_activity = state
        .activity
        .lock()
        .await
        .by_performer(&identity.email, PROFILE_ACTIVITY);
    Json(ProfileResponse {
        identity,
        recent_activity,
    })
}

/// Renames the signed-in admin's account. A password change must present
/// the current password.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<Json<Identity>, AppError> {
    let secret_hash = match validate_profile(&payload)? {
        Some(change) => {
            let credentials = Arc::clone(&state.credentials);
            let email = identity.email.clone();
            let hash = tokio::task::spawn_blocking(move || {
                if credentials.find_account(&email, &change.current).is_none() {
                    return Err(AuthError::InvalidCredentials);
                }
                hash_secret(&change.new)
            })
            .await
            .map_err(AppError::internal)??;
            Some(hash)
        }
        None => None,
    };

    let updated = state.credentials.update_account(
        &identity.id,
        payload.name.trim(),
        payload.email.trim(),
        secret_hash,
    )?;
    state.session.update_identity(updated.clone());
    let item = format!("{} ({})", updated.name, updated.email);
    record(&state, &updated, ActionType::Update, ActivityTarget::Profile, item).await;
    Ok(Json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::credentials::CredentialStore;
    use crate::models::{Mood, Role};
    use crate::storage::MemoryStore;
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

    async fn signed_in_admin(state: &AppState) -> Identity {
        state
            .session
            .login("admin@micromood.com", "admin123")
            .await
            .expect("admin login")
    }

    fn profile(name: &str, email: &str) -> ProfileUpdateRequest {
        ProfileUpdateRequest {
            name: name.into(),
            email: email.into(),
            ..ProfileUpdateRequest::default()
        }
    }

    #[tokio::test]
    async fn employee_changes_are_logged_against_the_admin() {
        let state = state();
        let admin = signed_in_admin(&state).await;

        let request = EmployeeRequest {
            name: "Ann Lee".into(),
            email: "ann@micromood.com".into(),
            role: Role::User,
            password: Some("secret1".into()),
        };
        let (status, Json(employee)) = create_employee(
            State(state.clone()),
            Extension(admin.clone()),
            Json(request),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        delete_employee(State(state.clone()), Extension(admin.clone()), Path(employee.id))
            .await
            .unwrap();

        let Json(activity) = list_activity(State(state.clone())).await;
        assert_eq!(activity.len(), 2);
        assert_eq!(activity[0].action_type, ActionType::Remove);
        assert_eq!(activity[1].action, "Added employee");
        assert_eq!(activity[1].items, vec!["Ann Lee (ann@micromood.com)".to_string()]);
        assert!(activity.iter().all(|entry| entry.performed_by.email == admin.email));
    }

    #[tokio::test]
    async fn library_and_image_changes_are_logged() {
        let state = state();
        let admin = signed_in_admin(&state).await;

        delete_library_habit(State(state.clone()), Extension(admin.clone()), Path("3".into()))
            .await
            .unwrap();
        let request = MoodImageRequest {
            path: Some("/mood-images/river.jpg".into()),
            tags: vec!["calm".into()],
            caption: None,
        };
        update_image(
            State(state.clone()),
            Extension(admin.clone()),
            Path("5".into()),
            Json(request),
        )
        .await
        .unwrap();

        let log = state.activity.lock().await.list();
        assert_eq!(log[0].action, "Updated mood image");
        assert_eq!(log[0].target, ActivityTarget::MoodImages);
        assert_eq!(log[0].items, vec!["/mood-images/river.jpg".to_string()]);
        assert_eq!(log[1].action, "Removed micro-habit");
        assert_eq!(log[1].items, vec!["Quick Walk".to_string()]);
    }

    #[tokio::test]
    async fn failed_mutations_leave_no_activity() {
        let state = state();
        let admin = signed_in_admin(&state).await;

        let err = delete_image(State(state.clone()), Extension(admin), Path("99".into()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert!(state.activity.lock().await.is_empty());

        let missing = get_activity(State(state.clone()), Path("99".into()))
            .await
            .unwrap_err();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_settings_are_saved_and_reloaded() {
        let state = state();
        let Json(defaults) = get_admin_settings(State(state.clone())).await;
        assert!(defaults.auto_suggest_habits);

        let changed = AdminSettings {
            default_mood: Mood::Happy,
            show_analytics: false,
            ..defaults
        };
        put_admin_settings(State(state.clone()), Json(changed.clone()))
            .await
            .unwrap();
        let Json(reloaded) = get_admin_settings(State(state)).await;
        assert_eq!(reloaded, changed);
    }

    #[tokio::test]
    async fn profile_edit_renames_and_changes_password() {
        let state = state();
        let admin = signed_in_admin(&state).await;

        let request = ProfileUpdateRequest {
            current_password: Some("admin123".into()),
            new_password: Some("newpass1".into()),
            confirm_password: Some("newpass1".into()),
            ..profile("Ada Admin", "ada@micromood.com")
        };
        let Json(updated) = update_profile(State(state.clone()), Extension(admin.clone()), Json(request))
            .await
            .unwrap();
        assert_eq!(updated.id, admin.id);
        assert_eq!(updated.email, "ada@micromood.com");
        assert_eq!(state.session.identity(), Some(updated.clone()));

        state.session.logout();
        assert!(state.session.login("ada@micromood.com", "admin123").await.is_err());
        state
            .session
            .login("ada@micromood.com", "newpass1")
            .await
            .expect("login with new password");

        let Json(profile) = get_profile(State(state.clone()), Extension(updated)).await;
        assert_eq!(profile.recent_activity.len(), 1);
        assert_eq!(profile.recent_activity[0].target, ActivityTarget::Profile);
    }

    #[tokio::test]
    async fn profile_edit_checks_current_password_and_email_clash() {
        let state = state();
        let admin = signed_in_admin(&state).await;

        let wrong = ProfileUpdateRequest {
            current_password: Some("nope".into()),
            new_password: Some("newpass1".into()),
            confirm_password: Some("newpass1".into()),
            ..profile("Admin User", "admin@micromood.com")
        };
        let err = update_profile(State(state.clone()), Extension(admin.clone()), Json(wrong))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);

        let clash = profile("Admin User", "user@micromood.com");
        let err = update_profile(State(state.clone()), Extension(admin.clone()), Json(clash))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        assert_eq!(state.session.identity(), Some(admin));
        assert!(state.activity.lock().await.is_empty());
    }
}
