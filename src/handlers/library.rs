use super::mood_filter;
use crate::errors::AppError;
use crate::habits::HabitTab;
use crate::models::{
    HabitQuery, JournalEntry, JournalRequest, MicroHabit, MoodFilterQuery, RangeQuery,
};
use crate::preferences::{self, Preferences};
use crate::saved::{SavedItem, saved_feed};
use crate::state::AppState;
use crate::stats::{InsightRange, InsightsResponse, build_insights};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

pub async fn list_journal(State(state): State<AppState>) -> Json<Vec<JournalEntry>> {
    Json(state.journal.lock().await.list())
}

pub async fn get_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JournalEntry>, AppError> {
    Ok(Json(state.journal.lock().await.get(&id)?))
}

pub async fn create_journal(
    State(state): State<AppState>,
    Json(payload): Json<JournalRequest>,
) -> Result<(StatusCode, Json<JournalEntry>), AppError> {
    let entry = state
        .journal
        .lock()
        .await
        .create(&payload.title, &payload.content, &payload.tags)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<JournalRequest>,
) -> Result<Json<JournalEntry>, AppError> {
    let entry = state
        .journal
        .lock()
        .await
        .update(&id, &payload.title, &payload.content, &payload.tags)?;
    Ok(Json(entry))
}

pub async fn toggle_journal_saved(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JournalEntry>, AppError> {
    Ok(Json(state.journal.lock().await.toggle_saved(&id)?))
}

pub async fn delete_journal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.journal.lock().await.remove(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_habits(
    State(state): State<AppState>,
    Query(query): Query<HabitQuery>,
) -> Result<Json<Vec<MicroHabit>>, AppError> {
    let tab: HabitTab = query.tab.as_deref().unwrap_or("").parse()?;
    let habits = state
        .habits
        .lock()
        .await
        .list(query.q.as_deref().unwrap_or(""), tab);
    Ok(Json(habits))
}

pub async fn toggle_habit_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MicroHabit>, AppError> {
    Ok(Json(state.habits.lock().await.toggle_favorite(&id)?))
}

pub async fn get_saved(
    State(state): State<AppState>,
    Query(query): Query<MoodFilterQuery>,
) -> Result<Json<Vec<SavedItem>>, AppError> {
    let filter = mood_filter(query.mood.as_deref())?;
    let moods = state.workflow.lock().await.entries();
    let journal = state.journal.lock().await.list();
    Ok(Json(saved_feed(moods, journal, filter)))
}

pub async fn get_insights(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<InsightsResponse>, AppError> {
    let range: InsightRange = query.range.as_deref().unwrap_or("").parse()?;
    let entries = state.workflow.lock().await.entries();
    Ok(Json(build_insights(&entries, range)))
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    Json(preferences::load(state.store.as_ref()))
}

pub async fn put_preferences(
    State(state): State<AppState>,
    Json(payload): Json<Preferences>,
) -> Result<Json<Preferences>, AppError> {
    payload.validate()?;
    preferences::save(state.store.as_ref(), &payload)?;
    Ok(Json(payload))
}
