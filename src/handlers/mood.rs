use crate::errors::{AppError, EntryError};
use crate::models::{
    ContextRequest, Identity, LogMoodForm, LoggedMoodResponse, Mood, MoodLogEntry,
    SelectMoodRequest, WorkflowResponse,
};
use crate::preferences;
use crate::state::{AppState, Notice};
use crate::ui::{IndexPage, render_index};
use crate::workflow::{LoggedMood, MoodWorkflow};
use axum::{
    Extension, Form, Json,
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
};
use chrono::Utc;

const RECENT_ENTRIES: usize = 10;

pub async fn index(State(state): State<AppState>, Extension(identity): Extension<Identity>) -> Html<String> {
    let notice = state.take_notice().await;
    let theme = preferences::load(state.store.as_ref()).theme;
    let date = Utc::now().format("%A, %B %-d, %Y").to_string();

    let workflow = state.workflow.lock().await;
    let entries: Vec<MoodLogEntry> = workflow
        .entries()
        .into_iter()
        .take(RECENT_ENTRIES)
        .collect();
    let page = IndexPage {
        identity: &identity,
        date: &date,
        selected: workflow.pending_mood(),
        context: workflow.context(),
        last_suggestion: workflow.last_logged().map(|logged| logged.suggestion),
        highlighted: workflow.is_highlighted(),
        entries: &entries,
    };
    Html(render_index(&page, theme, notice.as_ref()))
}

pub async fn select_mood_form(
    State(state): State<AppState>,
    Form(form): Form<SelectMoodRequest>,
) -> Redirect {
    match form.mood.parse::<Mood>() {
        Ok(mood) => state.workflow.lock().await.select_mood(mood),
        Err(err) => state.notify(Notice::error("Unknown mood", err.to_string())).await,
    }
    Redirect::to("/")
}

pub async fn log_mood_form(State(state): State<AppState>, Form(form): Form<LogMoodForm>) -> Redirect {
    let logged = {
        let mut workflow = state.workflow.lock().await;
        apply_form(&mut workflow, &form)
    };
    let notice = match logged {
        Ok(logged) => Notice::info("Insight Generated", logged.suggestion.text()),
        Err(EntryError::MissingMood) => {
            Notice::error("Please select a mood", "Choose how you feel before logging")
        }
        Err(err) => Notice::error("Could not log mood", err.to_string()),
    };
    state.notify(notice).await;
    Redirect::to("/")
}

fn apply_form(workflow: &mut MoodWorkflow, form: &LogMoodForm) -> Result<LoggedMood, EntryError> {
    if let Some(raw) = form.mood.as_deref().filter(|raw| !raw.trim().is_empty()) {
        workflow.select_mood(raw.parse()?);
    }
    if workflow.pending_mood().is_some() {
        workflow.enter_context(form.context.as_deref().unwrap_or(""))?;
    }
    workflow.submit()
}

pub async fn get_workflow(State(state): State<AppState>) -> Json<WorkflowResponse> {
    let workflow = state.workflow.lock().await;
    Json(workflow_response(&workflow))
}

pub async fn select_mood(
    State(state): State<AppState>,
    Json(payload): Json<SelectMoodRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let mood: Mood = payload.mood.parse()?;
    let mut workflow = state.workflow.lock().await;
    workflow.select_mood(mood);
    Ok(Json(workflow_response(&workflow)))
}

pub async fn enter_context(
    State(state): State<AppState>,
    Json(payload): Json<ContextRequest>,
) -> Result<Json<WorkflowResponse>, AppError> {
    let mut workflow = state.workflow.lock().await;
    workflow.enter_context(&payload.context)?;
    Ok(Json(workflow_response(&workflow)))
}

pub async fn log_mood(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LoggedMoodResponse>), AppError> {
    let logged = state.workflow.lock().await.submit()?;
    Ok((
        StatusCode::CREATED,
        Json(LoggedMoodResponse {
            suggestion_title: logged.suggestion.title.to_string(),
            suggestion: logged.suggestion.text(),
            entry: logged.entry,
        }),
    ))
}

pub async fn list_mood_entries(State(state): State<AppState>) -> Json<Vec<MoodLogEntry>> {
    Json(state.workflow.lock().await.entries())
}

fn workflow_response(workflow: &MoodWorkflow) -> WorkflowResponse {
    WorkflowResponse {
        phase: workflow.phase().as_str().to_string(),
        mood: workflow.pending_mood(),
        context: workflow.context().to_string(),
        prompt: workflow.prompt(),
        highlighted: workflow.is_highlighted(),
        last_suggestion: workflow.last_logged().map(|logged| logged.suggestion.text()),
    }
}
