//! Mood-logging state machine.
//!
//! `NoMoodSelected -> MoodSelected -> ContextEntered -> Logged`. Selecting a
//! mood is always allowed and re-arms the machine after a submit; writing
//! context and submitting both require a pending mood.

use crate::errors::EntryError;
use crate::models::{Mood, MoodLogEntry};
use crate::repository::Repository;
use crate::suggestions::{Suggestion, SuggestionPicker, choose};
use crate::timer::Highlight;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NoMoodSelected,
    MoodSelected,
    ContextEntered,
    Logged,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::NoMoodSelected => "no_mood_selected",
            Phase::MoodSelected => "mood_selected",
            Phase::ContextEntered => "context_entered",
            Phase::Logged => "logged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoggedMood {
    pub entry: MoodLogEntry,
    pub suggestion: &'static Suggestion,
}

pub struct MoodWorkflow {
    pending: Option<Mood>,
    context: String,
    last: Option<LoggedMood>,
    highlight: Option<Highlight>,
    highlight_for: Duration,
    log: Box<dyn Repository<MoodLogEntry>>,
    picker: Box<dyn SuggestionPicker>,
}

impl MoodWorkflow {
    pub fn new(
        log: Box<dyn Repository<MoodLogEntry>>,
        picker: Box<dyn SuggestionPicker>,
        highlight_for: Duration,
    ) -> Self {
        Self {
            pending: None,
            context: String::new(),
            last: None,
            highlight: None,
            highlight_for,
            log,
            picker,
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.pending, &self.last) {
            (None, None) => Phase::NoMoodSelected,
            (None, Some(_)) => Phase::Logged,
            (Some(_), _) if self.context.trim().is_empty() => Phase::MoodSelected,
            (Some(_), _) => Phase::ContextEntered,
        }
    }

    pub fn pending_mood(&self) -> Option<Mood> {
        self.pending
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.pending.map(Mood::prompt)
    }

    pub fn last_logged(&self) -> Option<&LoggedMood> {
        self.last.as_ref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight.as_ref().is_some_and(Highlight::is_active)
    }

    pub fn select_mood(&mut self, mood: Mood) {
        if self.pending != Some(mood) {
            debug!(%mood, "mood selected");
        }
        self.pending = Some(mood);
    }

    pub fn enter_context(&mut self, text: &str) -> Result<(), EntryError> {
        if self.pending.is_none() {
            return Err(EntryError::MissingMood);
        }
        self.context = text.to_string();
        Ok(())
    }

    /// Records the pending mood, newest first, and picks a suggestion for it.
    pub fn submit(&mut self) -> Result<LoggedMood, EntryError> {
        let mood = self.pending.ok_or(EntryError::MissingMood)?;
        let suggestion = choose(mood, self.picker.as_mut());

        let context = self.context.trim();
        let entry = MoodLogEntry {
            id: Uuid::new_v4().to_string(),
            mood,
            context: (!context.is_empty()).then(|| context.to_string()),
            suggestion: Some(suggestion.text()),
            created_at: Utc::now(),
        };
        self.log.add(entry.clone());
        info!(%mood, entry_id = %entry.id, suggestion = suggestion.title, "mood logged");

        let logged = LoggedMood { entry, suggestion };
        self.pending = None;
        self.context.clear();
        self.highlight = Some(Highlight::start(self.highlight_for));
        self.last = Some(logged.clone());
        Ok(logged)
    }

    pub fn entries(&self) -> Vec<MoodLogEntry> {
        self.log.list()
    }

    pub fn entry_count(&self) -> usize {
        self.log.len()
    }

    pub fn teardown(&mut self) {
        if let Some(highlight) = self.highlight.take() {
            highlight.cancel();
        }
    }
}
