use crate::errors::EntryError;
use crate::models::{JournalEntry, Mood, parse_mood_tags};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

pub struct Journal {
    entries: Box<dyn Repository<JournalEntry>>,
}

impl Journal {
    pub fn new(entries: Box<dyn Repository<JournalEntry>>) -> Self {
        Self { entries }
    }

    pub fn list(&self) -> Vec<JournalEntry> {
        self.entries.list()
    }

    pub fn get(&self, id: &str) -> Result<JournalEntry, EntryError> {
        self.entries
            .get(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))
    }

    pub fn create<S: AsRef<str>>(
        &mut self,
        title: &str,
        content: &str,
        tags: &[S],
    ) -> Result<JournalEntry, EntryError> {
        let (title, content) = require_text(title, content)?;
        let entry = JournalEntry {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: Utc::now(),
            tags: parse_mood_tags(tags)?,
            saved: false,
        };
        self.entries.add(entry.clone());
        info!(entry_id = %entry.id, "journal entry created");
        Ok(entry)
    }

    /// Replaces title, content and tags. Date and saved flag are kept.
    pub fn update<S: AsRef<str>>(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        tags: &[S],
    ) -> Result<JournalEntry, EntryError> {
        let (title, content) = require_text(title, content)?;
        let tags = parse_mood_tags(tags)?;
        let mut entry = self.get(id)?;
        entry.title = title;
        entry.content = content;
        entry.tags = tags;
        self.entries.update(entry.clone())?;
        info!(entry_id = %entry.id, "journal entry updated");
        Ok(entry)
    }

    pub fn toggle_saved(&mut self, id: &str) -> Result<JournalEntry, EntryError> {
        let mut entry = self.get(id)?;
        entry.saved = !entry.saved;
        self.entries.update(entry.clone())?;
        Ok(entry)
    }

    pub fn remove(&mut self, id: &str) -> Result<JournalEntry, EntryError> {
        self.entries.remove(id)
    }
}

fn require_text(title: &str, content: &str) -> Result<(String, String), EntryError> {
    let (title, content) = (title.trim(), content.trim());
    if title.is_empty() || content.is_empty() {
        return Err(EntryError::EmptyEntry);
    }
    Ok((title.to_string(), content.to_string()))
}

/// Sample entries shown on a fresh install when demo content is enabled,
/// oldest last.
pub fn demo_entries() -> Vec<JournalEntry> {
    vec![
        demo(
            "1",
            "Finding balance in chaos",
            "Today was particularly overwhelming with work deadlines piling up. I noticed my anxiety building throughout the morning, but took a 15-minute walk outside during lunch which helped clear my mind. I'm learning that small breaks make a big difference in my mental state.",
            "2025-04-10T14:30:00Z",
            &[Mood::Anxious, Mood::Calm],
            true,
        ),
        demo(
            "2",
            "Unexpected moments of joy",
            "Had a surprise video call with my college friends today. We haven't all been together in one call for months, and hearing everyone's laughter made me realize how much I've missed them. These connections are so precious.",
            "2025-04-08T20:15:00Z",
            &[Mood::Happy, Mood::Love],
            false,
        ),
        demo(
            "3",
            "Reflections on change",
            "Change has always been difficult for me. As I prepare for the upcoming move to a new city, I'm feeling a mix of excitement and apprehension. Today I packed my first box of books - it made everything feel suddenly real.",
            "2025-04-05T18:45:00Z",
            &[Mood::Anxious, Mood::Neutral],
            false,
        ),
    ]
}

fn demo(id: &str, title: &str, content: &str, date: &str, tags: &[Mood], saved: bool) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        created_at: DateTime::parse_from_rfc3339(date)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_default(),
        tags: tags.to_vec(),
        saved,
    }
}
