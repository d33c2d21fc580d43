use crate::models::{JournalEntry, Mood, MoodLogEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SavedItem {
    Mood(MoodLogEntry),
    Journal(JournalEntry),
}

impl SavedItem {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            SavedItem::Mood(entry) => entry.created_at,
            SavedItem::Journal(entry) => entry.created_at,
        }
    }

    pub fn matches(&self, mood: Mood) -> bool {
        match self {
            SavedItem::Mood(entry) => entry.mood == mood,
            SavedItem::Journal(entry) => entry.tags.contains(&mood),
        }
    }
}

/// Every mood entry plus the saved journal entries, newest first.
pub fn saved_feed(
    moods: Vec<MoodLogEntry>,
    journal: Vec<JournalEntry>,
    filter: Option<Mood>,
) -> Vec<SavedItem> {
    let mut items: Vec<SavedItem> = moods
        .into_iter()
        .map(SavedItem::Mood)
        .chain(
            journal
                .into_iter()
                .filter(|entry| entry.saved)
                .map(SavedItem::Journal),
        )
        .filter(|item| filter.is_none_or(|mood| item.matches(mood)))
        .collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.timestamp()));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, day, 12, 0, 0).unwrap()
    }

    fn mood_entry(id: &str, mood: Mood, day: u32) -> MoodLogEntry {
        MoodLogEntry {
            id: id.into(),
            mood,
            context: None,
            suggestion: None,
            created_at: at(day),
        }
    }

    fn journal_entry(id: &str, tags: &[Mood], saved: bool, day: u32) -> JournalEntry {
        JournalEntry {
            id: id.into(),
            title: "Title".into(),
            content: "Content".into(),
            created_at: at(day),
            tags: tags.to_vec(),
            saved,
        }
    }

    fn ids(items: &[SavedItem]) -> Vec<&str> {
        items
            .iter()
            .map(|item| match item {
                SavedItem::Mood(entry) => entry.id.as_str(),
                SavedItem::Journal(entry) => entry.id.as_str(),
            })
            .collect()
    }

    #[test]
    fn merges_newest_first_and_skips_unsaved_journal() {
        let feed = saved_feed(
            vec![mood_entry("m1", Mood::Happy, 10), mood_entry("m2", Mood::Calm, 6)],
            vec![
                journal_entry("j1", &[Mood::Anxious], true, 9),
                journal_entry("j2", &[Mood::Happy], false, 11),
            ],
            None,
        );
        assert_eq!(ids(&feed), ["m1", "j1", "m2"]);
    }

    #[test]
    fn mood_filter_matches_mood_or_tags() {
        let feed = saved_feed(
            vec![mood_entry("m1", Mood::Anxious, 8), mood_entry("m2", Mood::Calm, 6)],
            vec![journal_entry("j1", &[Mood::Anxious, Mood::Calm], true, 9)],
            Some(Mood::Anxious),
        );
        assert_eq!(ids(&feed), ["j1", "m1"]);
    }

    #[test]
    fn items_serialize_with_type_tag() {
        let json = serde_json::to_value(SavedItem::Mood(mood_entry("m1", Mood::Love, 1))).unwrap();
        assert_eq!(json["type"], "mood");
        assert_eq!(json["mood"], "love");
    }
}
