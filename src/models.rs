use crate::errors::EntryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Calm,
    Sad,
    Anxious,
    Energetic,
    Love,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 7] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Sad,
        Mood::Anxious,
        Mood::Energetic,
        Mood::Love,
        Mood::Neutral,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Calm => "calm",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
            Mood::Energetic => "energetic",
            Mood::Love => "love",
            Mood::Neutral => "neutral",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
            Mood::Energetic => "Energetic",
            Mood::Love => "Love",
            Mood::Neutral => "Neutral",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Mood::Happy => "#FFD166",
            Mood::Calm => "#118AB2",
            Mood::Sad => "#073B4C",
            Mood::Anxious => "#EF476F",
            Mood::Energetic => "#06D6A0",
            Mood::Love => "#F2BAC9",
            Mood::Neutral => "#8A898C",
        }
    }

    /// Position on a 0-100 wellbeing scale, used by the insights averages.
    pub fn score(self) -> f64 {
        match self {
            Mood::Happy => 90.0,
            Mood::Love => 80.0,
            Mood::Energetic => 73.0,
            Mood::Calm => 58.0,
            Mood::Neutral => 43.0,
            Mood::Anxious => 28.0,
            Mood::Sad => 10.0,
        }
    }

    /// Reflection prompt shown above the context box.
    pub fn prompt(self) -> &'static str {
        match self {
            Mood::Happy => "What made you happy today? How can you create more moments like this?",
            Mood::Calm => {
                "Describe the peaceful moments in your day. What contributed to your sense of calm?"
            }
            Mood::Sad => "What's weighing on your mind today? Remember that all emotions are valid.",
            Mood::Anxious => {
                "What's causing you to feel anxious? Try naming specific thoughts or concerns."
            }
            Mood::Energetic => {
                "What's giving you energy today? How might you channel this positively?"
            }
            Mood::Love => {
                "What or who are you feeling connected to today? How does this affect you?"
            }
            Mood::Neutral => {
                "How would you describe your neutral state today? Is it peaceful, empty, or balanced?"
            }
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = EntryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.as_str() == normalized)
            .ok_or_else(|| EntryError::InvalidMood(value.trim().to_string()))
    }
}

/// Parses free-form tags into a de-duplicated list of moods, keeping input order.
pub fn parse_mood_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Mood>, EntryError> {
    let mut moods = Vec::with_capacity(tags.len());
    for tag in tags {
        let mood = tag.as_ref().parse::<Mood>()?;
        if !moods.contains(&mood) {
            moods.push(mood);
        }
    }
    Ok(moods)
}

/// Loose address check: one `@`, a non-empty local part and a dotted domain.
pub fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !value.chars().any(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = EntryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(EntryError::Invalid(format!("unknown role '{other}'"))),
        }
    }
}

/// Public profile of an authenticated account. Never carries a secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodLogEntry {
    pub id: String,
    pub mood: Mood,
    pub context: Option<String>,
    pub suggestion: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub tags: Vec<Mood>,
    pub saved: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Overwhelmed,
    Stuck,
    Excited,
    Sad,
    Anxious,
    Happy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroHabit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: HabitCategory,
    pub duration: String,
    pub favorite: bool,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryHabit {
    pub id: String,
    pub title: String,
    pub description: String,
    pub mood: Mood,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodImage {
    pub id: String,
    pub path: String,
    pub tags: Vec<Mood>,
    pub caption: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Add,
    Update,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityTarget {
    Employees,
    MicroHabits,
    MoodImages,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub name: String,
    pub email: String,
}

/// One admin action: who changed which collection, and the items touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    pub action: String,
    pub detail: String,
    pub action_type: ActionType,
    pub target: ActivityTarget,
    pub performed_by: Performer,
    pub reason: Option<String>,
    pub items: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub identity: Option<Identity>,
    pub loading: bool,
}

#[derive(Debug, Deserialize)]
pub struct SelectMoodRequest {
    pub mood: String,
}

#[derive(Debug, Deserialize)]
pub struct ContextRequest {
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct LogMoodForm {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub phase: String,
    pub mood: Option<Mood>,
    pub context: String,
    pub prompt: Option<&'static str>,
    pub highlighted: bool,
    pub last_suggestion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoggedMoodResponse {
    pub entry: MoodLogEntry,
    pub suggestion_title: String,
    pub suggestion: String,
}

#[derive(Debug, Deserialize)]
pub struct JournalRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct HabitQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub tab: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoodFilterQuery {
    #[serde(default)]
    pub mood: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    #[serde(default)]
    pub range: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub password: Option<String>,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LibraryHabitRequest {
    pub title: String,
    pub description: String,
    pub mood: String,
}

#[derive(Debug, Deserialize)]
pub struct MoodImageRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub caption: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub identity: Identity,
    pub recent_activity: Vec<Activity>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_employees: usize,
    pub mood_entries: usize,
    pub library_habits: usize,
    pub mood_images: usize,
    pub recent_moods: Vec<MoodLogEntry>,
}
