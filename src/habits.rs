use crate::errors::EntryError;
use crate::models::{HabitCategory, MicroHabit};
use crate::repository::Repository;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitTab {
    #[default]
    All,
    Favorites,
    Recommended,
}

impl FromStr for HabitTab {
    type Err = EntryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "" | "all" => Ok(HabitTab::All),
            "favorites" => Ok(HabitTab::Favorites),
            "recommended" => Ok(HabitTab::Recommended),
            other => Err(EntryError::Invalid(format!("unknown habit tab '{other}'"))),
        }
    }
}

pub struct HabitBrowser {
    habits: Box<dyn Repository<MicroHabit>>,
}

impl HabitBrowser {
    pub fn new(habits: Box<dyn Repository<MicroHabit>>) -> Self {
        Self { habits }
    }

    /// Habits on `tab` whose title or description contains `query`, ignoring case.
    pub fn list(&self, query: &str, tab: HabitTab) -> Vec<MicroHabit> {
        let needle = query.trim().to_lowercase();
        self.habits
            .list()
            .into_iter()
            .filter(|habit| match tab {
                HabitTab::All => true,
                HabitTab::Favorites => habit.favorite,
                HabitTab::Recommended => habit.recommended,
            })
            .filter(|habit| {
                needle.is_empty()
                    || habit.title.to_lowercase().contains(&needle)
                    || habit.description.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn toggle_favorite(&mut self, id: &str) -> Result<MicroHabit, EntryError> {
        let mut habit = self
            .habits
            .get(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))?;
        habit.favorite = !habit.favorite;
        self.habits.update(habit.clone())?;
        Ok(habit)
    }
}

pub fn default_habits() -> Vec<MicroHabit> {
    use HabitCategory::*;

    [
        ("1", "5-4-3-2-1 Grounding", "Notice 5 things you can see, 4 things you can touch, 3 things you can hear, 2 things you can smell, and 1 thing you can taste.", Overwhelmed, "2 min", false, true),
        ("2", "Box Breathing", "Breathe in for 4 counts, hold for 4, breathe out for 4, hold for 4. Repeat 4 times.", Anxious, "1 min", true, false),
        ("3", "Joy List", "Write down 5 things, no matter how small, that brought you joy today.", Sad, "3 min", false, false),
        ("4", "Mindful Walking", "Take a short walk focusing only on the sensations in your feet and the rhythm of your breath.", Stuck, "5 min", false, true),
        ("5", "Quick Gratitude", "Write down three specific things you're grateful for right now.", Anxious, "2 min", false, false),
        ("6", "Celebration Dance", "Put on your favorite upbeat song and dance for the duration to channel your positive energy.", Excited, "3 min", true, false),
        ("7", "Water Your Plants", "Take a moment to care for your plants, noticing their growth and needs.", Happy, "4 min", false, false),
        ("8", "Single-Task Focus", "Choose one small task and complete it with total mindful attention.", Overwhelmed, "5 min", false, false),
        ("9", "Sky Gazing", "Find a window or go outside and simply watch the clouds or stars for a few minutes.", Stuck, "5 min", false, false),
        ("10", "Progressive Muscle Relaxation", "Starting with your toes and moving upward, tense and then relax each muscle group in your body.", Anxious, "5 min", false, true),
        ("11", "Visualization", "Close your eyes and visualize a place where you feel completely safe, calm and happy.", Sad, "3 min", false, false),
        ("12", "Three Good Things", "Write down three things that went well today and reflect on your role in making them happen.", Happy, "5 min", false, false),
    ]
    .into_iter()
    .map(|(id, title, description, category, duration, favorite, recommended)| MicroHabit {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        duration: duration.to_string(),
        favorite,
        recommended,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InsertAt, MemoryRepository};

    fn browser() -> HabitBrowser {
        HabitBrowser::new(Box::new(MemoryRepository::with_items(
            default_habits(),
            InsertAt::Back,
        )))
    }

    fn titles(habits: &[MicroHabit]) -> Vec<&str> {
        habits.iter().map(|h| h.title.as_str()).collect()
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let habits = browser();
        assert_eq!(titles(&habits.list("BREATH", HabitTab::All)), [
            "Box Breathing",
            "Mindful Walking"
        ]);
        assert_eq!(habits.list("", HabitTab::All).len(), 12);
    }

    #[test]
    fn tabs_filter_favorites_and_recommended() {
        let habits = browser();
        assert_eq!(titles(&habits.list("", HabitTab::Favorites)), [
            "Box Breathing",
            "Celebration Dance"
        ]);
        assert_eq!(habits.list("", HabitTab::Recommended).len(), 3);
        assert_eq!(
            titles(&habits.list("walk", HabitTab::Recommended)),
            ["Mindful Walking"]
        );
    }

    #[test]
    fn toggle_favorite_moves_habit_between_tabs() {
        let mut habits = browser();
        assert!(habits.toggle_favorite("3").unwrap().favorite);
        assert_eq!(habits.list("", HabitTab::Favorites).len(), 3);
        assert!(!habits.toggle_favorite("3").unwrap().favorite);
        assert!(habits.toggle_favorite("99").is_err());
    }

    #[test]
    fn tab_parsing() {
        assert_eq!("".parse::<HabitTab>(), Ok(HabitTab::All));
        assert_eq!("favorites".parse::<HabitTab>(), Ok(HabitTab::Favorites));
        assert!("popular".parse::<HabitTab>().is_err());
    }
}
