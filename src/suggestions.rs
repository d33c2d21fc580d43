use crate::models::Mood;
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub title: &'static str,
    pub description: &'static str,
}

impl Suggestion {
    pub fn text(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}

const fn suggestion(title: &'static str, description: &'static str) -> Suggestion {
    Suggestion { title, description }
}

const HAPPY: &[Suggestion] = &[
    suggestion(
        "Express Gratitude",
        "Write down three things you're grateful for to sustain positive feelings.",
    ),
    suggestion(
        "Share Joy",
        "Reach out to someone you care about to share your positive energy.",
    ),
];

const CALM: &[Suggestion] = &[
    suggestion(
        "Deep Breathing",
        "Take 5 minutes for deep breathing exercises to maintain your peaceful state.",
    ),
    suggestion(
        "Nature Walk",
        "Spend time outdoors to reinforce your sense of calm and groundedness.",
    ),
];

const SAD: &[Suggestion] = &[
    suggestion(
        "Gentle Movement",
        "Try some light stretching or a short walk to shift your energy.",
    ),
    suggestion(
        "Connect with Someone",
        "Reach out to a supportive friend or family member.",
    ),
];

const ANXIOUS: &[Suggestion] = &[
    suggestion(
        "5-4-3-2-1 Grounding",
        "Notice 5 things you see, 4 things you feel, 3 things you hear, 2 things you smell, and 1 thing you taste.",
    ),
    suggestion(
        "Limit Stimulation",
        "Reduce screen time and create a calm environment for the next hour.",
    ),
];

const ENERGETIC: &[Suggestion] = &[
    suggestion(
        "Channel Your Energy",
        "Tackle a creative project or exercise to use your energy productively.",
    ),
    suggestion(
        "Plan and Organize",
        "Use this energy to plan your week or organize a space.",
    ),
];

const LOVE: &[Suggestion] = &[
    suggestion(
        "Express Affection",
        "Send a thoughtful message to someone you care about.",
    ),
    suggestion(
        "Self-Care Ritual",
        "Do something nurturing for yourself that makes you feel loved.",
    ),
];

const NEUTRAL: &[Suggestion] = &[
    suggestion(
        "Try Something New",
        "This is a good state for exploring a new activity or interest.",
    ),
    suggestion(
        "Mindful Observation",
        "Take a few minutes to simply observe your surroundings without judgment.",
    ),
];

pub fn suggestions_for(mood: Mood) -> &'static [Suggestion] {
    match mood {
        Mood::Happy => HAPPY,
        Mood::Calm => CALM,
        Mood::Sad => SAD,
        Mood::Anxious => ANXIOUS,
        Mood::Energetic => ENERGETIC,
        Mood::Love => LOVE,
        Mood::Neutral => NEUTRAL,
    }
}

/// Source of the index used to pick one suggestion out of a mood's set.
pub trait SuggestionPicker: Send {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl SuggestionPicker for RandomPicker {
    fn pick(&mut self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Replays a fixed sequence of indices, wrapping around.
#[derive(Debug, Clone)]
pub struct SequencePicker {
    indices: Vec<usize>,
    next: usize,
}

impl SequencePicker {
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, next: 0 }
    }
}

impl SuggestionPicker for SequencePicker {
    fn pick(&mut self, len: usize) -> usize {
        if self.indices.is_empty() {
            return 0;
        }
        let index = self.indices[self.next % self.indices.len()];
        self.next += 1;
        index % len
    }
}

pub fn choose(mood: Mood, picker: &mut dyn SuggestionPicker) -> &'static Suggestion {
    let candidates = suggestions_for(mood);
    let index = picker.pick(candidates.len()).min(candidates.len() - 1);
    &candidates[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_has_suggestions() {
        for mood in Mood::ALL {
            assert!(!suggestions_for(mood).is_empty(), "{mood} has no suggestions");
        }
    }

    #[test]
    fn sequence_picker_is_deterministic() {
        let mut picker = SequencePicker::new(vec![1, 0]);
        assert_eq!(choose(Mood::Calm, &mut picker).title, "Nature Walk");
        assert_eq!(choose(Mood::Calm, &mut picker).title, "Deep Breathing");
        assert_eq!(choose(Mood::Calm, &mut picker).title, "Nature Walk");
    }

    #[test]
    fn random_picker_stays_in_bounds() {
        let mut picker = RandomPicker;
        for _ in 0..50 {
            let picked = choose(Mood::Anxious, &mut picker);
            assert!(ANXIOUS.contains(picked));
        }
    }

    #[test]
    fn suggestion_text_joins_title_and_description() {
        assert_eq!(
            LOVE[0].text(),
            "Express Affection: Send a thoughtful message to someone you care about."
        );
    }
}
