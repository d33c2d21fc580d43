use crate::errors::EntryError;
use crate::models::{Mood, MoodLogEntry};
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightRange {
    Week,
    #[default]
    Month,
    All,
}

impl InsightRange {
    fn days(self) -> Option<i64> {
        match self {
            InsightRange::Week => Some(7),
            InsightRange::Month => Some(30),
            InsightRange::All => None,
        }
    }
}

impl FromStr for InsightRange {
    type Err = EntryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "week" => Ok(InsightRange::Week),
            "" | "month" => Ok(InsightRange::Month),
            "all" => Ok(InsightRange::All),
            other => Err(EntryError::Invalid(format!("unknown range '{other}'"))),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct DailyPoint {
    pub date: String,
    pub entries: usize,
    pub average_score: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeekdayPoint {
    pub day: String,
    pub entries: usize,
    pub average_score: f64,
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub range: InsightRange,
    pub total_entries: usize,
    pub distribution: Vec<MoodShare>,
    pub predominant_mood: Option<Mood>,
    pub last_7_days: Vec<DailyPoint>,
    pub weekday_averages: Vec<WeekdayPoint>,
    pub lowest_day: Option<String>,
}

pub fn build_insights(entries: &[MoodLogEntry], range: InsightRange) -> InsightsResponse {
    build_insights_at(Utc::now().date_naive(), entries, range)
}

pub fn build_insights_at(
    today: NaiveDate,
    entries: &[MoodLogEntry],
    range: InsightRange,
) -> InsightsResponse {
    let in_range: Vec<&MoodLogEntry> = entries
        .iter()
        .filter(|entry| {
            let date = entry.created_at.date_naive();
            date <= today
                && range
                    .days()
                    .is_none_or(|days| date > today - Duration::days(days))
        })
        .collect();
    let total = in_range.len();

    let mut distribution = Vec::new();
    for mood in Mood::ALL {
        let count = in_range.iter().filter(|entry| entry.mood == mood).count();
        if count > 0 {
            distribution.push(MoodShare {
                mood,
                count,
                percentage: ((count as f64 / total as f64) * 100.0).round() as u32,
            });
        }
    }

    let mut predominant_mood = None;
    let mut best = 0;
    for share in &distribution {
        if share.count > best {
            best = share.count;
            predominant_mood = Some(share.mood);
        }
    }

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let scores: Vec<f64> = entries
            .iter()
            .filter(|entry| entry.created_at.date_naive() == date)
            .map(|entry| entry.mood.score())
            .collect();
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            entries: scores.len(),
            average_score: average(&scores),
        });
    }

    let mut weekday_averages = Vec::new();
    for day in WEEK {
        let scores: Vec<f64> = in_range
            .iter()
            .filter(|entry| entry.created_at.weekday() == day)
            .map(|entry| entry.mood.score())
            .collect();
        if let Some(average_score) = average(&scores) {
            weekday_averages.push(WeekdayPoint {
                day: weekday_name(day).to_string(),
                entries: scores.len(),
                average_score,
            });
        }
    }

    let lowest_day = weekday_averages
        .iter()
        .min_by(|a, b| a.average_score.total_cmp(&b.average_score))
        .map(|point| point.day.clone());

    InsightsResponse {
        range,
        total_entries: total,
        distribution,
        predominant_mood,
        last_7_days,
        weekday_averages,
        lowest_day,
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(mood: Mood, date: NaiveDate) -> MoodLogEntry {
        MoodLogEntry {
            id: format!("{mood}-{date}"),
            mood,
            context: None,
            suggestion: None,
            created_at: Utc
                .with_ymd_and_hms(date.year(), date.month(), date.day(), 9, 0, 0)
                .unwrap(),
        }
    }

    // 2026-01-05 is a Monday.
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    #[test]
    fn empty_log_has_no_predominant_mood() {
        let insights = build_insights_at(today(), &[], InsightRange::Month);
        assert_eq!(insights.total_entries, 0);
        assert!(insights.distribution.is_empty());
        assert_eq!(insights.predominant_mood, None);
        assert_eq!(insights.last_7_days.len(), 7);
        assert_eq!(insights.lowest_day, None);
    }

    #[test]
    fn distribution_rounds_percentages() {
        let day = today();
        let entries = vec![
            entry(Mood::Happy, day),
            entry(Mood::Happy, day),
            entry(Mood::Sad, day - Duration::days(1)),
        ];
        let insights = build_insights_at(day, &entries, InsightRange::Week);
        assert_eq!(insights.distribution, vec![
            MoodShare { mood: Mood::Happy, count: 2, percentage: 67 },
            MoodShare { mood: Mood::Sad, count: 1, percentage: 33 },
        ]);
        assert_eq!(insights.predominant_mood, Some(Mood::Happy));
    }

    #[test]
    fn ties_resolve_in_enumeration_order() {
        let day = today();
        let entries = vec![entry(Mood::Sad, day), entry(Mood::Calm, day)];
        let insights = build_insights_at(day, &entries, InsightRange::All);
        assert_eq!(insights.predominant_mood, Some(Mood::Calm));
    }

    #[test]
    fn range_excludes_older_entries() {
        let day = today();
        let entries = vec![entry(Mood::Happy, day), entry(Mood::Sad, day - Duration::days(10))];
        assert_eq!(build_insights_at(day, &entries, InsightRange::Week).total_entries, 1);
        assert_eq!(build_insights_at(day, &entries, InsightRange::Month).total_entries, 2);
        assert_eq!(build_insights_at(day, &entries, InsightRange::All).total_entries, 2);
    }

    #[test]
    fn last_7_days_includes_each_day() {
        let day = today();
        let two_days_ago = day - Duration::days(2);
        let entries = vec![entry(Mood::Happy, two_days_ago), entry(Mood::Sad, two_days_ago)];

        let insights = build_insights_at(day, &entries, InsightRange::Week);
        let point = insights
            .last_7_days
            .iter()
            .find(|point| point.date == two_days_ago.to_string())
            .expect("missing day");
        assert_eq!(point.entries, 2);
        assert_eq!(point.average_score, Some(50.0));
        assert_eq!(insights.last_7_days[6].date, day.to_string());
        assert_eq!(insights.last_7_days[6].average_score, None);
    }

    #[test]
    fn lowest_weekday_is_reported() {
        let monday = today();
        let entries = vec![
            entry(Mood::Sad, monday),
            entry(Mood::Happy, monday - Duration::days(3)),
        ];
        let insights = build_insights_at(monday, &entries, InsightRange::Week);
        assert_eq!(insights.weekday_averages.len(), 2);
        assert_eq!(insights.weekday_averages[0].day, "Monday");
        assert_eq!(insights.lowest_day.as_deref(), Some("Monday"));
    }

    #[test]
    fn range_parsing() {
        assert_eq!("".parse::<InsightRange>(), Ok(InsightRange::Month));
        assert_eq!("week".parse::<InsightRange>(), Ok(InsightRange::Week));
        assert!("year".parse::<InsightRange>().is_err());
    }
}
