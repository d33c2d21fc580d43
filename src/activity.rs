//! Audit trail of admin changes, newest first.

use crate::errors::EntryError;
use crate::models::{ActionType, Activity, ActivityTarget, Identity, Performer};
use crate::repository::Repository;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

pub struct ActivityLog {
    entries: Box<dyn Repository<Activity>>,
}

impl ActivityLog {
    pub fn new(entries: Box<dyn Repository<Activity>>) -> Self {
        Self { entries }
    }

    pub fn list(&self) -> Vec<Activity> {
        self.entries.list()
    }

    pub fn get(&self, id: &str) -> Result<Activity, EntryError> {
        self.entries
            .get(id)
            .ok_or_else(|| EntryError::NotFound(id.to_string()))
    }

    pub fn by_performer(&self, email: &str, limit: usize) -> Vec<Activity> {
        self.entries
            .list()
            .into_iter()
            .filter(|activity| activity.performed_by.email == email)
            .take(limit)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(
        &mut self,
        performer: &Identity,
        action_type: ActionType,
        target: ActivityTarget,
        items: Vec<String>,
    ) -> Activity {
        let activity = Activity {
            id: Uuid::new_v4().to_string(),
            action: describe(action_type, target, items.len()),
            detail: items.join(", "),
            action_type,
            target,
            performed_by: Performer {
                name: performer.name.clone(),
                email: performer.email.clone(),
            },
            reason: None,
            items,
            created_at: Utc::now(),
        };
        self.entries.add(activity.clone());
        debug!(activity_id = %activity.id, action = %activity.action, "admin activity recorded");
        activity
    }
}

fn describe(action_type: ActionType, target: ActivityTarget, count: usize) -> String {
    let verb = match action_type {
        ActionType::Add => "Added",
        ActionType::Update => "Updated",
        ActionType::Remove => "Removed",
    };
    let (one, many) = match target {
        ActivityTarget::Employees => ("employee", "employees"),
        ActivityTarget::MicroHabits => ("micro-habit", "micro-habits"),
        ActivityTarget::MoodImages => ("mood image", "mood images"),
        ActivityTarget::Profile => ("profile", "profile"),
    };
    format!("{verb} {}", if count == 1 { one } else { many })
}

/// Sample history shown on a fresh install, newest first.
pub fn demo_activity() -> Vec<Activity> {
    let jane = Performer {
        name: "Jane Smith".into(),
        email: "jane.admin@micromood.com".into(),
    };
    [
        (
            "1",
            "Uploaded new mood images",
            "Added 5 new mood images for the calm category",
            ActionType::Add,
            ActivityTarget::MoodImages,
            "Weekly content refresh for user engagement",
            &["calm-water.jpg", "meditation-pose.jpg", "focused-work.jpg", "nature-calm.jpg", "study-focus.jpg"][..],
            "2025-04-13T14:30:00Z",
        ),
        (
            "2",
            "Added new micro-habits",
            "Created 3 new micro-habits for morning routines",
            ActionType::Add,
            ActivityTarget::MicroHabits,
            "Expanding morning routine options based on user feedback",
            &["5-minute meditation", "Gratitude journaling", "Hydration reminder"][..],
            "2025-04-13T11:20:00Z",
        ),
        (
            "3",
            "Added new employees",
            "Onboarded 2 new content managers to the platform",
            ActionType::Add,
            ActivityTarget::Employees,
            "Team expansion for content management department",
            &["Sarah Johnson (content.sarah@micromood.com)", "Michael Chen (content.michael@micromood.com)"][..],
            "2025-04-12T16:15:00Z",
        ),
        (
            "4",
            "Removed employee",
            "Deactivated account for former content manager",
            ActionType::Remove,
            ActivityTarget::Employees,
            "Employment termination due to policy violations",
            &["Alex White (former.employee@micromood.com)"][..],
            "2025-04-10T15:45:00Z",
        ),
    ]
    .into_iter()
    .map(|(id, action, detail, action_type, target, reason, items, created_at)| Activity {
        id: id.to_string(),
        action: action.to_string(),
        detail: detail.to_string(),
        action_type,
        target,
        performed_by: jane.clone(),
        reason: Some(reason.to_string()),
        items: items.iter().map(|item| item.to_string()).collect(),
        created_at: DateTime::parse_from_rfc3339(created_at)
            .map(|date| date.with_timezone(&Utc))
            .unwrap_or_default(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::repository::{InsertAt, MemoryRepository};

    fn admin() -> Identity {
        Identity {
            id: "1".into(),
            email: "admin@micromood.com".into(),
            name: "Admin User".into(),
            role: Role::Admin,
        }
    }

    fn log() -> ActivityLog {
        ActivityLog::new(Box::new(MemoryRepository::with_items(
            demo_activity(),
            InsertAt::Front,
        )))
    }

    #[test]
    fn records_are_prepended_with_performer_and_items() {
        let mut log = log();
        let recorded = log.record(
            &admin(),
            ActionType::Add,
            ActivityTarget::Employees,
            vec!["Ann Lee (ann@micromood.com)".into()],
        );

        assert_eq!(recorded.action, "Added employee");
        assert_eq!(recorded.detail, "Ann Lee (ann@micromood.com)");
        assert_eq!(recorded.performed_by.email, "admin@micromood.com");
        assert_eq!(recorded.reason, None);
        assert_eq!(log.len(), 5);
        assert_eq!(log.list()[0].id, recorded.id);
    }

    #[test]
    fn action_names_follow_item_count() {
        assert_eq!(describe(ActionType::Remove, ActivityTarget::MoodImages, 2), "Removed mood images");
        assert_eq!(describe(ActionType::Update, ActivityTarget::MicroHabits, 1), "Updated micro-habit");
        assert_eq!(describe(ActionType::Update, ActivityTarget::Profile, 1), "Updated profile");
    }

    #[test]
    fn lookup_by_id_and_performer() {
        let mut log = log();
        assert_eq!(log.get("3").unwrap().items.len(), 2);
        assert_eq!(log.get("99"), Err(EntryError::NotFound("99".into())));

        log.record(&admin(), ActionType::Remove, ActivityTarget::MicroHabits, vec!["Quick Walk".into()]);
        assert_eq!(log.by_performer("admin@micromood.com", 10).len(), 1);
        assert_eq!(log.by_performer("jane.admin@micromood.com", 2).len(), 2);
    }
}
