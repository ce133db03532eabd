//! Domain models for user accounts and their prayer activity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of entries kept in a recent-prayers list.
pub const RECENT_PRAYERS_LIMIT: usize = 10;

/// Account role stored on the profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Reminder notification preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderSettings {
    pub morning_reminder: bool,
    pub evening_reminder: bool,
    /// Local wall-clock time as "HH:MM".
    pub reminder_time: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            morning_reminder: false,
            evening_reminder: false,
            reminder_time: "08:00".to_string(),
        }
    }
}

/// A user profile document.
///
/// Created on sign-up and keyed by the authenticated-user id. The client
/// mutates bookmarks and preferences; it never deletes the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub display_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// Bookmarked prayer ids, in bookmark order.
    #[serde(default)]
    pub bookmarks: Vec<String>,
    #[serde(default)]
    pub preferences: ReminderSettings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Set-style add: a prayer id appears at most once, appended at the end.
    pub fn add_bookmark(&mut self, prayer_id: &str) {
        if !self.bookmarks.iter().any(|id| id == prayer_id) {
            self.bookmarks.push(prayer_id.to_string());
        }
    }

    /// Set-style remove: unrelated ids keep their relative order.
    pub fn remove_bookmark(&mut self, prayer_id: &str) {
        self.bookmarks.retain(|id| id != prayer_id);
    }

    pub fn is_bookmarked(&self, prayer_id: &str) -> bool {
        self.bookmarks.iter().any(|id| id == prayer_id)
    }
}

/// Compute an updated recent-prayers list: most recent first, no
/// duplicates, capped at [`RECENT_PRAYERS_LIMIT`].
pub fn push_recent(recent: &[String], prayer_id: &str) -> Vec<String> {
    let mut updated = Vec::with_capacity(RECENT_PRAYERS_LIMIT);
    updated.push(prayer_id.to_string());
    updated.extend(
        recent
            .iter()
            .filter(|id| id.as_str() != prayer_id)
            .cloned(),
    );
    updated.truncate(RECENT_PRAYERS_LIMIT);
    updated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "user-1".to_string(),
            display_name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            first_name: None,
            last_name: None,
            student_number: None,
            role: UserRole::User,
            bookmarks: vec!["angelus".to_string(), "st-michael".to_string()],
            preferences: ReminderSettings::default(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_bookmark_round_trip_restores_original_list() {
        let mut p = profile();
        let before = p.bookmarks.clone();

        p.add_bookmark("guardian-angel");
        assert!(p.is_bookmarked("guardian-angel"));

        p.remove_bookmark("guardian-angel");
        assert_eq!(p.bookmarks, before);
    }

    #[test]
    fn test_add_bookmark_is_idempotent() {
        let mut p = profile();
        p.add_bookmark("angelus");
        p.add_bookmark("angelus");
        assert_eq!(p.bookmarks.iter().filter(|id| *id == "angelus").count(), 1);
    }

    #[test]
    fn test_push_recent_dedups_and_caps() {
        let mut recent: Vec<String> = Vec::new();

        // Same id three times in a row collapses to one entry.
        for _ in 0..3 {
            recent = push_recent(&recent, "angelus");
        }
        assert_eq!(recent, vec!["angelus".to_string()]);

        // Twelve distinct ids push the list past the cap.
        for i in 0..12 {
            recent = push_recent(&recent, &format!("prayer-{i}"));
        }
        assert_eq!(recent.len(), RECENT_PRAYERS_LIMIT);
        assert_eq!(recent[0], "prayer-11");
        assert!(!recent.iter().any(|id| id == "angelus"));
    }

    #[test]
    fn test_push_recent_moves_existing_to_front() {
        let recent = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let updated = push_recent(&recent, "c");
        assert_eq!(updated, vec!["c".to_string(), "a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_default_reminder_time() {
        assert_eq!(ReminderSettings::default().reminder_time, "08:00");
    }
}
