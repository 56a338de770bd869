use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Accepted values for an event's `type`, in declaration order.
pub const EVENT_TYPES: &[&str] = &["party", "meal", "outing", "trip", "sport", "meeting", "other"];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Party,
    Meal,
    Outing,
    Trip,
    Sport,
    Meeting,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Party => "party",
            EventType::Meal => "meal",
            EventType::Outing => "outing",
            EventType::Trip => "trip",
            EventType::Sport => "sport",
            EventType::Meeting => "meeting",
            EventType::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "party" => Ok(EventType::Party),
            "meal" => Ok(EventType::Meal),
            "outing" => Ok(EventType::Outing),
            "trip" => Ok(EventType::Trip),
            "sport" => Ok(EventType::Sport),
            "meeting" => Ok(EventType::Meeting),
            "other" => Ok(EventType::Other),
            _ => Err(format!("unknown event type '{}'", s)),
        }
    }
}

/// A registered user. The password hash never leaves the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: Uuid,
    pub mail: String,
    pub firstname: String,
    pub lastname: String,
    pub pseudo: String,
    pub active: bool,
    pub creation_date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Group {
    pub group_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub creation_date: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub group_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

/// Membership of a user in a group, keyed by both ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroupUser {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub administrator: bool,
    pub join_date: DateTime<Utc>,
    pub user: UserSummary,
    pub group: GroupSummary,
}

impl GroupUser {
    /// Identifier echoed back by membership updates and deletions.
    pub fn display_id(group_id: Uuid, user_id: Uuid) -> String {
        format!("{{ group_id : {}, user_id : {} }}", group_id, user_id)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Event {
    pub event_id: Uuid,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub creation_date: DateTime<Utc>,
    pub event_date: DateTime<Utc>,
    pub creator_user: UserSummary,
    pub group: GroupSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventSummary {
    pub event_id: Uuid,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    pub task_id: Uuid,
    pub title: String,
    pub achieve: bool,
    pub user: UserSummary,
    pub event: EventSummary,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Comment {
    pub comment_id: Uuid,
    pub message: String,
    pub creation_date: DateTime<Utc>,
    pub edition_date: Option<DateTime<Utc>>,
    pub user: UserSummary,
    pub event: EventSummary,
}

// Validated inputs handed to the backend

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub mail: String,
    pub firstname: String,
    pub lastname: String,
    pub pseudo: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserChanges {
    pub mail: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub pseudo: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGroup {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupChanges {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MembershipChanges {
    pub administrator: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub group_id: Uuid,
    pub creator_user_id: Uuid,
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub location: String,
    pub event_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventChanges {
    pub event_type: Option<EventType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub achieve: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewComment {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentChanges {
    pub message: Option<String>,
    pub edition_date: Option<DateTime<Utc>>,
}

// Response envelopes

/// Page of records plus the total number of matches.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecordList<T> {
    pub count: i64,
    pub records: Vec<T>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub record: T,
}

impl<T> CreatedResponse<T> {
    pub fn new(entity: &str, record: T) -> Self {
        Self {
            status_code: 201,
            message: format!("The {} has been created successfully", entity),
            record,
        }
    }
}

/// Acknowledgement for updates and deletions.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ChangedResponse {
    pub status_code: u16,
    pub message: String,
    pub id: String,
}

impl ChangedResponse {
    pub fn updated(entity: &str, id: impl ToString) -> Self {
        Self {
            status_code: 200,
            message: format!("The {} has been updated successfully", entity),
            id: id.to_string(),
        }
    }

    pub fn deleted(entity: &str, id: impl ToString) -> Self {
        Self {
            status_code: 200,
            message: format!("The {} has been deleted successfully", entity),
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trips_through_strings() {
        for name in EVENT_TYPES {
            let parsed: EventType = name.parse().unwrap();
            assert_eq!(parsed.as_str(), *name);
        }
        assert!("rave".parse::<EventType>().is_err());
        assert_eq!(EventType::default(), EventType::Other);
    }

    #[test]
    fn test_event_serializes_type_field() {
        let now = Utc::now();
        let event = Event {
            event_id: Uuid::new_v4(),
            event_type: EventType::Meal,
            title: "Dinner".into(),
            description: "Pizza night".into(),
            location: "Grenoble".into(),
            creation_date: now,
            event_date: now,
            creator_user: UserSummary {
                user_id: Uuid::new_v4(),
                firstname: "Ann".into(),
                lastname: "Lee".into(),
            },
            group: GroupSummary {
                group_id: Uuid::new_v4(),
                title: "Friends".into(),
                description: None,
            },
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "meal");
        assert!(json.get("event_type").is_none());
        assert_eq!(json["creator_user"]["firstname"], "Ann");
    }

    #[test]
    fn test_envelopes() {
        let created = serde_json::to_value(CreatedResponse::new("group", 7)).unwrap();
        assert_eq!(created["statusCode"], 201);
        assert_eq!(created["message"], "The group has been created successfully");
        assert_eq!(created["record"], 7);

        let id = Uuid::new_v4();
        let deleted = serde_json::to_value(ChangedResponse::deleted("task", id)).unwrap();
        assert_eq!(deleted["message"], "The task has been deleted successfully");
        assert_eq!(deleted["id"], id.to_string());
    }

    #[test]
    fn test_group_user_display_id() {
        let g = Uuid::nil();
        let u = Uuid::new_v4();
        assert_eq!(
            GroupUser::display_id(g, u),
            format!("{{ group_id : {}, user_id : {} }}", g, u)
        );
    }
}
