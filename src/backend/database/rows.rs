//! Mapping of joined result rows to API records.
//!
//! Dialects only differ in how ids and flags are decoded, so each one
//! implements [`RecordRow`] and the mapping below is shared.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    Comment, Event, EventSummary, EventType, Group, GroupSummary, GroupUser, Task, User,
    UserSummary,
};

/// Typed column access over a dialect's row type.
pub trait RecordRow {
    fn uuid(&self, column: &str) -> AppResult<Uuid>;
    fn text(&self, column: &str) -> AppResult<String>;
    fn opt_text(&self, column: &str) -> AppResult<Option<String>>;
    fn flag(&self, column: &str) -> AppResult<bool>;
    fn timestamp(&self, column: &str) -> AppResult<DateTime<Utc>>;
    fn opt_timestamp(&self, column: &str) -> AppResult<Option<DateTime<Utc>>>;
}

pub fn user_from_row<R: RecordRow>(row: &R) -> AppResult<User> {
    Ok(User {
        user_id: row.uuid("user_id")?,
        mail: row.text("mail")?,
        firstname: row.text("firstname")?,
        lastname: row.text("lastname")?,
        pseudo: row.text("pseudo")?,
        active: row.flag("active")?,
        creation_date: row.timestamp("creation_date")?,
    })
}

pub fn group_from_row<R: RecordRow>(row: &R) -> AppResult<Group> {
    Ok(Group {
        group_id: row.uuid("group_id")?,
        title: row.text("title")?,
        description: row.opt_text("description")?,
        creation_date: row.timestamp("creation_date")?,
    })
}

fn user_summary<R: RecordRow>(row: &R, id_column: &str) -> AppResult<UserSummary> {
    Ok(UserSummary {
        user_id: row.uuid(id_column)?,
        firstname: row.text("user_firstname")?,
        lastname: row.text("user_lastname")?,
    })
}

fn group_summary<R: RecordRow>(row: &R) -> AppResult<GroupSummary> {
    Ok(GroupSummary {
        group_id: row.uuid("group_id")?,
        title: row.text("group_title")?,
        description: row.opt_text("group_description")?,
    })
}

fn event_summary<R: RecordRow>(row: &R) -> AppResult<EventSummary> {
    Ok(EventSummary {
        event_id: row.uuid("event_id")?,
        title: row.text("event_title")?,
        description: row.text("event_description")?,
    })
}

pub fn membership_from_row<R: RecordRow>(row: &R) -> AppResult<GroupUser> {
    Ok(GroupUser {
        group_id: row.uuid("group_id")?,
        user_id: row.uuid("user_id")?,
        administrator: row.flag("administrator")?,
        join_date: row.timestamp("join_date")?,
        user: user_summary(row, "user_id")?,
        group: group_summary(row)?,
    })
}

pub fn event_from_row<R: RecordRow>(row: &R) -> AppResult<Event> {
    let raw_type = row.text("type")?;
    let event_type = raw_type
        .parse::<EventType>()
        .map_err(|_| AppError::Database(format!("Unknown event type in storage: {}", raw_type)))?;

    Ok(Event {
        event_id: row.uuid("event_id")?,
        event_type,
        title: row.text("title")?,
        description: row.text("description")?,
        location: row.text("location")?,
        creation_date: row.timestamp("creation_date")?,
        event_date: row.timestamp("event_date")?,
        creator_user: user_summary(row, "creator_user_id")?,
        group: group_summary(row)?,
    })
}

pub fn task_from_row<R: RecordRow>(row: &R) -> AppResult<Task> {
    Ok(Task {
        task_id: row.uuid("task_id")?,
        title: row.text("title")?,
        achieve: row.flag("achieve")?,
        user: user_summary(row, "user_id")?,
        event: event_summary(row)?,
    })
}

pub fn comment_from_row<R: RecordRow>(row: &R) -> AppResult<Comment> {
    Ok(Comment {
        comment_id: row.uuid("comment_id")?,
        message: row.text("message")?,
        creation_date: row.timestamp("creation_date")?,
        edition_date: row.opt_timestamp("edition_date")?,
        user: user_summary(row, "user_id")?,
        event: event_summary(row)?,
    })
}
