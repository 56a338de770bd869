//! Request bodies and their validation into backend inputs.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{
    CommentChanges, EventChanges, EventType, GroupChanges, MembershipChanges, NewComment,
    NewEvent, NewGroup, NewTask, NewUser, TaskChanges, UserChanges,
};
use crate::validation::Validator;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateUserDto {
    pub mail: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub pseudo: Option<String>,
    pub password: Option<String>,
}

impl CreateUserDto {
    pub fn validate(self) -> AppResult<NewUser> {
        let mut v = Validator::new();
        let mail = v.required("mail", self.mail);
        let firstname = v.required("firstname", self.firstname);
        let lastname = v.required("lastname", self.lastname);
        let pseudo = v.required("pseudo", self.pseudo);
        let password = v.required("password", self.password);

        check_user_fields(
            &mut v,
            mail.as_deref(),
            firstname.as_deref(),
            lastname.as_deref(),
            pseudo.as_deref(),
            password.as_deref(),
        );
        v.finish()?;

        Ok(NewUser {
            mail: mail.unwrap_or_default(),
            firstname: firstname.unwrap_or_default(),
            lastname: lastname.unwrap_or_default(),
            pseudo: pseudo.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateUserDto {
    pub mail: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub pseudo: Option<String>,
    pub password: Option<String>,
    pub active: Option<bool>,
}

impl UpdateUserDto {
    pub fn validate(self) -> AppResult<UserChanges> {
        let mut v = Validator::new();
        check_user_fields(
            &mut v,
            self.mail.as_deref(),
            self.firstname.as_deref(),
            self.lastname.as_deref(),
            self.pseudo.as_deref(),
            self.password.as_deref(),
        );
        v.finish()?;

        Ok(UserChanges {
            mail: self.mail,
            firstname: self.firstname,
            lastname: self.lastname,
            pseudo: self.pseudo,
            password: self.password,
            active: self.active,
        })
    }
}

fn check_user_fields(
    v: &mut Validator,
    mail: Option<&str>,
    firstname: Option<&str>,
    lastname: Option<&str>,
    pseudo: Option<&str>,
    password: Option<&str>,
) {
    v.email("mail", mail);
    v.length("mail", mail, 1, 255);
    v.length("firstname", firstname, 1, 50);
    v.length("lastname", lastname, 1, 50);
    v.length("pseudo", pseudo, 1, 50);
    v.length("password", password, 1, 255);
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateGroupDto {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl CreateGroupDto {
    pub fn validate(self) -> AppResult<NewGroup> {
        let mut v = Validator::new();
        let title = v.required("title", self.title);
        v.length("title", title.as_deref(), 1, 100);
        v.length("description", self.description.as_deref(), 1, 255);
        v.finish()?;

        Ok(NewGroup {
            title: title.unwrap_or_default(),
            description: self.description,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateGroupDto {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateGroupDto {
    pub fn validate(self) -> AppResult<GroupChanges> {
        let mut v = Validator::new();
        v.length("title", self.title.as_deref(), 1, 100);
        v.length("description", self.description.as_deref(), 1, 255);
        v.finish()?;

        Ok(GroupChanges {
            title: self.title,
            description: self.description,
        })
    }
}

/// Body of both membership creation and update.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct GroupUserDto {
    pub administrator: Option<bool>,
}

impl GroupUserDto {
    pub fn validate(self) -> AppResult<MembershipChanges> {
        Ok(MembershipChanges {
            administrator: self.administrator,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateEventDto {
    pub group_id: Option<String>,
    pub creator_user_id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

impl CreateEventDto {
    pub fn validate(self) -> AppResult<NewEvent> {
        let mut v = Validator::new();
        let group_id = v.required("group_id", self.group_id);
        let group_id = v.uuid("group_id", group_id.as_deref());
        let creator_user_id = v.required("creator_user_id", self.creator_user_id);
        let creator_user_id = v.uuid("creator_user_id", creator_user_id.as_deref());
        let title = v.required("title", self.title);
        let description = v.required("description", self.description);
        let location = v.required("location", self.location);
        let event_date = v.required("event_date", self.event_date);

        v.length("title", title.as_deref(), 1, 100);
        v.length("description", description.as_deref(), 1, 250);
        v.length("location", location.as_deref(), 1, 255);
        v.finish()?;

        Ok(NewEvent {
            group_id: group_id.unwrap_or_default(),
            creator_user_id: creator_user_id.unwrap_or_default(),
            event_type: self.event_type.unwrap_or_default(),
            title: title.unwrap_or_default(),
            description: description.unwrap_or_default(),
            location: location.unwrap_or_default(),
            event_date: event_date.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateEventDto {
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

impl UpdateEventDto {
    pub fn validate(self) -> AppResult<EventChanges> {
        let mut v = Validator::new();
        v.length("title", self.title.as_deref(), 1, 100);
        v.length("description", self.description.as_deref(), 1, 250);
        v.length("location", self.location.as_deref(), 1, 255);
        v.finish()?;

        Ok(EventChanges {
            event_type: self.event_type,
            title: self.title,
            description: self.description,
            location: self.location,
            event_date: self.event_date,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskDto {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
    pub title: Option<String>,
}

impl CreateTaskDto {
    pub fn validate(self) -> AppResult<NewTask> {
        let mut v = Validator::new();
        let event_id = v.required("event_id", self.event_id);
        let event_id = v.uuid("event_id", event_id.as_deref());
        let user_id = v.required("user_id", self.user_id);
        let user_id = v.uuid("user_id", user_id.as_deref());
        let title = v.required("title", self.title);
        v.length("title", title.as_deref(), 1, 100);
        v.finish()?;

        Ok(NewTask {
            event_id: event_id.unwrap_or_default(),
            user_id: user_id.unwrap_or_default(),
            title: title.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskDto {
    pub title: Option<String>,
    pub achieve: Option<bool>,
}

impl UpdateTaskDto {
    pub fn validate(self) -> AppResult<TaskChanges> {
        let mut v = Validator::new();
        v.length("title", self.title.as_deref(), 1, 100);
        v.finish()?;

        Ok(TaskChanges {
            title: self.title,
            achieve: self.achieve,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentDto {
    pub event_id: Option<String>,
    pub user_id: Option<String>,
    pub message: Option<String>,
}

impl CreateCommentDto {
    pub fn validate(self) -> AppResult<NewComment> {
        let mut v = Validator::new();
        let event_id = v.required("event_id", self.event_id);
        let event_id = v.uuid("event_id", event_id.as_deref());
        let user_id = v.required("user_id", self.user_id);
        let user_id = v.uuid("user_id", user_id.as_deref());
        let message = v.required("message", self.message);
        v.length("message", message.as_deref(), 1, 100);
        v.finish()?;

        Ok(NewComment {
            event_id: event_id.unwrap_or_default(),
            user_id: user_id.unwrap_or_default(),
            message: message.unwrap_or_default(),
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentDto {
    pub message: Option<String>,
    pub edition_date: Option<DateTime<Utc>>,
}

impl UpdateCommentDto {
    pub fn validate(self) -> AppResult<CommentChanges> {
        let mut v = Validator::new();
        v.length("message", self.message.as_deref(), 1, 100);
        v.finish()?;

        Ok(CommentChanges {
            message: self.message,
            edition_date: self.edition_date,
        })
    }
}
