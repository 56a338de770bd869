//! Filterable fields of every listed entity.

use super::rule::{EntityFilterSpec, FieldRule, FieldType, FilterField};
use crate::models::EVENT_TYPES;

const USER_ID: FilterField = FilterField::new("user_id", FieldType::Uuid);
const MAIL: FilterField = FilterField::new("mail", FieldType::Text);
const FIRSTNAME: FilterField = FilterField::new("firstname", FieldType::Text);
const LASTNAME: FilterField = FilterField::new("lastname", FieldType::Text);
const PSEUDO: FilterField = FilterField::new("pseudo", FieldType::Text);
const ACTIVE: FilterField = FilterField::new("active", FieldType::Bool);

const GROUP_ID: FilterField = FilterField::new("group_id", FieldType::Uuid);
const TITLE: FilterField = FilterField::new("title", FieldType::Text);
const DESCRIPTION: FilterField = FilterField::new("description", FieldType::Text);
const ADMINISTRATOR: FilterField = FilterField::new("administrator", FieldType::Bool);

const EVENT_ID: FilterField = FilterField::new("event_id", FieldType::Uuid);
const EVENT_TYPE: FilterField = FilterField::new("type", FieldType::Enum(EVENT_TYPES));
const LOCATION: FilterField = FilterField::new("location", FieldType::Text);
const CREATION_DATE: FilterField = FilterField::new("creation_date", FieldType::Timestamp);
const EVENT_DATE: FilterField = FilterField::new("event_date", FieldType::Timestamp);

const TASK_ID: FilterField = FilterField::new("task_id", FieldType::Uuid);
const ACHIEVE: FilterField = FilterField::new("achieve", FieldType::Bool);

const COMMENT_ID: FilterField = FilterField::new("comment_id", FieldType::Uuid);
const MESSAGE: FilterField = FilterField::new("message", FieldType::Text);
const EDITION_DATE: FilterField = FilterField::new("edition_date", FieldType::Timestamp);

// Reusable field sets
const BY_USER_ID: &[FilterField] = &[USER_ID];
const BY_GROUP_ID: &[FilterField] = &[GROUP_ID];
const BY_EVENT_ID: &[FilterField] = &[EVENT_ID];
const USER_NAMES: &[FilterField] = &[MAIL, FIRSTNAME, LASTNAME];
const USER_NAMES_AND_PSEUDO: &[FilterField] = &[MAIL, FIRSTNAME, LASTNAME, PSEUDO];
const TITLE_AND_DESCRIPTION: &[FilterField] = &[TITLE, DESCRIPTION];

const USER_EQUALS: &[FilterField] = &[USER_ID, ACTIVE];
const GROUP_USER_EQUALS: &[FilterField] = &[ADMINISTRATOR];
const EVENT_EQUALS: &[FilterField] = &[EVENT_ID, GROUP_ID, EVENT_TYPE];
const EVENT_CONTAINS: &[FilterField] = &[TITLE, DESCRIPTION, LOCATION, CREATION_DATE, EVENT_DATE];
const TASK_EQUALS: &[FilterField] = &[TASK_ID, EVENT_ID, ACHIEVE];
const TASK_CONTAINS: &[FilterField] = &[TITLE];
const COMMENT_EQUALS: &[FilterField] = &[COMMENT_ID, EVENT_ID];
const COMMENT_CONTAINS: &[FilterField] = &[MESSAGE, EDITION_DATE, CREATION_DATE];

pub static USER_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "User",
    rules: &[
        FieldRule::equals(USER_EQUALS),
        FieldRule::contains(USER_NAMES_AND_PSEUDO),
    ],
};

pub static GROUP_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "Group",
    rules: &[
        FieldRule::equals(BY_GROUP_ID),
        FieldRule::contains(TITLE_AND_DESCRIPTION),
    ],
};

pub static GROUP_USER_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "GroupUser",
    rules: &[
        FieldRule::equals(GROUP_USER_EQUALS),
        FieldRule::equals_on("user", BY_USER_ID),
        FieldRule::contains_on("user", USER_NAMES_AND_PSEUDO),
        FieldRule::equals_on("group", BY_GROUP_ID),
        FieldRule::contains_on("group", TITLE_AND_DESCRIPTION),
    ],
};

pub static EVENT_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "Event",
    rules: &[
        FieldRule::equals(EVENT_EQUALS),
        FieldRule::contains(EVENT_CONTAINS),
        FieldRule::equals_on("creator_user", BY_USER_ID),
        FieldRule::contains_on("creator_user", USER_NAMES),
        FieldRule::equals_on("group", BY_GROUP_ID),
        FieldRule::contains_on("group", TITLE_AND_DESCRIPTION),
    ],
};

pub static TASK_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "Task",
    rules: &[
        FieldRule::equals(TASK_EQUALS),
        FieldRule::contains(TASK_CONTAINS),
        FieldRule::equals_on("user", BY_USER_ID),
        FieldRule::contains_on("user", USER_NAMES),
        FieldRule::equals_on("event", BY_EVENT_ID),
        FieldRule::contains_on("event", TITLE_AND_DESCRIPTION),
    ],
};

pub static COMMENT_FILTER: EntityFilterSpec = EntityFilterSpec {
    entity: "Comment",
    rules: &[
        FieldRule::equals(COMMENT_EQUALS),
        FieldRule::contains(COMMENT_CONTAINS),
        FieldRule::equals_on("user", BY_USER_ID),
        FieldRule::contains_on("user", USER_NAMES),
        FieldRule::equals_on("event", BY_EVENT_ID),
        FieldRule::contains_on("event", TITLE_AND_DESCRIPTION),
    ],
};
