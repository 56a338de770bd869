use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::config::table_name;
use super::filter::{FilterConverter, FilterTarget};
use super::query::EntityQuery;
use crate::backend::Page;
use crate::error::AppResult;
use crate::filter::RenderedFilter;
use crate::models::{NewUser, User, UserChanges};
use crate::parser::Pagination;
use crate::password::PasswordManager;

/// User row ready for insertion, password already hashed
#[derive(Debug, Clone)]
pub struct PreparedUser {
    pub user_id: Uuid,
    pub mail: String,
    pub firstname: String,
    pub lastname: String,
    pub pseudo: String,
    pub password_hash: String,
    pub active: bool,
    pub creation_date: DateTime<Utc>,
}

impl PreparedUser {
    pub fn to_user(&self) -> User {
        User {
            user_id: self.user_id,
            mail: self.mail.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            pseudo: self.pseudo.clone(),
            active: self.active,
            creation_date: self.creation_date,
        }
    }
}

/// Full replacement values for an existing user. The stored hash is kept
/// when `password_hash` is `None`.
#[derive(Debug, Clone)]
pub struct PreparedUserUpdate {
    pub mail: String,
    pub firstname: String,
    pub lastname: String,
    pub pseudo: String,
    pub active: bool,
    pub password_hash: Option<String>,
}

/// Database-specific adapter for user storage
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, tenant_id: u32, user: &PreparedUser) -> AppResult<()>;

    async fn select_user(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<User>>;

    async fn select_users(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<User>>;

    async fn update_user(
        &self,
        tenant_id: u32,
        id: Uuid,
        update: &PreparedUserUpdate,
    ) -> AppResult<bool>;

    /// Remove the user and its memberships atomically
    async fn delete_user(&self, tenant_id: u32, id: Uuid) -> AppResult<bool>;
}

/// Shared business logic for user writes
pub struct UserProcessor;

impl UserProcessor {
    pub fn prepare_insert(user: &NewUser, passwords: &PasswordManager) -> AppResult<PreparedUser> {
        Ok(PreparedUser {
            user_id: Uuid::new_v4(),
            mail: user.mail.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            pseudo: user.pseudo.clone(),
            password_hash: passwords.hash_password(&user.password)?,
            active: false,
            creation_date: crate::utils::current_timestamp(),
        })
    }

    /// Merge `changes` over `current`; only a supplied password is rehashed.
    pub fn prepare_update(
        current: &User,
        changes: &UserChanges,
        passwords: &PasswordManager,
    ) -> AppResult<PreparedUserUpdate> {
        let password_hash = changes
            .password
            .as_deref()
            .map(|password| passwords.hash_password(password))
            .transpose()?;

        Ok(PreparedUserUpdate {
            mail: changes.mail.clone().unwrap_or_else(|| current.mail.clone()),
            firstname: changes
                .firstname
                .clone()
                .unwrap_or_else(|| current.firstname.clone()),
            lastname: changes
                .lastname
                .clone()
                .unwrap_or_else(|| current.lastname.clone()),
            pseudo: changes.pseudo.clone().unwrap_or_else(|| current.pseudo.clone()),
            active: changes.active.unwrap_or(current.active),
            password_hash,
        })
    }
}

pub const USER_COLUMNS: &str =
    "u.user_id, u.mail, u.firstname, u.lastname, u.pseudo, u.active, u.creation_date";

pub fn user_query(tenant_id: u32) -> EntityQuery {
    EntityQuery {
        columns: USER_COLUMNS,
        from: format!("{} u", table_name("users", tenant_id)),
        target: FilterTarget::new("u", &[]),
        order_by: "u.creation_date, u.user_id",
    }
}

/// Placeholders 9 to 12 take the folded mail, firstname, lastname and pseudo.
pub fn insert_user_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    let placeholders: Vec<String> = (1..=12).map(|i| converter.placeholder(i)).collect();
    format!(
        "INSERT INTO {} (user_id, mail, firstname, lastname, pseudo, password, active, creation_date, \
         mail_folded, firstname_folded, lastname_folded, pseudo_folded) VALUES ({})",
        table_name("users", tenant_id),
        placeholders.join(", ")
    )
}

/// Placeholder 7 is the user id; 8 to 11 take the folded names.
pub fn update_user_sql(converter: &dyn FilterConverter, tenant_id: u32) -> String {
    format!(
        "UPDATE {} SET mail = {}, firstname = {}, lastname = {}, pseudo = {}, active = {}, \
         password = COALESCE({}, password), mail_folded = {}, firstname_folded = {}, \
         lastname_folded = {}, pseudo_folded = {} WHERE user_id = {}",
        table_name("users", tenant_id),
        converter.placeholder(1),
        converter.placeholder(2),
        converter.placeholder(3),
        converter.placeholder(4),
        converter.placeholder(5),
        converter.placeholder(6),
        converter.placeholder(8),
        converter.placeholder(9),
        converter.placeholder(10),
        converter.placeholder(11),
        converter.placeholder(7),
    )
}

/// Unified user operations using the adapter pattern
pub struct UnifiedUserOps<T: UserStore> {
    store: T,
    passwords: PasswordManager,
}

impl<T: UserStore> UnifiedUserOps<T> {
    pub fn new(store: T, passwords: PasswordManager) -> Self {
        Self { store, passwords }
    }

    pub async fn create_user(&self, tenant_id: u32, user: &NewUser) -> AppResult<User> {
        let prepared = UserProcessor::prepare_insert(user, &self.passwords)?;
        self.store.insert_user(tenant_id, &prepared).await?;
        Ok(prepared.to_user())
    }

    pub async fn find_user_by_id(&self, tenant_id: u32, id: Uuid) -> AppResult<Option<User>> {
        self.store.select_user(tenant_id, id).await
    }

    pub async fn find_users(
        &self,
        tenant_id: u32,
        filter: &RenderedFilter,
        page: &Pagination,
    ) -> AppResult<Page<User>> {
        self.store.select_users(tenant_id, filter, page).await
    }

    pub async fn update_user(
        &self,
        tenant_id: u32,
        id: Uuid,
        changes: &UserChanges,
    ) -> AppResult<Option<User>> {
        let Some(current) = self.store.select_user(tenant_id, id).await? else {
            return Ok(None);
        };

        let update = UserProcessor::prepare_update(&current, changes, &self.passwords)?;
        if !self.store.update_user(tenant_id, id, &update).await? {
            return Ok(None);
        }

        self.store.select_user(tenant_id, id).await
    }

    pub async fn delete_user(&self, tenant_id: u32, id: Uuid) -> AppResult<bool> {
        self.store.delete_user(tenant_id, id).await
    }
}
