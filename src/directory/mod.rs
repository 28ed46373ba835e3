//! Remote user directory: resource model and the client seam.
//!
//! The dashboard only depends on [`UserDirectory`]; [`HttpDirectory`] is the
//! REST implementation used by the binary.
pub mod http;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

use crate::error::Result;

pub use http::{DEFAULT_ENDPOINT, HttpDirectory};

/// Server-assigned user identifier.
///
/// Directories disagree on the JSON type, so both numbers and strings are
/// accepted and sent back in the form they arrived in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId::Number(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::Text(s.to_string())
    }
}

/// A user as held in the dashboard list.
///
/// Fields the dashboard does not know about are kept in `extra` so that an
/// edit sends back the full representation the server gave us.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::Number(id),
            name: name.into(),
            email: email.into(),
            department: None,
            extra: Map::new(),
        }
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    /// Department as shown in the table: missing or empty reads "N/A".
    pub fn department_label(&self) -> &str {
        match self.department.as_deref() {
            Some(d) if !d.is_empty() => d,
            _ => "N/A",
        }
    }
}

/// Body returned by create and update calls. The server may omit `id`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Turn the server representation into a list entry carrying `id`.
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            department: self.department,
            extra: self.extra,
        }
    }
}

/// Editable fields of [`UserForm`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Department,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Department => "Department",
        }
    }
}

/// Why a form cannot be submitted yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormIssue {
    MissingName,
    MissingEmail,
    InvalidEmail,
}

impl FormIssue {
    pub fn message(self) -> &'static str {
        match self {
            FormIssue::MissingName => "Name is required.",
            FormIssue::MissingEmail => "Email is required.",
            FormIssue::InvalidEmail => "Please enter a valid email address.",
        }
    }
}

/// Add/edit form contents, also the JSON body of create and update calls.
///
/// `id` is `None` while creating and is serialized as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    pub department: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: Some(user.id.clone()),
            name: user.name.clone(),
            email: user.email.clone(),
            department: user.department.clone().unwrap_or_default(),
            extra: user.extra.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Department => &self.department,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Department => self.department = value,
        }
    }

    /// Required-field and email-shape checks done before any request is sent.
    pub fn validate(&self) -> std::result::Result<(), FormIssue> {
        if self.name.is_empty() {
            return Err(FormIssue::MissingName);
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormIssue::MissingEmail);
        }
        if !is_email_shaped(email) {
            return Err(FormIssue::InvalidEmail);
        }
        Ok(())
    }
}

/// Same shape an HTML `type=email` input accepts: `local@domain`, where the
/// local part uses the permitted ASCII set and the domain is one or more
/// dot-separated labels. A dot is not required (`a@b` passes).
pub fn is_email_shaped(s: &str) -> bool {
    const LOCAL_PUNCT: &str = ".!#$%&'*+/=?^_`{|}~-";
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || LOCAL_PUNCT.contains(c))
    {
        return false;
    }
    !domain.is_empty() && domain.split('.').all(is_domain_label)
}

/// 1 to 63 alphanumerics or hyphens, not starting or ending with a hyphen.
fn is_domain_label(label: &str) -> bool {
    (1..=63).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// The verbs the dashboard needs from the remote directory.
pub trait UserDirectory: Send + Sync {
    /// Fetch the whole collection.
    fn list(&self) -> Result<Vec<User>>;
    /// Create a user from `form`; returns the server's representation.
    fn create(&self, form: &UserForm) -> Result<UserRecord>;
    /// Replace user `id` with `form`; returns the server's representation.
    fn update(&self, id: &UserId, form: &UserForm) -> Result<UserRecord>;
    fn delete(&self, id: &UserId) -> Result<()>;
}
