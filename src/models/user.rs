//! User records and drafts.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a record.
///
/// The placeholder API hands out integers; other collections use strings.
/// Both decode from their natural JSON form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(u64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Int(n) => write!(f, "{n}"),
            UserId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl std::str::FromStr for UserId {
    type Err = String;

    /// Digits parse as [`UserId::Int`], anything else non-blank as [`UserId::Text`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("user id must not be empty".to_string());
        }
        Ok(s.parse::<u64>()
            .map(UserId::Int)
            .unwrap_or_else(|_| UserId::Text(s.to_string())))
    }
}

impl UserId {
    /// Whether `other` names the same record. Compares the textual form, so
    /// `Int(7)` matches `Text("7")` as typed on the command line.
    pub fn matches(&self, other: &UserId) -> bool {
        match (self, other) {
            (UserId::Int(a), UserId::Int(b)) => a == b,
            (UserId::Text(a), UserId::Text(b)) => a == b,
            (UserId::Int(n), UserId::Text(s)) | (UserId::Text(s), UserId::Int(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId::Int(n)
    }
}

/// Gender shown in the listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(format!("unknown gender: '{other}'. Supported: male, female")),
        }
    }
}

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub gender: Gender,
}

impl UserRecord {
    /// Detached copy of this record's editable fields.
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            gender: self.gender,
        }
    }
}

/// Record fields without an id: the payload of a create, or an edit in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub gender: Gender,
}

impl UserDraft {
    /// Draft with the three required fields filled in.
    pub fn new(
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Attach an id, producing a record.
    pub fn into_record(self, id: UserId) -> UserRecord {
        UserRecord {
            id,
            name: self.name,
            username: self.username,
            email: self.email,
            phone: self.phone,
            website: self.website,
            gender: self.gender,
        }
    }

    /// Names of required fields that are blank.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            (Field::Name, &self.name),
            (Field::Username, &self.username),
            (Field::Email, &self.email),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field.as_str())
        .collect()
    }

    /// Set one field from its textual form.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), String> {
        match field {
            Field::Name => self.name = value.to_string(),
            Field::Username => self.username = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::Website => self.website = value.to_string(),
            Field::Gender => self.gender = value.parse()?,
        }
        Ok(())
    }
}

/// An editable field of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Username,
    Email,
    Phone,
    Website,
    Gender,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Username,
        Field::Email,
        Field::Phone,
        Field::Website,
        Field::Gender,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Username => "username",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Website => "website",
            Field::Gender => "gender",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Field::ALL
            .into_iter()
            .find(|f| f.as_str() == lower)
            .ok_or_else(|| {
                format!("unknown field: '{s}'. Supported: name, username, email, phone, website, gender")
            })
    }
}
