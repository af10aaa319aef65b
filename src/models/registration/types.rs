use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::errors::AppError;

pub const INVALID_ATTENDANCE_TYPE: &str = "Invalid attendance type";

/// Which list a member was submitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceType {
    Attending,
    Might,
    Cant,
}

impl AttendanceType {
    pub const ALL: [AttendanceType; 3] =
        [AttendanceType::Attending, AttendanceType::Might, AttendanceType::Cant];

    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceType::Attending => "attending",
            AttendanceType::Might => "might",
            AttendanceType::Cant => "cant",
        }
    }
}

impl FromStr for AttendanceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttendanceType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::invalid(INVALID_ATTENDANCE_TYPE))
    }
}

/// Body of `POST /api/register` as it arrives. Members stay untyped JSON
/// until `validate_request` turns the whole thing into a `NewRegistration`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub event_id: Value,
    #[serde(default)]
    pub attending: Option<Vec<Value>>,
    #[serde(default)]
    pub might: Option<Vec<Value>>,
    #[serde(default)]
    pub cant: Option<Vec<Value>>,
}

impl RegistrationRequest {
    pub fn attending(&self) -> &[Value] {
        self.attending.as_deref().unwrap_or_default()
    }

    pub fn might(&self) -> &[Value] {
        self.might.as_deref().unwrap_or_default()
    }

    pub fn cant(&self) -> &[Value] {
        self.cant.as_deref().unwrap_or_default()
    }
}

/// A named person with a phone number, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub phone: String,
}

/// A member tagged with the list it came from.
#[derive(Debug, Clone, Copy)]
pub struct TaggedMember<'a> {
    pub attendance_type: AttendanceType,
    pub member: &'a Member,
}

/// A validated submission, ready for the writer.
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub event_id: i64,
    pub attending: Vec<Member>,
    pub might: Vec<Member>,
    pub cant: Vec<Member>,
}

impl NewRegistration {
    /// All members in insertion order: attending, then might, then cant.
    pub fn members(&self) -> impl Iterator<Item = TaggedMember<'_>> {
        tagged(&self.attending, AttendanceType::Attending)
            .chain(tagged(&self.might, AttendanceType::Might))
            .chain(tagged(&self.cant, AttendanceType::Cant))
    }

    pub fn attending_count(&self) -> i32 {
        self.attending.len() as i32
    }

    pub fn might_attend_count(&self) -> i32 {
        self.might.len() as i32
    }

    pub fn cant_attend(&self) -> bool {
        !self.cant.is_empty()
    }
}

fn tagged(
    list: &[Member],
    attendance_type: AttendanceType,
) -> impl Iterator<Item = TaggedMember<'_>> {
    list.iter()
        .map(move |member| TaggedMember { attendance_type, member })
}

/// Registration header row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub attending_count: i32,
    pub might_attend_count: i32,
    pub cant_attend: bool,
    pub created_at: DateTime<Utc>,
}

/// Member row as returned by the detail lookup.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RegistrationMember {
    pub attendance_type: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDetail {
    pub registration: Registration,
    pub members: Vec<RegistrationMember>,
}

/// Success body of `POST /api/register`.
#[derive(Debug, Serialize)]
pub struct RegistrationCreated {
    pub message: &'static str,
    pub registration_id: i64,
}
