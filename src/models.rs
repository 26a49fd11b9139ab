use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    classify::{Gender, Side},
    filters::FilterSettings,
    palette::EventTypeHue,
    session::Session,
};

/// Person record as delivered by the family-map service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(rename = "personID")]
    pub person_id: String,
    #[serde(default)]
    pub associated_username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    #[serde(rename = "fatherID", default)]
    pub father_id: Option<String>,
    #[serde(rename = "motherID", default)]
    pub mother_id: Option<String>,
    #[serde(rename = "spouseID", default)]
    pub spouse_id: Option<String>,
}

/// Event record as delivered by the family-map service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(default)]
    pub associated_username: Option<String>,
    #[serde(rename = "personID")]
    pub person_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub city: String,
    pub event_type: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonView {
    #[serde(rename = "personID")]
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub gender: Gender,
    pub gender_label: &'static str,
    pub side: Side,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    #[serde(rename = "eventID")]
    pub event_id: String,
    #[serde(rename = "personID")]
    pub person_id: String,
    pub person_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub city: String,
    pub event_type: String,
    pub year: i32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Father,
    Mother,
    Spouse,
    Child,
}

impl Relation {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Spouse => "Spouse",
            Self::Child => "Child",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberView {
    pub relation: Relation,
    pub title: &'static str,
    pub person: PersonView,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonDetail {
    pub person: PersonView,
    pub life_events: Vec<EventView>,
    pub family: Vec<FamilyMemberView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub people: Vec<PersonView>,
    pub events: Vec<EventView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionRequest {
    pub auth_token: String,
    #[serde(rename = "personID")]
    pub person_id: String,
    pub persons: Vec<PersonRecord>,
    pub events: Vec<EventRecord>,
    #[serde(default)]
    pub filters: Option<FilterSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceFamilyRequest {
    pub persons: Vec<PersonRecord>,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(rename = "personID")]
    pub person_id: String,
    pub first_name: String,
    pub last_name: String,
    pub person_count: usize,
    pub event_count: usize,
    pub event_types: Vec<EventTypeHue>,
    pub filters: FilterSettings,
    pub created_at: DateTime<Utc>,
    pub last_access_at: DateTime<Utc>,
}

/// A live session as held by the server. The access time is atomic so
/// read-only requests can bump it while sharing the session map lock.
#[derive(Debug)]
pub struct SessionRecord {
    pub session_id: String,
    pub session: Session,
    pub created_at: DateTime<Utc>,
    last_access_millis: AtomicI64,
}

impl SessionRecord {
    pub fn new(session_id: String, session: Session, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            session,
            created_at: now,
            last_access_millis: AtomicI64::new(now.timestamp_millis()),
        }
    }

    pub fn touch(&self, now: DateTime<Utc>) {
        self.last_access_millis.store(now.timestamp_millis(), Ordering::Relaxed);
    }

    pub fn last_access_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.last_access_millis.load(Ordering::Relaxed))
            .unwrap_or(self.created_at)
    }

    pub fn to_summary(&self) -> SessionSummary {
        let graph = self.session.graph();
        SessionSummary {
            session_id: self.session_id.clone(),
            person_id: self.session.person_id().to_string(),
            first_name: self.session.first_name().to_string(),
            last_name: self.session.last_name().to_string(),
            person_count: graph.person_count(),
            event_count: graph.event_count(),
            event_types: self.session.event_types(),
            filters: self.session.filters(),
            created_at: self.created_at,
            last_access_at: self.last_access_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}
