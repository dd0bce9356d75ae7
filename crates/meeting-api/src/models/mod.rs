//! Meeting API models.
//!
//! Contains database rows, request bodies (with validation) and response
//! projections for meetings, participants and profiles.

use crate::errors::ApiError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Operational Models
// ============================================================================

/// Readiness check response.
///
/// Returned by the `/ready` endpoint (readiness probe).
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// Service readiness status ("ready" or "not_ready").
    pub status: &'static str,

    /// Database connectivity status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,

    /// Error message (generic, no infrastructure details).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============================================================================
// Partial Updates
// ============================================================================

/// A single field of a partial update request.
///
/// Distinguishes a field that was omitted from the body (`Missing`) from one
/// that was sent as JSON `null` (`Null`). Fields must be annotated with
/// `#[serde(default)]` so that omission maps to `Missing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Missing,
    Null,
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Missing
    }
}

impl<T> Patch<T> {
    /// Returns the supplied value, if any.
    ///
    /// Both `Missing` and `Null` mean "leave the stored value unchanged".
    pub fn into_value(self) -> Option<T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Missing | Patch::Null => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Patch::Value(_))
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

// ============================================================================
// Date Handling
// ============================================================================

/// Parse meeting date text sent by clients.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, optionally followed by fractional seconds
/// and/or a trailing `Z`. Both are stripped before parsing and no timezone
/// conversion is applied, so `2026-01-15T12:00:00.000Z` becomes
/// `2026-01-15T12:00:00`.
pub fn parse_meeting_date(text: &str) -> Result<NaiveDateTime, ApiError> {
    let mut normalized = text;
    if let Some(stripped) = normalized.strip_suffix('Z') {
        normalized = stripped;
    }
    if let Some((whole, _fraction)) = normalized.split_once('.') {
        normalized = whole;
    }

    NaiveDateTime::parse_from_str(normalized, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(normalized, "%Y-%m-%dT%H:%M"))
        .map_err(|e| {
            tracing::debug!(target: "meeting_api.models", error = %e, "Unparseable meeting date");
            ApiError::BadRequest("Invalid date format".to_string())
        })
}

/// Record a "required" message for `field` when `value` is absent or blank.
fn require_text(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    message: &str,
    value: Option<String>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.insert(field.to_string(), message.to_string());
            String::new()
        }
    }
}

// ============================================================================
// Meeting Models
// ============================================================================

/// Meeting database row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MeetingRow {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Request to create a meeting.
///
/// Every field is decoded as optional so that missing required fields are
/// reported per field by [`CreateMeetingRequest::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    pub title: Option<String>,
    pub desc: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub participant_ids: Option<Vec<String>>,
}

/// A validated meeting creation.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub desc: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub participant_ids: Vec<String>,
}

impl CreateMeetingRequest {
    /// Validate required fields and parse the date.
    ///
    /// # Errors
    ///
    /// - `ApiError::Validation` listing every missing or blank field
    /// - `ApiError::BadRequest` if the date text cannot be parsed
    pub fn validate(self) -> Result<NewMeeting, ApiError> {
        let mut errors = BTreeMap::new();

        let title = require_text(&mut errors, "title", "Title is required", self.title);
        let desc = require_text(&mut errors, "desc", "Description is required", self.desc);
        let date = require_text(&mut errors, "date", "Date is required", self.date);
        let location = require_text(
            &mut errors,
            "location",
            "Location is required",
            self.location,
        );

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(NewMeeting {
            title,
            desc,
            date: parse_meeting_date(&date)?,
            location,
            participant_ids: self.participant_ids.unwrap_or_default(),
        })
    }
}

/// Request to update a meeting. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateMeetingRequest {
    pub title: Patch<String>,
    pub desc: Patch<String>,
    pub date: Patch<String>,
    pub location: Patch<String>,
    /// When supplied (even empty), fully replaces the participant set.
    pub participant_ids: Patch<Vec<String>>,
}

impl UpdateMeetingRequest {
    /// Check if the request has any changes.
    pub fn has_changes(&self) -> bool {
        self.title.is_value()
            || self.desc.is_value()
            || self.date.is_value()
            || self.location.is_value()
            || self.participant_ids.is_value()
    }
}

/// Meeting projection with its participants resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingResponse {
    pub id: String,
    pub title: String,
    pub desc: String,
    pub date: NaiveDateTime,
    pub location: String,
    pub participants: Vec<ParticipantResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl MeetingResponse {
    pub fn from_parts(row: MeetingRow, participants: Vec<ParticipantRow>) -> Self {
        Self {
            id: row.id,
            title: row.title,
            desc: row.desc,
            date: row.date,
            location: row.location,
            participants: participants
                .into_iter()
                .map(ParticipantResponse::from)
                .collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ============================================================================
// Participant Models
// ============================================================================

/// Participant database row, joined with its profile (if any).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRow {
    pub id: String,
    pub name: String,
    pub season: String,
    pub phone: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub profile_id: Option<String>,
    pub profile_image_url: Option<String>,
}

/// Request to create a participant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParticipantRequest {
    pub name: Option<String>,
    pub season: Option<String>,
    pub phone: Option<String>,
}

/// A validated participant creation.
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub name: String,
    pub season: String,
    pub phone: String,
}

impl CreateParticipantRequest {
    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` listing every missing or blank field.
    pub fn validate(self) -> Result<NewParticipant, ApiError> {
        let mut errors = BTreeMap::new();

        let name = require_text(&mut errors, "name", "Name is required", self.name);
        let season = require_text(&mut errors, "season", "Season is required", self.season);
        let phone = require_text(&mut errors, "phone", "Phone is required", self.phone);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(NewParticipant {
            name,
            season,
            phone,
        })
    }
}

/// Request to update a participant. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateParticipantRequest {
    pub name: Patch<String>,
    pub season: Patch<String>,
    pub phone: Patch<String>,
}

/// Participant projection with its profile (or null).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: String,
    pub name: String,
    pub season: String,
    pub phone: String,
    pub profile: Option<ProfileResponse>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ParticipantRow> for ParticipantResponse {
    fn from(row: ParticipantRow) -> Self {
        let profile = row.profile_id.map(|profile_id| ProfileResponse {
            id: profile_id,
            image_url: row.profile_image_url,
            participant_id: row.id.clone(),
        });

        Self {
            id: row.id,
            name: row.name,
            season: row.season,
            phone: row.phone,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ============================================================================
// Profile Models
// ============================================================================

/// Profile database row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: String,
    pub image_url: Option<String>,
    pub participant_id: String,
}

/// Request to create a profile for a participant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub participant_id: Option<String>,
    pub image_url: Option<String>,
}

/// A validated profile creation.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub participant_id: String,
    pub image_url: Option<String>,
}

impl CreateProfileRequest {
    /// Validate required fields.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if `participantId` is missing or blank.
    pub fn validate(self) -> Result<NewProfile, ApiError> {
        let mut errors = BTreeMap::new();

        let participant_id = require_text(
            &mut errors,
            "participantId",
            "Participant ID is required",
            self.participant_id,
        );

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }

        Ok(NewProfile {
            participant_id,
            image_url: self.image_url,
        })
    }
}

/// Request to update a profile. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub image_url: Patch<String>,
}

/// Profile projection. Refers to its owner by id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub image_url: Option<String>,
    pub participant_id: String,
}

impl From<ProfileRow> for ProfileResponse {
    fn from(row: ProfileRow) -> Self {
        Self {
            id: row.id,
            image_url: row.image_url,
            participant_id: row.participant_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_meeting_date_strips_zone_and_fraction() {
        let parsed = parse_meeting_date("2026-01-15T12:00:00.000Z").unwrap();
        assert_eq!(parsed, datetime(2026, 1, 15, 12, 0, 0));
    }

    #[test]
    fn test_parse_meeting_date_plain() {
        let parsed = parse_meeting_date("2026-03-01T09:30:15").unwrap();
        assert_eq!(parsed, datetime(2026, 3, 1, 9, 30, 15));
    }

    #[test]
    fn test_parse_meeting_date_zone_without_fraction() {
        let parsed = parse_meeting_date("2026-03-01T09:30:15Z").unwrap();
        assert_eq!(parsed, datetime(2026, 3, 1, 9, 30, 15));
    }

    #[test]
    fn test_parse_meeting_date_without_seconds() {
        let parsed = parse_meeting_date("2026-03-01T09:30").unwrap();
        assert_eq!(parsed, datetime(2026, 3, 1, 9, 30, 0));
    }

    #[test]
    fn test_parse_meeting_date_rejects_garbage() {
        let result = parse_meeting_date("next tuesday");
        assert!(matches!(result, Err(ApiError::BadRequest(msg)) if msg == "Invalid date format"));
    }

    #[test]
    fn test_parse_meeting_date_rejects_date_only() {
        assert!(parse_meeting_date("2026-03-01").is_err());
    }

    #[test]
    fn test_patch_deserialization_distinguishes_missing_and_null() {
        let request: UpdateMeetingRequest =
            serde_json::from_str(r#"{"title": "New", "desc": null}"#).unwrap();

        assert_eq!(request.title, Patch::Value("New".to_string()));
        assert_eq!(request.desc, Patch::Null);
        assert_eq!(request.location, Patch::Missing);
        assert_eq!(request.participant_ids, Patch::Missing);
        assert!(request.has_changes());
    }

    #[test]
    fn test_patch_empty_participant_list_is_a_value() {
        let request: UpdateMeetingRequest =
            serde_json::from_str(r#"{"participantIds": []}"#).unwrap();

        assert_eq!(request.participant_ids, Patch::Value(Vec::new()));
        assert!(request.has_changes());
    }

    #[test]
    fn test_patch_into_value() {
        assert_eq!(Patch::Value(3).into_value(), Some(3));
        assert_eq!(Patch::<i32>::Null.into_value(), None);
        assert_eq!(Patch::<i32>::Missing.into_value(), None);
    }

    #[test]
    fn test_update_request_without_fields_has_no_changes() {
        let request: UpdateMeetingRequest = serde_json::from_str("{}").unwrap();
        assert!(!request.has_changes());
    }

    #[test]
    fn test_create_meeting_validation_success() {
        let request: CreateMeetingRequest = serde_json::from_str(
            r#"{
                "title": "Kickoff",
                "desc": "First session",
                "date": "2026-01-15T12:00:00.000Z",
                "location": "Seoul",
                "participantIds": ["a", "b"]
            }"#,
        )
        .unwrap();

        let meeting = request.validate().unwrap();
        assert_eq!(meeting.title, "Kickoff");
        assert_eq!(meeting.date, datetime(2026, 1, 15, 12, 0, 0));
        assert_eq!(meeting.participant_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_create_meeting_validation_defaults_participants_to_empty() {
        let request = CreateMeetingRequest {
            title: Some("Kickoff".to_string()),
            desc: Some("First session".to_string()),
            date: Some("2026-01-15T12:00:00".to_string()),
            location: Some("Seoul".to_string()),
            participant_ids: None,
        };

        let meeting = request.validate().unwrap();
        assert!(meeting.participant_ids.is_empty());
    }

    #[test]
    fn test_create_meeting_validation_collects_all_fields() {
        let request = CreateMeetingRequest {
            title: Some("   ".to_string()),
            ..Default::default()
        };

        let result = request.validate();
        let Err(ApiError::Validation(errors)) = result else {
            panic!("expected validation error");
        };

        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("title").unwrap(), "Title is required");
        assert_eq!(errors.get("desc").unwrap(), "Description is required");
        assert_eq!(errors.get("date").unwrap(), "Date is required");
        assert_eq!(errors.get("location").unwrap(), "Location is required");
    }

    #[test]
    fn test_create_meeting_validation_bad_date_is_bad_request() {
        let request = CreateMeetingRequest {
            title: Some("Kickoff".to_string()),
            desc: Some("First session".to_string()),
            date: Some("15/01/2026".to_string()),
            location: Some("Seoul".to_string()),
            participant_ids: None,
        };

        assert!(matches!(request.validate(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_create_participant_validation() {
        let request = CreateParticipantRequest {
            name: Some("Kim".to_string()),
            season: None,
            phone: Some("".to_string()),
        };

        let Err(ApiError::Validation(errors)) = request.validate() else {
            panic!("expected validation error");
        };

        assert_eq!(errors.len(), 2);
        assert!(errors.contains_key("season"));
        assert!(errors.contains_key("phone"));
    }

    #[test]
    fn test_create_profile_validation_requires_participant_id() {
        let request = CreateProfileRequest {
            participant_id: None,
            image_url: Some("https://img.example.com/a.png".to_string()),
        };

        let Err(ApiError::Validation(errors)) = request.validate() else {
            panic!("expected validation error");
        };
        assert_eq!(
            errors.get("participantId").unwrap(),
            "Participant ID is required"
        );
    }

    #[test]
    fn test_participant_response_embeds_profile() {
        let row = ParticipantRow {
            id: "p-1".to_string(),
            name: "Kim".to_string(),
            season: "S1".to_string(),
            phone: "010-0000-0001".to_string(),
            created_at: datetime(2026, 1, 1, 0, 0, 0),
            updated_at: datetime(2026, 1, 1, 0, 0, 0),
            profile_id: Some("pr-1".to_string()),
            profile_image_url: Some("https://img.example.com/kim.png".to_string()),
        };

        let response = ParticipantResponse::from(row);
        let profile = response.profile.unwrap();
        assert_eq!(profile.id, "pr-1");
        assert_eq!(profile.participant_id, "p-1");
        assert_eq!(
            profile.image_url.as_deref(),
            Some("https://img.example.com/kim.png")
        );
    }

    #[test]
    fn test_participant_response_serializes_null_profile() {
        let row = ParticipantRow {
            id: "p-1".to_string(),
            name: "Kim".to_string(),
            season: "S1".to_string(),
            phone: "010-0000-0001".to_string(),
            created_at: datetime(2026, 1, 1, 0, 0, 0),
            updated_at: datetime(2026, 1, 1, 0, 0, 0),
            profile_id: None,
            profile_image_url: None,
        };

        let json = serde_json::to_value(ParticipantResponse::from(row)).unwrap();
        assert!(json["profile"].is_null());
        assert_eq!(json["createdAt"], "2026-01-01T00:00:00");
    }

    #[test]
    fn test_meeting_response_uses_wire_names() {
        let row = MeetingRow {
            id: "m-1".to_string(),
            title: "Kickoff".to_string(),
            desc: "First session".to_string(),
            date: datetime(2026, 1, 15, 12, 0, 0),
            location: "Seoul".to_string(),
            created_at: datetime(2026, 1, 1, 0, 0, 0),
            updated_at: datetime(2026, 1, 2, 0, 0, 0),
        };

        let json = serde_json::to_value(MeetingResponse::from_parts(row, Vec::new())).unwrap();
        assert_eq!(json["desc"], "First session");
        assert_eq!(json["date"], "2026-01-15T12:00:00");
        assert_eq!(json["updatedAt"], "2026-01-02T00:00:00");
        assert_eq!(json["participants"], serde_json::json!([]));
    }
}
