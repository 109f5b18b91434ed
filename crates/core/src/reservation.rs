//! Public reservation intake: payload shape and validation.
//!
//! The booking widget posts camelCase JSON with every field optional at the
//! wire level so that a missing field surfaces as a 400 naming the field.
//! Type mismatches are rejected while decoding and reach the caller through
//! the api crate's `AppJson` extractor, also as a 400.

use chrono::{DateTime, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::types::{Date, DbId};

/// Raw booking payload accepted by `POST /public/reservations`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// The widget sends either a number or a numeric string.
    #[serde(default, deserialize_with = "unit_id_from_number_or_text")]
    #[validate(required)]
    pub unit_id: Option<DbId>,
    #[validate(required, length(min = 1))]
    pub location: Option<String>,
    /// `"particular"` or `"profesional"` on the widget, stored verbatim.
    #[serde(rename = "type")]
    #[validate(required, length(min = 1))]
    pub booking_type: Option<String>,
    /// Size band, e.g. `"1-2m2"`.
    #[validate(required, length(min = 1))]
    pub size: Option<String>,
    /// `YYYY-MM-DD` or a full RFC 3339 timestamp.
    #[validate(required, length(min = 1))]
    pub entry_date: Option<String>,
    /// Declared goods value band, e.g. `"<5000"`.
    #[validate(required, length(min = 1))]
    pub goods_value: Option<String>,
    #[validate(required, length(min = 1))]
    pub postal_code: Option<String>,
    #[validate(required, length(min = 1))]
    pub first_name: Option<String>,
    #[validate(required, length(min = 1))]
    pub last_name: Option<String>,
    #[validate(required, email)]
    pub email: Option<String>,
    #[validate(required, length(min = 1))]
    pub phone: Option<String>,
}

/// A booking request that passed validation. Every field is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationIntake {
    pub unit_id: DbId,
    pub location: String,
    pub booking_type: String,
    pub size: String,
    pub entry_date: Date,
    pub goods_value: String,
    pub postal_code: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ReservationIntake {
    /// Display name used for the client record created on confirmation.
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// `"<first> <last>"`, trimmed.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
}

impl ReservationRequest {
    /// Check every required field and convert into a [`ReservationIntake`].
    ///
    /// Blank strings count as missing. A malformed email or entry date is a
    /// validation failure as well.
    pub fn into_intake(self) -> Result<ReservationIntake, CoreError> {
        let trimmed = self.trimmed();
        trimmed.validate().map_err(|e| validation_error(&e))?;

        let entry_raw = trimmed.entry_date.unwrap_or_default();
        let entry_date = parse_entry_date(&entry_raw)?;

        Ok(ReservationIntake {
            unit_id: trimmed.unit_id.unwrap_or_default(),
            location: trimmed.location.unwrap_or_default(),
            booking_type: trimmed.booking_type.unwrap_or_default(),
            size: trimmed.size.unwrap_or_default(),
            entry_date,
            goods_value: trimmed.goods_value.unwrap_or_default(),
            postal_code: trimmed.postal_code.unwrap_or_default(),
            first_name: trimmed.first_name.unwrap_or_default(),
            last_name: trimmed.last_name.unwrap_or_default(),
            email: trimmed.email.unwrap_or_default(),
            phone: trimmed.phone.unwrap_or_default(),
        })
    }

    fn trimmed(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            unit_id: self.unit_id,
            location: trim(self.location),
            booking_type: trim(self.booking_type),
            size: trim(self.size),
            entry_date: trim(self.entry_date),
            goods_value: trim(self.goods_value),
            postal_code: trim(self.postal_code),
            first_name: trim(self.first_name),
            last_name: trim(self.last_name),
            email: trim(self.email),
            phone: trim(self.phone),
        }
    }
}

fn unit_id_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(DbId),
        Text(String),
    }

    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawId::Number(id)) => Ok(Some(id)),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawId::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("unitId must be a number, got '{text}'"))),
    }
}

/// Accept either a plain calendar date or an RFC 3339 timestamp.
pub fn parse_entry_date(raw: &str) -> Result<Date, CoreError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| {
            CoreError::Validation(format!(
                "Invalid entryDate '{raw}'. Expected YYYY-MM-DD or an RFC 3339 timestamp"
            ))
        })
}

/// Turn validator output into a single message naming the offending fields
/// in the widget's camelCase spelling.
fn validation_error(errors: &ValidationErrors) -> CoreError {
    let mut missing = Vec::new();
    let mut invalid = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let name = camel_case(field.as_ref());
        if field_errors
            .iter()
            .any(|e| e.code == "required" || e.code == "length")
        {
            missing.push(name);
        } else {
            invalid.push(name);
        }
    }
    missing.sort();
    invalid.sort();

    if !missing.is_empty() {
        CoreError::Validation(format!("Missing required fields: {}", missing.join(", ")))
    } else {
        CoreError::Validation(format!("Invalid fields: {}", invalid.join(", ")))
    }
}

fn camel_case(snake: &str) -> String {
    let name = match snake {
        "booking_type" => "type",
        other => other,
    };
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for ch in name.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn jane() -> ReservationRequest {
        serde_json::from_value(serde_json::json!({
            "unitId": 7,
            "location": "Madrid Norte",
            "type": "particular",
            "size": "3-4m2",
            "entryDate": "2026-11-01",
            "goodsValue": "<5000",
            "postalCode": "28001",
            "firstName": "Jane",
            "lastName": "Doe",
            "email": "jane@x.com",
            "phone": "600123123",
        }))
        .unwrap()
    }

    #[test]
    fn complete_request_validates() {
        let intake = jane().into_intake().unwrap();
        assert_eq!(intake.unit_id, 7);
        assert_eq!(intake.booking_type, "particular");
        assert_eq!(intake.entry_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
        assert_eq!(intake.full_name(), "Jane Doe");
    }

    #[test]
    fn unit_id_may_arrive_as_text() {
        let parse = |id: serde_json::Value| {
            serde_json::from_value::<ReservationRequest>(serde_json::json!({ "unitId": id }))
                .map(|req| req.unit_id)
        };
        assert_eq!(parse(serde_json::json!("12")).unwrap(), Some(12));
        assert_eq!(parse(serde_json::json!(" 12 ")).unwrap(), Some(12));
        assert_eq!(parse(serde_json::json!("")).unwrap(), None);
        assert_eq!(parse(serde_json::Value::Null).unwrap(), None);
        assert!(parse(serde_json::json!("twelve")).is_err());
    }

    #[test]
    fn missing_fields_are_named_in_camel_case() {
        let mut req = jane();
        req.unit_id = None;
        req.postal_code = None;
        req.booking_type = Some("   ".into());

        let err = req.into_intake().unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg) if msg == "Missing required fields: postalCode, type, unitId"
        );
    }

    #[test]
    fn empty_payload_reports_every_field() {
        let err = ReservationRequest::default().into_intake().unwrap_err();
        let CoreError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        for field in ["unitId", "location", "entryDate", "goodsValue", "firstName", "phone"] {
            assert!(msg.contains(field), "message should mention {field}: {msg}");
        }
    }

    #[test]
    fn malformed_email_is_invalid_not_missing() {
        let mut req = jane();
        req.email = Some("not-an-email".into());
        assert_matches!(
            req.into_intake(),
            Err(CoreError::Validation(msg)) if msg == "Invalid fields: email"
        );
    }

    #[test]
    fn entry_date_accepts_rfc3339() {
        let mut req = jane();
        req.entry_date = Some("2026-11-01T10:30:00Z".into());
        let intake = req.into_intake().unwrap();
        assert_eq!(intake.entry_date, NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
    }

    #[test]
    fn garbage_entry_date_is_rejected() {
        assert_matches!(parse_entry_date("next tuesday"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn full_name_trims_parts() {
        assert_eq!(full_name(" Jane ", "Doe  "), "Jane Doe");
    }
}
