//! Listing of previously submitted inspection records.
//!
//! The backend exposes submitted forms through a single listing endpoint;
//! staff-level views filter client-side by staff number and submission date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// A previously submitted inspection record, as returned by the backend.
///
/// Field names follow the backend's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InspectionRecord {
    /// Staff number of the submitter.
    #[serde(rename = "staffNumberFormPojo")]
    pub staff_number: String,

    /// Fleet number of the inspected vehicle.
    #[serde(rename = "vehicleFleetNumberFormPojo")]
    pub fleet_number: String,

    /// Free-text remarks entered on submission.
    #[serde(rename = "additionalInfoFormPojo")]
    pub remarks: String,

    /// When the record was submitted (naive local time).
    #[serde(rename = "dateAndTimeOfSubmission")]
    pub submitted_at: NaiveDateTime,
}

/// Client for the record-listing endpoint.
#[derive(Debug, Clone)]
pub struct RecordsClient {
    client: reqwest::Client,
    url: String,
}

impl RecordsClient {
    /// Create a client fetching from the given listing URL.
    #[must_use]
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Fetch all submitted records.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend is unreachable, responds with a
    /// non-success status, or the body does not deserialize.
    pub async fn fetch(&self, bearer: &str) -> Result<Vec<InspectionRecord>> {
        let records: Vec<InspectionRecord> = self
            .client
            .get(&self.url)
            .bearer_auth(bearer)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(count = records.len(), "fetched inspection records");
        Ok(records)
    }
}

/// Records submitted by the given staff member, newest first.
#[must_use]
pub fn by_staff_number(records: &[InspectionRecord], staff_number: &str) -> Vec<InspectionRecord> {
    let mut matching: Vec<InspectionRecord> = records
        .iter()
        .filter(|r| r.staff_number == staff_number)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    matching
}

/// Records submitted on the given calendar day, newest first.
#[must_use]
pub fn by_date(records: &[InspectionRecord], date: NaiveDate) -> Vec<InspectionRecord> {
    let mut matching: Vec<InspectionRecord> = records
        .iter()
        .filter(|r| r.submitted_at.date() == date)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    matching
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(staff: &str, fleet: &str, when: &str) -> InspectionRecord {
        InspectionRecord {
            staff_number: staff.to_string(),
            fleet_number: fleet.to_string(),
            remarks: "All clear".to_string(),
            submitted_at: NaiveDateTime::parse_from_str(when, "%Y-%m-%dT%H:%M:%S").unwrap(),
        }
    }

    fn sample() -> Vec<InspectionRecord> {
        vec![
            record("ST-1042", "KA-57-F-1234", "2025-03-14T09:26:53"),
            record("ST-1042", "KA-57-F-9000", "2025-03-14T16:01:10"),
            record("ST-2001", "KA-57-F-1234", "2025-03-14T11:45:00"),
            record("ST-1042", "KA-57-F-1234", "2025-03-13T08:00:00"),
        ]
    }

    #[test]
    fn test_by_staff_number_filters_and_sorts_newest_first() {
        let records = by_staff_number(&sample(), "ST-1042");
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].fleet_number, "KA-57-F-9000");
        assert!(records
            .windows(2)
            .all(|w| w[0].submitted_at >= w[1].submitted_at));
    }

    #[test]
    fn test_by_staff_number_no_matches() {
        assert!(by_staff_number(&sample(), "ST-9999").is_empty());
    }

    #[test]
    fn test_by_date_matches_calendar_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let records = by_date(&sample(), date);
        assert_eq!(records.len(), 3);
        // Different time of day on the same date still matches.
        assert!(records.iter().all(|r| r.submitted_at.date() == date));
        assert_eq!(records[0].submitted_at.time().to_string(), "16:01:10");
    }

    #[test]
    fn test_record_deserializes_wire_field_names() {
        let json = r#"{
            "staffNumberFormPojo": "ST-1042",
            "vehicleFleetNumberFormPojo": "KA-57-F-1234",
            "additionalInfoFormPojo": "Scratches on left panel",
            "dateAndTimeOfSubmission": "2025-03-14T09:26:53"
        }"#;
        let record: InspectionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.staff_number, "ST-1042");
        assert_eq!(record.fleet_number, "KA-57-F-1234");
        assert_eq!(record.remarks, "Scratches on left panel");
        assert_eq!(
            record.submitted_at.date(),
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_record_roundtrip_keeps_wire_names() {
        let record = record("ST-1042", "KA-57-F-1234", "2025-03-14T09:26:53");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("staffNumberFormPojo").is_some());
        assert!(json.get("staff_number").is_none());
    }
}
