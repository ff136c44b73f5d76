//! Submission context: identity, location, and wall-clock time.
//!
//! The engine never reads ambient session state. Identity comes from the
//! session collaborator, location from the location collaborator, and the
//! timestamp from a [`Clock`], all passed in explicitly at submit time.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Supplies the current local wall-clock time.
pub trait Clock: Send + Sync {
    /// The current local time.
    ///
    /// The returned value is naive by design: the backend interprets
    /// submission timestamps as local time, not as absolute instants.
    fn now_local(&self) -> NaiveDateTime;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A geographic coordinate fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// Supplies the last-known geographic coordinate.
///
/// The engine does not solicit or poll for location itself; implementors
/// surface whatever fix the surrounding application last obtained.
pub trait LocationProvider: Send + Sync {
    /// The most recent known fix, if any.
    fn last_fix(&self) -> Option<GeoFix>;
}

/// A location provider holding a caller-supplied fix.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    fix: Option<GeoFix>,
}

impl FixedLocation {
    /// Create a provider with a known fix.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            fix: Some(GeoFix {
                latitude,
                longitude,
            }),
        }
    }

    /// Create a provider with no fix available.
    #[must_use]
    pub fn unknown() -> Self {
        Self { fix: None }
    }
}

impl LocationProvider for FixedLocation {
    fn last_fix(&self) -> Option<GeoFix> {
        self.fix
    }
}

/// Staff identity supplied by the session collaborator.
///
/// Opaque to the engine; never stored or refreshed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffIdentity {
    /// The staff member's number.
    pub staff_number: String,
    /// The staff member's display name.
    pub staff_name: String,
}

impl StaffIdentity {
    /// Create an identity.
    #[must_use]
    pub fn new(staff_number: impl Into<String>, staff_name: impl Into<String>) -> Self {
        Self {
            staff_number: staff_number.into(),
            staff_name: staff_name.into(),
        }
    }
}

/// Identity and location captured at submit time.
///
/// Assembled fresh for every submission from the session and location
/// collaborators; never stored by the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionContext {
    /// The submitting staff member's number.
    pub staff_number: String,
    /// The submitting staff member's display name.
    pub staff_name: String,
    /// The inspected vehicle's fleet number.
    pub fleet_number: String,
    /// Latitude of the last known fix.
    pub latitude: f64,
    /// Longitude of the last known fix.
    pub longitude: f64,
}

impl SubmissionContext {
    /// Build a context from identity fields and a location fix.
    #[must_use]
    pub fn new(
        staff_number: impl Into<String>,
        staff_name: impl Into<String>,
        fleet_number: impl Into<String>,
        fix: GeoFix,
    ) -> Self {
        Self {
            staff_number: staff_number.into(),
            staff_name: staff_name.into(),
            fleet_number: fleet_number.into(),
            latitude: fix.latitude,
            longitude: fix.longitude,
        }
    }

    /// Build a context from a staff identity, fleet number, and fix.
    #[must_use]
    pub fn from_identity(identity: &StaffIdentity, fleet_number: impl Into<String>, fix: GeoFix) -> Self {
        Self::new(
            identity.staff_number.clone(),
            identity.staff_name.clone(),
            fleet_number,
            fix,
        )
    }
}

/// Format a timestamp for the submission payload.
///
/// Second precision, no timezone suffix: `YYYY-MM-DDTHH:MM:SS`.
#[must_use]
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    #[test]
    fn test_format_timestamp_second_precision_no_offset() {
        let ts = NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_milli_opt(9, 26, 53, 589)
            .unwrap();
        // Milliseconds are truncated and no timezone suffix is attached.
        assert_eq!(format_timestamp(ts), "2025-03-14T09:26:53");
    }

    #[test]
    fn test_format_timestamp_pads_components() {
        let ts = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        assert_eq!(format_timestamp(ts), "2025-01-02T03:04:05");
    }

    #[test]
    fn test_system_clock_returns_plausible_time() {
        let now = SystemClock.now_local();
        // Sanity check only: the value parses back through the payload format.
        assert!(now.hour() < 24);
        assert_eq!(format_timestamp(now).len(), 19);
    }

    #[test]
    fn test_fixed_location() {
        let provider = FixedLocation::new(12.9716, 77.5946);
        let fix = provider.last_fix().unwrap();
        assert!((fix.latitude - 12.9716).abs() < f64::EPSILON);
        assert!((fix.longitude - 77.5946).abs() < f64::EPSILON);

        assert!(FixedLocation::unknown().last_fix().is_none());
        assert!(FixedLocation::default().last_fix().is_none());
    }

    #[test]
    fn test_submission_context_new() {
        let context = SubmissionContext::new(
            "ST-1042",
            "A. Operator",
            "KA-57-F-1234",
            GeoFix {
                latitude: 12.9716,
                longitude: 77.5946,
            },
        );
        assert_eq!(context.staff_number, "ST-1042");
        assert_eq!(context.staff_name, "A. Operator");
        assert_eq!(context.fleet_number, "KA-57-F-1234");
    }

    #[test]
    fn test_geo_fix_serialization() {
        let fix = GeoFix {
            latitude: 1.5,
            longitude: -2.25,
        };
        let json = serde_json::to_string(&fix).unwrap();
        let back: GeoFix = serde_json::from_str(&json).unwrap();
        assert_eq!(fix, back);
    }
}
