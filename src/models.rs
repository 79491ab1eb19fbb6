//! Data models for USGS earthquake API responses.
//!
//! These structures match the GeoJSON format shared by the summary feed and
//! the FDSN event service. A search returns a `FeatureCollection`; an
//! `eventid` lookup returns a bare `Feature`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::errors::GeteqError;

/// Top-level GeoJSON response from a feed or search.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    /// Always "FeatureCollection"
    #[serde(rename = "type")]
    pub type_: String,

    /// Response metadata
    #[serde(default)]
    pub metadata: Option<Metadata>,

    /// Earthquake events
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Decode and validate a response body.
    ///
    /// # Errors
    ///
    /// Returns [`GeteqError::MalformedResponse`] if the body is not a valid
    /// feature collection.
    pub fn from_slice(body: &[u8]) -> Result<Self, GeteqError> {
        let collection: Self = serde_json::from_slice(body)?;
        collection.validate()?;
        Ok(collection)
    }

    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), GeteqError> {
        if self.type_ != "FeatureCollection" {
            return Err(GeteqError::MalformedResponse(format!(
                "expected type 'FeatureCollection', got '{}'",
                self.type_
            )));
        }
        self.features.iter().try_for_each(Feature::validate)
    }
}

/// Metadata about the response.
///
/// Single-event lookups carry none; feeds and searches report a title and
/// the number of events returned.
#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Number of events in response
    #[serde(default)]
    pub count: Option<usize>,
}

/// A single earthquake event.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Always "Feature"
    #[serde(rename = "type")]
    pub type_: String,

    /// Catalogue event ID
    pub id: String,

    /// Geographic location
    pub geometry: Geometry,

    /// Event properties
    pub properties: Properties,
}

impl Feature {
    /// Decode and validate a single-event response body.
    ///
    /// # Errors
    ///
    /// Returns [`GeteqError::MalformedResponse`] if the body is not a valid
    /// feature.
    pub fn from_slice(body: &[u8]) -> Result<Self, GeteqError> {
        let feature: Self = serde_json::from_slice(body)?;
        feature.validate()?;
        Ok(feature)
    }

    /// Validate the event structure.
    pub fn validate(&self) -> Result<(), GeteqError> {
        if self.type_ != "Feature" {
            return Err(GeteqError::MalformedResponse(format!(
                "expected type 'Feature', got '{}'",
                self.type_
            )));
        }
        if self.geometry.type_ != "Point" {
            return Err(GeteqError::MalformedResponse(format!(
                "expected geometry type 'Point', got '{}'",
                self.geometry.type_
            )));
        }
        if self.id.is_empty() {
            return Err(GeteqError::MalformedResponse("empty event ID".into()));
        }
        if self.geometry.coordinates.len() != 3 {
            return Err(GeteqError::MalformedResponse(format!(
                "expected 3 coordinates, got {}",
                self.geometry.coordinates.len()
            )));
        }
        Ok(())
    }

    /// Get the event time as a `DateTime<Utc>`.
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.properties.time)
    }

    /// Get the last update time as a `DateTime<Utc>`.
    #[must_use]
    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.properties.updated.and_then(millis_to_utc)
    }

    /// Get longitude (degrees).
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.geometry.coordinates.first().copied().unwrap_or(0.0)
    }

    /// Get latitude (degrees).
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.geometry.coordinates.get(1).copied().unwrap_or(0.0)
    }

    /// Get depth in kilometers (positive down).
    #[must_use]
    pub fn depth_km(&self) -> f64 {
        self.geometry.coordinates.get(2).copied().unwrap_or(0.0)
    }
}

fn millis_to_utc(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Geographic geometry for an event.
#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    /// Always "Point"
    #[serde(rename = "type")]
    pub type_: String,

    /// Coordinates: [longitude, latitude, depth_km]
    pub coordinates: Vec<f64>,
}

/// Event properties from USGS API.
#[derive(Debug, Clone, Deserialize)]
pub struct Properties {
    /// Magnitude value
    pub mag: Option<f64>,

    /// Magnitude type (mb, ml, mww, etc.)
    #[serde(rename = "magType")]
    pub mag_type: Option<String>,

    /// Human-readable place description
    pub place: Option<String>,

    /// Event time (ms since epoch)
    pub time: i64,

    /// Last update time (ms since epoch)
    pub updated: Option<i64>,

    /// Timezone offset from UTC in minutes at the epicenter
    pub tz: Option<i32>,

    /// Event status: "automatic" or "reviewed"
    pub status: Option<String>,

    /// PAGER alert level: null, "green", "yellow", "orange", "red"
    pub alert: Option<String>,

    /// Large event in an oceanic region: 0 or 1
    pub tsunami: Option<i32>,

    /// Significance score (0-1000+)
    pub sig: Option<i32>,

    /// Preferred contributor network
    pub net: Option<String>,

    /// Event code assigned by the preferred network
    pub code: Option<String>,

    /// Comma-separated associated event IDs
    pub ids: Option<String>,

    /// Comma-separated contributing networks
    pub sources: Option<String>,

    /// Number of stations used to determine the location
    pub nst: Option<i32>,

    /// Horizontal distance to nearest station (degrees)
    pub dmin: Option<f64>,

    /// RMS travel time residual (seconds)
    pub rms: Option<f64>,

    /// Largest azimuthal gap between stations (degrees)
    pub gap: Option<f64>,

    /// Number of "Did You Feel It?" reports
    pub felt: Option<i32>,

    /// Community Decimal Intensity
    pub cdi: Option<f64>,

    /// Modified Mercalli Intensity
    pub mmi: Option<f64>,

    /// Event type (earthquake, quarry blast, etc.)
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sample_query() {
        let json = include_str!("../tools/sample_query.json");
        let collection =
            FeatureCollection::from_slice(json.as_bytes()).expect("failed to parse sample query");

        assert_eq!(collection.type_, "FeatureCollection");
        assert_eq!(collection.features.len(), 2);
        let metadata = collection.metadata.as_ref().expect("sample has metadata");
        assert_eq!(metadata.title.as_deref(), Some("USGS Earthquakes"));
        assert_eq!(metadata.count, Some(collection.features.len()));

        let first = &collection.features[0];
        assert_eq!(first.id, "us7000abcd");
        assert!((first.latitude() - 38.123).abs() < 1e-9);
        assert!((first.longitude() - 142.456).abs() < 1e-9);
        assert!((first.depth_km() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_sample_event() {
        let json = include_str!("../tools/sample_event.json");
        let feature = Feature::from_slice(json.as_bytes()).expect("failed to parse sample event");

        assert_eq!(feature.id, "ci40012345");
        assert_eq!(feature.properties.mag_type.as_deref(), Some("ml"));
        assert_eq!(
            feature.time().map(|t| t.to_rfc3339()).as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert!(feature.updated().is_some());
    }

    #[test]
    fn test_rejects_wrong_type() {
        let body = br#"{"type": "Feature", "features": []}"#;
        assert!(matches!(
            FeatureCollection::from_slice(body),
            Err(GeteqError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_non_json() {
        let body = b"Error 400: Bad Request\n\nBad starttime value";
        assert!(matches!(
            FeatureCollection::from_slice(body),
            Err(GeteqError::MalformedResponse(_))
        ));
        assert!(matches!(
            Feature::from_slice(body),
            Err(GeteqError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_non_point_geometry() {
        let body = br#"{
            "type": "Feature",
            "id": "ci1",
            "geometry": {"type": "LineString", "coordinates": [1.0, 2.0, 3.0]},
            "properties": {"time": 0}
        }"#;
        assert!(matches!(
            Feature::from_slice(body),
            Err(GeteqError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_rejects_short_coordinates() {
        let body = br#"{
            "type": "Feature",
            "id": "ci1",
            "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
            "properties": {"time": 0}
        }"#;
        assert!(matches!(
            Feature::from_slice(body),
            Err(GeteqError::MalformedResponse(_))
        ));
    }
}
