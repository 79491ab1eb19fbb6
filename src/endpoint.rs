//! USGS endpoint selection and request URL assembly.
//!
//! Two upstream services are supported: the pre-aggregated real-time summary
//! feed, addressed by file name, and the FDSN event web service, addressed by
//! query parameters.

use std::collections::BTreeMap;
use std::fmt;

use reqwest::Url;
use tracing::debug;

use crate::errors::GeteqError;
use crate::filters::{EventId, MagnitudeSpec, TimeRangeSpec};

/// Base URL of the real-time summary feed.
pub const FEED_BASE_URL: &str = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary";

/// Base URL of the FDSN event web service.
pub const SEARCH_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1";

/// FDSN operation returning matching events.
pub const QUERY_OPERATION: &str = "query";

/// Upstream service a request is sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Real-time summary feed
    Feed,
    /// FDSN historical event search
    Search,
}

/// Output format selected with `--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Decoded, fixed-width terminal table (default)
    #[default]
    Table,
    /// Raw GeoJSON passthrough
    Json,
    /// Raw GeoJSON passthrough (FDSN spelling)
    GeoJson,
    /// Raw CSV passthrough
    Csv,
    /// Raw pipe-delimited text passthrough
    Text,
}

/// Upstream format token for every supported `(format, endpoint)` pair.
const FORMAT_TOKENS: &[(OutputFormat, Endpoint, &str)] = &[
    (OutputFormat::Table, Endpoint::Feed, "geojson"),
    (OutputFormat::Json, Endpoint::Feed, "geojson"),
    (OutputFormat::Csv, Endpoint::Feed, "csv"),
    (OutputFormat::Table, Endpoint::Search, "geojson"),
    (OutputFormat::Json, Endpoint::Search, "geojson"),
    (OutputFormat::GeoJson, Endpoint::Search, "geojson"),
    (OutputFormat::Csv, Endpoint::Search, "csv"),
    (OutputFormat::Text, Endpoint::Search, "text"),
];

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::GeoJson => "geojson",
            Self::Csv => "csv",
            Self::Text => "text",
        }
    }

    /// True if the response body is decoded and rendered rather than echoed.
    #[must_use]
    pub const fn is_table(self) -> bool {
        matches!(self, Self::Table)
    }

    /// Resolve the token this format is requested as on `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`GeteqError::InvalidFormatOption`] if the endpoint does not
    /// serve this format.
    pub fn upstream_token(self, endpoint: Endpoint) -> Result<&'static str, GeteqError> {
        FORMAT_TOKENS
            .iter()
            .find(|(format, ep, _)| *format == self && *ep == endpoint)
            .map(|(_, _, token)| *token)
            .ok_or_else(|| GeteqError::InvalidFormatOption(self.as_str().to_string()))
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "geojson" => Ok(Self::GeoJson),
            "csv" => Ok(Self::Csv),
            "text" => Ok(Self::Text),
            _ => Err(GeteqError::InvalidFormatOption(s.to_string())),
        }
    }
}

/// Minimum-magnitude bucket of the summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMagnitude {
    All,
    One,
    TwoAndHalf,
    FourAndHalf,
    Major,
}

impl FeedMagnitude {
    /// File-name token for this bucket.
    #[must_use]
    pub const fn bucket(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::One => "1.0",
            Self::TwoAndHalf => "2.5",
            Self::FourAndHalf => "4.5",
            Self::Major => "significant",
        }
    }
}

impl std::str::FromStr for FeedMagnitude {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "1.0" => Ok(Self::One),
            "2.5" => Ok(Self::TwoAndHalf),
            "4.5" => Ok(Self::FourAndHalf),
            "major" => Ok(Self::Major),
            _ => Err(GeteqError::InvalidMagnitudeOption(s.to_string())),
        }
    }
}

/// Time window of the summary feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedWindow {
    Hour,
    Day,
    Week,
    Month,
}

impl FeedWindow {
    /// File-name token for this window.
    #[must_use]
    pub const fn bucket(self) -> &'static str {
        match self {
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl std::str::FromStr for FeedWindow {
    type Err = GeteqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Self::Hour),
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(GeteqError::InvalidTimeOption(s.to_string())),
        }
    }
}

/// A fully assembled request, plus how its response should be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryUrl {
    url: Url,
    format: OutputFormat,
    endpoint: Endpoint,
    single_event: bool,
}

impl QueryUrl {
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// True if the response is one bare feature rather than a collection.
    #[must_use]
    pub fn is_single_event(&self) -> bool {
        self.single_event
    }
}

impl fmt::Display for QueryUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Build the summary feed URL `{magnitude}_{window}.{extension}`.
///
/// # Errors
///
/// Returns a validation error naming whichever flag is out of range.
pub fn build_feed_url(format: &str, magnitude: &str, window: &str) -> Result<QueryUrl, GeteqError> {
    let magnitude: FeedMagnitude = magnitude.parse()?;
    let window: FeedWindow = window.parse()?;
    let format: OutputFormat = format.parse()?;
    let extension = format.upstream_token(Endpoint::Feed)?;

    let file = format!("{}_{}.{extension}", magnitude.bucket(), window.bucket());
    let url = join_path(FEED_BASE_URL, &file)?;

    debug!("built feed URL {}", url);
    Ok(QueryUrl {
        url,
        format,
        endpoint: Endpoint::Feed,
        single_event: false,
    })
}

/// Build an FDSN search URL from the raw `--magnitude` and `--time` flags.
///
/// # Errors
///
/// Returns a validation error if the format, magnitude or time range is
/// invalid.
pub fn build_search_url(
    operation: &str,
    format: &str,
    magnitude: &str,
    time_range: &str,
) -> Result<QueryUrl, GeteqError> {
    let format: OutputFormat = format.parse()?;
    let mut params = BTreeMap::new();
    params.insert("format", format.upstream_token(Endpoint::Search)?.to_string());

    let MagnitudeSpec { lower, upper } = magnitude.parse()?;
    if let Some(min) = lower {
        params.insert("minmagnitude", min);
    }
    if let Some(max) = upper {
        params.insert("maxmagnitude", max);
    }

    let TimeRangeSpec { start, end } = time_range.parse()?;
    if let Some(start) = start {
        params.insert("starttime", start);
    }
    if let Some(end) = end {
        params.insert("endtime", end);
    }

    search_url(operation, format, &params, false)
}

/// Build an FDSN URL selecting one event by id.
///
/// # Errors
///
/// Returns a validation error if the format or event id is invalid.
pub fn build_single_event_url(
    operation: &str,
    format: &str,
    event_id: &str,
) -> Result<QueryUrl, GeteqError> {
    let format: OutputFormat = format.parse()?;
    let mut params = BTreeMap::new();
    params.insert("format", format.upstream_token(Endpoint::Search)?.to_string());

    let id: EventId = event_id.parse()?;
    params.insert("eventid", id.as_str().to_string());

    search_url(operation, format, &params, true)
}

fn search_url(
    operation: &str,
    format: OutputFormat,
    params: &BTreeMap<&str, String>,
    single_event: bool,
) -> Result<QueryUrl, GeteqError> {
    let mut url = join_path(SEARCH_BASE_URL, operation)?;
    // Keep the `?` even when there are no parameters.
    url.set_query(Some(""));
    url.query_pairs_mut().extend_pairs(params);

    debug!("built search URL {}", url);
    Ok(QueryUrl {
        url,
        format,
        endpoint: Endpoint::Search,
        single_event,
    })
}

fn join_path(base: &str, segment: &str) -> Result<Url, GeteqError> {
    let mut url = Url::parse(base).map_err(|e| GeteqError::Url(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| GeteqError::Url(format!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(query: &QueryUrl, key: &str) -> Option<String> {
        query
            .url()
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    #[test]
    fn test_feed_url() {
        let query = build_feed_url("table", "major", "month").unwrap();
        assert_eq!(
            query.url().as_str(),
            "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_month.geojson"
        );
        assert_eq!(query.format(), OutputFormat::Table);
        assert_eq!(query.endpoint(), Endpoint::Feed);
    }

    #[test]
    fn test_feed_url_buckets() {
        let query = build_feed_url("csv", "2.5", "day").unwrap();
        assert!(query.url().as_str().ends_with("/summary/2.5_day.csv"));

        let query = build_feed_url("json", "all", "hour").unwrap();
        assert!(query.url().as_str().ends_with("/summary/all_hour.geojson"));
    }

    #[test]
    fn test_feed_url_rejects_options() {
        assert!(matches!(
            build_feed_url("table", "3.0", "day"),
            Err(GeteqError::InvalidMagnitudeOption(_))
        ));
        assert!(matches!(
            build_feed_url("table", "all", "year"),
            Err(GeteqError::InvalidTimeOption(_))
        ));
        assert!(matches!(
            build_feed_url("xml", "all", "day"),
            Err(GeteqError::InvalidFormatOption(_))
        ));
        // text is only served by the FDSN endpoint
        assert!(matches!(
            build_feed_url("text", "all", "day"),
            Err(GeteqError::InvalidFormatOption(_))
        ));
    }

    #[test]
    fn test_format_tokens() {
        assert_eq!(OutputFormat::Table.upstream_token(Endpoint::Search).unwrap(), "geojson");
        assert_eq!(OutputFormat::GeoJson.upstream_token(Endpoint::Search).unwrap(), "geojson");
        assert_eq!(OutputFormat::Text.upstream_token(Endpoint::Search).unwrap(), "text");
        assert_eq!(OutputFormat::Csv.upstream_token(Endpoint::Feed).unwrap(), "csv");
        assert!(OutputFormat::GeoJson.upstream_token(Endpoint::Feed).is_err());
    }

    #[test]
    fn test_search_url_exact_magnitude() {
        let query = build_search_url(QUERY_OPERATION, "table", "4.5", "").unwrap();
        assert_eq!(param(&query, "minmagnitude").as_deref(), Some("4.5"));
        assert_eq!(param(&query, "maxmagnitude").as_deref(), Some("4.5"));
        assert_eq!(param(&query, "format").as_deref(), Some("geojson"));
        assert_eq!(param(&query, "starttime"), None);
        assert_eq!(param(&query, "endtime"), None);
        assert!(!query.is_single_event());
    }

    #[test]
    fn test_search_url_key_order() {
        let query =
            build_search_url(QUERY_OPERATION, "csv", ">5", "2024-12-01,2024-12-02").unwrap();
        assert_eq!(
            query.url().as_str(),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?\
             endtime=2024-12-02&format=csv&minmagnitude=5&starttime=2024-12-01"
        );
    }

    #[test]
    fn test_search_url_timestamps() {
        let query = build_search_url(
            QUERY_OPERATION,
            "text",
            "",
            "2024-12-01T12:34:56,2024-12-02T00:00:00",
        )
        .unwrap();
        assert_eq!(param(&query, "starttime").as_deref(), Some("2024-12-01T12:34:56Z"));
        assert_eq!(param(&query, "endtime").as_deref(), Some("2024-12-02T00:00:00Z"));
        assert_eq!(param(&query, "minmagnitude"), None);
    }

    #[test]
    fn test_search_url_operation_is_path_segment() {
        let query = build_search_url("count", "geojson", "", "").unwrap();
        assert_eq!(
            query.url().as_str(),
            "https://earthquake.usgs.gov/fdsnws/event/1/count?format=geojson"
        );
    }

    #[test]
    fn test_search_url_rejects() {
        assert!(matches!(
            build_search_url(QUERY_OPERATION, "xml", "", ""),
            Err(GeteqError::InvalidFormatOption(_))
        ));
        assert!(matches!(
            build_search_url(QUERY_OPERATION, "table", "big", ""),
            Err(GeteqError::InvalidMagnitude(_))
        ));
        assert!(matches!(
            build_search_url(QUERY_OPERATION, "table", "", "2024-12-01"),
            Err(GeteqError::InvalidTimeRange(_))
        ));
    }

    #[test]
    fn test_single_event_url() {
        let query = build_single_event_url(QUERY_OPERATION, "table", "ci40012345").unwrap();
        assert_eq!(
            query.url().as_str(),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?eventid=ci40012345&format=geojson"
        );
        assert!(query.is_single_event());
        assert!(matches!(
            build_single_event_url(QUERY_OPERATION, "table", "^ci12345678"),
            Err(GeteqError::InvalidEventId(_))
        ));
    }
}
