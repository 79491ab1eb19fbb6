//! Output formatters for earthquake responses.
//!
//! Renders a feature collection as a fixed-width table, a single feature as
//! a labeled detail listing, or echoes the raw response body untouched.

use std::fmt::Display;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::endpoint::{Endpoint, QueryUrl};
use crate::errors::GeteqError;
use crate::models::{Feature, FeatureCollection};

/// Printed instead of a table when nothing matched.
pub const NO_RECORDS: &str = "No records matched under the given criteria.";

/// Placeholder for values absent from the response.
const MISSING: &str = "-";

/// Wall-clock layout for all rendered timestamps.
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Descriptive labels for the short magnitude-type codes used by USGS.
const MAG_TYPE_LABELS: &[(&str, &str)] = &[
    ("md", "Duration Magnitude (Md)"),
    ("ml", "Richter Scale Magnitude (Ml)"),
    ("ms", "20 sec Surface Wave Magnitude (Ms)"),
    ("mw", "Moment Magnitude (Mw)"),
    ("mww", "Moment Magnitude, W-Phase (Mww)"),
    ("me", "Energy Magnitude (Me)"),
    ("mi", "Integrated P-Wave Magnitude (Mi)"),
    ("mb", "Short-Period Body Wave Magnitude (Mb)"),
    ("mlg", "Short-Period Surface Wave Magnitude (Mlg)"),
];

/// Expand a magnitude-type code, passing unknown codes through.
#[must_use]
pub fn resolve_mag_type(code: &str) -> &str {
    MAG_TYPE_LABELS
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(code))
        .map_or(code, |(_, label)| *label)
}

fn format_utc(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(
        || MISSING.to_string(),
        |t| t.format(DATE_TIME_FORMAT).to_string(),
    )
}

fn fixed(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.precision$}"))
}

fn or_missing<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

/// Write events as a fixed-width table.
///
/// The event id column is only shown for FDSN search results.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table<W: Write>(
    writer: &mut W,
    collection: &FeatureCollection,
    endpoint: Endpoint,
) -> io::Result<()> {
    if collection.features.is_empty() {
        return writeln!(writer, "{NO_RECORDS}");
    }

    let show_id = endpoint == Endpoint::Search;

    if show_id {
        write!(writer, "{:<12} ", "EventId")?;
    }
    writeln!(
        writer,
        "{:<19} {:>6} {:<42} {:>7} {:>8}",
        "Date-Time UTC", "Mag", "Place", "Lat", "Long"
    )?;

    for event in &collection.features {
        if show_id {
            write!(writer, "{:<12} ", event.id)?;
        }

        let time = format_utc(event.time());
        let mag = fixed(event.properties.mag, 2);
        let place = event.properties.place.as_deref().unwrap_or(MISSING);

        writeln!(
            writer,
            "{time:<19} {mag:>6} {place:<42} {:>7.2} {:>8.2}",
            event.latitude(),
            event.longitude()
        )?;
    }
    Ok(())
}

/// Write the detailed view of one event.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_single_event<W: Write>(writer: &mut W, event: &Feature) -> io::Result<()> {
    let p = &event.properties;

    let fields = [
        ("Event Id", event.id.clone()),
        ("Review Status", or_missing(p.status.as_deref())),
        ("Time (UTC)", format_utc(event.time())),
        ("Updated Time (UTC)", format_utc(event.updated())),
        ("Time Zone Offset", or_missing(p.tz)),
        ("Place", or_missing(p.place.as_deref())),
        ("Magnitude", fixed(p.mag, 2)),
        (
            "Magnitude Type",
            or_missing(p.mag_type.as_deref().map(resolve_mag_type)),
        ),
        ("Depth", format!("{:.2} km", event.depth_km())),
        ("Latitude", format!("{:.2}", event.latitude())),
        ("Longitude", format!("{:.2}", event.longitude())),
        ("Distance to Nearest Station (deg)", fixed(p.dmin, 6)),
        ("Largest Azimuthal Gap (deg)", fixed(p.gap, 2)),
        ("RMS Travel Time Residual (sec)", fixed(p.rms, 3)),
        ("Seismic Event Type", or_missing(p.event_type.as_deref())),
        ("PAGER Alert Level", or_missing(p.alert.as_deref())),
        ("Felt Reports (DYFI)", or_missing(p.felt)),
        ("Community Intensity (CDI)", fixed(p.cdi, 2)),
        ("Modified Mercalli Intensity (MMI)", fixed(p.mmi, 2)),
        ("Significance", or_missing(p.sig)),
        ("Tsunami Flag", or_missing(p.tsunami)),
        ("Stations Used", or_missing(p.nst)),
        ("Associated Event Ids", or_missing(p.ids.as_deref())),
        ("Contributing Networks", or_missing(p.sources.as_deref())),
        ("Preferred Network", or_missing(p.net.as_deref())),
        ("Event Code", or_missing(p.code.as_deref())),
    ];

    writeln!(writer, "Single Event Details")?;
    writeln!(writer, "--------------------")?;
    for (label, value) in fields {
        writeln!(writer, "{label}: {value}")?;
    }
    Ok(())
}

/// Decode a feature collection body and write it as a table.
///
/// Nothing is written if the body does not decode.
///
/// # Errors
///
/// Returns [`GeteqError::MalformedResponse`] for an invalid body, or an I/O
/// error if writing fails.
pub fn render_table<W: Write>(
    writer: &mut W,
    body: &[u8],
    endpoint: Endpoint,
) -> Result<(), GeteqError> {
    let collection = FeatureCollection::from_slice(body)?;
    if let Some(metadata) = &collection.metadata {
        debug!(
            "{}: {} events reported",
            metadata.title.as_deref().unwrap_or("untitled response"),
            or_missing(metadata.count)
        );
    }
    debug!("decoded {} events", collection.features.len());
    write_table(writer, &collection, endpoint)?;
    Ok(())
}

/// Decode a single feature body and write its detailed view.
///
/// # Errors
///
/// Returns [`GeteqError::MalformedResponse`] for an invalid body, or an I/O
/// error if writing fails.
pub fn render_single_event<W: Write>(writer: &mut W, body: &[u8]) -> Result<(), GeteqError> {
    let event = Feature::from_slice(body)?;
    write_single_event(writer, &event)?;
    Ok(())
}

/// Write a response body the way `query` asked for it.
///
/// Table output decodes the body as a single event or a collection; every
/// other format is echoed verbatim.
///
/// # Errors
///
/// Returns [`GeteqError::MalformedResponse`] if a table was requested and the
/// body does not decode, or an I/O error if writing fails.
pub fn render_response<W: Write>(
    writer: &mut W,
    query: &QueryUrl,
    body: &[u8],
) -> Result<(), GeteqError> {
    if !query.format().is_table() {
        write_raw(writer, body)?;
    } else if query.is_single_event() {
        render_single_event(writer, body)?;
    } else {
        render_table(writer, body, query.endpoint())?;
    }
    Ok(())
}

/// Echo a response body followed by a newline.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_raw<W: Write>(writer: &mut W, body: &[u8]) -> io::Result<()> {
    writer.write_all(body)?;
    writeln!(writer)
}
