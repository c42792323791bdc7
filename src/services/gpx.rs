// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPX track parsing and the distance/time math behind the upload form.

use crate::error::{AppError, Result};
use crate::models::{TimeSpan, TrackPoint, UploadMetadata};
use crate::time_utils::parse_iso8601;
use geo::{Distance, Haversine, Point};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Great-circle distance in metres between two (lat, lon) pairs.
pub fn haversine_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    // geo points are (x = lon, y = lat)
    Haversine.distance(Point::new(a.1, a.0), Point::new(b.1, b.0))
}

/// Sum of distances between consecutive points, in metres.
///
/// Zero for empty and single-point tracks.
pub fn track_distance_meters(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_meters((pair[0].lat, pair[0].lon), (pair[1].lat, pair[1].lon)))
        .sum()
}

/// Earliest and latest timestamp among the points, regardless of order.
pub fn time_span(points: &[TrackPoint]) -> Option<TimeSpan> {
    TimeSpan::from_times(points.iter().filter_map(|p| p.time))
}

/// Parse every `<trkpt>` of a GPX document, in document order.
///
/// The root `<gpx>` element must declare a default namespace. Namespace
/// prefixes on element names are ignored.
pub fn parse_track_points(input: &[u8]) -> Result<Vec<TrackPoint>> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();

    let mut seen_root = false;
    let mut points = Vec::new();
    let mut current: Option<TrackPoint> = None;
    let mut in_time_element = false;
    let mut time_text = String::new();

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Err(e) => {
                return Err(AppError::GpxParse(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            Ok(Event::Eof) => break,
            Ok(event) => event.into_owned(),
        };

        match event {
            Event::Start(ref e) | Event::Empty(ref e) if !seen_root => {
                if e.local_name().as_ref() != b"gpx" {
                    return Err(AppError::GpxParse("root element is not <gpx>".to_string()));
                }
                if attribute(e, b"xmlns")?.is_none() {
                    return Err(AppError::GpxNamespaceNotFound);
                }
                seen_root = true;
            }

            Event::Start(ref e) => match e.local_name().as_ref() {
                b"trkpt" => current = Some(read_trkpt(e)?),
                b"time" if current.is_some() => {
                    in_time_element = true;
                    time_text.clear();
                }
                _ => {}
            },

            // <trkpt lat=".." lon=".."/> carries no children, hence no time
            Event::Empty(ref e) if e.local_name().as_ref() == b"trkpt" => {
                points.push(read_trkpt(e)?);
            }

            Event::Text(ref e) if in_time_element => {
                let text = std::str::from_utf8(e)
                    .map_err(|err| AppError::GpxParse(format!("invalid UTF-8 in <time>: {}", err)))?;
                time_text.push_str(text);
            }

            Event::End(ref e) => match e.local_name().as_ref() {
                b"time" if in_time_element => {
                    in_time_element = false;
                    let parsed = parse_iso8601(&time_text).ok_or_else(|| {
                        AppError::GpxParse(format!("invalid timestamp: {}", time_text.trim()))
                    })?;
                    if let Some(point) = current.as_mut() {
                        point.time = Some(parsed);
                    }
                }
                b"trkpt" => {
                    if let Some(point) = current.take() {
                        points.push(point);
                    }
                }
                _ => {}
            },

            _ => {}
        }

        buf.clear();
    }

    if !seen_root {
        return Err(AppError::GpxParse("document has no root element".to_string()));
    }

    Ok(points)
}

/// Derive the upload form values from a parsed track.
pub fn upload_metadata(points: &[TrackPoint]) -> Result<UploadMetadata> {
    let span = time_span(points)
        .ok_or_else(|| AppError::GpxParse("track has no timestamped points".to_string()))?;

    Ok(UploadMetadata {
        start_time: span.start,
        end_time: span.end,
        duration_secs: span.duration().num_seconds(),
        distance_meters: track_distance_meters(points),
        point_count: points.len(),
    })
}

/// Parse a GPX document and derive its upload metadata.
pub fn metadata_from_gpx(input: &[u8]) -> Result<UploadMetadata> {
    let points = parse_track_points(input)?;
    tracing::debug!(points = points.len(), "Parsed GPX track");
    upload_metadata(&points)
}

/// Read a GPX file from disk and derive its upload metadata.
pub fn metadata_from_file<P: AsRef<Path>>(path: P) -> Result<UploadMetadata> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| {
        AppError::Internal(anyhow::Error::new(e).context(format!("reading {}", path.display())))
    })?;
    metadata_from_gpx(&data)
}

fn read_trkpt(e: &BytesStart<'_>) -> Result<TrackPoint> {
    let lat = coordinate(e, b"lat")?;
    let lon = coordinate(e, b"lon")?;
    Ok(TrackPoint {
        lat,
        lon,
        time: None,
    })
}

fn coordinate(e: &BytesStart<'_>, name: &[u8]) -> Result<f64> {
    let label = String::from_utf8_lossy(name);
    let raw = attribute(e, name)?
        .ok_or_else(|| AppError::GpxParse(format!("trkpt without {}", label)))?;
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::GpxParse(format!("invalid {}: {}", label, raw)))?;
    let limit = if name == b"lat" { 90.0 } else { 180.0 };
    if !value.is_finite() || value.abs() > limit {
        return Err(AppError::GpxParse(format!("{} out of range: {}", label, value)));
    }
    Ok(value)
}

fn attribute(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| AppError::GpxParse(format!("bad attribute: {}", err)))?;
        if attr.key.as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).into_owned()));
        }
    }
    Ok(None)
}
