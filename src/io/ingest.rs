//! CSV ingest and normalization.
//!
//! Turns a heterogeneous ESP table into clean `(domain, year, log10_esp)`
//! points that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no fitting logic here
//!
//! Expected columns (case-insensitive): `domain`, `time_period`, `esp`.
//! Time periods are free text ("1953", "1950-1960", "10 kya", "2.5 ma");
//! rows whose period cannot be resolved to a calendar year are excluded
//! with a row note, as are rows with a non-positive ESP (the log transform
//! is undefined there).

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DatasetStats, DomainSample, EspPoint, Observation};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub domain: Option<String>,
    pub message: String,
}

/// Ingest output: normalized points + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub points: Vec<EspPoint>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    /// Wrap pre-normalized points (demo data) in the ingest container.
    pub fn from_points(points: Vec<EspPoint>) -> Result<Self, AppError> {
        let rows_read = points.len();
        let stats = compute_stats(&points)
            .ok_or_else(|| AppError::no_data("No valid points in generated sample."))?;
        Ok(Self {
            rows_used: points.len(),
            points,
            stats,
            row_errors: Vec::new(),
            rows_read,
        })
    }
}

/// Load and normalize an ESP CSV.
pub fn load_esp_points(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for required in ["domain", "time_period", "esp"] {
        if !header_map.contains_key(required) {
            return Err(AppError::usage(format!("Missing required column: `{required}`")));
        }
    }

    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header row, and CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    domain: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(point) => points.push(point),
            Err((domain, message)) => row_errors.push(RowError {
                line,
                domain,
                message,
            }),
        }
    }

    let rows_used = points.len();
    if rows_used == 0 {
        return Err(AppError::no_data("No valid rows remain after normalization."));
    }

    let stats = compute_stats(&points)
        .ok_or_else(|| AppError::no_data("No valid points remain after normalization."))?;

    Ok(IngestedData {
        points,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Group points into per-domain samples, sorted by domain then year.
pub fn group_by_domain(points: &[EspPoint]) -> Vec<DomainSample> {
    let mut groups: BTreeMap<&str, Vec<Observation>> = BTreeMap::new();
    for p in points {
        groups.entry(p.domain.as_str()).or_default().push(Observation {
            year: p.year,
            log10_esp: p.log10_esp,
        });
    }
    groups
        .into_iter()
        .map(|(domain, observations)| DomainSample::new(domain, observations))
        .collect()
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<EspPoint, (Option<String>, String)> {
    let domain = get_required(record, header_map, "domain").map_err(|e| (None, e))?;
    let domain_tag = Some(domain.to_string());

    let period = get_required(record, header_map, "time_period")
        .map_err(|e| (domain_tag.clone(), e))?;
    let year = parse_time_period(period)
        .ok_or_else(|| (domain_tag.clone(), format!("Unparseable time period '{period}'.")))?;

    let esp_text = get_required(record, header_map, "esp").map_err(|e| (domain_tag.clone(), e))?;
    let esp: f64 = esp_text
        .parse()
        .map_err(|_| (domain_tag.clone(), format!("Invalid `esp` value '{esp_text}'.")))?;
    if !esp.is_finite() || esp <= 0.0 {
        // The response is log10(ESP); a non-positive quantity has no log.
        return Err((domain_tag, format!("Non-positive `esp` value {esp}.")));
    }

    Ok(EspPoint {
        domain: domain.to_string(),
        year,
        esp,
        log10_esp: esp.log10(),
    })
}

/// Parse a free-text time period into a calendar-year estimate.
///
/// Supported forms, checked in order:
/// - "unknown" / "modern" / empty → `None`
/// - `ga` / `ma` / `kya` / `bp` suffixes → midpoint of the stated numbers,
///   converted with the 1950 before-present convention
/// - `YYYY-YYYY` ranges (3–4 digit endpoints) → midpoint
/// - any standalone 19xx/20xx year → that year
pub fn parse_time_period(text: &str) -> Option<f64> {
    let text = text.trim().to_ascii_lowercase();
    if text.is_empty() || text.contains("unknown") || text.contains("modern") {
        return None;
    }

    for (unit, factor) in [("ga", 1e9), ("ma", 1e6), ("kya", 1e3), ("bp", 1.0)] {
        if text.contains(unit) {
            let mid = midpoint_of_numbers(&text)?;
            return Some(1950.0 - mid * factor);
        }
    }

    if let Some(mid) = parse_year_range(&text) {
        return Some(mid);
    }

    find_calendar_year(&text)
}

/// Extract every unsigned number token and return the midpoint of the
/// extremes. `-` between numbers is a range separator, not a sign.
fn midpoint_of_numbers(text: &str) -> Option<f64> {
    let mut numbers = Vec::new();
    let mut token = String::new();

    for ch in text.chars().chain(std::iter::once(' ')) {
        if ch.is_ascii_digit() || ch == '.' {
            token.push(ch);
        } else if !token.is_empty() {
            if let Ok(v) = token.parse::<f64>() {
                numbers.push(v);
            }
            token.clear();
        }
    }

    if numbers.is_empty() {
        return None;
    }
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min + max) / 2.0)
}

/// `YYYY-YYYY` (3–4 digit endpoints, optional spaces around the dash).
fn parse_year_range(text: &str) -> Option<f64> {
    let (left, right) = text.split_once('-')?;
    let left = left.trim();
    let right = right.trim();

    let is_year = |s: &str| (3..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit());
    if !is_year(left) || !is_year(right) {
        return None;
    }

    let start: f64 = left.parse().ok()?;
    let end: f64 = right.parse().ok()?;
    Some((start + end) / 2.0)
}

/// First standalone 4-digit run starting with 19 or 20.
fn find_calendar_year(text: &str) -> Option<f64> {
    for run in text.split(|c: char| !c.is_ascii_digit()) {
        if run.len() == 4 && (run.starts_with("19") || run.starts_with("20")) {
            return run.parse().ok();
        }
    }
    None
}

fn compute_stats(points: &[EspPoint]) -> Option<DatasetStats> {
    let mut year_min = f64::INFINITY;
    let mut year_max = f64::NEG_INFINITY;
    let mut esp_min = f64::INFINITY;
    let mut esp_max = f64::NEG_INFINITY;
    let mut domains = BTreeSet::new();

    for p in points {
        year_min = year_min.min(p.year);
        year_max = year_max.max(p.year);
        esp_min = esp_min.min(p.esp);
        esp_max = esp_max.max(p.esp);
        domains.insert(p.domain.as_str());
    }

    if !year_min.is_finite() || !year_max.is_finite() || !esp_min.is_finite() || !esp_max.is_finite() {
        return None;
    }

    Some(DatasetStats {
        n_points: points.len(),
        n_domains: domains.len(),
        year_min,
        year_max,
        esp_min,
        esp_max,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel-style UTF-8 CSVs sometimes carry a BOM on the first header;
    // without stripping it, schema validation reports a missing column.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}
