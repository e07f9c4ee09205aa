//! Core domain model and pure list pipeline for Noticeboard: recency buckets,
//! ordering, query matching and pagination.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CRATE_NAME: &str = "noticeboard-core";

const MILLIS_PER_DAY: i64 = 86_400_000;

/// One parsed row of the source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Record {
    pub title: String,
    pub date: Option<String>,
    pub id: Option<String>,
    /// Remaining columns, keyed by header name.
    #[serde(default)]
    pub extra: BTreeMap<String, String>,
}

impl Record {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Build a record from `(header, value)` pairs. `title` and `date` match
    /// their header exactly; the identifier is read from `Id` (or `id`).
    /// Empty `date`/`Id` cells count as absent.
    pub fn from_fields<I, K, V>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut record = Self::default();
        for (key, value) in fields {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "title" => record.title = value,
                "date" => record.date = non_empty(value),
                "Id" | "id" => {
                    if record.id.is_none() {
                        record.id = non_empty(value);
                    }
                }
                _ => {
                    record.extra.insert(key, value);
                }
            }
        }
        record
    }

    pub fn has_title(&self) -> bool {
        !self.title.is_empty()
    }

    /// Parsed date, if the text is present and well formed.
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(parse_date)
    }

    /// Instant used for ordering and bucketing. Missing or unparseable dates
    /// collapse to the Unix epoch.
    pub fn instant(&self) -> DateTime<Utc> {
        self.parsed_date().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Short display form of the date, e.g. `Oct 18, 2026`.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%b %-d, %Y").to_string(),
            None => "Invalid Date".to_string(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

const NAIVE_DATE_TIME_FORMATS: [&str; 10] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    // Spreadsheet exports.
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

/// Parse record date text. Accepts RFC 3339, ISO-8601 date-times without an
/// offset, plain ISO dates and US numeric dates; naive values are read as UTC.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Recency label used for section headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bucket {
    Upcoming,
    Today,
    ThisWeek,
    ThisMonth,
    Older,
}

impl Bucket {
    pub fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Today => "Today",
            Self::ThisWeek => "This Week",
            Self::ThisMonth => "This Month",
            Self::Older => "Older",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whole days between `date` and `now`, floored toward negative infinity.
pub fn days_between(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - date).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

pub fn classify(date: DateTime<Utc>, now: DateTime<Utc>) -> Bucket {
    match days_between(date, now) {
        d if d < 0 => Bucket::Upcoming,
        0 => Bucket::Today,
        1..=7 => Bucket::ThisWeek,
        8..=30 => Bucket::ThisMonth,
        _ => Bucket::Older,
    }
}

/// Absolute distance between the record's instant and `now`, in milliseconds.
pub fn distance_ms(record: &Record, now: DateTime<Utc>) -> u64 {
    (now - record.instant()).num_milliseconds().unsigned_abs()
}

/// Case-aware title key: case-insensitive first, then lowercase before
/// uppercase for titles that differ only in case.
fn title_key(title: &str) -> (String, Reverse<String>) {
    (title.to_lowercase(), Reverse(title.to_string()))
}

/// Order applied once after a load: closest to `now` first, then by title.
pub fn sort_initial(records: &mut [Record], now: DateTime<Utc>) {
    records.sort_by_cached_key(|r| (distance_ms(r, now), title_key(&r.title)));
}

/// Order applied after filtering: distance only. Ties keep their relative order.
pub fn sort_by_distance(records: &mut [Record], now: DateTime<Utc>) {
    records.sort_by_cached_key(|r| distance_ms(r, now));
}

/// Which fields a query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterScope {
    /// Title or date text.
    #[default]
    Broad,
    /// Title only.
    Narrow,
}

impl FromStr for FilterScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broad" => Ok(Self::Broad),
            "narrow" => Ok(Self::Narrow),
            other => Err(format!("unknown filter scope `{other}` (expected broad or narrow)")),
        }
    }
}

pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase().trim().to_string()
}

/// `query` must already be normalized with [`normalize_query`].
pub fn matches(record: &Record, query: &str, scope: FilterScope) -> bool {
    if query.is_empty() {
        return true;
    }
    if record.title.to_lowercase().contains(query) {
        return true;
    }
    match scope {
        FilterScope::Broad => record
            .date
            .as_deref()
            .map(|d| d.to_lowercase().contains(query))
            .unwrap_or(false),
        FilterScope::Narrow => false,
    }
}

pub fn filter_records(records: &[Record], query: &str, scope: FilterScope) -> Vec<Record> {
    records
        .iter()
        .filter(|r| matches(r, query, scope))
        .cloned()
        .collect()
}

/// Pagination metadata for one page of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageModel {
    pub current_page: usize,
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub page_numbers: Vec<usize>,
    pub previous: Option<usize>,
    pub next: Option<usize>,
}

impl PageModel {
    /// Whether page-link controls render at all.
    pub fn shows_controls(&self, hide_single_page: bool) -> bool {
        if hide_single_page {
            self.total_pages > 1
        } else {
            self.total_pages > 0
        }
    }

    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1))
}

/// Compute slice bounds and page links. Out-of-range pages yield an empty
/// slice at the end of the sequence rather than invalid bounds.
pub fn paginate(total_items: usize, page_size: usize, current_page: usize) -> PageModel {
    let page_size = page_size.max(1);
    let current_page = current_page.max(1);
    let total_pages = total_pages(total_items, page_size);
    let start_index = ((current_page - 1).saturating_mul(page_size)).min(total_items);
    let end_index = start_index.saturating_add(page_size).min(total_items);

    PageModel {
        current_page,
        total_pages,
        start_index,
        end_index,
        page_numbers: (1..=total_pages).collect(),
        previous: (current_page > 1).then(|| current_page - 1),
        next: (current_page < total_pages).then(|| current_page + 1),
    }
}

/// `0 results`, `1 result`, `12 results` for the given singular noun.
pub fn results_summary(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
