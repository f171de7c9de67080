use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::errors::AppError;

/// `endDate` sentinel for an item that is still ongoing.
pub const PRESENT: &str = "present";

/// A résumé record that failed parse-or-reject at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct ShapeError(String);

impl From<ShapeError> for AppError {
    fn from(err: ShapeError) -> Self {
        AppError::DataShape(err.0)
    }
}

fn shape(msg: impl Into<String>) -> ShapeError {
    ShapeError(msg.into())
}

// ────────────────────────────────────────────────────────────────────────────
// Entry kinds and their per-kind policy
// ────────────────────────────────────────────────────────────────────────────

/// The `type` discriminator of an entry. Unknown types are kept as `Other`
/// and handled with the generic narrative rules.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    Bio,
    Employment,
    Education,
    Projects,
    Skills,
    Other(String),
}

/// How a group is ordered before pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRule {
    /// Keep input order.
    Input,
    /// Highest `details.proficiency` first.
    ByProficiency,
    /// `present` first, then most recent `endDate` first.
    ByEndDate,
}

/// What survives pruning in a sorted group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retention {
    All,
    /// Drop whole entries past the limit.
    KeepFirst(usize),
    /// Keep every entry but clear `description` past the limit.
    DescriptionsFor(usize),
}

/// Which `details` payload a kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadShape {
    Bio,
    Skill,
    Narrative,
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Bio => "bio",
            EntryKind::Employment => "employment",
            EntryKind::Education => "education",
            EntryKind::Projects => "projects",
            EntryKind::Skills => "skills",
            EntryKind::Other(name) => name,
        }
    }

    pub fn sort_rule(&self) -> SortRule {
        match self {
            EntryKind::Bio => SortRule::Input,
            EntryKind::Skills => SortRule::ByProficiency,
            _ => SortRule::ByEndDate,
        }
    }

    pub fn retention(&self) -> Retention {
        match self {
            EntryKind::Bio => Retention::All,
            EntryKind::Skills => Retention::KeepFirst(9),
            EntryKind::Projects => Retention::DescriptionsFor(2),
            _ => Retention::DescriptionsFor(3),
        }
    }

    fn payload_shape(&self) -> PayloadShape {
        match self {
            EntryKind::Bio => PayloadShape::Bio,
            EntryKind::Skills => PayloadShape::Skill,
            _ => PayloadShape::Narrative,
        }
    }
}

impl From<String> for EntryKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bio" => EntryKind::Bio,
            "employment" => EntryKind::Employment,
            "education" => EntryKind::Education,
            "projects" => EntryKind::Projects,
            "skills" => EntryKind::Skills,
            _ => EntryKind::Other(value),
        }
    }
}

#[cfg(test)]
impl From<&str> for EntryKind {
    fn from(value: &str) -> Self {
        EntryKind::from(value.to_string())
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// End dates
// ────────────────────────────────────────────────────────────────────────────

/// A resolved `endDate`. `Present` orders after every concrete date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EndDate {
    On(NaiveDate),
    Present,
}

/// Parses an `endDate` string. Slashes and backslashes are treated as dashes;
/// month- and year-precision dates resolve to the first day of the period.
pub fn parse_end_date(raw: &str) -> Option<EndDate> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(PRESENT) {
        return Some(EndDate::Present);
    }
    parse_calendar_date(&trimmed.replace(['/', '\\'], "-")).map(EndDate::On)
}

fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    let attempts = [
        (s.to_string(), "%Y-%m-%d"),
        (s.to_string(), "%m-%d-%Y"),
        (format!("{s}-01"), "%Y-%m-%d"),
        (format!("01-{s}"), "%d-%m-%Y"),
        (format!("1 {s}"), "%d %B %Y"),
    ];
    attempts
        .iter()
        .find_map(|(candidate, fmt)| NaiveDate::parse_from_str(candidate, fmt).ok())
        .or_else(|| {
            if s.len() != 4 {
                return None;
            }
            s.parse::<i32>()
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
}

// ────────────────────────────────────────────────────────────────────────────
// Details payloads
// ────────────────────────────────────────────────────────────────────────────

/// Details of employment, education, projects and any other dated kind.
/// Template-only fields (`position`, `degree`, `projectSource`, ...) ride in `extra`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NarrativeDetails {
    pub description: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillDetails {
    pub proficiency: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BioDetails {
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryDetails {
    Bio(BioDetails),
    Skill(SkillDetails),
    Narrative(NarrativeDetails),
}

impl EntryDetails {
    fn parse(shape_of: PayloadShape, details: Value) -> Result<Self, serde_json::Error> {
        Ok(match shape_of {
            PayloadShape::Bio => EntryDetails::Bio(serde_json::from_value(details)?),
            PayloadShape::Skill => EntryDetails::Skill(serde_json::from_value(details)?),
            PayloadShape::Narrative => EntryDetails::Narrative(serde_json::from_value(details)?),
        })
    }

    #[cfg(test)]
    pub fn description(&self) -> Option<&[String]> {
        match self {
            EntryDetails::Narrative(d) => Some(&d.description),
            _ => None,
        }
    }

    pub fn clear_description(&mut self) {
        if let EntryDetails::Narrative(d) = self {
            d.description.clear();
        }
    }

    fn into_value(self) -> Value {
        let fields = match self {
            EntryDetails::Narrative(NarrativeDetails { description, mut extra }) => {
                extra.insert(
                    "description".to_string(),
                    Value::Array(description.into_iter().map(Value::String).collect()),
                );
                extra
            }
            EntryDetails::Skill(SkillDetails { proficiency, mut extra }) => {
                extra.insert("proficiency".to_string(), number(proficiency));
                extra
            }
            EntryDetails::Bio(BioDetails { subtitle, social, mut extra }) => {
                if let Some(subtitle) = subtitle {
                    extra.insert("subtitle".to_string(), Value::String(subtitle));
                }
                let links = social
                    .into_iter()
                    .map(|link| {
                        let mut m = Map::new();
                        m.insert("name".to_string(), Value::String(link.name));
                        m.insert("url".to_string(), Value::String(link.url));
                        Value::Object(m)
                    })
                    .collect();
                extra.insert("social".to_string(), Value::Array(links));
                extra
            }
        };
        Value::Object(fields)
    }
}

/// Whole numbers go back out as integers so stored records keep their shape.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::Number(Number::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry
// ────────────────────────────────────────────────────────────────────────────

/// One résumé record, validated against the payload its `type` requires.
///
/// Serializes back to the same camelCase JSON it was parsed from; unknown
/// top-level fields (`user`, `id`, ...) are carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Entry {
    pub kind: EntryKind,
    pub title: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Resolved `end_date`; always set for kinds ordered by end date.
    pub ends: Option<EndDate>,
    pub details: EntryDetails,
    pub extra: Map<String, Value>,
}

impl Entry {
    pub fn proficiency(&self) -> Option<f64> {
        match &self.details {
            EntryDetails::Skill(d) => Some(d.proficiency),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn description(&self) -> Option<&[String]> {
        self.details.description()
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Result<Option<String>, ShapeError> {
    match fields.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(shape(format!("`{key}` must be a string, got {other}"))),
    }
}

impl TryFrom<Value> for Entry {
    type Error = ShapeError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(shape("entry must be a JSON object"));
        };

        let kind = match take_string(&mut fields, "type")? {
            Some(t) if !t.trim().is_empty() => EntryKind::from(t),
            _ => return Err(shape("missing `type`")),
        };
        let title = take_string(&mut fields, "title")?
            .ok_or_else(|| shape(format!("{kind} entry is missing `title`")))?;
        let start_date = take_string(&mut fields, "startDate")?;
        let end_date = take_string(&mut fields, "endDate")?;

        let ends = if kind.sort_rule() == SortRule::ByEndDate {
            let raw = end_date
                .as_deref()
                .ok_or_else(|| shape(format!("{kind} entry '{title}' is missing `endDate`")))?;
            let parsed = parse_end_date(raw).ok_or_else(|| {
                shape(format!("{kind} entry '{title}' has unparsable `endDate` '{raw}'"))
            })?;
            Some(parsed)
        } else {
            end_date.as_deref().and_then(parse_end_date)
        };

        let details = match fields.remove("details") {
            Some(details @ Value::Object(_)) => details,
            Some(_) => return Err(shape(format!("{kind} entry '{title}': `details` must be an object"))),
            None => return Err(shape(format!("{kind} entry '{title}' is missing `details`"))),
        };
        let details = EntryDetails::parse(kind.payload_shape(), details)
            .map_err(|e| shape(format!("{kind} entry '{title}': invalid `details`: {e}")))?;

        Ok(Entry {
            kind,
            title,
            start_date,
            end_date,
            ends,
            details,
            extra: fields,
        })
    }
}

impl From<Entry> for Value {
    fn from(entry: Entry) -> Self {
        let mut fields = entry.extra;
        fields.insert("type".to_string(), Value::String(entry.kind.into()));
        fields.insert("title".to_string(), Value::String(entry.title));
        if let Some(start) = entry.start_date {
            fields.insert("startDate".to_string(), Value::String(start));
        }
        if let Some(end) = entry.end_date {
            fields.insert("endDate".to_string(), Value::String(end));
        }
        fields.insert("details".to_string(), entry.details.into_value());
        Value::Object(fields)
    }
}
