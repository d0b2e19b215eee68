use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// One stored submission as the remote store returns it.
///
/// Every column is optional and loosely typed. Columns the store adds beyond
/// the known schema are kept in `extra` so a record always carries exactly
/// the field set it was fetched with.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Value>,
    #[serde(rename = "Nickname", default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<Value>,
    #[serde(rename = "Score", default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    #[serde(rename = "Mood", default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Value>,
    #[serde(rename = "Word", default, skip_serializing_if = "Option::is_none")]
    pub word: Option<Value>,
    #[serde(rename = "Summary", default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(rename = "Praise", default, skip_serializing_if = "Option::is_none")]
    pub praise: Option<Value>,
    #[serde(rename = "Helpful", default, skip_serializing_if = "Option::is_none")]
    pub helpful: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Timestamp,
    Nickname,
    Score,
    Mood,
    Word,
    Summary,
    Praise,
    Helpful,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Timestamp,
        Field::Nickname,
        Field::Score,
        Field::Mood,
        Field::Word,
        Field::Summary,
        Field::Praise,
        Field::Helpful,
    ];

    /// Column name used by the remote store.
    pub fn key(self) -> &'static str {
        match self {
            Field::Timestamp => "Timestamp",
            Field::Nickname => "Nickname",
            Field::Score => "Score",
            Field::Mood => "Mood",
            Field::Word => "Word",
            Field::Summary => "Summary",
            Field::Praise => "Praise",
            Field::Helpful => "Helpful",
        }
    }
}

impl Record {
    pub fn get(&self, field: Field) -> Option<&Value> {
        let value = match field {
            Field::Timestamp => &self.timestamp,
            Field::Nickname => &self.nickname,
            Field::Score => &self.score,
            Field::Mood => &self.mood,
            Field::Word => &self.word,
            Field::Summary => &self.summary,
            Field::Praise => &self.praise,
            Field::Helpful => &self.helpful,
        };
        value.as_ref().filter(|v| !v.is_null())
    }

    /// Display text for a field; absent and null values become `""`.
    pub fn text(&self, field: Field) -> String {
        self.get(field).map(value_to_text).unwrap_or_default()
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.get(Field::Timestamp).and_then(parse_timestamp)
    }
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                match n.as_f64() {
                    Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                        format!("{}", f as i64)
                    }
                    Some(f) => f.to_string(),
                    None => n.to_string(),
                }
            }
        }
        other => other.to_string(),
    }
}

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Parses a stored timestamp. Strings are tried as RFC 3339 first, then as
/// naive UTC date-times and dates; numbers are epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => parse_timestamp_str(raw),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mood {
    #[default]
    Calm,
    Joy,
    Neutral,
    Anger,
    Sadness,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Calm,
        Mood::Joy,
        Mood::Neutral,
        Mood::Anger,
        Mood::Sadness,
    ];

    /// Label stored in the `Mood` column.
    pub fn label(self) -> &'static str {
        match self {
            Mood::Calm => "편안",
            Mood::Joy => "기쁨",
            Mood::Neutral => "보통",
            Mood::Anger => "화남",
            Mood::Sadness => "슬픔",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Mood::Calm => "😌",
            Mood::Joy => "☺️",
            Mood::Neutral => "🫤",
            Mood::Anger => "😤",
            Mood::Sadness => "😢",
        }
    }

    fn alias(self) -> &'static str {
        match self {
            Mood::Calm => "calm",
            Mood::Joy => "joy",
            Mood::Neutral => "neutral",
            Mood::Anger => "anger",
            Mood::Sadness => "sadness",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Mood::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
#[error("invalid mood '{0}', expected one of 편안, 기쁨, 보통, 화남, 슬픔")]
pub struct MoodError(pub String);

impl FromStr for Mood {
    type Err = MoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let lower = raw.to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.label() == raw || m.alias() == lower)
            .ok_or_else(|| MoodError(s.to_string()))
    }
}

/// Glyph for a stored mood label, or the label itself when it is unknown.
pub fn mood_glyph(raw: &str) -> String {
    match Mood::from_label(raw) {
        Some(mood) => mood.glyph().to_string(),
        None => raw.to_string(),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid score '{0}', expected one of 10, 20, ..., 100")]
pub struct ScoreError(pub String);

/// A score from the fixed set 10, 20, ..., 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(10);
    pub const MAX: Score = Score(100);
    pub const STEP: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ScoreError> {
        if value < Self::MIN.0 || value > Self::MAX.0 || value % Self::STEP != 0 {
            return Err(ScoreError(value.to_string()));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        format!("{}점", self.0)
    }

    pub fn all() -> impl Iterator<Item = Score> {
        (Self::MIN.0..=Self::MAX.0)
            .step_by(Self::STEP as usize)
            .map(Score)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Score {
    type Err = ScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let raw = raw.strip_suffix('점').unwrap_or(raw).trim();
        let value = raw
            .parse::<u8>()
            .map_err(|_| ScoreError(s.to_string()))?;
        Score::new(value).map_err(|_| ScoreError(s.to_string()))
    }
}

fn score_as_string<S: Serializer>(score: &Score, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&score.to_string())
}

/// Body of an append request. The store assigns the timestamp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmissionPayload {
    #[serde(serialize_with = "score_as_string")]
    pub score: Score,
    pub mood: String,
    pub word: String,
    pub summary: String,
    pub praise: String,
    pub helpful: String,
    pub nickname: String,
}
