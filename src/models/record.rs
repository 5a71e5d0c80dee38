use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::TopicResult;

/// Kind of move discussed on the call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CallType {
    LocalHourly,
    LongDistance,
    Interstate,
    Storage,
    #[default]
    Unknown,
}

impl CallType {
    /// Phrase used in generated letters; empty for unknown
    pub fn describe(&self) -> &'static str {
        match self {
            CallType::LocalHourly => "local hourly",
            CallType::LongDistance => "long-distance",
            CallType::Interstate => "interstate regulated",
            CallType::Storage => "storage-only",
            CallType::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoveSize {
    Studio,
    OneBedroom,
    TwoBedroom,
    ThreeBedroom,
    FourPlusBedroom,
    Office,
    #[default]
    Unknown,
}

impl MoveSize {
    pub fn describe(&self) -> Option<&'static str> {
        match self {
            MoveSize::Studio => Some("studio apartment"),
            MoveSize::OneBedroom => Some("1 bedroom"),
            MoveSize::TwoBedroom => Some("2 bedroom"),
            MoveSize::ThreeBedroom => Some("3 bedroom"),
            MoveSize::FourPlusBedroom => Some("4+ bedroom"),
            MoveSize::Office => Some("office"),
            MoveSize::Unknown => None,
        }
    }
}

/// A reviewed call as persisted in the history store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub rep_name: String,
    #[serde(default)]
    pub call_date: Option<NaiveDate>,
    pub transcript: String,
    pub results: Vec<TopicResult>,
    #[serde(default)]
    pub notes: String,
    /// Percent score, 0-100
    pub score: u8,
    pub fully_passed: bool,
}

impl CallRecord {
    /// Create a record with a fresh id and the current timestamp
    pub fn new(transcript: String, results: Vec<TopicResult>, score: u8, fully_passed: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            rep_name: String::new(),
            call_date: None,
            transcript,
            results,
            notes: String::new(),
            score,
            fully_passed,
        }
    }
}
