//! Verse-of-the-day model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A scripture verse published for a single calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseOfTheDay {
    pub id: String,
    pub verse: String,
    pub reference: String,
    pub date: NaiveDate,
}
