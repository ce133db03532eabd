//! Contextual prayer recommendations.
//!
//! Pure functions selecting a "prayer of the day" and a short suggested
//! list from the catalog and the current wall-clock time. The only
//! non-determinism is the tie-break among a matched rule's candidates,
//! which goes through an injectable picker so tests can pin it.

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use rand::Rng;

use crate::models::{all_prayers, Prayer, PrayerCategory};

/// Maximum entries returned by [`suggested_prayers`].
pub const MAX_SUGGESTED: usize = 4;

const MORNING_IDS: [&str; 3] = ["before-study", "guardian-angel", "morning-prayer"];
const EVENING_IDS: [&str; 2] = ["angelus", "guardian-angel"];
const MONDAY_IDS: [&str; 2] = ["before-study", "guardian-angel"];
const FRIDAY_IDS: [&str; 2] = ["st-michael", "act-contrition"];
const SUNDAY_IDS: [&str; 2] = ["rosary-intro", "sacred-heart"];

/// One category is featured per weekday when no time or day rule matches.
const CATEGORY_ROTATION: [&str; 5] = ["devotional", "protection", "consecrations", "marian", "other"];

const SUGGESTED_MORNING_IDS: [&str; 4] = ["before-study", "guardian-angel", "angelus", "st-joseph"];
const SUGGESTED_EVENING_IDS: [&str; 4] = ["angelus", "guardian-angel", "act-contrition", "st-michael"];
const SUGGESTED_DEFAULT_IDS: [&str; 4] = ["angelus", "before-study", "guardian-angel", "sacred-heart"];

/// Time-of-day and day-of-week classification of a single instant.
///
/// Morning, afternoon, and evening partition the 24-hour day: every hour
/// falls in exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeContext {
    pub hour: u32,
    pub weekday: Weekday,
}

impl TimeContext {
    pub fn from_datetime(now: NaiveDateTime) -> Self {
        Self {
            hour: now.hour(),
            weekday: now.weekday(),
        }
    }

    /// The context for the current local time.
    pub fn now() -> Self {
        Self::from_datetime(Local::now().naive_local())
    }

    pub fn is_morning(&self) -> bool {
        (6..12).contains(&self.hour)
    }

    pub fn is_afternoon(&self) -> bool {
        (12..18).contains(&self.hour)
    }

    pub fn is_evening(&self) -> bool {
        self.hour >= 18 || self.hour < 6
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }

    pub fn is_weekday(&self) -> bool {
        !self.is_weekend()
    }
}

/// A recommended prayer with the rule's justification.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub prayer: Prayer,
    pub reason: String,
    /// Identifier of the chosen prayer's own category.
    pub category: String,
}

/// Pick the prayer of the day using a thread-local random tie-break.
pub fn prayer_of_the_day(categories: &[PrayerCategory], now: NaiveDateTime) -> Option<Recommendation> {
    let mut rng = rand::thread_rng();
    prayer_of_the_day_with(categories, now, &mut |len| rng.gen_range(0..len))
}

/// Pick the prayer of the day with an injected tie-break.
///
/// Rules are evaluated as an ordered cascade; the first rule with a
/// non-empty candidate set wins and `pick(len)` chooses among its
/// candidates. Returns None only when the catalog itself is empty.
pub fn prayer_of_the_day_with(
    categories: &[PrayerCategory],
    now: NaiveDateTime,
    pick: &mut dyn FnMut(usize) -> usize,
) -> Option<Recommendation> {
    let context = TimeContext::from_datetime(now);
    let catalog = all_prayers(categories);

    if context.is_morning() {
        if let Some(prayer) = choose_by_ids(&catalog, &MORNING_IDS, pick) {
            return Some(recommend(prayer, "Perfect for starting your day with prayer"));
        }
    }

    if context.is_evening() {
        if let Some(prayer) = choose_by_ids(&catalog, &EVENING_IDS, pick) {
            return Some(recommend(prayer, "A peaceful prayer to end your day"));
        }
    }

    match context.weekday {
        Weekday::Mon => {
            if let Some(prayer) = choose_by_ids(&catalog, &MONDAY_IDS, pick) {
                return Some(recommend(prayer, "Start your week with spiritual guidance"));
            }
        }
        Weekday::Fri => {
            if let Some(prayer) = choose_by_ids(&catalog, &FRIDAY_IDS, pick) {
                return Some(recommend(prayer, "Reflect and prepare for the weekend"));
            }
        }
        Weekday::Sun => {
            if let Some(prayer) = choose_by_ids(&catalog, &SUNDAY_IDS, pick) {
                return Some(recommend(prayer, "Sunday is perfect for deeper devotion"));
            }
        }
        _ => {}
    }

    // Featured category, rotating through the week.
    let rotation_index =
        context.weekday.num_days_from_sunday() as usize % CATEGORY_ROTATION.len();
    let featured_id = CATEGORY_ROTATION[rotation_index];
    if let Some(category) = categories.iter().find(|c| c.id == featured_id) {
        if !category.prayers.is_empty() {
            let chosen = &category.prayers[clamped(pick, category.prayers.len())];
            let prayer = Prayer {
                category: category.id.clone(),
                ..chosen.clone()
            };
            let reason = format!("Featured {} prayer", category.title.to_lowercase());
            return Some(recommend(prayer, &reason));
        }
    }

    // Ultimate fallback: anything in the catalog.
    if catalog.is_empty() {
        return None;
    }
    let prayer = catalog[clamped(pick, catalog.len())].clone();
    Some(recommend(prayer, "A prayer for your spiritual journey"))
}

/// Suggested prayers for the current time of day: a fixed id filter over
/// the catalog, truncated to the first [`MAX_SUGGESTED`] matches in
/// catalog order. Not randomized.
pub fn suggested_prayers(categories: &[PrayerCategory], now: NaiveDateTime) -> Vec<Prayer> {
    let context = TimeContext::from_datetime(now);
    let catalog = all_prayers(categories);

    let ids: &[&str] = if context.is_morning() {
        &SUGGESTED_MORNING_IDS
    } else if context.is_evening() {
        &SUGGESTED_EVENING_IDS
    } else {
        &SUGGESTED_DEFAULT_IDS
    };

    catalog
        .into_iter()
        .filter(|prayer| ids.contains(&prayer.id.as_str()))
        .take(MAX_SUGGESTED)
        .collect()
}

fn recommend(prayer: Prayer, reason: &str) -> Recommendation {
    let category = prayer.category.clone();
    Recommendation {
        prayer,
        reason: reason.to_string(),
        category,
    }
}

fn choose_by_ids(
    catalog: &[Prayer],
    ids: &[&str],
    pick: &mut dyn FnMut(usize) -> usize,
) -> Option<Prayer> {
    let candidates: Vec<&Prayer> = catalog
        .iter()
        .filter(|prayer| ids.contains(&prayer.id.as_str()))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[clamped(pick, candidates.len())].clone())
}

/// Guard against pickers that return an out-of-range index.
fn clamped(pick: &mut dyn FnMut(usize) -> usize, len: usize) -> usize {
    pick(len).min(len - 1)
}
