//! Data models for prayer companion entities.
//!
//! This module contains the data structures shared by the cache, sync,
//! and recommendation layers:
//!
//! - `Prayer`, `PrayerCategory`: the prayer catalog
//! - `UserProfile`, `ReminderSettings`: account data and preferences
//! - `VerseOfTheDay`: daily scripture verse

pub mod prayer;
pub mod user;
pub mod verse;

pub use prayer::{all_prayers, sort_suggested, Prayer, PrayerCategory, SUGGESTION_ORDER_UNRANKED};
pub use user::{push_recent, ReminderSettings, UserProfile, UserRole, RECENT_PRAYERS_LIMIT};
pub use verse::VerseOfTheDay;
