//! Remote backend client module.
//!
//! This module defines the [`RemoteDataSource`] contract consumed by the
//! sync layer, and provides [`ApiClient`], the HTTP implementation
//! against the hosted backend. The sync coordinator only ever sees the
//! trait, so tests substitute stub implementations.

pub mod client;
pub mod error;

use chrono::NaiveDate;
use futures::future::BoxFuture;

use crate::models::{Prayer, PrayerCategory, ReminderSettings, UserProfile, VerseOfTheDay};

pub use client::ApiClient;
pub use error::ApiError;

/// The remote document store, as consumed by the cache/sync layer.
///
/// Mutation operations validate their identifiers before any I/O and
/// reject empty ones with [`ApiError::InvalidArgument`].
pub trait RemoteDataSource: Send + Sync {
    /// All prayers across every category.
    fn fetch_all_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>>;

    /// All categories, each with its nested prayers.
    fn fetch_prayer_categories(&self) -> BoxFuture<'_, Result<Vec<PrayerCategory>, ApiError>>;

    /// Prayers flagged as suggested, sorted by suggestion order
    /// ascending; entries without an order sort last.
    fn fetch_suggested_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>>;

    /// The profile document for the user, or None when it does not exist.
    fn fetch_user_profile(
        &self,
        user_id: &str,
    ) -> BoxFuture<'_, Result<Option<UserProfile>, ApiError>>;

    /// Set-style add to the profile's bookmark list. Idempotent.
    fn add_bookmark(&self, user_id: &str, prayer_id: &str) -> BoxFuture<'_, Result<(), ApiError>>;

    /// Set-style remove from the profile's bookmark list. Idempotent.
    fn remove_bookmark(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    /// Increment the per-prayer usage counter.
    fn increment_prayer_count(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    /// The user's recent-prayer ids, most recent first.
    fn fetch_recent_prayers(&self, user_id: &str) -> BoxFuture<'_, Result<Vec<String>, ApiError>>;

    /// Record a prayer as most recently used. The stored list is
    /// de-duplicated and capped at ten entries.
    fn add_recent_prayer(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    /// Replace the profile's reminder preferences.
    fn update_preferences(
        &self,
        user_id: &str,
        preferences: &ReminderSettings,
    ) -> BoxFuture<'_, Result<(), ApiError>>;

    /// The verse published for the given date, if any.
    fn fetch_verse_of_the_day(
        &self,
        date: NaiveDate,
    ) -> BoxFuture<'_, Result<Option<VerseOfTheDay>, ApiError>>;
}
