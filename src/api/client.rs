//! HTTP client for the hosted prayer backend.
//!
//! This module provides the `ApiClient` struct implementing
//! [`RemoteDataSource`] over the backend's JSON REST surface: the prayer
//! catalog, suggested prayers, user profiles, and per-user activity
//! documents.

use std::time::Duration;

use chrono::NaiveDate;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt, TryStreamExt};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{
    sort_suggested, Prayer, PrayerCategory, ReminderSettings, UserProfile, VerseOfTheDay,
};

use super::{ApiError, RemoteDataSource};

// ============================================================================
// Constants
// ============================================================================

/// Base URL for the hosted backend.
const DEFAULT_BASE_URL: &str = "https://api.praycache.app/v1";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum concurrent per-category prayer fetches.
const MAX_CONCURRENT_CATEGORY_FETCHES: usize = 4;

/// API client for the prayer backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the default backend.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against an explicit base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Set the bearer token for authenticated requests.
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    /// Create a new client with the given token, sharing the connection pool.
    pub fn with_token(&self, token: String) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Reject empty identifiers before any I/O is attempted.
    fn require_id(value: &str, name: &str) -> Result<(), ApiError> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidArgument(format!("{} must not be empty", name)));
        }
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(method, self.url(path));
        if let Some(ref token) = self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path).send().await?;
        let response = Self::check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", path, e)))
    }

    /// Send a mutation with an optional JSON body, discarding the response.
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Catalog =====

    pub async fn fetch_all_prayers(&self) -> Result<Vec<Prayer>, ApiError> {
        let response = self.request(Method::GET, "/prayers").send().await?;
        let response = Self::check_response(response).await?;
        let text = response.text().await?;

        // Try to parse as array directly first, then as wrapped object
        if let Ok(prayers) = serde_json::from_str::<Vec<Prayer>>(&text) {
            return Ok(prayers);
        }

        #[derive(Deserialize)]
        struct PrayersWrapper {
            #[serde(default)]
            prayers: Vec<Prayer>,
        }

        let wrapper: PrayersWrapper = serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse prayer list: {}", e)))?;
        Ok(wrapper.prayers)
    }

    pub async fn fetch_prayer_categories(&self) -> Result<Vec<PrayerCategory>, ApiError> {
        let categories: Vec<PrayerCategory> = self.get_json("/prayerCategories").await?;

        // Fill in each category's prayers, a few categories at a time.
        // `buffered` keeps the catalog in its served order.
        let categories: Vec<PrayerCategory> = stream::iter(
            categories
                .into_iter()
                .filter(|category| {
                    if category.id.is_empty() {
                        warn!("Category document missing id, skipping");
                        return false;
                    }
                    true
                })
                .map(|category| {
                    let client = self.clone();
                    async move {
                        let prayers: Vec<Prayer> = client
                            .get_json(&format!("/prayers?category={}", category.id))
                            .await?;
                        debug!(category = %category.id, count = prayers.len(), "Fetched category prayers");
                        Ok::<_, ApiError>(PrayerCategory { prayers, ..category })
                    }
                }),
        )
        .buffered(MAX_CONCURRENT_CATEGORY_FETCHES)
        .try_collect()
        .await?;

        Ok(categories)
    }

    pub async fn fetch_suggested_prayers(&self) -> Result<Vec<Prayer>, ApiError> {
        let prayers: Vec<Prayer> = self.get_json("/prayers/suggested").await?;
        debug!(count = prayers.len(), "Fetched suggested prayers");
        Ok(sort_suggested(prayers))
    }

    // ===== User profile =====

    pub async fn fetch_user_profile(&self, user_id: &str) -> Result<Option<UserProfile>, ApiError> {
        Self::require_id(user_id, "user id")?;
        match self.get_json(&format!("/users/{}", user_id)).await {
            Ok(profile) => Ok(Some(profile)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn add_bookmark(&self, user_id: &str, prayer_id: &str) -> Result<(), ApiError> {
        Self::require_id(user_id, "user id")?;
        Self::require_id(prayer_id, "prayer id")?;
        let body = serde_json::json!({ "prayerId": prayer_id });
        self.send(
            Method::POST,
            &format!("/users/{}/bookmarks", user_id),
            Some(&body),
        )
        .await
    }

    pub async fn remove_bookmark(&self, user_id: &str, prayer_id: &str) -> Result<(), ApiError> {
        Self::require_id(user_id, "user id")?;
        Self::require_id(prayer_id, "prayer id")?;
        let path = format!("/users/{}/bookmarks/{}", user_id, prayer_id);
        match self.send::<()>(Method::DELETE, &path, None).await {
            // Removing a bookmark that is already gone is a no-op.
            Err(ApiError::NotFound(_)) => Ok(()),
            result => result,
        }
    }

    pub async fn increment_prayer_count(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> Result<(), ApiError> {
        Self::require_id(user_id, "user id")?;
        Self::require_id(prayer_id, "prayer id")?;
        self.send::<()>(
            Method::POST,
            &format!("/users/{}/stats/{}", user_id, prayer_id),
            None,
        )
        .await
    }

    pub async fn fetch_recent_prayers(&self, user_id: &str) -> Result<Vec<String>, ApiError> {
        Self::require_id(user_id, "user id")?;
        match self
            .get_json::<RecentDocument>(&format!("/users/{}/recent", user_id))
            .await
        {
            Ok(doc) => Ok(doc.prayers),
            Err(ApiError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    pub async fn add_recent_prayer(&self, user_id: &str, prayer_id: &str) -> Result<(), ApiError> {
        Self::require_id(user_id, "user id")?;
        Self::require_id(prayer_id, "prayer id")?;

        // The capped, de-duplicated list is computed here and the whole
        // document replaced, matching the backend's storage shape.
        let recent = self.fetch_recent_prayers(user_id).await?;
        let updated = crate::models::push_recent(&recent, prayer_id);
        let body = RecentDocument { prayers: updated };
        self.send(
            Method::PUT,
            &format!("/users/{}/recent", user_id),
            Some(&body),
        )
        .await
    }

    pub async fn update_preferences(
        &self,
        user_id: &str,
        preferences: &ReminderSettings,
    ) -> Result<(), ApiError> {
        Self::require_id(user_id, "user id")?;
        self.send(
            Method::PUT,
            &format!("/users/{}/preferences", user_id),
            Some(preferences),
        )
        .await
    }

    // ===== Verse of the day =====

    pub async fn fetch_verse_of_the_day(
        &self,
        date: NaiveDate,
    ) -> Result<Option<VerseOfTheDay>, ApiError> {
        let path = format!("/verses/{}", date.format("%Y-%m-%d"));
        match self.get_json(&path).await {
            Ok(verse) => Ok(Some(verse)),
            Err(ApiError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Per-user recent-prayers document.
#[derive(Debug, Serialize, Deserialize)]
struct RecentDocument {
    #[serde(default)]
    prayers: Vec<String>,
}

impl RemoteDataSource for ApiClient {
    fn fetch_all_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>> {
        Box::pin(ApiClient::fetch_all_prayers(self))
    }

    fn fetch_prayer_categories(&self) -> BoxFuture<'_, Result<Vec<PrayerCategory>, ApiError>> {
        Box::pin(ApiClient::fetch_prayer_categories(self))
    }

    fn fetch_suggested_prayers(&self) -> BoxFuture<'_, Result<Vec<Prayer>, ApiError>> {
        Box::pin(ApiClient::fetch_suggested_prayers(self))
    }

    fn fetch_user_profile(
        &self,
        user_id: &str,
    ) -> BoxFuture<'_, Result<Option<UserProfile>, ApiError>> {
        let user_id = user_id.to_string();
        Box::pin(async move { ApiClient::fetch_user_profile(self, &user_id).await })
    }

    fn add_bookmark(&self, user_id: &str, prayer_id: &str) -> BoxFuture<'_, Result<(), ApiError>> {
        let (user_id, prayer_id) = (user_id.to_string(), prayer_id.to_string());
        Box::pin(async move { ApiClient::add_bookmark(self, &user_id, &prayer_id).await })
    }

    fn remove_bookmark(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        let (user_id, prayer_id) = (user_id.to_string(), prayer_id.to_string());
        Box::pin(async move { ApiClient::remove_bookmark(self, &user_id, &prayer_id).await })
    }

    fn increment_prayer_count(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        let (user_id, prayer_id) = (user_id.to_string(), prayer_id.to_string());
        Box::pin(async move { ApiClient::increment_prayer_count(self, &user_id, &prayer_id).await })
    }

    fn fetch_recent_prayers(&self, user_id: &str) -> BoxFuture<'_, Result<Vec<String>, ApiError>> {
        let user_id = user_id.to_string();
        Box::pin(async move { ApiClient::fetch_recent_prayers(self, &user_id).await })
    }

    fn add_recent_prayer(
        &self,
        user_id: &str,
        prayer_id: &str,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        let (user_id, prayer_id) = (user_id.to_string(), prayer_id.to_string());
        Box::pin(async move { ApiClient::add_recent_prayer(self, &user_id, &prayer_id).await })
    }

    fn update_preferences(
        &self,
        user_id: &str,
        preferences: &ReminderSettings,
    ) -> BoxFuture<'_, Result<(), ApiError>> {
        let (user_id, preferences) = (user_id.to_string(), preferences.clone());
        Box::pin(async move { ApiClient::update_preferences(self, &user_id, &preferences).await })
    }

    fn fetch_verse_of_the_day(
        &self,
        date: NaiveDate,
    ) -> BoxFuture<'_, Result<Option<VerseOfTheDay>, ApiError>> {
        Box::pin(ApiClient::fetch_verse_of_the_day(self, date))
    }
}
