//! Domain models for the prayer catalog.
//!
//! These types mirror the backend document shapes, which use camelCase
//! field names on the wire.

use serde::{Deserialize, Serialize};

/// Suggestion order assigned to entries that have none, so they sort last.
pub const SUGGESTION_ORDER_UNRANKED: u32 = 999;

/// A single prayer in the catalog.
///
/// Owned by the remote data source; local copies are read-only snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prayer {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Identifier of the owning category.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_suggested: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_order: Option<u32>,
}

impl Prayer {
    /// Sort key for the suggested list. Entries without an explicit
    /// order rank after every ordered entry.
    pub fn suggestion_rank(&self) -> u32 {
        self.suggestion_order.unwrap_or(SUGGESTION_ORDER_UNRANKED)
    }
}

/// A catalog category with its nested prayers.
///
/// A prayer belongs to exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrayerCategory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub prayers: Vec<Prayer>,
}

/// Flatten categories into a single prayer list, stamping each prayer's
/// `category` field from its owning category.
pub fn all_prayers(categories: &[PrayerCategory]) -> Vec<Prayer> {
    categories
        .iter()
        .flat_map(|category| {
            category.prayers.iter().map(|prayer| Prayer {
                category: category.id.clone(),
                ..prayer.clone()
            })
        })
        .collect()
}

/// Sort a suggested-prayer list by suggestion order, ascending.
/// The sort is stable, so unranked entries keep their fetch order.
pub fn sort_suggested(mut prayers: Vec<Prayer>) -> Vec<Prayer> {
    prayers.sort_by_key(|p| p.suggestion_rank());
    prayers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prayer(id: &str, order: Option<u32>) -> Prayer {
        Prayer {
            id: id.to_string(),
            title: id.to_string(),
            content: String::new(),
            category: "devotional".to_string(),
            subcategory: None,
            description: None,
            tags: None,
            image: None,
            display_order: None,
            is_suggested: Some(true),
            suggestion_order: order,
        }
    }

    #[test]
    fn test_suggestion_rank_defaults_to_unranked() {
        assert_eq!(prayer("a", Some(2)).suggestion_rank(), 2);
        assert_eq!(prayer("b", None).suggestion_rank(), SUGGESTION_ORDER_UNRANKED);
    }

    #[test]
    fn test_sort_suggested_orders_unranked_last() {
        let sorted = sort_suggested(vec![
            prayer("unranked-1", None),
            prayer("second", Some(2)),
            prayer("first", Some(1)),
            prayer("unranked-2", None),
        ]);

        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        // Stable sort keeps the two unranked entries in fetch order.
        assert_eq!(ids, vec!["first", "second", "unranked-1", "unranked-2"]);
    }

    #[test]
    fn test_all_prayers_stamps_owning_category() {
        let categories = vec![
            PrayerCategory {
                id: "protection".to_string(),
                title: "Protection".to_string(),
                description: String::new(),
                icon: "shield".to_string(),
                prayers: vec![prayer("guardian-angel", None)],
            },
            PrayerCategory {
                id: "marian".to_string(),
                title: "Marian".to_string(),
                description: String::new(),
                icon: "rose".to_string(),
                prayers: vec![prayer("rosary-intro", None)],
            },
        ];

        let flat = all_prayers(&categories);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].category, "protection");
        assert_eq!(flat[1].category, "marian");
    }

    #[test]
    fn test_prayer_wire_format_is_camel_case() {
        let json = serde_json::to_value(prayer("angelus", Some(1))).expect("serialize");
        assert!(json.get("suggestionOrder").is_some());
        assert!(json.get("isSuggested").is_some());
        assert!(json.get("suggestion_order").is_none());
    }
}
