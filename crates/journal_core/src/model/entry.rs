//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the canonical photo journal record and its wire shape.
//! - Sanitize create-form input into a storable entry payload.
//!
//! # Invariants
//! - `id` is assigned once at creation and stable across edits.
//! - A sanitized rating is always within `[0, 5]`.
//! - A sanitized entry always carries at least one category.

use crate::date::{format_dmy, parse_dmy_or, try_parse_dmy};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque entry identifier.
pub type EntryId = String;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;
/// Rating used when create input is not a finite number.
pub const DEFAULT_RATING: f64 = 3.0;
/// Increment applied by the quick edit action.
pub const RATING_STEP: f64 = 0.1;
pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_DESCRIPTION: &str = "(no description)";
pub const PLACEHOLDER_IMAGE_URL: &str = "https://picsum.photos/seed/journal/800/600";

static DMY_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid date shape regex"));

/// Generates a fresh entry id.
pub fn new_entry_id() -> EntryId {
    Uuid::new_v4().to_string()
}

/// Photo journal record attached to one calendar day.
///
/// Serialized with the field names of the persisted journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    #[serde(rename = "imgUrl")]
    pub img_url: String,
    pub rating: f64,
    pub categories: Vec<String>,
    /// `DD/MM/YYYY`. Kept verbatim so malformed persisted values survive a save.
    pub date: String,
    pub description: String,
}

impl JournalEntry {
    /// Builds an entry from a create payload with a caller-provided id.
    pub fn with_id(id: EntryId, entry: NewEntry) -> Self {
        Self {
            id,
            img_url: entry.img_url,
            rating: entry.rating,
            categories: entry.categories,
            date: entry.date,
            description: entry.description,
        }
    }

    /// Calendar day of this entry, or `today` when the stored date is malformed.
    pub fn day(&self, today: NaiveDate) -> NaiveDate {
        parse_dmy_or(&self.date, today)
    }

    /// Rating text as shown on entry chips and matched by search, e.g. `3.0`.
    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }

    /// Applies an edit. Fields absent from `patch` are left unchanged.
    pub fn apply(&mut self, patch: EntryPatch) {
        if let Some(img_url) = patch.img_url {
            self.img_url = img_url;
        }
        if let Some(rating) = patch.rating {
            self.rating = clamp_rating(rating);
        }
        if let Some(categories) = patch.categories {
            if !categories.is_empty() {
                self.categories = categories;
            }
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// Entry payload without an id, as produced by seeds and the add flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(rename = "imgUrl")]
    pub img_url: String,
    pub rating: f64,
    pub categories: Vec<String>,
    pub date: String,
    pub description: String,
}

impl NewEntry {
    /// Enforces the stored-entry invariants without touching date or text fields.
    ///
    /// Applied by the store on every add.
    pub fn normalized(mut self) -> Self {
        self.rating = clamp_rating(self.rating);
        if self.categories.iter().all(|category| category.trim().is_empty()) {
            self.categories = vec![DEFAULT_CATEGORY.to_string()];
        }
        self
    }

    /// Normalizes raw create-form input.
    ///
    /// - blank image → placeholder URL
    /// - rating clamped to `[0, 5]`, non-finite → `3`
    /// - categories trimmed, empties dropped, none left → `General`
    /// - date not shaped `DD/MM/YYYY` or not a real day → `today`
    /// - blank description → `(no description)`
    pub fn sanitized(self, today: NaiveDate) -> Self {
        let img_url = match self.img_url.trim() {
            "" => PLACEHOLDER_IMAGE_URL.to_string(),
            trimmed => trimmed.to_string(),
        };

        let mut categories = self
            .categories
            .iter()
            .map(|category| category.trim())
            .filter(|category| !category.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        if categories.is_empty() {
            categories.push(DEFAULT_CATEGORY.to_string());
        }

        let date = if DMY_SHAPE_RE.is_match(&self.date) && try_parse_dmy(&self.date).is_some() {
            self.date
        } else {
            format_dmy(today)
        };

        let description = match self.description.trim() {
            "" => DEFAULT_DESCRIPTION.to_string(),
            trimmed => trimmed.to_string(),
        };

        Self {
            img_url,
            rating: clamp_rating(self.rating),
            categories,
            date,
            description,
        }
    }
}

/// Raw create-form input, before sanitizing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryForm {
    pub img_url: String,
    pub rating: f64,
    /// Comma-separated category labels.
    pub categories: String,
    pub date: String,
    pub description: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            img_url: String::new(),
            rating: 4.0,
            categories: "Notes".to_string(),
            date: String::new(),
            description: String::new(),
        }
    }
}

impl EntryForm {
    /// Converts form input into a storable payload. See [`NewEntry::sanitized`].
    pub fn into_new_entry(self, today: NaiveDate) -> NewEntry {
        NewEntry {
            img_url: self.img_url,
            rating: self.rating,
            categories: split_categories(&self.categories),
            date: self.date.trim().to_string(),
            description: self.description,
        }
        .sanitized(today)
    }
}

/// Splits comma-separated category input into labels.
pub fn split_categories(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Partial edit of an existing entry. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub img_url: Option<String>,
    pub rating: Option<f64>,
    pub categories: Option<Vec<String>>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Clamps a rating into `[0, 5]`; non-finite input becomes the mid-scale default.
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_RATING, MAX_RATING)
    } else {
        DEFAULT_RATING
    }
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_rating, split_categories, EntryForm, JournalEntry, NewEntry, DEFAULT_RATING,
    };
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 14).unwrap()
    }

    #[test]
    fn clamp_rating_bounds_and_defaults() {
        assert_eq!(clamp_rating(7.5), 5.0);
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(4.2), 4.2);
        assert_eq!(clamp_rating(f64::NAN), DEFAULT_RATING);
        assert_eq!(clamp_rating(f64::INFINITY), DEFAULT_RATING);
    }

    #[test]
    fn sanitized_fills_every_blank_field() {
        let raw = NewEntry {
            img_url: "   ".to_string(),
            rating: f64::NAN,
            categories: vec![" ".to_string(), String::new()],
            date: "2025-09-01".to_string(),
            description: "\n".to_string(),
        };

        let clean = raw.sanitized(today());
        assert_eq!(clean.img_url, super::PLACEHOLDER_IMAGE_URL);
        assert_eq!(clean.rating, 3.0);
        assert_eq!(clean.categories, vec!["General".to_string()]);
        assert_eq!(clean.date, "14/09/2025");
        assert_eq!(clean.description, "(no description)");
    }

    #[test]
    fn sanitized_rejects_impossible_calendar_day() {
        let raw = NewEntry {
            img_url: "a.png".to_string(),
            rating: 2.0,
            categories: vec!["Food".to_string()],
            date: "31/02/2025".to_string(),
            description: "cake".to_string(),
        };
        assert_eq!(raw.sanitized(today()).date, "14/09/2025");
    }

    #[test]
    fn form_defaults_and_category_text_flow_into_entry() {
        let form = EntryForm {
            date: " 03/09/2025 ".to_string(),
            description: "lunch".to_string(),
            ..EntryForm::default()
        };
        let entry = form.into_new_entry(today());
        assert_eq!(entry.rating, 4.0);
        assert_eq!(entry.categories, vec!["Notes".to_string()]);
        assert_eq!(entry.date, "03/09/2025");

        let blank = EntryForm {
            categories: " , ".to_string(),
            ..EntryForm::default()
        };
        assert_eq!(
            blank.into_new_entry(today()).categories,
            vec!["General".to_string()]
        );
    }

    #[test]
    fn split_categories_drops_empty_labels() {
        assert_eq!(
            split_categories("Hair, ,Nails,"),
            vec!["Hair".to_string(), "Nails".to_string()]
        );
    }

    #[test]
    fn rating_label_uses_one_decimal() {
        let entry = JournalEntry::with_id(
            "fixed".to_string(),
            NewEntry {
                img_url: String::new(),
                rating: 3.0,
                categories: vec!["x".to_string()],
                date: "01/01/2025".to_string(),
                description: String::new(),
            },
        );
        assert_eq!(entry.rating_label(), "3.0");
    }
}
