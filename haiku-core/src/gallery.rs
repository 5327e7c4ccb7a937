//! Session gallery of approved haiku

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{image_path, PLACEHOLDER_IMAGE};
use crate::proposal::ProposalRecord;

/// Id of the record shown before anything is approved
pub const PLACEHOLDER_ID: &str = "placeholder";

/// A haiku the user approved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedHaiku {
    /// Unique id, assigned at approval
    pub id: String,
    /// Japanese lines
    pub japanese_lines: Vec<String>,
    /// English lines, aligned with `japanese_lines`
    pub english_lines: Vec<String>,
    /// Display path of the illustration
    pub image_path: String,
    /// When the haiku was approved
    pub created_at: DateTime<Utc>,
}

impl ApprovedHaiku {
    fn from_record(record: &ProposalRecord, image_base_path: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            japanese_lines: record.japanese_lines.clone(),
            english_lines: record.english_lines.clone(),
            image_path: image_path(image_base_path, &record.image_id),
            created_at: Utc::now(),
        }
    }

    /// The verse shown while the gallery is empty
    pub fn placeholder(image_base_path: &str) -> Self {
        Self {
            id: PLACEHOLDER_ID.to_string(),
            japanese_lines: vec![
                "仮の句よ".to_string(),
                "まっさらながら".to_string(),
                "花を呼ぶ".to_string(),
            ],
            english_lines: vec![
                "A placeholder verse—".to_string(),
                "even in a blank canvas,".to_string(),
                "it beckons flowers.".to_string(),
            ],
            image_path: image_path(image_base_path, PLACEHOLDER_IMAGE),
            created_at: Utc::now(),
        }
    }

    /// Pairs of (Japanese, English) lines; a missing translation reads as empty
    pub fn verses(&self) -> impl Iterator<Item = (&str, &str)> {
        self.japanese_lines.iter().enumerate().map(|(i, ja)| {
            let en = self.english_lines.get(i).map(String::as_str).unwrap_or("");
            (ja.as_str(), en)
        })
    }
}

/// Result of [`Gallery::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The haiku is now displayed
    Selected,
    /// No approved haiku has that id; nothing changed
    NotFound,
}

/// Approved haiku (newest first) plus the one being displayed.
///
/// The active record is either the placeholder or a gallery entry, and it is
/// never empty.
#[derive(Debug, Clone)]
pub struct Gallery {
    approved: Vec<ApprovedHaiku>,
    active: ApprovedHaiku,
    image_base_path: String,
}

impl Gallery {
    /// Create an empty gallery showing the placeholder
    pub fn new(image_base_path: impl Into<String>) -> Self {
        let image_base_path = image_base_path.into();
        Self {
            approved: Vec::new(),
            active: ApprovedHaiku::placeholder(&image_base_path),
            image_base_path,
        }
    }

    /// Approved haiku, newest first
    pub fn approved(&self) -> &[ApprovedHaiku] {
        &self.approved
    }

    /// The haiku on display
    pub fn active(&self) -> &ApprovedHaiku {
        &self.active
    }

    /// Whether the placeholder is still on display
    pub fn showing_placeholder(&self) -> bool {
        self.active.id == PLACEHOLDER_ID
    }

    /// Look up an approved haiku
    pub fn get(&self, haiku_id: &str) -> Option<&ApprovedHaiku> {
        self.approved.iter().find(|haiku| haiku.id == haiku_id)
    }

    /// Number of approved haiku
    pub fn len(&self) -> usize {
        self.approved.len()
    }

    /// Check if nothing has been approved
    pub fn is_empty(&self) -> bool {
        self.approved.is_empty()
    }

    /// Base path used to build image paths
    pub fn image_base_path(&self) -> &str {
        &self.image_base_path
    }

    /// Add an approved record at the front and display it.
    ///
    /// Callers guard against approving the same proposal twice; see
    /// [`ProposalReview`](crate::review::ProposalReview).
    pub fn approve(&mut self, record: &ProposalRecord) -> &ApprovedHaiku {
        let haiku = ApprovedHaiku::from_record(record, &self.image_base_path);
        info!(haiku_id = %haiku.id, image = %record.image_id, "Haiku approved");
        self.active = haiku.clone();
        self.approved.insert(0, haiku);
        &self.active
    }

    /// Record a rejection. The gallery is left untouched.
    pub fn reject(&self, record: &ProposalRecord) {
        info!(
            image = %record.image_id,
            first_line = record.japanese_lines.first().map(String::as_str).unwrap_or(""),
            "Haiku rejected"
        );
    }

    /// Display a previously approved haiku
    pub fn select(&mut self, haiku_id: &str) -> Selection {
        match self.get(haiku_id) {
            Some(haiku) => {
                self.active = haiku.clone();
                Selection::Selected
            }
            None => {
                debug!(haiku_id, "Selection ignored, no such haiku");
                Selection::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(first: &str) -> ProposalRecord {
        ProposalRecord {
            japanese_lines: vec![first.to_string(), "二".to_string(), "三".to_string()],
            english_lines: vec!["one".to_string(), "two".to_string(), "three".to_string()],
            image_id: PLACEHOLDER_IMAGE.to_string(),
        }
    }

    #[test]
    fn test_starts_with_placeholder() {
        let gallery = Gallery::new("/haiku-images");
        assert!(gallery.is_empty());
        assert!(gallery.showing_placeholder());
        assert_eq!(gallery.active().japanese_lines.len(), 3);
        assert_eq!(
            gallery.active().image_path,
            format!("/haiku-images/{}", PLACEHOLDER_IMAGE)
        );
    }

    #[test]
    fn test_approve_prepends_and_activates() {
        let mut gallery = Gallery::new("/haiku-images");
        let first_id = gallery.approve(&record("一")).id.clone();
        let second_id = gallery.approve(&record("壱")).id.clone();

        assert_eq!(gallery.len(), 2);
        assert_ne!(first_id, second_id);
        assert_eq!(gallery.approved()[0].id, second_id);
        assert_eq!(gallery.approved()[1].id, first_id);
        assert_eq!(gallery.active().id, second_id);
        assert!(!gallery.showing_placeholder());
    }

    #[test]
    fn test_reject_changes_nothing() {
        let mut gallery = Gallery::new("/haiku-images");
        gallery.approve(&record("一"));
        let before = gallery.active().clone();

        gallery.reject(&record("壱"));

        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.active(), &before);
    }

    #[test]
    fn test_select() {
        let mut gallery = Gallery::new("/haiku-images");
        let older = gallery.approve(&record("一")).id.clone();
        gallery.approve(&record("壱"));

        assert_eq!(gallery.select(&older), Selection::Selected);
        assert_eq!(gallery.active().id, older);

        assert_eq!(gallery.select("missing"), Selection::NotFound);
        assert_eq!(gallery.active().id, older);

        // the placeholder is not a gallery entry
        assert_eq!(gallery.select(PLACEHOLDER_ID), Selection::NotFound);
    }

    #[test]
    fn test_verses_pad_missing_translation() {
        let haiku = ApprovedHaiku {
            english_lines: vec!["only one".to_string()],
            ..ApprovedHaiku::placeholder("/img")
        };
        let verses: Vec<_> = haiku.verses().collect();
        assert_eq!(verses.len(), 3);
        assert_eq!(verses[1], ("まっさらながら", ""));
    }
}
