//! Image catalog
//!
//! The fixed set of illustrations a haiku may reference. Catalogs are built
//! from `'static` slices so the set is known at build time and cannot change
//! while a session is running.

use crate::error::{Error, Result};

/// Images shipped with the garden, in display order.
pub const BUILTIN_IMAGES: &[&str] = &[
    "Bonsai_Tree_Potted_Japanese_Art_Green_Foliage.jpeg",
    "Cherry_Blossoms_Sakura_Night_View_City_Lights_Japan.jpg",
    "Ginkaku-ji_Silver_Pavilion_Kyoto_Japanese_Garden_Pond_Reflection.jpg",
    "Itsukushima_Shrine_Miyajima_Floating_Torii_Gate_Sunset_Long_Exposure.jpg",
    "Mount_Fuji_Lake_Reflection_Cherry_Blossoms_Sakura_Spring.jpg",
    "Osaka_Castle_Turret_Stone_Wall_Pine_Trees_Daytime.jpg",
    "Senso-ji_Temple_Asakusa_Cherry_Blossoms_Kimono_Umbrella.jpg",
    "Shirakawa-go_Gassho-zukuri_Thatched_Roof_Village_Aerial_View.jpg",
    "Takachiho_Gorge_Waterfall_River_Lush_Greenery_Japan.jpg",
    "Tokyo_Skyline_Night_Tokyo_Tower_Mount_Fuji_View.jpg",
];

/// Image shown with the placeholder verse before anything is approved.
pub const PLACEHOLDER_IMAGE: &str = "Mount_Fuji_Lake_Reflection_Cherry_Blossoms_Sakura_Spring.jpg";

/// Outcome of checking a requested image against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageChoice {
    /// The requested image is in the catalog
    Listed(&'static str),
    /// The request was unknown or absent; the first catalog entry is used
    Fallback(&'static str),
}

impl ImageChoice {
    /// The image id to display
    pub fn id(&self) -> &'static str {
        match self {
            Self::Listed(id) | Self::Fallback(id) => *id,
        }
    }

    /// Whether the fallback image was substituted
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// A non-empty, immutable list of known image identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCatalog {
    images: &'static [&'static str],
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ImageCatalog {
    /// Build a catalog from a static list. The list must not be empty.
    pub fn new(images: &'static [&'static str]) -> Result<Self> {
        if images.is_empty() {
            return Err(Error::EmptyCatalog);
        }
        Ok(Self { images })
    }

    /// The catalog of images shipped with the garden
    pub const fn builtin() -> Self {
        Self {
            images: BUILTIN_IMAGES,
        }
    }

    /// Check whether an id names a catalog entry (exact match)
    pub fn contains(&self, image_id: &str) -> bool {
        self.images.iter().any(|known| *known == image_id)
    }

    /// The first entry, used whenever a request cannot be honoured
    pub fn first(&self) -> &'static str {
        self.images[0]
    }

    /// Validate a requested id, falling back to [`first`](Self::first)
    pub fn resolve(&self, requested: Option<&str>) -> ImageChoice {
        match requested.and_then(|id| self.images.iter().copied().find(|known| *known == id)) {
            Some(id) => ImageChoice::Listed(id),
            None => ImageChoice::Fallback(self.first()),
        }
    }

    /// Iterate over the catalog in order
    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.images.iter().copied()
    }

    /// Number of images
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Join a base path and an image id into a display path
pub fn image_path(base_path: &str, image_id: &str) -> String {
    format!("{}/{}", base_path.trim_end_matches('/'), image_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    static TWO: &[&str] = &["a.jpg", "b.jpg"];

    #[test]
    fn test_resolve_listed() {
        let catalog = ImageCatalog::builtin();
        for id in catalog.iter() {
            assert_eq!(catalog.resolve(Some(id)), ImageChoice::Listed(id));
        }
    }

    #[test]
    fn test_resolve_fallback() {
        let catalog = ImageCatalog::new(TWO).unwrap();
        assert_eq!(
            catalog.resolve(Some("not_a_real_file.jpg")),
            ImageChoice::Fallback("a.jpg")
        );
        assert_eq!(catalog.resolve(None), ImageChoice::Fallback("a.jpg"));
        // matching is exact
        assert!(catalog.resolve(Some("B.JPG")).is_fallback());
    }

    #[test]
    fn test_empty_catalog_rejected() {
        static NONE: &[&str] = &[];
        assert!(matches!(ImageCatalog::new(NONE), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_image_path_join() {
        assert_eq!(image_path("/haiku-images", "a.jpg"), "/haiku-images/a.jpg");
        assert_eq!(image_path("/haiku-images/", "a.jpg"), "/haiku-images/a.jpg");
    }

    #[test]
    fn test_placeholder_is_listed() {
        assert!(ImageCatalog::builtin().contains(PLACEHOLDER_IMAGE));
    }
}
