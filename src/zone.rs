use serde::{Deserialize, Serialize};

/// Classification label applied to a drawn or colored land parcel.
///
/// A closed enumeration: storage paths and render colors are selected by
/// exhaustive matching, so adding or removing a category is a
/// compile-time-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneCategory {
    Internal,
    Shared,
    Forbidden,
}

impl ZoneCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Internal, Self::Shared, Self::Forbidden];

    /// File name of the persisted zone document for this category.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Internal => "internal.json",
            Self::Shared => "shared.json",
            Self::Forbidden => "forbidden.json",
        }
    }

    /// Translucent fill color handed to the rendering collaborator.
    #[must_use]
    pub const fn fill_color(self) -> &'static str {
        match self {
            Self::Internal => "rgba(0, 0, 255, 0.3)",
            Self::Shared => "rgba(255, 215, 0, 0.3)",
            Self::Forbidden => "rgba(255, 0, 0, 0.3)",
        }
    }

    /// Accent color for the category picker.
    #[must_use]
    pub const fn stroke_color(self) -> &'static str {
        match self {
            Self::Internal => "blue",
            Self::Shared => "gold",
            Self::Forbidden => "red",
        }
    }
}
