//! Ebook catalog listing types.

use serde::{Deserialize, Serialize};

use crate::pagination::Sort;

/// Sort order for the `GET /ebooks` listing endpoint.
///
/// The wire format is a single hyphenated string (e.g. `"priority-desc"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EbookSortBy {
    /// Editorial priority, highest first (default).
    #[default]
    PriorityDesc,
    CreatedAt(Sort),
    TitleAsc,
    Random,
}

impl EbookSortBy {
    const VARIANTS: &'static [&'static str] = &[
        "priority-desc",
        "created-at-desc",
        "created-at-asc",
        "title-asc",
        "random",
    ];

    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "priority-desc" => Some(Self::PriorityDesc),
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            "title-asc" => Some(Self::TitleAsc),
            "random" => Some(Self::Random),
            _ => None,
        }
    }

    pub fn as_kebab_case(self) -> &'static str {
        match self {
            Self::PriorityDesc => "priority-desc",
            Self::CreatedAt(Sort::Desc) => "created-at-desc",
            Self::CreatedAt(Sort::Asc) => "created-at-asc",
            Self::TitleAsc => "title-asc",
            Self::Random => "random",
        }
    }
}

impl<'de> Deserialize<'de> for EbookSortBy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_kebab_case(&s)
            .ok_or_else(|| serde::de::Error::unknown_variant(&s, Self::VARIANTS))
    }
}

impl Serialize for EbookSortBy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_kebab_case())
    }
}
