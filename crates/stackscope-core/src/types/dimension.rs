//! Evidence dimensions and page-type selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An independent channel of observable signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Header,
    Meta,
    Script,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Self::Header, Self::Meta, Self::Script];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Meta => "meta",
            Self::Script => "script",
        }
    }

    /// Position in `Dimension::ALL`, for fixed-size per-dimension arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::Header => 0,
            Self::Meta => 1,
            Self::Script => 2,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "header" | "headers" => Some(Self::Header),
            "meta" | "metatag" | "meta_tag" | "metatags" => Some(Self::Meta),
            "script" | "scripts" => Some(Self::Script),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which fetched page a header map came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    MainPage,
    Robots,
}

/// Which page types contribute header signals to an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageTypeFilter {
    #[default]
    All,
    MainPage,
    Robots,
}

impl PageTypeFilter {
    pub fn includes(&self, page: PageType) -> bool {
        match self {
            Self::All => true,
            Self::MainPage => page == PageType::MainPage,
            Self::Robots => page == PageType::Robots,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::MainPage => "mainpage",
            Self::Robots => "robots",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "mainpage" | "main" => Some(Self::MainPage),
            "robots" | "robots.txt" => Some(Self::Robots),
            _ => None,
        }
    }
}

impl fmt::Display for PageTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
