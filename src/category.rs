//! The fixed set of site sections a note can be filed under.
//!
//! Categories are a closed enum rather than free strings: a note whose
//! `category:` value is not one of the four known tokens fails to parse and
//! is reported, instead of silently landing on some default listing page.
//!
//! | Token      | Listing page              | Badge    |
//! |------------|---------------------------|----------|
//! | `basics`   | `basics.html`             | Basics   |
//! | `papers`   | `papers.html`             | Papers   |
//! | `pathways` | `pathways-methods.html`   | Pathways |
//! | `stories`  | `stories-evolution.html`  | Stories  |

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category `{0}` (expected one of: basics, papers, pathways, stories)")]
pub struct UnknownCategory(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Basics,
    Papers,
    Pathways,
    Stories,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Category; 4] = [
        Category::Basics,
        Category::Papers,
        Category::Pathways,
        Category::Stories,
    ];

    /// Front-matter token for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Basics => "basics",
            Category::Papers => "papers",
            Category::Pathways => "pathways",
            Category::Stories => "stories",
        }
    }

    /// File name of the listing page, relative to the output root.
    pub fn listing_file(self) -> &'static str {
        match self {
            Category::Basics => "basics.html",
            Category::Papers => "papers.html",
            Category::Pathways => "pathways-methods.html",
            Category::Stories => "stories-evolution.html",
        }
    }

    /// Section heading shown in navigation and page titles.
    pub fn page_title(self) -> &'static str {
        match self {
            Category::Basics => "Basics｜基础概念",
            Category::Papers => "Papers｜论文拆解",
            Category::Pathways => "Pathways & Methods｜通路与方法区",
            Category::Stories => "Stories & Evolution｜人类演化 & 疾病小随笔",
        }
    }

    pub fn hero_class(self) -> &'static str {
        match self {
            Category::Basics => "hero-sub--basics",
            Category::Papers => "hero-sub--papers",
            Category::Pathways => "hero-sub--pathways",
            Category::Stories => "hero-sub--stories",
        }
    }

    pub fn badge(self) -> &'static str {
        match self {
            Category::Basics => "Basics",
            Category::Papers => "Papers",
            Category::Pathways => "Pathways",
            Category::Stories => "Stories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Case-insensitive; surrounding whitespace and quotes are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().trim_matches(['"', '\'']).trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(token))
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_token() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn parse_ignores_case_and_quotes() {
        assert_eq!("  Papers ".parse::<Category>(), Ok(Category::Papers));
        assert_eq!("\"stories\"".parse::<Category>(), Ok(Category::Stories));
    }

    #[test]
    fn unknown_token_is_rejected() {
        let err = "unknown_value".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("unknown_value".to_string()));
        assert!(err.to_string().contains("unknown_value"));
    }

    #[test]
    fn listing_files_are_distinct() {
        let mut files: Vec<_> = Category::ALL.iter().map(|c| c.listing_file()).collect();
        files.sort_unstable();
        files.dedup();
        assert_eq!(files.len(), Category::ALL.len());
    }

    #[test]
    fn navigation_order_matches_ordering() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
