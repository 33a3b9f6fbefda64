//! Grouping documents into category listings.
//!
//! Every [`Category`] gets a [`CategoryGroup`], empty or not, so each
//! listing page is always generated. Within a group documents are ordered
//! newest first; undated documents come last; equal dates fall back to
//! source file name order.
//!
//! Routing is also where slug uniqueness is enforced. Two sources mapping to
//! the same slug would write the same detail page, so the build is rejected
//! before anything is written.

use crate::category::Category;
use crate::document::Document;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("duplicate slug `{slug}`: both {first} and {second} would be written to it")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub category: Category,
    pub documents: Vec<Document>,
}

/// All category groups of one build.
#[derive(Debug, Clone)]
pub struct Routes {
    groups: BTreeMap<Category, CategoryGroup>,
}

impl Routes {
    pub fn group(&self, category: Category) -> &CategoryGroup {
        &self.groups[&category]
    }

    /// Groups in navigation order.
    pub fn groups(&self) -> impl Iterator<Item = &CategoryGroup> {
        self.groups.values()
    }

    /// All documents, group by group.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.groups.values().flat_map(|g| g.documents.iter())
    }

    /// Number of documents in each category, in navigation order.
    pub fn counts(&self) -> Vec<(Category, usize)> {
        self.groups
            .values()
            .map(|g| (g.category, g.documents.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(|g| g.documents.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assign each document to its category group.
pub fn route(mut documents: Vec<Document>) -> Result<Routes, RouteError> {
    documents.sort_by(|a, b| a.source_name.cmp(&b.source_name));

    let mut seen: BTreeMap<&str, &str> = BTreeMap::new();
    for doc in &documents {
        if let Some(first) = seen.insert(&doc.slug, &doc.source_name) {
            return Err(RouteError::DuplicateSlug {
                slug: doc.slug.clone(),
                first: first.to_string(),
                second: doc.source_name.clone(),
            });
        }
    }

    let mut groups: BTreeMap<Category, CategoryGroup> = Category::ALL
        .into_iter()
        .map(|category| {
            (
                category,
                CategoryGroup {
                    category,
                    documents: Vec::new(),
                },
            )
        })
        .collect();

    for doc in documents {
        if let Some(group) = groups.get_mut(&doc.category) {
            group.documents.push(doc);
        }
    }

    for group in groups.values_mut() {
        group.documents.sort_by(newest_first);
    }

    Ok(Routes { groups })
}

fn newest_first(a: &Document, b: &Document) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.source_name.cmp(&b.source_name))
}
