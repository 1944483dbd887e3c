// ABOUTME: Backend-neutral document store used by the storage layer
// ABOUTME: Defines collections, filters and the DocumentStore trait with Mongo and memory backends

pub mod codec;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::Result;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Programs,
    Contacts,
    Admins,
    News,
    Partnerships,
    Team,
    Events,
    Gallery,
    Faqs,
    StaticContent,
    StatsConfig,
}

impl Collection {
    pub const ALL: [Collection; 11] = [
        Collection::Programs,
        Collection::Contacts,
        Collection::Admins,
        Collection::News,
        Collection::Partnerships,
        Collection::Team,
        Collection::Events,
        Collection::Gallery,
        Collection::Faqs,
        Collection::StaticContent,
        Collection::StatsConfig,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Collection::Programs => "programs",
            Collection::Contacts => "contacts",
            Collection::Admins => "admins",
            Collection::News => "news",
            Collection::Partnerships => "partnerships",
            Collection::Team => "team",
            Collection::Events => "events",
            Collection::Gallery => "gallery",
            Collection::Faqs => "faqs",
            Collection::StaticContent => "static_content",
            Collection::StatsConfig => "stats_config",
        }
    }

    /// Field that identifies a single document for lookups.
    pub fn lookup_field(self) -> &'static str {
        match self {
            Collection::StaticContent | Collection::StatsConfig => "key",
            Collection::Admins => "username",
            _ => "id",
        }
    }
}

/// Query predicate understood by every backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    Eq(&'static str, Bson),
    Gte(&'static str, Bson),
    /// Case-insensitive literal substring match against any of the fields.
    Contains(Vec<&'static str>, String),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: &'static str, value: impl Into<Bson>) -> Self {
        Filter::Eq(field, value.into())
    }

    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, Filter::And(mut right)) => {
                right.insert(0, f);
                Filter::And(right)
            }
            (a, b) => Filter::And(vec![a, b]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<(&'static str, SortOrder)>,
    pub skip: u64,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn sorted(field: &'static str, order: SortOrder) -> Self {
        Self {
            sort: Some((field, order)),
            ..Self::default()
        }
    }

    /// Skip and limit stay within `i64`, the widest value the Mongo driver accepts.
    pub fn page(mut self, page: u64, page_size: u64) -> Self {
        let limit = page_size.min(i64::MAX as u64);
        self.skip = page
            .saturating_sub(1)
            .saturating_mul(limit)
            .min(i64::MAX as u64);
        self.limit = Some(limit as i64);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> Result<()>;

    /// Releases connections; the store must not be used afterwards.
    async fn close(&self) {}

    async fn ensure_indexes(&self) -> Result<()>;

    async fn insert(&self, collection: Collection, document: Document) -> Result<()>;

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>>;

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64>;

    /// Applies `$set` to the first matching document.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome>;

    /// Applies `$set`, inserting `filter` fields plus `set_on_insert` when nothing matches.
    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
        set_on_insert: Document,
    ) -> Result<()>;

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool>;

    async fn distinct(
        &self,
        collection: Collection,
        field: &'static str,
        filter: &Filter,
    ) -> Result<Vec<Bson>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_flattens() {
        let filter = Filter::All
            .and(Filter::eq("category", "MoU"))
            .and(Filter::eq("featured", true));
        assert_eq!(
            filter,
            Filter::And(vec![
                Filter::eq("category", "MoU"),
                Filter::eq("featured", true)
            ])
        );
    }

    #[test]
    fn test_page_options() {
        let options = FindOptions::sorted("createdAt", SortOrder::Descending).page(3, 10);
        assert_eq!(options.skip, 20);
        assert_eq!(options.limit, Some(10));
    }

    #[test]
    fn test_page_offset_saturates() {
        let options = FindOptions::sorted("createdAt", SortOrder::Descending).page(u64::MAX, 50);
        assert_eq!(options.skip, i64::MAX as u64);
        assert_eq!(options.limit, Some(50));
    }
}
