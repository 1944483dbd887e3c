// ABOUTME: In-process document store with the same query semantics as the Mongo backend
// ABOUTME: Backs development runs without a database and the test suite

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Collection, DocumentStore, Filter, FindOptions, SortOrder, UpdateOutcome};
use crate::error::Result;

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(a: &Bson, b: &Bson) -> Option<Ordering> {
    fn number(value: &Bson) -> Option<f64> {
        match value {
            Bson::Int32(i) => Some(*i as f64),
            Bson::Int64(i) => Some(*i as f64),
            Bson::Double(f) => Some(*f),
            _ => None,
        }
    }

    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        _ => match (number(a), number(b)) {
            (Some(x), Some(y)) => x.partial_cmp(&y),
            _ => None,
        },
    }
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    compare(a, b) == Some(Ordering::Equal) || a == b
}

pub fn matches(document: &Document, filter: &Filter) -> bool {
    match filter {
        Filter::All => true,
        Filter::Eq(field, value) => document
            .get(*field)
            .map(|v| values_equal(v, value))
            .unwrap_or(false),
        Filter::Gte(field, value) => document
            .get(*field)
            .and_then(|v| compare(v, value))
            .map(|ordering| ordering != Ordering::Less)
            .unwrap_or(false),
        Filter::Contains(fields, needle) => {
            let needle = needle.to_lowercase();
            fields.iter().any(|field| {
                document
                    .get_str(*field)
                    .map(|s| s.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            })
        }
        Filter::And(filters) => filters.iter().all(|f| matches(document, f)),
    }
}

/// Copies `set` into the document; true when any value changed.
fn apply_set(document: &mut Document, set: Document) -> bool {
    let mut modified = false;
    for (key, value) in set {
        if document.get(&key) != Some(&value) {
            document.insert(key, value);
            modified = true;
        }
    }
    modified
}

fn sort_documents(documents: &mut [Document], field: &str, order: SortOrder) {
    documents.sort_by(|a, b| {
        let ordering = match (a.get(field), b.get(field)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => compare(x, y).unwrap_or(Ordering::Equal),
        };
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn ensure_indexes(&self) -> Result<()> {
        Ok(())
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .push(document);
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut found: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).cloned().collect())
            .unwrap_or_default();
        drop(collections);

        if let Some((field, order)) = options.sort {
            sort_documents(&mut found, field, order);
        }
        let limit = match options.limit {
            Some(limit) if limit > 0 => limit as usize,
            _ => usize::MAX,
        };
        Ok(found
            .into_iter()
            .skip(options.skip as usize)
            .take(limit)
            .collect())
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|d| matches(d, filter)).cloned()))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|d| matches(d, filter)).count() as u64)
            .unwrap_or(0))
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome> {
        let mut collections = self.collections.write().await;
        let target = collections
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|d| matches(d, filter)));

        let Some(document) = target else {
            return Ok(UpdateOutcome::default());
        };
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(apply_set(document, set)),
        })
    }

    /// The lookup and the insert happen under one write lock.
    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
        set_on_insert: Document,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();

        if let Some(document) = docs.iter_mut().find(|d| matches(d, filter)) {
            apply_set(document, set);
            return Ok(());
        }

        let mut document = Document::new();
        let equalities = match filter {
            Filter::And(filters) => filters.clone(),
            other => vec![other.clone()],
        };
        for condition in equalities {
            if let Filter::Eq(field, value) = condition {
                document.insert(field, value);
            }
        }
        for (key, value) in set_on_insert.into_iter().chain(set) {
            document.insert(key, value);
        }
        docs.push(document);
        Ok(())
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match docs.iter().position(|d| matches(d, filter)) {
            Some(index) => {
                docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &'static str,
        filter: &Filter,
    ) -> Result<Vec<Bson>> {
        let collections = self.collections.read().await;
        let mut values: Vec<Bson> = Vec::new();
        if let Some(docs) = collections.get(&collection) {
            for value in docs
                .iter()
                .filter(|d| matches(d, filter))
                .filter_map(|d| d.get(field))
            {
                if !values.iter().any(|seen| values_equal(seen, value)) {
                    values.push(value.clone());
                }
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[tokio::test]
    async fn test_find_sorts_skips_and_limits() {
        let store = MemoryStore::new();
        for order in [3_i64, 1, 2, 5, 4] {
            store
                .insert(Collection::Faqs, doc! { "order": order })
                .await
                .unwrap();
        }

        let options = FindOptions::sorted("order", SortOrder::Ascending).page(2, 2);
        let docs = store.find(Collection::Faqs, &Filter::All, &options).await.unwrap();
        let orders: Vec<i64> = docs.iter().map(|d| d.get_i64("order").unwrap()).collect();
        assert_eq!(orders, vec![3, 4]);
    }

    #[tokio::test]
    async fn test_numeric_equality_across_widths() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Team, doc! { "order": 1_i32 })
            .await
            .unwrap();
        let found = store
            .find_one(Collection::Team, &Filter::eq("order", 1_i64))
            .await
            .unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_contains_is_case_insensitive_literal() {
        let store = MemoryStore::new();
        store
            .insert(Collection::News, doc! { "title": "New MoU with Harvard", "content": "..." })
            .await
            .unwrap();
        let hit = Filter::Contains(vec!["title", "content"], "harVARD".into());
        let literal = Filter::Contains(vec!["title"], "M.U".into());
        assert_eq!(store.count(Collection::News, &hit).await.unwrap(), 1);
        assert_eq!(store.count(Collection::News, &literal).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upsert_inserts_then_updates() {
        let store = MemoryStore::new();
        let filter = Filter::eq("key", "stats");
        store
            .upsert(
                Collection::StatsConfig,
                &filter,
                doc! { "studentsExchanged": 10_i64 },
                doc! { "createdAt": "now" },
            )
            .await
            .unwrap();
        store
            .upsert(
                Collection::StatsConfig,
                &filter,
                doc! { "studentsExchanged": 20_i64 },
                doc! { "createdAt": "later" },
            )
            .await
            .unwrap();

        let docs = store
            .find(Collection::StatsConfig, &Filter::All, &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].get_str("key").unwrap(), "stats");
        assert_eq!(docs[0].get_i64("studentsExchanged").unwrap(), 20);
        assert_eq!(docs[0].get_str("createdAt").unwrap(), "now");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_upserts_create_one_document() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let tasks: Vec<_> = (0..16_i64)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .upsert(
                            Collection::StatsConfig,
                            &Filter::eq("key", "stats"),
                            doc! { "studentsExchanged": n },
                            doc! { "createdAt": "now" },
                        )
                        .await
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let count = store
            .count(Collection::StatsConfig, &Filter::eq("key", "stats"))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_distinct_and_delete() {
        let store = MemoryStore::new();
        for uni in ["Stanford", "ETH", "Stanford"] {
            store
                .insert(Collection::Programs, doc! { "partnerUniversity": uni, "status": "Active" })
                .await
                .unwrap();
        }
        let unis = store
            .distinct(Collection::Programs, "partnerUniversity", &Filter::eq("status", "Active"))
            .await
            .unwrap();
        assert_eq!(unis.len(), 2);

        assert!(store
            .delete_one(Collection::Programs, &Filter::eq("partnerUniversity", "ETH"))
            .await
            .unwrap());
        assert!(!store
            .delete_one(Collection::Programs, &Filter::eq("partnerUniversity", "ETH"))
            .await
            .unwrap());
    }
}
