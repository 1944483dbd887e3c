// ABOUTME: MongoDB implementation of the document store
// ABOUTME: Translates neutral filters into BSON queries and runs them through the official driver

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{self, IndexOptions},
    Client, Database, IndexModel,
};

use super::{Collection, DocumentStore, Filter, FindOptions, SortOrder, UpdateOutcome};
use crate::error::Result;

pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub async fn connect(url: &str, db_name: &str) -> Result<Self> {
        let mut client_options = options::ClientOptions::parse(url).await?;
        client_options.app_name = Some("oia-backend".to_string());
        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);
        Ok(Self { client, db })
    }

    fn collection(&self, collection: Collection) -> mongodb::Collection<Document> {
        self.db.collection::<Document>(collection.name())
    }
}

pub fn filter_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => Document::new(),
        Filter::Eq(field, value) => {
            let key: &str = field;
            doc! { key: value.clone() }
        }
        Filter::Gte(field, value) => {
            let key: &str = field;
            doc! { key: { "$gte": value.clone() } }
        }
        Filter::Contains(fields, needle) => {
            let pattern = regex::escape(needle);
            let clauses: Vec<Bson> = fields
                .iter()
                .map(|field| {
                    let key: &str = field;
                    Bson::Document(doc! { key: { "$regex": pattern.clone(), "$options": "i" } })
                })
                .collect();
            doc! { "$or": clauses }
        }
        Filter::And(filters) => {
            let clauses: Vec<Bson> = filters
                .iter()
                .map(|f| Bson::Document(filter_document(f)))
                .collect();
            doc! { "$and": clauses }
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend_name(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
    }

    async fn ensure_indexes(&self) -> Result<()> {
        for collection in Collection::ALL {
            let key = collection.lookup_field();
            let index = IndexModel::builder()
                .keys(doc! { key: 1 })
                .options(IndexOptions::builder().background(true).build())
                .build();
            if let Err(err) = self.collection(collection).create_index(index, None).await {
                tracing::warn!(
                    "Failed to create index on {}.{}: {}",
                    collection.name(),
                    collection.lookup_field(),
                    err
                );
            }
        }
        Ok(())
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        self.collection(collection).insert_one(document, None).await?;
        Ok(())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let find_options = options::FindOptions::builder()
            .sort(options.sort.map(|(field, order)| {
                let direction = match order {
                    SortOrder::Ascending => 1,
                    SortOrder::Descending => -1,
                };
                doc! { field: direction }
            }))
            .skip((options.skip > 0).then_some(options.skip))
            .limit(options.limit)
            .build();
        let cursor = self
            .collection(collection)
            .find(filter_document(filter), find_options)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_one(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
        Ok(self
            .collection(collection)
            .find_one(filter_document(filter), None)
            .await?)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64> {
        Ok(self
            .collection(collection)
            .count_documents(filter_document(filter), None)
            .await?)
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
    ) -> Result<UpdateOutcome> {
        let result = self
            .collection(collection)
            .update_one(filter_document(filter), doc! { "$set": set }, None)
            .await?;
        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn upsert(
        &self,
        collection: Collection,
        filter: &Filter,
        set: Document,
        set_on_insert: Document,
    ) -> Result<()> {
        let update_options = options::UpdateOptions::builder().upsert(true).build();
        self.collection(collection)
            .update_one(
                filter_document(filter),
                doc! { "$set": set, "$setOnInsert": set_on_insert },
                update_options,
            )
            .await?;
        Ok(())
    }

    async fn delete_one(&self, collection: Collection, filter: &Filter) -> Result<bool> {
        let result = self
            .collection(collection)
            .delete_one(filter_document(filter), None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &'static str,
        filter: &Filter,
    ) -> Result<Vec<Bson>> {
        Ok(self
            .collection(collection)
            .distinct(field, filter_document(filter), None)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_filter_escapes_pattern() {
        let filter = Filter::Contains(vec!["title"], "c++ (intro)".to_string());
        let document = filter_document(&filter);
        let clauses = document.get_array("$or").unwrap();
        let title = clauses[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"c\+\+ \(intro\)");
        assert_eq!(title.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_and_filter_document() {
        let filter = Filter::eq("type", "Research").and(Filter::eq("country", "France"));
        assert_eq!(
            filter_document(&filter),
            doc! { "$and": [ { "type": "Research" }, { "country": "France" } ] }
        );
    }
}
