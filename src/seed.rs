// ABOUTME: First-start seeding of the default admin and bundled sample content
// ABOUTME: Only fills collections that are still empty so restarts never duplicate data

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::storage::Storage;
use crate::store::Collection;
use crate::types::*;

const SAMPLE_DATA: &str = include_str!("../seed/sample_data.json");

#[derive(Debug, Deserialize)]
pub struct SampleData {
    pub programs: Vec<ProgramCreate>,
    pub news: Vec<NewsCreate>,
    pub partnerships: Vec<PartnershipCreate>,
    pub team: Vec<TeamMemberCreate>,
    pub events: Vec<EventCreate>,
    pub faqs: Vec<FaqCreate>,
    pub static_content: Vec<StaticContentCreate>,
}

impl SampleData {
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(SAMPLE_DATA)
            .map_err(|e| AppError::Serialization(format!("Bundled sample data is invalid: {}", e)))
    }
}

#[derive(Debug, Default)]
pub struct SeedReport {
    pub admin_created: bool,
    pub inserted: Vec<(Collection, usize)>,
}

impl SeedReport {
    pub fn inserted_into(&self, collection: Collection) -> usize {
        self.inserted
            .iter()
            .find(|(c, _)| *c == collection)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

macro_rules! seed_collection {
    ($storage:expr, $report:expr, $collection:expr, $items:expr, $create:ident) => {{
        if $storage.count($collection).await? == 0 {
            let items = $items;
            let count = items.len();
            for item in items {
                $storage.$create(item).await?;
            }
            tracing::info!("Seeded {} {}", count, $collection.name());
            $report.inserted.push(($collection, count));
        }
    }};
}

/// Creates the admin account if it does not exist yet.
pub async fn seed_admin(storage: &Storage, username: &str, password: &str) -> Result<bool> {
    if storage.find_admin(username).await?.is_some() {
        return Ok(false);
    }
    storage.create_admin(username, password).await?;
    tracing::info!("Default admin {} created", username);
    Ok(true)
}

pub async fn seed_database(
    storage: &Storage,
    admin_username: &str,
    admin_password: &str,
) -> Result<SeedReport> {
    let mut report = SeedReport {
        admin_created: seed_admin(storage, admin_username, admin_password).await?,
        ..SeedReport::default()
    };
    let data = SampleData::bundled()?;

    seed_collection!(storage, report, Collection::Programs, data.programs, create_program);
    seed_collection!(storage, report, Collection::News, data.news, create_news);
    seed_collection!(storage, report, Collection::Partnerships, data.partnerships, create_partnership);
    seed_collection!(storage, report, Collection::Team, data.team, create_team_member);
    seed_collection!(storage, report, Collection::Events, data.events, create_event);
    seed_collection!(storage, report, Collection::Faqs, data.faqs, create_faq);
    seed_collection!(
        storage,
        report,
        Collection::StaticContent,
        data.static_content,
        create_static_content
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::validate::Validate;
    use std::sync::Arc;

    #[test]
    fn test_bundled_data_is_valid() {
        let data = SampleData::bundled().unwrap();
        assert_eq!(data.programs.len(), 3);
        assert_eq!(data.news.len(), 5);
        assert_eq!(data.static_content.len(), 3);
        for program in &data.programs {
            program.validate().unwrap();
        }
        for member in &data.team {
            member.validate().unwrap();
        }
        for faq in &data.faqs {
            faq.validate().unwrap();
        }
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_collections() {
        let storage = Storage::new(Arc::new(MemoryStore::new()));

        let first = seed_database(&storage, "admin", "secret").await.unwrap();
        assert!(first.admin_created);
        assert_eq!(first.inserted_into(Collection::Programs), 3);
        assert_eq!(first.inserted_into(Collection::Faqs), 6);

        let second = seed_database(&storage, "admin", "secret").await.unwrap();
        assert!(!second.admin_created);
        assert!(second.inserted.is_empty());
        assert_eq!(storage.count(Collection::Events).await.unwrap(), 5);
        assert!(storage.get_static_content("why_medicaps").await.unwrap().is_some());
    }
}
