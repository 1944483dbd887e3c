// ABOUTME: Domain storage layer for programs, news, partnerships, team, events, gallery and more
// ABOUTME: Wraps the document store with typed create/read/update/delete, stats, search and admin accounts

use chrono::Utc;
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::crypto;
use crate::error::{AppError, Result};
use crate::store::{codec, Collection, DocumentStore, Filter, FindOptions, SortOrder};
use crate::types::*;

const SEARCH_LIMIT_PER_SECTION: i64 = 5;
const SEARCH_DESCRIPTION_CHARS: usize = 200;
const COUNTRIES_SERVED: u64 = 12;
const INTERNATIONAL_STUDENTS: u64 = 250;
const STATS_CONFIG_KEY: &str = "stats";

pub const TEAM_LIMIT: i64 = 100;
pub const FAQ_LIMIT: i64 = 500;
pub const STATIC_CONTENT_LIMIT: i64 = 100;
pub const CONTACT_LIMIT: i64 = 1000;

/// Sections that global search can look in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSection {
    Programs,
    News,
    Events,
    Partnerships,
}

impl SearchSection {
    pub const ALL: [SearchSection; 4] = [
        SearchSection::Programs,
        SearchSection::News,
        SearchSection::Events,
        SearchSection::Partnerships,
    ];

    /// Parses a comma-separated list; unknown names are ignored and a missing or blank list means all.
    pub fn parse_list(raw: Option<&str>) -> Vec<SearchSection> {
        let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
            return Self::ALL.to_vec();
        };
        raw.split(',')
            .filter_map(|name| match name.trim().to_ascii_lowercase().as_str() {
                "programs" => Some(SearchSection::Programs),
                "news" => Some(SearchSection::News),
                "events" => Some(SearchSection::Events),
                "partnerships" => Some(SearchSection::Partnerships),
                _ => None,
            })
            .collect()
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn by_id(id: &str) -> Filter {
    Filter::eq("id", id)
}

fn by_key(key: &str) -> Filter {
    Filter::eq("key", key)
}

pub struct Storage {
    store: Arc<dyn DocumentStore>,
}

impl Storage {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        self.store.ensure_indexes().await
    }

    pub async fn close(&self) {
        self.store.close().await;
    }

    pub async fn count(&self, collection: Collection) -> Result<u64> {
        self.store.count(collection, &Filter::All).await
    }

    async fn insert_record<T: Record>(&self, record: &T) -> Result<()> {
        let document = codec::to_document(record, T::DATE_FIELDS)?;
        self.store.insert(T::COLLECTION, document).await
    }

    async fn find_record<T: Record>(&self, filter: &Filter) -> Result<Option<T>> {
        match self.store.find_one(T::COLLECTION, filter).await? {
            Some(document) => Ok(Some(codec::from_document(document)?)),
            None => Ok(None),
        }
    }

    async fn find_records<T: Record>(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<T>> {
        self.store
            .find(T::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(codec::from_document)
            .collect()
    }

    async fn page_records<T: Record>(
        &self,
        filter: Filter,
        sort: (&'static str, SortOrder),
        page: u64,
        page_size: u64,
    ) -> Result<Page<T>> {
        let total = self.store.count(T::COLLECTION, &filter).await?;
        let options = FindOptions::sorted(sort.0, sort.1).page(page, page_size);
        let items = self.find_records(&filter, &options).await?;
        Ok(Page::new(items, total, page, page_size))
    }

    /// Sets the provided fields; `None` when nothing matches `lookup`.
    async fn update_record<T: Record, U: Serialize + Sync>(
        &self,
        lookup: &Filter,
        update: &U,
        touch: bool,
    ) -> Result<Option<T>> {
        let mut set = codec::to_set_document(update, T::DATE_FIELDS)?;
        if touch {
            set.insert("updatedAt", codec::datetime(Utc::now()));
        }
        if set.is_empty() {
            return self.find_record(lookup).await;
        }

        let outcome = self.store.update_one(T::COLLECTION, lookup, set).await?;
        if outcome.matched == 0 {
            return Ok(None);
        }
        self.find_record(lookup).await
    }

    async fn delete_record<T: Record>(&self, lookup: &Filter) -> Result<bool> {
        self.store.delete_one(T::COLLECTION, lookup).await
    }

    // Programs

    pub async fn create_program(&self, data: ProgramCreate) -> Result<Program> {
        let now = Utc::now();
        let program = Program {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&program).await?;
        Ok(program)
    }

    pub async fn get_program(&self, id: &str) -> Result<Option<Program>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_programs(&self, active_only: bool, page: u64, page_size: u64) -> Result<Page<Program>> {
        let filter = if active_only {
            Filter::eq("status", ProgramStatus::Active.as_str())
        } else {
            Filter::All
        };
        self.page_records(filter, ("createdAt", SortOrder::Descending), page, page_size)
            .await
    }

    pub async fn update_program(&self, id: &str, update: &ProgramUpdate) -> Result<Option<Program>> {
        self.update_record(&by_id(id), update, true).await
    }

    pub async fn delete_program(&self, id: &str) -> Result<bool> {
        self.delete_record::<Program>(&by_id(id)).await
    }

    // News

    pub async fn create_news(&self, data: NewsCreate) -> Result<News> {
        let now = Utc::now();
        let news = News {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&news).await?;
        Ok(news)
    }

    pub async fn get_news(&self, id: &str) -> Result<Option<News>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_news(
        &self,
        category: Option<NewsCategory>,
        featured_only: bool,
        page: u64,
        page_size: u64,
    ) -> Result<Page<News>> {
        let mut filter = Filter::All;
        if let Some(category) = category {
            filter = filter.and(Filter::eq("category", category.as_str()));
        }
        if featured_only {
            filter = filter.and(Filter::eq("featured", true));
        }
        self.page_records(filter, ("date", SortOrder::Descending), page, page_size)
            .await
    }

    pub async fn update_news(&self, id: &str, update: NewsUpdate) -> Result<Option<News>> {
        self.update_record(&by_id(id), &update.without_blanks(), true)
            .await
    }

    pub async fn delete_news(&self, id: &str) -> Result<bool> {
        self.delete_record::<News>(&by_id(id)).await
    }

    // Partnerships

    pub async fn create_partnership(&self, data: PartnershipCreate) -> Result<Partnership> {
        let now = Utc::now();
        let partnership = Partnership {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&partnership).await?;
        Ok(partnership)
    }

    pub async fn get_partnership(&self, id: &str) -> Result<Option<Partnership>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_partnerships(
        &self,
        partnership_type: Option<PartnershipType>,
        country: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<Page<Partnership>> {
        let mut filter = Filter::All;
        if let Some(partnership_type) = partnership_type {
            filter = filter.and(Filter::eq("type", partnership_type.as_str()));
        }
        if let Some(country) = country {
            filter = filter.and(Filter::eq("country", country));
        }
        self.page_records(filter, ("partnerName", SortOrder::Ascending), page, page_size)
            .await
    }

    pub async fn update_partnership(
        &self,
        id: &str,
        update: &PartnershipUpdate,
    ) -> Result<Option<Partnership>> {
        self.update_record(&by_id(id), update, true).await
    }

    pub async fn delete_partnership(&self, id: &str) -> Result<bool> {
        self.delete_record::<Partnership>(&by_id(id)).await
    }

    // Team

    pub async fn create_team_member(&self, data: TeamMemberCreate) -> Result<TeamMember> {
        let now = Utc::now();
        let member = TeamMember {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&member).await?;
        Ok(member)
    }

    pub async fn get_team_member(&self, id: &str) -> Result<Option<TeamMember>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_team(&self) -> Result<Vec<TeamMember>> {
        let options = FindOptions::sorted("order", SortOrder::Ascending).limit(TEAM_LIMIT);
        self.find_records(&Filter::All, &options).await
    }

    pub async fn update_team_member(
        &self,
        id: &str,
        update: &TeamMemberUpdate,
    ) -> Result<Option<TeamMember>> {
        self.update_record(&by_id(id), update, true).await
    }

    pub async fn delete_team_member(&self, id: &str) -> Result<bool> {
        self.delete_record::<TeamMember>(&by_id(id)).await
    }

    // Events

    pub async fn create_event(&self, data: EventCreate) -> Result<Event> {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&event).await?;
        Ok(event)
    }

    pub async fn get_event(&self, id: &str) -> Result<Option<Event>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_events(
        &self,
        event_type: Option<EventType>,
        upcoming_only: bool,
        page: u64,
        page_size: u64,
    ) -> Result<Page<Event>> {
        let mut filter = Filter::All;
        if let Some(event_type) = event_type {
            filter = filter.and(Filter::eq("type", event_type.as_str()));
        }
        if upcoming_only {
            filter = filter.and(Filter::Gte("startDate", codec::datetime(Utc::now())));
        }
        self.page_records(filter, ("startDate", SortOrder::Descending), page, page_size)
            .await
    }

    pub async fn update_event(&self, id: &str, update: EventUpdate) -> Result<Option<Event>> {
        self.update_record(&by_id(id), &update.without_blanks(), true)
            .await
    }

    pub async fn delete_event(&self, id: &str) -> Result<bool> {
        self.delete_record::<Event>(&by_id(id)).await
    }

    // Gallery

    pub async fn create_gallery_image(&self, data: GalleryImageCreate) -> Result<GalleryImage> {
        let image = GalleryImage {
            id: Uuid::new_v4().to_string(),
            data,
            upload_date: Utc::now(),
        };
        self.insert_record(&image).await?;
        Ok(image)
    }

    pub async fn get_gallery_image(&self, id: &str) -> Result<Option<GalleryImage>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_gallery(
        &self,
        category: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> Result<Page<GalleryImage>> {
        let filter = match category {
            Some(category) => Filter::eq("category", category),
            None => Filter::All,
        };
        self.page_records(filter, ("uploadDate", SortOrder::Descending), page, page_size)
            .await
    }

    pub async fn update_gallery_image(
        &self,
        id: &str,
        update: &GalleryImageUpdate,
    ) -> Result<Option<GalleryImage>> {
        self.update_record(&by_id(id), update, false).await
    }

    pub async fn delete_gallery_image(&self, id: &str) -> Result<bool> {
        self.delete_record::<GalleryImage>(&by_id(id)).await
    }

    // FAQs

    pub async fn create_faq(&self, data: FaqCreate) -> Result<Faq> {
        let now = Utc::now();
        let faq = Faq {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&faq).await?;
        Ok(faq)
    }

    pub async fn get_faq(&self, id: &str) -> Result<Option<Faq>> {
        self.find_record(&by_id(id)).await
    }

    pub async fn list_faqs(&self, category: Option<FaqCategory>) -> Result<Vec<Faq>> {
        let filter = match category {
            Some(category) => Filter::eq("category", category.as_str()),
            None => Filter::All,
        };
        let options = FindOptions::sorted("order", SortOrder::Ascending).limit(FAQ_LIMIT);
        self.find_records(&filter, &options).await
    }

    pub async fn update_faq(&self, id: &str, update: &FaqUpdate) -> Result<Option<Faq>> {
        self.update_record(&by_id(id), update, true).await
    }

    pub async fn delete_faq(&self, id: &str) -> Result<bool> {
        self.delete_record::<Faq>(&by_id(id)).await
    }

    // Static content

    pub async fn create_static_content(&self, data: StaticContentCreate) -> Result<StaticContent> {
        if self.get_static_content(&data.key).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "Content with key '{}' already exists",
                data.key
            )));
        }
        let now = Utc::now();
        let content = StaticContent {
            id: Uuid::new_v4().to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        self.insert_record(&content).await?;
        Ok(content)
    }

    pub async fn get_static_content(&self, key: &str) -> Result<Option<StaticContent>> {
        self.find_record(&by_key(key)).await
    }

    pub async fn list_static_content(&self, section: Option<&str>) -> Result<Vec<StaticContent>> {
        let filter = match section {
            Some(section) => Filter::eq("section", section),
            None => Filter::All,
        };
        let options = FindOptions::default().limit(STATIC_CONTENT_LIMIT);
        self.find_records(&filter, &options).await
    }

    pub async fn update_static_content(
        &self,
        key: &str,
        update: &StaticContentUpdate,
    ) -> Result<Option<StaticContent>> {
        self.update_record(&by_key(key), update, true).await
    }

    pub async fn delete_static_content(&self, key: &str) -> Result<bool> {
        self.delete_record::<StaticContent>(&by_key(key)).await
    }

    // Contacts

    pub async fn create_contact(&self, data: ContactCreate) -> Result<Contact> {
        let contact = Contact {
            id: Uuid::new_v4().to_string(),
            data,
            status: ContactStatus::New,
            created_at: Utc::now(),
        };
        self.insert_record(&contact).await?;
        Ok(contact)
    }

    pub async fn list_contacts(&self, form_type: Option<FormType>) -> Result<Vec<Contact>> {
        let filter = match form_type {
            Some(form_type) => Filter::eq("formType", form_type.as_str()),
            None => Filter::All,
        };
        let options = FindOptions::sorted("createdAt", SortOrder::Descending).limit(CONTACT_LIMIT);
        self.find_records(&filter, &options).await
    }

    /// True when the contact exists.
    pub async fn update_contact_status(&self, id: &str, status: ContactStatus) -> Result<bool> {
        let mut set = Document::new();
        set.insert("status", status.as_str());
        let outcome = self
            .store
            .update_one(Collection::Contacts, &by_id(id), set)
            .await?;
        Ok(outcome.matched > 0)
    }

    pub async fn delete_contact(&self, id: &str) -> Result<bool> {
        self.delete_record::<Contact>(&by_id(id)).await
    }

    // Stats

    pub async fn get_stats_config(&self) -> Result<StatsConfig> {
        let document = self
            .store
            .find_one(Collection::StatsConfig, &by_key(STATS_CONFIG_KEY))
            .await?;
        let students_exchanged = document
            .and_then(|doc| match doc.get("studentsExchanged") {
                Some(Bson::Int32(n)) => Some(i64::from(*n)),
                Some(Bson::Int64(n)) => Some(*n),
                Some(Bson::Double(n)) => Some(*n as i64),
                _ => None,
            })
            .unwrap_or(StatsConfig::default().students_exchanged);
        Ok(StatsConfig { students_exchanged })
    }

    pub async fn update_stats_config(&self, update: &StatsConfigUpdate) -> Result<StatsConfig> {
        let now = codec::datetime(Utc::now());
        let mut set = codec::to_set_document(update, &[])?;
        set.insert("updatedAt", now.clone());
        let mut set_on_insert = Document::new();
        set_on_insert.insert("createdAt", now);

        self.store
            .upsert(
                Collection::StatsConfig,
                &by_key(STATS_CONFIG_KEY),
                set,
                set_on_insert,
            )
            .await?;
        self.get_stats_config().await
    }

    pub async fn stats(&self) -> Result<Stats> {
        let active = Filter::eq("status", ProgramStatus::Active.as_str());
        let total_programs = self.store.count(Collection::Programs, &active).await?;
        let partner_universities = self
            .store
            .distinct(Collection::Programs, "partnerUniversity", &active)
            .await?
            .len() as u64;
        let config = self.get_stats_config().await?;

        Ok(Stats {
            total_programs,
            partner_universities,
            students_exchanged: config.students_exchanged,
            countries: COUNTRIES_SERVED,
        })
    }

    pub async fn extended_stats(&self) -> Result<ExtendedStats> {
        let base = self.stats().await?;
        let active_partnerships = self
            .store
            .count(
                Collection::Partnerships,
                &Filter::eq("status", PartnershipStatus::Active.as_str()),
            )
            .await?;

        Ok(ExtendedStats {
            base,
            total_events: self.count(Collection::Events).await?,
            active_partnerships,
            international_students: INTERNATIONAL_STUDENTS,
            news_articles: self.count(Collection::News).await?,
            team_members: self.count(Collection::Team).await?,
        })
    }

    // Search

    pub async fn search(&self, query: &str, sections: &[SearchSection]) -> Result<Vec<SearchResult>> {
        let needle = query.trim().to_string();
        let options = FindOptions::default().limit(SEARCH_LIMIT_PER_SECTION);
        let mut results = Vec::new();

        for section in SearchSection::ALL {
            if !sections.contains(&section) {
                continue;
            }
            match section {
                SearchSection::Programs => {
                    let filter = Filter::Contains(
                        vec!["title", "description", "partnerUniversity"],
                        needle.clone(),
                    );
                    for program in self.find_records::<Program>(&filter, &options).await? {
                        results.push(SearchResult {
                            kind: "program".to_string(),
                            url: format!("/student-mobility/programs/{}", program.id),
                            title: program.data.title,
                            description: truncate_chars(&program.data.description, SEARCH_DESCRIPTION_CHARS),
                            id: program.id,
                            relevance: 1.0,
                        });
                    }
                }
                SearchSection::News => {
                    let filter = Filter::Contains(vec!["title", "content"], needle.clone());
                    for news in self.find_records::<News>(&filter, &options).await? {
                        results.push(SearchResult {
                            kind: "news".to_string(),
                            url: format!("/news-media/{}", news.id),
                            title: news.data.title,
                            description: truncate_chars(&news.data.content, SEARCH_DESCRIPTION_CHARS),
                            id: news.id,
                            relevance: 1.0,
                        });
                    }
                }
                SearchSection::Events => {
                    let filter = Filter::Contains(vec!["title", "description"], needle.clone());
                    for event in self.find_records::<Event>(&filter, &options).await? {
                        results.push(SearchResult {
                            kind: "event".to_string(),
                            url: format!("/visits-delegations-events/{}", event.id),
                            title: event.data.title,
                            description: truncate_chars(&event.data.description, SEARCH_DESCRIPTION_CHARS),
                            id: event.id,
                            relevance: 1.0,
                        });
                    }
                }
                SearchSection::Partnerships => {
                    let filter = Filter::Contains(
                        vec!["partnerName", "details", "country"],
                        needle.clone(),
                    );
                    for partnership in self.find_records::<Partnership>(&filter, &options).await? {
                        results.push(SearchResult {
                            kind: "partnership".to_string(),
                            url: format!("/global-partnerships/{}", partnership.id),
                            title: partnership.data.partner_name,
                            description: truncate_chars(&partnership.data.details, SEARCH_DESCRIPTION_CHARS),
                            id: partnership.id,
                            relevance: 1.0,
                        });
                    }
                }
            }
        }

        Ok(results)
    }

    // Admins

    pub async fn find_admin(&self, username: &str) -> Result<Option<AdminUser>> {
        self.find_record(&Filter::eq("username", username)).await
    }

    pub async fn create_admin(&self, username: &str, password: &str) -> Result<AdminUser> {
        if self.find_admin(username).await?.is_some() {
            return Err(AppError::BadRequest(format!(
                "Admin user '{}' already exists",
                username
            )));
        }
        let admin = AdminUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: crypto::hash_password(password)?,
            role: "admin".to_string(),
            created_at: Utc::now(),
        };
        self.insert_record(&admin).await?;
        Ok(admin)
    }

    /// Returns the admin when the password matches, upgrading legacy hashes on the way.
    pub async fn authenticate_admin(&self, username: &str, password: &str) -> Result<Option<AdminUser>> {
        let Some(mut admin) = self.find_admin(username).await? else {
            return Ok(None);
        };
        if !crypto::verify_password(password, &admin.password_hash) {
            return Ok(None);
        }

        if crypto::needs_rehash(&admin.password_hash) {
            let upgraded = crypto::hash_password(password)?;
            let mut set = Document::new();
            set.insert("password", upgraded.clone());
            self.store
                .update_one(Collection::Admins, &Filter::eq("username", username), set)
                .await?;
            tracing::info!("Upgraded legacy password hash for {}", username);
            admin.password_hash = upgraded;
        }
        Ok(Some(admin))
    }
}
