// ABOUTME: Tests for the storage layer running against the in-memory document store
// ABOUTME: Covers CRUD per collection, pagination, search, statistics, contacts and admin accounts

#[cfg(test)]
mod tests {
    use super::super::storage::*;
    use super::super::store::{codec, Collection, DocumentStore, MemoryStore};
    use super::super::types::*;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn create_test_storage() -> Storage {
        Storage::new(Arc::new(MemoryStore::new()))
    }

    fn program(title: &str, partner: &str, status: ProgramStatus) -> ProgramCreate {
        ProgramCreate {
            title: title.to_string(),
            description: format!("{} is a semester-long exchange with a partner campus.", title),
            partner_university: partner.to_string(),
            duration: "1 Semester".to_string(),
            eligibility: "2nd year and above".to_string(),
            deadline: "March 1, 2025".to_string(),
            application_link: "https://forms.example.org/apply".to_string(),
            image: None,
            status,
            purpose: None,
            vision: None,
            benefits: vec![],
            eligibility_detailed: vec![],
            tuition_fee: None,
            living_expenses: None,
            insurance: None,
            visa_fees: None,
            travel: None,
            scholarships: vec![],
            accommodation: vec![],
            university_founded: None,
            university_ranking: None,
            university_specialties: vec![],
            campus_info: None,
            student_body: None,
        }
    }

    fn news(title: &str, category: NewsCategory, day: u32, featured: bool) -> NewsCreate {
        NewsCreate {
            title: title.to_string(),
            content: format!("{} was announced by the international office today.", title),
            category,
            date: Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap(),
            image: None,
            file: None,
            author: Some("OIA Team".to_string()),
            tags: vec![],
            featured,
        }
    }

    fn event(title: &str, start_in_days: i64) -> EventCreate {
        EventCreate {
            title: title.to_string(),
            event_type: EventType::Seminar,
            description: format!("{} for students and faculty.", title),
            start_date: Utc::now() + Duration::days(start_in_days),
            end_date: None,
            venue: Some("Main Auditorium".to_string()),
            organizer: None,
            participants: vec![],
            images: vec![],
            featured: false,
            registration_link: None,
        }
    }

    fn partnership(name: &str, country: &str, status: PartnershipStatus) -> PartnershipCreate {
        PartnershipCreate {
            partner_name: name.to_string(),
            partnership_type: PartnershipType::StudentExchange,
            country: country.to_string(),
            details: format!("Exchange agreement with {}.", name),
            status,
            signed_date: None,
            expiry_date: None,
            document: None,
            logo: None,
            website: None,
            contact_person: None,
            contact_email: None,
            benefits: vec![],
        }
    }

    fn contact(form_type: FormType) -> ContactCreate {
        ContactCreate {
            first_name: "Asha".to_string(),
            last_name: "Verma".to_string(),
            email: "asha@example.org".to_string(),
            phone: None,
            subject: "Exchange enquiry".to_string(),
            message: "I would like to know more about the programs.".to_string(),
            form_type,
            country: None,
            institution: None,
        }
    }

    #[tokio::test]
    async fn test_program_crud() {
        let storage = create_test_storage();

        let created = storage
            .create_program(program("Engineering Exchange", "Stanford University", ProgramStatus::Active))
            .await
            .unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = storage.get_program(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.data.title, "Engineering Exchange");
        assert_eq!(fetched.data.status, ProgramStatus::Active);

        let update = ProgramUpdate {
            title: Some("Engineering Innovation".to_string()),
            status: Some(ProgramStatus::Inactive),
            ..ProgramUpdate::default()
        };
        let updated = storage.update_program(&created.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.data.title, "Engineering Innovation");
        assert_eq!(updated.data.status, ProgramStatus::Inactive);
        assert_eq!(updated.data.partner_university, "Stanford University");
        assert!(updated.updated_at >= fetched.updated_at);

        assert!(storage.delete_program(&created.id).await.unwrap());
        assert!(storage.get_program(&created.id).await.unwrap().is_none());
        assert!(!storage.delete_program(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_missing_record_returns_none() {
        let storage = create_test_storage();
        let update = ProgramUpdate {
            title: Some("Nothing here".to_string()),
            ..ProgramUpdate::default()
        };
        assert!(storage.update_program("missing", &update).await.unwrap().is_none());
        assert!(storage
            .update_faq("missing", &FaqUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_programs_active_only_and_pagination() {
        let storage = create_test_storage();
        for i in 0..5 {
            storage
                .create_program(program(&format!("Program {}", i), "Partner", ProgramStatus::Active))
                .await
                .unwrap();
        }
        storage
            .create_program(program("Closed program", "Partner", ProgramStatus::Inactive))
            .await
            .unwrap();

        let first = storage.list_programs(true, 1, 2).await.unwrap();
        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.total_pages, 3);

        let last = storage.list_programs(true, 3, 2).await.unwrap();
        assert_eq!(last.items.len(), 1);

        let beyond = storage.list_programs(true, 9, 2).await.unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total, 5);

        let all = storage.list_programs(false, 1, 50).await.unwrap();
        assert_eq!(all.total, 6);

        let far = storage.list_programs(true, u64::MAX, 50).await.unwrap();
        assert!(far.items.is_empty());
        assert_eq!(far.total, 5);
    }

    #[tokio::test]
    async fn test_news_filters_and_ordering() {
        let storage = create_test_storage();
        storage
            .create_news(news("Older MoU", NewsCategory::Mou, 3, false))
            .await
            .unwrap();
        storage
            .create_news(news("Newest MoU", NewsCategory::Mou, 20, true))
            .await
            .unwrap();
        storage
            .create_news(news("Award", NewsCategory::Achievement, 10, true))
            .await
            .unwrap();

        let mous = storage
            .list_news(Some(NewsCategory::Mou), false, 1, 10)
            .await
            .unwrap();
        let titles: Vec<&str> = mous.items.iter().map(|n| n.data.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest MoU", "Older MoU"]);

        let featured = storage.list_news(None, true, 1, 10).await.unwrap();
        assert_eq!(featured.total, 2);
        assert_eq!(featured.items[0].data.title, "Newest MoU");
    }

    #[tokio::test]
    async fn test_news_update_ignores_blank_strings() {
        let storage = create_test_storage();
        let created = storage
            .create_news(news("Original title", NewsCategory::Announcement, 5, false))
            .await
            .unwrap();

        let update = NewsUpdate {
            title: Some("   ".to_string()),
            featured: Some(true),
            ..NewsUpdate::default()
        };
        let updated = storage.update_news(&created.id, update).await.unwrap().unwrap();
        assert_eq!(updated.data.title, "Original title");
        assert!(updated.data.featured);
    }

    #[tokio::test]
    async fn test_upcoming_events_only() {
        let storage = create_test_storage();
        storage.create_event(event("Past seminar", -10)).await.unwrap();
        storage.create_event(event("Next seminar", 5)).await.unwrap();
        storage.create_event(event("Later seminar", 30)).await.unwrap();

        let upcoming = storage.list_events(None, true, 1, 20).await.unwrap();
        let titles: Vec<&str> = upcoming.items.iter().map(|e| e.data.title.as_str()).collect();
        assert_eq!(titles, vec!["Later seminar", "Next seminar"]);

        let seminars = storage
            .list_events(Some(EventType::Seminar), false, 1, 20)
            .await
            .unwrap();
        assert_eq!(seminars.total, 3);
        let visits = storage
            .list_events(Some(EventType::Visit), false, 1, 20)
            .await
            .unwrap();
        assert_eq!(visits.total, 0);
    }

    #[tokio::test]
    async fn test_partnerships_sorted_by_name_and_filtered() {
        let storage = create_test_storage();
        for (name, country) in [("Zurich Tech", "Switzerland"), ("Aalto", "Finland"), ("MIT", "USA")] {
            storage
                .create_partnership(partnership(name, country, PartnershipStatus::Active))
                .await
                .unwrap();
        }

        let page = storage.list_partnerships(None, None, 1, 50).await.unwrap();
        let names: Vec<&str> = page.items.iter().map(|p| p.data.partner_name.as_str()).collect();
        assert_eq!(names, vec!["Aalto", "MIT", "Zurich Tech"]);

        let usa = storage
            .list_partnerships(Some(PartnershipType::StudentExchange), Some("USA"), 1, 50)
            .await
            .unwrap();
        assert_eq!(usa.total, 1);
        assert_eq!(usa.items[0].data.partner_name, "MIT");
    }

    #[tokio::test]
    async fn test_team_ordered_by_display_order() {
        let storage = create_test_storage();
        for (name, order) in [("Second", 2), ("First", 1), ("Third", 3)] {
            storage
                .create_team_member(TeamMemberCreate {
                    name: name.to_string(),
                    role: "Coordinator".to_string(),
                    bio: "Supports outgoing exchange students.".to_string(),
                    image: None,
                    email: None,
                    phone: None,
                    office: None,
                    department: None,
                    responsibilities: vec![],
                    order,
                    is_leadership: false,
                    is_active: true,
                })
                .await
                .unwrap();
        }
        let names: Vec<String> = storage
            .list_team()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.data.name)
            .collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_gallery_update_keeps_upload_date() {
        let storage = create_test_storage();
        let image = storage
            .create_gallery_image(GalleryImageCreate {
                title: "Welcome day".to_string(),
                description: String::new(),
                image: "/gallery/welcome.jpg".to_string(),
                alt: Some("Welcome day".to_string()),
                category: "Events".to_string(),
                order: 0,
                is_featured: false,
                is_active: true,
                tags: vec![],
            })
            .await
            .unwrap();

        let update = GalleryImageUpdate {
            category: Some("Campus".to_string()),
            ..GalleryImageUpdate::default()
        };
        let updated = storage
            .update_gallery_image(&image.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data.category, "Campus");
        assert_eq!(updated.data.image, "/gallery/welcome.jpg");

        let campus = storage.list_gallery(Some("Campus"), 1, 20).await.unwrap();
        assert_eq!(campus.total, 1);
        let events = storage.list_gallery(Some("Events"), 1, 20).await.unwrap();
        assert_eq!(events.total, 0);
    }

    #[tokio::test]
    async fn test_faqs_by_category() {
        let storage = create_test_storage();
        for (question, category, order) in [
            ("Do I need a visa for a semester abroad?", FaqCategory::Visas, 2),
            ("How do I apply for an exchange?", FaqCategory::Admissions, 1),
            ("Which visa documents are required?", FaqCategory::Visas, 1),
        ] {
            storage
                .create_faq(FaqCreate {
                    question: question.to_string(),
                    answer: "Contact the international office for details.".to_string(),
                    category,
                    order,
                    featured: false,
                })
                .await
                .unwrap();
        }

        let visas = storage.list_faqs(Some(FaqCategory::Visas)).await.unwrap();
        let orders: Vec<i64> = visas.iter().map(|f| f.data.order).collect();
        assert_eq!(orders, vec![1, 2]);
        assert_eq!(storage.list_faqs(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_static_content_by_key() {
        let storage = create_test_storage();
        let create = StaticContentCreate {
            key: "vision_mission".to_string(),
            title: "Vision and Mission".to_string(),
            content: "To make every student globally ready.".to_string(),
            section: "about".to_string(),
        };
        storage.create_static_content(create.clone()).await.unwrap();

        let duplicate = storage.create_static_content(create).await;
        assert!(matches!(duplicate, Err(crate::error::AppError::BadRequest(_))));

        let update = StaticContentUpdate {
            title: Some("Our Vision".to_string()),
            ..StaticContentUpdate::default()
        };
        let updated = storage
            .update_static_content("vision_mission", &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.data.title, "Our Vision");
        assert_eq!(updated.data.section, "about");

        assert_eq!(storage.list_static_content(Some("about")).await.unwrap().len(), 1);
        assert!(storage.list_static_content(Some("home")).await.unwrap().is_empty());

        assert!(storage.delete_static_content("vision_mission").await.unwrap());
        assert!(storage.get_static_content("vision_mission").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contacts_lifecycle() {
        let storage = create_test_storage();
        let enquiry = storage.create_contact(contact(FormType::Enquiry)).await.unwrap();
        storage.create_contact(contact(FormType::LorRequest)).await.unwrap();
        assert_eq!(enquiry.status, ContactStatus::New);

        let lor = storage.list_contacts(Some(FormType::LorRequest)).await.unwrap();
        assert_eq!(lor.len(), 1);
        assert_eq!(storage.list_contacts(None).await.unwrap().len(), 2);

        assert!(storage
            .update_contact_status(&enquiry.id, ContactStatus::Read)
            .await
            .unwrap());
        // Marking twice still finds the contact.
        assert!(storage
            .update_contact_status(&enquiry.id, ContactStatus::Read)
            .await
            .unwrap());
        assert!(!storage
            .update_contact_status("missing", ContactStatus::Read)
            .await
            .unwrap());

        let enquiries = storage.list_contacts(Some(FormType::Enquiry)).await.unwrap();
        assert_eq!(enquiries[0].status, ContactStatus::Read);

        assert!(storage.delete_contact(&enquiry.id).await.unwrap());
        assert_eq!(storage.count(Collection::Contacts).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_stats_and_config() {
        let storage = create_test_storage();
        storage
            .create_program(program("A", "Stanford University", ProgramStatus::Active))
            .await
            .unwrap();
        storage
            .create_program(program("B", "Stanford University", ProgramStatus::Active))
            .await
            .unwrap();
        storage
            .create_program(program("C", "Oxford University", ProgramStatus::Inactive))
            .await
            .unwrap();

        let stats = storage.stats().await.unwrap();
        assert_eq!(stats.total_programs, 2);
        assert_eq!(stats.partner_universities, 1);
        assert_eq!(stats.students_exchanged, 150);
        assert_eq!(stats.countries, 12);

        let config = storage
            .update_stats_config(&StatsConfigUpdate {
                students_exchanged: Some(275),
            })
            .await
            .unwrap();
        assert_eq!(config.students_exchanged, 275);
        assert_eq!(storage.stats().await.unwrap().students_exchanged, 275);

        // An empty update keeps the stored value.
        let unchanged = storage
            .update_stats_config(&StatsConfigUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged.students_exchanged, 275);
        assert_eq!(storage.count(Collection::StatsConfig).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_extended_stats_counts() {
        let storage = create_test_storage();
        storage
            .create_partnership(partnership("MIT", "USA", PartnershipStatus::Active))
            .await
            .unwrap();
        storage
            .create_partnership(partnership("Aalto", "Finland", PartnershipStatus::UnderNegotiation))
            .await
            .unwrap();
        storage
            .create_news(news("Hello", NewsCategory::Announcement, 1, false))
            .await
            .unwrap();
        storage.create_event(event("Orientation", 3)).await.unwrap();

        let extended = storage.extended_stats().await.unwrap();
        assert_eq!(extended.active_partnerships, 1);
        assert_eq!(extended.news_articles, 1);
        assert_eq!(extended.total_events, 1);
        assert_eq!(extended.team_members, 0);
        assert_eq!(extended.international_students, 250);
        assert_eq!(extended.base.total_programs, 0);
    }

    #[tokio::test]
    async fn test_search_sections_urls_and_limits() {
        let storage = create_test_storage();
        for i in 0..7 {
            storage
                .create_program(program(
                    &format!("Harvard summer {}", i),
                    "Harvard University",
                    ProgramStatus::Active,
                ))
                .await
                .unwrap();
        }
        let article = storage
            .create_news(news("New MoU signed with HARVARD", NewsCategory::Mou, 2, false))
            .await
            .unwrap();

        let results = storage.search("harvard", &SearchSection::ALL).await.unwrap();
        let programs = results.iter().filter(|r| r.kind == "program").count();
        assert_eq!(programs, 5);
        let hit = results.iter().find(|r| r.kind == "news").unwrap();
        assert_eq!(hit.url, format!("/news-media/{}", article.id));
        assert_eq!(hit.relevance, 1.0);

        let news_only = storage
            .search("harvard", &SearchSection::parse_list(Some("news")))
            .await
            .unwrap();
        assert_eq!(news_only.len(), 1);

        // Regex metacharacters are matched literally.
        assert!(storage.search("h.rvard", &SearchSection::ALL).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_truncates_descriptions() {
        let storage = create_test_storage();
        let mut long = program("Long program", "Partner", ProgramStatus::Active);
        long.description = "é".repeat(450);
        storage.create_program(long).await.unwrap();

        let results = storage
            .search("long program", &[SearchSection::Programs])
            .await
            .unwrap();
        assert_eq!(results[0].description.chars().count(), 200);
    }

    #[test]
    fn test_parse_section_list() {
        assert_eq!(SearchSection::parse_list(None), SearchSection::ALL.to_vec());
        assert_eq!(
            SearchSection::parse_list(Some("events, Partnerships,unknown")),
            vec![SearchSection::Events, SearchSection::Partnerships]
        );
        assert_eq!(SearchSection::parse_list(Some("  ")), SearchSection::ALL.to_vec());
        assert!(SearchSection::parse_list(Some("gallery")).is_empty());
    }

    #[tokio::test]
    async fn test_search_with_only_unknown_sections_finds_nothing() {
        let storage = create_test_storage();
        storage
            .create_program(program("Harvard summer", "Harvard University", ProgramStatus::Active))
            .await
            .unwrap();

        let sections = SearchSection::parse_list(Some("gallery"));
        assert!(storage.search("harvard", &sections).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_accounts() {
        let storage = create_test_storage();
        let admin = storage.create_admin("oia_admin", "s3cret-pass").await.unwrap();
        assert_ne!(admin.password_hash, "s3cret-pass");
        assert_eq!(admin.role, "admin");

        assert!(storage.create_admin("oia_admin", "other").await.is_err());

        assert!(storage
            .authenticate_admin("oia_admin", "s3cret-pass")
            .await
            .unwrap()
            .is_some());
        assert!(storage
            .authenticate_admin("oia_admin", "wrong")
            .await
            .unwrap()
            .is_none());
        assert!(storage
            .authenticate_admin("nobody", "s3cret-pass")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_legacy_hash_upgraded_on_login() {
        let store = Arc::new(MemoryStore::new());
        let storage = Storage::new(store.clone());
        let legacy = AdminUser {
            id: "legacy".to_string(),
            username: "old_admin".to_string(),
            password_hash: "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
                .to_string(),
            role: "admin".to_string(),
            created_at: Utc::now(),
        };
        let document = codec::to_document(&legacy, AdminUser::DATE_FIELDS).unwrap();
        store.insert(Collection::Admins, document).await.unwrap();

        let admin = storage
            .authenticate_admin("old_admin", "admin123")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.password_hash.starts_with("$argon2"));

        let stored = storage.find_admin("old_admin").await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2"));
        assert!(storage
            .authenticate_admin("old_admin", "admin123")
            .await
            .unwrap()
            .is_some());
    }
}
