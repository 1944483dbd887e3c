// ABOUTME: Type definitions for stored content, API requests and API responses
// ABOUTME: Includes the string enums, create/update payloads with validation, and stats/search shapes

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::store::Collection;
use crate::validate::{Checks, Validate};

/// A stored entity type: which collection it lives in and which fields hold dates.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    const DATE_FIELDS: &'static [&'static str];
    /// Human name used in "… not found" messages.
    const NOUN: &'static str;
}

/// Accepts RFC 3339 as well as the zone-less forms HTML date inputs send; those are read as UTC.
pub fn parse_datetime(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f"];

    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
        .ok_or_else(|| format!("invalid date '{}'", raw))
}

fn deserialize_datetime<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).map_err(serde::de::Error::custom)
}

/// Null and blank strings both mean "no date".
fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_datetime(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? } default $default:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            /// Case-insensitive; stored data from older clients is not always canonical.
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("'{}' is not one of: {}", s, allowed.join(", "))
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum!(ProgramStatus {
    Active => "Active",
    Inactive => "Inactive",
} default Active);

string_enum!(ContactStatus {
    New => "New",
    Read => "Read",
    Replied => "Replied",
} default New);

string_enum!(NewsCategory {
    Announcement => "Announcement",
    Mou => "MoU",
    Achievement => "Achievement",
    PressRelease => "Press Release",
} default Announcement);

string_enum!(PartnershipType {
    Strategic => "Strategic",
    Research => "Research",
    DualDegree => "Dual Degree",
    StudentExchange => "Student Exchange",
} default Strategic);

string_enum!(PartnershipStatus {
    Active => "Active",
    UnderNegotiation => "Under Negotiation",
    Expired => "Expired",
} default Active);

string_enum!(EventType {
    Visit => "Visit",
    Conference => "Conference",
    Seminar => "Seminar",
    Webinar => "Webinar",
    Delegation => "Delegation",
} default Visit);

string_enum!(FormType {
    Enquiry => "Enquiry",
    Proposal => "Proposal",
    LorRequest => "LOR Request",
    Application => "Application",
    Partnership => "Partnership",
} default Enquiry);

string_enum!(FaqCategory {
    Admissions => "Admissions",
    Mobility => "Mobility",
    Visas => "Visas",
    General => "General",
    Partnerships => "Partnerships",
} default General);

impl FormType {
    /// Parses a form type from a URL segment, where `lor-request` and `lor_request` mean "LOR Request".
    pub fn from_path(segment: &str) -> std::result::Result<Self, String> {
        segment.replace(['-', '_'], " ").parse()
    }

    pub fn confirmation(self) -> &'static str {
        match self {
            FormType::Proposal => {
                "Your proposal has been submitted successfully. Our team will review and contact you soon."
            }
            FormType::LorRequest => {
                "Your LOR request has been received. We will process it within 5 business days."
            }
            FormType::Application => {
                "Your application has been submitted. Check your email for further instructions."
            }
            FormType::Partnership => {
                "Thank you for your interest in partnering with us. We will respond within 2 weeks."
            }
            FormType::Enquiry => "Your submission has been received successfully.",
        }
    }
}

fn default_true() -> bool {
    true
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// Programs

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramCreate {
    pub title: String,
    pub description: String,
    pub partner_university: String,
    pub duration: String,
    pub eligibility: String,
    pub deadline: String,
    pub application_link: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: ProgramStatus,
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub vision: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub eligibility_detailed: Vec<String>,
    #[serde(default)]
    pub tuition_fee: Option<String>,
    #[serde(default)]
    pub living_expenses: Option<String>,
    #[serde(default)]
    pub insurance: Option<String>,
    #[serde(default)]
    pub visa_fees: Option<String>,
    #[serde(default)]
    pub travel: Option<String>,
    #[serde(default)]
    pub scholarships: Vec<String>,
    #[serde(default)]
    pub accommodation: Vec<String>,
    #[serde(default)]
    pub university_founded: Option<String>,
    #[serde(default)]
    pub university_ranking: Option<String>,
    #[serde(default)]
    pub university_specialties: Vec<String>,
    #[serde(default)]
    pub campus_info: Option<String>,
    #[serde(default)]
    pub student_body: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgramUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub partner_university: Option<String>,
    pub duration: Option<String>,
    pub eligibility: Option<String>,
    pub deadline: Option<String>,
    pub application_link: Option<String>,
    pub image: Option<String>,
    pub status: Option<ProgramStatus>,
    pub purpose: Option<String>,
    pub vision: Option<String>,
    pub benefits: Option<Vec<String>>,
    pub eligibility_detailed: Option<Vec<String>>,
    pub tuition_fee: Option<String>,
    pub living_expenses: Option<String>,
    pub insurance: Option<String>,
    pub visa_fees: Option<String>,
    pub travel: Option<String>,
    pub scholarships: Option<Vec<String>>,
    pub accommodation: Option<Vec<String>>,
    pub university_founded: Option<String>,
    pub university_ranking: Option<String>,
    pub university_specialties: Option<Vec<String>>,
    pub campus_info: Option<String>,
    pub student_body: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    #[serde(flatten)]
    pub data: ProgramCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Program {
    const COLLECTION: Collection = Collection::Programs;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];
    const NOUN: &'static str = "Program";
}

fn check_program_costs(checks: &mut Checks, fields: [(&str, Option<&str>); 5]) {
    for (name, value) in fields {
        checks.optional_length(name, value, 0, Some(200));
    }
}

impl Validate for ProgramCreate {
    fn validate(&self) -> Result<()> {
        let mut checks = Checks::new();
        checks
            .length("title", &self.title, 1, Some(200))
            .length("description", &self.description, 10, Some(2000))
            .length("partnerUniversity", &self.partner_university, 1, Some(200))
            .length("duration", &self.duration, 1, Some(100))
            .length("eligibility", &self.eligibility, 1, Some(500))
            .length("deadline", &self.deadline, 1, Some(100))
            .length("applicationLink", &self.application_link, 1, None)
            .url("applicationLink", Some(&self.application_link))
            .optional_length("purpose", self.purpose.as_deref(), 0, Some(1000))
            .optional_length("vision", self.vision.as_deref(), 0, Some(500))
            .optional_length("universityFounded", self.university_founded.as_deref(), 0, Some(100))
            .optional_length("universityRanking", self.university_ranking.as_deref(), 0, Some(200))
            .optional_length("campusInfo", self.campus_info.as_deref(), 0, Some(200))
            .optional_length("studentBody", self.student_body.as_deref(), 0, Some(200));
        check_program_costs(
            &mut checks,
            [
                ("tuitionFee", self.tuition_fee.as_deref()),
                ("livingExpenses", self.living_expenses.as_deref()),
                ("insurance", self.insurance.as_deref()),
                ("visaFees", self.visa_fees.as_deref()),
                ("travel", self.travel.as_deref()),
            ],
        );
        checks.finish()
    }
}

impl Validate for ProgramUpdate {
    fn validate(&self) -> Result<()> {
        let mut checks = Checks::new();
        checks
            .optional_length("title", self.title.as_deref(), 1, Some(200))
            .optional_length("description", self.description.as_deref(), 10, Some(2000))
            .optional_length("partnerUniversity", self.partner_university.as_deref(), 1, Some(200))
            .optional_length("duration", self.duration.as_deref(), 1, Some(100))
            .optional_length("eligibility", self.eligibility.as_deref(), 1, Some(500))
            .optional_length("deadline", self.deadline.as_deref(), 1, Some(100))
            .optional_length("applicationLink", self.application_link.as_deref(), 1, None)
            .url("applicationLink", self.application_link.as_deref().filter(|s| !s.is_empty()))
            .optional_length("purpose", self.purpose.as_deref(), 0, Some(1000))
            .optional_length("vision", self.vision.as_deref(), 0, Some(500))
            .optional_length("universityFounded", self.university_founded.as_deref(), 0, Some(100))
            .optional_length("universityRanking", self.university_ranking.as_deref(), 0, Some(200))
            .optional_length("campusInfo", self.campus_info.as_deref(), 0, Some(200))
            .optional_length("studentBody", self.student_body.as_deref(), 0, Some(200));
        check_program_costs(
            &mut checks,
            [
                ("tuitionFee", self.tuition_fee.as_deref()),
                ("livingExpenses", self.living_expenses.as_deref()),
                ("insurance", self.insurance.as_deref()),
                ("visaFees", self.visa_fees.as_deref()),
                ("travel", self.travel.as_deref()),
            ],
        );
        checks.finish()
    }
}

// News

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsCreate {
    pub title: String,
    pub content: String,
    pub category: NewsCategory,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_datetime")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
    /// Link to an attached PDF.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<NewsCategory>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub date: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub file: Option<String>,
    pub author: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
}

impl NewsUpdate {
    /// Blank strings from the admin form mean "leave unchanged".
    pub fn without_blanks(self) -> Self {
        Self {
            title: blank_to_none(self.title),
            content: blank_to_none(self.content),
            image: blank_to_none(self.image),
            file: blank_to_none(self.file),
            author: blank_to_none(self.author),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: String,
    #[serde(flatten)]
    pub data: NewsCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for News {
    const COLLECTION: Collection = Collection::News;
    const DATE_FIELDS: &'static [&'static str] = &["date", "createdAt", "updatedAt"];
    const NOUN: &'static str = "News article";
}

impl Validate for NewsCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("title", &self.title, 1, Some(300))
            .length("content", &self.content, 10, Some(5000))
            .optional_length("author", self.author.as_deref(), 0, Some(100))
            .finish()
    }
}

impl Validate for NewsUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("title", self.title.as_deref(), 1, Some(300))
            .optional_length("content", self.content.as_deref(), 10, Some(5000))
            .optional_length("author", self.author.as_deref(), 0, Some(100))
            .finish()
    }
}

// Partnerships

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipCreate {
    pub partner_name: String,
    #[serde(rename = "type")]
    pub partnership_type: PartnershipType,
    pub country: String,
    pub details: String,
    #[serde(default)]
    pub status: PartnershipStatus,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub signed_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiry_date: Option<DateTime<Utc>>,
    /// Link to the signed MoU.
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartnershipUpdate {
    pub partner_name: Option<String>,
    #[serde(rename = "type")]
    pub partnership_type: Option<PartnershipType>,
    pub country: Option<String>,
    pub details: Option<String>,
    pub status: Option<PartnershipStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub signed_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub expiry_date: Option<DateTime<Utc>>,
    pub document: Option<String>,
    pub logo: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Partnership {
    pub id: String,
    #[serde(flatten)]
    pub data: PartnershipCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Partnership {
    const COLLECTION: Collection = Collection::Partnerships;
    const DATE_FIELDS: &'static [&'static str] =
        &["signedDate", "expiryDate", "createdAt", "updatedAt"];
    const NOUN: &'static str = "Partnership";
}

impl Validate for PartnershipCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("partnerName", &self.partner_name, 1, Some(300))
            .length("country", &self.country, 1, Some(100))
            .length("details", &self.details, 10, Some(2000))
            .url("website", self.website.as_deref().filter(|s| !s.is_empty()))
            .optional_length("contactPerson", self.contact_person.as_deref(), 0, Some(200))
            .optional_length("contactEmail", self.contact_email.as_deref(), 0, Some(200))
            .finish()
    }
}

impl Validate for PartnershipUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("partnerName", self.partner_name.as_deref(), 1, Some(300))
            .optional_length("country", self.country.as_deref(), 1, Some(100))
            .optional_length("details", self.details.as_deref(), 10, Some(2000))
            .url("website", self.website.as_deref().filter(|s| !s.is_empty()))
            .optional_length("contactPerson", self.contact_person.as_deref(), 0, Some(200))
            .optional_length("contactEmail", self.contact_email.as_deref(), 0, Some(200))
            .finish()
    }
}

// Team

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberCreate {
    pub name: String,
    pub role: String,
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub office: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    /// Display position; lower first.
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "is_leadership", default)]
    pub is_leadership: bool,
    #[serde(rename = "is_active", default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberUpdate {
    pub name: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
    /// `Some("")` clears the portrait.
    pub image: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub office: Option<String>,
    pub department: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub order: Option<i64>,
    #[serde(rename = "is_leadership")]
    pub is_leadership: Option<bool>,
    #[serde(rename = "is_active")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    #[serde(flatten)]
    pub data: TeamMemberCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for TeamMember {
    const COLLECTION: Collection = Collection::Team;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];
    const NOUN: &'static str = "Team member";
}

impl Validate for TeamMemberCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("name", &self.name, 1, Some(200))
            .length("role", &self.role, 1, Some(200))
            .length("bio", &self.bio, 10, Some(1000))
            .optional_length("email", self.email.as_deref(), 0, Some(200))
            .optional_length("phone", self.phone.as_deref(), 0, Some(20))
            .optional_length("office", self.office.as_deref(), 0, Some(100))
            .finish()
    }
}

impl Validate for TeamMemberUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("name", self.name.as_deref(), 1, Some(200))
            .optional_length("role", self.role.as_deref(), 1, Some(200))
            .optional_length("bio", self.bio.as_deref(), 10, Some(1000))
            .optional_length("email", self.email.as_deref(), 0, Some(200))
            .optional_length("phone", self.phone.as_deref(), 0, Some(20))
            .optional_length("office", self.office.as_deref(), 0, Some(100))
            .finish()
    }
}

// Events

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventCreate {
    pub title: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub description: String,
    #[serde(deserialize_with = "deserialize_datetime")]
    pub start_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub registration_link: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_datetime")]
    pub end_date: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    pub organizer: Option<String>,
    pub participants: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub registration_link: Option<String>,
}

impl EventUpdate {
    /// Blank strings from the admin form mean "leave unchanged".
    pub fn without_blanks(self) -> Self {
        Self {
            title: blank_to_none(self.title),
            description: blank_to_none(self.description),
            venue: blank_to_none(self.venue),
            organizer: blank_to_none(self.organizer),
            registration_link: blank_to_none(self.registration_link),
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(flatten)]
    pub data: EventCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Event {
    const COLLECTION: Collection = Collection::Events;
    const DATE_FIELDS: &'static [&'static str] = &["startDate", "endDate", "createdAt", "updatedAt"];
    const NOUN: &'static str = "Event";
}

impl Validate for EventCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("title", &self.title, 1, Some(300))
            .length("description", &self.description, 10, Some(2000))
            .optional_length("venue", self.venue.as_deref(), 0, Some(300))
            .optional_length("organizer", self.organizer.as_deref(), 0, Some(200))
            .url(
                "registrationLink",
                self.registration_link.as_deref().filter(|s| !s.is_empty()),
            )
            .finish()
    }
}

impl Validate for EventUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("title", self.title.as_deref(), 1, Some(300))
            .optional_length("description", self.description.as_deref(), 10, Some(2000))
            .optional_length("venue", self.venue.as_deref(), 0, Some(300))
            .optional_length("organizer", self.organizer.as_deref(), 0, Some(200))
            .url(
                "registrationLink",
                self.registration_link.as_deref().filter(|s| !s.is_empty()),
            )
            .finish()
    }
}

// Gallery

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageCreate {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Public path or URL of the image.
    pub image: String,
    #[serde(default)]
    pub alt: Option<String>,
    pub category: String,
    #[serde(default)]
    pub order: i64,
    #[serde(rename = "is_featured", default)]
    pub is_featured: bool,
    #[serde(rename = "is_active", default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub alt: Option<String>,
    pub category: Option<String>,
    pub order: Option<i64>,
    #[serde(rename = "is_featured")]
    pub is_featured: Option<bool>,
    #[serde(rename = "is_active")]
    pub is_active: Option<bool>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub id: String,
    #[serde(flatten)]
    pub data: GalleryImageCreate,
    pub upload_date: DateTime<Utc>,
}

impl Record for GalleryImage {
    const COLLECTION: Collection = Collection::Gallery;
    const DATE_FIELDS: &'static [&'static str] = &["uploadDate"];
    const NOUN: &'static str = "Image";
}

impl Validate for GalleryImageCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("title", &self.title, 1, Some(200))
            .length("description", &self.description, 0, Some(1000))
            .length("image", &self.image, 1, None)
            .optional_length("alt", self.alt.as_deref(), 0, Some(200))
            .length("category", &self.category, 1, None)
            .non_negative("order", Some(self.order))
            .finish()
    }
}

impl Validate for GalleryImageUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("title", self.title.as_deref(), 1, Some(200))
            .optional_length("description", self.description.as_deref(), 0, Some(1000))
            .optional_length("alt", self.alt.as_deref(), 0, Some(200))
            .optional_length("category", self.category.as_deref(), 1, None)
            .non_negative("order", self.order)
            .finish()
    }
}

// FAQs

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqCreate {
    pub question: String,
    pub answer: String,
    pub category: FaqCategory,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FaqUpdate {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<FaqCategory>,
    pub order: Option<i64>,
    pub featured: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: String,
    #[serde(flatten)]
    pub data: FaqCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for Faq {
    const COLLECTION: Collection = Collection::Faqs;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];
    const NOUN: &'static str = "FAQ";
}

impl Validate for FaqCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("question", &self.question, 5, Some(500))
            .length("answer", &self.answer, 10, Some(2000))
            .finish()
    }
}

impl Validate for FaqUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("question", self.question.as_deref(), 5, Some(500))
            .optional_length("answer", self.answer.as_deref(), 10, Some(2000))
            .finish()
    }
}

// Static content

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticContentCreate {
    /// Lookup key such as `vision_mission`.
    pub key: String,
    pub title: String,
    /// Markdown or HTML.
    pub content: String,
    pub section: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticContentUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub section: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StaticContent {
    pub id: String,
    #[serde(flatten)]
    pub data: StaticContentCreate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for StaticContent {
    const COLLECTION: Collection = Collection::StaticContent;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt", "updatedAt"];
    const NOUN: &'static str = "Content";
}

impl Validate for StaticContentCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("key", &self.key, 1, Some(100))
            .length("title", &self.title, 1, Some(300))
            .length("content", &self.content, 10, None)
            .length("section", &self.section, 1, Some(100))
            .finish()
    }
}

impl Validate for StaticContentUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .optional_length("title", self.title.as_deref(), 1, Some(300))
            .optional_length("content", self.content.as_deref(), 10, None)
            .optional_length("section", self.section.as_deref(), 1, Some(100))
            .finish()
    }
}

// Contacts and forms

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactCreate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub form_type: FormType,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    #[serde(flatten)]
    pub data: ContactCreate,
    #[serde(default)]
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

impl Record for Contact {
    const COLLECTION: Collection = Collection::Contacts;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt"];
    const NOUN: &'static str = "Contact";
}

impl Validate for ContactCreate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("firstName", &self.first_name, 1, Some(100))
            .length("lastName", &self.last_name, 1, Some(100))
            .length("email", &self.email, 1, Some(200))
            .email("email", Some(&self.email))
            .optional_length("phone", self.phone.as_deref(), 0, Some(20))
            .length("subject", &self.subject, 1, Some(200))
            .length("message", &self.message, 10, Some(2000))
            .optional_length("country", self.country.as_deref(), 0, Some(100))
            .optional_length("institution", self.institution.as_deref(), 0, Some(200))
            .finish()
    }
}

// Admins

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub username: String,
    /// Argon2 PHC string, or a legacy unsalted SHA-256 hex digest.
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_role() -> String {
    "admin".to_string()
}

impl Record for AdminUser {
    const COLLECTION: Collection = Collection::Admins;
    const DATE_FIELDS: &'static [&'static str] = &["createdAt"];
    const NOUN: &'static str = "Admin";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .length("username", &self.username, 1, Some(50))
            .length("password", &self.password, 1, Some(200))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

// Stats

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    pub students_exchanged: i64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            students_exchanged: 150,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfigUpdate {
    pub students_exchanged: Option<i64>,
}

impl Validate for StatsConfigUpdate {
    fn validate(&self) -> Result<()> {
        Checks::new()
            .non_negative("studentsExchanged", self.students_exchanged)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_programs: u64,
    pub partner_universities: u64,
    pub students_exchanged: i64,
    pub countries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedStats {
    #[serde(flatten)]
    pub base: Stats,
    pub total_events: u64,
    pub active_partnerships: u64,
    pub international_students: u64,
    pub news_articles: u64,
    pub team_members: u64,
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub relevance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_enums_parse_case_insensitively() {
        assert_eq!("admissions".parse::<FaqCategory>().unwrap(), FaqCategory::Admissions);
        assert_eq!("press release".parse::<NewsCategory>().unwrap(), NewsCategory::PressRelease);
        assert_eq!(
            serde_json::from_value::<ContactStatus>(json!("read")).unwrap(),
            ContactStatus::Read
        );
        assert!("Unknown".parse::<EventType>().is_err());
        assert_eq!(serde_json::to_value(NewsCategory::Mou).unwrap(), json!("MoU"));
    }

    #[test]
    fn test_parse_datetime_accepts_zone_less_input() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(parse_datetime("2025-03-15T10:00:00Z").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-15T12:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-15T10:00:00").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-15T10:00").unwrap(), expected);
        assert_eq!(parse_datetime("2025-03-15 10:00:00.000").unwrap(), expected);
        assert_eq!(
            parse_datetime("2025-03-15").unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 15, 0, 0, 0).unwrap()
        );
        assert!(parse_datetime("next tuesday").is_err());
    }

    #[test]
    fn test_event_create_takes_naive_start_date() {
        let event: EventCreate = serde_json::from_value(json!({
            "title": "Delegation visit",
            "type": "Visit",
            "description": "Partner delegation",
            "startDate": "2025-03-15T10:00:00",
            "endDate": ""
        }))
        .unwrap();
        assert_eq!(event.start_date, Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap());
        assert_eq!(event.end_date, None);

        let garbled = serde_json::from_value::<EventCreate>(json!({
            "title": "Delegation visit",
            "type": "Visit",
            "description": "Partner delegation",
            "startDate": "soon"
        }));
        assert!(garbled.is_err());
    }

    #[test]
    fn test_update_payloads_take_naive_dates() {
        let update: NewsUpdate = serde_json::from_value(json!({"date": "2025-03-15T10:00"})).unwrap();
        assert_eq!(update.date, Some(Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap()));

        let update: NewsUpdate = serde_json::from_value(json!({"title": "Renamed"})).unwrap();
        assert_eq!(update.date, None);

        let update: PartnershipUpdate =
            serde_json::from_value(json!({"signedDate": "2024-01-10", "expiryDate": null})).unwrap();
        assert_eq!(
            update.signed_date,
            Some(Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(update.expiry_date, None);

        let update: EventUpdate = serde_json::from_value(json!({"endDate": "2025-03-16T18:30"})).unwrap();
        assert_eq!(update.start_date, None);
        assert_eq!(update.end_date, Some(Utc.with_ymd_and_hms(2025, 3, 16, 18, 30, 0).unwrap()));
    }

    #[test]
    fn test_form_type_from_path() {
        assert_eq!(FormType::from_path("lor-request").unwrap(), FormType::LorRequest);
        assert_eq!(FormType::from_path("LOR Request").unwrap(), FormType::LorRequest);
        assert_eq!(FormType::from_path("proposal").unwrap(), FormType::Proposal);
        assert!(FormType::from_path("complaint").is_err());
    }

    #[test]
    fn test_program_create_defaults_and_validation() {
        let program: ProgramCreate = serde_json::from_value(json!({
            "title": "Engineering Innovation",
            "description": "Advanced engineering program in Silicon Valley.",
            "partnerUniversity": "Stanford University, USA",
            "duration": "1 Semester",
            "eligibility": "3rd/4th year students",
            "deadline": "January 20, 2025",
            "applicationLink": "https://forms.google.com/stanford"
        }))
        .unwrap();
        assert_eq!(program.status, ProgramStatus::Active);
        assert!(program.benefits.is_empty());
        assert!(program.validate().is_ok());

        let bad = ProgramCreate {
            application_link: "forms.google.com".into(),
            description: "short".into(),
            ..program
        };
        match bad.validate() {
            Err(crate::error::AppError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["description", "applicationLink"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_team_member_wire_names() {
        let member: TeamMemberCreate = serde_json::from_value(json!({
            "name": "Dr. Rajesh Kumar",
            "role": "Director",
            "bio": "Twenty years in international education."
        }))
        .unwrap();
        assert!(member.is_active);
        assert!(!member.is_leadership);
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["is_active"], json!(true));
        assert!(value.get("isActive").is_none());
    }

    #[test]
    fn test_news_update_without_blanks() {
        let update = NewsUpdate {
            title: Some("  ".into()),
            author: Some("OIA Team".into()),
            featured: Some(false),
            ..NewsUpdate::default()
        }
        .without_blanks();
        assert_eq!(update.title, None);
        assert_eq!(update.author.as_deref(), Some("OIA Team"));
        assert_eq!(update.featured, Some(false));
    }

    #[test]
    fn test_page_total_pages() {
        let page: Page<u8> = Page::new(vec![], 21, 1, 10);
        assert_eq!(page.total_pages, 3);
        let empty: Page<u8> = Page::new(vec![], 0, 1, 10);
        assert_eq!(empty.total_pages, 0);
    }
}
