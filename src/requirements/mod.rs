//! Per-document field requirement registry.
//!
//! Descriptive metadata built once per process: which fields each document
//! type wants, how to ask the applicant for them, and how urgent each one is.
//! The questionnaire layer reads this to decide what to ask; the auto-fill
//! engine must cover every always-fill key. Renderers deliberately do NOT
//! consult the registry: they reference field keys by convention, and the
//! registry stays descriptive metadata rather than a runtime dependency.

use crate::generators::DocumentType;
use lazy_static::lazy_static;
use serde::Serialize;
use utoipa::ToSchema;

/// How a question should be presented and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Textarea,
}

/// How badly a document needs the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    Important,
    Optional,
}

/// One field a document type wants. Immutable after process start.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldRequirement {
    /// Dot-namespaced key, e.g. `assets.property_value`.
    pub field_key: &'static str,
    pub label: &'static str,
    pub question: &'static str,
    pub kind: FieldKind,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

const fn req(
    field_key: &'static str,
    label: &'static str,
    question: &'static str,
    kind: FieldKind,
    priority: Priority,
) -> FieldRequirement {
    FieldRequirement {
        field_key,
        label,
        question,
        kind,
        priority,
        options: None,
        help: None,
    }
}

const fn req_select(
    field_key: &'static str,
    label: &'static str,
    question: &'static str,
    priority: Priority,
    options: &'static [&'static str],
) -> FieldRequirement {
    FieldRequirement {
        field_key,
        label,
        question,
        kind: FieldKind::Select,
        priority,
        options: Some(options),
        help: None,
    }
}

const fn req_help(
    field_key: &'static str,
    label: &'static str,
    question: &'static str,
    kind: FieldKind,
    priority: Priority,
    help: &'static str,
) -> FieldRequirement {
    FieldRequirement {
        field_key,
        label,
        question,
        kind,
        priority,
        options: None,
        help: Some(help),
    }
}

static COVER_LETTER: &[FieldRequirement] = &[
    req(
        "full_name",
        "Full name",
        "What is your full name as printed in your passport?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "passport_number",
        "Passport number",
        "What is your passport number?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "destination_country",
        "Destination",
        "Which country are you applying to visit?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req_select(
        "travel_purpose",
        "Purpose of travel",
        "What is the main purpose of your trip?",
        Priority::Critical,
        &["Tourism", "Family visit", "Business meeting", "Attending a conference"],
    ),
    req(
        "departure_date",
        "Departure date",
        "When do you plan to depart?",
        FieldKind::Date,
        Priority::Critical,
    ),
    req(
        "duration_days",
        "Trip duration (days)",
        "How many days will you stay?",
        FieldKind::Number,
        Priority::Important,
    ),
    req(
        "occupation",
        "Occupation",
        "What is your current occupation?",
        FieldKind::Text,
        Priority::Important,
    ),
    req(
        "employer_name",
        "Employer",
        "What is the name of your employer?",
        FieldKind::Text,
        Priority::Important,
    ),
    req_help(
        "reasons_to_return",
        "Ties to home country",
        "Why will you return home after the trip?",
        FieldKind::Textarea,
        Priority::Important,
        "Family, property, business, or employment commitments all count.",
    ),
];

static ID_TRANSLATION: &[FieldRequirement] = &[
    req(
        "full_name",
        "Full name",
        "What is your full name as printed on your national ID?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "father_name",
        "Father's name",
        "What is your father's name?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "mother_name",
        "Mother's name",
        "What is your mother's name?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "date_of_birth",
        "Date of birth",
        "What is your date of birth?",
        FieldKind::Date,
        Priority::Critical,
    ),
    req(
        "national_id_number",
        "National ID number",
        "What is your national ID number?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "place_of_birth",
        "Place of birth",
        "Where were you born?",
        FieldKind::Text,
        Priority::Important,
    ),
    req(
        "address",
        "Address",
        "What is your residential address?",
        FieldKind::Textarea,
        Priority::Important,
    ),
];

static VISITING_CARD: &[FieldRequirement] = &[
    req(
        "full_name",
        "Full name",
        "What name should appear on your visiting card?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "job_title",
        "Job title",
        "What is your job title?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "employer_name",
        "Company",
        "What company do you work for?",
        FieldKind::Text,
        Priority::Important,
    ),
    req(
        "phone",
        "Phone number",
        "What is your mobile number?",
        FieldKind::Text,
        Priority::Important,
    ),
    req(
        "email",
        "Email",
        "What is your email address?",
        FieldKind::Text,
        Priority::Optional,
    ),
    req(
        "company_address",
        "Company address",
        "What is your office address?",
        FieldKind::Textarea,
        Priority::Optional,
    ),
];

static FINANCIAL_STATEMENT: &[FieldRequirement] = &[
    req(
        "monthly_income",
        "Monthly income",
        "What is your monthly income?",
        FieldKind::Number,
        Priority::Critical,
    ),
    req(
        "monthly_expenses",
        "Monthly expenses",
        "Roughly how much do you spend per month?",
        FieldKind::Number,
        Priority::Important,
    ),
    req(
        "bank_balance",
        "Bank balance",
        "What is your current total bank balance?",
        FieldKind::Number,
        Priority::Critical,
    ),
    req(
        "annual_income_year_1",
        "Income (last year)",
        "What was your total income last year?",
        FieldKind::Number,
        Priority::Important,
    ),
    req(
        "annual_income_year_2",
        "Income (two years ago)",
        "What was your total income two years ago?",
        FieldKind::Number,
        Priority::Important,
    ),
    req(
        "annual_income_year_3",
        "Income (three years ago)",
        "What was your total income three years ago?",
        FieldKind::Number,
        Priority::Important,
    ),
    req(
        "has_bank_account",
        "Bank accounts",
        "Do you hold any bank accounts?",
        FieldKind::Boolean,
        Priority::Optional,
    ),
];

static TRAVEL_ITINERARY: &[FieldRequirement] = &[
    req(
        "destination_country",
        "Destination",
        "Which country are you visiting?",
        FieldKind::Text,
        Priority::Critical,
    ),
    req(
        "departure_date",
        "Departure date",
        "When do you depart?",
        FieldKind::Date,
        Priority::Critical,
    ),
    req(
        "duration_days",
        "Trip duration (days)",
        "How many days is the trip?",
        FieldKind::Number,
        Priority::Critical,
    ),
    req(
        "return_date",
        "Return date",
        "When do you return?",
        FieldKind::Date,
        Priority::Important,
    ),
    req(
        "travel_purpose",
        "Purpose of travel",
        "What is the purpose of the trip?",
        FieldKind::Text,
        Priority::Important,
    ),
];

static TRAVEL_HISTORY: &[FieldRequirement] = &[
    req(
        "has_previous_travel",
        "Previous travel",
        "Have you travelled internationally before?",
        FieldKind::Boolean,
        Priority::Important,
    ),
    req_help(
        "previous_travel",
        "Previous trips",
        "List your previous international trips.",
        FieldKind::Textarea,
        Priority::Optional,
        "Country, year, purpose, and length of stay for each trip.",
    ),
];

static HOME_TIES: &[FieldRequirement] = &[
    req(
        "is_married",
        "Marital status",
        "Are you married?",
        FieldKind::Boolean,
        Priority::Important,
    ),
    req(
        "children_count",
        "Children",
        "How many children do you have?",
        FieldKind::Number,
        Priority::Optional,
    ),
    req(
        "owns_business",
        "Business ownership",
        "Do you own a business?",
        FieldKind::Boolean,
        Priority::Important,
    ),
    req(
        "has_property",
        "Property ownership",
        "Do you own property?",
        FieldKind::Boolean,
        Priority::Important,
    ),
    req_help(
        "reasons_to_return",
        "Ties to home country",
        "Why will you return home after the trip?",
        FieldKind::Textarea,
        Priority::Critical,
        "Family, property, business, or employment commitments all count.",
    ),
];

static ASSET_VALUATION: &[FieldRequirement] = &[
    req(
        "has_property",
        "Property ownership",
        "Do you own property?",
        FieldKind::Boolean,
        Priority::Important,
    ),
    req(
        "property_value",
        "Property value",
        "What is the approximate value of your property?",
        FieldKind::Number,
        Priority::Optional,
    ),
    req(
        "has_vehicle",
        "Vehicle ownership",
        "Do you own a vehicle?",
        FieldKind::Boolean,
        Priority::Optional,
    ),
    req(
        "vehicle_value",
        "Vehicle value",
        "What is the approximate value of your vehicle?",
        FieldKind::Number,
        Priority::Optional,
    ),
    req_help(
        "assets",
        "Other assets",
        "List any other significant assets.",
        FieldKind::Textarea,
        Priority::Optional,
        "Type, description, and approximate value for each asset.",
    ),
];

/// Scalar keys auto-fill must guarantee non-empty, regardless of priority on
/// any individual document. Gated fields (spouse, business, property) and
/// collections are excluded: they only exist when their gate resolves true.
pub const ALWAYS_FILL_KEYS: &[&str] = &[
    "full_name",
    "father_name",
    "mother_name",
    "date_of_birth",
    "place_of_birth",
    "nationality",
    "address",
    "phone",
    "email",
    "passport_number",
    "national_id_number",
    "occupation",
    "employer_name",
    "job_title",
    "company_address",
    "destination_country",
    "travel_purpose",
    "departure_date",
    "duration_days",
    "return_date",
    "monthly_income",
    "monthly_expenses",
    "bank_balance",
    "annual_income_year_1",
    "annual_income_year_2",
    "annual_income_year_3",
    "total_asset_value",
    "tax_identification_number",
    "reasons_to_return",
];

lazy_static! {
    static ref ALL: Vec<(DocumentType, &'static [FieldRequirement])> = DocumentType::ALL
        .iter()
        .map(|&dt| (dt, requirements_for(dt)))
        .collect();
}

/// The requirement list for one document type.
pub fn requirements_for(document_type: DocumentType) -> &'static [FieldRequirement] {
    match document_type {
        DocumentType::CoverLetter => COVER_LETTER,
        DocumentType::IdTranslation => ID_TRANSLATION,
        DocumentType::VisitingCard => VISITING_CARD,
        DocumentType::FinancialStatement => FINANCIAL_STATEMENT,
        DocumentType::TravelItinerary => TRAVEL_ITINERARY,
        DocumentType::TravelHistory => TRAVEL_HISTORY,
        DocumentType::HomeTies => HOME_TIES,
        DocumentType::AssetValuation => ASSET_VALUATION,
    }
}

/// Every document type with its requirement list, in generation order.
pub fn all_requirements() -> &'static [(DocumentType, &'static [FieldRequirement])] {
    &ALL
}

/// The keys the auto-fill engine must cover.
pub fn always_fill_keys() -> &'static [&'static str] {
    ALWAYS_FILL_KEYS
}
