//! Synthetic data completion.
//!
//! The auto-fill engine takes the questionnaire answer bag and guarantees that
//! every field the document layouts rely on is populated before generation
//! begins. It only ever ADDS keys: an existing non-empty answer is never
//! touched, so user-supplied data always survives. Derived fields (expenses,
//! return dates, income history) are computed from their siblings so a reader
//! of the finished documents finds internally consistent numbers.

pub mod pools;

use crate::appdata::{DataBag, FieldValue};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use thiserror::Error;

/// A pre-existing field was malformed in a way a derivation cannot work
/// around. Missing fields never error; malformed ones are fatal for the run.
#[derive(Debug, Error)]
pub enum AutoFillError {
    #[error("field `{key}` holds `{value}`, which is not a valid ISO date")]
    InvalidDate { key: String, value: String },
    #[error("field `{key}` holds `{value}`, which is not numeric")]
    InvalidNumber { key: String, value: String },
    #[error("field `{key}` holds `{value}`, which is not a yes/no flag")]
    InvalidFlag { key: String, value: String },
}

/// What a fill run produced, for logging and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct AutoFillSummary {
    /// Keys added by this run, in generation order.
    pub generated_keys: Vec<String>,
    /// Generated-key count per section.
    pub section_counts: BTreeMap<String, usize>,
}

impl AutoFillSummary {
    pub fn total_generated(&self) -> usize {
        self.generated_keys.len()
    }
}

pub struct AutoFillEngine {
    rng: StdRng,
}

impl AutoFillEngine {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeded constructor for deterministic tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fill every still-missing field. The returned bag contains every entry
    /// of `base` unmodified plus synthetic values for the rest.
    pub fn fill(&mut self, base: &DataBag) -> Result<(DataBag, AutoFillSummary), AutoFillError> {
        let mut f = Filler::new(base.clone());

        self.fill_identity(&mut f)?;
        self.fill_employment(&mut f)?;
        self.fill_travel(&mut f)?;
        self.fill_financial(&mut f)?;
        self.fill_misc(&mut f)?;

        Ok(f.finish())
    }

    // ------------------------------------------------------------------
    // Section: personal identity
    // ------------------------------------------------------------------

    fn fill_identity(&mut self, f: &mut Filler) -> Result<(), AutoFillError> {
        f.section("personal");

        if !f.has("full_name") {
            let name = format!(
                "{} {}",
                self.pick(pools::FIRST_NAMES),
                self.pick(pools::SURNAMES)
            );
            f.set("full_name", FieldValue::Text(name));
        }
        let surname = f
            .text("full_name")
            .rsplit(' ')
            .next()
            .unwrap_or("Hossain")
            .to_string();

        if !f.has("father_name") {
            let father = format!(
                "{} {} {}",
                self.pick(pools::FATHER_TITLES),
                self.pick(pools::FIRST_NAMES)
                    .split(' ')
                    .next()
                    .unwrap_or("Karim"),
                surname
            );
            f.set("father_name", FieldValue::Text(father));
        }
        if !f.has("mother_name") {
            let mother = format!("{} {}", self.pick(pools::MOTHER_FIRST_NAMES), "Begum");
            f.set("mother_name", FieldValue::Text(mother));
        }

        if !f.has("date_of_birth") {
            let year = self.rng.gen_range(1975..=1998);
            let month = self.rng.gen_range(1..=12);
            let day = self.rng.gen_range(1..=28);
            f.set("date_of_birth", text_date(year, month, day));
        }
        if !f.has("place_of_birth") {
            let place = self.pick(pools::DISTRICTS).to_string();
            f.set("place_of_birth", FieldValue::Text(place));
        }
        if !f.has("nationality") {
            f.set("nationality", FieldValue::Text("Bangladeshi".into()));
        }

        if !f.has("address") {
            let address = format!(
                "House {}, {} {}, {}, {}",
                self.rng.gen_range(1..=150),
                self.pick(pools::STREET_NAMES),
                self.rng.gen_range(1..=12),
                self.pick(pools::AREAS),
                self.pick(pools::DISTRICTS)
            );
            f.set("address", FieldValue::Text(address));
        }
        if !f.has("phone") {
            let phone = format!(
                "{}{:07}",
                self.pick(pools::PHONE_PREFIXES),
                self.rng.gen_range(0..10_000_000u32)
            );
            f.set("phone", FieldValue::Text(phone));
        }
        if !f.has("email") {
            let slug: String = f
                .text("full_name")
                .to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect();
            let email = format!("{}{}@gmail.com", slug, self.rng.gen_range(10..=99));
            f.set("email", FieldValue::Text(email));
        }

        if !f.has("passport_number") {
            // format required downstream: 2 uppercase letters + 7 digits
            let letters: String = (0..2)
                .map(|_| (b'A' + self.rng.gen_range(0..26u8)) as char)
                .collect();
            let number = format!("{}{:07}", letters, self.rng.gen_range(0..10_000_000u32));
            f.set("passport_number", FieldValue::Text(number));
        }
        if !f.has("national_id_number") {
            // legacy 13/17-digit and current 10-digit formats all occur
            let len = *self.pick(&[10usize, 13, 17]);
            let mut nid = String::with_capacity(len);
            nid.push(char::from(b'1' + self.rng.gen_range(0..9u8)));
            for _ in 1..len {
                nid.push(char::from(b'0' + self.rng.gen_range(0..10u8)));
            }
            f.set("national_id_number", FieldValue::Text(nid));
        }

        let married = self.gate(f, "is_married", 0.55)?;
        if married {
            if !f.has("spouse_name") {
                let spouse = format!("{} {}", self.pick(pools::MOTHER_FIRST_NAMES), surname);
                f.set("spouse_name", FieldValue::Text(spouse));
            }
            if !f.has("children_count") {
                let count = self.rng.gen_range(0..=3i64);
                f.set("children_count", FieldValue::Number(count as f64));
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Section: employment / business
    // ------------------------------------------------------------------

    fn fill_employment(&mut self, f: &mut Filler) -> Result<(), AutoFillError> {
        f.section("employment");

        if !f.has("occupation") {
            let occupation = self.pick(pools::OCCUPATIONS).to_string();
            f.set("occupation", FieldValue::Text(occupation));
        }
        if !f.has("employer_name") {
            let employer = self.pick(pools::EMPLOYERS).to_string();
            f.set("employer_name", FieldValue::Text(employer));
        }
        if !f.has("job_title") {
            let title = f.text("occupation");
            f.set("job_title", FieldValue::Text(title));
        }
        if !f.has("years_employed") {
            let years = self.rng.gen_range(2..=15i64);
            f.set("years_employed", FieldValue::Number(years as f64));
        }
        if !f.has("company_address") {
            let address = format!(
                "{} {}, {}",
                self.pick(pools::STREET_NAMES),
                self.rng.gen_range(1..=40),
                self.pick(pools::DISTRICTS)
            );
            f.set("company_address", FieldValue::Text(address));
        }

        if self.gate(f, "owns_business", 0.3)? {
            if !f.has("business_name") {
                let name = format!(
                    "{} {}",
                    self.pick(pools::BUSINESS_NAME_PREFIXES),
                    self.pick(pools::BUSINESS_NAME_SUFFIXES)
                );
                f.set("business_name", FieldValue::Text(name));
            }
            if !f.has("business_type") {
                let kind = self.pick(pools::BUSINESS_TYPES).to_string();
                f.set("business_type", FieldValue::Text(kind));
            }
            if !f.has("business_start_year") {
                let year = self.rng.gen_range(2005..=2022i64);
                f.set("business_start_year", FieldValue::Number(year as f64));
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Section: travel plan
    // ------------------------------------------------------------------

    fn fill_travel(&mut self, f: &mut Filler) -> Result<(), AutoFillError> {
        f.section("travel");

        if !f.has("destination_country") {
            let destination = self.pick(pools::DESTINATIONS).to_string();
            f.set("destination_country", FieldValue::Text(destination));
        }
        if !f.has("travel_purpose") {
            let purpose = self.pick(pools::TRAVEL_PURPOSES).to_string();
            f.set("travel_purpose", FieldValue::Text(purpose));
        }

        let departure = match f.existing_date("departure_date")? {
            Some(d) => d,
            None => {
                let d = Utc::now().date_naive() + Duration::days(self.rng.gen_range(30..=90));
                f.set("departure_date", FieldValue::Text(d.format("%Y-%m-%d").to_string()));
                d
            }
        };

        let duration = match f.existing_number("duration_days")? {
            Some(n) => n.max(1.0) as i64,
            None => {
                let n = self.rng.gen_range(7..=21i64);
                f.set("duration_days", FieldValue::Number(n as f64));
                n
            }
        };

        if !f.has("return_date") {
            let ret = departure + Duration::days(duration);
            f.set("return_date", FieldValue::Text(ret.format("%Y-%m-%d").to_string()));
        }

        // prior-travel collection
        if self.collection_gate(f, "has_previous_travel")? && !f.has("previous_travel") {
            let count = self.rng.gen_range(1..=3usize);
            let current_year = Utc::now().year();
            let trips = (0..count)
                .map(|i| {
                    let mut entry = BTreeMap::new();
                    entry.insert(
                        "country".to_string(),
                        FieldValue::Text(self.pick(pools::PREVIOUS_DESTINATIONS).to_string()),
                    );
                    entry.insert(
                        "year".to_string(),
                        FieldValue::Number((current_year - 1 - i as i32) as f64),
                    );
                    entry.insert(
                        "purpose".to_string(),
                        FieldValue::Text(self.pick(pools::TRAVEL_PURPOSES).to_string()),
                    );
                    entry.insert(
                        "duration_days".to_string(),
                        FieldValue::Number(self.rng.gen_range(5..=14) as f64),
                    );
                    FieldValue::Map(entry)
                })
                .collect();
            f.set("previous_travel", FieldValue::List(trips));
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Section: financial / assets
    // ------------------------------------------------------------------

    fn fill_financial(&mut self, f: &mut Filler) -> Result<(), AutoFillError> {
        f.section("financial");

        let balance = match f.existing_number("bank_balance")? {
            Some(n) => n,
            None => {
                let n = round_to(self.rng.gen_range(600_000.0..2_500_000.0), 1_000.0);
                f.set("bank_balance", FieldValue::Number(n));
                n
            }
        };

        let income = match f.existing_number("monthly_income")? {
            Some(n) => n,
            None => {
                // plausible income that explains the balance
                let divisor = self.rng.gen_range(6..=10i64) as f64;
                let n = round_to(balance / divisor, 100.0).max(30_000.0);
                f.set("monthly_income", FieldValue::Number(n));
                n
            }
        };

        if !f.has("monthly_expenses") {
            let fraction = self.rng.gen_range(0.70..0.80);
            let expenses = round_to(income * fraction, 100.0);
            f.set("monthly_expenses", FieldValue::Number(expenses));
        }

        // three years of history, compounding growth backward from today
        let mut annual = income * 12.0;
        for (i, key) in ["annual_income_year_1", "annual_income_year_2", "annual_income_year_3"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                let growth = self.rng.gen_range(0.10..0.15);
                annual /= 1.0 + growth;
            }
            if !f.has(key) {
                f.set(key, FieldValue::Number(round_to(annual, 100.0)));
            }
        }

        if self.collection_gate(f, "has_bank_account")? && !f.has("bank_accounts") {
            let count = self.rng.gen_range(1..=3usize);
            let accounts = (0..count)
                .map(|i| {
                    let mut entry = BTreeMap::new();
                    entry.insert(
                        "bank_name".to_string(),
                        FieldValue::Text(self.pick(pools::BANKS).to_string()),
                    );
                    entry.insert(
                        "account_number".to_string(),
                        FieldValue::Text(format!(
                            "{}{:09}",
                            self.rng.gen_range(101..=299),
                            self.rng.gen_range(0..1_000_000_000u32)
                        )),
                    );
                    entry.insert(
                        "account_type".to_string(),
                        FieldValue::Text(self.pick(pools::ACCOUNT_TYPES).to_string()),
                    );
                    // primary account carries the declared balance
                    let amount = if i == 0 {
                        balance
                    } else {
                        round_to(balance * self.rng.gen_range(0.1..0.4), 1_000.0)
                    };
                    entry.insert("balance".to_string(), FieldValue::Number(amount));
                    FieldValue::Map(entry)
                })
                .collect();
            f.set("bank_accounts", FieldValue::List(accounts));
        }

        let has_property = self.gate(f, "has_property", 0.6)?;
        let property_value = if has_property {
            let value = match f.existing_number("property_value")? {
                Some(n) => n,
                None => {
                    let n = round_to(self.rng.gen_range(1_500_000.0..8_000_000.0), 10_000.0);
                    f.set("property_value", FieldValue::Number(n));
                    n
                }
            };
            if !f.has("property_description") {
                let description = self.pick(pools::PROPERTY_DESCRIPTIONS).to_string();
                f.set("property_description", FieldValue::Text(description));
            }
            value
        } else {
            0.0
        };

        let has_vehicle = self.gate(f, "has_vehicle", 0.4)?;
        let vehicle_value = if has_vehicle {
            let value = match f.existing_number("vehicle_value")? {
                Some(n) => n,
                None => {
                    let n = round_to(self.rng.gen_range(800_000.0..3_000_000.0), 10_000.0);
                    f.set("vehicle_value", FieldValue::Number(n));
                    n
                }
            };
            if !f.has("vehicle_description") {
                let description = self.pick(pools::VEHICLES).to_string();
                f.set("vehicle_description", FieldValue::Text(description));
            }
            value
        } else {
            0.0
        };

        if !f.has("assets") {
            let mut rows: Vec<FieldValue> = Vec::new();
            if has_property {
                rows.push(asset_row(
                    "Property",
                    &f.text("property_description"),
                    property_value,
                ));
            }
            if has_vehicle {
                rows.push(asset_row(
                    "Vehicle",
                    &f.text("vehicle_description"),
                    vehicle_value,
                ));
            }
            if rows.is_empty() {
                rows.push(asset_row("Savings", "Savings & fixed deposits", balance));
            }
            f.set("assets", FieldValue::List(rows));
        }
        if !f.has("total_asset_value") {
            let fallback = if property_value + vehicle_value > 0.0 {
                property_value + vehicle_value
            } else {
                balance
            };
            f.set("total_asset_value", FieldValue::Number(fallback));
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Section: miscellaneous (tax, home ties)
    // ------------------------------------------------------------------

    fn fill_misc(&mut self, f: &mut Filler) -> Result<(), AutoFillError> {
        f.section("misc");

        if !f.has("tax_identification_number") {
            let tin = format!("{:012}", self.rng.gen_range(100_000_000_000u64..999_999_999_999));
            f.set("tax_identification_number", FieldValue::Text(tin));
        }

        if self.collection_gate(f, "has_tax_certificate")? && !f.has("tax_certificates") {
            let count = self.rng.gen_range(1..=3usize);
            let tin = f.text("tax_identification_number");
            let current_year = Utc::now().year();
            let income = f
                .bag
                .get("monthly_income")
                .and_then(|v| v.as_amount())
                .unwrap_or(50_000.0);
            let certificates = (0..count)
                .map(|i| {
                    let mut entry = BTreeMap::new();
                    let year = current_year - 1 - i as i32;
                    entry.insert(
                        "assessment_year".to_string(),
                        FieldValue::Text(format!("{}-{}", year, year + 1)),
                    );
                    entry.insert("tin".to_string(), FieldValue::Text(tin.clone()));
                    entry.insert(
                        "tax_paid".to_string(),
                        FieldValue::Number(round_to(
                            income * 12.0 * self.rng.gen_range(0.05..0.12),
                            100.0,
                        )),
                    );
                    FieldValue::Map(entry)
                })
                .collect();
            f.set("tax_certificates", FieldValue::List(certificates));
        }

        if !f.has("reasons_to_return") {
            let mut reasons: Vec<String> = Vec::new();

            let married = f.bool_is_true("is_married");
            let children = f
                .bag
                .get("children_count")
                .and_then(|v| v.as_amount())
                .unwrap_or(0.0);
            if married || children > 0.0 {
                reasons.push(
                    "My immediate family lives in Bangladesh and depends on me.".to_string(),
                );
            }
            if f.bool_is_true("owns_business") {
                reasons.push(format!(
                    "I own and personally run {} and must return to manage it.",
                    f.text_or("business_name", "my business")
                ));
            }
            if f.bool_is_true("has_property") {
                reasons.push(
                    "I own property in Bangladesh that requires my presence and upkeep.".to_string(),
                );
            }
            if reasons.is_empty() {
                reasons.push(
                    "I have strong personal, professional, and social ties to Bangladesh."
                        .to_string(),
                );
            }
            reasons.push(format!(
                "My employment with {} continues, and I am committed to returning before my leave ends.",
                f.text_or("employer_name", "my employer")
            ));

            f.set("reasons_to_return", FieldValue::Text(reasons.join(" ")));
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn pick<'a, T>(&mut self, pool: &'a [T]) -> &'a T {
        &pool[self.rng.gen_range(0..pool.len())]
    }

    /// Resolve a boolean gate, rolling it first when missing. A present
    /// non-empty value that does not read as a flag is a hard error; it is
    /// never overwritten.
    fn gate(&mut self, f: &mut Filler, key: &str, p_true: f64) -> Result<bool, AutoFillError> {
        match f.bag.get(key) {
            None => {}
            Some(v) if v.is_empty() => {}
            Some(v) => {
                return v.as_bool().ok_or_else(|| AutoFillError::InvalidFlag {
                    key: key.to_string(),
                    value: v.as_text(),
                })
            }
        }
        let rolled = self.rng.gen_bool(p_true);
        f.set(key, FieldValue::Bool(rolled));
        Ok(rolled)
    }

    /// Collection gates differ from boolean gates: an ABSENT flag counts as
    /// true (the collection is generated), and the flag is recorded as such.
    /// A present non-flag value is a hard error here too.
    fn collection_gate(&mut self, f: &mut Filler, key: &str) -> Result<bool, AutoFillError> {
        match f.bag.get(key) {
            None => {}
            Some(v) if v.is_empty() => {}
            Some(v) => {
                return v.as_bool().ok_or_else(|| AutoFillError::InvalidFlag {
                    key: key.to_string(),
                    value: v.as_text(),
                })
            }
        }
        f.set(key, FieldValue::Bool(true));
        Ok(true)
    }
}

impl Default for AutoFillEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable working state of one fill run.
struct Filler {
    bag: DataBag,
    generated: Vec<String>,
    sections: BTreeMap<String, usize>,
    current_section: &'static str,
}

impl Filler {
    fn new(bag: DataBag) -> Self {
        Self {
            bag,
            generated: Vec::new(),
            sections: BTreeMap::new(),
            current_section: "personal",
        }
    }

    fn section(&mut self, name: &'static str) {
        self.current_section = name;
    }

    fn has(&self, key: &str) -> bool {
        self.bag.get(key).map(|v| !v.is_empty()).unwrap_or(false)
    }

    fn set(&mut self, key: &str, value: FieldValue) {
        self.bag.insert(key.to_string(), value);
        self.generated.push(key.to_string());
        *self
            .sections
            .entry(self.current_section.to_string())
            .or_insert(0) += 1;
    }

    fn text(&self, key: &str) -> String {
        self.bag.get(key).map(|v| v.as_text()).unwrap_or_default()
    }

    fn text_or(&self, key: &str, fallback: &str) -> String {
        let text = self.text(key);
        if text.is_empty() {
            fallback.to_string()
        } else {
            text
        }
    }

    fn bool_is_true(&self, key: &str) -> bool {
        self.bag
            .get(key)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// A present-but-malformed date is a hard error; absent is `None`.
    fn existing_date(&self, key: &str) -> Result<Option<NaiveDate>, AutoFillError> {
        match self.bag.get(key) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) => v.as_date().map(Some).ok_or_else(|| AutoFillError::InvalidDate {
                key: key.to_string(),
                value: v.as_text(),
            }),
        }
    }

    /// A present-but-non-numeric amount is a hard error; absent is `None`.
    fn existing_number(&self, key: &str) -> Result<Option<f64>, AutoFillError> {
        match self.bag.get(key) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) => v
                .as_amount()
                .map(Some)
                .ok_or_else(|| AutoFillError::InvalidNumber {
                    key: key.to_string(),
                    value: v.as_text(),
                }),
        }
    }

    fn finish(self) -> (DataBag, AutoFillSummary) {
        (
            self.bag,
            AutoFillSummary {
                generated_keys: self.generated,
                section_counts: self.sections,
            },
        )
    }
}

fn round_to(n: f64, step: f64) -> f64 {
    (n / step).floor() * step
}

fn text_date(year: i32, month: u32, day: u32) -> FieldValue {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => FieldValue::Text(d.format("%Y-%m-%d").to_string()),
        None => FieldValue::Text(format!("{:04}-{:02}-{:02}", year, month, day)),
    }
}

fn asset_row(kind: &str, description: &str, value: f64) -> FieldValue {
    let mut entry = BTreeMap::new();
    entry.insert("asset_type".to_string(), FieldValue::Text(kind.to_string()));
    entry.insert(
        "description".to_string(),
        FieldValue::Text(description.to_string()),
    );
    entry.insert("value".to_string(), FieldValue::Number(value));
    FieldValue::Map(entry)
}
