//! Curated value pools for synthetic data.
//!
//! Values are plausible for a Bangladeshi applicant profile, which is what the
//! downstream document layouts expect (national id lengths, carrier prefixes,
//! local bank names).

pub const FIRST_NAMES: &[&str] = &[
    "Mohammad Rafiq",
    "Abdul Karim",
    "Shahidul Islam",
    "Kamrul Hasan",
    "Mizanur Rahman",
    "Farhana Akter",
    "Nusrat Jahan",
    "Shirin Sultana",
    "Tanvir Ahmed",
    "Jahangir Alam",
];

pub const SURNAMES: &[&str] = &[
    "Hossain", "Rahman", "Islam", "Ahmed", "Chowdhury", "Khan", "Uddin", "Sarkar",
];

pub const FATHER_TITLES: &[&str] = &["Md.", "Abdul", "Abul", "Mohammed"];

pub const MOTHER_FIRST_NAMES: &[&str] = &[
    "Rahima", "Salma", "Nasima", "Rokeya", "Hasina", "Momena", "Rabeya",
];

pub const DISTRICTS: &[&str] = &[
    "Dhaka",
    "Chattogram",
    "Sylhet",
    "Rajshahi",
    "Khulna",
    "Mymensingh",
    "Cumilla",
    "Narayanganj",
];

pub const AREAS: &[&str] = &[
    "Dhanmondi",
    "Gulshan",
    "Uttara",
    "Mirpur",
    "Banani",
    "Mohammadpur",
    "Agrabad",
    "Zindabazar",
];

pub const STREET_NAMES: &[&str] = &[
    "Lake Road",
    "Green Road",
    "Station Road",
    "College Road",
    "Shaheed Minar Road",
    "Airport Road",
];

/// Mobile carrier prefixes; a synthetic phone is one of these plus 7 digits.
pub const PHONE_PREFIXES: &[&str] = &["013", "014", "015", "016", "017", "018", "019"];

pub const OCCUPATIONS: &[&str] = &[
    "Software Engineer",
    "Bank Officer",
    "Garments Merchandiser",
    "Civil Engineer",
    "Medical Representative",
    "Accountant",
    "Marketing Executive",
    "University Lecturer",
];

pub const EMPLOYERS: &[&str] = &[
    "Square Group",
    "BRAC Bank PLC",
    "Beximco Ltd.",
    "Grameenphone Ltd.",
    "ACI Limited",
    "City Group",
    "Walton Hi-Tech Industries",
];

pub const BANKS: &[&str] = &[
    "Dutch-Bangla Bank",
    "BRAC Bank",
    "City Bank",
    "Eastern Bank",
    "Islami Bank Bangladesh",
    "Prime Bank",
    "Standard Chartered Bangladesh",
];

pub const ACCOUNT_TYPES: &[&str] = &["Savings", "Current", "Fixed Deposit"];

pub const BUSINESS_TYPES: &[&str] = &[
    "Retail Trading",
    "Garments Accessories",
    "Electronics Import",
    "Grocery Wholesale",
    "Pharmacy",
];

pub const BUSINESS_NAME_PREFIXES: &[&str] = &[
    "Bismillah", "Sonali", "Padma", "Meghna", "Jamuna", "Green", "Golden",
];

pub const BUSINESS_NAME_SUFFIXES: &[&str] = &[
    "Traders",
    "Enterprise",
    "Corporation",
    "Store",
    "International",
];

pub const DESTINATIONS: &[&str] = &[
    "United Kingdom",
    "Schengen Area (France)",
    "Schengen Area (Germany)",
    "Italy",
    "Japan",
    "Malaysia",
    "Thailand",
];

pub const TRAVEL_PURPOSES: &[&str] = &[
    "Tourism",
    "Family visit",
    "Business meeting",
    "Attending a conference",
];

pub const PREVIOUS_DESTINATIONS: &[&str] = &[
    "India",
    "Malaysia",
    "Thailand",
    "Singapore",
    "United Arab Emirates",
    "Nepal",
];

pub const VEHICLES: &[&str] = &[
    "Toyota Corolla X 2018",
    "Toyota Premio 2017",
    "Honda Vezel 2019",
    "Toyota Axio 2016",
];

pub const PROPERTY_DESCRIPTIONS: &[&str] = &[
    "Residential flat (1,250 sft)",
    "Two-storied house with land",
    "Residential plot (5 katha)",
    "Commercial shop space",
];
