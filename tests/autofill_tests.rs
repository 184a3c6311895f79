mod common;

use common::bag;
use regex::Regex;
use visaprep_server::appdata::{DataBag, FieldValue};
use visaprep_server::autofill::{AutoFillEngine, AutoFillError};
use visaprep_server::requirements;

#[test]
fn fills_every_always_fill_key_from_an_empty_bag() {
    let mut engine = AutoFillEngine::with_seed(7);
    let (filled, summary) = engine.fill(&DataBag::new()).expect("fill");

    for key in requirements::always_fill_keys() {
        let value = filled
            .get(*key)
            .unwrap_or_else(|| panic!("missing key {key}"));
        assert!(!value.is_empty(), "key {key} is empty");
    }
    assert_eq!(summary.total_generated(), filled.len());
}

#[test]
fn never_overwrites_existing_answers() {
    let base = bag(&[
        ("full_name", FieldValue::Text("Jane Doe".into())),
        ("occupation", FieldValue::Text("Surgeon".into())),
        ("F", FieldValue::Text("X".into())),
    ]);

    let mut engine = AutoFillEngine::with_seed(1);
    let (filled, summary) = engine.fill(&base).expect("fill");

    assert_eq!(filled["full_name"].as_text(), "Jane Doe");
    assert_eq!(filled["occupation"].as_text(), "Surgeon");
    assert_eq!(filled["F"].as_text(), "X");
    assert!(!summary.generated_keys.iter().any(|k| k == "full_name"));
}

#[test]
fn return_date_is_departure_plus_duration() {
    let base = bag(&[
        ("departure_date", FieldValue::Text("2026-10-01".into())),
        ("duration_days", FieldValue::Number(14.0)),
    ]);

    let mut engine = AutoFillEngine::with_seed(3);
    let (filled, _) = engine.fill(&base).expect("fill");

    assert_eq!(filled["return_date"].as_text(), "2026-10-15");
}

#[test]
fn expenses_stay_below_income() {
    let mut engine = AutoFillEngine::with_seed(11);
    let (filled, _) = engine.fill(&DataBag::new()).expect("fill");

    let income = filled["monthly_income"].as_amount().expect("income");
    let expenses = filled["monthly_expenses"].as_amount().expect("expenses");
    assert!(
        expenses < income,
        "expenses {expenses} not below income {income}"
    );
}

#[test]
fn income_history_declines_backward() {
    let mut engine = AutoFillEngine::with_seed(13);
    let (filled, _) = engine.fill(&DataBag::new()).expect("fill");

    let y1 = filled["annual_income_year_1"].as_amount().unwrap();
    let y2 = filled["annual_income_year_2"].as_amount().unwrap();
    let y3 = filled["annual_income_year_3"].as_amount().unwrap();
    assert!(y1 > y2 && y2 > y3, "expected {y1} > {y2} > {y3}");
}

#[test]
fn generated_identifiers_match_their_formats() {
    let mut engine = AutoFillEngine::with_seed(17);
    let (filled, _) = engine.fill(&DataBag::new()).expect("fill");

    let passport = filled["passport_number"].as_text();
    assert!(
        Regex::new("^[A-Z]{2}[0-9]{7}$").unwrap().is_match(&passport),
        "bad passport number {passport}"
    );

    let nid = filled["national_id_number"].as_text();
    assert!(
        [10, 13, 17].contains(&nid.len()) && nid.chars().all(|c| c.is_ascii_digit()),
        "bad national id {nid}"
    );

    let phone = filled["phone"].as_text();
    assert_eq!(phone.len(), 10, "bad phone {phone}");
    assert!(phone.starts_with("01"));
    assert!(phone.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn same_seed_gives_same_output() {
    let (a, _) = AutoFillEngine::with_seed(99).fill(&DataBag::new()).unwrap();
    let (b, _) = AutoFillEngine::with_seed(99).fill(&DataBag::new()).unwrap();
    assert_eq!(
        a.keys().collect::<Vec<_>>(),
        b.keys().collect::<Vec<_>>()
    );
    for (key, value) in &a {
        assert_eq!(value.as_text(), b[key].as_text(), "key {key} diverged");
    }
}

#[test]
fn absent_collection_flags_default_to_generated_collections() {
    let mut engine = AutoFillEngine::with_seed(23);
    let (filled, _) = engine.fill(&DataBag::new()).expect("fill");

    assert_eq!(filled["has_bank_account"].as_bool(), Some(true));
    assert!(filled["bank_accounts"].as_list().is_some());
    assert_eq!(filled["has_previous_travel"].as_bool(), Some(true));
    assert!(filled["previous_travel"].as_list().is_some());
    assert_eq!(filled["has_tax_certificate"].as_bool(), Some(true));
    assert!(filled["tax_certificates"].as_list().is_some());
}

#[test]
fn explicit_false_collection_flag_skips_the_collection() {
    let base = bag(&[("has_previous_travel", FieldValue::Bool(false))]);
    let mut engine = AutoFillEngine::with_seed(29);
    let (filled, _) = engine.fill(&base).expect("fill");

    assert_eq!(filled["has_previous_travel"].as_bool(), Some(false));
    assert!(!filled.contains_key("previous_travel"));
}

#[test]
fn malformed_departure_date_is_a_hard_error() {
    let base = bag(&[("departure_date", FieldValue::Text("next month".into()))]);
    let mut engine = AutoFillEngine::with_seed(31);
    match engine.fill(&base) {
        Err(AutoFillError::InvalidDate { key, .. }) => assert_eq!(key, "departure_date"),
        other => panic!("expected InvalidDate, got {other:?}"),
    }
}

#[test]
fn malformed_bank_balance_is_a_hard_error() {
    let base = bag(&[("bank_balance", FieldValue::Text("plenty".into()))]);
    let mut engine = AutoFillEngine::with_seed(37);
    match engine.fill(&base) {
        Err(AutoFillError::InvalidNumber { key, .. }) => assert_eq!(key, "bank_balance"),
        other => panic!("expected InvalidNumber, got {other:?}"),
    }
}

#[test]
fn malformed_gate_flag_is_a_hard_error() {
    let base = bag(&[("is_married", FieldValue::Text("maybe".into()))]);
    let mut engine = AutoFillEngine::with_seed(5);
    match engine.fill(&base) {
        Err(AutoFillError::InvalidFlag { key, .. }) => assert_eq!(key, "is_married"),
        other => panic!("expected InvalidFlag, got {other:?}"),
    }
}

#[test]
fn textual_gate_flags_are_honored_not_overwritten() {
    let base = bag(&[("is_married", FieldValue::Text("yes".into()))]);
    let mut engine = AutoFillEngine::with_seed(5);
    let (filled, _) = engine.fill(&base).expect("fill");

    assert_eq!(filled["is_married"].as_text(), "yes");
    assert!(filled.contains_key("spouse_name"));
}

#[test]
fn formatted_amount_text_is_accepted_as_numeric() {
    let base = bag(&[("bank_balance", FieldValue::Text("1,200,000".into()))]);
    let mut engine = AutoFillEngine::with_seed(41);
    let (filled, _) = engine.fill(&base).expect("fill");

    // untouched, and the derived income is based on it
    assert_eq!(filled["bank_balance"].as_text(), "1,200,000");
    let income = filled["monthly_income"].as_amount().expect("income");
    assert!(income >= 120_000.0 && income <= 200_000.0, "income {income}");
}
