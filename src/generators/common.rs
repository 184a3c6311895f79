//! Shared helpers for document generation.

use chrono::NaiveDate;

/// Format a date the way embassy-facing documents print it
/// (e.g. "15 March 2026").
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Render an amount with thousands separators, dropping any fraction
/// ("1500000" -> "1,500,000").
pub fn format_amount(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if amount < 0.0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Truncate a value to fit a fixed-width layout, appending an ellipsis.
pub fn truncate_for_layout(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let head: String = value.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}\u{2026}", head.trim_end())
}

/// Output file name for one generated document.
pub fn output_filename(file_stem: &str, applicant_name: &str) -> String {
    let mut slug = sanitize_filename::sanitize(applicant_name)
        .to_ascii_lowercase()
        .replace(' ', "-");
    slug.retain(|c| c.is_ascii_alphanumeric() || c == '-');
    if slug.is_empty() {
        slug = "applicant".to_string();
    }
    format!("{}-{}.pdf", file_stem, slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_get_thousands_separators() {
        assert_eq!(format_amount(1_500_000.0), "1,500,000");
        assert_eq!(format_amount(950.0), "950");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn truncation_respects_budget() {
        assert_eq!(truncate_for_layout("short", 20), "short");
        let long = truncate_for_layout("a very long company name indeed", 12);
        assert!(long.chars().count() <= 12);
        assert!(long.ends_with('\u{2026}'));
    }

    #[test]
    fn filenames_are_safe_and_lowercase() {
        assert_eq!(
            output_filename("visiting-card", "Jane Doe"),
            "visiting-card-jane-doe.pdf"
        );
        assert_eq!(output_filename("cover-letter", "///"), "cover-letter-applicant.pdf");
    }
}
