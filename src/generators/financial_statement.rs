//! Financial statement generator.
//!
//! Tabular rendering of three years of income, a monthly income/expense/
//! savings table, and the bank balance line. Savings is computed as income
//! minus expenses when both are available. No oracle call.

use super::common::format_amount;
use super::{DocumentGenerator, DocumentLayout, DocumentType, GenerationContext, GeneratorError};
use async_trait::async_trait;
use chrono::{Datelike, Utc};

pub struct FinancialStatementGenerator;

#[async_trait]
impl DocumentGenerator for FinancialStatementGenerator {
    fn document_type(&self) -> DocumentType {
        DocumentType::FinancialStatement
    }

    async fn compose(&self, ctx: &GenerationContext) -> Result<DocumentLayout, GeneratorError> {
        let data = &ctx.data;
        let name = data.resolve_text_or(&["full_name", "passport_copy.full_name"], "Applicant");

        let current_year = Utc::now().year();
        let annual_rows: Vec<Vec<String>> = [
            ("annual_income_year_1", current_year - 1),
            ("annual_income_year_2", current_year - 2),
            ("annual_income_year_3", current_year - 3),
        ]
        .iter()
        .map(|(key, year)| {
            let amount = data
                .resolve(&[key])
                .as_amount()
                .map(format_amount)
                .unwrap_or_else(|| "As per tax documents".to_string());
            vec![year.to_string(), amount]
        })
        .collect();

        let income = data.resolve(&["monthly_income"]).as_amount();
        let expenses = data.resolve(&["monthly_expenses"]).as_amount();
        let savings = match (income, expenses) {
            (Some(i), Some(e)) => Some(i - e),
            _ => None,
        };
        let monthly_rows = vec![vec![
            income
                .map(format_amount)
                .unwrap_or_else(|| "As per documents".to_string()),
            expenses
                .map(format_amount)
                .unwrap_or_else(|| "As per documents".to_string()),
            savings
                .map(format_amount)
                .unwrap_or_else(|| "As per documents".to_string()),
        ]];

        let balance = data
            .resolve(&["bank_balance", "bank_certificate.balance"])
            .as_amount()
            .map(format_amount)
            .unwrap_or_else(|| "As per bank certificate".to_string());

        let mut layout = DocumentLayout::new("Financial Statement")
            .heading("Statement of Financial Position")
            .key_values(vec![("Applicant".to_string(), name)])
            .spacer()
            .subheading("Annual Income (last three years)")
            .table(vec!["Year".to_string(), "Income (BDT)".to_string()], annual_rows)
            .subheading("Monthly Position")
            .table(
                vec![
                    "Monthly Income (BDT)".to_string(),
                    "Monthly Expenses (BDT)".to_string(),
                    "Monthly Savings (BDT)".to_string(),
                ],
                monthly_rows,
            )
            .subheading("Bank Balance")
            .key_values(vec![("Total balance (BDT)".to_string(), balance)]);

        // itemized accounts, when the questionnaire captured them
        if let Some(accounts) = data.resolve(&["bank_accounts"]).as_list() {
            let rows: Vec<Vec<String>> = accounts
                .iter()
                .map(|account| {
                    vec![
                        account.get("bank_name").as_text(),
                        account.get("account_number").as_text(),
                        account.get("account_type").as_text(),
                        account
                            .get("balance")
                            .as_amount()
                            .map(format_amount)
                            .unwrap_or_default(),
                    ]
                })
                .collect();
            if !rows.is_empty() {
                layout = layout.subheading("Bank Accounts").table(
                    vec![
                        "Bank".to_string(),
                        "Account No.".to_string(),
                        "Type".to_string(),
                        "Balance (BDT)".to_string(),
                    ],
                    rows,
                );
            }
        }

        Ok(layout)
    }
}
