use crate::args::CategoriesArgs;
use crate::commands::Out;
use crate::model::taxonomy::{self, OTHER};
use crate::model::TransactionType;
use crate::Result;
use serde::Serialize;
use std::fmt::Write;

/// The category choices offered for one transaction type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryChoices {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub categories: Vec<String>,
}

/// Lists the category choices, for one type or for both.
pub fn categories(args: &CategoriesArgs) -> Result<Out<Vec<CategoryChoices>>> {
    let types = match args.transaction_type() {
        Some(t) => vec![t],
        None => vec![TransactionType::Income, TransactionType::Expense],
    };
    let choices: Vec<CategoryChoices> = types
        .into_iter()
        .map(|t| CategoryChoices {
            transaction_type: t,
            categories: taxonomy::categories_for(t)
                .iter()
                .map(|c| c.to_string())
                .collect(),
        })
        .collect();

    let mut message = String::new();
    for choice in &choices {
        let _ = writeln!(message, "{}:", choice.transaction_type);
        for category in &choice.categories {
            let note = if category == OTHER {
                " (give the text with --other-category)"
            } else if taxonomy::is_special_expense_category(category) {
                " (tracked separately from net earnings)"
            } else {
                ""
            };
            let _ = writeln!(message, "  {category}{note}");
        }
    }
    Ok(Out::new(message.trim_end(), choices))
}
