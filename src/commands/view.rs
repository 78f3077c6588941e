//! View command handler and the plain text report it prints.

use crate::args::ViewArgs;
use crate::chart::Doughnut;
use crate::commands::{open_ledger, Out};
use crate::error::{ErrorType, IntoResult};
use crate::filter::FilterSpec;
use crate::ledger::View;
use crate::model::{Kind, Month};
use crate::totals::AccountTotals;
use crate::{utils, Config, Result};
use anyhow::Context;
use std::fmt::Write;

/// Builds the view for one month and renders it.
///
/// The month defaults to the current one. With `--json` the message is the whole view as pretty
/// JSON, otherwise it is a plain text report of the summary totals, the per-account breakdowns,
/// the chart series and the transactions, most recent first.
///
/// # Errors
/// - `Storage` if the backend cannot be opened. A backend that opens but cannot be read shows an
///   empty view.
pub async fn view(config: Config, args: ViewArgs) -> Result<Out<View>> {
    let ledger = open_ledger(&config).await?;
    let spec = spec_from(&args);
    let view = ledger.view(&spec);
    let message = if args.json() {
        serde_json::to_string_pretty(&view)
            .context("Unable to serialize the view")
            .pub_result(ErrorType::Internal)?
    } else {
        render(&view, config.currency())
    };
    Ok(Out::new(message, view))
}

fn spec_from(args: &ViewArgs) -> FilterSpec {
    let month = args.month().unwrap_or_else(|| Month::of(utils::today()));
    FilterSpec {
        month,
        transaction_type: args.transaction_type(),
        account: args.account().map(str::to_string),
        category: args.category().map(str::to_string),
    }
}

/// Renders `view` as a plain text report with amounts prefixed by `currency`.
pub(crate) fn render(view: &View, currency: &str) -> String {
    let money = |a: crate::model::Amount| a.display_with(currency);
    let totals = &view.totals;
    let mut s = String::new();

    let _ = writeln!(s, "{}", view.spec.month.label());
    for kind in Kind::ALL {
        let _ = writeln!(s, "  {:<20}{}", kind.label(), money(totals.total(kind)));
    }
    let _ = writeln!(s, "  {:<20}{}", "Net Earnings", money(totals.net_earnings));

    for kind in Kind::ALL {
        write_accounts(&mut s, kind.label(), totals.by_account(kind), currency);
    }
    write_accounts(
        &mut s,
        "Net Earnings",
        &totals.net_earnings_by_account,
        currency,
    );

    write_doughnut(&mut s, "Income by category", &view.income_doughnut, currency);
    write_doughnut(&mut s, "Expense by category", &view.expense_doughnut, currency);

    let _ = writeln!(s);
    if view.rows.is_empty() {
        let _ = writeln!(s, "No transactions");
        return s;
    }
    let _ = writeln!(
        s,
        "{:<10}  {:<7}  {:>14}  {:<12}  {:<18}  {:<12}  Id",
        "Date", "Type", "Amount", "Account", "Category", "Person"
    );
    for t in &view.rows {
        let _ = writeln!(
            s,
            "{:<10}  {:<7}  {:>14}  {:<12}  {:<18}  {:<12}  {}",
            t.date(),
            t.transaction_type(),
            t.amount(),
            t.account(),
            t.category(),
            t.person_display(),
            t.id()
        );
    }
    s
}

fn write_accounts(s: &mut String, title: &str, accounts: &AccountTotals, currency: &str) {
    if accounts.is_empty() {
        return;
    }
    let _ = writeln!(s, "\n{title} by account");
    for (account, amount) in accounts {
        let _ = writeln!(s, "  {:<20}{}", account, amount.display_with(currency));
    }
}

fn write_doughnut(s: &mut String, title: &str, doughnut: &Doughnut, currency: &str) {
    if doughnut.is_empty() {
        return;
    }
    let _ = writeln!(s, "\n{title}");
    for (label, amount) in doughnut.iter() {
        let _ = writeln!(s, "  {:<20}{}", label, amount.display_with(currency));
    }
}
