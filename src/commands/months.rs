use crate::args::MonthsArgs;
use crate::commands::Out;
use crate::model::{Month, MonthOption};
use crate::{utils, Result};
use chrono::NaiveDate;

/// Lists the months offered by the month filter, newest first, as `YYYY-MM` and label.
pub fn months(args: &MonthsArgs) -> Result<Out<Vec<MonthOption>>> {
    Ok(months_from(utils::today(), args.count()))
}

fn months_from(today: NaiveDate, count: usize) -> Out<Vec<MonthOption>> {
    let options: Vec<MonthOption> = Month::recent(today, count)
        .into_iter()
        .map(MonthOption::from)
        .collect();
    let message = options
        .iter()
        .map(|o| format!("{}  {}", o.value, o.label))
        .collect::<Vec<_>>()
        .join("\n");
    Out::new(message, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::date;

    #[test]
    fn test_months_cross_year() {
        let out = months_from(date("2024-02-15"), 3);
        assert_eq!(
            out.message(),
            "2024-02  February 2024\n2024-01  January 2024\n2023-12  December 2023"
        );
        assert_eq!(out.structure().unwrap().len(), 3);
    }

    #[test]
    fn test_default_count() {
        let out = months(&MonthsArgs::new(crate::filter::RECENT_MONTHS)).unwrap();
        assert_eq!(out.structure().unwrap().len(), 12);
    }
}
