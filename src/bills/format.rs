//! Display formatting shared by the bill list.

use chrono::{DateTime, Datelike, NaiveDate};

use crate::{bills::model::BillStatus, error::BillError};

/// French short month names, capitalised and cut to three characters.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// Format an ISO date as `"1 Avr. 21"`.
///
/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its calendar date is used).
pub fn format_date(raw: &str) -> Result<String, BillError> {
    let date = parse_date(raw).ok_or_else(|| BillError::MalformedRecord {
        reason: format!("unparsable date {raw:?}"),
    })?;
    let month = MONTHS[date.month0() as usize];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

/// Translate a raw status code; unknown codes pass through.
pub fn format_status(raw: &str) -> String {
    BillStatus::from(raw).label().to_string()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_known_values() {
        assert_eq!(format_date("2021-04-01").unwrap(), "1 Avr. 21");
        assert_eq!(format_date("2021-03-01").unwrap(), "1 Mar. 21");
        assert_eq!(format_date("2004-04-04").unwrap(), "4 Avr. 04");
        assert_eq!(format_date("2003-03-03").unwrap(), "3 Mar. 03");
        assert_eq!(format_date("2002-02-28").unwrap(), "28 Fév. 02");
        assert_eq!(format_date("2001-01-01").unwrap(), "1 Jan. 01");
    }

    #[test]
    fn test_format_date_every_month() {
        let got: Vec<String> = (1..=12)
            .map(|m| format_date(&format!("2022-{m:02}-15")).unwrap())
            .collect();
        assert_eq!(
            got,
            vec![
                "15 Jan. 22",
                "15 Fév. 22",
                "15 Mar. 22",
                "15 Avr. 22",
                "15 Mai. 22",
                "15 Jui. 22",
                "15 Jui. 22",
                "15 Aoû. 22",
                "15 Sep. 22",
                "15 Oct. 22",
                "15 Nov. 22",
                "15 Déc. 22",
            ]
        );
    }

    #[test]
    fn test_format_date_rfc3339() {
        assert_eq!(format_date("2021-12-31T10:00:00Z").unwrap(), "31 Déc. 21");
    }

    #[test]
    fn test_format_date_rejects_garbage() {
        for raw in ["invalid-date", "", "2021-13-01", "2021-02-30", "01/04/2021"] {
            let err = format_date(raw).unwrap_err();
            assert!(
                matches!(err, BillError::MalformedRecord { ref reason } if reason.contains(&format!("{raw:?}")))
            );
        }
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status("pending"), "En attente");
        assert_eq!(format_status("accepted"), "Accepté");
        assert_eq!(format_status("refused"), "Refusé");
        assert_eq!(format_status("unknown"), "unknown");
    }
}
