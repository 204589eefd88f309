pub use time::Date;
use time::{macros::format_description, UtcOffset};

pub type StaticDateFormat<'a> =
    &'static [time::format_description::BorrowedFormatItem<'a>];

pub const STANDARD_DATE_FORMAT: StaticDateFormat =
    format_description!("[year]-[month]-[day]");

/// Dates as printed on Brazilian notes, eg. 15/03/2023
pub const BR_DATE_FORMAT: StaticDateFormat =
    format_description!("[day]/[month]/[year]");

pub fn parse_br_date(date_str: &str) -> Result<Date, time::error::Parse> {
    Date::parse(date_str.trim(), BR_DATE_FORMAT)
}

pub fn to_standard_string(d: &Date) -> String {
    // STANDARD_DATE_FORMAT only has components every Date carries.
    d.format(STANDARD_DATE_FORMAT).unwrap_or_else(|_| d.to_string())
}

/// For #[serde(serialize_with)], so dates come out as 2023-03-15 rather than
/// time's tuple representation.
pub fn serialize_date<S: serde::Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&to_standard_string(d))
}

// This is a (possibly unsafe, but no worse than chrono::Local) way
// to get the current system UtcOffset of local timezone.
// Using UtcOffset::current_local_offset is apparently unsafe on Linux,
// and will return an error if used without enabling some "unsafe" feature.
pub fn local_utc_offset() -> Result<UtcOffset, time::error::ComponentRange> {
    let now = chrono::offset::Local::now();
    let offset = now.offset();
    UtcOffset::from_whole_seconds(-1 * offset.utc_minus_local())
}

#[cfg(test)]
mod tests {
    use time::{Date, Month};

    use super::{parse_br_date, to_standard_string};

    #[test]
    fn test_parse_br_date() {
        assert_eq!(
            parse_br_date("15/03/2023").unwrap(),
            Date::from_calendar_date(2023, Month::March, 15).unwrap()
        );
        assert_eq!(
            parse_br_date("01/12/2022\n").unwrap(),
            Date::from_calendar_date(2022, Month::December, 1).unwrap()
        );
        assert!(parse_br_date("31/02/2023").is_err());
        assert!(parse_br_date("2023-03-15").is_err());
        assert!(parse_br_date("15/3").is_err());
    }

    #[test]
    fn test_render() {
        let d = parse_br_date("05/01/2024").unwrap();
        assert_eq!(to_standard_string(&d), "2024-01-05");
    }
}
