//! Display formatting for amounts and timestamps
//!
//! Pure functions; the locale carries every convention they need so output
//! never depends on the host machine's settings.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// 12-hour (`2:05 PM`) or 24-hour (`14.05`) clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourCycle {
    H12,
    H23,
}

/// Order of the date components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStyle {
    /// `Jan 5, 2024`
    MonthDayYear,
    /// `5 Jan 2024`
    DayMonthYear,
}

const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const MONTHS_ID: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Formatting conventions of one display locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    /// BCP-47 tag, e.g. `id-ID`
    pub tag: &'static str,
    pub currency_symbol: &'static str,
    /// Put a space between symbol and digits (`Rp 1.000` vs `$1,000`)
    pub symbol_spaced: bool,
    pub group_separator: char,
    pub decimal_separator: char,
    pub fraction_digits: u32,
    pub hour_cycle: HourCycle,
    pub time_separator: char,
    pub date_style: DateStyle,
    pub months: &'static [&'static str; 12],
    /// Offset timestamps are displayed in
    pub utc_offset: FixedOffset,
}

impl Locale {
    pub fn en_us() -> Self {
        Self {
            tag: "en-US",
            currency_symbol: "$",
            symbol_spaced: false,
            group_separator: ',',
            decimal_separator: '.',
            fraction_digits: 2,
            hour_cycle: HourCycle::H12,
            time_separator: ':',
            date_style: DateStyle::MonthDayYear,
            months: &MONTHS_EN,
            utc_offset: utc(),
        }
    }

    /// Indonesian rupiah, Western Indonesia Time (UTC+7)
    pub fn id_id() -> Self {
        Self {
            tag: "id-ID",
            currency_symbol: "Rp",
            symbol_spaced: true,
            group_separator: '.',
            decimal_separator: ',',
            fraction_digits: 2,
            hour_cycle: HourCycle::H23,
            time_separator: '.',
            date_style: DateStyle::DayMonthYear,
            months: &MONTHS_ID,
            utc_offset: FixedOffset::east_opt(7 * 3600).unwrap_or_else(utc),
        }
    }

    /// Look up a preset by tag (case-insensitive, `_` or `-`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" | "en" => Some(Self::en_us()),
            "id-id" | "id" => Some(Self::id_id()),
            _ => None,
        }
    }

    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    pub fn with_hour_cycle(mut self, hour_cycle: HourCycle) -> Self {
        self.hour_cycle = hour_cycle;
        self
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::id_id()
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// Insert `separator` every three digits from the right
pub fn group_thousands(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// Format an amount as currency, e.g. `Rp 12.345,60` or `$12,345.60`
pub fn format_currency(amount: Decimal, locale: &Locale) -> String {
    let mut rounded =
        amount.round_dp_with_strategy(locale.fraction_digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(locale.fraction_digits);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = rounded.abs().to_string();
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(locale.currency_symbol);
    if locale.symbol_spaced {
        out.push(' ');
    }
    out.push_str(&group_thousands(int_part, locale.group_separator));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_separator);
        out.push_str(frac);
    }
    out
}

/// Hour and minute in the locale's clock, e.g. `14.05` or `2:05 PM`
pub fn format_time(ts: DateTime<Utc>, locale: &Locale) -> String {
    let local = ts.with_timezone(&locale.utc_offset);
    let sep = locale.time_separator;
    match locale.hour_cycle {
        HourCycle::H23 => format!("{:02}{sep}{:02}", local.hour(), local.minute()),
        HourCycle::H12 => {
            let (pm, hour) = local.hour12();
            let suffix = if pm { "PM" } else { "AM" };
            format!("{hour}{sep}{:02} {suffix}", local.minute())
        }
    }
}

/// Calendar date, e.g. `5 Jan 2024` or `Jan 5, 2024`
pub fn format_date(ts: DateTime<Utc>, locale: &Locale) -> String {
    let local = ts.with_timezone(&locale.utc_offset);
    let month = locale.months[local.month0() as usize];
    match locale.date_style {
        DateStyle::MonthDayYear => format!("{month} {}, {}", local.day(), local.year()),
        DateStyle::DayMonthYear => format!("{} {month} {}", local.day(), local.year()),
    }
}

/// Date followed by time
pub fn format_datetime(ts: DateTime<Utc>, locale: &Locale) -> String {
    format!("{} {}", format_date(ts, locale), format_time(ts, locale))
}

/// Parse an ISO-8601 / RFC 3339 string and format its time of day.
pub fn format_timestamp(raw: &str, locale: &Locale) -> Option<String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| format_time(ts.with_timezone(&Utc), locale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ts(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_currency_grouping() {
        let amount = Decimal::from_str("12345.6").unwrap();
        assert_eq!(format_currency(amount, &Locale::id_id()), "Rp 12.345,60");
        assert_eq!(format_currency(amount, &Locale::en_us()), "$12,345.60");
    }

    #[test]
    fn test_currency_edges() {
        let en = Locale::en_us();
        assert_eq!(format_currency(Decimal::ZERO, &en), "$0.00");
        assert_eq!(format_currency(Decimal::from(999), &en), "$999.00");
        assert_eq!(format_currency(Decimal::from(1_000_000), &en), "$1,000,000.00");
        assert_eq!(format_currency(Decimal::from_str("-42.005").unwrap(), &en), "-$42.01");
        assert_eq!(format_currency(Decimal::from_str("-0.001").unwrap(), &en), "$0.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1", ','), "1");
        assert_eq!(group_thousands("123", ','), "123");
        assert_eq!(group_thousands("1234", ','), "1,234");
        assert_eq!(group_thousands("123456789", '.'), "123.456.789");
    }

    #[test]
    fn test_time_formats() {
        let t = ts("2024-01-05T07:05:00Z");
        // UTC+7 → 14:05
        assert_eq!(format_time(t, &Locale::id_id()), "14.05");
        assert_eq!(format_time(t, &Locale::en_us()), "7:05 AM");

        let noon = ts("2024-01-05T12:30:00Z");
        assert_eq!(format_time(noon, &Locale::en_us()), "12:30 PM");
        let h23 = Locale::en_us().with_hour_cycle(HourCycle::H23);
        assert_eq!(format_time(ts("2024-01-05T00:09:00Z"), &h23), "00:09");
    }

    #[test]
    fn test_date_crosses_midnight_with_offset() {
        let t = ts("2024-01-05T20:00:00Z");
        assert_eq!(format_date(t, &Locale::en_us()), "Jan 5, 2024");
        assert_eq!(format_date(t, &Locale::id_id()), "6 Jan 2024");
        assert_eq!(format_datetime(t, &Locale::id_id()), "6 Jan 2024 03.00");
    }

    #[test]
    fn test_format_timestamp_string() {
        let id = Locale::id_id();
        assert_eq!(
            format_timestamp("2024-08-17T10:00:00.123456+07:00", &id).as_deref(),
            Some("10.00")
        );
        assert!(format_timestamp("yesterday", &id).is_none());
    }

    #[test]
    fn test_locale_lookup() {
        assert_eq!(Locale::from_tag("en_US").map(|l| l.tag), Some("en-US"));
        assert_eq!(Locale::from_tag("ID-id").map(|l| l.tag), Some("id-ID"));
        assert!(Locale::from_tag("fr-FR").is_none());
    }
}
