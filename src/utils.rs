use crate::entity::BotError;
use chrono::{FixedOffset, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

/// Upper bound for the report interval, ten years
pub const MAX_INTERVAL_DAYS: u32 = 3650;

lazy_static! {
    static ref ASSET_SEPARATOR: Regex = Regex::new(r"[,;\n]+").unwrap();
    static ref TIME_OF_DAY: Regex = Regex::new(r"^(\d{1,2})[:.](\d{2})$").unwrap();
    static ref UTC_OFFSET: Regex = Regex::new(r"^([+-])(\d{1,2}):?(\d{2})?$").unwrap();
}

// Split "BTC, eth;TON" into lowercase lookup tokens, keeping first occurrences
pub fn split_asset_list(input: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();

    for token in ASSET_SEPARATOR.split(input) {
        let token = token.trim().to_lowercase();
        if !token.is_empty() && !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    tokens
}

// Parse the report interval in whole days
pub fn parse_interval(input: &str) -> Result<u32, BotError> {
    let input = input.trim();
    let days = input
        .parse::<u32>()
        .map_err(|_| BotError::InvalidInterval(format!("'{}' is not a whole number", input)))?;

    if days == 0 || days > MAX_INTERVAL_DAYS {
        return Err(BotError::InvalidInterval(format!(
            "must be between 1 and {} days",
            MAX_INTERVAL_DAYS
        )));
    }

    Ok(days)
}

// Parse a 24-hour HH:MM time of day
pub fn parse_notify_time(input: &str) -> Result<NaiveTime, BotError> {
    let input = input.trim();
    let invalid = || BotError::InvalidTime(format!("'{}' is not a valid HH:MM time", input));

    let captures = TIME_OF_DAY.captures(input).ok_or_else(invalid)?;
    let hour = captures[1].parse::<u32>().map_err(|_| invalid())?;
    let minute = captures[2].parse::<u32>().map_err(|_| invalid())?;

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

// Parse "+03:00", "-0530", "+3" or "Z" into a fixed offset
pub fn parse_utc_offset(input: &str) -> Option<FixedOffset> {
    let input = input.trim();
    if input.eq_ignore_ascii_case("z") || input.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let captures = UTC_OFFSET.captures(input)?;
    let hours = captures[2].parse::<i32>().ok()?;
    let minutes = captures
        .get(3)
        .map_or(Ok(0), |m| m.as_str().parse::<i32>())
        .ok()?;

    if hours > 14 || minutes > 59 {
        return None;
    }

    let seconds = hours * 3600 + minutes * 60;
    match &captures[1] {
        "-" => FixedOffset::west_opt(seconds),
        _ => FixedOffset::east_opt(seconds),
    }
}

// Format a price with precision that keeps small coins readable
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        return format!("{:.2}", price);
    }

    let formatted = format!("{:.8}", price);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_list_is_split_and_normalized() {
        assert_eq!(
            split_asset_list(" BTC, eth;TON,,btc \n xrp"),
            vec!["btc", "eth", "ton", "xrp"]
        );
        assert!(split_asset_list(" , ;").is_empty());
    }

    #[test]
    fn interval_must_be_positive_integer() {
        assert_eq!(parse_interval(" 3 ").unwrap(), 3);
        assert!(matches!(parse_interval("0"), Err(BotError::InvalidInterval(_))));
        assert!(matches!(parse_interval("-1"), Err(BotError::InvalidInterval(_))));
        assert!(matches!(parse_interval("two"), Err(BotError::InvalidInterval(_))));
        assert!(matches!(parse_interval("1.5"), Err(BotError::InvalidInterval(_))));
        assert!(parse_interval("3651").is_err());
    }

    #[test]
    fn notify_time_accepts_24_hour_format() {
        assert_eq!(
            parse_notify_time("09:00").unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
        assert_eq!(
            parse_notify_time("7:05").unwrap(),
            NaiveTime::from_hms_opt(7, 5, 0).unwrap()
        );
        assert_eq!(
            parse_notify_time("23.59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn notify_time_rejects_malformed_input() {
        for input in ["24:00", "12:60", "9", "09:00:00", "noon", "", "1:2"] {
            assert!(
                matches!(parse_notify_time(input), Err(BotError::InvalidTime(_))),
                "accepted {:?}",
                input
            );
        }
    }

    #[test]
    fn utc_offsets_are_parsed() {
        assert_eq!(parse_utc_offset("+03:00").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("-0530").unwrap().local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert_eq!(parse_utc_offset("+3").unwrap().local_minus_utc(), 3 * 3600);
        assert_eq!(parse_utc_offset("Z").unwrap().local_minus_utc(), 0);
        assert!(parse_utc_offset("Moscow").is_none());
        assert!(parse_utc_offset("+25:00").is_none());
    }

    #[test]
    fn prices_are_formatted_by_magnitude() {
        assert_eq!(format_price(64000.5), "64000.50");
        assert_eq!(format_price(1.0), "1.00");
        assert_eq!(format_price(0.5), "0.5");
        assert_eq!(format_price(0.00001234), "0.00001234");
        assert_eq!(format_price(0.0), "0");
    }
}
