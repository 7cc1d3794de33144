//! Value parsers for command-line arguments

use std::time::Duration;

use codepush_core::ValidationError;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Parse a lifetime such as `60d`, `5h`, `30m` or `10s`
pub fn parse_max_age(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    let invalid = || {
        format!(
            "Invalid max age \"{value}\". Use a number followed by s, m, h, d or y (e.g. \"60d\")."
        )
    };

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (amount, unit) = value.split_at(split);
    let amount: u64 = amount.parse().map_err(|_| invalid())?;
    if amount == 0 {
        return Err(invalid());
    }

    let unit_secs = match unit {
        "s" => 1,
        "m" => MINUTE,
        "h" => HOUR,
        "d" => DAY,
        "y" => 365 * DAY,
        _ => return Err(invalid()),
    };

    amount
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(invalid)
}

/// Parse a rollout percentage, with or without a trailing `%`
pub fn parse_rollout(value: &str) -> Result<u8, String> {
    value
        .trim()
        .trim_end_matches('%')
        .parse::<u8>()
        .map_err(|_| ValidationError::InvalidRollout.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_age_units() {
        assert_eq!(parse_max_age("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_max_age("30m").unwrap(), Duration::from_secs(1800));
        assert_eq!(parse_max_age("5h").unwrap(), Duration::from_secs(18_000));
        assert_eq!(parse_max_age("60d").unwrap(), Duration::from_secs(60 * 86_400));
        assert_eq!(parse_max_age("1y").unwrap(), Duration::from_secs(365 * 86_400));
    }

    #[test]
    fn test_parse_max_age_rejects_bad_input() {
        for value in ["", "60", "d", "0d", "5 weeks", "-1d", "1.5h"] {
            assert!(parse_max_age(value).is_err(), "accepted {value:?}");
        }
    }

    #[test]
    fn test_parse_rollout() {
        assert_eq!(parse_rollout("25").unwrap(), 25);
        assert_eq!(parse_rollout("25%").unwrap(), 25);
        // Range is checked by the command itself
        assert_eq!(parse_rollout("0").unwrap(), 0);
        assert_eq!(
            parse_rollout("abc").unwrap_err(),
            "Rollout value must be an integer between 1 and 100 inclusive."
        );
        assert!(parse_rollout("12.5").is_err());
        assert!(parse_rollout("300").is_err());
    }
}
