//! Platform/track matching.
//!
//! Platform strings from the departure monitor are free text: `"1"`,
//! `"1a"`, `"1 (U)"`, `"Gleis 1"`, `"Bstg. 2"`. A requested track token
//! matches a platform if any of these hold:
//!
//! 1. the platform equals the token;
//! 2. the token is a prefix of the platform and the next character is not
//!    a decimal digit (so `"1"` matches `"1a"` but not `"10"`);
//! 3. the platform contains `" <token>"` or `"Gleis <token>"`.

use super::departure::DepartureRecord;

/// Whether `platform` matches the requested track `token`.
pub fn matches_track(platform: &str, token: &str) -> bool {
    if platform == token {
        return true;
    }

    if let Some(rest) = platform.strip_prefix(token)
        && rest.chars().next().is_some_and(|c| !c.is_ascii_digit())
    {
        return true;
    }

    platform.contains(&format!(" {token}")) || platform.contains(&format!("Gleis {token}"))
}

/// Keep the departures whose platform matches `token`.
///
/// Returns owned copies so the shared cached batch is never touched. An
/// empty (or all-whitespace) token disables filtering.
pub fn filter_by_track(departures: &[DepartureRecord], token: &str) -> Vec<DepartureRecord> {
    let token = token.trim();
    if token.is_empty() {
        return departures.to_vec();
    }

    departures
        .iter()
        .filter(|d| matches_track(&d.platform, token))
        .cloned()
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn platform_matches_itself(platform in "[ -~]{1,12}") {
            prop_assert!(matches_track(&platform, &platform));
        }

        #[test]
        fn digit_continuation_never_matches(token in "[1-9][0-9]{0,2}", digit in 0u8..10) {
            let platform = format!("{token}{digit}");
            prop_assert!(!matches_track(&platform, &token));
        }

        #[test]
        fn non_digit_continuation_matches(token in "[1-9][0-9]{0,2}", suffix in "[a-zA-Z ()]{1,6}") {
            let platform = format!("{token}{suffix}");
            prop_assert!(matches_track(&platform, &token));
        }

        #[test]
        fn gleis_prefix_matches(token in "[1-9][0-9]{0,2}[a-z]?") {
            let platform = format!("Gleis {token}");
            prop_assert!(matches_track(&platform, &token));
        }
    }
}
