//! Property-test run profile read from the environment.
//!
//! `PROGTEST_CASES` overrides the number of cases per property and
//! `FRACTANET_PBT_FORK` toggles proptest's forked execution. Malformed
//! overrides are logged and ignored.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const FRACTANET_PBT_FORK_ENV_KEY: &str = "FRACTANET_PBT_FORK";

/// Resolved case count and fork flag for a property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the process environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fractanet_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Resolves the profile through an arbitrary key lookup, so callers and
    /// tests can supply overrides without touching the process environment.
    ///
    /// # Examples
    ///
    /// ```
    /// use fractanet_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::from_lookup(64, false, |key| {
    ///     (key == "PROGTEST_CASES").then(|| "8".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 8);
    /// assert!(!profile.fork());
    /// ```
    #[must_use]
    pub fn from_lookup<F>(default_cases: u32, default_fork: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cases = lookup(PROGTEST_CASES_ENV_KEY)
            .and_then(|raw| accept(PROGTEST_CASES_ENV_KEY, &raw, parse_cases))
            .unwrap_or(default_cases);
        let fork = lookup(FRACTANET_PBT_FORK_ENV_KEY)
            .and_then(|raw| accept(FRACTANET_PBT_FORK_ENV_KEY, &raw, parse_switch))
            .unwrap_or(default_fork);
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub fn cases(&self) -> u32 { self.cases }

    /// Whether to run proptest cases in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub fn fork(&self) -> bool { self.fork }
}

fn accept<T>(key: &'static str, raw: &str, parse: fn(&str) -> Result<T, &'static str>) -> Option<T> {
    parse(raw)
        .inspect_err(|reason| {
            tracing::warn!(
                env = key,
                raw = %raw,
                reason = %reason,
                "ignoring malformed property-test override",
            );
        })
        .ok()
}

fn parse_cases(raw: &str) -> Result<u32, &'static str> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be positive"),
        Ok(cases) => Ok(cases),
        Err(_) => Err("cases must be an unsigned integer"),
    }
}

fn parse_switch(raw: &str) -> Result<bool, &'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected true/false, 1/0, yes/no or on/off"),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn profile_with(overrides: &[(&str, &str)], default_cases: u32, default_fork: bool) -> ProptestRunProfile {
        let values: HashMap<String, String> = overrides
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ProptestRunProfile::from_lookup(default_cases, default_fork, |key| values.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = profile_with(&[], 64, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case::one("1", 1)]
    #[case::padded(" 250 ", 250)]
    #[case::large("25000", 25_000)]
    fn case_overrides_are_applied(#[case] raw: &str, #[case] expected: u32) {
        let profile = profile_with(&[(PROGTEST_CASES_ENV_KEY, raw)], 64, false);
        assert_eq!(profile.cases(), expected);
    }

    #[rstest]
    #[case::zero("0")]
    #[case::negative("-1")]
    #[case::text("abc")]
    fn malformed_case_overrides_fall_back(#[case] raw: &str) {
        let profile = profile_with(&[(PROGTEST_CASES_ENV_KEY, raw)], 64, false);
        assert_eq!(profile.cases(), 64);
    }

    #[rstest]
    #[case::word_true("true", true)]
    #[case::upper("TRUE", true)]
    #[case::digit_on("1", true)]
    #[case::yes("yes", true)]
    #[case::word_false("false", false)]
    #[case::digit_off("0", false)]
    #[case::off("off", false)]
    fn fork_overrides_are_applied(#[case] raw: &str, #[case] expected: bool) {
        let profile = profile_with(&[(FRACTANET_PBT_FORK_ENV_KEY, raw)], 64, !expected);
        assert_eq!(profile.fork(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::maybe("maybe")]
    #[case::two("2")]
    fn malformed_fork_overrides_fall_back(#[case] raw: &str) {
        let profile = profile_with(&[(FRACTANET_PBT_FORK_ENV_KEY, raw)], 64, true);
        assert!(profile.fork());
    }
}
