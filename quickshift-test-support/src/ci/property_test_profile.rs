//! Property-test run profile read from environment overrides.
//!
//! Every property suite in the workspace sizes its runs through this module so
//! CI can raise case counts or enable forking in one place.

use std::{env, str::FromStr};

/// Environment variable overriding the number of cases per property.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable enabling forked proptest execution.
pub const QUICKSHIFT_PBT_FORK_ENV_KEY: &str = "QUICKSHIFT_PBT_FORK";

/// Case count and fork mode for a property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads the profile from the process environment, keeping a default for
    /// every unset or malformed override.
    ///
    /// # Examples
    /// ```
    /// use quickshift_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Builds the profile from an arbitrary key lookup.
    ///
    /// # Examples
    /// ```
    /// use quickshift_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::from_lookup(64, false, |key| {
    ///     (key == "PROGTEST_CASES").then(|| "512".to_owned())
    /// });
    /// assert_eq!(profile.cases(), 512);
    /// assert!(!profile.fork());
    /// ```
    #[must_use]
    pub fn from_lookup<L>(default_cases: u32, default_fork: bool, lookup: L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let cases = override_or(&lookup, PROGTEST_CASES_ENV_KEY, default_cases, |raw| {
            match raw.parse::<u32>() {
                Ok(0) => Err("cases must be positive".to_owned()),
                Ok(cases) => Ok(cases),
                Err(error) => Err(error.to_string()),
            }
        });
        let fork = override_or(&lookup, QUICKSHIFT_PBT_FORK_ENV_KEY, default_fork, |raw| {
            raw.parse::<Switch>().map(|switch| switch.0)
        });
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cases(&self) -> u32 { self.cases }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    #[rustfmt::skip]
    pub const fn fork(&self) -> bool { self.fork }
}

fn override_or<L, T>(
    lookup: &L,
    key: &'static str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> T
where
    L: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(raw.trim()).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "ignoring malformed property-test override",
        );
        default
    })
}

/// Boolean accepting the usual shell spellings.
struct Switch(bool);

impl FromStr for Switch {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Self(true)),
            "0" | "false" | "no" | "off" => Ok(Self(false)),
            other => Err(format!("`{other}` is not a boolean switch")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn profile_with(pairs: &[(&str, &str)], cases: u32, fork: bool) -> ProptestRunProfile {
        ProptestRunProfile::from_lookup(cases, fork, |key| {
            pairs
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        })
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let profile = profile_with(&[], 64, false);
        assert_eq!(profile.cases(), 64);
        assert!(!profile.fork());
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 250 ", 250)]
    #[case("25000", 25_000)]
    #[case("0", 64)]
    #[case("-1", 64)]
    #[case("many", 64)]
    fn case_overrides(#[case] raw: &str, #[case] expected: u32) {
        let profile = profile_with(&[(PROGTEST_CASES_ENV_KEY, raw)], 64, false);
        assert_eq!(profile.cases(), expected);
    }

    #[rstest]
    #[case("TRUE", false, true)]
    #[case("on", false, true)]
    #[case("0", true, false)]
    #[case("No", true, false)]
    #[case("", true, true)]
    #[case("maybe", false, false)]
    #[case("2", true, true)]
    fn fork_overrides(#[case] raw: &str, #[case] default: bool, #[case] expected: bool) {
        let profile = profile_with(&[(QUICKSHIFT_PBT_FORK_ENV_KEY, raw)], 64, default);
        assert_eq!(profile.fork(), expected);
    }
}
