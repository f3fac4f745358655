//! Resolving load-balancing policies from spec options.

use std::time::Duration;

use passage_config::SelectorConfig;
use passage_metadata::Metadata;

/// The keys this resolver consumes, including spelling aliases.
const KEYS: &[&str] = &[
    "strategy",
    "maxFails",
    "max_fails",
    "failTimeout",
    "fail_timeout",
];

/// Derive an optional load-balancing policy from spec options.
///
/// A selector is synthesized only when at least one of `strategy`,
/// `maxFails`/`max_fails`, or `failTimeout`/`fail_timeout` is present;
/// whichever of the three is missing gets its default (`round`, 1, 30s).
/// Returning `None` is distinct from returning defaults: it tells the
/// runtime to pick its own policy.  All five keys are deleted regardless
/// of the outcome.
pub fn resolve_selector(md: &mut Metadata) -> Option<SelectorConfig> {
    let strategy = md.get_string("strategy");
    let mut max_fails = md.get_int("maxFails");
    if max_fails == 0 {
        max_fails = md.get_int("max_fails");
    }
    let fail_timeout = md
        .get_duration("failTimeout")
        .or_else(|| md.get_duration("fail_timeout"))
        .filter(|d| *d > Duration::from_secs(0));
    for key in KEYS {
        md.remove(key);
    }

    if strategy.is_empty() && max_fails <= 0 && fail_timeout.is_none() {
        return None;
    }

    Some(SelectorConfig {
        strategy: if strategy.is_empty() {
            "round".to_string()
        } else {
            strategy
        },
        max_fails: if max_fails <= 0 { 1 } else { max_fails as i32 },
        fail_timeout: fail_timeout.unwrap_or_else(|| Duration::from_secs(30)),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    /// A map built from string pairs.
    fn md(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn absent_keys_mean_no_selector() {
        let mut m = md(&[("unrelated", "x")]);
        assert!(resolve_selector(&mut m).is_none());
        assert!(m.contains("unrelated"));
    }

    #[test]
    fn one_key_pins_the_others_to_defaults() {
        let mut m = md(&[("strategy", "rand")]);
        let sel = resolve_selector(&mut m).unwrap();
        assert_eq!(sel.strategy, "rand");
        assert_eq!(sel.max_fails, 1);
        assert_eq!(sel.fail_timeout, Duration::from_secs(30));
        assert!(m.is_empty());
    }

    #[test]
    fn snake_case_aliases_are_read() {
        let mut m = md(&[("max_fails", "3"), ("fail_timeout", "10s")]);
        let sel = resolve_selector(&mut m).unwrap();
        assert_eq!(sel.strategy, "round");
        assert_eq!(sel.max_fails, 3);
        assert_eq!(sel.fail_timeout, Duration::from_secs(10));
    }

    #[test]
    fn camel_case_wins_over_alias() {
        let mut m = md(&[("maxFails", "5"), ("max_fails", "9")]);
        let sel = resolve_selector(&mut m).unwrap();
        assert_eq!(sel.max_fails, 5);
        assert!(m.is_empty());
    }

    #[test]
    fn out_of_range_counts_fall_back() {
        let mut m = md(&[("strategy", "round"), ("maxFails", "-2")]);
        let sel = resolve_selector(&mut m).unwrap();
        assert_eq!(sel.max_fails, 1);
    }

    #[test]
    fn negative_count_alone_reads_as_absent() {
        let mut m = md(&[("maxFails", "-2")]);
        assert!(resolve_selector(&mut m).is_none());
        // The keys are still consumed.
        assert!(m.is_empty());
    }
}
