//! URL rewriting from `url.<base>.insteadof` configuration.

use crate::value::ConfigValue;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

const URL_PREFIX: &str = "url.";
const INSTEADOF: &str = "insteadof";

/// Rewrite `url` using `url.<base>.insteadof = <label>` entries.
///
/// The longest label that prefixes `url` wins, as in git. If that label is
/// claimed by more than one base (whether through separate entries or
/// inside a multi-valued one) the rewrite is ambiguous: a warning is logged
/// and `url` is returned unchanged.
pub fn rewrite_url<'a, I>(config: I, url: &str) -> String
where
    I: IntoIterator<Item = (&'a String, &'a ConfigValue)>,
{
    let mut bases_by_label: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for (key, value) in config {
        let Some(base) = key
            .strip_prefix(URL_PREFIX)
            .and_then(|rest| rest.rsplit_once('.'))
            .filter(|(_, name)| name.eq_ignore_ascii_case(INSTEADOF))
            .map(|(base, _)| base)
        else {
            continue;
        };
        for label in value.values() {
            bases_by_label.entry(label).or_default().insert(base);
        }
    }

    let Some((label, bases)) = bases_by_label
        .iter()
        .filter(|(label, _)| !label.is_empty() && url.starts_with(**label))
        .max_by_key(|(label, _)| label.len())
    else {
        return url.to_string();
    };

    if bases.len() > 1 {
        warn!(
            "Ignoring URL rewrite configuration for '{}', multiple conflicting definitions exist: {}",
            label,
            bases
                .iter()
                .map(|base| format!("url.{}.insteadof", base))
                .collect::<Vec<_>>()
                .join(", ")
        );
        return url.to_string();
    }

    match bases.iter().next() {
        Some(base) => format!("{}{}", base, &url[label.len()..]),
        None => url.to_string(),
    }
}
