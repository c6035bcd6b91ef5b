//! Input checks shared by management handlers: identifier and URL formats,
//! and requested throttling tiers against the defined ones.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical 8-4-4-4-12 hexadecimal UUID.
static UUID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("static UUID pattern must compile")
});

/// `http` or `https` scheme followed by anything on one line.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(http|https)://.+$").expect("static URL pattern must compile")
});

/// Whether `id` is a UUID in canonical form (either letter case).
///
/// Handlers use this to tell UUID identifiers apart from
/// `provider-name-version` ones.
#[must_use]
pub fn is_uuid(id: &str) -> bool {
    let valid = UUID_PATTERN.is_match(id);
    if !valid {
        tracing::debug!(id, "not a valid UUID");
    }
    valid
}

/// Whether `url` is an `http`/`https` URL.
///
/// Hosts need not be fully qualified; `http://localhost` is accepted.
#[must_use]
pub fn is_url(url: &str) -> bool {
    URL_PATTERN.is_match(url)
}

/// Requested tier names that are not among `defined`, in request order.
///
/// An empty result means every requested tier exists.
///
/// # Examples
///
/// ```
/// use apim_rest::invalid_tier_names;
///
/// let defined = ["Gold", "Silver", "Unlimited"];
/// assert_eq!(invalid_tier_names(&defined, &["Gold", "Platinum"]), vec!["Platinum"]);
/// ```
#[must_use]
pub fn invalid_tier_names<'a, D, R>(defined: &[D], requested: &'a [R]) -> Vec<&'a str>
where
    D: AsRef<str>,
    R: AsRef<str>,
{
    requested
        .iter()
        .map(<R as AsRef<str>>::as_ref)
        .filter(|name| find_tier(defined, name).is_none())
        .collect()
}

/// The tier of `tiers` named exactly `name`.
#[must_use]
pub fn find_tier<'a, T: AsRef<str>>(tiers: &'a [T], name: &str) -> Option<&'a T> {
    tiers.iter().find(|tier| <T as AsRef<str>>::as_ref(tier) == name)
}
