//! Resolution-source extraction.
//!
//! Markets describe their settlement authority in free text, usually with
//! a link ("This market resolves according to https://www.bls.gov/cpi/").
//! The extractor pulls the first http(s) URL out of the description and
//! reduces it to a bare host for grouping and filtering.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::market::models::NO_LINK;

// First http(s) URL in the text. The character class stops at whitespace
// and the delimiters that commonly trail links in prose.
static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("valid URL regex"));

/// Extract the resolution-source domain from a market description.
///
/// Returns the host of the first URL found, with a leading `www.`
/// stripped, or the `"No Link"` sentinel when the description is empty or
/// contains no URL.
pub fn extract_source(description: &str) -> String {
    let Some(m) = RE_URL.find(description) else {
        return NO_LINK.to_string();
    };

    match Url::parse(m.as_str()) {
        Ok(url) => match url.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => NO_LINK.to_string(),
        },
        Err(_) => NO_LINK.to_string(),
    }
}
