//! Classification of update sources as local or network locations.

use url::Url;

/// Returns true when `location` names something on the local filesystem.
///
/// Accepts `file://` URLs and absolute paths. Anything else that parses as
/// a URL (or fails to parse) is treated as a network location.
#[must_use]
pub fn is_local_location(location: &str) -> bool {
    if location.starts_with('/') {
        return true;
    }

    Url::parse(location).is_ok_and(|url| url.scheme() == "file")
}

/// Returns true when both update sources are local filesystem locations.
///
/// Content is only read locally when the version and content sources agree;
/// a mix of local and network sources still goes through the network path.
#[must_use]
pub fn is_local_download(version_url: &str, content_url: &str) -> bool {
    is_local_location(version_url) && is_local_location(content_url)
}
