//! URL and path construction against a configured backend.

use url::Url;

use crate::error::{Error, Result};
use crate::query::SearchParams;

/// Builds absolute URLs and lookup paths against a backend base URL.
///
/// The builder is cheap to clone and does no I/O. It carries the pieces of
/// configuration URL work depends on: the base URL, the JSON:API prefix,
/// and the front page path.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base: Url,
    api_prefix: String,
    front_page: String,
}

impl UrlBuilder {
    /// Creates a builder for the given base URL.
    ///
    /// The base URL is parsed and validated once here; later operations
    /// resolve against it without re-validating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the base URL is empty and
    /// [`Error::InvalidUrl`] when it does not parse as an absolute URL.
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::config("base_url must not be empty"));
        }
        let base = Url::parse(base_url)?;
        Ok(Self {
            base,
            api_prefix: String::new(),
            front_page: "/home".to_string(),
        })
    }

    /// Sets the JSON:API prefix, e.g. `/jsonapi`. Normalized to a single
    /// leading slash and no trailing slash; an empty prefix stays empty.
    #[must_use]
    pub fn with_api_prefix(mut self, prefix: &str) -> Self {
        self.api_prefix = normalize_prefix(prefix);
        self
    }

    /// Sets the path substituted for the front page, e.g. `/home`.
    #[must_use]
    pub fn with_front_page(mut self, front_page: &str) -> Self {
        self.front_page = normalize_path(front_page);
        self
    }

    /// The configured base URL.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The configured JSON:API prefix.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    /// The configured front page path.
    #[must_use]
    pub fn front_page(&self) -> &str {
        &self.front_page
    }

    /// Builds an absolute URL from a path.
    ///
    /// Absolute inputs pass through unchanged; relative paths resolve
    /// against the base URL. An empty path yields the base URL itself.
    /// The operation is idempotent: feeding a produced URL back in returns
    /// the same URL.
    pub fn build_url(&self, path: &str) -> Result<Url> {
        self.build(path, &[])
    }

    /// Builds an absolute URL from a path plus query parameters.
    ///
    /// Pairs are appended to the URL in the order the params source yields
    /// them, percent-encoded as they are written. A query string already
    /// present on `path` is kept, with the new pairs appended after it.
    pub fn build_url_with<P>(&self, path: &str, params: &P) -> Result<Url>
    where
        P: SearchParams + ?Sized,
    {
        self.build(path, &params.query_pairs())
    }

    /// Builds an absolute endpoint URL string from an optional locale
    /// segment and a path, inserting the JSON:API prefix between them.
    pub fn build_endpoint(&self, locale: Option<&str>, path: &str) -> Result<String> {
        Ok(self.build(&self.endpoint_path(locale, path), &[])?.to_string())
    }

    /// Like [`Self::build_endpoint`], with query parameters appended.
    pub fn build_endpoint_with<P>(
        &self,
        locale: Option<&str>,
        path: &str,
        params: &P,
    ) -> Result<String>
    where
        P: SearchParams + ?Sized,
    {
        Ok(self
            .build(&self.endpoint_path(locale, path), &params.query_pairs())?
            .to_string())
    }

    /// Builds a backend lookup path from router-style segments.
    ///
    /// String segments are split on `/` and each part is percent-encoded
    /// individually; pre-split segments are encoded as given. Empty parts
    /// are dropped. An empty segment with no path prefix resolves to the
    /// configured front page. The locale prefix from `options` is applied
    /// last.
    pub fn construct_path(&self, segment: impl IntoSegments, options: &PathOptions) -> String {
        let prefix = normalize_prefix(options.path_prefix.as_deref().unwrap_or_default());
        let joined = segment
            .into_segments()
            .iter()
            .map(|part| urlencoding::encode(part).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        let path = if joined.is_empty() && prefix.is_empty() {
            self.front_page.clone()
        } else if joined.is_empty() {
            prefix
        } else {
            format!("{prefix}/{joined}")
        };

        add_locale_prefix(
            &path,
            options.locale.as_deref(),
            options.default_locale.as_deref(),
        )
    }

    /// Resolves a request input to an absolute URL: inputs with a leading
    /// `/` resolve against the base URL, anything else must already be
    /// absolute.
    pub(crate) fn resolve_input(&self, input: &str) -> Result<Url> {
        if input.starts_with('/') {
            Ok(self.base.join(input)?)
        } else {
            Ok(Url::parse(input)?)
        }
    }

    fn build(&self, path: &str, pairs: &[(String, String)]) -> Result<Url> {
        let mut url = match Url::parse(path) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.base.join(path)?,
            Err(error) => return Err(error.into()),
        };
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn endpoint_path(&self, locale: Option<&str>, path: &str) -> String {
        let locale_segment = match locale {
            Some(locale) if !locale.is_empty() => format!("/{locale}"),
            _ => String::new(),
        };
        let path = if path.is_empty() {
            String::new()
        } else {
            normalize_path(path)
        };
        format!("{locale_segment}{}{path}", self.api_prefix)
    }
}

/// Options for [`UrlBuilder::construct_path`].
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// Locale to prefix the path with.
    pub locale: Option<String>,
    /// Default locale; paths in the default locale get no prefix.
    pub default_locale: Option<String>,
    /// Static prefix inserted before the segments, e.g. `/blog`.
    pub path_prefix: Option<String>,
}

impl PathOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the locale.
    #[must_use]
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Sets the default locale.
    #[must_use]
    pub fn with_default_locale(mut self, default_locale: impl Into<String>) -> Self {
        self.default_locale = Some(default_locale.into());
        self
    }

    /// Sets the path prefix.
    #[must_use]
    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(path_prefix.into());
        self
    }
}

/// Prefixes `path` with `/{locale}` unless the locale is empty, matches
/// the default locale, or is already present as the path's leading
/// segment. A locale that merely shares a prefix with the leading segment
/// (`/es` vs `/esx/...`) does not count as present.
#[must_use]
pub fn add_locale_prefix(
    path: &str,
    locale: Option<&str>,
    default_locale: Option<&str>,
) -> String {
    match locale {
        Some(locale)
            if !locale.is_empty()
                && default_locale != Some(locale)
                && !has_leading_segment(path, locale) =>
        {
            let normalized = normalize_path(path);
            if normalized == "/" {
                format!("/{locale}")
            } else {
                format!("/{locale}{normalized}")
            }
        }
        _ => path.to_string(),
    }
}

fn has_leading_segment(path: &str, segment: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    match rest.strip_prefix(segment) {
        Some(tail) => tail.is_empty() || tail.starts_with('/'),
        None => false,
    }
}

/// Conversion into cleaned path segments for [`UrlBuilder::construct_path`].
pub trait IntoSegments {
    /// Returns the path segments, with empty parts dropped.
    fn into_segments(self) -> Vec<String>;
}

impl IntoSegments for &str {
    fn into_segments(self) -> Vec<String> {
        self.split('/')
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl IntoSegments for String {
    fn into_segments(self) -> Vec<String> {
        self.as_str().into_segments()
    }
}

impl IntoSegments for &[&str] {
    fn into_segments(self) -> Vec<String> {
        self.iter()
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl IntoSegments for &[String] {
    fn into_segments(self) -> Vec<String> {
        self.iter().filter(|part| !part.is_empty()).cloned().collect()
    }
}

impl<const N: usize> IntoSegments for [&str; N] {
    fn into_segments(self) -> Vec<String> {
        self.as_slice().into_segments()
    }
}

impl IntoSegments for Vec<&str> {
    fn into_segments(self) -> Vec<String> {
        self.as_slice().into_segments()
    }
}

impl IntoSegments for Vec<String> {
    fn into_segments(self) -> Vec<String> {
        self.into_iter().filter(|part| !part.is_empty()).collect()
    }
}

pub(crate) fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

pub(crate) fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> UrlBuilder {
        UrlBuilder::new("https://example.com").unwrap()
    }

    #[test]
    fn rejects_empty_and_relative_base_urls() {
        assert!(matches!(
            UrlBuilder::new(""),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            UrlBuilder::new("/not/absolute"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn builds_url_from_relative_path_with_params() {
        let url = builder()
            .build_url_with("/foo", &[("bar", "baz")])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/foo?bar=baz");
    }

    #[test]
    fn absolute_paths_pass_through_unchanged() {
        let url = builder()
            .build_url("https://other.example/already/absolute")
            .unwrap();
        assert_eq!(url.as_str(), "https://other.example/already/absolute");
    }

    #[test]
    fn empty_path_yields_base_url() {
        let url = builder().build_url("").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn bracketed_keys_are_percent_encoded() {
        let url = builder()
            .build_url_with("/jsonapi/node/article", &[("fields[node--article]", "title,path")])
            .unwrap();
        assert_eq!(
            url.query(),
            Some("fields%5Bnode--article%5D=title%2Cpath")
        );
    }

    #[test]
    fn building_is_idempotent() {
        let first = builder().build_url_with("/foo", &[("bar", "baz")]).unwrap();
        let second = builder().build_url(first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn existing_query_is_kept_and_extended() {
        let url = builder()
            .build_url_with("/foo?a=1", &[("b", "2")])
            .unwrap();
        assert_eq!(url.query(), Some("a=1&b=2"));
    }

    #[test]
    fn endpoint_inserts_locale_and_api_prefix() {
        let urls = builder().with_api_prefix("/jsonapi");
        assert_eq!(
            urls.build_endpoint(Some("es"), "/node/article").unwrap(),
            "https://example.com/es/jsonapi/node/article"
        );
        assert_eq!(
            urls.build_endpoint(None, "/node/article").unwrap(),
            "https://example.com/jsonapi/node/article"
        );
    }

    #[test]
    fn endpoint_appends_params() {
        let urls = builder().with_api_prefix("jsonapi");
        let endpoint = urls
            .build_endpoint_with(None, "node/article", &[("include", "uid")])
            .unwrap();
        assert_eq!(
            endpoint,
            "https://example.com/jsonapi/node/article?include=uid"
        );
    }

    #[test]
    fn empty_segment_resolves_to_front_page() {
        let urls = builder();
        assert_eq!(urls.construct_path("", &PathOptions::new()), "/home");

        let empty: [&str; 0] = [];
        assert_eq!(urls.construct_path(empty, &PathOptions::new()), "/home");
    }

    #[test]
    fn locale_prefix_is_applied_unless_default() {
        let urls = builder();
        let options = PathOptions::new()
            .with_locale("es")
            .with_default_locale("en");
        assert_eq!(urls.construct_path("about", &options), "/es/about");

        let default_locale = PathOptions::new()
            .with_locale("en")
            .with_default_locale("en");
        assert_eq!(urls.construct_path("about", &default_locale), "/about");
    }

    #[test]
    fn string_segments_split_and_encode_per_part() {
        let urls = builder();
        assert_eq!(
            urls.construct_path("blog/my post", &PathOptions::new()),
            "/blog/my%20post"
        );
    }

    #[test]
    fn slice_segments_drop_empty_parts() {
        let urls = builder();
        assert_eq!(
            urls.construct_path(["about", "", "team"], &PathOptions::new()),
            "/about/team"
        );
    }

    #[test]
    fn path_prefix_is_normalized_and_prepended() {
        let urls = builder();
        let options = PathOptions::new().with_path_prefix("blog");
        assert_eq!(urls.construct_path("recipes", &options), "/blog/recipes");
    }

    #[test]
    fn locale_prefix_recognizes_existing_leading_segment() {
        assert_eq!(
            add_locale_prefix("/es/about", Some("es"), None),
            "/es/about"
        );
        assert_eq!(
            add_locale_prefix("/esx/about", Some("es"), None),
            "/es/esx/about"
        );
        assert_eq!(add_locale_prefix("/about", None, None), "/about");
    }
}
