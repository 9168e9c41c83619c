//! Site profiles for Doc-Harvest
//!
//! A site profile describes how to recognize one family of documentation
//! generators (GitBook, Docusaurus, Sphinx, ...) and where its content and
//! navigation live in the page. Profiles are held by a [`ProfileRegistry`]
//! that picks the first matching profile for each crawled page.

mod builtin;
mod registry;

pub use registry::ProfileRegistry;

use crate::config::ProfileEntry;
use crate::extract::{self, ContentNode};
use crate::ProfileError;
use regex::Regex;
use scraper::node::Element;
use scraper::Html;
use serde::{Deserialize, Serialize};
use url::Url;

/// Name of the fallback profile every registry carries
pub const GENERIC_PROFILE: &str = "generic";

/// Which family of documentation generator a profile targets
///
/// The kind decides which post-filters run on extracted markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    GitBook,
    Docusaurus,
    MkDocs,
    ReadTheDocs,
    VuePress,
    Hugo,
    Docsify,
    NextJs,
    AiDocs,
    Generic,
    /// Loaded from the `[[profiles]]` config section
    Custom,
}

impl ProfileKind {
    /// Built-in kinds in detection order
    pub const BUILTIN: [ProfileKind; 10] = [
        ProfileKind::GitBook,
        ProfileKind::Docusaurus,
        ProfileKind::MkDocs,
        ProfileKind::ReadTheDocs,
        ProfileKind::VuePress,
        ProfileKind::Hugo,
        ProfileKind::Docsify,
        ProfileKind::NextJs,
        ProfileKind::AiDocs,
        ProfileKind::Generic,
    ];

    /// Returns true if elements like this one are removed from extracted markup
    pub(crate) fn drops_element(&self, region: Region, element: &Element) -> bool {
        match (self, region) {
            (ProfileKind::NextJs, Region::Content) => {
                element.attr("data-component").is_some() || element.attr("data-reactid").is_some()
            }
            _ => false,
        }
    }

    /// Rewrites the attributes of an element in extracted markup
    pub(crate) fn filter_attributes(&self, region: Region, element: &mut Element) {
        let name = element.name().to_string();

        match (self, region) {
            (ProfileKind::ReadTheDocs, Region::Content) if name == "pre" || name == "code" => {
                element.attrs.retain(|attr, _| &*attr.local != "style");
            }
            (ProfileKind::ReadTheDocs, Region::Navigation) if name == "a" => {
                element.attrs.retain(|attr, _| &*attr.local != "class");
            }
            (ProfileKind::AiDocs, Region::Content) if name == "pre" => {
                let Some((class_attr, _)) = element
                    .attrs
                    .iter()
                    .find(|(attr, _)| &*attr.local == "class")
                else {
                    return;
                };
                let language = element
                    .classes()
                    .find_map(|class| class.strip_prefix("language-"))
                    .map(|language| language.to_string());

                let mut language_attr = class_attr.clone();
                language_attr.local = "data-language".into();
                element.attrs.clear();
                if let Some(language) = language {
                    element.attrs.insert(language_attr, language.into());
                }
            }
            _ => {}
        }
    }
}

/// Part of a page an extracted subtree came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Content,
    Navigation,
}

/// A named extraction ruleset for one documentation generator
#[derive(Debug, Clone)]
pub struct SiteProfile {
    name: String,
    description: String,
    kind: ProfileKind,
    hostnames: Vec<String>,
    url_patterns: Vec<Regex>,
    meta_generator: Vec<String>,
    content_selectors: Vec<String>,
    navigation_selectors: Vec<String>,
    ignore_selectors: Vec<String>,
}

impl SiteProfile {
    /// Creates an empty profile with no predicates and no selectors
    pub fn new(kind: ProfileKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            hostnames: Vec::new(),
            url_patterns: Vec::new(),
            meta_generator: Vec::new(),
            content_selectors: Vec::new(),
            navigation_selectors: Vec::new(),
            ignore_selectors: Vec::new(),
        }
    }

    /// Returns the built-in profile for a kind
    ///
    /// `ProfileKind::Custom` has no built-in data and yields an empty profile
    /// named `custom`.
    pub fn builtin(kind: ProfileKind) -> Result<Self, ProfileError> {
        builtin::profile(kind)
    }

    /// The fallback profile used when nothing else matches
    pub fn generic() -> Self {
        builtin::generic()
    }

    /// Builds a user-defined profile from a `[[profiles]]` config entry
    pub fn from_entry(entry: &ProfileEntry) -> Result<Self, ProfileError> {
        let name = entry.name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if name == GENERIC_PROFILE {
            return Err(ProfileError::ReservedName(name.to_string()));
        }

        Ok(Self::new(ProfileKind::Custom, name, entry.description.clone())
            .with_hostnames(&entry.hostnames)
            .with_url_patterns(&entry.url_patterns)?
            .with_meta_generator(&entry.meta_generator)
            .with_content_selectors(&entry.content_selectors)
            .with_navigation_selectors(&entry.navigation_selectors)
            .with_ignore_selectors(&entry.ignore_selectors))
    }

    pub fn with_hostnames<S: AsRef<str>>(mut self, hostnames: &[S]) -> Self {
        self.hostnames = to_strings(hostnames);
        self
    }

    /// Sets the URL patterns, compiling each one
    pub fn with_url_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, ProfileError> {
        self.url_patterns = patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern.as_ref()).map_err(|source| ProfileError::InvalidPattern {
                    profile: self.name.clone(),
                    pattern: pattern.as_ref().to_string(),
                    source,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    pub fn with_meta_generator<S: AsRef<str>>(mut self, generators: &[S]) -> Self {
        self.meta_generator = to_strings(generators);
        self
    }

    pub fn with_content_selectors<S: AsRef<str>>(mut self, selectors: &[S]) -> Self {
        self.content_selectors = to_strings(selectors);
        self
    }

    pub fn with_navigation_selectors<S: AsRef<str>>(mut self, selectors: &[S]) -> Self {
        self.navigation_selectors = to_strings(selectors);
        self
    }

    pub fn with_ignore_selectors<S: AsRef<str>>(mut self, selectors: &[S]) -> Self {
        self.ignore_selectors = to_strings(selectors);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn content_selectors(&self) -> &[String] {
        &self.content_selectors
    }

    pub fn navigation_selectors(&self) -> &[String] {
        &self.navigation_selectors
    }

    pub fn ignore_selectors(&self) -> &[String] {
        &self.ignore_selectors
    }

    /// Returns true if this profile recognizes the page
    ///
    /// A profile matches when the URL host contains one of its hostnames,
    /// the URL matches one of its patterns, or the page's
    /// `<meta name="generator">` content contains one of its generator
    /// strings. The generic profile never matches here; it is only ever
    /// chosen as the fallback.
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_harvest::profile::{ProfileKind, SiteProfile};
    /// use url::Url;
    ///
    /// let gitbook = SiteProfile::builtin(ProfileKind::GitBook).unwrap();
    /// let url = Url::parse("https://acme.gitbook.io/guide").unwrap();
    /// assert!(gitbook.matches(&url, None));
    /// ```
    pub fn matches(&self, url: &Url, page: Option<&Html>) -> bool {
        if self.kind == ProfileKind::Generic {
            return false;
        }

        if let Some(host) = url.host_str() {
            if self.hostnames.iter().any(|h| host.contains(h.as_str())) {
                return true;
            }
        }

        if self.url_patterns.iter().any(|p| p.is_match(url.as_str())) {
            return true;
        }

        if self.meta_generator.is_empty() {
            return false;
        }

        page.and_then(extract::meta_generator)
            .map(|generator| {
                self.meta_generator
                    .iter()
                    .any(|g| generator.contains(g.as_str()))
            })
            .unwrap_or(false)
    }

    /// Extracts the main content subtree of a page
    pub fn extract_content(&self, page: &Html) -> Option<ContentNode> {
        extract::extract_content(self, page)
    }

    /// Extracts the navigation subtree of a page
    pub fn extract_navigation(&self, page: &Html) -> Option<ContentNode> {
        extract::extract_navigation(self, page)
    }
}

fn to_strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}
