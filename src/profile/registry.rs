use super::{ProfileKind, SiteProfile, GENERIC_PROFILE};
use crate::config::ProfileEntry;
use crate::ProfileError;
use scraper::Html;
use tracing::debug;
use url::Url;

/// Ordered collection of site profiles
///
/// Detection walks the profiles in registration order and returns the first
/// one that matches. The `generic` profile is held apart from the ordered
/// list: it never matches by predicate and is returned when nothing else
/// does, so every registry has it.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<SiteProfile>,
    fallback: SiteProfile,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileRegistry {
    /// Creates a registry holding only the generic profile
    pub fn new() -> Self {
        Self {
            profiles: Vec::new(),
            fallback: SiteProfile::generic(),
        }
    }

    /// Creates a registry with every built-in profile
    pub fn builtin() -> Result<Self, ProfileError> {
        let mut registry = Self::new();
        for kind in ProfileKind::BUILTIN {
            registry.register(SiteProfile::builtin(kind)?);
        }
        Ok(registry)
    }

    /// Creates a registry with user profiles ahead of the built-in profiles
    ///
    /// User profiles are checked first, so a configured hostname wins over a
    /// broad built-in URL pattern. A user profile that reuses a built-in name
    /// replaces that built-in.
    pub fn from_config(entries: &[ProfileEntry]) -> Result<Self, ProfileError> {
        let mut registry = Self::new();
        for entry in entries {
            registry.register(SiteProfile::from_entry(entry)?);
        }
        for kind in ProfileKind::BUILTIN {
            let profile = SiteProfile::builtin(kind)?;
            if registry.get(profile.name()).is_none() {
                registry.register(profile);
            }
        }
        Ok(registry)
    }

    /// Registers a profile
    ///
    /// Registering a name twice replaces the earlier profile in place, so it
    /// keeps its original position in detection order. A profile named
    /// `generic` replaces the fallback.
    pub fn register(&mut self, profile: SiteProfile) {
        if profile.name() == GENERIC_PROFILE {
            self.fallback = profile;
            return;
        }

        match self.profiles.iter_mut().find(|p| p.name() == profile.name()) {
            Some(existing) => *existing = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Looks a profile up by name
    pub fn get(&self, name: &str) -> Option<&SiteProfile> {
        if name == GENERIC_PROFILE {
            return Some(&self.fallback);
        }
        self.profiles.iter().find(|p| p.name() == name)
    }

    /// Picks the profile for a page
    ///
    /// # Arguments
    ///
    /// * `url` - The page URL
    /// * `page` - The parsed page, when available, for generator detection
    ///
    /// # Returns
    ///
    /// The first registered profile that matches, else the generic profile.
    pub fn detect(&self, url: &Url, page: Option<&Html>) -> &SiteProfile {
        let profile = self
            .profiles
            .iter()
            .find(|p| p.matches(url, page))
            .unwrap_or(&self.fallback);

        debug!("Detected profile {} for {}", profile.name(), url);
        profile
    }

    /// All profiles in detection order, generic last
    pub fn profiles(&self) -> impl Iterator<Item = &SiteProfile> {
        self.profiles.iter().chain(std::iter::once(&self.fallback))
    }

    /// Number of profiles, generic included
    pub fn len(&self) -> usize {
        self.profiles.len() + 1
    }

    /// Always false; the generic profile is always present
    pub fn is_empty(&self) -> bool {
        false
    }
}
