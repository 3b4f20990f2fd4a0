//! Configuration profiles - named parameter sets for the decision engine
//!
//! Repository pattern:
//! - [`ProfileStore`] abstracts persistence
//! - [`InMemoryProfileStore`] backs development and tests
//!
//! The engine only consumes the three weights, the margin and the interval
//! of the active profile.

use crate::{DecisionParameters, ProfileError, ProfileResult, WeightVector};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stored configuration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Store-assigned identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Throughput weight (w1)
    pub weight_throughput: f64,
    /// Delay weight (w2)
    pub weight_delay: f64,
    /// Loss weight (w3)
    pub weight_loss: f64,
    /// Hysteresis margin
    pub switching_margin: f64,
    /// Decision interval in milliseconds
    pub decision_interval: u64,
    /// Whether this profile is activated at startup
    pub is_default: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Profile {
    /// Weight vector of this profile
    pub fn weights(&self) -> WeightVector {
        WeightVector::new(self.weight_throughput, self.weight_delay, self.weight_loss)
    }

    /// Margin and interval of this profile
    pub fn params(&self) -> DecisionParameters {
        DecisionParameters::new(self.switching_margin, self.decision_interval)
    }
}

fn default_weight_throughput() -> f64 {
    WeightVector::BALANCED.w1
}

fn default_weight_delay() -> f64 {
    WeightVector::BALANCED.w2
}

fn default_weight_loss() -> f64 {
    WeightVector::BALANCED.w3
}

fn default_margin() -> f64 {
    DecisionParameters::DEFAULT_MARGIN
}

fn default_interval() -> u64 {
    DecisionParameters::DEFAULT_INTERVAL_MS
}

/// Profile creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    /// Display name
    pub name: String,
    /// Throughput weight
    #[serde(default = "default_weight_throughput")]
    pub weight_throughput: f64,
    /// Delay weight
    #[serde(default = "default_weight_delay")]
    pub weight_delay: f64,
    /// Loss weight
    #[serde(default = "default_weight_loss")]
    pub weight_loss: f64,
    /// Hysteresis margin
    #[serde(default = "default_margin")]
    pub switching_margin: f64,
    /// Decision interval (ms)
    #[serde(default = "default_interval")]
    pub decision_interval: u64,
    /// Default flag
    #[serde(default)]
    pub is_default: bool,
}

impl NewProfile {
    /// Balanced profile with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight_throughput: default_weight_throughput(),
            weight_delay: default_weight_delay(),
            weight_loss: default_weight_loss(),
            switching_margin: default_margin(),
            decision_interval: default_interval(),
            is_default: false,
        }
    }
}

/// Partial profile update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New name
    pub name: Option<String>,
    /// New throughput weight
    pub weight_throughput: Option<f64>,
    /// New delay weight
    pub weight_delay: Option<f64>,
    /// New loss weight
    pub weight_loss: Option<f64>,
    /// New margin
    pub switching_margin: Option<f64>,
    /// New interval (ms)
    pub decision_interval: Option<u64>,
    /// New default flag
    pub is_default: Option<bool>,
}

impl ProfileUpdate {
    fn apply(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(w) = self.weight_throughput {
            profile.weight_throughput = w;
        }
        if let Some(w) = self.weight_delay {
            profile.weight_delay = w;
        }
        if let Some(w) = self.weight_loss {
            profile.weight_loss = w;
        }
        if let Some(margin) = self.switching_margin {
            profile.switching_margin = margin;
        }
        if let Some(interval) = self.decision_interval {
            profile.decision_interval = interval;
        }
        if let Some(is_default) = self.is_default {
            profile.is_default = is_default;
        }
    }
}

fn validate(profile: &Profile) -> ProfileResult<()> {
    if profile.name.trim().is_empty() {
        return Err(ProfileError::validation("name", "cannot be empty"));
    }
    for (field, value) in [
        ("weightThroughput", profile.weight_throughput),
        ("weightDelay", profile.weight_delay),
        ("weightLoss", profile.weight_loss),
    ] {
        if !value.is_finite() {
            return Err(ProfileError::validation(field, "must be a finite number"));
        }
    }
    if !profile.switching_margin.is_finite() || profile.switching_margin < 0.0 {
        return Err(ProfileError::validation(
            "switchingMargin",
            "must be a non-negative number",
        ));
    }
    if profile.decision_interval == 0 {
        return Err(ProfileError::validation(
            "decisionInterval",
            "must be greater than zero",
        ));
    }
    Ok(())
}

/// Profile store trait
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// List all profiles ordered by id
    async fn list_profiles(&self) -> ProfileResult<Vec<Profile>>;

    /// Get profile by id
    async fn get_profile(&self, id: u64) -> ProfileResult<Profile>;

    /// Create a profile
    async fn create_profile(&self, profile: NewProfile) -> ProfileResult<Profile>;

    /// Apply a partial update
    async fn update_profile(&self, id: u64, update: ProfileUpdate) -> ProfileResult<Profile>;

    /// Delete a profile
    async fn delete_profile(&self, id: u64) -> ProfileResult<()>;

    /// Profile flagged as default, falling back to the first one stored
    async fn default_profile(&self) -> ProfileResult<Option<Profile>> {
        let profiles = self.list_profiles().await?;
        let fallback = profiles.first().cloned();
        Ok(profiles.into_iter().find(|p| p.is_default).or(fallback))
    }
}

/// In-memory profile store (for testing and development)
pub struct InMemoryProfileStore {
    profiles: RwLock<BTreeMap<u64, Profile>>,
    next_id: AtomicU64,
}

impl InMemoryProfileStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            profiles: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn list_profiles(&self) -> ProfileResult<Vec<Profile>> {
        Ok(self.profiles.read().values().cloned().collect())
    }

    async fn get_profile(&self, id: u64) -> ProfileResult<Profile> {
        self.profiles
            .read()
            .get(&id)
            .cloned()
            .ok_or(ProfileError::NotFound(id))
    }

    async fn create_profile(&self, input: NewProfile) -> ProfileResult<Profile> {
        let mut profile = Profile {
            id: 0,
            name: input.name,
            weight_throughput: input.weight_throughput,
            weight_delay: input.weight_delay,
            weight_loss: input.weight_loss,
            switching_margin: input.switching_margin,
            decision_interval: input.decision_interval,
            is_default: input.is_default,
            created_at: Utc::now(),
        };
        validate(&profile)?;

        profile.id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.profiles.write().insert(profile.id, profile.clone());
        tracing::debug!(id = profile.id, name = %profile.name, "profile created");
        Ok(profile)
    }

    async fn update_profile(&self, id: u64, update: ProfileUpdate) -> ProfileResult<Profile> {
        let mut profiles = self.profiles.write();
        let current = profiles.get_mut(&id).ok_or(ProfileError::NotFound(id))?;

        let mut next = current.clone();
        update.apply(&mut next);
        validate(&next)?;

        *current = next.clone();
        Ok(next)
    }

    async fn delete_profile(&self, id: u64) -> ProfileResult<()> {
        self.profiles
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(ProfileError::NotFound(id))
    }
}

/// Built-in profiles seeded into an empty store
pub fn default_profiles() -> Vec<NewProfile> {
    vec![
        NewProfile {
            is_default: true,
            ..NewProfile::named("Default Balanced")
        },
        NewProfile {
            name: "Throughput Priority".into(),
            weight_throughput: 0.8,
            weight_delay: 0.1,
            weight_loss: 0.1,
            switching_margin: 2.0,
            decision_interval: 500,
            is_default: false,
        },
    ]
}

/// Seed the built-in profiles if the store is empty; returns how many were created
pub async fn seed_defaults<S: ProfileStore + ?Sized>(store: &S) -> ProfileResult<usize> {
    if !store.list_profiles().await?.is_empty() {
        return Ok(0);
    }

    let defaults = default_profiles();
    let count = defaults.len();
    for profile in defaults {
        store.create_profile(profile).await?;
    }
    tracing::info!(count, "seeded default profiles");
    Ok(count)
}
