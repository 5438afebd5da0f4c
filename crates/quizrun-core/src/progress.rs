//! Stars and badges earned across tests.

use std::collections::BTreeSet;
use std::fmt;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::store::{KeyValueStore, KEY_BADGES, KEY_STAR_COUNT};

/// Badges unlocked by reaching a star count. Ordered by threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl Badge {
    pub const ALL: [Badge; 5] = [
        Badge::Bronze,
        Badge::Silver,
        Badge::Gold,
        Badge::Platinum,
        Badge::Diamond,
    ];

    /// Stars required to unlock this badge.
    pub fn threshold(self) -> u32 {
        match self {
            Badge::Bronze => 5,
            Badge::Silver => 10,
            Badge::Gold => 25,
            Badge::Platinum => 50,
            Badge::Diamond => 100,
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Badge::Bronze => write!(f, "Bronze"),
            Badge::Silver => write!(f, "Silver"),
            Badge::Gold => write!(f, "Gold"),
            Badge::Platinum => write!(f, "Platinum"),
            Badge::Diamond => write!(f, "Diamond"),
        }
    }
}

/// The user's star count and unlocked badges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Progress {
    stars: u32,
    badges: BTreeSet<Badge>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Unlocked badges, lowest threshold first.
    pub fn badges(&self) -> Vec<Badge> {
        self.badges.iter().copied().collect()
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    /// The next badge to unlock and the stars still missing for it.
    pub fn next_badge(&self) -> Option<(Badge, u32)> {
        Badge::ALL
            .into_iter()
            .find(|b| !self.has_badge(*b))
            .map(|b| (b, b.threshold().saturating_sub(self.stars)))
    }

    /// Add `n` stars and return any badges unlocked as a result.
    pub fn add_stars(&mut self, n: u32) -> Vec<Badge> {
        self.stars = self.stars.saturating_add(n);
        self.unlock_eligible()
    }

    /// Unlock every badge whose threshold the star count has reached.
    pub fn unlock_eligible(&mut self) -> Vec<Badge> {
        let mut unlocked = Vec::new();
        for badge in Badge::ALL {
            if self.stars >= badge.threshold() && self.badges.insert(badge) {
                tracing::info!("badge unlocked: {badge}");
                unlocked.push(badge);
            }
        }
        unlocked
    }

    pub fn reset(&mut self) {
        self.stars = 0;
        self.badges.clear();
    }

    /// Load progress from `store`.
    ///
    /// A missing or unparseable star count reads as zero. Unparseable badge
    /// data is discarded and removed. Badges are then re-checked against the
    /// star count.
    pub fn load(store: &dyn KeyValueStore) -> Result<Self> {
        let stars = store
            .get(KEY_STAR_COUNT)?
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let badges = match store.get(KEY_BADGES)? {
            None => BTreeSet::new(),
            Some(saved) => match serde_json::from_str::<BTreeSet<Badge>>(&saved) {
                Ok(badges) => {
                    tracing::debug!("loaded {} badges from storage", badges.len());
                    badges
                }
                Err(e) => {
                    tracing::warn!("badge data has an unexpected format, clearing badges: {e}");
                    store.remove(KEY_BADGES)?;
                    BTreeSet::new()
                }
            },
        };

        let mut progress = Self { stars, badges };
        if !progress.unlock_eligible().is_empty() {
            progress.save(store)?;
        }
        Ok(progress)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(KEY_STAR_COUNT, &self.stars.to_string())?;
        let badges = serde_json::to_string(&self.badges).context("failed to serialize badges")?;
        store.set(KEY_BADGES, &badges)?;
        Ok(())
    }
}
