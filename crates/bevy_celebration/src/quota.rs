use bevy::prelude::*;

use crate::effects::CelebrationCommandsExt;
use crate::settings::CelebrationSettings;

/// Fired when the user asks for another celebration.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct CelebrateRequested;

/// Fired when the user closes the "out of fireworks" banner.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct DismissBanner;

/// Limits how often the user can start a celebration.
///
/// While the banner is visible, only `limit` celebrations are allowed.
/// Dismissing it buys one more; every recorded celebration shows the banner
/// again, and the counter cycles through `0..=limit`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CelebrationQuota {
    limit: u32,
    count: u32,
    banner_visible: bool,
}

impl CelebrationQuota {
    /// A fresh quota allowing `limit` celebrations.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            count: 0,
            banner_visible: true,
        }
    }

    /// How many celebrations were recorded in the current cycle.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// The configured limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Changes the limit, keeping the current count.
    pub fn set_limit(&mut self, limit: u32) {
        self.limit = limit;
        self.count = self.count.min(limit);
    }

    /// Returns `true` while the banner is shown.
    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// Returns `true` if another celebration may start.
    pub fn can_celebrate(&self) -> bool {
        self.count < self.limit || !self.banner_visible
    }

    /// Returns `true` when the user has used up the quota and the banner is up.
    pub fn is_exhausted(&self) -> bool {
        !self.can_celebrate()
    }

    /// Counts one celebration and shows the banner again.
    pub fn record_celebration(&mut self) {
        // wraps at `limit` without computing `limit + 1`
        self.count = if self.count >= self.limit {
            0
        } else {
            self.count + 1
        };
        self.banner_visible = true;
    }

    /// Hides the banner, allowing one celebration past the limit.
    pub fn dismiss_banner(&mut self) {
        self.banner_visible = false;
    }
}

impl Default for CelebrationQuota {
    fn default() -> Self {
        Self::new(CelebrationSettings::default().timeline.quota)
    }
}

pub(crate) fn init_quota(mut commands: Commands, settings: Res<CelebrationSettings>) {
    commands.insert_resource(CelebrationQuota::new(settings.timeline.quota));
}

pub(crate) fn on_celebrate_requested(
    _event: On<CelebrateRequested>,
    mut commands: Commands,
    mut quota: ResMut<CelebrationQuota>,
) {
    if !quota.can_celebrate() {
        info!("out of fireworks, dismiss the banner to keep celebrating");
        return;
    }

    quota.record_celebration();
    commands.celebrate();
}

pub(crate) fn on_dismiss_banner(_event: On<DismissBanner>, mut quota: ResMut<CelebrationQuota>) {
    quota.dismiss_banner();
}
