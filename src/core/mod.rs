pub mod flash;
pub mod generator;
pub mod population;
pub mod random;
pub mod timer;

use std::time::Duration;

use tracing::{debug, info};

use crate::{
    config::{ConfigError, Tuning},
    types::{ItemId, Layer, SurfaceStats},
};

use self::{flash::FlashScheduler, population::Population, random::RandomSource, timer::Interval};

/// Spread applied below the millisecond timestamp of grown items.
const GROWTH_ID_JITTER: usize = 1000;

/// Owns the population, the flash flag and every timer that mutates them.
/// Dropping or unmounting the surface releases all timers.
pub struct EffectSurface {
    tuning: Tuning,
    population: Population,
    flash: FlashScheduler,
    grow_timer: Interval,
    flash_timer: Interval,
    source: Box<dyn RandomSource>,
    epoch_ms: u64,
    elapsed: Duration,
    flashes: u64,
}

impl EffectSurface {
    /// Seeds the population and starts the growth and flash cadences.
    /// `epoch_ms` anchors the time-derived ids of grown items.
    pub fn mount(
        tuning: Tuning,
        mut source: Box<dyn RandomSource>,
        epoch_ms: u64,
    ) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let population = Population::seeded(source.as_mut(), &tuning);
        info!(
            seeded = population.len(),
            cap = population.cap(),
            "effect surface mounted"
        );
        Ok(Self {
            flash: FlashScheduler::new(tuning.flash_threshold, tuning.flash_hold),
            grow_timer: Interval::new(tuning.grow_interval),
            flash_timer: Interval::new(tuning.flash_interval),
            tuning,
            population,
            source,
            epoch_ms,
            elapsed: Duration::ZERO,
            flashes: 0,
        })
    }

    /// Runs every timer deadline inside `dt` in time order.
    /// Simultaneous deadlines run as: flash reset, growth, flash draw.
    pub fn advance(&mut self, dt: Duration) {
        let mut remaining = dt;
        loop {
            let next = self.next_deadline();
            if next > remaining {
                self.elapse(remaining);
                return;
            }
            self.elapse(next);
            remaining -= next;

            self.flash.take_reset();
            if self.grow_timer.take_due() {
                self.grow();
            }
            if self.flash_timer.take_due() && self.flash.on_interval(self.source.as_mut()) {
                self.flashes += 1;
            }
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn flash_active(&self) -> bool {
        self.flash.is_active()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn stats(&self) -> SurfaceStats {
        let mut per_layer = [0; crate::types::LAYER_COUNT];
        for layer in Layer::ALL {
            per_layer[layer.index()] = self.population.layer(layer).count();
        }
        SurfaceStats {
            population: self.population.len(),
            cap: self.population.cap(),
            per_layer,
            flashes: self.flashes,
            flash_active: self.flash.is_active(),
            elapsed_secs: self.elapsed.as_secs_f64(),
        }
    }

    /// Tears the surface down. No timer can fire afterwards.
    pub fn unmount(mut self) -> SurfaceStats {
        self.flash.cancel();
        let stats = self.stats();
        info!(
            population = stats.population,
            cap = stats.cap,
            per_layer = ?stats.per_layer,
            flashes = stats.flashes,
            flash_active = stats.flash_active,
            elapsed_secs = stats.elapsed_secs,
            "effect surface unmounted"
        );
        stats
    }

    fn next_deadline(&self) -> Duration {
        let mut next = self.grow_timer.due_in().min(self.flash_timer.due_in());
        if let Some(reset) = self.flash.reset_due_in() {
            next = next.min(reset);
        }
        next
    }

    fn elapse(&mut self, dt: Duration) {
        self.elapsed += dt;
        self.grow_timer.elapse(dt);
        self.flash_timer.elapse(dt);
        self.flash.elapse(dt);
    }

    fn grow(&mut self) {
        if self.population.is_full() {
            return;
        }
        let candidate = self.growth_candidate();
        if let Some(id) = self
            .population
            .grow(candidate, self.source.as_mut(), &self.tuning)
        {
            debug!(%id, population = self.population.len(), "item added");
            if self.population.is_full() {
                info!(cap = self.population.cap(), "population cap reached");
            }
        }
    }

    /// Wall-clock milliseconds scaled up with a random low part.
    fn growth_candidate(&mut self) -> ItemId {
        let millis = self
            .epoch_ms
            .saturating_add(self.elapsed.as_millis() as u64);
        let jitter = self.source.index(GROWTH_ID_JITTER) as u64;
        ItemId(
            millis
                .saturating_mul(GROWTH_ID_JITTER as u64)
                .saturating_add(jitter),
        )
    }
}

impl Drop for EffectSurface {
    fn drop(&mut self) {
        debug!("effect surface timers released");
    }
}
