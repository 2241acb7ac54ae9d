//! Car finder: live fixes, device heading and the parked target

use log::{debug, info};

use crate::error::Result;
use crate::projector::DirectionalProjector;
use crate::store::ParkedLocationStore;
use crate::types::{DirectionResult, FinderSettings, GeoCoordinate, LocationFix};

/// Accuracy gate for live location fixes
///
/// # Example
/// ```
/// use park_compass::{FixGate, GeoCoordinate, LocationFix};
///
/// let gate = FixGate::default();
/// let here = GeoCoordinate::new(51.1279, 1.3136).unwrap();
/// assert!(gate.accepts(&LocationFix::new(here, 12.0)));
/// assert!(!gate.accepts(&LocationFix::new(here, 45.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixGate {
    /// Largest accepted accuracy radius in meters
    pub max_accuracy_meters: f32,
}

impl FixGate {
    /// Create a gate accepting fixes up to `max_accuracy_meters`
    pub fn new(max_accuracy_meters: f32) -> Self {
        Self { max_accuracy_meters }
    }

    /// Whether the fix is accurate enough to be used
    pub fn accepts(&self, fix: &LocationFix) -> bool {
        fix.accuracy_meters.is_finite() && fix.accuracy_meters <= self.max_accuracy_meters
    }
}

impl Default for FixGate {
    fn default() -> Self {
        Self::new(FinderSettings::default().max_fix_accuracy_meters)
    }
}

/// Keeps the latest inputs and recomputes the direction to the car
///
/// Each input update (new azimuth, new accepted fix, new target) returns the
/// recomputed [`DirectionResult`], or `None` while the user position or the
/// parked location is still unknown.
///
/// # Example
/// ```
/// use park_compass::{CarFinder, GeoCoordinate, LocationFix, MemoryStore};
///
/// let car = GeoCoordinate::new(51.1289, 1.3136).unwrap();
/// let mut finder = CarFinder::new(MemoryStore::with_location(car)).unwrap();
///
/// let here = GeoCoordinate::new(51.1279, 1.3136).unwrap();
/// let direction = finder.on_fix(LocationFix::new(here, 5.0)).unwrap();
/// assert!(direction.relative_angle_degrees.abs() < 1e-3);
/// ```
pub struct CarFinder<S: ParkedLocationStore> {
    store: S,
    gate: FixGate,
    projector: DirectionalProjector,
    azimuth: f32,
    user: Option<GeoCoordinate>,
    target: Option<GeoCoordinate>,
}

impl<S: ParkedLocationStore> CarFinder<S> {
    /// Create a finder with default settings, loading the target from `store`
    pub fn new(store: S) -> Result<Self> {
        Self::with_settings(store, FinderSettings::default())
    }

    /// Create a finder with the specified settings
    pub fn with_settings(store: S, settings: FinderSettings) -> Result<Self> {
        let target = store.load()?;
        Ok(Self {
            store,
            gate: FixGate::new(settings.max_fix_accuracy_meters),
            projector: DirectionalProjector::with_settings(settings.projector),
            azimuth: 0.0,
            user: None,
            target,
        })
    }

    /// Feed a live location fix
    ///
    /// Fixes failing the accuracy gate are discarded and leave the previous
    /// user position in place.
    pub fn on_fix(&mut self, fix: LocationFix) -> Option<DirectionResult> {
        if !self.gate.accepts(&fix) {
            debug!(
                "discarding fix with accuracy {:.1} m (limit {:.1} m)",
                fix.accuracy_meters, self.gate.max_accuracy_meters
            );
            return self.direction();
        }

        self.user = Some(fix.coordinate);
        self.direction()
    }

    /// Feed a new smoothed device azimuth in degrees
    pub fn on_azimuth(&mut self, azimuth_degrees: f32) -> Option<DirectionResult> {
        self.azimuth = azimuth_degrees;
        self.direction()
    }

    /// Re-read the parked location from the store
    pub fn refresh_target(&mut self) -> Result<Option<DirectionResult>> {
        self.target = self.store.load()?;
        Ok(self.direction())
    }

    /// Save `location` as the parked car and make it the target
    ///
    /// This is the one-shot "park here" fix; it is stored as reported.
    pub fn park_here(&mut self, location: GeoCoordinate) -> Result<()> {
        self.store.upsert(location)?;
        self.target = Some(location);
        info!(
            "parked at {:.6}, {:.6}",
            location.latitude(),
            location.longitude()
        );
        Ok(())
    }

    /// Current direction to the car, if both positions are known
    pub fn direction(&self) -> Option<DirectionResult> {
        let user = self.user.as_ref()?;
        let target = self.target.as_ref()?;
        Some(self.projector.direction(self.azimuth, user, target))
    }

    /// Last accepted user position
    pub fn user_location(&self) -> Option<GeoCoordinate> {
        self.user
    }

    /// Current parked location
    pub fn target(&self) -> Option<GeoCoordinate> {
        self.target
    }

    /// Latest device azimuth in degrees
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }
}
