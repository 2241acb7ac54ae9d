//! Smoothed compass heading from raw accelerometer and magnetometer streams

use core::ops::{Deref, DerefMut};

use log::{debug, trace};
use nalgebra::Vector3;

use crate::compass;
use crate::error::Result;
use crate::math::{LowPass, RAD_TO_DEG, normalize_degrees, wrap_degrees};
use crate::types::{EstimatorSettings, Orientation, OrientationSample, SensorKind};

/// Host sensor subsystem delivering raw samples
///
/// Implementations register with the platform's accelerometer and
/// magnetometer and forward every sample to [`HeadingEstimator::on_sample`]
/// in arrival order. A missing sensor is not an error: `subscribe` should
/// succeed and the estimator simply never updates.
pub trait SensorSource {
    /// Start delivering samples from both raw streams
    fn subscribe(&mut self) -> Result<()>;

    /// Stop delivering samples
    fn unsubscribe(&mut self);
}

/// Filter state owned by the heading estimator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterState {
    /// Low-passed accelerometer vector, `None` until the first accelerometer sample
    pub smoothed_gravity: Option<Vector3<f32>>,
    /// Low-passed magnetometer vector, `None` until the first magnetometer sample
    pub smoothed_geomagnetic: Option<Vector3<f32>>,
    /// Smoothed azimuth in degrees, always in [0, 360)
    pub smoothed_azimuth_degrees: f32,
}

/// Two-stage exponential heading filter
///
/// Stage one low-passes each raw vector channel. Stage two derives the raw
/// azimuth through the rotation matrix and low-passes the azimuth itself,
/// blending along the shortest arc so the output never spins across north.
#[derive(Debug, Clone, Copy)]
pub struct HeadingFilter {
    settings: EstimatorSettings,
    state: FilterState,
    orientation: Option<Orientation>,
}

impl HeadingFilter {
    /// Create a filter with default settings
    pub fn new() -> Self {
        Self::with_settings(EstimatorSettings::default())
    }

    /// Create a filter with the specified settings
    pub fn with_settings(settings: EstimatorSettings) -> Self {
        Self {
            settings,
            state: FilterState::default(),
            orientation: None,
        }
    }

    /// Feed one raw sample
    ///
    /// # Returns
    /// The new smoothed azimuth in degrees when it was recomputed, `None`
    /// while one of the vectors is still missing or when the geometry is
    /// degenerate (the previous azimuth is kept).
    pub fn update(&mut self, sample: &OrientationSample) -> Option<f32> {
        let alpha = self.settings.smoothing_factor;

        if !sample.values.iter().all(|v| v.is_finite()) {
            trace!("ignoring non-finite {:?} sample", sample.kind);
            return None;
        }

        let slot = match sample.kind {
            SensorKind::Accelerometer => &mut self.state.smoothed_gravity,
            SensorKind::Magnetometer => &mut self.state.smoothed_geomagnetic,
        };
        let filtered = match *slot {
            Some(smoothed) => smoothed.low_pass(&sample.values, alpha),
            None => sample.values,
        };
        *slot = Some(filtered);

        let (Some(gravity), Some(geomagnetic)) =
            (self.state.smoothed_gravity, self.state.smoothed_geomagnetic)
        else {
            return None;
        };

        let Some(rotation) = compass::rotation_matrix(gravity, geomagnetic) else {
            debug!(
                "degenerate rotation matrix, holding azimuth at {:.1}°",
                self.state.smoothed_azimuth_degrees
            );
            return None;
        };

        let orientation = compass::orientation(&rotation);
        let raw_azimuth = orientation.azimuth * RAD_TO_DEG;
        if !raw_azimuth.is_finite() {
            return None;
        }
        let previous = self.state.smoothed_azimuth_degrees;
        let smoothed = previous + (1.0 - alpha) * wrap_degrees(raw_azimuth - previous);

        self.orientation = Some(orientation);
        self.state.smoothed_azimuth_degrees = normalize_degrees(smoothed);

        Some(self.state.smoothed_azimuth_degrees)
    }

    /// Latest smoothed azimuth in degrees, in [0, 360)
    pub fn azimuth(&self) -> f32 {
        self.state.smoothed_azimuth_degrees
    }

    /// Current filter state
    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Unsmoothed orientation from the most recent successful update
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Get current settings
    pub fn settings(&self) -> EstimatorSettings {
        self.settings
    }

    /// Clear all state back to the initial values
    pub fn reset(&mut self) {
        self.state = FilterState::default();
        self.orientation = None;
    }
}

impl Default for HeadingFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle identifying a registered azimuth listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type AzimuthListener = Box<dyn FnMut(f32)>;

/// Heading estimator with an explicit sensor subscription lifecycle
///
/// Owns the [`SensorSource`] and the [`HeadingFilter`]. Samples are fed
/// through `&mut self`, so updates are serialized and applied in arrival
/// order. The subscription is released by [`stop`](Self::stop), by dropping
/// the guard returned from [`listen`](Self::listen), or by dropping the
/// estimator itself.
///
/// # Example
/// ```
/// use park_compass::{HeadingEstimator, OrientationSample, SensorSource};
///
/// struct HostSensors;
///
/// impl SensorSource for HostSensors {
///     fn subscribe(&mut self) -> park_compass::Result<()> {
///         Ok(())
///     }
///     fn unsubscribe(&mut self) {}
/// }
///
/// let mut estimator = HeadingEstimator::new(HostSensors);
/// {
///     let mut listening = estimator.listen().unwrap();
///     listening.on_sample(OrientationSample::accelerometer(0.0, 0.0, 9.81));
///     listening.on_sample(OrientationSample::magnetometer(0.0, 20.0, -40.0));
/// } // unsubscribed here
///
/// assert!(!estimator.is_listening());
/// assert!(estimator.current_azimuth_degrees() < 360.0);
/// ```
pub struct HeadingEstimator<S: SensorSource> {
    source: S,
    filter: HeadingFilter,
    listening: bool,
    listeners: Vec<(ListenerId, AzimuthListener)>,
    next_listener_id: u64,
}

impl<S: SensorSource> HeadingEstimator<S> {
    /// Create an estimator with default settings
    pub fn new(source: S) -> Self {
        Self::with_settings(source, EstimatorSettings::default())
    }

    /// Create an estimator with the specified settings
    pub fn with_settings(source: S, settings: EstimatorSettings) -> Self {
        Self {
            source,
            filter: HeadingFilter::with_settings(settings),
            listening: false,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }

    /// Subscribe to the raw sensor streams
    ///
    /// Starts a fresh filter session. Calling `start` while already
    /// listening does nothing, so the source is never subscribed twice.
    pub fn start(&mut self) -> Result<()> {
        if self.listening {
            trace!("heading estimator already listening");
            return Ok(());
        }

        self.source.subscribe()?;
        self.filter.reset();
        self.listening = true;
        debug!("heading estimator started");
        Ok(())
    }

    /// Unsubscribe from the raw sensor streams
    ///
    /// The last azimuth stays readable after stopping. Calling `stop` when
    /// not listening does nothing.
    pub fn stop(&mut self) {
        if !self.listening {
            return;
        }

        self.source.unsubscribe();
        self.listening = false;
        debug!("heading estimator stopped at {:.1}°", self.filter.azimuth());
    }

    /// Start listening and return a guard that stops on drop
    pub fn listen(&mut self) -> Result<Listening<'_, S>> {
        self.start()?;
        Ok(Listening { estimator: self })
    }

    /// Whether the sensor subscription is active
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Feed one raw sample from the sensor source
    ///
    /// Samples arriving while not listening (late deliveries after `stop`)
    /// are dropped. Registered listeners are notified whenever the azimuth
    /// is recomputed.
    pub fn on_sample(&mut self, sample: OrientationSample) {
        if !self.listening {
            trace!("dropping {:?} sample, estimator not listening", sample.kind);
            return;
        }

        if let Some(azimuth) = self.filter.update(&sample) {
            trace!("azimuth {:.2}°", azimuth);
            for (_, listener) in self.listeners.iter_mut() {
                listener(azimuth);
            }
        }
    }

    /// Latest smoothed azimuth in degrees, in [0, 360)
    ///
    /// May be stale: if a sensor is missing on the host the value never
    /// changes from its initial 0.
    pub fn current_azimuth_degrees(&self) -> f32 {
        self.filter.azimuth()
    }

    /// Register a listener called with every new azimuth
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(f32) + 'static,
    {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener, returning whether it was registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Current filter state
    pub fn filter_state(&self) -> &FilterState {
        self.filter.state()
    }

    /// Unsmoothed orientation from the most recent successful update
    pub fn orientation(&self) -> Option<Orientation> {
        self.filter.orientation()
    }

    /// Access the owned sensor source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the sensor source
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: SensorSource> Drop for HeadingEstimator<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Scoped sensor subscription returned by [`HeadingEstimator::listen`]
///
/// Dereferences to the estimator so samples can be fed through it, and
/// stops the estimator when dropped.
pub struct Listening<'a, S: SensorSource> {
    estimator: &'a mut HeadingEstimator<S>,
}

impl<S: SensorSource> Deref for Listening<'_, S> {
    type Target = HeadingEstimator<S>;

    fn deref(&self) -> &Self::Target {
        self.estimator
    }
}

impl<S: SensorSource> DerefMut for Listening<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.estimator
    }
}

impl<S: SensorSource> Drop for Listening<'_, S> {
    fn drop(&mut self) {
        self.estimator.stop();
    }
}
