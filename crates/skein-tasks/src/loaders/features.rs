//! Named feature detectors with memoised results

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Probe that reports whether a feature is available
pub type Detector = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
enum Probe {
    Pending(Detector),
    Known(bool),
}

/// Registry of feature detectors.
///
/// A detector runs on the first query for its feature and its answer is
/// remembered. Queries racing that first one may run the detector too; a
/// detector that panics stays pending. Unknown features are unsupported.
#[derive(Default)]
pub struct FeatureDetectors {
    probes: Mutex<HashMap<String, Probe>>,
}

impl FeatureDetectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the detector for `feature`
    pub fn add<F>(&self, feature: impl Into<String>, detector: F) -> bool
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        let feature = feature.into();
        if feature.trim().is_empty() {
            return false;
        }
        self.lock()
            .insert(feature, Probe::Pending(Arc::new(detector)));
        true
    }

    /// Record a known answer without a detector
    pub fn set(&self, feature: impl Into<String>, supported: bool) {
        self.lock().insert(feature.into(), Probe::Known(supported));
    }

    /// Whether `feature` is supported, running its detector on first use
    pub fn supports(&self, feature: &str) -> bool {
        let probe = self.lock().get(feature).cloned();
        let detector = match probe {
            Some(Probe::Known(answer)) => return answer,
            Some(Probe::Pending(detector)) => detector,
            None => return false,
        };

        // lock released: detectors may query other features
        let answer = detector();
        let mut probes = self.lock();
        if let Some(probe @ Probe::Pending(_)) = probes.get_mut(feature) {
            if matches!(probe, Probe::Pending(current) if Arc::ptr_eq(current, &detector)) {
                *probe = Probe::Known(answer);
            }
        }
        answer
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Probe>> {
        self.probes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for FeatureDetectors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        f.debug_struct("FeatureDetectors").field("features", &names).finish()
    }
}
