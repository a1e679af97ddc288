//! Camera-based occupancy estimation hook
//!
//! An estimator looks at a single image and returns the number of occupied
//! spaces, or `None` when it cannot tell. Nothing in the gate pipeline
//! consumes estimates yet; the trait is the seam a vision model plugs into.

use std::path::Path;

/// Independent occupancy estimate from imagery
pub trait OccupancyEstimator {
    /// Occupied spaces visible in `image`, or None when no estimate is available
    fn estimate(&self, image: &Path) -> Option<u32>;
}

/// Estimator used until a vision model is wired in; never produces an estimate
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimate;

impl OccupancyEstimator for NoEstimate {
    fn estimate(&self, _image: &Path) -> Option<u32> {
        None
    }
}

impl<F> OccupancyEstimator for F
where
    F: Fn(&Path) -> Option<u32>,
{
    fn estimate(&self, image: &Path) -> Option<u32> {
        self(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate_with(estimator: &dyn OccupancyEstimator) -> Option<u32> {
        estimator.estimate(Path::new("frames/lot-a/0001.jpg"))
    }

    #[test]
    fn test_no_estimate() {
        assert_eq!(estimate_with(&NoEstimate), None);
    }

    #[test]
    fn test_closure_estimator() {
        let fixed = |_: &Path| Some(12u32);
        assert_eq!(estimate_with(&fixed), Some(12));
    }

    #[test]
    fn test_closure_can_inspect_path() {
        let by_name = |image: &Path| {
            image.file_stem().and_then(|s| s.to_str()).and_then(|s| s.parse::<u32>().ok())
        };
        assert_eq!(estimate_with(&by_name), Some(1));
    }
}
