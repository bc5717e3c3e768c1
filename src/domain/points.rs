//! Reward points for completed pickups.
//!
//! Each known waste type maps to an inclusive range of points. A value is
//! drawn from the range every time a request is completed, so the same
//! request can earn a different total on different runs. The draw goes
//! through a [`Sampler`] so that callers can substitute a deterministic
//! source.

use std::collections::HashMap;

use rand::Rng;

/// An inclusive range of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointRange {
    /// Lowest value that can be drawn.
    pub min: u64,
    /// Highest value that can be drawn.
    pub max: u64,
}

impl PointRange {
    const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether `points` falls inside the range.
    #[must_use]
    pub const fn contains(&self, points: u64) -> bool {
        self.min <= points && points <= self.max
    }
}

/// Points for the waste types the dashboard knows about.
pub const POINT_TABLE: [(&str, PointRange); 8] = [
    ("Plastic Bottles", PointRange::new(150, 350)),
    ("Paper/Cardboard", PointRange::new(100, 250)),
    ("Metal Cans", PointRange::new(200, 450)),
    ("E-waste", PointRange::new(300, 600)),
    ("Glass Bottles", PointRange::new(120, 300)),
    ("Plastic Containers", PointRange::new(130, 300)),
    ("Organic Waste", PointRange::new(80, 180)),
    ("Mixed Plastic", PointRange::new(150, 350)),
];

/// Points for a waste type that is not in [`POINT_TABLE`].
pub const DEFAULT_UNKNOWN_POINTS: u64 = 100;

/// Looks up the point range for a waste-type label.
///
/// Labels are matched exactly.
#[must_use]
pub fn range_for(label: &str) -> Option<PointRange> {
    POINT_TABLE
        .iter()
        .find(|(known, _)| *known == label)
        .map(|(_, range)| *range)
}

/// A source of point values.
pub trait Sampler {
    /// Draws a value from `range`, both ends included.
    fn sample(&mut self, range: PointRange) -> u64;
}

/// Draws uniformly using a [`rand`] generator.
#[derive(Debug, Clone)]
pub struct RandomSampler<R>(R);

impl<R: Rng> RandomSampler<R> {
    /// Wraps a random number generator.
    pub const fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RandomSampler<rand::rngs::ThreadRng> {
    /// A sampler backed by the thread-local generator.
    #[must_use]
    pub fn thread_local() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> Sampler for RandomSampler<R> {
    fn sample(&mut self, range: PointRange) -> u64 {
        self.0.gen_range(range.min..=range.max)
    }
}

/// Scores a list of waste-type labels.
///
/// Unknown labels are worth `unknown_points`. Every distinct known label is
/// drawn once per call; a label that appears twice contributes that value
/// twice.
pub fn score<'a, S>(
    labels: impl IntoIterator<Item = &'a str>,
    sampler: &mut S,
    unknown_points: u64,
) -> u64
where
    S: Sampler + ?Sized,
{
    let mut drawn: HashMap<&str, u64> = HashMap::new();
    labels
        .into_iter()
        .map(|label| {
            *drawn.entry(label).or_insert_with(|| {
                range_for(label).map_or(unknown_points, |range| sampler.sample(range))
            })
        })
        .fold(0, u64::saturating_add)
}
