use crate::{Bbox, Period};
use serde::{Deserialize, Serialize};

/// A spatiotemporal bounding box: a [Bbox] plus the [Period] it spans.
///
/// The pure counterpart of the store's `STBOX`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stbox {
    /// The spatial extent.
    pub bbox: Bbox,

    /// The temporal extent.
    pub period: Period,
}

impl Stbox {
    /// Creates a new stbox.
    pub fn new(bbox: Bbox, period: Period) -> Stbox {
        Stbox { bbox, period }
    }

    /// Extends this stbox to cover the other.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::{Bbox, Period, Stbox, datetime};
    /// let day = |s| datetime::parse(s).unwrap();
    /// let mut stbox = Stbox::new(
    ///     Bbox::new(0., 0., 1., 1.),
    ///     Period::new(day("2011-07-14"), day("2011-07-15")).unwrap(),
    /// );
    /// stbox.extend(&Stbox::new(
    ///     Bbox::new(2., 2., 3., 3.),
    ///     Period::new(day("2011-07-16"), day("2011-07-17")).unwrap(),
    /// ));
    /// assert_eq!(stbox.bbox, Bbox::new(0., 0., 3., 3.));
    /// ```
    pub fn extend(&mut self, other: &Stbox) {
        self.bbox.update(other.bbox);
        self.period.extend(&other.period);
    }

    /// Folds an stbox into an optional accumulator, used when aggregating
    /// extents over a result set.
    pub fn accumulate(accumulator: &mut Option<Stbox>, other: &Stbox) {
        match accumulator {
            Some(stbox) => stbox.extend(other),
            None => *accumulator = Some(*other),
        }
    }
}
