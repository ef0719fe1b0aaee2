use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A bounding box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Bbox {
    /// A two-dimensional bounding box.
    TwoDimensional([f64; 4]),

    /// A three-dimensional bounding box.
    ThreeDimensional([f64; 6]),
}

impl Bbox {
    /// Creates a new 2D bbox.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Bbox;
    /// let bbox = Bbox::new(1., 2., 3., 4.);
    /// ```
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Bbox {
        Bbox::TwoDimensional([xmin, ymin, xmax, ymax])
    }

    /// Returns true if the minimum bbox values are smaller than the maximum.
    ///
    /// Antimeridian-crossing bboxes are rejected as ambiguous.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Bbox;
    /// assert!(Bbox::new(1., 2., 3., 4.).is_valid());
    /// assert!(!Bbox::new(4., 3., 2., 1.).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        match self {
            Bbox::TwoDimensional([xmin, ymin, xmax, ymax]) => xmin <= xmax && ymin <= ymax,
            Bbox::ThreeDimensional([xmin, ymin, zmin, xmax, ymax, zmax]) => {
                xmin <= xmax && ymin <= ymax && zmin <= zmax
            }
        }
    }

    /// Updates this bbox with another bbox's values.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Bbox;
    /// let mut bbox = Bbox::new(1., 1., 2., 2.);
    /// bbox.update(Bbox::new(0., 0., 1.5, 1.5));
    /// assert_eq!(bbox, Bbox::new(0., 0., 2., 2.));
    /// ```
    pub fn update(&mut self, other: Bbox) {
        let new = match self {
            Bbox::TwoDimensional([xmin, ymin, xmax, ymax]) => match other {
                Bbox::TwoDimensional([oxmin, oymin, oxmax, oymax]) => {
                    *xmin = xmin.min(oxmin);
                    *ymin = ymin.min(oymin);
                    *xmax = xmax.max(oxmax);
                    *ymax = ymax.max(oymax);
                    None
                }
                Bbox::ThreeDimensional([oxmin, oymin, ozmin, oxmax, oymax, ozmax]) => {
                    Some(Bbox::ThreeDimensional([
                        xmin.min(oxmin),
                        ymin.min(oymin),
                        ozmin,
                        xmax.max(oxmax),
                        ymax.max(oymax),
                        ozmax,
                    ]))
                }
            },
            Bbox::ThreeDimensional([xmin, ymin, zmin, xmax, ymax, zmax]) => match other {
                Bbox::TwoDimensional([oxmin, oymin, oxmax, oymax]) => {
                    *xmin = xmin.min(oxmin);
                    *ymin = ymin.min(oymin);
                    *xmax = xmax.max(oxmax);
                    *ymax = ymax.max(oymax);
                    None
                }
                Bbox::ThreeDimensional([oxmin, oymin, ozmin, oxmax, oymax, ozmax]) => {
                    *xmin = xmin.min(oxmin);
                    *ymin = ymin.min(oymin);
                    *zmin = zmin.min(ozmin);
                    *xmax = xmax.max(oxmax);
                    *ymax = ymax.max(oymax);
                    *zmax = zmax.max(ozmax);
                    None
                }
            },
        };
        if let Some(new) = new {
            let _ = std::mem::replace(self, new);
        }
    }

    /// Returns true if this bbox intersects the other.
    ///
    /// The comparison is 2D unless both boxes carry a vertical extent.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf::Bbox;
    /// assert!(Bbox::new(0., 0., 2., 2.).intersects(&Bbox::new(1., 1., 3., 3.)));
    /// assert!(!Bbox::new(0., 0., 1., 1.).intersects(&Bbox::new(2., 2., 3., 3.)));
    /// ```
    pub fn intersects(&self, other: &Bbox) -> bool {
        let horizontal = self.xmin() <= other.xmax()
            && other.xmin() <= self.xmax()
            && self.ymin() <= other.ymax()
            && other.ymin() <= self.ymax();
        match (self.zmin().zip(self.zmax()), other.zmin().zip(other.zmax())) {
            (Some((zmin, zmax)), Some((ozmin, ozmax))) => {
                horizontal && zmin <= ozmax && ozmin <= zmax
            }
            _ => horizontal,
        }
    }

    /// Returns this bbox's minimum x value.
    pub fn xmin(&self) -> f64 {
        match self {
            Bbox::TwoDimensional([v, _, _, _]) => *v,
            Bbox::ThreeDimensional([v, _, _, _, _, _]) => *v,
        }
    }

    /// Returns this bbox's minimum y value.
    pub fn ymin(&self) -> f64 {
        match self {
            Bbox::TwoDimensional([_, v, _, _]) => *v,
            Bbox::ThreeDimensional([_, v, _, _, _, _]) => *v,
        }
    }

    /// Returns this bbox's minimum z value.
    pub fn zmin(&self) -> Option<f64> {
        match self {
            Bbox::TwoDimensional(_) => None,
            Bbox::ThreeDimensional([_, _, v, _, _, _]) => Some(*v),
        }
    }

    /// Returns this bbox's maximum x value.
    pub fn xmax(&self) -> f64 {
        match self {
            Bbox::TwoDimensional([_, _, v, _]) => *v,
            Bbox::ThreeDimensional([_, _, _, v, _, _]) => *v,
        }
    }

    /// Returns this bbox's maximum y value.
    pub fn ymax(&self) -> f64 {
        match self {
            Bbox::TwoDimensional([_, _, _, v]) => *v,
            Bbox::ThreeDimensional([_, _, _, _, v, _]) => *v,
        }
    }

    /// Returns this bbox's maximum z value.
    pub fn zmax(&self) -> Option<f64> {
        match self {
            Bbox::TwoDimensional(_) => None,
            Bbox::ThreeDimensional([_, _, _, _, _, v]) => Some(*v),
        }
    }
}

impl TryFrom<Vec<f64>> for Bbox {
    type Error = Error;

    fn try_from(bbox: Vec<f64>) -> Result<Bbox> {
        if bbox.len() == 4 {
            Ok(Bbox::TwoDimensional([bbox[0], bbox[1], bbox[2], bbox[3]]))
        } else if bbox.len() == 6 {
            Ok(Bbox::ThreeDimensional([
                bbox[0], bbox[1], bbox[2], bbox[3], bbox[4], bbox[5],
            ]))
        } else {
            Err(Error::InvalidBbox(bbox))
        }
    }
}

impl From<Bbox> for Vec<f64> {
    fn from(bbox: Bbox) -> Vec<f64> {
        match bbox {
            Bbox::TwoDimensional(coordinates) => coordinates.to_vec(),
            Bbox::ThreeDimensional(coordinates) => coordinates.to_vec(),
        }
    }
}

impl Default for Bbox {
    fn default() -> Self {
        Bbox::TwoDimensional([-180., -90., 180., 90.])
    }
}
