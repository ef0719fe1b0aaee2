use crate::{DatetimeInterval, Error, Leaf, Result};
use mf::Bbox;
use serde::{Deserialize, Serialize};

/// The largest accepted `limit` value.
pub const MAX_LIMIT: u64 = 10_000;

/// Raw GET parameters shared by the moving-features list endpoints.
///
/// Everything is a string at this stage; [Params] is the validated form.
#[derive(Clone, Default, Debug, Serialize, Deserialize)]
pub struct GetParams {
    /// Requested bounding box: 4 or 6 comma-separated numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<String>,

    /// Single instant, or a closed interval with a `/` separator.
    ///
    /// Use double dots `..` (or an empty side) for open ranges.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Comma-separated instants at which to sample temporal sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leaf: Option<String>,

    /// The maximum number of results to return (page size).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// The number of results to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,

    /// When true, trajectories are clipped to the `datetime` interval.
    #[serde(rename = "subTrajectory", skip_serializing_if = "Option::is_none")]
    pub sub_trajectory: Option<String>,

    /// When true, property value sequences are clipped to the `datetime`
    /// interval.
    #[serde(rename = "subTemporalValue", skip_serializing_if = "Option::is_none")]
    pub sub_temporal_value: Option<String>,

    /// The requested format token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,

    /// The requested language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl GetParams {
    /// Returns the parameters for the next page: the same query with the
    /// format token dropped and the offset replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::GetParams;
    /// let params = GetParams {
    ///     limit: Some("10".to_string()),
    ///     f: Some("json".to_string()),
    ///     ..Default::default()
    /// };
    /// let next = params.next_page(10);
    /// assert_eq!(
    ///     serde_urlencoded::to_string(next).unwrap(),
    ///     "limit=10&offset=10"
    /// );
    /// ```
    pub fn next_page(&self, offset: u64) -> GetParams {
        GetParams {
            f: None,
            offset: Some(offset.to_string()),
            ..self.clone()
        }
    }
}

/// Validated parameters for the moving-features list endpoints.
#[derive(Clone, Debug, Default)]
pub struct Params {
    /// Requested bounding box.
    pub bbox: Option<Bbox>,

    /// Requested datetime interval.
    pub datetime: Option<DatetimeInterval>,

    /// Requested sample instants.
    pub leaf: Option<Leaf>,

    /// Requested page size; the server default applies when absent.
    pub limit: Option<u64>,

    /// Number of results to skip.
    pub offset: u64,

    /// Clip trajectories to the `datetime` interval.
    pub sub_trajectory: bool,

    /// Clip property value sequences to the `datetime` interval.
    pub sub_temporal_value: bool,
}

impl Params {
    /// Runs the cross-parameter validity checks and returns the parameters
    /// unchanged if they pass.
    ///
    /// `leaf` requests an exact sample set while the sub-selection flags
    /// request interval clipping; combining them is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use mf_api::Params;
    /// let params = Params::default().valid().unwrap();
    /// ```
    pub fn valid(self) -> Result<Params> {
        if self.leaf.is_some() {
            if self.sub_trajectory {
                return Err(Error::LeafConflict("subTrajectory"));
            }
            if self.sub_temporal_value {
                return Err(Error::LeafConflict("subTemporalValue"));
            }
        }
        Ok(self)
    }
}

impl TryFrom<GetParams> for Params {
    type Error = Error;

    fn try_from(get_params: GetParams) -> Result<Params> {
        let bbox = get_params.bbox.as_deref().map(parse_bbox).transpose()?;
        let datetime = get_params
            .datetime
            .as_deref()
            .map(|datetime| datetime.parse::<DatetimeInterval>())
            .transpose()?;
        let leaf = get_params
            .leaf
            .as_deref()
            .map(|leaf| leaf.parse::<Leaf>())
            .transpose()?;
        let limit = get_params
            .limit
            .as_deref()
            .map(|limit| {
                let limit: u64 = limit.parse()?;
                if limit == 0 || limit > MAX_LIMIT {
                    Err(Error::InvalidLimit(limit))
                } else {
                    Ok(limit)
                }
            })
            .transpose()?;
        let offset = get_params
            .offset
            .as_deref()
            .map(str::parse::<u64>)
            .transpose()?
            .unwrap_or(0);
        Ok(Params {
            bbox,
            datetime,
            leaf,
            limit,
            offset,
            sub_trajectory: parse_flag(get_params.sub_trajectory.as_deref())?,
            sub_temporal_value: parse_flag(get_params.sub_temporal_value.as_deref())?,
        })
    }
}

fn parse_bbox(s: &str) -> Result<Bbox> {
    let values = s
        .split(',')
        .map(|value| value.trim().parse::<f64>().map_err(Error::from))
        .collect::<Result<Vec<_>>>()?;
    let bbox = Bbox::try_from(values)
        .map_err(|_| Error::InvalidBbox(s.to_string(), "expected 4 or 6 values"))?;
    if bbox.is_valid() {
        Ok(bbox)
    } else {
        Err(Error::InvalidBbox(
            s.to_string(),
            "a minimum exceeds its maximum",
        ))
    }
}

/// The source tolerated both booleans and their string spellings for the
/// sub-selection flags, so any ASCII casing of `true`/`false` is accepted.
fn parse_flag(flag: Option<&str>) -> Result<bool> {
    match flag {
        None => Ok(false),
        Some(flag) => {
            if flag.eq_ignore_ascii_case("true") {
                Ok(true)
            } else if flag.eq_ignore_ascii_case("false") {
                Ok(false)
            } else {
                Err(Error::InvalidBoolean(flag.to_string()))
            }
        }
    }
}
