//! Parametric SQL composition.
//!
//! [SelectBuilder] accumulates SQL text and its bound parameters together,
//! so a predicate can never reference a placeholder it did not bind. Every
//! parameter travels as text and is cast inside the statement
//! (`$n::uuid`, `$n::stbox`, `$n::period`, ...); the literal helpers render
//! validated parameter types into the store's constructor syntax, and the
//! rendered strings are always bound, never concatenated into the query.

use chrono::{DateTime, Utc};
use mf::{Bbox, datetime};
use mf_api::{DatetimeInterval, Leaf};

/// A SQL statement under construction, with its bound text parameters.
#[derive(Debug)]
pub(crate) struct SelectBuilder {
    sql: String,
    params: Vec<String>,
}

impl SelectBuilder {
    pub(crate) fn new(sql: impl ToString) -> SelectBuilder {
        SelectBuilder {
            sql: sql.to_string(),
            params: Vec::new(),
        }
    }

    /// Appends raw SQL text.
    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Binds a parameter and returns its `$n` placeholder.
    pub(crate) fn bind(&mut self, value: impl ToString) -> String {
        self.params.push(value.to_string());
        format!("${}", self.params.len())
    }

    /// Appends a bbox intersection predicate against an stbox expression.
    pub(crate) fn bbox_predicate(&mut self, expression: &str, bbox: &Bbox) {
        let placeholder = self.bind(stbox_literal(bbox));
        let dimension = match bbox {
            Bbox::TwoDimensional(_) => "box2d",
            Bbox::ThreeDimensional(_) => "box3d",
        };
        self.push(&format!(
            " AND {dimension}({placeholder}::stbox) &&& {dimension}({expression})"
        ));
    }

    /// Appends `LIMIT`/`OFFSET` with bound values.
    ///
    /// Call [SelectBuilder::count_sql] first: counting must see the
    /// statement before paging.
    pub(crate) fn limit_offset(&mut self, limit: u64, offset: u64) {
        let limit = self.bind(limit);
        let offset = self.bind(offset);
        self.push(&format!(" LIMIT {limit}::bigint OFFSET {offset}::bigint"));
    }

    /// Returns the statement that counts this builder's unpaged rows.
    pub(crate) fn count_sql(&self) -> String {
        format!("SELECT count(*) FROM ({}) AS counted", self.sql)
    }

    pub(crate) fn sql(&self) -> &str {
        &self.sql
    }

    pub(crate) fn params(&self) -> &[String] {
        &self.params
    }
}

/// Renders a bbox in the store's `STBOX` constructor syntax.
pub(crate) fn stbox_literal(bbox: &Bbox) -> String {
    match bbox {
        Bbox::TwoDimensional([xmin, ymin, xmax, ymax]) => {
            format!("STBOX X(({xmin},{ymin}),({xmax},{ymax}))")
        }
        Bbox::ThreeDimensional([xmin, ymin, zmin, xmax, ymax, zmax]) => {
            format!("STBOX Z(({xmin},{ymin},{zmin}),({xmax},{ymax},{zmax}))")
        }
    }
}

/// Renders a datetime interval in the store's `period` constructor syntax.
pub(crate) fn period_literal(interval: &DatetimeInterval) -> String {
    format!("[{}]", interval.to_internal())
}

/// Renders a period from bare instants.
pub(crate) fn period_literal_from(lower: DateTime<Utc>, upper: DateTime<Utc>) -> String {
    format!(
        "[{},{}]",
        datetime::format_internal(lower),
        datetime::format_internal(upper)
    )
}

/// Renders a leaf in the store's `timestampset` constructor syntax.
pub(crate) fn timestampset_literal(leaf: &Leaf) -> String {
    format!("{{{}}}", leaf.to_internal())
}

/// Renders instants in the text form of a `timestamptz[]`.
pub(crate) fn timestamp_array_literal(instants: &[DateTime<Utc>]) -> String {
    format!(
        "{{{}}}",
        instants
            .iter()
            .map(|instant| format!("\"{}+00\"", datetime::format_internal(*instant)))
            .collect::<Vec<_>>()
            .join(",")
    )
}

#[cfg(test)]
mod tests {
    use super::SelectBuilder;
    use mf::Bbox;
    use mf_api::{DatetimeInterval, Leaf};

    #[test]
    fn bind_numbers_placeholders() {
        let mut builder = SelectBuilder::new("SELECT 1 WHERE true");
        assert_eq!(builder.bind("a"), "$1");
        assert_eq!(builder.bind(2_i64), "$2");
        assert_eq!(builder.params(), &["a".to_string(), "2".to_string()]);
    }

    #[test]
    fn stbox_literal() {
        assert_eq!(
            super::stbox_literal(&Bbox::new(0., 0., 10., 10.)),
            "STBOX X((0,0),(10,10))"
        );
        assert_eq!(
            super::stbox_literal(&Bbox::ThreeDimensional([0., 0., 1., 10., 10., 2.])),
            "STBOX Z((0,0,1),(10,10,2))"
        );
    }

    #[test]
    fn bbox_predicate_dimension() {
        let mut builder = SelectBuilder::new("SELECT 1 FROM tgeometry WHERE true");
        builder.bbox_predicate("stbox(tgeometry_property)", &Bbox::new(0., 0., 10., 10.));
        assert!(
            builder
                .sql()
                .ends_with(" AND box2d($1::stbox) &&& box2d(stbox(tgeometry_property))")
        );

        let mut builder = SelectBuilder::new("SELECT 1 FROM tgeometry WHERE true");
        builder.bbox_predicate(
            "stbox(tgeometry_property)",
            &Bbox::ThreeDimensional([0., 0., 0., 1., 1., 1.]),
        );
        assert!(builder.sql().contains("box3d($1::stbox)"));
    }

    #[test]
    fn period_literal() {
        let interval: DatetimeInterval = "2020-01-01/2020-01-02".parse().unwrap();
        assert_eq!(
            super::period_literal(&interval),
            "[2020-01-01 00:00:00.000000,2020-01-02 23:59:59.999999]"
        );
    }

    #[test]
    fn timestampset_literal() {
        let leaf: Leaf = "2020-01-01,2020-01-02".parse().unwrap();
        assert_eq!(
            super::timestampset_literal(&leaf),
            "{2020-01-01 00:00:00.000000,2020-01-02 00:00:00.000000}"
        );
    }

    #[test]
    fn count_wraps_unpaged_query() {
        let mut builder = SelectBuilder::new("SELECT a FROM b WHERE true");
        assert_eq!(
            builder.count_sql(),
            "SELECT count(*) FROM (SELECT a FROM b WHERE true) AS counted"
        );
        builder.limit_offset(10, 20);
        assert!(builder.sql().ends_with(" LIMIT $1::bigint OFFSET $2::bigint"));
    }
}
