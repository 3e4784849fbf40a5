//! Point storage and parsing
//!
//! A [`PointSet`] is the ordered, immutable list of 2-D points a search runs
//! over. Points are identified by their 0-based position in the set.
//!
//! # Input format
//!
//! Whitespace separated floating-point tokens, consumed pairwise as `(x, y)`.
//! Line breaks carry no meaning beyond separating tokens:
//!
//! ```text
//! 0 0
//! 1 0   0 1
//! ```

use crate::error::{Error, MalformedInput, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Minimum number of points a search needs
pub const MIN_POINTS: usize = 2;

/// A point in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`
    ///
    /// Computed with `hypot`, so the squares never overflow for finite
    /// coordinates.
    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Random access to an indexed sequence of points
///
/// The radius evaluator only needs this much, which lets the same code run
/// over a host [`PointSet`] and over records in backend memory.
pub trait PointSource {
    /// Number of points
    fn len(&self) -> usize;

    /// Point at `index`
    ///
    /// # Panics
    ///
    /// May panic if `index >= self.len()`.
    fn point(&self, index: usize) -> Point;

    /// True when there are no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PointSource for [Point] {
    fn len(&self) -> usize {
        <[Point]>::len(self)
    }

    fn point(&self, index: usize) -> Point {
        self[index]
    }
}

/// Ordered set of at least [`MIN_POINTS`] finite points
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<Point>,
}

impl PointSet {
    /// Wrap `points`, checking there are enough of them and that every
    /// coordinate is finite
    pub fn new(points: Vec<Point>) -> Result<Self> {
        if points.len() < MIN_POINTS {
            return Err(Error::InsufficientPoints { count: points.len() });
        }
        if let Some(index) = points.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(MalformedInput::NonFinitePoint { index }.into());
        }
        Ok(Self { points })
    }

    /// Parse points from text
    pub fn parse(text: &str) -> Result<Self> {
        Self::read_named(text.as_bytes(), "<string>")
    }

    /// Parse points from any reader, reading it to completion
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        Self::read_named(BufReader::new(reader), "<reader>")
    }

    /// Open and parse the file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| Error::SourceUnreadable {
            path: name.clone(),
            source,
        })?;
        Self::read_named(BufReader::new(file), &name)
    }

    fn read_named<R: BufRead>(reader: R, name: &str) -> Result<Self> {
        let mut coordinates = Vec::new();

        for (line_index, line) in reader.split(b'\n').enumerate() {
            let line = line.map_err(|source| Error::SourceUnreadable {
                path: name.to_string(),
                source,
            })?;
            let line =
                std::str::from_utf8(&line).map_err(|_| MalformedInput::InvalidEncoding { line: line_index + 1 })?;

            for token in line.split_whitespace() {
                let ordinal = coordinates.len() + 1;
                let value: f64 = token.parse().map_err(|_| MalformedInput::InvalidToken {
                    token: token.to_string(),
                    line: line_index + 1,
                    ordinal,
                })?;
                if !value.is_finite() {
                    return Err(MalformedInput::NonFinite {
                        token: token.to_string(),
                        line: line_index + 1,
                        ordinal,
                    }
                    .into());
                }
                coordinates.push(value);
            }
        }

        if coordinates.len() % 2 != 0 {
            return Err(MalformedInput::OddTokenCount {
                count: coordinates.len(),
            }
            .into());
        }

        let points: Vec<Point> = coordinates
            .chunks_exact(2)
            .map(|pair| Point::new(pair[0], pair[1]))
            .collect();
        tracing::debug!(source = name, points = points.len(), "loaded point set");

        Self::new(points)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the set holds no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`, if any
    pub fn get(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }

    /// Iterate over the points in order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.points.iter().copied()
    }

    /// Borrow the points as a slice
    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }
}

impl PointSource for PointSet {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn point(&self, index: usize) -> Point {
        self.points[index]
    }
}

impl TryFrom<Vec<Point>> for PointSet {
    type Error = Error;

    fn try_from(points: Vec<Point>) -> Result<Self> {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_pairs_tokens_across_lines() {
        let set = PointSet::parse("0 0\n1.5\n-2   3e1 7\n").unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.get(1), Some(Point::new(1.5, -2.0)));
        assert_eq!(set.get(2), Some(Point::new(30.0, 7.0)));
        assert_eq!(set.get(3), None);
    }

    #[test]
    fn test_odd_token_count_is_malformed() {
        let err = PointSet::parse("0.0 1.0 2.0").unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedInput(MalformedInput::OddTokenCount { count: 3 })
        ));
    }

    #[test]
    fn test_invalid_token_reports_position() {
        let err = PointSet::parse("0 0\n1 abc\n").unwrap_err();
        match err {
            Error::MalformedInput(MalformedInput::InvalidToken { token, line, ordinal }) => {
                assert_eq!(token, "abc");
                assert_eq!(line, 2);
                assert_eq!(ordinal, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_finite_tokens_are_rejected() {
        for text in ["0 0 inf 1", "0 0 1 NaN", "-infinity 0 1 1"] {
            let err = PointSet::parse(text).unwrap_err();
            assert!(
                matches!(err, Error::MalformedInput(MalformedInput::NonFinite { .. })),
                "{text}: {err}"
            );
        }
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let err = PointSet::load(&b"0 0\n1 \xff\n"[..]).unwrap_err();
        assert!(
            matches!(err, Error::MalformedInput(MalformedInput::InvalidEncoding { line: 2 })),
            "{err}"
        );
    }

    #[test]
    fn test_crlf_line_endings() {
        let set = PointSet::parse("0 0\r\n1 0\r\n").unwrap();
        assert_eq!(set.get(1), Some(Point::new(1.0, 0.0)));
    }

    #[test]
    fn test_distance_of_huge_coordinates_stays_finite() {
        let d = Point::new(0.0, 0.0).distance(Point::new(3e200, 4e200));
        assert!(d.is_finite());
        assert!((d - 5e200).abs() <= 5e200 * f64::EPSILON * 4.0);
    }

    #[test]
    fn test_too_few_points() {
        assert!(matches!(
            PointSet::parse("4 2").unwrap_err(),
            Error::InsufficientPoints { count: 1 }
        ));
        assert!(matches!(
            PointSet::parse(" \n\t").unwrap_err(),
            Error::InsufficientPoints { count: 0 }
        ));
    }

    #[test]
    fn test_new_validates() {
        assert!(PointSet::new(vec![Point::new(0.0, 0.0)]).is_err());
        assert!(matches!(
            PointSet::new(vec![Point::new(0.0, 0.0), Point::new(f64::NAN, 0.0)]).unwrap_err(),
            Error::MalformedInput(MalformedInput::NonFinitePoint { index: 1 })
        ));

        let set = PointSet::try_from(vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)]).unwrap();
        assert_eq!(set.point(0).distance(set.point(1)), 5.0);
    }

    #[test]
    fn test_load_from_reader() {
        let set = PointSet::load("1 2 3 4".as_bytes()).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0 0").unwrap();
        writeln!(file, "1 0").unwrap();
        writeln!(file, "0 1").unwrap();

        let set = PointSet::from_path(file.path()).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let err = PointSet::from_path(&missing).unwrap_err();
        match err {
            Error::SourceUnreadable { path, .. } => assert!(path.ends_with("missing.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_slice_source() {
        let points = [Point::new(0.0, 0.0), Point::new(0.0, 2.0)];
        let source: &[Point] = &points;
        assert_eq!(PointSource::len(source), 2);
        assert_eq!(source.point(1), Point::new(0.0, 2.0));
    }
}
