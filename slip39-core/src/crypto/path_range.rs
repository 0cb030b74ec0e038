// slip39-core/src/crypto/path_range.rs
//
// Path Range Algebra - derivation path templates with ranged segments
//
// Segment grammar (a trailing ', h or H marks the whole segment hardened):
//   5      single index
//   0-2    closed range [0, 2]
//   3-     unbounded range starting at 3
//   -      unbounded range starting at 0
//   -3     the next 3 indices starting at the cursor (0, or the value of the
//          segment being replaced when editing)
//
// A template starts with `m` (master) or `..` (relative tail, used to edit
// the final segments of another template).

use crate::error::{PathError, WalletResult};
use std::fmt;
use std::str::FromStr;

/// BIP-32 hardened offset; also the exclusive upper bound of a child index value.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MAX_INDEX: u32 = HARDENED_OFFSET - 1;

// =============================================================================
// CONCRETE PATHS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathRoot {
    /// `m/...`
    Master,
    /// `../...`
    Relative,
}

impl PathRoot {
    fn as_str(self) -> &'static str {
        match self {
            PathRoot::Master => "m",
            PathRoot::Relative => "..",
        }
    }
}

/// One level of a concrete derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    value: u32,
    hardened: bool,
}

impl ChildIndex {
    pub fn new(value: u32, hardened: bool) -> WalletResult<Self> {
        if value > MAX_INDEX {
            return Err(PathError::IndexOutOfRange(value as u64).into());
        }
        Ok(Self { value, hardened })
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[inline]
    pub fn is_hardened(&self) -> bool {
        self.hardened
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, if self.hardened { "'" } else { "" })
    }
}

/// A fully expanded derivation path, e.g. `m/44'/60'/0'/0/7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConcretePath {
    root: PathRoot,
    indices: Vec<ChildIndex>,
}

impl ConcretePath {
    pub fn new(root: PathRoot, indices: Vec<ChildIndex>) -> Self {
        Self { root, indices }
    }

    #[inline]
    pub fn root(&self) -> PathRoot {
        self.root
    }

    #[inline]
    pub fn indices(&self) -> &[ChildIndex] {
        &self.indices
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.indices.len()
    }

    pub fn has_hardened(&self) -> bool {
        self.indices.iter().any(ChildIndex::is_hardened)
    }

    /// The path with every non-hardened trailing segment removed.
    ///
    /// `m/44'/0'/0'/0/3` -> `m/44'/0'/0'`
    pub fn hardened_prefix(&self) -> ConcretePath {
        let keep = self
            .indices
            .iter()
            .rposition(ChildIndex::is_hardened)
            .map_or(0, |i| i + 1);
        ConcretePath {
            root: self.root,
            indices: self.indices[..keep].to_vec(),
        }
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str())?;
        for index in &self.indices {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for ConcretePath {
    type Err = crate::error::WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let template = PathTemplate::from_str(s)?;
        let indices = template
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Index(index) => Ok(*index),
                other => Err(PathError::InvalidSegment(other.to_string()).into()),
            })
            .collect::<WalletResult<Vec<_>>>()?;
        Ok(ConcretePath::new(template.root, indices))
    }
}

// =============================================================================
// TEMPLATE SEGMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Index(ChildIndex),
    /// Inclusive range; `end == None` is unbounded.
    Range {
        start: u32,
        end: Option<u32>,
        hardened: bool,
    },
    /// `count` indices starting at the cursor.
    Count { count: u32, hardened: bool },
}

impl Segment {
    pub fn is_hardened(&self) -> bool {
        match *self {
            Segment::Index(index) => index.hardened,
            Segment::Range { hardened, .. } | Segment::Count { hardened, .. } => hardened,
        }
    }

    pub fn is_bounded(&self) -> bool {
        !matches!(self, Segment::Range { end: None, .. })
    }

    /// The first value this segment produces, used as the cursor for an edit.
    fn first_value(&self) -> u32 {
        match *self {
            Segment::Index(index) => index.value,
            Segment::Range { start, .. } => start,
            Segment::Count { .. } => 0,
        }
    }

    /// Fixes a count segment to start at `cursor`.
    fn anchor(self, cursor: u32) -> WalletResult<Segment> {
        match self {
            Segment::Count { count, hardened } => {
                let end = cursor as u64 + count as u64 - 1;
                if end > MAX_INDEX as u64 {
                    return Err(PathError::IndexOutOfRange(end).into());
                }
                Ok(Segment::Range {
                    start: cursor,
                    end: Some(end as u32),
                    hardened,
                })
            }
            other => Ok(other),
        }
    }

    fn axis(&self) -> Axis {
        match *self {
            Segment::Index(index) => Axis {
                start: index.value,
                last: index.value,
                hardened: index.hardened,
                bounded: true,
            },
            Segment::Range {
                start,
                end,
                hardened,
            } => Axis {
                start,
                last: end.unwrap_or(MAX_INDEX),
                hardened,
                bounded: end.is_some(),
            },
            // Unanchored counts start at 0; parse guarantees count <= 2^31.
            Segment::Count { count, hardened } => Axis {
                start: 0,
                last: count - 1,
                hardened,
                bounded: true,
            },
        }
    }
}

fn parse_index(text: &str, segment: &str) -> WalletResult<u32> {
    let value: u64 = text
        .parse()
        .map_err(|_| PathError::InvalidSegment(segment.to_string()))?;
    if value > MAX_INDEX as u64 {
        return Err(PathError::IndexOutOfRange(value).into());
    }
    Ok(value as u32)
}

impl FromStr for Segment {
    type Err = crate::error::WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (body, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(body) => (body, true),
            None => (s, false),
        };
        if body.is_empty() {
            return Err(PathError::InvalidSegment(s.to_string()).into());
        }

        if body == "-" {
            return Ok(Segment::Range {
                start: 0,
                end: None,
                hardened,
            });
        }

        if let Some(count) = body.strip_prefix('-') {
            let count: u64 = count
                .parse()
                .map_err(|_| PathError::InvalidSegment(s.to_string()))?;
            if count == 0 {
                return Err(PathError::EmptyCount.into());
            }
            if count > HARDENED_OFFSET as u64 {
                return Err(PathError::IndexOutOfRange(count).into());
            }
            return Ok(Segment::Count {
                count: count as u32,
                hardened,
            });
        }

        match body.split_once('-') {
            Some((start, "")) => Ok(Segment::Range {
                start: parse_index(start, s)?,
                end: None,
                hardened,
            }),
            Some((start, end)) => {
                let start = parse_index(start, s)?;
                let end = parse_index(end, s)?;
                if start > end {
                    return Err(PathError::InvertedRange { start, end }.into());
                }
                Ok(Segment::Range {
                    start,
                    end: Some(end),
                    hardened,
                })
            }
            None => Ok(Segment::Index(ChildIndex {
                value: parse_index(body, s)?,
                hardened,
            })),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hardened = if self.is_hardened() { "'" } else { "" };
        match *self {
            Segment::Index(index) => write!(f, "{}", index),
            Segment::Range {
                start: 0,
                end: None,
                ..
            } => write!(f, "-{}", hardened),
            Segment::Range {
                start, end: None, ..
            } => write!(f, "{}-{}", start, hardened),
            Segment::Range {
                start,
                end: Some(end),
                ..
            } => write!(f, "{}-{}{}", start, end, hardened),
            Segment::Count { count, .. } => write!(f, "-{}{}", count, hardened),
        }
    }
}

// =============================================================================
// PATH TEMPLATE
// =============================================================================

/// A derivation path whose segments may be ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    root: PathRoot,
    segments: Vec<Segment>,
}

impl PathTemplate {
    #[inline]
    pub fn parse(template: &str) -> WalletResult<Self> {
        template.parse()
    }

    #[inline]
    pub fn root(&self) -> PathRoot {
        self.root
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn has_hardened(&self) -> bool {
        self.segments.iter().any(Segment::is_hardened)
    }

    pub fn is_bounded(&self) -> bool {
        self.segments.iter().all(Segment::is_bounded)
    }

    /// Number of concrete paths, or `None` when unbounded.
    pub fn len(&self) -> Option<u64> {
        self.segments.iter().try_fold(1u64, |acc, segment| {
            let axis = segment.axis();
            axis.len().map(|n| acc.saturating_mul(n))
        })
    }

    /// Lazily expands the template in depth order, outer segments varying slowest.
    pub fn expand(&self) -> PathRange {
        PathRange::new(
            self.root,
            self.segments.iter().map(Segment::axis).collect(),
        )
    }

    /// Replaces the final segments of this template with `tail`.
    ///
    /// A relative tail of `k` segments keeps the first `len - k` segments
    /// unchanged; a count segment in the tail starts at the first value of the
    /// segment it replaces. A master-rooted tail replaces the whole template.
    pub fn edit(&self, tail: &PathTemplate) -> WalletResult<PathTemplate> {
        if tail.root == PathRoot::Master {
            return Ok(tail.clone());
        }
        let keep = self
            .segments
            .len()
            .checked_sub(tail.segments.len())
            .ok_or(PathError::EditTooLong {
                edit: tail.segments.len(),
                len: self.segments.len(),
            })?;

        let mut segments = self.segments[..keep].to_vec();
        for (replaced, segment) in self.segments[keep..].iter().zip(&tail.segments) {
            segments.push(segment.anchor(replaced.first_value())?);
        }
        Ok(PathTemplate {
            root: self.root,
            segments,
        })
    }
}

impl FromStr for PathTemplate {
    type Err = crate::error::WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PathError::EmptyTemplate.into());
        }

        let mut parts = s.split('/');
        let root = match parts.next() {
            Some("m") | Some("M") => PathRoot::Master,
            Some("..") => PathRoot::Relative,
            _ => return Err(PathError::InvalidSegment(s.to_string()).into()),
        };

        let segments = parts
            .map(Segment::from_str)
            .collect::<WalletResult<Vec<_>>>()?;

        if root == PathRoot::Relative && segments.is_empty() {
            return Err(PathError::EmptyTemplate.into());
        }
        Ok(Self { root, segments })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root.as_str())?;
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

// =============================================================================
// PATH RANGE (lazy expansion)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Axis {
    start: u32,
    last: u32,
    hardened: bool,
    bounded: bool,
}

impl Axis {
    fn len(&self) -> Option<u64> {
        self.bounded
            .then(|| (self.last - self.start) as u64 + 1)
    }
}

/// Restartable odometer over the Cartesian product of a template's segments.
///
/// Nothing is materialized: each `next()` builds one path from the current
/// cursor. Unbounded segments end at the hardened limit.
#[derive(Debug, Clone)]
pub struct PathRange {
    root: PathRoot,
    axes: Vec<Axis>,
    cursor: Vec<u32>,
    exhausted: bool,
}

impl PathRange {
    fn new(root: PathRoot, axes: Vec<Axis>) -> Self {
        let cursor = axes.iter().map(|axis| axis.start).collect();
        Self {
            root,
            axes,
            cursor,
            exhausted: false,
        }
    }

    /// Rewinds to the first path.
    pub fn restart(&mut self) {
        for (value, axis) in self.cursor.iter_mut().zip(&self.axes) {
            *value = axis.start;
        }
        self.exhausted = false;
    }

    pub fn is_bounded(&self) -> bool {
        self.axes.iter().all(|axis| axis.bounded)
    }

    fn advance(&mut self) {
        let mut i = self.cursor.len();
        loop {
            if i == 0 {
                self.exhausted = true;
                return;
            }
            i -= 1;
            if self.cursor[i] < self.axes[i].last {
                self.cursor[i] += 1;
                return;
            }
            self.cursor[i] = self.axes[i].start;
        }
    }
}

impl Iterator for PathRange {
    type Item = ConcretePath;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        let indices = self
            .cursor
            .iter()
            .zip(&self.axes)
            .map(|(&value, axis)| ChildIndex {
                value,
                hardened: axis.hardened,
            })
            .collect();
        self.advance();
        Some(ConcretePath::new(self.root, indices))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    fn paths(template: &str) -> Vec<String> {
        PathTemplate::parse(template)
            .unwrap()
            .expand()
            .map(|p| p.to_string())
            .collect()
    }

    #[test]
    fn test_single_path() {
        assert_eq!(paths("m/44'/60'/0'/0/0"), vec!["m/44'/60'/0'/0/0"]);
    }

    #[test]
    fn test_master_only() {
        assert_eq!(paths("m"), vec!["m"]);
    }

    #[test]
    fn test_cartesian_product_order() {
        let expanded = paths("../0-2/-3");
        assert_eq!(expanded.len(), 9);
        assert_eq!(expanded[0], "../0/0");
        assert_eq!(expanded[1], "../0/1");
        assert_eq!(expanded[2], "../0/2");
        assert_eq!(expanded[3], "../1/0");
        assert_eq!(expanded[8], "../2/2");
    }

    #[test]
    fn test_hardened_range_applies_to_every_value() {
        assert_eq!(paths("m/0-2'"), vec!["m/0'", "m/1'", "m/2'"]);
        assert_eq!(paths("m/-2h"), vec!["m/0'", "m/1'"]);
    }

    #[test]
    fn test_unbounded_is_lazy() {
        let template = PathTemplate::parse("m/44'/60'/0'/0/-").unwrap();
        assert!(!template.is_bounded());
        assert_eq!(template.len(), None);

        let first: Vec<String> = template.expand().take(3).map(|p| p.to_string()).collect();
        assert_eq!(
            first,
            vec!["m/44'/60'/0'/0/0", "m/44'/60'/0'/0/1", "m/44'/60'/0'/0/2"]
        );

        let from_five: Vec<String> = PathTemplate::parse("m/5-")
            .unwrap()
            .expand()
            .take(2)
            .map(|p| p.to_string())
            .collect();
        assert_eq!(from_five, vec!["m/5", "m/6"]);
    }

    #[test]
    fn test_unbounded_hardened_stops_at_limit() {
        let mut range = PathTemplate::parse("m/2147483646-'").unwrap().expand();
        assert_eq!(range.next().unwrap().to_string(), "m/2147483646'");
        assert_eq!(range.next().unwrap().to_string(), "m/2147483647'");
        assert!(range.next().is_none());
    }

    #[test]
    fn test_restart() {
        let mut range = PathTemplate::parse("m/0-1").unwrap().expand();
        assert_eq!(range.by_ref().count(), 2);
        assert!(range.next().is_none());
        range.restart();
        assert_eq!(range.next().unwrap().to_string(), "m/0");
    }

    #[test]
    fn test_len() {
        assert_eq!(PathTemplate::parse("../0-2/-3").unwrap().len(), Some(9));
        assert_eq!(PathTemplate::parse("m/44'/0'").unwrap().len(), Some(1));
    }

    #[test]
    fn test_edit_preserves_prefix() {
        let base = PathTemplate::parse("m/44'/60'/0'/0/0").unwrap();
        let tail = PathTemplate::parse("../1/-").unwrap();
        let edited = base.edit(&tail).unwrap();
        assert_eq!(edited.to_string(), "m/44'/60'/0'/1/-");
        assert_eq!(&edited.segments()[..3], &base.segments()[..3]);
    }

    #[test]
    fn test_edit_count_starts_at_cursor() {
        let base = PathTemplate::parse("m/44'/0'/0'/0/5").unwrap();
        let edited = base.edit(&PathTemplate::parse("../-3").unwrap()).unwrap();
        assert_eq!(edited.to_string(), "m/44'/0'/0'/0/5-7");
    }

    #[test]
    fn test_edit_with_master_replaces() {
        let base = PathTemplate::parse("m/44'/0'/0'/0/0").unwrap();
        let edited = base.edit(&PathTemplate::parse("m/84'/0'").unwrap()).unwrap();
        assert_eq!(edited.to_string(), "m/84'/0'");
    }

    #[test]
    fn test_edit_too_long() {
        let base = PathTemplate::parse("m/0").unwrap();
        let result = base.edit(&PathTemplate::parse("../1/2").unwrap());
        assert!(matches!(
            result,
            Err(WalletError::Path(PathError::EditTooLong { edit: 2, len: 1 }))
        ));
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            PathTemplate::parse(""),
            Err(WalletError::Path(PathError::EmptyTemplate))
        ));
        assert!(matches!(
            PathTemplate::parse(".."),
            Err(WalletError::Path(PathError::EmptyTemplate))
        ));
        assert!(matches!(
            PathTemplate::parse("m/3-1"),
            Err(WalletError::Path(PathError::InvertedRange { start: 3, end: 1 }))
        ));
        assert!(matches!(
            PathTemplate::parse("m/2147483648"),
            Err(WalletError::Path(PathError::IndexOutOfRange(2147483648)))
        ));
        assert!(matches!(
            PathTemplate::parse("m/-0"),
            Err(WalletError::Path(PathError::EmptyCount))
        ));
        assert!(PathTemplate::parse("m/abc").is_err());
        assert!(PathTemplate::parse("m/44'/").is_err());
        assert!(PathTemplate::parse("44'/0'").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for text in ["m/44'/0'/0'/0/-", "../0-2/-3", "m/5-", "m/0-9'"] {
            assert_eq!(PathTemplate::parse(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_concrete_path() {
        let path: ConcretePath = "m/44'/0'/0'/0/3".parse().unwrap();
        assert_eq!(path.depth(), 5);
        assert!(path.has_hardened());
        assert_eq!(path.hardened_prefix().to_string(), "m/44'/0'/0'");
        assert!("m/0-2".parse::<ConcretePath>().is_err());
    }
}
