use crate::shared::{GraphError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Maximum length for a version specification (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// One parsed token of a single version string.
///
/// Qualifier ranks encode the ordering decision this crate makes for the
/// release-marker ambiguity: the empty qualifier, `ga`, `final` and
/// `release` all rank equal to the release marker (0). Pre-release
/// qualifiers rank below it, anything else (including `SNAPSHOT`) above
/// it, lexically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
enum VersionPart {
    Number(u64),
    Qualifier { rank: i8, text: String },
}

/// Rank for the release marker and its aliases
const RELEASE_RANK: i8 = 0;

fn qualifier_rank(text: &str) -> i8 {
    match text {
        "alpha" | "a" => -5,
        "beta" | "b" => -4,
        "milestone" | "m" => -3,
        "rc" | "cr" => -2,
        "" | "ga" | "final" | "release" => RELEASE_RANK,
        _ => 1,
    }
}

impl VersionPart {
    fn qualifier(text: &str) -> Self {
        let lowered = text.to_lowercase();
        VersionPart::Qualifier {
            rank: qualifier_rank(&lowered),
            text: lowered,
        }
    }

    /// The implicit value of a missing trailing part
    fn padding() -> Self {
        VersionPart::Number(0)
    }

    fn is_padding(&self) -> bool {
        match self {
            VersionPart::Number(n) => *n == 0,
            VersionPart::Qualifier { rank, .. } => *rank == RELEASE_RANK,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionPart::Number(a), VersionPart::Number(b)) => a.cmp(b),
            // A qualifier at release rank ties with zero; pre-release
            // qualifiers sort before any number, post-release qualifiers
            // after zero but before positive numeric segments
            (VersionPart::Qualifier { rank, .. }, VersionPart::Number(n)) => {
                if *rank < RELEASE_RANK {
                    Ordering::Less
                } else if *rank == RELEASE_RANK {
                    0u64.cmp(n)
                } else if *n == 0 {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (VersionPart::Number(_), VersionPart::Qualifier { .. }) => {
                other.compare(self).reverse()
            }
            (
                VersionPart::Qualifier { rank: ra, text: ta },
                VersionPart::Qualifier { rank: rb, text: tb },
            ) => ra.cmp(rb).then_with(|| ta.cmp(tb)),
        }
    }
}

/// A single (non-range) version, e.g. `1.5`, `2.0-beta-1`, `1.0-SNAPSHOT`.
///
/// Equality and ordering are over the normalized parsed parts (trailing
/// zero/release parts stripped), so `1.0` == `1.0.0` == `1.0-ga`. The raw
/// text is kept for display only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleVersion {
    raw: String,
    parts: Vec<VersionPart>,
}

impl SingleVersion {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            anyhow::bail!(GraphError::InvalidVersionSpec {
                spec: raw.to_string(),
                reason: "version cannot be empty".to_string(),
            });
        }
        if trimmed.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(GraphError::InvalidVersionSpec {
                spec: raw.to_string(),
                reason: format!(
                    "version is too long ({} bytes). Maximum allowed: {} bytes",
                    trimmed.len(),
                    MAX_VERSION_LENGTH
                ),
            });
        }

        let mut parts = Vec::new();
        for token in tokenize(trimmed) {
            if token.chars().all(|c| c.is_ascii_digit()) {
                let number = token.parse::<u64>().map_err(|_| GraphError::InvalidVersionSpec {
                    spec: raw.to_string(),
                    reason: format!("numeric segment '{}' overflows", token),
                })?;
                parts.push(VersionPart::Number(number));
            } else {
                parts.push(VersionPart::qualifier(&token));
            }
        }
        // Normalize: trailing release-equivalent parts carry no meaning
        while parts.len() > 1 && parts.last().is_some_and(VersionPart::is_padding) {
            parts.pop();
        }
        Ok(Self {
            raw: trimmed.to_string(),
            parts,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True for `-SNAPSHOT`-suffixed versions (unresolved snapshots)
    pub fn is_snapshot(&self) -> bool {
        self.raw.to_lowercase().ends_with("-snapshot")
    }
}

/// Splits a version string into dot/dash separated tokens, also breaking
/// at letter/digit boundaries (`1.0b2` -> `1`, `0`, `b`, `2`).
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut last_is_digit: Option<bool> = None;
    for c in raw.chars() {
        if c == '.' || c == '-' || c == '_' {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            last_is_digit = None;
            continue;
        }
        let is_digit = c.is_ascii_digit();
        if let Some(last) = last_is_digit {
            if last != is_digit && !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        last_is_digit = Some(is_digit);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

impl PartialEq for SingleVersion {
    fn eq(&self, other: &Self) -> bool {
        self.parts == other.parts
    }
}

impl Eq for SingleVersion {}

impl std::hash::Hash for SingleVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
    }
}

impl PartialOrd for SingleVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SingleVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let longest = self.parts.len().max(other.parts.len());
        for i in 0..longest {
            let a = self.parts.get(i).cloned().unwrap_or_else(VersionPart::padding);
            let b = other.parts.get(i).cloned().unwrap_or_else(VersionPart::padding);
            let ordering = a.compare(&b);
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Display for SingleVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// One bound of a version range
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeBound {
    pub version: SingleVersion,
    pub inclusive: bool,
}

/// A mathematical version range, e.g. `[1.0,2.0)`, `(,1.0]`, `[1.2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeSpec {
    raw: String,
    lower: Option<RangeBound>,
    upper: Option<RangeBound>,
}

impl RangeSpec {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = |reason: &str| GraphError::InvalidVersionSpec {
            spec: raw.to_string(),
            reason: reason.to_string(),
        };

        let mut chars = trimmed.chars();
        let open = chars.next().ok_or_else(|| invalid("range cannot be empty"))?;
        let close = trimmed
            .chars()
            .last()
            .ok_or_else(|| invalid("range cannot be empty"))?;
        let lower_inclusive = match open {
            '[' => true,
            '(' => false,
            _ => anyhow::bail!(invalid("range must open with '[' or '('")),
        };
        let upper_inclusive = match close {
            ']' => true,
            ')' => false,
            _ => anyhow::bail!(invalid("range must close with ']' or ')'")),
        };

        let body = &trimmed[1..trimmed.len() - 1];
        let (lower_text, upper_text) = match body.split_once(',') {
            Some((lo, hi)) => (lo.trim(), hi.trim()),
            // A pinned single-version range: [1.2]
            None => (body.trim(), body.trim()),
        };
        if lower_text.is_empty() && upper_text.is_empty() {
            anyhow::bail!(invalid("range must have at least one bound"));
        }

        let lower = if lower_text.is_empty() {
            None
        } else {
            Some(RangeBound {
                version: SingleVersion::parse(lower_text)?,
                inclusive: lower_inclusive,
            })
        };
        let upper = if upper_text.is_empty() {
            None
        } else {
            Some(RangeBound {
                version: SingleVersion::parse(upper_text)?,
                inclusive: upper_inclusive,
            })
        };

        if let (Some(lo), Some(hi)) = (&lower, &upper) {
            if lo.version > hi.version {
                anyhow::bail!(invalid("lower bound is greater than upper bound"));
            }
        }

        Ok(Self {
            raw: trimmed.to_string(),
            lower,
            upper,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True for a range that pins exactly one version, e.g. `[1.2]` or `[1.2,1.2]`
    pub fn is_pinned(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lo), Some(hi)) => {
                lo.inclusive && hi.inclusive && lo.version == hi.version
            }
            _ => false,
        }
    }

    /// True when the single version falls inside this range
    pub fn includes(&self, version: &SingleVersion) -> bool {
        if let Some(lo) = &self.lower {
            match version.cmp(&lo.version) {
                Ordering::Less => return false,
                Ordering::Equal if !lo.inclusive => return false,
                _ => {}
            }
        }
        if let Some(hi) = &self.upper {
            match version.cmp(&hi.version) {
                Ordering::Greater => return false,
                Ordering::Equal if !hi.inclusive => return false,
                _ => {}
            }
        }
        true
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// The version collaborator the graph engine consumes.
///
/// The engine only relies on the narrow contract here: total ordering,
/// equality/hashing, `is_concrete`/`is_single`/`is_snapshot` and
/// `contains`. Everything else about version semantics stays behind this
/// type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSpec {
    Single(SingleVersion),
    Range(RangeSpec),
}

impl VersionSpec {
    /// Parses either a single version or a bracketed range expression.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') || trimmed.starts_with('(') {
            Ok(VersionSpec::Range(RangeSpec::parse(trimmed)?))
        } else {
            Ok(VersionSpec::Single(SingleVersion::parse(trimmed)?))
        }
    }

    /// True when this spec uniquely identifies one build artifact:
    /// a single, non-snapshot version. Ranges are never concrete, even
    /// when pinned; a pinned range is still a range expression awaiting
    /// resolution.
    pub fn is_concrete(&self) -> bool {
        match self {
            VersionSpec::Single(v) => !v.is_snapshot(),
            VersionSpec::Range(_) => false,
        }
    }

    /// True when the spec denotes exactly one version (single, or a
    /// pinned range like `[1.2]`)
    pub fn is_single(&self) -> bool {
        match self {
            VersionSpec::Single(_) => true,
            VersionSpec::Range(r) => r.is_pinned(),
        }
    }

    pub fn is_snapshot(&self) -> bool {
        match self {
            VersionSpec::Single(v) => v.is_snapshot(),
            VersionSpec::Range(_) => false,
        }
    }

    /// True when every version admitted by `other` is admitted by `self`.
    pub fn contains(&self, other: &VersionSpec) -> bool {
        match (self, other) {
            (VersionSpec::Single(a), VersionSpec::Single(b)) => a == b,
            (VersionSpec::Range(r), VersionSpec::Single(v)) => r.includes(v),
            (VersionSpec::Range(r), VersionSpec::Range(other_range)) => {
                let lower_ok = match (&r.lower, &other_range.lower) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(a), Some(b)) => {
                        a.version < b.version
                            || (a.version == b.version && (a.inclusive || !b.inclusive))
                    }
                };
                let upper_ok = match (&r.upper, &other_range.upper) {
                    (None, _) => true,
                    (Some(_), None) => false,
                    (Some(a), Some(b)) => {
                        a.version > b.version
                            || (a.version == b.version && (a.inclusive || !b.inclusive))
                    }
                };
                lower_ok && upper_ok
            }
            (VersionSpec::Single(_), VersionSpec::Range(_)) => false,
        }
    }
}

impl PartialOrd for VersionSpec {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionSpec {
    /// Total order for use in sorted collections. Singles order by their
    /// version parts; ranges order lexically by raw text and sort after
    /// all singles. Cross-variant ordering is arbitrary but stable.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (VersionSpec::Single(a), VersionSpec::Single(b)) => a.cmp(b),
            (VersionSpec::Range(a), VersionSpec::Range(b)) => a.raw.cmp(&b.raw),
            (VersionSpec::Single(_), VersionSpec::Range(_)) => Ordering::Less,
            (VersionSpec::Range(_), VersionSpec::Single(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Single(v) => write!(f, "{}", v),
            VersionSpec::Range(r) => write!(f, "{}", r),
        }
    }
}
