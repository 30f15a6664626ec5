//! Version constraint expressions
//!
//! Supported forms:
//! - `1.21.4` - exact version; a partial `1.21` means any 1.21.x
//! - `1.21.x`, `1.X`, `1.*`, `*` - wildcards
//! - `^1.18` - same major (>=1.18.0 <2.0.0, with the usual 0.x special cases)
//! - `~1.18.2` - same minor (>=1.18.2 <1.19.0)
//! - `>1.18`, `>=1.18`, `<1.16`, `<=1.21` - comparisons
//! - `!=1.18.3`, `!=1.19` - exclusion; a partial version excludes its whole line
//! - `1.16 - 1.20.7` - inclusive hyphen range
//! - `>=1.18 <1.20` or `>=1.18, <1.20` - all must hold
//! - `~1.18 || ^1.21` - any may hold
//!
//! Partial versions follow the precision they were written with: `>1.18`
//! starts at 1.19.0 and `<=1.21` includes every 1.21 patch release.
//! Prerelease versions only satisfy ranges that name a prerelease themselves.

use semver::{Prerelease, Version};

use crate::error::Error;
use crate::version::semver::insert_prerelease_separator;

/// A parsed constraint expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// Single range (^1.0.0, >=1.0.0, etc.)
    Single(Range),
    /// AND of ranges, all must satisfy
    And(Vec<Constraint>),
    /// OR of constraints, any must satisfy
    Or(Vec<Constraint>),
}

impl Constraint {
    /// Parse a constraint expression, returning None when it is not one
    pub fn parse(expression: &str) -> Option<Self> {
        let expression = expression.trim();
        if expression.is_empty() {
            return None;
        }

        if expression.contains("||") {
            let alternatives: Option<Vec<Constraint>> = expression
                .split("||")
                .map(Self::parse_and_or_single)
                .collect();
            return alternatives.map(Constraint::Or);
        }

        Self::parse_and_or_single(expression)
    }

    /// Parse a part that is either a hyphen range, a single range or an AND list
    fn parse_and_or_single(part: &str) -> Option<Self> {
        let part = part.trim();
        if part.is_empty() {
            return None;
        }

        if let Some(range) = Range::parse_hyphen(part) {
            return Some(Constraint::Single(range));
        }

        let tokens = split_and_parts(part);
        match tokens.as_slice() {
            [] => None,
            [single] => Range::parse(single).map(Constraint::Single),
            many => {
                let ranges: Option<Vec<Constraint>> = many
                    .iter()
                    .map(|token| Range::parse(token).map(Constraint::Single))
                    .collect();
                ranges.map(Constraint::And)
            }
        }
    }

    /// Check if a version satisfies this constraint
    pub fn satisfies(&self, version: &Version) -> bool {
        match self {
            Constraint::Single(range) => range.satisfies(version),
            Constraint::And(constraints) => constraints.iter().all(|c| c.satisfies(version)),
            Constraint::Or(constraints) => constraints.iter().any(|c| c.satisfies(version)),
        }
    }
}

impl std::str::FromStr for Constraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Constraint::parse(s).ok_or_else(|| Error::InvalidConstraint {
            expression: s.trim().to_string(),
        })
    }
}

/// Split an AND list on commas and whitespace.
///
/// An operator separated from its version by a space (`>= 1.18`) is glued
/// back onto the following token.
fn split_and_parts(part: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pending_op = String::new();

    for raw in part.split([',', ' ', '\t']).filter(|s| !s.is_empty()) {
        if raw.chars().all(is_operator_char) {
            pending_op.push_str(raw);
            continue;
        }
        tokens.push(format!("{}{}", std::mem::take(&mut pending_op), raw));
    }

    if !pending_op.is_empty() {
        // A dangling operator cannot be satisfied by anything meaningful
        tokens.push(pending_op);
    }
    tokens
}

fn is_operator_char(c: char) -> bool {
    matches!(c, '<' | '>' | '=' | '!' | '^' | '~')
}

/// A possibly partial version bound. `None` components were omitted or
/// written as a wildcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Bound {
    /// Parse "1", "1.21", "1.21.4", "1.21.x", "*", "v1.21", "1.21rc1", "1.21.0-rc.1"
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let text = text.strip_prefix(['v', 'V']).unwrap_or(text);
        if text.is_empty() {
            return None;
        }

        let hyphenated = insert_prerelease_separator(text);
        let (core, pre) = match hyphenated.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (hyphenated.as_str(), Prerelease::EMPTY),
        };
        // Build metadata never affects matching
        let core = core.split('+').next().unwrap_or_default();

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut numbers = [None; 3];
        let mut wildcard_seen = false;
        for (slot, part) in numbers.iter_mut().zip(parts.iter()) {
            if matches!(*part, "x" | "X" | "*") {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen {
                // "1.x.3" is not a version
                return None;
            }
            *slot = Some(part.parse::<u64>().ok()?);
        }

        if wildcard_seen && !pre.is_empty() {
            return None;
        }

        Some(Bound {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
            pre,
        })
    }

    /// Smallest version the bound can stand for
    fn floor(&self) -> Version {
        let mut version = Version::new(
            self.major.unwrap_or(0),
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        version.pre = self.pre.clone();
        version
    }

    fn is_complete(&self) -> bool {
        self.major.is_some() && self.minor.is_some() && self.patch.is_some()
    }

    /// Exactly the version, or anywhere on its line when partial
    fn covers(&self, version: &Version) -> bool {
        if self.is_complete() {
            cmp_precedence(version, &self.floor()).is_eq()
        } else {
            self.same_line(version)
        }
    }

    /// Same release line at the precision the bound was written with
    fn same_line(&self, version: &Version) -> bool {
        self.major.is_none_or(|major| version.major == major)
            && self.minor.is_none_or(|minor| version.minor == minor)
            && self.patch.is_none_or(|patch| version.patch == patch)
    }

    fn greater_than(&self, version: &Version) -> bool {
        let Some(major) = self.major else {
            return false;
        };
        if self.is_complete() {
            return cmp_precedence(version, &self.floor()).is_gt();
        }
        match self.minor {
            None => version.major > major,
            Some(minor) => {
                version.major > major || (version.major == major && version.minor > minor)
            }
        }
    }

    fn less_or_equal(&self, version: &Version) -> bool {
        let Some(major) = self.major else {
            return true;
        };
        if self.is_complete() {
            return cmp_precedence(version, &self.floor()).is_le();
        }
        match self.minor {
            None => version.major <= major,
            Some(minor) => {
                version.major < major || (version.major == major && version.minor <= minor)
            }
        }
    }
}

/// Compare ignoring build metadata
fn cmp_precedence(a: &Version, b: &Version) -> std::cmp::Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// A single range of a constraint expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Range {
    /// Exact or partial version: 1.21.4, 1.21, 1.21.x, *
    Exact(Bound),
    /// Caret range: ^1.2.3 means >=1.2.3 <2.0.0 (or special cases for 0.x)
    Caret(Bound),
    /// Tilde range: ~1.2.3 means >=1.2.3 <1.3.0, ~1 means >=1.0.0 <2.0.0
    Tilde(Bound),
    /// Greater than or equal
    Gte(Bound),
    /// Greater than
    Gt(Bound),
    /// Less than or equal
    Lte(Bound),
    /// Less than
    Lt(Bound),
    /// Anything outside the version or line: !=1.21.4, !=1.21
    Ne(Bound),
    /// Hyphen range: 1.0.0 - 2.0.0 means >=1.0.0 <=2.0.0
    Hyphen { from: Bound, to: Bound },
}

impl Range {
    /// Parse a single range like ">=1.18", "^1.20" or "1.21.x"
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(rest) = text.strip_prefix("!=") {
            Bound::parse(rest).map(Range::Ne)
        } else if let Some(rest) = text.strip_prefix(">=") {
            Bound::parse(rest).map(Range::Gte)
        } else if let Some(rest) = text.strip_prefix('>') {
            Bound::parse(rest).map(Range::Gt)
        } else if let Some(rest) = text.strip_prefix("<=") {
            Bound::parse(rest).map(Range::Lte)
        } else if let Some(rest) = text.strip_prefix('<') {
            Bound::parse(rest).map(Range::Lt)
        } else if let Some(rest) = text.strip_prefix('^') {
            Bound::parse(rest).map(Range::Caret)
        } else if let Some(rest) = text.strip_prefix("~>") {
            Bound::parse(rest).map(Range::Tilde)
        } else if let Some(rest) = text.strip_prefix('~') {
            Bound::parse(rest).map(Range::Tilde)
        } else if let Some(rest) = text.strip_prefix('=') {
            Bound::parse(rest).map(Range::Exact)
        } else {
            Bound::parse(text).map(Range::Exact)
        }
    }

    /// Parse hyphen range like "1.16 - 1.20.7"
    fn parse_hyphen(text: &str) -> Option<Self> {
        let (from, to) = text.split_once(" - ")?;
        let from = Bound::parse(from)?;
        let to = Bound::parse(to)?;
        Some(Range::Hyphen { from, to })
    }

    fn allows_prerelease(&self) -> bool {
        match self {
            Range::Exact(b)
            | Range::Caret(b)
            | Range::Tilde(b)
            | Range::Gte(b)
            | Range::Gt(b)
            | Range::Lte(b)
            | Range::Lt(b)
            | Range::Ne(b) => !b.pre.is_empty(),
            Range::Hyphen { from, to } => !from.pre.is_empty() || !to.pre.is_empty(),
        }
    }

    /// Check if a version satisfies this range
    pub fn satisfies(&self, version: &Version) -> bool {
        if !version.pre.is_empty() && !self.allows_prerelease() {
            return false;
        }

        match self {
            Range::Exact(b) => b.covers(version),
            Range::Ne(b) => !b.covers(version),
            Range::Caret(b) => {
                let Some(major) = b.major else {
                    return true;
                };
                if cmp_precedence(version, &b.floor()).is_lt() {
                    return false;
                }
                // ^1.2.3 -> <2.0.0, ^0.2.3 -> <0.3.0, ^0.0.3 -> <0.0.4, ^0.0 -> <0.1.0
                match (major, b.minor, b.patch) {
                    (0, None, _) => version.major == 0,
                    (0, Some(0), None) => version.major == 0 && version.minor == 0,
                    (0, Some(0), Some(patch)) => {
                        version.major == 0 && version.minor == 0 && version.patch == patch
                    }
                    (0, Some(minor), _) => version.major == 0 && version.minor == minor,
                    _ => version.major == major,
                }
            }
            Range::Tilde(b) => {
                let Some(major) = b.major else {
                    return true;
                };
                cmp_precedence(version, &b.floor()).is_ge()
                    && version.major == major
                    && b.minor.is_none_or(|minor| version.minor == minor)
            }
            Range::Gte(b) => cmp_precedence(version, &b.floor()).is_ge(),
            Range::Gt(b) => b.greater_than(version),
            Range::Lte(b) => b.less_or_equal(version),
            Range::Lt(b) => cmp_precedence(version, &b.floor()).is_lt(),
            Range::Hyphen { from, to } => {
                cmp_precedence(version, &from.floor()).is_ge() && to.less_or_equal(version)
            }
        }
    }
}
