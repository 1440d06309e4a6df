//! Lexicographic seating score
//!
//! A seating plan is judged on two levels. Hard violations (over-capacity
//! tables, co-located must_apart pairs, split must_together blocks) are
//! compared first; the soft score (satisfied preference weight) only breaks
//! ties. The two levels are never summed into a single scalar.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quality of a seating plan.
///
/// Greater is better: fewer hard violations always wins, and among equal
/// hard counts a higher soft score wins.
///
/// # Examples
///
/// ```
/// use seatplan_core::SeatingScore;
///
/// let broken = SeatingScore::of(1, 500);   // one hard violation, lots of soft reward
/// let clean = SeatingScore::of(0, 3);      // feasible, little soft reward
///
/// // A large soft gain never masks a hard violation
/// assert!(clean > broken);
/// assert!(SeatingScore::of(0, 4) > clean);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SeatingScore {
    hard_violations: u64,
    soft_score: u64,
}

impl SeatingScore {
    /// The zero score: no violations, no reward.
    pub const ZERO: SeatingScore = SeatingScore {
        hard_violations: 0,
        soft_score: 0,
    };

    #[inline]
    pub const fn of(hard_violations: u64, soft_score: u64) -> Self {
        SeatingScore {
            hard_violations,
            soft_score,
        }
    }

    #[inline]
    pub const fn hard_violations(&self) -> u64 {
        self.hard_violations
    }

    #[inline]
    pub const fn soft_score(&self) -> u64 {
        self.soft_score
    }

    /// Returns true when no hard constraint is violated.
    #[inline]
    pub const fn is_feasible(&self) -> bool {
        self.hard_violations == 0
    }

    /// Applies a signed delta, clamping each level at zero.
    pub fn apply(self, delta: ScoreDelta) -> Self {
        SeatingScore {
            hard_violations: self.hard_violations.saturating_add_signed(delta.hard),
            soft_score: self.soft_score.saturating_add_signed(delta.soft),
        }
    }

    /// Returns the delta that turns `self` into `other`.
    pub fn delta_to(self, other: SeatingScore) -> ScoreDelta {
        ScoreDelta {
            hard: other.hard_violations as i64 - self.hard_violations as i64,
            soft: other.soft_score as i64 - self.soft_score as i64,
        }
    }
}

impl Ord for SeatingScore {
    fn cmp(&self, other: &Self) -> Ordering {
        match other.hard_violations.cmp(&self.hard_violations) {
            Ordering::Equal => self.soft_score.cmp(&other.soft_score),
            other => other,
        }
    }
}

impl PartialOrd for SeatingScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for SeatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SeatingScore({}, {})",
            self.hard_violations, self.soft_score
        )
    }
}

impl fmt::Display for SeatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}hard/{}soft",
            -(self.hard_violations as i64),
            self.soft_score
        )
    }
}

/// Error when parsing a score from its text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid score `{input}`: {reason}")]
pub struct ScoreParseError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for SeatingScore {
    type Err = ScoreParseError;

    /// Parses the display form, e.g. `-2hard/15soft` or `0hard/0soft`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ScoreParseError {
            input: s.to_owned(),
            reason,
        };
        let (hard, soft) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| err("expected `<hard>hard/<soft>soft`"))?;
        let hard: i64 = hard
            .trim()
            .strip_suffix("hard")
            .ok_or_else(|| err("missing `hard` suffix"))?
            .parse()
            .map_err(|_| err("hard level is not an integer"))?;
        let soft: u64 = soft
            .trim()
            .strip_suffix("soft")
            .ok_or_else(|| err("missing `soft` suffix"))?
            .parse()
            .map_err(|_| err("soft level is not a non-negative integer"))?;
        if hard > 0 {
            return Err(err("hard level counts violations and cannot be positive"));
        }
        Ok(SeatingScore::of(hard.unsigned_abs(), soft))
    }
}

/// Signed change of a `SeatingScore` caused by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScoreDelta {
    /// Change in hard violations; negative is an improvement.
    pub hard: i64,
    /// Change in soft score; positive is an improvement.
    pub soft: i64,
}

impl ScoreDelta {
    pub const ZERO: ScoreDelta = ScoreDelta { hard: 0, soft: 0 };

    #[inline]
    pub const fn of(hard: i64, soft: i64) -> Self {
        ScoreDelta { hard, soft }
    }

    /// Returns true if applying this delta yields a strictly better score.
    pub fn is_improving(&self) -> bool {
        self.hard < 0 || (self.hard == 0 && self.soft > 0)
    }
}

impl Add for ScoreDelta {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        ScoreDelta::of(self.hard + other.hard, self.soft + other.soft)
    }
}

impl AddAssign for ScoreDelta {
    fn add_assign(&mut self, other: Self) {
        self.hard += other.hard;
        self.soft += other.soft;
    }
}

impl Sub for ScoreDelta {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        ScoreDelta::of(self.hard - other.hard, self.soft - other.soft)
    }
}

impl Neg for ScoreDelta {
    type Output = Self;

    fn neg(self) -> Self {
        ScoreDelta::of(-self.hard, -self.soft)
    }
}
