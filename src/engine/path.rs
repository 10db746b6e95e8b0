use crate::foundation::error::{SlipwayError, SlipwayResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// One step index per stack level, root first. Written as `"2,0,1"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StepPath(pub Vec<i64>);

impl StepPath {
    /// Parse a comma-separated list; surrounding whitespace and a leading `#` are ignored.
    pub fn parse(s: &str) -> SlipwayResult<Self> {
        let s = s.trim().trim_start_matches('#').trim();
        if s.is_empty() {
            return Err(SlipwayError::validation("step path is empty"));
        }
        s.split(',')
            .map(|part| {
                let part = part.trim();
                match part.parse::<i64>() {
                    Ok(v) if v >= 0 => Ok(v),
                    _ => Err(SlipwayError::validation(format!(
                        "step path entry '{part}' is not a step index"
                    ))),
                }
            })
            .collect::<SlipwayResult<Vec<_>>>()
            .map(Self)
    }

    /// Steps, root first.
    pub fn steps(&self) -> &[i64] {
        &self.0
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the empty path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether navigating forward from `self` can still reach `target`.
    ///
    /// Levels are compared root first. A higher step at the first differing level means
    /// `target` is still ahead; a lower one means it was overshot. Once `target` runs out of
    /// levels, or `self` does, the walk has arrived as far as it can.
    pub fn is_before(&self, target: &StepPath) -> bool {
        for (c, t) in self.0.iter().zip(&target.0) {
            match t.cmp(c) {
                Ordering::Greater => return true,
                Ordering::Less => return false,
                Ordering::Equal => {}
            }
        }
        false
    }
}

impl fmt::Display for StepPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, s) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{s}")?;
        }
        Ok(())
    }
}

impl FromStr for StepPath {
    type Err = SlipwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<i64>> for StepPath {
    fn from(v: Vec<i64>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/path.rs"]
mod tests;
