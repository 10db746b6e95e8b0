//! Attribute vocabulary and the defensive parsers behind it.
//!
//! Malformed values never fail a document: they are skipped with a warning and the
//! remaining well-formed values are kept.

use smallvec::SmallVec;

pub(crate) const ENTER_AT: &str = "enter-at";
pub(crate) const TOC_TITLE: &str = "toc-title";
pub(crate) const SCALE: &str = "scale";
pub(crate) const ROTATE: &str = "rotate";
pub(crate) const DELAY: &str = "delay";

pub(crate) const MK_HIDDEN_AT: &str = "mk-hidden-at";
pub(crate) const MK_VISIBLE_AT: &str = "mk-visible-at";
pub(crate) const MK_EMPHASIZE_AT: &str = "mk-emphasize-at";
pub(crate) const MK_UNEMPHASIZE_AT: &str = "mk-unemphasize-at";
pub(crate) const EMPHASIZE_AT: &str = "emphasize-at";
pub(crate) const CHG_VISIB_AT: &str = "chg-visib-at";
pub(crate) const STATIC_AT: &str = "static-at";
pub(crate) const DOWN_AT: &str = "down-at";
pub(crate) const UP_AT: &str = "up-at";
pub(crate) const CENTER_AT: &str = "center-at";
pub(crate) const FOCUS_AT: &str = "focus-at";
pub(crate) const UNFOCUS_AT: &str = "unfocus-at";
pub(crate) const EXEC_AT: &str = "exec-at";
pub(crate) const FIGURE_NEXT_AT: &str = "figure-next-at";
pub(crate) const FIGURE_PREVIOUS_AT: &str = "figure-previous-at";

pub(crate) const PAUSE: &str = "pause";
pub(crate) const STEP: &str = "step";
pub(crate) const AUTO_ENTER: &str = "auto-enter";
pub(crate) const IMMEDIATE_ENTER: &str = "immediate-enter";

pub(crate) const STATIC_AT_UNPAUSE: &str = "static-at-unpause";
pub(crate) const UNSTATIC_AT_UNPAUSE: &str = "unstatic-at-unpause";
pub(crate) const DOWN_AT_UNPAUSE: &str = "down-at-unpause";
pub(crate) const UP_AT_UNPAUSE: &str = "up-at-unpause";
pub(crate) const CENTER_AT_UNPAUSE: &str = "center-at-unpause";
pub(crate) const EXEC_AT_UNPAUSE: &str = "exec-at-unpause";
pub(crate) const REVEAL_AT_UNPAUSE: &str = "reveal-at-unpause";
pub(crate) const HIDE_AT_UNPAUSE: &str = "hide-at-unpause";
pub(crate) const FIGURE_SET_AT_UNPAUSE: &str = "figure-set-at-unpause";
pub(crate) const FIGURE_NEXT_AT_UNPAUSE: &str = "figure-next-at-unpause";
pub(crate) const FIGURE_PREVIOUS_AT_UNPAUSE: &str = "figure-previous-at-unpause";
pub(crate) const FOCUS_AT_UNPAUSE: &str = "focus-at-unpause";
pub(crate) const UNFOCUS_AT_UNPAUSE: &str = "unfocus-at-unpause";
pub(crate) const ENTER_AT_UNPAUSE: &str = "enter-at-unpause";

/// Every attribute whose value is a list of step indices, in application order.
pub(crate) const STEP_ATTRS: [&str; 15] = [
    MK_HIDDEN_AT,
    MK_VISIBLE_AT,
    MK_EMPHASIZE_AT,
    MK_UNEMPHASIZE_AT,
    EMPHASIZE_AT,
    CHG_VISIB_AT,
    STATIC_AT,
    DOWN_AT,
    UP_AT,
    CENTER_AT,
    FOCUS_AT,
    UNFOCUS_AT,
    EXEC_AT,
    FIGURE_NEXT_AT,
    FIGURE_PREVIOUS_AT,
];

pub(crate) type StepList = SmallVec<[i64; 4]>;

/// Largest step index or marker count a document may use. Documents above it are rejected
/// at validation, since every step up to `max_step` is materialised in the ToC and replays.
pub(crate) const MAX_STEP: i64 = 10_000;

/// Parse a space-separated list of signed step indices.
pub(crate) fn parse_steps(attr: &str, raw: &str) -> StepList {
    let mut out = StepList::new();
    for tok in raw.split_whitespace() {
        match tok.parse::<i64>() {
            Ok(v) => out.push(v),
            Err(_) => tracing::warn!(attr, value = tok, "ignoring non-numeric step value"),
        }
    }
    out
}

/// Parse the slot count of a `pause` / `step` marker. Empty, zero and malformed counts
/// all mean a single slot.
pub(crate) fn parse_count(attr: &str, raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 1;
    }
    match raw.parse::<u32>() {
        Ok(0) => 1,
        Ok(n) => n,
        Err(_) => {
            tracing::warn!(attr, value = raw, "ignoring malformed marker count");
            1
        }
    }
}

/// Parse a finite float attribute, falling back to `default`.
pub(crate) fn parse_f64(attr: &str, raw: Option<&String>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(attr, value = raw.as_str(), "ignoring malformed number");
            default
        }
    }
}

/// Target of an on-release attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Targets {
    /// Empty value: the marker node itself.
    Marker,
    /// Space-separated node ids.
    Ids(Vec<String>),
}

pub(crate) fn parse_targets(raw: &str) -> Targets {
    let ids: Vec<String> = raw.split_whitespace().map(str::to_owned).collect();
    if ids.is_empty() {
        Targets::Marker
    } else {
        Targets::Ids(ids)
    }
}

/// `"<figure-id> <step>"`.
pub(crate) fn parse_figure_set(raw: &str) -> Option<(String, u32)> {
    let mut it = raw.split_whitespace();
    let id = it.next()?;
    let step = it.next()?.parse::<u32>().ok()?;
    Some((id.to_owned(), step))
}

#[cfg(test)]
#[path = "../../tests/unit/document/attrs.rs"]
mod tests;
