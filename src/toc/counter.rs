use crate::engine::path::StepPath;

const ROMAN: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Numbering style of one stack level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStyle {
    /// `I, II, III`
    UpperRoman,
    /// `i, ii, iii`
    LowerRoman,
    /// `1, 2, 3`
    Decimal,
}

impl CounterStyle {
    /// Style used at stack `depth` (0 is the root).
    pub fn at_depth(depth: usize) -> Self {
        match depth {
            0 => Self::UpperRoman,
            1 => Self::Decimal,
            d => [Self::LowerRoman, Self::UpperRoman, Self::Decimal][(d - 2) % 3],
        }
    }

    /// Render the 1-based `n`. Values below 1 always render as decimals.
    pub fn render(self, n: i64) -> String {
        let Ok(mut rest) = u32::try_from(n) else {
            return n.to_string();
        };
        if rest == 0 || self == Self::Decimal {
            return n.to_string();
        }
        let mut out = String::new();
        for (value, digits) in ROMAN {
            while rest >= value {
                out.push_str(digits);
                rest -= value;
            }
        }
        if self == Self::LowerRoman {
            out.make_ascii_lowercase();
        }
        out
    }
}

/// Dotted counter for a stack path, one 1-based number per level: `[2, 1]` is `"III.2"`.
pub fn counter_label(path: &StepPath) -> String {
    path.steps()
        .iter()
        .enumerate()
        .map(|(depth, step)| CounterStyle::at_depth(depth).render(step + 1))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
#[path = "../../tests/unit/toc/counter.rs"]
mod tests;
