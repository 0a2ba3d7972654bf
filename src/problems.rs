use rand::seq::SliceRandom;
use rand::Rng;

/// Operand range for generated problems. Small sums keep the piles
/// countable on screen.
pub const OPERAND_MIN: u32 = 1;
pub const OPERAND_MAX: u32 = 5;

/// What the units being counted look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Theme {
    Apples,
    Stars,
    Ducks,
    Balloons,
    Shells,
    Frogs,
}

impl Theme {
    pub fn emoji(&self) -> &'static str {
        match self {
            Theme::Apples => "🍎",
            Theme::Stars => "⭐",
            Theme::Ducks => "🦆",
            Theme::Balloons => "🎈",
            Theme::Shells => "🐚",
            Theme::Frogs => "🐸",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[
            Theme::Apples,
            Theme::Stars,
            Theme::Ducks,
            Theme::Balloons,
            Theme::Shells,
            Theme::Frogs,
        ]
    }
}

/// A single `a + b` counting problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdditionProblem {
    pub operand_a: u32,
    pub operand_b: u32,
    pub theme: Theme,
}

impl AdditionProblem {
    pub fn new(operand_a: u32, operand_b: u32, theme: Theme) -> Self {
        Self {
            operand_a,
            operand_b,
            theme,
        }
    }

    pub fn generate(rng: &mut impl Rng) -> Self {
        let theme = *Theme::all()
            .choose(rng)
            .unwrap_or(&Theme::Apples);
        Self {
            operand_a: rng.gen_range(OPERAND_MIN..=OPERAND_MAX),
            operand_b: rng.gen_range(OPERAND_MIN..=OPERAND_MAX),
            theme,
        }
    }

    pub fn target(&self) -> u32 {
        self.operand_a + self.operand_b
    }
}
