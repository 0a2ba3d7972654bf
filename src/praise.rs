use rand::seq::SliceRandom;
use rand::Rng;

/// Short cheers shown when a word is finished.
static TYPING_PRAISE: [&str; 6] = [
    "GREAT JOB!",
    "SUPER!",
    "YOU DID IT!",
    "AWESOME!",
    "NICE TYPING!",
    "WOW!",
];

/// Short cheers shown when a sum comes out right.
static ARITHMETIC_PRAISE: [&str; 6] = [
    "GREAT COUNTING!",
    "YOU GOT IT!",
    "SUPER MATH!",
    "WELL DONE!",
    "FANTASTIC!",
    "HOORAY!",
];

pub fn for_typing(rng: &mut impl Rng) -> &'static str {
    *TYPING_PRAISE.choose(rng).unwrap_or(&TYPING_PRAISE[0])
}

pub fn for_arithmetic(rng: &mut impl Rng) -> &'static str {
    *ARITHMETIC_PRAISE.choose(rng).unwrap_or(&ARITHMETIC_PRAISE[0])
}
