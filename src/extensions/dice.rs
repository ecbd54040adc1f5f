//! Dice notation parsing and rolling for the `!roll` command

use once_cell::sync::Lazy;
use rand::Rng;
use regex_lite::Regex;

static NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)d(\d+)([+-]\d+)?$").unwrap());

/// Rolls above these bounds are rejected as invalid notation
const MAX_DICE: u32 = 100;
const MAX_SIDES: u32 = 1000;

/// A parsed `NdS`, `NdS+M` or `NdS-M` dice notation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceSpec {
    pub count: u32,
    pub sides: u32,
    pub modifier: i64,
}

impl DiceSpec {
    /// Parse notation like `2d20`, `3d6+5` or `1d8-2`
    ///
    /// Case and embedded whitespace are ignored. Zero dice, zero sides and
    /// absurd sizes all come back as `None`.
    pub fn parse(input: &str) -> Option<Self> {
        let cleaned: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let caps = NOTATION.captures(&cleaned)?;

        let count: u32 = caps[1].parse().ok()?;
        let sides: u32 = caps[2].parse().ok()?;
        let modifier: i64 = match caps.get(3) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };

        if count == 0 || sides == 0 || count > MAX_DICE || sides > MAX_SIDES {
            return None;
        }

        Some(Self {
            count,
            sides,
            modifier,
        })
    }

    fn roll(&self, rng: &mut impl Rng) -> RollResult {
        let dice: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = dice.iter().map(|&d| i64::from(d)).sum::<i64>() + self.modifier;
        RollResult { dice, total }
    }
}

struct RollResult {
    dice: Vec<u32>,
    total: i64,
}

impl RollResult {
    fn breakdown(&self) -> String {
        self.dice
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Run the `!roll` command against raw argument text
///
/// With no arguments a single d6 is rolled. `advantage`/`disadvantage`
/// followed by a notation rolls it twice and picks the winner. Anything
/// unparseable gets a usage hint instead of an error.
pub fn roll_command(input: &str, sender: &str, rng: &mut impl Rng) -> String {
    let lowered = input.trim().to_lowercase();
    let mut tokens = lowered.split_whitespace();

    let Some(first) = tokens.next() else {
        return format!(
            "{} rolled a {} on a 6-sided die! 🎲",
            sender,
            rng.gen_range(1..=6)
        );
    };

    match first {
        "advantage" | "disadvantage" => {
            let advantage = first == "advantage";
            let Some(notation) = tokens.next() else {
                return invalid_tagged(&lowered);
            };
            match DiceSpec::parse(notation) {
                Some(spec) => tagged_roll(spec, sender, advantage, rng),
                None => invalid_tagged(notation),
            }
        }
        notation => match DiceSpec::parse(notation) {
            Some(spec) => standard_roll(spec, sender, rng),
            None => format!(
                "Invalid dice notation. Example: 2d20, 3d6+5. You typed: {}",
                notation
            ),
        },
    }
}

fn invalid_tagged(typed: &str) -> String {
    format!(
        "Invalid dice notation. Example: advantage 2d20, disadvantage 4d6. You typed: {}",
        typed
    )
}

fn standard_roll(spec: DiceSpec, sender: &str, rng: &mut impl Rng) -> String {
    let result = spec.roll(rng);
    format!(
        "{} rolled a {}d{}...:\n  Result: {} = {}\n{} rolled a {} total!",
        sender,
        spec.count,
        spec.sides,
        result.breakdown(),
        result.total,
        sender,
        result.total
    )
}

fn tagged_roll(spec: DiceSpec, sender: &str, advantage: bool, rng: &mut impl Rng) -> String {
    let first = spec.roll(rng);
    let second = spec.roll(rng);

    // Ties go to the second roll either way.
    let (tag, superlative, pick) = if advantage {
        let pick = if first.total > second.total { 1 } else { 2 };
        ("advantage", "highest", pick)
    } else {
        let pick = if first.total < second.total { 1 } else { 2 };
        ("disadvantage", "lowest", pick)
    };
    let winning_total = if pick == 1 { first.total } else { second.total };

    format!(
        "{} rolls a {}d{} with {}! Rolls are...:\n    #1: ({}) + {} = {}\n    #2: ({}) + {} = {}\n{} roll is #{} with {}!",
        sender,
        spec.count,
        spec.sides,
        tag,
        first.breakdown(),
        spec.modifier,
        first.total,
        second.breakdown(),
        spec.modifier,
        second.total,
        superlative,
        pick,
        winning_total
    )
}
