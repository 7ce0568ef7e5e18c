//! Flavor text printed after a workout. Stateless; picks through [`Dice`].

use crate::gym::dice::Dice;

/// How a single exercise action turned out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Injured,
}

/// Lines for a completed workout, upbeat and weary alike. Every OK outcome
/// draws from this pool whether or not a stat went up.
const WORKOUT_LINES: [&str; 18] = [
    "Nice work! You finish the set buzzing and ready for the next one.",
    "Done. You walk away feeling a little stronger than you came in.",
    "That last rep was all heart. Energy is still humming through you.",
    "You catch your breath with a grin. That one counted.",
    "Solid session. Tired legs, but a clear head.",
    "You pushed harder than you planned to, and it shows.",
    "Proud moment: the effort was real and so are the gains.",
    "Tough set, but you stayed with it to the end.",
    "You leave the station with a spring in your step.",
    "Well earned. Every drop of sweat went somewhere.",
    "Oof. That took more out of you than expected.",
    "Your arms feel like wet noodles. Maybe that was too much.",
    "Everything aches a little. Tomorrow is going to be interesting.",
    "That was a grind from the first rep to the last.",
    "You could not quite keep up with yourself today.",
    "Not the session you hoped for. You are running on fumes.",
    "You hit a wall halfway through and dragged yourself over it.",
    "Rough one. You wonder if the water fountain is far.",
];

const INJURY_LINES: [&str; 4] = [
    "Something twinges badly. The session is over for today.",
    "A sharp pain stops you mid-rep. Time to get that looked at.",
    "The worn equipment gives way and so does your back.",
    "You limp toward the exit. Rest first, heroics later.",
];

pub fn narrate<D: Dice + ?Sized>(outcome: Outcome, dice: &mut D) -> &'static str {
    let pool: &[&'static str] = match outcome {
        Outcome::Ok => &WORKOUT_LINES,
        Outcome::Injured => &INJURY_LINES,
    };
    pool[dice.pick(pool.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::dice::RandomDice;

    #[test]
    fn narration_comes_from_the_matching_pool() {
        let mut dice = RandomDice::seeded(9);
        for _ in 0..50 {
            assert!(WORKOUT_LINES.contains(&narrate(Outcome::Ok, &mut dice)));
            assert!(INJURY_LINES.contains(&narrate(Outcome::Injured, &mut dice)));
        }
    }
}
