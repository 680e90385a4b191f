//! Weighted random draw over active quotes
//!
//! A quote's chance of being picked is its weight divided by the total weight
//! of the eligible pool. The pool is walked in ascending id order so the draw
//! only depends on the random number, never on the order rows came back in.

use rand::Rng;

/// A selectable quote: its id and integer weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: i64,
    pub weight: i64,
}

impl Candidate {
    pub fn new(id: i64, weight: i64) -> Self {
        Self { id, weight }
    }
}

/// Pick one candidate id proportionally to weight
///
/// Candidates with non-positive weight and the `exclude_id` candidate are
/// ignored. Returns `None` when the remaining weight is zero.
pub fn pick<R: Rng + ?Sized>(
    candidates: &[Candidate],
    exclude_id: Option<i64>,
    rng: &mut R,
) -> Option<i64> {
    let mut eligible: Vec<Candidate> = candidates
        .iter()
        .copied()
        .filter(|c| c.weight > 0 && Some(c.id) != exclude_id)
        .collect();

    let total: i64 = eligible.iter().map(|c| c.weight).sum();
    if total <= 0 {
        return None;
    }

    eligible.sort_by_key(|c| c.id);

    let target = rng.gen_range(1..=total);
    let mut cumulative = 0;
    for candidate in &eligible {
        cumulative += candidate.weight;
        if cumulative >= target {
            return Some(candidate.id);
        }
    }

    None
}

/// Pick with exclusion, retrying without it if the exclusion empties the pool
///
/// A visitor whose last-shown quote is the only one available still gets it
/// back rather than an empty result.
pub fn pick_with_fallback<R: Rng + ?Sized>(
    candidates: &[Candidate],
    exclude_id: Option<i64>,
    rng: &mut R,
) -> Option<i64> {
    match pick(candidates, exclude_id, rng) {
        Some(id) => Some(id),
        None if exclude_id.is_some() => pick(candidates, None, rng),
        None => None,
    }
}
