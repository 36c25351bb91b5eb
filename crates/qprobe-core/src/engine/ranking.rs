use crate::core::models::pair::PrimerPair;

/// Sorts by composite score, highest first, and assigns ranks `1..=N`.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_in_place(pairs: &mut [PrimerPair]) {
    pairs.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
    for (i, pair) in pairs.iter_mut().enumerate() {
        pair.rank = i + 1;
    }
}

pub fn rank(mut pairs: Vec<PrimerPair>) -> Vec<PrimerPair> {
    rank_in_place(&mut pairs);
    pairs
}
