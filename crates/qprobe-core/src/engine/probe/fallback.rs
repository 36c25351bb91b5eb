use super::candidate::{Candidate, select_best};
use super::filters::{Rejection, check_window};
use super::PairContext;
use crate::core::thermo::closed_form::round2;
use itertools::{Either, Itertools};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Exhaustive windowed search over the region; in-band candidates win over out-of-band ones.
pub(crate) fn search(ctx: &PairContext) -> Option<Candidate> {
    let region = ctx.region;
    let min_length = ctx.config().min_length;
    let max_length = ctx.config().max_length.min(region.len());
    if max_length < min_length {
        return None;
    }

    let (windows, rejected): (Vec<(usize, usize)>, Vec<Rejection>) = (min_length..=max_length)
        .cartesian_product(region.start..region.end)
        .filter(|&(len, start)| region.contains(start, len))
        .partition_map(|(len, start)| {
            match check_window(ctx.index(), start, len, ctx.thresholds()) {
                Ok(()) => Either::Left((start, len)),
                Err(reason) => Either::Right(reason),
            }
        });

    debug!(
        windows = windows.len(),
        rejected = ?rejected.into_iter().counts(),
        "Enumerated fallback probe windows."
    );

    #[cfg(not(feature = "parallel"))]
    let iterator = windows.iter();

    #[cfg(feature = "parallel")]
    let iterator = windows.par_iter();

    let candidates: Vec<Candidate> = iterator
        .filter_map(|&(start, len)| evaluate_window(ctx, start, len))
        .collect();

    let t = ctx.thresholds();
    let (in_band, out_of_band): (Vec<Candidate>, Vec<Candidate>) =
        candidates.into_iter().partition(|c| {
            let delta = c.tm - ctx.primer_avg_tm;
            t.tm_delta_min <= delta && delta <= t.tm_delta_max
        });

    debug!(
        in_band = in_band.len(),
        out_of_band = out_of_band.len(),
        "Scored fallback probe candidates."
    );

    select_best(in_band).or_else(|| select_best(out_of_band))
}

fn evaluate_window(ctx: &PairContext, start: usize, len: usize) -> Option<Candidate> {
    let sequence = ctx.index().window(start, len)?;
    let tm = ctx.adapter().tm_or_fallback(sequence);
    let gc_percent = round2(ctx.index().gc_percent(start, len));
    ctx.score(start, sequence, tm, gc_percent)
}
