//! Locating containing periods across timelines

use crate::error::{PayoutError, TimelineKind};
use crate::timeline::Timespan;

/// First candidate whose range wholly contains `target`
///
/// Candidates are expected sorted ascending. An open end on either side is
/// treated as extending forever.
pub fn find_containing<'a, T, P>(
    target: &T,
    candidates: &'a [P],
    kind: TimelineKind,
) -> Result<&'a P, PayoutError>
where
    T: Timespan + ?Sized,
    P: Timespan,
{
    position_containing(target, candidates, kind).map(|idx| &candidates[idx])
}

/// Index of the first candidate wholly containing `target`
pub fn position_containing<T, P>(target: &T, candidates: &[P], kind: TimelineKind) -> Result<usize, PayoutError>
where
    T: Timespan + ?Sized,
    P: Timespan,
{
    candidates
        .iter()
        .position(|candidate| candidate.contains(target))
        .ok_or_else(|| PayoutError::MatchNotFound {
            timeline: kind,
            from: target.start(),
            to: target.end(),
        })
}

/// Like [`find_containing`], but a miss is not an error
pub fn try_find_containing<'a, T, P>(target: &T, candidates: &'a [P]) -> Option<&'a P>
where
    T: Timespan + ?Sized,
    P: Timespan,
{
    candidates.iter().find(|candidate| candidate.contains(target))
}

/// Number of candidates lying wholly inside `container`
pub fn count_contained<C, P>(container: &C, candidates: &[P]) -> usize
where
    C: Timespan + ?Sized,
    P: Timespan,
{
    candidates.iter().filter(|candidate| container.contains(*candidate)).count()
}
