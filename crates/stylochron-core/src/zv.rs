//! The windowed dependency statistic (ZV) and the two-sample builder.
//!
//! ZV(i, T) = (1/T) · Σ_{j=0..T-1} Dis(chunk[i], chunk[i-j])
//!
//! The j = 0 self-distance term is part of the sum. A window that would
//! reach before the start of the sequence is an error; indices never wrap.

use std::ops::Range;

use serde::Serialize;

use crate::distance::{DistanceMetric, chunk_distance};
use crate::document::MergedSequence;
use crate::error::{EngineError, Result};

/// ZV value at one chunk index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZvPoint {
    pub index: usize,
    pub value: f64,
}

/// The two ZV samples compared by the two-sample test at one window size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZvSamples {
    pub window: usize,
    /// ZV over indices [window+1, len(A)).
    pub first: Vec<f64>,
    /// ZV over indices [len(A)+1, len(A)+len(B)).
    pub second: Vec<f64>,
}

impl ZvSamples {
    /// Both samples hold at least one value.
    pub fn is_evaluable(&self) -> bool {
        !self.first.is_empty() && !self.second.is_empty()
    }
}

/// Index range of the first-document sample: [time+1, split).
pub fn first_sample_range(split: usize, time: usize) -> Range<usize> {
    (time + 1)..split
}

/// Index range of the second-document sample: [split+1, len).
pub fn second_sample_range(split: usize, len: usize) -> Range<usize> {
    (split + 1)..len
}

/// Mean distance between chunk `index` and its `time` most recent chunks
/// (itself included).
pub fn zv<M>(sequence: &MergedSequence<'_>, index: usize, time: usize, metric: &M) -> Result<f64>
where
    M: DistanceMetric + ?Sized,
{
    if time == 0 {
        return Err(EngineError::WindowTooSmall);
    }
    let target = sequence.get(index)?;
    if time - 1 > index {
        return Err(EngineError::WindowOutOfBounds {
            index,
            offset: index + 1,
        });
    }

    let mut sum = 0.0;
    for j in 0..time {
        sum += chunk_distance(target, sequence.get(index - j)?, metric)?;
    }
    Ok(sum / time as f64)
}

/// ZV at every index of `range`.
pub fn zv_profile<M>(
    sequence: &MergedSequence<'_>,
    time: usize,
    range: Range<usize>,
    metric: &M,
) -> Result<Vec<ZvPoint>>
where
    M: DistanceMetric + ?Sized,
{
    if time == 0 {
        return Err(EngineError::WindowTooSmall);
    }
    range
        .map(|index| {
            zv(sequence, index, time, metric).map(|value| ZvPoint { index, value })
        })
        .collect()
}

/// Build the two ZV samples for window size `time`.
///
/// The first sample skips the first `time + 1` chunks of document A; the
/// second skips the first chunk of document B. Either may come back empty
/// when the documents are short relative to the window; callers check
/// [`ZvSamples::is_evaluable`].
pub fn build_samples<M>(sequence: &MergedSequence<'_>, time: usize, metric: &M) -> Result<ZvSamples>
where
    M: DistanceMetric + ?Sized,
{
    if time == 0 {
        return Err(EngineError::WindowTooSmall);
    }
    let split = sequence.split();
    let first = first_sample_range(split, time)
        .map(|i| zv(sequence, i, time, metric))
        .collect::<Result<Vec<_>>>()?;
    let second = second_sample_range(split, sequence.len())
        .map(|i| zv(sequence, i, time, metric))
        .collect::<Result<Vec<_>>>()?;

    Ok(ZvSamples {
        window: time,
        first,
        second,
    })
}
