//! Two-line crossover signal generation.
//!
//! Both generators only evaluate index `i` when the fast and slow lines are
//! defined at `i` and `i - 1`; everywhere else the signal is [`Signal::Hold`].

use serde::Serialize;

use crate::domain::error::StockeaseError;
use crate::domain::indicator::IndicatorSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i8")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn code(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

impl From<Signal> for i8 {
    fn from(signal: Signal) -> Self {
        signal.code()
    }
}

/// Entry gate for the golden-cross variant: `series[i] > threshold`.
#[derive(Debug, Clone, Copy)]
pub struct MomentumFilter<'a> {
    pub series: &'a IndicatorSeries,
    pub threshold: f64,
}

impl MomentumFilter<'_> {
    fn holds(&self, index: usize) -> bool {
        self.series
            .get(index)
            .is_some_and(|value| value > self.threshold)
    }
}

/// Golden cross: buy on the bar where fast moves from `<=` slow to `>` slow and
/// the momentum filter (if any) holds; sell on every bar where fast is below slow.
///
/// Entries are edge-triggered, exits are level-triggered.
pub fn golden_cross_signals(
    fast: &IndicatorSeries,
    slow: &IndicatorSeries,
    momentum: Option<MomentumFilter<'_>>,
) -> Result<Vec<Signal>, StockeaseError> {
    ensure_aligned("slow", fast.len(), slow.len())?;
    if let Some(filter) = &momentum {
        ensure_aligned("momentum", fast.len(), filter.series.len())?;
    }

    let signals = (0..fast.len())
        .map(|i| match defined_pair(fast, slow, i) {
            None => Signal::Hold,
            Some(((f_prev, s_prev), (f, s))) => {
                let crossed_up = f_prev <= s_prev && f > s;
                let momentum_ok = momentum.as_ref().is_none_or(|m| m.holds(i));
                if crossed_up && momentum_ok {
                    Signal::Buy
                } else if f < s {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        })
        .collect();

    Ok(signals)
}

/// Crossover confirmed by price direction: buy when fast crosses above slow and
/// the close rose; sell when fast crosses below slow and the close fell.
pub fn price_confirmed_signals(
    fast: &IndicatorSeries,
    slow: &IndicatorSeries,
    closes: &[f64],
) -> Result<Vec<Signal>, StockeaseError> {
    ensure_aligned("slow", fast.len(), slow.len())?;
    ensure_aligned("closes", fast.len(), closes.len())?;

    let signals = (0..fast.len())
        .map(|i| match defined_pair(fast, slow, i) {
            None => Signal::Hold,
            Some(((f_prev, s_prev), (f, s))) => {
                let price_change = closes[i] - closes[i - 1];
                if f_prev <= s_prev && f > s && price_change > 0.0 {
                    Signal::Buy
                } else if f_prev >= s_prev && f < s && price_change < 0.0 {
                    Signal::Sell
                } else {
                    Signal::Hold
                }
            }
        })
        .collect();

    Ok(signals)
}

/// First difference of signal codes; `positions[0] == 0`.
pub fn positions(signals: &[Signal]) -> Vec<i8> {
    let mut out = Vec::with_capacity(signals.len());
    if !signals.is_empty() {
        out.push(0);
    }
    out.extend(signals.windows(2).map(|w| w[1].code() - w[0].code()));
    out
}

type Pair = (f64, f64);

fn defined_pair(fast: &IndicatorSeries, slow: &IndicatorSeries, i: usize) -> Option<(Pair, Pair)> {
    if i == 0 {
        return None;
    }
    Some((
        (fast.get(i - 1)?, slow.get(i - 1)?),
        (fast.get(i)?, slow.get(i)?),
    ))
}

fn ensure_aligned(name: &str, expected: usize, actual: usize) -> Result<(), StockeaseError> {
    if expected != actual {
        return Err(StockeaseError::InvalidParameter {
            name: name.to_string(),
            value: actual.to_string(),
            reason: format!("length must match fast line length {}", expected),
        });
    }
    Ok(())
}
