use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::chart::SeriesPoint;
use crate::models::market::TrendingStock;
use crate::models::pick::{OutcomeStatus, Pick, Sentiment, TargetRange};

/// Largest noise applied to an interpolated point, as a fraction of its value.
const NOISE_FRACTION: f64 = 0.02;

/// Universe used for demo trending stocks and picks: (symbol, name, base price).
const DEMO_UNIVERSE: [(&str, &str, f64); 10] = [
    ("AAPL", "Apple Inc.", 189.0),
    ("MSFT", "Microsoft Corp.", 415.0),
    ("NVDA", "NVIDIA Corp.", 875.0),
    ("TSLA", "Tesla Inc.", 178.0),
    ("AMZN", "Amazon.com Inc.", 181.0),
    ("META", "Meta Platforms Inc.", 495.0),
    ("GOOGL", "Alphabet Inc.", 152.0),
    ("AMD", "Advanced Micro Devices", 162.0),
    ("NFLX", "Netflix Inc.", 610.0),
    ("PLTR", "Palantir Technologies", 24.0),
];

/// Synthesizes plausible-looking data for when the backend is unreachable.
///
/// Seeded generators produce identical output for identical calls, which is
/// what tests rely on. Production code uses [`DemoDataGenerator::new`].
pub struct DemoDataGenerator {
    rng: StdRng,
}

impl DemoDataGenerator {
    /// Generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A `days`-long series walking linearly from `start` to `end` with up to
    /// ±2 % noise per point. The last point is exactly `end`; values never go
    /// negative.
    pub fn generate_performance_data(&mut self, start: f64, end: f64, days: u32) -> Vec<SeriesPoint> {
        match days {
            0 => return Vec::new(),
            1 => return vec![SeriesPoint { day: 0, value: end }],
            _ => {}
        }

        let last = days - 1;
        let mut points = Vec::with_capacity(days as usize);
        for day in 0..last {
            let t = f64::from(day) / f64::from(last);
            let base = start + (end - start) * t;
            let noise = self.rng.gen_range(-NOISE_FRACTION..=NOISE_FRACTION) * base.abs();
            points.push(SeriesPoint {
                day,
                value: (base + noise).max(0.0),
            });
        }
        points.push(SeriesPoint { day: last, value: end });
        points
    }

    /// Demo rows for the trending panel, one per symbol in the demo universe.
    pub fn mock_trending_stocks(&mut self) -> Vec<TrendingStock> {
        DEMO_UNIVERSE
            .iter()
            .map(|(symbol, name, base)| {
                let change_percent = self.rng.gen_range(-6.0..=6.0);
                let price = base * (1.0 + change_percent / 100.0);
                let sentiment = if change_percent >= 0.0 {
                    Sentiment::Bullish
                } else {
                    Sentiment::Bearish
                };
                TrendingStock {
                    symbol: (*symbol).to_string(),
                    name: (*name).to_string(),
                    price: (price * 100.0).round() / 100.0,
                    change_percent: (change_percent * 100.0).round() / 100.0,
                    volume: self.rng.gen_range(2_000_000..80_000_000),
                    sentiment: Some(sentiment),
                }
            })
            .collect()
    }

    /// `n` valid demo picks created over the week before `now`, cycling through
    /// the demo universe.
    pub fn mock_picks(&mut self, n: usize, now: DateTime<Utc>) -> Vec<Pick> {
        (0..n)
            .map(|i| {
                let (symbol, _, base) = DEMO_UNIVERSE[i % DEMO_UNIVERSE.len()];
                let sentiment = if self.rng.gen_bool(0.65) {
                    Sentiment::Bullish
                } else {
                    Sentiment::Bearish
                };
                let entry = base * self.rng.gen_range(0.97..=1.03);
                let step = entry * self.rng.gen_range(0.03..=0.06);
                let (targets, stop) = match sentiment {
                    Sentiment::Bullish => (
                        TargetRange::new(entry + step, entry + 2.0 * step, entry + 3.0 * step),
                        entry - step,
                    ),
                    Sentiment::Bearish => (
                        TargetRange::new(entry - step, entry - 2.0 * step, entry - 3.0 * step),
                        entry + step,
                    ),
                };
                let created_at = now - Duration::minutes(self.rng.gen_range(0..7 * 24 * 60));
                let mut pick = Pick::new(
                    symbol,
                    sentiment,
                    self.rng.gen_range(55.0..=95.0_f64).round(),
                    round_cents(entry),
                    TargetRange::new(
                        round_cents(targets.low),
                        round_cents(targets.mid),
                        round_cents(targets.high),
                    ),
                    round_cents(stop),
                    created_at,
                );
                pick.current_price = Some(round_cents(entry * self.rng.gen_range(0.95..=1.05)));
                pick.outcome = Some(OutcomeStatus::Active);
                pick.reasoning = Some("Demo pick generated offline".into());
                pick
            })
            .collect()
    }
}

impl Default for DemoDataGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
