use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::Parser;
use csv::{QuoteStyle, WriterBuilder};

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Write a synthetic two-station daily temperature series")]
struct Args {
    #[arg(long, default_value_t = 365, help = "Number of days to generate")]
    rows: usize,
    #[arg(long, default_value_t = 42, help = "PRNG seed")]
    seed: u64,
    #[arg(long, default_value = "temperature_series.csv", help = "Output CSV path")]
    output: PathBuf,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const FIRST_DAY: (i32, u32, u32) = (2024, 1, 1);

/// Day `n` (0-based) counted from `start`.
fn date_for_day(start: NaiveDate, n: usize) -> Option<NaiveDate> {
    start.checked_add_days(Days::new(n as u64))
}

/// Seasonal daily maximum for a tropical station, one decimal place.
fn daily_max(day: usize, mean: f64, rng: &mut SimpleRng) -> f64 {
    let season = (2.0 * std::f64::consts::PI * day as f64 / 365.0).sin();
    let t = rng.gauss(mean + 2.5 * season, 1.2);
    (t * 10.0).round() / 10.0
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);
    let (year, month, day) = FIRST_DAY;
    let start = NaiveDate::from_ymd_opt(year, month, day).context("invalid start date")?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;

    writer.write_record(["date", "north", "northeast"])?;

    let mut malformed = 0;
    for day in 0..args.rows {
        let date = date_for_day(start, day)
            .with_context(|| format!("day {day} is out of the calendar range"))?
            .format("%Y-%m-%d")
            .to_string();
        let north = format!("{:.1}", daily_max(day, 31.0, &mut rng));
        let northeast = format!("{:.1}", daily_max(day, 32.0, &mut rng));

        // ~2% of rows: a missing field or a non-numeric reading.
        match rng.next_u64() % 100 {
            0 => {
                writer.write_record([date.as_str(), north.as_str()])?;
                malformed += 1;
            }
            1 => {
                writer.write_record([date.as_str(), "n/a", northeast.as_str()])?;
                malformed += 1;
            }
            _ => writer.write_record([date.as_str(), north.as_str(), northeast.as_str()])?,
        }
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} days ({malformed} malformed) to {}",
        args.rows,
        args.output.display()
    );
    Ok(())
}
