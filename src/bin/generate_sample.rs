use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic processed Titanic table as CSV and Parquet.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of passengers
    #[arg(long, default_value_t = 891)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Output directory
    #[arg(long, default_value = "data/processed")]
    out_dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct Row {
    sex: &'static str,
    pclass: i64,
    embark_town: Option<&'static str>,
    age: Option<f64>,
    fare: Option<f64>,
    family_size: i64,
    survived: u8,
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

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick from `(item, weight)` pairs whose weights sum to 1.
    fn pick<T: Copy>(&mut self, weighted: &[(T, f64)]) -> T {
        let mut u = self.next_f64();
        for &(item, w) in weighted {
            if u < w {
                return item;
            }
            u -= w;
        }
        weighted[weighted.len() - 1].0
    }
}

fn passenger(rng: &mut SimpleRng) -> Row {
    let pclass = rng.pick(&[(1i64, 0.24), (2, 0.21), (3, 0.55)]);
    let sex = rng.pick(&[("male", 0.65), ("female", 0.35)]);
    let embark_town = if rng.chance(0.002) {
        None
    } else {
        Some(rng.pick(&[("Southampton", 0.72), ("Cherbourg", 0.19), ("Queenstown", 0.09)]))
    };

    let age = (!rng.chance(0.2)).then(|| {
        let mean = match pclass {
            1 => 38.0,
            2 => 30.0,
            _ => 25.0,
        };
        (rng.gauss(mean, 13.0).clamp(0.42, 80.0) * 10.0).round() / 10.0
    });

    let (log_mean, log_sd) = match pclass {
        1 => (4.2, 0.6),
        2 => (2.9, 0.4),
        _ => (2.2, 0.4),
    };
    let fare = Some((rng.gauss(log_mean, log_sd).exp() * 100.0).round() / 100.0);

    let mut family_size = 1;
    while family_size < 11 && rng.chance(if family_size == 1 { 0.4 } else { 0.35 }) {
        family_size += 1;
    }

    let base: f64 = if sex == "female" { 0.74 } else { 0.19 };
    let class_shift = match pclass {
        1 => 0.15,
        2 => 0.05,
        _ => -0.1,
    };
    let family_shift = if (2..=4).contains(&family_size) { 0.05 } else { -0.05 };
    let survived = rng.chance((base + class_shift + family_shift).clamp(0.02, 0.98));

    Row {
        sex,
        pclass,
        embark_town,
        age,
        fare,
        family_size,
        survived: u8::from(survived),
    }
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("sex", DataType::Utf8, false),
        Field::new("pclass", DataType::Int64, false),
        Field::new("embark_town", DataType::Utf8, true),
        Field::new("age", DataType::Float64, true),
        Field::new("fare", DataType::Float64, true),
        Field::new("family_size", DataType::Int64, false),
        Field::new("survived", DataType::Int64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.pclass))),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.embark_town).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.age).collect::<Vec<_>>())),
        Arc::new(Float64Array::from(rows.iter().map(|r| r.fare).collect::<Vec<_>>())),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.family_size))),
        Arc::new(Int64Array::from_iter_values(
            rows.iter().map(|r| i64::from(r.survived)),
        )),
    ];

    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let rows: Vec<Row> = (0..args.rows).map(|_| passenger(&mut rng)).collect();

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let csv_path = args.out_dir.join("titanic_processed.csv");
    write_csv(&csv_path, &rows)?;
    let parquet_path = args.out_dir.join("titanic_processed.parquet");
    write_parquet(&parquet_path, &rows)?;

    let survivors = rows.iter().filter(|r| r.survived == 1).count();
    println!(
        "Wrote {} passengers ({survivors} survivors) to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
