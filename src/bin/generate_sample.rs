use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

struct Row {
    total_bill: f64,
    tip: f64,
    sex: &'static str,
    smoker: &'static str,
    day: &'static str,
    time: &'static str,
    size: i64,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    // Service schedule: weekday lunch and dinner, weekend dinner only.
    let services: &[(&str, &str, usize)] = &[
        ("Thur", "Lunch", 40),
        ("Thur", "Dinner", 12),
        ("Fri", "Lunch", 14),
        ("Fri", "Dinner", 22),
        ("Sat", "Dinner", 60),
        ("Sun", "Dinner", 52),
    ];
    let party_sizes: [i64; 10] = [1, 2, 2, 2, 2, 3, 3, 4, 4, 5];

    let mut rows = Vec::new();
    for &(day, time, n) in services {
        for _ in 0..n {
            let size = party_sizes[(rng.next_u64() % party_sizes.len() as u64) as usize];
            let bill = (rng.gauss(9.5 + 5.2 * size as f64, 6.0)).clamp(3.0, 60.0);
            let rate = rng.gauss(0.16, 0.04).clamp(0.05, 0.30);

            rows.push(Row {
                total_bill: round_cents(bill),
                tip: round_cents(bill * rate),
                sex: if rng.next_f64() < 0.55 { "Male" } else { "Female" },
                smoker: if rng.next_f64() < 0.38 { "Yes" } else { "No" },
                day,
                time,
                size,
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create CSV file");
    writer
        .write_record(["total_bill", "tip", "sex", "smoker", "day", "time", "size"])
        .expect("Failed to write CSV header");
    for row in rows {
        writer
            .write_record([
                format!("{:.2}", row.total_bill),
                format!("{:.2}", row.tip),
                row.sex.to_string(),
                row.smoker.to_string(),
                row.day.to_string(),
                row.time.to_string(),
                row.size.to_string(),
            ])
            .expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(rows: &[Row], path: &str) {
    let schema = Arc::new(Schema::new(vec![
        Field::new("total_bill", DataType::Float64, false),
        Field::new("tip", DataType::Float64, false),
        Field::new("sex", DataType::Utf8, false),
        Field::new("smoker", DataType::Utf8, false),
        Field::new("day", DataType::Utf8, false),
        Field::new("time", DataType::Utf8, false),
        Field::new("size", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|r| r.total_bill),
            )),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.tip))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.sex))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.smoker))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.day))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.time))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.size))),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "tips_sample.csv");
    write_parquet(&rows, "tips_sample.parquet");

    println!(
        "Wrote {} records to tips_sample.csv and tips_sample.parquet",
        rows.len()
    );
}
