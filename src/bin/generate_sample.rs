use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const SECTORS: [(&str, f64); 11] = [
    ("Agriculture", 0.12),
    ("Land-use change and forestry", 0.06),
    ("Waste", 0.03),
    ("Industry", 0.06),
    ("Manufacturing and construction", 0.12),
    ("Transport", 0.15),
    ("Electricity and heat", 0.30),
    ("Buildings", 0.06),
    ("Fugitive emissions", 0.05),
    ("Other fuel combustion", 0.02),
    ("Aviation and shipping", 0.03),
];

/// (entity, ISO code, 1990 total in tonnes, yearly growth)
const COUNTRIES: [(&str, &str, f64, f64); 10] = [
    ("United States", "USA", 5.8e9, 0.002),
    ("China", "CHN", 3.2e9, 0.055),
    ("India", "IND", 1.0e9, 0.045),
    ("Germany", "DEU", 1.2e9, -0.012),
    ("Brazil", "BRA", 1.4e9, 0.01),
    ("Russia", "RUS", 3.0e9, -0.01),
    ("Japan", "JPN", 1.1e9, 0.001),
    ("Nigeria", "NGA", 0.25e9, 0.03),
    ("Australia", "AUS", 0.5e9, 0.008),
    ("Chile", "CHL", 0.05e9, 0.035),
];

const FIRST_YEAR: i64 = 1990;
const LAST_YEAR: i64 = 2019;

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
}

struct Row {
    entity: &'static str,
    code: &'static str,
    year: i64,
    values: Vec<Option<f64>>,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(entity, code, base, growth) in &COUNTRIES {
        for year in FIRST_YEAR..=LAST_YEAR {
            let trend = base * (1.0 + growth).powi((year - FIRST_YEAR) as i32);
            let values = SECTORS
                .iter()
                .map(|&(_, share)| {
                    // A few cells are left empty, as in the published dataset.
                    if rng.next_f64() < 0.02 {
                        None
                    } else {
                        let noise = 0.9 + 0.2 * rng.next_f64();
                        Some((trend * share * noise).round())
                    }
                })
                .collect();
            rows.push(Row {
                entity,
                code,
                year,
                values,
            });
        }
    }
    rows
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;

    let mut header = vec!["Entity", "Code", "Year"];
    header.extend(SECTORS.iter().map(|&(name, _)| name));
    writer.write_record(&header).context("writing CSV header")?;

    for row in rows {
        let mut record = vec![
            row.entity.to_string(),
            row.code.to_string(),
            row.year.to_string(),
        ];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let mut fields = vec![
        Field::new("Entity", DataType::Utf8, false),
        Field::new("Code", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, false),
    ];
    fields.extend(
        SECTORS
            .iter()
            .map(|&(name, _)| Field::new(name, DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.entity).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.code).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(
            rows.iter().map(|r| r.year).collect::<Vec<_>>(),
        )),
    ];
    for idx in 0..SECTORS.len() {
        let values: Float64Array = rows.iter().map(|r| r.values[idx]).collect();
        columns.push(Arc::new(values));
    }

    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("Failed to create writer")?;
    writer.write(&batch).context("Failed to write batch")?;
    writer.close().context("Failed to close writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    let csv_path = "ghg-emissions-by-sector.csv";
    let parquet_path = "ghg-emissions-by-sector.parquet";
    write_csv(&rows, csv_path)?;
    write_parquet(&rows, parquet_path)?;

    println!(
        "Wrote {} rows ({} entities, {FIRST_YEAR}–{LAST_YEAR}) to {csv_path} and {parquet_path}",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
