//! Built-in sample data source
//!
//! A deterministic penguin-like table so the dashboard is usable with no
//! files on disk. Includes a few empty measurements so the schema
//! inferencer and aggregation filters get exercised on real gaps.

use async_trait::async_trait;

use bl_core::data::{DataSource, Dataset, Record};

pub struct SampleDataSource;

impl SampleDataSource {
    pub const NAME: &'static str = "sample penguins";

    fn build() -> Dataset {
        let columns = vec![
            "Name".to_string(),
            "species".to_string(),
            "bill_length_mm".to_string(),
            "flipper_length_mm".to_string(),
            "body_mass_g".to_string(),
        ];

        // Three clusters, one per species; a pseudo-random walk keeps the
        // values deterministic across runs.
        let specs: [(&str, f64, f64, f64); 3] = [
            ("Adelie", 38.8, 190.0, 3700.0),
            ("Chinstrap", 48.8, 196.0, 3733.0),
            ("Gentoo", 47.5, 217.0, 5076.0),
        ];

        let mut rows = Vec::new();
        let mut state: u64 = 0x5eed;
        let mut jitter = |spread: f64| {
            // xorshift; plenty for sample data
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state % 2000) as f64 / 1000.0 - 1.0) * spread
        };

        for (species, bill, flipper, mass) in specs {
            for i in 0..40 {
                let name = format!("{species}-{i:02}");
                // Sprinkle in missing measurements.
                let bill_v = if i % 17 == 9 {
                    String::new()
                } else {
                    format!("{:.1}", bill + jitter(3.5))
                };
                let flipper_v = format!("{:.0}", flipper + jitter(8.0));
                let mass_v = format!("{:.0}", mass + jitter(450.0));
                rows.push(Record::new(vec![
                    name,
                    species.to_string(),
                    bill_v,
                    flipper_v,
                    mass_v,
                ]));
            }
        }

        Dataset::new(columns, rows)
    }
}

#[async_trait]
impl DataSource for SampleDataSource {
    async fn load(&self) -> anyhow::Result<Dataset> {
        Ok(Self::build())
    }

    fn source_name(&self) -> &str {
        Self::NAME
    }
}
