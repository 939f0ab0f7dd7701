use std::{collections::BTreeMap, path::PathBuf};

use chrono::Utc;
use glassbox_frame::ModelTask;
use glassbox_stats::descriptive::DescriptiveStats;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rand_pcg::Pcg64Mcg;

use crate::{
    schema::{
        dataset::{ColumnValues, Dataset, DatasetColumn},
        model::LinearModel,
    },
    util::Output,
};

const INTERCEPT: f64 = 1.5;
const ALCOHOL_WEIGHT: f64 = 0.35;
const SULPHATES_WEIGHT: f64 = 1.8;
const ACIDITY_WEIGHT: f64 = -2.4;
const RED_WEIGHT: f64 = -0.15;
const WHITE_WEIGHT: f64 = 0.1;
const NOISE_STD: f64 = 0.4;
const RED_FRACTION: f64 = 0.4;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateDataArg {
    /// Number of observations to generate
    #[arg(long, default_value_t = 600)]
    rows: usize,
    /// Random seed for reproducible datasets
    #[arg(long, default_value_t = 17)]
    seed: u64,
    /// Dataset output path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Model output path (skipped when omitted)
    #[arg(long)]
    model_output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateDataArg) -> anyhow::Result<()> {
    let GenerateDataArg {
        rows,
        seed,
        output,
        model_output,
    } = arg;

    let mut rng = Pcg64Mcg::seed_from_u64(*seed);
    let alcohol_dist = Normal::new(10.4, 1.2)?;
    let sulphates_dist = Normal::new(0.65, 0.12)?;
    let acidity_dist = Normal::new(0.32, 0.08)?;
    let noise_dist = Normal::new(0.0, NOISE_STD)?;

    let mut alcohol = Vec::with_capacity(*rows);
    let mut sulphates = Vec::with_capacity(*rows);
    let mut acidity = Vec::with_capacity(*rows);
    let mut wine_type = Vec::with_capacity(*rows);
    let mut quality = Vec::with_capacity(*rows);

    for _ in 0..*rows {
        let a: f64 = alcohol_dist.sample(&mut rng);
        let s: f64 = sulphates_dist.sample(&mut rng);
        let v: f64 = acidity_dist.sample(&mut rng);
        let is_red = rng.random_bool(RED_FRACTION);
        let type_weight = if is_red { RED_WEIGHT } else { WHITE_WEIGHT };

        let y = INTERCEPT
            + ALCOHOL_WEIGHT * a
            + SULPHATES_WEIGHT * s
            + ACIDITY_WEIGHT * v
            + type_weight
            + noise_dist.sample(&mut rng);

        alcohol.push(a);
        sulphates.push(s);
        acidity.push(v);
        wine_type.push(if is_red { "red" } else { "white" }.to_string());
        quality.push(y);
    }

    if let Some(stats) = DescriptiveStats::new(&quality) {
        eprintln!("Generated {rows} observations (seed {seed})");
        eprintln!(
            "  quality: min {:.2}, max {:.2}, mean {:.2}, std {:.2}",
            stats.min, stats.max, stats.mean, stats.std_dev
        );
    }

    let dataset = Dataset {
        generated_at: Some(Utc::now()),
        columns: vec![
            DatasetColumn {
                name: "alcohol".to_string(),
                values: ColumnValues::Numeric(alcohol),
            },
            DatasetColumn {
                name: "sulphates".to_string(),
                values: ColumnValues::Numeric(sulphates),
            },
            DatasetColumn {
                name: "acidity".to_string(),
                values: ColumnValues::Numeric(acidity),
            },
            DatasetColumn {
                name: "type".to_string(),
                values: ColumnValues::Labels(wine_type),
            },
            DatasetColumn {
                name: "quality".to_string(),
                values: ColumnValues::Numeric(quality),
            },
        ],
    };
    Output::save_json(&dataset, output.clone())?;

    if let Some(model_path) = model_output {
        let mut coefficients = BTreeMap::new();
        coefficients.insert("alcohol".to_string(), ALCOHOL_WEIGHT);
        coefficients.insert("sulphates".to_string(), SULPHATES_WEIGHT);
        coefficients.insert("acidity".to_string(), ACIDITY_WEIGHT);
        coefficients.insert("type_red".to_string(), RED_WEIGHT);
        coefficients.insert("type_white".to_string(), WHITE_WEIGHT);
        let model = LinearModel {
            intercept: INTERCEPT,
            coefficients,
            task: ModelTask::Regression,
        };
        Output::save_json(&model, Some(model_path.clone()))?;
        eprintln!("Model written to {}", model_path.display());
    }

    Ok(())
}
