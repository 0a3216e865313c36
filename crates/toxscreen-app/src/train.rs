//! The `train` subcommand: CSV in, console report and artifacts out.

use std::path::PathBuf;

use anyhow::Context;

use toxscreen_core::ModelConfig;
use toxscreen_pipeline::{
    load_csv, save_artifacts, DatasetOptions, RandomForestConfig, SplitConfig, SweepReport,
};

/// Everything one training run needs, assembled from the CLI.
#[derive(Debug, Clone)]
pub struct TrainRun {
    pub input: PathBuf,
    pub dataset: DatasetOptions,
    pub split: SplitConfig,
    pub forest: RandomForestConfig,
    pub thresholds: Vec<f64>,
    pub default_threshold: f64,
    pub out: PathBuf,
}

pub fn run(run: TrainRun) -> anyhow::Result<()> {
    let (data, stats) = load_csv(&run.input, &run.dataset)
        .with_context(|| format!("loading {}", run.input.display()))?;

    println!();
    println!("  Dataset: {}", run.input.display());
    println!("    rows          {}", stats.total_rows);
    println!("    kept          {}", stats.kept_rows);
    println!("    unparseable   {}", stats.unparseable_structures);
    println!("    no label      {}", stats.missing_labels);
    println!(
        "    classes       {} positive / {} negative ({})",
        data.positives(),
        data.n_rows() - data.positives(),
        run.dataset.label_column
    );

    let fitted = data.split(&run.split)?.fit(&run.forest)?;
    let report = fitted.evaluate(&run.thresholds)?;
    print_report(&report);

    let config = ModelConfig {
        n_bits: run.dataset.n_bits,
        radius: run.dataset.radius,
        threshold: run.default_threshold,
        label_column: run.dataset.label_column.clone(),
        trained_at: Some(chrono::Utc::now().to_rfc3339()),
    };
    let model = fitted.into_model();
    save_artifacts(&run.out, &model, &config)
        .with_context(|| format!("writing artifacts to {}", run.out.display()))?;

    println!();
    println!("  Artifacts written to {}", run.out.display());
    println!("  Serve them with: toxscreen serve --artifacts {}", run.out.display());
    println!();
    Ok(())
}

/// Print the threshold sweep table. The choice of operating threshold is
/// left to the reader; nothing here picks a "best" row.
fn print_report(report: &SweepReport) {
    println!();
    if report.resample.skipped {
        println!("  Oversampling skipped: no positive rows in the training partition");
    } else {
        println!(
            "  Training partition: {} rows -> {} after oversampling ({} -> {} positives)",
            report.resample.rows_before,
            report.resample.rows_after,
            report.resample.positives_before,
            report.resample.positives_after
        );
    }
    println!(
        "  Test partition: {} rows, {} positive",
        report.test_rows, report.test_positives
    );
    println!();
    println!("  threshold   recall   precision   flagged");
    println!("  ---------   ------   ---------   -------");
    for row in &report.rows {
        println!(
            "  {:>9.2}   {:>6.3}   {:>9.3}   {:>7}",
            row.threshold, row.recall, row.precision, row.predicted_positives
        );
    }
}

/// Parse the comma-separated threshold grid from the CLI.
pub fn parse_thresholds(raw: &str) -> anyhow::Result<Vec<f64>> {
    let thresholds: Vec<f64> = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("invalid threshold list '{raw}'"))?;
    if thresholds.is_empty() || thresholds.iter().any(|t| !(0.0..=1.0).contains(t)) {
        anyhow::bail!("thresholds must be in [0, 1], got '{raw}'");
    }
    Ok(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_list_parses() {
        assert_eq!(
            parse_thresholds("0.1, 0.2,0.3").unwrap(),
            vec![0.1, 0.2, 0.3]
        );
        assert!(parse_thresholds("0.1,oops").is_err());
        assert!(parse_thresholds("0.5,1.5").is_err());
        assert!(parse_thresholds("").is_err());
    }

    #[test]
    fn end_to_end_train_writes_artifacts() {
        use std::io::Write;

        let mut csv = tempfile::NamedTempFile::new().unwrap();
        writeln!(csv, "smiles,NR-AR").unwrap();
        for _ in 0..10 {
            writeln!(csv, "CCO,0").unwrap();
            writeln!(csv, "CCC,0").unwrap();
        }
        for _ in 0..5 {
            writeln!(csv, "c1ccccc1O,1").unwrap();
        }

        let out = tempfile::tempdir().unwrap();
        run(TrainRun {
            input: csv.path().to_path_buf(),
            dataset: DatasetOptions {
                n_bits: 128,
                ..Default::default()
            },
            split: SplitConfig::default(),
            forest: RandomForestConfig {
                n_trees: 5,
                ..Default::default()
            },
            thresholds: vec![0.3, 0.5],
            default_threshold: 0.3,
            out: out.path().to_path_buf(),
        })
        .unwrap();

        assert!(out.path().join("model.json").exists());
        assert!(out.path().join("config.json").exists());
    }
}
