use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use toxscreen_app::cli::{Cli, Commands};
use toxscreen_app::server::{run_server, PredictService};
use toxscreen_app::train::{self, TrainRun};
use toxscreen_pipeline::{DatasetOptions, RandomForestConfig, SplitConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            input,
            smiles_column,
            label_column,
            n_bits,
            radius,
            test_fraction,
            trees,
            max_depth,
            seed,
            thresholds,
            default_threshold,
            out,
            verbose,
        } => {
            init_logging(verbose);

            train::run(TrainRun {
                input,
                dataset: DatasetOptions {
                    smiles_column,
                    label_column,
                    n_bits,
                    radius,
                },
                split: SplitConfig {
                    test_fraction,
                    seed,
                },
                forest: RandomForestConfig {
                    n_trees: trees,
                    max_depth,
                    max_features: None,
                    seed,
                },
                thresholds: train::parse_thresholds(&thresholds)?,
                default_threshold,
                out,
            })?;
        }

        Commands::Serve {
            port,
            address,
            artifacts,
            verbose,
        } => {
            init_logging(verbose);

            let service = PredictService::load(&artifacts)?;
            let addr: SocketAddr = format!("{}:{}", address, port).parse()?;

            println!();
            println!("  toxscreen: interactive toxicity screening");
            println!("  Model:     {} trees", service.model().n_trees());
            println!("  Label:     {}", service.config().label_column);
            println!("  Threshold: {}", service.config().threshold);
            println!();
            println!("  Open http://{} in your browser", addr);
            println!();

            run_server(service, addr).await?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "toxscreen_app=debug,toxscreen_pipeline=debug,toxscreen_chem=debug,tower_http=debug"
    } else {
        "toxscreen_app=info,toxscreen_pipeline=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
