use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use constellation_explorer::classifier::{ModelArtifacts, PredictConfig, Submission, TrainConfig};
use constellation_explorer::query::{ConstellationProfile, Range, RangeFilter};
use constellation_explorer::render::{render_profile, render_sliders, render_view, RenderConfig};
use constellation_explorer::{
    is_canonical_constellation, Controller, Event, Explorer, ExplorerPaths, NumericField,
    Selection, StarTable, View,
};

#[derive(Parser)]
#[command(name = "constellation-explorer")]
#[command(about = "Explore named stars and predict constellations from sky coordinates")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw star export into the clean table
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long, default_value = "data/cleaned_data.csv")]
        output: PathBuf,
    },

    /// Train the scaler and k-NN classifier and save both
    Train {
        #[arg(short, long, default_value = "data/cleaned_data.csv")]
        data: PathBuf,
        #[arg(short, long, default_value = "models")]
        models: PathBuf,
        /// Number of voting neighbors
        #[arg(long, default_value_t = 15)]
        k: usize,
        /// Seed of the train/test shuffle
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Fraction of rows held out for the accuracy check
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,
    },

    /// Predict the constellation of a star
    Predict {
        #[arg(short, long, default_value = "models")]
        models: PathBuf,
        #[arg(short, long)]
        name: String,
        /// Right ascension in hours
        #[arg(long, allow_negative_numbers = true)]
        ra: f64,
        /// Declination in degrees
        #[arg(long, allow_negative_numbers = true)]
        dec: f64,
    },

    /// Filter stars by range and summarize the selection
    Explore {
        #[arg(short, long, default_value = "data/cleaned_data.csv")]
        data: PathBuf,
        /// Right ascension range in hours
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        ra: Option<Vec<f64>>,
        /// Declination range in degrees
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        dec: Option<Vec<f64>>,
        /// Apparent magnitude range
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        appmag: Option<Vec<f64>>,
        /// Absolute magnitude range
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        absmag: Option<Vec<f64>>,
        /// Distance range in light years
        #[arg(long, num_args = 2, value_names = ["LO", "HI"], allow_negative_numbers = true)]
        dist: Option<Vec<f64>>,
        /// Start unspecified ranges at the interquartile selection instead of
        /// leaving them unbounded
        #[arg(long, default_value = "false")]
        interquartile: bool,
        /// Maximum number of table rows to print
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },

    /// Show the per-field distributions of one constellation
    Profile {
        #[arg(short, long, default_value = "data/cleaned_data.csv")]
        data: PathBuf,
        #[arg(short, long)]
        constellation: String,
    },

    /// Read events from stdin and print the views they change
    Interactive {
        #[arg(short, long, default_value = "data/cleaned_data.csv")]
        data: PathBuf,
        #[arg(short, long, default_value = "models")]
        models: PathBuf,
        #[arg(long, default_value_t = 20)]
        rows: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean { input, output } => {
            let (table, report) = StarTable::clean_raw_file(&input)
                .with_context(|| format!("cleaning {}", input.display()))?;
            table.save_to_file(&output)?;

            println!("Rows read:    {}", report.num_rows());
            println!("Rows kept:    {}", report.num_kept());
            println!("Rows dropped: {}", report.num_dropped());
            for (field, count) in report.issue_counts() {
                println!("  {:<22} {}", field.column(), count);
            }
            println!("Constellations: {}", table.constellations().len());
        }

        Commands::Train {
            data,
            models,
            k,
            seed,
            test_fraction,
        } => {
            let table = StarTable::load_from_file(&data)?;
            let config = TrainConfig {
                k,
                seed,
                test_fraction,
            };
            let model = ModelArtifacts::train(table.stars(), &config)?;
            model.save_to_dir(&models)?;

            println!("Trained on {} records", model.props.num_records);
            println!("Classes:   {}", model.props.num_classes);
            match model.props.test_accuracy {
                Some(acc) => println!("Accuracy:  {:.2}%", acc * 100.0),
                None => println!("Accuracy:  not measured"),
            }
        }

        Commands::Predict {
            models,
            name,
            ra,
            dec,
        } => {
            let model = ModelArtifacts::load_from_dir(&models)?;
            let submission = Submission {
                star_name: Some(name),
                right_ascension: Some(ra),
                declination: Some(dec),
            };
            match model.predict_submission(&submission, &PredictConfig::default()) {
                Some(report) => println!("{}", report),
                None => info!("No star name given; nothing to predict"),
            }
        }

        Commands::Explore {
            data,
            ra,
            dec,
            appmag,
            absmag,
            dist,
            interquartile,
            rows,
        } => {
            let table = StarTable::load_from_file(&data)?;
            let mut filter = if interquartile {
                RangeFilter::defaults_for(table.stars()).unwrap_or_default()
            } else {
                RangeFilter::default()
            };
            let requested = [
                (NumericField::RightAscension, ra),
                (NumericField::Declination, dec),
                (NumericField::ApparentMagnitude, appmag),
                (NumericField::AbsoluteMagnitude, absmag),
                (NumericField::DistanceLightYear, dist),
            ];
            for (field, bounds) in requested {
                if let Some(range) = bounds.as_deref().map(range_arg).transpose()? {
                    filter.set_range(field, range);
                }
            }

            let selection = Selection::from_filter(table.stars(), &filter);
            info!("{} of {} stars match", selection.summary.total, table.len());
            let config = RenderConfig {
                max_rows: rows,
                ..Default::default()
            };
            print!("{}", render_view(&View::Selection(selection), &config));
        }

        Commands::Profile {
            data,
            constellation,
        } => {
            if !is_canonical_constellation(&constellation) {
                warn!("{:?} is not one of the 88 constellations", constellation);
            }
            let table = StarTable::load_from_file(&data)?;
            match ConstellationProfile::build(table.stars(), &constellation) {
                Some(profile) => print!("{}", render_profile(&profile)),
                None => println!("No star data available for {}", constellation),
            }
        }

        Commands::Interactive { data, models, rows } => {
            let explorer = Explorer::load(&ExplorerPaths { data, models })?;
            let config = RenderConfig {
                max_rows: rows,
                ..Default::default()
            };
            let mut controller = Controller::new(&explorer);

            print!("{}", render_sliders(&explorer.sliders()));
            println!();
            for view in controller.initial_views() {
                print!("{}", render_view(&view, &config));
            }

            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                if trimmed == "quit" || trimmed == "exit" {
                    break;
                }
                let event: Event = match trimmed.parse() {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Ignoring {:?}: {}", trimmed, e);
                        continue;
                    }
                };
                for view in controller.handle(event) {
                    println!();
                    print!("{}", render_view(&view, &config));
                }
            }
        }
    }

    Ok(())
}

fn range_arg(bounds: &[f64]) -> Result<Range> {
    match bounds {
        [lo, hi] if lo <= hi => Ok(Range::new(*lo, *hi)),
        [lo, hi] => anyhow::bail!("range {} {} is reversed", lo, hi),
        _ => anyhow::bail!("expected two bounds, got {}", bounds.len()),
    }
}
