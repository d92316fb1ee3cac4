use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use ndvi_scenario_simulator::{
    analysis::{
        project_regions, project_rows, regional_integrator, simulate_regions, simulate_series,
        Integrator, DEFAULT_STEPS_PER_YEAR,
    },
    config::{PipelineConfig, ScenarioSource},
    error::SimError,
    io::{self, ColumnSchema, CsvFormat, NumericMode, ParseOptions, RegionalSchema, TableReader},
    pipeline::Pipeline,
    visualization::{
        print_regional_summary, print_report_table, print_scenario_table, print_trajectory_chart,
    },
};

#[derive(Parser)]
#[command(
    name = "ndvi-sim",
    about = "NDVI Scenario Simulator - logistic vegetation growth under pollution forcing",
    version,
    author
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that reads scenario tables.
#[derive(clap::Args)]
struct InputOptions {
    /// Name of the forcing column [default: P, or NO2 for region-labelled files]
    #[arg(long)]
    forcing_column: Option<String>,

    /// Fall back to the longest numeric prefix (or 0) instead of skipping bad rows
    #[arg(long)]
    lenient: bool,

    /// Fail when a table has more data rows than this
    #[arg(long)]
    max_rows: Option<usize>,
}

impl InputOptions {
    fn schema(&self) -> ColumnSchema {
        match &self.forcing_column {
            Some(column) => ColumnSchema::with_forcing(column),
            None => ColumnSchema::default(),
        }
    }

    fn regional_schema(&self) -> RegionalSchema {
        let mut schema = RegionalSchema::default();
        if let Some(column) = &self.forcing_column {
            schema.forcing = column.clone();
        }
        schema
    }

    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            numeric: if self.lenient {
                NumericMode::Lenient
            } else {
                NumericMode::Strict
            },
            max_rows: self.max_rows,
        }
    }
}

/// Integrator selection shared by the simulating commands.
#[derive(clap::Args)]
struct StrategyOptions {
    /// Integrator: analytic, discrete, or substep[:ALPHA[:STEPS]]
    #[arg(long)]
    integrator: Option<Integrator>,

    /// Forcing sensitivity of the substep integrator (implies substep)
    #[arg(long, allow_negative_numbers = true)]
    alpha: Option<f64>,

    /// Euler sub-steps per year of the substep integrator (implies substep)
    #[arg(long)]
    steps: Option<u32>,
}

impl StrategyOptions {
    /// The selected integrator, falling back to `default`. `--alpha`/`--steps`
    /// without `--integrator` switch a non-substep default to substep.
    fn resolve(&self, default: Integrator) -> Result<Integrator, SimError> {
        let overrides = self.alpha.is_some() || self.steps.is_some();
        let base = match self.integrator {
            Some(integrator) => integrator,
            None if overrides && !matches!(default, Integrator::SubStepped { .. }) => {
                Integrator::euler(0.0)
            }
            None => default,
        };
        base.with_substeps(self.steps, self.alpha)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate several scenarios and merge them on their shared years
    Combine {
        /// Rising, falling and constant scenario files followed by the output path
        #[arg(num_args = 4, value_names = ["UP", "DOWN", "CST", "OUTPUT"])]
        files: Vec<PathBuf>,

        /// TOML run configuration
        #[arg(short, long, conflicts_with = "files")]
        config: Option<PathBuf>,

        /// Scenario as LABEL=PATH (repeatable)
        #[arg(short, long = "scenario", conflicts_with_all = ["files", "config"])]
        scenarios: Vec<ScenarioSource>,

        /// Output path when using --scenario
        #[arg(short, long, requires = "scenarios")]
        output: Option<PathBuf>,

        #[command(flatten)]
        strategy: StrategyOptions,

        /// Seed every scenario from this state instead of its first B0
        #[arg(long)]
        initial_state: Option<f64>,

        /// Write the report as JSON regardless of the output extension
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Do not print the report to the terminal
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        input: InputOptions,
    },

    /// Simulate a single scenario year by year
    Simulate {
        /// Scenario CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (Year,P,NDVI,K,B0,r0)
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        strategy: StrategyOptions,

        /// Seed from this state instead of the first B0
        #[arg(long)]
        initial_state: Option<f64>,

        #[command(flatten)]
        options: InputOptions,
    },

    /// Project every row one year ahead from its own B0
    Project {
        /// Scenario CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (Year,P,NDVI, or Region,Year,B_predicted with --regional)
        #[arg(short, long, default_value = "projection.csv")]
        output: PathBuf,

        /// Read a region-labelled file and use its global r0 and alpha
        #[arg(long)]
        regional: bool,

        #[command(flatten)]
        strategy: StrategyOptions,

        #[command(flatten)]
        options: InputOptions,
    },

    /// Simulate every region of a region-labelled file
    Regional {
        /// Region-labelled CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV file (Region,Year,B_predicted)
        #[arg(short, long)]
        output: PathBuf,

        /// Euler sub-steps per simulated year
        #[arg(long, default_value = "100")]
        steps: u32,

        /// Fall back to the longest numeric prefix (or 0) instead of skipping bad rows
        #[arg(long)]
        lenient: bool,
    },

    /// Parse a scenario table and show it, with any skipped rows
    Inspect {
        /// Scenario CSV file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        options: InputOptions,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[allow(clippy::too_many_arguments)]
fn combine_config(
    files: Vec<PathBuf>,
    config: Option<PathBuf>,
    scenarios: Vec<ScenarioSource>,
    output: Option<PathBuf>,
    strategy: &StrategyOptions,
    initial_state: Option<f64>,
    json: bool,
    pretty: bool,
    input: &InputOptions,
) -> Result<PipelineConfig> {
    let mut cfg = if let Some(path) = config {
        PipelineConfig::load(&path)?
    } else if !scenarios.is_empty() {
        let Some(output) = output else {
            anyhow::bail!("--output is required with --scenario");
        };
        PipelineConfig {
            scenarios,
            output,
            ..PipelineConfig::default()
        }
    } else if let [up, down, cst, out] = files.as_slice() {
        PipelineConfig::three_way(up, down, cst, out)
    } else if files.is_empty() {
        PipelineConfig::default()
    } else {
        anyhow::bail!("Expected UP DOWN CST OUTPUT, got {} path(s)", files.len());
    };

    // Flags only override the config file when given explicitly.
    cfg.integrator = strategy.resolve(cfg.integrator)?;
    if initial_state.is_some() {
        cfg.initial_state = initial_state;
    }
    if let Some(column) = &input.forcing_column {
        cfg.columns.forcing = column.clone();
    }
    if input.lenient {
        cfg.parse.numeric = NumericMode::Lenient;
    }
    if input.max_rows.is_some() {
        cfg.parse.max_rows = input.max_rows;
    }
    if json && !cfg.writes_json() {
        cfg.output.set_extension("json");
    }
    cfg.pretty |= pretty;
    Ok(cfg)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Combine {
            files,
            config,
            scenarios,
            output,
            strategy,
            initial_state,
            json,
            pretty,
            quiet,
            input,
        } => {
            let cfg = combine_config(
                files,
                config,
                scenarios,
                output,
                &strategy,
                initial_state,
                json,
                pretty,
                &input,
            )?;
            let pipeline = Pipeline::new(cfg)?;
            let summary = pipeline.run()?;

            if !quiet {
                print_report_table(&summary.report);
                print_trajectory_chart(&summary.report);
            }
            if summary.num_skipped() > 0 {
                eprintln!(
                    "{} {} row(s) skipped while reading scenarios",
                    "Warning:".yellow(),
                    summary.num_skipped()
                );
            }
            println!(
                "{} {} shared year(s) written to {}",
                "Success:".green().bold(),
                summary.report.len(),
                pipeline.config().output.display()
            );
        }

        Commands::Simulate {
            input,
            output,
            strategy,
            initial_state,
            options,
        } => {
            let integrator = strategy.resolve(Integrator::Analytic)?;
            if let Some(b0) = initial_state {
                if !b0.is_finite() {
                    anyhow::bail!("Initial state must be finite, got {b0}");
                }
            }
            let reader = CsvFormat {
                schema: options.schema(),
                options: options.parse_options(),
            };
            let table = reader.read(&input)?;
            let series = simulate_series(&table, &integrator, initial_state);
            io::write_series_csv(&table, &series, &output)?;

            println!(
                "{} Simulated {} year(s) ({integrator}) -> {}",
                "Success:".green().bold(),
                series.len(),
                output.display()
            );
        }

        Commands::Project {
            input,
            output,
            regional,
            strategy,
            options,
        } => {
            let (rows, integrator) = if regional {
                let table =
                    io::read_regional(&input, &options.regional_schema(), &options.parse_options())?;
                let integrator =
                    strategy.resolve(regional_integrator(&table, DEFAULT_STEPS_PER_YEAR))?;
                let predictions = project_regions(&table, &integrator);
                io::write_predictions_csv(&predictions, &output)?;
                (predictions.len(), integrator)
            } else {
                let table = io::read_table(&input, &options.schema(), &options.parse_options())?;
                let integrator = strategy.resolve(Integrator::euler(0.0))?;
                let projected = project_rows(&table, &integrator);
                io::write_projection_csv(&table, &projected, &output)?;
                (projected.len(), integrator)
            };

            println!(
                "{} Projected {rows} row(s) ({integrator}) -> {}",
                "Success:".green().bold(),
                output.display()
            );
        }

        Commands::Regional {
            input,
            output,
            steps,
            lenient,
        } => {
            let options = if lenient {
                ParseOptions::lenient()
            } else {
                ParseOptions::default()
            };
            let table = io::read_regional(&input, &RegionalSchema::default(), &options)?;
            if table.num_regions() == 0 {
                anyhow::bail!("No data rows in {}", input.display());
            }

            println!(
                "\n{}",
                format!(
                    "Regional Simulation: {} regions (r0={}, alpha={})",
                    table.num_regions(),
                    table.growth_rate0,
                    table.alpha
                )
                .bold()
                .cyan()
            );

            let integrator = regional_integrator(&table, steps);
            let predictions = simulate_regions(&table, &integrator);
            io::write_predictions_csv(&predictions, &output)?;
            print_regional_summary(&predictions);

            println!(
                "{} {} prediction(s) written to {}",
                "Success:".green().bold(),
                predictions.len(),
                output.display()
            );
        }

        Commands::Inspect { input, options } => {
            let schema = options.schema();
            let (table, issues) =
                io::read_table_with_issues(&input, &schema, &options.parse_options())?;
            print_scenario_table(&table, &schema, &issues);
        }
    }

    Ok(())
}
