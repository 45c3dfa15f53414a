//! Satellite Engineering & Cyber-Risk Lab CLI
//!
//! Usage:
//!   satsec-lab orbit --altitude-km 550 --inclination-deg 53
//!   satsec-lab sweep --min-km 300 --max-km 2000 --steps 18
//!   satsec-lab link --eirp-dbw 50 --path-loss-db 190 --bandwidth-hz 36e6
//!   satsec-lab link --frequency-ghz 12 --elevation-deg 30 --altitude-km 550
//!   satsec-lab threats --segment ground --threshold 9
//!   satsec-lab --catalog data/threats.json coverage

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use link_budget::LinkBudgetParams;
use orbital_mechanics::{OrbitalElements, SweepRange};
use satsec_lab::*;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use threat_risk::{loader, Segment, SegmentFilter, ThreatCatalog, DEFAULT_RISK_THRESHOLD};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(
    name = "satsec-lab",
    about = "Orbital mechanics, link budget and satellite cyber-risk reports"
)]
struct Args {
    /// Threat catalog JSON file (built-in space operations catalog if omitted)
    #[arg(short, long, global = true)]
    catalog: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug, Clone, Copy)]
struct ElementArgs {
    /// Mean altitude above the Earth's surface
    #[arg(long, default_value_t = DEFAULT_ALTITUDE_KM)]
    altitude_km: f64,

    /// Inclination relative to the equator
    #[arg(long, default_value_t = DEFAULT_INCLINATION_DEG)]
    inclination_deg: f64,

    #[arg(long, default_value_t = DEFAULT_ECCENTRICITY)]
    eccentricity: f64,
}

impl ElementArgs {
    fn elements(&self) -> orbital_mechanics::Result<OrbitalElements> {
        OrbitalElements::new(self.altitude_km, self.inclination_deg, self.eccentricity)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Period and velocity for one set of orbital elements
    Orbit {
        #[command(flatten)]
        elements: ElementArgs,
    },
    /// Period and velocity across an altitude range
    Sweep {
        #[command(flatten)]
        elements: ElementArgs,

        #[arg(long, default_value_t = DEFAULT_SWEEP_MIN_KM)]
        min_km: f64,

        #[arg(long, default_value_t = DEFAULT_SWEEP_MAX_KM)]
        max_km: f64,

        #[arg(long, default_value_t = DEFAULT_SWEEP_STEPS)]
        steps: usize,
    },
    /// 3D orbit positions for plotting
    Trace {
        #[command(flatten)]
        elements: ElementArgs,

        #[arg(long, default_value_t = DEFAULT_TRACE_POINTS)]
        points: usize,
    },
    /// Toy C/N0 link budget
    Link {
        #[arg(long, default_value_t = DEFAULT_EIRP_DBW, allow_negative_numbers = true)]
        eirp_dbw: f64,

        /// Used when no --frequency-ghz geometry is given
        #[arg(long, default_value_t = DEFAULT_PATH_LOSS_DB, allow_negative_numbers = true)]
        path_loss_db: f64,

        /// Carrier frequency; with a range or elevation, derives the path loss
        #[arg(long)]
        frequency_ghz: Option<f64>,

        /// Ground station to satellite distance
        #[arg(long, conflicts_with = "elevation_deg")]
        range_km: Option<f64>,

        /// Satellite elevation above the station horizon
        #[arg(long, allow_negative_numbers = true)]
        elevation_deg: Option<f64>,

        /// Satellite altitude for the elevation geometry
        #[arg(long, default_value_t = DEFAULT_ALTITUDE_KM)]
        altitude_km: f64,

        #[arg(long, default_value_t = DEFAULT_TX_GAIN_DB, allow_negative_numbers = true)]
        tx_gain_db: f64,

        #[arg(long, default_value_t = DEFAULT_RX_GAIN_DB, allow_negative_numbers = true)]
        rx_gain_db: f64,

        #[arg(long, default_value_t = DEFAULT_SYSTEM_LOSS_DB, allow_negative_numbers = true)]
        system_loss_db: f64,

        #[arg(long, default_value_t = DEFAULT_NOISE_FIGURE_DB, allow_negative_numbers = true)]
        noise_figure_db: f64,

        /// Receiver bandwidth for C/N
        #[arg(long)]
        bandwidth_hz: Option<f64>,
    },
    /// Risk scores, CIA partition and high-risk findings
    Threats {
        #[arg(long, value_enum, default_value_t = SegmentArg::All)]
        segment: SegmentArg,

        /// Minimum risk score highlighted as high risk
        #[arg(long, default_value_t = DEFAULT_RISK_THRESHOLD)]
        threshold: u16,
    },
    /// Kill-chain detection coverage
    Coverage,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SegmentArg {
    All,
    Space,
    Ground,
    Link,
}

impl From<SegmentArg> for SegmentFilter {
    fn from(arg: SegmentArg) -> Self {
        match arg {
            SegmentArg::All => SegmentFilter::All,
            SegmentArg::Space => SegmentFilter::Only(Segment::Space),
            SegmentArg::Ground => SegmentFilter::Only(Segment::Ground),
            SegmentArg::Link => SegmentFilter::Only(Segment::Link),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Orbit { elements } => {
            let report = orbit_report(elements.elements()?)?;
            write_json(&args.output, &report)
        }
        Command::Sweep {
            elements,
            min_km,
            max_km,
            steps,
        } => {
            let report = sweep_report(elements.elements()?, SweepRange::new(min_km, max_km), steps)?;
            write_json(&args.output, &report)
        }
        Command::Trace { elements, points } => {
            let report = trace_report(elements.elements()?, points)?;
            write_json(&args.output, &report)
        }
        Command::Link {
            eirp_dbw,
            path_loss_db,
            tx_gain_db,
            rx_gain_db,
            system_loss_db,
            noise_figure_db,
            frequency_ghz,
            range_km,
            elevation_deg,
            altitude_km,
            bandwidth_hz,
        } => {
            let slant = match (range_km, elevation_deg) {
                (Some(range_km), _) => Some(SlantPath::Range { range_km }),
                (None, Some(elevation_deg)) => Some(SlantPath::Elevation {
                    elevation_deg,
                    altitude_km,
                }),
                (None, None) => None,
            };
            let geometry = match (frequency_ghz, slant) {
                (Some(frequency_ghz), Some(slant)) => Some(path_geometry(slant, frequency_ghz)?),
                (None, None) => None,
                (Some(_), None) => bail!("--frequency-ghz needs --range-km or --elevation-deg"),
                (None, Some(_)) => bail!("--range-km and --elevation-deg need --frequency-ghz"),
            };

            let params = LinkBudgetParams {
                eirp_dbw,
                path_loss_db,
                tx_gain_db,
                rx_gain_db,
                system_loss_db,
                noise_figure_db,
            };
            let report = link_report(params, geometry, bandwidth_hz)?;
            write_json(&args.output, &report)
        }
        Command::Threats { segment, threshold } => {
            let catalog = load_catalog(&args.catalog)?;
            let report = threat_report(&catalog, segment.into(), threshold);
            write_json(&args.output, &report)
        }
        Command::Coverage => {
            let catalog = load_catalog(&args.catalog)?;
            let report = coverage_report(&catalog);
            write_json(&args.output, &report)
        }
    }
}

fn load_catalog(path: &Option<PathBuf>) -> Result<ThreatCatalog> {
    match path {
        Some(path) => loader::load_catalog(path)
            .with_context(|| format!("loading threat catalog {:?}", path)),
        None => Ok(ThreatCatalog::space_operations()),
    }
}

fn write_json<T: Serialize>(output: &Option<PathBuf>, value: &T) -> Result<()> {
    match output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            let file = File::create(path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            serde_json::to_writer_pretty(&mut writer, value)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
