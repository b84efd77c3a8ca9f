//! ork - resolve OpenRocket designs from the command line
//!
//! `ork resolve` prints the resolved component records, `ork build` runs them
//! through a geometry kernel and reports which bodies could be built.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use ork_core::{ImportOptions, ImportReport, KernelSink, ResolvedShape, import_ork};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ork")]
#[command(version, about = "Resolve OpenRocket designs into positioned geometry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the resolved component records
    Resolve {
        /// Path to an .ork file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Ron)]
        format: Format,

        #[command(flatten)]
        import: ImportArgs,
    },
    /// Build every component with a geometry kernel
    Build {
        /// Path to an .ork file
        file: PathBuf,

        /// Kernel backend (truck, null)
        #[arg(long, default_value = "truck")]
        kernel: String,

        #[command(flatten)]
        import: ImportArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ImportArgs {
    /// RON file with import options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Fail on unresolvable "auto" values and on nose cones without a profile
    #[arg(long)]
    strict: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Ron,
    Json,
}

/// Initialize tracing on stderr so stdout only carries results
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ork=info,ork_core=info,ork_cad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_options(args: &ImportArgs) -> anyhow::Result<ImportOptions> {
    let mut options = match &args.options {
        Some(path) => ImportOptions::load(path)
            .with_context(|| format!("Failed to read options from {}", path.display()))?,
        None => ImportOptions::default(),
    };
    options.strict_auto |= args.strict;
    Ok(options)
}

fn render(shapes: &[ResolvedShape], format: Format) -> anyhow::Result<String> {
    let text = match format {
        Format::Ron => ron::ser::to_string_pretty(shapes, ron::ser::PrettyConfig::default())?,
        Format::Json => serde_json::to_string_pretty(shapes)?,
    };
    Ok(text)
}

fn resolve(file: &Path, format: Format, args: &ImportArgs) -> anyhow::Result<()> {
    let options = load_options(args)?;
    let mut shapes: Vec<ResolvedShape> = Vec::new();

    import_ork(file, &options, &mut shapes)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    println!("{}", render(&shapes, format)?);
    Ok(())
}

fn build(file: &Path, kernel_name: &str, args: &ImportArgs) -> anyhow::Result<()> {
    let options = load_options(args)?;
    let kernel = ork_cad::kernel_by_name(kernel_name)?;
    if !kernel.is_available() {
        tracing::warn!("Kernel '{}' is not available, no bodies will be built", kernel.name());
    }

    let mut sink = KernelSink::new(kernel.as_ref());
    let report = import_ork(file, &options, &mut sink)
        .with_context(|| format!("Failed to import {}", file.display()))?;

    for body in sink.bodies() {
        println!("built   {} ({} solid(s))", body.label, body.solids.len());
    }
    print_report(&report);

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} components failed to build",
            report.failures.len(),
            report.emitted + report.failures.len()
        );
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    for failure in &report.failures {
        println!("failed  {}: {}", failure.component, failure.reason);
    }
    for field in &report.defaulted {
        println!("default {} = 0", field);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve {
            file,
            format,
            import,
        } => resolve(&file, format, &import),
        Commands::Build {
            file,
            kernel,
            import,
        } => build(&file, &kernel, &import),
    }
}
