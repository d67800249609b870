use clap::{Parser, Subcommand};
use heat_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "heatsheet")]
#[command(about = "Swim meet heat sheet generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Meet settings that override the config file
#[derive(clap::Args)]
struct MeetArgs {
    /// Meet name, used in titles and file names
    #[arg(long)]
    name: Option<String>,

    /// Number of lanes in the pool
    #[arg(long)]
    lanes: Option<usize>,

    /// Print unoccupied lanes in every heat
    #[arg(long)]
    empty_lanes: bool,

    /// Seed the heat draw for a reproducible heat sheet
    #[arg(long)]
    seed: Option<u64>,
}

/// Where entries come from
#[derive(clap::Args)]
struct InputArgs {
    /// Entry CSV file (repeatable)
    #[arg(long = "input", short = 'i')]
    inputs: Vec<PathBuf>,

    /// Directory of entry CSV files
    #[arg(long)]
    input_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import entries, seed every event and write event files and the PDF
    Generate {
        #[command(flatten)]
        meet: MeetArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Directory for event text files and the PDF
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Only write event text files
        #[arg(long)]
        no_pdf: bool,
    },

    /// Rebuild the PDF from event files already in the output directory
    Pdf {
        /// Meet name the event files were written under
        #[arg(long)]
        name: Option<String>,

        /// Directory holding the event text files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// List the event program with entry counts
    Schedule {
        #[command(flatten)]
        meet: MeetArgs,

        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        heat_core::logging::init_with_level("debug");
    } else {
        heat_core::logging::init();
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Generate {
            meet,
            input,
            output_dir,
            no_pdf,
        } => cmd_generate(config, meet, input, output_dir, no_pdf),
        Commands::Pdf { name, output_dir } => cmd_pdf(config, name, output_dir),
        Commands::Schedule { meet, input, json } => cmd_schedule(config, meet, input, json),
    }
}

/// Overlay command-line settings; the meet validates the merged result
fn apply_meet_args(mut config: Config, args: MeetArgs) -> Config {
    if let Some(name) = args.name {
        config.meet.name = name;
    }
    if let Some(lanes) = args.lanes {
        config.meet.lanes = lanes;
    }
    if args.empty_lanes {
        config.meet.empty_lanes = true;
    }
    if args.seed.is_some() {
        config.meet.seed = args.seed;
    }
    config
}

fn load_meet(config: &Config, input: &InputArgs) -> Result<Meet> {
    let mut meet = Meet::from_config(config)?;

    if let Some(dir) = &input.input_dir {
        meet.import_dir(dir)?;
    }
    for path in &input.inputs {
        meet.import_file(path)?;
    }

    meet.generate_schedule();
    meet.assign_participants();
    Ok(meet)
}

fn cmd_generate(
    config: Config,
    meet_args: MeetArgs,
    input: InputArgs,
    output_dir: Option<PathBuf>,
    no_pdf: bool,
) -> Result<()> {
    if input.inputs.is_empty() && input.input_dir.is_none() {
        return Err(Error::Config(
            "no entries given; pass --input <file> or --input-dir <dir>".into(),
        ));
    }

    let config = apply_meet_args(config, meet_args);
    let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());

    let mut meet = load_meet(&config, &input)?;
    println!("Imported {} swimmers", meet.swimmer_count());
    let paths = meet.write_event_files(&output_dir)?;
    println!("✓ Wrote {} event files to {}", paths.len(), output_dir.display());

    if !no_pdf {
        let pdf_path = write_pdf(&output_dir, meet.name())?;
        println!("✓ {} generated", pdf_path.display());
    }

    Ok(())
}

fn cmd_pdf(config: Config, name: Option<String>, output_dir: Option<PathBuf>) -> Result<()> {
    let name = name.unwrap_or_else(|| config.meet.name.clone());
    let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());

    let pdf_path = write_pdf(&output_dir, &name)?;
    println!("✓ {} generated", pdf_path.display());
    Ok(())
}

fn write_pdf(output_dir: &Path, meet_name: &str) -> Result<PathBuf> {
    let pdf_path = output_dir.join(format!("{}.pdf", meet_name.trim().replace(['/', '\\'], "-")));
    write_heat_sheet(output_dir, meet_name, &pdf_path)
}

fn cmd_schedule(config: Config, meet_args: MeetArgs, input: InputArgs, json: bool) -> Result<()> {
    let config = apply_meet_args(config, meet_args);
    let meet = load_meet(&config, &input)?;

    let summaries: Vec<_> = meet.events().map(Event::summary).collect();
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{} ({} lanes)", meet.name(), meet.lanes());
    println!("{}", "─".repeat(60));
    for summary in &summaries {
        println!("{:<52} {:>3} entries", summary.title, summary.entries);
    }
    Ok(())
}
