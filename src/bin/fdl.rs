use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fdl_rs::viz::ChartKind;
use fdl_rs::{Client, stats, storage, viz};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "fdl",
    version,
    about = "Fetch, aggregate, visualize & summarize openFDA drug labels"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch labels (and optionally save, aggregate, plot, and print stats).
    Get(GetArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Chart {
    Line,
    Bar,
}

impl From<Chart> for ChartKind {
    fn from(c: Chart) -> Self {
        match c {
            Chart::Line => ChartKind::Line,
            Chart::Bar => ChartKind::Bar,
        }
    }
}

#[derive(Args, Debug)]
struct GetArgs {
    /// Manufacturer name to search for (exact phrase, e.g. AstraZeneca)
    #[arg(short, long, default_value = "AstraZeneca")]
    manufacturer: String,
    /// Group by administration route in addition to year.
    #[arg(long, default_value_t = false)]
    by_route: bool,
    /// Save extracted rows to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Save aggregates to file (.csv or .json).
    #[arg(long)]
    summary_out: Option<PathBuf>,
    /// Create a chart at the given path (.svg or .png).
    #[arg(long)]
    plot: Option<PathBuf>,
    /// Write an auto-named PNG chart into this directory instead.
    #[arg(long)]
    plot_dir: Option<PathBuf>,
    /// Chart style.
    #[arg(long, value_enum, default_value = "line")]
    chart: Chart,
    /// Width of the plot (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the plot (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Print aggregates to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
    /// Delay between page requests in milliseconds.
    #[arg(long, default_value_t = 5000)]
    delay_ms: u64,
}

fn fmt_avg(x: f64) -> String {
    if !x.is_finite() {
        return "NA".to_string();
    }
    // Format up to 4 decimals, then trim trailing zeros and trailing dot.
    let s = format!("{:.4}", x);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Get(args) => cmd_get(args),
    }
}

fn cmd_get(args: GetArgs) -> Result<()> {
    let client = Client::with_page_delay(Duration::from_millis(args.delay_ms));
    let rows = client.fetch(&args.manufacturer)?;
    eprintln!("Extracted {} rows for {}", rows.len(), args.manufacturer);

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => storage::save_csv(&rows, path)?,
            "json" => storage::save_json(&rows, path)?,
            other => anyhow::bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} rows to {}", rows.len(), path.display());
    }

    let summaries = if args.by_route {
        stats::average_by_year_and_route(&rows)
    } else {
        stats::average_by_year(&rows)
    };

    if let Some(path) = args.summary_out.as_ref() {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("csv") {
            "json" => storage::save_summary_json(&summaries, path)?,
            _ => storage::save_summary_csv(&summaries, path)?,
        }
        eprintln!("Saved {} groups to {}", summaries.len(), path.display());
    }

    let plot_path = match (args.plot.as_ref(), args.plot_dir.as_ref()) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => {
            std::fs::create_dir_all(dir)?;
            Some(viz::default_chart_path(dir, args.chart.into(), args.by_route))
        }
        (None, None) => None,
    };
    if let Some(path) = plot_path {
        viz::plot_summaries(&summaries, &path, args.width, args.height, args.chart.into())?;
        eprintln!("Wrote plot to {}", path.display());
    }

    if args.stats {
        for s in &summaries {
            match &s.key.route {
                Some(route) => println!(
                    "{} • {}  count={} avg={}  drugs={}",
                    s.key.year,
                    route,
                    s.count,
                    fmt_avg(s.avg_number_of_ingredients),
                    s.drug_names.join(", ")
                ),
                None => println!(
                    "{}  count={} avg={}  drugs={}",
                    s.key.year,
                    s.count,
                    fmt_avg(s.avg_number_of_ingredients),
                    s.drug_names.join(", ")
                ),
            }
        }
    }

    Ok(())
}
