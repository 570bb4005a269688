/*!
houselens Command Line Interface

Renders the report pages of a housing sales dataset as Vega-Lite JSON or a
standalone HTML document.
*/

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use houselens::config::{Config, OutputFormat, DEFAULT_CONFIG_FILE};
use houselens::filter::Selection;
use houselens::pages::{self, PageFilters, PageKind, PageSettings};
use houselens::{writer, Dataset, VERSION};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "houselens")]
#[command(about = "Filter, aggregate and chart a housing sales dataset")]
#[command(version = VERSION)]
pub struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one report page, or all of them
    Render {
        /// Page to render
        #[arg(value_enum, default_value = "all")]
        page: PageArg,

        #[command(flatten)]
        data: DataArgs,

        /// Output format (defaults to the config file's `output.format`)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,

        /// Output file path (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the filter value domains of the dataset as JSON
    Options {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination path
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args)]
pub struct DataArgs {
    /// Configuration file (defaults to ./houselens.toml when present)
    #[arg(long, env = "HOUSELENS_CONFIG")]
    config: Option<PathBuf>,

    /// Sales CSV path
    #[arg(long)]
    sales: Option<String>,

    /// Boundary GeoJSON path or URL
    #[arg(long)]
    boundaries: Option<String>,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Overview column subset (comma separated)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Zip-code subset for the overview and region pages (comma separated)
    #[arg(long, value_delimiter = ',')]
    zipcodes: Vec<String>,

    /// Exclusive upper bound on year built
    #[arg(long)]
    max_year_built: Option<i64>,

    /// Exclusive upper bound on sale date (YYYY-MM-DD)
    #[arg(long)]
    max_date: Option<NaiveDate>,

    /// Exclusive upper bound on price
    #[arg(long)]
    max_price: Option<f64>,

    /// Exclusive upper bound on bedrooms
    #[arg(long)]
    max_bedrooms: Option<f64>,

    /// Exclusive upper bound on bathrooms
    #[arg(long)]
    max_bathrooms: Option<f64>,

    /// Exclusive upper bound on floors
    #[arg(long)]
    max_floors: Option<f64>,

    /// Only count waterfront houses in the water view histogram
    #[arg(long)]
    waterfront_only: bool,

    /// Marker sample seed
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PageArg {
    All,
    Overview,
    Region,
    Commercial,
    Physical,
}

impl PageArg {
    fn kinds(self) -> Vec<PageKind> {
        match self {
            PageArg::All => PageKind::ALL.to_vec(),
            PageArg::Overview => vec![PageKind::Overview],
            PageArg::Region => vec![PageKind::Region],
            PageArg::Commercial => vec![PageKind::Commercial],
            PageArg::Physical => vec![PageKind::Physical],
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            page,
            data,
            format,
            output,
            filters,
        } => {
            let mut config = load_config(&data)?;
            if let Some(format) = format {
                config.output.format = format.into();
            }
            render(&config, page, &filters, output.as_deref())
        }

        Commands::Options { data } => {
            let config = load_config(&data)?;
            let dataset = load_dataset(&config)?;
            let options = dataset.filter_options()?;
            println!("{}", serde_json::to_string_pretty(&options)?);
            Ok(())
        }

        Commands::InitConfig { path, force } => init_config(&path, force),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` applies unless `verbose`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Config file (explicit, or the default file when present) with the data
/// flags applied on top.
fn load_config(args: &DataArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default()?.unwrap_or_default(),
    };

    if let Some(sales) = &args.sales {
        config.data.sales_path = sales.clone();
    }
    if let Some(boundaries) = &args.boundaries {
        config.data.boundaries = boundaries.clone();
    }
    debug!(?config, "Resolved configuration");
    Ok(config)
}

fn load_dataset(config: &Config) -> Result<Dataset> {
    let dataset = Dataset::load(&config.data).with_context(|| {
        format!(
            "Failed to load sales '{}' and boundaries '{}'",
            config.data.sales_path, config.data.boundaries
        )
    })?;
    info!(
        sales = dataset.sales().height(),
        boundaries = dataset.boundaries().len(),
        "Dataset loaded"
    );
    Ok(dataset)
}

fn render(config: &Config, page: PageArg, args: &FilterArgs, output: Option<&Path>) -> Result<()> {
    let dataset = load_dataset(config)?;
    let options = dataset.filter_options()?;
    let filters = page_filters(args, &options);
    let settings = PageSettings::from_config(config);

    let rendered = match page {
        PageArg::All => pages::render_all(&dataset, &page.kinds(), &filters, &settings),
        _ => page
            .kinds()
            .into_iter()
            .map(|kind| pages::render(&dataset, kind, &filters, &settings))
            .collect::<houselens::Result<Vec<_>>>()?,
    };

    let document = writer::render_document(&config.output, &rendered)?;
    match output {
        Some(path) => {
            std::fs::write(path, document)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), pages = rendered.len(), "Report written");
        }
        None => println!("{}", document),
    }
    Ok(())
}

/// Page filters from the flags, falling back to the dataset defaults.
fn page_filters(args: &FilterArgs, options: &houselens::FilterOptions) -> PageFilters {
    let mut filters = PageFilters::defaults(options);

    filters.overview.selection = Selection::new()
        .with_columns(args.columns.iter().cloned())
        .with_zipcodes(args.zipcodes.iter().cloned());
    filters.region.zipcodes = args.zipcodes.clone();
    filters.region.seed = args.seed;

    let commercial = &mut filters.commercial;
    if args.max_year_built.is_some() {
        commercial.max_year_built = args.max_year_built;
    }
    if args.max_date.is_some() {
        commercial.max_date = args.max_date;
    }
    if args.max_price.is_some() {
        commercial.max_price = args.max_price;
    }

    let physical = &mut filters.physical;
    if args.max_bedrooms.is_some() {
        physical.max_bedrooms = args.max_bedrooms;
    }
    if args.max_bathrooms.is_some() {
        physical.max_bathrooms = args.max_bathrooms;
    }
    if args.max_floors.is_some() {
        physical.max_floors = args.max_floors;
    }
    physical.waterfront_only = args.waterfront_only;

    filters
}

/// Write the default config. Refuses to overwrite without `force`.
fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Remove it first, edit it, or pass --force.",
            path.display()
        );
    }
    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Created {} with default settings.", path.display());
    Ok(())
}
