use clap::{Parser, Subcommand};
use ivory_site::catalog::Catalog;
use ivory_site::config::SiteConfig;
use ivory_site::favorites::Favorites;
use ivory_site::host::FileStore;
use ivory_site::{config, generate, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ivory-site")]
#[command(about = "Single-page site and menu tools for The Ivory Restaurant")]
#[command(long_about = "\
Single-page site and menu tools for The Ivory Restaurant

The site is one document with four pages (home, menu, about, contact). The
menu is driven by a dish catalog: a JSON array of dish records, built in by
default or supplied with --catalog.

Site settings live in config.toml inside the --config directory. Every key
is optional and falls back to the stock defaults.

Examples:

  ivory-site list --category \"Seafood Specialties\"
  ivory-site show cazuela-de-mariscos
  ivory-site favorites toggle ceviche-tropical
  ivory-site build --output dist

Run 'ivory-site gen-config' to generate a documented config.toml.
Set RUST_LOG=debug for verbose logging.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Dish catalog JSON file (defaults to the built-in menu)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the menu, grouped by category
    List {
        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show every detail of one dish
    Show { id: String },
    /// Find dishes by name, description or ingredient
    Search { query: String },
    /// Suggest dishes similar to the given one
    Recommend { id: String },
    /// Inspect or change saved favorites
    Favorites {
        /// JSON file the favorites are stored in
        #[arg(long, default_value = ".ivory-favorites.json")]
        store: PathBuf,

        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Write the site (index page plus one page per dish)
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// Validate config and catalog without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// Print saved favorites
    List,
    /// Add or remove a dish
    Toggle { id: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let load = || Loaded::from_cli(&cli.config, cli.catalog.as_deref());

    match cli.command {
        Command::List { category } => {
            let Loaded { catalog, .. } = load()?;
            output::print_catalog(&catalog, category.as_deref());
        }
        Command::Show { id } => {
            let Loaded { catalog, .. } = load()?;
            output::print_dish(catalog.get(&id)?);
        }
        Command::Search { query } => {
            let Loaded { catalog, .. } = load()?;
            let hits = catalog.search(&query);
            output::print_dish_list(&format!("Results for \"{query}\""), &hits);
        }
        Command::Recommend { id } => {
            let Loaded { catalog, .. } = load()?;
            let dish = catalog.get(&id)?;
            let picks = catalog.recommend(&id);
            output::print_dish_list(&format!("You may also like (after {})", dish.name), &picks);
        }
        Command::Favorites { store, action } => {
            let Loaded { site, catalog } = load()?;
            let mut store = FileStore::new(store);
            let favorites = Favorites::new(&site.favorites.storage_key);
            match action {
                FavoritesAction::List => {
                    output::print_favorites(&catalog, &favorites.load(&store));
                }
                FavoritesAction::Toggle { id } => {
                    let dish = catalog.get(&id)?;
                    let change = favorites.toggle(&mut store, &id);
                    println!("{}", output::format_favorite_change(dish, change));
                }
            }
        }
        Command::Build { output: out } => {
            let Loaded { site, catalog } = load()?;
            println!("==> Generating site → {}", out.display());
            let report = generate::generate(&site, &catalog, &out)?;
            output::print_generate_report(&catalog, &report);
            println!("==> Build complete: {}", out.display());
        }
        Command::Check => {
            let Loaded { catalog, .. } = load()?;
            println!("==> Checking {}", cli.config.join("config.toml").display());
            output::print_catalog(&catalog, None);
            println!("==> Config and catalog are valid");
        }
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }

    Ok(())
}

/// Validated config plus the dish catalog. Every command but `gen-config`
/// needs both.
struct Loaded {
    site: SiteConfig,
    catalog: Catalog,
}

impl Loaded {
    fn from_cli(config_dir: &Path, catalog: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let site = config::load_config(config_dir)?;
        let catalog = match catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::builtin()?,
        };
        Ok(Self { site, catalog })
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}
