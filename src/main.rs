// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parts_pricing::currency::format_display;
use parts_pricing::{init_tracing, CatalogStore, PricingConfig};

#[derive(Parser, Debug)]
#[command(name = "parts-pricing", version, about = "Part lookup and sale price calculator")]
struct Cli {
    /// Catalog file (.json or .csv)
    #[arg(long, default_value = "data/pecas.json", global = true)]
    catalog: PathBuf,

    /// Pricing config file (JSON)
    #[arg(long, env = "PARTS_PRICING_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Interactive search (default)
    Ui,

    /// Print the price breakdown for one code
    Quote {
        code: String,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List codes containing a term
    Search {
        term: String,

        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show catalog categories and the factor each one gets
    Categories,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or(Commands::Ui);

    // Keep the terminal clean while the TUI owns it
    let level = if matches!(command, Commands::Ui) { "warn" } else { "info" };
    init_tracing(level);

    let config = PricingConfig::load_or_default(cli.config.as_deref())?;
    let catalog = CatalogStore::from_file(&cli.catalog)?;

    match command {
        Commands::Ui => run_ui_mode(catalog, config)?,
        Commands::Quote { code, json } => run_quote(&catalog, &config, &code, json)?,
        Commands::Search { term, limit } => run_search(&catalog, &term, limit),
        Commands::Categories => run_categories(&catalog, &config),
    }

    Ok(())
}

fn run_quote(catalog: &CatalogStore, config: &PricingConfig, code: &str, json: bool) -> Result<()> {
    let engine = config.engine();
    let record = catalog.get(code);
    if record.is_none() {
        tracing::warn!(code, "code not found in catalog");
    }

    let quote = engine.quote(code, record);

    if json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    let b = &quote.breakdown;
    println!("Detalhes de Preço para {}", quote.model);
    if let Some(r) = record {
        println!("  Tipo:                      {}", r.category);
    }
    println!("  Valor Original:            {}", format_display(b.base_price));
    println!("  Valor do Imposto:          {}", format_display(b.tax_amount));
    println!("  Valor dos Multiplicadores: {}", format_display(b.markup_amount));
    println!("  VALOR:                     {}", format_display(b.final_value));
    if let Some(discounted) = b.discounted_value {
        println!("  VALOR COM DESCONTO:        {}", format_display(discounted));
    }
    if b.floor_applied {
        println!("  (valor mínimo aplicado)");
    }

    Ok(())
}

fn run_search(catalog: &CatalogStore, term: &str, limit: usize) {
    let results = catalog.search_limited(term, limit);
    if results.is_empty() {
        println!("Nenhuma peça encontrada para {:?}", term);
        return;
    }

    for code in results {
        println!("{}", code);
    }
}

fn run_categories(catalog: &CatalogStore, config: &PricingConfig) {
    let table = &config.pricing;
    println!("Imposto: x{}", table.tax_factor);

    for label in catalog.categories() {
        let marker = if table.category_factors.contains_key(label) { "" } else { " (não reconhecida)" };
        println!("  {:<30} x{}{}", label, table.factor_for(label), marker);
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(catalog: CatalogStore, config: PricingConfig) -> Result<()> {
    let engine = config.engine();
    let mut app = ui::App::new(catalog, engine, config.reveal);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_catalog: CatalogStore, _config: PricingConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin pricing-server --features server");
    std::process::exit(1);
}
