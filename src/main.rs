//! Catalogue Browser
//!
//! Browse a remote game catalogue from the terminal or a local web page:
//! - search by name or app id, filter by support flags, genre or Denuvo
//! - sort by download count and page through the results
//! - keep track of a chosen purchase plan and payment receipt

mod api_routes;
mod browse;
mod catalogue;
mod config;
mod controls;
mod navigation;
mod purchase;
mod render;
mod server;
mod storage;
mod tui;

use crate::browse::{BrowseSession, FilterState, ScopeArg};
use crate::catalogue::{genres, CatalogueClient, GameRecord, GenreSelection};
use crate::config::Config;
use crate::purchase::PurchaseTracker;
use crate::render::{Badge, CardView, CoverResolver, CoverSource, Profile, NO_GAMES_MESSAGE};
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, IsTerminal};
use std::sync::Arc;

/// Catalogue Browser - search and filter the game catalogue
#[derive(Parser)]
#[command(name = "catalogue-browser")]
#[command(author = "ForgeMyPC")]
#[command(version)]
#[command(about = "Browse, search and filter the game catalogue")]
struct Cli {
    /// Presentation profile (overrides the config file)
    #[arg(long, global = true, value_enum)]
    profile: Option<Profile>,

    /// Records per page (overrides the config file)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    page_size: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the fullscreen terminal browser (default)
    Tui,

    /// Print one page of the catalogue
    List {
        /// Search text
        #[arg(short, long)]
        search: Option<String>,

        /// Fields the search text is matched against
        #[arg(long, value_enum, default_value_t = ScopeArg::Both)]
        scope: ScopeArg,

        /// Only games with online support
        #[arg(long)]
        online: bool,

        /// Only games with bypass support
        #[arg(long)]
        bypass: bool,

        /// Only games that require Denuvo
        #[arg(long)]
        denuvo: bool,

        /// Only games in this genre (label, e.g. "Action")
        #[arg(short, long)]
        genre: Option<String>,

        /// Sort by download count, most downloaded first
        #[arg(long)]
        most_downloaded: bool,

        /// Page to print
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Print every match instead of one page
        #[arg(long, conflicts_with = "page")]
        all: bool,

        /// Print card view models as JSON
        #[arg(long)]
        json: bool,
    },

    /// List genre labels and the ids that map to them
    Genres {
        /// Fetch the catalogue and show only genres that have games
        #[arg(long)]
        present: bool,
    },

    /// Resolve which image host serves a game's cover
    Cover {
        /// Steam app id
        appid: String,
    },

    /// Track a purchase plan and payment receipt
    Purchase {
        #[command(subcommand)]
        command: PurchaseCommands,
    },

    /// Show configuration paths and effective settings
    Config {
        /// Write the default config file if it does not exist
        #[arg(long)]
        init: bool,
    },

    /// Start the local web UI
    Ui {
        /// Port to run the server on (defaults to the config value)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not auto-open the browser
        #[arg(long, default_value_t = false)]
        no_open: bool,
    },
}

#[derive(Subcommand)]
enum PurchaseCommands {
    /// Remember the chosen plan
    Plan {
        /// Plan name, e.g. "Monthly"
        name: String,
    },
    /// Save a payment receipt or transaction id
    Receipt {
        /// Receipt text
        text: String,
    },
    /// Pick up a receipt from a payment landing URL
    Init {
        /// Landing URL carrying receipt, tx, paymentId, payment_id or token
        url: String,
    },
    /// Print the pre-filled contact link
    Link,
    /// Show the stored plan and receipt
    Status,
}

/// Filter flags of the `list` command.
#[derive(Debug, Default)]
struct ListFilters {
    search: Option<String>,
    scope: Option<ScopeArg>,
    online: bool,
    bypass: bool,
    denuvo: bool,
    genre: Option<String>,
    most_downloaded: bool,
}

impl ListFilters {
    /// The CLI may combine filters that the interactive controls keep exclusive.
    fn to_state(&self) -> Result<FilterState> {
        let mut state = FilterState::default()
            .with_query(self.search.as_deref().unwrap_or_default())
            .with_scope(self.scope.unwrap_or(ScopeArg::Both).into());
        state.online_only = self.online;
        state.bypass_only = self.bypass;
        state.requires_membership_only = self.denuvo;
        state.sort_by_downloads = self.most_downloaded;

        if let Some(label) = &self.genre {
            match GenreSelection::for_label(label) {
                Some(selection) => state.genre = Some(selection),
                None => bail!("Unknown genre '{}'. Run `catalogue-browser genres` for the list.", label),
            }
        }
        Ok(state)
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to default configuration");
            Config::default()
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = load_config();
    let profile = cli.profile.unwrap_or(config.browse.profile);
    let page_size = cli
        .page_size
        .map(|size| size as usize)
        .unwrap_or_else(|| config.page_size());
    let explicit_tui = matches!(cli.command, Some(Commands::Tui));

    match cli.command {
        Some(Commands::Tui) | None => {
            // The fullscreen UI needs a real terminal; print page 1 for pipes and CI logs.
            if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
                if explicit_tui {
                    println!(
                        "{}",
                        "The terminal UI requires an interactive TTY. Try `catalogue-browser ui` (Web UI) or `catalogue-browser list`."
                            .bright_yellow()
                    );
                    return Ok(());
                }
                let rt = tokio::runtime::Runtime::new()?;
                return run_list(&rt, &config, profile, page_size, &ListFilters::default(), Some(1), false);
            }

            let rt = tokio::runtime::Runtime::new()?;
            tui::run_tui(&rt, config, profile, page_size)?;
        }
        Some(Commands::List {
            search,
            scope,
            online,
            bypass,
            denuvo,
            genre,
            most_downloaded,
            page,
            all,
            json,
        }) => {
            let filters = ListFilters {
                search,
                scope: Some(scope),
                online,
                bypass,
                denuvo,
                genre,
                most_downloaded,
            };
            let rt = tokio::runtime::Runtime::new()?;
            let page = if all { None } else { Some(page) };
            run_list(&rt, &config, profile, page_size, &filters, page, json)?;
        }
        Some(Commands::Genres { present }) => {
            let records = if present {
                let rt = tokio::runtime::Runtime::new()?;
                Some(fetch_with_diagnostic(&rt, &config))
            } else {
                None
            };
            print_genres(records.as_deref());
        }
        Some(Commands::Cover { appid }) => {
            let rt = tokio::runtime::Runtime::new()?;
            let resolver = CoverResolver::new(&config.images);
            let resolution = rt.block_on(resolver.resolve(appid.trim()));
            let source = match resolution.source {
                CoverSource::Primary => "primary".bright_green(),
                CoverSource::Secondary => "secondary".bright_yellow(),
                CoverSource::Placeholder => "placeholder".bright_red(),
            };
            println!("{} {}", "Cover source:".bright_cyan(), source);
            println!("{} {}", "URL:".bright_cyan(), resolution.url.bright_white());
            println!(
                "{} {}",
                "Probes:".bright_cyan(),
                resolution.probes.to_string().bright_white()
            );
        }
        Some(Commands::Purchase { command }) => {
            run_purchase_command(&config, command)?;
        }
        Some(Commands::Config { init }) => {
            if init {
                Config::init()?;
                println!("{}", "✓ Config file ready".bright_green());
            }
            show_config_info(&config, profile, page_size);
        }
        Some(Commands::Ui { port, no_open }) => {
            let port = port.unwrap_or(config.ui.port);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::start_server(
                config, profile, page_size, port, !no_open,
            ))?;
        }
    }

    Ok(())
}

/// Fetch the catalogue, printing why it is empty when the fetch fails.
fn fetch_with_diagnostic(rt: &tokio::runtime::Runtime, config: &Config) -> Vec<GameRecord> {
    let client = CatalogueClient::from_config(config);
    match rt.block_on(client.try_fetch()) {
        Ok(records) => records,
        Err(err) => {
            tracing::error!(error = %err, url = client.url(), "Failed to fetch games");
            eprintln!(
                "{} {}",
                "Could not load catalogue:".bright_red(),
                err.to_string().bright_red()
            );
            Vec::new()
        }
    }
}

fn run_list(
    rt: &tokio::runtime::Runtime,
    config: &Config,
    profile: Profile,
    page_size: usize,
    filters: &ListFilters,
    page: Option<usize>,
    json: bool,
) -> Result<()> {
    let state = filters.to_state()?;
    let records = Arc::new(fetch_with_diagnostic(rt, config));
    let mut session = BrowseSession::with_state(records, page_size, state);

    // `None` prints the whole view set.
    if let Some(page) = page {
        if session.total_matches() > 0 {
            if let Err(err) = session.go_to_page(page) {
                println!("{} {}", "Page not shown:".bright_yellow(), err);
                return Ok(());
            }
        }
    }

    let shown = match page {
        Some(_) => session.page_records(),
        None => session.view_records(),
    };
    let cards = CardView::project_page(&shown, profile, &config.images);
    if json {
        println!("{}", serde_json::to_string_pretty(&cards)?);
        return Ok(());
    }

    if cards.is_empty() {
        println!("{}", NO_GAMES_MESSAGE.bright_yellow());
        return Ok(());
    }

    let position = match page {
        Some(_) => format!("page {}/{}", session.current_page(), session.total_pages()),
        None => "all pages".to_string(),
    };
    println!(
        "{} {}  {}",
        "Catalogue".bright_cyan().bold(),
        position.bright_white(),
        format!(
            "({} of {} games)",
            session.total_matches(),
            session.records().len()
        )
        .bright_black()
    );
    println!();
    for card in &cards {
        print_card(card);
    }
    Ok(())
}

fn print_card(card: &CardView) {
    let mut line = format!(
        "{:>10}  {}",
        card.appid.bright_black(),
        card.title.bright_white().bold()
    );
    if card.denuvo {
        line.push_str(&format!("  {}", "DENUVO".bright_red().bold()));
    }
    println!("{line}");

    let badges: Vec<String> = card
        .badges
        .iter()
        .map(|badge| {
            let text = badge.text();
            match badge {
                Badge::Online => text.bright_green().to_string(),
                Badge::Bypass => text.bright_yellow().to_string(),
                Badge::New => text.bright_magenta().to_string(),
                Badge::Genre(_) => text.bright_cyan().to_string(),
                Badge::Size(_) | Badge::Downloads(_) => text.bright_black().to_string(),
            }
        })
        .collect();
    if !badges.is_empty() || card.downloaded.is_some() {
        let mut details = badges.join(" · ");
        if let Some(downloaded) = &card.downloaded {
            if !details.is_empty() {
                details.push_str("  ");
            }
            details.push_str(&downloaded.bright_black().to_string());
        }
        println!("{:>10}  {}", "", details);
    }
}

fn print_genres(records: Option<&[GameRecord]>) {
    let present = records.map(genres::present_labels);
    println!("{}", "Genres\n".bright_cyan().bold());
    for group in genres::genre_groups() {
        if let Some(present) = &present {
            if !present.contains(group.label.as_str()) {
                continue;
            }
        }
        let count = records.map(|records| {
            records
                .iter()
                .filter(|record| group.contains(record.genre_id()))
                .count()
        });
        let ids = group.ids.iter().cloned().collect::<Vec<_>>().join(", ");
        match count {
            Some(count) => println!(
                "  {:<24} {:>6}  {}",
                group.label.bright_white(),
                count,
                ids.bright_black()
            ),
            None => println!("  {:<24} {}", group.label.bright_white(), ids.bright_black()),
        }
    }
}

fn run_purchase_command(config: &Config, command: PurchaseCommands) -> Result<()> {
    let storage = storage::init_storage()?;
    let store_path = storage.store_path();
    let mut tracker = PurchaseTracker::new(storage, config.purchase.contact_base_url.clone());

    match command {
        PurchaseCommands::Plan { name } => {
            tracker.select_plan(&name)?;
            println!(
                "{} {}",
                "✓ Plan saved:".bright_green(),
                tracker.plan().unwrap_or_default().bright_white()
            );
            if tracker.take_receipt_prompt()? {
                println!(
                    "{}",
                    "After paying, save your receipt with `catalogue-browser purchase receipt <id>` so we can match your payment."
                        .bright_yellow()
                );
            }
        }
        PurchaseCommands::Receipt { text } => {
            if tracker.save_receipt(&text)? {
                println!("{}", "✓ Receipt saved".bright_green());
            } else {
                println!("{}", "Receipt is blank, nothing saved.".bright_yellow());
            }
        }
        PurchaseCommands::Init { url } => match tracker.init(&url)? {
            Some(receipt) => println!(
                "{} {}",
                "✓ Receipt found:".bright_green(),
                receipt.bright_white()
            ),
            None => println!("{}", "No receipt in that URL.".bright_yellow()),
        },
        PurchaseCommands::Link => {
            println!("{}", tracker.contact_link()?);
        }
        PurchaseCommands::Status => {
            let unset = || "not set".bright_black().to_string();
            println!("{}", "Purchase\n".bright_cyan().bold());
            println!(
                "  {} {}",
                "Plan:".bright_cyan(),
                tracker.plan().map(|p| p.bright_white().to_string()).unwrap_or_else(unset)
            );
            println!(
                "  {} {}",
                "Receipt:".bright_cyan(),
                tracker
                    .receipt()
                    .map(|r| r.bright_white().to_string())
                    .unwrap_or_else(unset)
            );
            println!("  {} {}", "Contact:".bright_cyan(), tracker.contact_link()?);
            println!(
                "  {} {}",
                "Stored in:".bright_cyan(),
                store_path.display().to_string().bright_black()
            );
        }
    }
    Ok(())
}

fn show_config_info(config: &Config, profile: Profile, page_size: usize) {
    println!("{}", "Catalogue Browser Configuration\n".bright_cyan().bold());

    match config::get_config_path() {
        Ok(path) => {
            println!("{} {}", "Config file:".bright_yellow(), path.bright_white());
            if std::path::Path::new(&path).exists() {
                println!("  {} {}", "Status:".bright_cyan(), "Exists".bright_green());
            } else {
                println!(
                    "  {} {}",
                    "Status:".bright_cyan(),
                    "Not created yet (using defaults, run `config --init`)".bright_yellow()
                );
            }
        }
        Err(e) => {
            println!(
                "{} Could not determine config path: {}",
                "Error:".bright_red(),
                e
            );
        }
    }

    println!("\n{}", "API settings:".bright_white().bold());
    println!(
        "  {} {}",
        "Catalogue URL:".bright_cyan(),
        config.api.catalogue_url.bright_white()
    );
    println!(
        "  {} {}s",
        "Timeout:".bright_cyan(),
        config.api.timeout_seconds
    );
    println!(
        "  {} {}",
        "Verify SSL:".bright_cyan(),
        config.api.verify_ssl
    );

    println!("\n{}", "Images:".bright_white().bold());
    println!("  {} {}", "Primary:".bright_cyan(), config.images.primary_template);
    println!(
        "  {} {}",
        "Secondary:".bright_cyan(),
        config.images.secondary_template
    );
    println!(
        "  {} {}",
        "Placeholder:".bright_cyan(),
        config.images.placeholder_url
    );

    println!("\n{}", "Browsing:".bright_white().bold());
    println!("  {} {}", "Profile:".bright_cyan(), profile.as_str());
    println!("  {} {}", "Page size:".bright_cyan(), page_size);

    println!("\n{}", "Purchase:".bright_white().bold());
    println!(
        "  {} {}",
        "Contact:".bright_cyan(),
        config.purchase.contact_base_url
    );
    println!(
        "  {} {}",
        "Plans:".bright_cyan(),
        config.purchase.plans.join(", ")
    );

    println!("\n{}", "Web UI:".bright_white().bold());
    println!("  {} {}", "Port:".bright_cyan(), config.ui.port);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_tui() {
        let cli = Cli::try_parse_from(["catalogue-browser"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.profile.is_none());
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "catalogue-browser",
            "list",
            "--profile",
            "compact",
            "--page-size",
            "25",
        ])
        .unwrap();
        assert_eq!(cli.profile, Some(Profile::Compact));
        assert_eq!(cli.page_size, Some(25));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        assert!(Cli::try_parse_from(["catalogue-browser", "--page-size", "0", "list"]).is_err());
    }

    #[test]
    fn list_flags_combine() {
        let cli = Cli::try_parse_from([
            "catalogue-browser",
            "list",
            "--search",
            "alp",
            "--scope",
            "name",
            "--online",
            "--most-downloaded",
            "--page",
            "2",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::List {
                search,
                scope,
                online,
                most_downloaded,
                page,
                ..
            }) => {
                assert_eq!(search.as_deref(), Some("alp"));
                assert_eq!(scope, ScopeArg::Name);
                assert!(online);
                assert!(most_downloaded);
                assert_eq!(page, 2);
            }
            _ => panic!("expected list command"),
        }
    }

    #[test]
    fn purchase_subcommands_parse() {
        assert!(Cli::try_parse_from(["catalogue-browser", "purchase", "plan", "Yearly"]).is_ok());
        assert!(Cli::try_parse_from(["catalogue-browser", "purchase", "link"]).is_ok());
        assert!(Cli::try_parse_from(["catalogue-browser", "purchase", "plan"]).is_err());
        assert!(Cli::try_parse_from(["catalogue-browser", "list", "--all", "--page", "2"]).is_err());
        assert!(Cli::try_parse_from(["catalogue-browser", "ui", "--port", "8080", "--no-open"]).is_ok());
    }

    #[test]
    fn list_filters_build_combined_state() {
        let filters = ListFilters {
            search: Some("  ALP ".to_string()),
            scope: Some(ScopeArg::AppId),
            online: true,
            denuvo: true,
            genre: Some("casual".to_string()),
            ..ListFilters::default()
        };
        let state = filters.to_state().unwrap();
        assert_eq!(state.search_query(), "alp");
        assert!(!state.search_scope.name());
        assert!(state.online_only);
        assert!(state.requires_membership_only);
        assert_eq!(state.genre.as_ref().map(|g| g.label.as_str()), Some("Casual"));
        assert!(!state.sort_by_downloads);
    }

    #[test]
    fn unknown_genre_is_an_error() {
        let filters = ListFilters {
            genre: Some("Horror".to_string()),
            ..ListFilters::default()
        };
        assert!(filters.to_state().is_err());
    }
}
