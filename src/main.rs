//! Copy-trading dashboard client
//!
//! Fetches balances, providers, and positions from the trade API,
//! normalizes the payloads, and renders the dashboard views as terminal
//! tables with per-view filter/sort state persisted between runs.

mod api;
mod config;
mod format;
mod models;
mod query;
mod store;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{PositionsView, StatsParams, TradeApiClient};
use crate::config::AppConfig;
use crate::models::{stat_value, Position, UserBalance};
use crate::query::{
    PositionFilters, PositionsQuery, ProviderFilters, ProviderSort, ProvidersOptions,
    ProvidersQuery, Selection,
};
use crate::store::{UiState, ViewStore};
use crate::table::{compose_positions_table, DataTable, PositionsTableVariant};

/// Copy-trading dashboard CLI.
#[derive(Parser)]
#[command(name = "copydash")]
#[command(about = "Dashboard for a copy-trading platform account", long_about = None)]
struct Cli {
    /// View-state database URL
    #[arg(short, long, default_value = "sqlite:./copydash.db?mode=rwc")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Trade API base URL
    #[arg(long, env = "COPYDASH_API_URL", default_value = "https://api.copydash.trade")]
    api_url: String,

    /// Trade API access token
    #[arg(long, env = "COPYDASH_API_TOKEN", default_value = "", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account overview: balance summary plus open positions
    Dashboard,

    /// Show the balance summary for the selected exchange account
    Balance,

    /// Browse copy-trading and signal providers
    Providers {
        /// Copy-trading services only
        #[arg(long)]
        copy_traders: bool,

        /// Only services this account is connected to
        #[arg(long)]
        connected: bool,

        /// Returns window in days
        #[arg(short, long)]
        time_frame: Option<u32>,

        /// Sort as KEY_DIRECTION (RETURNS, DATE, NAME, FEE x ASC, DESC)
        #[arg(short, long)]
        sort: Option<String>,

        /// Filter by quote asset
        #[arg(long)]
        quote: Option<String>,

        /// Filter by exchange name
        #[arg(long)]
        exchange: Option<String>,

        /// Filter by exchange type (spot, futures)
        #[arg(long)]
        exchange_type: Option<String>,

        /// Only services created by this account
        #[arg(long)]
        mine: bool,

        /// Reset filters for this view before applying new ones
        #[arg(long)]
        clear_filters: bool,
    },

    /// Show a positions table
    Positions {
        /// Which list to show: open, closed, or log
        view: String,

        /// History window in days (closed list)
        #[arg(short, long)]
        time_frame: Option<u32>,

        /// Filter by provider name or id
        #[arg(long)]
        provider: Option<String>,

        /// Filter by pair
        #[arg(long)]
        pair: Option<String>,

        /// Filter by side (LONG, SHORT)
        #[arg(long)]
        side: Option<String>,

        /// Reset filters for this view before applying new ones
        #[arg(long)]
        clear_filters: bool,

        /// Persist the visible column ids for this view
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },

    /// Show entry orders that are still filling
    Orders,

    /// List linked exchange accounts
    Connections,

    /// Show aggregate provider statistics
    Stats {
        /// Quote asset to aggregate over
        #[arg(long, default_value = "USDT")]
        quote: String,

        /// Stats window (e.g. 7days, 30days, 90days)
        #[arg(long, default_value = "30days")]
        time_frame: String,
    },

    /// Show or change app settings
    Settings {
        /// Switch to the dark theme
        #[arg(long)]
        dark: bool,

        /// Switch to the light theme
        #[arg(long)]
        light: bool,

        /// Interface language code
        #[arg(long)]
        language: Option<String>,

        /// Show or hide balances (true/false)
        #[arg(long)]
        show_balance: Option<bool>,

        /// Select the exchange account with this internal id
        #[arg(long)]
        select_exchange: Option<String>,

        /// Clear the selected exchange account
        #[arg(long)]
        unselect_exchange: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig {
        api_url: cli.api_url,
        token: cli.token,
        database_url: cli.database,
    };

    let mut store = ViewStore::open(&config.database_url).await?;
    let client = TradeApiClient::new(config.api_url.clone(), config.token.clone())?;
    let mut ui = UiState::default();

    match cli.command {
        Commands::Dashboard => {
            let internal_id = store.settings().selected_exchange.internal_id.clone();
            let mut engine = PositionsQuery::restore(PositionsView::Open, &store);

            // Balance and positions load together, like the dashboard view.
            ui.set_loader(true);
            let (balance, _) = futures::future::join(
                client.balance(&internal_id),
                engine.refresh(&client, &store, &mut ui),
            )
            .await;
            ui.set_loader(false);

            match balance {
                Ok(balance) => print_balance(&balance, store.settings().show_balance),
                Err(error) => ui.show_error_alert("Error", error.to_string()),
            }

            let table = compose_positions_table(PositionsTableVariant::Open, engine.positions());
            let visible = store
                .settings()
                .display_columns
                .get(engine.page().as_str())
                .cloned();
            print_table(&table, visible.as_deref());
            println!("\n{} open positions", engine.positions().len());
            report_alerts(&ui);
        }

        Commands::Balance => {
            let internal_id = store.settings().selected_exchange.internal_id.clone();
            match client.balance(&internal_id).await {
                Ok(balance) => print_balance(&balance, store.settings().show_balance),
                Err(error) => ui.show_error_alert("Error", error.to_string()),
            }
            report_alerts(&ui);
        }

        Commands::Providers {
            copy_traders,
            connected,
            time_frame,
            sort,
            quote,
            exchange,
            exchange_type,
            mine,
            clear_filters,
        } => {
            let options = ProvidersOptions {
                copy_traders_only: copy_traders,
                connected_only: connected,
            };
            let mut engine = ProvidersQuery::restore(options, &store);

            if clear_filters {
                engine.clear_filters();
            }
            if let Some(time_frame) = time_frame {
                engine.set_time_frame(time_frame, &mut store).await?;
            }
            if let Some(encoded) = sort {
                match ProviderSort::parse(&encoded) {
                    Some(sort) => engine.set_sort(sort, &mut store).await?,
                    None => println!(
                        "Unknown sort '{}'; expected KEY_DIRECTION like RETURNS_DESC",
                        encoded
                    ),
                }
            }
            if quote.is_some() || exchange.is_some() || exchange_type.is_some() || mine {
                let current = engine.filters().clone();
                let filters = ProviderFilters {
                    quote: quote
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.quote),
                    exchange: exchange
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.exchange),
                    exchange_type: exchange_type
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.exchange_type),
                    from_user: if mine {
                        Selection::from_value("userOwned")
                    } else {
                        current.from_user
                    },
                };
                engine.set_filters(filters, &mut store).await?;
            }

            engine.refresh(&client, &store, &mut ui).await;

            println!(
                "\n{:<28} {:<6} {:<8} {:>10} {:>10} {:>8}",
                "NAME", "TYPE", "QUOTE", "RETURNS", "FLOATING", "FOLLOW"
            );
            println!("{}", "-".repeat(76));
            for provider in engine.providers() {
                println!(
                    "{:<28} {:<6} {:<8} {:>9.2}% {:>9.2}% {:>8}",
                    truncate(&provider.name, 26),
                    if provider.is_copy_trading {
                        "copy"
                    } else {
                        "signal"
                    },
                    provider.quote,
                    provider.returns,
                    provider.floating,
                    provider.followers
                );
            }
            println!(
                "\n{} services | {} active filters | sort {} | last {} days",
                engine.providers().len(),
                engine.modified_filters(),
                engine.sort().encode(),
                engine.time_frame()
            );
            report_alerts(&ui);
        }

        Commands::Positions {
            view,
            time_frame,
            provider,
            pair,
            side,
            clear_filters,
            columns,
        } => {
            let view = parse_positions_view(&view)?;
            let mut engine = PositionsQuery::restore(view, &store);

            if clear_filters {
                engine.clear_filters();
            }
            if let Some(columns) = columns {
                store
                    .set_display_columns(engine.page().as_str(), columns)
                    .await?;
            }
            if let Some(time_frame) = time_frame {
                engine.set_time_frame(time_frame, &mut store).await?;
            }
            if provider.is_some() || pair.is_some() || side.is_some() {
                let current = engine.filters().clone();
                let filters = PositionFilters {
                    provider: provider
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.provider),
                    pair: pair
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.pair),
                    side: side
                        .map(|value| Selection::from_value(&value))
                        .unwrap_or(current.side),
                    position_type: current.position_type,
                };
                engine.set_filters(filters, &mut store).await?;
            }

            engine.refresh(&client, &store, &mut ui).await;

            let variant = match view {
                PositionsView::Open => PositionsTableVariant::Open,
                PositionsView::Closed => PositionsTableVariant::Closed,
                PositionsView::Log => PositionsTableVariant::Log,
            };
            let table = compose_positions_table(variant, engine.positions());
            let visible = store
                .settings()
                .display_columns
                .get(engine.page().as_str())
                .cloned();
            print_table(&table, visible.as_deref());
            println!("\n{} positions", engine.positions().len());
            report_alerts(&ui);
        }

        Commands::Orders => {
            let mut engine = PositionsQuery::restore(PositionsView::Open, &store);
            engine.refresh(&client, &store, &mut ui).await;

            let entering: Vec<Position> = engine
                .positions()
                .iter()
                .filter(|position| position.is_still_entering())
                .cloned()
                .collect();
            let table = compose_positions_table(PositionsTableVariant::OpenOrders, &entering);
            print_table(&table, None);
            println!("\n{} open orders", entering.len());
            report_alerts(&ui);
        }

        Commands::Connections => {
            ui.open_exchange_connection_view(true);
            match client.exchange_connections().await {
                Ok(connections) => {
                    let selected = store.settings().selected_exchange.internal_id.clone();
                    println!(
                        "\n{:<3} {:<20} {:<12} {:<8} {:<8} {:<24}",
                        "", "NAME", "EXCHANGE", "TYPE", "VALID", "INTERNAL ID"
                    );
                    println!("{}", "-".repeat(80));
                    for connection in connections {
                        println!(
                            "{:<3} {:<20} {:<12} {:<8} {:<8} {:<24}",
                            if connection.internal_id == selected && !selected.is_empty() {
                                "*"
                            } else {
                                ""
                            },
                            truncate(&connection.internal_name, 18),
                            connection.exchange_name,
                            connection.exchange_type,
                            if connection.are_keys_valid { "yes" } else { "no" },
                            connection.internal_id
                        );
                    }
                }
                Err(error) => ui.show_error_alert("Error", error.to_string()),
            }
            report_alerts(&ui);
        }

        Commands::Stats { quote, time_frame } => {
            let params = StatsParams {
                quote,
                time_frame,
                ..StatsParams::default()
            };
            match client.provider_stats(&params).await {
                Ok(stats) => {
                    println!(
                        "\n{:<28} {:>8} {:>10} {:>8} {:>8} {:>8}",
                        "NAME", "SIGNALS", "POSITIONS", "WINS", "LOSSES", "WIN%"
                    );
                    println!("{}", "-".repeat(76));
                    for item in stats {
                        println!(
                            "{:<28} {:>8} {:>10} {:>8} {:>8} {:>8}",
                            truncate(&item.name, 26),
                            item.signals,
                            item.sum_positions,
                            item.sum_wins,
                            item.sum_losses,
                            stat_value(&item.win_rate)
                                .map(|rate| format!("{:.1}", rate))
                                .unwrap_or_else(|| "-".to_string())
                        );
                    }
                }
                Err(error) => ui.show_error_alert("Error", error.to_string()),
            }
            report_alerts(&ui);
        }

        Commands::Settings {
            dark,
            light,
            language,
            show_balance,
            select_exchange,
            unselect_exchange,
        } => {
            ui.open_settings_view(true);
            if dark {
                store.set_dark_style(true).await?;
            }
            if light {
                store.set_dark_style(false).await?;
            }
            if let Some(language) = language {
                store.set_language(&language).await?;
            }
            if let Some(show_balance) = show_balance {
                store.set_show_balance(show_balance).await?;
            }
            if unselect_exchange {
                store.unset_selected_exchange().await?;
            }
            if let Some(internal_id) = select_exchange {
                match client.exchange_connections().await {
                    Ok(connections) => {
                        match connections
                            .into_iter()
                            .find(|connection| connection.internal_id == internal_id)
                        {
                            Some(connection) => {
                                info!(internal_id = %internal_id, "Selected exchange account");
                                store.set_selected_exchange(connection).await?;
                                ui.show_success_alert(
                                    "Success",
                                    format!("Selected exchange account {}", internal_id),
                                );
                            }
                            None => ui.show_error_alert(
                                "Error",
                                format!("No exchange connection with internal id {}", internal_id),
                            ),
                        }
                    }
                    Err(error) => ui.show_error_alert("Error", error.to_string()),
                }
            }

            let settings = store.settings();
            println!("\n=== Settings ===");
            println!(
                "Theme:           {}",
                if settings.dark_style { "dark" } else { "light" }
            );
            println!("Language:        {}", settings.language_code);
            println!("Show balance:    {}", settings.show_balance);
            let selected = &settings.selected_exchange;
            if selected.internal_id.is_empty() {
                println!("Exchange:        none selected");
            } else {
                println!(
                    "Exchange:        {} ({} {})",
                    selected.internal_name, selected.exchange_name, selected.exchange_type
                );
            }
            report_alerts(&ui);
        }
    }

    Ok(())
}

fn print_balance(balance: &UserBalance, show_balance: bool) {
    println!("\n=== Balance ===");
    if !show_balance {
        println!("Balance display is turned off in settings.");
        return;
    }
    println!("Total assets:    {:.8} BTC", balance.total_assets);
    println!("Invested:        {:.8} BTC", balance.total_invested);
    println!("Open positions:  {:.8} BTC", balance.total_open);
    println!(
        "Profit:          {:.8} BTC ({:.2}%)",
        balance.total_profit, balance.profit_percentage
    );
    println!("BTC/USDT rate:   {:.2}", balance.btcusdt);
}

fn parse_positions_view(raw: &str) -> Result<PositionsView> {
    match raw {
        "open" => Ok(PositionsView::Open),
        "closed" => Ok(PositionsView::Closed),
        "log" => Ok(PositionsView::Log),
        other => anyhow::bail!("Unknown positions view '{}'; expected open, closed, or log", other),
    }
}

/// Print a composed table with fixed-width columns, optionally limited
/// to the view's visible column ids.
fn print_table(table: &DataTable, visible: Option<&[String]>) {
    let indexes: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, column)| {
            visible.map_or(true, |ids| ids.iter().any(|id| id == column.id))
        })
        .map(|(index, _)| index)
        .collect();

    if indexes.is_empty() {
        return;
    }

    let mut widths: Vec<usize> = indexes
        .iter()
        .map(|&index| table.columns[index].name.len())
        .collect();
    for row in &table.rows {
        for (width, &index) in widths.iter_mut().zip(&indexes) {
            *width = (*width).max(row[index].text.len());
        }
    }
    for width in widths.iter_mut() {
        *width = (*width).min(24);
    }

    let header = indexes
        .iter()
        .zip(&widths)
        .map(|(&index, &width)| {
            format!("{:<width$}", truncate(&table.columns[index].name, width))
        })
        .collect::<Vec<_>>()
        .join("  ");
    println!("\n{}", header);
    println!("{}", "-".repeat(header.len()));

    for row in &table.rows {
        let line = indexes
            .iter()
            .zip(&widths)
            .map(|(&index, &width)| format!("{:<width$}", truncate(&row[index].text, width)))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line);
    }
}

/// Surface any open alert on stderr.
fn report_alerts(ui: &UiState) {
    if ui.alerts.error.open {
        eprintln!("[{}] {}", ui.alerts.error.title, ui.alerts.error.body);
    }
    if ui.alerts.success.open {
        println!("[{}] {}", ui.alerts.success.title, ui.alerts.success.body);
    }
}

/// Truncate a string with ellipsis if too long.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
