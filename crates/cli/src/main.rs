mod commands;
mod logging;
mod render;

use std::process::ExitCode;

use stock_lookup_core::config::ClientConfig;
use stock_lookup_core::errors::CoreError;
use stock_lookup_core::view::panel::{build_notes_view, PanelView};
use stock_lookup_core::view::state::Panel;
use stock_lookup_core::StockLookup;
use tracing::{debug, error};

use commands::{Command, USAGE};
use logging::{init_logging, LoggingConfig};
use render::{render_comparison, render_panel, render_performance, render_prices, TextSink};

/// Panels whose automatic re-renders are worth printing for `command`.
fn panels_for(command: &Command) -> Vec<Panel> {
    match command {
        Command::Search(_) => vec![Panel::Outlook, Panel::Summary, Panel::History],
        Command::WatchAdd(_) | Command::WatchRemove(_) => vec![Panel::Watchlist],
        Command::Trade(_) | Command::TradeRemove(_) => vec![Panel::Portfolio],
        Command::Charts { .. } => vec![Panel::Charts],
        _ => Vec::new(),
    }
}

fn print_view(view: PanelView) {
    if let Some(text) = render_panel(&view) {
        println!("{text}");
    }
}

fn print_notes(app: &StockLookup, ticker: &str) {
    print_view(PanelView::Notes(build_notes_view(app.store(), ticker)));
}

async fn run(app: &mut StockLookup, command: Command) -> Result<(), CoreError> {
    match command {
        Command::Search(ticker) => app.search(&ticker).await?,

        Command::WatchAdd(ticker) => {
            app.add_to_watchlist(&ticker)?;
        }
        Command::WatchRemove(ticker) => {
            if !app.remove_from_watchlist(&ticker)? {
                println!("{} was not in your watchlist", ticker.trim().to_uppercase());
            }
        }
        Command::WatchList => print_view(app.view(Panel::Watchlist)),

        Command::NoteAdd {
            ticker,
            title,
            content,
        } => {
            app.add_note(&ticker, &title, &content)?;
            print_notes(app, &ticker);
        }
        Command::NoteDelete { ticker, index } => {
            if !app.delete_note(&ticker, index)? {
                println!("No note #{index} for {}", ticker.trim().to_uppercase());
            }
            print_notes(app, &ticker);
        }
        Command::NoteList(ticker) => print_notes(app, &ticker),

        Command::Trade(draft) => {
            app.add_transaction(draft)?;
        }
        Command::TradeRemove(index) => {
            if !app.remove_transaction(index)? {
                println!("No transaction #{index}");
            }
        }
        Command::PortfolioShow => print_view(app.view(Panel::Portfolio)),

        Command::Prices => {
            let prices: Vec<(String, f64)> = app.cached_prices().into_iter().collect();
            println!("{}", render_prices(&prices));
        }

        Command::Charts { ticker, period } => {
            app.search(&ticker).await?;
            app.select_panel(Panel::Charts);
            app.load_charts(period).await?;
        }
        Command::Compare {
            first,
            second,
            period,
        } => {
            let comparison = app.compare(&first, &second, period).await?;
            println!("{}", render_comparison(&comparison));
        }
        Command::Calc {
            initial,
            final_value,
            years,
        } => {
            let result = app.calculate_performance(initial, final_value, years)?;
            println!("{}", render_performance(&result));
        }

        Command::Export => println!("{}", app.export_json()?),
        Command::ExportCsv => print!("{}", app.export_transactions_csv()?),
        Command::Import(path) => {
            let json = std::fs::read_to_string(&path)?;
            app.import_json(&json)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    if let Err(e) = init_logging(LoggingConfig::from_env()) {
        eprintln!("failed to initialise logging: {e}");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || matches!(args[0].as_str(), "-h" | "--help" | "help") {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let command = match commands::parse(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {message}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let config = ClientConfig::from_env();
    debug!(?config, "configuration loaded");

    let sink = TextSink::showing(panels_for(&command));
    let mut app = match StockLookup::from_config(&config, Box::new(sink)) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut app, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
