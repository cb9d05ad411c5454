use stock_lookup_core::models::market::ChartPeriod;
use stock_lookup_core::models::transaction::{TransactionDraft, TransactionType};

pub const USAGE: &str = "\
usage: stock-lookup <command>

  search <TICKER>                          look up a ticker
  watch add|remove <TICKER>                edit the watchlist
  watch list                               show the watchlist
  notes add <TICKER> <TITLE> <CONTENT>     attach a note
  notes delete <TICKER> <INDEX>            delete a note
  notes list <TICKER>                      show notes
  portfolio buy|sell <TICKER> <SHARES> <PRICE> [DATE]
  portfolio remove <INDEX>                 delete a transaction
  portfolio show                           transactions, holdings, value
  prices                                   cached latest prices
  charts <TICKER> [PERIOD]                 price/returns/beta (1m 3m 6m 1y 5y)
  compare <TICKER> <TICKER> [PERIOD]       compare returns
  calc <INITIAL> <FINAL> <YEARS>           performance calculator
  export [csv]                             dump stored data as JSON, or the ledger as CSV
  import <FILE>                            replace stored data from JSON";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    WatchAdd(String),
    WatchRemove(String),
    WatchList,
    NoteAdd {
        ticker: String,
        title: String,
        content: String,
    },
    NoteDelete {
        ticker: String,
        index: usize,
    },
    NoteList(String),
    Trade(TransactionDraft),
    TradeRemove(usize),
    PortfolioShow,
    Prices,
    Charts {
        ticker: String,
        period: ChartPeriod,
    },
    Compare {
        first: String,
        second: String,
        period: ChartPeriod,
    },
    Calc {
        initial: f64,
        final_value: f64,
        years: f64,
    },
    Export,
    ExportCsv,
    Import(String),
}

fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str, String> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| format!("missing <{name}>"))
}

fn number<T: std::str::FromStr>(args: &[String], i: usize, name: &str) -> Result<T, String> {
    let raw = arg(args, i, name)?;
    raw.parse()
        .map_err(|_| format!("<{name}> must be a number, got '{raw}'"))
}

fn period(args: &[String], i: usize) -> Result<ChartPeriod, String> {
    match args.get(i) {
        Some(raw) => raw.parse(),
        None => Ok(ChartPeriod::default()),
    }
}

/// Parse everything after the program name.
pub fn parse(args: &[String]) -> Result<Command, String> {
    let command = arg(args, 0, "command")?;
    let sub = args.get(1).map(String::as_str);

    match (command, sub) {
        ("search", _) => Ok(Command::Search(arg(args, 1, "TICKER")?.to_string())),

        ("watch", Some("add")) => Ok(Command::WatchAdd(arg(args, 2, "TICKER")?.to_string())),
        ("watch", Some("remove")) => Ok(Command::WatchRemove(arg(args, 2, "TICKER")?.to_string())),
        ("watch", Some("list")) | ("watch", None) => Ok(Command::WatchList),

        ("notes", Some("add")) => Ok(Command::NoteAdd {
            ticker: arg(args, 2, "TICKER")?.to_string(),
            title: arg(args, 3, "TITLE")?.to_string(),
            content: args.get(4..).map(|rest| rest.join(" ")).unwrap_or_default(),
        }),
        ("notes", Some("delete")) => Ok(Command::NoteDelete {
            ticker: arg(args, 2, "TICKER")?.to_string(),
            index: number(args, 3, "INDEX")?,
        }),
        ("notes", Some("list")) => Ok(Command::NoteList(arg(args, 2, "TICKER")?.to_string())),

        ("portfolio", Some(kind @ ("buy" | "sell"))) => {
            let kind: TransactionType = kind.parse()?;
            Ok(Command::Trade(TransactionDraft {
                kind,
                ticker: arg(args, 2, "TICKER")?.to_string(),
                shares: number(args, 3, "SHARES")?,
                price: number(args, 4, "PRICE")?,
                date: args.get(5).cloned(),
            }))
        }
        ("portfolio", Some("remove")) => Ok(Command::TradeRemove(number(args, 2, "INDEX")?)),
        ("portfolio", Some("show")) | ("portfolio", None) => Ok(Command::PortfolioShow),

        ("prices", _) => Ok(Command::Prices),

        ("charts", _) => Ok(Command::Charts {
            ticker: arg(args, 1, "TICKER")?.to_string(),
            period: period(args, 2)?,
        }),
        ("compare", _) => Ok(Command::Compare {
            first: arg(args, 1, "TICKER")?.to_string(),
            second: arg(args, 2, "TICKER")?.to_string(),
            period: period(args, 3)?,
        }),
        ("calc", _) => Ok(Command::Calc {
            initial: number(args, 1, "INITIAL")?,
            final_value: number(args, 2, "FINAL")?,
            years: number(args, 3, "YEARS")?,
        }),

        ("export", Some("csv")) => Ok(Command::ExportCsv),
        ("export", None) => Ok(Command::Export),
        ("import", _) => Ok(Command::Import(arg(args, 1, "FILE")?.to_string())),

        (other, Some(sub)) if matches!(other, "watch" | "notes" | "portfolio" | "export") => {
            Err(format!("unknown {other} subcommand '{sub}'"))
        }
        (other, _) => Err(format!("unknown command '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_search() {
        assert_eq!(parse(&args("search aapl")), Ok(Command::Search("aapl".into())));
    }

    #[test]
    fn watch_defaults_to_list() {
        assert_eq!(parse(&args("watch")), Ok(Command::WatchList));
    }

    #[test]
    fn note_content_joins_remaining_words() {
        let cmd = parse(&args("notes add MSFT Thesis cloud margins keep growing")).unwrap();
        assert_eq!(
            cmd,
            Command::NoteAdd {
                ticker: "MSFT".into(),
                title: "Thesis".into(),
                content: "cloud margins keep growing".into(),
            }
        );
    }

    #[test]
    fn parses_trade_with_date() {
        let cmd = parse(&args("portfolio sell X 5 9 2024-03-01")).unwrap();
        assert_eq!(cmd, Command::Trade(TransactionDraft::sell("X", 5.0, 9.0).on("2024-03-01")));
    }

    #[test]
    fn rejects_non_numeric_shares() {
        let err = parse(&args("portfolio buy X ten 5")).unwrap_err();
        assert!(err.contains("SHARES"));
    }

    #[test]
    fn charts_period_defaults_and_parses() {
        assert_eq!(
            parse(&args("charts tsla")),
            Ok(Command::Charts {
                ticker: "tsla".into(),
                period: ChartPeriod::SixMonths
            })
        );
        assert_eq!(
            parse(&args("charts tsla 1y")),
            Ok(Command::Charts {
                ticker: "tsla".into(),
                period: ChartPeriod::OneYear
            })
        );
        assert!(parse(&args("charts tsla 2w")).is_err());
    }

    #[test]
    fn unknown_commands_are_errors() {
        assert!(parse(&args("frobnicate")).is_err());
        assert!(parse(&args("notes rename X")).is_err());
        assert!(parse(&[]).is_err());
    }
}
