use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};

use fpl_terminal::config::{Config, SourceKind};
use fpl_terminal::export::{self, HISTORY_CSV, TRANSFERS_CSV, WORKBOOK_FILE};
use fpl_terminal::fake_source::FakeSource;
use fpl_terminal::fpl_fetch::{FplApi, FplSource};
use fpl_terminal::logging;
use fpl_terminal::session::{self, SessionState, TabView};
use fpl_terminal::table::Table;

struct Args {
    team: String,
    out: Option<PathBuf>,
    xlsx: bool,
}

fn main() -> Result<()> {
    let config = Config::from_env();
    logging::init_stderr_logging(&config.log_filter)?;

    let args = parse_args()?;
    let out_dir = args.out.unwrap_or_else(|| config.export_dir.clone());

    let source: Box<dyn FplSource> = match config.source {
        SourceKind::Live => Box::new(FplApi::new(config.api_base.clone())),
        SourceKind::Fake => Box::new(FakeSource::demo()),
    };

    let dashboard = match session::submit(source.as_ref(), &args.team) {
        SessionState::Displaying(dashboard) => dashboard,
        SessionState::Error(msg) => bail!(msg),
        _ => bail!("invalid team id {:?}: {}", args.team, session::PROMPT),
    };

    println!("Team {}", dashboard.team);
    let mut sheets: Vec<(&str, &Table)> = Vec::new();
    for (label, file_name, view) in [
        ("Transfers", TRANSFERS_CSV, &dashboard.transfers),
        ("History", HISTORY_CSV, &dashboard.history),
    ] {
        match view {
            TabView::Ready { shaped, .. } => {
                for warning in view.warnings() {
                    println!("{label}: warning: {warning}");
                }
                let path = export::write_csv(&out_dir, file_name, &shaped.table)
                    .with_context(|| format!("export {label}"))?;
                println!("{label}: {} rows -> {}", shaped.table.len(), path.display());
                sheets.push((label, &shaped.table));
            }
            TabView::Empty(msg) => println!("{label}: {msg}"),
            TabView::Failed(msg) => println!("{label}: error: {msg}"),
        }
    }

    if args.xlsx && !sheets.is_empty() {
        let path = out_dir.join(WORKBOOK_FILE);
        export::write_workbook(&path, &sheets)?;
        println!("Workbook: {}", path.display());
    }

    Ok(())
}

fn parse_args() -> Result<Args> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut team = None;
    let mut out = None;
    let mut xlsx = false;

    let mut idx = 0;
    while idx < args.len() {
        let arg = &args[idx];
        if let Some(path) = arg.strip_prefix("--out=") {
            out = Some(PathBuf::from(path.trim()));
        } else if arg == "--out" {
            let next = args
                .get(idx + 1)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("--out needs a directory"))?;
            out = Some(PathBuf::from(next));
            idx += 1;
        } else if arg == "--xlsx" {
            xlsx = true;
        } else if team.is_none() {
            team = Some(arg.clone());
        } else {
            bail!("unexpected argument {arg:?}");
        }
        idx += 1;
    }

    let team = team.context("usage: team_export <team_id> [--out DIR] [--xlsx]")?;
    Ok(Args { team, out, xlsx })
}
