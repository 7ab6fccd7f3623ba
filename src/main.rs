use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use citysearch::directory;
use citysearch::engine::LoadedCity;
use citysearch::knockout::{KnockoutRoster, Knockouts, RosterFilter, SortMode};
use citysearch::profile::CitizenProfile;
use citysearch::settings::Settings;
use citysearch::{CitySearchError, Result, decode, server, suggest};

#[derive(Debug, Parser)]
#[command(name = "citysearch", version, about = "Search the citizens of an exported city")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Configuration file (defaults to citysearch.toml when present)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Search a city file
    Search {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "QUERY", trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Show autocomplete candidates for a partial query
    Suggest {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "INPUT", default_value = "")]
        input: String,
    },

    /// List buildings, or residents and businesses of one building
    Buildings {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Show one citizen's profile
    Citizen {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Show the knockout roster against a save
    Knockout {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Save file (.sod or .sodb) with the knockouts
        #[arg(long, value_name = "SAVE")]
        save: Option<PathBuf>,
        #[arg(long, default_value_t = SortMode::Name)]
        sort: SortMode,
        /// Only citizens living in this building
        #[arg(long, value_name = "NAME")]
        residence: Option<String>,
        /// Name substring
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        hide_knocked: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve { config } => {
            let settings = Settings::load(config.as_deref())?;
            info!(address = %settings.bind_address(), "starting server");
            server::serve(settings).await
        }
        Command::Search { file, query } => {
            let city = open_city(&file)?;
            let results = city.search(&query.join(" "))?;
            print(&json!({
                "query": results.query(),
                "rows": results.rows(city.index()),
                "matched": results.matched(),
                "limited": results.limited(),
            }))
        }
        Command::Suggest { file, input } => {
            let city = open_city(&file)?;
            print(&suggest::suggest(&input, city.index().schema()))
        }
        Command::Buildings { file, name } => {
            let city = open_city(&file)?;
            match name {
                None => print(&directory::buildings(city.index())),
                Some(name) => print(&json!({
                    "name": name,
                    "residents": directory::residents(city.index(), &name),
                    "businesses": directory::businesses(city.index(), &name),
                })),
            }
        }
        Command::Citizen { file, id } => {
            let city = open_city(&file)?;
            let index = city.index();
            let citizen = index
                .citizen_by_id(id)
                .ok_or_else(|| CitySearchError::NotFound(format!("citizen {id}")))?;
            print(&CitizenProfile::build(citizen, index))
        }
        Command::Knockout {
            file,
            save,
            sort,
            residence,
            query,
            hide_knocked,
        } => {
            let city = open_city(&file)?;
            let knockouts = match save {
                Some(save) => Knockouts::from_save(&read_document(&save)?),
                None => Knockouts::new(),
            };
            let roster = KnockoutRoster::new(city.index(), knockouts);
            let filter = RosterFilter {
                query,
                residence,
                hide_knocked,
            };
            print(&json!({
                "totals": roster.totals(),
                "residences": roster.residences(),
                "rows": roster.rows(sort, &filter),
            }))
        }
    }
}

fn read_document(path: &Path) -> Result<serde_json::Value> {
    let bytes = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    decode::decode_file(&bytes, name)
}

fn open_city(path: &Path) -> Result<LoadedCity> {
    let bytes = std::fs::read(path)?;
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    let value = decode::decode_file(&bytes, name)?;
    let city = LoadedCity::from_value(value, decode::fingerprint(&bytes));
    city.log_loaded();
    Ok(city)
}

fn print(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
