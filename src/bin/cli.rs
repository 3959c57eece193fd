use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use nhl_stats_api::export::save_to_csv;
use nhl_stats_api::filters::{GameParams, GameQuery, PlayerParams, PlayerQuery};
use nhl_stats_api::{connect_from_env, init_tracing, MySqlStatsRepository, StatsRepository};
use std::path::PathBuf;

/// Browse the NHL stats database from the terminal
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List players, newest first
    Players(PlayerArgs),
    /// Show one player
    Player { id: String },
    /// List games
    Games(GameArgs),
    /// Show one game
    Game { id: String },
    /// List every team
    Teams {
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Show one team
    Team { id: String },
}

// Flags stay text so they go through the same normalization as query strings
#[derive(Args)]
struct PlayerArgs {
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    limit: Option<String>,
    /// Matches first, last or full name
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    team: Option<String>,
    #[arg(long)]
    hand: Option<String>,
    #[arg(long)]
    country: Option<String>,
    /// "active" or "inactive"
    #[arg(long)]
    status: Option<String>,
    #[arg(long)]
    number: Option<String>,
    #[arg(long)]
    weight_min: Option<String>,
    #[arg(long)]
    weight_max: Option<String>,
    /// Also write the page to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args)]
struct GameArgs {
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    per_page: Option<String>,
    #[arg(long)]
    search_column: Option<String>,
    #[arg(long)]
    search_term: Option<String>,
    #[arg(long)]
    season: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    start_time: Option<String>,
    /// pre, reg or post
    #[arg(long)]
    game_type: Option<String>,
    #[arg(long)]
    home_team: Option<String>,
    #[arg(long)]
    away_team: Option<String>,
    #[arg(long)]
    sort_by: Option<String>,
    #[arg(long)]
    sort_order: Option<String>,
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl From<&PlayerArgs> for PlayerParams {
    fn from(args: &PlayerArgs) -> Self {
        PlayerParams {
            page: args.page.clone(),
            limit: args.limit.clone(),
            search_term: args.search.clone(),
            filter_name: None,
            filter_team: args.team.clone(),
            filter_hand: args.hand.clone(),
            filter_country: args.country.clone(),
            filter_status: args.status.clone(),
            filter_number: args.number.clone(),
            filter_weight_min: args.weight_min.clone(),
            filter_weight_max: args.weight_max.clone(),
        }
    }
}

impl From<&GameArgs> for GameParams {
    fn from(args: &GameArgs) -> Self {
        GameParams {
            page: args.page.clone(),
            per_page: args.per_page.clone(),
            search_column: args.search_column.clone(),
            search_term: args.search_term.clone(),
            season: args.season.clone(),
            game_date: args.date.clone(),
            start_time: args.start_time.clone(),
            game_type: args.game_type.clone(),
            home_team: args.home_team.clone(),
            away_team: args.away_team.clone(),
            sort_by: args.sort_by.clone(),
            sort_order: args.sort_order.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing();

    let cli = Cli::parse();
    let (_config, repo) = connect_from_env().await?;

    let result = run(&repo, cli.command).await;
    repo.close().await;
    result
}

async fn run(repo: &MySqlStatsRepository, command: Command) -> Result<()> {
    match command {
        Command::Players(args) => {
            let query = PlayerQuery::from_params(&PlayerParams::from(&args));
            let page = repo
                .list_players(&query)
                .await
                .context("Failed to fetch players")?;

            println!(
                "PLAYERS (page {} of {}, {} total)\n",
                page.page,
                page.total_pages(),
                page.total
            );
            if page.records.is_empty() {
                println!("No players found.");
            }
            for (i, player) in page.records.iter().enumerate() {
                println!("{}. {}", query.page.offset() + i as i64 + 1, player.format());
            }

            if let Some(path) = args.csv {
                save_to_csv(&page.records, &path)?;
                println!("\nSaved players to {}", path.display());
            }
        }
        Command::Player { id } => match parse_id(&id) {
            Some(id) => match repo.get_player(id).await.context("Failed to fetch player")? {
                Some(detail) => {
                    println!("{}", detail.player.format());
                    if let Some(team) = detail.current_team_name {
                        println!("Current team: {}", team);
                    }
                }
                None => println!("Player not found"),
            },
            None => println!("Player not found"),
        },
        Command::Games(args) => {
            let query = GameQuery::from_params(&GameParams::from(&args));
            let page = repo
                .list_games(&query)
                .await
                .context("Failed to fetch games")?;

            println!(
                "GAMES (page {} of {}, {} total, sorted by {} {})\n",
                page.page,
                page.total_pages(),
                page.total,
                query.sort.key.as_str(),
                query.sort.order.as_str()
            );
            if page.records.is_empty() {
                println!("No games found.");
            }
            for game in &page.records {
                println!("{}", game.format());
            }

            if let Some(path) = args.csv {
                save_to_csv(&page.records, &path)?;
                println!("\nSaved games to {}", path.display());
            }
        }
        Command::Game { id } => match parse_id(&id) {
            Some(id) => match repo.get_game(id).await.context("Failed to fetch game")? {
                Some(game) => println!("{}", game.format()),
                None => println!("Game not found"),
            },
            None => println!("Game not found"),
        },
        Command::Teams { csv } => {
            let teams = repo.list_teams().await.context("Failed to fetch teams")?;
            println!("TEAMS ({})\n", teams.len());
            for team in &teams {
                println!("{}", team.format());
            }

            if let Some(path) = csv {
                save_to_csv(&teams, &path)?;
                println!("\nSaved teams to {}", path.display());
            }
        }
        Command::Team { id } => match parse_id(&id) {
            Some(id) => match repo.get_team(id).await.context("Failed to fetch team")? {
                Some(team) => println!("{}", team.format()),
                None => println!("Team not found"),
            },
            None => println!("Team not found"),
        },
    }

    Ok(())
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}
