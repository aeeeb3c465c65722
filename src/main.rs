//! Roost - a terminal Mastodon client with engagement metrics
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, bail};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use roost::api::MastodonClient;
use roost::api::mastodon::{PAGE_LIMIT, oauth};
use roost::{Config, output};

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // The TUI owns its runtime; the one-shot commands get a fresh one
    match parse_args()? {
        Command::Ui => roost::app::run(),
        Command::Login { instance } => Runtime::new()?.block_on(login_flow(&instance)),
        Command::Timeline { mode, limit } => Runtime::new()?.block_on(timeline_cli(&mode, limit)),
        Command::Posts { limit } => Runtime::new()?.block_on(posts_cli(limit)),
        Command::Notifications { limit } => Runtime::new()?.block_on(notifications_cli(limit)),
        Command::Metrics { range_days } => Runtime::new()?.block_on(metrics_cli(range_days)),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Ui,
    Login { instance: String },
    Timeline { mode: String, limit: u32 },
    Posts { limit: u32 },
    Notifications { limit: u32 },
    Metrics { range_days: u32 },
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Ui);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "ui" => Ok(Command::Ui),

        "login" => {
            let instance = args
                .get(2)
                .ok_or_else(|| {
                    anyhow::anyhow!("Missing instance\nExample: roost login mastodon.social")
                })?
                .clone();
            Ok(Command::Login { instance })
        }

        "timeline" | "tl" => {
            let mode = args
                .get(2)
                .filter(|a| !a.starts_with('-'))
                .cloned()
                .unwrap_or_else(|| "home".to_string());
            let limit = parse_flag(&args, &["--limit", "-l"], 20)?;
            validate_limit(limit, 40)?;
            Ok(Command::Timeline { mode, limit })
        }

        "posts" => {
            let limit = parse_flag(&args, &["--limit", "-l"], 40)?;
            validate_limit(limit, 800)?;
            Ok(Command::Posts { limit })
        }

        "notifications" | "notifs" => {
            let limit = parse_flag(&args, &["--limit", "-l"], 40)?;
            validate_limit(limit, 40)?;
            Ok(Command::Notifications { limit })
        }

        "metrics" => {
            let range_days = parse_flag(&args, &["--range", "-r"], 7)?;
            if range_days != 7 && range_days != 30 {
                bail!("Range must be 7 or 30 days");
            }
            Ok(Command::Metrics { range_days })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'roost --help' for usage"
        )),
    }
}

fn parse_flag(args: &[String], names: &[&str], default: u32) -> Result<u32> {
    let Some(position) = args.iter().position(|a| names.contains(&a.as_str())) else {
        return Ok(default);
    };
    args.get(position + 1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| anyhow::anyhow!("{} needs a number", names[0]))
}

fn validate_limit(limit: u32, max: u32) -> Result<()> {
    if limit == 0 || limit > max {
        bail!("Limit must be between 1 and {max}");
    }
    Ok(())
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🪺 Roost - a terminal Mastodon client with engagement metrics

USAGE:
    roost                              Launch TUI
    roost [COMMAND]

COMMANDS:
    login <instance>                   Log in to a Mastodon instance
      Example:
        roost login mastodon.social

    timeline [mode] [OPTIONS]          Show a timeline
      Modes: home (default), local, federated, trending
      Options:
        -l, --limit <n>                Number of posts, 1-40 (default: 20)

    posts [OPTIONS]                    Show your own posts
      Options:
        -l, --limit <n>                Number of posts, 1-800 (default: 40)

    notifications [OPTIONS]            Show grouped notifications
      Options:
        -l, --limit <n>                Number of groups, 1-40 (default: 40)

    metrics [OPTIONS]                  Daily follows/likes/boosts report
      Options:
        -r, --range <days>             7 or 30 (default: 7)

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    Navigation
      j/↓  k/↑      Move down / up
      Tab           Next view
      t/s/p/m/n     Timeline, Search, Profile, Metrics, Notifications

    Timeline
      h/l/f/T       Home / Local / Federated / Trending

    Metrics
      7/3           7-day / 30-day range

    Actions
      r             Refresh
      /             Search (on the Search view)
      o             Open in browser
      c             Cycle theme
      q             Quit

CONFIG:
    {config_path}

HOMEPAGE:
    {}
"#,
        roost::REPO_URL
    );
}

fn print_version() {
    println!("roost {}", roost::VERSION);
}

/// Build a client from the saved login, failing before any network call
/// when credentials are missing
fn client_from_config() -> Result<MastodonClient> {
    let config = Config::load()?;
    if !config.has_credentials() {
        bail!("Not logged in. Run `roost login <instance>` first.");
    }
    Ok(MastodonClient::new(&config.instance, &config.access_token))
}

async fn login_flow(instance: &str) -> Result<()> {
    let mut config = Config::load()?;
    let redirect_uri = config.redirect_uri_or_default().to_string();

    println!("🐘 Registering with {instance}...");
    let app = oauth::register_app(instance, &redirect_uri).await?;
    println!("✓ App registered");

    let auth_url = oauth::authorize_url(instance, &app.client_id, &redirect_uri);
    println!("\n📋 Open this URL in your browser:\n\n  {auth_url}\n");
    let _ = open::that(&auth_url);

    println!("Paste the authorization code here:");
    let mut code = String::new();
    std::io::stdin().read_line(&mut code)?;
    let code = code.trim();

    let token = oauth::get_token(
        instance,
        &app.client_id,
        &app.client_secret,
        &redirect_uri,
        code,
    )
    .await?;

    let client = MastodonClient::new(instance, &token.access_token);
    let account = client.verify_credentials().await?;

    config.instance = instance.to_string();
    config.client_id = app.client_id;
    config.client_secret = app.client_secret;
    config.access_token = token.access_token;
    config.save()?;

    println!("\n✓ Logged in as @{}", account.handle);
    println!("✓ Config saved");
    Ok(())
}

async fn timeline_cli(mode: &str, limit: u32) -> Result<()> {
    let client = client_from_config()?;

    let posts = match mode {
        "home" => client.home_timeline_page(limit, None).await?,
        "local" => {
            client
                .public_timeline_page(limit, true, false, None, None)
                .await?
        }
        "federated" | "fed" => {
            client
                .public_timeline_page(limit, false, false, None, None)
                .await?
        }
        "trending" => client.trending_posts(limit).await?,
        other => bail!("Unknown timeline mode: {other}\nModes: home, local, federated, trending"),
    };

    output::print_posts(&posts);
    Ok(())
}

async fn posts_cli(limit: u32) -> Result<()> {
    let client = client_from_config()?;
    let account = client.verify_credentials().await?;

    // Page through until we have enough or the history runs out
    let mut posts = Vec::new();
    let mut max_id: Option<String> = None;
    while (posts.len() as u32) < limit {
        let page_limit = PAGE_LIMIT.min(limit - posts.len() as u32);
        let page = client
            .account_posts(&account.id, page_limit, true, false, max_id.as_deref())
            .await?;
        if page.is_empty() {
            break;
        }
        max_id = page.last().map(|p| p.id.clone());
        posts.extend(page);
    }

    output::print_posts(&posts);
    Ok(())
}

async fn notifications_cli(limit: u32) -> Result<()> {
    let client = client_from_config()?;
    let groups = client.grouped_notifications(limit).await?;
    output::print_notifications(&groups);
    Ok(())
}

async fn metrics_cli(range_days: u32) -> Result<()> {
    let client = client_from_config()?;
    let now = chrono::Local::now().fixed_offset();

    let series = roost::metrics::fetch_daily_metrics(
        range_days,
        now,
        |limit, max_id| {
            let client = client.clone();
            async move {
                client
                    .grouped_notifications_page(limit, max_id.as_deref())
                    .await
                    .map_err(Into::into)
            }
        },
        |scanned| eprint!("\rScanned {scanned} notifications..."),
    )
    .await?;
    eprintln!();

    output::print_daily_metrics(&series);
    Ok(())
}
