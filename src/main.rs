use quotebucket::{Invocation, QuoteStore, QuotesConfig, Router};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Console stand-in for the bot host: reads `.command args` lines from
/// stdin, dispatches them through the routing table, prints the replies.
/// Useful for poking at a deployment without wiring up a real IRC channel.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = QuotesConfig::from_env();
    let nick = std::env::var("QUOTES_NICK").unwrap_or_else(|_| "console".to_string());

    tracing::info!("initializing database connection...");
    let store = QuoteStore::connect(&config).await?;

    tracing::info!("running migrations...");
    store.migrate().await?;
    tracing::info!("finished running migrations!");

    let router = Router::new();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('.') else {
            continue;
        };

        let (command, args) = match rest.split_once(char::is_whitespace) {
            Some((command, args)) => (command, Some(args.to_string())),
            None => (rest, None),
        };

        let invocation = Invocation {
            nick: nick.clone(),
            args,
        };

        match router.dispatch(command, &store, &invocation).await {
            Some(reply) => println!("{}", reply),
            None => println!("Unknown command: {}", command),
        }
    }

    Ok(())
}
