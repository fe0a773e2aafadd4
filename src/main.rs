use clap::Parser;
use dns_message::{Class, QueryBuilder, Type};
use dnsq::{QuerySession, SessionConfig, DEFAULT_PORT, DEFAULT_RECV_BUFFER_SIZE};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dnsq")]
#[command(version)]
#[command(about = "Send a single DNS query over UDP and print the reply header")]
struct Cli {
    /// Domain name to query, e.g. en.lichess.org
    name: String,

    /// Query type, as a mnemonic (A, AAAA, MX, ...) or a numeric code
    #[arg(short = 't', long = "type", default_value = "A")]
    q_type: Type,

    /// Query class, as a mnemonic (IN, CH, ...) or a numeric code
    #[arg(short = 'c', long = "class", default_value = "IN")]
    q_class: Class,

    /// Nameserver host name or address
    #[arg(short = 's', long, default_value = "8.8.8.8")]
    server: String,

    /// Nameserver port
    #[arg(short = 'p', long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Transaction ID (random when omitted)
    #[arg(long)]
    id: Option<u16>,

    /// Clear the recursion desired flag
    #[arg(long)]
    no_recursion: bool,

    /// Milliseconds to wait for a reply, 0 waits forever
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,

    /// Receive buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_RECV_BUFFER_SIZE)]
    buffer_size: usize,

    /// Log level (trace, debug, info, warn, error), overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let filter = match &cli.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let timeout = match cli.timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let config = SessionConfig::new(cli.server)
        .port(cli.port)
        .timeout(timeout)
        .recv_buffer_size(cli.buffer_size);
    let session = QuerySession::new(config);

    let query = QueryBuilder::new()
        .id(cli.id.unwrap_or_else(|| fastrand::u16(..)))
        .name(&cli.name)
        .q_type(cli.q_type)
        .class(cli.q_class)
        .rd(!cli.no_recursion)
        .build();

    info!("{}", query);

    let response = session.query(&query).await?;
    println!("{}", response);

    Ok(())
}
