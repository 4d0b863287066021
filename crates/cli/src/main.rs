use clap::{Parser, ValueEnum};
use ferrous_stub_domain::{AddressFamily, CliOverrides};
use ferrous_stub_infrastructure::dns::ResolverBuilder;
use tracing::{debug, info};

mod bootstrap;

#[derive(Parser)]
#[command(name = "ferrous-stub")]
#[command(version)]
#[command(about = "Ferrous Stub - parallel stub DNS resolver")]
struct Cli {
    /// Hostnames or address literals to resolve
    #[arg(value_name = "HOSTNAME", required = true)]
    hostnames: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Resolver to query; repeat to query several in parallel
    #[arg(short = 's', long = "server", value_name = "ADDR")]
    servers: Vec<String>,

    /// Collection deadline in milliseconds
    #[arg(short = 't', long)]
    timeout_ms: Option<u64>,

    /// Address family; both IPv4 and IPv6 are looked up separately when omitted
    #[arg(short = 'f', long, value_enum)]
    family: Option<FamilyArg>,

    /// Port placed in every returned socket address
    #[arg(short = 'p', long, default_value_t = 80)]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    #[value(name = "4")]
    V4,
    #[value(name = "6")]
    V6,
    Any,
}

impl FamilyArg {
    fn families(arg: Option<FamilyArg>) -> Vec<AddressFamily> {
        match arg {
            Some(FamilyArg::V4) => vec![AddressFamily::Inet],
            Some(FamilyArg::V6) => vec![AddressFamily::Inet6],
            Some(FamilyArg::Any) => vec![AddressFamily::Unspecified],
            None => vec![AddressFamily::Inet, AddressFamily::Inet6],
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        servers: cli.servers.clone(),
        timeout_ms: cli.timeout_ms,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Ferrous Stub v{}", env!("CARGO_PKG_VERSION"));

    let resolver = ResolverBuilder::new()
        .with_config(config.resolver.clone())
        .build();

    let families = FamilyArg::families(cli.family);

    for hostname in &cli.hostnames {
        println!("=== Resolving {} ===", hostname);

        for family in &families {
            match resolver.getaddrinfo(hostname, cli.port, *family).await {
                Ok(infos) => {
                    debug!(hostname = %hostname, family = %family, count = infos.len(), "Resolved");
                    for info in infos {
                        println!("  {}", info);
                    }
                }
                Err(e) => println!("  {}: {}", family, e),
            }
        }
    }

    Ok(())
}
