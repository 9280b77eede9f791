use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use teamnet_routes::{
    ApiConfig, TunnelRoute, TunnelRouteClient, TunnelRoutesCreateParams, TunnelRoutesDeleteParams,
    TunnelRoutesForIpParams, TunnelRoutesListParams, TunnelRoutesUpdateParams,
};

/// Manage the tunnel routing table of a Cloudflare account
#[derive(Parser, Debug)]
#[command(name = "teamnet")]
#[command(about = "Manage Cloudflare tunnel routes")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "teamnet.toml")]
    config: String,

    /// Account to operate on (overrides config)
    #[arg(short, long, env = "TEAMNET_ACCOUNT_ID")]
    account_id: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List routes
    List {
        #[arg(long)]
        tunnel_id: Option<String>,

        /// Only routes whose comment contains this text
        #[arg(long)]
        comment: Option<String>,

        /// Filter on deletion state (true or false)
        #[arg(long)]
        is_deleted: Option<bool>,

        /// Only routes inside this network
        #[arg(long)]
        network_subset: Option<String>,

        /// Only routes containing this network
        #[arg(long)]
        network_superset: Option<String>,

        /// Only routes that existed at this RFC 3339 time
        #[arg(long)]
        existed_at: Option<DateTime<Utc>>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        per_page: Option<u32>,
    },

    /// Show the route that covers an IP address
    GetIp { ip: String },

    /// Route a network through a tunnel
    Create {
        network: String,
        tunnel_id: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Replace an existing route
    Update {
        network: String,
        tunnel_id: String,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Remove a route
    Delete { network: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("teamnet=info".parse()?)
                .add_directive("teamnet_routes=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("Using config: {}", args.config);

    let config = ApiConfig::load_and_resolve(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    let account_id = args
        .account_id
        .or_else(|| config.account_id.clone())
        .unwrap_or_default();

    let client =
        TunnelRouteClient::from_config(&config).context("Failed to build API client")?;

    match args.command {
        Command::List {
            tunnel_id,
            comment,
            is_deleted,
            network_subset,
            network_superset,
            existed_at,
            page,
            per_page,
        } => {
            let mut params = TunnelRoutesListParams::new(account_id);
            params.tunnel_id = tunnel_id;
            params.comment = comment;
            params.is_deleted = is_deleted;
            params.network_subset = network_subset;
            params.network_superset = network_superset;
            params.existed_at = existed_at;
            params.pagination.page = page;
            params.pagination.per_page = per_page;

            let (routes, info) = client
                .list_page(&params)
                .await
                .context("Failed to list routes")?;

            if args.json {
                println!("{}", serde_json::to_string_pretty(&routes)?);
            } else {
                print_routes(&routes);
                if let Some(info) = info {
                    if info.total_pages > 1 {
                        println!(
                            "page {}/{} ({} routes total)",
                            info.page, info.total_pages, info.total_count
                        );
                    }
                }
            }
        }

        Command::GetIp { ip } => {
            let route = client
                .get_for_ip(&TunnelRoutesForIpParams::new(account_id, &ip))
                .await
                .with_context(|| format!("Failed to look up route for {}", ip))?;
            print_one(&route, args.json)?;
        }

        Command::Create {
            network,
            tunnel_id,
            comment,
        } => {
            let mut params = TunnelRoutesCreateParams::new(account_id, &network, tunnel_id);
            params.comment = comment;

            let route = client
                .create(&params)
                .await
                .with_context(|| format!("Failed to create route {}", network))?;
            tracing::info!("Created route {} -> {}", route.network, route.tunnel_id);
            print_one(&route, args.json)?;
        }

        Command::Update {
            network,
            tunnel_id,
            comment,
        } => {
            let mut params = TunnelRoutesUpdateParams::new(account_id, &network, tunnel_id);
            params.comment = comment;

            let route = client
                .update(&params)
                .await
                .with_context(|| format!("Failed to update route {}", network))?;
            tracing::info!("Updated route {} -> {}", route.network, route.tunnel_id);
            print_one(&route, args.json)?;
        }

        Command::Delete { network } => {
            client
                .delete(&TunnelRoutesDeleteParams::new(account_id, &network))
                .await
                .with_context(|| format!("Failed to delete route {}", network))?;
            tracing::info!("Deleted route {}", network);
        }
    }

    Ok(())
}

fn print_one(route: &TunnelRoute, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(route)?);
    } else {
        print_routes(std::slice::from_ref(route));
    }
    Ok(())
}

fn print_routes(routes: &[TunnelRoute]) {
    if routes.is_empty() {
        println!("No routes");
        return;
    }

    let width = routes
        .iter()
        .map(|r| r.network.len())
        .max()
        .unwrap_or(0)
        .max("NETWORK".len());

    println!(
        "{:<width$}  {:<36}  {:<20}  {:<20}  COMMENT",
        "NETWORK", "TUNNEL ID", "TUNNEL", "CREATED"
    );
    for route in routes {
        let created = route
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| "-".to_string());
        let comment = if route.is_deleted() {
            format!("{} (deleted)", route.comment)
        } else {
            route.comment.clone()
        };
        println!(
            "{:<width$}  {:<36}  {:<20}  {:<20}  {}",
            route.network, route.tunnel_id, route.tunnel_name, created, comment
        );
    }
}
