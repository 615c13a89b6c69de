//! wbtc-node CLI
//!
//!   wbtc-node supply                          → {"total_supply": "...", "formatted": "21"}
//!   wbtc-node balance <address>               → {"address": "...", "formatted": "0.5"}
//!   wbtc-node connect                         → wallet status with balance
//!   wbtc-node transfer --amount 0.5 --to <a>  → {"message": "...", "success": true}
//!
//! Configuration:
//!   wbtc-node init --app <name> --network <net> --contract <addr> --wallet-bridge <url>
//!
//! Output format:
//!   --json     Output raw JSON (default for non-tty)
//!   --pretty   Pretty-print JSON (default for tty)

use serde_json::{json, Value};
use std::env;
use std::future::Future;
use std::io::IsTerminal;
use tracing::info;
use wbtc_node::logging::init_logging;
use wbtc_node::node::connect_failure_message;
use wbtc_node::{install_signal_handlers, Network, Node, NodeConfig, TransferRequest};

fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let opts = ParsedArgs::parse(&args[1..]);

    if opts.help {
        print_usage();
        return;
    }

    if opts.version {
        println!("wbtc-node {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    let result = match opts.command.as_deref() {
        Some("init") => cmd_init(&opts),
        Some("supply") => cmd_supply(&opts),
        Some("balance") => cmd_balance(&opts),
        Some("owner") => cmd_owner(&opts),
        Some("connect") => cmd_connect(&opts),
        Some("transfer") => cmd_transfer(&opts),
        Some("validate-address") => cmd_validate_address(&opts),
        Some("watch-supply") => cmd_watch_supply(&opts),
        Some("serve") => cmd_serve(&opts),
        Some(cmd) => Err(format!("Unknown command: {}", cmd)),
        None => {
            print_usage();
            return;
        }
    };

    let pretty = !opts.json && (opts.pretty || std::io::stdout().is_terminal());
    match result {
        Ok(output) => {
            println!("{}", render(&output, pretty));
            if output.get("success") == Some(&Value::Bool(false)) {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{}", render(&json!({"error": e}), pretty));
            std::process::exit(1);
        }
    }
}

fn render(value: &Value, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    } else {
        value.to_string()
    }
}

#[derive(Default)]
struct ParsedArgs {
    command: Option<String>,
    target: Option<String>,
    // Config options
    app: Option<String>,
    network: Option<String>,
    rpc_url: Option<String>,
    contract: Option<String>,
    wallet_bridge: Option<String>,
    fee_rate: Option<u64>,
    priority_fee: Option<u64>,
    port: Option<u16>,
    // Transfer options
    amount: Option<String>,
    to: Option<String>,
    // Output options
    json: bool,
    pretty: bool,
    help: bool,
    version: bool,
}

impl ParsedArgs {
    fn parse(args: &[String]) -> Self {
        load_dotenv(".env");

        let mut opts = ParsedArgs::default();
        let mut positional = Vec::new();
        let mut i = 0;

        while i < args.len() {
            let arg = &args[i];
            let value = args.get(i + 1).cloned();
            let mut takes_value = true;
            match arg.as_str() {
                "--app" | "-a" => opts.app = value,
                "--network" | "-n" => opts.network = value,
                "--rpc-url" | "-r" => opts.rpc_url = value,
                "--contract" | "-c" => opts.contract = value,
                "--wallet-bridge" | "-w" => opts.wallet_bridge = value,
                "--fee-rate" => opts.fee_rate = value.and_then(|v| v.parse().ok()),
                "--priority-fee" => opts.priority_fee = value.and_then(|v| v.parse().ok()),
                "--port" | "-p" => opts.port = value.and_then(|v| v.parse().ok()),
                "--amount" => opts.amount = value,
                "--to" => opts.to = value,
                _ => {
                    takes_value = false;
                    match arg.as_str() {
                        "--help" | "-h" => opts.help = true,
                        "--version" | "-V" => opts.version = true,
                        "--json" => opts.json = true,
                        "--pretty" => opts.pretty = true,
                        _ if !arg.starts_with('-') => positional.push(arg.clone()),
                        _ => {} // Ignore unknown flags
                    }
                }
            }
            i += if takes_value { 2 } else { 1 };
        }

        let mut positional = positional.into_iter();
        opts.command = positional.next();
        opts.target = positional.next();

        if opts.app.is_none() {
            opts.app = env::var("WBTC_APP").ok().filter(|s| !s.is_empty());
        }
        opts
    }

    fn app(&self) -> String {
        self.app.clone().unwrap_or_else(|| "wbtc".to_string())
    }
}

/// KEY=VALUE lines; variables already set win.
fn load_dotenv(path: &str) {
    let Ok(contents) = std::fs::read_to_string(path) else { return };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim().trim_matches('"');
            if !value.is_empty() && env::var(key.trim()).is_err() {
                env::set_var(key.trim(), value);
            }
        }
    }
}

fn print_usage() {
    println!(
        r#"wbtc-node - wrapped Bitcoin client

USAGE:
    wbtc-node <command> [target] [options]

COMMANDS:
    init                         Save config for --app (validated)
    supply                       Total wBTC supply
    balance <address>            wBTC balance of an address
    owner                        Contract owner
    connect                      Connect the wallet bridge, show account and balance
    transfer --amount <a> --to <addr>
                                 Transfer wBTC (exit 1 on failure)
    validate-address <address>   Check an address against the active network
    watch-supply                 Print total supply every refresh interval
    serve                        Start HTTP API

CONFIG OPTIONS (override WBTC_* env and saved config):
    --app, -a <name>             Config name (default: wbtc, env: WBTC_APP)
    --network, -n <net>          bitcoin|testnet|signet|regtest (env: WBTC_NETWORK)
    --rpc-url, -r <url>          OP_NET node URL (env: WBTC_RPC_URL)
    --contract, -c <addr>        wBTC contract address (env: WBTC_CONTRACT)
    --wallet-bridge, -w <url>    Wallet bridge JSON-RPC URL (env: WBTC_WALLET_BRIDGE)
    --fee-rate <sat/vB>          Default 450 (env: WBTC_FEE_RATE)
    --priority-fee <sat>         Default 10000 (env: WBTC_PRIORITY_FEE)
    --port, -p <port>            Server port (default: 8080, env: WBTC_PORT)

OUTPUT OPTIONS:
    --json                       Raw JSON output
    --pretty                     Pretty-print JSON
    --version, -V                Print version

EXAMPLES:
    wbtc-node init --app demo --network testnet --wallet-bridge http://127.0.0.1:7777
    wbtc-node supply --app demo
    wbtc-node transfer --app demo --amount 0.5 --to tb1p...
    wbtc-node balance tb1p... --json | jq .formatted
"#
    );
}

fn resolve_config(opts: &ParsedArgs) -> Result<NodeConfig, String> {
    let mut config = NodeConfig::resolve(&opts.app()).map_err(|e| e.to_string())?;
    if let Some(raw) = opts.network.as_deref() {
        config.network = Network::parse(raw).ok_or_else(|| format!("Invalid network: {}", raw))?;
    }
    if let Some(url) = &opts.rpc_url { config.rpc_url = Some(url.clone()); }
    if let Some(address) = &opts.contract { config.contract_address = Some(address.clone()); }
    if let Some(url) = &opts.wallet_bridge { config.wallet_bridge_url = Some(url.clone()); }
    if let Some(fee_rate) = opts.fee_rate { config.fee_rate = fee_rate; }
    if let Some(priority_fee) = opts.priority_fee { config.priority_fee = priority_fee; }
    if let Some(port) = opts.port { config.port = port; }
    Ok(config)
}

fn block_on<F: Future<Output = Result<Value, String>>>(fut: F) -> Result<Value, String> {
    tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to create runtime: {}", e))?
        .block_on(fut)
}

async fn open_node(opts: &ParsedArgs) -> Result<Node, String> {
    let config = resolve_config(opts)?;
    Node::from_config(config).await.map_err(|e| e.to_string())
}

fn cmd_init(opts: &ParsedArgs) -> Result<Value, String> {
    let config = resolve_config(opts)?;
    config.validate().map_err(|e| e.to_string())?;
    let path = config.save().map_err(|e| e.to_string())?;
    info!(path = %path.display(), "config saved");
    Ok(json!({"saved": path.display().to_string(), "config": config}))
}

fn supply_json(snapshot: &wbtc_node::SupplySnapshot) -> Value {
    json!({
        "total_supply": snapshot.total_supply,
        "formatted": snapshot.formatted(),
        "fetched_at": snapshot.fetched_at,
    })
}

fn cmd_supply(opts: &ParsedArgs) -> Result<Value, String> {
    block_on(async {
        let node = open_node(opts).await?;
        let snapshot = node
            .total_supply()
            .await
            .map_err(|e| format!("{}: {}", wbtc_node::core::messages::SUPPLY_FETCH_FAILED, e))?;
        Ok(supply_json(&snapshot))
    })
}

fn cmd_balance(opts: &ParsedArgs) -> Result<Value, String> {
    let address = opts.target.clone().unwrap_or_default();
    block_on(async {
        let node = open_node(opts).await?;
        let amount = node.balance_of(&address).await.map_err(|e| e.user_message())?;
        Ok(json!({"address": address, "balance": amount, "formatted": amount.to_btc_string()}))
    })
}

fn cmd_owner(opts: &ParsedArgs) -> Result<Value, String> {
    block_on(async {
        let node = open_node(opts).await?;
        let owner = node.owner().await.map_err(|e| e.to_string())?;
        Ok(json!({"owner": owner}))
    })
}

fn cmd_connect(opts: &ParsedArgs) -> Result<Value, String> {
    block_on(async {
        let node = open_node(opts).await?;
        let status = node.connect_wallet().await.map_err(|e| connect_failure_message(&e))?;
        serde_json::to_value(status).map_err(|e| e.to_string())
    })
}

fn cmd_transfer(opts: &ParsedArgs) -> Result<Value, String> {
    let request = TransferRequest::new(opts.amount.clone().unwrap_or_default(), opts.to.clone().unwrap_or_default());
    block_on(async {
        let node = open_node(opts).await?;
        let feedback = node.transfer(&request).await;
        serde_json::to_value(feedback).map_err(|e| e.to_string())
    })
}

fn cmd_validate_address(opts: &ParsedArgs) -> Result<Value, String> {
    use wbtc_node::{AddressValidator, NetworkAddressValidator};

    let config = resolve_config(opts)?;
    let address = opts.target.clone().ok_or("Usage: wbtc-node validate-address <address>")?;
    let validator = NetworkAddressValidator;
    Ok(json!({
        "address": address,
        "network": config.network.as_str(),
        "valid": validator.is_valid_destination(&address, config.network),
        "taproot": validator.is_valid_p2tr(&address, config.network),
    }))
}

fn cmd_watch_supply(opts: &ParsedArgs) -> Result<Value, String> {
    block_on(async {
        let node = open_node(opts).await?;
        let shutdown = install_signal_handlers();
        let watcher = node.supply_watcher();
        let handle = watcher.clone().spawn(shutdown.clone());

        let mut last_seen = None;
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
        while !shutdown.is_triggered() {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.wait() => break,
            }
            if let Some(snapshot) = watcher.latest().await {
                if last_seen != Some(snapshot.fetched_at) {
                    last_seen = Some(snapshot.fetched_at);
                    println!("{}", supply_json(&snapshot));
                }
            }
        }
        let _ = handle.await;
        Ok(json!({"stopped": true}))
    })
}

#[cfg(feature = "server")]
fn cmd_serve(opts: &ParsedArgs) -> Result<Value, String> {
    use std::sync::Arc;

    block_on(async {
        let node = Arc::new(open_node(opts).await?);
        let port = node.config().port;
        let shutdown = install_signal_handlers();

        let watcher = node.supply_watcher().spawn(shutdown.clone());
        info!("Supply watcher started (every {}s)", node.config().supply_refresh_secs);

        let addr = format!("0.0.0.0:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| format!("Failed to bind: {}", e))?;
        info!("Endpoints:");
        info!("  GET  /health              - Health check");
        info!("  GET  /supply              - Total supply");
        info!("  GET  /balance/:address    - wBTC balance");
        info!("  POST /wallet/connect      - Connect wallet");
        info!("  POST /transfer            - Transfer wBTC");

        wbtc_node::server::serve(node, listener, shutdown.clone())
            .await
            .map_err(|e| format!("Server error: {}", e))?;
        shutdown.trigger();
        let _ = watcher.await;
        info!("Supply watcher stopped");
        Ok(json!({"stopped": true}))
    })
}

#[cfg(not(feature = "server"))]
fn cmd_serve(_opts: &ParsedArgs) -> Result<Value, String> {
    Err("built without the `server` feature".into())
}
