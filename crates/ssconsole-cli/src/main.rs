//! `ssconsole` — terminal companion to the security server admin console.
//!
//! Prints the permission, role, and route catalogs, evaluates which main
//! tabs a set of grants unlocks, and runs a live login → inspect → logout
//! cycle against a security server.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ssconsole_client::{ClientConfig, HttpBackend, SessionController};
use ssconsole_core::access;
use ssconsole_core::{MAIN_TABS, Permission, Role, RouteName, Session, Tab};

// ── ANSI color helpers ───────────────────────────────────────────────

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ── CLI structure ────────────────────────────────────────────────────

/// ssconsole — security server console from the terminal.
#[derive(Parser)]
#[command(
    name = "ssconsole",
    version,
    about = "ssconsole CLI — inspect permission catalogs and security server sessions",
    long_about = None,
    after_help = format!(
        "{DIM}Environment variables:{RESET}\n  \
         SSCONSOLE_URL                  Security server UI origin (default: https://localhost:4000)\n  \
         SSCONSOLE_PASSWORD             Password for whoami/check\n  \
         SSCONSOLE_ACCEPT_INVALID_CERTS Accept self-signed TLS certificates\n  \
         SSCONSOLE_LOG_LEVEL            Log filter (default: info)\n\n\
         {DIM}Examples:{RESET}\n  \
         ssconsole catalog permissions\n  \
         ssconsole tabs -p VIEW_CLIENTS -p DIAGNOSTICS\n  \
         ssconsole --url https://ss1:4000 --insecure whoami --username admin"
    ),
)]
struct Cli {
    /// Security server UI origin.
    #[arg(long, env = "SSCONSOLE_URL")]
    url: Option<String>,

    /// Accept self-signed or otherwise invalid TLS certificates.
    #[arg(long, default_value = "false")]
    insecure: bool,

    /// Log filter, overridden by `RUST_LOG`.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, default_value = "false")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one of the static catalogs.
    Catalog {
        #[command(subcommand)]
        which: CatalogCommands,
    },
    /// Show which main tabs a set of permissions unlocks (offline).
    Tabs {
        /// Granted permission; repeat for more.
        #[arg(long = "permission", short = 'p')]
        permissions: Vec<String>,
        /// Evaluate an unauthenticated session.
        #[arg(long, default_value = "false", conflicts_with = "permissions")]
        anonymous: bool,
    },
    /// Log in, show the session the server grants, then log out.
    Whoami {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long, env = "SSCONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log in and exit 0 if the account holds a permission, 1 otherwise.
    Check {
        /// Account name.
        #[arg(long)]
        username: String,
        /// Account password.
        #[arg(long, env = "SSCONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
        /// Permission to test, e.g. `VIEW_KEYS`.
        #[arg(long)]
        permission: String,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// All permission identifiers.
    Permissions,
    /// All role identifiers.
    Roles,
    /// All route (view) names.
    Routes,
    /// The main navigation tabs and their gating permission.
    Tabs,
}

// ── Pretty output helpers ────────────────────────────────────────────

fn header(icon: &str, title: &str) {
    println!("{BOLD}{CYAN}{icon} {title}{RESET}");
    println!("{DIM}─────────────────────────────────────────{RESET}");
}

fn kv_line(key: &str, value: &str) {
    println!("  {DIM}{key:<20}{RESET} {WHITE}{value}{RESET}");
}

fn success(msg: &str) {
    println!("{GREEN}{BOLD}✓{RESET} {msg}");
}

fn warning(msg: &str) {
    println!("{YELLOW}{BOLD}⚠{RESET} {YELLOW}{msg}{RESET}");
}

fn print_tab(tab: &Tab) {
    let gate = tab
        .permission
        .map_or_else(|| "(always)".to_owned(), |p| p.to_string());
    println!(
        "  {CYAN}├─{RESET} {:<12} {DIM}→{RESET} {:<20} {DIM}{gate}{RESET}",
        tab.key,
        tab.to.as_str()
    );
}

fn print_allowed_tabs(session: &Session) {
    header("📑", "Allowed tabs");
    let allowed = access::filter_allowed_tabs(session, &MAIN_TABS);
    if allowed.is_empty() {
        println!("  {DIM}(none){RESET}");
    }
    for tab in &allowed {
        print_tab(tab);
    }
    println!();

    match access::first_allowed_tab(session) {
        Some(tab) => kv_line("Landing view", tab.to.as_str()),
        None => warning("No view is accessible with these permissions."),
    }
    println!();
}

fn print_session(session: &Session) {
    header("🔐", "Session");
    kv_line("Username", &session.username);
    kv_line(
        "Authenticated",
        if session.authenticated { "yes" } else { "no" },
    );
    match &session.current_server {
        Some(server) => {
            kv_line("Server", &server.id);
            kv_line("Server address", &server.server_address);
        }
        None => kv_line("Server", "(unknown)"),
    }
    kv_line(
        "Version",
        session
            .server_version
            .as_ref()
            .map_or("(unknown)", |v| v.info.as_str()),
    );
    println!();

    header("🪪", &format!("Permissions ({})", session.permissions.len()));
    for name in &session.permissions {
        if name.parse::<Permission>().is_ok() {
            println!("  {CYAN}├─{RESET} {name}");
        } else {
            println!("  {CYAN}├─{RESET} {name} {DIM}(not in catalog){RESET}");
        }
    }
    println!();
}

// ── Command dispatch ─────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let cfg = build_config(&cli);
    init_logging(&cfg, cli.log_json);
    tracing::debug!(
        base_url = %cfg.base_url,
        api_prefix = %cfg.api_prefix,
        insecure = cfg.accept_invalid_certs,
        "configuration resolved"
    );

    match run(&cfg, cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!();
            eprintln!("  {RED}{BOLD}✗ Error:{RESET} {e:#}");
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

fn build_config(cli: &Cli) -> ClientConfig {
    let mut cfg = ClientConfig::from_env();
    if let Some(url) = &cli.url {
        cfg.base_url.clone_from(url);
    }
    if cli.insecure {
        cfg.accept_invalid_certs = true;
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level.clone_from(level);
    }
    cfg
}

fn init_logging(cfg: &ClientConfig, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(cfg: &ClientConfig, cmd: Commands) -> Result<ExitCode> {
    match cmd {
        Commands::Catalog { which } => {
            cmd_catalog(&which);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Tabs {
            permissions,
            anonymous,
        } => {
            cmd_tabs(&permissions, anonymous);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Whoami { username, password } => {
            cmd_whoami(cfg, &username, &password).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check {
            username,
            password,
            permission,
        } => cmd_check(cfg, &username, &password, &permission).await,
    }
}

// ── Offline commands ─────────────────────────────────────────────────

fn cmd_catalog(which: &CatalogCommands) {
    match which {
        CatalogCommands::Permissions => {
            header("🔑", &format!("Permissions ({})", Permission::ALL.len()));
            for perm in Permission::ALL {
                println!("  {perm}");
            }
        }
        CatalogCommands::Roles => {
            header("👥", &format!("Roles ({})", Role::ALL.len()));
            for role in Role::ALL {
                println!("  {role}");
            }
        }
        CatalogCommands::Routes => {
            header("🧭", &format!("Routes ({})", RouteName::ALL.len()));
            for route in RouteName::ALL {
                println!("  {route}");
            }
        }
        CatalogCommands::Tabs => {
            header("📑", "Main tabs");
            for tab in &MAIN_TABS {
                print_tab(tab);
            }
        }
    }
    println!();
}

fn cmd_tabs(permissions: &[String], anonymous: bool) {
    for name in permissions {
        if name.parse::<Permission>().is_err() {
            warning(&format!("{name} is not in the permission catalog; it gates nothing."));
        }
    }

    let session = if anonymous {
        Session::default()
    } else {
        Session::with_permissions("offline", permissions.iter().cloned())
    };
    println!();
    print_allowed_tabs(&session);
}

// ── Live commands ────────────────────────────────────────────────────

fn controller(cfg: &ClientConfig) -> Result<SessionController> {
    let backend = HttpBackend::new(cfg).context("failed to build HTTP client")?;
    Ok(SessionController::new(Arc::new(backend), cfg.logout))
}

async fn cmd_whoami(cfg: &ClientConfig, username: &str, password: &str) -> Result<()> {
    let controller = controller(cfg)?;
    controller.login(username, password).await?;

    let loaded = controller.load_session_data().await;
    let session = controller.session().await;

    println!();
    print_session(&session);
    print_allowed_tabs(&session);
    if let Err(e) = &loaded {
        warning(&format!("Session only partially loaded: {e}"));
        println!();
    }

    controller
        .logout()
        .await
        .await
        .context("logout task panicked")?;
    success("Logged out.");
    Ok(())
}

async fn cmd_check(
    cfg: &ClientConfig,
    username: &str,
    password: &str,
    permission: &str,
) -> Result<ExitCode> {
    let permission: Permission = permission.parse()?;

    let controller = controller(cfg)?;
    controller.login(username, password).await?;
    let fetched = controller.fetch_user_data().await;
    let held = controller.has_permission(permission).await;
    controller
        .logout()
        .await
        .await
        .context("logout task panicked")?;
    fetched?;

    if held {
        success(&format!("{username} holds {permission}"));
        Ok(ExitCode::SUCCESS)
    } else {
        warning(&format!("{username} does not hold {permission}"));
        Ok(ExitCode::FAILURE)
    }
}
