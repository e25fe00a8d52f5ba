use clap::{Parser, Subcommand};
use gateway_core::modules::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gemini-gateway",
    about = "Gemini Gateway - chat relay for the Gemini API",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "GATEWAY_CONFIG", help = "Path to gateway.json")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, env = "GATEWAY_PORT")]
    pub port: Option<u16>,

    #[arg(long, global = true, env = "GATEWAY_UPSTREAM_URL", help = "Provider root URL")]
    pub upstream_url: Option<String>,

    #[arg(long, global = true, env = "GATEWAY_STATIC_DIR", help = "Static asset root")]
    pub static_dir: Option<String>,

    #[arg(long, global = true, env = "GATEWAY_LOG_DIR", help = "Rolling log file directory")]
    pub log_dir: Option<String>,

    #[arg(long, global = true, help = "Bind to all interfaces")]
    pub lan: bool,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start the gateway server (default if no command specified)")]
    Serve,

    #[command(subcommand, about = "View and initialize configuration")]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            port: self.port,
            upstream_base_url: self.upstream_url.clone(),
            static_dir: self.static_dir.clone(),
            log_dir: self.log_dir.clone(),
            allow_lan_access: self.lan.then_some(true),
        }
    }
}
