use std::path::PathBuf;

use clap::Parser;
use intake_access::DEFAULT_BAN_LIST_FILE_NAME;

const DEFAULT_TELEGRAM_API_BASE: &str = "https://api.telegram.org";

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_f64(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|error| format!("failed to parse float: {error}"))?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err("value must be a finite number greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "intake-bot",
    about = "Telegram intake bot for vehicle service requests",
    version
)]
pub(crate) struct Cli {
    #[arg(
        long = "bot-token",
        env = "BOT_TOKEN",
        hide_env_values = true,
        help = "Telegram bot token issued by BotFather"
    )]
    pub(crate) bot_token: Option<String>,

    #[arg(
        long = "target-chat",
        env = "TARGET_CHAT",
        allow_hyphen_values = true,
        help = "Numeric chat id that receives completed requests; printed to stdout when unset"
    )]
    pub(crate) target_chat: Option<String>,

    #[arg(
        long = "admin-ids",
        env = "ADMIN_IDS",
        default_value = "",
        allow_hyphen_values = true,
        help = "Comma-separated user ids allowed to run /ban, /unban and /banlist"
    )]
    pub(crate) admin_ids: String,

    #[arg(
        long = "ban-list-path",
        env = "BAN_LIST_PATH",
        default_value = DEFAULT_BAN_LIST_FILE_NAME,
        help = "JSON file holding the persisted ban list"
    )]
    pub(crate) ban_list_path: PathBuf,

    #[arg(
        long = "request-connect-timeout",
        env = "REQUEST_CONNECT_TIMEOUT",
        default_value_t = 10.0,
        value_parser = parse_positive_f64,
        help = "Seconds allowed to open a connection to the Bot API"
    )]
    pub(crate) request_connect_timeout: f64,

    #[arg(
        long = "request-read-timeout",
        env = "REQUEST_READ_TIMEOUT",
        default_value_t = 25.0,
        value_parser = parse_positive_f64,
        help = "Seconds allowed to read a Bot API response"
    )]
    pub(crate) request_read_timeout: f64,

    #[arg(
        long = "request-write-timeout",
        env = "REQUEST_WRITE_TIMEOUT",
        default_value_t = 25.0,
        value_parser = parse_positive_f64,
        help = "Seconds allowed to send a Bot API request"
    )]
    pub(crate) request_write_timeout: f64,

    #[arg(
        long = "request-pool-timeout",
        env = "REQUEST_POOL_TIMEOUT",
        default_value_t = 10.0,
        value_parser = parse_positive_f64,
        help = "Seconds an idle pooled connection is kept"
    )]
    pub(crate) request_pool_timeout: f64,

    #[arg(
        long = "telegram-api-base",
        env = "TELEGRAM_API_BASE",
        default_value = DEFAULT_TELEGRAM_API_BASE,
        help = "Bot API base URL"
    )]
    pub(crate) telegram_api_base: String,

    #[arg(
        long = "poll-timeout-seconds",
        env = "POLL_TIMEOUT_SECONDS",
        default_value_t = 20,
        help = "Long-poll timeout passed to getUpdates"
    )]
    pub(crate) poll_timeout_seconds: u64,

    #[arg(
        long = "reconnect-delay-ms",
        env = "RECONNECT_DELAY_MS",
        default_value_t = 2_000,
        value_parser = parse_positive_u64,
        help = "Delay before polling again after a failed poll"
    )]
    pub(crate) reconnect_delay_ms: u64,
}
