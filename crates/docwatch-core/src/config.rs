use std::{env, fs, path::Path, path::PathBuf, time::Duration};

use crate::{
    domain::{ChannelId, RoleId},
    errors::Error,
    Result,
};

const DEFAULT_PAGE_URL: &str = "https://www.fsaeonline.com/cdsweb/gen/DocumentResources.aspx";
const DEFAULT_BASE_URL: &str = "https://www.fsaeonline.com";
const DEFAULT_SECTION: &str = "Ruleset and Resources";

/// Typed configuration for the watcher process.
///
/// Loaded once at startup and passed around by `Arc`; nothing re-reads the
/// environment per cycle.
#[derive(Clone, Debug)]
pub struct Config {
    // Credential
    pub bot_token: String,

    // Announcement target. Either missing disables sending (logged per
    // cycle), it is not fatal to the process.
    pub channel_id: Option<ChannelId>,
    pub role_id: Option<RoleId>,

    // Target page
    pub page_url: String,
    pub base_url: String,
    pub section: String,

    // Persistence
    pub snapshot_file: PathBuf,

    // Timing
    pub check_interval: Duration,
    pub startup_delay: Duration,
    pub fetch_timeout: Duration,
    pub head_timeout: Duration,
    pub notify_timeout: Duration,

    // Renderer
    pub chrome_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("DISCORD_BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("DISCORD_BOT_TOKEN environment variable is required".to_string())
        })?;

        // Unset disables announcements; a present but non-numeric value is a
        // typo, not an omission, and must not be mistaken for one.
        let channel_id = parse_id_env("CHANNEL_ID")?.map(ChannelId);
        let role_id = parse_id_env("ROLE_ID")?.map(RoleId);

        let page_url = env_str("WATCH_PAGE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_PAGE_URL.to_string());
        let base_url = env_str("WATCH_BASE_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let section = env_str("WATCH_SECTION")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_SECTION.to_string());

        let snapshot_file = env_path("SNAPSHOT_FILE")
            .unwrap_or_else(|| PathBuf::from("docwatch-snapshot.json"));

        let check_interval = Duration::from_secs(env_u64("CHECK_INTERVAL_SECS").unwrap_or(20));
        let startup_delay = Duration::from_secs(env_u64("STARTUP_DELAY_SECS").unwrap_or(5));
        let fetch_timeout = Duration::from_secs(env_u64("FETCH_TIMEOUT_SECS").unwrap_or(30));
        let head_timeout = Duration::from_secs(env_u64("HEAD_TIMEOUT_SECS").unwrap_or(10));
        let notify_timeout = Duration::from_secs(env_u64("NOTIFY_TIMEOUT_SECS").unwrap_or(10));

        let chrome_path = env_path("CHROME_PATH");

        Ok(Self {
            bot_token,
            channel_id,
            role_id,
            page_url,
            base_url,
            section,
            snapshot_file,
            check_interval,
            startup_delay,
            fetch_timeout,
            head_timeout,
            notify_timeout,
            chrome_path,
        })
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

/// Parses an optional numeric-id variable. Unset or blank yields `None`;
/// a present malformed value is a config error, so a typoed `CHANNEL_ID`
/// cannot silently disable announcements.
fn parse_id_env(key: &str) -> Result<Option<u64>> {
    let Some(raw) = env_str(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<u64>().map(Some).map_err(|_| {
        Error::Config(format!("{key} must be a numeric id, got {raw:?}"))
    })
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}
