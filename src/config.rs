use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ASSETS_DIR, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SESSION_IDLE_SECS, DEFAULT_TEMPLATES_DIR,
};

/// Settings for the web server, parsed from the command line with
/// environment fallbacks.
#[derive(clap::Args, Debug, Clone)]
pub struct WebConfig {
    #[arg(long, default_value = DEFAULT_HOST.as_str(), help = "Address to bind the web server to.")]
    pub host: String,
    #[arg(long, env = "ECHOBOT_PORT", default_value_t = DEFAULT_PORT, help = "Port for the web server.")]
    pub port: u16,
    #[arg(long, default_value = DEFAULT_ASSETS_DIR.as_str(), help = "Directory holding style.css, alignment.css and scroll.js.")]
    pub assets_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_TEMPLATES_DIR.as_str(), help = "Directory holding the page templates.")]
    pub templates_dir: PathBuf,
    #[arg(long, default_value_t = *DEFAULT_SESSION_IDLE_SECS, help = "Seconds of inactivity after which a chat session is discarded.")]
    pub session_idle_secs: u64,
}

impl WebConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        web: WebConfig,
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = TestCli::parse_from([
            "echobot-web",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--assets-dir",
            "/tmp/assets",
            "--session-idle-secs",
            "90",
        ]);
        assert_eq!(cli.web.bind_addr(), "0.0.0.0:9000");
        assert_eq!(cli.web.session_idle_ttl(), Duration::from_secs(90));
        assert_eq!(cli.web.assets_dir, PathBuf::from("/tmp/assets"));
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(TestCli::try_parse_from(["echobot-web", "--port", "not-a-port"]).is_err());
    }
}
