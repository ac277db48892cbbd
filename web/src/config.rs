//! Command-line and environment configuration.

use clap::Parser;

use crate::state::Settings;

#[derive(Parser, Debug, Clone)]
#[command(name = "forms-web")]
#[command(about = "Profile registration and login forms backed by a content API")]
pub struct Config {
    /// Base URL of the content API, e.g. http://localhost:1337
    #[arg(long = "api-url", env = "STRAPI_API_URL")]
    pub api_url: String,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Content API path profiles are created at
    #[arg(long, env = "PROFILE_PATH", default_value = "/api/profiles")]
    pub profile_path: String,

    /// Largest single multipart part accepted, in bytes
    #[arg(long, default_value_t = 500_000_000)]
    pub max_part_bytes: usize,

    /// Largest request body accepted, in bytes
    #[arg(long, default_value_t = 1_000_000_000)]
    pub max_body_bytes: usize,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            profile_path: self.profile_path.clone(),
            max_part_bytes: self.max_part_bytes,
            max_body_bytes: self.max_body_bytes,
        }
    }
}
