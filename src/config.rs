use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub catalog_base_url: String,
    pub catalog_api_key: String,
    pub catalog_page_size: u64,
    pub catalog_max_pages: u64,
    pub catalog_rps: u32,
    pub upstream_timeout_secs: u64,
    pub boxoffice_path: String,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().context("PORT")?;

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://smdb.db?mode=rwc".to_string());

        let catalog_base_url = std::env::var("CATALOG_BASE_URL")
            .unwrap_or_else(|_| "https://snu.dataverse.ac.kr".to_string());

        let catalog_api_key = std::env::var("CATALOG_API_KEY").unwrap_or_else(|_| "".to_string());

        let catalog_page_size: u64 =
            std::env::var("CATALOG_PAGE_SIZE").ok().and_then(|s| s.parse().ok()).unwrap_or(10);

        let catalog_max_pages: u64 =
            std::env::var("CATALOG_MAX_PAGES").ok().and_then(|s| s.parse().ok()).unwrap_or(1000);

        let catalog_rps: u32 =
            std::env::var("CATALOG_RPS").ok().and_then(|s| s.parse().ok()).unwrap_or(4);

        let upstream_timeout_secs: u64 =
            std::env::var("UPSTREAM_TIMEOUT_SECS").ok().and_then(|s| s.parse().ok()).unwrap_or(30);

        let boxoffice_path =
            std::env::var("BOXOFFICE_PATH").unwrap_or_else(|_| "./boxoffice.csv".to_string());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            catalog_base_url,
            catalog_api_key,
            catalog_page_size,
            catalog_max_pages,
            catalog_rps,
            upstream_timeout_secs,
            boxoffice_path,
            allowed_origins,
        })
    }
}
