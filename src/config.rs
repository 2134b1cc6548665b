use std::{env, net::SocketAddr, path::PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store: StoreKind,
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            store: StoreKind::Memory,
            data_path: PathBuf::from("data/stats.json"),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("invalid PORT {value:?}, using {}", defaults.port);
                defaults.port
            }),
            None => defaults.port,
        };

        let store = match lookup("STATS_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreKind::Memory,
            Some("file") => StoreKind::File,
            Some(other) => {
                warn!("unknown STATS_STORE {other:?}, using memory");
                StoreKind::Memory
            }
        };

        let data_path = lookup("STATS_DATA_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        Self {
            port,
            store,
            data_path,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
