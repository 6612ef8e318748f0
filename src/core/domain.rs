use std::env;
use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// Configuration abstracts runtime options for the catalog service. Built once
// in the binary and handed to the factories by value; nothing reads it through
// global state.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub database_url: String,
    pub max_connections: u32,
    pub listen_addr: String,
    // Acting identity stamped into create_by/update_by/delete_by. Request
    // authentication is an external concern, so one operator covers all calls.
    pub operator: String,
}

impl Configuration {
    pub fn new(database_url: &str) -> Self {
        Configuration {
            database_url: database_url.to_string(),
            max_connections: 5,
            listen_addr: "0.0.0.0:8080".to_string(),
            operator: "system".to_string(),
        }
    }

    pub fn from_env() -> Self {
        let mut config = Configuration::new(
            env::var("BOOKSHELF_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://bookshelf.db".to_string())
                .as_str(),
        );
        if let Ok(addr) = env::var("BOOKSHELF_LISTEN_ADDR") {
            config.listen_addr = addr;
        }
        if let Ok(operator) = env::var("BOOKSHELF_OPERATOR") {
            config.operator = operator;
        }
        if let Some(max) = env::var("BOOKSHELF_MAX_CONNECTIONS")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
        {
            config.max_connections = max;
        }
        config
    }
}
