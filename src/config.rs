use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

use crate::registry::default_rooms;
use crate::types::{Config, Pacing, DEFAULT_BILLING_URL};

pub const WEBHOOK_VAR: &str = "WECHAT_WORK_WEBHOOK";
pub const SESSION_VAR: &str = "JSESSIONID";

const QUERY_TIMEOUT: Duration = Duration::from_secs(15);
const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn load_config() -> Result<Config> {
    load_config_with_env(&SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(env: &E) -> Result<Config> {
    let webhook_url = non_empty(env, WEBHOOK_VAR);
    let session_id = non_empty(env, SESSION_VAR);

    let (webhook_url, session_id) = match (webhook_url, session_id) {
        (Some(w), Some(s)) => (w, s),
        (w, s) => {
            let missing: Vec<&str> = [(WEBHOOK_VAR, w.is_none()), (SESSION_VAR, s.is_none())]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
            return Err(anyhow!(
                "missing required secret(s): {}. Configure {} and {} as repository secrets (exposed to the job as env vars)",
                missing.join(", "),
                WEBHOOK_VAR,
                SESSION_VAR,
            ));
        }
    };

    info!("{} = {}", WEBHOOK_VAR, preview(&webhook_url, 50));
    info!("{} = {}", SESSION_VAR, preview(&session_id, 10));

    Ok(Config {
        webhook_url,
        session_id,
        billing_url: DEFAULT_BILLING_URL.to_string(),
        rooms: default_rooms(),
        query_timeout: QUERY_TIMEOUT,
        notify_timeout: NOTIFY_TIMEOUT,
        pacing: Pacing::default(),
    })
}

fn non_empty<E: EnvironmentProvider>(env: &E, key: &str) -> Option<String> {
    env.get_var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First `max_chars` characters followed by `...`, so secrets never hit the logs whole.
pub fn preview(value: &str, max_chars: usize) -> String {
    let head: String = value.chars().take(max_chars).collect();
    format!("{}...", head)
}
