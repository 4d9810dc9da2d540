use std::collections::{btree_map::Entry, BTreeMap};

use serde_json::{Map, Value};
use thiserror::Error;
use ureq::{Agent, AgentBuilder, ErrorKind};

const URL: &str = "http://api.geonames.org/getJSON";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("geonames returned status {0}")]
    Status(u16),
    #[error("geonames request timed out: {0}")]
    Timeout(String),
    #[error("failed to connect to geonames: {0}")]
    Connection(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("geonames returned a non-object body")]
    BadBody,
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(transport) => {
                let msg = transport.to_string();
                match transport.kind() {
                    ErrorKind::Dns | ErrorKind::ConnectionFailed => Self::Connection(msg),
                    ErrorKind::Io if msg.contains("timed out") => Self::Timeout(msg),
                    _ => Self::Transport(msg),
                }
            }
        }
    }
}

pub struct Client {
    agent: Agent,
    username: String,
}

impl Client {
    pub fn new(username: &str) -> Self {
        Self {
            agent: AgentBuilder::new()
                .user_agent("update-address (+https://github.com/ror-community/update_address)")
                .build(),
            username: username.to_string(),
        }
    }

    pub fn get(&self, id: u64) -> Result<Map<String, Value>, FetchError> {
        let response: Value = self
            .agent
            .get(URL)
            .query("geonameId", &id.to_string())
            .query("username", &self.username)
            .call()?
            .into_json()
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        match response {
            Value::Object(map) => Ok(map),
            _ => Err(FetchError::BadBody),
        }
    }
}

/// Memoizes responses per geonames id for the lifetime of a batch run.
/// No eviction: a batch only ever sees a bounded set of ids.
#[derive(Default)]
pub struct ResponseCache {
    responses: BTreeMap<u64, Map<String, Value>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch(&mut self, client: &Client, id: u64) -> Result<&Map<String, Value>, FetchError> {
        match self.responses.entry(id) {
            Entry::Occupied(cached) => Ok(cached.into_mut()),
            Entry::Vacant(slot) => Ok(slot.insert(client.get(id)?)),
        }
    }
}
