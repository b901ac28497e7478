use serde::Deserialize;

/// `GET /tickets` query string; both tables are searched by default.
#[derive(Debug, Deserialize)]
pub struct SearchTicketsQuery {
    #[serde(default)]
    pub query: String,
    #[serde(default = "yes")]
    pub include_resolved: bool,
    #[serde(default = "yes")]
    pub include_unresolved: bool,
}

fn yes() -> bool {
    true
}
