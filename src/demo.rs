//! Sequential demo flow: index lifecycle and document round trip against a
//! live cluster.

use crate::{
    client::SearchClient,
    config::{ClientConfig, ConnectionMode},
    document::Document,
    error::Result,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tracing::info;

/// Index the demo operates on.
pub const DEMO_INDEX: &str = "movies";

/// Signing service name of OpenSearch Serverless.
const SERVERLESS_SERVICE: &str = "aoss";

/// Budget for the post-update visibility wait.
const VISIBILITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Demo record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    /// Director name.
    pub director: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Release year.
    pub year: Option<i32>,
}

impl Movie {
    /// Create a fully populated record.
    pub fn new(director: &str, title: &str, year: i32) -> Self {
        Self {
            director: Some(director.to_string()),
            title: Some(title.to_string()),
            year: Some(year),
        }
    }
}

impl Document for Movie {
    fn index_name() -> &'static str {
        DEMO_INDEX
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" by {} ({})",
            self.title.as_deref().unwrap_or("?"),
            self.director.as_deref().unwrap_or("?"),
            self.year.map_or_else(|| "?".to_string(), |y| y.to_string()),
        )
    }
}

/// Run the demo sequence: probe, create index, configure it, index a
/// document, update it, wait for visibility, search, then clean up.
///
/// Errors other than the non-fatal create-index classifications propagate to
/// the caller; the client's transport is released on every exit path by
/// `Drop`.
pub async fn run(config: ClientConfig) -> Result<()> {
    // TODO: probe Serverless too once it supports GET /.
    let skip_info = matches!(
        &config.mode,
        ConnectionMode::AwsSigned { service, .. } if service == SERVERLESS_SERVICE
    );

    let client = SearchClient::connect(config).await?;

    if !skip_info {
        let cluster = client.info().await?;
        info!(
            "{}: {}",
            cluster.version.distribution.as_deref().unwrap_or("opensearch"),
            cluster.version.number
        );
    }

    // Settings only apply when this run created the index.
    if client.create_index_idempotent(DEMO_INDEX).await? {
        client.put_settings(DEMO_INDEX, json!({})).await?;
    }

    let movie = Movie::new("Bennett Miller", "Moneyball", 2011);
    let result = client.index_doc("1", &movie).await?;
    info!("Document {}.", result);

    let update = Movie::new("Bennett Miller", "Moneyball 2", 2011);
    let result = client.update_doc("1", &update).await?;
    info!("Document {}.", result);

    client
        .await_searchable(DEMO_INDEX, "1", VISIBILITY_TIMEOUT)
        .await?;

    for movie in client.search_all::<Movie>().await? {
        info!("{}", movie);
    }

    client.delete_doc(DEMO_INDEX, "1").await?;
    client.delete_index(DEMO_INDEX).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_display() {
        let movie = Movie::new("Bennett Miller", "Moneyball", 2011);
        assert_eq!(movie.to_string(), "\"Moneyball\" by Bennett Miller (2011)");
    }

    #[test]
    fn test_movie_display_with_missing_fields() {
        let movie = Movie {
            director: None,
            title: Some("Moneyball".to_string()),
            year: None,
        };
        assert_eq!(movie.to_string(), "\"Moneyball\" by ? (?)");
    }

    #[test]
    fn test_movie_wire_field_names() {
        let movie = Movie::new("Bennett Miller", "Moneyball", 2011);
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["Director"], "Bennett Miller");
        assert_eq!(value["Title"], "Moneyball");
        assert_eq!(value["Year"], 2011);
    }
}
