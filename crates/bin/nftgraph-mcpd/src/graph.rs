use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::config::NftGraphConfig;

const MEMORY_ENDPOINT: &str = "mem://";

/// Opens the graph database selected by the configuration.
///
/// # Errors
/// Returns any connection, sign-in, or namespace selection error.
pub async fn connect_graph(config: &NftGraphConfig) -> Result<Surreal<Any>, surrealdb::Error> {
    let endpoint = config.db_endpoint();
    let db = connect(endpoint).await?;

    if !config.db_in_memory
        && let (Some(username), Some(password)) =
            (config.db_username.as_ref(), config.db_password.as_ref())
    {
        db.signin(Root {
            username: username.as_str(),
            password: password.as_str(),
        })
        .await?;
    }

    db.use_ns(&config.db_namespace)
        .use_db(&config.db_name)
        .await?;
    info!(
        namespace = %config.db_namespace,
        database = %config.db_name,
        in_memory = config.db_in_memory,
        "graph database connected"
    );
    Ok(db)
}

impl NftGraphConfig {
    #[must_use]
    pub fn db_endpoint(&self) -> &str {
        match (&self.db_uri, self.db_in_memory) {
            (Some(uri), false) => uri.as_str(),
            _ => MEMORY_ENDPOINT,
        }
    }
}
