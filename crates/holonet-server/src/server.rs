//! Process bootstrap: connect, wire the router, listen.

use holonet_core::HolonetError;
use holonet_graph::{CharacterStore, GraphClient};

use crate::config::ServerConfig;
use crate::keepalive::{self, HealthMonitor};
use crate::routes::{router, AppState};

/// Connect to Neo4j and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), HolonetError> {
    let graph = GraphClient::connect(&config.neo4j)
        .await
        .map_err(|e| HolonetError::Graph(e.to_string()))?;

    if config.neo4j.ensure_constraints {
        graph
            .ensure_schema()
            .await
            .map_err(|e| HolonetError::Graph(e.to_string()))?;
    }

    serve_with(graph, &config).await
}

/// Serve the API over an already-constructed store.
pub async fn serve_with<S: CharacterStore>(
    store: S,
    config: &ServerConfig,
) -> Result<(), HolonetError> {
    let health = HealthMonitor::new();
    let keepalive_task = if config.keepalive.enabled {
        Some(keepalive::spawn(
            store.clone(),
            config.keepalive.clone(),
            health.clone(),
        ))
    } else {
        tracing::info!("Keep-alive check disabled");
        None
    };

    let app = router(AppState::new(store, health));
    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Holonet server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down HTTP server");
        })
        .await?;

    if let Some(task) = keepalive_task {
        task.abort();
    }
    Ok(())
}
