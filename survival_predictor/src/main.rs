use anyhow::Context;
use tracing_subscriber::EnvFilter;

use survival_predictor::{
    config::AppConfig,
    load_predictor,
    session::{router, AppState},
    FeatureRecord, PredictionAdapter, TITANIC_V0,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env()?;

    let predictor = load_predictor(&cfg.model).with_context(|| {
        format!(
            "failed to load {} model from {}",
            cfg.model.backend,
            cfg.model.model_path.display()
        )
    })?;
    let adapter = PredictionAdapter::new(predictor, &TITANIC_V0)?;

    // Warmup so a broken artifact fails here rather than on the first click
    adapter.predict(&FeatureRecord::zeros(&TITANIC_V0))?;
    tracing::info!("warmup forward ok");

    tracing::info!(
        "loaded model {}; feat_list[{}]: {:?}",
        adapter.model_version(),
        TITANIC_V0.len(),
        TITANIC_V0.columns
    );

    let app = router(AppState {
        adapter,
        log_predictions: cfg.log_predictions,
    });

    tracing::info!("listening on http://{}", cfg.bind_addr);
    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
