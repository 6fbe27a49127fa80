use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use fraudgate::form::{render, Form};
use fraudgate::{Args, Assessor, Detector, GeminiClient, ModelManager, ModelSource, RuntimeConfig, Settings};

async fn resolve_model_path(settings: &Settings) -> Result<PathBuf> {
    match &settings.model {
        ModelSource::File(path) => Ok(path.clone()),
        ModelSource::Artifact(spec) => {
            let manager = ModelManager::new_default()?;
            if settings.fresh {
                info!("Fresh download requested - removing any cached artifact...");
                manager.remove(&spec.name)?;
            }
            Ok(manager.ensure(spec).await?)
        }
        ModelSource::Cached(name) => {
            let manager = ModelManager::new_default()?;
            manager
                .require(name)
                .with_context(|| format!("no model in {}; pass --model-path or --model-url", manager.models_dir().display()))
        }
    }
}

/// Loads the detector once. A failure is reported here and only here.
async fn load_detector(settings: &Settings) -> Option<Arc<Detector>> {
    let loaded = async {
        let path = resolve_model_path(settings).await?;
        let detector = Detector::builder()
            .with_runtime_config(RuntimeConfig::default())
            .with_model_path(&path)?
            .build()?;
        Ok::<_, anyhow::Error>(detector)
    }
    .await;

    match loaded {
        Ok(detector) => Some(Arc::new(detector)),
        Err(e) => {
            error!("Error loading model: {:#}", e);
            eprintln!("Error loading model: {:#}", e);
            eprintln!("Prediction is disabled for this session.");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fraudgate::init_logger();
    let args = Args::parse();
    let settings = Settings::from_args(&args)?;

    info!("=== App Fraud Detection ===");
    let client = GeminiClient::new(
        settings.llm_endpoint.clone(),
        settings.llm_model.clone(),
        settings.api_key.clone(),
        settings.timeout,
    )?;
    let assessor = match load_detector(&settings).await {
        Some(detector) => Assessor::new(detector, client),
        None => Assessor::without_detector(client),
    };

    if let Some(app_name) = &args.app_name {
        let outcome = assessor.assess(app_name, args.features()).await;
        render(&mut io::stdout(), &outcome, settings.show_raw)?;
        if outcome.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut form = Form::new(io::stdin().lock(), io::stdout());
    while let Some(submission) = form.read_submission()? {
        let outcome = assessor.assess(&submission.app_name, submission.features).await;

        let mut out = io::stdout();
        render(&mut out, &outcome, settings.show_raw)?;
        out.flush()?;

        if !form.confirm("Assess another app?")? {
            break;
        }
    }

    Ok(())
}
