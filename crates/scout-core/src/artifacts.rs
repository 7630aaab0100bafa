//! Startup loading of the trained artifacts. Failure here is fatal by
//! design: the process must not serve with no model.

use anyhow::{Context, Result};
use tracing::{info, warn};

use featurize::{EncoderRegistry, FeatureSchema};
use inference::{LinearLogitModel, Model};

use crate::config::ServeConfig;

pub struct Artifacts {
    pub model: LinearLogitModel,
    pub registry: EncoderRegistry,
    pub schema: FeatureSchema,
}

pub fn load(config: &ServeConfig) -> Result<Artifacts> {
    let model = LinearLogitModel::from_file(&config.model_path)
        .with_context(|| format!("loading model artifact {}", config.model_path.display()))?;
    let registry = EncoderRegistry::from_file(&config.encoders_path, config.unseen_policy)
        .with_context(|| {
            format!(
                "loading encoder artifact {}",
                config.encoders_path.display()
            )
        })?;

    let schema = match model.training_columns() {
        Some(columns) => FeatureSchema::from_training_columns(&columns, &registry.encoded_names()),
        None => {
            warn!("model artifact records no training columns; requests will fail until a complete artifact is deployed");
            FeatureSchema::default()
        }
    };

    info!(
        model_id = %model.model_id,
        model_version = %model.model_version,
        columns = schema.len(),
        encoders = registry.encoded_names().len(),
        "artifacts loaded"
    );

    Ok(Artifacts {
        model,
        registry,
        schema,
    })
}
