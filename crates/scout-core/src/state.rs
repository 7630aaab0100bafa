use featurize::FeaturePipeline;
use inference::Model;

use crate::artifacts::Artifacts;

/// Process-wide shared state: the opaque model and the feature pipeline,
/// loaded once and serving for the process lifetime.
pub struct ServerState {
    model: Box<dyn Model>,
    model_id: String,
    model_version: String,
    pipeline: FeaturePipeline,
}

impl ServerState {
    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        let Artifacts {
            model,
            registry,
            schema,
        } = artifacts;
        let model_id = model.model_id.clone();
        let model_version = model.model_version.clone();
        Self::new(
            Box::new(model),
            model_id,
            model_version,
            FeaturePipeline::new(schema, registry),
        )
    }

    pub(crate) fn new(
        model: Box<dyn Model>,
        model_id: String,
        model_version: String,
        pipeline: FeaturePipeline,
    ) -> Self {
        Self {
            model,
            model_id,
            model_version,
            pipeline,
        }
    }

    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    pub fn pipeline(&self) -> &FeaturePipeline {
        &self.pipeline
    }
}
