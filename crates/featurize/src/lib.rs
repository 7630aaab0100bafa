pub mod bag;
pub mod derive;
pub mod encoders;
pub mod pipeline;
pub mod schema;

pub use bag::AttributeBag;
pub use encoders::{EncodeError, EncoderRegistry, LabelEncoder, RegistryLoadError, UnseenPolicy};
pub use pipeline::{FeaturePipeline, PipelineError};
pub use schema::{FeatureKind, FeatureSchema, FeatureSpec, FieldPresence, PresenceMap};
