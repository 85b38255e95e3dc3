//! Slide assembly.
//!
//! A pass walks `LoadingConfig → ProcessingCover → ProcessingSlides →
//! Finalizing` and ends in `Done` or `Failed`. Failures inside one slide are
//! recorded and the pass moves on; only unparsable input and an empty result
//! fail the whole pass.

pub mod assets;
pub mod cover;
pub mod manual;
pub mod request;
pub mod result;
pub mod slide;

use std::fmt;

use crate::constants::output::{CONTAINER_NAME, ITEM_SPACING};
use crate::error::{Error, Result};
use crate::scene::SceneGraph;
use crate::services::Fetch;
use crate::template::{TemplateConfig, TemplateConfigs};
use crate::types::NodeId;

pub use manual::format_selection;
pub use request::{ContentSlide, CoverSlide, DocumentRequest};
pub use result::{FormatReport, ProcessingResult};

use result::describe;

/// Where a pass currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// No pass running.
    Idle,
    /// Fetching template configuration.
    LoadingConfig,
    /// Building the cover slide.
    ProcessingCover,
    /// Building content slide `n` (1-based).
    ProcessingSlides(usize),
    /// Collecting slides into the output container.
    Finalizing,
    /// Pass finished with at least one slide.
    Done,
    /// Pass aborted.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::LoadingConfig => write!(f, "loading config"),
            Self::ProcessingCover => write!(f, "processing cover"),
            Self::ProcessingSlides(n) => write!(f, "processing slide {n}"),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Where template configuration comes from.
#[derive(Debug, Clone)]
enum ConfigSource {
    Url(String),
    Fixed(TemplateConfigs),
}

/// Runs processing passes against one scene.
///
/// The scene is borrowed mutably for the pipeline's lifetime, so passes on
/// the same scene cannot overlap.
pub struct Pipeline<'a, S: SceneGraph + ?Sized, F: Fetch + ?Sized> {
    scene: &'a mut S,
    fetcher: &'a F,
    source: ConfigSource,
    stage: Stage,
}

impl<'a, S: SceneGraph + ?Sized, F: Fetch + ?Sized> Pipeline<'a, S, F> {
    /// Create a pipeline that fetches configuration from `templates_url` on every pass.
    pub fn new(scene: &'a mut S, fetcher: &'a F, templates_url: impl Into<String>) -> Self {
        Self {
            scene,
            fetcher,
            source: ConfigSource::Url(templates_url.into()),
            stage: Stage::Idle,
        }
    }

    /// Create a pipeline with configuration already in hand.
    pub const fn with_configs(scene: &'a mut S, fetcher: &'a F, configs: TemplateConfigs) -> Self {
        Self {
            scene,
            fetcher,
            source: ConfigSource::Fixed(configs),
            stage: Stage::Idle,
        }
    }

    /// Current stage.
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!("Pipeline: {} -> {}", self.stage, stage);
        self.stage = stage;
    }

    async fn configs(&mut self) -> TemplateConfigs {
        self.enter(Stage::LoadingConfig);
        match &self.source {
            ConfigSource::Url(url) => TemplateConfigs::load(self.fetcher, url).await,
            ConfigSource::Fixed(configs) => configs.clone(),
        }
    }

    /// Process a JSON request document.
    pub async fn process_json(&mut self, json: &str) -> Result<ProcessingResult> {
        let outcome = self.run(json).await;
        self.enter(if outcome.is_ok() { Stage::Done } else { Stage::Failed });
        outcome
    }

    async fn run(&mut self, json: &str) -> Result<ProcessingResult> {
        let configs = self.configs().await;
        let request = DocumentRequest::from_json(json)?;

        let mut created: Vec<NodeId> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        if let Some(requested) = request.cover() {
            self.enter(Stage::ProcessingCover);
            match self.build_cover(requested, &configs).await {
                Ok(id) => created.push(id),
                Err(e) => {
                    tracing::warn!("Error processing cover slide: {e}");
                    errors.push(describe("Cover slide", &e));
                }
            }
        }

        for (index, requested) in request.slides() {
            self.enter(Stage::ProcessingSlides(index));
            match self.build_slide(requested, &configs).await {
                Ok(id) => created.push(id),
                Err(e) => {
                    tracing::warn!("Error processing slide {index}: {e}");
                    errors.push(describe(&format!("Slide {index}"), &e));
                }
            }
        }

        if created.is_empty() {
            return Err(Error::NothingToProcess { errors });
        }

        self.enter(Stage::Finalizing);
        let container = self.scene.create_container(CONTAINER_NAME, ITEM_SPACING, &created)?;
        self.scene.center_in_viewport(&container)?;
        self.scene.select(std::slice::from_ref(&container));

        let result = ProcessingResult {
            slides_created: created.len(),
            errors,
            container: Some(container),
        };
        tracing::info!("{}", result.message());
        Ok(result)
    }

    async fn instantiate(&mut self, template: &str) -> Result<NodeId> {
        let component = self
            .scene
            .find_component(template)
            .await?
            .ok_or_else(|| Error::TemplateNotFound(template.to_string()))?;
        self.scene.create_instance(&component).await
    }

    /// Drop a half-built instance so it never reaches the output.
    fn discard(&mut self, instance: &NodeId) {
        if let Err(e) = self.scene.remove(instance) {
            tracing::warn!("Failed to remove partial instance {instance}: {e}");
        }
    }

    async fn build_cover(&mut self, request: Result<CoverSlide>, configs: &TemplateConfigs) -> Result<NodeId> {
        let request = request?;
        let instance = self.instantiate(&request.template).await?;
        let config = configs.get(&request.template).cloned().unwrap_or_default();
        match cover::populate(&mut *self.scene, self.fetcher, &instance, &request, &config).await {
            Ok(()) => Ok(instance),
            Err(e) => {
                self.discard(&instance);
                Err(e)
            }
        }
    }

    async fn build_slide(&mut self, request: Result<ContentSlide>, configs: &TemplateConfigs) -> Result<NodeId> {
        let request = request?;
        let instance = self.instantiate(&request.template).await?;
        let config: TemplateConfig = configs.get(&request.template).cloned().unwrap_or_default();
        match slide::populate(&mut *self.scene, self.fetcher, &instance, &request, &config).await {
            Ok(_) => Ok(instance),
            Err(e) => {
                self.discard(&instance);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::scene::{MemoryScene, NodeSpec, SceneDocument};
    use crate::services::MemoryFetcher;

    fn scene() -> MemoryScene {
        let doc = SceneDocument {
            viewport_center: [1000.0, 800.0],
            nodes: vec![NodeSpec::component(
                "T",
                1080.0,
                1350.0,
                vec![NodeSpec::text("Quote 1", "", 900.0, 400.0)],
            )],
            selection: vec![],
        };
        MemoryScene::from_document(&doc).unwrap()
    }

    #[tokio::test]
    async fn ends_done_and_selects_the_container() {
        let mut scene = scene();
        let fetcher = MemoryFetcher::new();
        let mut pipeline = Pipeline::with_configs(&mut scene, &fetcher, TemplateConfigs::default());
        assert_eq!(pipeline.stage(), Stage::Idle);

        let result = pipeline
            .process_json(r#"{"slides":[{"template":"T","texts":["hi"]}]}"#)
            .await
            .unwrap();
        assert_eq!(pipeline.stage(), Stage::Done);
        assert_eq!(result.slides_created, 1);

        let container = result.container.unwrap();
        assert_eq!(scene.selection(), vec![container.clone()]);
        let node = scene.get(&container).unwrap();
        assert_eq!(node.name, CONTAINER_NAME);
        assert!((node.x + node.size.width / 2.0 - 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn malformed_json_fails_the_pass() {
        let mut scene = scene();
        let fetcher = MemoryFetcher::new();
        let mut pipeline = Pipeline::with_configs(&mut scene, &fetcher, TemplateConfigs::default());
        let err = pipeline.process_json("not json").await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
        assert_eq!(pipeline.stage(), Stage::Failed);
    }

    #[tokio::test]
    async fn unreachable_config_still_processes() {
        let mut scene = scene();
        let fetcher = MemoryFetcher::new();
        let mut pipeline = Pipeline::new(&mut scene, &fetcher, "https://unreachable.test/templates.json");
        let result = pipeline
            .process_json(r#"{"slides":[{"template":"T","texts":["hi"]}]}"#)
            .await
            .unwrap();
        assert_eq!(result.slides_created, 1);
    }

    #[tokio::test]
    async fn missing_template_leaves_no_partial_instance() {
        let mut scene = scene();
        let roots_before = scene.roots().len();
        let fetcher = MemoryFetcher::new();
        let mut pipeline = Pipeline::with_configs(&mut scene, &fetcher, TemplateConfigs::default());
        let err = pipeline
            .process_json(r#"{"slides":[{"template":"Nope","texts":["hi"]}]}"#)
            .await
            .unwrap_err();
        match err {
            Error::NothingToProcess { errors } => {
                assert_eq!(errors, vec!["Slide 1: Template \"Nope\" not found in document".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(scene.roots().len(), roots_before);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::ProcessingSlides(3).to_string(), "processing slide 3");
        assert_eq!(Stage::LoadingConfig.to_string(), "loading config");
    }
}
