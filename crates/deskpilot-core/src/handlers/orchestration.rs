//! Simulated multi-model pipelines.
//!
//! No model is invoked. Each pipeline is a fixed, ordered list of step
//! narrations joined into a single result.

use async_trait::async_trait;
use tracing::debug;

use deskpilot_protocols::{Domain, TaskError, TaskResult};

use super::DomainHandler;
use crate::registry::CapabilityRegistry;
use crate::rules::{contains_any, normalize};

/// A declarative pipeline narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub title: &'static str,
    pub steps: Vec<String>,
    pub separator: &'static str,
}

impl Pipeline {
    fn fixed(title: &'static str, steps: &[&str], separator: &'static str) -> Self {
        Self {
            title,
            steps: steps.iter().map(|s| s.to_string()).collect(),
            separator,
        }
    }

    /// Find, extract, analyze, generate and save.
    pub fn find_analyze_save() -> Self {
        Self::fixed(
            "Multi-model workflow finished. Analysis saved. Steps: ",
            &[
                "Vision model located the document on the desktop",
                "OCR model extracted the document text",
                "LLM analyzed the document content",
                "Generation model produced an analytical report",
                "Filesystem saved the analysis to a new file",
            ],
            " -> ",
        )
    }

    /// Analysis followed by generation and a quality check.
    pub fn analysis_and_generation() -> Self {
        Self::fixed(
            "Models processed the data in sequence: ",
            &[
                "Analysis model processed the input data",
                "Generation model produced the result",
                "Quality model approved the result",
            ],
            " -> ",
        )
    }

    /// N models applied one after another.
    pub fn sequential(models: &[&str]) -> Self {
        Self {
            title: "Sequential processing finished. ",
            steps: models
                .iter()
                .enumerate()
                .map(|(i, model)| format!("Step {}: {} processed the data", i + 1, model))
                .collect(),
            separator: "; ",
        }
    }

    /// A coordinator fanning work out to named models.
    pub fn coordination() -> Self {
        Self::fixed(
            "Model coordination finished: ",
            &[
                "Coordinator distributed tasks between models",
                "Model A analyzed the text",
                "Model B generated the answer",
                "Model C verified the result",
                "Coordinator merged the results",
            ],
            " | ",
        )
    }

    /// Generic orchestration narration.
    pub fn general() -> Self {
        Self::fixed(
            "",
            &[
                "Orchestrator initialized the pipeline.",
                "Models processed the input data.",
                "Results were aggregated and verified.",
                "Orchestration finished successfully.",
            ],
            " ",
        )
    }

    /// Title followed by the steps joined with the separator.
    pub fn render(&self) -> String {
        format!("{}{}", self.title, self.steps.join(self.separator))
    }
}

/// Picks and narrates a pipeline.
#[derive(Debug, Default)]
pub struct OrchestrationHandler;

impl OrchestrationHandler {
    pub fn new() -> Self {
        Self
    }

    /// Pipeline matching a lowercased description.
    ///
    /// Russian "найти" is a Web keyword, so find/analyze/save requests only
    /// reach this handler when phrased with "find".
    pub fn select(text: &str) -> Pipeline {
        let find = contains_any(text, &["найти", "find"]);
        let analyze = contains_any(text, &["анализ", "analy"]);
        let save = contains_any(text, &["сохранить", "save"]);

        if find && analyze && save {
            Pipeline::find_analyze_save()
        } else if analyze && contains_any(text, &["генерац", "generat"]) {
            Pipeline::analysis_and_generation()
        } else if contains_any(text, &["последовательн", "цепочк", "sequential", "chain"]) {
            Pipeline::sequential(&["LLM-1", "LLM-2", "LLM-3"])
        } else if contains_any(text, &["координац", "coordinat"]) {
            Pipeline::coordination()
        } else {
            Pipeline::general()
        }
    }
}

#[async_trait]
impl DomainHandler for OrchestrationHandler {
    fn domain(&self) -> Domain {
        Domain::ModelOrchestration
    }

    async fn execute(
        &self,
        description: &str,
        _capabilities: &CapabilityRegistry,
    ) -> Result<TaskResult, TaskError> {
        let pipeline = Self::select(&normalize(description));
        debug!(steps = pipeline.steps.len(), "Running simulated pipeline");
        Ok(TaskResult::success(pipeline.render()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_english_find_analyze_save() {
        let pipeline =
            OrchestrationHandler::select("run the llm pipeline: find data, analyze it and save");
        assert_eq!(pipeline, Pipeline::find_analyze_save());
    }

    #[test]
    fn test_select_find_analyze_save() {
        let pipeline = OrchestrationHandler::select("найти документ, провести анализ и сохранить");
        assert_eq!(pipeline, Pipeline::find_analyze_save());
        assert_eq!(pipeline.steps.len(), 5);
    }

    #[test]
    fn test_select_analysis_and_generation() {
        let pipeline = OrchestrationHandler::select("анализ и генерация текста");
        assert_eq!(pipeline.steps.len(), 3);
        assert!(pipeline.render().starts_with("Models processed the data in sequence: "));
    }

    #[test]
    fn test_select_sequential() {
        let rendered = OrchestrationHandler::select("последовательная обработка").render();
        assert_eq!(
            rendered,
            "Sequential processing finished. Step 1: LLM-1 processed the data; \
             Step 2: LLM-2 processed the data; Step 3: LLM-3 processed the data"
        );
    }

    #[test]
    fn test_select_coordination() {
        let rendered = OrchestrationHandler::select("координация моделей").render();
        assert!(rendered.starts_with("Model coordination finished: "));
        assert_eq!(rendered.matches(" | ").count(), 4);
    }

    #[test]
    fn test_select_general() {
        let rendered = OrchestrationHandler::select("llm pipeline").render();
        assert!(rendered.starts_with("Orchestrator initialized the pipeline."));
        assert!(rendered.ends_with("Orchestration finished successfully."));
    }

    #[test]
    fn test_steps_keep_order() {
        let rendered = Pipeline::find_analyze_save().render();
        let ocr = rendered.find("OCR").unwrap();
        let llm = rendered.find("LLM").unwrap();
        let save = rendered.find("Filesystem").unwrap();
        assert!(ocr < llm && llm < save);
    }

    #[tokio::test]
    async fn test_execute_succeeds_without_capabilities() {
        let result = OrchestrationHandler::new()
            .execute("Координация моделей", &CapabilityRegistry::new())
            .await
            .unwrap();
        assert!(result.success);
    }
}
