//! Recommendation generation (stage 7): bucket each survivor into a tier.

use serde_json::json;
use stackscope_core::errors::StageError;

use crate::bias::{classify_recommendation, SignalCorrelation};
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

pub struct RecommendationStage;

impl ValidationStage for RecommendationStage {
    fn id(&self) -> StageId {
        StageId::RecommendationGeneration
    }

    fn description(&self) -> &'static str {
        "Assigns high/medium/low recommendation tiers"
    }

    fn run(
        &self,
        mut items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let mut tiers = [0usize; 3];
        for item in &mut items {
            let top_share = item
                .top_platform
                .as_ref()
                .map(|label| ctx.baseline.share(label))
                .unwrap_or(0.0);
            item.recommendation = classify_recommendation(item, top_share, &ctx.config.bias);
            tiers[item.recommendation as usize] += 1;
            ctx.trace_item(self.id(), &item.signal, item.recommendation.name());
        }

        let [low, medium, high] = tiers;
        let result = PipelineStageResult::pass(
            self.id(),
            format!("{high} high, {medium} medium, {low} low"),
        )
        .with_counts(items.len(), 0)
        .with_details(json!({
            "high": high,
            "medium": medium,
            "low": low,
        }));

        Ok(StageOutput::new(items, result))
    }
}
