//! Sample-size filter (stage 2): absolute occurrence floor.

use serde_json::json;
use stackscope_core::errors::StageError;

use crate::bias::SignalCorrelation;
use crate::validation::context::StageContext;
use crate::validation::stage::{StageOutput, ValidationStage};
use crate::validation::types::{PipelineStageResult, StageId};

pub struct SampleSizeFilterStage;

impl ValidationStage for SampleSizeFilterStage {
    fn id(&self) -> StageId {
        StageId::SampleSizeFilter
    }

    fn description(&self) -> &'static str {
        "Drops signals seen on fewer than max(sample_size_floor, min_occurrences) sites"
    }

    fn run(
        &self,
        items: Vec<SignalCorrelation>,
        ctx: &StageContext<'_>,
    ) -> Result<StageOutput, StageError> {
        let floor = (ctx.config.validation.effective_sample_size_floor() as usize)
            .max(ctx.min_occurrences());

        let processed = items.len();
        let (kept, dropped): (Vec<_>, Vec<_>) = items
            .into_iter()
            .partition(|item| item.occurrences >= floor);
        for item in &dropped {
            ctx.trace_item(self.id(), &item.signal, "below sample floor");
        }

        let mut warnings = Vec::new();
        if processed > 0 && kept.is_empty() {
            warnings.push(format!(
                "All {processed} signals fall below the sample-size floor of {floor} sites"
            ));
        }

        let result = PipelineStageResult::warn(
            self.id(),
            format!("{} of {processed} signals meet the {floor}-site floor", kept.len()),
            warnings,
        )
        .with_counts(processed, dropped.len())
        .with_details(json!({
            "sample_size_floor": floor,
            "dropped": dropped.iter().map(|c| c.signal.as_str()).collect::<Vec<_>>(),
        }));

        Ok(StageOutput::new(kept, result))
    }
}
