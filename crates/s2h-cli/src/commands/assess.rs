//! `s2h assess`: run the risk rules for a known stress level.

use serde::Serialize;
use stress2health::encoder::{validate_bmi, validate_sleep_hours, Level};
use stress2health::guidance::{guide, quick_tips, GuidanceBundle};
use stress2health::risk::{comprehensive_assessment, RiskAssessment};

use crate::error::Result;
use crate::output;

#[derive(Serialize)]
struct AssessOutput {
    assessment: RiskAssessment,
    guidance: GuidanceBundle,
    quick_tips: Vec<&'static str>,
}

pub(crate) fn run(stress: Level, bmi: f32, activity: Level, sleep: f32, json: bool) -> Result<()> {
    let bmi = validate_bmi(bmi)?;
    let sleep = validate_sleep_hours(sleep)?;

    let assessment = comprehensive_assessment(stress, bmi, activity, sleep);
    let result = AssessOutput {
        guidance: guide(&assessment),
        quick_tips: quick_tips(&assessment),
        assessment,
    };
    if json {
        return output::json(&result);
    }

    output::section("Risks");
    for (disease, risk) in result.assessment.risks() {
        output::kv(disease.title(), output::level(risk.as_str()));
    }
    print!("{}", result.assessment.risk_summary());
    print!("{}", result.guidance);
    Ok(())
}
