//! `s2h predict`: classify one lifestyle profile with a saved bundle.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use stress2health::dataset::DEFAULT_BMI;
use stress2health::encoder::{Level, LifestyleSample};
use stress2health::pipeline::HealthPipeline;
use stress2health::text::{self, TextStressSignal};

use super::require_exists;
use crate::error::Result;
use crate::output;

/// Options for `s2h predict`.
pub(crate) struct PredictArgs<'a> {
    pub bundle: &'a Path,
    pub sleep: f32,
    pub activity: Level,
    pub work: f32,
    pub social: Level,
    pub bmi: Option<f32>,
    pub mood: Option<&'a str>,
}

#[derive(Serialize)]
struct StressOnly {
    stress_level: Level,
    probabilities: BTreeMap<String, f32>,
    text_signal: Option<TextStressSignal>,
}

pub(crate) fn run(args: &PredictArgs<'_>, json: bool) -> Result<()> {
    require_exists(args.bundle)?;
    let sample = LifestyleSample::new(
        args.sleep,
        args.bmi.unwrap_or(DEFAULT_BMI),
        args.activity,
        args.work,
        args.social,
    )?;
    let pipeline = HealthPipeline::load(args.bundle)?;

    if args.bmi.is_some() {
        let report = pipeline.analyze(&sample, args.mood)?;
        if json {
            return output::json(&report);
        }
        print_stress(report.stress_level, &report.probabilities, report.text_signal.as_ref());
        print!("{}", report.assessment.risk_summary());
        print!("{}", report.guidance);
        output::section("Quick Tips");
        for (i, tip) in report.quick_tips.iter().enumerate() {
            println!("  {}. {tip}", i + 1);
        }
        return Ok(());
    }

    let result = StressOnly {
        stress_level: pipeline.predict_stress(&sample)?,
        probabilities: pipeline.classifier().predict_proba(&sample)?,
        text_signal: args.mood.map(text::analyze),
    };
    if json {
        return output::json(&result);
    }
    print_stress(
        result.stress_level,
        &result.probabilities,
        result.text_signal.as_ref(),
    );
    output::warning("pass --bmi to include disease risks and guidance");
    Ok(())
}

fn print_stress(level: Level, proba: &BTreeMap<String, f32>, signal: Option<&TextStressSignal>) {
    output::section("Stress");
    output::kv("Predicted level", output::level(level.as_str()));
    for (label, p) in proba {
        output::kv(&format!("P({label})"), format!("{p:.3}"));
    }
    if let Some(signal) = signal {
        output::kv("Mood text level", output::level(signal.level.as_str()));
        output::kv(
            "Mood keywords",
            format!(
                "{} stressed / {} calm",
                signal.high_stress_keywords, signal.low_stress_keywords
            ),
        );
    }
}
