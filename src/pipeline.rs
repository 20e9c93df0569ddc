//! End-to-end health analysis.
//!
//! [`HealthPipeline`] shares one fitted [`StressClassifier`] behind an
//! [`Arc`], so clones are cheap and may be used from several threads.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::TrainingConfig;
use crate::encoder::{Level, LifestyleSample};
use crate::error::Result;
use crate::guidance::{guide, quick_tips, GuidanceBundle};
use crate::risk::{comprehensive_assessment, RiskAssessment};
use crate::stress::StressClassifier;
use crate::text::{self, TextStressSignal};

/// Everything produced for one user.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Classifier output
    pub stress_level: Level,
    /// Probability per class label
    pub probabilities: BTreeMap<String, f32>,
    /// Disease risks for `stress_level`
    pub assessment: RiskAssessment,
    /// Guidance for `assessment`
    pub guidance: GuidanceBundle,
    /// Short list of immediate tips
    pub quick_tips: Vec<&'static str>,
    /// Keyword signal from mood text, when given
    pub text_signal: Option<TextStressSignal>,
}

/// Stress classification followed by risk scoring and guidance.
#[derive(Debug, Clone)]
pub struct HealthPipeline {
    classifier: Arc<StressClassifier>,
}

impl HealthPipeline {
    /// Wraps a fitted classifier.
    #[must_use]
    pub fn new(classifier: StressClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// Shares an already wrapped classifier.
    #[must_use]
    pub fn from_shared(classifier: Arc<StressClassifier>) -> Self {
        Self { classifier }
    }

    /// Loads the classifier bundle in `dir`.
    ///
    /// # Errors
    ///
    /// As [`StressClassifier::load`].
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(StressClassifier::load(dir, TrainingConfig::default())?))
    }

    /// The shared classifier.
    #[must_use]
    pub fn classifier(&self) -> &Arc<StressClassifier> {
        &self.classifier
    }

    /// Stress level for a sample.
    ///
    /// # Errors
    ///
    /// As [`StressClassifier::predict`].
    pub fn predict_stress(&self, sample: &LifestyleSample) -> Result<Level> {
        self.classifier.predict(sample)
    }

    /// Disease risks. Pure and infallible.
    #[must_use]
    pub fn assess(
        &self,
        stress: Level,
        bmi: f32,
        physical_activity: Level,
        sleep_hours: f32,
    ) -> RiskAssessment {
        comprehensive_assessment(stress, bmi, physical_activity, sleep_hours)
    }

    /// Guidance for an assessment. Pure and infallible.
    #[must_use]
    pub fn guide(&self, assessment: &RiskAssessment) -> GuidanceBundle {
        guide(assessment)
    }

    /// Runs the whole chain, optionally scoring free-text mood alongside.
    ///
    /// # Errors
    ///
    /// As [`StressClassifier::predict`].
    pub fn analyze(&self, sample: &LifestyleSample, mood_text: Option<&str>) -> Result<HealthReport> {
        let stress_level = self.predict_stress(sample)?;
        let probabilities = self.classifier.predict_proba(sample)?;
        let assessment = self.assess(
            stress_level,
            sample.bmi(),
            sample.physical_activity(),
            sample.sleep_hours(),
        );
        let text_signal = mood_text.map(text::analyze);
        if let Some(signal) = &text_signal {
            if signal.level != stress_level {
                tracing::debug!(
                    classifier = %stress_level,
                    text = %signal.level,
                    "text signal disagrees with classifier"
                );
            }
        }

        Ok(HealthReport {
            stress_level,
            probabilities,
            guidance: self.guide(&assessment),
            quick_tips: quick_tips(&assessment),
            assessment,
            text_signal,
        })
    }
}
