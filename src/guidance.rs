//! Preventive guidance derived from a [`RiskAssessment`].
//!
//! All text lives in static tables; resolving guidance never fails and never
//! allocates strings beyond the section vectors.

use std::fmt;

use serde::Serialize;

use crate::encoder::Level;
use crate::risk::{BmiCategory, Disease, RiskAssessment, RiskLevel};

/// Stress tips kept in a bundle.
pub const MAX_STRESS_TIPS: usize = 5;
/// Items per high-priority disease section.
pub const MAX_HIGH_PRIORITY_ITEMS: usize = 5;
/// Items per preventive disease section.
pub const MAX_PREVENTIVE_ITEMS: usize = 4;
/// Quick tips returned by [`quick_tips`].
pub const MAX_QUICK_TIPS: usize = 5;

/// Informational-only notice attached to every bundle.
pub const DISCLAIMER: &str = "This is AI-generated guidance for INFORMATIONAL purposes only.\n\
It is NOT a medical diagnosis or treatment recommendation.\n\
Please consult healthcare professionals for proper diagnosis\n\
and treatment of any health conditions.";

/// Always-included wellness advice.
pub const GENERAL_WELLNESS_TIPS: [&str; 8] = [
    "Drink 8-10 glasses of water daily",
    "Eat a balanced diet with fruits and vegetables",
    "Get 7-9 hours of quality sleep",
    "Exercise for at least 30 minutes daily",
    "Practice stress management techniques",
    "Schedule regular health check-ups",
    "Avoid smoking and limit alcohol",
    "Maintain social connections",
];

const HIGH_RISK_ACTIONS: [&str; 2] = [
    "Schedule appointment with healthcare provider",
    "Start tracking relevant health metrics",
];

const BASE_ACTIONS: [&str; 3] = [
    "Begin implementing one new healthy habit this week",
    "Set achievable short-term health goals",
    "Create a support system for lifestyle changes",
];

/// Full stress management tip list for a level.
#[must_use]
pub fn stress_management_tips(level: Level) -> &'static [&'static str] {
    match level {
        Level::High => &[
            "Practice deep breathing exercises for 10 minutes daily",
            "Consider mindfulness meditation or yoga",
            "Establish a consistent sleep schedule",
            "Limit caffeine and alcohol intake",
            "Take regular breaks during work",
            "Engage in physical activities you enjoy",
            "Consider professional counseling or therapy",
            "Practice progressive muscle relaxation",
            "Maintain a stress journal to identify triggers",
            "Connect with supportive friends and family",
        ],
        Level::Medium => &[
            "Engage in regular physical exercise (30 minutes daily)",
            "Practice time management techniques",
            "Take short breaks during stressful tasks",
            "Maintain work-life balance",
            "Try relaxation techniques like deep breathing",
            "Ensure adequate sleep (7-8 hours)",
            "Limit exposure to stressful situations when possible",
        ],
        Level::Low => &[
            "Maintain your current healthy lifestyle",
            "Continue regular exercise routine",
            "Keep up good sleep habits",
            "Stay socially connected",
        ],
    }
}

/// Full recommendation list for a disease at a risk level.
#[must_use]
pub fn disease_guidance(disease: Disease, risk: RiskLevel) -> &'static [&'static str] {
    match (disease, risk) {
        (Disease::Diabetes, RiskLevel::High) => &[
            "Schedule a medical check-up and HbA1c test",
            "Monitor your blood glucose levels regularly",
            "Follow a low-glycemic diet (reduce refined sugars)",
            "Increase fiber intake (whole grains, vegetables)",
            "Engage in 150 minutes of moderate exercise weekly",
            "Maintain a healthy weight (BMI 18.5-24.9)",
            "Stay hydrated throughout the day",
        ],
        (Disease::Diabetes, RiskLevel::Medium) => &[
            "Reduce sugar and refined carbohydrate intake",
            "Include more vegetables and lean proteins",
            "Exercise regularly (at least 30 minutes daily)",
            "Monitor your weight and BMI",
            "Consider annual diabetes screening",
        ],
        (Disease::Diabetes, RiskLevel::Low) => &[
            "Maintain balanced diet with limited processed foods",
            "Stay physically active",
            "Monitor your health during annual check-ups",
        ],
        (Disease::BloodPressure, RiskLevel::High) => &[
            "Consult a doctor for blood pressure monitoring",
            "Reduce sodium intake (less than 2,300mg daily)",
            "Follow the DASH diet (fruits, vegetables, whole grains)",
            "Limit alcohol consumption",
            "Quit smoking if applicable",
            "Manage stress through relaxation techniques",
            "Exercise regularly (aerobic activities preferred)",
            "Maintain healthy weight",
        ],
        (Disease::BloodPressure, RiskLevel::Medium) => &[
            "Monitor blood pressure regularly at home",
            "Reduce salt in your diet",
            "Increase potassium-rich foods (bananas, spinach)",
            "Exercise 30 minutes most days of the week",
            "Manage stress effectively",
        ],
        (Disease::BloodPressure, RiskLevel::Low) => &[
            "Continue healthy eating habits",
            "Maintain regular physical activity",
            "Keep stress levels manageable",
        ],
        (Disease::Obesity, RiskLevel::High) => &[
            "Consult a healthcare provider or nutritionist",
            "Set realistic weight loss goals (1-2 pounds per week)",
            "Create a balanced meal plan with portion control",
            "Engage in regular physical activity (start gradually)",
            "Keep a food diary to track eating patterns",
            "Avoid crash diets and focus on sustainable changes",
            "Get adequate sleep (7-9 hours)",
            "Address emotional eating patterns",
        ],
        (Disease::Obesity, RiskLevel::Medium) => &[
            "Increase physical activity levels gradually",
            "Practice mindful eating and portion control",
            "Choose whole foods over processed options",
            "Reduce sugary drinks and snacks",
            "Find enjoyable forms of exercise",
        ],
        (Disease::Obesity, RiskLevel::Low) => &[
            "Maintain current healthy weight",
            "Continue balanced diet and exercise routine",
            "Monitor weight periodically",
        ],
        (Disease::Cardiovascular, RiskLevel::High) => &[
            "Schedule comprehensive cardiac evaluation",
            "Adopt heart-healthy diet (Mediterranean diet)",
            "Quit smoking immediately if applicable",
            "Exercise regularly (after medical clearance)",
            "Manage blood pressure and cholesterol",
            "Reduce saturated and trans fats",
            "Increase omega-3 fatty acids (fish, nuts)",
            "Maintain healthy weight",
            "Manage stress and get quality sleep",
        ],
        (Disease::Cardiovascular, RiskLevel::Medium) => &[
            "Include heart-healthy foods in diet",
            "Exercise moderately 150 minutes per week",
            "Reduce red meat consumption",
            "Monitor cholesterol levels annually",
            "Manage stress effectively",
        ],
        (Disease::Cardiovascular, RiskLevel::Low) => &[
            "Continue heart-healthy lifestyle",
            "Stay physically active",
            "Maintain healthy diet",
        ],
        (Disease::SleepDisorder, RiskLevel::High) => &[
            "Consult a sleep specialist for evaluation",
            "Establish consistent sleep-wake schedule",
            "Create optimal sleep environment (dark, quiet, cool)",
            "Avoid screens 1-2 hours before bedtime",
            "Limit caffeine after 2 PM",
            "Avoid large meals close to bedtime",
            "Practice relaxation techniques before sleep",
            "Consider cognitive behavioral therapy for insomnia",
            "Limit daytime napping",
        ],
        (Disease::SleepDisorder, RiskLevel::Medium) => &[
            "Improve sleep hygiene practices",
            "Maintain regular sleep schedule",
            "Create relaxing bedtime routine",
            "Limit screen time before bed",
            "Ensure bedroom is comfortable for sleep",
        ],
        (Disease::SleepDisorder, RiskLevel::Low) => &[
            "Maintain good sleep habits",
            "Keep consistent sleep schedule",
            "Practice relaxation before bed",
        ],
    }
}

/// Recommendations for one disease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseSection {
    /// Disease
    pub disease: Disease,
    /// Risk that selected this section
    pub risk: RiskLevel,
    /// Capped recommendation list
    pub recommendations: Vec<&'static str>,
}

/// Everything shown to the user for one assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuidanceBundle {
    /// Stress level the tips were chosen for
    pub stress_level: Level,
    /// At most [`MAX_STRESS_TIPS`] stress tips
    pub stress_tips: Vec<&'static str>,
    /// One section per high-risk disease
    pub high_priority: Vec<DiseaseSection>,
    /// One section per medium-risk disease
    pub preventive: Vec<DiseaseSection>,
    /// [`GENERAL_WELLNESS_TIPS`]
    pub wellness_tips: Vec<&'static str>,
    /// Immediate action items
    pub action_items: Vec<&'static str>,
    /// [`DISCLAIMER`]
    pub disclaimer: &'static str,
}

impl GuidanceBundle {
    /// Whether any disease section is present.
    #[must_use]
    pub fn has_disease_sections(&self) -> bool {
        !self.high_priority.is_empty() || !self.preventive.is_empty()
    }
}

fn section(disease: Disease, risk: RiskLevel, cap: usize) -> DiseaseSection {
    DiseaseSection {
        disease,
        risk,
        recommendations: disease_guidance(disease, risk).iter().take(cap).copied().collect(),
    }
}

/// Resolves guidance for an assessment.
#[must_use]
pub fn guide(assessment: &RiskAssessment) -> GuidanceBundle {
    let mut high_priority = Vec::new();
    let mut preventive = Vec::new();
    for (disease, risk) in assessment.risks() {
        match risk {
            RiskLevel::High => high_priority.push(section(disease, risk, MAX_HIGH_PRIORITY_ITEMS)),
            RiskLevel::Medium => preventive.push(section(disease, risk, MAX_PREVENTIVE_ITEMS)),
            RiskLevel::Low => {}
        }
    }

    let mut action_items = Vec::with_capacity(HIGH_RISK_ACTIONS.len() + BASE_ACTIONS.len());
    if !high_priority.is_empty() {
        action_items.extend(HIGH_RISK_ACTIONS);
    }
    action_items.extend(BASE_ACTIONS);

    GuidanceBundle {
        stress_level: assessment.overall_stress,
        stress_tips: stress_management_tips(assessment.overall_stress)
            .iter()
            .take(MAX_STRESS_TIPS)
            .copied()
            .collect(),
        high_priority,
        preventive,
        wellness_tips: GENERAL_WELLNESS_TIPS.to_vec(),
        action_items,
        disclaimer: DISCLAIMER,
    }
}

/// A handful of immediately actionable tips, most urgent first.
#[must_use]
pub fn quick_tips(assessment: &RiskAssessment) -> Vec<&'static str> {
    let mut tips = Vec::with_capacity(MAX_QUICK_TIPS);
    if assessment.overall_stress == Level::High {
        tips.push("Start with 5-minute breathing exercises today");
    }
    if matches!(
        assessment.bmi_category,
        BmiCategory::Overweight | BmiCategory::Obese
    ) {
        tips.push("Add one extra serving of vegetables to your meals");
    }
    if assessment.sleep_disorder_risk == RiskLevel::High {
        tips.push("Set a consistent bedtime starting tonight");
    }
    if assessment.cardiovascular_risk == RiskLevel::High {
        tips.push("Take a 10-minute walk after meals");
    }
    tips.push("Drink a glass of water first thing in the morning");
    tips.truncate(MAX_QUICK_TIPS);
    tips
}

impl fmt::Display for GuidanceBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        let thin = "-".repeat(60);

        writeln!(f, "\n{rule}\n🌟 PERSONALIZED HEALTH GUIDANCE\n{rule}\n")?;
        writeln!(f, "⚠️  MEDICAL DISCLAIMER:\n{thin}\n{}\n{thin}\n", self.disclaimer)?;

        writeln!(f, "🧠 STRESS MANAGEMENT RECOMMENDATIONS:\n{thin}")?;
        for (i, tip) in self.stress_tips.iter().enumerate() {
            writeln!(f, "{}. {tip}", i + 1)?;
        }
        writeln!(f)?;

        for (heading, sections) in [
            ("🚨 HIGH PRIORITY RECOMMENDATIONS:", &self.high_priority),
            ("⚡ PREVENTIVE CARE RECOMMENDATIONS:", &self.preventive),
        ] {
            if sections.is_empty() {
                continue;
            }
            writeln!(f, "{heading}\n{thin}")?;
            for s in sections {
                writeln!(f, "\n📍 {}:", s.disease.title())?;
                for (i, rec) in s.recommendations.iter().enumerate() {
                    writeln!(f, "   {}. {rec}", i + 1)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "💪 GENERAL WELLNESS TIPS:\n{thin}")?;
        for (i, tip) in self.wellness_tips.iter().enumerate() {
            writeln!(f, "{}. {tip}", i + 1)?;
        }
        writeln!(f)?;

        writeln!(f, "✅ IMMEDIATE ACTION ITEMS:\n{thin}")?;
        for item in &self.action_items {
            writeln!(f, "• {item}")?;
        }
        writeln!(f)?;

        writeln!(f, "{rule}")?;
        writeln!(f, "Remember: Small, consistent changes lead to big results!")?;
        writeln!(f, "Take it one step at a time. 🌱")?;
        writeln!(f, "{rule}")
    }
}
