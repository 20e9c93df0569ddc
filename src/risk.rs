//! Rule-based disease risk scoring.
//!
//! Each scorer adds weighted points for stress, BMI, activity and sleep and
//! maps the total onto a [`RiskLevel`] through two thresholds. Scores stay
//! internal; only the level is reported. All functions are pure.
//!
//! # Example
//!
//! ```
//! use stress2health::encoder::Level;
//! use stress2health::risk::{comprehensive_assessment, BmiCategory, RiskLevel};
//!
//! let a = comprehensive_assessment(Level::High, 31.5, Level::Low, 4.5);
//! assert_eq!(a.bmi_category, BmiCategory::Obese);
//! assert!(a.risks().iter().all(|(_, level)| *level == RiskLevel::High));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoder::Level;

/// Categorical risk level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Moderate risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// `high` at or above `high`, `medium` at or above `medium`, else `low`.
    fn from_score(score: u32, high: u32, medium: u32) -> Self {
        if score >= high {
            RiskLevel::High
        } else if score >= medium {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diseases covered by the risk engine, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    /// Type 2 diabetes
    Diabetes,
    /// High blood pressure
    BloodPressure,
    /// Obesity
    Obesity,
    /// Cardiovascular disease
    Cardiovascular,
    /// Sleep disorders
    SleepDisorder,
}

impl Disease {
    /// Every disease in reporting order.
    pub const ALL: [Disease; 5] = [
        Disease::Diabetes,
        Disease::BloodPressure,
        Disease::Obesity,
        Disease::Cardiovascular,
        Disease::SleepDisorder,
    ];

    /// snake_case key.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::BloodPressure => "blood_pressure",
            Disease::Obesity => "obesity",
            Disease::Cardiovascular => "cardiovascular",
            Disease::SleepDisorder => "sleep_disorder",
        }
    }

    /// Title-case display name.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Disease::Diabetes => "Diabetes",
            Disease::BloodPressure => "Blood Pressure",
            Disease::Obesity => "Obesity",
            Disease::Cardiovascular => "Cardiovascular",
            Disease::SleepDisorder => "Sleep Disorder",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// WHO BMI band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiCategory {
    /// Below 18.5
    Underweight,
    /// 18.5 up to 25
    Normal,
    /// 25 up to 30
    Overweight,
    /// 30 and above
    Obese,
}

impl BmiCategory {
    /// Lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "underweight",
            BmiCategory::Normal => "normal",
            BmiCategory::Overweight => "overweight",
            BmiCategory::Obese => "obese",
        }
    }

    /// Title-case name.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Band for `bmi`; lower bounds are inclusive. NaN falls back to
/// [`BmiCategory::Normal`].
#[must_use]
pub fn bmi_category(bmi: f32) -> BmiCategory {
    const BANDS: [(BmiCategory, f32, f32); 4] = [
        (BmiCategory::Underweight, 0.0, 18.5),
        (BmiCategory::Normal, 18.5, 25.0),
        (BmiCategory::Overweight, 25.0, 30.0),
        (BmiCategory::Obese, 30.0, f32::INFINITY),
    ];
    BANDS
        .iter()
        .find(|(_, lo, hi)| *lo <= bmi && bmi < *hi)
        .map_or(BmiCategory::Normal, |(cat, _, _)| *cat)
}

/// Points for a stress or activity level, given what `high`/`medium`
/// (stress) or `low`/`medium` (activity) contribute.
fn points(level: Level, worst: Level, worst_pts: u32, medium_pts: u32) -> u32 {
    if level == worst {
        worst_pts
    } else if level == Level::Medium {
        medium_pts
    } else {
        0
    }
}

/// Diabetes risk.
#[must_use]
pub fn assess_diabetes_risk(
    stress: Level,
    bmi: f32,
    physical_activity: Level,
    sleep_hours: f32,
) -> RiskLevel {
    let mut score = 0;
    if bmi >= 30.0 {
        score += 3;
    } else if bmi >= 25.0 {
        score += 2;
    } else if bmi < 18.5 {
        score += 1;
    }
    score += points(stress, Level::High, 2, 1);
    score += points(physical_activity, Level::Low, 2, 1);
    if sleep_hours < 6.0 || sleep_hours > 9.0 {
        score += 1;
    }
    RiskLevel::from_score(score, 6, 3)
}

/// High blood pressure risk. Stress weighs most.
#[must_use]
pub fn assess_blood_pressure_risk(
    stress: Level,
    bmi: f32,
    physical_activity: Level,
    sleep_hours: f32,
) -> RiskLevel {
    let mut score = points(stress, Level::High, 3, 2);
    if bmi >= 30.0 {
        score += 2;
    } else if bmi >= 25.0 {
        score += 1;
    }
    score += points(physical_activity, Level::Low, 2, 1);
    if sleep_hours < 6.0 {
        score += 2;
    } else if sleep_hours < 7.0 {
        score += 1;
    }
    RiskLevel::from_score(score, 6, 3)
}

/// Obesity risk. A BMI of 30 or more is high outright.
#[must_use]
pub fn assess_obesity_risk(
    stress: Level,
    bmi: f32,
    physical_activity: Level,
    sleep_hours: f32,
) -> RiskLevel {
    if bmi >= 30.0 {
        return RiskLevel::High;
    }
    let mut score = 0;
    if bmi >= 27.0 {
        score += 3;
    } else if bmi >= 25.0 {
        score += 2;
    }
    score += points(physical_activity, Level::Low, 2, 1);
    score += points(stress, Level::High, 2, 1);
    if sleep_hours < 6.0 || sleep_hours > 9.0 {
        score += 1;
    }
    RiskLevel::from_score(score, 5, 3)
}

/// Cardiovascular disease risk.
#[must_use]
pub fn assess_cardiovascular_risk(
    stress: Level,
    bmi: f32,
    physical_activity: Level,
    sleep_hours: f32,
) -> RiskLevel {
    let mut score = points(stress, Level::High, 3, 1);
    if bmi >= 30.0 {
        score += 3;
    } else if bmi >= 25.0 {
        score += 2;
    }
    score += points(physical_activity, Level::Low, 3, 1);
    if sleep_hours < 6.0 {
        score += 2;
    }
    RiskLevel::from_score(score, 7, 4)
}

/// Sleep disorder risk from stress and sleep alone.
#[must_use]
pub fn assess_sleep_disorder_risk(stress: Level, sleep_hours: f32) -> RiskLevel {
    let mut score = 0;
    if sleep_hours < 5.0 {
        score += 3;
    } else if sleep_hours < 6.0 {
        score += 2;
    } else if sleep_hours < 7.0 || sleep_hours > 9.0 {
        score += 1;
    }
    score += points(stress, Level::High, 3, 2);
    RiskLevel::from_score(score, 4, 2)
}

/// Risk levels for every disease plus the context they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Diabetes
    pub diabetes_risk: RiskLevel,
    /// High blood pressure
    pub blood_pressure_risk: RiskLevel,
    /// Obesity
    pub obesity_risk: RiskLevel,
    /// Cardiovascular disease
    pub cardiovascular_risk: RiskLevel,
    /// Sleep disorders
    pub sleep_disorder_risk: RiskLevel,
    /// BMI band
    pub bmi_category: BmiCategory,
    /// Stress level the assessment was made for
    pub overall_stress: Level,
}

impl RiskAssessment {
    /// Risk for one disease.
    #[must_use]
    pub fn risk(&self, disease: Disease) -> RiskLevel {
        match disease {
            Disease::Diabetes => self.diabetes_risk,
            Disease::BloodPressure => self.blood_pressure_risk,
            Disease::Obesity => self.obesity_risk,
            Disease::Cardiovascular => self.cardiovascular_risk,
            Disease::SleepDisorder => self.sleep_disorder_risk,
        }
    }

    /// Every disease with its risk, in reporting order.
    #[must_use]
    pub fn risks(&self) -> [(Disease, RiskLevel); 5] {
        Disease::ALL.map(|d| (d, self.risk(d)))
    }

    fn at_level(&self, level: RiskLevel) -> Vec<Disease> {
        Disease::ALL
            .into_iter()
            .filter(|&d| self.risk(d) == level)
            .collect()
    }

    /// Diseases at high risk.
    #[must_use]
    pub fn high_risks(&self) -> Vec<Disease> {
        self.at_level(RiskLevel::High)
    }

    /// Diseases at medium risk.
    #[must_use]
    pub fn medium_risks(&self) -> Vec<Disease> {
        self.at_level(RiskLevel::Medium)
    }

    /// Whether any disease is at high risk.
    #[must_use]
    pub fn has_high_risk(&self) -> bool {
        Disease::ALL.iter().any(|&d| self.risk(d) == RiskLevel::High)
    }

    /// Human-readable summary listing high and moderate risks.
    #[must_use]
    pub fn risk_summary(&self) -> String {
        use std::fmt::Write;

        let high = self.high_risks();
        let medium = self.medium_risks();
        let mut out = String::from("\n🏥 HEALTH RISK ASSESSMENT SUMMARY\n");
        out.push_str(&"=".repeat(50));
        out.push_str("\n\n");

        for (heading, diseases) in [
            ("⚠️  HIGH RISK CONDITIONS:", &high),
            ("⚡ MODERATE RISK CONDITIONS:", &medium),
        ] {
            if diseases.is_empty() {
                continue;
            }
            out.push_str(heading);
            out.push('\n');
            for d in diseases {
                let _ = writeln!(out, "   • {}", d.title());
            }
            out.push('\n');
        }
        if high.is_empty() && medium.is_empty() {
            out.push_str("✅ Good news! All risk levels are LOW.\n\n");
        }

        let _ = writeln!(out, "📊 BMI Category: {}", self.bmi_category.title());
        let _ = writeln!(out, "🧠 Stress Level: {}", title_case(self.overall_stress.as_str()));
        out
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Runs every scorer and records the BMI band and stress level.
#[must_use]
pub fn comprehensive_assessment(
    stress: Level,
    bmi: f32,
    physical_activity: Level,
    sleep_hours: f32,
) -> RiskAssessment {
    let assessment = RiskAssessment {
        diabetes_risk: assess_diabetes_risk(stress, bmi, physical_activity, sleep_hours),
        blood_pressure_risk: assess_blood_pressure_risk(stress, bmi, physical_activity, sleep_hours),
        obesity_risk: assess_obesity_risk(stress, bmi, physical_activity, sleep_hours),
        cardiovascular_risk: assess_cardiovascular_risk(stress, bmi, physical_activity, sleep_hours),
        sleep_disorder_risk: assess_sleep_disorder_risk(stress, sleep_hours),
        bmi_category: bmi_category(bmi),
        overall_stress: stress,
    };
    tracing::debug!(?assessment, "risk assessment");
    assessment
}
