//! AI-likelihood gauge

/// Likelihood tier for a detection score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Moderate,
    High,
}

impl Tier {
    /// `> 65` is high, `> 35` moderate, anything else low.
    pub fn from_score(score: f64) -> Self {
        let score = clamp_score(score);
        if score > 65.0 {
            Tier::High
        } else if score > 35.0 {
            Tier::Moderate
        } else {
            Tier::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Low => "Low AI Likelihood",
            Tier::Moderate => "Moderate AI Likelihood",
            Tier::High => "High AI Likelihood",
        }
    }

    /// CSS color variable for the gauge ring
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Low => "var(--green)",
            Tier::Moderate => "var(--yellow)",
            Tier::High => "var(--red)",
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Whole percent shown inside the gauge.
pub fn display_percent(score: f64) -> u32 {
    clamp_score(score).round() as u32
}

/// The tier is taken from the shown percent so the label always agrees
/// with the number next to it.
pub fn render_gauge(score: f64) -> String {
    let percent = display_percent(score);
    let tier = Tier::from_score(f64::from(percent));
    format!(
        r#"<div class="ai-score-container"><div class="ai-score-circle" style="--score-color: {color}; --score-percent: {percent}"><span>{percent}%</span></div><p class="ai-score-text">{label}</p></div>"#,
        color = tier.color(),
        percent = percent,
        label = tier.label(),
    )
}
