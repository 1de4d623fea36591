//! Summarizer
//!
//! Renders the model outputs as a short narrative. Tones only change the
//! wording; which lines appear is decided by per-tone score gates:
//!
//! | tone     | alpha line     | viral line     |
//! |----------|----------------|----------------|
//! | clinical | score > 0.4    | score > 0.4    |
//! | vermin   | score > 0.6    | score > 0.5    |
//!
//! The threat line is always present and the disclaimer is always last.

use crate::models::types::{AlphaResult, Network, ThreatResult, Tone, ViralResult};
use crate::utils::constants::{
    CLINICAL_ALPHA_GATE, CLINICAL_VIRAL_GATE, DISCLAIMER, VERMIN_ALPHA_GATE, VERMIN_VIRAL_GATE,
};

/// Everything a summary is rendered from
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub address: &'a str,
    pub network: Network,
    pub threat: &'a ThreatResult,
    pub alpha: &'a AlphaResult,
    pub viral: &'a ViralResult,
}

/// Score above which a tone shows the alpha line
pub fn alpha_gate(tone: Tone) -> f64 {
    match tone {
        Tone::Clinical => CLINICAL_ALPHA_GATE,
        Tone::Vermin => VERMIN_ALPHA_GATE,
    }
}

/// Score above which a tone shows the viral line
pub fn viral_gate(tone: Tone) -> f64 {
    match tone {
        Tone::Clinical => CLINICAL_VIRAL_GATE,
        Tone::Vermin => VERMIN_VIRAL_GATE,
    }
}

pub fn summarize(tone: Tone, input: &SummaryInput<'_>) -> String {
    let mut lines = Vec::with_capacity(5);
    lines.push(header(tone, input));
    lines.push(threat_line(tone, input.threat));
    if input.alpha.alpha_score > alpha_gate(tone) {
        lines.push(alpha_line(tone, input.alpha));
    }
    if input.viral.viral_score > viral_gate(tone) {
        lines.push(viral_line(tone, input.viral));
    }
    lines.push(DISCLAIMER.to_string());
    lines.join("\n")
}

fn header(tone: Tone, input: &SummaryInput<'_>) -> String {
    match tone {
        Tone::Clinical => format!("Scan report for {} on {}.", input.address, input.network),
        Tone::Vermin => format!(
            "🐀 The swarm sniffed out {} on {}.",
            input.address, input.network
        ),
    }
}

fn threat_line(tone: Tone, threat: &ThreatResult) -> String {
    let findings = if threat.indicators.is_empty() {
        String::new()
    } else {
        format!(" Indicators: {}.", threat.indicators.join("; "))
    };
    match tone {
        Tone::Clinical => format!(
            "Threat score {:.2} (confidence {:.0}%).{}",
            threat.threat_score,
            threat.confidence * 100.0,
            findings
        ),
        Tone::Vermin => format!(
            "☣️ Rot level {:.2}, and we're {:.0}% sure of the stench.{}",
            threat.threat_score,
            threat.confidence * 100.0,
            findings
        ),
    }
}

fn alpha_line(tone: Tone, alpha: &AlphaResult) -> String {
    match tone {
        Tone::Clinical => format!(
            "Opportunity score {:.2} with an estimated {:.1}x potential multiplier.",
            alpha.alpha_score, alpha.potential_multiplier
        ),
        Tone::Vermin => format!(
            "🧀 Cheese spotted: alpha {:.2}, the pile could grow {:.1}x.",
            alpha.alpha_score, alpha.potential_multiplier
        ),
    }
}

fn viral_line(tone: Tone, viral: &ViralResult) -> String {
    match tone {
        Tone::Clinical => format!(
            "Viral potential {:.2}, estimated {:.0}h until breakout.",
            viral.viral_score, viral.time_to_viral_hrs
        ),
        Tone::Vermin => format!(
            "📣 The colony is squeaking: viral {:.2}, spreading in ~{:.0}h.",
            viral.viral_score, viral.time_to_viral_hrs
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "So11111111111111111111111111111111111111112";

    fn results(alpha_score: f64, viral_score: f64) -> (ThreatResult, AlphaResult, ViralResult) {
        (
            ThreatResult {
                threat_score: 0.6,
                confidence: 0.55,
                indicators: vec!["Recently deployed contract".to_string()],
            },
            AlphaResult {
                alpha_score,
                potential_multiplier: 3.0,
                confidence: 0.4,
                catalysts: vec![],
            },
            ViralResult {
                viral_score,
                time_to_viral_hrs: 24.0,
                confidence: 0.2,
                signals: vec![],
            },
        )
    }

    fn render(tone: Tone, alpha_score: f64, viral_score: f64) -> String {
        let (threat, alpha, viral) = results(alpha_score, viral_score);
        summarize(
            tone,
            &SummaryInput {
                address: ADDR,
                network: Network::Solana,
                threat: &threat,
                alpha: &alpha,
                viral: &viral,
            },
        )
    }

    #[test]
    fn test_clinical_always_has_threat_and_disclaimer() {
        let text = render(Tone::Clinical, 0.0, 0.0);
        assert!(text.contains("Threat score 0.60 (confidence 55%)"));
        assert!(text.contains("Recently deployed contract"));
        assert!(text.ends_with(DISCLAIMER));
        assert!(!text.contains("Opportunity"));
        assert!(!text.contains("Viral"));
    }

    #[test]
    fn test_clinical_gates() {
        assert!(!render(Tone::Clinical, 0.4, 0.4).contains("Opportunity"));
        assert!(!render(Tone::Clinical, 0.4, 0.4).contains("Viral potential"));
        assert!(render(Tone::Clinical, 0.45, 0.0).contains("Opportunity score 0.45"));
        assert!(render(Tone::Clinical, 0.0, 0.45).contains("Viral potential 0.45"));
    }

    #[test]
    fn test_vermin_gates() {
        // 0.5 clears the clinical alpha gate but not the vermin one
        assert!(!render(Tone::Vermin, 0.5, 0.0).contains("Cheese"));
        assert!(render(Tone::Vermin, 0.65, 0.0).contains("Cheese"));
        assert!(!render(Tone::Vermin, 0.0, 0.5).contains("colony"));
        assert!(render(Tone::Vermin, 0.0, 0.55).contains("colony"));
    }

    #[test]
    fn test_vermin_wording() {
        let text = render(Tone::Vermin, 0.0, 0.0);
        assert!(text.starts_with("🐀"));
        assert!(text.contains("Rot level 0.60"));
        assert_eq!(text.lines().last(), Some(DISCLAIMER));
    }
}
