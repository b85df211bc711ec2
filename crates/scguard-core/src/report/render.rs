use crate::TOOL_NAME;
use crate::report::model::Report;

pub fn render_text(report: &Report) -> String {
    let enforcement = &report.enforcement;
    let mut out = String::new();

    out.push_str(&format!("{} {}\n", TOOL_NAME, report.tool.version));
    if let Some(path) = &report.input.path {
        out.push_str(&format!("Input: {path}\n"));
    }
    out.push_str(&format!("Decision: {}\n", enforcement.decision));
    out.push_str(&format!(
        "Risk score: {:.2}/10 ({})\n",
        enforcement.risk_score, enforcement.risk_category
    ));
    out.push_str(&format!("Confidence: {:.2}\n", report.risk.confidence));

    if enforcement.detected_vulnerabilities.is_empty() {
        out.push_str("Detected vulnerabilities: none\n");
    } else {
        out.push_str("Detected vulnerabilities:\n");
        for category in &enforcement.detected_vulnerabilities {
            out.push_str(&format!(
                "  - {} ({:.0}%)\n",
                category,
                report.risk.probabilities.get(*category) * 100.0
            ));
        }
    }

    if !report.risk.top_risk_factors.is_empty() {
        out.push_str("Top risk factors:\n");
        for factor in &report.risk.top_risk_factors {
            out.push_str(&format!("  - {factor}\n"));
        }
    }

    out.push_str(&format!("Justification: {}\n", enforcement.justification));

    out.push_str("Recommendations:\n");
    for (i, rec) in enforcement.recommendations.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, rec));
    }

    if !report.analysis.is_ok() {
        out.push_str(&format!("Analysis: {}\n", report.analysis.status));
        for warning in &report.analysis.warnings {
            out.push_str(&format!("  ! {warning}\n"));
        }
    }

    out
}
