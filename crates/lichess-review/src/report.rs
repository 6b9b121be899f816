//! Self-contained HTML error report.
//!
//! One document with no local assets: Chart.js from a CDN, board diagrams
//! as Lichess GIF exports, everything else inline.

use std::fmt::Write as _;
use std::path::Path;

use serde_json::json;

use error_analysis::types::{ErrorCategory, ErrorSeverity, GameError, GamePhase, PlayerSide};
use error_analysis::AnalysisResult;

use crate::error::ReviewError;

const CHART_JS_CDN: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/Chart.js/4.4.0/chart.umd.min.js";

const STYLES: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: #333; padding: 20px; line-height: 1.6; }
.container { max-width: 1400px; margin: 0 auto; background: white; border-radius: 20px; box-shadow: 0 20px 60px rgba(0,0,0,0.3); overflow: hidden; }
header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 40px; text-align: center; }
header h1 { font-size: 2.5em; margin-bottom: 10px; font-weight: 700; }
.subtitle { font-size: 1.2em; opacity: 0.95; }
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(250px, 1fr)); gap: 20px; padding: 40px; background: #f8f9fa; }
.summary-card { background: white; padding: 25px; border-radius: 15px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); text-align: center; }
.summary-card .number { font-size: 3em; font-weight: 700; color: #667eea; margin: 10px 0; }
.summary-card .label { font-size: 1em; color: #666; text-transform: uppercase; letter-spacing: 1px; }
.charts-section { padding: 40px; }
.charts-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(450px, 1fr)); gap: 30px; margin-top: 20px; }
.chart-container { background: white; padding: 30px; border-radius: 15px; box-shadow: 0 4px 15px rgba(0,0,0,0.1); }
.chart-container h3 { color: #667eea; margin-bottom: 20px; font-size: 1.3em; text-align: center; }
.chart-wrapper { position: relative; height: 300px; }
.stats-section { padding: 40px; background: #f8f9fa; }
.stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); gap: 20px; margin-top: 20px; }
.stat-card { background: white; padding: 20px; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
.stat-card h4 { color: #667eea; margin-bottom: 15px; font-size: 1.1em; }
.stat-item { display: flex; justify-content: space-between; padding: 10px 0; border-bottom: 1px solid #eee; }
.stat-item:last-child { border-bottom: none; }
.stat-label { font-weight: 500; color: #555; }
.stat-value { font-weight: 700; color: #667eea; }
.errors-table-section { padding: 40px; }
.error-card { background: white; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); margin-bottom: 20px; overflow: hidden; }
.error-header { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 15px 20px; display: flex; justify-content: space-between; align-items: center; flex-wrap: wrap; gap: 10px; }
.error-body { padding: 20px; display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; }
.error-info { display: flex; flex-direction: column; }
.error-info-label { font-size: 0.85em; color: #666; text-transform: uppercase; letter-spacing: 0.5px; margin-bottom: 5px; }
.error-info-value { font-weight: 600; color: #333; }
.board-diagrams { grid-column: 1 / -1; display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-top: 20px; padding-top: 20px; border-top: 2px solid #eee; }
.diagram-container { display: flex; flex-direction: column; align-items: center; background: #f8f9fa; padding: 15px; border-radius: 10px; }
.diagram-title { font-weight: 700; color: #667eea; margin-bottom: 10px; font-size: 1.1em; text-align: center; }
.board-gif { width: 100%; max-width: 400px; height: auto; border-radius: 8px; background: #fff; }
.move-notation { margin-top: 10px; font-family: 'Courier New', monospace; font-size: 0.95em; color: #555; text-align: center; }
.severity-badge { padding: 5px 15px; border-radius: 20px; font-weight: 600; font-size: 0.9em; }
.severity-BLUNDER { background: #ff4444; color: white; }
.severity-MISTAKE { background: #ff9800; color: white; }
.severity-INACCURACY { background: #ffc107; color: #333; }
section h2 { color: #667eea; margin-bottom: 20px; font-size: 1.8em; }
@media (max-width: 768px) { .charts-grid, .summary, .board-diagrams { grid-template-columns: 1fr; } }
"#;

/// Render the complete report document.
pub fn render_html(result: &AnalysisResult) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang='en'>\n<head>\n");
    html.push_str("<meta charset='UTF-8'>\n");
    html.push_str("<meta name='viewport' content='width=device-width, initial-scale=1.0'>\n");
    html.push_str("<title>Chess Analysis Report</title>\n");
    let _ = writeln!(html, "<script src='{CHART_JS_CDN}'></script>");
    let _ = writeln!(html, "<style>\n{STYLES}</style>");
    html.push_str("</head>\n<body>\n<div class='container'>\n");
    html.push_str("<header>\n<h1>&#9823; Chess Analysis Report</h1>\n");
    html.push_str("<p class='subtitle'>Detailed breakdown of the errors in your games</p>\n");
    html.push_str("</header>\n");

    push_summary(&mut html, result);
    push_charts(&mut html);
    push_statistics(&mut html, result);
    push_error_cards(&mut html, result);

    html.push_str("</div>\n<script>\n");
    html.push_str(&chart_scripts(result));
    html.push_str("</script>\n</body>\n</html>\n");

    html
}

/// Render and write the report to `path`.
pub fn write_report(path: &Path, result: &AnalysisResult) -> Result<(), ReviewError> {
    std::fs::write(path, render_html(result))?;
    Ok(())
}

fn push_summary(html: &mut String, result: &AnalysisResult) {
    let card = |html: &mut String, number: String, label: &str| {
        let _ = writeln!(
            html,
            "<div class='summary-card'><div class='number'>{number}</div><div class='label'>{label}</div></div>"
        );
    };

    html.push_str("<section class='summary'>\n");
    card(html, result.errors().len().to_string(), "Total Errors");
    card(
        html,
        result.count_by_severity(ErrorSeverity::Blunder).to_string(),
        "Blunders",
    );
    card(
        html,
        result.count_by_severity(ErrorSeverity::Mistake).to_string(),
        "Mistakes",
    );
    card(
        html,
        result
            .count_by_severity(ErrorSeverity::Inaccuracy)
            .to_string(),
        "Inaccuracies",
    );
    card(
        html,
        format!("{:.0}", result.average_cp_loss()),
        "Avg CP Loss",
    );
    card(html, result.games_analyzed().to_string(), "Games Analyzed");
    html.push_str("</section>\n");
}

fn push_charts(html: &mut String) {
    html.push_str("<section class='charts-section'>\n<h2>&#128202; Visual Analysis</h2>\n");
    html.push_str("<div class='charts-grid'>\n");
    for (id, title) in [
        ("phaseChart", "Errors by Game Phase"),
        ("categoryChart", "Errors by Category"),
        ("severityChart", "Severity Distribution"),
        ("cpLossChart", "Avg CP Loss by Severity"),
    ] {
        let _ = writeln!(
            html,
            "<div class='chart-container'><h3>{title}</h3><div class='chart-wrapper'><canvas id='{id}'></canvas></div></div>"
        );
    }
    html.push_str("</div>\n</section>\n");
}

fn push_statistics(html: &mut String, result: &AnalysisResult) {
    let stat_item = |html: &mut String, label: &str, value: String| {
        let _ = writeln!(
            html,
            "<div class='stat-item'><span class='stat-label'>{label}</span><span class='stat-value'>{value}</span></div>"
        );
    };

    html.push_str("<section class='stats-section'>\n<h2>&#128200; Detailed Statistics</h2>\n");
    html.push_str("<div class='stats-grid'>\n");

    html.push_str("<div class='stat-card'>\n<h4>&#127919; Errors by Phase</h4>\n");
    for phase in GamePhase::ALL {
        let count = result.errors_by_phase().get(&phase).copied().unwrap_or(0);
        stat_item(html, phase.name(), count.to_string());
    }
    html.push_str("</div>\n");

    html.push_str("<div class='stat-card'>\n<h4>&#128269; Errors by Category</h4>\n");
    for category in ErrorCategory::ALL {
        let count = result
            .errors_by_category()
            .get(&category)
            .copied()
            .unwrap_or(0);
        if count > 0 {
            stat_item(html, &category.name().replace('_', " "), count.to_string());
        }
    }
    html.push_str("</div>\n");

    html.push_str("<div class='stat-card'>\n<h4>&#9899;&#9898; Per-Color Statistics</h4>\n");
    for side in [PlayerSide::White, PlayerSide::Black] {
        let losses: Vec<i32> = result
            .errors()
            .iter()
            .filter(|e| e.side == side)
            .map(|e| e.cp_loss)
            .collect();
        let avg = if losses.is_empty() {
            0.0
        } else {
            losses.iter().sum::<i32>() as f64 / losses.len() as f64
        };
        stat_item(
            html,
            &format!("{} - Errors", side.name()),
            losses.len().to_string(),
        );
        stat_item(
            html,
            &format!("{} - Avg CP Loss", side.name()),
            format!("{avg:.1}"),
        );
    }
    html.push_str("</div>\n");

    html.push_str("</div>\n</section>\n");
}

fn push_error_cards(html: &mut String, result: &AnalysisResult) {
    html.push_str("<section class='errors-table-section'>\n<h2>&#128269; Error Details</h2>\n");

    let mut sorted: Vec<&GameError> = result.errors().iter().collect();
    sorted.sort_by(|a, b| b.cp_loss.cmp(&a.cp_loss));

    for error in sorted {
        let opening = error
            .opening_name
            .as_deref()
            .map(escape_html)
            .unwrap_or_else(|| "Unknown Opening".to_string());

        html.push_str("<div class='error-card'>\n<div class='error-header'>\n");
        let _ = writeln!(
            html,
            "<div><strong>Move {}</strong> - {} | {}</div>",
            error.move_number,
            error.side.name(),
            opening
        );
        let _ = writeln!(
            html,
            "<span class='severity-badge severity-{0}'>{0}</span>",
            error.severity.name()
        );
        html.push_str("</div>\n<div class='error-body'>\n");

        let info = |html: &mut String, label: &str, value: String| {
            let _ = writeln!(
                html,
                "<div class='error-info'><span class='error-info-label'>{label}</span><span class='error-info-value'>{value}</span></div>"
            );
        };
        info(html, "Phase", error.phase.name().to_string());
        info(html, "Category", error.category.name().replace('_', " "));
        info(html, "CP Loss", error.cp_loss.to_string());
        info(html, "Played Move", escape_html(&error.san));
        info(html, "Best Move", escape_html(&error.best_move_uci));
        info(
            html,
            "Eval Before",
            format!("{:.2}", error.eval_before as f64 / 100.0),
        );
        info(
            html,
            "Eval After",
            format!("{:.2}", error.eval_after as f64 / 100.0),
        );
        info(html, "Game ID", escape_html(&error.game_id));
        if error.low_confidence {
            info(html, "Confidence", "LOW (engine score missing)".to_string());
        }

        push_diagrams(html, error);

        html.push_str("</div>\n</div>\n");
    }

    html.push_str("</section>\n");
}

fn push_diagrams(html: &mut String, error: &GameError) {
    let orientation = error.side.name().to_lowercase();

    html.push_str("<div class='board-diagrams'>\n");

    let played_gif = lichess_gif_url(&error.fen_before, &error.uci, &orientation);
    html.push_str("<div class='diagram-container'>\n");
    html.push_str("<div class='diagram-title'>&#10060; Played Move</div>\n");
    let _ = writeln!(
        html,
        "<img src='{played_gif}' alt='Played move' class='board-gif' loading='lazy'>"
    );
    let _ = writeln!(
        html,
        "<div class='move-notation'>Move: <strong>{}</strong> ({})</div>",
        escape_html(&error.san),
        escape_html(&error.uci)
    );
    html.push_str("</div>\n");

    let best_gif = lichess_gif_url(&error.fen_before, &error.best_move_uci, &orientation);
    html.push_str("<div class='diagram-container'>\n");
    html.push_str("<div class='diagram-title'>&#9989; Best Move</div>\n");
    let _ = writeln!(
        html,
        "<img src='{best_gif}' alt='Best move' class='board-gif' loading='lazy'>"
    );
    let _ = writeln!(
        html,
        "<div class='move-notation'>Move: <strong>{}</strong> (CP loss avoided: {})</div>",
        escape_html(&error.best_move_uci),
        error.cp_loss
    );
    html.push_str("</div>\n</div>\n");
}

fn lichess_gif_url(fen: &str, uci: &str, orientation: &str) -> String {
    format!(
        "https://lichess1.org/export/fen.gif?fen={}&lastMove={}&orientation={}&theme=brown&piece=cburnett",
        encode_query(fen),
        encode_query(uci),
        orientation
    )
}

fn chart_scripts(result: &AnalysisResult) -> String {
    let phase_labels: Vec<&str> = GamePhase::ALL.iter().map(|p| p.name()).collect();
    let phase_counts: Vec<usize> = GamePhase::ALL
        .iter()
        .map(|p| result.errors_by_phase().get(p).copied().unwrap_or(0))
        .collect();

    let mut category_labels = Vec::new();
    let mut category_counts = Vec::new();
    for category in ErrorCategory::ALL {
        let count = result
            .errors_by_category()
            .get(&category)
            .copied()
            .unwrap_or(0);
        if count > 0 {
            category_labels.push(category.name().replace('_', " "));
            category_counts.push(count);
        }
    }

    let severity_labels: Vec<&str> = ErrorSeverity::ALL.iter().map(|s| s.name()).collect();
    let severity_counts: Vec<usize> = ErrorSeverity::ALL
        .iter()
        .map(|s| result.count_by_severity(*s))
        .collect();
    let severity_avg_loss: Vec<f64> = ErrorSeverity::ALL
        .iter()
        .map(|s| {
            let losses: Vec<i32> = result
                .errors()
                .iter()
                .filter(|e| e.severity == *s)
                .map(|e| e.cp_loss)
                .collect();
            if losses.is_empty() {
                0.0
            } else {
                losses.iter().sum::<i32>() as f64 / losses.len() as f64
            }
        })
        .collect();

    let mut js = String::new();
    js.push_str("Chart.defaults.plugins.legend.position = 'bottom';\n\n");

    let _ = writeln!(
        js,
        "new Chart(document.getElementById('phaseChart'), {{ type: 'pie', data: {{ labels: {}, datasets: [{{ data: {}, backgroundColor: ['rgba(102,126,234,0.8)','rgba(118,75,162,0.8)','rgba(255,152,0,0.8)'], borderWidth: 2, borderColor: '#fff' }}] }}, options: {{ responsive: true, maintainAspectRatio: false }} }});",
        json!(phase_labels),
        json!(phase_counts)
    );

    let _ = writeln!(
        js,
        "new Chart(document.getElementById('categoryChart'), {{ type: 'doughnut', data: {{ labels: {}, datasets: [{{ data: {}, backgroundColor: ['rgba(255,99,132,0.8)','rgba(54,162,235,0.8)','rgba(255,206,86,0.8)','rgba(75,192,192,0.8)','rgba(153,102,255,0.8)','rgba(255,159,64,0.8)'], borderWidth: 2, borderColor: '#fff' }}] }}, options: {{ responsive: true, maintainAspectRatio: false }} }});",
        json!(category_labels),
        json!(category_counts)
    );

    let _ = writeln!(
        js,
        "new Chart(document.getElementById('severityChart'), {{ type: 'bar', data: {{ labels: {}, datasets: [{{ label: 'Errors', data: {}, backgroundColor: ['rgba(255,193,7,0.8)','rgba(255,152,0,0.8)','rgba(255,68,68,0.8)'], borderWidth: 2 }}] }}, options: {{ responsive: true, maintainAspectRatio: false, scales: {{ y: {{ beginAtZero: true, ticks: {{ stepSize: 1 }} }} }}, plugins: {{ legend: {{ display: false }} }} }} }});",
        json!(severity_labels),
        json!(severity_counts)
    );

    let _ = writeln!(
        js,
        "new Chart(document.getElementById('cpLossChart'), {{ type: 'bar', data: {{ labels: {}, datasets: [{{ label: 'Avg CP Loss', data: {}, backgroundColor: 'rgba(102,126,234,0.8)', borderColor: 'rgb(102,126,234)', borderWidth: 2 }}] }}, options: {{ responsive: true, maintainAspectRatio: false, scales: {{ y: {{ beginAtZero: true }} }}, plugins: {{ legend: {{ display: false }} }} }} }});",
        json!(severity_labels),
        json!(severity_avg_loss)
    );

    js
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Percent-encode a query-string value.
fn encode_query(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_error(cp_loss: i32, severity: ErrorSeverity) -> GameError {
        GameError {
            game_id: "abcd1234".to_string(),
            move_number: 12,
            side: PlayerSide::White,
            severity,
            category: ErrorCategory::Tactical,
            phase: GamePhase::Middlegame,
            cp_loss,
            eval_before: 40,
            eval_after: 40 - cp_loss,
            best_eval: 40,
            san: "Qxb7".to_string(),
            uci: "b4b7".to_string(),
            best_move_uci: "f1e1".to_string(),
            fen_before: "r1bqkbnr/pppppppp/8/8/1Q6/8/PPPPPPPP/RNB1KBNR w KQkq - 0 1".to_string(),
            fen_after: "r1bqkbnr/pQpppppp/8/8/8/8/PPPPPPPP/RNB1KBNR b KQkq - 0 1".to_string(),
            opening_name: Some("Sicilian Defense".to_string()),
            opening_eco: Some("B20".to_string()),
            low_confidence: false,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_encode_query_handles_fen() {
        let encoded = encode_query("8/8 w - - 0 1");
        assert_eq!(encoded, "8%2F8%20w%20-%20-%200%201");
    }

    #[test]
    fn test_render_contains_summary_and_badges() {
        let result = AnalysisResult::new(
            vec![
                sample_error(300, ErrorSeverity::Blunder),
                sample_error(80, ErrorSeverity::Mistake),
            ],
            1,
        );
        let html = render_html(&result);
        assert!(html.contains("severity-BLUNDER"));
        assert!(html.contains("Sicilian Defense"));
        assert!(html.contains("Games Analyzed"));
        assert!(html.contains("phaseChart"));
    }

    #[test]
    fn test_error_cards_sorted_by_loss_descending() {
        let result = AnalysisResult::new(
            vec![
                sample_error(80, ErrorSeverity::Mistake),
                sample_error(300, ErrorSeverity::Blunder),
            ],
            1,
        );
        let html = render_html(&result);
        let blunder_pos = html.find("severity-BLUNDER'>BLUNDER").unwrap();
        let mistake_pos = html.find("severity-MISTAKE'>MISTAKE").unwrap();
        assert!(blunder_pos < mistake_pos);
    }

    #[test]
    fn test_empty_result_renders() {
        let html = render_html(&AnalysisResult::new(vec![], 0));
        assert!(html.contains("Total Errors"));
    }
}
