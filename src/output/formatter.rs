//! Output formatters for evaluation and batch reports

use crate::config::OutputFormat;
use crate::error::{RelevanceError, Result};
use crate::output::report::{BatchEntry, BatchReport, EvaluationReport};
use crate::processing::document::Verdict;
use askama::Template;
use colored::{Color, Colorize};
use std::path::Path;

/// Renders reports into one output format
pub trait OutputFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String>;
    fn format_batch(&self, report: &BatchReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and optional score breakdown
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

pub struct HtmlFormatter {
    include_styles: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
    html_formatter: HtmlFormatter,
}

const HTML_STYLES: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 900px;
            margin: 0 auto;
            padding: 20px;
            background: #f8f9fa;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
        }
        .header {
            text-align: center;
            margin-bottom: 30px;
            border-bottom: 3px solid #007acc;
            padding-bottom: 20px;
        }
        .score-badge {
            display: inline-block;
            padding: 8px 16px;
            border-radius: 20px;
            font-weight: bold;
            color: white;
            margin-left: 10px;
        }
        .verdict-high { background: #28a745; }
        .verdict-medium { background: #ffc107; color: #000; }
        .verdict-low { background: #dc3545; }
        .section { margin: 25px 0; }
        .section h2 {
            color: #007acc;
            border-bottom: 2px solid #e9ecef;
            padding-bottom: 10px;
        }
        table { width: 100%; border-collapse: collapse; }
        th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #e9ecef; }
        .metadata { color: #6c757d; font-size: 0.9em; margin-top: 30px; }
"#;

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Resume Relevance Report - {{ candidate_name }}</title>
    {% if include_styles %}<style>{{ styles|safe }}</style>{% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Resume Relevance Report</h1>
            <p><strong>{{ candidate_name }}</strong> for <strong>{{ role_title }}</strong> at {{ company }} ({{ location }})</p>
            <p>Relevance score: {{ relevance_score }}
                <span class="score-badge {{ verdict_class }}">{{ verdict }}</span></p>
        </div>

        <div class="section">
            <h2>Score Breakdown</h2>
            <table>
                <tr><th>Component</th><th>Score</th></tr>
                <tr><td>Hard match</td><td>{{ hard_match_score }}</td></tr>
                <tr><td>Soft match</td><td>{{ soft_match_score }}</td></tr>
                {% for row in breakdown_rows %}
                <tr><td>&nbsp;&nbsp;{{ row.label }}</td><td>{{ row.value }}</td></tr>
                {% endfor %}
            </table>
        </div>

        <div class="section">
            <h2>Matching Skills</h2>
            {% if matching_skills.is_empty() %}<p>None</p>{% else %}
            <ul>{% for skill in matching_skills %}<li>{{ skill }}</li>{% endfor %}</ul>
            {% endif %}
        </div>

        <div class="section">
            <h2>Missing Skills</h2>
            {% if missing_skills.is_empty() %}<p>None</p>{% else %}
            <ul>{% for skill in missing_skills %}<li>{{ skill }}</li>{% endfor %}</ul>
            {% endif %}
        </div>

        <div class="section">
            <h2>Suggestions</h2>
            <ol>{% for suggestion in suggestions %}<li>{{ suggestion }}</li>{% endfor %}</ol>
        </div>

        <div class="metadata">
            <p>Generated {{ generated_at }} by resume-relevance v{{ version }} | Embedder: {{ embedding_model }}</p>
            <p>Evaluation: {{ evaluation_id }}</p>
        </div>
    </div>
</body>
</html>"#,
    ext = "html"
)]
struct EvaluationHtml<'a> {
    include_styles: bool,
    styles: &'a str,
    candidate_name: &'a str,
    role_title: &'a str,
    company: &'a str,
    location: &'a str,
    relevance_score: String,
    verdict: &'a str,
    verdict_class: &'a str,
    hard_match_score: String,
    soft_match_score: String,
    breakdown_rows: Vec<BreakdownRow>,
    matching_skills: &'a [String],
    missing_skills: &'a [String],
    suggestions: &'a [String],
    generated_at: String,
    version: &'a str,
    embedding_model: &'a str,
    evaluation_id: &'a str,
}

struct BreakdownRow {
    label: &'static str,
    value: String,
}

struct HtmlBatchRow {
    rank: usize,
    name: String,
    file: String,
    score: String,
    verdict: &'static str,
    verdict_class: &'static str,
    missing: String,
}

#[derive(Template)]
#[template(
    source = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Candidate Ranking - {{ role_title }}</title>
    {% if include_styles %}<style>{{ styles|safe }}</style>{% endif %}
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Candidate Ranking</h1>
            <p><strong>{{ role_title }}</strong> at {{ company }} ({{ location }})</p>
            <p>{{ evaluated }} of {{ submitted }} resumes evaluated</p>
        </div>

        <div class="section">
            <h2>Shortlist (top {{ top_n }}, score &ge; {{ min_score }})</h2>
            {% if shortlist.is_empty() %}<p>No candidate meets the shortlist criteria.</p>{% else %}
            <ol>{% for row in shortlist %}<li>{{ row.name }} ({{ row.score }})</li>{% endfor %}</ol>
            {% endif %}
        </div>

        <div class="section">
            <h2>All Candidates</h2>
            <table>
                <tr><th>#</th><th>Candidate</th><th>File</th><th>Score</th><th>Verdict</th><th>Missing skills</th></tr>
                {% for row in rows %}
                <tr>
                    <td>{{ row.rank }}</td><td>{{ row.name }}</td><td>{{ row.file }}</td><td>{{ row.score }}</td>
                    <td><span class="score-badge {{ row.verdict_class }}">{{ row.verdict }}</span></td>
                    <td>{{ row.missing }}</td>
                </tr>
                {% endfor %}
            </table>
        </div>

        <div class="metadata">
            <p>Generated {{ generated_at }} by resume-relevance v{{ version }} | Embedder: {{ embedding_model }} | {{ processing_time }}ms</p>
        </div>
    </div>
</body>
</html>"#,
    ext = "html"
)]
struct BatchHtml<'a> {
    include_styles: bool,
    styles: &'a str,
    role_title: &'a str,
    company: &'a str,
    location: &'a str,
    evaluated: usize,
    submitted: usize,
    top_n: usize,
    min_score: String,
    shortlist: Vec<HtmlBatchRow>,
    rows: Vec<HtmlBatchRow>,
    generated_at: String,
    version: &'a str,
    embedding_model: &'a str,
    processing_time: u64,
}

fn verdict_class(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::High => "verdict-high",
        Verdict::Medium => "verdict-medium",
        Verdict::Low => "verdict-low",
    }
}

fn breakdown_rows(report: &EvaluationReport) -> Vec<BreakdownRow> {
    let Some(breakdown) = &report.breakdown else {
        return Vec::new();
    };
    let hard = &breakdown.hard;
    let soft = &breakdown.soft;
    [
        ("Required skills", hard.required_skills),
        ("Preferred skills", hard.preferred_skills),
        ("Experience", hard.experience),
        ("Education", hard.education),
        ("Projects", hard.projects),
        ("Certifications", hard.certifications),
        ("Dense similarity", soft.dense_similarity),
        ("Keyword ranking", soft.ranking_score),
    ]
    .into_iter()
    .map(|(label, value)| BreakdownRow {
        label,
        value: format!("{:.2}", value),
    })
    .collect()
}

fn display_name(entry: &BatchEntry) -> String {
    if entry.candidate.name.is_empty() || entry.candidate.name == "Unknown" {
        file_name(&entry.candidate.file).unwrap_or_else(|| entry.candidate.resume_id.clone())
    } else {
        entry.candidate.name.clone()
    }
}

fn file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
}

fn timestamp(report_time: &chrono::DateTime<chrono::Utc>) -> String {
    report_time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_verdict(&self, verdict: Verdict) -> String {
        let color = match verdict {
            Verdict::High => Color::Green,
            Verdict::Medium => Color::Yellow,
            Verdict::Low => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", verdict.label().color(color).bold())
        } else {
            format!("[{}]", verdict.label())
        }
    }

    fn format_list(&self, output: &mut String, items: &[String], color: Color, empty: &str) {
        if items.is_empty() {
            output.push_str(&format!("  {}\n", empty));
        }
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let evaluation = &report.evaluation;
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME RELEVANCE EVALUATION", 1));
        output.push_str(&format!(
            "Candidate: {} | Role: {} at {} ({})\n",
            report.candidate.name, report.job.role_title, report.job.company, report.job.location
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Relevance Score: {:.2}/100 {}\n",
            evaluation.relevance_score,
            self.format_verdict(evaluation.verdict)
        ));
        output.push_str(&format!("Hard Match: {:.2}/100\n", evaluation.hard_match_score));
        output.push_str(&format!("Soft Match: {:.2}/100\n", evaluation.soft_match_score));

        if self.detailed {
            if let Some(breakdown) = &report.breakdown {
                output.push_str(&self.format_header("Score Breakdown", 3));
                let hard = &breakdown.hard;
                output.push_str(&format!("🎯 Required skills:  {:>6.2}\n", hard.required_skills));
                output.push_str(&format!("⭐ Preferred skills: {:>6.2}\n", hard.preferred_skills));
                output.push_str(&format!("⏳ Experience:       {:>6.2}\n", hard.experience));
                output.push_str(&format!("🎓 Education:        {:>6.2}\n", hard.education));
                output.push_str(&format!("🛠  Projects:         {:>6.2}\n", hard.projects));
                output.push_str(&format!("📜 Certifications:   {:>6.2}\n", hard.certifications));
                output.push_str(&format!(
                    "🔍 Dense similarity: {:>6.2}\n",
                    breakdown.soft.dense_similarity
                ));
                output.push_str(&format!(
                    "📚 Keyword ranking:  {:>6.2}\n",
                    breakdown.soft.ranking_score
                ));
            }
        }

        output.push_str(&self.format_header("✅ Matching Skills", 3));
        self.format_list(&mut output, &evaluation.matching_skills, Color::Green, "None");

        output.push_str(&self.format_header("❌ Missing Skills", 3));
        self.format_list(&mut output, &evaluation.missing_skills, Color::Red, "None");

        output.push_str(&self.format_header("💡 Suggestions", 3));
        for (i, suggestion) in evaluation.suggestions.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
        }

        output.push_str(&format!(
            "\n{}\n",
            self.colorize(
                &format!(
                    "Generated: {} | Embedder: {} | Processing time: {}ms",
                    timestamp(&report.metadata.generated_at),
                    report.metadata.embedding_model,
                    report.metadata.processing_time_ms
                ),
                Color::BrightBlack
            )
        ));

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 CANDIDATE RANKING", 1));
        output.push_str(&format!(
            "Role: {} at {} ({})\n",
            report.job.role_title, report.job.company, report.job.location
        ));
        output.push_str(&format!(
            "Evaluated {} of {} resumes\n",
            report.entries.len(),
            report.submitted
        ));
        if report.skipped() > 0 {
            output.push_str(&self.colorize(
                &format!("{} resumes could not be evaluated\n", report.skipped()),
                Color::Yellow,
            ));
        }

        output.push_str(&self.format_header(
            &format!(
                "Shortlist (top {}, score >= {})",
                report.shortlist_criteria.top_n, report.shortlist_criteria.min_score
            ),
            2,
        ));
        if report.shortlist.is_empty() {
            output.push_str("  No candidate meets the shortlist criteria\n");
        }
        for entry in &report.shortlist {
            output.push_str(&format!(
                "  {}. {} {:.2} {}\n",
                entry.rank,
                self.colorize(&display_name(entry), Color::Cyan),
                entry.evaluation.relevance_score,
                self.format_verdict(entry.evaluation.verdict)
            ));
        }

        output.push_str(&self.format_header("All Candidates", 2));
        for entry in &report.entries {
            output.push_str(&format!(
                "{:>3}. {:<30} {:>6.2} {}\n",
                entry.rank,
                display_name(entry),
                entry.evaluation.relevance_score,
                self.format_verdict(entry.evaluation.verdict)
            ));
            if self.detailed && !entry.evaluation.missing_skills.is_empty() {
                output.push_str(&format!(
                    "     missing: {}\n",
                    self.colorize(&entry.evaluation.missing_skills.join(", "), Color::Red)
                ));
            }
        }

        output.push_str(&format!(
            "\n{}\n",
            self.colorize(
                &format!(
                    "Generated: {} | Embedder: {} | Processing time: {}ms",
                    timestamp(&report.metadata.generated_at),
                    report.metadata.embedding_model,
                    report.metadata.processing_time_ms
                ),
                Color::BrightBlack
            )
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    fn to_json<T: serde::Serialize>(&self, value: &T) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(serde_json::to_string(value)?)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        self.to_json(report)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        self.to_json(report)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn skill_list(output: &mut String, skills: &[String]) {
        if skills.is_empty() {
            output.push_str("_None_\n");
        }
        for skill in skills {
            output.push_str(&format!("- {}\n", skill));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let evaluation = &report.evaluation;
        let mut output = String::new();

        output.push_str("# 📊 Resume Relevance Report\n\n");
        output.push_str(&format!(
            "**Candidate:** {} | **Role:** {} at {} ({})\n\n",
            report.candidate.name, report.job.role_title, report.job.company, report.job.location
        ));

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Embedder:** {} | **Processing Time:** {}ms\n\n",
                timestamp(&report.metadata.generated_at),
                report.metadata.embedding_model,
                report.metadata.processing_time_ms
            ));
            if let Some(file) = file_name(&report.candidate.file) {
                output.push_str(&format!("**Resume:** `{}`\n\n", file));
            }
        }

        output.push_str("## Summary\n\n");
        output.push_str("| Score | Value |\n|---|---|\n");
        output.push_str(&format!("| Relevance | {:.2} |\n", evaluation.relevance_score));
        output.push_str(&format!("| Hard match | {:.2} |\n", evaluation.hard_match_score));
        output.push_str(&format!("| Soft match | {:.2} |\n\n", evaluation.soft_match_score));
        output.push_str(&format!("**Verdict:** {}\n\n", evaluation.verdict));

        if let Some(breakdown) = &report.breakdown {
            output.push_str("## Score Breakdown\n\n| Criterion | Points |\n|---|---|\n");
            let hard = &breakdown.hard;
            for (name, value) in [
                ("Required skills", hard.required_skills),
                ("Preferred skills", hard.preferred_skills),
                ("Experience", hard.experience),
                ("Education", hard.education),
                ("Projects", hard.projects),
                ("Certifications", hard.certifications),
                ("Dense similarity", breakdown.soft.dense_similarity),
                ("Keyword ranking", breakdown.soft.ranking_score),
            ] {
                output.push_str(&format!("| {} | {:.2} |\n", name, value));
            }
            output.push('\n');
        }

        output.push_str("## ✅ Matching Skills\n\n");
        Self::skill_list(&mut output, &evaluation.matching_skills);
        output.push_str("## ❌ Missing Skills\n\n");
        Self::skill_list(&mut output, &evaluation.missing_skills);

        output.push_str("## 💡 Suggestions\n\n");
        for (i, suggestion) in evaluation.suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }

        Ok(output)
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Candidate Ranking\n\n");
        output.push_str(&format!(
            "**Role:** {} at {} ({})\n\n",
            report.job.role_title, report.job.company, report.job.location
        ));
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Embedder:** {} | **Evaluated:** {} of {}\n\n",
                timestamp(&report.metadata.generated_at),
                report.metadata.embedding_model,
                report.entries.len(),
                report.submitted
            ));
        }

        output.push_str(&format!(
            "## Shortlist (top {}, score ≥ {})\n\n",
            report.shortlist_criteria.top_n, report.shortlist_criteria.min_score
        ));
        if report.shortlist.is_empty() {
            output.push_str("_No candidate meets the shortlist criteria._\n");
        }
        for entry in &report.shortlist {
            output.push_str(&format!(
                "1. **{}** ({:.2}, {})\n",
                display_name(entry),
                entry.evaluation.relevance_score,
                entry.evaluation.verdict
            ));
        }

        output.push_str("\n## All Candidates\n\n");
        output.push_str("| # | Candidate | Score | Verdict | Missing skills |\n|---|---|---|---|---|\n");
        for entry in &report.entries {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {} | {} |\n",
                entry.rank,
                display_name(entry),
                entry.evaluation.relevance_score,
                entry.evaluation.verdict,
                entry.evaluation.missing_skills.join(", ")
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl HtmlFormatter {
    pub fn new(include_styles: bool) -> Self {
        Self { include_styles }
    }

    fn batch_row(entry: &BatchEntry) -> HtmlBatchRow {
        HtmlBatchRow {
            rank: entry.rank,
            name: display_name(entry),
            file: file_name(&entry.candidate.file).unwrap_or_default(),
            score: format!("{:.2}", entry.evaluation.relevance_score),
            verdict: entry.evaluation.verdict.label(),
            verdict_class: verdict_class(entry.evaluation.verdict),
            missing: entry.evaluation.missing_skills.join(", "),
        }
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format_report(&self, report: &EvaluationReport) -> Result<String> {
        let evaluation = &report.evaluation;
        let template = EvaluationHtml {
            include_styles: self.include_styles,
            styles: HTML_STYLES,
            candidate_name: &report.candidate.name,
            role_title: &report.job.role_title,
            company: &report.job.company,
            location: &report.job.location,
            relevance_score: format!("{:.2} ({}%)", evaluation.relevance_score, report.score_percentage()),
            verdict: evaluation.verdict.label(),
            verdict_class: verdict_class(evaluation.verdict),
            hard_match_score: format!("{:.2}", evaluation.hard_match_score),
            soft_match_score: format!("{:.2}", evaluation.soft_match_score),
            breakdown_rows: breakdown_rows(report),
            matching_skills: &evaluation.matching_skills,
            missing_skills: &evaluation.missing_skills,
            suggestions: &evaluation.suggestions,
            generated_at: timestamp(&report.metadata.generated_at),
            version: &report.metadata.tool_version,
            embedding_model: &report.metadata.embedding_model,
            evaluation_id: &evaluation.evaluation_id,
        };

        template
            .render()
            .map_err(|e| RelevanceError::OutputFormatting(e.to_string()))
    }

    fn format_batch(&self, report: &BatchReport) -> Result<String> {
        let template = BatchHtml {
            include_styles: self.include_styles,
            styles: HTML_STYLES,
            role_title: &report.job.role_title,
            company: &report.job.company,
            location: &report.job.location,
            evaluated: report.entries.len(),
            submitted: report.submitted,
            top_n: report.shortlist_criteria.top_n,
            min_score: format!("{:.0}", report.shortlist_criteria.min_score),
            shortlist: report.shortlist.iter().map(Self::batch_row).collect(),
            rows: report.entries.iter().map(Self::batch_row).collect(),
            generated_at: timestamp(&report.metadata.generated_at),
            version: &report.metadata.tool_version,
            embedding_model: &report.metadata.embedding_model,
            processing_time: report.metadata.processing_time_ms,
        };

        template
            .render()
            .map_err(|e| RelevanceError::OutputFormatting(e.to_string()))
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Html
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true, true)
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
        include_html_styles: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
            html_formatter: HtmlFormatter::new(include_html_styles),
        }
    }

    fn formatter(&self, format: OutputFormat) -> &dyn OutputFormatter {
        match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
            OutputFormat::Html => &self.html_formatter,
        }
    }

    pub fn generate_report(&self, report: &EvaluationReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_report(report)
    }

    pub fn generate_batch_report(&self, report: &BatchReport, format: OutputFormat) -> Result<String> {
        self.formatter(format).format_batch(report)
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
        OutputFormat::Html => "html",
    };

    format!("{}_evaluation{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{ReportMetadata, ShortlistCriteria};
    use crate::processing::analyzer::{DetailedEvaluation, ScoreBreakdown};
    use crate::processing::document::{EvaluationResult, JobDescription, Resume};

    fn sample_report(detailed: bool) -> EvaluationReport {
        let resume = Resume::new("resume text")
            .with_candidate_name("Jane <Doe>")
            .with_file_path("/tmp/jane.txt");
        let job = JobDescription::new("job text")
            .with_role_title("Backend Engineer")
            .with_company("Acme");
        let result = EvaluationResult {
            evaluation_id: EvaluationResult::evaluation_key(&resume.resume_id, &job.job_id),
            resume_id: resume.resume_id.clone(),
            job_id: job.job_id.clone(),
            relevance_score: 68.5,
            hard_match_score: 75.0,
            soft_match_score: 64.17,
            missing_skills: vec!["docker".to_string()],
            matching_skills: vec!["python".to_string(), "sql".to_string()],
            verdict: Verdict::Medium,
            suggestions: vec!["Your profile is moderately suitable. Focus on filling skill gaps".to_string()],
            evaluated_at: chrono::Utc::now(),
        };
        EvaluationReport::new(
            &resume,
            &job,
            DetailedEvaluation {
                result,
                breakdown: ScoreBreakdown::default(),
            },
            detailed,
            ReportMetadata::new("feature-hashing", 3),
        )
    }

    fn sample_batch() -> BatchReport {
        let single = sample_report(false);
        let job = JobDescription::new("job text").with_role_title("Backend Engineer");
        let resume = Resume::new("resume text").with_candidate_name("Jane Doe");
        BatchReport::new(
            &job,
            &[resume],
            vec![single.evaluation.clone()],
            &[single.evaluation],
            ShortlistCriteria { top_n: 3, min_score: 50.0 },
            1,
            ReportMetadata::new("feature-hashing", 9),
        )
    }

    #[test]
    fn test_console_report_without_colors() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_report(&sample_report(true)).unwrap();

        assert!(output.contains("Relevance Score: 68.50/100 [Medium Suitability]"));
        assert!(output.contains("  • docker"));
        assert!(output.contains("Required skills"));
        assert!(output.contains("1. Your profile is moderately suitable"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let output = JsonFormatter::new(false).format_report(&sample_report(false)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["evaluation"]["verdict"], "Medium");
        assert_eq!(value["job"]["company"], "Acme");
        assert!(value.get("breakdown").is_none());
    }

    #[test]
    fn test_markdown_report() {
        let output = MarkdownFormatter::new(true).format_report(&sample_report(true)).unwrap();

        assert!(output.starts_with("# 📊 Resume Relevance Report"));
        assert!(output.contains("| Relevance | 68.50 |"));
        assert!(output.contains("**Resume:** `jane.txt`"));
        assert!(output.contains("## Score Breakdown"));
    }

    #[test]
    fn test_html_report_escapes_content() {
        let output = HtmlFormatter::new(true).format_report(&sample_report(false)).unwrap();

        assert!(output.contains("<!DOCTYPE html>"));
        assert!(output.contains("Jane &lt;Doe&gt;"));
        assert!(output.contains("verdict-medium"));
        assert!(output.contains("<li>docker</li>"));
    }

    #[test]
    fn test_batch_formats() {
        let batch = sample_batch();
        let generator = ReportGenerator::with_options(false, true, true, true, false);

        let console = generator.generate_batch_report(&batch, OutputFormat::Console).unwrap();
        assert!(console.contains("Jane Doe"));
        assert!(console.contains("Evaluated 1 of 1 resumes"));

        let markdown = generator.generate_batch_report(&batch, OutputFormat::Markdown).unwrap();
        assert!(markdown.contains("| 1 | Jane Doe | 68.50 | Medium Suitability | docker |"));

        let html = generator.generate_batch_report(&batch, OutputFormat::Html).unwrap();
        assert!(html.contains("Candidate Ranking"));
        assert!(!html.contains("<style>"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(
            suggest_filename(OutputFormat::Json, "/data/jane_doe.txt", false),
            "jane_doe_evaluation.json"
        );
    }
}
