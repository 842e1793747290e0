//! Console output formatter for mixture results

use colored::Colorize;
use mos_domain::{MosReport, OutputFormat};

/// Formats mixture reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything this process prints
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Render `report` in the requested format
    pub fn render(report: &MosReport, format: OutputFormat) -> String {
        match format {
            OutputFormat::Answer => Self::format_answer_only(report),
            OutputFormat::Full => Self::format(report),
            OutputFormat::Json => Self::format_json(report),
        }
    }

    /// Format the complete report
    pub fn format(report: &MosReport) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("Mixture of Solvers"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), report.query));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Strategy:".cyan().bold(),
            report.strategy,
            report.strategy.description().dimmed()
        ));

        // Gather
        output.push_str(&Self::section_header(&format!(
            "Candidates ({}/{} workers answered)",
            report.successful_workers(),
            report.responses.len()
        )));
        for response in &report.responses {
            if response.success {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", response.source).yellow().bold(),
                    response.content
                ));
            } else {
                output.push_str(&format!(
                    "\n{}\nError: {}\n",
                    format!("── {} ──", response.source).red().bold(),
                    response.error.as_deref().unwrap_or("Unknown")
                ));
            }
        }

        // Vote
        if let Some(tally) = &report.tally {
            output.push_str(&Self::section_header("Votes"));
            for (answer, count) in tally.entries() {
                output.push_str(&format!(
                    "  {} {}\n",
                    format!("{:>3}", count).green().bold(),
                    Self::first_line(answer)
                ));
            }
        }

        // Discussion
        if let Some(transcript) = &report.transcript {
            output.push_str(&Self::section_header(&format!(
                "Discussion ({} turns)",
                transcript.len()
            )));
            for (i, turn) in transcript.turns().iter().enumerate() {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("Turn {}", i + 1).yellow().bold(),
                    Self::indent(turn, "  ")
                ));
            }
        }

        // Answer
        output.push_str(&Self::section_header("Answer"));
        if report.fallback {
            output.push_str(&format!("\n{}\n", report.answer.red()));
        } else {
            output.push_str(&format!("\n{}\n", report.answer));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &MosReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final answer only (concise output)
    pub fn format_answer_only(report: &MosReport) -> String {
        format!("{}\n", report.answer)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    fn first_line(text: &str) -> &str {
        text.lines().next().unwrap_or("")
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
