use std::io::IsTerminal;

use anstyle::{AnsiColor, Style};

use crate::update::UpdateOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Plain,
    Rich,
}

pub fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        OutputStyle::Plain
    } else {
        OutputStyle::Rich
    }
}

pub fn render_outcome_lines(
    style: OutputStyle,
    outcomes: &[UpdateOutcome],
    dry_run: bool,
) -> Vec<String> {
    if outcomes.is_empty() {
        return vec!["All plugins are up to date.".to_string()];
    }

    let mut lines = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let (status, status_style) = if dry_run {
            ("would update", info_style())
        } else if outcome.installed {
            ("updated", ok_style())
        } else {
            ("failed", fail_style())
        };
        lines.push(format!(
            "{} {} ({}) -> {}",
            paint(style, status_style, status),
            outcome.display_name,
            outcome.internal_name,
            outcome.version
        ));
    }
    lines
}

pub fn render_status_line(style: OutputStyle, ok: bool, message: &str) -> String {
    let (status, status_style) = if ok {
        ("ok", ok_style())
    } else {
        ("error", fail_style())
    };
    format!("{} {}", paint(style, status_style, status), message)
}

fn paint(style: OutputStyle, text_style: Style, text: &str) -> String {
    match style {
        OutputStyle::Plain => text.to_string(),
        OutputStyle::Rich => format!("{text_style}{text}{text_style:#}"),
    }
}

fn ok_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Green.into())).bold()
}

fn fail_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Red.into())).bold()
}

fn info_style() -> Style {
    Style::new().fg_color(Some(AnsiColor::Cyan.into()))
}
