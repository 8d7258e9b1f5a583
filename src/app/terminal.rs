use std::{
    io::{
        self,
        BufRead,
        Write,
    },
    time::Duration,
};

use super::Session;
use crate::core::{
    Card,
    Suggestion,
    SwipeDecision,
    SwipeOutcome,
};

const LOADING_WAIT: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Like,
    Dislike,
    Drag(f32),
    Positive,
    Negative,
    Suggestions,
    Refresh,
    Wait,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Some(Command::Wait),
        "l" | "like" => Some(Command::Like),
        "d" | "dislike" => Some(Command::Dislike),
        "p" | "positive" => Some(Command::Positive),
        "n" | "negative" => Some(Command::Negative),
        "s" | "suggestions" => Some(Command::Suggestions),
        "r" | "refresh" => Some(Command::Refresh),
        "h" | "help" | "?" => Some(Command::Help),
        "q" | "quit" | "exit" => Some(Command::Quit),
        other => other.parse::<f32>().ok().filter(|dx| dx.is_finite()).map(Command::Drag),
    }
}

pub fn render_card(card: &Card) -> String {
    if card.is_sentinel() {
        return format!("[ end of cards ]\n  {}", card.positive_review);
    }

    let mut out = format!("[#{}] {}", card.id, card.display_name());
    if let Some(hours) = &card.hours_display {
        out.push_str(&format!("\n  Hours: {hours}"));
    }
    if let Some(address) = &card.address {
        out.push_str(&format!("\n  {address}"));
    }
    out
}

pub fn render_suggestion(suggestion: &Suggestion) -> String {
    let mut out = suggestion.name.clone().unwrap_or_default();
    out.push_str(&format!("\n  Hours: {}", suggestion.hours_display.as_deref().unwrap_or("n/a")));
    if let Some(address) = &suggestion.address {
        out.push_str(&format!("\n  Address: {address}"));
    }
    if let Some(website) = &suggestion.website {
        out.push_str(&format!("\n  Site: {website}"));
    }
    out
}

fn describe(outcome: &SwipeOutcome) -> &'static str {
    match outcome.decision {
        SwipeDecision::Accept => "Liked!",
        SwipeDecision::Reject => "Passed.",
        SwipeDecision::Cancel => "Snapped back.",
    }
}

const HELP: &str = "l like | d dislike | <number> drag by pixels | p/n reviews | s suggestions | r refresh | q quit";

/// Interactive loop over stdin/stdout until `q` or end of input.
pub fn run(session: &mut Session) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    writeln!(stdout, "{HELP}")?;
    loop {
        if session.is_loading() {
            session.pump_wait(LOADING_WAIT);
        } else {
            session.pump();
        }

        writeln!(stdout, "\n{}", render_card(session.queue().foremost()))?;
        if session.is_loading() {
            writeln!(stdout, "  (still searching nearby...)")?;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let Some(command) = parse_command(&line?) else {
            writeln!(stdout, "{HELP}")?;
            continue;
        };

        match command {
            Command::Like => writeln!(stdout, "{}", describe(&session.like()))?,
            Command::Dislike => writeln!(stdout, "{}", describe(&session.dislike()))?,
            Command::Drag(dx) => writeln!(stdout, "{}", describe(&session.drag_foremost(dx)))?,
            Command::Positive => {
                writeln!(stdout, "{}", session.queue().foremost().positive_review)?
            }
            Command::Negative => {
                writeln!(stdout, "{}", session.queue().foremost().negative_review)?
            }
            Command::Suggestions => {
                let suggestions = session.suggestions().list();
                if suggestions.is_empty() {
                    writeln!(stdout, "No suggestions yet.")?;
                }
                for suggestion in suggestions {
                    writeln!(stdout, "{}", render_suggestion(suggestion))?;
                }
            }
            Command::Refresh => session.refresh(),
            Command::Wait => {}
            Command::Help => writeln!(stdout, "{HELP}")?,
            Command::Quit => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("L"), Some(Command::Like));
        assert_eq!(parse_command(" dislike "), Some(Command::Dislike));
        assert_eq!(parse_command("-220.5"), Some(Command::Drag(-220.5)));
        assert_eq!(parse_command(""), Some(Command::Wait));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("inf"), None);
        assert_eq!(parse_command("swipe"), None);
    }

    #[test]
    fn test_render_card() {
        assert!(render_card(&Card::sentinel(None)).contains("Please check your internet connection"));

        let mut card = Card::sentinel(None);
        card.id = 2;
        card.name = Some("Liang's Thai Food".to_string());
        card.hours_display = Some("11:00am - 7:00pm".to_string());
        assert_eq!(render_card(&card), "[#2] Liang's Thai Food\n  Hours: 11:00am - 7:00pm");
    }

    #[test]
    fn test_render_suggestion_without_hours() {
        let suggestion = Suggestion {
            name: Some("Lazo Empanadas".to_string()),
            image_ref: None,
            website: Some("https://www.lazoempanadas.com/".to_string()),
            hours_display: None,
            address: Some("303 16th St Mall, Denver, CO 80202".to_string()),
            accepted_at: Utc::now(),
        };
        assert_eq!(
            render_suggestion(&suggestion),
            "Lazo Empanadas\n  Hours: n/a\n  Address: 303 16th St Mall, Denver, CO 80202\n  Site: https://www.lazoempanadas.com/"
        );
    }
}
