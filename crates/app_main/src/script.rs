//! Line-based input script for the console host
//!
//! One command per line, each turning into one or more ticks:
//!
//! ```text
//! press select      # one tick with the button pressed
//! hold down 5       # pressed, then repeat-held for the remaining ticks
//! tap 40 30         # touch at screen coordinates
//! row 2             # touch the third visible list row
//! cmd delete        # touch a command bar button
//! wait 180          # idle ticks
//! show              # print the screen
//! quit
//! ```

use anyhow::{anyhow, bail, Result};
use app_core::{Button, Command};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Press(Button),
    Hold(Button, u32),
    Tap(i32, i32),
    Row(usize),
    Command(Command),
    Wait(u32),
    Show,
    Quit,
}

fn parse_command(name: &str) -> Option<Command> {
    Command::MENU
        .into_iter()
        .find(|c| c.label().eq_ignore_ascii_case(name))
}

fn number<T: std::str::FromStr>(word: Option<&str>, what: &str) -> Result<T> {
    let word = word.ok_or_else(|| anyhow!("missing {}", what))?;
    word.parse()
        .map_err(|_| anyhow!("invalid {}: {}", what, word))
}

fn button(word: Option<&str>) -> Result<Button> {
    let word = word.ok_or_else(|| anyhow!("missing button"))?;
    Button::from_name(word).ok_or_else(|| anyhow!("unknown button: {}", word))
}

/// Parse one script line; blank lines and `#` comments yield `None`
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>> {
    let line = line.split('#').next().unwrap_or("").trim();
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "press" => ScriptCommand::Press(button(words.next())?),
        "hold" => {
            let held = button(words.next())?;
            let ticks = match words.next() {
                Some(n) => number(Some(n), "tick count")?,
                None => 1,
            };
            ScriptCommand::Hold(held, ticks)
        }
        "tap" => ScriptCommand::Tap(number(words.next(), "x")?, number(words.next(), "y")?),
        "row" => ScriptCommand::Row(number(words.next(), "row")?),
        "cmd" => {
            let name = words.next().ok_or_else(|| anyhow!("missing command"))?;
            let command =
                parse_command(name).ok_or_else(|| anyhow!("unknown command: {}", name))?;
            ScriptCommand::Command(command)
        }
        "wait" => ScriptCommand::Wait(number(words.next(), "tick count")?),
        "show" => ScriptCommand::Show,
        "quit" | "exit" => ScriptCommand::Quit,
        other => bail!("unknown verb: {}", other),
    };

    if let Some(extra) = words.next() {
        bail!("unexpected argument: {}", extra);
    }
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line("press Select").unwrap(), Some(ScriptCommand::Press(Button::Select)));
        assert_eq!(parse_line("hold down 5").unwrap(), Some(ScriptCommand::Hold(Button::Down, 5)));
        assert_eq!(parse_line("hold r").unwrap(), Some(ScriptCommand::Hold(Button::R, 1)));
        assert_eq!(parse_line("tap 40 30").unwrap(), Some(ScriptCommand::Tap(40, 30)));
        assert_eq!(parse_line("row 2").unwrap(), Some(ScriptCommand::Row(2)));
        assert_eq!(
            parse_line("cmd DELETE").unwrap(),
            Some(ScriptCommand::Command(Command::Delete))
        );
        assert_eq!(parse_line("wait 180").unwrap(), Some(ScriptCommand::Wait(180)));
        assert_eq!(parse_line("  show  # print").unwrap(), Some(ScriptCommand::Show));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # nothing here").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("press").is_err());
        assert!(parse_line("press touch").is_err());
        assert!(parse_line("tap 40").is_err());
        assert!(parse_line("row -1").is_err());
        assert!(parse_line("cmd none").is_err());
        assert!(parse_line("jump").is_err());
        assert!(parse_line("show now").is_err());
    }
}
