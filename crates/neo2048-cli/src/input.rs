//! Turning typed text into engine directions.

use anyhow::{Result, bail};
use neo2048_core::Direction;

/// One interactive command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

/// Parse one interactive token: `w/a/s/d`, or `up/left/down/right`,
/// plus `q`/`quit` to leave. Case-insensitive.
pub fn parse_command(token: &str) -> Result<Command> {
    let command = match token.trim().to_ascii_lowercase().as_str() {
        "w" | "up" => Command::Move(Direction::Up),
        "a" | "left" => Command::Move(Direction::Left),
        "s" | "down" => Command::Move(Direction::Down),
        "d" | "right" => Command::Move(Direction::Right),
        "q" | "quit" | "exit" => Command::Quit,
        other => bail!("unrecognised command {other:?} (use w/a/s/d or quit)"),
    };
    Ok(command)
}

/// Parse a compact move script such as `"LLUR d"`: one letter per move
/// from `U/D/L/R`, case-insensitive, whitespace and commas ignored.
pub fn parse_script(script: &str) -> Result<Vec<Direction>> {
    script
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .enumerate()
        .map(|(idx, c)| match c.to_ascii_uppercase() {
            'U' => Ok(Direction::Up),
            'D' => Ok(Direction::Down),
            'L' => Ok(Direction::Left),
            'R' => Ok(Direction::Right),
            other => bail!("invalid move {other:?} at position {idx} (expected U/D/L/R)"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wasd_and_words() {
        assert_eq!(parse_command("w").unwrap(), Command::Move(Direction::Up));
        assert_eq!(parse_command(" A ").unwrap(), Command::Move(Direction::Left));
        assert_eq!(parse_command("down").unwrap(), Command::Move(Direction::Down));
        assert_eq!(parse_command("Right").unwrap(), Command::Move(Direction::Right));
        assert_eq!(parse_command("q").unwrap(), Command::Quit);
        assert!(parse_command("jump").is_err());
    }

    #[test]
    fn parses_move_scripts() {
        assert_eq!(
            parse_script("LLur, d").unwrap(),
            vec![
                Direction::Left,
                Direction::Left,
                Direction::Up,
                Direction::Right,
                Direction::Down
            ]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn script_error_names_position() {
        let err = parse_script("LRX").unwrap_err();
        assert!(err.to_string().contains("position 2"));
    }
}
