use std::fmt;
use std::str::FromStr;

/// How the command line(s) following a mode line are executed.
///
/// - `Single`: run one command and wait for it.
/// - `Concurrent`: run one command in the background and keep reading.
/// - `Piped`: run two commands, the first one's stdout feeding the second
///   one's stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Single,
    Concurrent,
    Piped,
}

impl fmt::Display for ExecMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecMode::Single => "SINGLE",
            ExecMode::Concurrent => "CONCURRENT",
            ExecMode::Piped => "PIPED",
        };
        f.write_str(s)
    }
}

/// Mode tokens are matched exactly (case-sensitive, no surrounding
/// whitespace). `PIPE` is accepted as an alias of `PIPED`.
impl FromStr for ExecMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINGLE" => Ok(ExecMode::Single),
            "CONCURRENT" => Ok(ExecMode::Concurrent),
            "PIPED" | "PIPE" => Ok(ExecMode::Piped),
            other => Err(format!(
                "unknown mode: {other:?} (expected SINGLE, CONCURRENT, PIPED or PIPE)"
            )),
        }
    }
}

/// Classification of a line read while the session expects a control line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLine {
    /// The termination token; ends the session.
    Terminate,
    /// A recognised mode line.
    Mode(ExecMode),
    /// Anything else; ignored.
    Unrecognized,
}

impl ControlLine {
    pub fn classify(line: &str, termination_token: &str) -> Self {
        if line == termination_token {
            return ControlLine::Terminate;
        }
        match line.parse::<ExecMode>() {
            Ok(mode) => ControlLine::Mode(mode),
            Err(_) => ControlLine::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_tokens_parse_exactly() {
        assert_eq!("SINGLE".parse::<ExecMode>(), Ok(ExecMode::Single));
        assert_eq!("CONCURRENT".parse::<ExecMode>(), Ok(ExecMode::Concurrent));
        assert_eq!("PIPED".parse::<ExecMode>(), Ok(ExecMode::Piped));
        assert_eq!("PIPE".parse::<ExecMode>(), Ok(ExecMode::Piped));

        assert!("single".parse::<ExecMode>().is_err());
        assert!(" SINGLE".parse::<ExecMode>().is_err());
        assert!("SINGLE ".parse::<ExecMode>().is_err());
        assert!("".parse::<ExecMode>().is_err());
    }

    #[test]
    fn classify_control_lines() {
        assert_eq!(ControlLine::classify("EXIT", "EXIT"), ControlLine::Terminate);
        assert_eq!(
            ControlLine::classify("PIPE", "EXIT"),
            ControlLine::Mode(ExecMode::Piped)
        );
        assert_eq!(ControlLine::classify("exit", "EXIT"), ControlLine::Unrecognized);
        assert_eq!(ControlLine::classify("echo hi", "EXIT"), ControlLine::Unrecognized);
    }
}
