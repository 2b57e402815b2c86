//! The three control lines that terminate an event block.

/// A control line read from the helper's stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLine {
    /// Terminates an entry or exit block; reply `1` to continue, `0` to pause.
    Skip,
    /// Requests a replacement for argument `d`; reply does not pause the helper.
    SetArg(u8),
    /// Requests a replacement return value; reply does not pause the helper.
    SetRet,
}

impl ControlLine {
    /// Recognize a control line, or `None` if `line` is an ordinary event-body line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\n', '\r']);
        if line == "SKIP" {
            return Some(Self::Skip);
        }
        if line == "SETRET" {
            return Some(Self::SetRet);
        }
        if let Some(digit) = line.strip_prefix("SETARG") {
            return digit.parse::<u8>().ok().map(Self::SetArg);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_skip() {
        assert_eq!(ControlLine::parse("SKIP\n"), Some(ControlLine::Skip));
    }

    #[test]
    fn recognizes_setarg_with_index() {
        assert_eq!(ControlLine::parse("SETARG2"), Some(ControlLine::SetArg(2)));
    }

    #[test]
    fn recognizes_setret() {
        assert_eq!(ControlLine::parse("SETRET"), Some(ControlLine::SetRet));
    }

    #[test]
    fn ordinary_line_is_not_a_control_line() {
        assert_eq!(ControlLine::parse("E2read"), None);
    }
}
