//! The `Syscall` record and the fixed-column parsing that produces it.

use crate::TracerError;

/// Which half of a syscall this event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Entry,
    Exit,
}

/// The wire type tag of a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    Long,
    String,
    Unknown,
}

impl ArgType {
    fn from_digit(c: char) -> Self {
        match c {
            '0' => Self::Long,
            '1' => Self::String,
            _ => Self::Unknown,
        }
    }
}

/// One argument slot of an entry event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub ty: ArgType,
    pub value: String,
    pub size: u32,
}

/// A fully parsed syscall entry or exit point.
#[derive(Debug, Clone, PartialEq)]
pub struct Syscall {
    pub direction: Direction,
    pub name: String,
    pub args_amount: u8,
    pub args: [Option<Arg>; 6],
    pub ret: Option<String>,
}

/// Parse the first line of a block: `<E|R><count digit><name>`.
pub fn extract_syscall(header: &str) -> Result<(Direction, u8, String), TracerError> {
    let header = header.trim_end_matches(['\n', '\r']);
    let mut chars = header.chars();
    let dir_char = chars.next().ok_or(TracerError::TruncatedHeader)?;
    let count_char = chars.next().ok_or(TracerError::TruncatedHeader)?;

    let direction = match dir_char {
        'E' => Direction::Entry,
        'R' => Direction::Exit,
        other => return Err(TracerError::UnknownDirection(other)),
    };
    let args_amount = count_char.to_digit(10).unwrap_or(0) as u8;
    let name = chars.as_str().to_string();
    Ok((direction, args_amount, name))
}

/// Parse one argument line: columns 3/4 are position/type digits, 5..9 the
/// zero-padded size, 9.. the value text.
fn parse_arg_line(line: &str) -> Option<(usize, Arg)> {
    let line = line.trim_end_matches(['\n', '\r']);
    let bytes: Vec<char> = line.chars().collect();
    if bytes.len() < 9 {
        return None;
    }
    let pos = bytes[3].to_digit(10)? as usize;
    let ty = ArgType::from_digit(bytes[4]);
    let size_str: String = bytes[5..9].iter().collect();
    let size: u32 = size_str.parse().ok()?;
    let value: String = bytes[9..].iter().collect();
    Some((pos, Arg { ty, value, size }))
}

/// Assemble an `E` (entry) block: the header line plus one line per declared argument.
pub fn extract_entry(header: &str, arg_lines: &[String]) -> Result<Syscall, TracerError> {
    let (direction, args_amount, name) = extract_syscall(header)?;
    let mut args: [Option<Arg>; 6] = Default::default();
    for line in arg_lines {
        if let Some((pos, arg)) = parse_arg_line(line) {
            if pos < args.len() {
                args[pos] = Some(arg);
            }
        }
    }
    Ok(Syscall { direction, name, args_amount, args, ret: None })
}

/// Assemble an `R` (exit) block: the header line plus exactly one return-value line.
///
/// The return-value line carries its payload from column 3 onward, unlike an
/// entry argument line whose value starts at column 9.
pub fn extract_exit(header: &str, ret_line: &str) -> Result<Syscall, TracerError> {
    let (direction, args_amount, name) = extract_syscall(header)?;
    let ret_line = ret_line.trim_end_matches(['\n', '\r']);
    let ret = ret_line.chars().skip(3).collect::<String>();
    Ok(Syscall {
        direction,
        name,
        args_amount,
        args: Default::default(),
        ret: Some(ret),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_block_parses_two_args() {
        let header = "E2read";
        let lines = vec![
            "xxx010004abcd".to_string(),
            "xxx10000800000010".to_string(),
        ];
        let sc = extract_entry(header, &lines).unwrap();
        assert_eq!(sc.direction, Direction::Entry);
        assert_eq!(sc.name, "read");
        assert_eq!(sc.args_amount, 2);
        assert_eq!(sc.args[0].as_ref().unwrap().ty, ArgType::String);
        assert_eq!(sc.args[0].as_ref().unwrap().value, "abcd");
        assert_eq!(sc.args[0].as_ref().unwrap().size, 4);
        assert_eq!(sc.args[1].as_ref().unwrap().ty, ArgType::Long);
        assert_eq!(sc.args[1].as_ref().unwrap().value, "00000010");
        assert_eq!(sc.args[1].as_ref().unwrap().size, 8);
    }

    #[test]
    fn exit_block_parses_return_value() {
        let header = "R0read";
        let sc = extract_exit(header, "xxx42").unwrap();
        assert_eq!(sc.direction, Direction::Exit);
        assert_eq!(sc.ret.as_deref(), Some("42"));
    }

    #[test]
    fn unknown_direction_is_an_error() {
        assert!(matches!(
            extract_syscall("Xfoo"),
            Err(TracerError::UnknownDirection('X'))
        ));
    }

    #[test]
    fn truncated_header_is_an_error() {
        assert!(matches!(extract_syscall("E"), Err(TracerError::TruncatedHeader)));
    }
}
