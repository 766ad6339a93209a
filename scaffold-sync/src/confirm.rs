//! Interactive overwrite confirmation.

use std::io::{BufRead, Write};

use crate::error::SyncError;

/// Interpret one line of user input.
///
/// `yes`/`y` and `no`/`n` in any case, surrounding whitespace ignored.
/// Anything else is `None`.
pub fn parse_answer(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

/// Ask whether `path` should be overwritten, re-asking until the answer is
/// recognized.
///
/// End of input while waiting is [`SyncError::PromptClosed`].
pub fn prompt_overwrite<R, W>(input: &mut R, output: &mut W, path: &str) -> Result<bool, SyncError>
where
    R: BufRead,
    W: Write,
{
    let prompt_err = |source: std::io::Error| SyncError::Prompt {
        path: path.to_string(),
        source,
    };
    loop {
        write!(output, "\nWould you like to overwrite your changes in {path}? [yes/no]: ")
            .and_then(|()| output.flush())
            .map_err(prompt_err)?;

        let mut line = String::new();
        if input.read_line(&mut line).map_err(prompt_err)? == 0 {
            return Err(SyncError::PromptClosed {
                path: path.to_string(),
            });
        }
        if let Some(answer) = parse_answer(&line) {
            return Ok(answer);
        }
    }
}

/// Confirmation callback reading stdin and writing the question to stderr.
///
/// stdout stays reserved for the command's report.
pub fn terminal(path: &str) -> Result<bool, SyncError> {
    let stdin = std::io::stdin();
    let stderr = std::io::stderr();
    prompt_overwrite(&mut stdin.lock(), &mut stderr.lock(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("yes", Some(true))]
    #[case("Y\n", Some(true))]
    #[case("  YES  ", Some(true))]
    #[case("n", Some(false))]
    #[case("No\r\n", Some(false))]
    #[case("maybe", None)]
    #[case("", None)]
    #[case("yess", None)]
    fn parses_answers(#[case] input: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_answer(input), expected);
    }

    #[test]
    fn reasks_until_answer_is_valid() {
        let mut input = Cursor::new("what\n\nsure\nn\n");
        let mut output = Vec::new();
        let answer = prompt_overwrite(&mut input, &mut output, "src/lib.rs").unwrap();
        assert!(!answer);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(
            text.matches("Would you like to overwrite your changes in src/lib.rs? [yes/no]: ")
                .count(),
            4
        );
    }

    #[test]
    fn stops_reading_after_first_valid_answer() {
        let mut input = Cursor::new("y\nleftover\n");
        let mut output = Vec::new();
        assert!(prompt_overwrite(&mut input, &mut output, "a").unwrap());
        let mut rest = String::new();
        input.read_line(&mut rest).unwrap();
        assert_eq!(rest, "leftover\n");
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut input = Cursor::new("bogus\n");
        let mut output = Vec::new();
        let err = prompt_overwrite(&mut input, &mut output, "a.txt").unwrap_err();
        assert!(matches!(err, SyncError::PromptClosed { ref path } if path == "a.txt"));
    }
}
