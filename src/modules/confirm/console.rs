// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use std::io::{self, BufRead, Write};

use tracing::warn;

use super::Confirm;

/// Something a line of user input can be read from.
pub trait LineSource {
    /// Reads one line into `buf`, returning the number of bytes read (0 at end of input).
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineSource for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        self.lock().read_line(buf)
    }
}

impl<T: AsRef<[u8]>> LineSource for io::Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

/// Terminal prompt answering with `y` or `n`.
pub struct ConsoleConfirm<I: LineSource = io::Stdin, W: Write = io::Stdout> {
    input: I,
    output: W,
}

impl ConsoleConfirm {
    pub fn new() -> Self {
        Self {
            input: io::stdin(),
            output: io::stdout(),
        }
    }
}

impl Default for ConsoleConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: LineSource, W: Write> ConsoleConfirm<I, W> {
    pub fn with_io(input: I, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str, accept: &str, reject: &str) -> io::Result<bool> {
        writeln!(self.output, "{}", text)?;
        loop {
            write!(self.output, "\n\n{}[y] / {}[n]: ", accept, reject)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // input closed
                return Ok(false);
            }
            match line.trim_end_matches(['\r', '\n']).to_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Invalid input")?,
            }
        }
    }
}

impl<I: LineSource, W: Write> Confirm for ConsoleConfirm<I, W> {
    fn ask(&mut self, text: &str, accept: &str, reject: &str) -> bool {
        self.prompt(text, accept, reject).unwrap_or_else(|e| {
            warn!("Confirmation prompt failed, treating as rejected: {}", e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (bool, String) {
        let mut confirm = ConsoleConfirm::with_io(Cursor::new(input.to_string()), Vec::new());
        let answer = confirm.ask("Send this?", "Send", "Cancel");
        let output = String::from_utf8(confirm.into_output()).unwrap();
        (answer, output)
    }

    #[test]
    fn accepts_y_and_n_case_insensitively() {
        assert!(run("Y\n").0);
        assert!(run("y\r\n").0);
        assert!(!run("N\n").0);
    }

    #[test]
    fn padded_answers_are_invalid() {
        let (answer, output) = run("  y  \nn\n");
        assert!(!answer);
        assert_eq!(output.matches("Invalid input").count(), 1);
    }

    #[test]
    fn reprompts_on_invalid_input() {
        let (answer, output) = run("maybe\nyes\ny\n");
        assert!(answer);
        assert_eq!(output.matches("Invalid input").count(), 2);
        assert_eq!(output.matches("Send[y] / Cancel[n]: ").count(), 3);
        assert!(output.starts_with("Send this?\n"));
    }

    #[test]
    fn end_of_input_rejects() {
        let (answer, output) = run("what\n");
        assert!(!answer);
        assert_eq!(output.matches("Invalid input").count(), 1);

        assert!(!run("").0);
    }
}
