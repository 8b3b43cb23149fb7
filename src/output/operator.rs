//! Operator console
//!
//! Everything the enrollment flow says or asks goes through `Operator`, so
//! the flow runs the same against a terminal, a pipe or a test script.

use crate::utils::progress;
use std::io::{self, BufRead, IsTerminal, StdinLock, Write};

/// Console used by the enrollment flow
pub trait Operator {
    /// Progress line, e.g. `Opening connection to host:443...`
    fn progress(&mut self, message: &str);

    fn success(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn failure(&mut self, message: &str);

    /// Unstyled output line
    fn line(&mut self, text: &str);

    /// Ask for one line of input. `None` means the input is exhausted.
    fn ask(&mut self, prompt: &str, default: &str) -> io::Result<Option<String>>;
}

/// Operator backed by stdout and a line reader
pub struct TerminalOperator<R> {
    input: R,
    interactive: bool,
}

impl TerminalOperator<StdinLock<'static>> {
    /// Operator reading from stdin, prompting with dialoguer on a terminal
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal() && console::Term::stderr().is_term();
        Self {
            input: stdin.lock(),
            interactive,
        }
    }
}

impl<R: BufRead> TerminalOperator<R> {
    /// Operator reading answers from `input`, never using terminal prompts
    pub fn new(input: R) -> Self {
        Self {
            input,
            interactive: false,
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead> Operator for TerminalOperator<R> {
    fn progress(&mut self, message: &str) {
        progress::print_progress(message);
    }

    fn success(&mut self, message: &str) {
        progress::print_pass(message);
    }

    fn warning(&mut self, message: &str) {
        progress::print_warning(message);
    }

    fn failure(&mut self, message: &str) {
        progress::print_fail(message);
    }

    fn line(&mut self, text: &str) {
        println!("{}", text);
    }

    fn ask(&mut self, prompt: &str, default: &str) -> io::Result<Option<String>> {
        if self.interactive {
            let answer = dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
            return Ok(Some(answer));
        }

        print!("{}: [{}] ", prompt, default);
        io::stdout().flush()?;
        self.read_line()
    }
}
