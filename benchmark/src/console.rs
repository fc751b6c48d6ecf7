//! @ai:module:intent Operator-facing prompts and messages
//! @ai:module:layer presentation
//! @ai:module:public_api Console, TerminalConsole, ScriptedConsole
//! @ai:module:stateless false

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};

/// @ai:intent Source of operator input plus a sink for operator messages
pub trait Console: Send {
    /// @ai:intent Show a prompt and read one line
    /// @ai:post Ok(None) means input has ended and the session should stop
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>>;

    /// @ai:intent Show a line of output to the operator
    fn say(&mut self, message: &str) -> io::Result<()>;
}

/// @ai:intent Console over a line reader and a writer, normally stdin and stdout
pub struct TerminalConsole<I = BufReader<Stdin>, O = Stdout> {
    input: I,
    output: O,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::with_io(BufReader::new(io::stdin()), io::stdout())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: BufRead + Send, O: Write + Send> TerminalConsole<I, O> {
    pub fn with_io(input: I, output: O) -> Self {
        Self { input, output }
    }
}

impl<I: BufRead + Send, O: Write + Send> Console for TerminalConsole<I, O> {
    /// @ai:post bytes that are not UTF-8 become U+FFFD instead of failing the read
    /// @ai:effects io
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.output.write_all(message.as_bytes())?;
        self.output.flush()?;

        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&line);
        Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// @ai:effects io
    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)?;
        self.output.flush()
    }
}

/// @ai:intent Console fed from a fixed list of answers, keeping a transcript
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    prompts: Vec<String>,
    messages: Vec<String>,
}

impl ScriptedConsole {
    /// @ai:intent Create a console that answers prompts in order, then reports end of input
    /// @ai:effects pure
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Answers not consumed by the session.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.prompts.push(message.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.messages.push(message.to_string());
        Ok(())
    }
}
