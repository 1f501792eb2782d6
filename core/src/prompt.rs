//! Interactive questions and messages, behind a trait so the workflow can be
//! driven without a terminal.

use std::collections::VecDeque;
use std::io::BufRead;
use std::io::Write;

use tracing::warn;

use crate::error::GitHelperError;
use crate::error::Result;

pub trait Prompter {
    /// Show `question` and return the next line of input, trimmed.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Show one line of output.
    fn say(&mut self, message: &str) -> Result<()>;
}

/// Line-oriented prompter over a reader/writer pair, usually stdin and stdout.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(GitHelperError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

/// Prompter that replays canned answers and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Questions and messages in the order they were shown.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    #[cfg(test)]
    pub(crate) fn remaining_answers(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, question: &str) -> Result<String> {
        self.transcript.push(question.to_string());
        let answer = self.answers.pop_front().ok_or(GitHelperError::InputClosed)?;
        Ok(answer.trim().to_string())
    }

    fn say(&mut self, message: &str) -> Result<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}

/// Ask until the answer is empty, `y` or `n` (any case). Empty means `default`.
pub fn ask_yes_no(prompter: &mut dyn Prompter, question: &str, default: bool) -> Result<bool> {
    let hint = if default { "Y|n" } else { "y|N" };
    let question = format!("{question} [{hint}] ");
    loop {
        let answer = prompter.ask(&question)?.to_lowercase();
        match answer.as_str() {
            "" => return Ok(default),
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {
                warn!(%answer, "unrecognised yes/no answer");
                prompter.say("Enter 'y' for yes, 'n' for no, or nothing for the default")?;
            }
        }
    }
}

/// Ask once; an empty answer means `default`.
pub fn ask_with_default(
    prompter: &mut dyn Prompter,
    question: &str,
    default: &str,
) -> Result<String> {
    let answer = prompter.ask(question)?;
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer)
    }
}
