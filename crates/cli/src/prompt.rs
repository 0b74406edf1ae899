//! Interactive prompt collaborator.
//!
//! Commands only depend on the trait; the pipeline suspends on a prompt
//! until the user answers.

use anyhow::{bail, Context, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

pub trait Prompt: Send + Sync {
    /// Present `choices` as a list and return the selected entry.
    fn select(&self, message: &str, choices: &[String]) -> Result<String>;

    /// Ask for a free-form line of input.
    fn input(&self, message: &str) -> Result<String>;
}

/// Numbered-list prompt on stdout/stdin. Re-asks on invalid selection.
pub struct TerminalPrompt;

impl TerminalPrompt {
    pub fn new() -> Self {
        Self
    }

    /// A 0-byte read means the input stream is exhausted; erroring out
    /// here keeps a non-interactive invocation from re-asking forever.
    fn read_line(reader: &mut dyn BufRead) -> Result<String> {
        io::stdout().flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = reader
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            bail!("Input stream closed");
        }
        Ok(line.trim().to_string())
    }

    fn select_from(
        reader: &mut dyn BufRead,
        message: &str,
        choices: &[String],
    ) -> Result<String> {
        if choices.is_empty() {
            bail!("Nothing to select from");
        }

        loop {
            println!("{message}");
            for (idx, choice) in choices.iter().enumerate() {
                println!("  {}) {}", idx + 1, choice);
            }
            print!("> ");

            match Self::read_line(reader)?.parse::<usize>() {
                Ok(n) if (1..=choices.len()).contains(&n) => return Ok(choices[n - 1].clone()),
                _ => println!(
                    "Invalid choice, enter a number between 1 and {}",
                    choices.len()
                ),
            }
        }
    }

    fn input_from(reader: &mut dyn BufRead, message: &str) -> Result<String> {
        print!("{message} ");
        Self::read_line(reader)
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn select(&self, message: &str, choices: &[String]) -> Result<String> {
        Self::select_from(&mut io::stdin().lock(), message, choices)
    }

    fn input(&self, message: &str) -> Result<String> {
        Self::input_from(&mut io::stdin().lock(), message)
    }
}

/// Pre-seeded answer queue backing the tests.
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    fn next_answer(&self, message: &str) -> Result<String> {
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .with_context(|| format!("No scripted answer left for prompt: {message}"))
    }
}

impl Prompt for ScriptedPrompt {
    fn select(&self, message: &str, choices: &[String]) -> Result<String> {
        let answer = self.next_answer(message)?;
        if !choices.contains(&answer) {
            bail!("Scripted answer `{answer}` is not among the choices");
        }
        Ok(answer)
    }

    fn input(&self, message: &str) -> Result<String> {
        self.next_answer(message)
    }
}
