//! Line-based console prompts with bounded re-asking.
//!
//! Every question is asked at most `MAX_ATTEMPTS` times; a malformed answer
//! re-asks, running out of attempts (or of input) is an `Error::InvalidInput`.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

pub const MAX_ATTEMPTS: usize = 5;

const YES: [&str; 2] = ["y", "yes"];
const NO: [&str; 2] = ["n", "no"];

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        self.output.flush()?;
        Ok(())
    }

    /// Prints `label` and reads one trimmed line.
    pub fn ask_line(&mut self, label: &str) -> Result<String> {
        self.say(label)?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InvalidInput("input closed".into()));
        }
        Ok(line.trim().to_owned())
    }

    /// Asks until `parse` accepts the answer.
    pub fn ask_with<T>(&mut self, label: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
        for _ in 0..MAX_ATTEMPTS {
            let line = self.ask_line(label)?;
            if let Some(value) = parse(&line) {
                return Ok(value);
            }
        }
        Err(Error::InvalidInput(format!("no valid answer to '{}' after {} attempts", label, MAX_ATTEMPTS)))
    }

    pub fn ask_positive_f64(&mut self, label: &str) -> Result<f64> {
        self.ask_with(label, |line| {
            line.parse::<f64>().ok().filter(|x| x.is_finite() && *x > 0.0)
        })
    }

    pub fn ask_positive_u64(&mut self, label: &str) -> Result<u64> {
        self.ask_with(label, |line| line.parse::<u64>().ok().filter(|&x| x > 0))
    }

    /// A menu answer in `1..=options`.
    pub fn ask_choice(&mut self, label: &str, options: usize) -> Result<usize> {
        self.ask_with(label, |line| {
            line.parse::<usize>().ok().filter(|&x| (1..=options).contains(&x))
        })
    }

    pub fn ask_bool(&mut self, label: &str) -> Result<bool> {
        self.ask_with(label, |line| {
            let answer = line.to_lowercase();
            if YES.contains(&answer.as_str()) {
                Some(true)
            } else if NO.contains(&answer.as_str()) {
                Some(false)
            } else {
                None
            }
        })
    }

    /// Comma separated layer sizes including the input layer, confirmed by
    /// the user before they are returned.
    pub fn ask_layer_sizes(&mut self) -> Result<Vec<usize>> {
        for _ in 0..MAX_ATTEMPTS {
            let sizes = self.ask_with(
                "Comma separated layer sizes (including input layer)",
                parse_layer_sizes,
            )?;
            let summary = format!(
                "Your layer sizes are {}.\nInput layer = {} neurons\nOutput layer = {} neurons\n\
                 Amount of hidden layers = {} layers\n\nOk? (Y,N)",
                sizes.iter().map(|s| s.to_string()).collect::<Vec<_>>().join(","),
                sizes[0],
                sizes[sizes.len() - 1],
                sizes.len() - 2,
            );
            if self.ask_bool(&summary)? {
                return Ok(sizes);
            }
        }
        Err(Error::InvalidInput("layer sizes were never confirmed".into()))
    }
}

/// `"784, 16,10"` → `[784, 16, 10]`. At least two sizes, none zero.
pub fn parse_layer_sizes(line: &str) -> Option<Vec<usize>> {
    let sizes = line.split(',')
        .map(|part| part.trim().parse::<usize>().ok().filter(|&s| s > 0))
        .collect::<Option<Vec<_>>>()?;
    if sizes.len() < 2 { None } else { Some(sizes) }
}
