//! Line-based prompts over any reader/writer pair

use anyhow::{Result, bail};
use colored::Colorize;
use latexlab_core::template::{Field, FieldType};
use latexlab_core::validate::coerce_field;
use latexlab_core::LatexlabError;
use serde_json::{Map, Value};
use std::fmt::Display;
use std::io::{BufRead, Write};

/// Input ended while a prompt was waiting for an answer
#[derive(Debug)]
pub struct InputClosed;

impl std::fmt::Display for InputClosed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("input ended before all questions were answered")
    }
}

impl std::error::Error for InputClosed {}

/// Asks questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print one line
    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(InputClosed.into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Free-text answer; empty input returns `default` when given
    pub fn ask(&mut self, question: &str, default: Option<&str>) -> Result<String> {
        match default {
            Some(d) if !d.is_empty() => write!(self.output, "{} [{}]: ", question, d.dimmed())?,
            _ => write!(self.output, "{}: ", question)?,
        }
        let answer = self.read_line()?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(default.unwrap_or_default().to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    /// Yes/no question, asked again until the answer is recognised
    pub fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "Y/n" } else { "y/N" };
        loop {
            write!(self.output, "{} [{}]: ", question, hint)?;
            let answer = self.read_line()?.trim().to_ascii_lowercase();
            match answer.as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => self.say(format!("{} Please answer y or n", "!".yellow()))?,
            }
        }
    }

    /// Pick one of `options` by number (1-based); returns the index
    pub fn select(&mut self, question: &str, options: &[String]) -> Result<usize> {
        if options.is_empty() {
            bail!("nothing to choose from");
        }

        self.say(question)?;
        for (i, option) in options.iter().enumerate() {
            self.say(format!("  {}. {}", i + 1, option))?;
        }

        loop {
            let answer = self.ask("Enter a number", None)?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => self.say(format!(
                    "{} Enter a number between 1 and {}",
                    "!".yellow(),
                    options.len()
                ))?,
            }
        }
    }

    /// Several lines, terminated by a line holding a single `.`
    pub fn multiline(&mut self, question: &str) -> Result<String> {
        self.say(format!("{} {}", question, "(end with a line containing only '.')".dimmed()))?;
        let mut lines = Vec::new();
        loop {
            let line = self.read_line()?;
            if line.trim() == "." {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// One item per line, terminated by an empty line
    pub fn list(&mut self, question: &str) -> Result<Vec<String>> {
        self.say(format!("{} {}", question, "(one per line, empty line to finish)".dimmed()))?;
        let mut items = Vec::new();
        loop {
            let line = self.read_line()?;
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            items.push(line.to_string());
        }
        Ok(items)
    }

    /// Ask for a field value until it validates
    ///
    /// Empty input falls back to the field default; an optional field
    /// without default yields `None`. The returned value is already coerced.
    pub fn field_value(&mut self, field: &Field) -> Result<Option<Value>> {
        if let Some(description) = &field.description {
            self.say(description.dimmed())?;
        }

        loop {
            let raw = match self.raw_field_input(field)? {
                Some(value) => value,
                None => match (&field.default, field.required) {
                    (Some(default), _) => default.clone(),
                    (None, false) => return Ok(None),
                    (None, true) => {
                        self.say(format!("{} {} is required", "!".yellow(), field.label))?;
                        continue;
                    }
                },
            };

            match coerce_field(field, &raw) {
                Ok(value) => return Ok(Some(value)),
                Err(e) if e.is_field_error() => {
                    self.say(format!("{} {}", "✗".red(), e))?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Raw answer for `field`; `None` means the user left it empty
    fn raw_field_input(&mut self, field: &Field) -> Result<Option<Value>> {
        let default_text = field.default.as_ref().map(display_value);
        let label = field.label.as_str();

        let value = match field.field_type {
            FieldType::Boolean => {
                let default = field
                    .default
                    .as_ref()
                    .and_then(|d| coerce_field(field, d).ok())
                    .and_then(|d| d.as_bool())
                    .unwrap_or(false);
                Some(Value::Bool(self.confirm(label, default)?))
            }
            FieldType::Choice => {
                let choices = field.choices.clone().unwrap_or_default();
                self.say(format!("{} ({})", label, choices.join(", ")))?;
                let answer = self.ask("Choice", default_text.as_deref())?;
                non_empty(answer).map(|a| match a.parse::<usize>() {
                    Ok(n) if (1..=choices.len()).contains(&n) && !choices.contains(&a) => {
                        Value::String(choices[n - 1].clone())
                    }
                    _ => Value::String(a),
                })
            }
            FieldType::Multiline => non_empty(self.multiline(label)?).map(Value::String),
            FieldType::List => {
                let items = self.list(label)?;
                (!items.is_empty()).then(|| Value::from(items))
            }
            FieldType::Dict => {
                let hint = "(key=value per line, empty line to finish)".dimmed();
                self.say(format!("{} {}", label, hint))?;
                let mut map = Map::new();
                loop {
                    let line = self.read_line()?;
                    let line = line.trim();
                    if line.is_empty() {
                        break;
                    }
                    match line.split_once('=') {
                        Some((k, v)) => {
                            map.insert(k.trim().to_string(), Value::String(v.trim().to_string()));
                        }
                        None => self.say(format!("{} Expected key=value", "!".yellow()))?,
                    }
                }
                (!map.is_empty()).then_some(Value::Object(map))
            }
            FieldType::String | FieldType::Integer | FieldType::Float | FieldType::Date => {
                non_empty(self.ask(label, default_text.as_deref())?).map(Value::String)
            }
        };

        Ok(value)
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Scalar values without JSON quoting
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Whether `err` means the user closed the input stream
pub fn is_input_closed(err: &anyhow::Error) -> bool {
    err.downcast_ref::<InputClosed>().is_some()
}

/// Field errors are handled inside the prompts; this is for everything else
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LatexlabError>() {
        Some(e) => e.to_string(),
        None => format!("{:#}", err),
    }
}
