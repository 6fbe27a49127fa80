//! Terminal form: reads one submission field by field and renders the outcome.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::detector::{AppFeatures, APP_NAME_PLACEHOLDER, MAX_RATING};
use crate::explain::ExplainError;
use crate::pipeline::{AssessError, Assessment};

/// Raw form values. The app name is validated later by the assessor.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub app_name: String,
    pub features: AppFeatures,
}

pub struct Form<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Form<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks for every field, showing the default in brackets. Returns `None` at end of input.
    pub fn read_submission(&mut self) -> io::Result<Option<Submission>> {
        let defaults = AppFeatures::default();
        writeln!(self.output, "Enter the app details below:")?;

        let Some(app_name) = self.ask("App Name", APP_NAME_PLACEHOLDER)? else {
            return Ok(None);
        };

        let Some(rating) = self.ask_parsed("Rating (0.0-5.0)", defaults.rating(), |v: &f64| {
            (0.0..=MAX_RATING).contains(v)
        })?
        else {
            return Ok(None);
        };
        let Some(rating_count) = self.ask_parsed("Rating Count", defaults.rating_count(), |_: &u64| true)? else {
            return Ok(None);
        };
        let Some(installs) = self.ask_parsed("Installs", defaults.installs(), |_: &u64| true)? else {
            return Ok(None);
        };
        let Some(max_installs) = self.ask_parsed("Maximum Installs", defaults.max_installs(), |_: &u64| true)?
        else {
            return Ok(None);
        };
        let Some(editor_choice) = self.ask_parsed(
            "Editor Choice (1 = Yes, 0 = No)",
            defaults.editor_choice_flag(),
            |v: &u8| *v <= 1,
        )?
        else {
            return Ok(None);
        };

        Ok(Some(Submission {
            app_name,
            features: AppFeatures::new(rating, rating_count, installs, max_installs, editor_choice == 1),
        }))
    }

    /// Yes/no question; anything but `y`/`yes` (or end of input) is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question), "n")?;
        Ok(matches!(
            answer.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    fn ask(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        write!(self.output, "{} [{}]: ", label, default)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            Ok(Some(default.to_string()))
        } else {
            Ok(Some(line.to_string()))
        }
    }

    fn ask_parsed<T>(&mut self, label: &str, default: T, accept: impl Fn(&T) -> bool) -> io::Result<Option<T>>
    where
        T: FromStr + ToString,
    {
        loop {
            let Some(raw) = self.ask(label, &default.to_string())? else {
                return Ok(None);
            };
            match raw.trim().parse::<T>() {
                Ok(value) if accept(&value) => return Ok(Some(value)),
                _ => writeln!(self.output, "  `{}` is not a valid value for {}", raw.trim(), label)?,
            }
        }
    }
}

/// Prints either the parsed explanation or the error for one submission.
pub fn render(out: &mut impl Write, outcome: &Result<Assessment, AssessError>, show_raw: bool) -> io::Result<()> {
    match outcome {
        Ok(assessment) => {
            if show_raw {
                writeln!(out, "Raw response:")?;
                writeln!(out, "{}", assessment.raw_text)?;
            }
            let json = serde_json::to_string_pretty(&assessment.explanation).map_err(io::Error::other)?;
            writeln!(out, "Final output:")?;
            writeln!(out, "{}", json)?;
        }
        Err(AssessError::Explain(
            e @ (ExplainError::Status { .. } | ExplainError::Timeout(_) | ExplainError::Transport(_)),
        )) => {
            writeln!(out, "Error: No valid response received from the text-generation service.")?;
            writeln!(out, "  {}", e)?;
        }
        Err(AssessError::Explain(e)) => {
            writeln!(out, "Error: {}", e)?;
            let raw = e.raw_text().filter(|raw| !raw.is_empty()).unwrap_or("No text received");
            writeln!(out, "Raw response:")?;
            writeln!(out, "{}", raw)?;
        }
        Err(e) => writeln!(out, "Error: {}", e)?,
    }
    Ok(())
}
