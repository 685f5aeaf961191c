use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::core::{RawChild, RawProfile};
use crate::error::PlannerError;

use super::ProfileSource;

/// Asks for a profile question by question. Range checks are left to the
/// validator; only unparseable answers are rejected here.
pub struct InteractivePrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractivePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn answer(&mut self, prompt: &str) -> Result<String, PlannerError> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PlannerError::Prompt {
                prompt: prompt.to_string(),
                reason: "unexpected end of input".to_string(),
            });
        }
        Ok(line.trim().to_string())
    }

    fn ask<T: FromStr>(&mut self, prompt: &str) -> Result<T, PlannerError> {
        let answer = self.answer(prompt)?;
        answer.replace(',', "").parse().map_err(|_| PlannerError::Prompt {
            prompt: prompt.to_string(),
            reason: format!("'{answer}' is not a number"),
        })
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool, PlannerError> {
        let answer = self.answer(prompt)?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn ask_child(&mut self, number: usize) -> Result<RawChild, PlannerError> {
        writeln!(self.output, "\nChild {number} details:")?;
        Ok(RawChild {
            current_age: Some(self.ask("  Current age")?),
            school_fee: Some(self.ask("  Annual school fee today")?),
            school_fee_increase: Some(self.ask("  School fee increase per step-up (%)")?),
            fee_increase_frequency: Some(self.ask("  Years between fee increases")?),
            graduation_fee: Some(self.ask("  Graduation fee today")?),
            marriage_cost: Some(self.ask("  Marriage cost today")?),
            marriage_age: Some(self.ask("  Expected marriage age")?),
        })
    }
}

impl<R: BufRead, W: Write> ProfileSource for InteractivePrompt<R, W> {
    fn read_profile(&mut self) -> Result<RawProfile, PlannerError> {
        writeln!(self.output, "=== Retirement planning input ===")?;

        let mut raw = RawProfile {
            current_age: Some(self.ask("Current age")?),
            retirement_age: Some(self.ask("Expected retirement age")?),
            life_expectancy: Some(self.ask("Life expectancy")?),
            current_corpus: Some(self.ask("Current corpus (savings and investments)")?),
            pre_retirement_return: Some(self.ask("Expected pre-retirement return (% p.a.)")?),
            post_retirement_return: Some(self.ask("Expected post-retirement return (% p.a.)")?),
            inflation: Some(self.ask("Expected inflation (% p.a.)")?),
            monthly_expenses: Some(self.ask("Current monthly household expenses")?),
            ..RawProfile::default()
        };

        while self.confirm("\nAdd a child? (y/n)")? {
            let child = self.ask_child(raw.children.len() + 1)?;
            raw.children.push(child);
        }

        Ok(raw)
    }
}
