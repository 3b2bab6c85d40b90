use console::Term;
use dialoguer::{Input, Select};

use crate::{
    error::AppError,
    timeframe::{SelectionError, Timeframe, parse_minutes, parse_since},
};

const MENU: [&str; 2] = ["Last X minutes", "Specific time range"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    LastMinutes,
    Since,
}

impl MenuChoice {
    pub fn from_index(index: usize) -> Result<Self, SelectionError> {
        match index {
            0 => Ok(Self::LastMinutes),
            1 => Ok(Self::Since),
            other => Err(SelectionError::UnknownOption((other + 1).to_string())),
        }
    }

    const fn question(self) -> &'static str {
        match self {
            Self::LastMinutes => "Enter timeframe in minutes",
            Self::Since => "Enter start time (YYYY-mm-dd HH:MM)",
        }
    }

    pub fn answer(self, input: &str) -> Result<Timeframe, SelectionError> {
        match self {
            Self::LastMinutes => parse_minutes(input).map(Timeframe::LastMinutes),
            Self::Since => parse_since(input).map(Timeframe::Since),
        }
    }
}

pub fn check_domain(domain: &str) -> Result<(), SelectionError> {
    if domain.trim().is_empty() {
        return Err(SelectionError::MissingDomain);
    }
    Ok(())
}

/// Interactive questions for whatever was not given on the command line.
///
/// Drawn on stderr so stdout only ever carries the report. Needs a terminal;
/// scripted runs pass `--domain` and `--minutes`/`--since` instead.
pub struct Console {
    term: Term,
}

impl Console {
    pub fn stderr() -> Self {
        Self {
            term: Term::stderr(),
        }
    }

    pub fn domain(&self) -> Result<String, AppError> {
        let domain: String = Input::new()
            .with_prompt("Enter the domain to analyse")
            .validate_with(|d: &String| check_domain(d))
            .interact_text_on(&self.term)?;
        Ok(domain.trim().to_owned())
    }

    pub fn timeframe(&self) -> Result<Timeframe, AppError> {
        let index = Select::new()
            .with_prompt("Timeframe")
            .items(&MENU)
            .default(0)
            .interact_on(&self.term)?;
        let choice = MenuChoice::from_index(index)?;
        let answer: String = Input::new()
            .with_prompt(choice.question())
            .validate_with(|a: &String| choice.answer(a).map(drop))
            .interact_text_on(&self.term)?;
        Ok(choice.answer(&answer)?)
    }
}
