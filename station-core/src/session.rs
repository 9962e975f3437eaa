//! The interactive entry loop.
//!
//! Each iteration asks for a date, then the five measurements in a fixed
//! order. Humidity outside 0-100 only produces a warning. Precipitation
//! outside 0-100 discards the whole entry, but is checked only once all five
//! measurements have been collected.

use std::io;

use chrono::NaiveDate;
use log::debug;
use thiserror::Error;

use crate::{
    date::{DATE_PLACEHOLDER, parse_date, to_iso, validate_date},
    model::{Field, Observation},
    prompt::Prompt,
    store::RecordStore,
};

/// Typed at the date prompt to end the session.
pub const STOP: &str = "stop";

/// Recoverable input problems. The message is shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EntryError {
    #[error("Oops, please use 'yyyy-mm-dd' format...")]
    InvalidFormat,

    #[error("Oops, date is in the future...")]
    FutureDate,

    #[error("Oops, {} must be a number...", .field.short_name())]
    NotANumber { field: Field },

    #[error("Oops, {} must be between 0-100 only...", .field.short_name())]
    OutOfRange { field: Field },
}

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    AwaitingDate,
    /// Collecting `field` for the entry dated `date`.
    AwaitingMeasurement {
        date: String,
        field: Field,
        draft: Observation,
    },
    Commit {
        date: String,
        draft: Observation,
    },
    Terminated,
}

/// Resolve the raw date answer against the placeholder and today's date.
pub fn accept_date(input: &str, placeholder: &str, today: NaiveDate) -> Result<String, EntryError> {
    if input.is_empty() && placeholder != DATE_PLACEHOLDER {
        return Ok(placeholder.to_string());
    }

    if !validate_date(input) {
        return Err(EntryError::InvalidFormat);
    }

    let date = parse_date(input).map_err(|_| EntryError::InvalidFormat)?;
    if date > today {
        return Err(EntryError::FutureDate);
    }

    Ok(input.to_string())
}

/// Parse a measurement. Non-finite values are rejected since they cannot be stored as JSON.
pub fn parse_measurement(field: Field, input: &str) -> Result<f64, EntryError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(EntryError::NotANumber { field })
}

pub fn check_percent(field: Field, value: f64) -> Result<(), EntryError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(EntryError::OutOfRange { field })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub committed: usize,
    pub discarded: usize,
}

pub struct Session<'a, P> {
    prompt: P,
    store: &'a mut RecordStore,
    today: NaiveDate,
    state: State,
    summary: SessionSummary,
}

impl<'a, P: Prompt> Session<'a, P> {
    pub fn new(prompt: P, store: &'a mut RecordStore, today: NaiveDate) -> Self {
        Self {
            prompt,
            store,
            today,
            state: State::AwaitingDate,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// Today's date until it has an entry, then the literal `yyyy-mm-dd`.
    pub fn placeholder(&self) -> String {
        let today = to_iso(self.today);
        if self.store.contains(&today) {
            DATE_PLACEHOLDER.to_string()
        } else {
            today
        }
    }

    /// Drive the state machine until the user stops or input runs out.
    pub fn run(&mut self) -> io::Result<SessionSummary> {
        while self.state != State::Terminated {
            self.step()?;
        }
        debug!(
            "Session finished: {} committed, {} discarded",
            self.summary.committed, self.summary.discarded
        );
        Ok(self.summary)
    }

    /// Perform exactly one transition.
    pub fn step(&mut self) -> io::Result<()> {
        let current = std::mem::replace(&mut self.state, State::Terminated);

        self.state = match current {
            State::AwaitingDate => self.on_date()?,
            State::AwaitingMeasurement { date, field, draft } => {
                self.on_measurement(date, field, draft)?
            }
            State::Commit { date, draft } => self.on_commit(date, draft)?,
            State::Terminated => State::Terminated,
        };

        Ok(())
    }

    pub fn into_prompt(self) -> P {
        self.prompt
    }

    fn on_date(&mut self) -> io::Result<State> {
        let placeholder = self.placeholder();

        let Some(input) = self.prompt.ask(Field::Date, Some(&placeholder))? else {
            debug!("Input closed at date prompt");
            return Ok(State::Terminated);
        };

        if input == STOP {
            return Ok(State::Terminated);
        }

        match accept_date(&input, &placeholder, self.today) {
            Ok(date) => {
                debug!("Accepted date {date}");
                Ok(State::AwaitingMeasurement {
                    date,
                    field: Field::Temperature,
                    draft: Observation::default(),
                })
            }
            Err(err) => {
                self.prompt.notify(&err.to_string())?;
                Ok(State::AwaitingDate)
            }
        }
    }

    fn on_measurement(
        &mut self,
        date: String,
        field: Field,
        mut draft: Observation,
    ) -> io::Result<State> {
        let Some(input) = self.prompt.ask(field, None)? else {
            debug!("Input closed while entering {date}, entry discarded");
            self.summary.discarded += 1;
            return Ok(State::Terminated);
        };

        let value = match parse_measurement(field, &input) {
            Ok(value) => value,
            Err(err) => {
                self.prompt.notify(&err.to_string())?;
                return Ok(State::AwaitingMeasurement { date, field, draft });
            }
        };

        if field == Field::Humidity {
            if let Err(err) = check_percent(field, value) {
                self.prompt.notify(&err.to_string())?;
            }
        }

        draft.set(field, value);

        Ok(match field.next() {
            Some(next) => State::AwaitingMeasurement { date, field: next, draft },
            None => State::Commit { date, draft },
        })
    }

    fn on_commit(&mut self, date: String, draft: Observation) -> io::Result<State> {
        if let Err(err) = check_percent(Field::Precipitation, draft.precipitation) {
            self.prompt.notify(&err.to_string())?;
            debug!("Discarded entry for {date}");
            self.summary.discarded += 1;
            return Ok(State::AwaitingDate);
        }

        self.store.set(date, draft);
        self.summary.committed += 1;
        Ok(State::AwaitingDate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::LinePrompt;
    use std::io::Cursor;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()
    }

    /// Run a session over scripted input; returns the summary and everything printed.
    fn run_script(store: &mut RecordStore, script: &str) -> (SessionSummary, String) {
        let prompt = LinePrompt::new(Cursor::new(script.to_string()), Vec::new());
        let mut session = Session::new(prompt, store, today());
        let summary = session.run().unwrap();
        assert_eq!(session.state(), &State::Terminated);
        let output = String::from_utf8(session.into_prompt().into_output()).unwrap();
        (summary, output)
    }

    #[test]
    fn records_a_full_entry() {
        let mut store = RecordStore::new();
        let (summary, _) =
            run_script(&mut store, "2025-01-01\n22.5\n80\n10\n24.0\n5.0\nstop\n");

        assert_eq!(summary, SessionSummary { committed: 1, discarded: 0 });
        assert_eq!(
            store.get("2025-01-01"),
            Some(&Observation {
                temperature: 22.5,
                humidity: 80.0,
                precipitation: 10.0,
                heat_index: 24.0,
                wind_speed: 5.0,
            })
        );
    }

    #[test]
    fn prompts_in_fixed_order() {
        let mut store = RecordStore::new();
        let (_, output) = run_script(&mut store, "2025-01-01\n1\n2\n3\n4\n5\nstop\n");

        let expected = [
            "Enter date (2025-01-10): ",
            " Enter temperature (°C): ",
            " Enter Rel. Humidity (%): ",
            " Enter precipitation (%): ",
            " Enter heat index (°C): ",
            " Enter wind speed (km/hr): ",
        ];
        let mut cursor = 0;
        for prompt in expected {
            let found = output[cursor..].find(prompt).unwrap_or_else(|| panic!("missing {prompt:?}"));
            cursor += found + prompt.len();
        }
    }

    #[test]
    fn precipitation_of_exactly_100_is_accepted() {
        let mut store = RecordStore::new();
        run_script(&mut store, "2025-01-01\n20\n50\n100\n21\n3\nstop\n");

        assert_eq!(store.get("2025-01-01").map(|o| o.precipitation), Some(100.0));
    }

    #[test]
    fn precipitation_above_100_discards_entry_after_all_prompts() {
        let mut store = RecordStore::new();
        let (summary, output) =
            run_script(&mut store, "2025-01-01\n20\n50\n100.1\n21\n3\nstop\n");

        assert!(store.is_empty());
        assert_eq!(summary.discarded, 1);
        assert!(output.contains(" Enter wind speed (km/hr): "));
        assert!(output.contains("Oops, precipitation (%) must be between 0-100 only..."));
        let warning = output.find("Oops, precipitation").unwrap();
        assert!(output.find(" Enter wind speed").unwrap() < warning);
    }

    #[test]
    fn negative_precipitation_is_rejected() {
        let mut store = RecordStore::new();
        run_script(&mut store, "2025-01-01\n20\n50\n-1\n21\n3\nstop\n");
        assert!(store.is_empty());
    }

    #[test]
    fn humidity_out_of_range_only_warns() {
        let mut store = RecordStore::new();
        let (summary, output) =
            run_script(&mut store, "2025-01-01\n20\n120\n10\n21\n3\nstop\n");

        assert!(output.contains("Oops, RH (%) must be between 0-100 only..."));
        assert_eq!(summary.committed, 1);
        assert_eq!(store.get("2025-01-01").map(|o| o.humidity), Some(120.0));
    }

    #[test]
    fn future_date_is_rejected_and_reprompted() {
        let mut store = RecordStore::new();
        let (summary, output) = run_script(&mut store, "2025-01-11\nstop\n");

        assert!(store.is_empty());
        assert_eq!(summary, SessionSummary::default());
        assert!(output.contains("Oops, date is in the future..."));
        assert_eq!(output.matches("Enter date").count(), 2);
    }

    #[test]
    fn today_is_not_in_the_future() {
        let mut store = RecordStore::new();
        run_script(&mut store, "2025-01-10\n1\n2\n3\n4\n5\nstop\n");
        assert!(store.contains("2025-01-10"));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut store = RecordStore::new();
        let (_, output) = run_script(&mut store, "2025-02-30\n01/01/2025\nstop\n");

        assert!(store.is_empty());
        assert_eq!(output.matches("Oops, please use 'yyyy-mm-dd' format...").count(), 2);
    }

    #[test]
    fn empty_answer_takes_today_then_placeholder_switches() {
        let mut store = RecordStore::new();
        let (_, output) = run_script(&mut store, "\n1\n2\n3\n4\n5\n\nstop\n");

        assert!(store.contains("2025-01-10"));
        assert!(output.contains("Enter date (yyyy-mm-dd): "));
        // The second empty answer has no real default to fall back on.
        assert!(output.contains("Oops, please use 'yyyy-mm-dd' format..."));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn existing_entry_for_today_forces_explicit_date() {
        let mut store = RecordStore::new();
        store.set("2025-01-10", Observation::default());

        let prompt = LinePrompt::new(Cursor::new(String::new()), Vec::new());
        let session = Session::new(prompt, &mut store, today());
        assert_eq!(session.placeholder(), DATE_PLACEHOLDER);
    }

    #[test]
    fn non_numeric_value_is_asked_again() {
        let mut store = RecordStore::new();
        let (_, output) =
            run_script(&mut store, "2025-01-01\nwarm\n22\n80\n10\nnan\n24\n5\nstop\n");

        assert!(output.contains("Oops, temperature must be a number..."));
        assert!(output.contains("Oops, heat index must be a number..."));
        assert_eq!(output.matches(" Enter temperature (°C): ").count(), 2);
        assert_eq!(store.get("2025-01-01").map(|o| o.heat_index), Some(24.0));
    }

    #[test]
    fn stop_is_case_sensitive() {
        let mut store = RecordStore::new();
        let (_, output) = run_script(&mut store, "STOP\nstop\n");
        assert!(output.contains("Oops, please use 'yyyy-mm-dd' format..."));
    }

    #[test]
    fn end_of_input_mid_entry_discards_it() {
        let mut store = RecordStore::new();
        let (summary, _) = run_script(&mut store, "2025-01-01\n22\n80\n");

        assert!(store.is_empty());
        assert_eq!(summary.discarded, 1);
    }

    #[test]
    fn reentering_a_date_overwrites_it() {
        let mut store = RecordStore::new();
        run_script(
            &mut store,
            "2025-01-01\n1\n2\n3\n4\n5\n2025-01-01\n9\n8\n7\n6\n5\nstop\n",
        );

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("2025-01-01").map(|o| o.temperature), Some(9.0));
    }

    #[test]
    fn stepping_walks_every_state() {
        let mut store = RecordStore::new();
        let prompt = LinePrompt::new(Cursor::new("2025-01-02\n1\n2\n3\n4\n5\n"), Vec::new());
        let mut session = Session::new(prompt, &mut store, today());

        session.step().unwrap();
        assert!(matches!(
            session.state(),
            State::AwaitingMeasurement { field: Field::Temperature, .. }
        ));
        for _ in 0..5 {
            session.step().unwrap();
        }
        assert!(matches!(session.state(), State::Commit { .. }));
        session.step().unwrap();
        assert_eq!(session.state(), &State::AwaitingDate);
        session.step().unwrap();
        assert_eq!(session.state(), &State::Terminated);
        drop(session);

        assert!(store.contains("2025-01-02"));
    }

    #[test]
    fn accept_date_rules() {
        assert_eq!(accept_date("", "2025-01-10", today()), Ok("2025-01-10".into()));
        assert_eq!(accept_date("", DATE_PLACEHOLDER, today()), Err(EntryError::InvalidFormat));
        assert_eq!(accept_date("2026-01-01", "2025-01-10", today()), Err(EntryError::FutureDate));
        assert_eq!(accept_date("1999-12-31", "2025-01-10", today()), Ok("1999-12-31".into()));
    }

    #[test]
    fn percent_bounds_are_inclusive() {
        assert!(check_percent(Field::Humidity, 0.0).is_ok());
        assert!(check_percent(Field::Humidity, 100.0).is_ok());
        assert!(check_percent(Field::Humidity, -0.1).is_err());
        assert!(check_percent(Field::Precipitation, f64::NAN).is_err());
    }

    #[test]
    fn parse_measurement_accepts_signed_and_spaced_values() {
        assert_eq!(parse_measurement(Field::Temperature, " -4.5 "), Ok(-4.5));
        assert_eq!(parse_measurement(Field::WindSpeed, "12"), Ok(12.0));
        assert!(parse_measurement(Field::WindSpeed, "inf").is_err());
        assert!(parse_measurement(Field::WindSpeed, "").is_err());
    }
}
