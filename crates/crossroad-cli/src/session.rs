//! Operator console loop.
//!
//! Each command is applied to the monitor and reported with a message chosen
//! by comparing the state before and after the call.

use colored::Colorize;
use crossroad_monitor::{Clock, MonitorState, Signal, TrafficMonitor, VehicleCategory};
use serde_json::json;
use std::io::{BufRead, Write};

use crate::commands::{Command, HELP};
use crate::error::CliError;

/// Whether the console keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<'a, C: Clock, W: Write> {
    monitor: &'a TrafficMonitor<C>,
    out: W,
    json: bool,
}

impl<'a, C: Clock, W: Write> Session<'a, C, W> {
    pub fn new(monitor: &'a TrafficMonitor<C>, out: W, json: bool) -> Self {
        Self { monitor, out, json }
    }

    /// Read commands until end of input or `quit`.
    pub fn run<R: BufRead>(&mut self, input: R, prompt: bool) -> Result<(), CliError> {
        if prompt {
            writeln!(self.out, "Crossroad traffic monitor. Type 'help' for commands.")?;
            write!(self.out, "> ")?;
            self.out.flush()?;
        }
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if self.handle_line(&line)? == Flow::Quit {
                return Ok(());
            }
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    /// Evaluate the periodic reset, then parse and execute one line.
    ///
    /// Parse errors are reported to the operator and do not end the session.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow, CliError> {
        if self.monitor.check_periodic_reset() {
            writeln!(self.out, "Periodic reset triggered!")?;
        }

        match line.parse::<Command>() {
            Ok(command) => self.execute(command),
            Err(err) => {
                tracing::debug!(line = line, error = %err, "Rejected console input");
                writeln!(self.out, "{} {err}", "Invalid input:".red())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow, CliError> {
        match command {
            Command::Start => self.start()?,
            Command::Stop => self.stop()?,
            Command::Reset => {
                self.monitor.reset();
                writeln!(
                    self.out,
                    "Monitoring reset. System is now Active. Error count and stats cleared."
                )?;
            }
            Command::Vehicle(signal) => self.vehicle(signal)?,
            Command::Fault => self.fault()?,
            Command::Stats(category) => self.stats(category)?,
            Command::Errors => {
                let count = self.monitor.fault_count();
                if self.json {
                    self.print_json(&json!({ "fault_count": count }))?;
                } else {
                    writeln!(self.out, "Error Count: {count}")?;
                }
            }
            Command::State => {
                let state = self.monitor.current_state();
                if self.json {
                    self.print_json(&json!({ "state": state }))?;
                } else {
                    writeln!(self.out, "State: {state}")?;
                }
            }
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => {
                writeln!(self.out, "Exiting program.")?;
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    fn start(&mut self) -> Result<(), CliError> {
        let message = if self.monitor.start() {
            "Monitoring started."
        } else {
            match self.monitor.current_state() {
                MonitorState::Active => "Monitoring is already active.",
                MonitorState::Error => "Cannot start from Error state.",
                MonitorState::Stopped => "Cannot start from Stopped state.",
                MonitorState::Init => "Cannot start. Already in Init or invalid state.",
            }
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CliError> {
        let message = if self.monitor.stop() {
            "Monitoring stopped."
        } else {
            match self.monitor.current_state() {
                MonitorState::Stopped => "Monitoring is already stopped.",
                MonitorState::Init => "Monitoring not started yet. Cannot stop.",
                MonitorState::Error => "Cannot stop from Error state.",
                MonitorState::Active => "Cannot stop (Unexpected)",
            }
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn vehicle(&mut self, signal: Signal) -> Result<(), CliError> {
        let before = self.monitor.current_state();
        let faults_before = self.monitor.fault_count();
        self.monitor.on_signal(signal);
        let faults_after = self.monitor.fault_count();

        let message = match before {
            MonitorState::Init | MonitorState::Stopped => {
                "Signal ignored (system not Active)."
            }
            MonitorState::Error => {
                "Vehicle signal counted as an error (Error state). Not added to stats."
            }
            MonitorState::Active if faults_after > faults_before => {
                "Vehicle capacity exhausted. Signal counted as an error."
            }
            MonitorState::Active => "Vehicle signal processed.",
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn fault(&mut self) -> Result<(), CliError> {
        let before = self.monitor.current_state();
        self.monitor.on_signal(Signal::Fault);

        let message = match before {
            MonitorState::Init | MonitorState::Stopped => {
                "Error signal ignored (system not Active)."
            }
            MonitorState::Active => "Error signaled: system now in Error state.",
            MonitorState::Error => "Error signaled again while already in Error state.",
        };
        writeln!(self.out, "{message}")?;
        Ok(())
    }

    fn stats(&mut self, category: Option<VehicleCategory>) -> Result<(), CliError> {
        let Some(category) = category else {
            let snapshot = self.monitor.snapshot();
            if self.json {
                return self.print_json(&snapshot);
            }
            writeln!(self.out, "--- Statistics (Alphabetical) ---")?;
            return self.print_lines(&snapshot.lines, "(No vehicles recorded)");
        };

        let lines = self.monitor.statistics(category);
        if self.json {
            return self.print_json(&json!({ "category": category, "lines": lines }));
        }
        writeln!(self.out, "--- {category} Statistics ---")?;
        self.print_lines(&lines, &format!("(No {} recorded)", plural(category)))
    }

    fn print_lines(&mut self, lines: &[String], empty: &str) -> Result<(), CliError> {
        if lines.is_empty() {
            writeln!(self.out, "{empty}")?;
        }
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn print_json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> Result<(), CliError> {
        let text = serde_json::to_string_pretty(value)?;
        writeln!(self.out, "{text}")?;
        Ok(())
    }
}

fn plural(category: VehicleCategory) -> &'static str {
    match category {
        VehicleCategory::Bicycle => "bicycles",
        VehicleCategory::Car => "cars",
        VehicleCategory::Scooter => "scooters",
    }
}
