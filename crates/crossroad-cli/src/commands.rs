//! Console command parsing.

use crossroad_monitor::{Signal, VehicleCategory};
use std::str::FromStr;

use crate::error::CliError;

/// One line of operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Vehicle(Signal),
    Fault,
    Stats(Option<VehicleCategory>),
    Errors,
    State,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  start                      Start monitoring
  stop                       Stop monitoring
  reset                      Clear all data and reactivate
  vehicle <category> <id>    Signal a vehicle (Bicycle/Car/Scooter)
  fault                      Signal a camera error
  stats [category]           Display statistics (all, or one category)
  errors                     Display the error count
  state                      Display the current state
  help                       Show this help
  quit | exit                Leave the console";

fn no_more(mut words: std::str::SplitWhitespace<'_>) -> Result<(), CliError> {
    match words.next() {
        Some(extra) => Err(CliError::UnexpectedArgument(extra.to_string())),
        None => Ok(()),
    }
}

impl FromStr for Command {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CliError::MissingArgument("command"));
        };

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "stop" => Command::Stop,
            "reset" => Command::Reset,
            "fault" | "error" => Command::Fault,
            "errors" => Command::Errors,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "vehicle" => {
                let category = words.next().ok_or(CliError::MissingArgument("category"))?;
                let id = words.next().ok_or(CliError::MissingArgument("id"))?;
                Command::Vehicle(Signal::parse_vehicle(category, id)?)
            }
            "stats" => match words.next() {
                Some(category) => Command::Stats(Some(category.parse()?)),
                None => Command::Stats(None),
            },
            other => return Err(CliError::UnknownCommand(other.to_string())),
        };

        no_more(words)?;
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossroad_monitor::MonitorError;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_simple_verbs() -> TestResult {
        assert_eq!("start".parse::<Command>()?, Command::Start);
        assert_eq!("  STOP ".parse::<Command>()?, Command::Stop);
        assert_eq!("reset".parse::<Command>()?, Command::Reset);
        assert_eq!("fault".parse::<Command>()?, Command::Fault);
        assert_eq!("errors".parse::<Command>()?, Command::Errors);
        assert_eq!("exit".parse::<Command>()?, Command::Quit);
        Ok(())
    }

    #[test]
    fn parse_vehicle() -> TestResult {
        assert_eq!(
            "vehicle car C-12".parse::<Command>()?,
            Command::Vehicle(Signal::vehicle(VehicleCategory::Car, "C-12"))
        );
        Ok(())
    }

    #[test]
    fn parse_vehicle_rejects_bad_input() {
        assert!(matches!(
            "vehicle".parse::<Command>(),
            Err(CliError::MissingArgument("category"))
        ));
        assert!(matches!(
            "vehicle Car".parse::<Command>(),
            Err(CliError::MissingArgument("id"))
        ));
        assert!(matches!(
            "vehicle Truck T1".parse::<Command>(),
            Err(CliError::Monitor(MonitorError::UnknownCategory(_)))
        ));
        assert!(matches!(
            "vehicle Car C1 extra".parse::<Command>(),
            Err(CliError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn parse_stats() -> TestResult {
        assert_eq!("stats".parse::<Command>()?, Command::Stats(None));
        assert_eq!(
            "stats scooter".parse::<Command>()?,
            Command::Stats(Some(VehicleCategory::Scooter))
        );
        Ok(())
    }

    #[test]
    fn parse_unknown() {
        assert!(matches!(
            "launch".parse::<Command>(),
            Err(CliError::UnknownCommand(verb)) if verb == "launch"
        ));
        assert!(matches!("".parse::<Command>(), Err(CliError::MissingArgument(_))));
    }
}
