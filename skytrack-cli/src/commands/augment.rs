//! `skytrack augment` - synthesise attitude, velocity and procedures.

use clap::{Args, ValueEnum};
use skytrack::augmentation::{Aspects, FlightAugmentation, Procedures};
use skytrack::config::ConfigFile;

use super::common::{load_flight, save_flight, FlightLocation};
use crate::error::CliError;

/// Procedure selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProcedureArg {
    /// Engine start, flaps and gear retraction from timestamp 0
    Start,
    /// Approach configuration, gear extension and flare before the last sample
    Landing,
}

/// Aspect selection for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AspectArg {
    Pitch,
    Bank,
    Heading,
    Velocity,
    Engine,
    Light,
}

impl From<ProcedureArg> for Procedures {
    fn from(arg: ProcedureArg) -> Self {
        match arg {
            ProcedureArg::Start => Procedures::START,
            ProcedureArg::Landing => Procedures::LANDING,
        }
    }
}

impl From<AspectArg> for Aspects {
    fn from(arg: AspectArg) -> Self {
        match arg {
            AspectArg::Pitch => Aspects::PITCH,
            AspectArg::Bank => Aspects::BANK,
            AspectArg::Heading => Aspects::HEADING,
            AspectArg::Velocity => Aspects::VELOCITY,
            AspectArg::Engine => Aspects::ENGINE,
            AspectArg::Light => Aspects::LIGHT,
        }
    }
}

#[derive(Debug, Args)]
pub struct AugmentArgs {
    /// Flight document path or stored flight id
    pub flight: FlightLocation,

    /// Where to write the augmented flight (defaults to overwriting the input)
    #[arg(long, short)]
    pub output: Option<FlightLocation>,

    /// Procedures to run, comma separated (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub procedures: Vec<ProcedureArg>,

    /// Aspects to synthesise, comma separated (default: all)
    #[arg(long, value_enum, value_delimiter = ',')]
    pub aspects: Vec<AspectArg>,

    /// Augment every aircraft instead of only the user aircraft
    #[arg(long)]
    pub all_aircraft: bool,
}

pub fn run(args: AugmentArgs, config: &ConfigFile) -> Result<(), CliError> {
    let mut flight = load_flight(&args.flight, config)?;

    let mut augmentation = FlightAugmentation::new(config.augmentation_config());
    if !args.procedures.is_empty() {
        augmentation.set_procedures(selection(&args.procedures));
    }
    if !args.aspects.is_empty() {
        augmentation.set_aspects(selection(&args.aspects));
    }

    let user_index = flight.user_aircraft_index();
    for (index, aircraft) in flight.aircraft_mut().iter_mut().enumerate() {
        if !args.all_aircraft && index != user_index {
            continue;
        }
        let summary = augmentation.augment(aircraft);
        println!(
            "Aircraft {}: {} position samples, {} key frames",
            aircraft.id(),
            summary.position_samples,
            summary.key_frames
        );
    }

    let output = args.output.unwrap_or(args.flight);
    let written = save_flight(&output, &mut flight, config)?;
    println!("Wrote {}", written);
    Ok(())
}

/// Union of the selected flags.
fn selection<A, F>(args: &[A]) -> F
where
    A: Copy + Into<F>,
    F: FromIterator<F>,
{
    args.iter().map(|&arg| arg.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_unions_flags() {
        let procedures: Procedures = selection(&[ProcedureArg::Landing]);
        assert_eq!(procedures, Procedures::LANDING);

        let aspects: Aspects = selection(&[AspectArg::Pitch, AspectArg::Bank, AspectArg::Pitch]);
        assert_eq!(aspects, Aspects::PITCH | Aspects::BANK);
    }
}
