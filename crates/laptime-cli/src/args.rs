//! Lap arguments shared by the `predict` and `encode` subcommands.

use clap::Args;

use laptime_lib::LapRecord;

/// One lap, entered as flags. Defaults describe a typical soft-tyre lap.
#[derive(Args, Debug, Clone)]
pub struct LapArgs {
    /// Lap number within the race (1-based).
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub lap_number: i64,

    /// Laps completed on the current tyre set.
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    pub tyre_life: f64,

    /// Sector 1 time in seconds.
    #[arg(long = "sector1", default_value_t = 31.4, allow_negative_numbers = true)]
    pub sector1_time: f64,

    /// Sector 2 time in seconds.
    #[arg(long = "sector2", default_value_t = 42.1, allow_negative_numbers = true)]
    pub sector2_time: f64,

    /// Sector 3 time in seconds.
    #[arg(long = "sector3", default_value_t = 25.8, allow_negative_numbers = true)]
    pub sector3_time: f64,

    /// Tyre compound: Soft, Medium or Hard (case-sensitive).
    #[arg(long, default_value = "Soft")]
    pub compound: String,
}

impl From<LapArgs> for LapRecord {
    fn from(args: LapArgs) -> Self {
        LapRecord {
            lap_number: args.lap_number,
            tyre_life: args.tyre_life,
            sector1_time: args.sector1_time,
            sector2_time: args.sector2_time,
            sector3_time: args.sector3_time,
            compound: args.compound,
        }
    }
}
