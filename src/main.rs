use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use daikin2lirc::{
    command::{self, Command},
    config::Config,
    controller::Controller,
    lirc::RemoteConfig,
    logging,
    protocol::{messages::encode, state::{AcMode, ControlState, FanMode}}
};


/// Control a Daikin split system through lircd
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the remote definition for the stored state with changes applied,
    /// without storing or sending anything
    Render(Changes),

    /// Print the stored state
    Show,

    /// Apply changes to the stored state and send it
    Set(Changes),

    /// Handle a climate control message, e.g. `mode/set cool`
    Message {
        /// Topic relative to the device prefix
        topic: String,

        payload: String,
    },

    /// Replace the stored state with a preset and send it
    Preset {
        #[arg(value_enum)]
        preset: Preset,

        /// Setpoint for heat and cool
        #[arg(default_value_t = 21)]
        temperature: i32,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Preset {
    Heat,
    Cool,
    Morning,
}

#[derive(clap::Args, Debug)]
struct Changes {
    /// on or off
    #[arg(long)]
    power: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<i32>,

    /// Raise the temperature by a degree
    #[arg(long, conflicts_with_all = ["temperature", "down"])]
    up: bool,

    /// Lower the temperature by a degree
    #[arg(long, conflicts_with = "temperature")]
    down: bool,

    /// AUTO, DRY, COOL, HEAT or FAN
    #[arg(long)]
    mode: Option<String>,

    /// AUTO, SILENT, ONE, TWO, THREE, FOUR or FIVE
    #[arg(long)]
    fan: Option<String>,

    /// both, vertical, horizontal or off
    #[arg(long)]
    swing: Option<String>,

    #[arg(long)]
    powerful: Option<bool>,

    #[arg(long)]
    economy: Option<bool>,

    #[arg(long)]
    comfort: Option<bool>,
}

impl Changes {
    fn commands(&self) -> Vec<Command> {
        let mut commands = vec![];

        if let Some(power) = &self.power {
            commands.push(Command::Power(power == "on"));
        }
        if let Some(temperature) = self.temperature {
            commands.push(Command::Temperature(temperature));
        }
        if self.up {
            commands.push(Command::TemperatureUp);
        }
        if self.down {
            commands.push(Command::TemperatureDown);
        }
        if let Some(mode) = &self.mode {
            commands.push(Command::Mode(AcMode::from_name(&mode.to_uppercase())));
        }
        if let Some(fan) = &self.fan {
            commands.push(Command::Fan(FanMode::from_name(&fan.to_uppercase())));
        }
        if let Some(swing) = &self.swing {
            commands.push(command::swing(swing));
        }
        if let Some(on) = self.powerful {
            commands.push(Command::Powerful(on));
        }
        if let Some(on) = self.economy {
            commands.push(Command::Economy(on));
        }
        if let Some(on) = self.comfort {
            commands.push(Command::Comfort(on));
        }

        commands
    }
}


#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let args = Args::parse();

    let controller = Controller::from_config(&args.config);

    match args.action {
        Action::Render(changes) => {
            let mut state = controller.state().await;
            for command in changes.commands() {
                command.apply(&mut state);
            }

            let frames = encode(&state)?;
            print!("{}", RemoteConfig::from(&args.config).render(&frames));
        },
        Action::Show => {
            print_state(&controller.state().await)?;
        },
        Action::Set(changes) => {
            let state = controller.update(&changes.commands()).await?;
            print_state(&state)?;
        },
        Action::Message { topic, payload } => {
            let commands = command::from_topic(&topic, &payload);
            if commands.is_empty() {
                anyhow::bail!("nothing to do for {topic}: {payload}");
            }

            let state = controller.update(&commands).await?;
            print_state(&state)?;
        },
        Action::Preset { preset, temperature } => {
            let state = match preset {
                Preset::Heat => command::heat(temperature),
                Preset::Cool => command::cool(temperature),
                Preset::Morning => command::morning(),
            };

            let state = controller.set_state(state).await?;
            print_state(&state)?;
        },
    }

    Ok(())
}

fn print_state(state: &ControlState) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(state)?);
    Ok(())
}
