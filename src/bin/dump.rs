use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::{ColoredString, Colorize};
use daikin2lirc::{
    protocol::{frame::Frames, messages::{decode, encode, Message00, Message42, MessageC5, Message}, pulse::{self, Pulse}},
    logging,
    store::StateStore
};


/// Show the frames a state encodes to
///
/// Prints each frame in hex, its decoded message and the bits in the order they are sent.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// State file to dump. The default state is used when missing
    state_file: Option<PathBuf>,
}


#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    let args = Args::parse();

    let state = match args.state_file {
        Some(path) => StateStore::new(path).load().await,
        None => Default::default(),
    };

    println!("{state:?}");

    let frames = encode(&state)?;

    fn coloured(id: u8, line: String) -> ColoredString {
        match id {
            MessageC5::ID => line.on_cyan().bright_white(),
            Message42::ID => line.on_purple().bright_white(),
            Message00::ID => line.on_green().bright_white(),
            _ => line.on_black()
        }
    }

    fn bits(frame: &[u8]) -> String {
        pulse::encode(frame)
            .map(|p| if p == Pulse::One { '1' } else { '0' })
            .collect::<Vec<_>>()
            .chunks(8)
            .map(|byte| byte.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }

    let Frames { one, two, three } = &frames;

    let line = format!("{:02x}: {:02x?}", one.message_id(), one.as_bytes());
    println!("{}", coloured(one.message_id(), line));
    println!("    {:?}", one.unpack_as::<MessageC5>()?);
    println!("    {}", bits(one.as_bytes()));

    let line = format!("{:02x}: {:02x?}", two.message_id(), two.as_bytes());
    println!("{}", coloured(two.message_id(), line));
    println!("    {:?}", two.unpack_as::<Message42>()?);
    println!("    {}", bits(two.as_bytes()));

    let line = format!("{:02x}: {:02x?}", three.message_id(), three.as_bytes());
    println!("{}", coloured(three.message_id(), line));
    println!("    {:?}", three.unpack_as::<Message00>()?);
    println!("    {}", bits(three.as_bytes()));

    let decoded = decode(&frames)?;
    if decoded != state {
        println!("{}", format!("decoded state differs: {decoded:?}").on_red().bright_white());
    }

    Ok(())
}
