use std::path::PathBuf;

use clap::Args;

pub const DEFAULT_STATE_FILE: &str = "data/config.json";
pub const DEFAULT_STAGING_FILE: &str = "/tmp/daikin-pi.lircd.conf";
pub const DEFAULT_INCLUDE_DIR: &str = "/etc/lirc/lircd.conf.d/";
pub const DEFAULT_REMOTE_NAME: &str = "daikin-pi";
pub const DEFAULT_SIGNAL_NAME: &str = "dynamic-signal";
pub const DEFAULT_INSTALL_COMMAND: &str = "sudo cp";
pub const DEFAULT_RESTART_COMMAND: &str = "sudo systemctl restart lircd";


/// Where state lives and how the LIRC daemon is driven.
///
/// Every option can also be given through the environment.
#[derive(Args, Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the last state sent to the unit
    #[arg(long, env = "DAIKIN_STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    pub state_file: PathBuf,

    /// Where the generated remote definition is written before being installed
    #[arg(long, env = "DAIKIN_STAGING_FILE", default_value = DEFAULT_STAGING_FILE)]
    pub staging_file: PathBuf,

    /// lircd include directory the remote definition is installed into
    #[arg(long, env = "DAIKIN_INCLUDE_DIR", default_value = DEFAULT_INCLUDE_DIR)]
    pub include_dir: PathBuf,

    /// Name of the generated remote
    #[arg(long, env = "DAIKIN_REMOTE_NAME", default_value = DEFAULT_REMOTE_NAME)]
    pub remote_name: String,

    /// Name of the single signal of the generated remote
    #[arg(long, env = "DAIKIN_SIGNAL_NAME", default_value = DEFAULT_SIGNAL_NAME)]
    pub signal_name: String,

    /// Command that copies the staged file into the include directory
    /// (the two paths are appended)
    #[arg(long, env = "DAIKIN_INSTALL_COMMAND", default_value = DEFAULT_INSTALL_COMMAND)]
    pub install_command: String,

    /// Command that restarts lircd so it picks up the new definition
    #[arg(long, env = "DAIKIN_RESTART_COMMAND", default_value = DEFAULT_RESTART_COMMAND)]
    pub restart_command: String,

    /// Command that sends the signal once.
    /// Defaults to `irsend SEND_ONCE <remote> <signal>`
    #[arg(long, env = "DAIKIN_SEND_COMMAND")]
    pub send_command: Option<String>,
}

impl Config {
    pub fn install_command(&self) -> Vec<String> {
        let mut command = split_command(&self.install_command);
        command.push(self.staging_file.display().to_string());
        command.push(self.include_dir.display().to_string());
        command
    }

    pub fn restart_command(&self) -> Vec<String> {
        split_command(&self.restart_command)
    }

    pub fn send_command(&self) -> Vec<String> {
        match &self.send_command {
            Some(command) => split_command(command),
            None => vec![
                "irsend".to_string(),
                "SEND_ONCE".to_string(),
                self.remote_name.clone(),
                self.signal_name.clone()
            ]
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: DEFAULT_STATE_FILE.into(),
            staging_file: DEFAULT_STAGING_FILE.into(),
            include_dir: DEFAULT_INCLUDE_DIR.into(),
            remote_name: DEFAULT_REMOTE_NAME.to_string(),
            signal_name: DEFAULT_SIGNAL_NAME.to_string(),
            install_command: DEFAULT_INSTALL_COMMAND.to_string(),
            restart_command: DEFAULT_RESTART_COMMAND.to_string(),
            send_command: None,
        }
    }
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}


#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct TestArgs {
        #[command(flatten)]
        config: Config
    }

    #[test]
    fn test_defaults_match_cli() {
        let args = TestArgs::parse_from(["daikin2lirc"]);

        assert_eq!(args.config, Config::default());
    }

    #[test]
    fn test_commands() {
        let config = Config::default();

        assert_eq!(
            config.install_command(),
            vec!["sudo", "cp", "/tmp/daikin-pi.lircd.conf", "/etc/lirc/lircd.conf.d/"]
        );
        assert_eq!(config.restart_command(), vec!["sudo", "systemctl", "restart", "lircd"]);
        assert_eq!(config.send_command(), vec!["irsend", "SEND_ONCE", "daikin-pi", "dynamic-signal"]);

        let config = Config {
            remote_name: "bedroom".to_string(),
            ..Config::default()
        };
        assert_eq!(config.send_command(), vec!["irsend", "SEND_ONCE", "bedroom", "dynamic-signal"]);

        let args = TestArgs::parse_from(["daikin2lirc", "--send-command", "echo sent"]);
        assert_eq!(args.config.send_command(), vec!["echo", "sent"]);
    }
}
