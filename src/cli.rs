use std::process::ExitCode;

use clap::Parser;
use console::style;

use crate::config::AppConfig;
use crate::error::Result;
use crate::inventory::{Inventory, RunaboveClient};
use crate::select::{select_instance, PromptChoice};
use crate::ssh::{keys, SshClient, SshConfig};

#[derive(Parser)]
#[command(name = "courir", version)]
#[command(about = "SSH into a RunAbove instance by name")]
pub struct Cli {
    /// Instance name where you want to connect to
    #[arg(short, long)]
    pub name: String,

    /// Config file for courir
    #[arg(short, long, default_value = "~/.courir")]
    pub configfile: String,

    /// Turn on debug logging
    #[arg(long, overrides_with = "no_debug")]
    pub debug: bool,

    /// Turn off debug logging (default)
    #[arg(long = "no-debug", overrides_with = "debug")]
    pub no_debug: bool,

    /// Execute this command instead of opening a shell
    #[arg(short, long)]
    pub execute: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<ExitCode> {
        let config = AppConfig::load(&self.configfile)?;

        let inventory = RunaboveClient::new(&config)?;
        let matches = inventory.instances_by_name(&self.name).await?;

        let instance = match select_instance(&matches, &self.name, &mut PromptChoice)? {
            Some(instance) => instance,
            // "0) None, I will filter more": not an error
            None => return Ok(ExitCode::SUCCESS),
        };

        let key_path = keys::resolve_key(&config.key_path, &instance.ssh_key_name)?;
        let ssh_config = SshConfig::new(&config.ssh_user, key_path);
        let ports = config.ssh_ports()?;

        let client = SshClient::connect(&instance.ip, &ports, &ssh_config).await?;
        let (host, port) = client.endpoint();
        tracing::debug!("session established with {}:{}", host, port);

        match &self.execute {
            Some(command) => {
                let output = client.exec(command).await?;

                print!("{}", output.stdout);

                if output.success() {
                    Ok(ExitCode::SUCCESS)
                } else {
                    eprint!("{}", output.stderr);
                    Ok(ExitCode::FAILURE)
                }
            }
            None => {
                println!(
                    "{} {} {}",
                    style("→").bold(),
                    style(&instance.name).white().bold(),
                    style(format!("({})", instance.ip)).dim()
                );

                client.shell().await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execute_flag_is_optional() {
        let cli = Cli::parse_from(["courir", "--name", "web"]);

        assert_eq!(cli.name, "web");
        assert_eq!(cli.configfile, "~/.courir");
        assert!(cli.execute.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::parse_from(["courir", "-n", "web", "-c", "/tmp/conf", "-e", "uptime"]);

        assert_eq!(cli.configfile, "/tmp/conf");
        assert_eq!(cli.execute.as_deref(), Some("uptime"));
    }

    #[test]
    fn test_no_debug_overrides_debug() {
        let cli = Cli::parse_from(["courir", "-n", "web", "--debug", "--no-debug"]);
        assert!(!cli.debug);
    }
}
