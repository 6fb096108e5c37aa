//! `netcentra completions`: print a shell completion script.
//!
//! Install by redirecting the output, e.g.
//! `netcentra completions bash > ~/.local/share/bash-completion/completions/netcentra`.

use std::io::{self, Write};

use clap::Args;
use clap_complete::{Shell, generate};

/// Binary name the generated script completes.
const BIN_NAME: &str = "netcentra";

/// Arguments for `netcentra completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: Shell,
}

fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    generate(shell, command, BIN_NAME, out);
}

/// Execute `netcentra completions`, writing the script to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be flushed.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};

    fn command() -> Command {
        Command::new(BIN_NAME)
            .subcommand(Command::new("analyze").arg(Arg::new("directed").long("directed")))
            .subcommand(Command::new("stats"))
    }

    #[test]
    fn script_mentions_subcommands_and_flags() {
        let mut buf = Vec::new();
        write_completions(Shell::Bash, &mut command(), &mut buf);
        let script = String::from_utf8(buf).expect("utf8");

        assert!(script.contains(BIN_NAME));
        assert!(script.contains("analyze"));
        assert!(script.contains("stats"));
        assert!(script.contains("--directed"));
    }

    #[test]
    fn every_shell_produces_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            let mut buf = Vec::new();
            write_completions(shell, &mut command(), &mut buf);
            assert!(!buf.is_empty(), "{shell} script is empty");
        }
    }
}
