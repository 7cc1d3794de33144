//! `code-push completions <shell>`

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use tracing::info;

use crate::cli::{output, Cli};

/// Print a completion script for the given shell
#[derive(Debug, Args)]
pub struct CompletionsCommand {
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl CompletionsCommand {
    pub fn execute(&self) -> anyhow::Result<()> {
        info!(shell = %self.shell, "generating completions");
        match &self.output {
            Some(path) => {
                self.write_script(&mut File::create(path)?);
                output::success(&format!("Completions written to {}", path.display()));
            }
            None => self.write_script(&mut io::stdout()),
        }
        Ok(())
    }

    fn write_script(&self, out: &mut dyn Write) {
        let mut cli = Cli::command();
        let name = cli.get_name().to_string();
        generate(self.shell, &mut cli, name, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        completions: CompletionsCommand,
    }

    #[test]
    fn test_shell_names() {
        for (arg, shell) in [
            ("bash", Shell::Bash),
            ("zsh", Shell::Zsh),
            ("fish", Shell::Fish),
            ("powershell", Shell::PowerShell),
            ("elvish", Shell::Elvish),
        ] {
            let parsed = TestCli::try_parse_from(["code-push", arg]).unwrap();
            assert_eq!(parsed.completions.shell, shell);
        }
        assert!(TestCli::try_parse_from(["code-push", "tcsh"]).is_err());
    }

    #[test]
    fn test_script_written_to_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("_code-push");
        CompletionsCommand {
            shell: Shell::Zsh,
            output: Some(path.clone()),
        }
        .execute()
        .unwrap();

        let script = std::fs::read_to_string(path).unwrap();
        assert!(script.starts_with("#compdef code-push"));
        assert!(script.contains("release-react"));
    }
}
