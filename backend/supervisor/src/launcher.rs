//! Launch the assistant with the derived provider environment.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use ccswitch_core::{apply_to_command, EnvMap, Result, SwitchError};
use ccswitch_logging::redact_sensitive_data;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::process_table::{ProcessRecord, ProcessTable};

/// Exit code reported when the child was killed by a signal.
pub const SIGNALED_EXIT_CODE: i32 = 1;

/// What to run and under which provider.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub provider: String,
    pub cwd: PathBuf,
}

impl LaunchSpec {
    /// Build a `LaunchSpec`, dropping a leading `--` separator from `args`.
    pub fn new(program: impl Into<String>, args: Vec<String>, provider: impl Into<String>) -> Self {
        let args = match args.first().map(String::as_str) {
            Some("--") => args[1..].to_vec(),
            _ => args,
        };
        Self {
            program: program.into(),
            args,
            provider: provider.into(),
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn command_line(&self) -> String {
        format!("{} {}", self.program, self.args.join(" "))
            .trim()
            .to_string()
    }
}

/// Runs children with inherited stdio and records them in the process table.
pub struct Launcher {
    table: ProcessTable,
}

impl Launcher {
    pub fn new(table: ProcessTable) -> Self {
        Self { table }
    }

    /// Run the child to completion and return its exit code.
    ///
    /// The environment map is applied over the current environment: empty
    /// values are removed, others set. Process-table failures are logged and
    /// do not affect the child.
    pub async fn run(&self, spec: &LaunchSpec, env: &EnvMap) -> Result<i32> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .current_dir(&spec.cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        apply_to_command(env, &mut cmd);

        let mut child = tokio::process::Command::from(cmd)
            .spawn()
            .map_err(|e| SwitchError::io(&spec.program, e))?;
        let pid = child.id();
        info!(
            pid = ?pid,
            provider = %spec.provider,
            command = %redact_sensitive_data(&spec.command_line()),
            "Started child process"
        );

        if let Some(pid) = pid {
            let record = ProcessRecord {
                pid,
                cwd: spec.cwd.display().to_string(),
                command: spec.command_line(),
                provider: spec.provider.clone(),
                started_at: Utc::now(),
            };
            if let Err(e) = self.table.register(record).await {
                warn!(pid, error = %e, "Failed to record child process");
            }
        }

        // Ctrl-C reaches the child through the process group; stay alive
        // until it exits so the table entry gets removed.
        let status = loop {
            tokio::select! {
                status = child.wait() => break status,
                _ = tokio::signal::ctrl_c() => debug!("Interrupt received; waiting for child"),
            }
        };

        if let Some(pid) = pid {
            if let Err(e) = self.table.unregister(pid).await {
                warn!(pid, error = %e, "Failed to remove child process record");
            }
        }

        let status = status.map_err(|e| SwitchError::io(&spec.program, e))?;
        let code = status.code().unwrap_or(SIGNALED_EXIT_CODE);
        info!(pid = ?pid, code, "Child process exited");
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_separator_only() {
        let spec = LaunchSpec::new("claude", vec!["--".into(), "-p".into(), "--".into()], "glm");
        assert_eq!(spec.args, vec!["-p", "--"]);
        assert_eq!(spec.command_line(), "claude -p --");

        let spec = LaunchSpec::new("claude", Vec::new(), "glm");
        assert_eq!(spec.command_line(), "claude");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn returns_child_exit_code_and_cleans_table() {
        let tmp = tempfile::tempdir().unwrap();
        let table = ProcessTable::new(tmp.path());
        let launcher = Launcher::new(table.clone());

        let spec = LaunchSpec::new("sh", vec!["-c".into(), "exit 7".into()], "glm");
        let code = launcher.run(&spec, &EnvMap::new()).await.unwrap();
        assert_eq!(code, 7);
        assert!(table.list_alive().await.unwrap().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn child_sees_set_and_cleared_variables() {
        let tmp = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(ProcessTable::new(tmp.path()));

        let mut env = EnvMap::new();
        env.insert("CC_SWITCH_SET_ME".into(), "yes".into());
        env.insert("HOME".into(), String::new());
        let script = r#"[ "$CC_SWITCH_SET_ME" = yes ] && [ -z "${HOME+x}" ]"#;
        let spec = LaunchSpec::new("sh", vec!["-c".into(), script.into()], "glm");

        assert_eq!(launcher.run(&spec, &env).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_program_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(ProcessTable::new(tmp.path()));
        let spec = LaunchSpec::new("cc-switch-definitely-missing-binary", Vec::new(), "glm");
        assert!(matches!(
            launcher.run(&spec, &EnvMap::new()).await,
            Err(SwitchError::Io { .. })
        ));
    }
}
