use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use itertools::Itertools;
use dosetup_schema::errors::EnhanceErrorInfo;
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CmdOutput {
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Runs an external program to completion, capturing its output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], envs: &[(String, String)]) -> DsResult<CmdOutput>;
}

#[derive(Clone, Debug, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], envs: &[(String, String)]) -> DsResult<CmdOutput> {
        run_cmd_safe_async(program, args.to_vec(), envs.to_vec()).await
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

/// Records invocations and answers every one with the same canned output.
#[derive(Clone, Debug, Default)]
pub struct MockCommandRunner {
    pub output: CmdOutput,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockCommandRunner {
    pub fn with_status(status: i32) -> Self {
        Self {
            output: CmdOutput { status: Some(status), ..Default::default() },
            ..Default::default()
        }
    }

    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            output: CmdOutput { status: Some(0), stdout: stdout.into(), stderr: "".to_string() },
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        match self.calls.lock() {
            Ok(c) => c.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[String], envs: &[(String, String)]) -> DsResult<CmdOutput> {
        let call = RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            envs: envs.to_vec(),
        };
        match self.calls.lock() {
            Ok(mut c) => c.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
        Ok(self.output.clone())
    }
}

pub async fn run_cmd_safe_async(
    cmd: impl Into<String>,
    args: Vec<impl Into<String>>,
    envs: Vec<(String, String)>,
) -> DsResult<CmdOutput> {
    let program = cmd.into();
    let mut command = tokio::process::Command::new(program.clone());
    for arg in args {
        command.arg(arg.into());
    }
    for (k, v) in envs {
        command.env(k, v);
    }
    let cmd_output = command.output().await
        .error_msg(ErrorCode::CommandFailure, "Output from command failure ")
        .add(program.clone())?;
    let stdout = String::from_utf8(cmd_output.stdout).error_info("stdout String decode failure ")
        .add(program.clone())?;
    let stderr = String::from_utf8(cmd_output.stderr).error_info("stderr String decode failure ")
        .add(program.clone())?;
    Ok(CmdOutput {
        status: cmd_output.status.code(),
        stdout,
        stderr,
    })
}

/// Shell-like rendering of an invocation, for printing a command the operator can run.
pub fn render_command(program: &str, args: &[String], envs: &[(String, String)]) -> String {
    envs.iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .chain(std::iter::once(program.to_string()))
        .chain(args.iter().cloned())
        .join(" ")
}
