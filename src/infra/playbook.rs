use tracing::info;

use dosetup_common::cmd::{render_command, CmdOutput, CommandRunner};
use dosetup_schema::conf::config_data::ConfigData;
use dosetup_schema::errors::{EnhanceErrorInfo, ToErrorInfo};
use dosetup_schema::{DsResult, ErrorCode};

pub const HOST_KEY_CHECKING_ENV: &str = "ANSIBLE_HOST_KEY_CHECKING";

/// An ansible-playbook run against a single host given as an inline inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybookInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl PlaybookInvocation {
    pub fn new(config: &ConfigData, host: &str, playbook: &str) -> Self {
        Self {
            program: config.playbook_command.clone(),
            args: vec![
                "-i".to_string(),
                format!("{},", host),
                "--private-key".to_string(),
                expand_home(&config.private_key_path),
                playbook.to_string(),
            ],
            envs: vec![(HOST_KEY_CHECKING_ENV.to_string(), "False".to_string())],
        }
    }

    pub fn setup(config: &ConfigData, host: &str) -> Self {
        Self::new(config, host, &config.setup_playbook)
    }

    pub fn save(config: &ConfigData, host: &str) -> Self {
        Self::new(config, host, &config.save_playbook)
    }

    pub fn render(&self) -> String {
        render_command(&self.program, &self.args, &self.envs)
    }

    /// Runs to completion; a non-zero exit is an error carrying the captured stderr.
    pub async fn run(&self, runner: &dyn CommandRunner) -> DsResult<CmdOutput> {
        info!("Running {}", self.render());
        let output = runner.run(&self.program, &self.args, &self.envs).await?;
        if !output.success() {
            return format!("Playbook exited with status {:?}", output.status)
                .to_error_code::<CmdOutput>(ErrorCode::CommandFailure)
                .with_detail("command", self.render())
                .with_detail("stderr", output.stderr.trim().to_string());
        }
        Ok(output)
    }
}

fn expand_home(path: &str) -> String {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().to_string(),
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use dosetup_common::cmd::MockCommandRunner;

    use super::*;

    #[test]
    fn builds_inline_inventory_invocation() {
        let mut config = ConfigData::default();
        config.private_key_path = "/keys/id_rsa".to_string();
        let p = PlaybookInvocation::setup(&config, "factorio-ab12c.net.example.com");
        assert_eq!(p.program, "ansible-playbook");
        assert_eq!(
            p.render(),
            "ANSIBLE_HOST_KEY_CHECKING=False ansible-playbook -i factorio-ab12c.net.example.com, \
             --private-key /keys/id_rsa setup-factorio.yml"
        );
        assert_eq!(PlaybookInvocation::save(&config, "h").args[4], "save-factorio.yml");
    }

    #[test]
    fn default_key_path_is_under_home() {
        let p = PlaybookInvocation::setup(&ConfigData::default(), "h");
        assert!(!p.args[3].starts_with('~') || dirs::home_dir().is_none());
        assert!(p.args[3].ends_with(".ssh/id_rsa"));
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let runner = MockCommandRunner::with_status(2);
        let p = PlaybookInvocation::setup(&ConfigData::default(), "h");
        let e = p.run(&runner).await.unwrap_err();
        assert_eq!(e.code, ErrorCode::CommandFailure);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn passes_env_and_args_to_runner() {
        let runner = MockCommandRunner::with_stdout("PLAY RECAP ok=3");
        let p = PlaybookInvocation::setup(&ConfigData::default(), "h");
        let out = p.run(&runner).await.unwrap();
        assert_eq!(out.stdout, "PLAY RECAP ok=3");
        let calls = runner.calls();
        assert_eq!(calls[0].program, "ansible-playbook");
        assert_eq!(calls[0].args[1], "h,");
        assert_eq!(calls[0].envs, vec![("ANSIBLE_HOST_KEY_CHECKING".to_string(), "False".to_string())]);
    }
}
