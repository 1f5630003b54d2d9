use std::io::Write;

use tracing::{info, warn};

use dosetup_common::cmd::{CmdOutput, CommandRunner, ProcessRunner};
use dosetup_common::random::random_string;
use dosetup_common::registry::ServerRegistry;
use dosetup_schema::conf::config_data::ConfigData;
use dosetup_schema::conf::ds_args::{CreateCli, DeleteCli, DsArgs, DsSubcommand};
use dosetup_schema::droplet::Droplet;
use dosetup_schema::errors::ToErrorInfo;
use dosetup_schema::servers::ServerRecord;
use dosetup_schema::util::naming::machine_name;
use dosetup_schema::{DsResult, ErrorCode, ErrorInfoContext};

use crate::infra::digital_ocean::DigitalOceanClient;
use crate::infra::machine_setup::MachineSetup;
use crate::infra::playbook::PlaybookInvocation;
use crate::infra::CloudApi;
use crate::util::cli::prompt::{resolve_domain, resolve_token};

pub const SUFFIX_LENGTH: usize = 5;
pub const MISSING_ARGUMENTS: &str = "Missing arguments.";

#[derive(Clone, Debug)]
pub struct CreateOutcome {
    pub domain_name: String,
    pub droplet: Droplet,
    pub record: ServerRecord,
    pub playbook: PlaybookInvocation,
}

#[derive(Clone, Debug)]
pub enum DeleteOutcome {
    ByTag(Vec<Droplet>),
    FromRegistry(ServerRecord),
}

fn tag_option(config: &ConfigData) -> Option<&str> {
    Some(config.tag.as_str()).filter(|t| !t.is_empty())
}

/// Copies captured playbook stdout to `out` verbatim, regardless of log level.
pub fn echo_output<W: Write>(output: &CmdOutput, out: &mut W) -> DsResult<()> {
    out.write_all(output.stdout.as_bytes()).error_info("Failed to echo playbook output")?;
    if !output.stdout.is_empty() && !output.stdout.ends_with('\n') {
        writeln!(out).error_info("Failed to echo playbook output")?;
    }
    out.flush().error_info("Failed to flush playbook output")
}

/// Provisions a droplet, registers its DNS record and appends it to the registry.
/// `connect` is only invoked once the base domain is known.
pub async fn create<C, F>(
    cli: &CreateCli,
    config: &ConfigData,
    domain: String,
    registry: &ServerRegistry,
    connect: F,
) -> DsResult<CreateOutcome>
where
    C: CloudApi,
    F: FnOnce() -> DsResult<C>,
{
    let setup = MachineSetup::new(connect()?, domain, config.clone());
    setup.check_region().await?;
    if let Some(k) = cli.ssh_public_key.as_ref() {
        setup.add_local_ssh_key(k).await?;
    }
    let name = machine_name(&config.name_prefix, &random_string(SUFFIX_LENGTH));
    let mut droplet = setup.create_new_server(&name, tag_option(config)).await?;
    setup.setup_domain_for_droplet(&mut droplet, &name).await?;
    if let Some(ip) = droplet.ip_address() {
        info!("Droplet {} address {}", droplet.id, ip);
    }
    let domain_name = setup.create_domain_name(&name);
    let record = ServerRecord::from(&droplet);
    registry.append(record.clone())?;
    Ok(CreateOutcome {
        playbook: PlaybookInvocation::setup(config, &domain_name),
        domain_name,
        droplet,
        record,
    })
}

/// Runs the setup playbook after the configured delay with `--ansible`,
/// otherwise prints the invocation for the operator.
pub async fn handoff(
    cli: &CreateCli,
    config: &ConfigData,
    outcome: &CreateOutcome,
    runner: &dyn CommandRunner,
) -> DsResult<Option<CmdOutput>> {
    if !cli.ansible {
        eprintln!("{}", outcome.playbook.render());
        return Ok(None);
    }
    info!("Waiting {} seconds for server to init", config.handoff_delay_secs);
    tokio::time::sleep(config.handoff_delay()).await;
    let output = outcome.playbook.run(runner).await?;
    echo_output(&output, &mut std::io::stderr())?;
    Ok(Some(output))
}

/// Destroys by tag, or the single registry entry. The registry is checked before `connect`.
pub async fn delete<C, F>(
    cli: &DeleteCli,
    config: &ConfigData,
    registry: &ServerRegistry,
    runner: &dyn CommandRunner,
    connect: F,
) -> DsResult<DeleteOutcome>
where
    C: CloudApi,
    F: FnOnce() -> DsResult<C>,
{
    let domain = config.domain.clone().unwrap_or_default();
    if let Some(tag) = cli.tag.as_ref() {
        // An empty tag_name filter would match every droplet on the account
        if tag.trim().is_empty() {
            return "Empty tag, refusing to destroy by tag".to_error_code(ErrorCode::MissingArguments);
        }
        if cli.save {
            warn!("--save only applies with --list, ignoring");
        }
        let setup = MachineSetup::new(connect()?, domain, config.clone());
        let destroyed = setup.destroy_machines_by_tag(tag).await?;
        return Ok(DeleteOutcome::ByTag(destroyed));
    }
    if !cli.list {
        return MISSING_ARGUMENTS.to_error_code(ErrorCode::MissingArguments);
    }
    let record = registry.single()?;
    let setup = MachineSetup::new(connect()?, domain, config.clone());
    if cli.save {
        let output = PlaybookInvocation::save(config, &record.name).run(runner).await?;
        echo_output(&output, &mut std::io::stderr())?;
    }
    setup.destroy_machine_by_id(record.id).await?;
    registry.clear()?;
    Ok(DeleteOutcome::FromRegistry(record))
}

pub async fn dispatch(args: &DsArgs, config: &ConfigData) -> DsResult<()> {
    let registry = ServerRegistry::new(&config.registry_path);
    let runner = ProcessRunner;
    let token = args.token.clone();
    let connect = || resolve_token(token)
        .and_then(|t| DigitalOceanClient::new(config.api_url.clone(), t, config.http_timeout()));
    match &args.subcmd {
        DsSubcommand::Create(c) => {
            let domain = resolve_domain(c.domain.as_ref(), config.domain.as_ref())?;
            let outcome = create(c, config, domain, &registry, connect).await?;
            println!("{}", outcome.domain_name);
            handoff(c, config, &outcome, &runner).await?;
        }
        DsSubcommand::Delete(d) => {
            match delete(d, config, &registry, &runner, connect).await? {
                DeleteOutcome::ByTag(droplets) => info!("Destroyed {} droplets", droplets.len()),
                DeleteOutcome::FromRegistry(r) => info!("Destroyed {} and cleared {}", r.name, config.registry_path),
            }
        }
    }
    Ok(())
}
