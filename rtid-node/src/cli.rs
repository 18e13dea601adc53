use clap::{Parser, Subcommand};
use console::Style;
use rtid_chainparams::{ChainParams, DeploymentOverride, ParamsRegistry};
use bitcoin::consensus::encode::serialize_hex;
use rtid_types::consensus::Deployment;
use rtid_types::primitives::hash_to_hex;

use crate::config::NodeConfig;
use crate::error::NodeError;

#[derive(Parser)]
#[command(
    name = "rtid",
    about = "RTID chain parameters: select a network and inspect its consensus rules and genesis block",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Select a network and print its parameter set
    Params {
        /// Network: "main", "test", or "regtest" (overrides the config file)
        #[arg(short, long)]
        network: Option<String>,
        /// Force a deployment window on regtest, as NAME:START:END (repeatable)
        #[arg(long = "vbparams")]
        vbparams: Vec<String>,
        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print the verified genesis block of a network as JSON
    Genesis {
        /// Network: "main", "test", or "regtest" (overrides the config file)
        #[arg(short, long)]
        network: Option<String>,
    },
    /// Initialize a new configuration file
    Init {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: String,
    },
}

pub fn run(cli: Cli, config: NodeConfig) -> Result<(), NodeError> {
    match cli.command {
        Command::Params {
            network,
            vbparams,
            json,
        } => {
            let network = network.unwrap_or_else(|| config.network.clone());
            let registry = select_params(&network, &config.deployment_overrides, &vbparams)?;

            let params = registry.active()?;
            if json {
                println!("{}", to_json(params)?);
            } else {
                print_summary(params);
            }
        }
        Command::Genesis { network } => {
            let network = network.unwrap_or_else(|| config.network.clone());
            let mut registry = ParamsRegistry::new();
            let params = registry.select(&network)?;

            let output = serde_json::json!({
                "network": params.network_id(),
                "header": params.genesis.header,
                "hashes": params.genesis_hashes,
                "transactions": params.genesis.txdata,
                "hex": serialize_hex(&params.genesis),
            });
            println!("{}", to_json(&output)?);
        }
        Command::Init { dir } => {
            let path = NodeConfig::init(&dir)?;
            println!("Configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Select `network` and apply the configured deployment overrides, then
/// the `NAME:START:END` ones given on the command line.
pub fn select_params(
    network: &str,
    configured: &[DeploymentOverride],
    vbparams: &[String],
) -> Result<ParamsRegistry, NodeError> {
    let mut registry = ParamsRegistry::new();
    registry.select(network)?;

    for over in configured {
        over.apply(&mut registry)?;
    }
    for arg in vbparams {
        arg.parse::<DeploymentOverride>()?.apply(&mut registry)?;
    }
    Ok(registry)
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, NodeError> {
    serde_json::to_string_pretty(value).map_err(|e| NodeError::OutputError {
        reason: format!("failed to serialize output: {}", e),
    })
}

/// Print a compact human-readable view of the parameter set.
pub fn print_summary(params: &ChainParams) {
    let dim = Style::new().dim();
    let cyan = Style::new().cyan();
    let bold = Style::new().bold();
    let rules = &params.consensus;

    println!(
        "  {} {}",
        dim.apply_to("Network    "),
        bold.apply_to(params.network.display_name())
    );
    println!(
        "  {} {}",
        dim.apply_to("Genesis    "),
        cyan.apply_to(hash_to_hex(&params.genesis_hash()))
    );
    println!(
        "  {} {} | port {}",
        dim.apply_to("Magic      "),
        cyan.apply_to(hex::encode(params.message_start)),
        cyan.apply_to(params.default_port)
    );
    println!(
        "  {} {}s spacing · {} block window · +{}%/-{}%",
        dim.apply_to("Retarget   "),
        rules.pow_target_spacing,
        rules.pow_averaging_window,
        rules.pow_max_adjust_up,
        rules.pow_max_adjust_down
    );
    println!(
        "  {} {}",
        dim.apply_to("Pow limit  "),
        cyan.apply_to(rules.pow_limit.to_hex())
    );
    for (pos, deployment) in rules.deployments.iter() {
        println!(
            "  {} {:<10} bit {:>2} · {}",
            dim.apply_to("Deployment "),
            pos.name(),
            deployment.bit,
            describe_window(deployment)
        );
    }
    if !params.dns_seeds.is_empty() {
        println!(
            "  {} {}",
            dim.apply_to("Seeds      "),
            params.dns_seeds.join(", ")
        );
    }
}

fn describe_window(deployment: &Deployment) -> String {
    if deployment.is_always_active() {
        return "always active".to_string();
    }
    if deployment.has_timeout() {
        format!("{} → {}", deployment.start_time, deployment.timeout)
    } else {
        format!("from {}, no timeout", deployment.start_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rtid_types::consensus::DeploymentPos;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_params_command() {
        let cli = Cli::parse_from([
            "rtid",
            "params",
            "--network",
            "regtest",
            "--vbparams",
            "csv:0:100",
            "--vbparams",
            "segwit:0:0",
            "--json",
        ]);
        match cli.command {
            Command::Params {
                network,
                vbparams,
                json,
            } => {
                assert_eq!(network.as_deref(), Some("regtest"));
                assert_eq!(vbparams.len(), 2);
                assert!(json);
            }
            _ => panic!("expected params command"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["rtid", "genesis", "--config", "x.toml"]);
        assert_eq!(cli.config.as_deref(), Some("x.toml"));
    }

    #[test]
    fn test_params_rejects_override_off_regtest() {
        let cli = Cli::parse_from(["rtid", "params", "--vbparams", "csv:0:1"]);
        let err = run(cli, NodeConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            NodeError::Params(rtid_types::error::RtidError::InvalidDeploymentOverride { .. })
        ));
    }

    #[test]
    fn test_params_unknown_network() {
        let cli = Cli::parse_from(["rtid", "params", "--network", "mainnet"]);
        let err = run(cli, NodeConfig::default()).unwrap_err();
        assert!(err.to_string().contains("unknown network 'mainnet'"));
    }

    #[test]
    fn test_command_line_override_follows_config() {
        let configured: Vec<DeploymentOverride> = vec!["csv:0:100".parse().unwrap()];
        let registry =
            select_params("regtest", &configured, &["csv:5:50".to_string()]).unwrap();
        let csv = registry
            .active()
            .unwrap()
            .consensus
            .deployments
            .get(DeploymentPos::Csv);
        assert_eq!((csv.start_time, csv.timeout), (5, 50));
    }

    #[test]
    fn test_select_params_without_overrides() {
        let registry = select_params("test", &[], &[]).unwrap();
        assert_eq!(registry.active().unwrap().network_id(), "test");
    }

    #[test]
    fn test_describe_window() {
        let always = Deployment {
            bit: 0,
            start_time: Deployment::ALWAYS_ACTIVE,
            timeout: Deployment::NO_TIMEOUT,
        };
        assert_eq!(describe_window(&always), "always active");

        let open = Deployment {
            bit: 28,
            start_time: 0,
            timeout: Deployment::NO_TIMEOUT,
        };
        assert_eq!(describe_window(&open), "from 0, no timeout");

        let bounded = Deployment {
            bit: 28,
            start_time: 10,
            timeout: 20,
        };
        assert_eq!(describe_window(&bounded), "10 → 20");
        assert_eq!(DeploymentPos::TestDummy.name(), "testdummy");
    }
}
