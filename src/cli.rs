use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};
use crate::context::{RunContext, RunParams};
use crate::output::Reporter;
use crate::providers::bitbucket::BitbucketProvider;

#[derive(Parser)]
#[command(name = "pipeline-dedup")]
#[command(
    author,
    version,
    about = "Stops older running Bitbucket pipelines of the current branch",
    long_about = None
)]
pub struct Cli {
    /// Bitbucket workspace
    #[arg(long, env = "BITBUCKET_WORKSPACE")]
    workspace: Option<String>,

    /// Repository slug
    #[arg(long, env = "BITBUCKET_REPO_SLUG")]
    repo_slug: Option<String>,

    /// Branch of the running pipeline
    #[arg(long, env = "BITBUCKET_BRANCH")]
    branch: Option<String>,

    /// UUID of the running pipeline
    #[arg(long, env = "BITBUCKET_PIPELINE_UUID")]
    pipeline_uuid: Option<String>,

    /// Build number of the running pipeline
    #[arg(long, env = "BITBUCKET_BUILD_NUMBER")]
    build_number: Option<String>,

    /// Pre-encoded HTTP Basic credential
    #[arg(long, env = "TDP_BITBUCKET_BASIC_AUTH", hide_env_values = true)]
    basic_auth: Option<String>,

    /// API root, overrides the config file
    #[arg(long)]
    base_url: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report duplicates without stopping them
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print the run report as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,
}

impl Cli {
    fn run_params(&self) -> RunParams {
        RunParams {
            workspace: self.workspace.clone(),
            repo_slug: self.repo_slug.clone(),
            branch: self.branch.clone(),
            pipeline_uuid: self.pipeline_uuid.clone(),
            build_number: self.build_number.clone(),
            basic_auth: self.basic_auth.clone(),
        }
    }

    fn output_format(&self, config: &Config) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            config.output.format
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let context = RunContext::from_params(self.run_params())?;
        let config = Config::load(self.config.as_deref())?;

        let base_url = self
            .base_url
            .as_deref()
            .unwrap_or(&config.bitbucket.base_url);

        info!("Checking {} against {base_url}", context.repository_path());

        let provider = BitbucketProvider::new(base_url, &config.bitbucket.user_agent)?;
        let reporter = Reporter::new(
            self.output_format(&config),
            self.pretty || config.output.pretty,
        );

        reporter.heading(&context.current_branch);

        let report = provider
            .cancel_duplicates(&context, self.dry_run, |cancellation| {
                reporter.cancellation(cancellation);
            })
            .await?;

        reporter.finish(&report)
    }
}
