use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{CommandFactory, Parser, ValueEnum};
use kube::Client;
use tracing_subscriber::EnvFilter;

use kubewhich::{
    ConnectionOptions, DiscoveryIndex, claputil, connect, determine_namespace, list, resolve,
};

#[derive(Debug, Parser)]
#[command(
    name = "kubewhich",
    version,
    about = "List namespace workloads and resolve a resource name to its API identity"
)]
struct Cli {
    /// Resource token to resolve, e.g. "pods", "deploy" or "svc".
    /// Prompted for on stdin when omitted.
    resource: Option<String>,

    /// Path to the kubeconfig file (defaults to ~/.kube/config).
    #[arg(long, value_name = "PATH")]
    kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to target.
    #[arg(long, add = claputil::context_value_completer())]
    context: Option<String>,

    /// Namespace to list workloads in (defaults to the context's namespace).
    #[arg(long, short)]
    namespace: Option<String>,

    /// Output format for the resolved identity.
    #[arg(long, short, value_enum, default_value_t = Output::Text)]
    output: Output,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    claputil::CompleteEnv::with_factory(Cli::command).complete();
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "kubewhich=debug"
    } else {
        "kubewhich=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Defaults live here, not in the library: the connection descriptor
    // handed to `connect` is always explicit.
    let options = ConnectionOptions {
        kubeconfig: cli.kubeconfig.or_else(default_kubeconfig_path),
        context: cli.context,
    };
    let namespace = determine_namespace(cli.namespace, &options);

    let client = connect(&options).await?;
    print_workloads(&client, &namespace).await?;

    let query = match cli.resource {
        Some(resource) => resource,
        None => prompt_for_resource()?,
    };

    let index = DiscoveryIndex::load(&client).await?;
    let gvr = resolve(&query, &index)?;

    match cli.output {
        Output::Text => println!("{gvr}"),
        Output::Json => println!("{}", serde_json::to_string_pretty(&gvr)?),
    }

    Ok(())
}

fn default_kubeconfig_path() -> Option<PathBuf> {
    Some(dirs::home_dir()?.join(".kube").join("config"))
}

async fn print_workloads(client: &Client, namespace: &str) -> anyhow::Result<()> {
    let sections: [(&str, Vec<String>); 3] = [
        ("Pods", list::list_pods(client, namespace).await?),
        ("Deployments", list::list_deployments(client, namespace).await?),
        ("Services", list::list_services(client, namespace).await?),
    ];

    for (index, (title, names)) in sections.iter().enumerate() {
        if index > 0 {
            println!();
        }
        println!("========{title}========");
        for name in names {
            println!("{name}");
        }
    }
    println!();

    Ok(())
}

fn prompt_for_resource() -> anyhow::Result<String> {
    print!("Enter the resource to resolve: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read the resource name from stdin")?;
    Ok(line.trim().to_string())
}
