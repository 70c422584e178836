use async_trait::async_trait;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use kernel_debug_rs::debugging::{
    check_ready, parse, BufferView, ConfigLoader, DebugGate, Device, ExecutionMode, Predicate,
};
use kernel_debug_rs::runtime::{DebugResult, GridShape, HostLauncher, InvocationContext, Kernel};

use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a condition and print it as JSON
    Parse {
        /// The condition, e.g. ">1,=0"
        #[arg(short, long)]
        cond: String,
    },
    /// Launch a host grid and report every pid the condition fires on
    Eval {
        /// The condition; defaults to the config value or "=0,=0,=0"
        #[arg(short, long)]
        cond: Option<String>,

        /// Grid extents, e.g. "8,4,1"
        #[arg(short, long)]
        grid: Option<GridShape>,

        /// Path to a YAML debug config
        #[arg(long)]
        config: Option<String>,
    },
    /// Check that a buffer is ready for a kernel launch
    Check {
        /// Buffer shape, e.g. "4,4"
        #[arg(long)]
        shape: String,

        /// Element strides; contiguous when omitted
        #[arg(long)]
        strides: Option<String>,

        /// cpu, gpu or gpu:N
        #[arg(long, default_value = "gpu")]
        device: Device,

        /// Path to a YAML debug config; its execution_mode wins over the env
        #[arg(long)]
        config: Option<String>,
    },
}

/// Kernel whose only work is a conditional print
struct PrintKernel {
    gate: DebugGate,
    predicate: Predicate,
}

#[async_trait]
impl Kernel for PrintKernel {
    fn name(&self) -> &str {
        "print"
    }

    async fn run(&self, ctx: InvocationContext) -> DebugResult<()> {
        let message = format!("condition '{}' holds", self.predicate);
        self.gate.print_if(&self.predicate, &ctx, &message).await?;
        Ok(())
    }
}

fn parse_dims(s: &str) -> anyhow::Result<Vec<usize>> {
    s.split(',')
        .map(|d| {
            d.trim()
                .parse::<usize>()
                .map_err(|_| anyhow::anyhow!("invalid dimension '{}' in '{}'", d, s))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let env_mode = ExecutionMode::from_env();
    let args = Args::parse();

    match args.command {
        Commands::Parse { cond } => {
            let predicate = parse(&cond)?;
            println!("{}", serde_json::to_string_pretty(&predicate)?);
        }
        Commands::Eval { cond, grid, config } => {
            let config = ConfigLoader::load_optional(config)?;
            let predicate = match cond {
                Some(cond) => parse(&cond)?,
                None => config.validate()?,
            };
            let grid = grid.unwrap_or(config.grid);

            log::info!(
                "Using hook: {:?} in {:?} mode",
                config.hook,
                config.execution_mode_or(env_mode)
            );

            let kernel = Arc::new(PrintKernel {
                gate: DebugGate::new(config.hook.build()),
                predicate,
            });
            let summary = HostLauncher::new(grid).launch(kernel).await?;
            println!(
                "Ran {} invocations of '{}'",
                summary.invocations, summary.kernel
            );
        }
        Commands::Check {
            shape,
            strides,
            device,
            config,
        } => {
            let mode = ConfigLoader::load_optional(config)?.execution_mode_or(env_mode);
            let shape = parse_dims(&shape)?;
            let buffer = match strides {
                Some(strides) => BufferView::strided("input", shape, parse_dims(&strides)?, device),
                None => BufferView::contiguous("input", shape, device),
            };
            check_ready(&[&buffer], mode)?;
            println!("Buffer ready ({:?} mode)", mode);
        }
    }

    Ok(())
}
