use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "taskmon", about = "Terminal dashboard for simulated parallel-task execution")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Explicit config file; defaults to ~/.taskmon/config.toml then
    /// ./config.toml.
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    /// Start one named task at boot.
    #[arg(long)]
    pub task: Option<String>,

    /// Planned duration for --task, in milliseconds (randomized if unset).
    #[arg(long)]
    pub duration_ms: Option<u64>,

    /// Kick off the scripted parallel batch at boot.
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Skip the splash screen.
    #[arg(long, default_value_t = false)]
    pub no_splash: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct DemoArgs {
    /// How many scripted batches to run back to back.
    #[arg(long, default_value_t = 1)]
    pub batches: u32,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive dashboard (default when no subcommand is given).
    Run(RunArgs),
    /// Headless scripted batch with plain progress bars; exits when drained.
    Demo(DemoArgs),
}
