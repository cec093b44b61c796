use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("monitor failed: {0}")]
    Monitor(#[from] MonitorError),
    #[error("command failed: {0}")]
    Command(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(String),
    #[error("terminal error: {0}")]
    Terminal(String),
}
