use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "omni")]
#[command(about = "Interactive developer assistant with streaming AI completions")]
#[command(version)]
pub struct Args {
    /// Model identifier sent to the completion service
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Chat completions endpoint URL
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Search endpoint URL used by /search
    #[arg(long)]
    pub search_endpoint: Option<String>,
}
