use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tc-demo")]
#[command(about = "Post a message between simulated browser tabs")]
#[command(version)]
pub struct Cli {
    /// Channel name shared by every tab
    #[arg(long, default_value = "id")]
    pub channel: String,

    /// Message posted from the first tab
    #[arg(long, default_value = "Hello!")]
    pub message: String,

    /// Deliver the message to the posting tab as well
    #[arg(long)]
    pub include_self: bool,

    /// Number of peer tabs besides the posting one
    #[arg(long, default_value_t = 1)]
    pub tabs: usize,

    /// How long to wait for remote delivery
    #[arg(long, default_value = "100ms", value_parser = humantime::parse_duration)]
    pub wait: std::time::Duration,
}
