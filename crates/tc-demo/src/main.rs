mod cli;
mod error;
mod logger;

use crate::cli::Cli;
use crate::error::Result as DemoResult;

use tc_channel::{BroadcastHub, Channel, EmitterOptions, ListenerOptions, TabContext};
use tc_config::Config;

use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> DemoResult<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;

    info!("Starting tc-demo v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let hub = BroadcastHub::new(config.channel.clone());

    let mut tabs = Vec::with_capacity(cli.tabs + 1);
    for index in 0..=cli.tabs {
        let channel = Channel::<String>::open(&TabContext::new(hub.clone()), cli.channel.as_str())?;
        let tab_id = channel.tab_id();
        channel.on_data(
            move |data: &String| println!("tab {index} ({tab_id}) received: {data}"),
            ListenerOptions::default(),
        );
        tabs.push(channel);
    }

    let options = EmitterOptions {
        include_self: cli.include_self,
    };
    if let Some(sender) = tabs.first() {
        info!(
            "Tab 0 ({}) posting {:?} on channel {:?}",
            sender.tab_id(),
            cli.message,
            cli.channel
        );
        sender.post_data(cli.message.clone(), options)?;
    }

    tokio::time::sleep(cli.wait).await;

    for channel in &tabs {
        channel.close();
    }
    info!("Closed {} tabs", tabs.len());

    Ok(())
}
