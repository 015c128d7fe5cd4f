// SPDX-License-Identifier: MPL-2.0
use iced_player::app::{self, Flags};
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
Iced Player

USAGE:
  iced_player [OPTIONS] [FILE]

OPTIONS:
  --lang <ID>          UI language (e.g. en-US, fr)
  --config-dir <DIR>   Directory holding settings.toml
  -h, --help           Print help
";

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("iced_player=info")),
        )
        .init();

    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let lang = args.opt_value_from_str("--lang").unwrap_or_else(|e| {
        tracing::warn!("ignoring --lang: {e}");
        None
    });
    let config_dir = args.opt_value_from_str("--config-dir").unwrap_or_else(|e| {
        tracing::warn!("ignoring --config-dir: {e}");
        None
    });

    let flags = Flags {
        lang,
        config_dir,
        file_path: args
            .finish()
            .into_iter()
            .next()
            .and_then(|s| s.into_string().ok()),
    };

    app::run(flags)
}
