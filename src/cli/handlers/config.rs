use crate::cli::{args::ConfigArgs, global::GlobalArgs};
use colenc::EncoderConfig;

pub fn handle(
    args: ConfigArgs,
    _global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
