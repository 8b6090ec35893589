use crate::cli::{
    args::OptionsArgs,
    config::{create_registry, read_input, write_output},
    global::GlobalArgs,
};
use colenc::{EncoderConfig, NameTable};

pub fn handle(
    args: OptionsArgs,
    _global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(args.file.as_ref())?;
    let mut options: serde_json::Value =
        serde_json::from_str(&input).map_err(|e| format!("Options are not valid JSON: {}", e))?;
    let mut registry = create_registry(args.names.as_ref(), config)?;

    // Names listed under `encodeThis` live in their own table for this run
    let mut extra = NameTable::builder()
        .prefix(format!("{}Extra_", config.encoder.prefix))
        .suffix(config.encoder.suffix.as_str())
        .build()?;
    extra.set_names_from_options_meta(&options);

    let (typed, _) = registry.scoped(extra, |registry, _| {
        registry.encode_column_names_in_options(&mut options, args.preloading)
    });

    let typed: Vec<serde_json::Value> = typed
        .into_iter()
        .map(|(name, ty)| serde_json::json!({ "name": name, "type": ty }))
        .collect();
    let output = serde_json::json!({ "options": options, "typed": typed });

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    write_output(args.output.as_ref(), &text)
}
