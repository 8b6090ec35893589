use crate::cli::{
    args::EncodeArgs,
    config::{create_registry, read_input, write_output},
    global::GlobalArgs,
};
use colenc::EncoderConfig;

pub fn handle(
    args: EncodeArgs,
    global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(args.file.as_ref())?;
    let mut registry = create_registry(args.names.as_ref(), config)?;

    if args.json {
        let mut doc: serde_json::Value =
            serde_json::from_str(&input).map_err(|e| format!("Input is not valid JSON: {}", e))?;
        registry.encode_document(&mut doc, args.keys, args.strict);
        return write_output(args.output.as_ref(), &serde_json::to_string_pretty(&doc)?);
    }

    // Explicit prefixes replace the configured ones
    let prefixes = if args.prefixes.is_empty() {
        &config.script.allowed_prefixes
    } else {
        &args.prefixes
    };

    let result = registry.encode_script_text_with_prefixes(&input, prefixes);

    if args.found && !global.quiet {
        for (prefix, names) in &result.found {
            let label = if prefix.is_empty() { "(none)" } else { prefix.as_str() };
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            eprintln!("{}: {}", label, names.join(", "));
        }
    }

    write_output(args.output.as_ref(), &result.text)
}
