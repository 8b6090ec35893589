use crate::cli::{
    args::DecodeArgs,
    config::{create_registry, read_input, write_output},
    global::GlobalArgs,
};
use colenc::EncoderConfig;

pub fn handle(
    args: DecodeArgs,
    _global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let input = read_input(args.file.as_ref())?;
    let mut registry = create_registry(args.names.as_ref(), config)?;

    if !args.json {
        let decoded = registry.decode_script_text(&input);
        return write_output(args.output.as_ref(), &decoded);
    }

    let mut doc: serde_json::Value =
        serde_json::from_str(&input).map_err(|e| format!("Input is not valid JSON: {}", e))?;
    if args.html {
        registry.decode_document_html_safe(&mut doc);
    } else {
        registry.decode_document(&mut doc, args.keys);
    }

    write_output(args.output.as_ref(), &serde_json::to_string_pretty(&doc)?)
}
