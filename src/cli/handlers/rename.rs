use crate::cli::{
    args::RenameArgs,
    config::{read_input, read_string_map, write_output},
    global::GlobalArgs,
};
use colenc::{EncoderConfig, replace_column_names_in_script};

pub fn handle(
    args: RenameArgs,
    _global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let changes = read_string_map(&args.map)?;
    let script = read_input(args.file.as_ref())?;

    let renamed = replace_column_names_in_script(&script, changes, &config.replacer);
    write_output(args.output.as_ref(), &renamed)
}
