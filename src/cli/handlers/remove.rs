use crate::cli::{
    args::RemoveArgs,
    config::{read_input, write_output},
    global::GlobalArgs,
};
use colenc::{EncoderConfig, remove_column_names_from_script};

pub fn handle(
    args: RemoveArgs,
    _global: &GlobalArgs,
    config: &EncoderConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let script = read_input(args.file.as_ref())?;
    let stripped = remove_column_names_from_script(&script, &args.columns, config);
    write_output(args.output.as_ref(), &stripped)
}
