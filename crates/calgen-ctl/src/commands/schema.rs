//! Schema inspection.

use std::path::Path;

use anyhow::Context;
use calgen_weave::CalgenConfig;

use crate::output;

/// Load, validate and print every schema entry in address order.
pub(crate) fn handle_dump_schema(config: &CalgenConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let path = match file {
        Some(file) => std::path::absolute(file)
            .with_context(|| format!("cannot resolve {}", file.display()))?,
        None => config.yaml_path.clone(),
    };

    let map = calgen_schema::load_validated(&path, config.address_space_size)
        .with_context(|| format!("invalid calibration schema {}", path.display()))?;

    output::header(map.brief());
    output::label("Schema", path.display());
    output::label("Entries", map.parameters().len());
    output::label("Total length", format!("{:#06X}", map.total_length()));

    for entry in map.parameters() {
        output::blank();
        output::dim(entry.range_string());
        output::plain(entry.to_string().trim_end());
    }
    Ok(())
}
