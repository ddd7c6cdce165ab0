// qmerge schema: show the canonical layout in effect

use quotemerge_recon::PipelineConfig;
use serde_json::json;

use crate::CliError;

pub fn cmd_schema(config: &PipelineConfig, json: bool) -> Result<(), CliError> {
    if json {
        let body = json!({
            "fields": config.schema.names(),
            "provenance_field": config.provenance_field,
            "key_field": config.key_field,
            "mapping": config.mapping,
            "output_format": config.output.format,
            "banding": config.output.banding,
        });
        let text = serde_json::to_string_pretty(&body)
            .map_err(|e| CliError::io(format!("cannot encode schema: {}", e)))?;
        println!("{}", text);
        return Ok(());
    }

    for (i, name) in config.schema.names().iter().enumerate() {
        println!("{:>4}  {}", col_letter(i), name);
    }
    println!(
        "{:>4}  {}  (provenance)",
        col_letter(config.schema.len()),
        config.provenance_field
    );
    println!();
    println!("key:     {}", config.key_field);
    println!("mapping: {:?}", config.mapping);
    Ok(())
}

/// 0 -> A, 25 -> Z, 26 -> AA
fn col_letter(mut idx: usize) -> String {
    let mut out = Vec::new();
    loop {
        out.push(b'A' + (idx % 26) as u8);
        if idx < 26 {
            break;
        }
        idx = idx / 26 - 1;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}
