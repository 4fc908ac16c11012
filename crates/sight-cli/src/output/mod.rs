use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use sight_core::{Provenance, PromotionResult};

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn json_render_is_valid_json() {
        let value = PromotionResult {
            rows_promoted: 7,
            rows_rejected: 1,
            rows_skipped: 0,
        };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["rows_promoted"], 7);
        assert_eq!(parsed["rows_rejected"], 1);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let out = render(&Provenance::NoData, OutputFormat::Raw).expect("raw render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["status"], "no_data");
        assert!(!out.contains('\n'));
    }
}
