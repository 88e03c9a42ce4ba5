use std::io::{Read, Write};

use hane_api::{ConversionInput, Fields, RequestParams, Value};
use hane_engine::config::HaneConfig;
use hane_engine::schema::SchemaRegistry;
use hane_engine::Converter;

use crate::config::ConvertArgs;
use crate::error::CliError;

pub fn run(args: ConvertArgs) -> Result<(), CliError> {
    tracing::info!(config = %args.config, converter = %args.converter, "loading configuration");
    let config = HaneConfig::load(&args.config)?;

    let document = read_json(&args.input)?;
    let attach = match &args.attach {
        Some(path) => attachments(path, read_json(path)?)?,
        None => Fields::new(),
    };

    let output = convert_document(&config, &args, document, attach)?;

    let mut stdout = std::io::stdout().lock();
    if args.pretty {
        serde_json::to_writer_pretty(&mut stdout, &output).map_err(hane_engine::EngineError::from)?;
    } else {
        serde_json::to_writer(&mut stdout, &output).map_err(hane_engine::EngineError::from)?;
    }
    writeln!(stdout)?;
    Ok(())
}

/// Run the configured converter over one JSON document.
fn convert_document(
    config: &HaneConfig,
    args: &ConvertArgs,
    document: Value,
    attach: Fields,
) -> Result<Value, CliError> {
    let registry = SchemaRegistry::new(config)?;
    let transformer = registry.transformer(&args.converter)?;
    let params = RequestParams::from_query(&args.query).with_keys(config.params.clone());

    let input = ConversionInput::from_json(document);
    tracing::debug!(shape = ?input.shape(), query = %args.query, "input classified");

    let mut converter = Converter::new(transformer, input)
        .only(args.only.iter().filter(|f| !f.is_empty()).cloned())
        .with_callback(|result, shape| {
            let entries = match result {
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                _ => 1,
            };
            tracing::info!(?shape, entries, "conversion finished");
        });
    if let Some(key) = &args.wrap {
        converter = converter.wrap(key.clone()).attach(attach);
    }

    Ok(converter.convert(&params)?)
}

fn read_json(path: &str) -> Result<Value, CliError> {
    let mut content = String::new();
    if path == "-" {
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|source| CliError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
    } else {
        content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        })?;
    }
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.to_string(),
        source,
    })
}

fn attachments(path: &str, value: Value) -> Result<Fields, CliError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CliError::Invalid(format!(
            "{path}: attachments must be a JSON object, got {other}"
        ))),
    }
}
