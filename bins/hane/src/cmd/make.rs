use std::borrow::Cow;
use std::path::{Path, PathBuf};

use hane_api::case;

use crate::config::MakeArgs;
use crate::error::CliError;

const BUILTIN_STUB: &str = include_str!("../../stubs/converter.stub");

/// Project-relative path of a template overriding the built-in one.
const CUSTOM_STUB: &str = "stubs/converter.stub";

pub fn run(args: MakeArgs) -> Result<(), CliError> {
    let path = scaffold(&args)?;
    tracing::info!(path = %path.display(), "converter created");
    Ok(())
}

/// Render the converter template into `<base>/<dir>/<snake_name>.rs`.
fn scaffold(args: &MakeArgs) -> Result<PathBuf, CliError> {
    let class = class_name(&args.name)?;
    let entity = match &args.entity {
        Some(entity) => case::studly(entity),
        None => default_entity(&class).to_string(),
    };

    let base = Path::new(&args.base);
    let dir = base.join(&args.dir);
    let path = dir.join(format!("{}.rs", case::snake(&class)));

    if path.exists() && !args.force {
        return Err(CliError::AlreadyExists(path.display().to_string()));
    }

    let template = load_template(base)?;
    let source = render(&template, &class, &entity);

    std::fs::create_dir_all(&dir)?;
    std::fs::write(&path, source)?;
    Ok(path)
}

/// `blog_post` → `BlogPostConverter`; names already ending in `Converter`
/// are kept as they are.
fn class_name(name: &str) -> Result<String, CliError> {
    let studly = case::studly(name.trim());
    let valid = studly.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && studly.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(CliError::Invalid(format!("invalid converter name '{name}'")));
    }

    if studly.ends_with("Converter") {
        Ok(studly)
    } else {
        Ok(format!("{studly}Converter"))
    }
}

fn default_entity(class: &str) -> &str {
    match class.strip_suffix("Converter") {
        Some(entity) if !entity.is_empty() => entity,
        _ => class,
    }
}

fn load_template(base: &Path) -> Result<Cow<'static, str>, CliError> {
    let custom = base.join(CUSTOM_STUB);
    if custom.is_file() {
        tracing::debug!(path = %custom.display(), "using project template");
        let content = std::fs::read_to_string(&custom).map_err(|source| CliError::Read {
            path: custom.display().to_string(),
            source,
        })?;
        return Ok(Cow::Owned(content));
    }
    Ok(Cow::Borrowed(BUILTIN_STUB))
}

fn render(template: &str, class: &str, entity: &str) -> String {
    template
        .replace("{{ class }}", class)
        .replace("{{ entity }}", entity)
}
