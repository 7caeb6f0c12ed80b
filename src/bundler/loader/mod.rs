//! Loader source generation.
//!
//! The loader replaces an addon reference in the module graph. At program
//! start it locates its own directory and requires the sibling addon file.

mod template;

use crate::bundler::error::Result;
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Module system the loader is generated for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderFormat {
    /// ES module using `import.meta.url`.
    #[default]
    Esm,
    /// CommonJS module using `__dirname`.
    Cjs,
}

impl LoaderFormat {
    fn template_name(self) -> &'static str {
        match self {
            LoaderFormat::Esm => "loader.mjs",
            LoaderFormat::Cjs => "loader.cjs",
        }
    }

    /// File extension used when a loader is written to disk.
    pub fn module_extension(self) -> &'static str {
        match self {
            LoaderFormat::Esm => "mjs",
            LoaderFormat::Cjs => "cjs",
        }
    }
}

impl fmt::Display for LoaderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderFormat::Esm => f.write_str("esm"),
            LoaderFormat::Cjs => f.write_str("cjs"),
        }
    }
}

impl FromStr for LoaderFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "esm" | "module" => Ok(LoaderFormat::Esm),
            "cjs" | "commonjs" => Ok(LoaderFormat::Cjs),
            other => Err(format!("unknown loader format: {other} (expected esm or cjs)")),
        }
    }
}

/// Replacement source for a claimed reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutput {
    /// Generated module source.
    pub code: String,
    /// Source map. Always `None`: a binary has nothing to map back to.
    pub map: Option<String>,
}

#[derive(Serialize)]
struct LoaderData<'a> {
    file_name: &'a str,
    announce: bool,
}

/// Renders loader modules.
#[derive(Debug)]
pub struct LoaderRenderer {
    handlebars: Handlebars<'static>,
    format: LoaderFormat,
    announce: bool,
}

impl LoaderRenderer {
    /// Creates a renderer for `format`.
    ///
    /// `announce` adds a startup log line naming the loaded file and its exports.
    pub fn new(format: LoaderFormat, announce: bool) -> Result<Self> {
        let mut handlebars = Handlebars::new();
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(
            LoaderFormat::Esm.template_name(),
            template::ESM_TEMPLATE,
        )?;
        handlebars.register_template_string(
            LoaderFormat::Cjs.template_name(),
            template::CJS_TEMPLATE,
        )?;

        Ok(Self {
            handlebars,
            format,
            announce,
        })
    }

    /// Module format this renderer produces.
    pub fn format(&self) -> LoaderFormat {
        self.format
    }

    /// Renders the loader for the sibling file `output_file_name`.
    pub fn render(&self, output_file_name: &str) -> Result<LoadOutput> {
        // JSON string literals are valid JS string literals.
        let literal = serde_json::to_string(output_file_name)?;
        let data = LoaderData {
            file_name: &literal,
            announce: self.announce,
        };
        let code = self.handlebars.render(self.format.template_name(), &data)?;
        Ok(LoadOutput { code, map: None })
    }
}
