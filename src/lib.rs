pub mod builder;
pub mod config;
pub mod demo;
pub mod document;
pub mod error;
pub mod factory;
pub mod fragment;
pub mod merger;
pub mod naming;
pub mod operator;
pub mod registry;
pub mod schema;

use config::Config;
use document::ApiDocument;
use error::Result;
use fragment::Annotation;
use http::Method;
use std::path::PathBuf;

pub use builder::ApiDecoratorBuilder;
pub use error::Error;
pub use operator::{OperationOptions, OperationTable};

const DEFAULT_TITLE: &str = "API";
const DEFAULT_VERSION: &str = "1.0.0";

/// An endpoint declaration and its finalized documentation.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub annotation: Annotation,
}

impl Route {
    pub fn new<P: Into<String>>(method: Method, path: P, annotation: Annotation) -> Self {
        Self {
            method,
            path: path.into(),
            annotation,
        }
    }
}

/// Main entry point for generating OpenAPI definitions.
#[derive(Default)]
pub struct Generator {
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
    routes: Vec<Route>,
    output_path: Option<PathBuf>,
}

impl Generator {
    /// Creates a new Generator instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the generator from a Config object.
    pub fn with_config(mut self, config: Config) -> Self {
        if let Some(title) = config.title {
            self.title = Some(title);
        }
        if let Some(version) = config.version {
            self.version = Some(version);
        }
        if let Some(description) = config.description {
            self.description = Some(description);
        }
        if let Some(output) = config.output {
            self.output_path = Some(output);
        }
        self
    }

    /// Adds a documented route.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes<I: IntoIterator<Item = Route>>(mut self, routes: I) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Sets the output file path.
    pub fn output<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Assembles every route into one document.
    pub fn document(&self) -> Result<ApiDocument> {
        let title = self.title.as_deref().unwrap_or(DEFAULT_TITLE);
        let version = self.version.as_deref().unwrap_or(DEFAULT_VERSION);
        let mut document = ApiDocument::new(title, version);
        if let Some(description) = &self.description {
            document = document.with_description(description.clone());
        }

        log::info!("Documenting {} routes", self.routes.len());
        for route in &self.routes {
            document.route(route.method.clone(), &route.path, &route.annotation)?;
        }
        Ok(document)
    }

    /// Executes the generation process.
    pub fn generate(self) -> Result<()> {
        let output = self.output_path.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "Output path is required")
        })?;

        let document = self.document()?.to_value();

        // Ensure parent directory exists
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::File::create(&output)?;
        let extension = output
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("yaml");

        match extension {
            "json" => {
                serde_json::to_writer_pretty(file, &document)?;
            }
            _ => {
                serde_yaml::to_writer(file, &document)?;
            }
        }

        log::info!("Written output to {:?}", output);

        Ok(())
    }
}
