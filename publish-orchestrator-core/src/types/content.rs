//! Content classification and the publish source descriptor

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Kind of content being published
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    None,
    /// Raw rendered HTML (a preview, a widget)
    Html,
    /// A rendered plot
    Plot,
    /// A rendered presentation
    Presentation,
    /// A document (possibly with runtime components)
    Document,
    /// An interactive application
    App,
    /// A multi-page website build
    Website,
    /// A programmatic API
    Api,
}

impl ContentType {
    /// Human-readable description, used in menu labels and error messages
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::None => "Content",
            Self::Html => "HTML",
            Self::Plot => "Plot",
            Self::Presentation => "Presentation",
            Self::Document => "Document",
            Self::App => "Application",
            Self::Website => "Website",
            Self::Api => "API",
        }
    }

    /// Content kinds that are published as a rendered single file and need a
    /// generated HTML source rather than a directory scan
    #[must_use]
    pub fn requires_rendered_html(self) -> bool {
        matches!(self, Self::Html | Self::Plot | Self::Presentation)
    }
}

/// What the file-source decision table resolved to: scan a directory for
/// deployable files, or deploy exactly one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Directory(String),
    SingleFile(String),
}

/// Describes what is about to be deployed.
///
/// Constructed once per wizard invocation from the triggering content event
/// and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSource {
    #[serde(rename = "contentType")]
    pub content_type: ContentType,
    /// The source file that produced the content (absent for directory
    /// deployments such as apps and websites)
    #[serde(rename = "sourceFile", skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    /// Rendered output file, when one exists
    #[serde(rename = "outputFile", skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Directory containing the content
    #[serde(rename = "deployDir")]
    pub deploy_dir: String,
    /// Website source directory
    #[serde(rename = "websiteDir", skip_serializing_if = "Option::is_none")]
    pub website_dir: Option<String>,
    /// Website build output directory
    #[serde(rename = "websiteOutputDir", skip_serializing_if = "Option::is_none")]
    pub website_output_dir: Option<String>,
    /// Single-file artifact needing no directory scan
    #[serde(rename = "isSelfContained")]
    pub is_self_contained: bool,
    #[serde(rename = "isStatic")]
    pub is_static: bool,
    #[serde(rename = "isShiny")]
    pub is_shiny: bool,
    /// Human title of the content, seed for app-name generation
    pub title: String,
}

impl PublishSource {
    /// Resolve the path the deployment file list should come from.
    ///
    /// Decision table: website + static ⇒ build dir; website + non-static ⇒
    /// source dir; document ⇒ its own file; everything else ⇒ the containing
    /// directory.
    pub fn file_source(&self) -> CoreResult<FileSource> {
        match self.content_type {
            ContentType::Website => {
                let dir = if self.is_static {
                    self.website_output_dir.as_ref()
                } else {
                    self.website_dir.as_ref()
                };
                dir.map(|d| FileSource::Directory(d.clone())).ok_or_else(|| {
                    CoreError::ValidationError(
                        "Could not determine the website directory to deploy".to_string(),
                    )
                })
            }
            ContentType::Document => self
                .source_file
                .as_ref()
                .map(|f| FileSource::SingleFile(f.clone()))
                .ok_or_else(|| {
                    CoreError::ValidationError(
                        "Could not determine the document to deploy".to_string(),
                    )
                }),
            _ => {
                if self.deploy_dir.is_empty() {
                    return Err(CoreError::ValidationError(
                        "Could not determine the directory to deploy".to_string(),
                    ));
                }
                Ok(FileSource::Directory(self.deploy_dir.clone()))
            }
        }
    }

    /// The one file a self-contained deployment consists of
    pub fn primary_file(&self) -> CoreResult<String> {
        self.output_file
            .clone()
            .or_else(|| self.source_file.clone())
            .ok_or_else(|| {
                CoreError::ValidationError(
                    "Self-contained content has no file to deploy".to_string(),
                )
            })
    }

    /// Default app name seed: the stem of the primary or source file,
    /// falling back to the deploy directory's last component.
    #[must_use]
    pub fn default_app_name(&self) -> String {
        let candidate = self
            .source_file
            .as_deref()
            .or(self.output_file.as_deref())
            .unwrap_or(&self.deploy_dir);
        let last = candidate
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(candidate);
        match last.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => last.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(content_type: ContentType) -> PublishSource {
        PublishSource {
            content_type,
            source_file: Some("/proj/report.qmd".to_string()),
            output_file: Some("/proj/report.html".to_string()),
            deploy_dir: "/proj".to_string(),
            website_dir: Some("/site/src".to_string()),
            website_output_dir: Some("/site/_build".to_string()),
            is_self_contained: false,
            is_static: false,
            is_shiny: false,
            title: "Report".to_string(),
        }
    }

    #[test]
    fn static_website_deploys_build_dir() {
        let mut src = source(ContentType::Website);
        src.is_static = true;
        assert_eq!(
            src.file_source().unwrap(),
            FileSource::Directory("/site/_build".to_string())
        );
    }

    #[test]
    fn non_static_website_deploys_source_dir() {
        let src = source(ContentType::Website);
        assert_eq!(
            src.file_source().unwrap(),
            FileSource::Directory("/site/src".to_string())
        );
    }

    #[test]
    fn document_deploys_its_own_file() {
        let src = source(ContentType::Document);
        assert_eq!(
            src.file_source().unwrap(),
            FileSource::SingleFile("/proj/report.qmd".to_string())
        );
    }

    #[test]
    fn app_deploys_containing_directory() {
        let src = source(ContentType::App);
        assert_eq!(
            src.file_source().unwrap(),
            FileSource::Directory("/proj".to_string())
        );
    }

    #[test]
    fn missing_website_dir_is_a_validation_error() {
        let mut src = source(ContentType::Website);
        src.website_dir = None;
        assert!(matches!(
            src.file_source(),
            Err(CoreError::ValidationError(_))
        ));
    }

    #[test]
    fn default_app_name_uses_file_stem() {
        let mut src = source(ContentType::App);
        src.source_file = Some("/proj/app.R".to_string());
        assert_eq!(src.default_app_name(), "app");

        src.source_file = None;
        src.output_file = None;
        assert_eq!(src.default_app_name(), "proj");
    }
}
