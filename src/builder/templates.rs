//! Remote template retrieval

use std::collections::BTreeMap;

use futures::future::try_join_all;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::templates::{file_name_from_url, is_json_url};
use crate::config::{TemplateName, TemplateSet};
use crate::domain::ModuleRegistry;
use crate::error::{Result, manifest::invalid_template, registry::template_fetch_failed};
use crate::fetch::Fetch;
use crate::manifest::{BaselineTemplate, reference_require};

/// A fetched template: structured when its URL names a JSON file
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateBody {
    Json(Value),
    Text(String),
}

impl TemplateBody {
    pub fn as_text(&self) -> String {
        match self {
            TemplateBody::Text(text) => text.clone(),
            TemplateBody::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// A fetched template together with the URL it came from
#[derive(Debug, Clone)]
pub struct FetchedTemplate {
    pub url: String,
    pub body: TemplateBody,
}

/// A template that is copied verbatim into the project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxFile {
    pub dir: &'static str,
    pub file_name: String,
    pub contents: String,
}

/// Every template of a run, decoded and validated
#[derive(Debug, Clone)]
pub struct RemoteTemplates {
    pub baseline: BaselineTemplate,
    pub reference_require: ModuleRegistry,
    pub fetched: BTreeMap<TemplateName, FetchedTemplate>,
}

impl RemoteTemplates {
    /// Templates written to fixed project directories
    pub fn aux_files(&self) -> Vec<AuxFile> {
        self.fetched
            .iter()
            .filter_map(|(name, template)| {
                name.destination_dir().map(|dir| AuxFile {
                    dir,
                    file_name: file_name_from_url(&template.url).to_string(),
                    contents: template.body.as_text(),
                })
            })
            .collect()
    }

    /// Suggested ignore rules for the summary
    pub fn ignore_rules(&self) -> Option<String> {
        self.fetched
            .get(&TemplateName::Ignore)
            .map(|template| template.body.as_text())
    }
}

fn decode(name: TemplateName, url: &str, text: String) -> Result<TemplateBody> {
    if is_json_url(url) {
        serde_json::from_str(&text)
            .map(TemplateBody::Json)
            .map_err(|e| invalid_template(name.as_str(), format!("{url} is not valid JSON: {e}")))
    } else {
        Ok(TemplateBody::Text(text))
    }
}

fn require_json(name: TemplateName, template: Option<&FetchedTemplate>) -> Result<&Value> {
    match template.map(|t| &t.body) {
        Some(TemplateBody::Json(value)) => Ok(value),
        _ => Err(invalid_template(
            name.as_str(),
            "expected a JSON document (the URL must end in .json)",
        )),
    }
}

/// Fetch all templates concurrently, substituting the core branch into each URL.
///
/// Any failed fetch fails the run: the baseline is required and the
/// auxiliary files are part of the output.
pub async fn fetch_templates<F: Fetch>(
    fetcher: &F,
    set: &TemplateSet,
    core_branch: &str,
) -> Result<RemoteTemplates> {
    let requests: Vec<(TemplateName, String)> = TemplateName::ALL
        .iter()
        .map(|name| (*name, set.resolved_url(*name, core_branch)))
        .collect();

    let fetched = try_join_all(requests.into_iter().map(|(name, url)| async move {
        debug!("Fetching template {} from {url}", name.as_str());
        let text = fetcher
            .fetch_text(&url)
            .await
            .map_err(|e| template_fetch_failed(name.as_str(), &url, e.to_string()))?;
        let body = decode(name, &url, text)?;
        Ok::<_, crate::error::BuilderError>((name, FetchedTemplate { url, body }))
    }))
    .await?;
    let fetched: BTreeMap<TemplateName, FetchedTemplate> = fetched.into_iter().collect();

    let baseline = BaselineTemplate::from_value(
        require_json(TemplateName::Baseline, fetched.get(&TemplateName::Baseline))?.clone(),
    )?;
    let reference_require = reference_require(
        TemplateName::Reference.as_str(),
        require_json(TemplateName::Reference, fetched.get(&TemplateName::Reference))?,
    )?;
    info!("Fetched {} remote template(s)", fetched.len());

    Ok(RemoteTemplates {
        baseline,
        reference_require,
        fetched,
    })
}
