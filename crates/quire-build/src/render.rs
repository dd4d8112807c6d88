//! Page rendering.

use std::fs;
use std::path::Path;

use minijinja::{context, Environment};

use quire_content::parse_page;

use crate::compiler::RenderArtifacts;
use crate::config::SiteConfig;
use crate::reload::reload_client_script;

/// Outcome of rendering one content file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// A complete HTML document
    Rendered(String),

    /// No document could be produced; the reason is reported to the user
    RenderFailed(String),
}

/// Turns a content file into an HTML document.
///
/// Failing to render one file is recoverable: the page is reported as failed
/// and the build moves on, so implementations return `RenderFailed` rather
/// than an error.
pub trait PageRenderer: Send + Sync {
    fn render(
        &self,
        file: &Path,
        artifacts: &RenderArtifacts,
        draft_mode: bool,
        auto_reload: bool,
    ) -> RenderOutcome;
}

/// Renders markdown content through the layout held in the static artifact.
#[derive(Debug, Clone)]
pub struct LayoutRenderer {
    site: SiteConfig,
}

impl LayoutRenderer {
    pub fn new(site: &SiteConfig) -> Self {
        Self { site: site.clone() }
    }
}

impl PageRenderer for LayoutRenderer {
    fn render(
        &self,
        file: &Path,
        artifacts: &RenderArtifacts,
        draft_mode: bool,
        auto_reload: bool,
    ) -> RenderOutcome {
        let source = match fs::read_to_string(file) {
            Ok(source) => source,
            Err(e) => return RenderOutcome::RenderFailed(format!("failed to read file: {}", e)),
        };

        let page = match parse_page(&source) {
            Ok(page) => page,
            Err(e) => {
                return RenderOutcome::RenderFailed(format!(
                    "check the preamble is correct form ({})",
                    e
                ))
            }
        };

        if page.preamble.draft && !draft_mode {
            return RenderOutcome::RenderFailed(
                "page is marked as draft; enable draft mode to build it".to_string(),
            );
        }

        let title = page
            .preamble
            .title
            .clone()
            .unwrap_or_else(|| self.site.title.clone());

        let preamble = page.preamble.to_json();
        // Embedded in a <script> block, so `</` must not appear verbatim
        let flags = preamble.to_string().replace("</", "<\\/");
        let module_json = serde_json::to_string(&page.preamble.module)
            .unwrap_or_else(|_| "null".to_string())
            .replace("</", "<\\/");

        let reload_script = if auto_reload {
            reload_client_script()
        } else {
            String::new()
        };

        let env = Environment::new();
        let rendered = env.render_str(
            &artifacts.static_code,
            context! {
                title => title,
                site_title => &self.site.title,
                base_url => &self.site.base_url,
                content => page.body_html(),
                toc => &page.toc,
                preamble => preamble,
                flags => flags,
                module => &page.preamble.module,
                module_json => module_json,
                app_js => &artifacts.app_js,
                auto_reload => auto_reload,
                reload_script => reload_script,
            },
        );

        match rendered {
            Ok(html) => RenderOutcome::Rendered(html),
            Err(e) => RenderOutcome::RenderFailed(format!("failed to render layout: {}", e)),
        }
    }
}
